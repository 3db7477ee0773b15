//! EquationEngine: derives a shift value from rotor state.
//!
//! Every equation is a pure function of the ten rotor counters. The raw
//! quantity is reduced modulo a stage-supplied modulus, so the same state
//! yields different shifts for letters (26), digits (10) and the keystream
//! seed (255).

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use crate::error::RotorCryptError;
use crate::rotor::RotorState;

const fn non_zero(n: u32) -> NonZeroU32 {
    match NonZeroU32::new(n) {
        Some(v) => v,
        None => panic!("modulus must be non-zero"),
    }
}

/// Modulus applied to letter positions (`A`..`Z`).
pub const LETTER_MODULUS: NonZeroU32 = non_zero(26);

/// Modulus applied to digit positions (`0`..`9`).
pub const DIGIT_MODULUS: NonZeroU32 = non_zero(10);

/// Modulus used to seed the keystream digest.
pub const KEYSTREAM_MODULUS: NonZeroU32 = non_zero(255);

/// Shift-derivation strategy, selected once per pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EquationKind {
    /// Sum of all counters.
    #[default]
    Simple,
    /// Sum of squares.
    Exponential,
    /// Sum of cubes.
    Cubic,
    /// Product of `(o[i] + 1)`.
    Product,
    /// Sum of `(i + 1) * o[i]`.
    Weighted,
    /// `sum^2 + sum_of_squares`.
    ExpCombined,
    /// Sum of `o[i] * o[i + 1]` over even `i`, a zero neighbour counting as 1.
    MultSum,
    /// `(total * product)` of all seven quantities above.
    Super,
}

impl EquationKind {
    /// All equation kinds, in declaration order.
    pub const ALL: [EquationKind; 8] = [
        EquationKind::Simple,
        EquationKind::Exponential,
        EquationKind::Cubic,
        EquationKind::Product,
        EquationKind::Weighted,
        EquationKind::ExpCombined,
        EquationKind::MultSum,
        EquationKind::Super,
    ];

    /// Returns the configuration name of this equation.
    pub fn name(self) -> &'static str {
        match self {
            EquationKind::Simple => "simple",
            EquationKind::Exponential => "exponential",
            EquationKind::Cubic => "cubic",
            EquationKind::Product => "product",
            EquationKind::Weighted => "weighted",
            EquationKind::ExpCombined => "exp-combined",
            EquationKind::MultSum => "mult-sum",
            EquationKind::Super => "super",
        }
    }
}

impl fmt::Display for EquationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EquationKind {
    type Err = RotorCryptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EquationKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| RotorCryptError::config(format!("unknown equation '{}'", s)))
    }
}

/// Whether the `super` equation may use arbitrary-precision integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    /// Big-integer arithmetic is available.
    #[default]
    Arbitrary,
    /// Big-integer arithmetic is unavailable; `super` degrades to `simple`.
    Unavailable,
}

/// Result of a shift evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    /// Shift value in `[0, modulus)`.
    pub value: u32,
    /// `true` when `super` fell back to the `simple` equation.
    pub degraded: bool,
}

/// The seven per-state quantities that the equations are built from.
///
/// Fits in `u64` for any state in `[0, 25]^10`: the largest term is the
/// product `26^10 < 2^48`.
#[derive(Debug, Clone, Copy)]
struct Terms {
    sum: u64,
    sum_sq: u64,
    sum_cube: u64,
    product: u64,
    weighted: u64,
    exp_combined: u64,
    mult_sum: u64,
}

impl Terms {
    fn of(counters: &[u8]) -> Self {
        let o: Vec<u64> = counters.iter().map(|&c| u64::from(c)).collect();
        let sum: u64 = o.iter().sum();
        let sum_sq: u64 = o.iter().map(|x| x * x).sum();
        let sum_cube: u64 = o.iter().map(|x| x * x * x).sum();
        let product: u64 = o.iter().map(|x| x + 1).product();
        let weighted: u64 = o
            .iter()
            .enumerate()
            .map(|(i, x)| (i as u64 + 1) * x)
            .sum();
        let mult_sum: u64 = o
            .iter()
            .enumerate()
            .step_by(2)
            .map(|(i, x)| {
                // a zero or missing neighbour counts as 1
                let neighbour = match o.get(i + 1) {
                    Some(&0) | None => 1,
                    Some(&n) => n,
                };
                x * neighbour
            })
            .sum();
        Terms {
            sum,
            sum_sq,
            sum_cube,
            product,
            weighted,
            exp_combined: sum * sum + sum_sq,
            mult_sum,
        }
    }

    fn as_array(&self) -> [u64; 7] {
        [
            self.sum,
            self.sum_sq,
            self.sum_cube,
            self.product,
            self.weighted,
            self.exp_combined,
            self.mult_sum,
        ]
    }
}

/// Computes the `super` quantity `(total * prod7) mod modulus` with big integers.
///
/// # Returns
/// `None` if the reduced value cannot be narrowed back to `u32`.
fn super_shift(terms: &Terms, modulus: NonZeroU32) -> Option<u32> {
    let values = terms.as_array();
    let mut total = BigUint::zero();
    let mut prod7 = BigUint::one();
    for v in values {
        total += v;
        prod7 *= v;
    }
    ((total * prod7) % BigUint::from(modulus.get())).to_u32()
}

/// Computes the shift for `state` under `kind`, reduced modulo `modulus`.
///
/// # Parameters
/// - `state`: Current rotor state.
/// - `modulus`: Non-zero modulus (26 for letters, 10 for digits, 255 for keystream).
/// - `kind`: Equation to apply.
/// - `precision`: Whether `super` may use arbitrary-precision integers.
///
/// # Returns
/// A [`Shift`] in `[0, modulus)`, flagged `degraded` if `super` fell back.
pub fn evaluate(
    state: &RotorState,
    modulus: NonZeroU32,
    kind: EquationKind,
    precision: Precision,
) -> Shift {
    let terms = Terms::of(state.counters());
    let m = u64::from(modulus.get());
    let reduce = |raw: u64| (raw % m) as u32;

    let value = match kind {
        EquationKind::Simple => reduce(terms.sum),
        EquationKind::Exponential => reduce(terms.sum_sq),
        EquationKind::Cubic => reduce(terms.sum_cube),
        EquationKind::Product => reduce(terms.product),
        EquationKind::Weighted => reduce(terms.weighted),
        EquationKind::ExpCombined => reduce(terms.exp_combined),
        EquationKind::MultSum => reduce(terms.mult_sum),
        EquationKind::Super => {
            let wide = match precision {
                Precision::Arbitrary => super_shift(&terms, modulus),
                Precision::Unavailable => None,
            };
            match wide {
                Some(v) => v,
                None => {
                    tracing::warn!(
                        modulus = modulus.get(),
                        "{}",
                        RotorCryptError::ArithmeticOverflowFallback
                    );
                    return Shift {
                        value: reduce(terms.sum),
                        degraded: true,
                    };
                }
            }
        }
    };

    Shift {
        value,
        degraded: false,
    }
}

/// Computes the shift value for `state`, using arbitrary precision for `super`.
///
/// # Errors
/// Returns [`RotorCryptError::Configuration`] if `modulus` is zero.
///
/// # Examples
///
/// ```
/// use rotorcrypt::{shift, EquationKind, RotorState};
///
/// let state = RotorState::new([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
/// assert_eq!(shift(&state, 26, EquationKind::Simple).unwrap(), 1);
/// assert!(shift(&state, 0, EquationKind::Simple).is_err());
/// ```
pub fn shift(state: &RotorState, modulus: u32, kind: EquationKind) -> Result<u32, RotorCryptError> {
    let modulus = NonZeroU32::new(modulus)
        .ok_or_else(|| RotorCryptError::config("modulus must be greater than zero"))?;
    Ok(evaluate(state, modulus, kind, Precision::Arbitrary).value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(offsets: [i64; 10]) -> RotorState {
        RotorState::new(offsets)
    }

    #[test]
    fn test_zero_state_all_equations() {
        let zero = RotorState::default();
        // product is 1 for the zero state, everything else is 0
        for kind in EquationKind::ALL {
            let expected = if kind == EquationKind::Product { 1 } else { 0 };
            assert_eq!(shift(&zero, 26, kind).unwrap(), expected, "{}", kind);
        }
    }

    #[test]
    fn test_simple_first_wheel() {
        let s = state([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(shift(&s, 26, EquationKind::Simple).unwrap(), 1);
    }

    #[test]
    fn test_known_values() {
        let s = state([1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(shift(&s, 1000, EquationKind::Simple).unwrap(), 55);
        assert_eq!(shift(&s, 1000, EquationKind::Exponential).unwrap(), 385);
        assert_eq!(shift(&s, 10_000, EquationKind::Cubic).unwrap(), 3025);
        // 11! = 39916800
        assert_eq!(shift(&s, 1_000_000, EquationKind::Product).unwrap(), 916_800);
        assert_eq!(shift(&s, 1000, EquationKind::Weighted).unwrap(), 385);
        assert_eq!(shift(&s, 10_000, EquationKind::ExpCombined).unwrap(), 3410);
        // 1*2 + 3*4 + 5*6 + 7*8 + 9*10
        assert_eq!(shift(&s, 1000, EquationKind::MultSum).unwrap(), 190);
    }

    #[test]
    fn test_mult_sum_zero_neighbour_counts_as_one() {
        let s = state([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(shift(&s, 26, EquationKind::MultSum).unwrap(), 1);
        // 3*1 + 0 + 5*2 + 0 + 4*1
        let s = state([3, 0, 0, 7, 5, 2, 0, 0, 4, 0]);
        assert_eq!(shift(&s, 1000, EquationKind::MultSum).unwrap(), 17);
    }

    #[test]
    fn test_super_with_zero_neighbours() {
        let s = state([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(shift(&s, 26, EquationKind::Super).unwrap(), 10);
    }

    #[test]
    fn test_super_known_value() {
        let s = state([1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(shift(&s, 26, EquationKind::Super).unwrap(), 14);
        assert_eq!(shift(&s, 255, EquationKind::Super).unwrap(), 75);
    }

    #[test]
    fn test_super_fallback_matches_simple() {
        let samples = [
            [0; 10],
            [25; 10],
            [1, 2, 3, 4, 5, 6, 7, 8, 9, 10],
            [13, 0, 7, 25, 2, 19, 4, 11, 8, 22],
        ];
        for offsets in samples {
            let s = state(offsets);
            for modulus in [LETTER_MODULUS, DIGIT_MODULUS, KEYSTREAM_MODULUS] {
                let degraded = evaluate(&s, modulus, EquationKind::Super, Precision::Unavailable);
                let simple = evaluate(&s, modulus, EquationKind::Simple, Precision::Arbitrary);
                assert!(degraded.degraded);
                assert_eq!(degraded.value, simple.value);
            }
        }
    }

    #[test]
    fn test_precision_only_affects_super() {
        let s = state([3, 1, 4, 1, 5, 9, 2, 6, 5, 3]);
        for kind in EquationKind::ALL {
            if kind == EquationKind::Super {
                continue;
            }
            let a = evaluate(&s, LETTER_MODULUS, kind, Precision::Arbitrary);
            let b = evaluate(&s, LETTER_MODULUS, kind, Precision::Unavailable);
            assert_eq!(a, b);
            assert!(!a.degraded);
        }
    }

    #[test]
    fn test_max_state_in_range() {
        let s = state([25; 10]);
        for kind in EquationKind::ALL {
            for modulus in [1, 10, 26, 255, 256, u32::MAX] {
                let v = shift(&s, modulus, kind).unwrap();
                assert!(v < modulus, "{} mod {} gave {}", kind, modulus, v);
            }
        }
    }

    #[test]
    fn test_zero_modulus_rejected() {
        let s = RotorState::default();
        assert!(matches!(
            shift(&s, 0, EquationKind::Simple),
            Err(RotorCryptError::Configuration(_))
        ));
    }

    #[test]
    fn test_name_parse_roundtrip() {
        for kind in EquationKind::ALL {
            assert_eq!(kind.name().parse::<EquationKind>().unwrap(), kind);
        }
        assert!("quartic".parse::<EquationKind>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&EquationKind::ExpCombined).unwrap();
        assert_eq!(json, "\"exp-combined\"");
        let kind: EquationKind = serde_json::from_str("\"mult-sum\"").unwrap();
        assert_eq!(kind, EquationKind::MultSum);
    }
}
