//! RotorState: ten-wheel odometer that drives every cipher stage.
//!
//! Each wheel holds a position in `[0, 25]`. Advancing adds an increment to
//! wheel 0 and carries overflow into the following wheels, exactly like a
//! mixed-radix odometer. Because the increment is the shift the equation
//! derived from the current state, the whole trajectory is a function of
//! the initial state, the equation and the modulus alone.

use std::fmt;
use std::num::NonZeroU32;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::equation::{evaluate, EquationKind, Precision};

/// Number of wheels in a rotor state.
pub const ROTOR_COUNT: usize = 10;

/// Positions per wheel.
pub const ROTOR_POSITIONS: u32 = 26;

/// Ten wheel positions, each in `[0, 25]`.
///
/// `RotorState` is `Copy`: every stage works on its own copy so sibling
/// stages never observe each other's advancement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[i64; 10]", into = "[i64; 10]")]
pub struct RotorState {
    wheels: [u8; ROTOR_COUNT],
}

impl RotorState {
    /// Creates a rotor state from user offsets, clamping each into `[0, 25]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rotorcrypt::RotorState;
    ///
    /// let state = RotorState::new([-3, 40, 7, 0, 0, 0, 0, 0, 0, 0]);
    /// assert_eq!(state.counters()[..3], [0, 25, 7]);
    /// ```
    pub fn new(offsets: [i64; ROTOR_COUNT]) -> Self {
        let mut wheels = [0u8; ROTOR_COUNT];
        for (wheel, &offset) in wheels.iter_mut().zip(offsets.iter()) {
            *wheel = offset.clamp(0, i64::from(ROTOR_POSITIONS) - 1) as u8;
        }
        RotorState { wheels }
    }

    /// Draws a uniformly random position for every wheel.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut wheels = [0u8; ROTOR_COUNT];
        for wheel in wheels.iter_mut() {
            *wheel = rng.gen_range(0..ROTOR_POSITIONS) as u8;
        }
        RotorState { wheels }
    }

    /// Returns the wheel positions.
    pub fn counters(&self) -> &[u8; ROTOR_COUNT] {
        &self.wheels
    }

    /// Moves every wheel back to position 0.
    pub fn reset(&mut self) {
        self.wheels = [0; ROTOR_COUNT];
    }

    /// Advances the odometer by `amount` clicks.
    ///
    /// An amount of 0 still moves wheel 0 by one position so the state
    /// sequence never stalls. Carry past the last wheel is discarded.
    ///
    /// # Examples
    ///
    /// ```
    /// use rotorcrypt::RotorState;
    ///
    /// let mut state = RotorState::new([3, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    /// state.advance(26);
    /// assert_eq!(state.counters()[..2], [3, 1]);
    /// ```
    pub fn advance(&mut self, amount: u32) {
        let mut carry = if amount > 0 { amount } else { 1 };
        for wheel in self.wheels.iter_mut() {
            if carry == 0 {
                break;
            }
            let next = u32::from(*wheel) + carry;
            *wheel = (next % ROTOR_POSITIONS) as u8;
            carry = next / ROTOR_POSITIONS;
        }
    }

    /// Iterates the `(state, shift)` pairs a stage visits from this state.
    ///
    /// # Parameters
    /// - `equation`: Equation deriving each shift.
    /// - `modulus`: Modulus for every shift on the path.
    /// - `auto_advance`: When `false` the state never moves.
    pub fn trajectory(
        self,
        equation: EquationKind,
        modulus: NonZeroU32,
        auto_advance: bool,
    ) -> Trajectory {
        Trajectory {
            state: self,
            equation,
            modulus,
            auto_advance,
            precision: Precision::Arbitrary,
        }
    }
}

impl From<[i64; ROTOR_COUNT]> for RotorState {
    fn from(offsets: [i64; ROTOR_COUNT]) -> Self {
        RotorState::new(offsets)
    }
}

impl From<RotorState> for [i64; ROTOR_COUNT] {
    fn from(state: RotorState) -> Self {
        state.wheels.map(i64::from)
    }
}

impl fmt::Display for RotorState {
    /// Formats as comma-separated decimal wheel positions (`"0,1,...,9"`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, wheel) in self.wheels.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", wheel)?;
        }
        Ok(())
    }
}

/// Infinite iterator over the rotor path of a stage.
///
/// Yields the state before each unit is processed together with the shift
/// derived from it, then advances by that shift.
#[derive(Debug, Clone)]
pub struct Trajectory {
    state: RotorState,
    equation: EquationKind,
    modulus: NonZeroU32,
    auto_advance: bool,
    precision: Precision,
}

impl Trajectory {
    /// Overrides the arithmetic precision available to the `super` equation.
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Returns the state the next unit would be processed with.
    pub fn state(&self) -> RotorState {
        self.state
    }
}

impl Iterator for Trajectory {
    type Item = (RotorState, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.state;
        let shift = evaluate(&current, self.modulus, self.equation, self.precision).value;
        if self.auto_advance {
            self.state.advance(shift);
        }
        Some((current, shift))
    }
}

/// Replays `steps` advances from `initial`, deriving every shift with `modulus`.
///
/// Reconstructs the state a stage ended in without seeing its text. The
/// result is exact only if every replayed position used `modulus`; a stage
/// that mixed letters (26) and digits (10) will not be reproduced.
///
/// # Examples
///
/// ```
/// use rotorcrypt::{replay, EquationKind, RotorState, LETTER_MODULUS};
///
/// let start = RotorState::default();
/// let end = replay(start, EquationKind::Simple, LETTER_MODULUS, 2);
/// // shift 0 moves one click, then shift 1 moves one more
/// assert_eq!(end.counters()[0], 2);
/// ```
pub fn replay(
    initial: RotorState,
    equation: EquationKind,
    modulus: NonZeroU32,
    steps: usize,
) -> RotorState {
    let mut path = initial.trajectory(equation, modulus, true);
    for _ in 0..steps {
        path.next();
    }
    path.state()
}
