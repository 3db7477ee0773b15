//! SubstitutionCipher: rotor-driven shift cipher over `A–Z` and `0–9`.
//!
//! Letters are shifted modulo 26 and digits modulo 10, each by the shift
//! the equation derives from the current rotor state for that modulus.
//! After each letter or digit the rotors advance by the shift just used.
//! Every other character is copied through and leaves the rotors alone.

use std::num::NonZeroU32;

use crate::equation::{evaluate, EquationKind, Precision, DIGIT_MODULUS, LETTER_MODULUS};
use crate::rotor::RotorState;
use crate::Direction;

/// Symbol class of a character in the restricted alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SymbolClass {
    Letter,
    Digit,
}

impl SymbolClass {
    fn of(c: char) -> Option<Self> {
        match c {
            'A'..='Z' => Some(SymbolClass::Letter),
            '0'..='9' => Some(SymbolClass::Digit),
            _ => None,
        }
    }

    fn modulus(self) -> NonZeroU32 {
        match self {
            SymbolClass::Letter => LETTER_MODULUS,
            SymbolClass::Digit => DIGIT_MODULUS,
        }
    }

    fn base(self) -> u32 {
        match self {
            SymbolClass::Letter => 'A' as u32,
            SymbolClass::Digit => '0' as u32,
        }
    }
}

/// Rotor-driven substitution cipher.
///
/// # Examples
///
/// ```
/// use rotorcrypt::{Direction, EquationKind, RotorState, SubstitutionCipher};
///
/// let cipher = SubstitutionCipher::new(EquationKind::Simple, true);
/// let initial = RotorState::new([1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
///
/// let mut state = initial;
/// let encrypted = cipher.transform("AB-12", &mut state, Direction::Encrypt);
///
/// let mut state = initial;
/// let decrypted = cipher.transform(&encrypted, &mut state, Direction::Decrypt);
/// assert_eq!(decrypted, "AB-12");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubstitutionCipher {
    equation: EquationKind,
    auto_advance: bool,
    precision: Precision,
}

impl SubstitutionCipher {
    /// Creates a substitution cipher.
    ///
    /// # Parameters
    /// - `equation`: Equation deriving each shift.
    /// - `auto_advance`: Advance the rotors after every letter or digit.
    pub fn new(equation: EquationKind, auto_advance: bool) -> Self {
        SubstitutionCipher {
            equation,
            auto_advance,
            precision: Precision::Arbitrary,
        }
    }

    /// Overrides the arithmetic precision available to the `super` equation.
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Encrypts or decrypts `text`, advancing `state` as symbols are consumed.
    ///
    /// Output has the same number of characters as `text`. On return `state`
    /// holds the rotor position after the last letter or digit.
    ///
    /// # Parameters
    /// - `text`: Input characters; only `A–Z` and `0–9` are transformed.
    /// - `state`: Rotor state, advanced in place.
    /// - `direction`: Add (`Encrypt`) or subtract (`Decrypt`) the shift.
    pub fn transform(&self, text: &str, state: &mut RotorState, direction: Direction) -> String {
        let mut output = String::with_capacity(text.len());
        for c in text.chars() {
            let class = match SymbolClass::of(c) {
                Some(class) => class,
                None => {
                    output.push(c);
                    continue;
                }
            };
            let modulus = class.modulus().get();
            let shift = evaluate(state, class.modulus(), self.equation, self.precision).value;
            let index = c as u32 - class.base();
            let shifted = match direction {
                Direction::Encrypt => (index + shift) % modulus,
                Direction::Decrypt => (index + modulus - shift) % modulus,
            };
            // shifted < modulus keeps the code point inside A–Z / 0–9
            output.push(char::from_u32(class.base() + shifted).unwrap_or(c));

            if self.auto_advance {
                state.advance(shift);
            }
        }
        output
    }

    /// Encrypts `text` starting from `state`, returning the ciphertext.
    pub fn encrypt(&self, text: &str, state: RotorState) -> String {
        let mut state = state;
        self.transform(text, &mut state, Direction::Encrypt)
    }

    /// Decrypts `text` starting from `state`, returning the plaintext.
    pub fn decrypt(&self, text: &str, state: RotorState) -> String {
        let mut state = state;
        self.transform(text, &mut state, Direction::Decrypt)
    }
}
