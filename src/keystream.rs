//! KeystreamCipher: hash-seeded additive stream cipher.
//!
//! For every byte position the cipher derives a shift from the rotor state
//! (modulus 255), hashes the seed string `"o0,o1,...,o9:shift"` and takes
//! the first digest byte as the key byte. Encryption adds the key byte
//! modulo 256, decryption subtracts it. The rotors then advance by the
//! shift, identically in both directions, so the keystream depends only
//! on the initial state and the equation, never on the data.

use std::fmt;

use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

use crate::equation::{EquationKind, Precision, KEYSTREAM_MODULUS};
use crate::error::RotorCryptError;
use crate::rotor::RotorState;
use crate::utils::base32;
use crate::utils::text::utf8;
use crate::Direction;

/// Secure hash used to derive key bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    /// 160-bit SHA-1.
    Sha1,
    /// 256-bit SHA-256.
    Sha256,
    /// 512-bit SHA-512.
    Sha512,
}

impl DigestAlgorithm {
    /// Returns the conventional algorithm name (`"SHA-256"`, ...).
    pub fn name(self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "SHA-1",
            DigestAlgorithm::Sha256 => "SHA-256",
            DigestAlgorithm::Sha512 => "SHA-512",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source of digests for the keystream.
///
/// Implementations must be deterministic: the same algorithm and seed must
/// always produce the same digest, or decryption will not invert encryption.
pub trait DigestProvider: Send + Sync {
    /// Hashes `seed` with `algorithm`.
    ///
    /// # Errors
    /// Returns [`RotorCryptError::DigestUnavailable`] if the hash cannot be computed.
    fn digest(&self, algorithm: DigestAlgorithm, seed: &[u8]) -> Result<Vec<u8>, RotorCryptError>;
}

/// In-process digests backed by the RustCrypto `sha1` and `sha2` crates.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoDigest;

impl DigestProvider for RustCryptoDigest {
    fn digest(&self, algorithm: DigestAlgorithm, seed: &[u8]) -> Result<Vec<u8>, RotorCryptError> {
        Ok(match algorithm {
            DigestAlgorithm::Sha1 => Sha1::digest(seed).to_vec(),
            DigestAlgorithm::Sha256 => Sha256::digest(seed).to_vec(),
            DigestAlgorithm::Sha512 => Sha512::digest(seed).to_vec(),
        })
    }
}

pub(crate) static RUST_CRYPTO: RustCryptoDigest = RustCryptoDigest;

/// Builds the digest seed for one byte position: `"o0,...,o9:shift"`.
///
/// # Examples
///
/// ```
/// use rotorcrypt::{keystream::seed_string, RotorState};
///
/// assert_eq!(seed_string(&RotorState::default(), 0), "0,0,0,0,0,0,0,0,0,0:0");
/// ```
pub fn seed_string(state: &RotorState, shift: u32) -> String {
    format!("{}:{}", state, shift)
}

/// Hash-seeded keystream cipher.
///
/// # Examples
///
/// ```
/// use rotorcrypt::{DigestAlgorithm, EquationKind, KeystreamCipher, RotorState};
///
/// let cipher = KeystreamCipher::new(DigestAlgorithm::Sha256, EquationKind::Weighted, true);
/// let state = RotorState::new([4, 8, 15, 16, 23, 0, 0, 0, 0, 0]);
///
/// let encrypted = cipher.encrypt_text("attack at dawn", state).unwrap();
/// assert_eq!(cipher.decrypt_text(&encrypted, state).unwrap(), "attack at dawn");
/// ```
#[derive(Clone, Copy)]
pub struct KeystreamCipher<'d> {
    algorithm: DigestAlgorithm,
    equation: EquationKind,
    auto_advance: bool,
    precision: Precision,
    provider: &'d dyn DigestProvider,
}

impl fmt::Debug for KeystreamCipher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeystreamCipher")
            .field("algorithm", &self.algorithm)
            .field("equation", &self.equation)
            .field("auto_advance", &self.auto_advance)
            .field("precision", &self.precision)
            .finish_non_exhaustive()
    }
}

impl KeystreamCipher<'static> {
    /// Creates a keystream cipher using the built-in RustCrypto digests.
    ///
    /// # Parameters
    /// - `algorithm`: Digest deriving each key byte.
    /// - `equation`: Equation deriving each shift.
    /// - `auto_advance`: Advance the rotors after every byte.
    pub fn new(algorithm: DigestAlgorithm, equation: EquationKind, auto_advance: bool) -> Self {
        KeystreamCipher {
            algorithm,
            equation,
            auto_advance,
            precision: Precision::Arbitrary,
            provider: &RUST_CRYPTO,
        }
    }
}

impl<'d> KeystreamCipher<'d> {
    /// Replaces the digest provider.
    pub fn with_provider<'p>(self, provider: &'p dyn DigestProvider) -> KeystreamCipher<'p> {
        KeystreamCipher {
            algorithm: self.algorithm,
            equation: self.equation,
            auto_advance: self.auto_advance,
            precision: self.precision,
            provider,
        }
    }

    /// Overrides the arithmetic precision available to the `super` equation.
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Derives `len` key bytes starting at `state`, advancing it in place.
    ///
    /// The rotor path is walked first; digests are then taken in position
    /// order.
    ///
    /// # Errors
    /// Returns [`RotorCryptError::DigestUnavailable`] if the provider fails
    /// or returns an empty digest.
    pub fn keystream(&self, len: usize, state: &mut RotorState) -> Result<Vec<u8>, RotorCryptError> {
        let mut path = state
            .trajectory(self.equation, KEYSTREAM_MODULUS, self.auto_advance)
            .with_precision(self.precision);
        let seeds: Vec<String> = path
            .by_ref()
            .take(len)
            .map(|(position, shift)| seed_string(&position, shift))
            .collect();
        *state = path.state();

        seeds
            .iter()
            .map(|seed| {
                let digest = self.provider.digest(self.algorithm, seed.as_bytes())?;
                digest.first().copied().ok_or_else(|| {
                    RotorCryptError::DigestUnavailable(format!("{} returned an empty digest", self.algorithm))
                })
            })
            .collect()
    }

    /// Encrypts or decrypts raw bytes, advancing `state` in place.
    ///
    /// # Parameters
    /// - `data`: Input bytes.
    /// - `state`: Rotor state, advanced once per byte.
    /// - `direction`: Add (`Encrypt`) or subtract (`Decrypt`) each key byte.
    ///
    /// # Returns
    /// Output bytes, same length as `data`.
    ///
    /// # Errors
    /// Returns [`RotorCryptError::DigestUnavailable`] if any digest fails; no
    /// partial output is returned.
    pub fn apply(
        &self,
        data: &[u8],
        state: &mut RotorState,
        direction: Direction,
    ) -> Result<Vec<u8>, RotorCryptError> {
        let key = self.keystream(data.len(), state)?;
        Ok(data
            .iter()
            .zip(key)
            .map(|(&byte, k)| match direction {
                Direction::Encrypt => byte.wrapping_add(k),
                Direction::Decrypt => byte.wrapping_sub(k),
            })
            .collect())
    }

    /// Encrypts the UTF-8 bytes of `text` and returns them as Base32.
    ///
    /// # Errors
    /// Returns [`RotorCryptError::DigestUnavailable`] if any digest fails.
    pub fn encrypt_text(&self, text: &str, state: RotorState) -> Result<String, RotorCryptError> {
        let mut state = state;
        let bytes = self.apply(text.as_bytes(), &mut state, Direction::Encrypt)?;
        Ok(base32::encode(&bytes))
    }

    /// Decodes Base32 `text`, decrypts it and returns the recovered text.
    ///
    /// # Errors
    /// - [`RotorCryptError::DigestUnavailable`] if any digest fails.
    /// - [`RotorCryptError::Decode`] if the decrypted bytes are not UTF-8.
    pub fn decrypt_text(&self, text: &str, state: RotorState) -> Result<String, RotorCryptError> {
        let mut state = state;
        let bytes = self.apply(&base32::decode(text), &mut state, Direction::Decrypt)?;
        utf8(bytes, "keystream")
    }
}
