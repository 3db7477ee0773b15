//! UTF-8 boundary helpers for stage chaining.

use crate::error::RotorCryptError;

/// Converts stage output bytes back into text.
///
/// # Errors
/// Returns [`RotorCryptError::Decode`] if `bytes` is not valid UTF-8, which
/// usually means the rotor settings or equation do not match the ones used
/// to encrypt.
pub(crate) fn utf8(bytes: Vec<u8>, stage: &str) -> Result<String, RotorCryptError> {
    String::from_utf8(bytes).map_err(|e| {
        RotorCryptError::decode(format!(
            "{} output is not valid UTF-8 (check the rotor settings): {}",
            stage, e
        ))
    })
}
