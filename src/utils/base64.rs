//! Standard Base64 text stage.
//!
//! Encodes the UTF-8 bytes of a string with the standard alphabet and `=`
//! padding. Unlike Base32, decoding is strict: malformed input is an error.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::RotorCryptError;
use crate::utils::text;

/// Encodes the UTF-8 bytes of `input` as padded standard Base64.
///
/// # Examples
///
/// ```
/// use rotorcrypt::utils::base64;
///
/// assert_eq!(base64::encode("olá"), "b2zDoQ==");
/// ```
pub fn encode(input: &str) -> String {
    STANDARD.encode(input.as_bytes())
}

/// Decodes padded standard Base64 back to text.
///
/// # Errors
/// Returns [`RotorCryptError::Decode`] if `input` is not valid Base64 or
/// the decoded bytes are not valid UTF-8.
pub fn decode(input: &str) -> Result<String, RotorCryptError> {
    let bytes = STANDARD
        .decode(input.trim().as_bytes())
        .map_err(|e| RotorCryptError::decode(format!("invalid Base64 input: {}", e)))?;
    text::utf8(bytes, "base64")
}
