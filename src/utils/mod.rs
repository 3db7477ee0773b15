//! Text codecs shared by the cipher stages.

pub mod base32;
pub mod base64;
pub(crate) mod text;
