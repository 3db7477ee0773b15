//! Base32 codec over the `A–Z2–7` alphabet.
//!
//! Each output symbol carries 5 bits, most significant first. Encoding
//! never emits padding; the final partial group is zero-filled on the
//! right. Decoding is lenient: `=` padding and any symbol outside the
//! alphabet are skipped, lowercase is accepted, and trailing bits that do
//! not complete a byte are dropped.

/// The 32-symbol alphabet.
pub const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// Maps a symbol to its 5-bit value, case-insensitively.
fn symbol_value(symbol: char) -> Option<u32> {
    match symbol.to_ascii_uppercase() {
        c @ 'A'..='Z' => Some(c as u32 - 'A' as u32),
        c @ '2'..='7' => Some(c as u32 - '2' as u32 + 26),
        _ => None,
    }
}

/// Encodes `input` as Base32 without padding.
///
/// # Parameters
/// - `input`: Bytes to encode.
///
/// # Returns
/// A string of `ceil(8 * len / 5)` symbols.
///
/// # Examples
///
/// ```
/// use rotorcrypt::utils::base32;
///
/// assert_eq!(base32::encode(&[0x00]), "AA");
/// assert_eq!(base32::encode(b"Hi"), "JBUQ");
/// ```
pub fn encode(input: &[u8]) -> String {
    let mut output = String::with_capacity((input.len() * 8).div_ceil(5));
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;
    for &byte in input {
        buffer = (buffer << 8) | u32::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            output.push(ALPHABET[((buffer >> bits) & 0x1F) as usize] as char);
        }
        buffer &= (1 << bits) - 1;
    }
    if bits > 0 {
        output.push(ALPHABET[((buffer << (5 - bits)) & 0x1F) as usize] as char);
    }
    output
}

/// Decodes Base32 text back to bytes.
///
/// Never fails: padding and unknown symbols are skipped.
///
/// # Examples
///
/// ```
/// use rotorcrypt::utils::base32;
///
/// assert_eq!(base32::decode("jbuq"), b"Hi");
/// assert_eq!(base32::decode("JB-UQ=="), b"Hi");
/// ```
pub fn decode(input: &str) -> Vec<u8> {
    let mut output = Vec::with_capacity(input.len() * 5 / 8);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;
    for value in input.chars().filter_map(symbol_value) {
        buffer = (buffer << 5) | value;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            output.push(((buffer >> bits) & 0xFF) as u8);
        }
        buffer &= (1 << bits) - 1;
    }
    output
}
