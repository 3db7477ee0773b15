//! Display-only glyph alphabet.
//!
//! A fixed one-to-one mapping from `A`..`Z` to glyph strings, applied to
//! final substitution output for display. Several glyphs span more than
//! one code point, so decoding matches the longest glyph first. This codec
//! never touches rotor state.

/// Glyph for each letter, indexed by `letter - 'A'`.
pub const GLYPHS: [&str; 26] = [
    "\u{1511}",          // A
    "\u{0296}",          // B
    "\u{14F5}",          // C
    "\u{21B8}",          // D
    "\u{14B7}",          // E
    "\u{2393}",          // F
    "\u{22A3}",          // G
    "\u{2351}",          // H
    "\u{254E}",          // I
    "\u{22EE}",          // J
    "\u{A58C}",          // K
    "\u{A58E}",          // L
    "\u{14B2}",          // M
    "\u{30EA}",          // N
    "\u{1D679}",         // O
    "!\u{00A1}",         // P
    "\u{1451}",          // Q
    "\u{2237}",          // R
    "\u{14ED}",          // S
    "\u{2138}\u{0323}",  // T
    "\u{268D}",          // U
    "\u{234A}",          // V
    "\u{2234}",          // W
    "\u{0307}/",         // X
    "||",                // Y
    "\u{2A05}",          // Z
];

/// Replaces every letter (either case) with its glyph.
///
/// # Examples
///
/// ```
/// use rotorcrypt::glyph;
///
/// assert_eq!(glyph::encode("Ab 2"), "\u{1511}\u{0296} 2");
/// ```
pub fn encode(text: &str) -> String {
    let mut output = String::with_capacity(text.len() * 3);
    for c in text.chars() {
        let upper = c.to_ascii_uppercase();
        if upper.is_ascii_uppercase() {
            output.push_str(GLYPHS[(upper as u8 - b'A') as usize]);
        } else {
            output.push(c);
        }
    }
    output
}

/// Maps glyphs back to uppercase letters.
///
/// Scans left to right; at each position the longest matching glyph wins,
/// otherwise one character is copied through unchanged.
///
/// # Examples
///
/// ```
/// use rotorcrypt::glyph;
///
/// assert_eq!(glyph::decode(&glyph::encode("PXTY 7")), "PXTY 7");
/// ```
pub fn decode(text: &str) -> String {
    let mut by_length: Vec<(usize, &str)> = GLYPHS.iter().copied().enumerate().collect();
    by_length.sort_by_key(|(_, g)| std::cmp::Reverse(g.chars().count()));

    let mut output = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        match by_length.iter().find(|(_, g)| rest.starts_with(g)) {
            Some(&(letter, g)) => {
                output.push((b'A' + letter as u8) as char);
                rest = &rest[g.len()..];
            }
            None => {
                output.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_injective() {
        for (i, a) in GLYPHS.iter().enumerate() {
            for b in GLYPHS.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_alphabet_roundtrip() {
        let alphabet = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
        assert_eq!(decode(&encode(alphabet)), alphabet);
    }

    #[test]
    fn test_lowercase_encodes_as_uppercase() {
        assert_eq!(encode("y"), "||");
        assert_eq!(decode(&encode("hello")), "HELLO");
    }

    #[test]
    fn test_non_letters_pass_through() {
        assert_eq!(encode("234567 -"), "234567 -");
        assert_eq!(decode("234567 -"), "234567 -");
    }

    #[test]
    fn test_multi_codepoint_glyphs() {
        assert_eq!(encode("T").chars().count(), 2);
        assert_eq!(decode("\u{2138}\u{0323}"), "T");
        // a bare 'ℸ' without the combining mark is not a glyph
        assert_eq!(decode("\u{2138}"), "\u{2138}");
        assert_eq!(decode("!\u{00A1}!"), "P!");
    }

    #[test]
    fn test_mixed_ciphertext() {
        let ciphertext = "NB2HI4DTHIXS6ZLYMFWXA3DFFZRW63I";
        assert_eq!(decode(&encode(ciphertext)), ciphertext);
    }
}
