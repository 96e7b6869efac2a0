//! `^CI` codepage resolution and `^FH` hex-escape decoding.
//!
//! Ids `0` and `27` are mapped to the single-byte Latin table ZPL printers
//! ship by default (Latin-1 code-point-per-byte, the practical stand-in for
//! Zebra's "U.S." and "DOS 850-like" tables); `28` is UTF-8. Anything else
//! falls back to UTF-8 passthrough with a warning — a full codepage table
//! is a larger undertaking than this pragmatic resolution covers.

/// Decodes a byte sequence that has already had `^FH` escapes expanded, using
/// the codepage selected by `^CI`.
pub fn decode_bytes(bytes: &[u8], encoding_id: u8) -> String {
    match encoding_id {
        28 => String::from_utf8_lossy(bytes).into_owned(),
        0 | 27 => bytes.iter().map(|&b| b as char).collect(),
        other => {
            tracing::warn!(encoding_id = other, "unmapped ^CI codepage, falling back to UTF-8");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

/// Expands `^FH` hex-escape sequences (`<indicator><hex><hex>`) in `text`
/// into raw bytes, leaving non-escaped characters as their own byte(s).
/// Spec §4.2 step 1; §8 boundary example: `^FH` + `^FD_C3_A9` with encoding
/// `28` renders "é".
pub fn expand_hex_escapes(text: &str, indicator: char) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == indicator {
            let h1 = chars.peek().copied().and_then(|c| c.to_digit(16));
            if let Some(h1) = h1 {
                chars.next();
                let h2 = chars.peek().copied().and_then(|c| c.to_digit(16));
                if let Some(h2) = h2 {
                    chars.next();
                    out.push(((h1 << 4) | h2) as u8);
                    continue;
                }
                // Only one hex digit followed the indicator: keep it literal.
                let mut buf = [0u8; 4];
                out.extend_from_slice(indicator.encode_utf8(&mut buf).as_bytes());
                let mut buf = [0u8; 4];
                out.extend_from_slice(char::from_digit(h1, 16).unwrap().encode_utf8(&mut buf).as_bytes());
                continue;
            }
        }
        let mut buf = [0u8; 4];
        out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_escape_decodes_accented_character_utf8() {
        let bytes = expand_hex_escapes("_C3_A9", '_');
        assert_eq!(decode_bytes(&bytes, 28), "é");
    }

    #[test]
    fn hex_escape_leaves_literal_text_untouched() {
        let bytes = expand_hex_escapes("plain text", '_');
        assert_eq!(decode_bytes(&bytes, 28), "plain text");
    }

    #[test]
    fn unrecognized_encoding_falls_back_to_utf8() {
        assert_eq!(decode_bytes("hi".as_bytes(), 99), "hi");
    }

    #[test]
    fn latin_table_maps_byte_per_codepoint() {
        assert_eq!(decode_bytes(&[0xE9], 0), "é");
    }
}
