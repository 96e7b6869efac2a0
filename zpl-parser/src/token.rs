//! The context-sensitive tokenizer.
//!
//! Splits a ZPL source string into `{prefix, code, payload}` tokens. Most
//! commands end at the next `^`/`~`; a handful of commands own their own
//! terminator (`^FD`/`^SN`/`^FV` run to the next literal `^FS`, `^DF` runs
//! through a terminating `^XZ`, `^FX` runs to the next `^`, and `^GF`/`~DG`
//! compute an exact payload length from their header parameters). This is
//! the only component in the crate that understands those overrides; once a
//! token is produced, downstream parsing just sees `{code, payload}`.

/// One lexical unit of ZPL source: a command prefix, its code, and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// `'^'` (format command) or `'~'` (host/control command).
    pub prefix: char,
    /// 1-2 uppercase alphanumerics (the font-select code keeps the font id
    /// as its second character, e.g. `"A0"`, `"A@"`).
    pub code: String,
    /// Raw payload text, with tokenizer-level quoting rules already applied.
    pub payload: String,
    /// Byte offset of `prefix` in the source.
    pub source_offset: usize,
    /// Total byte length of the token (prefix + code + payload) in the source.
    pub length: usize,
}

impl Token {
    /// The exact source slice this token was produced from.
    pub fn raw_content<'a>(&self, source: &'a str) -> &'a str {
        &source[self.source_offset..self.source_offset + self.length]
    }
}

/// Lazily tokenizes ZPL source text in order.
pub struct Tokenizer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }
}

/// Codes whose payload consumes up to the next literal `^FS` (case-insensitive).
const FIELD_DATA_CODES: [&str; 3] = ["FD", "SN", "FV"];

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            // Skip garbage (including whitespace) up to the next prefix.
            let rest = &self.source[self.pos..];
            let prefix_rel = rest.find(['^', '~'])?;
            let start = self.pos + prefix_rel;
            let prefix = self.source[start..].chars().next().unwrap();
            let after_prefix = start + prefix.len_utf8();

            let mut chars = self.source[after_prefix..].char_indices();
            let Some((_, c1)) = chars.next() else {
                // Stray prefix at end of input: nothing follows, skip silently.
                self.pos = self.source.len();
                continue;
            };
            if !c1.is_ascii_alphanumeric() {
                // Stray prefix followed by a non-alphanumeric: skip silently.
                self.pos = after_prefix;
                continue;
            }

            let mut code = String::new();
            code.push(c1.to_ascii_uppercase());
            let mut code_end = after_prefix + c1.len_utf8();

            if let Some((off2, c2)) = chars.next() {
                let is_font_select = prefix == '^' && c1.to_ascii_uppercase() == 'A';
                let takes_second = c2.is_ascii_alphanumeric() || (is_font_select && c2 == '@');
                if takes_second {
                    code.push(if c2 == '@' { '@' } else { c2.to_ascii_uppercase() });
                    code_end = after_prefix + off2 + c2.len_utf8();
                }
            }

            let payload_start = code_end;
            let (payload_end, consumed_terminator) =
                self.payload_bounds(&code, payload_start);

            let payload = self.source[payload_start..payload_end].to_string();
            let length = (payload_end + consumed_terminator) - start;

            self.pos = payload_end + consumed_terminator;

            return Some(Token {
                prefix,
                code,
                payload,
                source_offset: start,
                length,
            });
        }
    }
}

impl<'a> Tokenizer<'a> {
    /// Returns `(payload_end, terminator_len)`: `terminator_len` extra bytes
    /// (beyond `payload_end`) that belong to the token but not the payload
    /// text itself (used for `^DF`, which embeds the `^XZ` terminator).
    fn payload_bounds(&self, code: &str, payload_start: usize) -> (usize, usize) {
        let rest = &self.source[payload_start..];

        if FIELD_DATA_CODES.contains(&code) {
            if let Some(rel) = find_ci(rest, "^FS") {
                return (payload_start + rel, 0);
            }
            return (generic_end(rest) + payload_start, 0);
        }

        if code == "DF" {
            if let Some(rel) = rest.find("^XZ") {
                return (payload_start + rel + "^XZ".len(), 0);
            }
            return (generic_end(rest) + payload_start, 0);
        }

        if code == "FX" {
            let end = rest.find('^').unwrap_or(rest.len());
            return (payload_start + end, 0);
        }

        if code == "GF" || code == "DG" {
            if let Some(end) = graphic_field_end(code, rest) {
                return (payload_start + end, 0);
            }
            return (generic_end(rest) + payload_start, 0);
        }

        (generic_end(rest) + payload_start, 0)
    }
}

/// Generic payload rule: run up to the next prefix character, or to EOF.
fn generic_end(rest: &str) -> usize {
    rest.find(['^', '~']).unwrap_or(rest.len())
}

/// Case-insensitive substring search, returning a byte offset.
fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    let haystack_lower = haystack.to_ascii_lowercase();
    let needle_lower = needle.to_ascii_lowercase();
    haystack_lower.find(&needle_lower)
}

/// Computes the byte count of the data payload for `^GF`/`~DG`, honoring the
/// header's declared byte count (doubled for ASCII-hex data).
fn graphic_payload_len(code: &str, rest: &str) -> Option<usize> {
    let fields: Vec<&str> = rest.splitn(5, ',').collect();
    if code == "GF" {
        // a,b,c,d,<data...>
        if fields.len() < 5 {
            return None;
        }
        let format = fields[0].trim();
        let total: usize = fields[1].trim().parse().ok()?;
        let is_ascii = format.eq_ignore_ascii_case("a");
        Some(if is_ascii { total * 2 } else { total })
    } else {
        // ~DG: name,t,w,<data...>
        if fields.len() < 4 {
            return None;
        }
        let total: usize = fields[1].trim().parse().ok()?;
        Some(total * 2)
    }
}

/// Byte offset (relative to `rest`, i.e. relative to payload start) at which
/// the `^GF`/`~DG` payload ends, including the header fields that precede
/// the raw data.
fn graphic_field_end(code: &str, rest: &str) -> Option<usize> {
    let header_fields = if code == "GF" { 4 } else { 3 };
    let mut idx = 0usize;
    let mut seen_commas = 0usize;
    let bytes = rest.as_bytes();
    while idx < bytes.len() && seen_commas < header_fields {
        if bytes[idx] == b',' {
            seen_commas += 1;
        }
        idx += 1;
    }
    if seen_commas < header_fields {
        return None;
    }
    let data_len = graphic_payload_len(code, rest)?;
    Some((idx + data_len).min(rest.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(src: &str) -> Vec<String> {
        Tokenizer::new(src).map(|t| t.code).collect()
    }

    #[test]
    fn tokenizes_basic_sequence() {
        let src = "^XA^FO50,50^A0N,30,20^FDHello^FS^XZ";
        let toks: Vec<_> = Tokenizer::new(src).collect();
        assert_eq!(
            toks.iter().map(|t| t.code.as_str()).collect::<Vec<_>>(),
            vec!["XA", "FO", "A0", "FD", "FS", "XZ"]
        );
        let fd = &toks[3];
        assert_eq!(fd.payload, "Hello");
    }

    #[test]
    fn fd_payload_may_contain_prefix_characters() {
        let src = "^XA^FDprice: ^1.99 ~ off^FS^XZ";
        let toks: Vec<_> = Tokenizer::new(src).collect();
        let fd = toks.iter().find(|t| t.code == "FD").unwrap();
        assert_eq!(fd.payload, "price: ^1.99 ~ off");
    }

    #[test]
    fn fd_is_case_insensitive_on_terminator() {
        let src = "^XA^FDabc^fs^XZ";
        let toks: Vec<_> = Tokenizer::new(src).collect();
        let fd = toks.iter().find(|t| t.code == "FD").unwrap();
        assert_eq!(fd.payload, "abc");
    }

    #[test]
    fn truncated_fd_falls_back_to_generic_rule() {
        let src = "^XA^FDabc^XZ";
        let toks: Vec<_> = Tokenizer::new(src).collect();
        let fd = toks.iter().find(|t| t.code == "FD").unwrap();
        assert_eq!(fd.payload, "abc");
    }

    #[test]
    fn font_select_keeps_id_in_code() {
        assert_eq!(codes("^XA^A0N,30,20^XZ"), vec!["XA", "A0", "XZ"]);
        assert_eq!(codes("^XA^A@N,30,20^XZ"), vec!["XA", "A@", "XZ"]);
        assert_eq!(codes("^XA^ABN,30,20^XZ"), vec!["XA", "AB", "XZ"]);
    }

    #[test]
    fn stray_prefix_is_skipped_silently() {
        let src = "^XA^ ^FS^XZ";
        let toks: Vec<_> = Tokenizer::new(src).collect();
        assert_eq!(
            toks.iter().map(|t| t.code.as_str()).collect::<Vec<_>>(),
            vec!["XA", "FS", "XZ"]
        );
    }

    #[test]
    fn fx_comment_runs_to_next_caret() {
        let src = "^XA^FX this ~ is not a terminator\n^FS^XZ";
        let toks: Vec<_> = Tokenizer::new(src).collect();
        let fx = toks.iter().find(|t| t.code == "FX").unwrap();
        assert_eq!(fx.payload, " this ~ is not a terminator\n");
    }

    #[test]
    fn df_runs_through_terminating_xz_inclusive() {
        let src = "^XA^DFR:FORMAT.ZPL^FO0,0^FS^XZ^FO1,1^FS";
        let toks: Vec<_> = Tokenizer::new(src).collect();
        let df = toks.iter().find(|t| t.code == "DF").unwrap();
        assert!(df.payload.ends_with("^XZ"));
    }

    #[test]
    fn gf_payload_length_doubles_for_ascii_hex() {
        let src = "^XA^GFA,4,4,1,FFFF^FS^XZ";
        let toks: Vec<_> = Tokenizer::new(src).collect();
        let gf = toks.iter().find(|t| t.code == "GF").unwrap();
        assert_eq!(gf.payload, "A,4,4,1,FFFF");
    }

    #[test]
    fn token_coverage_matches_raw_content() {
        let src = "^XA^FO10,10^GB100,50,3^FS^XZ";
        let toks: Vec<_> = Tokenizer::new(src).collect();
        for t in &toks {
            assert!(src[t.source_offset..].starts_with(t.raw_content(src)));
        }
    }
}
