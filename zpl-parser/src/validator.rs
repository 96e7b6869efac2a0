//! Structural validation: re-walks the tokenizer's output to flag problems
//! without ever executing a command. Kept separate from the interpreter so
//! callers can validate untrusted source cheaply.

use crate::token::Tokenizer;

/// One structural problem found in a source document. Never fatal on its
/// own — `validate` always returns, it just tells you what it saw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// A `^XZ` appeared with no matching open `^XA`.
    UnmatchedLabelEnd { offset: usize },
    /// The source ended with a `^XA` never closed by `^XZ`.
    UnclosedLabelStart { offset: usize },
    /// No `^XA`/`^XZ` pair was found anywhere in the source.
    NoLabelFound,
    /// A token's code isn't in the supported command set.
    UnknownCommand { code: String, offset: usize },
}

const KNOWN_CODES: &[&str] = &[
    "XA", "XZ", "FS", "FO", "FT", "LH", "LS", "LT", "FW", "PW", "LL", "PO", "PQ", "MD", "PR",
    "MM", "FB", "FR", "FH", "FN", "FD", "SN", "FV", "CF", "CI", "GB", "GC", "GD", "GE", "GF",
    "DG", "XG", "IM", "BY", "BC", "B3", "BE", "BA", "BU", "BQ", "BX", "B7", "B0", "BD", "B2",
    "BK", "FX",
];

/// Walks `source` token by token and reports every structural issue found.
/// Font-select codes (`A0`, `A@`, `AB`, ...) are accepted for any second
/// character, matching the tokenizer's own leniency there.
pub fn validate(source: &str) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let mut open_label: Option<usize> = None;
    let mut saw_any_label = false;

    for tok in Tokenizer::new(source) {
        match tok.code.as_str() {
            "XA" => {
                saw_any_label = true;
                open_label = Some(tok.source_offset);
            }
            "XZ" => {
                saw_any_label = true;
                if open_label.take().is_none() {
                    issues.push(ValidationIssue::UnmatchedLabelEnd { offset: tok.source_offset });
                }
            }
            code if is_known(code) => {}
            code => issues.push(ValidationIssue::UnknownCommand {
                code: code.to_string(),
                offset: tok.source_offset,
            }),
        }
    }

    if let Some(offset) = open_label {
        issues.push(ValidationIssue::UnclosedLabelStart { offset });
    }
    if !saw_any_label {
        issues.push(ValidationIssue::NoLabelFound);
    }

    issues
}

fn is_known(code: &str) -> bool {
    if code.len() == 2 && code.starts_with('A') {
        return true; // font-select family, any second character
    }
    KNOWN_CODES.contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_label_has_no_issues() {
        let issues = validate("^XA^FO10,10^FDhi^FS^XZ");
        assert!(issues.is_empty());
    }

    #[test]
    fn flags_unmatched_label_end() {
        let issues = validate("^XZ");
        assert!(issues.contains(&ValidationIssue::UnmatchedLabelEnd { offset: 0 }));
    }

    #[test]
    fn flags_unclosed_label_start() {
        let issues = validate("^XA^FO10,10^FDhi^FS");
        assert!(matches!(issues[0], ValidationIssue::UnclosedLabelStart { .. }));
    }

    #[test]
    fn flags_unknown_command() {
        let issues = validate("^XA^ZZtest^FS^XZ");
        assert!(issues.iter().any(|i| matches!(i, ValidationIssue::UnknownCommand { code, .. } if code == "ZZ")));
    }

    #[test]
    fn flags_no_label_found() {
        let issues = validate("^FO10,10^FDhi^FS");
        assert!(issues.contains(&ValidationIssue::NoLabelFound));
    }

    #[test]
    fn accepts_any_font_select_second_character() {
        let issues = validate("^XA^A@N,30,20^FS^XZ");
        assert!(issues.is_empty());
    }
}
