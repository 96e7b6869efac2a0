use thiserror::Error;

/// Errors from the tokenizer/registry layer.
///
/// Almost nothing down here is fatal: malformed payloads fall back to
/// defaults, unknown codes are just skipped. `ParseError` exists for the
/// one case that really can't proceed: a source with no `^XA` label frame
/// at all, so there is nothing to tokenize commands *within*.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("source contains no ^XA label start")]
    MissingLabelStart,
    #[error("empty source")]
    EmptySource,
}
