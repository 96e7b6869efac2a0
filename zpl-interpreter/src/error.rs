use thiserror::Error;

/// Errors from the execution-state layer.
///
/// Almost nothing here is fatal: a missing image in the graphics cache is a
/// no-op, a malformed barcode descriptor is simply dropped. `InterpretError`
/// exists only for the one fatal input case this layer is responsible for:
/// an empty source producing no label frame at all.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InterpretError {
    #[error("source produced no label (^XA ... ^XZ) to interpret")]
    EmptyLabel,
}
