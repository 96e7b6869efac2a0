use thiserror::Error;

/// Errors from the rasterizer. These are rare: almost every drawer failure
/// degrades to a placeholder instead of an error. The one case that really
/// can't proceed is a non-positive canvas size — there is no bitmap to draw
/// into.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("canvas dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("failed to encode the rendered bitmap to PNG")]
    EncodeFailed,
}
