use thiserror::Error;

/// The facade's error type: every layer's own error, plus I/O failures from
/// `render_to_file` writing bytes to a path.
#[derive(Debug, Error)]
pub enum ZplError {
    #[error(transparent)]
    Parse(#[from] zpl_parser::ParseError),
    #[error(transparent)]
    Interpret(#[from] zpl_interpreter::InterpretError),
    #[error(transparent)]
    Render(#[from] zpl_renderer::RenderError),
    #[error("could not write rendered label to {path}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}
