//! Public facade over the three-stage pipeline: tokenize + parse, interpret,
//! rasterize.

mod error;

pub use error::ZplError;
pub use zpl_interpreter::{Element, Label};
pub use zpl_parser::{validate, ValidationIssue};
pub use zpl_renderer::{BackgroundColor, CanvasConfig};

use std::path::Path;

/// Parses and interprets `source` into a [`Label`]. A source may contain
/// multiple `^XA ... ^XZ` frames; this conceptually single-label API
/// returns the first one.
pub fn parse(source: &str) -> Result<Label, ZplError> {
    let commands = zpl_parser::parse_zpl(source)?;
    let mut labels = zpl_interpreter::interpret(&commands)?;
    Ok(labels.remove(0))
}

/// Renders `source` onto a `width_dots × height_dots` canvas.
///
/// A null or empty source (or one with no `^XA` frame at all) is not an
/// error: it renders an empty bitmap filled with the background color.
/// Non-positive canvas dimensions are the one genuinely fatal case, since
/// there is no bitmap to draw into.
pub fn render(source: &str, width_dots: usize, height_dots: usize, dpi: u32) -> Result<Vec<u8>, ZplError> {
    render_with_background(source, width_dots, height_dots, dpi, BackgroundColor::White)
}

pub fn render_with_background(
    source: &str,
    width_dots: usize,
    height_dots: usize,
    dpi: u32,
    background: BackgroundColor,
) -> Result<Vec<u8>, ZplError> {
    let mut config = CanvasConfig::new(width_dots, height_dots, dpi);
    config.background = background;

    let label = match parse(source) {
        Ok(label) => label,
        Err(ZplError::Parse(zpl_parser::ParseError::EmptySource | zpl_parser::ParseError::MissingLabelStart)) => {
            Label { width_dots, height_dots, print_orientation_inverted: false, elements: Vec::new() }
        }
        Err(other) => return Err(other),
    };

    Ok(zpl_renderer::render(&label, &config)?)
}

/// `render`, taking physical dimensions instead of dots: `dots = mm · dpi / 25.4`.
pub fn render_mm(source: &str, width_mm: f32, height_mm: f32, dpi: u32) -> Result<Vec<u8>, ZplError> {
    let width_dots = (width_mm * dpi as f32 / 25.4).round().max(0.0) as usize;
    let height_dots = (height_mm * dpi as f32 / 25.4).round().max(0.0) as usize;
    render(source, width_dots, height_dots, dpi)
}

/// `render`, taking inches instead of dots: `dots = inches · dpi`.
pub fn render_inches(source: &str, width_inches: f32, height_inches: f32, dpi: u32) -> Result<Vec<u8>, ZplError> {
    let width_dots = (width_inches * dpi as f32).round().max(0.0) as usize;
    let height_dots = (height_inches * dpi as f32).round().max(0.0) as usize;
    render(source, width_dots, height_dots, dpi)
}

/// Renders `source` and writes the PNG bytes to `path`.
pub fn render_to_file(
    source: &str,
    path: impl AsRef<Path>,
    width_dots: usize,
    height_dots: usize,
    dpi: u32,
) -> Result<(), ZplError> {
    let bytes = render(source, width_dots, height_dots, dpi)?;
    let path = path.as_ref();
    std::fs::write(path, bytes).map_err(|source| ZplError::Io { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_minimal_label() {
        let png = render("^XA^FO10,10^FDHello^FS^XZ", 100, 100, 203).unwrap();
        assert!(!png.is_empty());
    }

    #[test]
    fn empty_source_renders_a_blank_canvas_instead_of_erroring() {
        let png = render("", 50, 50, 203).unwrap();
        assert!(!png.is_empty());
    }

    #[test]
    fn source_with_no_label_start_renders_a_blank_canvas() {
        let png = render("^FO10,10^FDorphaned^FS", 50, 50, 203).unwrap();
        assert!(!png.is_empty());
    }

    #[test]
    fn zero_dimensions_are_fatal() {
        let err = render("^XA^FS^XZ", 0, 50, 203);
        assert!(matches!(err, Err(ZplError::Render(zpl_renderer::RenderError::InvalidDimensions { .. }))));
    }

    #[test]
    fn mm_conversion_matches_dots_formula() {
        let png = render_mm("^XA^XZ", 25.4, 25.4, 203).unwrap();
        assert!(!png.is_empty());
    }

    #[test]
    fn parse_returns_the_first_label_when_multiple_frames_exist() {
        let label = parse("^XA^FO0,0^FDfirst^FS^XZ^XA^FO0,0^FDsecond^FS^XZ").unwrap();
        assert_eq!(label.elements.len(), 1);
        match &label.elements[0] {
            Element::Text { text, .. } => assert_eq!(text, "first"),
            _ => panic!("expected a text element"),
        }
    }

    #[test]
    fn validate_reports_an_unknown_command() {
        let issues = validate("^XA^ZZ^XZ");
        assert!(!issues.is_empty());
    }
}
