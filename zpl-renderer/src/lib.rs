//! Rasterizes a [`Label`]'s element list onto a bitmap. The only failure
//! this crate can't paper over with a placeholder is a canvas with a
//! non-positive dimension.

mod barcode;
mod canvas;
mod error;
mod fonts;
mod image;
mod shapes;
mod text;
mod transform;

pub use canvas::{BackgroundColor, CanvasConfig};
pub use error::RenderError;

use tiny_skia::{Pixmap, Transform};
use zpl_interpreter::{Element, Label};
use zpl_parser::Orientation;

use crate::transform::{element_transform, page_inversion_transform};

/// Draws every element of `label` onto a bitmap sized by `config` and
/// returns it PNG-encoded. Elements that fail to resolve (no usable
/// barcode format, a font that can't be found) degrade to a placeholder or
/// are simply skipped — only a non-positive canvas is fatal.
pub fn render(label: &Label, config: &CanvasConfig) -> Result<Vec<u8>, RenderError> {
    let pixmap = render_pixmap(label, config)?;
    pixmap.encode_png().map_err(|_| RenderError::EncodeFailed)
}

/// As [`render`], but returns the raw RGBA bitmap before PNG encoding —
/// useful for callers (and tests) that want to inspect pixels directly
/// rather than round-trip through an image codec.
pub fn render_pixmap(label: &Label, config: &CanvasConfig) -> Result<Pixmap, RenderError> {
    if config.width_dots == 0 || config.height_dots == 0 {
        return Err(RenderError::InvalidDimensions { width: config.width_dots, height: config.height_dots });
    }

    let mut pixmap = Pixmap::new(config.width_dots as u32, config.height_dots as u32)
        .ok_or(RenderError::InvalidDimensions { width: config.width_dots, height: config.height_dots })?;
    pixmap.fill(config.background.to_skia());

    let page_transform = if label.print_orientation_inverted {
        page_inversion_transform(config.width_dots as f32, config.height_dots as f32)
    } else {
        Transform::identity()
    };

    for element in &label.elements {
        draw_element(&mut pixmap, element, page_transform);
    }

    Ok(pixmap)
}

fn draw_element(pixmap: &mut Pixmap, element: &Element, page_transform: Transform) {
    match element {
        Element::Text { x, y, origin_mode, text, font_id, font_height_dots, font_width_dots, orientation, reverse, field_block } => {
            let mut scratch = match Pixmap::new(pixmap.width(), pixmap.height()) {
                Some(p) => p,
                None => return,
            };
            text::draw_text(
                &mut scratch,
                (*x as f32, *y as f32),
                *origin_mode,
                *orientation,
                text,
                *font_id,
                *font_height_dots,
                *font_width_dots,
                *reverse,
                field_block.as_ref(),
            );
            blit(pixmap, &scratch, page_transform);
        }
        Element::Box { x, y, width, height, border, color, corner_rounding, .. } => {
            let transform = page_transform.pre_concat(element_transform((*x as f32, *y as f32), Orientation::Normal, *width as f32, *height as f32));
            shapes::draw_box(pixmap, transform, *width as f32, *height as f32, *border as f32, *color, *corner_rounding);
        }
        Element::Ellipse { x, y, width, height, border, color, shape_override, .. } => {
            let fill = matches!(shape_override, zpl_parser::EllipseShape::Fill);
            let transform = page_transform.pre_concat(element_transform((*x as f32, *y as f32), Orientation::Normal, *width as f32, *height as f32));
            shapes::draw_ellipse(pixmap, transform, *width as f32, *height as f32, *border as f32, *color, fill);
        }
        Element::Image { x, y, orientation, bitmap, scale_x, scale_y, .. } => {
            let transform = page_transform.pre_concat(element_transform((*x as f32, *y as f32), *orientation, bitmap.width as f32 * scale_x, bitmap.height as f32 * scale_y));
            image::draw_image(pixmap, transform, bitmap, *scale_x, *scale_y);
        }
        Element::Barcode { x, y, origin_mode, kind, content, module_width, bar_height, orientation, interpretation_line, .. } => {
            let mut scratch = match Pixmap::new(pixmap.width(), pixmap.height()) {
                Some(p) => p,
                None => return,
            };
            barcode::draw_barcode(
                &mut scratch,
                (*x as f32, *y as f32),
                *origin_mode,
                *orientation,
                kind,
                content,
                *module_width,
                *bar_height,
                *interpretation_line,
            );
            blit(pixmap, &scratch, page_transform);
        }
    }
}

/// Text and barcode drawers build their own local transform (their bounding
/// box isn't known before layout), so they draw onto a full-size scratch
/// pixmap first; this composes the page-level inversion on top afterward.
fn blit(target: &mut Pixmap, scratch: &Pixmap, page_transform: Transform) {
    target.draw_pixmap(0, 0, scratch.as_ref(), &tiny_skia::PixmapPaint::default(), page_transform, None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use zpl_interpreter::OriginMode;
    use zpl_parser::Color;

    #[test]
    fn empty_label_renders_a_plain_background() {
        let label = Label { width_dots: 50, height_dots: 50, print_orientation_inverted: false, elements: vec![] };
        let config = CanvasConfig::new(50, 50, 203);
        let png = render(&label, &config).unwrap();
        assert!(!png.is_empty());
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let label = Label::default();
        let config = CanvasConfig::new(0, 50, 203);
        assert!(matches!(render(&label, &config), Err(RenderError::InvalidDimensions { .. })));
    }

    #[test]
    fn box_element_renders_without_panicking() {
        let label = Label {
            width_dots: 100,
            height_dots: 100,
            print_orientation_inverted: false,
            elements: vec![Element::Box {
                x: 5,
                y: 5,
                origin_mode: OriginMode::TopLeft,
                width: 40,
                height: 20,
                border: 3,
                color: Color::Black,
                corner_rounding: 0,
            }],
        };
        let config = CanvasConfig::new(100, 100, 203);
        assert!(render(&label, &config).is_ok());
    }

    #[test]
    fn inverted_print_orientation_renders_without_panicking() {
        let label = Label {
            width_dots: 60,
            height_dots: 60,
            print_orientation_inverted: true,
            elements: vec![Element::Text {
                x: 5,
                y: 5,
                origin_mode: OriginMode::TopLeft,
                text: "hi".to_string(),
                font_id: '0',
                font_height_dots: 12,
                font_width_dots: 0,
                orientation: Orientation::Normal,
                reverse: false,
                field_block: None,
            }],
        };
        let config = CanvasConfig::new(60, 60, 203);
        assert!(render(&label, &config).is_ok());
    }
}
