//! Barcode drawer — maps a [`BarcodeKind`] onto the symbol backend
//! (`rxing`'s `MultiFormatWriter`) and blits the resulting module grid,
//! scaled by nearest-neighbor so module edges stay crisp.

use rxing::{BarcodeFormat, EncodeHintValue, EncodeHints, MultiFormatWriter, Writer};
use tiny_skia::{FillRule, IntSize, Paint, PathBuilder, Pixmap, PixmapPaint, Rect, Stroke, Transform};
use zpl_interpreter::OriginMode;
use zpl_parser::{BarcodeKind, ErrorCorrection, InterpretationLine, Orientation};

use crate::{fonts, text::{draw_line, pixel_size_for}, transform::element_transform};

fn is_two_dimensional(kind: &BarcodeKind) -> bool {
    matches!(kind, BarcodeKind::Qr { .. } | BarcodeKind::DataMatrix | BarcodeKind::Pdf417 { .. } | BarcodeKind::Aztec { .. } | BarcodeKind::MaxiCode { .. })
}

fn format_for(kind: &BarcodeKind) -> Option<BarcodeFormat> {
    Some(match kind {
        BarcodeKind::Code128 { .. } => BarcodeFormat::CODE_128,
        BarcodeKind::Code39 { .. } => BarcodeFormat::CODE_39,
        BarcodeKind::Ean13 => BarcodeFormat::EAN_13,
        BarcodeKind::Code93 => BarcodeFormat::CODE_93,
        BarcodeKind::UpcA => BarcodeFormat::UPC_A,
        BarcodeKind::Qr { .. } => BarcodeFormat::QR_CODE,
        BarcodeKind::DataMatrix => BarcodeFormat::DATA_MATRIX,
        BarcodeKind::Pdf417 { .. } => BarcodeFormat::PDF_417,
        BarcodeKind::Aztec { .. } => BarcodeFormat::AZTEC,
        // rxing ships no MaxiCode encoder; falls through to the placeholder drawer.
        BarcodeKind::MaxiCode { .. } => return None,
        BarcodeKind::Itf => BarcodeFormat::ITF,
        BarcodeKind::Codabar => BarcodeFormat::CODABAR,
    })
}

fn ecc_label(ecc: ErrorCorrection) -> &'static str {
    match ecc {
        ErrorCorrection::L => "L",
        ErrorCorrection::M => "M",
        ErrorCorrection::Q => "Q",
        ErrorCorrection::H => "H",
    }
}

/// Strips Code 128 subset-switch escapes (`>:`, `>9`, `>5`, ...) the way real
/// ZPL content embeds them — a `>` followed by one control character.
fn strip_code128_escapes(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '>' && chars.peek().is_some() {
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}

fn draw_placeholder(target: &mut Pixmap, anchor: (f32, f32), orientation: Orientation, content: &str, module_width: u8, bar_height: usize) {
    let width = (content.len().max(4) as f32 * module_width as f32 * 6.0).max(40.0);
    let height = bar_height.max(20) as f32;
    let Some(size) = IntSize::from_wh(width.ceil() as u32, height.ceil() as u32) else { return };
    let Some(mut local) = Pixmap::new(size.width(), size.height()) else { return };

    let mut paint = Paint::default();
    paint.set_color_rgba8(0, 0, 0, 255);
    if let Some(rect) = Rect::from_xywh(0.5, 0.5, width - 1.0, height - 1.0) {
        let mut pb = PathBuilder::new();
        pb.push_rect(rect);
        if let Some(path) = pb.finish() {
            let mut stroke = Stroke::default();
            stroke.width = 1.0;
            local.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    let truncated: String = content.chars().take(((width / 7.0) as usize).max(1)).collect();
    if let Some(font) = fonts::resolve(false, true) {
        let px = pixel_size_for(&font, (height - 4.0).max(6.0));
        draw_line(&mut local, &font, &truncated, px, 1.0, 2.0, height - 3.0, false);
    }

    let transform = element_transform(anchor, orientation, width, height);
    target.draw_pixmap(0, 0, local.as_ref(), &PixmapPaint::default(), transform, None);
}

#[allow(clippy::too_many_arguments)]
pub fn draw_barcode(
    target: &mut Pixmap,
    anchor: (f32, f32),
    origin_mode: OriginMode,
    orientation: Orientation,
    kind: &BarcodeKind,
    content: &str,
    module_width: u8,
    bar_height: usize,
    interpretation_line: InterpretationLine,
) {
    let Some(format) = format_for(kind) else {
        draw_placeholder(target, anchor, orientation, content, module_width, bar_height);
        return;
    };
    let stripped = if matches!(kind, BarcodeKind::Code128 { .. }) { strip_code128_escapes(content) } else { content.to_string() };

    let writer = MultiFormatWriter;
    let encoded = if let BarcodeKind::Qr { error_correction, .. } = kind {
        let hints = EncodeHints::default().with(EncodeHintValue::ErrorCorrection(ecc_label(*error_correction).into()));
        writer.encode_with_hints(&stripped, &format, 0, 0, &hints)
    } else {
        writer.encode(&stripped, &format, 0, 0)
    };
    let Ok(matrix) = encoded else {
        draw_placeholder(target, anchor, orientation, content, module_width, bar_height);
        return;
    };

    let modules_w = matrix.getWidth() as usize;
    let modules_h = matrix.getHeight() as usize;
    if modules_w == 0 || modules_h == 0 {
        draw_placeholder(target, anchor, orientation, content, module_width, bar_height);
        return;
    }

    let two_dim = is_two_dimensional(kind);
    let out_w = modules_w * module_width.max(1) as usize;
    let out_h = if two_dim { modules_h * module_width.max(1) as usize } else { bar_height.max(1) };

    let label_height = if matches!(interpretation_line, InterpretationLine::Off) || two_dim {
        0.0
    } else if let Some(font) = fonts::resolve(false, true) {
        pixel_size_for(&font, 14.0).max(10.0)
    } else {
        0.0
    };

    let symbol_top = if matches!(interpretation_line, InterpretationLine::Above) { label_height } else { 0.0 };
    let total_height = out_h as f32 + label_height;

    let Some(size) = IntSize::from_wh(out_w as u32, total_height.ceil().max(1.0) as u32) else { return };
    let Some(mut local) = Pixmap::new(size.width(), size.height()) else { return };

    for gy in 0..modules_h {
        let src_y0 = if two_dim { gy * module_width.max(1) as usize } else { 0 };
        let rows = if two_dim { module_width.max(1) as usize } else { out_h };
        for gx in 0..modules_w {
            if !matrix.get(gx as u32, gy as u32) {
                continue;
            }
            let x0 = gx * module_width.max(1) as usize;
            if let Some(rect) = Rect::from_xywh(
                x0 as f32,
                symbol_top + src_y0 as f32,
                module_width.max(1) as f32,
                rows as f32,
            ) {
                let mut paint = Paint::default();
                paint.set_color_rgba8(0, 0, 0, 255);
                let mut pb = PathBuilder::new();
                pb.push_rect(rect);
                if let Some(path) = pb.finish() {
                    local.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
                }
            }
        }
    }

    if label_height > 0.0 {
        if let Some(font) = fonts::resolve(false, true) {
            let px = pixel_size_for(&font, label_height - 2.0);
            let baseline_y = if matches!(interpretation_line, InterpretationLine::Above) { label_height - 2.0 } else { total_height - 2.0 };
            draw_line(&mut local, &font, content, px, 1.0, 0.0, baseline_y, false);
        }
    }

    let anchor_y_shift = if matches!(origin_mode, OriginMode::Baseline) { total_height } else { 0.0 };
    let adjusted_anchor = (anchor.0, anchor.1 - anchor_y_shift);

    let transform = element_transform(adjusted_anchor, orientation, out_w as f32, total_height);
    target.draw_pixmap(0, 0, local.as_ref(), &PixmapPaint::default(), transform, None);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code128_escapes_are_stripped() {
        assert_eq!(strip_code128_escapes(">:HELLO"), "HELLO");
        assert_eq!(strip_code128_escapes("A>9B"), "AB");
        assert_eq!(strip_code128_escapes("PLAIN"), "PLAIN");
    }

    #[test]
    fn maxicode_has_no_format_mapping() {
        assert!(format_for(&BarcodeKind::MaxiCode { mode: 2 }).is_none());
    }

    #[test]
    fn code128_is_one_dimensional() {
        assert!(!is_two_dimensional(&BarcodeKind::Code128 { mode: zpl_parser::Code128Mode::Normal }));
    }

    #[test]
    fn qr_is_two_dimensional() {
        assert!(is_two_dimensional(&BarcodeKind::Qr { model: 2, magnification: 1, error_correction: ErrorCorrection::M }));
    }

    #[test]
    fn unencodable_content_draws_a_placeholder_without_panicking() {
        let mut pixmap = Pixmap::new(200, 100).unwrap();
        draw_barcode(
            &mut pixmap,
            (10.0, 10.0),
            OriginMode::TopLeft,
            Orientation::Normal,
            &BarcodeKind::MaxiCode { mode: 2 },
            "content",
            2,
            10,
            InterpretationLine::Off,
        );
    }
}
