//! Text drawer: layout, wrapping, alignment, and reverse-print fill.

use fontdue::Font;
use tiny_skia::{Color, IntSize, Pixmap, PixmapPaint, Rect, Transform};
use zpl_interpreter::{FieldBlock, OriginMode};
use zpl_parser::{Orientation, TextBlockJustification};

use crate::{fonts, transform::element_transform};

struct Line {
    text: String,
    width: f32,
}

/// Picks a rasterization pixel size so the glyph cell (ascent + |descent|)
/// matches `height_dots`.
pub(crate) fn pixel_size_for(font: &Font, height_dots: f32) -> f32 {
    let metrics = font.horizontal_line_metrics(height_dots);
    let Some(metrics) = metrics else { return height_dots };
    let cell = metrics.ascent - metrics.descent;
    if cell <= 0.0 { height_dots } else { height_dots * (height_dots / cell) }
}

fn measure(font: &Font, text: &str, px: f32, scale_x: f32) -> f32 {
    text.chars().map(|c| font.metrics(c, px).advance_width * scale_x).sum()
}

/// Explicit breaks on `\n` and the literal two-character ZPL sequence `\&`,
/// then (when a field block is present) greedy word wrap to `block.width`,
/// truncated to `block.max_lines`.
fn layout_lines(font: &Font, text: &str, px: f32, scale_x: f32, field_block: Option<&FieldBlock>) -> Vec<Line> {
    let mut explicit_lines = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\n' {
            explicit_lines.push(std::mem::take(&mut current));
        } else if c == '\\' && chars.peek() == Some(&'&') {
            chars.next();
            explicit_lines.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    explicit_lines.push(current);

    let Some(block) = field_block else {
        return explicit_lines
            .into_iter()
            .map(|text| { let width = measure(font, &text, px, scale_x); Line { text, width } })
            .collect();
    };

    let mut wrapped = Vec::new();
    for explicit in explicit_lines {
        let mut line = String::new();
        let mut line_width = 0.0f32;
        for word in explicit.split(' ') {
            let candidate = if line.is_empty() { word.to_string() } else { format!("{line} {word}") };
            let candidate_width = measure(font, &candidate, px, scale_x);
            if !line.is_empty() && candidate_width > block.width as f32 {
                wrapped.push(Line { text: line, width: line_width });
                line = word.to_string();
                line_width = measure(font, word, px, scale_x);
            } else {
                line = candidate;
                line_width = candidate_width;
            }
        }
        wrapped.push(Line { text: line, width: line_width });
    }
    wrapped.truncate(block.max_lines.max(1));
    wrapped
}

fn line_x_offset(block_width: f32, line_width: f32, justification: TextBlockJustification) -> f32 {
    match justification {
        TextBlockJustification::Left | TextBlockJustification::Justified => 0.0,
        TextBlockJustification::Center => (block_width - line_width) / 2.0,
        TextBlockJustification::Right => block_width - line_width,
    }
}

#[allow(clippy::too_many_arguments)]
pub fn draw_text(
    target: &mut Pixmap,
    anchor: (f32, f32),
    origin_mode: OriginMode,
    orientation: Orientation,
    text: &str,
    font_id: char,
    font_height_dots: usize,
    font_width_dots: usize,
    reverse: bool,
    field_block: Option<&FieldBlock>,
) {
    if text.is_empty() {
        return;
    }
    let profile = fonts::profile_for(font_id);
    let Some(font) = fonts::resolve(profile.bold, profile.mono) else { return };

    let height_dots = font_height_dots.max(1) as f32;
    let px = pixel_size_for(&font, height_dots);
    let scale_x = profile.aspect_ratio
        * if font_width_dots == 0 { 1.0 } else { font_width_dots as f32 / height_dots };

    let metrics = font.horizontal_line_metrics(px).unwrap_or(fontdue::LineMetrics {
        ascent: height_dots,
        descent: 0.0,
        line_gap: 0.0,
        new_line_size: height_dots,
    });
    let ascent = metrics.ascent;
    let line_spacing = field_block.map(|b| b.line_spacing).unwrap_or(0);
    let line_height = (height_dots + line_spacing as f32).max(1.0);

    let lines = layout_lines(&font, text, px, scale_x, field_block);
    if lines.is_empty() {
        return;
    }

    let block_width = field_block.map(|b| b.width as f32).unwrap_or_else(|| {
        lines.iter().map(|l| l.width).fold(0.0, f32::max)
    });
    let justification = field_block.map(|b| b.justification).unwrap_or(TextBlockJustification::Left);
    let total_height = line_height * lines.len() as f32;

    let top = match origin_mode {
        OriginMode::TopLeft => 0.0,
        OriginMode::Baseline => -ascent,
    };

    let width = block_width.max(1.0).ceil() as u32;
    let height = total_height.max(1.0).ceil() as u32;
    let Some(size) = IntSize::from_wh(width, height) else { return };
    let Some(mut local) = Pixmap::new(size.width(), size.height()) else { return };

    for (i, line) in lines.iter().enumerate() {
        let line_top = top + line_height * i as f32;
        let offset_x = line_x_offset(block_width, line.width, justification).max(0.0);

        if reverse {
            if let Some(rect) = Rect::from_xywh(0.0, line_top.max(0.0), block_width.max(1.0), line_height) {
                let mut paint = tiny_skia::Paint::default();
                paint.set_color(Color::BLACK);
                let mut pb = tiny_skia::PathBuilder::new();
                pb.push_rect(rect);
                if let Some(path) = pb.finish() {
                    local.fill_path(&path, &paint, tiny_skia::FillRule::Winding, Transform::identity(), None);
                }
            }
        }

        draw_line(&mut local, &font, &line.text, px, scale_x, offset_x, line_top + ascent, reverse);
    }

    let transform = element_transform(anchor, orientation, width as f32, height as f32);
    target.draw_pixmap(0, 0, local.as_ref(), &PixmapPaint::default(), transform, None);
}

pub(crate) fn draw_line(target: &mut Pixmap, font: &Font, text: &str, px: f32, scale_x: f32, start_x: f32, baseline_y: f32, reverse: bool) {
    let mut cursor = start_x;
    for ch in text.chars() {
        let (metrics, bitmap) = font.rasterize(ch, px);
        if metrics.width > 0 && metrics.height > 0 {
            let Some(size) = IntSize::from_wh(metrics.width as u32, metrics.height as u32) else {
                cursor += metrics.advance_width * scale_x;
                continue;
            };
            let mut buf = Vec::with_capacity(bitmap.len() * 4);
            let (r, g, b) = if reverse { (255, 255, 255) } else { (0, 0, 0) };
            for &alpha in &bitmap {
                buf.push(r);
                buf.push(g);
                buf.push(b);
                buf.push(alpha);
            }
            if let Some(glyph_pixmap) = Pixmap::from_vec(buf, size) {
                let gx = cursor + metrics.xmin as f32 * scale_x;
                let gy = baseline_y - metrics.height as f32 - metrics.ymin as f32;
                let transform = Transform::from_translate(gx, gy).pre_concat(Transform::from_scale(scale_x, 1.0));
                target.draw_pixmap(0, 0, glyph_pixmap.as_ref(), &PixmapPaint::default(), transform, None);
            }
        }
        cursor += metrics.advance_width * scale_x;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_wraps_to_field_block_width() {
        let font = fonts::resolve(false, false);
        let Some(font) = font else { return };
        let block = FieldBlock { width: 40, max_lines: 10, line_spacing: 0, justification: TextBlockJustification::Left, hanging_indent: 0 };
        let lines = layout_lines(&font, "a a a a a a a a a a", 20.0, 1.0, Some(&block));
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.width <= 40.0 + 5.0);
        }
    }

    #[test]
    fn explicit_break_always_starts_a_new_line() {
        let font = fonts::resolve(false, false);
        let Some(font) = font else { return };
        let lines = layout_lines(&font, "first\nsecond", 20.0, 1.0, None);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "first");
        assert_eq!(lines[1].text, "second");
    }

    #[test]
    fn max_lines_truncates_wrapped_output() {
        let font = fonts::resolve(false, false);
        let Some(font) = font else { return };
        let block = FieldBlock { width: 10, max_lines: 1, line_spacing: 0, justification: TextBlockJustification::Left, hanging_indent: 0 };
        let lines = layout_lines(&font, "a a a a a a a a a a", 20.0, 1.0, Some(&block));
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn center_alignment_offsets_by_half_the_slack() {
        let offset = line_x_offset(100.0, 40.0, TextBlockJustification::Center);
        assert_eq!(offset, 30.0);
    }

    #[test]
    fn justified_falls_back_to_left() {
        let offset = line_x_offset(100.0, 40.0, TextBlockJustification::Justified);
        assert_eq!(offset, 0.0);
    }

    #[test]
    fn draw_text_on_empty_string_is_a_no_op() {
        let mut pixmap = Pixmap::new(50, 50).unwrap();
        draw_text(&mut pixmap, (0.0, 0.0), OriginMode::TopLeft, Orientation::Normal, "", '0', 20, 0, false, None);
        assert_eq!(pixmap.pixel(0, 0).unwrap().alpha(), 0);
    }
}
