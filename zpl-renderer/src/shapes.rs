//! Box and ellipse drawers.

use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};
use zpl_parser::Color;

fn paint_for(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    match color {
        Color::Black => paint.set_color_rgba8(0, 0, 0, 255),
        Color::White => paint.set_color_rgba8(255, 255, 255, 255),
    }
    paint
}

/// Draws a `^GB`/`^GD` box into local space `(0,0)..(width,height)`, under
/// `transform`. ZPL draws lines as degenerate boxes: when either dimension
/// doesn't clear the border thickness there's no room for an outline, so the
/// whole rectangle is filled instead.
pub fn draw_box(
    target: &mut Pixmap,
    transform: Transform,
    width: f32,
    height: f32,
    border: f32,
    color: Color,
    corner_rounding: u8,
) {
    let paint = paint_for(color);
    let radius = (corner_rounding as f32 / 8.0) * width.min(height) / 2.0;

    if width <= border || height <= border {
        fill_rect(target, transform, 0.0, 0.0, width, height, radius, &paint);
        return;
    }

    let inset = border / 2.0;
    let Some(rect) = Rect::from_xywh(inset, inset, (width - border).max(0.1), (height - border).max(0.1)) else {
        return;
    };
    let mut pb = PathBuilder::new();
    push_rounded_rect(&mut pb, rect, radius);
    let Some(path) = pb.finish() else { return };

    let mut stroke = Stroke::default();
    stroke.width = border;
    target.stroke_path(&path, &paint, &stroke, transform, None);
}

/// Draws a `^GE`/`^GC` ellipse (circle when `width == height`).
pub fn draw_ellipse(
    target: &mut Pixmap,
    transform: Transform,
    width: f32,
    height: f32,
    border: f32,
    color: Color,
    fill: bool,
) {
    let paint = paint_for(color);
    let fill = fill || border >= width.min(height) / 2.0;

    if fill {
        let Some(path) = oval_path(0.0, 0.0, width, height) else { return };
        target.fill_path(&path, &paint, FillRule::Winding, transform, None);
        return;
    }

    let inset = border / 2.0;
    let Some(path) = oval_path(inset, inset, (width - border).max(0.1), (height - border).max(0.1)) else { return };
    let mut stroke = Stroke::default();
    stroke.width = border;
    target.stroke_path(&path, &paint, &stroke, transform, None);
}

fn fill_rect(target: &mut Pixmap, transform: Transform, x: f32, y: f32, w: f32, h: f32, radius: f32, paint: &Paint) {
    let Some(rect) = Rect::from_xywh(x, y, w.max(0.1), h.max(0.1)) else { return };
    let mut pb = PathBuilder::new();
    push_rounded_rect(&mut pb, rect, radius);
    if let Some(path) = pb.finish() {
        target.fill_path(&path, paint, FillRule::Winding, transform, None);
    }
}

fn push_rounded_rect(pb: &mut PathBuilder, rect: Rect, radius: f32) {
    if radius <= 0.0 {
        pb.push_rect(rect);
        return;
    }
    let r = radius.min(rect.width() / 2.0).min(rect.height() / 2.0);
    let (x0, y0, x1, y1) = (rect.left(), rect.top(), rect.right(), rect.bottom());
    pb.move_to(x0 + r, y0);
    pb.line_to(x1 - r, y0);
    pb.quad_to(x1, y0, x1, y0 + r);
    pb.line_to(x1, y1 - r);
    pb.quad_to(x1, y1, x1 - r, y1);
    pb.line_to(x0 + r, y1);
    pb.quad_to(x0, y1, x0, y1 - r);
    pb.line_to(x0, y0 + r);
    pb.quad_to(x0, y0, x0 + r, y0);
    pb.close();
}

fn oval_path(x: f32, y: f32, w: f32, h: f32) -> Option<tiny_skia::Path> {
    let rect = Rect::from_xywh(x, y, w.max(0.1), h.max(0.1))?;
    let (cx, cy) = (rect.left() + rect.width() / 2.0, rect.top() + rect.height() / 2.0);
    let (rx, ry) = (rect.width() / 2.0, rect.height() / 2.0);
    // Four-arc cubic-Bezier approximation, k = 4/3 * (sqrt(2) - 1).
    const K: f32 = 0.5522847498;
    let mut pb = PathBuilder::new();
    pb.move_to(cx + rx, cy);
    pb.cubic_to(cx + rx, cy + ry * K, cx + rx * K, cy + ry, cx, cy + ry);
    pb.cubic_to(cx - rx * K, cy + ry, cx - rx, cy + ry * K, cx - rx, cy);
    pb.cubic_to(cx - rx, cy - ry * K, cx - rx * K, cy - ry, cx, cy - ry);
    pb.cubic_to(cx + rx * K, cy - ry, cx + rx, cy - ry * K, cx + rx, cy);
    pb.close();
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thin_box_fills_instead_of_stroking() {
        let mut pixmap = Pixmap::new(20, 20).unwrap();
        draw_box(&mut pixmap, Transform::identity(), 10.0, 2.0, 4.0, Color::Black, 0);
        assert!(pixmap.pixel(5, 0).unwrap().alpha() > 0);
    }

    #[test]
    fn filled_ellipse_covers_center() {
        let mut pixmap = Pixmap::new(20, 20).unwrap();
        draw_ellipse(&mut pixmap, Transform::identity(), 20.0, 20.0, 10.0, Color::Black, false);
        assert!(pixmap.pixel(10, 10).unwrap().alpha() > 0);
    }

    #[test]
    fn stroked_ellipse_leaves_center_blank() {
        let mut pixmap = Pixmap::new(40, 40).unwrap();
        draw_ellipse(&mut pixmap, Transform::identity(), 40.0, 40.0, 2.0, Color::Black, false);
        assert_eq!(pixmap.pixel(20, 20).unwrap().alpha(), 0);
    }
}
