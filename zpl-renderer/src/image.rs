//! Image drawer for `^GF`/`~DG`/`^XG`/`^IM` output.

use tiny_skia::{IntSize, Pixmap, PixmapPaint, Transform};
use zpl_interpreter::Bitmap;

/// Renders a 1-bit bitmap, scaled by nearest-neighbor integer factors, as an
/// RGBA pixmap suitable for `draw_pixmap` under the caller's transform.
pub fn rasterize(bitmap: &Bitmap, scale_x: f32, scale_y: f32) -> Option<Pixmap> {
    if bitmap.width == 0 || bitmap.height == 0 {
        return None;
    }
    let scale_x = scale_x.max(0.01);
    let scale_y = scale_y.max(0.01);
    let out_width = ((bitmap.width as f32) * scale_x).round().max(1.0) as u32;
    let out_height = ((bitmap.height as f32) * scale_y).round().max(1.0) as u32;

    let size = IntSize::from_wh(out_width, out_height)?;
    let mut buf = vec![0u8; (out_width * out_height * 4) as usize];
    for out_y in 0..out_height {
        let src_y = ((out_y as f32 / scale_y) as usize).min(bitmap.height - 1);
        for out_x in 0..out_width {
            let src_x = ((out_x as f32 / scale_x) as usize).min(bitmap.width - 1);
            if bitmap.get(src_x, src_y) == 1 {
                let idx = ((out_y * out_width + out_x) * 4) as usize;
                buf[idx] = 0;
                buf[idx + 1] = 0;
                buf[idx + 2] = 0;
                buf[idx + 3] = 255;
            }
        }
    }
    Pixmap::from_vec(buf, size)
}

pub fn draw_image(target: &mut Pixmap, transform: Transform, bitmap: &Bitmap, scale_x: f32, scale_y: f32) {
    let Some(sprite) = rasterize(bitmap, scale_x, scale_y) else { return };
    target.draw_pixmap(0, 0, sprite.as_ref(), &PixmapPaint::default(), transform, None);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard() -> Bitmap {
        Bitmap { width: 2, height: 2, pixels: vec![1, 0, 0, 1] }
    }

    #[test]
    fn rasterize_preserves_dimensions_at_unit_scale() {
        let sprite = rasterize(&checkerboard(), 1.0, 1.0).unwrap();
        assert_eq!((sprite.width(), sprite.height()), (2, 2));
        assert_eq!(sprite.pixel(0, 0).unwrap().alpha(), 255);
        assert_eq!(sprite.pixel(1, 0).unwrap().alpha(), 0);
    }

    #[test]
    fn rasterize_scales_by_nearest_neighbor() {
        let sprite = rasterize(&checkerboard(), 2.0, 2.0).unwrap();
        assert_eq!((sprite.width(), sprite.height()), (4, 4));
        assert_eq!(sprite.pixel(0, 0).unwrap().alpha(), 255);
        assert_eq!(sprite.pixel(1, 0).unwrap().alpha(), 255);
        assert_eq!(sprite.pixel(2, 0).unwrap().alpha(), 0);
    }

    #[test]
    fn empty_bitmap_rasterizes_to_nothing() {
        assert!(rasterize(&Bitmap::blank(0, 0), 1.0, 1.0).is_none());
    }
}
