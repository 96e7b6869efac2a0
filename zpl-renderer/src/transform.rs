//! The anchor-pivoted rotation transform shared by every drawer: translate
//! to the anchor, then rotate by orientation, using the canonical
//! post-rotate-translate table per orientation.

use tiny_skia::Transform;
use zpl_parser::Orientation;

/// Builds the transform that maps an element's own local coordinate space
/// (origin at the top-left of its `width × height` bounding box) onto the
/// canvas, pivoting the rotation at `anchor`.
pub fn element_transform(anchor: (f32, f32), orientation: Orientation, width: f32, height: f32) -> Transform {
    let degrees = match orientation {
        Orientation::Normal => 0.0,
        Orientation::Rotate90 => 90.0,
        Orientation::Invert180 => 180.0,
        Orientation::BackRotate270 => 270.0,
    };
    let (tx, ty) = match orientation {
        Orientation::Normal => (0.0, 0.0),
        Orientation::Rotate90 => (0.0, -height),
        Orientation::Invert180 => (-width, -height),
        Orientation::BackRotate270 => (-width, 0.0),
    };
    Transform::from_translate(anchor.0, anchor.1)
        .pre_concat(Transform::from_rotate(degrees))
        .pre_concat(Transform::from_translate(tx, ty))
}

/// The whole-canvas 180° pre-rotation applied when `^PO` selected Inverted
/// print orientation.
pub fn page_inversion_transform(width: f32, height: f32) -> Transform {
    Transform::from_translate(width, height).pre_concat(Transform::from_rotate(180.0))
}
