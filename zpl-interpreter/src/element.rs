//! The positioned drawing records the executor emits.
//!
//! Every variant carries its anchor and origin mode at emission time; the
//! rasterizer never looks back at execution state, so later commands can't
//! retroactively change an element already in the list.

use zpl_parser::{
    BarcodeKind, Color, EllipseShape, ErrorCorrection, InterpretationLine, Orientation,
    TextBlockJustification,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginMode {
    TopLeft,
    Baseline,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldBlock {
    pub width: usize,
    pub max_lines: usize,
    pub line_spacing: isize,
    pub justification: TextBlockJustification,
    pub hanging_indent: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text {
        x: i32,
        y: i32,
        origin_mode: OriginMode,
        text: String,
        font_id: char,
        font_height_dots: usize,
        font_width_dots: usize,
        orientation: Orientation,
        reverse: bool,
        field_block: Option<FieldBlock>,
    },
    Box {
        x: i32,
        y: i32,
        origin_mode: OriginMode,
        width: usize,
        height: usize,
        border: usize,
        color: Color,
        corner_rounding: u8,
    },
    Ellipse {
        x: i32,
        y: i32,
        origin_mode: OriginMode,
        width: usize,
        height: usize,
        border: usize,
        color: Color,
        shape_override: EllipseShape,
    },
    Image {
        x: i32,
        y: i32,
        origin_mode: OriginMode,
        orientation: Orientation,
        bitmap: Bitmap,
        scale_x: f32,
        scale_y: f32,
    },
    Barcode {
        x: i32,
        y: i32,
        origin_mode: OriginMode,
        kind: BarcodeKind,
        content: String,
        module_width: u8,
        module_ratio: f32,
        bar_height: usize,
        orientation: Orientation,
        interpretation_line: InterpretationLine,
        error_correction: ErrorCorrection,
    },
}

/// A 1-bit bitmap: `pixels[y * width + x]` is `1` for black, `0` for white.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bitmap {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl Bitmap {
    pub fn blank(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0; width * height] }
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.pixels[y * self.width + x]
    }
}

/// The parse/interpret product: label dimensions plus the ordered elements
/// the executor emitted for it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Label {
    pub width_dots: usize,
    pub height_dots: usize,
    pub print_orientation_inverted: bool,
    pub elements: Vec<Element>,
}
