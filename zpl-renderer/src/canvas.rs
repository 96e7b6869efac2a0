//! The output canvas configuration: size in dots, informational DPI, and
//! background color.

use tiny_skia::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasConfig {
    pub width_dots: usize,
    pub height_dots: usize,
    /// Informational only — this system's dots-to-pixels policy is 1:1
    /// regardless of DPI.
    pub dpi: u32,
    pub background: BackgroundColor,
}

impl CanvasConfig {
    pub fn new(width_dots: usize, height_dots: usize, dpi: u32) -> Self {
        Self { width_dots, height_dots, dpi, background: BackgroundColor::White }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackgroundColor {
    #[default]
    White,
    Black,
}

impl BackgroundColor {
    pub fn to_skia(self) -> Color {
        match self {
            BackgroundColor::White => Color::WHITE,
            BackgroundColor::Black => Color::BLACK,
        }
    }
}
