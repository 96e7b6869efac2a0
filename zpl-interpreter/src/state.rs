//! The modal printer state machine commands drive.

use zpl_parser::{BarcodeCommand, BarcodeKind, ErrorCorrection, InterpretationLine, Orientation};

use crate::element::{FieldBlock, OriginMode};
use crate::graphics::GraphicsCache;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontState {
    pub name: char,
    pub height_dots: usize,
    /// `0` means proportional — the rasterizer derives the stretch from the
    /// font mapping table's aspect ratio.
    pub width_dots: usize,
    pub orientation: Orientation,
}

impl Default for FontState {
    fn default() -> Self {
        Self { name: '0', height_dots: 9, width_dots: 0, orientation: Orientation::Normal }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BarcodeDefaults {
    pub module_width: u8,
    pub module_ratio: f32,
    pub height: usize,
}

/// A declared-but-not-yet-emitted barcode: the executor fills in module
/// width/ratio from the current `^BY` defaults when the command is seen,
/// ahead of the `^FD` that will actually consume it.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingBarcode {
    pub kind: BarcodeKind,
    pub orientation: Orientation,
    pub bar_height: usize,
    pub module_width: u8,
    pub module_ratio: f32,
    pub interpretation_line: InterpretationLine,
    pub error_correction: ErrorCorrection,
}

impl PendingBarcode {
    pub fn from_command(cmd: &BarcodeCommand, defaults: BarcodeDefaults) -> Self {
        let error_correction = match &cmd.kind {
            BarcodeKind::Qr { error_correction, .. } => *error_correction,
            _ => ErrorCorrection::default(),
        };
        // QR and Aztec carry their own module size as a `magnification`
        // parameter on the command itself; every other symbology takes it
        // from the `^BY` defaults instead.
        let module_width = match &cmd.kind {
            BarcodeKind::Qr { magnification, .. } => *magnification,
            BarcodeKind::Aztec { magnification } => *magnification,
            _ => defaults.module_width,
        };
        Self {
            kind: cmd.kind.clone(),
            orientation: cmd.orientation,
            bar_height: cmd.height.unwrap_or(defaults.height),
            module_width,
            module_ratio: defaults.module_ratio,
            interpretation_line: cmd.interpretation_line,
            error_correction,
        }
    }
}

/// Per-field state, fully reset by `^FS`.
#[derive(Debug, Clone, Default)]
pub struct FieldState {
    pub reverse: bool,
    pub hex_indicator: Option<char>,
    pub field_block: Option<FieldBlock>,
    pub pending_barcode: Option<PendingBarcode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrintOrientation {
    #[default]
    Normal,
    Inverted,
}

#[derive(Debug, Clone)]
pub struct ExecutionState {
    pub cur_x: i32,
    pub cur_y: i32,
    pub origin_mode: OriginMode,
    pub home_x: i32,
    pub home_y: i32,
    pub shift_x: i32,
    pub top_y: i32,
    pub font: FontState,
    pub field: FieldState,
    pub barcode_defaults: BarcodeDefaults,
    pub encoding_id: u8,
    pub print_orientation: PrintOrientation,
    pub graphics: GraphicsCache,
    pub print_width: Option<usize>,
    pub label_length: Option<usize>,
}

impl Default for ExecutionState {
    fn default() -> Self {
        Self {
            cur_x: 0,
            cur_y: 0,
            origin_mode: OriginMode::TopLeft,
            home_x: 0,
            home_y: 0,
            shift_x: 0,
            top_y: 0,
            font: FontState::default(),
            field: FieldState::default(),
            barcode_defaults: BarcodeDefaults { module_width: 2, module_ratio: 3.0, height: 10 },
            encoding_id: 0,
            print_orientation: PrintOrientation::default(),
            graphics: GraphicsCache::default(),
            print_width: None,
            label_length: None,
        }
    }
}

impl ExecutionState {
    /// `^XA` resets per-label modal state, but not the graphics cache, which
    /// outlives a single label.
    pub fn reset_for_label_start(&mut self) {
        let graphics = std::mem::take(&mut self.graphics);
        *self = ExecutionState { graphics, ..ExecutionState::default() };
    }

    /// The absolute anchor of the next field: `home + shift/top + cur`.
    pub fn anchor(&self) -> (i32, i32) {
        (self.home_x + self.shift_x + self.cur_x, self.home_y + self.top_y + self.cur_y)
    }

    /// `^FS`: clears per-field state; does not touch position or font.
    pub fn end_field(&mut self) {
        self.field = FieldState::default();
    }
}
