//! The closed set of ZPL command variants and the small enums their
//! parameter grammars share.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Normal,        // N - 0°
    Rotate90,      // R - 90°
    Invert180,     // I - 180°
    BackRotate270, // B - 270°
}

impl Orientation {
    pub fn from_char(c: char) -> Orientation {
        match c.to_ascii_uppercase() {
            'R' => Orientation::Rotate90,
            'I' => Orientation::Invert180,
            'B' => Orientation::BackRotate270,
            _ => Orientation::Normal,
        }
    }
}

/// `^FO`/`^FT` origin mode: whether the anchor is the element's top-left
/// corner or its text baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginMode {
    TopLeft,
    Baseline,
}

/// The legacy third parameter of `^FO`/`^FT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justification {
    #[default]
    Left,
    Right,
    Auto,
}

impl From<Option<u8>> for Justification {
    fn from(value: Option<u8>) -> Self {
        match value {
            Some(1) => Justification::Right,
            Some(2) => Justification::Auto,
            _ => Justification::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBlockJustification {
    #[default]
    Left,
    Center,
    Right,
    Justified,
}

impl From<&str> for TextBlockJustification {
    fn from(value: &str) -> Self {
        match value {
            "C" | "c" => TextBlockJustification::Center,
            "R" | "r" => TextBlockJustification::Right,
            "J" | "j" => TextBlockJustification::Justified,
            _ => TextBlockJustification::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Black,
    White,
}

impl From<Option<&str>> for Color {
    fn from(value: Option<&str>) -> Self {
        match value {
            Some(s) if s.eq_ignore_ascii_case("w") => Color::White,
            _ => Color::Black,
        }
    }
}

/// `^GE`'s optional shape override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EllipseShape {
    #[default]
    None,
    Fill,
    Stroke,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCorrection {
    L,
    #[default]
    M,
    Q,
    H,
}

impl From<char> for ErrorCorrection {
    fn from(value: char) -> Self {
        match value.to_ascii_uppercase() {
            'L' => ErrorCorrection::L,
            'Q' => ErrorCorrection::Q,
            'H' => ErrorCorrection::H,
            _ => ErrorCorrection::M,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpretationLine {
    Off,
    Below,
    Above,
}

/// The barcode symbologies the registry can stage a pending descriptor
/// for — one variant per `^B*` command.
#[derive(Debug, Clone, PartialEq)]
pub enum BarcodeKind {
    Code128 { mode: Code128Mode },
    Code39 { mod43_check_digit: bool },
    Ean13,
    Code93,
    UpcA,
    Qr { model: u8, magnification: u8, error_correction: ErrorCorrection },
    DataMatrix,
    Pdf417 { columns: Option<u8>, rows: Option<u8>, truncated: bool },
    Aztec { magnification: u8 },
    MaxiCode { mode: u8 },
    Itf,
    Codabar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Code128Mode {
    #[default]
    Normal,
    Ucc,
    Ean,
    Auto,
}

impl From<&str> for Code128Mode {
    fn from(value: &str) -> Self {
        match value {
            "U" | "u" => Code128Mode::Ucc,
            "D" | "d" => Code128Mode::Ean,
            "A" | "a" => Code128Mode::Auto,
            _ => Code128Mode::Normal,
        }
    }
}

/// The declared shape of a `^B*` command. The executor merges this with the
/// current `^BY` defaults to build the full pending-barcode descriptor —
/// module width and ratio are modal state, not part of the barcode
/// command's own grammar.
#[derive(Debug, Clone, PartialEq)]
pub struct BarcodeCommand {
    pub kind: BarcodeKind,
    pub orientation: Orientation,
    /// Explicit height override in dots, if the command specified one.
    pub height: Option<usize>,
    pub interpretation_line: InterpretationLine,
}

/// `^GF`/`~DG` raw graphic data plus the header fields needed to decode it.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicFieldData {
    pub compression: CompressionType,
    pub total_bytes: usize,
    pub bytes_per_row: usize,
    pub hex_data: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionType {
    AsciiHex,
    Binary,
    CompressedBinary,
}

impl From<&str> for CompressionType {
    fn from(value: &str) -> Self {
        match value {
            s if s.eq_ignore_ascii_case("b") => CompressionType::Binary,
            s if s.eq_ignore_ascii_case("c") => CompressionType::CompressedBinary,
            _ => CompressionType::AsciiHex,
        }
    }
}

/// One parsed ZPL command. Unrecognized codes never reach
/// this type; they are represented by `ZplCommand::Unknown` so the validator
/// can still report them without the executor having to special-case them.
#[derive(Debug, Clone, PartialEq)]
pub enum ZplCommand {
    // --- Label ---
    LabelStart,
    LabelEnd,
    FieldSeparator,

    // --- Positioning ---
    FieldOrigin { x: i32, y: i32, justification: Justification },
    FieldTypeset { x: i32, y: i32, justification: Justification },
    LabelHome { x: i32, y: i32 },
    LabelShift { dots: i32 },
    LabelTop { dots: i32 },
    FieldDefaultOrientation(Orientation), // ^FW: accepted metadata, no rendering effect

    // --- Page ---
    PrintWidth(usize),
    LabelLength(usize),
    PrintOrientation { inverted: bool }, // ^PO
    PrintQuantity { total: u32 },
    MediaDarkness(i32),
    PrintRate { print_speed: u32, slew_speed: u32 },
    MaintainMode, // ^MM: accepted no-op, still validated

    // --- Field state ---
    FieldBlock {
        width: usize,
        max_lines: usize,
        line_spacing: isize,
        justification: TextBlockJustification,
        hanging_indent: usize,
    },
    FieldReverse,
    FieldHexIndicator { indicator: char },
    FieldNumber(u32), // ^FN: accepted metadata
    FieldData(String),
    SerializationField(String),
    FieldVariable(String),

    // --- Fonts ---
    FontSelect {
        name: char,
        orientation: Orientation,
        height: Option<usize>,
        width: Option<usize>,
    },
    ChangeFont { name: char, height: usize, width: usize },
    ChangeEncoding(u8),

    // --- Graphics ---
    GraphicBox { width: usize, height: usize, thickness: usize, color: Color, rounding: u8 },
    GraphicDiagonal { width: usize, height: usize, thickness: usize, color: Color, orientation_right: bool },
    GraphicEllipse { width: usize, height: usize, thickness: usize, color: Color, shape: EllipseShape },
    GraphicField(GraphicFieldData),
    DownloadGraphics { name: String, data: GraphicFieldData },
    RecallGraphic { name: String, scale_x: f32, scale_y: f32 },
    RecallImage { name: String },

    // --- Barcodes ---
    BarcodeDefaults { module_width: u8, module_ratio: f32, height: usize },
    Barcode(BarcodeCommand),

    // --- Misc ---
    Comment(String),
    Unknown { code: String },
}
