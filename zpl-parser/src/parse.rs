//! Per-token command dispatch.
//!
//! The tokenizer has already isolated `{code, payload}`; this module turns
//! that pair into a [`ZplCommand`]. Every field parse goes through
//! `fields::` helpers, so a malformed or missing parameter quietly falls
//! back to its documented default rather than failing the whole command —
//! a bad parameter is never a reason to drop a command.

use crate::commands::*;
use crate::fields::*;
use crate::token::{Token, Tokenizer};
use crate::error::ParseError;

/// Tokenizes and parses an entire ZPL source string.
///
/// Fails only for the two genuinely unrecoverable cases: an empty source,
/// or a source with no `^XA` label start anywhere in it. Everything
/// else — unknown commands, malformed payloads — comes back as a command
/// (`ZplCommand::Unknown` or a defaulted variant), never as an `Err`.
pub fn parse_zpl(source: &str) -> Result<Vec<(Token, ZplCommand)>, ParseError> {
    if source.trim().is_empty() {
        return Err(ParseError::EmptySource);
    }
    if !source.contains("^XA") && !source.contains("^xa") {
        return Err(ParseError::MissingLabelStart);
    }

    Ok(Tokenizer::new(source)
        .map(|tok| {
            let cmd = parse_token(&tok.code, &tok.payload);
            (tok, cmd)
        })
        .collect())
}

/// Parses a single token's payload into a command, given its (uppercased)
/// code. Unrecognized codes become `ZplCommand::Unknown`.
pub fn parse_token(code: &str, payload: &str) -> ZplCommand {
    let f = split_fields(payload);
    match code {
        "XA" => ZplCommand::LabelStart,
        "XZ" => ZplCommand::LabelEnd,
        "FS" => ZplCommand::FieldSeparator,

        "FO" => origin(&f, ZplCommand::FieldOrigin as fn(i32, i32, Justification) -> ZplCommand),
        "FT" => origin(&f, ZplCommand::FieldTypeset as fn(i32, i32, Justification) -> ZplCommand),

        "LH" => ZplCommand::LabelHome { x: i32_or(&f, 0, 0), y: i32_or(&f, 1, 0) },
        "LS" => ZplCommand::LabelShift { dots: i32_or(&f, 0, 0) },
        "LT" => ZplCommand::LabelTop { dots: i32_or(&f, 0, 0) },
        "FW" => {
            let o = ch(&f, 0).map(Orientation::from_char).unwrap_or_default();
            ZplCommand::FieldDefaultOrientation(o)
        }

        "PW" => ZplCommand::PrintWidth(usize_or(&f, 0, 0)),
        "LL" => ZplCommand::LabelLength(usize_or(&f, 0, 0)),
        "PO" => {
            let inverted = ch(&f, 0).map(|c| c.eq_ignore_ascii_case(&'I')).unwrap_or(false);
            ZplCommand::PrintOrientation { inverted }
        }
        "PQ" => ZplCommand::PrintQuantity { total: uint(&f, 0).unwrap_or(1) as u32 },
        "MD" => ZplCommand::MediaDarkness(i32_or(&f, 0, 0)),
        "PR" => ZplCommand::PrintRate {
            print_speed: uint(&f, 0).unwrap_or(2) as u32,
            slew_speed: uint(&f, 1).unwrap_or(2) as u32,
        },
        "MM" => ZplCommand::MaintainMode,

        "FB" => ZplCommand::FieldBlock {
            width: usize_or(&f, 0, 0),
            max_lines: usize_or(&f, 1, 1).max(1),
            line_spacing: int(&f, 2).map(|v| v as isize).unwrap_or(0),
            justification: get(&f, 3).map(TextBlockJustification::from).unwrap_or_default(),
            hanging_indent: usize_or(&f, 4, 0),
        },
        "FR" => ZplCommand::FieldReverse,
        "FH" => ZplCommand::FieldHexIndicator { indicator: ch(&f, 0).unwrap_or('_') },
        "FN" => ZplCommand::FieldNumber(uint(&f, 0).unwrap_or(0) as u32),
        "FD" => ZplCommand::FieldData(payload.to_string()),
        "SN" => ZplCommand::SerializationField(payload.to_string()),
        "FV" => ZplCommand::FieldVariable(payload.to_string()),

        code if code.starts_with('A') && code.len() == 2 => font_select(code, &f),
        "CF" => {
            let name = code_font_name(&f);
            let height = usize_or(&f, 1, 0);
            let width = usize_or(&f, 2, height);
            ZplCommand::ChangeFont { name, height, width }
        }
        "CI" => ZplCommand::ChangeEncoding(uint(&f, 0).unwrap_or(0) as u8),

        "GB" => graphic_box(&f),
        "GC" => {
            let d = usize_or(&f, 0, 1);
            let thickness = usize_or(&f, 1, 1);
            let color = get(&f, 2).into();
            ZplCommand::GraphicEllipse { width: d, height: d, thickness, color, shape: EllipseShape::None }
        }
        "GD" => ZplCommand::GraphicDiagonal {
            width: usize_or(&f, 0, 1),
            height: usize_or(&f, 1, 1),
            thickness: usize_or(&f, 2, 1),
            color: get(&f, 3).into(),
            orientation_right: get(&f, 4).map(|s| s.eq_ignore_ascii_case("r")).unwrap_or(true),
        },
        "GE" => {
            let width = usize_or(&f, 0, 1);
            let height = usize_or(&f, 1, width);
            ZplCommand::GraphicEllipse {
                width,
                height,
                thickness: usize_or(&f, 2, 1),
                color: get(&f, 3).into(),
                shape: EllipseShape::None,
            }
        }
        "GF" => ZplCommand::GraphicField(graphic_field_data(payload, 4)),
        "DG" => {
            let name = get(&f, 0).unwrap_or("").to_string();
            ZplCommand::DownloadGraphics { name, data: download_graphics_data(payload) }
        }
        "XG" => ZplCommand::RecallGraphic {
            name: get(&f, 0).unwrap_or("").to_string(),
            scale_x: decimal(&f, 1).unwrap_or(1.0).max(1.0),
            scale_y: decimal(&f, 2).unwrap_or(1.0).max(1.0),
        },
        "IM" => ZplCommand::RecallImage { name: get(&f, 0).unwrap_or("").to_string() },

        "BY" => ZplCommand::BarcodeDefaults {
            module_width: uint(&f, 0).map(|v| v.clamp(1, 10) as u8).unwrap_or(2),
            module_ratio: decimal(&f, 1).map(|v| v.clamp(2.0, 3.0)).unwrap_or(3.0),
            height: uint(&f, 2).filter(|v| *v > 0).map(|v| v as usize).unwrap_or(10),
        },

        "BC" => barcode(&f, BarcodeKind::Code128 { mode: get(&f, 5).map(Code128Mode::from).unwrap_or_default() }),
        "B3" => barcode_mod43(&f),
        "BE" => barcode(&f, BarcodeKind::Ean13),
        "BA" => barcode(&f, BarcodeKind::Code93),
        "BU" => barcode(&f, BarcodeKind::UpcA),
        "BQ" => barcode_qr(&f),
        "BX" => barcode(&f, BarcodeKind::DataMatrix),
        "B7" => barcode_pdf417(&f),
        "B0" => barcode(&f, BarcodeKind::Aztec { magnification: uint(&f, 1).map(|v| v as u8).unwrap_or(1).clamp(1, 10) }),
        "BD" => barcode(&f, BarcodeKind::MaxiCode { mode: uint(&f, 1).map(|v| v as u8).unwrap_or(2) }),
        "B2" => barcode(&f, BarcodeKind::Itf),
        "BK" => barcode(&f, BarcodeKind::Codabar),

        "FX" => ZplCommand::Comment(payload.to_string()),

        other => ZplCommand::Unknown { code: other.to_string() },
    }
}

fn origin(f: &[&str], ctor: fn(i32, i32, Justification) -> ZplCommand) -> ZplCommand {
    let x = i32_or(f, 0, 0);
    let y = i32_or(f, 1, 0);
    let justification = uint(f, 2).map(|v| v as u8).into();
    ctor(x, y, justification)
}

fn font_select(code: &str, f: &[&str]) -> ZplCommand {
    let name = code.chars().nth(1).unwrap_or('0');
    let orientation = ch(f, 0).map(Orientation::from_char).unwrap_or_default();
    ZplCommand::FontSelect {
        name,
        orientation,
        height: uint(f, 1).map(|v| v as usize),
        width: uint(f, 2).map(|v| v as usize),
    }
}

fn code_font_name(f: &[&str]) -> char {
    ch(f, 0).unwrap_or('0')
}

fn graphic_box(f: &[&str]) -> ZplCommand {
    let thickness = usize_or(f, 2, 1);
    ZplCommand::GraphicBox {
        width: usize_or(f, 0, thickness),
        height: usize_or(f, 1, thickness),
        thickness,
        color: get(f, 3).into(),
        rounding: uint(f, 4).map(|v| v.clamp(0, 8) as u8).unwrap_or(0),
    }
}

/// Header fields for `^GF` are `format,binary_byte_count,total_bytes,bytes_per_row` —
/// the raw data itself follows after `header_fields` commas. `binary_byte_count`
/// (the tokenizer's own doubling field) isn't needed again once the payload has
/// already been isolated, so it's read but discarded here.
fn graphic_field_data(payload: &str, header_fields: usize) -> GraphicFieldData {
    let parts: Vec<&str> = payload.splitn(header_fields + 1, ',').collect();
    let compression = parts.first().copied().map(CompressionType::from).unwrap_or(CompressionType::AsciiHex);
    let total_bytes = parts.get(2).and_then(|s| s.trim().parse().ok()).unwrap_or(0);
    let bytes_per_row = parts.get(3).and_then(|s| s.trim().parse().ok()).unwrap_or(0);
    let hex_data = parts.get(header_fields).copied().unwrap_or("").to_string();
    GraphicFieldData { compression, total_bytes, bytes_per_row, hex_data }
}

/// `~DG` has no format letter: `name,total_bytes,bytes_per_row,data`.
fn download_graphics_data(payload: &str) -> GraphicFieldData {
    let parts: Vec<&str> = payload.splitn(4, ',').collect();
    let total_bytes = parts.get(1).and_then(|s| s.trim().parse().ok()).unwrap_or(0);
    let bytes_per_row = parts.get(2).and_then(|s| s.trim().parse().ok()).unwrap_or(0);
    let hex_data = parts.get(3).copied().unwrap_or("").to_string();
    GraphicFieldData { compression: CompressionType::AsciiHex, total_bytes, bytes_per_row, hex_data }
}

fn barcode(f: &[&str], kind: BarcodeKind) -> ZplCommand {
    let orientation = ch(f, 0).map(Orientation::from_char).unwrap_or_default();
    let height = uint(f, 1).filter(|v| *v > 0).map(|v| v as usize);
    let interpretation_line = match (flag_yn(f, 2, true), flag_yn(f, 3, false)) {
        (false, _) => InterpretationLine::Off,
        (true, true) => InterpretationLine::Above,
        (true, false) => InterpretationLine::Below,
    };
    ZplCommand::Barcode(BarcodeCommand { kind, orientation, height, interpretation_line })
}

fn barcode_mod43(f: &[&str]) -> ZplCommand {
    let orientation = ch(f, 0).map(Orientation::from_char).unwrap_or_default();
    let mod43_check_digit = flag_yn(f, 1, false);
    let height = uint(f, 2).filter(|v| *v > 0).map(|v| v as usize);
    let interpretation_line = match (flag_yn(f, 3, true), flag_yn(f, 4, false)) {
        (false, _) => InterpretationLine::Off,
        (true, true) => InterpretationLine::Above,
        (true, false) => InterpretationLine::Below,
    };
    ZplCommand::Barcode(BarcodeCommand {
        kind: BarcodeKind::Code39 { mod43_check_digit },
        orientation,
        height,
        interpretation_line,
    })
}

fn barcode_qr(f: &[&str]) -> ZplCommand {
    let orientation = ch(f, 0).map(Orientation::from_char).unwrap_or_default();
    let model = uint(f, 1).map(|v| v as u8).unwrap_or(2);
    let magnification = uint(f, 2).map(|v| v as u8).unwrap_or(3).clamp(1, 10);
    let error_correction = ch(f, 3).map(ErrorCorrection::from).unwrap_or_default();
    ZplCommand::Barcode(BarcodeCommand {
        kind: BarcodeKind::Qr { model, magnification, error_correction },
        orientation,
        height: None,
        interpretation_line: InterpretationLine::Off,
    })
}

fn barcode_pdf417(f: &[&str]) -> ZplCommand {
    let orientation = ch(f, 0).map(Orientation::from_char).unwrap_or_default();
    let height = uint(f, 1).filter(|v| *v > 0).map(|v| v as usize);
    let columns = uint(f, 3).map(|v| v as u8);
    let rows = uint(f, 4).map(|v| v as u8);
    let truncated = flag_yn(f, 5, false);
    ZplCommand::Barcode(BarcodeCommand {
        kind: BarcodeKind::Pdf417 { columns, rows, truncated },
        orientation,
        height,
        interpretation_line: InterpretationLine::Off,
    })
}
