//! Stateful command execution (pipeline stage 2): turns a parsed command
//! stream into one or more [`Label`]s, each an ordered list of positioned
//! [`Element`]s, driven by the modal printer state machine and the
//! per-command effects each command has on it.

mod element;
mod encoding;
mod error;
mod graphics;
mod state;

pub use element::{Bitmap, Element, FieldBlock, Label, OriginMode};
pub use error::InterpretError;

use tracing::{debug, trace, warn};
use zpl_parser::{BarcodeCommand, ParseError, Token, ZplCommand};

use crate::graphics::decode_graphic;
use crate::state::{ExecutionState, PendingBarcode};

/// Interprets a full parsed token/command stream, returning one [`Label`]
/// per `^XA ... ^XZ` frame encountered — each `^XA` begins a fresh label
/// frame. A stream with no `^XA` at all produces no labels, which the
/// facade crate treats as [`InterpretError::EmptyLabel`].
pub fn interpret(commands: &[(Token, ZplCommand)]) -> Result<Vec<Label>, InterpretError> {
    let mut labels = Vec::new();
    let mut state = ExecutionState::default();
    let mut elements = Vec::new();
    let mut in_label = false;

    for (_, cmd) in commands {
        if matches!(cmd, ZplCommand::LabelStart) {
            if in_label {
                labels.push(finish_label(&state, std::mem::take(&mut elements)));
            }
            state.reset_for_label_start();
            in_label = true;
            debug!("label start");
            continue;
        }
        if !in_label {
            // `~DG` stores into the graphics cache, which outlives label
            // frames — downloads are commonly sent once ahead of the
            // `^XA...^XZ` that recalls them; every other command only
            // makes sense attached to a label's element list, so it's
            // dropped until the next `^XA`.
            if let ZplCommand::DownloadGraphics { name, data } = cmd {
                let bitmap = decode_graphic(data);
                state.graphics.insert(name, bitmap);
            }
            continue;
        }
        if matches!(cmd, ZplCommand::LabelEnd) {
            labels.push(finish_label(&state, std::mem::take(&mut elements)));
            in_label = false;
            debug!("label end");
            continue;
        }
        execute(cmd, &mut state, &mut elements);
    }

    if in_label {
        labels.push(finish_label(&state, elements));
    }

    if labels.is_empty() {
        return Err(InterpretError::EmptyLabel);
    }
    Ok(labels)
}

/// Convenience: parses and interprets `source` in one call.
pub fn interpret_source(source: &str) -> Result<Vec<Label>, InterpretSourceError> {
    let commands = zpl_parser::parse_zpl(source)?;
    Ok(interpret(&commands)?)
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum InterpretSourceError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Interpret(#[from] InterpretError),
}

fn finish_label(state: &ExecutionState, elements: Vec<Element>) -> Label {
    Label {
        width_dots: state.print_width.unwrap_or(0),
        height_dots: state.label_length.unwrap_or(0),
        print_orientation_inverted: matches!(state.print_orientation, state::PrintOrientation::Inverted),
        elements,
    }
}

fn execute(cmd: &ZplCommand, state: &mut ExecutionState, elements: &mut Vec<Element>) {
    use zpl_parser::ZplCommand as C;
    match cmd {
        C::LabelStart | C::LabelEnd => unreachable!("handled by the caller before dispatch"),

        C::FieldSeparator => state.end_field(),

        C::FieldOrigin { x, y, .. } => {
            state.cur_x = *x;
            state.cur_y = *y;
            state.origin_mode = OriginMode::TopLeft;
            clear_field_modifiers(state);
        }
        C::FieldTypeset { x, y, .. } => {
            state.cur_x = *x;
            state.cur_y = *y;
            state.origin_mode = OriginMode::Baseline;
            clear_field_modifiers(state);
        }
        C::LabelHome { x, y } => {
            state.home_x = *x;
            state.home_y = *y;
        }
        C::LabelShift { dots } => state.shift_x = *dots,
        C::LabelTop { dots } => state.top_y = *dots,
        C::FieldDefaultOrientation(_) => {}

        C::PrintWidth(w) => state.print_width = Some(*w),
        C::LabelLength(h) => state.label_length = Some(*h),
        C::PrintOrientation { inverted } => {
            state.print_orientation =
                if *inverted { state::PrintOrientation::Inverted } else { state::PrintOrientation::Normal };
        }
        C::PrintQuantity { .. } => {}
        C::MediaDarkness(_) => {}
        C::PrintRate { .. } => {}
        C::MaintainMode => {}

        C::FieldBlock { width, max_lines, line_spacing, justification, hanging_indent } => {
            state.field.field_block = Some(FieldBlock {
                width: *width,
                max_lines: (*max_lines).max(1),
                line_spacing: *line_spacing,
                justification: *justification,
                hanging_indent: *hanging_indent,
            });
        }
        C::FieldReverse => state.field.reverse = true,
        C::FieldHexIndicator { indicator } => state.field.hex_indicator = Some(*indicator),
        C::FieldNumber(_) => {}
        C::FieldData(raw) => emit_field(raw, state, elements),
        C::SerializationField(raw) => emit_field(raw, state, elements),
        C::FieldVariable(raw) => emit_field(raw, state, elements),

        C::FontSelect { name, orientation, height, width } => {
            state.font.name = *name;
            if let Some(h) = height {
                state.font.height_dots = *h;
            }
            state.font.width_dots = width.unwrap_or(0);
            state.font.orientation = *orientation;
        }
        C::ChangeFont { name, height, width } => {
            state.font.name = *name;
            state.font.height_dots = *height;
            state.font.width_dots = *width;
        }
        C::ChangeEncoding(id) => state.encoding_id = *id,

        C::GraphicBox { width, height, thickness, color, rounding } => {
            let (x, y) = state.anchor();
            elements.push(Element::Box {
                x,
                y,
                origin_mode: state.origin_mode,
                width: *width,
                height: *height,
                border: *thickness,
                color: *color,
                corner_rounding: *rounding,
            });
        }
        C::GraphicDiagonal { .. } => {
            // Diagonals aren't part of the element model (only
            // Text/Box/Ellipse/Image/Barcode are); accepted and validated,
            // but emits nothing.
        }
        C::GraphicEllipse { width, height, thickness, color, shape } => {
            let (x, y) = state.anchor();
            elements.push(Element::Ellipse {
                x,
                y,
                origin_mode: state.origin_mode,
                width: *width,
                height: *height,
                border: *thickness,
                color: *color,
                shape_override: *shape,
            });
        }
        C::GraphicField(data) => {
            let bitmap = decode_graphic(data);
            let (x, y) = state.anchor();
            trace!(width = bitmap.width, height = bitmap.height, "graphic field emitted");
            elements.push(Element::Image {
                x,
                y,
                origin_mode: state.origin_mode,
                orientation: state.font.orientation,
                bitmap,
                scale_x: 1.0,
                scale_y: 1.0,
            });
        }
        C::DownloadGraphics { name, data } => {
            let bitmap = decode_graphic(data);
            state.graphics.insert(name, bitmap);
        }
        C::RecallGraphic { name, scale_x, scale_y } => {
            if let Some(bitmap) = state.graphics.get(name).cloned() {
                let (x, y) = state.anchor();
                elements.push(Element::Image {
                    x,
                    y,
                    origin_mode: state.origin_mode,
                    orientation: state.font.orientation,
                    bitmap,
                    scale_x: *scale_x,
                    scale_y: *scale_y,
                });
            }
        }
        C::RecallImage { name } => {
            if let Some(bitmap) = state.graphics.get(name).cloned() {
                let (x, y) = state.anchor();
                elements.push(Element::Image {
                    x,
                    y,
                    origin_mode: state.origin_mode,
                    orientation: state.font.orientation,
                    bitmap,
                    scale_x: 1.0,
                    scale_y: 1.0,
                });
            }
        }

        C::BarcodeDefaults { module_width, module_ratio, height } => {
            state.barcode_defaults =
                state::BarcodeDefaults { module_width: *module_width, module_ratio: *module_ratio, height: *height };
        }
        C::Barcode(cmd) => stage_barcode(cmd, state),

        C::Comment(_) => {}
        C::Unknown { code } => warn!(code, "unrecognized command, skipped"),
    }
}

fn stage_barcode(cmd: &BarcodeCommand, state: &mut ExecutionState) {
    state.field.pending_barcode = Some(PendingBarcode::from_command(cmd, state.barcode_defaults));
}

/// `^FO`/`^FT` clear field-block, reverse, and the hex indicator, but — unlike
/// `^FS` — leave a staged barcode descriptor alone: it's only consumed by the
/// next `^FD` or discarded by the next `^FS`.
fn clear_field_modifiers(state: &mut ExecutionState) {
    state.field.field_block = None;
    state.field.reverse = false;
    state.field.hex_indicator = None;
}

fn emit_field(raw: &str, state: &mut ExecutionState, elements: &mut Vec<Element>) {
    let decoded = decode_field_text(raw, state);
    let (x, y) = state.anchor();

    if let Some(pending) = state.field.pending_barcode.take() {
        let content = strip_barcode_prefix(&pending.kind, &decoded);
        elements.push(Element::Barcode {
            x,
            y,
            origin_mode: state.origin_mode,
            kind: pending.kind,
            content,
            module_width: pending.module_width,
            module_ratio: pending.module_ratio,
            bar_height: pending.bar_height,
            orientation: pending.orientation,
            interpretation_line: pending.interpretation_line,
            error_correction: pending.error_correction,
        });
        return;
    }

    elements.push(Element::Text {
        x,
        y,
        origin_mode: state.origin_mode,
        text: decoded,
        font_id: state.font.name,
        font_height_dots: state.font.height_dots,
        font_width_dots: state.font.width_dots,
        orientation: state.font.orientation,
        reverse: state.field.reverse,
        field_block: state.field.field_block.clone(),
    });
}

fn decode_field_text(raw: &str, state: &ExecutionState) -> String {
    match state.field.hex_indicator {
        Some(indicator) => {
            let bytes = encoding::expand_hex_escapes(raw, indicator);
            encoding::decode_bytes(&bytes, state.encoding_id)
        }
        None => raw.to_string(),
    }
}

/// For QR the data passed through `^FD` carries a `<ecc-override><mode>,`
/// prefix the executor strips before storing `content`.
fn strip_barcode_prefix(kind: &zpl_parser::BarcodeKind, content: &str) -> String {
    if matches!(kind, zpl_parser::BarcodeKind::Qr { .. })
        && let Some(idx) = content.find(',')
        && idx <= 3
    {
        return content[idx + 1..].to_string();
    }
    content.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use zpl_parser::parse_zpl;

    fn labels_for(source: &str) -> Vec<Label> {
        let commands = parse_zpl(source).unwrap();
        interpret(&commands).unwrap()
    }

    #[test]
    fn minimal_text_field_emits_one_text_element() {
        let labels = labels_for("^XA^FO50,50^A0N,30,20^FDHello^FS^XZ");
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].elements.len(), 1);
        match &labels[0].elements[0] {
            Element::Text { x, y, font_id, font_height_dots, font_width_dots, .. } => {
                assert_eq!((*x, *y), (50, 50));
                assert_eq!(*font_id, '0');
                assert_eq!(*font_height_dots, 30);
                assert_eq!(*font_width_dots, 20);
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn qr_prefix_is_stripped_and_no_text_emitted() {
        let labels = labels_for("^XA^FO10,10^BQN,2,5^FDQA,https://example.com^FS^XZ");
        assert_eq!(labels[0].elements.len(), 1);
        match &labels[0].elements[0] {
            Element::Barcode { kind, content, module_width, .. } => {
                assert!(matches!(kind, zpl_parser::BarcodeKind::Qr { .. }));
                assert_eq!(content, "https://example.com");
                assert_eq!(*module_width, 5);
            }
            other => panic!("expected barcode, got {other:?}"),
        }
    }

    #[test]
    fn field_separator_clears_pending_barcode_without_emitting() {
        let labels = labels_for("^XA^BCN,100^FS^FO0,0^FDplain^FS^XZ");
        assert_eq!(labels[0].elements.len(), 1);
        assert!(matches!(labels[0].elements[0], Element::Text { .. }));
    }

    #[test]
    fn field_origin_after_barcode_command_does_not_drop_the_pending_barcode() {
        let labels = labels_for("^XA^BCN,100^FO10,10^FDabc^FS^XZ");
        assert_eq!(labels[0].elements.len(), 1);
        match &labels[0].elements[0] {
            Element::Barcode { content, .. } => assert_eq!(content, "abc"),
            other => panic!("expected barcode, got {other:?}"),
        }
    }

    #[test]
    fn anchor_uses_home_shift_top_offsets() {
        let labels = labels_for("^XA^LH10,10^LS5^LT5^FO1,1^FDhi^FS^XZ");
        match &labels[0].elements[0] {
            Element::Text { x, y, .. } => assert_eq!((*x, *y), (16, 16)),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn download_then_recall_round_trips_bitmap() {
        let labels = labels_for("~DGR:DOT.GRF,1,1,80^XA^FO0,0^XGR:DOT.GRF,8,8^FS^XZ");
        match &labels[0].elements[0] {
            Element::Image { bitmap, scale_x, scale_y, .. } => {
                assert_eq!(bitmap.width, 8);
                assert_eq!(bitmap.height, 1);
                assert_eq!(bitmap.get(0, 0), 1);
                assert_eq!((*scale_x, *scale_y), (8.0, 8.0));
            }
            other => panic!("expected image, got {other:?}"),
        }
    }

    #[test]
    fn recall_of_unknown_name_emits_nothing() {
        let labels = labels_for("^XA^FO0,0^IMMISSING^FS^XZ");
        assert!(labels[0].elements.is_empty());
    }

    #[test]
    fn hex_escape_decodes_utf8_character() {
        let labels = labels_for("^XA^CI28^FH_^FD_C3_A9^FS^XZ");
        match &labels[0].elements[0] {
            Element::Text { text, .. } => assert_eq!(text, "é"),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn multiple_label_frames_produce_multiple_labels() {
        let labels = labels_for("^XA^FO0,0^FDone^FS^XZ^XA^FO0,0^FDtwo^FS^XZ");
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn empty_source_is_not_empty_label_here_but_missing_start_upstream() {
        assert!(interpret(&[]).is_err());
    }
}
