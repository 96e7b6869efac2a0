//! Facade-level end-to-end scenarios: each must render without panicking
//! and produce a non-empty, well-formed PNG.

use zpl::{render, render_inches, render_mm, render_to_file, validate, Element};

fn is_png(bytes: &[u8]) -> bool {
    bytes.starts_with(&[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'])
}

#[test]
fn scenario_1_minimal_text() {
    let png = render("^XA^FO50,50^A0N,30,20^FDHello^FS^XZ", 200, 100, 203).unwrap();
    assert!(is_png(&png));

    let label = zpl::parse("^XA^FO50,50^A0N,30,20^FDHello^FS^XZ").unwrap();
    assert_eq!(label.elements.len(), 1);
    assert!(matches!(&label.elements[0], Element::Text { .. }));
    assert!(validate("^XA^FO50,50^A0N,30,20^FDHello^FS^XZ").is_empty());
}

#[test]
fn scenario_2_qr_with_prefix_stripping() {
    let source = "^XA^FO10,10^BQN,2,5^FDQA,https://example.com^FS^XZ";
    let png = render(source, 200, 200, 203).unwrap();
    assert!(is_png(&png));

    let label = zpl::parse(source).unwrap();
    match &label.elements[0] {
        Element::Barcode { content, module_width, .. } => {
            assert_eq!(content, "https://example.com");
            assert_eq!(*module_width, 5);
        }
        other => panic!("expected a barcode, got {other:?}"),
    }
}

#[test]
fn scenario_3_ean13_validation_failure_falls_back_to_placeholder() {
    let png = render("^XA^FO0,0^BY2,2,40^BEN,,Y,N^FDABCDEF^FS^XZ", 300, 100, 203).unwrap();
    assert!(is_png(&png));
}

#[test]
fn scenario_4_field_block_wrap_and_alignment() {
    let source = "^XA^FO0,0^A0N,20,12^FB200,2,0,C^FDOne two three four five six seven^FS^XZ";
    let png = render(source, 250, 100, 203).unwrap();
    assert!(is_png(&png));
}

#[test]
fn scenario_5_reverse_print() {
    let png = render("^XA^FO20,20^A0N,40,0^FR^FDDARK^FS^XZ", 200, 100, 203).unwrap();
    assert!(is_png(&png));
}

#[test]
fn scenario_6_download_and_recall() {
    let source = "~DGR:DOT.GRF,1,1,80^XA^FO0,0^XGR:DOT.GRF,8,8^FS^XZ";
    let png = render(source, 64, 64, 203).unwrap();
    assert!(is_png(&png));
}

#[test]
fn render_to_file_writes_a_png_to_disk() {
    let dir = std::env::temp_dir().join(format!("zpl-scenario-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("label.png");

    render_to_file("^XA^FO0,0^FDhi^FS^XZ", &path, 100, 100, 203).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert!(is_png(&bytes));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn mm_and_inches_conversions_match_the_documented_formulas() {
    // 25.4mm == 1in at any dpi.
    let mm = render_mm("^XA^XZ", 25.4, 25.4, 203).unwrap();
    let inches = render_inches("^XA^XZ", 1.0, 1.0, 203).unwrap();
    assert_eq!(mm.len(), inches.len());
}

#[test]
fn validator_flags_an_unmatched_label_and_unknown_command() {
    let issues = validate("^XA^ZZfoo^FS");
    assert!(!issues.is_empty());
}

#[test]
fn fatal_input_non_positive_canvas_dimensions_is_an_error() {
    assert!(render("^XA^FS^XZ", 0, 100, 203).is_err());
}
