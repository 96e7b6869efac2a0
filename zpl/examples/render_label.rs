//! Renders a minimal two-line label and writes it next to the workspace root.

fn main() {
    let source = "^XA^FO50,50^A0N,30,20^FDHello World^FS^FO50,100^FDSecond Line^FS^XZ";
    zpl::render_to_file(source, "label.png", 600, 300, 203).expect("render label");
    println!("Wrote label.png");
}
