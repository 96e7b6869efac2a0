//! Renders a reverse-print field: white text on a black background rectangle.

fn main() {
    let source = "^XA^FO20,20^A0N,40,0^FR^FDDARK^FS^XZ";
    zpl::render_to_file(source, "label.png", 200, 100, 203).expect("render label");
    println!("Wrote label.png");
}
