//! A shipping-label-shaped example: logo box, address block, and a Code 128
//! barcode. Installs a `tracing-subscriber` fmt layer so the interpreter's
//! `warn`/`debug` events are visible (`RUST_LOG=debug cargo run --example ...`).

fn main() {
    tracing_subscriber::fmt::init();

    let source = concat!(
        "^XA",
        "^LH20,20",
        "^FO0,0^GB380,200,3^FS",
        "^FO20,20^A0N,28,28^FDACME Fulfillment^FS",
        "^FO20,60^A0N,18,18^FB340,3,0,L^FD123 Warehouse Way\\&Springfield\\&ships daily^FS",
        "^FO20,140^BY2,3,60^BCN,60,Y,N,N^FD1234567890^FS",
        "^XZ",
    );

    zpl::render_to_file(source, "label.png", 420, 220, 203).expect("render label");
    println!("Wrote label.png");
}
