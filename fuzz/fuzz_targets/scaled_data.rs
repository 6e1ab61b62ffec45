#![no_main]

use ar2_types::{DataMoment, MomentHeader, Product};
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzMoment {
    product_id: u8,
    wide: bool,
    scale: f32,
    offset: f32,
    codes: Vec<u16>,
}

// Fuzz target: gate scaling.
//
// Codes 0 and 1 must always map to the 999.0 / 998.0 sentinels, and the
// output length must equal the gate count whatever the scale.
fuzz_target!(|input: FuzzMoment| {
    let product = Product::ALL[usize::from(input.product_id) % Product::ALL.len()];
    let header = MomentHeader {
        word_size: if input.wide { 16 } else { 8 },
        scale: input.scale,
        offset: input.offset,
        ..MomentHeader::new(product, 0)
    };
    let moment = DataMoment::from_codes(header, &input.codes).unwrap();
    let scaled = moment.scaled_data();
    assert_eq!(scaled.len(), moment.gate_count());

    for (code, value) in moment.codes().zip(&scaled) {
        match code {
            0 => assert_eq!(*value, 999.0),
            1 => assert_eq!(*value, 998.0),
            _ => {}
        }
    }
});
