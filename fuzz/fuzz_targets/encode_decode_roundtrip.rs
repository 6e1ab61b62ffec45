#![no_main]

use ar2_encoder::{Archive2Encoder, RadialMessage};
use ar2_types::{DataMoment, MomentHeader, Product, RadialHeader};
use ar2_wire::VolumeHeader;
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FuzzRadial {
    elevation: u8,
    azimuth: u16,
    products: u8,
    codes: Vec<u8>,
    hidden: bool,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    records: Vec<Vec<FuzzRadial>>,
    gzip: bool,
    legacy: bool,
    negative_final: bool,
}

// Fuzz target: encode -> decode roundtrip.
//
// Builds volumes from arbitrary radials in every layout the encoder
// supports and checks that the decoder recovers each radial in order.
fuzz_target!(|input: FuzzInput| {
    let mut encoder = Archive2Encoder::new(VolumeHeader::new("AR2V0006.001", "KFUZ", 18_890, 0))
        .gzip(input.gzip)
        .legacy(input.legacy)
        .negative_final(input.negative_final);

    let mut expected = 0;
    for record in &input.records {
        let mut radials = Vec::new();
        for r in record {
            let mut msg = RadialMessage::new(RadialHeader {
                elevation_number: r.elevation,
                azimuth_number: r.azimuth,
                ..RadialHeader::default()
            });
            let codes: Vec<u16> = r.codes.iter().map(|&c| u16::from(c)).collect();
            let mut count = 0;
            for (bit, product) in Product::ALL.into_iter().enumerate() {
                if r.products & (1 << bit) != 0 {
                    let moment =
                        DataMoment::from_codes(MomentHeader::new(product, 0), &codes).unwrap();
                    msg = msg.with_moment(moment);
                    count += 1;
                }
            }
            if r.hidden && count > 0 {
                msg = msg.with_hidden_pointers(1);
            }
            radials.push(msg);
        }
        expected += radials.len();
        encoder = encoder.radial_record(radials);
    }

    // Inputs the encoder rejects say nothing about the decoder.
    let Ok(file) = encoder.encode() else {
        return;
    };
    let volume = ar2_decoder::decode(&file).unwrap();
    assert_eq!(volume.radial_count(), expected);
});
