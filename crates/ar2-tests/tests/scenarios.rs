//! End-to-end decoding scenarios, each built from encoder fixtures.
//!
//! Every test writes a complete volume (or a single Message 31 where the
//! pointer table itself is under test), decodes it, and checks the
//! observable result.

use ar2_decoder::{Archive2Decoder, DecodeError, decode, parse_message31, read_pointer_table};
use ar2_encoder::{Archive2Encoder, RadialMessage};
use ar2_tests::{historical_volume, metadata, moment, radial, radial_header, volume_header};
use ar2_types::{Product, RadialHeader};
use ar2_wire::ByteReader;

// ── Historical archive ────────────────────────────────────────────────────────

#[test]
fn gzip_archive_with_twelve_radial_records() {
    let file = historical_volume(12);
    assert_eq!(file[..2], [0x1f, 0x8b]);

    let volume = decode(&file).expect("historical volume decodes");
    assert_eq!(volume.header.tape_version(), "AR2V0006.");
    assert_eq!(volume.header.icao().unwrap(), "KCRP");
    assert_eq!(volume.elevations(), vec![1]);

    let scan = volume.scan(1).unwrap();
    assert!(scan.len() >= 1440);
    let first = &scan[0];
    assert!((0.0..360.0).contains(&first.azimuth_angle()));
    assert_eq!(first.header.station().unwrap(), "KCRP");
    assert!(volume.radar_status.is_some());
}

#[test]
fn first_radial_carries_descriptors_and_reflectivity() {
    let volume = decode(&historical_volume(1)).unwrap();
    let first = &volume.scan(1).unwrap()[0];

    assert_eq!(first.products(), vec![Product::Reflectivity]);
    assert_eq!(first.data_block_pointers.len(), 4);
    let reflectivity = first.moment(Product::Reflectivity).unwrap();
    assert_eq!(
        reflectivity.raw().len(),
        reflectivity.gate_count() * usize::from(reflectivity.word_size()) / 8
    );
    assert_eq!(reflectivity.encoded_len(), 28 + reflectivity.raw().len());
}

// ── Extension pointer ─────────────────────────────────────────────────────────

#[test]
fn cfp_pointer_past_declared_count() {
    let mut msg = RadialMessage::new(radial_header("KGRK", 1, 1, 0.5));
    for product in Product::ALL {
        msg = msg.with_moment(moment(product, 2.0, 64.0, &[2, 3, 4]));
    }
    let bytes = msg.with_hidden_pointers(1).to_bytes();

    let mut r = ByteReader::new(&bytes);
    let header = RadialHeader::read_from(&mut r).unwrap();
    assert_eq!(header.data_block_count, 9);
    let table = read_pointer_table(&mut r, header.data_block_count, 20, 0).unwrap();
    assert_eq!(table.pointers.len(), 10);
    assert_eq!(table.probes, 2);

    let radial = parse_message31(&mut ByteReader::new(&bytes), 20).unwrap();
    assert_eq!(radial.products(), Product::ALL.to_vec());
    let cfp = radial.clutter_filter_power.as_ref().unwrap();
    assert_eq!(cfp.scaled_data(), vec![-31.0, -30.5, -30.0]);
}

// ── Moment scaling ────────────────────────────────────────────────────────────

fn single_radial_volume(msg: RadialMessage) -> Result<ar2_decoder::Volume, DecodeError> {
    let file = Archive2Encoder::new(volume_header("KGRK"))
        .metadata_record(metadata())
        .radial_record(vec![msg])
        .encode()
        .unwrap();
    Archive2Decoder::default().decode(&file)
}

#[test]
fn half_scale_reflectivity() {
    let msg = RadialMessage::new(radial_header("KGRK", 1, 1, 0.5))
        .with_moment(moment(Product::Reflectivity, 0.5, 66.0, &[0, 1, 2, 255]));
    let volume = single_radial_volume(msg).unwrap();
    let radial = &volume.scan(1).unwrap()[0];
    assert_eq!(
        radial.scaled_data_by_name("REF").unwrap(),
        vec![999.0, 998.0, -128.0, 378.0]
    );
}

#[test]
fn zero_scale_stores_values() {
    let msg = RadialMessage::new(radial_header("KGRK", 1, 1, 0.5))
        .with_moment(moment(Product::SpectrumWidth, 0.0, 0.0, &[0, 1, 5]));
    let volume = single_radial_volume(msg).unwrap();
    let radial = &volume.scan(1).unwrap()[0];
    assert_eq!(radial.scaled_data_by_name("SW ").unwrap(), vec![999.0, 998.0, 5.0]);
    assert_eq!(radial.scaled_data_by_name("SW").unwrap(), vec![999.0, 998.0, 5.0]);
}

// ── Corruption ────────────────────────────────────────────────────────────────

#[test]
fn unknown_block_name_discards_volume() {
    let corrupt = radial("KGRK", 1, 2, 0.5).with_extra_block(b"XXXXjunk".to_vec());
    let file = Archive2Encoder::new(volume_header("KGRK"))
        .radial_record(vec![radial("KGRK", 1, 1, 0.5), corrupt])
        .encode()
        .unwrap();

    let err = decode(&file).unwrap_err();
    match err {
        DecodeError::UnknownDataBlockName { name, .. } => assert_eq!(name, "XXXX"),
        other => panic!("expected UnknownDataBlockName, got {other:?}"),
    }
}
