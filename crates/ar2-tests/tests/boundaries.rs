//! Layout variants and malformed inputs at the edges of the format.
//!
//! - **Framing**: missing control words, negative final words, raw
//!   (uncompressed) records and the metadata record policy.
//! - **Pointer table**: a table with no extension pointers, one hidden
//!   extension pointer, and a table whose sentinel never appears.
//! - **Truncation and corruption**: input cut inside each layer, corrupt
//!   bzip2 data and decompression bombs.

use ar2_decoder::{
    Archive2Decoder, Compression, DecodeError, DecoderConfig, MetadataRecordPolicy, decode,
};
use ar2_encoder::{Archive2Encoder, Message, RadialMessage, fixed_message, radial_message};
use ar2_tests::{metadata, moment, radial, radial_header, small_volume, sweep, volume_header};
use ar2_types::{BlockName, Product};
use ar2_wire::{LEGACY_CTM_HEADER_LEN, MESSAGE_BODY_SIZE, MESSAGE_HEADER_SIZE, MessageType};

// ── Framing ───────────────────────────────────────────────────────────────────

#[test]
fn legacy_volume_without_control_words() {
    let framed = decode(&small_volume().encode().unwrap()).unwrap();
    let legacy = decode(&small_volume().legacy(true).encode().unwrap()).unwrap();
    assert_eq!(legacy, framed);
}

#[test]
fn negative_control_word_is_magnitude() {
    let positive = decode(&small_volume().encode().unwrap()).unwrap();
    let negative = decode(&small_volume().negative_final(true).encode().unwrap()).unwrap();
    assert_eq!(negative, positive);
}

#[test]
fn raw_records_decode_like_bzip2_records() {
    let bzip2 = decode(&small_volume().encode().unwrap()).unwrap();
    let raw = decode(&small_volume().compress(false).encode().unwrap()).unwrap();
    assert_eq!(raw, bzip2);
}

#[test]
fn metadata_record_is_parsed_by_default() {
    let volume = decode(&small_volume().encode().unwrap()).unwrap();
    assert_eq!(volume.radar_status.as_ref().unwrap().vcp_number, 215);
    assert_eq!(volume.vcp.as_ref().unwrap().pattern_number, 215);
}

#[test]
fn skip_policy_ignores_record_zero_only() {
    let file = Archive2Encoder::new(volume_header("KTLX"))
        .metadata_record(metadata())
        .record(vec![Message::Status(ar2_tests::status())])
        .radial_record(sweep("KTLX", 1, 1, 2, 0.5))
        .encode()
        .unwrap();
    let decoder = Archive2Decoder::new(
        DecoderConfig::default().with_metadata_record(MetadataRecordPolicy::Skip),
    );
    let volume = decoder.decode(&file).unwrap();
    assert!(volume.vcp.is_none());
    assert!(volume.radar_status.is_some());
    assert_eq!(volume.radial_count(), 2);
}

#[test]
fn unhandled_message_types_are_skipped() {
    let file = Archive2Encoder::new(volume_header("KTLX"))
        .record(vec![
            Message::Raw {
                kind: MessageType::Other(99),
                body: vec![0xAB; 300],
            },
            Message::Raw {
                kind: MessageType::RdaAdaptation,
                body: vec![0xCD; 2404],
            },
            Message::Radial(radial("KTLX", 1, 1, 0.5)),
        ])
        .encode()
        .unwrap();
    assert_eq!(decode(&file).unwrap().radial_count(), 1);
}

#[test]
fn oversized_coverage_pattern_is_skipped() {
    let mut body = vec![0u8; MESSAGE_BODY_SIZE];
    body[6] = 0xFF;
    let file = Archive2Encoder::new(volume_header("KTLX"))
        .record(vec![
            Message::Raw {
                kind: MessageType::VolumeCoverage,
                body,
            },
            Message::Radial(radial("KTLX", 1, 1, 0.5)),
        ])
        .encode()
        .unwrap();
    let volume = decode(&file).unwrap();
    assert_eq!(volume.radial_count(), 1);
    assert!(volume.vcp.is_none());
}

#[test]
fn truncated_coverage_pattern_is_skipped() {
    let mut coverage = Vec::new();
    ar2_tests::coverage().write_to(&mut coverage).unwrap();
    let slot = fixed_message(MessageType::VolumeCoverage, &coverage).unwrap();
    // The record stops two cuts into a four-cut pattern.
    let cut = LEGACY_CTM_HEADER_LEN + MESSAGE_HEADER_SIZE + 22 + 2 * 46;
    let radial = radial_message(&radial("KTLX", 1, 1, 0.5)).unwrap();

    let mut file = Vec::new();
    volume_header("KTLX").write_to(&mut file);
    for payload in [&slot[..cut], &radial[..]] {
        file.extend_from_slice(&i32::try_from(payload.len()).unwrap().to_be_bytes());
        file.extend_from_slice(payload);
    }

    let volume = decode(&file).unwrap();
    assert_eq!(volume.radial_count(), 1);
    assert!(volume.vcp.is_none());
}

// ── Pointer table ─────────────────────────────────────────────────────────────

fn one_radial(msg: RadialMessage) -> Result<ar2_decoder::Volume, DecodeError> {
    let file = Archive2Encoder::new(volume_header("KGRK"))
        .radial_record(vec![msg])
        .encode()
        .unwrap();
    decode(&file)
}

#[test]
fn descriptor_only_radial_needs_no_extension() {
    let volume = one_radial(RadialMessage::new(radial_header("KGRK", 1, 1, 0.5))).unwrap();
    let radial = &volume.scan(1).unwrap()[0];
    assert_eq!(radial.header.data_block_count, 3);
    assert_eq!(radial.data_block_pointers.len(), 3);
    assert!(radial.products().is_empty());
}

#[test]
fn hidden_cfp_pointer_is_followed() {
    let msg = RadialMessage::new(radial_header("KGRK", 1, 1, 0.5))
        .with_moment(moment(Product::Reflectivity, 2.0, 66.0, &[100]))
        .with_moment(moment(Product::ClutterFilterPower, 1.0, 0.0, &[2, 9]))
        .with_hidden_pointers(1);
    let volume = one_radial(msg).unwrap();
    let radial = &volume.scan(1).unwrap()[0];
    assert_eq!(radial.header.data_block_count, 4);
    assert_eq!(radial.data_block_pointers.len(), 5);
    assert_eq!(radial.scaled_data(Product::ClutterFilterPower).unwrap(), vec![2.0, 9.0]);
}

#[test]
fn missing_sentinel_overflows_probe_cap() {
    // Without VOL the first block after the table is not `RVOL`, and the
    // probe walks into moment bytes that never spell it.
    let msg = RadialMessage::new(radial_header("KGRK", 1, 1, 0.5))
        .without_block(BlockName::Volume)
        .with_moment(moment(Product::Velocity, 2.0, 129.0, &[3; 200]));
    let err = one_radial(msg).unwrap_err();
    assert!(matches!(err, DecodeError::PointerTableOverflow { probes: 20, .. }), "{err:?}");
}

#[test]
fn probe_cap_is_configurable() {
    let msg = RadialMessage::new(radial_header("KGRK", 1, 1, 0.5))
        .with_moment(moment(Product::Reflectivity, 2.0, 66.0, &[100]))
        .with_moment(moment(Product::Velocity, 2.0, 129.0, &[100]))
        .with_moment(moment(Product::ClutterFilterPower, 1.0, 0.0, &[2]))
        .with_hidden_pointers(2);
    let file = Archive2Encoder::new(volume_header("KGRK"))
        .radial_record(vec![msg])
        .encode()
        .unwrap();

    assert!(decode(&file).is_ok());
    let strict = Archive2Decoder::new(DecoderConfig::default().with_max_pointer_probes(2));
    assert!(matches!(
        strict.decode(&file),
        Err(DecodeError::PointerTableOverflow { probes: 2, .. })
    ));
}

#[test]
fn missing_elevation_block_is_fatal() {
    let msg =
        RadialMessage::new(radial_header("KGRK", 1, 1, 0.5)).without_block(BlockName::Elevation);
    assert!(matches!(
        one_radial(msg),
        Err(DecodeError::MissingDataBlock {
            name: BlockName::Elevation,
            ..
        })
    ));
}

// ── Truncation and corruption ─────────────────────────────────────────────────

#[test]
fn cut_inside_volume_header() {
    let file = small_volume().encode().unwrap();
    assert!(matches!(decode(&file[..20]), Err(DecodeError::VolumeHeader(_))));
}

#[test]
fn cut_inside_control_word() {
    let file = small_volume().encode().unwrap();
    assert!(matches!(
        decode(&file[..26]),
        Err(DecodeError::Truncated {
            context: "LDM control word",
            offset: 24,
            ..
        })
    ));
}

#[test]
fn cut_inside_record() {
    let file = small_volume().encode().unwrap();
    assert!(matches!(
        decode(&file[..file.len() - 1]),
        Err(DecodeError::Truncated {
            context: "LDM record",
            ..
        })
    ));
}

#[test]
fn corrupt_bzip2_is_fatal() {
    let mut file = small_volume().compress(true).encode().unwrap();
    // Keep the `BZh9` stream header, scramble the first block.
    for byte in &mut file[32..60] {
        *byte ^= 0x5A;
    }
    assert!(matches!(
        decode(&file),
        Err(DecodeError::DecompressFailed {
            format: Compression::Bzip2,
            offset: 28,
            ..
        })
    ));
}

#[test]
fn record_inflating_past_limit_is_a_bomb() {
    let decoder = Archive2Decoder::new(DecoderConfig::default().with_max_record_size(64 * 1024));
    let err = decoder.decode(&small_volume().encode().unwrap()).unwrap_err();
    assert!(matches!(err, DecodeError::DecompressionBomb { limit: 65_536, .. }));
}

#[test]
fn envelope_inflating_past_limit_is_a_bomb() {
    let file = small_volume().gzip(true).encode().unwrap();
    let decoder = Archive2Decoder::new(DecoderConfig::default().with_max_volume_size(1024));
    assert!(matches!(
        decoder.decode(&file),
        Err(DecodeError::DecompressionBomb { limit: 1024, .. })
    ));
}
