//! Shared fixture builders for the integration tests and benches.
//!
//! Every volume here is produced by [`Archive2Encoder`] from typed
//! messages, so the tests never depend on downloaded radar files. The
//! shapes mirror what the radar writes: a 134-message metadata record
//! first, then bzip2 records of 120 radials each.

#![allow(clippy::pedantic)]

use ar2_encoder::{Archive2Encoder, Message, RadialMessage};
use ar2_types::{
    DataMoment, ElevationCut, MomentHeader, Product, RadarStatus, RadialData, RadialHeader,
    VolumeCoveragePattern, VolumeData,
};
use ar2_wire::VolumeHeader;

/// Radials per LDM record, as written by the RDA.
pub const RADIALS_PER_RECORD: u16 = 120;

/// 2021-09-19 00:02:49 UTC.
pub fn volume_header(icao: &str) -> VolumeHeader {
    VolumeHeader::new("AR2V0006.123", icao, 18_890, 169_000)
}

pub fn status() -> RadarStatus {
    RadarStatus {
        rda_status: 16,
        operability_status: 2,
        vcp_number: 215,
        rda_build: 1900,
        ..RadarStatus::default()
    }
}

/// VCP 215's lowest cuts, angles as binary angle codes.
pub fn coverage() -> VolumeCoveragePattern {
    let cut = |elevation_angle| ElevationCut {
        elevation_angle,
        ..ElevationCut::default()
    };
    VolumeCoveragePattern {
        message_size: 1_185,
        pattern_type: 2,
        pattern_number: 215,
        doppler_velocity_resolution: 2,
        elevation_cuts: vec![cut(91), cut(91), cut(164), cut(273)],
        ..VolumeCoveragePattern::default()
    }
}

/// The usual metadata record: status and coverage pattern, then padding.
pub fn metadata() -> Vec<Message> {
    vec![Message::Status(status()), Message::Coverage(coverage())]
}

/// A moment with the given scaling and 8-bit codes.
pub fn moment(product: Product, scale: f32, offset: f32, codes: &[u16]) -> DataMoment {
    let header = MomentHeader {
        scale,
        offset,
        first_gate_range: 2_125,
        gate_spacing: 250,
        ..MomentHeader::new(product, 0)
    };
    DataMoment::from_codes(header, codes).expect("8-bit moment")
}

/// A reflectivity moment with the operational scale and offset.
pub fn reflectivity(codes: &[u16]) -> DataMoment {
    moment(Product::Reflectivity, 2.0, 66.0, codes)
}

/// A radial header at `azimuth_number`, spaced half a degree apart.
pub fn radial_header(
    icao: &str,
    elevation: u8,
    azimuth_number: u16,
    elevation_angle: f32,
) -> RadialHeader {
    let mut radar_identifier = [b' '; 4];
    for (slot, byte) in radar_identifier.iter_mut().zip(icao.bytes()) {
        *slot = byte;
    }
    RadialHeader {
        radar_identifier,
        collection_time: 169_000 + u32::from(azimuth_number) * 20,
        collection_date: 18_890,
        azimuth_number,
        azimuth_angle: (f32::from(azimuth_number) - 0.75) * 0.5 % 360.0,
        azimuth_resolution_spacing: 1,
        radial_status: if azimuth_number == 1 { 0 } else { 1 },
        elevation_number: elevation,
        elevation_angle,
        ..RadialHeader::default()
    }
}

/// One reflectivity-only radial with site descriptors filled in.
pub fn radial(
    icao: &str,
    elevation: u8,
    azimuth_number: u16,
    elevation_angle: f32,
) -> RadialMessage {
    let codes: Vec<u16> = (0..64u16).map(|g| (g * 7 + azimuth_number) % 256).collect();
    RadialMessage::new(radial_header(icao, elevation, azimuth_number, elevation_angle))
        .with_volume(site())
        .with_radial(RadialData {
            unambiguous_range: 4_660,
            nyquist_velocity: 2_850,
            ..RadialData::default()
        })
        .with_moment(reflectivity(&codes))
}

pub fn site() -> VolumeData {
    VolumeData {
        latitude: 35.333,
        longitude: -97.278,
        site_height: 370,
        feedhorn_height: 20,
        vcp_number: 215,
        ..VolumeData::default()
    }
}

/// `count` consecutive radials of one elevation.
pub fn sweep(
    icao: &str,
    elevation: u8,
    first_azimuth: u16,
    count: u16,
    angle: f32,
) -> Vec<RadialMessage> {
    (first_azimuth..first_azimuth + count)
        .map(|az| radial(icao, elevation, az, angle))
        .collect()
}

/// A gzip-wrapped volume laid out like historical archives: metadata
/// record, then `records` bzip2 records of 120 elevation-1 radials.
pub fn historical_volume(records: u16) -> Vec<u8> {
    let mut encoder = Archive2Encoder::new(volume_header("KCRP"))
        .metadata_record(metadata())
        .gzip(true);
    for r in 0..records {
        let first = 1 + r * RADIALS_PER_RECORD;
        encoder = encoder.radial_record(sweep("KCRP", 1, first, RADIALS_PER_RECORD, 0.48));
    }
    encoder.encode().expect("historical volume")
}

/// A small two-elevation volume without envelope.
pub fn small_volume() -> Archive2Encoder {
    Archive2Encoder::new(volume_header("KTLX"))
        .metadata_record(metadata())
        .radial_record(sweep("KTLX", 1, 1, 3, 0.5))
        .radial_record(sweep("KTLX", 2, 1, 2, 1.5))
}
