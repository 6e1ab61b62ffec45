use std::fmt;

use ar2_types::{RadarPerformance, RadarStatus, VolumeCoveragePattern};
use ar2_wire::{
    ByteReader, LEGACY_CTM_HEADER_LEN, MESSAGE_BODY_SIZE, MESSAGE_HEADER_SIZE, MessageHeader,
    MessageType,
};

use crate::error::DecodeError;
use crate::message31::{parse_message31, product_list};
use crate::volume::Volume;

/// Per-record message tally, reported at trace level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MessageCounts {
    pub radials: usize,
    pub status: usize,
    pub performance: usize,
    pub coverage: usize,
    pub skipped: usize,
}

impl fmt::Display for MessageCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} radial, {} status, {} performance, {} coverage, {} skipped",
            self.radials, self.status, self.performance, self.coverage, self.skipped
        )
    }
}

/// Walk the messages of one inflated LDM record and fold them into
/// `volume`.
///
/// Each message is 12 zeroed CTM bytes, a 16-byte [`MessageHeader`] and a
/// body. Every type except 31 owns a fixed 2432-byte slot whatever its
/// declared size; Message 31 is as long as its data blocks. The record
/// ends cleanly when no bytes are left where a message would start (or
/// only its CTM bytes remain).
///
/// A Message 5 that does not parse is logged and skipped; the volume keeps
/// whatever coverage pattern it already had.
///
/// # Errors
///
/// [`DecodeError::Truncated`] for a partial message header or body, and
/// any error of [`parse_message31`].
pub fn parse_messages(
    payload: &[u8],
    volume: &mut Volume,
    max_pointer_probes: usize,
) -> Result<MessageCounts, DecodeError> {
    let mut reader = ByteReader::new(payload);
    let mut counts = MessageCounts::default();

    loop {
        if reader.remaining() == 0 {
            break;
        }
        reader.skip(LEGACY_CTM_HEADER_LEN);
        if reader.remaining() == 0 {
            break;
        }

        let at = reader.position();
        let header = MessageHeader::read_from(&mut reader)
            .map_err(DecodeError::truncated("message header", at))?;
        let body_start = at + MESSAGE_HEADER_SIZE;
        let slot_end = body_start + MESSAGE_BODY_SIZE;

        match header.kind() {
            MessageType::DigitalRadarData => {
                let radial = parse_message31(&mut reader, max_pointer_probes)?;
                log::trace!(
                    "{} az#{} {:.3}° elev#{} {:.2}° status {:?} [{}]",
                    String::from_utf8_lossy(&radial.header.radar_identifier),
                    radial.header.azimuth_number,
                    radial.azimuth_angle(),
                    radial.elevation_number(),
                    radial.elevation_angle(),
                    radial.header.radial_status(),
                    product_list(&radial),
                );
                volume.push_radial(radial);
                counts.radials += 1;
                continue;
            }
            MessageType::RdaStatus => {
                let status = RadarStatus::read_from(&mut reader)
                    .map_err(DecodeError::truncated("RDA status message", body_start))?;
                volume.radar_status = Some(status);
                counts.status += 1;
            }
            MessageType::RdaPerformance => {
                let performance = RadarPerformance::read_from(&mut reader)
                    .map_err(DecodeError::truncated("RDA performance message", body_start))?;
                volume.radar_performance = Some(performance);
                counts.performance += 1;
            }
            MessageType::VolumeCoverage => match VolumeCoveragePattern::read_from(&mut reader) {
                Ok(vcp) => {
                    volume.vcp = Some(vcp);
                    counts.coverage += 1;
                }
                Err(e) => {
                    log::warn!("skipping volume coverage pattern at offset {at}: {e}");
                    counts.skipped += 1;
                }
            },
            MessageType::Padding
            | MessageType::BypassMap
            | MessageType::ClutterFilterMap
            | MessageType::RdaAdaptation => counts.skipped += 1,
            MessageType::Other(id) => {
                log::debug!("skipping unhandled message type {id} at offset {at}");
                counts.skipped += 1;
            }
        }

        // Fixed-slot message: jump to the end of its slot even when the
        // record ends first.
        reader.skip(slot_end.saturating_sub(reader.position()));
    }

    Ok(counts)
}
