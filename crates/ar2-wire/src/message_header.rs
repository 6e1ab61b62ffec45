use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::MESSAGE_HEADER_SIZE;
use crate::error::WireError;
use crate::julian::modified_julian_to_utc;
use crate::reader::ByteReader;

/// Message types that the decoder knows by name.
///
/// Unknown values are captured by `Other(u8)` so the framer can log and
/// skip them without losing the raw byte.
///
/// ```text
/// ┌──────┬──────────────────────┬───────────────────────────────────┐
/// │ Wire │ Variant              │ Handling                          │
/// ├──────┼──────────────────────┼───────────────────────────────────┤
/// │ 0    │ Padding              │ skip slot                         │
/// │ 2    │ RdaStatus            │ parse, last writer wins           │
/// │ 3    │ RdaPerformance       │ parse, last writer wins           │
/// │ 5    │ VolumeCoverage       │ parse, last writer wins           │
/// │ 13   │ BypassMap            │ skip slot                         │
/// │ 15   │ ClutterFilterMap     │ skip slot                         │
/// │ 18   │ RdaAdaptation        │ skip slot                         │
/// │ 31   │ DigitalRadarData     │ self-sized radial                 │
/// └──────┴──────────────────────┴───────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum MessageType {
    Padding,
    RdaStatus,
    RdaPerformance,
    VolumeCoverage,
    BypassMap,
    ClutterFilterMap,
    RdaAdaptation,
    DigitalRadarData,
    Other(u8),
}

impl MessageType {
    #[must_use]
    pub fn from_wire_id(id: u8) -> Self {
        match id {
            0 => Self::Padding,
            2 => Self::RdaStatus,
            3 => Self::RdaPerformance,
            5 => Self::VolumeCoverage,
            13 => Self::BypassMap,
            15 => Self::ClutterFilterMap,
            18 => Self::RdaAdaptation,
            31 => Self::DigitalRadarData,
            other => Self::Other(other),
        }
    }

    #[must_use]
    pub fn wire_id(self) -> u8 {
        match self {
            Self::Padding => 0,
            Self::RdaStatus => 2,
            Self::RdaPerformance => 3,
            Self::VolumeCoverage => 5,
            Self::BypassMap => 13,
            Self::ClutterFilterMap => 15,
            Self::RdaAdaptation => 18,
            Self::DigitalRadarData => 31,
            Self::Other(id) => id,
        }
    }
}

/// The 16-byte message header following the legacy CTM bytes.
///
/// ```text
/// ┌────────┬─────────┬──────────────────────────────────────────┐
/// │ Offset │ Size    │ Description                              │
/// ├────────┼─────────┼──────────────────────────────────────────┤
/// │ 0x00   │ 2 bytes │ Message size in halfwords                │
/// │ 0x02   │ 1 byte  │ RDA redundant channel                    │
/// │ 0x03   │ 1 byte  │ Message type                             │
/// │ 0x04   │ 2 bytes │ ID sequence number                       │
/// │ 0x06   │ 2 bytes │ Modified Julian date                     │
/// │ 0x08   │ 4 bytes │ Milliseconds of day                      │
/// │ 0x0C   │ 2 bytes │ Number of message segments               │
/// │ 0x0E   │ 2 bytes │ Message segment number                   │
/// └────────┴─────────┴──────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MessageHeader {
    pub message_size: u16,
    pub redundant_channel: u8,
    pub message_type: u8,
    pub sequence_number: u16,
    pub julian_date: u16,
    pub millis_of_day: u32,
    pub segment_count: u16,
    pub segment_number: u16,
}

impl Default for MessageHeader {
    fn default() -> Self {
        Self {
            message_size: 0,
            redundant_channel: 0,
            message_type: 0,
            sequence_number: 0,
            julian_date: 0,
            millis_of_day: 0,
            segment_count: 1,
            segment_number: 1,
        }
    }
}

impl MessageHeader {
    /// Parse a message header at the cursor.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 16 bytes remain. The
    /// cursor is left untouched in that case.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, WireError> {
        reader.peek_bytes(MESSAGE_HEADER_SIZE)?;
        Ok(Self {
            message_size: reader.read_u16()?,
            redundant_channel: reader.read_u8()?,
            message_type: reader.read_u8()?,
            sequence_number: reader.read_u16()?,
            julian_date: reader.read_u16()?,
            millis_of_day: reader.read_u32()?,
            segment_count: reader.read_u16()?,
            segment_number: reader.read_u16()?,
        })
    }

    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.message_size.to_be_bytes());
        buf.push(self.redundant_channel);
        buf.push(self.message_type);
        buf.extend_from_slice(&self.sequence_number.to_be_bytes());
        buf.extend_from_slice(&self.julian_date.to_be_bytes());
        buf.extend_from_slice(&self.millis_of_day.to_be_bytes());
        buf.extend_from_slice(&self.segment_count.to_be_bytes());
        buf.extend_from_slice(&self.segment_number.to_be_bytes());
    }

    #[must_use]
    pub fn kind(&self) -> MessageType {
        MessageType::from_wire_id(self.message_type)
    }

    /// Declared message size in bytes (the wire field counts halfwords).
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        usize::from(self.message_size) * 2
    }

    #[must_use]
    pub fn date_time(&self) -> Option<DateTime<Utc>> {
        modified_julian_to_utc(i64::from(self.julian_date), i64::from(self.millis_of_day))
    }
}

/// The signed size prefix in front of every LDM record.
///
/// Some producers mark the final record with a negative size; the layout
/// is otherwise identical, so only the magnitude matters. A zero word
/// means the file has no LDM framing at all and the four bytes already
/// belong to the first message's CTM padding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlWord(pub i32);

impl ControlWord {
    pub const SIZE: usize = 4;

    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 4 bytes remain.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, WireError> {
        Ok(Self(reader.read_i32()?))
    }

    /// Absolute record size in bytes.
    #[must_use]
    pub fn record_len(self) -> usize {
        self.0.unsigned_abs() as usize
    }

    /// `true` for files that carry no LDM framing.
    #[must_use]
    pub fn is_legacy(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn is_final(self) -> bool {
        self.0 < 0
    }
}
