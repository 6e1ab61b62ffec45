use ar2_types::{RadarPerformance, RadarStatus, VolumeCoveragePattern};
use ar2_wire::{
    DEFAULT_MESSAGE_SIZE, LEGACY_CTM_HEADER_LEN, MESSAGE_BODY_SIZE, MESSAGE_HEADER_SIZE,
    MessageHeader, MessageType,
};

use crate::error::EncodeError;
use crate::radial::RadialMessage;

/// One message of an LDM record.
#[derive(Clone, Debug)]
pub enum Message {
    Status(RadarStatus),
    Performance(RadarPerformance),
    Coverage(VolumeCoveragePattern),
    /// Arbitrary body bytes under the given type. Written self-sized for
    /// [`MessageType::DigitalRadarData`], in a fixed slot otherwise.
    Raw { kind: MessageType, body: Vec<u8> },
    Radial(RadialMessage),
}

impl Message {
    /// Serialize the message, CTM bytes and header included.
    ///
    /// # Errors
    ///
    /// [`EncodeError::MessageTooLarge`] if a fixed-slot body does not fit
    /// its slot, [`EncodeError::Type`] for an oversized coverage pattern.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        match self {
            Self::Status(status) => {
                let mut body = Vec::with_capacity(RadarStatus::SIZE);
                status.write_to(&mut body);
                fixed_message(MessageType::RdaStatus, &body)
            }
            Self::Performance(performance) => {
                fixed_message(MessageType::RdaPerformance, performance.as_bytes())
            }
            Self::Coverage(vcp) => {
                let mut body = Vec::new();
                vcp.write_to(&mut body)?;
                fixed_message(MessageType::VolumeCoverage, &body)
            }
            Self::Raw {
                kind: MessageType::DigitalRadarData,
                body,
            } => Ok(self_sized(MessageType::DigitalRadarData, body)),
            Self::Raw { kind, body } => fixed_message(*kind, body),
            Self::Radial(radial) => radial_message(radial),
        }
    }
}

/// A fixed-slot message: 12 CTM bytes, the header, then `body` zero-padded
/// to fill the 2432-byte slot.
///
/// # Errors
///
/// [`EncodeError::MessageTooLarge`] if `body` is longer than 2404 bytes.
pub fn fixed_message(kind: MessageType, body: &[u8]) -> Result<Vec<u8>, EncodeError> {
    if body.len() > MESSAGE_BODY_SIZE {
        return Err(EncodeError::MessageTooLarge {
            size: body.len(),
            max: MESSAGE_BODY_SIZE,
        });
    }
    let mut buf = self_sized(kind, body);
    buf.resize(DEFAULT_MESSAGE_SIZE, 0);
    Ok(buf)
}

/// A Message 31: 12 CTM bytes, the header, then the radial itself with no
/// padding.
///
/// # Errors
///
/// Infallible today; returns `Result` to match [`fixed_message`].
#[allow(clippy::unnecessary_wraps)]
pub fn radial_message(radial: &RadialMessage) -> Result<Vec<u8>, EncodeError> {
    Ok(self_sized(MessageType::DigitalRadarData, &radial.to_bytes()))
}

fn self_sized(kind: MessageType, body: &[u8]) -> Vec<u8> {
    let halfwords = (MESSAGE_HEADER_SIZE + body.len()).div_ceil(2);
    let header = MessageHeader {
        message_size: u16::try_from(halfwords).unwrap_or(u16::MAX),
        message_type: kind.wire_id(),
        ..MessageHeader::default()
    };
    let mut buf = Vec::with_capacity(LEGACY_CTM_HEADER_LEN + MESSAGE_HEADER_SIZE + body.len());
    buf.resize(LEGACY_CTM_HEADER_LEN, 0);
    header.write_to(&mut buf);
    buf.extend_from_slice(body);
    buf
}
