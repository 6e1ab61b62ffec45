use ar2_wire::{ARCHIVE2_METADATA_RECORD_LEN, DEFAULT_MESSAGE_SIZE, MessageType, VolumeHeader};

use crate::compression;
use crate::error::EncodeError;
use crate::message::Message;
use crate::radial::RadialMessage;

/// Messages in a full metadata record.
const METADATA_MESSAGES: usize = ARCHIVE2_METADATA_RECORD_LEN / DEFAULT_MESSAGE_SIZE;

/// Archive II writer, the inverse of the decoder.
///
/// Records are added in order with [`metadata_record`](Self::metadata_record),
/// [`radial_record`](Self::radial_record) and [`record`](Self::record); the
/// remaining methods pick one of the layouts found in archived volumes.
///
/// ```text
/// ┌──────────────────┬──────────┬────────────────┬──────────┬─────
/// │ volume header 24 │ int32 C₀ │ bzip2(record₀) │ int32 C₁ │ ...
/// └──────────────────┴──────────┴────────────────┴──────────┴─────
/// ```
///
/// - [`compress(false)`](Self::compress): records are stored raw, still
///   framed by their control words.
/// - [`legacy(true)`](Self::legacy): no control words and no compression;
///   every message follows the volume header directly.
/// - [`negative_final(true)`](Self::negative_final): the last control word
///   is written negated.
/// - [`gzip(true)`](Self::gzip): the finished volume is wrapped in a gzip
///   stream.
///
/// # Usage
///
/// ```rust
/// use ar2_encoder::{Archive2Encoder, RadialMessage};
/// use ar2_types::RadialHeader;
/// use ar2_wire::VolumeHeader;
///
/// let radial = RadialMessage::new(RadialHeader { elevation_number: 1, ..RadialHeader::default() });
/// let file = Archive2Encoder::new(VolumeHeader::new("AR2V0006.001", "KTLX", 18_890, 0))
///     .metadata_record(vec![])
///     .radial_record(vec![radial])
///     .encode()
///     .unwrap();
/// assert_eq!(&file[..9], b"AR2V0006.");
/// ```
#[derive(Clone, Debug)]
pub struct Archive2Encoder {
    header: VolumeHeader,
    records: Vec<Vec<Message>>,
    compress: bool,
    legacy: bool,
    negative_final: bool,
    gzip: bool,
}

impl Archive2Encoder {
    #[must_use]
    pub fn new(header: VolumeHeader) -> Self {
        Self {
            header,
            records: Vec::new(),
            compress: true,
            legacy: false,
            negative_final: false,
            gzip: false,
        }
    }

    /// Add a metadata record: `messages`, then padding slots up to the
    /// 134 messages the radar always writes.
    #[must_use]
    pub fn metadata_record(mut self, mut messages: Vec<Message>) -> Self {
        while messages.len() < METADATA_MESSAGES {
            messages.push(Message::Raw {
                kind: MessageType::Padding,
                body: Vec::new(),
            });
        }
        self.records.push(messages);
        self
    }

    /// Add a record of Message 31 radials.
    #[must_use]
    pub fn radial_record(mut self, radials: Vec<RadialMessage>) -> Self {
        self.records.push(radials.into_iter().map(Message::Radial).collect());
        self
    }

    /// Add a record of arbitrary messages, written as given.
    #[must_use]
    pub fn record(mut self, messages: Vec<Message>) -> Self {
        self.records.push(messages);
        self
    }

    /// bzip2-compress each record. On by default.
    #[must_use]
    pub fn compress(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    #[must_use]
    pub fn legacy(mut self, enabled: bool) -> Self {
        self.legacy = enabled;
        self
    }

    #[must_use]
    pub fn negative_final(mut self, enabled: bool) -> Self {
        self.negative_final = enabled;
        self
    }

    #[must_use]
    pub fn gzip(mut self, enabled: bool) -> Self {
        self.gzip = enabled;
        self
    }

    /// Serialize the volume.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::EmptyRecord`] for an uncompressed framed record with
    ///   no messages.
    /// - [`EncodeError::RecordTooLarge`] if a record exceeds `i32::MAX`
    ///   bytes.
    /// - [`EncodeError::MessageTooLarge`] / [`EncodeError::Type`] from the
    ///   messages themselves.
    /// - [`EncodeError::Io`] from the compressors.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let mut buf = Vec::new();
        self.header.write_to(&mut buf);

        let last = self.records.len().saturating_sub(1);
        for (index, record) in self.records.iter().enumerate() {
            let mut messages = Vec::new();
            for message in record {
                messages.extend(message.to_bytes()?);
            }

            if self.legacy {
                buf.extend(messages);
                continue;
            }

            let payload = if self.compress {
                compression::bzip2(&messages)?
            } else if messages.is_empty() {
                return Err(EncodeError::EmptyRecord { index });
            } else {
                messages
            };
            let len = i32::try_from(payload.len())
                .map_err(|_| EncodeError::RecordTooLarge { size: payload.len() })?;
            let word = if self.negative_final && index == last { -len } else { len };
            buf.extend_from_slice(&word.to_be_bytes());
            buf.extend(payload);
        }

        if self.gzip {
            return Ok(compression::gzip(&buf)?);
        }
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use ar2_decoder::Archive2Decoder;
    use ar2_types::{DataMoment, MomentHeader, Product, RadarStatus, RadialHeader};
    use ar2_wire::volume_header::VOLUME_HEADER_SIZE;
    use ar2_wire::{BZIP2_MAGIC, ByteReader, ControlWord, GZIP_MAGIC, LEGACY_CTM_HEADER_LEN};

    use super::*;

    fn header() -> VolumeHeader {
        VolumeHeader::new("AR2V0006.007", "KTLX", 18_890, 60_000)
    }

    fn radials(elevation: u8, count: u16) -> Vec<RadialMessage> {
        (1..=count)
            .map(|azimuth| {
                let header = MomentHeader::new(Product::Velocity, 0);
                let moment = DataMoment::from_codes(header, &[10, 20, 30]).unwrap();
                RadialMessage::new(RadialHeader {
                    elevation_number: elevation,
                    azimuth_number: azimuth,
                    ..RadialHeader::default()
                })
                .with_moment(moment)
            })
            .collect()
    }

    fn control_words(file: &[u8]) -> Vec<i32> {
        let mut r = ByteReader::new(file);
        r.skip(VOLUME_HEADER_SIZE);
        let mut words = Vec::new();
        while !r.is_exhausted() {
            let word = ControlWord::read_from(&mut r).unwrap();
            r.skip(word.record_len());
            words.push(word.0);
        }
        words
    }

    #[test]
    fn metadata_record_is_padded() {
        let file = Archive2Encoder::new(header())
            .compress(false)
            .metadata_record(vec![Message::Status(RadarStatus::default())])
            .encode()
            .unwrap();
        assert_eq!(control_words(&file), vec![ARCHIVE2_METADATA_RECORD_LEN as i32]);
        assert_eq!(file.len(), VOLUME_HEADER_SIZE + 4 + ARCHIVE2_METADATA_RECORD_LEN);
    }

    #[test]
    fn records_are_bzip2_framed() {
        let file = Archive2Encoder::new(header())
            .radial_record(radials(1, 2))
            .radial_record(radials(2, 2))
            .negative_final(true)
            .encode()
            .unwrap();
        let words = control_words(&file);
        assert_eq!(words.len(), 2);
        assert!(words[0] > 0);
        assert!(words[1] < 0);
        let first_payload = VOLUME_HEADER_SIZE + 4;
        assert_eq!(file[first_payload..first_payload + 2], BZIP2_MAGIC);

        let volume = Archive2Decoder::default().decode(&file).unwrap();
        assert_eq!(volume.elevations(), vec![1, 2]);
        assert_eq!(volume.radial_count(), 4);
    }

    #[test]
    fn legacy_layout_has_no_control_words() {
        let file = Archive2Encoder::new(header())
            .legacy(true)
            .radial_record(radials(1, 3))
            .encode()
            .unwrap();
        assert!(file[VOLUME_HEADER_SIZE..VOLUME_HEADER_SIZE + LEGACY_CTM_HEADER_LEN]
            .iter()
            .all(|&b| b == 0));
        let volume = Archive2Decoder::default().decode(&file).unwrap();
        assert_eq!(volume.scan(1).map(<[_]>::len), Some(3));
    }

    #[test]
    fn gzip_wraps_whole_volume() {
        let file = Archive2Encoder::new(header())
            .radial_record(radials(1, 1))
            .gzip(true)
            .encode()
            .unwrap();
        assert_eq!(file[..2], GZIP_MAGIC);
        assert_eq!(Archive2Decoder::default().decode(&file).unwrap().header, header());
    }

    #[test]
    fn empty_uncompressed_record_is_rejected() {
        let err = Archive2Encoder::new(header())
            .compress(false)
            .radial_record(radials(1, 1))
            .record(vec![])
            .encode()
            .unwrap_err();
        assert!(matches!(err, EncodeError::EmptyRecord { index: 1 }));
    }

    #[test]
    fn empty_compressed_record_is_allowed() {
        let file = Archive2Encoder::new(header()).record(vec![]).encode().unwrap();
        assert_eq!(control_words(&file).len(), 1);
        assert_eq!(Archive2Decoder::default().decode(&file).unwrap().radial_count(), 0);
    }
}
