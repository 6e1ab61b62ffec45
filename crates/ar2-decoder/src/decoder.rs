use std::io::Read;
use std::time::Instant;

use ar2_wire::{ByteReader, VolumeHeader};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::config::{DecoderConfig, MetadataRecordPolicy};
use crate::decompression::{self, Compression};
use crate::error::DecodeError;
use crate::message::parse_messages;
use crate::record::RecordFramer;
use crate::volume::Volume;

/// Archive II volume decoder.
///
/// Decoding is a straight pipeline over an in-memory buffer:
///
///   1. **Envelope**: a leading gzip (or bzip2) magic inflates the whole
///      input first, bounded by `max_volume_size`.
///   2. **Volume header**: the first 24 bytes.
///   3. **LDM records**: signed control word, then `|C|` bytes, each
///      bzip2 payload inflated into its own buffer (bounded by
///      `max_record_size`). A zero first word selects the unframed layout.
///   4. **Messages**: 12 CTM bytes, a 16-byte header, then a fixed
///      2432-byte slot or a self-sized Message 31.
///   5. **Aggregation**: radials appended per elevation; status,
///      performance and coverage pattern are last-writer-wins.
///
/// Any error discards the volume under construction.
///
/// # Example
///
/// ```rust
/// use ar2_decoder::Archive2Decoder;
/// use ar2_encoder::{Archive2Encoder, RadialMessage};
/// use ar2_types::{DataMoment, MomentHeader, Product, RadialHeader};
/// use ar2_wire::VolumeHeader;
///
/// let moment = DataMoment::from_codes(MomentHeader::new(Product::Reflectivity, 0), &[0, 1, 40]).unwrap();
/// let radial = RadialMessage::new(RadialHeader { elevation_number: 1, ..RadialHeader::default() })
///     .with_moment(moment);
/// let file = Archive2Encoder::new(VolumeHeader::new("AR2V0006.001", "KCRP", 18_890, 0))
///     .radial_record(vec![radial])
///     .encode()
///     .unwrap();
///
/// let volume = Archive2Decoder::default().decode(&file).unwrap();
/// assert_eq!(volume.elevations(), vec![1]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Archive2Decoder {
    config: DecoderConfig,
}

impl Archive2Decoder {
    #[must_use]
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decode a complete volume held in memory.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::VolumeHeader`] if fewer than 24 bytes remain after
    ///   the envelope.
    /// - [`DecodeError::Truncated`] if the input ends inside a control
    ///   word, a record, a message header or a data block.
    /// - [`DecodeError::DecompressFailed`] /
    ///   [`DecodeError::DecompressionBomb`] from either compression layer.
    /// - Any Message 31 error: [`DecodeError::UnknownDataBlockName`],
    ///   [`DecodeError::PointerTableOverflow`],
    ///   [`DecodeError::DuplicateDataBlock`],
    ///   [`DecodeError::MissingDataBlock`],
    ///   [`DecodeError::PointerOutOfBounds`], [`DecodeError::Type`].
    pub fn decode(&self, input: &[u8]) -> Result<Volume, DecodeError> {
        let started = Instant::now();

        let envelope = Compression::detect(input);
        let data = decompression::inflate(input, 0, self.config.max_volume_size)?;
        if envelope != Compression::Uncompressed {
            log::debug!("{envelope} envelope: {} -> {} bytes", input.len(), data.len());
        }

        let mut reader = ByteReader::new(&data);
        let header = VolumeHeader::read_from(&mut reader).map_err(DecodeError::VolumeHeader)?;
        log::debug!(
            "volume {} from {} at {:?}",
            header.filename(),
            String::from_utf8_lossy(&header.icao),
            header.date_time()
        );

        let mut volume = Volume::new(header);
        let mut framer = RecordFramer::new(reader);
        while let Some(record) = framer.next_record()? {
            if record.index == 0
                && !record.is_legacy()
                && self.config.metadata_record == MetadataRecordPolicy::Skip
            {
                log::trace!("skipping metadata record ({} bytes)", record.payload.len());
                continue;
            }

            let messages = record.messages(self.config.max_record_size)?;
            let counts = parse_messages(&messages, &mut volume, self.config.max_pointer_probes())?;
            log::trace!(
                "LDM record {} (control word {}, {}, {} -> {} bytes): {counts}",
                record.index,
                record.control_word.0,
                record.compression(),
                record.payload.len(),
                messages.len(),
            );
        }

        log::debug!(
            "decoded {} radials in {} elevations in {:?}",
            volume.radial_count(),
            volume.elevation_scans.len(),
            started.elapsed()
        );
        Ok(volume)
    }

    /// Read `reader` to the end, then decode.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Io`] from the reader,
    /// [`DecodeError::InputTooLarge`] past `max_volume_size`, and
    /// everything [`decode`](Self::decode) returns.
    pub fn decode_reader<R: Read>(&self, reader: R) -> Result<Volume, DecodeError> {
        let mut buf = Vec::new();
        reader.take(self.read_cap()).read_to_end(&mut buf)?;
        self.check_input_len(&buf)?;
        self.decode(&buf)
    }

    /// Async counterpart of [`decode_reader`](Self::decode_reader).
    ///
    /// Only the read is asynchronous; the volume is still decoded in one
    /// synchronous pass once all bytes have arrived.
    ///
    /// # Errors
    ///
    /// Same as [`decode_reader`](Self::decode_reader).
    pub async fn decode_async<R: AsyncRead + Unpin>(
        &self,
        reader: R,
    ) -> Result<Volume, DecodeError> {
        let mut buf = Vec::new();
        reader.take(self.read_cap()).read_to_end(&mut buf).await?;
        self.check_input_len(&buf)?;
        self.decode(&buf)
    }

    fn read_cap(&self) -> u64 {
        u64::try_from(self.config.max_volume_size)
            .unwrap_or(u64::MAX)
            .saturating_add(1)
    }

    fn check_input_len(&self, buf: &[u8]) -> Result<(), DecodeError> {
        if buf.len() > self.config.max_volume_size {
            return Err(DecodeError::InputTooLarge {
                limit: self.config.max_volume_size,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ar2_encoder::{Archive2Encoder, Message, RadialMessage};
    use ar2_types::{DataMoment, MomentHeader, Product, RadarStatus, RadialHeader};

    use super::*;

    fn header() -> VolumeHeader {
        VolumeHeader::new("AR2V0006.042", "KCRP", 18_890, 169_000)
    }

    fn radial(elevation: u8, azimuth: u16) -> RadialMessage {
        let moment =
            DataMoment::from_codes(MomentHeader::new(Product::Reflectivity, 0), &[2, 3, 4, 5])
                .unwrap();
        RadialMessage::new(RadialHeader {
            radar_identifier: *b"KCRP",
            elevation_number: elevation,
            azimuth_number: azimuth,
            azimuth_angle: f32::from(azimuth) - 0.5,
            elevation_angle: 0.5,
            ..RadialHeader::default()
        })
        .with_moment(moment)
    }

    fn encoder() -> Archive2Encoder {
        Archive2Encoder::new(header())
            .metadata_record(vec![Message::Status(RadarStatus {
                rda_status: 16,
                operability_status: 2,
                vcp_number: 215,
                rda_build: 1900,
                ..RadarStatus::default()
            })])
            .radial_record((1..=3).map(|az| radial(1, az)).collect())
            .radial_record((1..=2).map(|az| radial(2, az)).collect())
    }

    #[test]
    fn decodes_framed_volume() {
        let file = encoder().encode().unwrap();
        let volume = Archive2Decoder::default().decode(&file).unwrap();

        assert_eq!(volume.header, header());
        assert_eq!(volume.elevations(), vec![1, 2]);
        assert_eq!(volume.scan(1).unwrap().len(), 3);
        assert_eq!(volume.scan(2).unwrap().len(), 2);
        assert_eq!(volume.radar_status.as_ref().unwrap().vcp_number, 215);
    }

    #[test]
    fn skip_policy_drops_metadata() {
        let file = encoder().encode().unwrap();
        let decoder = Archive2Decoder::new(
            DecoderConfig::default().with_metadata_record(MetadataRecordPolicy::Skip),
        );
        let volume = decoder.decode(&file).unwrap();
        assert!(volume.radar_status.is_none());
        assert_eq!(volume.radial_count(), 5);
    }

    #[test]
    fn short_input_is_header_error() {
        assert!(matches!(
            Archive2Decoder::default().decode(b"AR2V0006."),
            Err(DecodeError::VolumeHeader(_))
        ));
    }

    #[test]
    fn header_only_volume_is_empty() {
        let mut file = Vec::new();
        header().write_to(&mut file);
        let volume = Archive2Decoder::default().decode(&file).unwrap();
        assert_eq!(volume.radial_count(), 0);
        assert!(volume.elevations().is_empty());
    }

    #[test]
    fn record_limit_applies() {
        let file = encoder().encode().unwrap();
        let decoder = Archive2Decoder::new(DecoderConfig::default().with_max_record_size(1000));
        assert!(matches!(
            decoder.decode(&file),
            Err(DecodeError::DecompressionBomb { limit: 1000, .. })
        ));
    }

    #[test]
    fn reader_matches_slice() {
        let file = encoder().gzip(true).encode().unwrap();
        let decoder = Archive2Decoder::default();
        let from_reader = decoder.decode_reader(std::io::Cursor::new(&file)).unwrap();
        assert_eq!(from_reader, decoder.decode(&file).unwrap());
    }

    #[test]
    fn reader_limit_applies() {
        let file = encoder().encode().unwrap();
        let decoder = Archive2Decoder::new(DecoderConfig::default().with_max_volume_size(100));
        assert!(matches!(
            decoder.decode_reader(file.as_slice()),
            Err(DecodeError::InputTooLarge { limit: 100 })
        ));
    }

    #[tokio::test]
    async fn async_matches_sync() {
        let file = encoder().encode().unwrap();
        let decoder = Archive2Decoder::default();
        let reader = tokio::io::BufReader::new(std::io::Cursor::new(file.clone()));
        let from_async = decoder.decode_async(reader).await.unwrap();
        assert_eq!(from_async, decoder.decode(&file).unwrap());
    }
}
