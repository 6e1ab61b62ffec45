#![warn(clippy::pedantic)]

pub mod config;
pub mod decoder;
pub mod decompression;
pub mod error;
pub mod message;
pub mod message31;
pub mod record;
pub mod volume;

pub use config::{DecoderConfig, MetadataRecordPolicy};
pub use decoder::Archive2Decoder;
pub use decompression::Compression;
pub use error::DecodeError;
pub use message31::{PointerTable, parse_message31, read_pointer_table};
pub use volume::{Site, Volume};

/// Decode an Archive II volume with the default configuration.
///
/// # Errors
///
/// See [`Archive2Decoder::decode`].
pub fn decode(input: &[u8]) -> Result<Volume, DecodeError> {
    Archive2Decoder::default().decode(input)
}
