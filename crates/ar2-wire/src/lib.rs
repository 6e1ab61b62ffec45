#![warn(clippy::pedantic)]

pub mod error;
pub mod julian;
pub mod message_header;
pub mod reader;
pub mod volume_header;

pub use error::WireError;
pub use message_header::{ControlWord, MessageHeader, MessageType};
pub use reader::ByteReader;
pub use volume_header::VolumeHeader;

/// Zeroed bytes preceding every message header inside an LDM record.
///
/// Historically the "CTM header" of the RDA/RPG link. Always skipped.
pub const LEGACY_CTM_HEADER_LEN: usize = 12;

/// Size of the message header that follows the legacy CTM bytes.
pub const MESSAGE_HEADER_SIZE: usize = 16;

/// Slot occupied by every non-radial message, CTM bytes and header included.
pub const DEFAULT_MESSAGE_SIZE: usize = 2432;

/// Body bytes of a fixed-slot message once the CTM bytes and header are
/// consumed. Does not apply to Message 31.
pub const MESSAGE_BODY_SIZE: usize =
    DEFAULT_MESSAGE_SIZE - LEGACY_CTM_HEADER_LEN - MESSAGE_HEADER_SIZE;

/// Uncompressed size of the metadata record (134 fixed-slot messages).
pub const ARCHIVE2_METADATA_RECORD_LEN: usize = 325_888;

/// Magic bytes of a gzip stream.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Magic bytes of a bzip2 stream.
pub const BZIP2_MAGIC: [u8; 2] = *b"BZ";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_arithmetic() {
        assert_eq!(MESSAGE_BODY_SIZE, 2404);
        assert_eq!(ARCHIVE2_METADATA_RECORD_LEN, 134 * DEFAULT_MESSAGE_SIZE);
    }
}
