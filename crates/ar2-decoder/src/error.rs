use ar2_types::{BlockName, TypeError};
use ar2_wire::WireError;

use crate::decompression::Compression;

/// Errors that abort decoding of an Archive II volume.
///
/// The decoder never returns a partially populated volume: any of these
/// discards everything parsed so far. Recoverable conditions (a product
/// missing from a radial, an unknown non-radial message type) are not
/// represented here.
///
/// Error hierarchy:
///
/// ```text
///   DecodeError
///   ├── VolumeHeader(WireError)  ← fewer than 24 bytes after the envelope
///   ├── InputTooLarge            ← reader yielded more than max_volume_size
///   ├── Truncated                ← EOF inside a control word, record, header or block
///   ├── DecompressFailed         ← corrupt gzip/bzip2 stream
///   ├── DecompressionBomb        ← inflated size exceeds the configured limit
///   ├── UnknownDataBlockName     ← pointer lands on an unrecognized block
///   ├── PointerTableOverflow     ← no "RVOL" within max_pointer_probes
///   ├── DuplicateDataBlock       ← same block twice in one radial
///   ├── MissingDataBlock         ← VOL, ELV or RAD absent
///   ├── PointerOutOfBounds       ← pointer past the end of the LDM buffer
///   ├── Type(TypeError)          ← invalid DWS, moment length mismatch
///   ├── Wire(WireError)          ← from ar2-wire
///   └── Io(std::io::Error)       ← from the input reader
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The input is too short to hold the 24-byte volume header.
    #[error("invalid volume header: {0}")]
    VolumeHeader(WireError),

    /// The input reader produced more than the configured volume limit.
    #[error("input exceeds the volume size limit of {limit} bytes")]
    InputTooLarge { limit: usize },

    /// The input ended inside a structure that had already begun.
    ///
    /// `offset` is relative to the buffer being parsed: the inflated
    /// volume for control words and records, the inflated LDM record for
    /// messages and data blocks.
    #[error("truncated {context} at offset {offset}")]
    Truncated {
        context: &'static str,
        offset: usize,
        #[source]
        source: WireError,
    },

    /// A gzip or bzip2 stream could not be inflated.
    #[error("{format} decompression failed at offset {offset}: {reason}")]
    DecompressFailed {
        format: Compression,
        offset: usize,
        reason: String,
    },

    /// Inflated data exceeds the configured limit.
    ///
    /// Inflation stops one byte past the limit, so `actual` is a lower
    /// bound on the true size.
    #[error("decompressed size of at least {actual} bytes exceeds limit {limit}")]
    DecompressionBomb { actual: usize, limit: usize },

    /// A data block pointer led to a block whose 3-byte name is not one of
    /// VOL, ELV, RAD or the seven moments. `name` holds all four leading
    /// bytes (type byte included) so corrupt data is visible as-is.
    #[error("unknown data block name {name:?} at offset {offset}")]
    UnknownDataBlockName { name: String, offset: usize },

    /// The `RVOL` sentinel that ends the pointer table was not found
    /// within the probe limit.
    #[error("data block pointer table not terminated after {probes} probes (message at offset {offset})")]
    PointerTableOverflow { probes: usize, offset: usize },

    /// A radial carried the same data block twice.
    #[error("duplicate {name} data block at offset {offset}")]
    DuplicateDataBlock { name: BlockName, offset: usize },

    /// A radial lacked one of its three mandatory descriptor blocks.
    #[error("radial at offset {offset} has no {name} data block")]
    MissingDataBlock { name: BlockName, offset: usize },

    /// A data block pointer addresses bytes beyond the LDM buffer.
    #[error("data block pointer {pointer} of message at offset {offset} is outside a {len}-byte record")]
    PointerOutOfBounds { pointer: u32, offset: usize, len: usize },

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Wire(#[from] WireError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// Adapter for `map_err` on reads that can only fail by truncation.
    pub(crate) fn truncated(
        context: &'static str,
        offset: usize,
    ) -> impl FnOnce(WireError) -> Self {
        move |source| Self::Truncated {
            context,
            offset,
            source,
        }
    }
}
