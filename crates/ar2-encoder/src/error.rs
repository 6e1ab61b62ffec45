use ar2_types::TypeError;

/// Errors that can occur while writing an Archive II volume.
///
/// Error hierarchy:
///
/// ```text
///   EncodeError
///   ├── EmptyRecord      ← uncompressed record with no messages
///   ├── RecordTooLarge   ← record length does not fit a control word
///   ├── MessageTooLarge  ← fixed-slot body larger than its slot
///   ├── Type(TypeError)  ← from ar2-types serialization
///   └── Io(io::Error)    ← from the bzip2 / gzip writers
/// ```
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    /// An empty uncompressed record would write a zero control word,
    /// which readers take for the unframed layout.
    #[error("LDM record {index} has no messages")]
    EmptyRecord { index: usize },

    #[error("LDM record of {size} bytes does not fit a control word")]
    RecordTooLarge { size: usize },

    #[error("message body of {size} bytes exceeds its {max}-byte slot")]
    MessageTooLarge { size: usize, max: usize },

    #[error(transparent)]
    Type(#[from] TypeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
