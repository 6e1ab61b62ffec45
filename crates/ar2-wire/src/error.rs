/// Low-level framing errors raised while reading big-endian fields out of
/// an Archive II byte buffer.
///
/// Every read in this crate goes through [`ByteReader`](crate::ByteReader),
/// so a truncated buffer always surfaces as [`WireError::UnexpectedEof`]
/// carrying the offset at which the read was attempted. Higher layers wrap
/// this error with the record or message they were parsing.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The buffer ended before `needed` bytes could be read at `offset`.
    #[error("unexpected end of input at offset {offset}: needed {needed} bytes, {available} available")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// An absolute or relative seek landed before the start of the buffer
    /// or past its end.
    #[error("seek to offset {offset} is outside a buffer of {len} bytes")]
    SeekOutOfBounds { offset: i64, len: usize },

    /// A fixed-width text field contained bytes outside printable ASCII.
    #[error("field {field} is not ASCII: {bytes:02X?}")]
    InvalidAscii {
        field: &'static str,
        bytes: Vec<u8>,
    },

    /// I/O error while pulling bytes from an external reader.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
