use std::borrow::Cow;
use std::fmt;
use std::io::Read;

use ar2_wire::{BZIP2_MAGIC, GZIP_MAGIC};
use bzip2::read::MultiBzDecoder;
use flate2::read::MultiGzDecoder;

use crate::error::DecodeError;

/// Compression detected from the two leading bytes of a buffer.
///
/// Older archives wrap the whole file in gzip; every LDM record payload
/// is normally bzip2. Anything else is taken as already inflated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compression {
    Gzip,
    Bzip2,
    Uncompressed,
}

impl Compression {
    #[must_use]
    pub fn detect(data: &[u8]) -> Self {
        match data.get(..2) {
            Some(magic) if magic == GZIP_MAGIC => Self::Gzip,
            Some(magic) if magic == BZIP2_MAGIC => Self::Bzip2,
            _ => Self::Uncompressed,
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Uncompressed => "uncompressed",
        })
    }
}

/// Inflate `data` according to its magic bytes, borrowing it unchanged
/// when it is not compressed.
///
/// Concatenated streams are inflated in full. `offset` is only used for
/// error context.
///
/// # Errors
///
/// - [`DecodeError::DecompressFailed`] if the stream is corrupt or
///   truncated.
/// - [`DecodeError::DecompressionBomb`] if the inflated data would
///   exceed `max_size`.
pub fn inflate(data: &[u8], offset: usize, max_size: usize) -> Result<Cow<'_, [u8]>, DecodeError> {
    match Compression::detect(data) {
        Compression::Uncompressed => Ok(Cow::Borrowed(data)),
        Compression::Gzip => {
            read_limited(MultiGzDecoder::new(data), Compression::Gzip, offset, max_size)
        }
        Compression::Bzip2 => {
            read_limited(MultiBzDecoder::new(data), Compression::Bzip2, offset, max_size)
        }
    }
    .map(|inflated| {
        log::trace!("{} bytes at offset {offset} inflated to {}", data.len(), inflated.len());
        inflated
    })
}

fn read_limited<R: Read>(
    decoder: R,
    format: Compression,
    offset: usize,
    max_size: usize,
) -> Result<Cow<'static, [u8]>, DecodeError> {
    let cap = u64::try_from(max_size).unwrap_or(u64::MAX).saturating_add(1);
    let mut out = Vec::new();
    decoder
        .take(cap)
        .read_to_end(&mut out)
        .map_err(|e| DecodeError::DecompressFailed {
            format,
            offset,
            reason: e.to_string(),
        })?;
    if out.len() > max_size {
        return Err(DecodeError::DecompressionBomb {
            actual: out.len(),
            limit: max_size,
        });
    }
    Ok(Cow::Owned(out))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    fn bzip2(data: &[u8]) -> Vec<u8> {
        let mut enc = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn detect_magic() {
        assert_eq!(Compression::detect(&[0x1f, 0x8b, 8]), Compression::Gzip);
        assert_eq!(Compression::detect(b"BZh9"), Compression::Bzip2);
        assert_eq!(Compression::detect(b"AR2V"), Compression::Uncompressed);
        assert_eq!(Compression::detect(b"B"), Compression::Uncompressed);
        assert_eq!(Compression::detect(&[]), Compression::Uncompressed);
    }

    #[test]
    fn raw_data_is_borrowed() {
        let data = b"\0\0\0\0 not compressed";
        assert!(matches!(inflate(data, 0, 1024).unwrap(), Cow::Borrowed(_)));
    }

    #[test]
    fn inflate_both_formats() {
        let data = vec![7u8; 5000];
        assert_eq!(&*inflate(&gzip(&data), 0, 10_000).unwrap(), &data[..]);
        assert_eq!(&*inflate(&bzip2(&data), 0, 10_000).unwrap(), &data[..]);
    }

    #[test]
    fn concatenated_streams() {
        let mut data = bzip2(b"first ");
        data.extend(bzip2(b"second"));
        assert_eq!(&*inflate(&data, 0, 100).unwrap(), b"first second");
    }

    #[test]
    fn limit_is_inclusive() {
        let data = vec![0u8; 4096];
        assert!(inflate(&bzip2(&data), 0, 4096).is_ok());
        assert!(matches!(
            inflate(&bzip2(&data), 0, 4095),
            Err(DecodeError::DecompressionBomb {
                actual: 4096,
                limit: 4095
            })
        ));
    }

    #[test]
    fn corrupt_stream_fails() {
        let mut data = bzip2(&[1u8; 300]);
        data.truncate(data.len() / 2);
        assert!(matches!(
            inflate(&data, 28, 10_000),
            Err(DecodeError::DecompressFailed {
                format: Compression::Bzip2,
                offset: 28,
                ..
            })
        ));
    }
}
