use std::io::Write;

use bzip2::Compression as BzLevel;
use bzip2::write::BzEncoder;
use flate2::Compression as GzLevel;
use flate2::write::GzEncoder;

/// Compress one LDM record payload with bzip2, as the radar does.
///
/// # Errors
///
/// Propagates I/O errors from the bzip2 writer.
pub fn bzip2(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = BzEncoder::new(Vec::new(), BzLevel::best());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Wrap a whole volume in a gzip envelope.
///
/// # Errors
///
/// Propagates I/O errors from the gzip writer.
pub fn gzip(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), GzLevel::default());
    encoder.write_all(data)?;
    encoder.finish()
}
