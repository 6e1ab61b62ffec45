use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::WireError;
use crate::julian::modified_julian_to_utc;
use crate::reader::ByteReader;

/// Total volume header size in bytes (fixed).
pub const VOLUME_HEADER_SIZE: usize = 24;

/// Length of the tape/version prefix inside the filename, e.g. `AR2V0006.`.
const TAPE_VERSION_LEN: usize = 9;

/// Archive II volume header: the first 24 bytes of every volume, after the
/// outer gzip envelope (if any) has been removed.
///
/// ```text
/// ┌────────┬──────────┬──────────────────────────────────────────────┐
/// │ Offset │ Size     │ Description                                  │
/// ├────────┼──────────┼──────────────────────────────────────────────┤
/// │ 0x00   │ 12 bytes │ Filename: "AR2V00vv." + 3-digit sequence     │
/// │ 0x0C   │ 4 bytes  │ NEXRAD modified Julian date (int32, BE)      │
/// │ 0x10   │ 4 bytes  │ Milliseconds past midnight UTC (int32, BE)   │
/// │ 0x14   │ 4 bytes  │ ICAO radar identifier, e.g. "KTLX"           │
/// └────────┴──────────┴──────────────────────────────────────────────┘
/// ```
///
/// The two version digits of the filename identify the recording mode:
/// 02/05 super resolution disabled, 03/06 super resolution, 04/07
/// recombined super resolution (05–07 are RDA build 12.0 and later).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VolumeHeader {
    pub filename: [u8; 12],
    pub modified_julian_date: i32,
    pub millis_of_day: i32,
    pub icao: [u8; 4],
}

impl VolumeHeader {
    /// Build a header from its textual parts. Text longer than the field is
    /// truncated, shorter text is padded with spaces.
    #[must_use]
    pub fn new(filename: &str, icao: &str, modified_julian_date: i32, millis_of_day: i32) -> Self {
        Self {
            filename: fixed_ascii(filename),
            modified_julian_date,
            millis_of_day,
            icao: fixed_ascii(icao),
        }
    }

    /// Parse the header from the front of `reader`.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 24 bytes are available.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, WireError> {
        // Check the whole header up front so a short file reports offset 0.
        reader.peek_bytes(VOLUME_HEADER_SIZE)?;
        Ok(Self {
            filename: reader.read_array()?,
            modified_julian_date: reader.read_i32()?,
            millis_of_day: reader.read_i32()?,
            icao: reader.read_array()?,
        })
    }

    /// Append the 24 header bytes to `buf`.
    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.filename);
        buf.extend_from_slice(&self.modified_julian_date.to_be_bytes());
        buf.extend_from_slice(&self.millis_of_day.to_be_bytes());
        buf.extend_from_slice(&self.icao);
    }

    /// The 12-byte Archive II filename, lossily decoded.
    #[must_use]
    pub fn filename(&self) -> String {
        String::from_utf8_lossy(&self.filename).into_owned()
    }

    /// The tape/version prefix, e.g. `AR2V0006.`.
    #[must_use]
    pub fn tape_version(&self) -> String {
        String::from_utf8_lossy(&self.filename[..TAPE_VERSION_LEN]).into_owned()
    }

    /// The two version digits preceding the dot (`6` for `AR2V0006.`).
    /// `None` for producers that do not follow the `AR2V00vv.` pattern.
    #[must_use]
    pub fn version_number(&self) -> Option<u8> {
        let digits = std::str::from_utf8(&self.filename[6..8]).ok()?;
        digits.parse().ok()
    }

    /// The 3-digit rolling sequence number (001..=999).
    #[must_use]
    pub fn sequence(&self) -> Option<u16> {
        std::str::from_utf8(&self.filename[TAPE_VERSION_LEN..])
            .ok()?
            .trim()
            .parse()
            .ok()
    }

    /// The ICAO station identifier, e.g. `KCRP`.
    ///
    /// # Errors
    ///
    /// [`WireError::InvalidAscii`] if the identifier contains non-ASCII or
    /// control bytes.
    pub fn icao(&self) -> Result<&str, WireError> {
        ascii_field("icao", &self.icao)
    }

    /// The volume start time.
    #[must_use]
    pub fn date_time(&self) -> Option<DateTime<Utc>> {
        modified_julian_to_utc(
            i64::from(self.modified_julian_date),
            i64::from(self.millis_of_day),
        )
    }
}

/// Validate a fixed-width ASCII identifier and borrow it as `&str`.
///
/// # Errors
///
/// [`WireError::InvalidAscii`] if any byte is outside the printable range.
pub fn ascii_field<'a>(field: &'static str, bytes: &'a [u8]) -> Result<&'a str, WireError> {
    if bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        // All bytes are ASCII, so this cannot fail.
        std::str::from_utf8(bytes).map_err(|_| WireError::InvalidAscii {
            field,
            bytes: bytes.to_vec(),
        })
    } else {
        Err(WireError::InvalidAscii {
            field,
            bytes: bytes.to_vec(),
        })
    }
}

/// Copy `text` into a fixed-width, space-padded ASCII array.
#[must_use]
pub fn fixed_ascii<const N: usize>(text: &str) -> [u8; N] {
    let mut out = [b' '; N];
    for (dst, src) in out.iter_mut().zip(text.bytes()) {
        *dst = src;
    }
    out
}
