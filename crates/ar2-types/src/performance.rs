use ar2_wire::{ByteReader, WireError};
use serde::Serialize;

/// Message 3, RDA performance/maintenance data.
///
/// The body is kept as its raw 960 bytes: the ICD layout changes between
/// RDA builds and nothing downstream depends on individual fields. The
/// `*_at` accessors read big-endian values at a halfword offset, matching
/// how the ICD tables number the fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RadarPerformance {
    #[serde(skip)]
    body: Vec<u8>,
}

impl RadarPerformance {
    pub const SIZE: usize = 960;

    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 960 bytes remain.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, WireError> {
        Ok(Self {
            body: reader.read_bytes(Self::SIZE)?.to_vec(),
        })
    }

    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.body);
    }

    /// Build a body from raw bytes, zero-padded or truncated to 960 bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut body = bytes.to_vec();
        body.resize(Self::SIZE, 0);
        Self { body }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.body
    }

    /// Halfword at 1-based ICD halfword number `hw`.
    #[must_use]
    pub fn u16_at(&self, hw: usize) -> Option<u16> {
        self.window::<2>(hw).map(u16::from_be_bytes)
    }

    /// Fullword starting at 1-based ICD halfword number `hw`.
    #[must_use]
    pub fn u32_at(&self, hw: usize) -> Option<u32> {
        self.window::<4>(hw).map(u32::from_be_bytes)
    }

    #[must_use]
    pub fn f32_at(&self, hw: usize) -> Option<f32> {
        self.u32_at(hw).map(f32::from_bits)
    }

    fn window<const N: usize>(&self, hw: usize) -> Option<[u8; N]> {
        let start = hw.checked_sub(1)?.checked_mul(2)?;
        self.body.get(start..start.checked_add(N)?)?.try_into().ok()
    }
}

impl Default for RadarPerformance {
    fn default() -> Self {
        Self {
            body: vec![0; Self::SIZE],
        }
    }
}
