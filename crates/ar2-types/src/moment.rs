use ar2_wire::ByteReader;
use serde::Serialize;

use crate::error::TypeError;
use crate::product::{MOMENT_BLOCK_TYPE, Product};
use crate::{MOMENT_DATA_BELOW_THRESHOLD, MOMENT_DATA_FOLDED};

/// Header of a generic data moment block (REF, VEL, "SW ", ZDR, PHI, RHO,
/// CFP). The raw gate bytes follow immediately.
///
/// ```text
/// ┌────────┬─────────┬──────────────────────────────────────────────┐
/// │ Offset │ Size    │ Description                                  │
/// ├────────┼─────────┼──────────────────────────────────────────────┤
/// │ 0x00   │ 1 byte  │ Block type 'D'                               │
/// │ 0x01   │ 3 bytes │ Moment name                                  │
/// │ 0x04   │ 4 bytes │ Reserved                                     │
/// │ 0x08   │ 2 bytes │ NG, number of gates                          │
/// │ 0x0A   │ 2 bytes │ Range to center of first gate (m)            │
/// │ 0x0C   │ 2 bytes │ Gate spacing (m)                             │
/// │ 0x0E   │ 2 bytes │ TOVER                                        │
/// │ 0x10   │ 2 bytes │ SNR threshold (i16, 0.125 dB)                │
/// │ 0x12   │ 1 byte  │ Control flags                                │
/// │ 0x13   │ 1 byte  │ DWS, data word size in bits (8 or 16)        │
/// │ 0x14   │ 4 bytes │ Scale (f32)                                  │
/// │ 0x18   │ 4 bytes │ Offset (f32)                                 │
/// │ 0x1C   │ NG*DWS/8│ Packed big-endian gate codes                 │
/// └────────┴─────────┴──────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MomentHeader {
    #[serde(skip)]
    pub block_type: u8,
    pub product: Product,
    #[serde(skip)]
    pub reserved: u32,
    pub gate_count: u16,
    pub first_gate_range: u16,
    pub gate_spacing: u16,
    pub tover: u16,
    pub snr_threshold: i16,
    pub control_flags: u8,
    pub word_size: u8,
    pub scale: f32,
    pub offset: f32,
}

impl MomentHeader {
    pub const SIZE: usize = 28;

    /// A header with the given product and gate geometry, 8-bit words and
    /// unit scale.
    #[must_use]
    pub fn new(product: Product, gate_count: u16) -> Self {
        Self {
            block_type: MOMENT_BLOCK_TYPE,
            product,
            reserved: 0,
            gate_count,
            first_gate_range: 0,
            gate_spacing: 0,
            tover: 0,
            snr_threshold: 0,
            control_flags: 0,
            word_size: 8,
            scale: 1.0,
            offset: 0.0,
        }
    }

    /// # Errors
    ///
    /// [`TypeError::UnknownProduct`] if the block name is not a moment, or
    /// [`TypeError::Wire`] if fewer than 28 bytes remain.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, TypeError> {
        reader.peek_bytes(Self::SIZE)?;
        let block_type = reader.read_u8()?;
        let name: [u8; 3] = reader.read_array()?;
        let Some(product) = Product::from_wire_name(name) else {
            reader.rewind(4)?;
            return Err(TypeError::UnknownProduct(
                String::from_utf8_lossy(&name).into_owned(),
            ));
        };
        Ok(Self {
            block_type,
            product,
            reserved: reader.read_u32()?,
            gate_count: reader.read_u16()?,
            first_gate_range: reader.read_u16()?,
            gate_spacing: reader.read_u16()?,
            tover: reader.read_u16()?,
            snr_threshold: reader.read_i16()?,
            control_flags: reader.read_u8()?,
            word_size: reader.read_u8()?,
            scale: reader.read_f32()?,
            offset: reader.read_f32()?,
        })
    }

    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.push(self.block_type);
        buf.extend_from_slice(&self.product.wire_name());
        buf.extend_from_slice(&self.reserved.to_be_bytes());
        buf.extend_from_slice(&self.gate_count.to_be_bytes());
        buf.extend_from_slice(&self.first_gate_range.to_be_bytes());
        buf.extend_from_slice(&self.gate_spacing.to_be_bytes());
        buf.extend_from_slice(&self.tover.to_be_bytes());
        buf.extend_from_slice(&self.snr_threshold.to_be_bytes());
        buf.push(self.control_flags);
        buf.push(self.word_size);
        buf.extend_from_slice(&self.scale.to_be_bytes());
        buf.extend_from_slice(&self.offset.to_be_bytes());
    }

    /// Number of raw bytes the header promises: `NG * DWS / 8`.
    ///
    /// # Errors
    ///
    /// [`TypeError::InvalidWordSize`] unless DWS is 8 or 16.
    pub fn data_len(&self) -> Result<usize, TypeError> {
        match self.word_size {
            8 | 16 => Ok(usize::from(self.gate_count) * usize::from(self.word_size) / 8),
            word_size => Err(TypeError::InvalidWordSize {
                product: self.product,
                word_size,
            }),
        }
    }
}

/// One rescaled gate.
///
/// Codes 0 and 1 are reserved by the RDA; every other code is physical
/// data. [`to_f32`](Self::to_f32) maps the reserved codes onto the in-band
/// sentinels 999.0 and 998.0 so scaled vectors stay NaN-free.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum ScaledGate {
    BelowThreshold,
    RangeFolded,
    Value(f32),
}

impl ScaledGate {
    #[must_use]
    pub fn from_code(code: u16, scale: f32, offset: f32) -> Self {
        match code {
            0 => Self::BelowThreshold,
            1 => Self::RangeFolded,
            // Zero scale means the moment stores the value itself.
            n if scale == 0.0 => Self::Value(f32::from(n)),
            n => Self::Value((f32::from(n) - offset) / scale),
        }
    }

    #[must_use]
    pub fn to_f32(self) -> f32 {
        match self {
            Self::BelowThreshold => MOMENT_DATA_BELOW_THRESHOLD,
            Self::RangeFolded => MOMENT_DATA_FOLDED,
            Self::Value(v) => v,
        }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        matches!(self, Self::Value(_))
    }
}

/// A moment block: header plus its packed gate codes.
///
/// The data buffer is private so the length invariant
/// (`data.len() == NG * DWS / 8`, DWS in {8, 16}) holds for every value
/// that exists.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DataMoment {
    header: MomentHeader,
    #[serde(skip)]
    data: Vec<u8>,
}

impl DataMoment {
    /// # Errors
    ///
    /// [`TypeError::InvalidWordSize`] or
    /// [`TypeError::MomentLengthMismatch`] if the buffer does not match the
    /// header.
    pub fn new(header: MomentHeader, data: Vec<u8>) -> Result<Self, TypeError> {
        let expected = header.data_len()?;
        if data.len() != expected {
            return Err(TypeError::MomentLengthMismatch {
                product: header.product,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { header, data })
    }

    /// A moment whose gates are stored with the given scale and offset.
    /// Codes wider than the header's word size are truncated.
    ///
    /// # Errors
    ///
    /// [`TypeError::InvalidWordSize`] if the header's DWS is not 8 or 16.
    pub fn from_codes(mut header: MomentHeader, codes: &[u16]) -> Result<Self, TypeError> {
        header.gate_count = u16::try_from(codes.len()).unwrap_or(u16::MAX);
        let codes = &codes[..usize::from(header.gate_count)];
        header.data_len()?;
        let data = if header.word_size == 16 {
            codes.iter().flat_map(|c| c.to_be_bytes()).collect()
        } else {
            codes.iter().map(|&c| c.to_be_bytes()[1]).collect()
        };
        Self::new(header, data)
    }

    /// Parse a moment block at the cursor: the 28-byte header, then exactly
    /// `NG * DWS / 8` raw bytes.
    ///
    /// # Errors
    ///
    /// [`TypeError::InvalidWordSize`] for DWS outside {8, 16}, or
    /// [`TypeError::Wire`] if the gate bytes run past the buffer.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, TypeError> {
        let header = MomentHeader::read_from(reader)?;
        let len = header.data_len()?;
        let data = reader.read_bytes(len)?.to_vec();
        Ok(Self { header, data })
    }

    pub fn write_to(&self, buf: &mut Vec<u8>) {
        self.header.write_to(buf);
        buf.extend_from_slice(&self.data);
    }

    #[must_use]
    pub fn header(&self) -> &MomentHeader {
        &self.header
    }

    #[must_use]
    pub fn product(&self) -> Product {
        self.header.product
    }

    #[must_use]
    pub fn gate_count(&self) -> usize {
        usize::from(self.header.gate_count)
    }

    #[must_use]
    pub fn word_size(&self) -> u8 {
        self.header.word_size
    }

    /// Range to the center of the first gate, in meters.
    #[must_use]
    pub fn first_gate_range(&self) -> u16 {
        self.header.first_gate_range
    }

    /// Distance between adjacent gates, in meters.
    #[must_use]
    pub fn gate_spacing(&self) -> u16 {
        self.header.gate_spacing
    }

    /// The packed gate bytes as found on the wire.
    #[must_use]
    pub fn raw(&self) -> &[u8] {
        &self.data
    }

    /// Size of the block on the wire, header included.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        MomentHeader::SIZE + self.data.len()
    }

    /// Raw gate codes, unpacked from 8- or 16-bit big-endian words.
    pub fn codes(&self) -> impl Iterator<Item = u16> + '_ {
        let width = usize::from(self.header.word_size / 8);
        self.data
            .chunks_exact(width)
            .map(|word| word.iter().fold(0u16, |acc, &b| (acc << 8) | u16::from(b)))
    }

    pub fn gates(&self) -> impl Iterator<Item = ScaledGate> + '_ {
        let (scale, offset) = (self.header.scale, self.header.offset);
        self.codes()
            .map(move |code| ScaledGate::from_code(code, scale, offset))
    }

    /// Rescale every gate to physical units. Below-threshold gates become
    /// 999.0 and range-folded gates 998.0. The result has exactly
    /// [`gate_count`](Self::gate_count) entries.
    #[must_use]
    pub fn scaled_data(&self) -> Vec<f32> {
        self.gates().map(ScaledGate::to_f32).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moment(word_size: u8, scale: f32, offset: f32, data: &[u8]) -> DataMoment {
        let header = MomentHeader {
            word_size,
            scale,
            offset,
            gate_count: u16::try_from(data.len() * 8 / usize::from(word_size)).unwrap(),
            ..MomentHeader::new(Product::Reflectivity, 0)
        };
        DataMoment::new(header, data.to_vec()).unwrap()
    }

    // ── Scaling ─────────────────────────────────────────────────────────

    #[test]
    fn sentinels_and_linear_scale() {
        let m = moment(8, 0.5, 66.0, &[0, 1, 2, 255]);
        assert_eq!(m.scaled_data(), vec![999.0, 998.0, -128.0, 378.0]);
    }

    #[test]
    fn zero_scale_stores_value_directly() {
        let m = moment(8, 0.0, 0.0, &[0, 1, 5]);
        assert_eq!(m.scaled_data(), vec![999.0, 998.0, 5.0]);
    }

    #[test]
    fn sixteen_bit_words_are_big_endian() {
        let m = moment(16, 100.0, 0.0, &[0x00, 0x00, 0x00, 0x01, 0x03, 0xE8]);
        assert_eq!(m.gate_count(), 3);
        assert_eq!(m.codes().collect::<Vec<_>>(), vec![0, 1, 1000]);
        assert_eq!(m.scaled_data(), vec![999.0, 998.0, 10.0]);
    }

    #[test]
    fn gate_variants() {
        let m = moment(8, 2.0, 2.0, &[0, 1, 4]);
        let gates: Vec<_> = m.gates().collect();
        assert_eq!(
            gates,
            vec![ScaledGate::BelowThreshold, ScaledGate::RangeFolded, ScaledGate::Value(1.0)]
        );
        assert!(!gates[0].is_valid());
        assert!(gates[2].is_valid());
    }

    #[test]
    fn scaling_twice_is_identical() {
        let m = moment(8, 2.0, 129.0, &[7, 0, 200, 1, 33]);
        assert_eq!(m.scaled_data(), m.scaled_data());
    }

    // ── Validation ──────────────────────────────────────────────────────

    #[test]
    fn reject_bad_word_size() {
        let header = MomentHeader {
            word_size: 12,
            ..MomentHeader::new(Product::Velocity, 2)
        };
        assert!(matches!(
            DataMoment::new(header, vec![0; 3]),
            Err(TypeError::InvalidWordSize {
                product: Product::Velocity,
                word_size: 12
            })
        ));
    }

    #[test]
    fn reject_length_mismatch() {
        let header = MomentHeader::new(Product::Reflectivity, 4);
        assert!(matches!(
            DataMoment::new(header, vec![0; 3]),
            Err(TypeError::MomentLengthMismatch {
                expected: 4,
                actual: 3,
                ..
            })
        ));
    }

    // ── Wire ────────────────────────────────────────────────────────────

    #[test]
    fn read_consumes_exactly_the_gate_bytes() {
        let header = MomentHeader {
            word_size: 16,
            gate_spacing: 250,
            first_gate_range: 2125,
            ..MomentHeader::new(Product::DifferentialPhase, 0)
        };
        let m = DataMoment::from_codes(header, &[2, 700, 65_535]).unwrap();
        let mut buf = Vec::new();
        m.write_to(&mut buf);
        buf.extend_from_slice(b"trailer");
        assert_eq!(m.encoded_len(), MomentHeader::SIZE + 6);

        let mut r = ByteReader::new(&buf);
        let parsed = DataMoment::read_from(&mut r).unwrap();
        assert_eq!(r.position(), m.encoded_len());
        assert_eq!(parsed, m);
        assert_eq!(parsed.raw().len(), parsed.gate_count() * 2);
        assert_eq!(parsed.first_gate_range(), 2125);
        assert_eq!(parsed.gate_spacing(), 250);
    }

    #[test]
    fn spectrum_width_name_on_wire() {
        let m = DataMoment::from_codes(MomentHeader::new(Product::SpectrumWidth, 0), &[2]).unwrap();
        let mut buf = Vec::new();
        m.write_to(&mut buf);
        assert_eq!(&buf[..4], b"DSW ");
    }

    #[test]
    fn truncated_gates_fail() {
        let moment_header = MomentHeader::new(Product::Reflectivity, 0);
        let m = DataMoment::from_codes(moment_header, &[2, 3, 4]).unwrap();
        let mut buf = Vec::new();
        m.write_to(&mut buf);
        buf.pop();
        assert!(matches!(
            DataMoment::read_from(&mut ByteReader::new(&buf)),
            Err(TypeError::Wire(_))
        ));
    }

    #[test]
    fn unknown_name_is_rejected() {
        let mut buf = b"DXYZ".to_vec();
        buf.resize(MomentHeader::SIZE, 0);
        let mut r = ByteReader::new(&buf);
        assert!(matches!(
            MomentHeader::read_from(&mut r),
            Err(TypeError::UnknownProduct(name)) if name == "XYZ"
        ));
        assert_eq!(r.position(), 0);
    }
}
