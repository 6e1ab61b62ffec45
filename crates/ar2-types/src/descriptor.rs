use ar2_wire::{ByteReader, WireError};
use serde::Serialize;

use crate::product::DESCRIPTOR_BLOCK_TYPE;

/// VOL descriptor block: site and calibration data for the whole volume.
///
/// ```text
/// ┌────────┬─────────┬──────────────────────────────────────────────┐
/// │ Offset │ Size    │ Description                                  │
/// ├────────┼─────────┼──────────────────────────────────────────────┤
/// │ 0x00   │ 1 byte  │ Block type 'R'                               │
/// │ 0x01   │ 3 bytes │ Name "VOL"                                   │
/// │ 0x04   │ 2 bytes │ LRTUP, block size in bytes                   │
/// │ 0x06   │ 1 byte  │ Version major                                │
/// │ 0x07   │ 1 byte  │ Version minor                                │
/// │ 0x08   │ 4 bytes │ Latitude (f32, degrees)                      │
/// │ 0x0C   │ 4 bytes │ Longitude (f32, degrees)                     │
/// │ 0x10   │ 2 bytes │ Site height above sea level (m)              │
/// │ 0x12   │ 2 bytes │ Feedhorn height above ground (m)             │
/// │ 0x14   │ 4 bytes │ Calibration constant (dB)                    │
/// │ 0x18   │ 4 bytes │ Horizontal transmitter power (kW)            │
/// │ 0x1C   │ 4 bytes │ Vertical transmitter power (kW)              │
/// │ 0x20   │ 4 bytes │ System differential reflectivity (dB)        │
/// │ 0x24   │ 4 bytes │ Initial system differential phase (degrees)  │
/// │ 0x28   │ 2 bytes │ Volume coverage pattern number               │
/// │ 0x2A   │ 2 bytes │ Processing status                            │
/// └────────┴─────────┴──────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VolumeData {
    #[serde(skip)]
    pub block_type: u8,
    pub lrtup: u16,
    pub version_major: u8,
    pub version_minor: u8,
    pub latitude: f32,
    pub longitude: f32,
    pub site_height: u16,
    pub feedhorn_height: u16,
    pub calibration_constant: f32,
    pub tx_power_horizontal: f32,
    pub tx_power_vertical: f32,
    pub system_differential_reflectivity: f32,
    pub initial_differential_phase: f32,
    pub vcp_number: u16,
    pub processing_status: u16,
}

impl VolumeData {
    pub const SIZE: usize = 44;
    pub const NAME: [u8; 3] = *b"VOL";

    /// Parse the block at the cursor, type byte and name included.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if the block is cut short.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, WireError> {
        reader.peek_bytes(Self::SIZE)?;
        let block_type = reader.read_u8()?;
        reader.skip(3);
        Ok(Self {
            block_type,
            lrtup: reader.read_u16()?,
            version_major: reader.read_u8()?,
            version_minor: reader.read_u8()?,
            latitude: reader.read_f32()?,
            longitude: reader.read_f32()?,
            site_height: reader.read_u16()?,
            feedhorn_height: reader.read_u16()?,
            calibration_constant: reader.read_f32()?,
            tx_power_horizontal: reader.read_f32()?,
            tx_power_vertical: reader.read_f32()?,
            system_differential_reflectivity: reader.read_f32()?,
            initial_differential_phase: reader.read_f32()?,
            vcp_number: reader.read_u16()?,
            processing_status: reader.read_u16()?,
        })
    }

    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.push(self.block_type);
        buf.extend_from_slice(&Self::NAME);
        buf.extend_from_slice(&self.lrtup.to_be_bytes());
        buf.push(self.version_major);
        buf.push(self.version_minor);
        for value in [self.latitude, self.longitude] {
            buf.extend_from_slice(&value.to_be_bytes());
        }
        buf.extend_from_slice(&self.site_height.to_be_bytes());
        buf.extend_from_slice(&self.feedhorn_height.to_be_bytes());
        for value in [
            self.calibration_constant,
            self.tx_power_horizontal,
            self.tx_power_vertical,
            self.system_differential_reflectivity,
            self.initial_differential_phase,
        ] {
            buf.extend_from_slice(&value.to_be_bytes());
        }
        buf.extend_from_slice(&self.vcp_number.to_be_bytes());
        buf.extend_from_slice(&self.processing_status.to_be_bytes());
    }
}

impl Default for VolumeData {
    fn default() -> Self {
        Self {
            block_type: DESCRIPTOR_BLOCK_TYPE,
            lrtup: 44,
            version_major: 1,
            version_minor: 0,
            latitude: 0.0,
            longitude: 0.0,
            site_height: 0,
            feedhorn_height: 0,
            calibration_constant: 0.0,
            tx_power_horizontal: 0.0,
            tx_power_vertical: 0.0,
            system_differential_reflectivity: 0.0,
            initial_differential_phase: 0.0,
            vcp_number: 0,
            processing_status: 0,
        }
    }
}

/// ELV descriptor block: per-elevation attenuation and calibration.
///
/// ```text
/// ┌────────┬─────────┬──────────────────────────────────────────────┐
/// │ Offset │ Size    │ Description                                  │
/// ├────────┼─────────┼──────────────────────────────────────────────┤
/// │ 0x00   │ 4 bytes │ 'R' + "ELV"                                  │
/// │ 0x04   │ 2 bytes │ LRTUP                                        │
/// │ 0x06   │ 2 bytes │ Atmospheric attenuation (i16, 0.001 dB/km)   │
/// │ 0x08   │ 4 bytes │ Calibration constant (f32, dBZ)              │
/// └────────┴─────────┴──────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ElevationData {
    #[serde(skip)]
    pub block_type: u8,
    pub lrtup: u16,
    pub atmospheric_attenuation: i16,
    pub calibration_constant: f32,
}

impl ElevationData {
    pub const SIZE: usize = 12;
    pub const NAME: [u8; 3] = *b"ELV";

    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if the block is cut short.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, WireError> {
        reader.peek_bytes(Self::SIZE)?;
        let block_type = reader.read_u8()?;
        reader.skip(3);
        Ok(Self {
            block_type,
            lrtup: reader.read_u16()?,
            atmospheric_attenuation: reader.read_i16()?,
            calibration_constant: reader.read_f32()?,
        })
    }

    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.push(self.block_type);
        buf.extend_from_slice(&Self::NAME);
        buf.extend_from_slice(&self.lrtup.to_be_bytes());
        buf.extend_from_slice(&self.atmospheric_attenuation.to_be_bytes());
        buf.extend_from_slice(&self.calibration_constant.to_be_bytes());
    }

    /// Atmospheric attenuation factor in dB/km.
    #[must_use]
    pub fn atmospheric_attenuation_db_per_km(&self) -> f32 {
        f32::from(self.atmospheric_attenuation) * 0.001
    }
}

impl Default for ElevationData {
    fn default() -> Self {
        Self {
            block_type: DESCRIPTOR_BLOCK_TYPE,
            lrtup: 12,
            atmospheric_attenuation: 0,
            calibration_constant: 0.0,
        }
    }
}

/// RAD descriptor block: per-radial range, noise and Nyquist data.
///
/// ```text
/// ┌────────┬─────────┬──────────────────────────────────────────────┐
/// │ Offset │ Size    │ Description                                  │
/// ├────────┼─────────┼──────────────────────────────────────────────┤
/// │ 0x00   │ 4 bytes │ 'R' + "RAD"                                  │
/// │ 0x04   │ 2 bytes │ LRTUP                                        │
/// │ 0x06   │ 2 bytes │ Unambiguous range (0.1 km)                   │
/// │ 0x08   │ 4 bytes │ Horizontal noise level (f32, dBm)            │
/// │ 0x0C   │ 4 bytes │ Vertical noise level (f32, dBm)              │
/// │ 0x10   │ 2 bytes │ Nyquist velocity (0.01 m/s)                  │
/// │ 0x12   │ 2 bytes │ Radial flags                                 │
/// │ 0x14   │ 4 bytes │ Horizontal channel calibration (f32, dBZ)    │
/// │ 0x18   │ 4 bytes │ Vertical channel calibration (f32, dBZ)      │
/// └────────┴─────────┴──────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RadialData {
    #[serde(skip)]
    pub block_type: u8,
    pub lrtup: u16,
    pub unambiguous_range: u16,
    pub noise_level_horizontal: f32,
    pub noise_level_vertical: f32,
    pub nyquist_velocity: u16,
    pub radial_flags: u16,
    pub calibration_constant_horizontal: f32,
    pub calibration_constant_vertical: f32,
}

impl RadialData {
    pub const SIZE: usize = 28;
    pub const NAME: [u8; 3] = *b"RAD";

    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if the block is cut short.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, WireError> {
        reader.peek_bytes(Self::SIZE)?;
        let block_type = reader.read_u8()?;
        reader.skip(3);
        Ok(Self {
            block_type,
            lrtup: reader.read_u16()?,
            unambiguous_range: reader.read_u16()?,
            noise_level_horizontal: reader.read_f32()?,
            noise_level_vertical: reader.read_f32()?,
            nyquist_velocity: reader.read_u16()?,
            radial_flags: reader.read_u16()?,
            calibration_constant_horizontal: reader.read_f32()?,
            calibration_constant_vertical: reader.read_f32()?,
        })
    }

    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.push(self.block_type);
        buf.extend_from_slice(&Self::NAME);
        buf.extend_from_slice(&self.lrtup.to_be_bytes());
        buf.extend_from_slice(&self.unambiguous_range.to_be_bytes());
        buf.extend_from_slice(&self.noise_level_horizontal.to_be_bytes());
        buf.extend_from_slice(&self.noise_level_vertical.to_be_bytes());
        buf.extend_from_slice(&self.nyquist_velocity.to_be_bytes());
        buf.extend_from_slice(&self.radial_flags.to_be_bytes());
        buf.extend_from_slice(&self.calibration_constant_horizontal.to_be_bytes());
        buf.extend_from_slice(&self.calibration_constant_vertical.to_be_bytes());
    }

    #[must_use]
    pub fn unambiguous_range_km(&self) -> f32 {
        f32::from(self.unambiguous_range) / 10.0
    }

    #[must_use]
    pub fn nyquist_velocity_mps(&self) -> f32 {
        f32::from(self.nyquist_velocity) / 100.0
    }
}

impl Default for RadialData {
    fn default() -> Self {
        Self {
            block_type: DESCRIPTOR_BLOCK_TYPE,
            lrtup: 28,
            unambiguous_range: 0,
            noise_level_horizontal: 0.0,
            noise_level_vertical: 0.0,
            nyquist_velocity: 0,
            radial_flags: 0,
            calibration_constant_horizontal: 0.0,
            calibration_constant_vertical: 0.0,
        }
    }
}
