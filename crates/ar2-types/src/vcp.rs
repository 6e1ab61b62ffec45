use ar2_wire::{ByteReader, MESSAGE_BODY_SIZE};
use serde::Serialize;

use crate::error::TypeError;

/// Converts a 16-bit binary angle code to degrees.
#[must_use]
pub fn binary_angle_degrees(code: u16) -> f32 {
    f32::from(code) * 180.0 / 32768.0
}

/// Message 5, the volume coverage pattern the RDA is running.
///
/// A 22-byte header followed by `elevation_cut_count` 46-byte elevation
/// cut records. The whole message lives in one 2404-byte slot body, so at
/// most [`MAX_ELEVATION_CUTS`](Self::MAX_ELEVATION_CUTS) cuts fit.
///
/// ```text
/// ┌────────┬─────────┬──────────────────────────────────────────────┐
/// │ Offset │ Size    │ Description                                  │
/// ├────────┼─────────┼──────────────────────────────────────────────┤
/// │ 0x00   │ 2 bytes │ Message size (halfwords)                     │
/// │ 0x02   │ 2 bytes │ Pattern type                                 │
/// │ 0x04   │ 2 bytes │ Pattern number (VCP)                         │
/// │ 0x06   │ 2 bytes │ Number of elevation cuts                     │
/// │ 0x08   │ 1 byte  │ Version                                      │
/// │ 0x09   │ 1 byte  │ Clutter map group                            │
/// │ 0x0A   │ 1 byte  │ Doppler velocity resolution (2 or 4)         │
/// │ 0x0B   │ 1 byte  │ Pulse width                                  │
/// │ 0x0C   │ 4 bytes │ Reserved                                     │
/// │ 0x10   │ 2 bytes │ VCP sequencing                               │
/// │ 0x12   │ 2 bytes │ VCP supplemental data                        │
/// │ 0x14   │ 2 bytes │ Reserved                                     │
/// └────────┴─────────┴──────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VolumeCoveragePattern {
    pub message_size: u16,
    pub pattern_type: u16,
    pub pattern_number: u16,
    pub version: u8,
    pub clutter_map_group: u8,
    pub doppler_velocity_resolution: u8,
    pub pulse_width: u8,
    pub vcp_sequencing: u16,
    pub vcp_supplemental_data: u16,
    pub elevation_cuts: Vec<ElevationCut>,
}

impl VolumeCoveragePattern {
    pub const HEADER_SIZE: usize = 22;
    pub const MAX_ELEVATION_CUTS: usize =
        (MESSAGE_BODY_SIZE - Self::HEADER_SIZE) / ElevationCut::SIZE;

    /// # Errors
    ///
    /// [`TypeError::TooManyElevationCuts`] if the declared cut count cannot
    /// fit in the slot, [`TypeError::Wire`] if the buffer is cut short.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, TypeError> {
        reader.peek_bytes(Self::HEADER_SIZE)?;
        let message_size = reader.read_u16()?;
        let pattern_type = reader.read_u16()?;
        let pattern_number = reader.read_u16()?;
        let count = reader.read_u16()?;
        if usize::from(count) > Self::MAX_ELEVATION_CUTS {
            return Err(TypeError::TooManyElevationCuts {
                count,
                max: Self::MAX_ELEVATION_CUTS,
            });
        }
        let version = reader.read_u8()?;
        let clutter_map_group = reader.read_u8()?;
        let doppler_velocity_resolution = reader.read_u8()?;
        let pulse_width = reader.read_u8()?;
        reader.skip(4);
        let vcp_sequencing = reader.read_u16()?;
        let vcp_supplemental_data = reader.read_u16()?;
        reader.skip(2);

        let elevation_cuts = (0..count)
            .map(|_| ElevationCut::read_from(reader))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            message_size,
            pattern_type,
            pattern_number,
            version,
            clutter_map_group,
            doppler_velocity_resolution,
            pulse_width,
            vcp_sequencing,
            vcp_supplemental_data,
            elevation_cuts,
        })
    }

    /// # Errors
    ///
    /// [`TypeError::TooManyElevationCuts`] if the cuts would overflow the
    /// slot.
    pub fn write_to(&self, buf: &mut Vec<u8>) -> Result<(), TypeError> {
        let count = u16::try_from(self.elevation_cuts.len()).unwrap_or(u16::MAX);
        if usize::from(count) > Self::MAX_ELEVATION_CUTS {
            return Err(TypeError::TooManyElevationCuts {
                count,
                max: Self::MAX_ELEVATION_CUTS,
            });
        }
        buf.extend_from_slice(&self.message_size.to_be_bytes());
        buf.extend_from_slice(&self.pattern_type.to_be_bytes());
        buf.extend_from_slice(&self.pattern_number.to_be_bytes());
        buf.extend_from_slice(&count.to_be_bytes());
        buf.extend_from_slice(&[
            self.version,
            self.clutter_map_group,
            self.doppler_velocity_resolution,
            self.pulse_width,
        ]);
        buf.extend_from_slice(&[0; 4]);
        buf.extend_from_slice(&self.vcp_sequencing.to_be_bytes());
        buf.extend_from_slice(&self.vcp_supplemental_data.to_be_bytes());
        buf.extend_from_slice(&[0; 2]);
        for cut in &self.elevation_cuts {
            cut.write_to(buf);
        }
        Ok(())
    }

    /// Doppler velocity resolution in m/s: code 2 is 0.5, code 4 is 1.0.
    #[must_use]
    pub fn doppler_velocity_resolution_mps(&self) -> Option<f32> {
        match self.doppler_velocity_resolution {
            2 => Some(0.5),
            4 => Some(1.0),
            _ => None,
        }
    }

    /// Elevation angle of every cut, in degrees, in scan order.
    #[must_use]
    pub fn elevation_angles(&self) -> Vec<f32> {
        self.elevation_cuts.iter().map(ElevationCut::angle_degrees).collect()
    }
}

/// One 46-byte elevation cut record of Message 5. Spare halfwords are
/// dropped on read and written back as zeros.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ElevationCut {
    pub elevation_angle: u16,
    pub channel_configuration: u8,
    pub waveform_type: u8,
    pub super_resolution_control: u8,
    pub surveillance_prf_number: u8,
    pub surveillance_prf_pulse_count: u16,
    pub azimuth_rate: u16,
    pub reflectivity_threshold: i16,
    pub velocity_threshold: i16,
    pub spectrum_width_threshold: i16,
    pub differential_reflectivity_threshold: i16,
    pub differential_phase_threshold: i16,
    pub correlation_coefficient_threshold: i16,
    pub edge_angle: u16,
    pub doppler_prf_number: u16,
    pub doppler_prf_pulse_count: u16,
    pub supplemental_data: u16,
    pub ebc_angle: u16,
}

impl ElevationCut {
    pub const SIZE: usize = 46;

    /// # Errors
    ///
    /// [`TypeError::Wire`] if fewer than 46 bytes remain.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, TypeError> {
        reader.peek_bytes(Self::SIZE)?;
        let cut = Self {
            elevation_angle: reader.read_u16()?,
            channel_configuration: reader.read_u8()?,
            waveform_type: reader.read_u8()?,
            super_resolution_control: reader.read_u8()?,
            surveillance_prf_number: reader.read_u8()?,
            surveillance_prf_pulse_count: reader.read_u16()?,
            azimuth_rate: reader.read_u16()?,
            reflectivity_threshold: reader.read_i16()?,
            velocity_threshold: reader.read_i16()?,
            spectrum_width_threshold: reader.read_i16()?,
            differential_reflectivity_threshold: reader.read_i16()?,
            differential_phase_threshold: reader.read_i16()?,
            correlation_coefficient_threshold: reader.read_i16()?,
            edge_angle: reader.read_u16()?,
            doppler_prf_number: reader.read_u16()?,
            doppler_prf_pulse_count: reader.read_u16()?,
            supplemental_data: {
                let value = reader.read_u16()?;
                reader.skip(6);
                value
            },
            ebc_angle: reader.read_u16()?,
        };
        reader.skip(8);
        Ok(cut)
    }

    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.elevation_angle.to_be_bytes());
        buf.extend_from_slice(&[
            self.channel_configuration,
            self.waveform_type,
            self.super_resolution_control,
            self.surveillance_prf_number,
        ]);
        buf.extend_from_slice(&self.surveillance_prf_pulse_count.to_be_bytes());
        buf.extend_from_slice(&self.azimuth_rate.to_be_bytes());
        for threshold in [
            self.reflectivity_threshold,
            self.velocity_threshold,
            self.spectrum_width_threshold,
            self.differential_reflectivity_threshold,
            self.differential_phase_threshold,
            self.correlation_coefficient_threshold,
        ] {
            buf.extend_from_slice(&threshold.to_be_bytes());
        }
        for word in [
            self.edge_angle,
            self.doppler_prf_number,
            self.doppler_prf_pulse_count,
            self.supplemental_data,
        ] {
            buf.extend_from_slice(&word.to_be_bytes());
        }
        buf.extend_from_slice(&[0; 6]);
        buf.extend_from_slice(&self.ebc_angle.to_be_bytes());
        buf.extend_from_slice(&[0; 8]);
    }

    #[must_use]
    pub fn angle_degrees(&self) -> f32 {
        binary_angle_degrees(self.elevation_angle)
    }
}
