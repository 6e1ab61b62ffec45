use ar2_wire::{ByteReader, WireError};
use serde::Serialize;

/// Message 2, RDA status data.
///
/// Twenty-seven halfwords followed by 14 spare bytes (68 bytes in total).
/// The remainder of the 2432-byte slot is padding and is skipped by the
/// message framer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RadarStatus {
    pub rda_status: u16,
    pub operability_status: u16,
    pub control_status: u16,
    pub aux_power_generator_state: u16,
    pub average_tx_power: u16,
    pub horizontal_reflectivity_calibration: u16,
    pub data_transmission_enabled: u16,
    pub vcp_number: u16,
    pub rda_control_authorization: u16,
    pub rda_build: u16,
    pub operational_mode: u16,
    pub super_resolution_status: u16,
    pub clutter_mitigation_decision_status: u16,
    pub avset_status: u16,
    pub rda_alarm_summary: u16,
    pub command_acknowledgement: u16,
    pub channel_control_status: u16,
    pub spot_blanking_status: u16,
    pub bypass_map_generation_date: u16,
    pub bypass_map_generation_time: u16,
    pub clutter_filter_map_generation_date: u16,
    pub clutter_filter_map_generation_time: u16,
    pub vertical_reflectivity_calibration: u16,
    pub transition_power_source_status: u16,
    pub rms_control_status: u16,
    pub performance_check_status: u16,
    pub alarm_codes: u16,
    #[serde(skip)]
    pub spare: [u8; 14],
}

impl RadarStatus {
    pub const SIZE: usize = 68;

    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 68 bytes remain.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, WireError> {
        reader.peek_bytes(Self::SIZE)?;
        Ok(Self {
            rda_status: reader.read_u16()?,
            operability_status: reader.read_u16()?,
            control_status: reader.read_u16()?,
            aux_power_generator_state: reader.read_u16()?,
            average_tx_power: reader.read_u16()?,
            horizontal_reflectivity_calibration: reader.read_u16()?,
            data_transmission_enabled: reader.read_u16()?,
            vcp_number: reader.read_u16()?,
            rda_control_authorization: reader.read_u16()?,
            rda_build: reader.read_u16()?,
            operational_mode: reader.read_u16()?,
            super_resolution_status: reader.read_u16()?,
            clutter_mitigation_decision_status: reader.read_u16()?,
            avset_status: reader.read_u16()?,
            rda_alarm_summary: reader.read_u16()?,
            command_acknowledgement: reader.read_u16()?,
            channel_control_status: reader.read_u16()?,
            spot_blanking_status: reader.read_u16()?,
            bypass_map_generation_date: reader.read_u16()?,
            bypass_map_generation_time: reader.read_u16()?,
            clutter_filter_map_generation_date: reader.read_u16()?,
            clutter_filter_map_generation_time: reader.read_u16()?,
            vertical_reflectivity_calibration: reader.read_u16()?,
            transition_power_source_status: reader.read_u16()?,
            rms_control_status: reader.read_u16()?,
            performance_check_status: reader.read_u16()?,
            alarm_codes: reader.read_u16()?,
            spare: reader.read_array()?,
        })
    }

    pub fn write_to(&self, buf: &mut Vec<u8>) {
        for word in [
            self.rda_status,
            self.operability_status,
            self.control_status,
            self.aux_power_generator_state,
            self.average_tx_power,
            self.horizontal_reflectivity_calibration,
            self.data_transmission_enabled,
            self.vcp_number,
            self.rda_control_authorization,
            self.rda_build,
            self.operational_mode,
            self.super_resolution_status,
            self.clutter_mitigation_decision_status,
            self.avset_status,
            self.rda_alarm_summary,
            self.command_acknowledgement,
            self.channel_control_status,
            self.spot_blanking_status,
            self.bypass_map_generation_date,
            self.bypass_map_generation_time,
            self.clutter_filter_map_generation_date,
            self.clutter_filter_map_generation_time,
            self.vertical_reflectivity_calibration,
            self.transition_power_source_status,
            self.rms_control_status,
            self.performance_check_status,
            self.alarm_codes,
        ] {
            buf.extend_from_slice(&word.to_be_bytes());
        }
        buf.extend_from_slice(&self.spare);
    }

    /// Human-readable RDA status, `"UNKNOWN"` for codes outside the table.
    ///
    /// ```text
    /// 2 start-up   4 standby   8 restart   16 operating   32/64 spare
    /// ```
    #[must_use]
    pub fn rda_status_name(&self) -> &'static str {
        match self.rda_status {
            2 => "start-up",
            4 => "standby",
            8 => "restart",
            16 => "operating",
            32 | 64 => "spare",
            code => {
                log::warn!("unknown RDA status code {code}");
                "UNKNOWN"
            }
        }
    }

    /// Human-readable operability status, `"UNKNOWN"` for codes outside the
    /// table.
    #[must_use]
    pub fn operability_status_name(&self) -> &'static str {
        match self.operability_status {
            2 => "online",
            4 => "maintenance required",
            8 => "maintenance mandatory",
            16 => "commanded shut down",
            32 => "inoperable",
            code => {
                log::warn!("unknown operability status code {code}");
                "UNKNOWN"
            }
        }
    }

    /// RDA software build, e.g. `19.0` for a raw value of 1900.
    #[must_use]
    pub fn build_number(&self) -> f32 {
        f32::from(self.rda_build) / 100.0
    }
}
