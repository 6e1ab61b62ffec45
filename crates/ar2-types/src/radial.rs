use ar2_wire::julian::modified_julian_to_utc;
use ar2_wire::volume_header::ascii_field;
use ar2_wire::{ByteReader, WireError};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::descriptor::{ElevationData, RadialData, VolumeData};
use crate::error::TypeError;
use crate::moment::DataMoment;
use crate::product::Product;

/// Fixed part of a Message 31, up to and including the data block count.
/// The data block pointer table follows directly.
///
/// ```text
/// ┌────────┬─────────┬──────────────────────────────────────────────┐
/// │ Offset │ Size    │ Description                                  │
/// ├────────┼─────────┼──────────────────────────────────────────────┤
/// │ 0x00   │ 4 bytes │ Radar identifier (ICAO)                      │
/// │ 0x04   │ 4 bytes │ Collection time (ms past midnight UTC)       │
/// │ 0x08   │ 2 bytes │ Collection date (modified Julian)            │
/// │ 0x0A   │ 2 bytes │ Azimuth number within the elevation scan     │
/// │ 0x0C   │ 4 bytes │ Azimuth angle (f32, degrees)                 │
/// │ 0x10   │ 1 byte  │ Compression indicator                        │
/// │ 0x11   │ 1 byte  │ Spare                                        │
/// │ 0x12   │ 2 bytes │ Radial length (bytes, header included)       │
/// │ 0x14   │ 1 byte  │ Azimuth resolution spacing code              │
/// │ 0x15   │ 1 byte  │ Radial status                                │
/// │ 0x16   │ 1 byte  │ Elevation number                             │
/// │ 0x17   │ 1 byte  │ Cut sector number                            │
/// │ 0x18   │ 4 bytes │ Elevation angle (f32, degrees)               │
/// │ 0x1C   │ 1 byte  │ Radial spot blanking status                  │
/// │ 0x1D   │ 1 byte  │ Azimuth indexing mode                        │
/// │ 0x1E   │ 2 bytes │ Data block count (pointers that follow, ≥ 3) │
/// └────────┴─────────┴──────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RadialHeader {
    pub radar_identifier: [u8; 4],
    pub collection_time: u32,
    pub collection_date: u16,
    pub azimuth_number: u16,
    pub azimuth_angle: f32,
    pub compression_indicator: u8,
    #[serde(skip)]
    pub spare: u8,
    pub radial_length: u16,
    pub azimuth_resolution_spacing: u8,
    pub radial_status: u8,
    pub elevation_number: u8,
    pub cut_sector_number: u8,
    pub elevation_angle: f32,
    pub spot_blanking_status: u8,
    pub azimuth_indexing_mode: u8,
    pub data_block_count: u16,
}

impl RadialHeader {
    pub const SIZE: usize = 32;

    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than 32 bytes remain.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, WireError> {
        reader.peek_bytes(Self::SIZE)?;
        Ok(Self {
            radar_identifier: reader.read_array()?,
            collection_time: reader.read_u32()?,
            collection_date: reader.read_u16()?,
            azimuth_number: reader.read_u16()?,
            azimuth_angle: reader.read_f32()?,
            compression_indicator: reader.read_u8()?,
            spare: reader.read_u8()?,
            radial_length: reader.read_u16()?,
            azimuth_resolution_spacing: reader.read_u8()?,
            radial_status: reader.read_u8()?,
            elevation_number: reader.read_u8()?,
            cut_sector_number: reader.read_u8()?,
            elevation_angle: reader.read_f32()?,
            spot_blanking_status: reader.read_u8()?,
            azimuth_indexing_mode: reader.read_u8()?,
            data_block_count: reader.read_u16()?,
        })
    }

    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.radar_identifier);
        buf.extend_from_slice(&self.collection_time.to_be_bytes());
        buf.extend_from_slice(&self.collection_date.to_be_bytes());
        buf.extend_from_slice(&self.azimuth_number.to_be_bytes());
        buf.extend_from_slice(&self.azimuth_angle.to_be_bytes());
        buf.push(self.compression_indicator);
        buf.push(self.spare);
        buf.extend_from_slice(&self.radial_length.to_be_bytes());
        buf.push(self.azimuth_resolution_spacing);
        buf.push(self.radial_status);
        buf.push(self.elevation_number);
        buf.push(self.cut_sector_number);
        buf.extend_from_slice(&self.elevation_angle.to_be_bytes());
        buf.push(self.spot_blanking_status);
        buf.push(self.azimuth_indexing_mode);
        buf.extend_from_slice(&self.data_block_count.to_be_bytes());
    }

    /// # Errors
    ///
    /// [`WireError::InvalidAscii`] for a non-printable identifier.
    pub fn station(&self) -> Result<&str, WireError> {
        ascii_field("radar_identifier", &self.radar_identifier)
    }

    /// Azimuthal spacing between adjacent radials: code 1 is 0.5°,
    /// anything else 1.0°.
    #[must_use]
    pub fn azimuth_resolution_spacing(&self) -> f32 {
        if self.azimuth_resolution_spacing == 1 { 0.5 } else { 1.0 }
    }

    #[must_use]
    pub fn radial_status(&self) -> RadialStatus {
        RadialStatus::from_wire(self.radial_status)
    }

    #[must_use]
    pub fn collection_date_time(&self) -> Option<DateTime<Utc>> {
        modified_julian_to_utc(
            i64::from(self.collection_date),
            i64::from(self.collection_time),
        )
    }
}

/// Position of a radial within the volume scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RadialStatus {
    StartOfElevation,
    Intermediate,
    EndOfElevation,
    StartOfVolume,
    EndOfVolume,
    StartNewElevation,
    Unknown(u8),
}

impl RadialStatus {
    #[must_use]
    pub fn from_wire(code: u8) -> Self {
        match code {
            0 => Self::StartOfElevation,
            1 => Self::Intermediate,
            2 => Self::EndOfElevation,
            3 => Self::StartOfVolume,
            4 => Self::EndOfVolume,
            5 => Self::StartNewElevation,
            other => Self::Unknown(other),
        }
    }

    #[must_use]
    pub fn to_wire(self) -> u8 {
        match self {
            Self::StartOfElevation => 0,
            Self::Intermediate => 1,
            Self::EndOfElevation => 2,
            Self::StartOfVolume => 3,
            Self::EndOfVolume => 4,
            Self::StartNewElevation => 5,
            Self::Unknown(code) => code,
        }
    }
}

/// One decoded Message 31: the fixed header, the three descriptor blocks
/// and whichever moments the RDA sent for this cut.
///
/// Surveillance cuts typically carry REF (plus the dual-pol moments);
/// Doppler cuts add VEL and SW. Asking for a moment that is not present is
/// a recoverable [`TypeError::ProductAbsent`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Radial {
    pub header: RadialHeader,
    /// Non-zero data block pointers, extension pointers included, in table
    /// order. Offsets are relative to the start of the message.
    pub data_block_pointers: Vec<u32>,
    pub volume: VolumeData,
    pub elevation: ElevationData,
    pub radial: RadialData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reflectivity: Option<DataMoment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity: Option<DataMoment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spectrum_width: Option<DataMoment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub differential_reflectivity: Option<DataMoment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub differential_phase: Option<DataMoment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_coefficient: Option<DataMoment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clutter_filter_power: Option<DataMoment>,
}

impl Radial {
    #[must_use]
    pub fn new(
        header: RadialHeader,
        volume: VolumeData,
        elevation: ElevationData,
        radial: RadialData,
    ) -> Self {
        Self {
            header,
            data_block_pointers: Vec::new(),
            volume,
            elevation,
            radial,
            reflectivity: None,
            velocity: None,
            spectrum_width: None,
            differential_reflectivity: None,
            differential_phase: None,
            correlation_coefficient: None,
            clutter_filter_power: None,
        }
    }

    fn slot(&self, product: Product) -> &Option<DataMoment> {
        match product {
            Product::Reflectivity => &self.reflectivity,
            Product::Velocity => &self.velocity,
            Product::SpectrumWidth => &self.spectrum_width,
            Product::DifferentialReflectivity => &self.differential_reflectivity,
            Product::DifferentialPhase => &self.differential_phase,
            Product::CorrelationCoefficient => &self.correlation_coefficient,
            Product::ClutterFilterPower => &self.clutter_filter_power,
        }
    }

    fn slot_mut(&mut self, product: Product) -> &mut Option<DataMoment> {
        match product {
            Product::Reflectivity => &mut self.reflectivity,
            Product::Velocity => &mut self.velocity,
            Product::SpectrumWidth => &mut self.spectrum_width,
            Product::DifferentialReflectivity => &mut self.differential_reflectivity,
            Product::DifferentialPhase => &mut self.differential_phase,
            Product::CorrelationCoefficient => &mut self.correlation_coefficient,
            Product::ClutterFilterPower => &mut self.clutter_filter_power,
        }
    }

    /// Store a moment under its product, returning the one it replaced.
    pub fn insert_moment(&mut self, moment: DataMoment) -> Option<DataMoment> {
        self.slot_mut(moment.product()).replace(moment)
    }

    #[must_use]
    pub fn moment(&self, product: Product) -> Option<&DataMoment> {
        self.slot(product).as_ref()
    }

    /// Present moments in [`Product::ALL`] order.
    pub fn moments(&self) -> impl Iterator<Item = &DataMoment> + '_ {
        Product::ALL.into_iter().filter_map(|p| self.moment(p))
    }

    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.moments().map(DataMoment::product).collect()
    }

    fn require(&self, product: Product) -> Result<&DataMoment, TypeError> {
        self.moment(product).ok_or(TypeError::ProductAbsent(product))
    }

    /// Rescaled gates of one moment.
    ///
    /// # Errors
    ///
    /// [`TypeError::ProductAbsent`] if the radial does not carry `product`.
    pub fn scaled_data(&self, product: Product) -> Result<Vec<f32>, TypeError> {
        Ok(self.require(product)?.scaled_data())
    }

    /// Like [`scaled_data`](Self::scaled_data), selecting the product by
    /// name (`"REF"`, `"SW"`, `"SW "`, ...).
    ///
    /// # Errors
    ///
    /// [`TypeError::UnknownProduct`] for an unrecognized name,
    /// [`TypeError::ProductAbsent`] if the radial does not carry it.
    pub fn scaled_data_by_name(&self, name: &str) -> Result<Vec<f32>, TypeError> {
        self.scaled_data(name.parse()?)
    }

    /// Range to the first gate of `product`, in meters.
    ///
    /// # Errors
    ///
    /// [`TypeError::ProductAbsent`] if the radial does not carry `product`.
    pub fn first_gate_range(&self, product: Product) -> Result<u16, TypeError> {
        Ok(self.require(product)?.first_gate_range())
    }

    /// Gate spacing of `product`, in meters.
    ///
    /// # Errors
    ///
    /// [`TypeError::ProductAbsent`] if the radial does not carry `product`.
    pub fn gate_spacing(&self, product: Product) -> Result<u16, TypeError> {
        Ok(self.require(product)?.gate_spacing())
    }

    #[must_use]
    pub fn azimuth_angle(&self) -> f32 {
        self.header.azimuth_angle
    }

    #[must_use]
    pub fn elevation_angle(&self) -> f32 {
        self.header.elevation_angle
    }

    #[must_use]
    pub fn elevation_number(&self) -> u8 {
        self.header.elevation_number
    }

    #[must_use]
    pub fn azimuth_resolution_spacing(&self) -> f32 {
        self.header.azimuth_resolution_spacing()
    }

    #[must_use]
    pub fn collection_date_time(&self) -> Option<DateTime<Utc>> {
        self.header.collection_date_time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moment::MomentHeader;

    fn header() -> RadialHeader {
        RadialHeader {
            radar_identifier: *b"KCRP",
            collection_time: 169_000,
            collection_date: 18_890,
            azimuth_number: 1,
            azimuth_angle: 0.25,
            radial_length: 4_000,
            azimuth_resolution_spacing: 1,
            radial_status: 3,
            elevation_number: 1,
            elevation_angle: 0.48,
            data_block_count: 4,
            ..RadialHeader::default()
        }
    }

    fn radial_with_ref() -> Radial {
        let mut radial = Radial::new(
            header(),
            VolumeData::default(),
            ElevationData::default(),
            RadialData::default(),
        );
        let header = MomentHeader {
            scale: 2.0,
            offset: 66.0,
            first_gate_range: 2125,
            gate_spacing: 250,
            ..MomentHeader::new(Product::Reflectivity, 0)
        };
        radial.insert_moment(DataMoment::from_codes(header, &[0, 1, 70]).unwrap());
        radial
    }

    #[test]
    fn header_layout() {
        let h = header();
        let mut buf = Vec::new();
        h.write_to(&mut buf);
        assert_eq!(buf.len(), RadialHeader::SIZE);
        assert_eq!(&buf[30..32], &4u16.to_be_bytes());

        let parsed = RadialHeader::read_from(&mut ByteReader::new(&buf)).unwrap();
        assert_eq!(parsed, h);
        assert_eq!(parsed.station().unwrap(), "KCRP");
        assert_eq!(parsed.radial_status(), RadialStatus::StartOfVolume);
    }

    #[test]
    fn azimuth_spacing_codes() {
        let mut h = header();
        assert_eq!(h.azimuth_resolution_spacing(), 0.5);
        h.azimuth_resolution_spacing = 2;
        assert_eq!(h.azimuth_resolution_spacing(), 1.0);
        h.azimuth_resolution_spacing = 0;
        assert_eq!(h.azimuth_resolution_spacing(), 1.0);
    }

    #[test]
    fn collection_time() {
        let t = header().collection_date_time().unwrap();
        assert_eq!(t.to_rfc3339(), "2021-09-19T00:02:49+00:00");
    }

    #[test]
    fn radial_status_codes() {
        for code in 0..=5 {
            assert_eq!(RadialStatus::from_wire(code).to_wire(), code);
        }
        assert_eq!(RadialStatus::from_wire(9), RadialStatus::Unknown(9));
    }

    #[test]
    fn product_selection() {
        let radial = radial_with_ref();
        assert_eq!(radial.products(), vec![Product::Reflectivity]);
        assert_eq!(
            radial.scaled_data(Product::Reflectivity).unwrap(),
            vec![999.0, 998.0, 2.0]
        );
        assert_eq!(radial.scaled_data_by_name("REF").unwrap().len(), 3);
        assert_eq!(radial.first_gate_range(Product::Reflectivity).unwrap(), 2125);
        assert_eq!(radial.gate_spacing(Product::Reflectivity).unwrap(), 250);
    }

    #[test]
    fn absent_product_is_recoverable() {
        let radial = radial_with_ref();
        assert!(matches!(
            radial.scaled_data(Product::Velocity),
            Err(TypeError::ProductAbsent(Product::Velocity))
        ));
        assert!(matches!(
            radial.scaled_data_by_name("SW"),
            Err(TypeError::ProductAbsent(Product::SpectrumWidth))
        ));
        assert!(matches!(
            radial.scaled_data_by_name("NOPE"),
            Err(TypeError::UnknownProduct(_))
        ));
    }

    #[test]
    fn insert_reports_replacement() {
        let mut radial = radial_with_ref();
        let again = radial.reflectivity.clone().unwrap();
        assert!(radial.insert_moment(again).is_some());
        let moment_header = MomentHeader::new(Product::ClutterFilterPower, 0);
        let cfp = DataMoment::from_codes(moment_header, &[2]).unwrap();
        assert!(radial.insert_moment(cfp).is_none());
        assert!(radial.clutter_filter_power.is_some());
        assert_eq!(
            radial.products(),
            vec![Product::Reflectivity, Product::ClutterFilterPower]
        );
    }
}
