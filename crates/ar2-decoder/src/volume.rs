use std::collections::BTreeMap;
use std::fmt;

use ar2_types::{Product, RadarPerformance, RadarStatus, Radial, VolumeCoveragePattern};
use ar2_wire::VolumeHeader;
use serde::Serialize;

/// A decoded Archive II volume.
///
/// Radials are grouped by elevation number and kept in the order they
/// were read. Elevations are whatever the file contained; there is no
/// fixed set. Status, performance and coverage pattern hold the last
/// message of each type seen anywhere in the file.
///
/// ```text
/// ┌──────────────────────────────────────────────────────────────┐
/// │ Volume                                                       │
/// │   header            VolumeHeader (ICAO, date, filename)      │
/// │   elevation_scans   1 → [Radial, Radial, ...]                │
/// │                     2 → [Radial, ...]                        │
/// │   radar_status      Option<RadarStatus>        (Message 2)   │
/// │   radar_performance Option<RadarPerformance>   (Message 3)   │
/// │   vcp               Option<VolumeCoveragePattern> (Msg 5)    │
/// └──────────────────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Volume {
    pub header: VolumeHeader,
    pub elevation_scans: BTreeMap<u8, Vec<Radial>>,
    pub radar_status: Option<RadarStatus>,
    pub radar_performance: Option<RadarPerformance>,
    pub vcp: Option<VolumeCoveragePattern>,
}

/// Radar site location, as reported by the Volume data block.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Site {
    pub latitude: f32,
    pub longitude: f32,
    /// Meters above sea level.
    pub height: u16,
    /// Feedhorn height above ground, in meters.
    pub feedhorn_height: u16,
}

impl Volume {
    #[must_use]
    pub fn new(header: VolumeHeader) -> Self {
        Self {
            header,
            elevation_scans: BTreeMap::new(),
            radar_status: None,
            radar_performance: None,
            vcp: None,
        }
    }

    /// Append a radial to the scan of its elevation number.
    pub fn push_radial(&mut self, radial: Radial) {
        self.elevation_scans
            .entry(radial.elevation_number())
            .or_default()
            .push(radial);
    }

    /// Elevation numbers present, ascending.
    #[must_use]
    pub fn elevations(&self) -> Vec<u8> {
        self.elevation_scans.keys().copied().collect()
    }

    #[must_use]
    pub fn scan(&self, elevation: u8) -> Option<&[Radial]> {
        self.elevation_scans.get(&elevation).map(Vec::as_slice)
    }

    /// All radials, elevation-ascending, then in arrival order.
    pub fn radials(&self) -> impl Iterator<Item = &Radial> + '_ {
        self.elevation_scans.values().flatten()
    }

    #[must_use]
    pub fn radial_count(&self) -> usize {
        self.elevation_scans.values().map(Vec::len).sum()
    }

    /// Site location from the first radial's Volume block.
    #[must_use]
    pub fn site(&self) -> Option<Site> {
        self.radials().next().map(|r| Site {
            latitude: r.volume.latitude,
            longitude: r.volume.longitude,
            height: r.volume.site_height,
            feedhorn_height: r.volume.feedhorn_height,
        })
    }

    /// Mean elevation angle of one scan, in degrees.
    #[must_use]
    pub fn elevation_angle(&self, elevation: u8) -> Option<f32> {
        let scan = self.scan(elevation).filter(|s| !s.is_empty())?;
        let sum: f64 = scan.iter().map(|r| f64::from(r.elevation_angle())).sum();
        #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
        let mean = (sum / scan.len() as f64) as f32;
        Some(mean)
    }

    /// Volume coverage pattern number, from the latest status message or
    /// else from the first radial.
    #[must_use]
    pub fn vcp_number(&self) -> Option<u16> {
        self.radar_status
            .as_ref()
            .map(|s| s.vcp_number)
            .or_else(|| self.radials().next().map(|r| r.volume.vcp_number))
    }
}

/// One-line-per-scan summary, used by tools and snapshot tests.
impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icao = self.header.icao().unwrap_or("????");
        write!(f, "{icao} {}", self.header.filename())?;
        if let Some(t) = self.header.date_time() {
            write!(f, " {}", t.format("%Y-%m-%dT%H:%M:%SZ"))?;
        }
        writeln!(f)?;
        if let Some(status) = &self.radar_status {
            writeln!(
                f,
                "status: {} / {}, VCP {}, build {:.2}",
                status.rda_status_name(),
                status.operability_status_name(),
                status.vcp_number,
                status.build_number()
            )?;
        }
        for (elevation, scan) in &self.elevation_scans {
            let angle = self.elevation_angle(*elevation).unwrap_or_default();
            let mut products: Vec<Product> = scan.iter().flat_map(Radial::products).collect();
            products.sort_unstable();
            products.dedup();
            let names: Vec<&str> = products.iter().map(|p| p.as_str()).collect();
            writeln!(
                f,
                "elevation {elevation:>2}: {:>4} radials at {angle:.2}° [{}]",
                scan.len(),
                names.join(" ")
            )?;
        }
        Ok(())
    }
}
