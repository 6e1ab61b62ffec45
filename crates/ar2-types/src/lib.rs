#![warn(clippy::pedantic)]

pub mod descriptor;
pub mod error;
pub mod moment;
pub mod performance;
pub mod product;
pub mod radial;
pub mod status;
pub mod vcp;

pub use descriptor::{ElevationData, RadialData, VolumeData};
pub use error::TypeError;
pub use moment::{DataMoment, MomentHeader, ScaledGate};
pub use performance::RadarPerformance;
pub use product::{BlockName, Product};
pub use radial::{Radial, RadialHeader, RadialStatus};
pub use status::RadarStatus;
pub use vcp::{ElevationCut, VolumeCoveragePattern};

/// Canonical value substituted for a raw gate code of 0 (signal below
/// threshold). Compared by exact equality downstream; never NaN.
pub const MOMENT_DATA_BELOW_THRESHOLD: f32 = 999.0;

/// Canonical value substituted for a raw gate code of 1 (range folded).
pub const MOMENT_DATA_FOLDED: f32 = 998.0;
