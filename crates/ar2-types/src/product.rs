use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::TypeError;

/// Block type byte of the three descriptor blocks (VOL, ELV, RAD).
pub const DESCRIPTOR_BLOCK_TYPE: u8 = b'R';

/// Block type byte of every moment block.
pub const MOMENT_BLOCK_TYPE: u8 = b'D';

/// The four leading bytes of the Volume descriptor block. Always the first
/// data block of a Message 31, so it marks the end of the pointer table.
pub const VOLUME_BLOCK_SENTINEL: [u8; 4] = *b"RVOL";

/// Moment products a radial may carry.
///
/// Wire names are bit-exact 3-byte ASCII; spectrum width keeps its
/// trailing space (`"SW "`).
///
/// ```text
/// ┌──────────────────────────┬───────┬───────────────────────────────┐
/// │ Variant                  │ Wire  │ Quantity                      │
/// ├──────────────────────────┼───────┼───────────────────────────────┤
/// │ Reflectivity             │ "REF" │ dBZ                           │
/// │ Velocity                 │ "VEL" │ m/s                           │
/// │ SpectrumWidth            │ "SW " │ m/s                           │
/// │ DifferentialReflectivity │ "ZDR" │ dB                            │
/// │ DifferentialPhase        │ "PHI" │ degrees                       │
/// │ CorrelationCoefficient   │ "RHO" │ unitless                      │
/// │ ClutterFilterPower       │ "CFP" │ dB (RDA build 19 and later)   │
/// └──────────────────────────┴───────┴───────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Product {
    Reflectivity,
    Velocity,
    SpectrumWidth,
    DifferentialReflectivity,
    DifferentialPhase,
    CorrelationCoefficient,
    ClutterFilterPower,
}

impl Product {
    /// Every product, in wire/declaration order.
    pub const ALL: [Product; 7] = [
        Self::Reflectivity,
        Self::Velocity,
        Self::SpectrumWidth,
        Self::DifferentialReflectivity,
        Self::DifferentialPhase,
        Self::CorrelationCoefficient,
        Self::ClutterFilterPower,
    ];

    #[must_use]
    pub fn wire_name(self) -> [u8; 3] {
        match self {
            Self::Reflectivity => *b"REF",
            Self::Velocity => *b"VEL",
            Self::SpectrumWidth => *b"SW ",
            Self::DifferentialReflectivity => *b"ZDR",
            Self::DifferentialPhase => *b"PHI",
            Self::CorrelationCoefficient => *b"RHO",
            Self::ClutterFilterPower => *b"CFP",
        }
    }

    /// Match a 3-byte wire name exactly. `"SW"` without the trailing space
    /// is not a wire name and yields `None`.
    #[must_use]
    pub fn from_wire_name(name: [u8; 3]) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.wire_name() == name)
    }

    /// Short display name (`"SW"` without the trailing space).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reflectivity => "REF",
            Self::Velocity => "VEL",
            Self::SpectrumWidth => "SW",
            Self::DifferentialReflectivity => "ZDR",
            Self::DifferentialPhase => "PHI",
            Self::CorrelationCoefficient => "RHO",
            Self::ClutterFilterPower => "CFP",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product selector used by renderers: accepts the display names and the
/// 3-byte wire names (so both `"SW"` and `"SW "` select spectrum width).
impl FromStr for Product {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s || p.wire_name() == s.as_bytes())
            .ok_or_else(|| TypeError::UnknownProduct(s.to_string()))
    }
}

/// Name of a Message 31 data block, as found behind a data-block pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum BlockName {
    Volume,
    Elevation,
    Radial,
    Moment(Product),
}

impl BlockName {
    #[must_use]
    pub fn from_wire_name(name: [u8; 3]) -> Option<Self> {
        match &name {
            b"VOL" => Some(Self::Volume),
            b"ELV" => Some(Self::Elevation),
            b"RAD" => Some(Self::Radial),
            _ => Product::from_wire_name(name).map(Self::Moment),
        }
    }

    #[must_use]
    pub fn wire_name(self) -> [u8; 3] {
        match self {
            Self::Volume => *b"VOL",
            Self::Elevation => *b"ELV",
            Self::Radial => *b"RAD",
            Self::Moment(p) => p.wire_name(),
        }
    }

    /// The type byte written in front of the name (`'R'` or `'D'`).
    #[must_use]
    pub fn block_type(self) -> u8 {
        match self {
            Self::Moment(_) => MOMENT_BLOCK_TYPE,
            _ => DESCRIPTOR_BLOCK_TYPE,
        }
    }
}

impl fmt::Display for BlockName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Volume => f.write_str("VOL"),
            Self::Elevation => f.write_str("ELV"),
            Self::Radial => f.write_str("RAD"),
            Self::Moment(p) => fmt::Display::fmt(p, f),
        }
    }
}
