//! PVT types: correlation choices, fluid descriptions, derived properties

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BubblePointCorrelation {
    #[default]
    Standing,
    VazquezBeggs,
    Glaso,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OilFvfCorrelation {
    #[default]
    Standing,
    VazquezBeggs,
    Glaso,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolutionGorCorrelation {
    #[default]
    Standing,
    VazquezBeggs,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViscosityCorrelation {
    #[default]
    BeggsRobinson,
    Egbogah,
}

impl fmt::Display for BubblePointCorrelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standing => write!(f, "STANDING"),
            Self::VazquezBeggs => write!(f, "VAZQUEZ_BEGGS"),
            Self::Glaso => write!(f, "GLASO"),
        }
    }
}

impl fmt::Display for OilFvfCorrelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standing => write!(f, "STANDING"),
            Self::VazquezBeggs => write!(f, "VAZQUEZ_BEGGS"),
            Self::Glaso => write!(f, "GLASO"),
        }
    }
}

impl fmt::Display for ViscosityCorrelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeggsRobinson => write!(f, "BEGGS_ROBINSON"),
            Self::Egbogah => write!(f, "EGBOGAH"),
        }
    }
}

/// Which correlation estimates each property. Defaults to Standing for Pb
/// and Bo, Beggs-Robinson for dead-oil viscosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PvtCorrelations {
    pub bubble_point: BubblePointCorrelation,
    pub oil_fvf: OilFvfCorrelation,
    pub viscosity: ViscosityCorrelation,
}

/// Black-oil description used when no lab PVT is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FluidDescription {
    /// Reservoir temperature (°F)
    pub temperature_f: Decimal,
    /// Solution GOR at bubble point (scf/stb)
    pub solution_gor: Decimal,
    /// Gas specific gravity (air = 1)
    pub gas_gravity: Decimal,
    /// Stock-tank oil gravity (°API)
    pub api_gravity: Decimal,
}

/// PVT properties estimated from correlations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PvtProperties {
    /// Pb (psia, 2 dp)
    pub bubble_point_pressure: Decimal,
    /// Bo at Pb (rb/stb, 4 dp)
    pub oil_fvf_at_bubble_point: Decimal,
    /// Stock-tank oil viscosity (cp, 4 dp)
    pub dead_oil_viscosity: Decimal,
    /// γo from API (6 dp)
    pub oil_specific_gravity: Decimal,
    pub correlations: PvtCorrelations,
}

/// Lab or correlated PVT values to be checked for consistency. Absent
/// values are not checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PvtSample {
    pub api_gravity: Option<Decimal>,
    pub gas_gravity: Option<Decimal>,
    /// Pb (psia)
    pub bubble_point_pressure: Option<Decimal>,
    /// Pressure at which the sample was taken (psia)
    pub sample_pressure: Option<Decimal>,
    /// Bo at Pb (rb/stb)
    pub oil_fvf_at_bubble_point: Option<Decimal>,
    #[serde(default)]
    pub has_foamy_behavior: bool,
    /// Pseudo bubble point of a foamy oil (psia)
    pub pseudo_bubble_point: Option<Decimal>,
}

/// One inconsistency found in a `PvtSample`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PvtIssue {
    pub field: String,
    pub message: String,
}

impl fmt::Display for PvtIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}
