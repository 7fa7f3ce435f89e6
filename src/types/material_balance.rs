//! Material balance types: MaterialBalanceStudy, data points, Havlena-Odeh results

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::LinearFit;

/// Initial PVT and rock conditions of the reservoir.
///
/// Pi, Boi and Rsi are required for analysis; the rest enable optional terms
/// (Eg needs Bgi, Efw needs Swi, cw and cf).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialConditions {
    /// Pi (psi)
    pub initial_pressure: Option<Decimal>,
    /// Boi (rb/stb)
    pub initial_bo: Option<Decimal>,
    /// Bgi (rb/scf)
    pub initial_bg: Option<Decimal>,
    /// Rsi (scf/stb)
    pub initial_rs: Option<Decimal>,
    /// Swi (fraction)
    pub initial_water_saturation: Option<Decimal>,
    /// cw (1/psi)
    pub water_compressibility: Option<Decimal>,
    /// cf (1/psi)
    pub rock_compressibility: Option<Decimal>,
    /// m, gas cap to oil zone volume ratio
    pub gas_cap_ratio: Option<Decimal>,
}

/// Underground withdrawal and expansion terms of one point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MbeTerms {
    /// Underground withdrawal (rb)
    pub f: Decimal,
    /// Oil + dissolved gas expansion (rb/stb)
    pub eo: Decimal,
    /// Gas cap expansion (rb/stb)
    pub eg: Decimal,
    /// Connate water + formation expansion (rb/stb)
    pub efw: Decimal,
}

/// Havlena-Odeh plot coordinates of one point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotCoordinates {
    pub x: Decimal,
    pub y: Decimal,
}

/// One pressure/production/PVT sample of the history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialBalanceDataPoint {
    /// Average reservoir pressure (psi)
    pub pressure: Decimal,
    /// Oil FVF at pressure (rb/stb)
    pub bo: Decimal,
    /// Gas FVF at pressure (rb/scf)
    pub bg: Decimal,
    /// Solution GOR at pressure (scf/stb)
    pub rs: Decimal,
    /// Water FVF, 1.0 when absent
    pub bw: Option<Decimal>,
    /// Np
    pub cumulative_oil_production: Option<Decimal>,
    /// Gp (Bcf)
    pub cumulative_gas_production: Option<Decimal>,
    /// Wp
    pub cumulative_water_production: Option<Decimal>,
    /// Wi
    pub cumulative_water_injection: Option<Decimal>,
    /// Gi (Bcf)
    pub cumulative_gas_injection: Option<Decimal>,

    /// Filled by term calculation
    #[serde(default)]
    pub terms: Option<MbeTerms>,
    /// Filled by Havlena-Odeh analysis. `None` when the plot denominator is
    /// non-positive for this point.
    #[serde(default)]
    pub plot: Option<PlotCoordinates>,
    /// Whether the point entered the regression
    #[serde(default)]
    pub included_in_regression: bool,
}

impl MaterialBalanceDataPoint {
    pub fn new(pressure: Decimal, bo: Decimal, bg: Decimal, rs: Decimal) -> Self {
        Self {
            pressure,
            bo,
            bg,
            rs,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_production(mut self, oil: Decimal, gas: Decimal, water: Decimal) -> Self {
        self.cumulative_oil_production = Some(oil);
        self.cumulative_gas_production = Some(gas);
        self.cumulative_water_production = Some(water);
        self
    }

    #[must_use]
    pub const fn with_injection(mut self, water: Decimal, gas: Decimal) -> Self {
        self.cumulative_water_injection = Some(water);
        self.cumulative_gas_injection = Some(gas);
        self
    }
}

/// Which straight-line form of the material balance was fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlotType {
    /// F vs (Eo + Efw), slope = N
    #[serde(rename = "F_VS_EO")]
    FVsEo,
    /// F vs (Eo + m·Eg + Efw), slope = N
    #[serde(rename = "F_VS_EO_EG")]
    FVsEoEg,
    /// F/Eo vs Efw/Eo, intercept = N
    #[serde(rename = "F_EO_VS_EW_EF")]
    FOverEoVsEfwOverEo,
}

impl PlotType {
    pub const fn select(has_gas_cap: bool, has_aquifer: bool) -> Self {
        match (has_gas_cap, has_aquifer) {
            (false, false) => Self::FVsEo,
            (true, false) => Self::FVsEoEg,
            (_, true) => Self::FOverEoVsEfwOverEo,
        }
    }

    /// OOIP is read from the intercept rather than the slope.
    pub const fn ooip_from_intercept(self) -> bool {
        matches!(self, Self::FOverEoVsEfwOverEo)
    }
}

impl fmt::Display for PlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FVsEo => write!(f, "F_VS_EO"),
            Self::FVsEoEg => write!(f, "F_VS_EO_EG"),
            Self::FOverEoVsEfwOverEo => write!(f, "F_EO_VS_EW_EF"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriveMechanism {
    SolutionGas,
    GasCap,
    Water,
    Compaction,
    /// No single mechanism dominates
    Combination,
}

impl fmt::Display for DriveMechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SolutionGas => "SOLUTION_GAS",
            Self::GasCap => "GAS_CAP",
            Self::Water => "WATER",
            Self::Compaction => "COMPACTION",
            Self::Combination => "COMBINATION",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisQuality {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl fmt::Display for AnalysisQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Poor => "POOR",
            Self::Fair => "FAIR",
            Self::Good => "GOOD",
            Self::Excellent => "EXCELLENT",
        };
        write!(f, "{s}")
    }
}

/// Fractional contribution of each drive mechanism at the last data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveIndices {
    /// DDI, depletion / solution gas
    pub depletion: Decimal,
    /// SDI, segregation / gas cap
    pub gas_cap: Decimal,
    /// WDI, remainder attributed to water influx
    pub water: Decimal,
    /// CDI, compaction / formation and connate water
    pub compaction: Decimal,
}

impl DriveIndices {
    pub fn total(&self) -> Decimal {
        self.depletion + self.gas_cap + self.water + self.compaction
    }
}

/// Study-level results of a Havlena-Odeh analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HavlenaOdehAnalysis {
    pub plot_type: PlotType,
    pub regression: LinearFit,
    /// N (same volume unit as F / stb-based FVF, 4 dp)
    pub calculated_ooip: Decimal,
    /// `None` when the last point's F is not positive (net injection), where
    /// the indices have no meaning
    pub drive_indices: Option<DriveIndices>,
    pub primary_drive_mechanism: Option<DriveMechanism>,
    pub analysis_quality: AnalysisQuality,
}

/// One reservoir-level material balance study.
///
/// Inputs that feed the analysis are reachable only through setters, which
/// drop any derived terms and analysis computed from the old inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialBalanceStudy {
    pub name: String,
    /// Host identifier of the reservoir
    pub reservoir_id: Option<String>,
    pub(crate) initial: InitialConditions,
    pub(crate) has_gas_cap: bool,
    pub(crate) has_aquifer_support: bool,
    /// Ordered by decreasing pressure
    pub(crate) data_points: Vec<MaterialBalanceDataPoint>,
    #[serde(default)]
    pub(crate) analysis: Option<HavlenaOdehAnalysis>,
}

impl MaterialBalanceStudy {
    pub fn new(name: impl Into<String>, initial: InitialConditions) -> Self {
        Self {
            name: name.into(),
            initial,
            ..Self::default()
        }
    }

    pub const fn analysis(&self) -> Option<&HavlenaOdehAnalysis> {
        self.analysis.as_ref()
    }

    pub const fn initial_conditions(&self) -> &InitialConditions {
        &self.initial
    }

    pub const fn has_gas_cap(&self) -> bool {
        self.has_gas_cap
    }

    pub const fn has_aquifer_support(&self) -> bool {
        self.has_aquifer_support
    }

    pub fn data_points(&self) -> &[MaterialBalanceDataPoint] {
        &self.data_points
    }
}
