//! Decline curve types: DeclineModel, ArpsParameters, DeclineResults, ForecastPoint

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Arps branch, selected exactly by the exponent `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeclineType {
    /// b = 0
    Exponential,
    /// 0 < b < 1
    Hyperbolic,
    /// b = 1
    Harmonic,
}

impl DeclineType {
    /// Degenerate branches are chosen on exact equality, no blending.
    pub fn from_exponent(b: Decimal) -> Self {
        if b.is_zero() {
            Self::Exponential
        } else if b == Decimal::ONE {
            Self::Harmonic
        } else {
            Self::Hyperbolic
        }
    }
}

impl fmt::Display for DeclineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exponential => write!(f, "EXPONENTIAL"),
            Self::Hyperbolic => write!(f, "HYPERBOLIC"),
            Self::Harmonic => write!(f, "HARMONIC"),
        }
    }
}

/// Raw Arps inputs for one well/run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArpsParameters {
    /// Initial rate (bopd), > 0
    pub qi: Decimal,
    /// Initial nominal decline (1/year), > 0
    pub di: Decimal,
    /// Decline exponent, 0 ≤ b ≤ 1
    pub b: Decimal,
    /// Rate floor (bopd), ≥ 0
    pub economic_limit: Decimal,
}

/// Rate and cumulative at a fixed horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizonSnapshot {
    pub years: u32,
    /// bopd (2 dp)
    pub rate: Decimal,
    /// bbl (0 dp)
    pub cumulative: Decimal,
}

/// EUR under each Arps branch, for comparison against the fitted one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EurComparison {
    pub exponential: Decimal,
    /// Evaluated at the configured comparison exponent
    pub hyperbolic: Decimal,
    /// Evaluated at the configured practical horizon
    pub harmonic: Decimal,
}

/// Everything `perform_analysis` derives, computed together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclineResults {
    pub decline_type: DeclineType,
    /// di / 12 (6 dp)
    pub di_per_month: Decimal,
    /// Time at which rate reaches the economic limit (years). `None` when the
    /// limit is zero and is never reached.
    pub time_to_limit_years: Option<Decimal>,
    /// Estimated ultimate recovery (bbl)
    pub eur: Decimal,
    /// round(time_to_limit · 12)
    pub remaining_life_months: Option<u32>,
    pub snapshots: Vec<HorizonSnapshot>,
    pub eur_comparison: EurComparison,
}

impl DeclineResults {
    pub fn snapshot(&self, years: u32) -> Option<&HorizonSnapshot> {
        self.snapshots.iter().find(|s| s.years == years)
    }
}

/// One decline analysis. Parameters and results change together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclineModel {
    /// Host identifier for the analysed well, opaque to the engine
    pub well_id: Option<String>,
    pub(crate) parameters: ArpsParameters,
    pub(crate) results: Option<DeclineResults>,
}

impl DeclineModel {
    pub const fn parameters(&self) -> &ArpsParameters {
        &self.parameters
    }

    pub const fn results(&self) -> Option<&DeclineResults> {
        self.results.as_ref()
    }
}

/// One sample of a production forecast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub month: u32,
    /// month / 12 (6 dp)
    pub years: Decimal,
    /// bopd (2 dp)
    pub rate: Decimal,
    /// bbl (0 dp)
    pub cumulative: Decimal,
}
