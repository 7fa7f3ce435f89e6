//! Reservoir Analytics: decline curves, inflow performance and material balance
//!
//! A deterministic calculation engine for reservoir engineering workflows.
//! Callers own the model structs and hand them to the engine, which fills in
//! the derived results. Nothing here performs I/O apart from optional config
//! file loading.
//!
//! ## Architecture
//!
//! - **Decline**: Arps exponential / hyperbolic / harmonic analysis, EUR and
//!   lazy monthly forecasts
//! - **IPR**: Vogel and composite inflow calibration from one well test,
//!   curve sampling and operating point; Darcy, Fetkovich and Jones rates
//! - **Material Balance**: Havlena-Odeh straight-line analysis for OOIP and
//!   drive indices
//! - **Physics Engine**: stateless petrophysics and PVT correlations,
//!   volumetrics and regression
//! - **Batch**: parallel evaluation of many independent models
//!
//! All quantities are `rust_decimal::Decimal`; see [`numeric`] for the
//! rounding rules.

pub mod batch;
pub mod config;
pub mod decline;
pub mod error;
pub mod ipr;
pub mod material_balance;
pub mod numeric;
pub mod physics_engine;
pub mod types;

// Re-export configuration
pub use config::{ConfigError, EngineConfig};

// Re-export errors
pub use error::{ComputationError, EngineError, EngineResult, ValidationError};

// Re-export commonly used types
pub use types::{
    AnalysisQuality, ArpsParameters, DeclineModel, DeclineResults, DeclineType, DriveIndices, DriveMechanism,
    FluidDescription, ForecastPoint, HavlenaOdehAnalysis, InitialConditions, IprCalibration, IprCurvePoint, IprModel,
    IprRegime, LinearFit, MaterialBalanceDataPoint, MaterialBalanceStudy, MbeTerms, OperatingPoint, PlotType,
    PvtCorrelations, PvtIssue, PvtProperties, PvtSample, WellTest,
};

// Re-export analyzer entry points
pub use decline::{Forecast, ForecastIter};
pub use ipr::InflowEquation;
pub use material_balance::calculate_mbe_terms;
pub use physics_engine::{pvt_from_correlations, validate_pvt_data};
