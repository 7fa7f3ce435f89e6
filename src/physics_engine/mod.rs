//! Physics Engine Module
//!
//! Stateless reservoir-engineering formulas shared by the analyzers.
//! All math here is deterministic physics/statistics.
//!
//! ## Correlations
//! - `archie_water_saturation()` / `larionov_shale_volume()` - Petrophysics
//! - `vogel_rate()` / `productivity_index()` - Single-point inflow
//!
//! ## PVT
//! - `bubble_point()` / `oil_fvf()` / `solution_gor()` / `dead_oil_viscosity()` -
//!   Standing, Vazquez-Beggs, Glasø, Beggs-Robinson and Egbogah by selection
//! - `pvt_from_correlations()` - Pb, Bo and μod for a fluid without lab PVT
//! - `validate_pvt_data()` - Consistency checks on lab values
//!
//! ## Volumetrics
//! - `volumetric_ooip()` - In-place oil from rock and fluid properties
//! - `equivalent_density()` - Pressure at depth as ppg
//!
//! ## Regression
//! - `linear_regression()` - Least squares with R² and slope p-value

pub mod correlations;
pub mod pvt;
pub mod regression;
pub mod volumetrics;

pub use correlations::{
    archie_water_saturation, larionov_shale_volume, productivity_index, vogel_rate, ArchieParameters,
};
pub use pvt::{
    api_to_specific_gravity, beggs_robinson_dead_oil_viscosity, bubble_point, dead_oil_viscosity,
    egbogah_dead_oil_viscosity, glaso_bubble_point, glaso_oil_fvf, oil_fvf, pvt_from_correlations,
    solution_gor, standing_bubble_point, standing_oil_fvf, standing_solution_gor, validate_pvt_data,
    vazquez_beggs_bubble_point, vazquez_beggs_oil_fvf, vazquez_beggs_solution_gor,
};
pub use regression::linear_regression;
pub use volumetrics::{equivalent_density, volumetric_ooip};
