//! Decline Curve Analyzer
//!
//! Arps decline analysis of a single well:
//! - `rate_at()` / `cumulative_at()` / `time_to_rate()` - closed-form Arps kernels
//! - `DeclineModel::perform_analysis()` - EUR, remaining life, horizon snapshots,
//!   EUR under each Arps branch for comparison
//! - `DeclineModel::forecast()` - lazy, restartable monthly forecast
//!
//! Derived results are computed into a local value and only then stored on
//! the model, so a failed analysis leaves the previous results untouched.

mod arps;
mod forecast;

pub use arps::{cumulative_at, rate_at, time_to_rate};
pub use forecast::{Forecast, ForecastIter};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::info;

use crate::config::defaults::MONTHS_PER_YEAR;
use crate::config::{DeclineConfig, EngineConfig};
use crate::error::{ComputationError, EngineResult, ValidationError};
use crate::numeric::{checked_div, quantize, require_non_negative, round, scale, to_f64};
use crate::types::{ArpsParameters, DeclineModel, DeclineResults, EurComparison, HorizonSnapshot};
use arps::ArpsCurve;

impl ArpsParameters {
    /// qi > 0, di > 0, 0 ≤ b ≤ 1, 0 ≤ economic limit ≤ qi.
    pub fn validate(&self) -> EngineResult<()> {
        ArpsCurve::from_parameters(self)?;
        require_non_negative("Economic limit", self.economic_limit)?;
        if self.economic_limit > self.qi {
            return Err(ValidationError::OutOfRange {
                name: "Economic limit",
                value: self.economic_limit,
                min: Decimal::ZERO,
                max: self.qi,
            }
            .into());
        }
        Ok(())
    }
}

impl DeclineModel {
    /// Build a model from validated parameters. No results until
    /// `perform_analysis` runs.
    pub fn new(parameters: ArpsParameters) -> EngineResult<Self> {
        parameters.validate()?;
        Ok(Self {
            well_id: None,
            parameters,
            results: None,
        })
    }

    #[must_use]
    pub fn with_well_id(mut self, well_id: impl Into<String>) -> Self {
        self.well_id = Some(well_id.into());
        self
    }

    /// Compute every derived field from the current parameters.
    pub fn perform_analysis(&mut self, config: &EngineConfig) -> EngineResult<&DeclineResults> {
        let results = analyze(&self.parameters, &config.decline)?;

        info!(
            well_id = self.well_id.as_deref().unwrap_or("-"),
            decline_type = %results.decline_type,
            eur = %results.eur,
            remaining_life_months = ?results.remaining_life_months,
            "Decline analysis completed"
        );

        Ok(&*self.results.insert(results))
    }

    /// Replace the Arps parameters and recompute. Parameters and results
    /// change together or not at all.
    pub fn update_parameters(
        &mut self,
        parameters: ArpsParameters,
        config: &EngineConfig,
    ) -> EngineResult<&DeclineResults> {
        parameters.validate()?;
        let results = analyze(&parameters, &config.decline)?;

        info!(
            well_id = self.well_id.as_deref().unwrap_or("-"),
            qi = %parameters.qi,
            di = %parameters.di,
            b = %parameters.b,
            eur = %results.eur,
            "Decline parameters updated"
        );

        self.parameters = parameters;
        Ok(&*self.results.insert(results))
    }

    /// Monthly forecast over `years`, one sample every `step_months`.
    pub fn forecast(&self, years: u32, step_months: u32) -> EngineResult<Forecast> {
        Forecast::new(&self.parameters, years, step_months)
    }
}

// ============================================================================
// Analysis
// ============================================================================

fn analyze(p: &ArpsParameters, config: &DeclineConfig) -> EngineResult<DeclineResults> {
    p.validate()?;
    let curve = ArpsCurve::from_parameters(p)?;

    let (eur, time_to_limit) = estimate_eur(&curve, p.economic_limit, config.harmonic_eur_horizon_years)?;

    let time_to_limit_years = time_to_limit
        .map(|t| quantize(t, scale::TIME_YEARS, "time to economic limit"))
        .transpose()?;
    let remaining_life_months = time_to_limit.map(remaining_months).transpose()?;

    let snapshots = config
        .snapshot_horizons_years
        .iter()
        .map(|&years| {
            let t = Decimal::from(years);
            Ok(HorizonSnapshot {
                years,
                rate: rate_at(p.qi, p.di, p.b, t)?,
                cumulative: cumulative_at(p.qi, p.di, p.b, t)?,
            })
        })
        .collect::<EngineResult<Vec<_>>>()?;

    let eur_comparison = compare_eur(p, config)?;

    Ok(DeclineResults {
        decline_type: curve.kind,
        di_per_month: round(checked_div(p.di, MONTHS_PER_YEAR, "di per month")?, scale::RATIO),
        time_to_limit_years,
        eur,
        remaining_life_months,
        snapshots,
        eur_comparison,
    })
}

/// EUR and the time (years) at which the economic limit is reached.
///
/// A zero limit is never reached: EUR is the asymptotic cumulative for
/// b < 1 and the cumulative at the practical horizon for harmonic decline.
fn estimate_eur(
    curve: &ArpsCurve,
    economic_limit: Decimal,
    harmonic_horizon_years: u32,
) -> EngineResult<(Decimal, Option<f64>)> {
    if economic_limit.is_zero() {
        let eur = curve
            .asymptotic_cumulative()
            .unwrap_or_else(|| curve.cumulative(f64::from(harmonic_horizon_years)));
        return Ok((quantize(eur, scale::VOLUME, "EUR")?, None));
    }

    let t = curve.time_to(to_f64(economic_limit)).max(0.0);
    Ok((quantize(curve.cumulative(t), scale::VOLUME, "EUR")?, Some(t)))
}

fn remaining_months(time_to_limit_years: f64) -> EngineResult<u32> {
    let months = quantize(time_to_limit_years, scale::TIME_YEARS, "remaining life")? * MONTHS_PER_YEAR;
    round(months, 0)
        .to_u32()
        .ok_or_else(|| ComputationError::Overflow { quantity: "remaining life months" }.into())
}

fn compare_eur(p: &ArpsParameters, config: &DeclineConfig) -> EngineResult<EurComparison> {
    let horizon = config.harmonic_eur_horizon_years;
    let comparison_b = quantize(config.hyperbolic_comparison_exponent, scale::RATIO, "comparison exponent")?;

    let exponential = ArpsCurve::new(p.qi, p.di, Decimal::ZERO)?;
    let hyperbolic = ArpsCurve::new(p.qi, p.di, comparison_b)?;
    let harmonic = ArpsCurve::new(p.qi, p.di, Decimal::ONE)?;

    Ok(EurComparison {
        exponential: estimate_eur(&exponential, p.economic_limit, horizon)?.0,
        hyperbolic: estimate_eur(&hyperbolic, p.economic_limit, horizon)?.0,
        harmonic: quantize(harmonic.cumulative(f64::from(horizon)), scale::VOLUME, "harmonic EUR")?,
    })
}
