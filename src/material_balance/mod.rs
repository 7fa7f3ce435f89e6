//! Material Balance Engine
//!
//! Havlena-Odeh analysis of a reservoir study:
//! - `calculate_mbe_terms()` - F, Eo, Eg, Efw for one data point
//! - `MaterialBalanceStudy::calculate_mbe_terms()` - the same for every point
//!   of a study, without a regression
//! - `MaterialBalanceStudy::perform_havlena_odeh_analysis()` - plot selection,
//!   regression, OOIP, drive indices, primary mechanism, fit quality
//! - `fetkovich_water_influx()` / `carter_tracy_water_influx()` - aquifer screening
//!
//! ## Plot selection
//!
//! | Gas cap | Aquifer | Plot                 | N from    |
//! |---------|---------|----------------------|-----------|
//! | no      | no      | F vs Eo+Efw          | slope     |
//! | yes     | no      | F vs Eo+m·Eg+Efw     | slope     |
//! | any     | yes     | F/Eo vs Efw/Eo       | intercept |
//!
//! A point enters the regression only when its plot x is positive (or, for
//! the aquifer plot, when Eo is positive). The study is written back only
//! after every step has succeeded.
//!
//! Drive indices are left empty when the last point's F is not positive,
//! as in a pressure-maintained reservoir injecting more than it produces.
//! The regression and OOIP are still reported.

mod aquifer;
mod drive_indices;
mod terms;

pub use aquifer::{carter_tracy_water_influx, fetkovich_water_influx};
pub use terms::calculate_mbe_terms;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::{ComputationError, EngineError, EngineResult, ValidationError};
use crate::numeric::{checked_add, checked_div, checked_mul, round, scale};
use crate::physics_engine::linear_regression;
use crate::types::{
    HavlenaOdehAnalysis, InitialConditions, MaterialBalanceDataPoint, MaterialBalanceStudy, MbeTerms, PlotCoordinates,
    PlotType,
};
use terms::Reference;

impl MaterialBalanceStudy {
    #[must_use]
    pub fn with_reservoir_id(mut self, reservoir_id: impl Into<String>) -> Self {
        self.reservoir_id = Some(reservoir_id.into());
        self
    }

    #[must_use]
    pub fn with_gas_cap(mut self, has_gas_cap: bool) -> Self {
        self.set_gas_cap(has_gas_cap);
        self
    }

    #[must_use]
    pub fn with_aquifer_support(mut self, has_aquifer_support: bool) -> Self {
        self.set_aquifer_support(has_aquifer_support);
        self
    }

    #[must_use]
    pub fn with_data_points(mut self, points: Vec<MaterialBalanceDataPoint>) -> Self {
        self.set_data_points(points);
        self
    }

    pub fn set_initial_conditions(&mut self, initial: InitialConditions) {
        self.initial = initial;
        self.invalidate();
    }

    pub fn set_gas_cap(&mut self, has_gas_cap: bool) {
        self.has_gas_cap = has_gas_cap;
        self.invalidate();
    }

    pub fn set_aquifer_support(&mut self, has_aquifer_support: bool) {
        self.has_aquifer_support = has_aquifer_support;
        self.invalidate();
    }

    pub fn set_data_points(&mut self, points: Vec<MaterialBalanceDataPoint>) {
        self.data_points = points;
        self.invalidate();
    }

    pub fn push_point(&mut self, point: MaterialBalanceDataPoint) {
        self.data_points.push(point);
        self.invalidate();
    }

    /// Drop everything derived from the previous inputs.
    fn invalidate(&mut self) {
        self.analysis = None;
        for point in &mut self.data_points {
            point.terms = None;
            point.plot = None;
            point.included_in_regression = false;
        }
    }

    /// Fill F, Eo, Eg and Efw on every data point.
    ///
    /// Needs at least one point, the required initial conditions and
    /// non-increasing pressure. On failure no point is touched.
    pub fn calculate_mbe_terms(&mut self) -> EngineResult<()> {
        let (_, terms) = self.compute_terms()?;
        for (point, t) in self.data_points.iter_mut().zip(terms) {
            point.terms = Some(t);
        }
        debug!(study = %self.name, points = self.data_points.len(), "MBE terms calculated");
        Ok(())
    }

    fn compute_terms(&self) -> EngineResult<(Reference, Vec<MbeTerms>)> {
        if self.data_points.is_empty() {
            return Err(EngineError::insufficient("no data points provided for material balance"));
        }
        let reference = Reference::resolve(&self.initial)?;
        validate_pressure_order(&self.data_points)?;
        let terms = self
            .data_points
            .iter()
            .map(|p| terms::terms_for(p, &reference))
            .collect::<EngineResult<Vec<_>>>()?;
        Ok((reference, terms))
    }

    /// Run the full Havlena-Odeh analysis over the study's data points.
    ///
    /// On success every point carries its terms, plot coordinates and
    /// inclusion flag, and the study carries the analysis. On failure the
    /// study is left exactly as it was.
    pub fn perform_havlena_odeh_analysis(&mut self, config: &EngineConfig) -> EngineResult<&HavlenaOdehAnalysis> {
        let mb = &config.material_balance;
        if self.data_points.len() < mb.min_data_points {
            return Err(EngineError::insufficient(format!(
                "material balance needs at least {} data points, got {}",
                mb.min_data_points,
                self.data_points.len()
            )));
        }
        let (reference, terms) = self.compute_terms()?;

        let plot_type = PlotType::select(self.has_gas_cap, self.has_aquifer_support);
        let coordinates = terms
            .iter()
            .map(|t| plot_coordinates(plot_type, t, reference.gas_cap_ratio))
            .collect::<EngineResult<Vec<_>>>()?;

        let included: Vec<bool> = coordinates
            .iter()
            .map(|c| match c {
                Some(c) => plot_type.ooip_from_intercept() || c.x > Decimal::ZERO,
                None => false,
            })
            .collect();

        let pairs: Vec<(Decimal, Decimal)> = coordinates
            .iter()
            .zip(&included)
            .filter_map(|(c, &inc)| c.filter(|_| inc).map(|c| (c.x, c.y)))
            .collect();

        debug!(
            study = %self.name,
            plot_type = %plot_type,
            included = pairs.len(),
            total = self.data_points.len(),
            "Havlena-Odeh points selected"
        );

        if pairs.len() < mb.min_data_points {
            return Err(EngineError::insufficient(format!(
                "only {} of {} points usable for {} plot, need {}",
                pairs.len(),
                self.data_points.len(),
                plot_type,
                mb.min_data_points
            )));
        }

        let regression = linear_regression(&pairs)?;
        let raw_ooip = if plot_type.ooip_from_intercept() {
            regression.intercept
        } else {
            regression.slope
        };
        let calculated_ooip = round(raw_ooip, scale::OOIP);
        if calculated_ooip <= Decimal::ZERO {
            return Err(ComputationError::NonPhysical {
                quantity: "OOIP",
                value: calculated_ooip,
            }
            .into());
        }

        let last = terms.last().copied().ok_or_else(|| EngineError::insufficient("no data points"))?;
        let drive_indices =
            drive_indices::calculate(calculated_ooip, &last, reference.gas_cap_ratio, self.has_gas_cap)?;
        let primary_drive_mechanism =
            drive_indices.map(|idx| drive_indices::primary_mechanism(&idx, mb.dominant_drive_threshold));
        let analysis_quality = drive_indices::classify_quality(regression.r_squared, mb);

        info!(
            study = %self.name,
            plot_type = %plot_type,
            ooip = %calculated_ooip,
            r_squared = %regression.r_squared,
            quality = %analysis_quality,
            drive = ?primary_drive_mechanism,
            "Havlena-Odeh analysis completed"
        );

        for ((point, t), (plot, inc)) in self
            .data_points
            .iter_mut()
            .zip(terms)
            .zip(coordinates.into_iter().zip(included))
        {
            point.terms = Some(t);
            point.plot = plot;
            point.included_in_regression = inc;
        }

        Ok(&*self.analysis.insert(HavlenaOdehAnalysis {
            plot_type,
            regression,
            calculated_ooip,
            drive_indices,
            primary_drive_mechanism,
            analysis_quality,
        }))
    }
}

fn validate_pressure_order(points: &[MaterialBalanceDataPoint]) -> Result<(), ValidationError> {
    match points.windows(2).position(|w| w[1].pressure > w[0].pressure) {
        Some(i) => Err(ValidationError::Ordering {
            index: i + 1,
            message: format!(
                "pressure rises from {} to {} psi; points must be ordered by decreasing pressure",
                points[i].pressure,
                points[i + 1].pressure
            ),
        }),
        None => Ok(()),
    }
}

/// Plot coordinates for one point, `None` when the aquifer plot's Eo
/// denominator is not positive.
fn plot_coordinates(plot_type: PlotType, t: &MbeTerms, gas_cap_ratio: Decimal) -> EngineResult<Option<PlotCoordinates>> {
    let coords = match plot_type {
        PlotType::FVsEo => Some(PlotCoordinates {
            x: checked_add(t.eo, t.efw, "plot x")?,
            y: t.f,
        }),
        PlotType::FVsEoEg => Some(PlotCoordinates {
            x: checked_add(
                checked_add(t.eo, checked_mul(gas_cap_ratio, t.eg, "plot x")?, "plot x")?,
                t.efw,
                "plot x",
            )?,
            y: t.f,
        }),
        PlotType::FOverEoVsEfwOverEo => {
            if t.eo > Decimal::ZERO {
                Some(PlotCoordinates {
                    x: round(checked_div(t.efw, t.eo, "Efw/Eo")?, scale::MBE_TERM),
                    y: round(checked_div(t.f, t.eo, "F/Eo")?, scale::MBE_TERM),
                })
            } else {
                None
            }
        }
    };
    Ok(coords)
}
