//! Lazy production forecast
//!
//! A `Forecast` is a description (parameters, horizon, step); each call to
//! `iter()` starts a fresh pass over it, so the sequence can be replayed
//! without recomputing anything up front.

use rust_decimal::Decimal;
use tracing::debug;

use super::arps::ArpsCurve;
use crate::config::defaults::MONTHS_PER_YEAR;
use crate::error::{EngineResult, ValidationError};
use crate::numeric::{checked_div, quantize, round, scale, to_f64};
use crate::types::{ArpsParameters, ForecastPoint};

/// Monthly-stepped forecast of one decline model.
#[derive(Debug, Clone)]
pub struct Forecast {
    curve: ArpsCurve,
    qi: Decimal,
    economic_limit: Decimal,
    total_months: u32,
    step_months: u32,
}

impl Forecast {
    pub(crate) fn new(parameters: &ArpsParameters, years: u32, step_months: u32) -> EngineResult<Self> {
        let curve = ArpsCurve::from_parameters(parameters)?;
        if step_months == 0 {
            return Err(ValidationError::NotPositive {
                name: "Forecast step (months)",
                value: Decimal::ZERO,
            }
            .into());
        }
        let total_months = years.checked_mul(12).ok_or(ValidationError::OutOfRange {
            name: "Forecast years",
            value: Decimal::from(years),
            min: Decimal::ZERO,
            max: Decimal::from(u32::MAX / 12),
        })?;

        Ok(Self {
            curve,
            qi: parameters.qi,
            economic_limit: parameters.economic_limit,
            total_months,
            step_months,
        })
    }

    pub const fn total_months(&self) -> u32 {
        self.total_months
    }

    pub const fn step_months(&self) -> u32 {
        self.step_months
    }

    /// Start a new pass from month 0.
    pub const fn iter(&self) -> ForecastIter<'_> {
        ForecastIter {
            forecast: self,
            next_month: Some(0),
        }
    }

    fn point(&self, month: u32) -> EngineResult<ForecastPoint> {
        let years = round(
            checked_div(Decimal::from(month), MONTHS_PER_YEAR, "forecast time")?,
            scale::TIME_YEARS,
        );
        let t = to_f64(years);
        let rate = if month == 0 {
            round(self.qi, scale::RATE)
        } else {
            quantize(self.curve.rate(t), scale::RATE, "forecast rate")?
        };
        let cumulative = quantize(self.curve.cumulative(t), scale::VOLUME, "forecast cumulative")?;
        Ok(ForecastPoint {
            month,
            years,
            rate,
            cumulative,
        })
    }
}

impl<'a> IntoIterator for &'a Forecast {
    type Item = EngineResult<ForecastPoint>;
    type IntoIter = ForecastIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One pass over a [`Forecast`].
///
/// Yields points at month 0, step, 2·step, ... up to the horizon. The first
/// point whose rate is below the economic limit is yielded and ends the
/// sequence. An evaluation error is yielded once and also ends it.
#[derive(Debug, Clone)]
pub struct ForecastIter<'a> {
    forecast: &'a Forecast,
    next_month: Option<u32>,
}

impl Iterator for ForecastIter<'_> {
    type Item = EngineResult<ForecastPoint>;

    fn next(&mut self) -> Option<Self::Item> {
        let month = self.next_month?;
        let f = self.forecast;

        let point = match f.point(month) {
            Ok(p) => p,
            Err(e) => {
                self.next_month = None;
                return Some(Err(e));
            }
        };

        self.next_month = if point.rate < f.economic_limit {
            debug!(month, rate = %point.rate, limit = %f.economic_limit, "Forecast reached economic limit");
            None
        } else {
            month
                .checked_add(f.step_months)
                .filter(|next| *next <= f.total_months)
        };

        Some(Ok(point))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.next_month {
            None => (0, Some(0)),
            Some(m) => {
                let remaining = (self.forecast.total_months - m) / self.forecast.step_months + 1;
                (1, Some(remaining as usize))
            }
        }
    }
}

impl std::iter::FusedIterator for ForecastIter<'_> {}
