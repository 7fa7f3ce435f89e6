//! Rate as a function of flowing pressure for a calibrated model

use rust_decimal::Decimal;

use crate::config::defaults::COMPOSITE_DIVISOR;
use crate::error::{EngineError, EngineResult, ValidationError};
use crate::numeric::{checked_add, checked_div, checked_mul, checked_sub, require_non_negative, round, scale};
use crate::physics_engine::correlations::{vogel_factor, vogel_rate};
use crate::types::{IprCalibration, IprCurvePoint};

/// Rate at bubble point for the straight-line portion.
///
/// Formula: qb = J × (Pr − Pb)
pub(crate) fn bubble_point_rate(j: Decimal, pr: Decimal, pb: Decimal) -> EngineResult<Decimal> {
    straight_line_rate(j, pr, pb)
}

/// Formula: q = J × (Pr − Pwf)
fn straight_line_rate(j: Decimal, pr: Decimal, pwf: Decimal) -> EngineResult<Decimal> {
    checked_mul(j, checked_sub(pr, pwf, "drawdown")?, "straight-line rate")
}

/// Composite absolute open flow.
///
/// Formula: qmax = qb + J × Pb / 1.8
pub(crate) fn composite_qmax(j: Decimal, pr: Decimal, pb: Decimal, dp: u32) -> EngineResult<Decimal> {
    let vogel_part = round(checked_div(checked_mul(j, pb, "composite qmax")?, COMPOSITE_DIVISOR, "composite qmax")?, dp);
    checked_add(bubble_point_rate(j, pr, pb)?, vogel_part, "composite qmax")
}

/// Composite rate below Pb.
///
/// Formula: q = qb + (qmax − qb) × (1 − 0.2×(Pwf/Pb) − 0.8×(Pwf/Pb)²)
pub(crate) fn composite_rate(qb: Decimal, qmax: Decimal, pwf: Decimal, pb: Decimal) -> EngineResult<Decimal> {
    let ratio = round(checked_div(pwf, pb, "Pwf/Pb")?, scale::RATIO);
    let vogel_part = checked_mul(checked_sub(qmax, qb, "composite rate")?, vogel_factor(ratio), "composite rate")?;
    checked_add(qb, vogel_part, "composite rate")
}

/// Rate (bopd, 2 dp, ≥ 0) at `pwf` for the calibrated regime.
pub(crate) fn rate_at_pwf(cal: &IprCalibration, pwf: Decimal) -> EngineResult<Decimal> {
    let pr = cal.test.reservoir_pressure;
    let pb = cal.test.bubble_point_pressure;
    require_non_negative("Flowing pressure", pwf)?;
    if pwf > pr {
        return Err(ValidationError::PwfExceedsReservoir { pwf, pr }.into());
    }

    let rate = if cal.regime.is_saturated() {
        vogel_rate(cal.qmax, pr, pwf)?
    } else {
        let j = cal.productivity_index;
        if pwf >= pb {
            straight_line_rate(j, pr, pwf)?
        } else {
            composite_rate(bubble_point_rate(j, pr, pb)?, cal.qmax, pwf, pb)?
        }
    };
    Ok(round(rate.max(Decimal::ZERO), scale::RATE))
}

/// `num_points + 1` evenly spaced samples from Pr down to 0.
pub(crate) fn sample(cal: &IprCalibration, num_points: usize) -> EngineResult<Vec<IprCurvePoint>> {
    if num_points == 0 {
        return Err(EngineError::insufficient("IPR curve needs at least 1 interval"));
    }
    let pr = cal.test.reservoir_pressure;
    let step = round(checked_div(pr, Decimal::from(num_points), "IPR pressure step")?, scale::PRESSURE);

    (0..=num_points)
        .map(|i| {
            let pwf = if i == num_points {
                Decimal::ZERO
            } else {
                checked_sub(pr, checked_mul(step, Decimal::from(i), "IPR pressure step")?, "IPR pressure step")?
                    .max(Decimal::ZERO)
            };
            Ok(IprCurvePoint {
                pwf,
                rate: rate_at_pwf(cal, pwf)?,
            })
        })
        .collect()
}
