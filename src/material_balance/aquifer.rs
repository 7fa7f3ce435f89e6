//! Aquifer influx estimates
//!
//! Single-step helpers for screening water drive. Neither feeds the
//! drive-index calculation, which attributes water drive by remainder.

use rust_decimal::Decimal;

use crate::error::{EngineResult, ValidationError};
use crate::numeric::{checked_mul, require_non_negative, require_positive, round, scale};

/// Fetkovich pseudo-steady-state influx over one time step.
///
/// Formula: We = J × (Pi − P) × Δt
///
/// Where:
/// - J = aquifer productivity index (bbl/day/psi)
/// - Δt = time step (days)
pub fn fetkovich_water_influx(
    aquifer_productivity_index: Decimal,
    initial_pressure: Decimal,
    current_pressure: Decimal,
    time_step_days: Decimal,
) -> EngineResult<Decimal> {
    require_non_negative("Aquifer productivity index", aquifer_productivity_index)?;
    require_positive("Initial pressure", initial_pressure)?;
    require_non_negative("Current pressure", current_pressure)?;
    require_non_negative("Time step", time_step_days)?;
    if current_pressure > initial_pressure {
        return Err(ValidationError::OutOfRange {
            name: "Current pressure",
            value: current_pressure,
            min: Decimal::ZERO,
            max: initial_pressure,
        }
        .into());
    }

    let drop = initial_pressure - current_pressure;
    let influx = checked_mul(
        checked_mul(aquifer_productivity_index, drop, "Fetkovich influx")?,
        time_step_days,
        "Fetkovich influx",
    )?;
    Ok(round(influx, scale::MBE_TERM))
}

/// Simplified single-step Carter-Tracy influx.
///
/// Formula: We = B × ΔP × pD, and 0 when pD′ = 0
///
/// B is the aquifer influx constant (bbl/psi); pD and pD′ are the
/// dimensionless pressure and its derivative at the current tD.
pub fn carter_tracy_water_influx(
    influx_constant: Decimal,
    pressure_drop: Decimal,
    dimensionless_pressure: Decimal,
    dimensionless_pressure_derivative: Decimal,
) -> EngineResult<Decimal> {
    require_non_negative("Aquifer influx constant", influx_constant)?;
    require_non_negative("Pressure drop", pressure_drop)?;
    require_non_negative("Dimensionless pressure", dimensionless_pressure)?;

    if dimensionless_pressure_derivative.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let influx = checked_mul(
        checked_mul(influx_constant, pressure_drop, "Carter-Tracy influx")?,
        dimensionless_pressure,
        "Carter-Tracy influx",
    )?;
    Ok(round(influx, scale::MBE_TERM))
}
