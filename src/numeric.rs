//! Decimal quantities and the f64 bridge
//!
//! Every value that crosses the engine boundary is a `Decimal`. Transcendental
//! steps (exp, ln, pow) run in `f64` and are re-quantized to the number of
//! decimal places documented for the quantity. Rounding is half-up
//! (midpoint away from zero).

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{ComputationError, EngineResult, ValidationError};

/// Decimal places per quantity family.
pub mod scale {
    /// Rates (bbl/day)
    pub const RATE: u32 = 2;
    /// Pressures (psi)
    pub const PRESSURE: u32 = 2;
    /// Fractions, indices, FVF, viscosity, productivity index
    pub const FRACTION: u32 = 4;
    /// Cumulative volumes (bbl)
    pub const VOLUME: u32 = 0;
    /// Elapsed time (years)
    pub const TIME_YEARS: u32 = 6;
    /// Material-balance terms, regression slope and intercept
    pub const MBE_TERM: u32 = 8;
    /// Original oil in place from regression
    pub const OOIP: u32 = 4;
    /// Equivalent density (ppg)
    pub const DENSITY: u32 = 3;
    /// Intermediate ratios (Pwf/Pr, Pwf/Pb)
    pub const RATIO: u32 = 6;
}

/// Half-up rounding to `dp` places.
pub fn round(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Lossy view of a decimal for transcendental evaluation.
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// Convert an f64 intermediate back into a quantized decimal.
pub fn quantize(value: f64, dp: u32, quantity: &'static str) -> EngineResult<Decimal> {
    if !value.is_finite() {
        return Err(ComputationError::NonFinite { quantity }.into());
    }
    let decimal = Decimal::from_f64(value).ok_or(ComputationError::Overflow { quantity })?;
    Ok(round(decimal, dp))
}

pub fn checked_div(numerator: Decimal, denominator: Decimal, context: &'static str) -> EngineResult<Decimal> {
    if denominator.is_zero() {
        return Err(ComputationError::DivisionByZero { context }.into());
    }
    numerator
        .checked_div(denominator)
        .ok_or_else(|| ComputationError::Overflow { quantity: context }.into())
}

pub fn checked_mul(a: Decimal, b: Decimal, quantity: &'static str) -> EngineResult<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| ComputationError::Overflow { quantity }.into())
}

pub fn checked_add(a: Decimal, b: Decimal, quantity: &'static str) -> EngineResult<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| ComputationError::Overflow { quantity }.into())
}

pub fn checked_sub(a: Decimal, b: Decimal, quantity: &'static str) -> EngineResult<Decimal> {
    a.checked_sub(b)
        .ok_or_else(|| ComputationError::Overflow { quantity }.into())
}

// ============================================================================
// Domain checks
// ============================================================================

pub fn require_positive(name: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value <= Decimal::ZERO {
        return Err(ValidationError::NotPositive { name, value });
    }
    Ok(())
}

pub fn require_non_negative(name: &'static str, value: Decimal) -> Result<(), ValidationError> {
    if value < Decimal::ZERO {
        return Err(ValidationError::Negative { name, value });
    }
    Ok(())
}

pub fn require_range(
    name: &'static str,
    value: Decimal,
    min: Decimal,
    max: Decimal,
) -> Result<(), ValidationError> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange { name, value, min, max });
    }
    Ok(())
}

/// Saturations, porosity and similar quantities live in [0, 1].
pub fn require_fraction(name: &'static str, value: Decimal) -> Result<(), ValidationError> {
    require_range(name, value, Decimal::ZERO, Decimal::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_is_half_up() {
        assert_eq!(round(dec!(714.285), 2), dec!(714.29));
        assert_eq!(round(dec!(0.42855), 4), dec!(0.4286));
        assert_eq!(round(dec!(-1.005), 2), dec!(-1.01));
    }

    #[test]
    fn test_quantize_rejects_non_finite() {
        assert!(quantize(f64::NAN, 2, "rate").is_err());
        assert!(quantize(f64::INFINITY, 2, "rate").is_err());
        assert_eq!(quantize(500.0 / 0.7, 2, "qmax").unwrap(), dec!(714.29));
    }

    #[test]
    fn test_checked_div_zero() {
        let err = checked_div(Decimal::ONE, Decimal::ZERO, "slope").unwrap_err();
        assert_eq!(err.kind(), "computation");
    }

    #[test]
    fn test_domain_checks() {
        assert!(require_positive("qi", dec!(0)).is_err());
        assert!(require_positive("qi", dec!(0.01)).is_ok());
        assert!(require_non_negative("limit", dec!(0)).is_ok());
        assert!(require_fraction("Sw", dec!(1.01)).is_err());
        assert!(require_fraction("Sw", dec!(1)).is_ok());
    }
}
