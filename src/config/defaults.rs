//! Fixed engineering constants.
//!
//! Unit conversions and empirical coefficients. These are part of the
//! equations, not tuning knobs, so they never appear in `EngineConfig`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ============================================================================
// Material Balance
// ============================================================================

/// Cumulative gas volumes arrive in Bcf; Bg is referenced to MMscf.
pub const GAS_VOLUME_SCALE: Decimal = dec!(1000);

// ============================================================================
// Inflow Performance
// ============================================================================

/// Linear coefficient of the Vogel equation.
pub const VOGEL_LINEAR: Decimal = dec!(0.2);

/// Quadratic coefficient of the Vogel equation.
pub const VOGEL_QUADRATIC: Decimal = dec!(0.8);

/// Divisor of the Vogel portion of a composite IPR: qmax = qb + J·Pb / 1.8.
pub const COMPOSITE_DIVISOR: Decimal = dec!(1.8);

/// Skin pressure drop approximation: ΔPskin ≈ skin · drawdown / 7.
pub const SKIN_PRESSURE_DIVISOR: Decimal = dec!(7);

// ============================================================================
// Volumetrics & Gradients
// ============================================================================

/// Barrels per acre-foot.
pub const BBL_PER_ACRE_FT: Decimal = dec!(7758);

/// Feet per metre.
pub const FEET_PER_METRE: Decimal = dec!(3.28084);

/// Hydrostatic gradient of 1 ppg fluid (psi/ft).
pub const PSI_PER_FT_PER_PPG: f64 = 0.052;

// ============================================================================
// Decline
// ============================================================================

/// Months per year.
pub const MONTHS_PER_YEAR: Decimal = dec!(12);
