//! Least-squares fit result

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ordinary least-squares line `y = slope·x + intercept`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearFit {
    /// Slope (8 dp)
    pub slope: Decimal,
    /// Intercept (8 dp)
    pub intercept: Decimal,
    /// Coefficient of determination (4 dp)
    pub r_squared: Decimal,
    /// Two-tailed p-value for a non-zero slope (4 dp)
    pub slope_p_value: Decimal,
    /// Number of (x, y) pairs in the fit
    pub points_used: usize,
}
