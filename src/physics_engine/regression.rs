//! Ordinary least-squares on decimal pairs
//!
//! Sums are accumulated in `Decimal` so the fitted slope is reproducible
//! bit-for-bit across runs. The slope p-value comes from the Student's t
//! distribution (statrs) and is the only step evaluated in f64.

use rust_decimal::Decimal;
use statrs::distribution::{ContinuousCDF, StudentsT};
use tracing::debug;

use crate::error::{ComputationError, EngineError, EngineResult};
use crate::numeric::{checked_add, checked_div, checked_mul, quantize, round, scale, to_f64};
use crate::types::LinearFit;

/// Fit `y = slope·x + intercept` by least squares.
///
/// Formula:
/// - slope = (nΣxy − ΣxΣy) / (nΣx² − (Σx)²)
/// - intercept = (Σy − slope·Σx) / n
/// - R² = (nΣxy − ΣxΣy)² / ((nΣx² − (Σx)²)(nΣy² − (Σy)²)), 0 when either variance is 0
///
/// Fails with `InsufficientData` below 2 pairs and with
/// `DegenerateRegression` when all x are equal.
pub fn linear_regression(points: &[(Decimal, Decimal)]) -> EngineResult<LinearFit> {
    if points.len() < 2 {
        return Err(EngineError::insufficient(format!(
            "linear regression needs at least 2 points, got {}",
            points.len()
        )));
    }

    let mut sum_x = Decimal::ZERO;
    let mut sum_y = Decimal::ZERO;
    let mut sum_xy = Decimal::ZERO;
    let mut sum_x2 = Decimal::ZERO;
    let mut sum_y2 = Decimal::ZERO;
    for &(x, y) in points {
        sum_x = checked_add(sum_x, x, "regression Σx")?;
        sum_y = checked_add(sum_y, y, "regression Σy")?;
        sum_xy = checked_add(sum_xy, checked_mul(x, y, "regression Σxy")?, "regression Σxy")?;
        sum_x2 = checked_add(sum_x2, checked_mul(x, x, "regression Σx²")?, "regression Σx²")?;
        sum_y2 = checked_add(sum_y2, checked_mul(y, y, "regression Σy²")?, "regression Σy²")?;
    }

    let n = Decimal::from(points.len());
    let ss_xy = checked_mul(n, sum_xy, "regression Sxy")? - checked_mul(sum_x, sum_y, "regression Sxy")?;
    let ss_x = checked_mul(n, sum_x2, "regression Sxx")? - checked_mul(sum_x, sum_x, "regression Sxx")?;
    let ss_y = checked_mul(n, sum_y2, "regression Syy")? - checked_mul(sum_y, sum_y, "regression Syy")?;

    if ss_x.is_zero() {
        return Err(ComputationError::DegenerateRegression("variance of x is zero".to_string()).into());
    }

    let slope = checked_div(ss_xy, ss_x, "regression slope")?;
    let intercept = checked_div(sum_y - checked_mul(slope, sum_x, "regression intercept")?, n, "regression intercept")?;

    // (Sxy/Sxx)·(Sxy/Syy) keeps the intermediate inside Decimal range
    let r_squared = if ss_x > Decimal::ZERO && ss_y > Decimal::ZERO {
        checked_mul(slope, checked_div(ss_xy, ss_y, "regression R²")?, "regression R²")?
    } else {
        Decimal::ZERO
    };

    let fit = LinearFit {
        slope: round(slope, scale::MBE_TERM),
        intercept: round(intercept, scale::MBE_TERM),
        r_squared: round(r_squared, scale::FRACTION),
        slope_p_value: slope_p_value(to_f64(r_squared), points.len())?,
        points_used: points.len(),
    };
    debug!(
        slope = %fit.slope,
        intercept = %fit.intercept,
        r_squared = %fit.r_squared,
        n = fit.points_used,
        "Linear regression"
    );
    Ok(fit)
}

/// Two-tailed p-value for a non-zero slope.
///
/// Formula: t = r × √(n−2) / √(1−r²), with n−2 degrees of freedom
fn slope_p_value(r_squared: f64, n: usize) -> EngineResult<Decimal> {
    if n < 3 {
        return Ok(Decimal::ONE);
    }

    let r = r_squared.clamp(0.0, 1.0).sqrt();
    // Perfect or near-perfect fit is highly significant
    if r >= 0.9999 {
        return Ok(Decimal::ZERO);
    }

    let df = (n - 2) as f64;
    let t_stat = r * df.sqrt() / (1.0 - r * r).sqrt();

    let p = match StudentsT::new(0.0, 1.0, df) {
        Ok(t_dist) => 2.0 * (1.0 - t_dist.cdf(t_stat.abs())),
        Err(_) => 1.0,
    };
    quantize(p.clamp(0.0, 1.0), scale::FRACTION, "slope p-value")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_exact_line() {
        let points = vec![
            (dec!(1), dec!(3)),
            (dec!(2), dec!(5)),
            (dec!(3), dec!(7)),
            (dec!(4), dec!(9)),
        ];
        let fit = linear_regression(&points).unwrap();
        assert_eq!(fit.slope, dec!(2));
        assert_eq!(fit.intercept, dec!(1));
        assert_eq!(fit.r_squared, dec!(1.0000));
        assert_eq!(fit.slope_p_value, Decimal::ZERO);
        assert_eq!(fit.points_used, 4);
    }

    #[test]
    fn test_noisy_line() {
        let points = vec![
            (dec!(1), dec!(2.1)),
            (dec!(2), dec!(3.9)),
            (dec!(3), dec!(6.2)),
            (dec!(4), dec!(7.8)),
            (dec!(5), dec!(10.1)),
        ];
        let fit = linear_regression(&points).unwrap();
        assert!((fit.slope - dec!(2)).abs() < dec!(0.1), "slope ≈ 2, got {}", fit.slope);
        assert!(fit.r_squared > dec!(0.99));
        assert!(fit.slope_p_value < dec!(0.01));
    }

    #[test]
    fn test_uncorrelated_has_low_r2_and_high_p() {
        let points = vec![
            (dec!(1), dec!(5)),
            (dec!(2), dec!(1)),
            (dec!(3), dec!(5)),
            (dec!(4), dec!(1)),
            (dec!(5), dec!(5)),
        ];
        let fit = linear_regression(&points).unwrap();
        assert!(fit.r_squared < dec!(0.1));
        assert!(fit.slope_p_value > dec!(0.5));
    }

    #[test]
    fn test_constant_y_has_zero_r2() {
        let points = vec![(dec!(1), dec!(4)), (dec!(2), dec!(4)), (dec!(3), dec!(4))];
        let fit = linear_regression(&points).unwrap();
        assert!(fit.slope.is_zero());
        assert!(fit.r_squared.is_zero());
    }

    #[test]
    fn test_zero_x_variance_is_degenerate() {
        let points = vec![(dec!(2), dec!(1)), (dec!(2), dec!(5)), (dec!(2), dec!(9))];
        let err = linear_regression(&points).unwrap_err();
        assert!(matches!(err, EngineError::Computation(ComputationError::DegenerateRegression(_))));
    }

    #[test]
    fn test_single_point_is_insufficient() {
        let err = linear_regression(&[(dec!(1), dec!(1))]).unwrap_err();
        assert_eq!(err.kind(), "insufficient_data");
    }
}
