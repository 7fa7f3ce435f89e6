//! IPR Modeler
//!
//! Vogel / composite inflow performance from a single stabilized test:
//! - `IprModel::calibrate()` - regime detection, J and qmax, flow efficiency
//! - `IprModel::generate_curve()` - (Pwf, rate) samples from Pr to 0
//! - `IprModel::operating_point()` - rate and efficiency at a flowing pressure
//! - `InflowEquation::rate()` - Vogel, Darcy, Fetkovich or Jones with known
//!   coefficients
//!
//! ## Regimes
//! - Saturated (Pr ≤ Pb): pure Vogel, solved directly for qmax
//! - Undersaturated, test above Pb: straight line above Pb, Vogel below
//! - Undersaturated, test below Pb: composite with J found by a bounded
//!   fixed-point solve; non-convergence is flagged, not fatal

mod curve;
mod methods;
mod solver;

pub use methods::InflowEquation;
pub use solver::FixedPointSolver;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::config::defaults::{COMPOSITE_DIVISOR, SKIN_PRESSURE_DIVISOR, VOGEL_QUADRATIC};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult, ValidationError};
use crate::numeric::{checked_div, require_non_negative, require_positive, round, scale};
use crate::physics_engine::correlations::vogel_factor;
use crate::types::{IprCalibration, IprCurvePoint, IprModel, IprRegime, OperatingPoint, WellTest};

impl WellTest {
    /// Pr > 0, Pb > 0, rate > 0, 0 ≤ Pwf < Pr.
    pub fn validate(&self) -> EngineResult<()> {
        require_positive("Reservoir pressure", self.reservoir_pressure)?;
        require_positive("Bubble point pressure", self.bubble_point_pressure)?;
        require_positive("Test rate", self.test_rate)?;
        require_non_negative("Test flowing pressure", self.test_pwf)?;
        if self.test_pwf >= self.reservoir_pressure {
            return Err(ValidationError::PwfExceedsReservoir {
                pwf: self.test_pwf,
                pr: self.reservoir_pressure,
            }
            .into());
        }
        Ok(())
    }

    pub fn regime(&self) -> IprRegime {
        IprRegime::determine(self.reservoir_pressure, self.bubble_point_pressure, self.test_pwf)
    }
}

impl IprModel {
    /// Calibrate from a test point. Replaces any previous calibration and
    /// clears the operating point, which referred to the old curve.
    pub fn calibrate(&mut self, test: WellTest, config: &EngineConfig) -> EngineResult<&IprCalibration> {
        test.validate()?;
        let calibration = calibrate_test(test, self.skin_factor, config)?;

        if !calibration.is_converged() {
            warn!(
                well_id = self.well_id.as_deref().unwrap_or("-"),
                qmax = %calibration.qmax,
                "IPR calibration is best-effort: composite solve did not converge"
            );
        }
        info!(
            well_id = self.well_id.as_deref().unwrap_or("-"),
            regime = %calibration.regime,
            qmax = %calibration.qmax,
            productivity_index = %calibration.productivity_index,
            "IPR calibrated"
        );

        self.operating_point = None;
        Ok(&*self.calibration.insert(calibration))
    }

    /// `num_points + 1` samples from Pr down to Pwf = 0.
    pub fn generate_curve(&self, num_points: usize) -> EngineResult<Vec<IprCurvePoint>> {
        curve::sample(self.require_calibration()?, num_points)
    }

    /// Rate at `pwf` on the calibrated curve without touching the model.
    pub fn rate_at(&self, pwf: Decimal) -> EngineResult<Decimal> {
        curve::rate_at_pwf(self.require_calibration()?, pwf)
    }

    /// Evaluate and store the operating point at `current_pwf`.
    pub fn operating_point(&mut self, current_pwf: Decimal) -> EngineResult<&OperatingPoint> {
        let cal = self.require_calibration()?;
        let rate = curve::rate_at_pwf(cal, current_pwf)?;
        let point = OperatingPoint {
            pwf: current_pwf,
            rate,
            efficiency: round(checked_div(rate, cal.qmax, "operating efficiency")?, scale::FRACTION),
            drawdown: cal.test.reservoir_pressure - current_pwf,
        };
        Ok(&*self.operating_point.insert(point))
    }

    fn require_calibration(&self) -> EngineResult<&IprCalibration> {
        self.calibration
            .as_ref()
            .ok_or_else(|| EngineError::insufficient("IPR model has not been calibrated"))
    }
}

// ============================================================================
// Calibration
// ============================================================================

fn calibrate_test(test: WellTest, skin: Option<Decimal>, config: &EngineConfig) -> EngineResult<IprCalibration> {
    let pr = test.reservoir_pressure;
    let pb = test.bubble_point_pressure;
    let regime = test.regime();

    let (productivity_index, qmax, convergence) = match regime {
        IprRegime::Saturated => {
            // Invert Vogel at the test point
            let r = round(checked_div(test.test_pwf, pr, "Pwf/Pr")?, scale::RATIO);
            let qmax = round(checked_div(test.test_rate, vogel_factor(r), "Vogel qmax")?, scale::RATE);
            let j = round(checked_div(qmax * COMPOSITE_DIVISOR, pr, "productivity index")?, scale::FRACTION);
            (j, qmax, None)
        }
        IprRegime::UndersaturatedTestAbovePb => {
            let j = straight_line_j(&test)?;
            (j, curve::composite_qmax(j, pr, pb, scale::RATE)?, None)
        }
        IprRegime::UndersaturatedTestBelowPb => {
            let solver = FixedPointSolver::from_config(&config.ipr)?;
            let report = solver.solve(straight_line_j(&test)?, test.test_rate, |j| {
                let qb = curve::bubble_point_rate(j, pr, pb)?;
                let qmax = curve::composite_qmax(j, pr, pb, scale::FRACTION)?;
                curve::composite_rate(qb, qmax, test.test_pwf, pb)
            })?;
            let j = report.value;
            (j, curve::composite_qmax(j, pr, pb, scale::RATE)?, Some(report))
        }
    };

    let (flow_efficiency, ideal_qmax) = match skin {
        Some(s) if !s.is_zero() => {
            let fe = flow_efficiency(s, pr, test.test_pwf)?;
            let ideal = if fe > Decimal::ZERO {
                Some(round(checked_div(qmax, fe, "ideal qmax")?, scale::RATE))
            } else {
                warn!(skin = %s, flow_efficiency = %fe, "Non-positive flow efficiency, ideal qmax omitted");
                None
            };
            (Some(fe), ideal)
        }
        _ => (None, None),
    };

    Ok(IprCalibration {
        test,
        regime,
        is_below_bubble_point: regime.is_saturated(),
        productivity_index,
        productivity_index_above_pb: (!regime.is_saturated()).then_some(productivity_index),
        qmax,
        vogel_coefficient: VOGEL_QUADRATIC,
        flow_efficiency,
        ideal_qmax,
        convergence,
    })
}

/// Formula: J = q / (Pr − Pwf), 4 dp
fn straight_line_j(test: &WellTest) -> EngineResult<Decimal> {
    let drawdown = test.reservoir_pressure - test.test_pwf;
    Ok(round(checked_div(test.test_rate, drawdown, "straight-line J")?, scale::FRACTION))
}

/// Flow efficiency from skin.
///
/// Formula: FE = (ΔP − ΔPskin) / ΔP, with ΔPskin ≈ S × ΔP / 7
///
/// ΔPskin uses the /7 approximation, not the Hawkins expression.
pub fn flow_efficiency(skin: Decimal, reservoir_pressure: Decimal, pwf: Decimal) -> EngineResult<Decimal> {
    let drawdown = reservoir_pressure - pwf;
    require_positive("Drawdown", drawdown)?;
    let skin_drop = round(checked_div(skin * drawdown, SKIN_PRESSURE_DIVISOR, "skin pressure drop")?, scale::FRACTION);
    Ok(round(checked_div(drawdown - skin_drop, drawdown, "flow efficiency")?, scale::FRACTION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_point(pr: Decimal, pb: Decimal, rate: Decimal, pwf: Decimal) -> WellTest {
        WellTest {
            reservoir_pressure: pr,
            bubble_point_pressure: pb,
            test_rate: rate,
            test_pwf: pwf,
        }
    }

    #[test]
    fn test_saturated_vogel() {
        let mut model = IprModel::new("W-1");
        let cal = model
            .calibrate(test_point(dec!(3000), dec!(3000), dec!(500), dec!(1500)), &EngineConfig::default())
            .unwrap();
        assert_eq!(cal.regime, IprRegime::Saturated);
        assert!(cal.is_below_bubble_point);
        assert_eq!(cal.qmax, dec!(714.29));
        assert_eq!(cal.productivity_index, dec!(0.4286));
        assert_eq!(cal.productivity_index_above_pb, None);
        assert_eq!(cal.vogel_coefficient, dec!(0.8));
        assert!(cal.is_converged());
    }

    #[test]
    fn test_undersaturated_test_above_pb() {
        let mut model = IprModel::default();
        let cal = model
            .calibrate(test_point(dec!(4000), dec!(2500), dec!(600), dec!(3000)), &EngineConfig::default())
            .unwrap();
        assert_eq!(cal.regime, IprRegime::UndersaturatedTestAbovePb);
        assert_eq!(cal.productivity_index, dec!(0.6));
        // 0.6 × 1500 + 0.6 × 2500 / 1.8
        assert_eq!(cal.qmax, dec!(1733.33));
        assert_eq!(cal.productivity_index_above_pb, Some(dec!(0.6)));
    }

    #[test]
    fn test_undersaturated_test_below_pb_converges() {
        // Generated from J = 0.5: 750 + 694.4444 × 0.592 = 1161.11
        let mut model = IprModel::default();
        let cal = model
            .calibrate(test_point(dec!(4000), dec!(2500), dec!(1161.11), dec!(1500)), &EngineConfig::default())
            .unwrap();
        assert_eq!(cal.regime, IprRegime::UndersaturatedTestBelowPb);
        let report = cal.convergence.unwrap();
        assert!(report.converged);
        assert_eq!(report.iterations, 2);
        assert_eq!(cal.productivity_index, dec!(0.5));
        assert_eq!(cal.qmax, dec!(1444.44));
    }

    #[test]
    fn test_undersaturated_test_below_pb_flags_non_convergence() {
        // J oscillates between 0.5167 and 0.5168, both outside 0.1 bopd
        let mut model = IprModel::default();
        let cal = model
            .calibrate(test_point(dec!(4000), dec!(2500), dec!(1200), dec!(1500)), &EngineConfig::default())
            .unwrap()
            .clone();
        assert!(!cal.is_converged());
        let report = cal.convergence.unwrap();
        assert_eq!(report.iterations, 10);
        assert!(report.residual < dec!(0.2));
        assert!(cal.productivity_index == dec!(0.5167) || cal.productivity_index == dec!(0.5168));
    }

    #[test]
    fn test_invalid_test_leaves_model_untouched() {
        let config = EngineConfig::default();
        let mut model = IprModel::new("W-2");
        model
            .calibrate(test_point(dec!(3000), dec!(3000), dec!(500), dec!(1500)), &config)
            .unwrap();
        let before = model.clone();

        let err = model
            .calibrate(test_point(dec!(3000), dec!(3000), dec!(500), dec!(3200)), &config)
            .unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert_eq!(model, before);
    }

    #[test]
    fn test_flow_efficiency_from_skin() {
        let mut model = IprModel::new("W-3").with_skin_factor(dec!(3.5));
        let cal = model
            .calibrate(test_point(dec!(3000), dec!(3000), dec!(500), dec!(1500)), &EngineConfig::default())
            .unwrap();
        // ΔPskin = 3.5 × 1500 / 7 = 750 → FE = 0.5
        assert_eq!(cal.flow_efficiency, Some(dec!(0.5)));
        assert_eq!(cal.ideal_qmax, Some(dec!(1428.58)));
    }

    #[test]
    fn test_large_skin_omits_ideal_qmax() {
        let mut model = IprModel::new("W-4").with_skin_factor(dec!(10));
        let cal = model
            .calibrate(test_point(dec!(3000), dec!(3000), dec!(500), dec!(1500)), &EngineConfig::default())
            .unwrap();
        assert!(cal.flow_efficiency.unwrap() < Decimal::ZERO);
        assert_eq!(cal.ideal_qmax, None);
    }

    #[test]
    fn test_zero_skin_has_no_efficiency() {
        let mut model = IprModel::new("W-5").with_skin_factor(Decimal::ZERO);
        let cal = model
            .calibrate(test_point(dec!(3000), dec!(3000), dec!(500), dec!(1500)), &EngineConfig::default())
            .unwrap();
        assert_eq!(cal.flow_efficiency, None);
        assert_eq!(cal.ideal_qmax, None);
    }

    #[test]
    fn test_saturated_curve_endpoints() {
        let mut model = IprModel::default();
        model
            .calibrate(test_point(dec!(3000), dec!(3000), dec!(500), dec!(1500)), &EngineConfig::default())
            .unwrap();
        let curve = model.generate_curve(10).unwrap();
        assert_eq!(curve.len(), 11);
        assert_eq!(curve[0].pwf, dec!(3000));
        assert!(curve[0].rate.is_zero());
        assert_eq!(curve[10].pwf, Decimal::ZERO);
        assert_eq!(curve[10].rate, dec!(714.29));
        assert!(curve.windows(2).all(|w| w[1].rate >= w[0].rate));
    }

    #[test]
    fn test_composite_curve_is_straight_above_pb() {
        let mut model = IprModel::default();
        model
            .calibrate(test_point(dec!(4000), dec!(2500), dec!(600), dec!(3000)), &EngineConfig::default())
            .unwrap();
        let curve = model.generate_curve(8).unwrap();
        // step 500 psi: 4000, 3500, 3000, 2500 on the straight line
        assert_eq!(curve[1].rate, dec!(300));
        assert_eq!(curve[2].rate, dec!(600));
        assert_eq!(curve[3].rate, dec!(900));
        assert_eq!(curve[8].rate, dec!(1733.33));
    }

    #[test]
    fn test_curve_requires_calibration() {
        let model = IprModel::new("W-6");
        assert_eq!(model.generate_curve(10).unwrap_err().kind(), "insufficient_data");
    }

    #[test]
    fn test_operating_point() {
        let mut model = IprModel::default();
        model
            .calibrate(test_point(dec!(3000), dec!(3000), dec!(500), dec!(1500)), &EngineConfig::default())
            .unwrap();
        let op = *model.operating_point(dec!(1500)).unwrap();
        assert_eq!(op.rate, dec!(500.00));
        assert_eq!(op.efficiency, dec!(0.7));
        assert_eq!(op.drawdown, dec!(1500));
        assert_eq!(model.operating_point, Some(op));
    }

    #[test]
    fn test_recalibration_clears_operating_point() {
        let config = EngineConfig::default();
        let mut model = IprModel::default();
        model
            .calibrate(test_point(dec!(3000), dec!(3000), dec!(500), dec!(1500)), &config)
            .unwrap();
        model.operating_point(dec!(1000)).unwrap();
        model
            .calibrate(test_point(dec!(3000), dec!(3000), dec!(450), dec!(1500)), &config)
            .unwrap();
        assert!(model.operating_point.is_none());
    }

    #[test]
    fn test_calibration_is_idempotent() {
        let config = EngineConfig::default();
        let test = test_point(dec!(4000), dec!(2500), dec!(1200), dec!(1500));
        let mut model = IprModel::default();
        let first = model.calibrate(test, &config).unwrap().clone();
        let second = model.calibrate(test, &config).unwrap().clone();
        assert_eq!(first, second);
    }
}
