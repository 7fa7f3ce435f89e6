//! IPR types: IprModel, WellTest, IprCalibration, OperatingPoint

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calibration regime, fixed once from Pr vs Pb and Pwf_test vs Pb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IprRegime {
    /// Pr ≤ Pb: pure Vogel
    Saturated,
    /// Pr > Pb and the test was taken at Pwf ≥ Pb: straight line fits the test
    UndersaturatedTestAbovePb,
    /// Pr > Pb and the test was taken at Pwf < Pb: composite, solved iteratively
    UndersaturatedTestBelowPb,
}

impl IprRegime {
    pub fn determine(reservoir_pressure: Decimal, bubble_point: Decimal, test_pwf: Decimal) -> Self {
        if reservoir_pressure <= bubble_point {
            Self::Saturated
        } else if test_pwf >= bubble_point {
            Self::UndersaturatedTestAbovePb
        } else {
            Self::UndersaturatedTestBelowPb
        }
    }

    pub const fn is_saturated(self) -> bool {
        matches!(self, Self::Saturated)
    }
}

impl fmt::Display for IprRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saturated => write!(f, "SATURATED"),
            Self::UndersaturatedTestAbovePb => write!(f, "UNDERSATURATED_TEST_ABOVE_PB"),
            Self::UndersaturatedTestBelowPb => write!(f, "UNDERSATURATED_TEST_BELOW_PB"),
        }
    }
}

/// Calibration inputs: reservoir state plus one stabilized test point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellTest {
    /// Pr (psi)
    pub reservoir_pressure: Decimal,
    /// Pb (psi)
    pub bubble_point_pressure: Decimal,
    /// bopd
    pub test_rate: Decimal,
    /// psi
    pub test_pwf: Decimal,
}

/// Outcome of a bounded fixed-point solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvergenceReport {
    /// Last iterate
    pub value: Decimal,
    pub converged: bool,
    pub iterations: usize,
    /// |target - model| at the last iterate
    pub residual: Decimal,
}

/// Everything `calibrate` derives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IprCalibration {
    pub test: WellTest,
    pub regime: IprRegime,
    /// Pr ≤ Pb
    pub is_below_bubble_point: bool,
    /// J (bpd/psi, 4 dp)
    pub productivity_index: Decimal,
    /// Straight-line J above Pb (undersaturated only)
    pub productivity_index_above_pb: Option<Decimal>,
    /// Absolute open flow (bopd, 2 dp)
    pub qmax: Decimal,
    pub vogel_coefficient: Decimal,
    /// Present when a non-zero skin is set
    pub flow_efficiency: Option<Decimal>,
    /// qmax / FE, present when FE > 0
    pub ideal_qmax: Option<Decimal>,
    /// Present for the composite solve only
    pub convergence: Option<ConvergenceReport>,
}

impl IprCalibration {
    /// False only when the composite solve ran out of iterations.
    /// Callers should treat the calibration as best-effort in that case.
    pub fn is_converged(&self) -> bool {
        self.convergence.map_or(true, |c| c.converged)
    }
}

/// Transient operating state at a given flowing pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingPoint {
    /// psi
    pub pwf: Decimal,
    /// bopd (2 dp)
    pub rate: Decimal,
    /// rate / qmax (4 dp)
    pub efficiency: Decimal,
    /// Pr - Pwf (psi)
    pub drawdown: Decimal,
}

/// One sample of an IPR curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IprCurvePoint {
    pub pwf: Decimal,
    pub rate: Decimal,
}

/// Inflow-performance characterization of one well or completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IprModel {
    /// Host identifier of the well
    pub well_id: Option<String>,
    /// Host identifier of the completion, when modelled per completion
    pub completion_id: Option<String>,
    pub(crate) skin_factor: Option<Decimal>,
    pub(crate) calibration: Option<IprCalibration>,
    pub(crate) operating_point: Option<OperatingPoint>,
}

impl IprModel {
    pub fn new(well_id: impl Into<String>) -> Self {
        Self {
            well_id: Some(well_id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_skin_factor(mut self, skin: Decimal) -> Self {
        self.set_skin_factor(Some(skin));
        self
    }

    /// Changing skin invalidates any previous calibration.
    pub fn set_skin_factor(&mut self, skin: Option<Decimal>) {
        if self.skin_factor != skin {
            self.skin_factor = skin;
            self.calibration = None;
            self.operating_point = None;
        }
    }

    pub const fn skin_factor(&self) -> Option<Decimal> {
        self.skin_factor
    }

    pub const fn calibration(&self) -> Option<&IprCalibration> {
        self.calibration.as_ref()
    }

    pub const fn current_operating_point(&self) -> Option<&OperatingPoint> {
        self.operating_point.as_ref()
    }
}
