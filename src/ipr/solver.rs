//! Bounded fixed-point solver for the composite IPR
//!
//! Scales the unknown by `target / model(x)` until the model output is
//! within tolerance of the target or the iteration cap is hit. Running out
//! of iterations is not an error: the report carries `converged = false`
//! and the caller decides what to do with the last iterate.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::IprConfig;
use crate::error::EngineResult;
use crate::numeric::{checked_div, checked_mul, quantize, round, scale};
use crate::types::ConvergenceReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPointSolver {
    /// Stop once |target − model(x)| < tolerance
    pub tolerance: Decimal,
    pub max_iterations: usize,
    /// Decimal places kept on each iterate and on the scaling ratio
    pub iterate_scale: u32,
}

impl FixedPointSolver {
    pub fn from_config(config: &IprConfig) -> EngineResult<Self> {
        Ok(Self {
            tolerance: quantize(config.convergence_tolerance_bopd, scale::RATIO, "convergence tolerance")?,
            max_iterations: config.max_iterations,
            iterate_scale: scale::FRACTION,
        })
    }

    /// Solve `model(x) = target` starting from `seed`.
    ///
    /// `model` must be positive and increasing in `x` near the solution.
    pub fn solve<F>(&self, seed: Decimal, target: Decimal, mut model: F) -> EngineResult<ConvergenceReport>
    where
        F: FnMut(Decimal) -> EngineResult<Decimal>,
    {
        let mut x = round(seed, self.iterate_scale);

        for iteration in 1..=self.max_iterations {
            let calculated = model(x)?;
            let residual = (target - calculated).abs();
            debug!(iteration, x = %x, calculated = %calculated, residual = %residual, "Fixed-point step");

            if residual < self.tolerance {
                return Ok(ConvergenceReport {
                    value: x,
                    converged: true,
                    iterations: iteration,
                    residual,
                });
            }

            let ratio = round(checked_div(target, calculated, "fixed-point ratio")?, self.iterate_scale);
            x = round(checked_mul(x, ratio, "fixed-point iterate")?, self.iterate_scale);
        }

        // The last update has not been checked yet
        let residual = (target - model(x)?).abs();
        let converged = residual < self.tolerance;
        if !converged {
            warn!(
                iterations = self.max_iterations,
                value = %x,
                residual = %residual,
                tolerance = %self.tolerance,
                "Fixed-point solve did not converge, returning last iterate"
            );
        }
        Ok(ConvergenceReport {
            value: x,
            converged,
            iterations: self.max_iterations,
            residual,
        })
    }
}
