//! Closed-form inflow equations
//!
//! Rate at a flowing pressure for an already-known equation, without a test
//! calibration: Vogel from qmax, straight-line Darcy, Fetkovich
//! back-pressure and Jones (Forchheimer) with a turbulence term.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{EngineResult, ValidationError};
use crate::numeric::{checked_mul, checked_sub, quantize, require_non_negative, require_positive, round, scale, to_f64};
use crate::physics_engine::vogel_rate;

fn unit_exponent() -> Decimal {
    Decimal::ONE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InflowEquation {
    /// q = qmax × (1 − 0.2·(Pwf/Pr) − 0.8·(Pwf/Pr)²)
    Vogel { qmax: Decimal },
    /// q = J × (Pr − Pwf)
    Darcy { productivity_index: Decimal },
    /// q = C × (Pr² − Pwf²)^n
    Fetkovich {
        c: Decimal,
        #[serde(default = "unit_exponent")]
        n: Decimal,
    },
    /// Pr − Pwf = a·q + b·q², solved for q
    Jones { a: Decimal, b: Decimal },
}

impl InflowEquation {
    /// Rate (bopd, 2 dp) at `pwf`. Requires Pr > 0 and 0 ≤ Pwf ≤ Pr.
    pub fn rate(&self, reservoir_pressure: Decimal, pwf: Decimal) -> EngineResult<Decimal> {
        require_positive("Reservoir pressure", reservoir_pressure)?;
        require_non_negative("Flowing pressure", pwf)?;
        if pwf > reservoir_pressure {
            return Err(ValidationError::PwfExceedsReservoir { pwf, pr: reservoir_pressure }.into());
        }
        let drawdown = reservoir_pressure - pwf;

        let q = match *self {
            Self::Vogel { qmax } => vogel_rate(qmax, reservoir_pressure, pwf)?,
            Self::Darcy { productivity_index } => {
                require_positive("Productivity index", productivity_index)?;
                round(checked_mul(productivity_index, drawdown, "Darcy rate")?, scale::RATE)
            }
            Self::Fetkovich { c, n } => {
                require_positive("Fetkovich C", c)?;
                require_positive("Fetkovich n", n)?;
                if n < dec!(0.5) || n > Decimal::ONE {
                    warn!(%n, "Fetkovich exponent outside the usual 0.5 to 1.0 range");
                }
                let delta_p2 = checked_sub(
                    checked_mul(reservoir_pressure, reservoir_pressure, "Pr²")?,
                    checked_mul(pwf, pwf, "Pwf²")?,
                    "Pr² − Pwf²",
                )?;
                quantize(to_f64(c) * to_f64(delta_p2).powf(to_f64(n)), scale::RATE, "Fetkovich rate")?
            }
            Self::Jones { a, b } => {
                require_non_negative("Jones a", a)?;
                require_positive("Jones b", b)?;
                let (a, b) = (to_f64(a), to_f64(b));
                let q = (-a + (a * a + 4.0 * b * to_f64(drawdown)).sqrt()) / (2.0 * b);
                quantize(q, scale::RATE, "Jones rate")?
            }
        };

        debug!(method = ?self, %pwf, %q, "Inflow rate");
        Ok(q)
    }
}
