//! Arps rate, cumulative and inverse-time equations
//!
//! `ArpsCurve` holds validated parameters as f64 and evaluates the closed
//! forms; the public functions wrap it with validation and quantization.

use rust_decimal::Decimal;

use crate::error::{ComputationError, EngineResult, ValidationError};
use crate::numeric::{quantize, require_non_negative, require_positive, require_range, round, scale, to_f64};
use crate::types::{ArpsParameters, DeclineType};

/// Validated Arps curve in f64 space.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ArpsCurve {
    pub qi: f64,
    pub di: f64,
    pub b: f64,
    pub kind: DeclineType,
}

impl ArpsCurve {
    /// Rejects qi ≤ 0, di < 0 and b outside [0, 1]. A zero di is a
    /// division-by-zero in every branch and is reported as such.
    pub fn new(qi: Decimal, di: Decimal, b: Decimal) -> EngineResult<Self> {
        require_positive("qi", qi)?;
        if di.is_zero() {
            return Err(ComputationError::DivisionByZero { context: "Arps decline (di = 0)" }.into());
        }
        require_positive("di", di)?;
        require_range("b", b, Decimal::ZERO, Decimal::ONE)?;

        Ok(Self {
            qi: to_f64(qi),
            di: to_f64(di),
            b: to_f64(b),
            kind: DeclineType::from_exponent(b),
        })
    }

    pub fn from_parameters(p: &ArpsParameters) -> EngineResult<Self> {
        Self::new(p.qi, p.di, p.b)
    }

    /// Formula:
    /// - exponential: q = qi × e^(−di×t)
    /// - harmonic: q = qi / (1 + di×t)
    /// - hyperbolic: q = qi / (1 + b×di×t)^(1/b)
    pub fn rate(&self, t: f64) -> f64 {
        match self.kind {
            DeclineType::Exponential => self.qi * (-self.di * t).exp(),
            DeclineType::Harmonic => self.qi / (1.0 + self.di * t),
            DeclineType::Hyperbolic => self.qi / (1.0 + self.b * self.di * t).powf(1.0 / self.b),
        }
    }

    /// Formula:
    /// - exponential: Np = (qi/di) × (1 − e^(−di×t))
    /// - harmonic: Np = (qi/di) × ln(1 + di×t)
    /// - hyperbolic: Np = qi / ((1−b)×di) × (1 − (q/qi)^(1−b))
    pub fn cumulative(&self, t: f64) -> f64 {
        match self.kind {
            DeclineType::Exponential => (self.qi / self.di) * (1.0 - (-self.di * t).exp()),
            DeclineType::Harmonic => (self.qi / self.di) * (1.0 + self.di * t).ln(),
            DeclineType::Hyperbolic => {
                let q = self.rate(t);
                (self.qi / ((1.0 - self.b) * self.di)) * (1.0 - (q / self.qi).powf(1.0 - self.b))
            }
        }
    }

    /// Time for the rate to fall to `q` (0 < q ≤ qi).
    ///
    /// Formula:
    /// - exponential: t = −ln(q/qi) / di
    /// - otherwise: t = ((qi/q)^b − 1) / (b×di)
    pub fn time_to(&self, q: f64) -> f64 {
        match self.kind {
            DeclineType::Exponential => -(q / self.qi).ln() / self.di,
            _ => ((self.qi / q).powf(self.b) - 1.0) / (self.b * self.di),
        }
    }

    /// Cumulative as t → ∞. Finite only for b < 1.
    pub fn asymptotic_cumulative(&self) -> Option<f64> {
        match self.kind {
            DeclineType::Exponential => Some(self.qi / self.di),
            DeclineType::Hyperbolic => Some(self.qi / ((1.0 - self.b) * self.di)),
            DeclineType::Harmonic => None,
        }
    }
}

/// Rate at time `t` (years). Returns bopd, 2 dp.
pub fn rate_at(qi: Decimal, di: Decimal, b: Decimal, t: Decimal) -> EngineResult<Decimal> {
    let curve = ArpsCurve::new(qi, di, b)?;
    require_non_negative("t", t)?;
    if t.is_zero() {
        return Ok(round(qi, scale::RATE));
    }
    quantize(curve.rate(to_f64(t)), scale::RATE, "Arps rate")
}

/// Cumulative production from 0 to `t` (years). Returns bbl, 0 dp.
pub fn cumulative_at(qi: Decimal, di: Decimal, b: Decimal, t: Decimal) -> EngineResult<Decimal> {
    let curve = ArpsCurve::new(qi, di, b)?;
    require_non_negative("t", t)?;
    quantize(curve.cumulative(to_f64(t)), scale::VOLUME, "Arps cumulative")
}

/// Time (years, 6 dp) at which the rate reaches `target_rate`.
///
/// The target must lie in (0, qi]; a zero target is never reached.
pub fn time_to_rate(qi: Decimal, di: Decimal, b: Decimal, target_rate: Decimal) -> EngineResult<Decimal> {
    let curve = ArpsCurve::new(qi, di, b)?;
    require_positive("Target rate", target_rate)?;
    if target_rate > qi {
        return Err(ValidationError::OutOfRange {
            name: "Target rate",
            value: target_rate,
            min: Decimal::ZERO,
            max: qi,
        }
        .into());
    }
    quantize(curve.time_to(to_f64(target_rate)), scale::TIME_YEARS, "time to rate")
}
