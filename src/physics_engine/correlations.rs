//! Petrophysical and inflow correlations
//!
//! Each function validates its inputs against a physical domain before
//! evaluating, runs the transcendental part in f64 and returns a decimal
//! quantized to the quantity's scale:
//! - Archie water saturation
//! - Larionov shale volume (tertiary rocks)
//! - Vogel rate and single-phase productivity index

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::defaults::{VOGEL_LINEAR, VOGEL_QUADRATIC};
use crate::config::PetrophysicsConfig;
use crate::error::{EngineResult, ValidationError};
use crate::numeric::{
    checked_div, quantize, require_fraction, require_non_negative, require_positive, round, scale,
    to_f64,
};

// ============================================================================
// Petrophysics
// ============================================================================

/// Optional Archie parameters. Missing values fall back to
/// `[petrophysics]` in the engine config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchieParameters {
    /// `a`
    pub tortuosity_factor: Option<Decimal>,
    /// `m`
    pub cementation_exponent: Option<Decimal>,
    /// `n`
    pub saturation_exponent: Option<Decimal>,
}

impl ArchieParameters {
    fn resolve(&self, defaults: &PetrophysicsConfig) -> EngineResult<(f64, f64, f64)> {
        let pick = |name: &'static str, value: Option<Decimal>, fallback: f64| -> EngineResult<f64> {
            match value {
                Some(v) => {
                    require_positive(name, v)?;
                    Ok(to_f64(v))
                }
                None => Ok(fallback),
            }
        };
        Ok((
            pick("Tortuosity factor", self.tortuosity_factor, defaults.tortuosity_factor)?,
            pick("Cementation exponent", self.cementation_exponent, defaults.cementation_exponent)?,
            pick("Saturation exponent", self.saturation_exponent, defaults.saturation_exponent)?,
        ))
    }
}

/// Water saturation from the Archie equation.
///
/// Formula: Sw = (a × Rw / (φ^m × Rt))^(1/n)
///
/// Where:
/// - φ = porosity (fraction, > 0)
/// - Rw = formation water resistivity (ohm-m)
/// - Rt = true formation resistivity (ohm-m)
///
/// Returns Sw clamped to [0, 1], 4 dp.
pub fn archie_water_saturation(
    porosity: Decimal,
    rw: Decimal,
    rt: Decimal,
    parameters: &ArchieParameters,
    defaults: &PetrophysicsConfig,
) -> EngineResult<Decimal> {
    require_fraction("Porosity", porosity)?;
    require_positive("Porosity", porosity)?;
    require_positive("Rw", rw)?;
    require_positive("Rt", rt)?;
    let (a, m, n) = parameters.resolve(defaults)?;

    debug!(%porosity, %rw, %rt, a, m, n, "Archie water saturation");

    let phi_pow_m = to_f64(porosity).powf(m);
    let ratio = a * to_f64(rw) / (phi_pow_m * to_f64(rt));
    let sw = ratio.powf(1.0 / n);

    quantize(sw.clamp(0.0, 1.0), scale::FRACTION, "water saturation")
}

/// Shale volume from gamma ray using the Larionov tertiary-rock equation.
///
/// IGR = (GR − GRclean) / (GRshale − GRclean), clamped to [0, 1]
///
/// Formula: Vsh = 0.083 × (2^(3.7 × IGR) − 1)
///
/// Returns Vsh clamped to [0, 1], 4 dp.
pub fn larionov_shale_volume(gr: Decimal, gr_clean: Decimal, gr_shale: Decimal) -> EngineResult<Decimal> {
    require_non_negative("Gamma ray", gr)?;
    require_non_negative("Gamma ray (clean)", gr_clean)?;
    require_positive("Gamma ray shale-clean contrast", gr_shale - gr_clean)?;

    let igr = checked_div(gr - gr_clean, gr_shale - gr_clean, "gamma ray index")?
        .clamp(Decimal::ZERO, Decimal::ONE);
    let vsh = 0.083 * (2f64.powf(3.7 * to_f64(igr)) - 1.0);

    debug!(%gr, %igr, vsh, "Larionov shale volume");
    quantize(vsh.clamp(0.0, 1.0), scale::FRACTION, "shale volume")
}

// ============================================================================
// Inflow
// ============================================================================

/// Vogel dimensionless rate `1 − 0.2·r − 0.8·r²` for `r = Pwf/Pr`.
pub(crate) fn vogel_factor(ratio: Decimal) -> Decimal {
    Decimal::ONE - VOGEL_LINEAR * ratio - VOGEL_QUADRATIC * ratio * ratio
}

/// Rate from the Vogel equation for a saturated reservoir.
///
/// Formula: q = qmax × (1 − 0.2 × (Pwf/Pr) − 0.8 × (Pwf/Pr)²)
///
/// Returns bopd, 2 dp.
pub fn vogel_rate(qmax: Decimal, reservoir_pressure: Decimal, pwf: Decimal) -> EngineResult<Decimal> {
    require_positive("qmax", qmax)?;
    require_positive("Reservoir pressure", reservoir_pressure)?;
    require_non_negative("Flowing pressure", pwf)?;
    if pwf > reservoir_pressure {
        return Err(ValidationError::PwfExceedsReservoir { pwf, pr: reservoir_pressure }.into());
    }

    let ratio = checked_div(pwf, reservoir_pressure, "Pwf/Pr")?;
    Ok(round(qmax * vogel_factor(ratio), scale::RATE))
}

/// Single-phase productivity index from one test point.
///
/// Formula: J = q / (Pr − Pwf)
///
/// Returns bpd/psi, 4 dp. Non-positive drawdown is rejected.
pub fn productivity_index(test_rate: Decimal, reservoir_pressure: Decimal, pwf: Decimal) -> EngineResult<Decimal> {
    require_non_negative("Test rate", test_rate)?;
    let drawdown = reservoir_pressure - pwf;
    if drawdown <= Decimal::ZERO {
        return Err(ValidationError::PwfExceedsReservoir { pwf, pr: reservoir_pressure }.into());
    }
    Ok(round(checked_div(test_rate, drawdown, "productivity index")?, scale::FRACTION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn petro() -> PetrophysicsConfig {
        PetrophysicsConfig::default()
    }

    #[test]
    fn test_archie_defaults() {
        // 1 × 0.05 / (0.2² × 20) = 0.0625, √ = 0.25
        let sw = archie_water_saturation(dec!(0.2), dec!(0.05), dec!(20), &ArchieParameters::default(), &petro())
            .unwrap();
        assert_eq!(sw, dec!(0.2500));
    }

    #[test]
    fn test_archie_explicit_parameters_override_config() {
        let params = ArchieParameters {
            tortuosity_factor: Some(dec!(0.62)),
            cementation_exponent: Some(dec!(2.15)),
            saturation_exponent: None,
        };
        let default_sw =
            archie_water_saturation(dec!(0.2), dec!(0.05), dec!(20), &ArchieParameters::default(), &petro()).unwrap();
        let tuned = archie_water_saturation(dec!(0.2), dec!(0.05), dec!(20), &params, &petro()).unwrap();
        assert_ne!(default_sw, tuned);
    }

    #[test]
    fn test_archie_clamps_to_one() {
        // Very low Rt would give Sw > 1
        let sw = archie_water_saturation(dec!(0.05), dec!(0.5), dec!(1), &ArchieParameters::default(), &petro())
            .unwrap();
        assert_eq!(sw, Decimal::ONE);
    }

    #[test]
    fn test_archie_domain() {
        let p = ArchieParameters::default();
        assert!(archie_water_saturation(dec!(1.2), dec!(0.05), dec!(20), &p, &petro()).is_err());
        assert!(archie_water_saturation(dec!(0), dec!(0.05), dec!(20), &p, &petro()).is_err());
        assert!(archie_water_saturation(dec!(0.2), dec!(0), dec!(20), &p, &petro()).is_err());
        let bad = ArchieParameters {
            saturation_exponent: Some(dec!(-2)),
            ..ArchieParameters::default()
        };
        assert!(archie_water_saturation(dec!(0.2), dec!(0.05), dec!(20), &bad, &petro()).is_err());
    }

    #[test]
    fn test_larionov_midpoint() {
        // IGR = 0.5 → 0.083 × (2^1.85 − 1) ≈ 0.2162
        assert_eq!(larionov_shale_volume(dec!(75), dec!(30), dec!(120)).unwrap(), dec!(0.2162));
    }

    #[test]
    fn test_larionov_clamps_index() {
        assert_eq!(larionov_shale_volume(dec!(10), dec!(30), dec!(120)).unwrap(), Decimal::ZERO);
        let full = larionov_shale_volume(dec!(200), dec!(30), dec!(120)).unwrap();
        assert_eq!(full, dec!(0.9957));
    }

    #[test]
    fn test_larionov_requires_contrast() {
        assert!(larionov_shale_volume(dec!(75), dec!(120), dec!(120)).is_err());
    }

    #[test]
    fn test_vogel_rate() {
        assert_eq!(vogel_rate(dec!(1000), dec!(3000), dec!(1500)).unwrap(), dec!(700.00));
        assert_eq!(vogel_rate(dec!(1000), dec!(3000), dec!(0)).unwrap(), dec!(1000.00));
        assert_eq!(vogel_rate(dec!(1000), dec!(3000), dec!(3000)).unwrap(), dec!(0.00));
    }

    #[test]
    fn test_vogel_rejects_pwf_above_pr() {
        let err = vogel_rate(dec!(1000), dec!(3000), dec!(3100)).unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn test_productivity_index() {
        assert_eq!(productivity_index(dec!(500), dec!(3000), dec!(2000)).unwrap(), dec!(0.5000));
        assert!(productivity_index(dec!(500), dec!(3000), dec!(3000)).is_err());
    }
}
