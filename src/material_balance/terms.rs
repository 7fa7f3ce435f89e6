//! Per-point material balance terms
//!
//! F, Eo, Eg and Efw for one pressure step, given the study's initial
//! conditions. Missing cumulative volumes count as zero and a missing Bw
//! as 1.0.

use rust_decimal::Decimal;

use crate::config::defaults::GAS_VOLUME_SCALE;
use crate::error::{EngineError, EngineResult, ValidationError};
use crate::numeric::{
    checked_add, checked_div, checked_mul, checked_sub, require_fraction, require_non_negative, require_positive,
    round, scale,
};
use crate::types::{InitialConditions, MaterialBalanceDataPoint, MbeTerms};

/// Initial conditions with the required values present and checked.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Reference {
    pub pi: Decimal,
    pub boi: Decimal,
    pub rsi: Decimal,
    pub bgi: Option<Decimal>,
    /// m, 0 when absent
    pub gas_cap_ratio: Decimal,
    /// (cw·Swi + cf) / (1 − Swi), present only when all three inputs are
    pub compressibility_factor: Option<Decimal>,
}

impl Reference {
    pub fn resolve(initial: &InitialConditions) -> EngineResult<Self> {
        let (Some(pi), Some(boi), Some(rsi)) = (initial.initial_pressure, initial.initial_bo, initial.initial_rs)
        else {
            return Err(EngineError::insufficient(
                "initial pressure, Boi and Rsi are required for material balance",
            ));
        };
        require_positive("Initial pressure", pi)?;
        require_positive("Boi", boi)?;
        require_non_negative("Rsi", rsi)?;
        if let Some(bgi) = initial.initial_bg {
            require_non_negative("Bgi", bgi)?;
        }
        let gas_cap_ratio = initial.gas_cap_ratio.unwrap_or(Decimal::ZERO);
        require_non_negative("Gas cap ratio", gas_cap_ratio)?;

        let compressibility_factor = match (
            initial.water_compressibility,
            initial.rock_compressibility,
            initial.initial_water_saturation,
        ) {
            (Some(cw), Some(cf), Some(swi)) => {
                require_non_negative("Water compressibility", cw)?;
                require_non_negative("Rock compressibility", cf)?;
                require_fraction("Initial water saturation", swi)?;
                let pore_fraction = Decimal::ONE - swi;
                if pore_fraction > Decimal::ZERO {
                    let numerator = checked_add(checked_mul(cw, swi, "Efw compressibility")?, cf, "Efw compressibility")?;
                    Some(checked_div(numerator, pore_fraction, "Efw compressibility")?)
                } else {
                    None
                }
            }
            _ => None,
        };

        Ok(Self {
            pi,
            boi,
            rsi,
            bgi: initial.initial_bg,
            gas_cap_ratio,
            compressibility_factor,
        })
    }
}

fn validate_point(point: &MaterialBalanceDataPoint) -> Result<(), ValidationError> {
    require_positive("Pressure", point.pressure)?;
    require_positive("Bo", point.bo)?;
    require_non_negative("Bg", point.bg)?;
    require_non_negative("Rs", point.rs)?;
    if let Some(bw) = point.bw {
        require_positive("Bw", bw)?;
    }
    for (name, value) in [
        ("Cumulative oil production", point.cumulative_oil_production),
        ("Cumulative gas production", point.cumulative_gas_production),
        ("Cumulative water production", point.cumulative_water_production),
        ("Cumulative water injection", point.cumulative_water_injection),
        ("Cumulative gas injection", point.cumulative_gas_injection),
    ] {
        if let Some(v) = value {
            require_non_negative(name, v)?;
        }
    }
    Ok(())
}

/// Terms for one data point.
///
/// Formula:
/// - F = Np×Bo + (Gp×1000 − Np×Rs)×Bg + Wp×Bw − Wi×Bw − Gi×1000×Bg
/// - Eo = (Bo − Boi) + (Rsi − Rs)×Bg
/// - Eg = Boi×(Bg/Bgi − 1), 0 without Bgi
/// - Efw = (1+m)×Boi×[(cw×Swi + cf)/(1 − Swi)]×(Pi − P), 0 without cw, cf, Swi
///
/// Each term is quantized to 8 dp.
pub fn calculate_mbe_terms(
    point: &MaterialBalanceDataPoint,
    initial: &InitialConditions,
) -> EngineResult<MbeTerms> {
    terms_for(point, &Reference::resolve(initial)?)
}

pub(crate) fn terms_for(point: &MaterialBalanceDataPoint, r: &Reference) -> EngineResult<MbeTerms> {
    validate_point(point)?;

    let np = point.cumulative_oil_production.unwrap_or_default();
    let gp = checked_mul(point.cumulative_gas_production.unwrap_or_default(), GAS_VOLUME_SCALE, "Gp")?;
    let wp = point.cumulative_water_production.unwrap_or_default();
    let wi = point.cumulative_water_injection.unwrap_or_default();
    let gi = checked_mul(point.cumulative_gas_injection.unwrap_or_default(), GAS_VOLUME_SCALE, "Gi")?;
    let bw = point.bw.unwrap_or(Decimal::ONE);

    let oil = checked_mul(np, point.bo, "F")?;
    let free_gas = checked_mul(checked_sub(gp, checked_mul(np, point.rs, "F")?, "F")?, point.bg, "F")?;
    let water = checked_mul(checked_sub(wp, wi, "F")?, bw, "F")?;
    let injected_gas = checked_mul(gi, point.bg, "F")?;
    let f = checked_sub(checked_add(checked_add(oil, free_gas, "F")?, water, "F")?, injected_gas, "F")?;

    let dissolved = checked_mul(checked_sub(r.rsi, point.rs, "Eo")?, point.bg, "Eo")?;
    let eo = checked_add(checked_sub(point.bo, r.boi, "Eo")?, dissolved, "Eo")?;

    let eg = match r.bgi {
        Some(bgi) if bgi > Decimal::ZERO => {
            checked_mul(r.boi, checked_div(point.bg, bgi, "Eg")? - Decimal::ONE, "Eg")?
        }
        _ => Decimal::ZERO,
    };

    let efw = match r.compressibility_factor {
        Some(c) => {
            let drop = checked_sub(r.pi, point.pressure, "Efw")?;
            let oil_zone = checked_mul(Decimal::ONE + r.gas_cap_ratio, r.boi, "Efw")?;
            checked_mul(checked_mul(oil_zone, c, "Efw")?, drop, "Efw")?
        }
        None => Decimal::ZERO,
    };

    Ok(MbeTerms {
        f: round(f, scale::MBE_TERM),
        eo: round(eo, scale::MBE_TERM),
        eg: round(eg, scale::MBE_TERM),
        efw: round(efw, scale::MBE_TERM),
    })
}
