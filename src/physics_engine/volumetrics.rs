//! Volumetric in-place estimate and pressure/density conversions

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::config::defaults::{BBL_PER_ACRE_FT, FEET_PER_METRE, PSI_PER_FT_PER_PPG};
use crate::error::EngineResult;
use crate::numeric::{checked_div, checked_mul, quantize, require_fraction, require_non_negative, require_positive, round, scale, to_f64};

/// Volumetric original oil in place.
///
/// Formula: OOIP = 7758 × A × h × φ × (1 − Sw) / Bo
///
/// Where:
/// - A = drainage area (acres)
/// - h = net pay (metres, converted to feet)
/// - φ, Sw = porosity and water saturation (fractions)
/// - Bo = oil FVF (rb/stb)
///
/// Returns STB, 0 dp.
pub fn volumetric_ooip(
    area_acres: Decimal,
    thickness_m: Decimal,
    porosity: Decimal,
    water_saturation: Decimal,
    bo: Decimal,
) -> EngineResult<Decimal> {
    require_non_negative("Area", area_acres)?;
    require_non_negative("Thickness", thickness_m)?;
    require_fraction("Porosity", porosity)?;
    require_fraction("Water saturation", water_saturation)?;
    require_positive("Bo", bo)?;

    let thickness_ft = thickness_m * FEET_PER_METRE;
    let hydrocarbon_pore_volume = [area_acres, thickness_ft, porosity, Decimal::ONE - water_saturation]
        .into_iter()
        .try_fold(BBL_PER_ACRE_FT, |acc, v| checked_mul(acc, v, "OOIP"))?;
    let ooip = round(checked_div(hydrocarbon_pore_volume, bo, "OOIP")?, scale::VOLUME);

    info!(%area_acres, %thickness_m, %ooip, "Volumetric OOIP calculated");
    Ok(ooip)
}

/// Equivalent mud density of a pressure at depth.
///
/// Formula: ρe = P / (0.052 × TVD)
///
/// Returns ppg, 3 dp.
pub fn equivalent_density(pressure_psi: Decimal, tvd_ft: Decimal) -> EngineResult<Decimal> {
    require_non_negative("Pressure", pressure_psi)?;
    require_positive("TVD", tvd_ft)?;

    let ppg = to_f64(pressure_psi) / (PSI_PER_FT_PER_PPG * to_f64(tvd_ft));
    debug!(%pressure_psi, %tvd_ft, ppg, "Equivalent density");
    quantize(ppg, scale::DENSITY, "equivalent density")
}
