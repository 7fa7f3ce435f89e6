//! Black-oil PVT correlations
//!
//! Bubble point, oil FVF, solution GOR and dead-oil viscosity from the
//! fluid's gravities and temperature, plus the correlation bundle used when
//! a study has no lab PVT and the consistency checks applied to lab data.
//!
//! Temperatures are °F, pressures psia, GOR scf/stb. Vazquez-Beggs gas
//! gravity is taken at the 100 psig reference separator.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info};

use crate::error::EngineResult;
use crate::numeric::{checked_add, checked_div, quantize, require_non_negative, require_positive, round, scale, to_f64};
use crate::types::{
    BubblePointCorrelation, FluidDescription, OilFvfCorrelation, PvtCorrelations, PvtIssue, PvtProperties, PvtSample,
    SolutionGorCorrelation, ViscosityCorrelation,
};

/// Vazquez-Beggs GOR coefficients (C1, C2, C3) for heavy (≤ 30 °API) and
/// light crude.
fn vazquez_beggs_gor_coefficients(api: f64) -> (f64, f64, f64) {
    if api <= 30.0 {
        (0.0362, 1.0937, 25.7240)
    } else {
        (0.0178, 1.187, 23.931)
    }
}

/// Vazquez-Beggs FVF coefficients (C1, C2, C3).
fn vazquez_beggs_fvf_coefficients(api: f64) -> (f64, f64, f64) {
    if api <= 30.0 {
        (4.677e-4, 1.751e-5, -1.811e-8)
    } else {
        (4.670e-4, 1.100e-5, 1.337e-9)
    }
}

fn require_fluid(gas_gravity: Decimal, temperature_f: Decimal, api: Decimal) -> EngineResult<()> {
    require_positive("Gas gravity", gas_gravity)?;
    require_positive("Temperature", temperature_f)?;
    require_positive("API gravity", api)?;
    Ok(())
}

// ============================================================================
// Gravity
// ============================================================================

fn oil_specific_gravity(api: Decimal, dp: u32) -> EngineResult<Decimal> {
    require_positive("API gravity", api)?;
    let sg = checked_div(dec!(141.5), checked_add(dec!(131.5), api, "oil specific gravity")?, "oil specific gravity")?;
    Ok(round(sg, dp))
}

/// Oil specific gravity from API gravity.
///
/// Formula: γo = 141.5 / (131.5 + API)
pub fn api_to_specific_gravity(api: Decimal) -> EngineResult<Decimal> {
    oil_specific_gravity(api, scale::FRACTION)
}

// ============================================================================
// Bubble Point
// ============================================================================

/// Bubble point pressure from the Standing correlation.
///
/// Formula: Pb = 18.2 × ((Rs/γg)^0.83 × 10^(0.00091×T − 0.0125×API) − 1.4)
///
/// Where:
/// - Rs = solution GOR (scf/stb)
/// - γg = gas specific gravity (air = 1)
/// - T = temperature (°F)
///
/// Returns Pb in psia, 2 dp.
pub fn standing_bubble_point(
    rs: Decimal,
    gas_gravity: Decimal,
    temperature_f: Decimal,
    api: Decimal,
) -> EngineResult<Decimal> {
    require_positive("Rs", rs)?;
    require_fluid(gas_gravity, temperature_f, api)?;

    let term1 = (to_f64(rs) / to_f64(gas_gravity)).powf(0.83);
    let exponent = 0.00091 * to_f64(temperature_f) - 0.0125 * to_f64(api);
    let pb = 18.2 * (term1 * 10f64.powf(exponent) - 1.4);

    debug!(%rs, %gas_gravity, %temperature_f, %api, pb, "Standing bubble point");
    quantize(pb, scale::PRESSURE, "bubble point pressure")
}

/// Bubble point pressure from the Vazquez-Beggs correlation.
///
/// Formula: Pb = (Rs / (C1 × γg × e^(C3×API/(T+460))))^(1/C2)
pub fn vazquez_beggs_bubble_point(
    rs: Decimal,
    gas_gravity: Decimal,
    temperature_f: Decimal,
    api: Decimal,
) -> EngineResult<Decimal> {
    require_positive("Rs", rs)?;
    require_fluid(gas_gravity, temperature_f, api)?;
    let api = to_f64(api);
    let (c1, c2, c3) = vazquez_beggs_gor_coefficients(api);

    let denominator = c1 * to_f64(gas_gravity) * (c3 * api / (to_f64(temperature_f) + 460.0)).exp();
    let pb = (to_f64(rs) / denominator).powf(1.0 / c2);

    quantize(pb, scale::PRESSURE, "bubble point pressure")
}

/// Bubble point pressure from the Glasø correlation.
///
/// Formula:
/// - Pb* = (Rs/γg)^0.816 × T^0.172 / API^0.989
/// - log Pb = 1.7669 + 1.7447 × log Pb* − 0.30218 × (log Pb*)²
pub fn glaso_bubble_point(
    rs: Decimal,
    gas_gravity: Decimal,
    temperature_f: Decimal,
    api: Decimal,
) -> EngineResult<Decimal> {
    require_positive("Rs", rs)?;
    require_fluid(gas_gravity, temperature_f, api)?;

    let pb_star = (to_f64(rs) / to_f64(gas_gravity)).powf(0.816) * to_f64(temperature_f).powf(0.172)
        / to_f64(api).powf(0.989);
    let log_star = pb_star.log10();
    let pb = 10f64.powf(1.7669 + 1.7447 * log_star - 0.30218 * log_star * log_star);

    quantize(pb, scale::PRESSURE, "bubble point pressure")
}

pub fn bubble_point(
    correlation: BubblePointCorrelation,
    rs: Decimal,
    gas_gravity: Decimal,
    temperature_f: Decimal,
    api: Decimal,
) -> EngineResult<Decimal> {
    match correlation {
        BubblePointCorrelation::Standing => standing_bubble_point(rs, gas_gravity, temperature_f, api),
        BubblePointCorrelation::VazquezBeggs => vazquez_beggs_bubble_point(rs, gas_gravity, temperature_f, api),
        BubblePointCorrelation::Glaso => glaso_bubble_point(rs, gas_gravity, temperature_f, api),
    }
}

// ============================================================================
// Oil FVF
// ============================================================================

/// Oil formation volume factor from the Standing correlation.
///
/// Formula: Bo = 0.9759 + 0.00012 × (Rs × √(γg/γo) + 1.25 × T)^1.2
///
/// `oil_gravity` is specific gravity (see [`api_to_specific_gravity`]).
/// Returns Bo in rb/stb, 4 dp.
pub fn standing_oil_fvf(
    rs: Decimal,
    gas_gravity: Decimal,
    oil_gravity: Decimal,
    temperature_f: Decimal,
) -> EngineResult<Decimal> {
    require_non_negative("Rs", rs)?;
    require_positive("Gas gravity", gas_gravity)?;
    require_positive("Oil gravity", oil_gravity)?;
    require_positive("Temperature", temperature_f)?;

    let gravity_ratio = (to_f64(gas_gravity) / to_f64(oil_gravity)).sqrt();
    let term = to_f64(rs) * gravity_ratio + 1.25 * to_f64(temperature_f);
    let bo = 0.9759 + 0.00012 * term.powf(1.2);

    quantize(bo, scale::FRACTION, "oil formation volume factor")
}

/// Oil formation volume factor from the Vazquez-Beggs correlation.
///
/// Formula: Bo = 1 + C1×Rs + (T − 60) × (API/γg) × (C2 + C3×Rs)
pub fn vazquez_beggs_oil_fvf(
    rs: Decimal,
    gas_gravity: Decimal,
    temperature_f: Decimal,
    api: Decimal,
) -> EngineResult<Decimal> {
    require_non_negative("Rs", rs)?;
    require_positive("Gas gravity", gas_gravity)?;
    require_positive("Temperature", temperature_f)?;
    require_positive("API gravity", api)?;
    let (rs, api) = (to_f64(rs), to_f64(api));
    let (c1, c2, c3) = vazquez_beggs_fvf_coefficients(api);

    let bo = 1.0 + c1 * rs + (to_f64(temperature_f) - 60.0) * (api / to_f64(gas_gravity)) * (c2 + c3 * rs);
    quantize(bo, scale::FRACTION, "oil formation volume factor")
}

/// Oil formation volume factor from the Glasø correlation.
///
/// Formula:
/// - Bob* = Rs × (γg/γo)^0.526 + 0.968 × T
/// - log(Bo − 1) = −6.58511 + 2.91329 × log Bob* − 0.27683 × (log Bob*)²
pub fn glaso_oil_fvf(
    rs: Decimal,
    gas_gravity: Decimal,
    temperature_f: Decimal,
    api: Decimal,
) -> EngineResult<Decimal> {
    require_non_negative("Rs", rs)?;
    require_positive("Gas gravity", gas_gravity)?;
    require_positive("Temperature", temperature_f)?;
    let oil_gravity = oil_specific_gravity(api, scale::RATIO)?;

    let bob_star =
        to_f64(rs) * (to_f64(gas_gravity) / to_f64(oil_gravity)).powf(0.526) + 0.968 * to_f64(temperature_f);
    let log_star = bob_star.log10();
    let bo = 1.0 + 10f64.powf(-6.58511 + 2.91329 * log_star - 0.27683 * log_star * log_star);

    quantize(bo, scale::FRACTION, "oil formation volume factor")
}

pub fn oil_fvf(
    correlation: OilFvfCorrelation,
    rs: Decimal,
    gas_gravity: Decimal,
    temperature_f: Decimal,
    api: Decimal,
) -> EngineResult<Decimal> {
    match correlation {
        OilFvfCorrelation::Standing => {
            let oil_gravity = oil_specific_gravity(api, scale::RATIO)?;
            standing_oil_fvf(rs, gas_gravity, oil_gravity, temperature_f)
        }
        OilFvfCorrelation::VazquezBeggs => vazquez_beggs_oil_fvf(rs, gas_gravity, temperature_f, api),
        OilFvfCorrelation::Glaso => glaso_oil_fvf(rs, gas_gravity, temperature_f, api),
    }
}

// ============================================================================
// Solution GOR
// ============================================================================

/// Solution GOR below bubble point from the Standing correlation.
///
/// Formula: Rs = γg × ((P/18.2 + 1.4) × 10^(0.0125×API − 0.00091×T))^1.2048
///
/// Returns scf/stb, 2 dp.
pub fn standing_solution_gor(
    pressure: Decimal,
    gas_gravity: Decimal,
    temperature_f: Decimal,
    api: Decimal,
) -> EngineResult<Decimal> {
    require_positive("Pressure", pressure)?;
    require_fluid(gas_gravity, temperature_f, api)?;

    let exponent = 0.0125 * to_f64(api) - 0.00091 * to_f64(temperature_f);
    let term = (to_f64(pressure) / 18.2 + 1.4) * 10f64.powf(exponent);
    let rs = to_f64(gas_gravity) * term.powf(1.2048);

    quantize(rs, scale::RATE, "solution GOR")
}

/// Solution GOR below bubble point from the Vazquez-Beggs correlation.
///
/// Formula: Rs = C1 × γg × P^C2 × e^(C3×API/(T+460))
pub fn vazquez_beggs_solution_gor(
    pressure: Decimal,
    gas_gravity: Decimal,
    temperature_f: Decimal,
    api: Decimal,
) -> EngineResult<Decimal> {
    require_positive("Pressure", pressure)?;
    require_fluid(gas_gravity, temperature_f, api)?;
    let api = to_f64(api);
    let (c1, c2, c3) = vazquez_beggs_gor_coefficients(api);

    let rs = c1
        * to_f64(gas_gravity)
        * to_f64(pressure).powf(c2)
        * (c3 * api / (to_f64(temperature_f) + 460.0)).exp();
    quantize(rs, scale::RATE, "solution GOR")
}

pub fn solution_gor(
    correlation: SolutionGorCorrelation,
    pressure: Decimal,
    gas_gravity: Decimal,
    temperature_f: Decimal,
    api: Decimal,
) -> EngineResult<Decimal> {
    match correlation {
        SolutionGorCorrelation::Standing => standing_solution_gor(pressure, gas_gravity, temperature_f, api),
        SolutionGorCorrelation::VazquezBeggs => vazquez_beggs_solution_gor(pressure, gas_gravity, temperature_f, api),
    }
}

// ============================================================================
// Viscosity
// ============================================================================

/// Dead-oil viscosity from the Beggs-Robinson correlation.
///
/// Formula: μod = 10^(10^(3.0324 − 0.02023×API) × T^−1.163) − 1
///
/// Returns cp, 4 dp.
pub fn beggs_robinson_dead_oil_viscosity(api: Decimal, temperature_f: Decimal) -> EngineResult<Decimal> {
    require_positive("API gravity", api)?;
    require_positive("Temperature", temperature_f)?;

    let x = to_f64(temperature_f).powf(-1.163);
    let y = 10f64.powf(3.0324 - 0.02023 * to_f64(api));
    let mu_od = 10f64.powf(y * x) - 1.0;

    quantize(mu_od, scale::FRACTION, "dead oil viscosity")
}

/// Dead-oil viscosity from the Egbogah correlation.
///
/// Formula: log log(μod + 1) = 1.8653 − 0.025086×API − 0.5644×log T
pub fn egbogah_dead_oil_viscosity(api: Decimal, temperature_f: Decimal) -> EngineResult<Decimal> {
    require_positive("API gravity", api)?;
    require_positive("Temperature", temperature_f)?;

    let a = 1.8653 - 0.025086 * to_f64(api) - 0.5644 * to_f64(temperature_f).log10();
    let mu_od = 10f64.powf(10f64.powf(a)) - 1.0;

    quantize(mu_od, scale::FRACTION, "dead oil viscosity")
}

pub fn dead_oil_viscosity(correlation: ViscosityCorrelation, api: Decimal, temperature_f: Decimal) -> EngineResult<Decimal> {
    match correlation {
        ViscosityCorrelation::BeggsRobinson => beggs_robinson_dead_oil_viscosity(api, temperature_f),
        ViscosityCorrelation::Egbogah => egbogah_dead_oil_viscosity(api, temperature_f),
    }
}

// ============================================================================
// Bundle & Consistency
// ============================================================================

/// Pb, Bo at Pb and dead-oil viscosity for a fluid without lab PVT.
///
/// API is converted to oil specific gravity (6 dp) once and shared by the
/// FVF correlations that need it.
pub fn pvt_from_correlations(fluid: &FluidDescription, correlations: PvtCorrelations) -> EngineResult<PvtProperties> {
    let FluidDescription {
        temperature_f,
        solution_gor,
        gas_gravity,
        api_gravity,
    } = *fluid;

    let oil_specific_gravity = oil_specific_gravity(api_gravity, scale::RATIO)?;
    let bubble_point_pressure =
        bubble_point(correlations.bubble_point, solution_gor, gas_gravity, temperature_f, api_gravity)?;
    let oil_fvf_at_bubble_point =
        oil_fvf(correlations.oil_fvf, solution_gor, gas_gravity, temperature_f, api_gravity)?;
    let dead_oil_viscosity = dead_oil_viscosity(correlations.viscosity, api_gravity, temperature_f)?;

    info!(
        pb = %bubble_point_pressure,
        bo = %oil_fvf_at_bubble_point,
        mu_od = %dead_oil_viscosity,
        pb_correlation = %correlations.bubble_point,
        bo_correlation = %correlations.oil_fvf,
        viscosity_correlation = %correlations.viscosity,
        "PVT estimated from correlations"
    );

    Ok(PvtProperties {
        bubble_point_pressure,
        oil_fvf_at_bubble_point,
        dead_oil_viscosity,
        oil_specific_gravity,
        correlations,
    })
}

/// Consistency issues in a PVT sample. An empty list means every present
/// value passed.
///
/// Checks:
/// - API gravity in [0, 70]
/// - Pb not above the sample pressure
/// - Bo in [0.9, 3.0] rb/stb
/// - gas gravity in [0.5, 1.5]
/// - foamy oil carries a pseudo bubble point
pub fn validate_pvt_data(sample: &PvtSample) -> Vec<PvtIssue> {
    let mut issues = Vec::new();
    let mut flag = |field: &str, message: &str| {
        issues.push(PvtIssue {
            field: field.to_string(),
            message: message.to_string(),
        });
    };

    if let Some(api) = sample.api_gravity {
        if api < Decimal::ZERO || api > dec!(70) {
            flag("api_gravity", "API gravity should be between 0 and 70");
        }
    }
    if let (Some(pb), Some(sample_pressure)) = (sample.bubble_point_pressure, sample.sample_pressure) {
        if pb > sample_pressure {
            flag("bubble_point_pressure", "bubble point should not exceed sample pressure");
        }
    }
    if let Some(bo) = sample.oil_fvf_at_bubble_point {
        if bo < dec!(0.9) || bo > dec!(3.0) {
            flag("oil_fvf_at_bubble_point", "oil FVF typically ranges from 0.9 to 3.0 rb/stb");
        }
    }
    if let Some(gg) = sample.gas_gravity {
        if gg < dec!(0.5) || gg > dec!(1.5) {
            flag("gas_gravity", "gas specific gravity typically ranges from 0.5 to 1.5");
        }
    }
    if sample.has_foamy_behavior && sample.pseudo_bubble_point.is_none() {
        flag("pseudo_bubble_point", "pseudo bubble point required for foamy oil");
    }

    debug!(issues = issues.len(), "PVT data checked");
    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    // 500 scf/stb, γg 0.75, 180 °F, 35 °API
    fn fluid() -> FluidDescription {
        FluidDescription {
            temperature_f: dec!(180),
            solution_gor: dec!(500),
            gas_gravity: dec!(0.75),
            api_gravity: dec!(35),
        }
    }

    fn within(value: Decimal, low: Decimal, high: Decimal) -> bool {
        value > low && value < high
    }

    #[test]
    fn test_api_to_sg() {
        assert_eq!(api_to_specific_gravity(dec!(10)).unwrap(), Decimal::ONE);
        assert_eq!(api_to_specific_gravity(dec!(35)).unwrap(), dec!(0.8498));
    }

    #[test]
    fn test_standing_bubble_point() {
        let pb = standing_bubble_point(dec!(500), dec!(0.75), dec!(180), dec!(35)).unwrap();
        assert!(within(pb, dec!(2080), dec!(2140)), "Pb should be ~2110 psia, got {pb}");
        assert_eq!(pb.scale(), 2);
    }

    #[test]
    fn test_bubble_point_correlations_agree_roughly() {
        let vb = vazquez_beggs_bubble_point(dec!(500), dec!(0.75), dec!(180), dec!(35)).unwrap();
        let glaso = glaso_bubble_point(dec!(500), dec!(0.75), dec!(180), dec!(35)).unwrap();
        assert!(within(vb, dec!(2340), dec!(2390)), "Vazquez-Beggs Pb ~2367, got {vb}");
        assert!(within(glaso, dec!(2430), dec!(2470)), "Glasø Pb ~2452, got {glaso}");
    }

    #[test]
    fn test_vazquez_beggs_heavy_oil_coefficients() {
        // 25 °API switches to the heavy-crude constants
        let pb = vazquez_beggs_bubble_point(dec!(500), dec!(0.75), dec!(180), dec!(25)).unwrap();
        assert!(within(pb, dec!(3140), dec!(3190)), "heavy-oil Pb ~3168, got {pb}");
    }

    #[test]
    fn test_standing_bo() {
        let bo = standing_oil_fvf(dec!(500), dec!(0.75), dec!(0.85), dec!(180)).unwrap();
        assert!(within(bo, dec!(1.27), dec!(1.30)), "Bo should be ~1.285, got {bo}");
    }

    #[test]
    fn test_fvf_correlations() {
        let vb = vazquez_beggs_oil_fvf(dec!(500), dec!(0.75), dec!(180), dec!(35)).unwrap();
        assert_eq!(vb, dec!(1.2988));
        let glaso = glaso_oil_fvf(dec!(500), dec!(0.75), dec!(180), dec!(35)).unwrap();
        assert!(within(glaso, dec!(1.24), dec!(1.28)), "Glasø Bo ~1.258, got {glaso}");
        assert!(glaso_oil_fvf(dec!(500), dec!(0.75), dec!(180), dec!(0)).is_err());
    }

    #[test]
    fn test_solution_gor() {
        let standing = standing_solution_gor(dec!(2000), dec!(0.75), dec!(180), dec!(35)).unwrap();
        assert!(within(standing, dec!(460), dec!(476)), "Standing Rs ~468, got {standing}");
        let vb = vazquez_beggs_solution_gor(dec!(2000), dec!(0.75), dec!(180), dec!(35)).unwrap();
        assert!(within(vb, dec!(400), dec!(420)), "Vazquez-Beggs Rs ~409, got {vb}");
    }

    #[test]
    fn test_standing_gor_inverts_bubble_point() {
        let pb = standing_bubble_point(dec!(500), dec!(0.75), dec!(180), dec!(35)).unwrap();
        let rs = solution_gor(SolutionGorCorrelation::Standing, pb, dec!(0.75), dec!(180), dec!(35)).unwrap();
        assert!((rs - dec!(500)).abs() < dec!(1), "Rs at Pb should be ~500, got {rs}");
    }

    #[test]
    fn test_viscosity_correlations() {
        let br = beggs_robinson_dead_oil_viscosity(dec!(35), dec!(180)).unwrap();
        assert!(within(br, dec!(2.0), dec!(2.4)), "μod should be ~2.18 cp, got {br}");
        let egbogah = egbogah_dead_oil_viscosity(dec!(35), dec!(180)).unwrap();
        assert!(within(egbogah, dec!(2.2), dec!(2.4)), "Egbogah μod ~2.30 cp, got {egbogah}");
        assert!(beggs_robinson_dead_oil_viscosity(dec!(35), dec!(0)).is_err());
        assert!(egbogah_dead_oil_viscosity(dec!(0), dec!(180)).is_err());
    }

    #[test]
    fn test_bundle_uses_selected_correlations() {
        let standing = pvt_from_correlations(&fluid(), PvtCorrelations::default()).unwrap();
        assert_eq!(standing.oil_specific_gravity, dec!(0.84985));
        assert_eq!(
            standing.bubble_point_pressure,
            standing_bubble_point(dec!(500), dec!(0.75), dec!(180), dec!(35)).unwrap()
        );
        assert_eq!(
            standing.oil_fvf_at_bubble_point,
            standing_oil_fvf(dec!(500), dec!(0.75), dec!(0.84985), dec!(180)).unwrap()
        );
        assert_eq!(standing.dead_oil_viscosity, beggs_robinson_dead_oil_viscosity(dec!(35), dec!(180)).unwrap());

        let alternative = PvtCorrelations {
            bubble_point: BubblePointCorrelation::Glaso,
            oil_fvf: OilFvfCorrelation::VazquezBeggs,
            viscosity: ViscosityCorrelation::Egbogah,
        };
        let other = pvt_from_correlations(&fluid(), alternative).unwrap();
        assert_eq!(other.correlations, alternative);
        assert_eq!(other.oil_fvf_at_bubble_point, dec!(1.2988));
        assert_ne!(other.bubble_point_pressure, standing.bubble_point_pressure);
    }

    #[test]
    fn test_bundle_rejects_invalid_fluid() {
        let fluid = FluidDescription {
            gas_gravity: dec!(0),
            ..fluid()
        };
        assert_eq!(
            pvt_from_correlations(&fluid, PvtCorrelations::default()).unwrap_err().kind(),
            "validation"
        );
    }

    #[test]
    fn test_consistent_sample_has_no_issues() {
        let sample = PvtSample {
            api_gravity: Some(dec!(35)),
            gas_gravity: Some(dec!(0.75)),
            bubble_point_pressure: Some(dec!(2100)),
            sample_pressure: Some(dec!(3000)),
            oil_fvf_at_bubble_point: Some(dec!(1.28)),
            ..PvtSample::default()
        };
        assert!(validate_pvt_data(&sample).is_empty());
        assert!(validate_pvt_data(&PvtSample::default()).is_empty());
    }

    #[test]
    fn test_inconsistent_sample_reports_each_field() {
        let sample = PvtSample {
            api_gravity: Some(dec!(75)),
            gas_gravity: Some(dec!(1.8)),
            bubble_point_pressure: Some(dec!(3500)),
            sample_pressure: Some(dec!(3000)),
            oil_fvf_at_bubble_point: Some(dec!(0.8)),
            has_foamy_behavior: true,
            pseudo_bubble_point: None,
        };
        let fields: Vec<String> = validate_pvt_data(&sample).into_iter().map(|i| i.field).collect();
        assert_eq!(
            fields,
            vec!["api_gravity", "bubble_point_pressure", "oil_fvf_at_bubble_point", "gas_gravity", "pseudo_bubble_point"]
        );
    }
}
