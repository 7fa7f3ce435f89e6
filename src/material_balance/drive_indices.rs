//! Drive indices, primary mechanism and fit quality

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

use crate::config::MaterialBalanceConfig;
use crate::error::EngineResult;
use crate::numeric::{checked_div, checked_mul, round, scale, to_f64};
use crate::types::{AnalysisQuality, DriveIndices, DriveMechanism, MbeTerms};

/// Drive indices at the last data point.
///
/// Formula:
/// - DDI = N×Eo/F
/// - SDI = N×m×Eg/F (0 without a gas cap)
/// - CDI = N×Efw/F
/// - WDI = max(0, 1 − DDI − SDI − CDI)
///
/// DDI, SDI and CDI are clamped to [0, 1] and rounded to 4 dp before the
/// remainder is taken. If together they still exceed 1 they are scaled back
/// proportionally (rounding toward zero), so the four never sum above 1.
///
/// Returns `None` when F at the last point is not positive.
pub(crate) fn calculate(
    ooip: Decimal,
    last: &MbeTerms,
    gas_cap_ratio: Decimal,
    has_gas_cap: bool,
) -> EngineResult<Option<DriveIndices>> {
    if last.f <= Decimal::ZERO {
        warn!(f = %last.f, "Non-positive underground withdrawal at last point, drive indices skipped");
        return Ok(None);
    }

    let index = |name: &'static str, energy: Decimal| -> EngineResult<Decimal> {
        let raw = checked_div(checked_mul(ooip, energy, name)?, last.f, name)?;
        let clamped = raw.clamp(Decimal::ZERO, Decimal::ONE);
        if clamped != raw {
            warn!(index = name, raw = %raw, "Drive index clamped to [0, 1]");
        }
        Ok(clamped)
    };

    let raw_depletion = index("DDI", last.eo)?;
    let raw_gas_cap = if has_gas_cap && gas_cap_ratio > Decimal::ZERO {
        index("SDI", checked_mul(gas_cap_ratio, last.eg, "SDI")?)?
    } else {
        Decimal::ZERO
    };
    let raw_compaction = index("CDI", last.efw)?;

    let mut depletion = round(raw_depletion, scale::FRACTION);
    let mut gas_cap = round(raw_gas_cap, scale::FRACTION);
    let mut compaction = round(raw_compaction, scale::FRACTION);

    let explained = depletion + gas_cap + compaction;
    if explained > Decimal::ONE {
        let total = raw_depletion + raw_gas_cap + raw_compaction;
        warn!(explained = %explained, "Drive indices exceed 1, scaling proportionally");
        let scaled = |v: Decimal| -> EngineResult<Decimal> {
            Ok(checked_div(v, total, "drive index normalization")?
                .round_dp_with_strategy(scale::FRACTION, RoundingStrategy::ToZero))
        };
        depletion = scaled(raw_depletion)?;
        gas_cap = scaled(raw_gas_cap)?;
        compaction = scaled(raw_compaction)?;
    }
    let water = (Decimal::ONE - depletion - gas_cap - compaction).max(Decimal::ZERO);

    Ok(Some(DriveIndices {
        depletion,
        gas_cap,
        water,
        compaction,
    }))
}

/// Largest index wins, ties going to the earlier of solution gas, gas cap,
/// water, compaction. Below the dominance threshold the drive is a
/// combination.
pub(crate) fn primary_mechanism(indices: &DriveIndices, dominance_threshold: f64) -> DriveMechanism {
    let candidates = [
        (indices.depletion, DriveMechanism::SolutionGas),
        (indices.gas_cap, DriveMechanism::GasCap),
        (indices.water, DriveMechanism::Water),
        (indices.compaction, DriveMechanism::Compaction),
    ];
    let (max, mechanism) = candidates
        .into_iter()
        .fold(candidates[0], |best, c| if c.0 > best.0 { c } else { best });

    if to_f64(max) < dominance_threshold {
        DriveMechanism::Combination
    } else {
        mechanism
    }
}

pub(crate) fn classify_quality(r_squared: Decimal, config: &MaterialBalanceConfig) -> AnalysisQuality {
    let r2 = to_f64(r_squared);
    if r2 >= config.excellent_r2 {
        AnalysisQuality::Excellent
    } else if r2 >= config.good_r2 {
        AnalysisQuality::Good
    } else if r2 >= config.fair_r2 {
        AnalysisQuality::Fair
    } else {
        AnalysisQuality::Poor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn terms(f: Decimal, eo: Decimal, eg: Decimal, efw: Decimal) -> MbeTerms {
        MbeTerms { f, eo, eg, efw }
    }

    fn indices(ooip: Decimal, last: &MbeTerms, m: Decimal, has_gas_cap: bool) -> DriveIndices {
        calculate(ooip, last, m, has_gas_cap).unwrap().unwrap()
    }

    #[test]
    fn test_pure_depletion() {
        let idx = indices(dec!(1000000), &terms(dec!(60000), dec!(0.06), dec!(0), dec!(0)), dec!(0), false);
        assert_eq!(idx.depletion, Decimal::ONE);
        assert!(idx.water.is_zero());
        assert_eq!(primary_mechanism(&idx, 0.5), DriveMechanism::SolutionGas);
    }

    #[test]
    fn test_remainder_goes_to_water() {
        // N·Eo/F = 0.3 → 70% unexplained
        let idx = indices(dec!(1000000), &terms(dec!(200000), dec!(0.06), dec!(0), dec!(0)), dec!(0), false);
        assert_eq!(idx.depletion, dec!(0.3));
        assert_eq!(idx.water, dec!(0.7));
        assert_eq!(primary_mechanism(&idx, 0.5), DriveMechanism::Water);
    }

    #[test]
    fn test_gas_cap_ignored_without_flag() {
        let t = terms(dec!(100000), dec!(0.04), dec!(0.02), dec!(0));
        let with_cap = indices(dec!(1000000), &t, dec!(0.5), true);
        let without = indices(dec!(1000000), &t, dec!(0.5), false);
        assert_eq!(with_cap.gas_cap, dec!(0.1));
        assert!(without.gas_cap.is_zero());
    }

    #[test]
    fn test_indices_clamped_and_bounded() {
        let idx = indices(dec!(1000000), &terms(dec!(50000), dec!(0.08), dec!(0.05), dec!(0.01)), dec!(1), true);
        for v in [idx.depletion, idx.gas_cap, idx.water, idx.compaction] {
            assert!(v >= Decimal::ZERO && v <= Decimal::ONE);
        }
        assert!(idx.total() <= Decimal::ONE);
        // 1 : 1 : 0.2 after clamping
        assert_eq!(idx.depletion, dec!(0.4545));
        assert_eq!(idx.compaction, dec!(0.0909));
        assert_eq!(primary_mechanism(&idx, 0.5), DriveMechanism::Combination);
    }

    #[test]
    fn test_non_positive_withdrawal_skips_indices() {
        let zero = calculate(dec!(1000000), &terms(dec!(0), dec!(0.06), dec!(0), dec!(0)), dec!(0), false).unwrap();
        assert!(zero.is_none());
        let injecting = calculate(dec!(1000000), &terms(dec!(-100), dec!(0.06), dec!(0), dec!(0)), dec!(0), false);
        assert!(injecting.unwrap().is_none());
    }

    #[test]
    fn test_combination_below_threshold() {
        let idx = DriveIndices {
            depletion: dec!(0.4),
            gas_cap: dec!(0.3),
            water: dec!(0.3),
            compaction: dec!(0),
        };
        assert_eq!(primary_mechanism(&idx, 0.5), DriveMechanism::Combination);
    }

    #[test]
    fn test_tie_goes_to_earlier_mechanism() {
        let idx = DriveIndices {
            depletion: dec!(0.5),
            gas_cap: dec!(0),
            water: dec!(0.5),
            compaction: dec!(0),
        };
        assert_eq!(primary_mechanism(&idx, 0.5), DriveMechanism::SolutionGas);
    }

    #[test]
    fn test_quality_bands() {
        let cfg = MaterialBalanceConfig::default();
        assert_eq!(classify_quality(dec!(0.95), &cfg), AnalysisQuality::Excellent);
        assert_eq!(classify_quality(dec!(0.9499), &cfg), AnalysisQuality::Good);
        assert_eq!(classify_quality(dec!(0.85), &cfg), AnalysisQuality::Good);
        assert_eq!(classify_quality(dec!(0.70), &cfg), AnalysisQuality::Fair);
        assert_eq!(classify_quality(dec!(0.6999), &cfg), AnalysisQuality::Poor);
    }
}
