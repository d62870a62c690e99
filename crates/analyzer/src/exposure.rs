use analytics::{RecordMap, TrendFlag};
use configuration::ExposureConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Points available: five benchmark flags plus two companions at 0.5 + 0.5 each.
const MAX_POINTS: Decimal = dec!(7);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExposureBand {
    Bullish,
    Positive,
    Neutral,
    Negative,
    Bearish,
}

impl ExposureBand {
    pub fn from_pct(pct: Decimal) -> Self {
        if pct >= dec!(80) {
            ExposureBand::Bullish
        } else if pct >= dec!(60) {
            ExposureBand::Positive
        } else if pct >= dec!(40) {
            ExposureBand::Neutral
        } else if pct >= dec!(20) {
            ExposureBand::Negative
        } else {
            ExposureBand::Bearish
        }
    }
}

/// Suggested market exposure derived from benchmark trend alignment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExposureScore {
    pub points: Decimal,
    pub pct: Decimal,
    pub band: ExposureBand,
}

pub fn compute(records: &RecordMap, config: &ExposureConfig) -> ExposureScore {
    let Some(benchmark) = records.get(&config.benchmark) else {
        tracing::debug!(benchmark = %config.benchmark, "Exposure benchmark missing, reporting neutral");
        return ExposureScore {
            points: Decimal::ZERO,
            pct: dec!(50),
            band: ExposureBand::Neutral,
        };
    };

    let mut points: Decimal = TrendFlag::ALL
        .iter()
        .filter(|&&flag| benchmark.trend(flag).is_above())
        .map(|_| Decimal::ONE)
        .sum();

    for companion in config.companions.iter().filter_map(|s| records.get(s)) {
        for flag in [TrendFlag::Sma50, TrendFlag::Sma200] {
            if companion.trend(flag).is_above() {
                points += dec!(0.5);
            }
        }
    }

    let pct = points / MAX_POINTS * Decimal::ONE_HUNDRED;
    ExposureScore {
        points,
        pct,
        band: ExposureBand::from_pct(pct),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{map_of, record};
    use core_types::TrendState;

    fn all_above(symbol: &str) -> analytics::MetricRecord {
        let mut r = record(symbol);
        r.above_sma10 = TrendState::Above;
        r.above_sma20 = TrendState::Above;
        r.above_sma50 = TrendState::Above;
        r.above_sma200 = TrendState::Above;
        r.above_50_and_200 = TrendState::Above;
        r
    }

    #[test]
    fn test_full_alignment_scores_seven_points() {
        let records = map_of(vec![all_above("SPY"), all_above("QQQ"), all_above("IWM")]);
        let score = compute(&records, &ExposureConfig::default());
        assert_eq!(score.points, dec!(7));
        assert_eq!(score.pct, dec!(100));
        assert_eq!(score.band, ExposureBand::Bullish);
    }

    #[test]
    fn test_companions_add_half_points() {
        let mut spy = record("SPY");
        spy.above_sma10 = TrendState::Above;
        spy.above_sma20 = TrendState::Above;
        let mut qqq = record("QQQ");
        qqq.above_sma50 = TrendState::Above;
        // IWM is absent from the map and contributes nothing.
        let records = map_of(vec![spy, qqq]);

        let score = compute(&records, &ExposureConfig::default());
        assert_eq!(score.points, dec!(2.5));
        assert_eq!(score.band, ExposureBand::Negative);
    }

    #[test]
    fn test_unknown_flags_score_zero() {
        let records = map_of(vec![record("SPY")]);
        let score = compute(&records, &ExposureConfig::default());
        assert_eq!(score.points, Decimal::ZERO);
        assert_eq!(score.band, ExposureBand::Bearish);
    }

    #[test]
    fn test_missing_benchmark_is_neutral() {
        let records = map_of(vec![all_above("QQQ")]);
        let score = compute(&records, &ExposureConfig::default());
        assert_eq!(score.pct, dec!(50));
        assert_eq!(score.band, ExposureBand::Neutral);
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(ExposureBand::from_pct(dec!(80)), ExposureBand::Bullish);
        assert_eq!(ExposureBand::from_pct(dec!(79.99)), ExposureBand::Positive);
        assert_eq!(ExposureBand::from_pct(dec!(60)), ExposureBand::Positive);
        assert_eq!(ExposureBand::from_pct(dec!(40)), ExposureBand::Neutral);
        assert_eq!(ExposureBand::from_pct(dec!(20)), ExposureBand::Negative);
        assert_eq!(ExposureBand::from_pct(dec!(19.99)), ExposureBand::Bearish);
    }
}
