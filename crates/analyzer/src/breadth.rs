use analytics::{MetricRecord, TrendFlag};
use configuration::BreadthConfig;
use core_types::ReturnHorizon;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// The share of a universe satisfying one condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreadthRatio {
    pub label: String,
    /// Instruments meeting the condition.
    pub hits: usize,
    /// Instruments for which the condition could be evaluated.
    pub total: usize,
    pub pct: Decimal,
}

impl BreadthRatio {
    pub fn new(label: impl Into<String>, hits: usize, total: usize) -> Self {
        let pct = if total == 0 {
            Decimal::ZERO
        } else {
            Decimal::from(hits) / Decimal::from(total) * Decimal::ONE_HUNDRED
        };
        Self {
            label: label.into(),
            hits,
            total,
            pct,
        }
    }
}

/// Gauge reading used for the composite breadth dials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BreadthGauge {
    Bullish,
    Neutral,
    Weak,
    Bearish,
}

impl BreadthGauge {
    pub fn from_pct(pct: Decimal) -> Self {
        if pct < dec!(30) {
            BreadthGauge::Bearish
        } else if pct < dec!(50) {
            BreadthGauge::Weak
        } else if pct < dec!(70) {
            BreadthGauge::Neutral
        } else {
            BreadthGauge::Bullish
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeReading {
    pub pct: Decimal,
    pub gauge: BreadthGauge,
}

impl GaugeReading {
    fn new(pct: Decimal) -> Self {
        Self {
            pct,
            gauge: BreadthGauge::from_pct(pct),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreadthReport {
    /// Instruments in the breadth universe.
    pub universe: usize,
    /// One ratio per trend flag, in `TrendFlag::ALL` order.
    pub trend: Vec<BreadthRatio>,
    /// Positive returns, one ratio per horizon in `PERFORMANCE_HORIZONS` order.
    pub performance: Vec<BreadthRatio>,
    pub near_high: BreadthRatio,
    pub far_from_high: BreadthRatio,
    pub composite: GaugeReading,
    pub long_term: GaugeReading,
    pub today: GaugeReading,
}

pub const PERFORMANCE_HORIZONS: [ReturnHorizon; 5] = [
    ReturnHorizon::Day1,
    ReturnHorizon::Week1,
    ReturnHorizon::Month1,
    ReturnHorizon::Ytd,
    ReturnHorizon::Year1,
];

/// Share of records whose flag is `Above`, counting only records where it is known.
pub fn trend_ratio(records: &[&MetricRecord], flag: TrendFlag) -> BreadthRatio {
    let known: Vec<_> = records
        .iter()
        .map(|r| r.trend(flag))
        .filter(|state| state.is_known())
        .collect();
    let hits = known.iter().filter(|state| state.is_above()).count();
    BreadthRatio::new(flag.label(), hits, known.len())
}

/// Share of records with a strictly positive return over `horizon`.
pub fn positive_ratio(records: &[&MetricRecord], horizon: ReturnHorizon) -> BreadthRatio {
    let hits = records
        .iter()
        .filter(|r| r.trailing(horizon) > Decimal::ZERO)
        .count();
    BreadthRatio::new(format!("Positive {}", horizon.label()), hits, records.len())
}

impl BreadthReport {
    /// The positive-return ratio for `horizon`.
    pub fn positive(&self, horizon: ReturnHorizon) -> Option<&BreadthRatio> {
        PERFORMANCE_HORIZONS
            .iter()
            .position(|&h| h == horizon)
            .and_then(|i| self.performance.get(i))
    }

    /// The trend ratio for `flag`.
    pub fn above(&self, flag: TrendFlag) -> Option<&BreadthRatio> {
        TrendFlag::ALL
            .iter()
            .position(|&f| f == flag)
            .and_then(|i| self.trend.get(i))
    }
}

fn pct_of(ratio: Option<&BreadthRatio>) -> Decimal {
    ratio.map(|r| r.pct).unwrap_or_default()
}

pub fn compute(records: &[&MetricRecord], config: &BreadthConfig) -> BreadthReport {
    let trend: Vec<BreadthRatio> = TrendFlag::ALL
        .iter()
        .map(|&flag| trend_ratio(records, flag))
        .collect();
    let performance: Vec<BreadthRatio> = PERFORMANCE_HORIZONS
        .iter()
        .map(|&horizon| positive_ratio(records, horizon))
        .collect();

    let near = records
        .iter()
        .filter(|r| r.pct_from_52w_high.abs() <= config.near_high_pct)
        .count();
    let far = records
        .iter()
        .filter(|r| r.pct_from_52w_high.abs() > config.far_from_high_pct)
        .count();

    let mut report = BreadthReport {
        universe: records.len(),
        near_high: BreadthRatio::new("Near 52w High", near, records.len()),
        far_from_high: BreadthRatio::new("Far From 52w High", far, records.len()),
        composite: GaugeReading::new(Decimal::ZERO),
        long_term: GaugeReading::new(Decimal::ZERO),
        today: GaugeReading::new(Decimal::ZERO),
        trend,
        performance,
    };

    let sma50 = pct_of(report.above(TrendFlag::Sma50));
    let sma200 = pct_of(report.above(TrendFlag::Sma200));
    let day1 = pct_of(report.positive(ReturnHorizon::Day1));
    let month1 = pct_of(report.positive(ReturnHorizon::Month1));
    let ytd = pct_of(report.positive(ReturnHorizon::Ytd));

    report.composite = GaugeReading::new(
        sma50 * dec!(0.3) + sma200 * dec!(0.3) + ytd * dec!(0.2) + month1 * dec!(0.2),
    );
    report.long_term = GaugeReading::new(sma200);
    report.today = GaugeReading::new(day1);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::record;
    use core_types::TrendState;

    #[test]
    fn test_unknown_flags_are_excluded_from_denominator() {
        let mut a = record("SPY");
        a.above_sma200 = TrendState::Above;
        let mut b = record("QQQ");
        b.above_sma200 = TrendState::Below;
        let mut c = record("IBIT");
        c.above_sma200 = TrendState::Unknown;

        let ratio = trend_ratio(&[&a, &b, &c], TrendFlag::Sma200);
        assert_eq!(ratio.hits, 1);
        assert_eq!(ratio.total, 2);
        assert_eq!(ratio.pct, dec!(50));
    }

    #[test]
    fn test_empty_denominator_reports_zero() {
        let a = record("SPY");
        let ratio = trend_ratio(&[&a], TrendFlag::Sma10);
        assert_eq!(ratio.total, 0);
        assert_eq!(ratio.pct, Decimal::ZERO);
    }

    #[test]
    fn test_zero_return_is_not_positive() {
        let mut a = record("SPY");
        a.week1 = dec!(0.01);
        let b = record("QQQ");

        let ratio = positive_ratio(&[&a, &b], ReturnHorizon::Week1);
        assert_eq!(ratio.hits, 1);
        assert_eq!(ratio.total, 2);
        assert_eq!(ratio.label, "Positive 1W");
    }

    #[test]
    fn test_report_counts_distance_from_high() {
        let mut a = record("SPY");
        a.pct_from_52w_high = dec!(-5);
        let mut b = record("ARKK");
        b.pct_from_52w_high = dec!(-35.5);
        let mut c = record("XLE");
        c.pct_from_52w_high = dec!(-12);

        let report = compute(&[&a, &b, &c], &BreadthConfig::default());
        assert_eq!(report.universe, 3);
        assert_eq!(report.near_high.hits, 1);
        assert_eq!(report.far_from_high.hits, 1);
        assert_eq!(report.trend.len(), 5);
        assert_eq!(report.performance.len(), 5);
    }

    #[test]
    fn test_report_includes_positive_one_year() {
        let mut a = record("SPY");
        a.year1 = dec!(24.1);
        let mut b = record("EWZ");
        b.year1 = dec!(-8.3);
        let mut c = record("INDA");
        c.year1 = dec!(31);
        let d = record("FXI");

        let report = compute(&[&a, &b, &c, &d], &BreadthConfig::default());
        let year1 = report.positive(ReturnHorizon::Year1).unwrap();
        assert_eq!(year1.label, "Positive 1Y");
        assert_eq!(year1.hits, 2);
        assert_eq!(year1.total, 4);
        assert_eq!(year1.pct, dec!(50));
        assert!(report.positive(ReturnHorizon::Ytd).is_some());
    }

    #[test]
    fn test_composite_weights() {
        let mut a = record("SPY");
        a.above_sma50 = TrendState::Above;
        a.above_sma200 = TrendState::Above;
        a.ytd = dec!(3);
        a.month1 = dec!(-1);
        let mut b = record("IWM");
        b.above_sma50 = TrendState::Below;
        b.above_sma200 = TrendState::Above;
        b.ytd = dec!(-2);
        b.month1 = dec!(-1);

        // 0.3 * 50 + 0.3 * 100 + 0.2 * 50 + 0.2 * 0
        let report = compute(&[&a, &b], &BreadthConfig::default());
        assert_eq!(report.composite.pct, dec!(55));
        assert_eq!(report.composite.gauge, BreadthGauge::Neutral);
        assert_eq!(report.long_term.gauge, BreadthGauge::Bullish);
        assert_eq!(report.today.gauge, BreadthGauge::Bearish);
    }

    #[test]
    fn test_gauge_bands() {
        assert_eq!(BreadthGauge::from_pct(dec!(70)), BreadthGauge::Bullish);
        assert_eq!(BreadthGauge::from_pct(dec!(69.9)), BreadthGauge::Neutral);
        assert_eq!(BreadthGauge::from_pct(dec!(50)), BreadthGauge::Neutral);
        assert_eq!(BreadthGauge::from_pct(dec!(30)), BreadthGauge::Weak);
        assert_eq!(BreadthGauge::from_pct(dec!(29.99)), BreadthGauge::Bearish);
    }
}
