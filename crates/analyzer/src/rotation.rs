use analytics::RecordMap;
use configuration::RotationConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Quadrant {
    Leading,
    Weakening,
    Lagging,
    Improving,
}

impl Quadrant {
    /// Zero momentum or acceleration counts as non-positive.
    pub fn classify(momentum: Decimal, acceleration: Decimal) -> Self {
        let rising = momentum > Decimal::ZERO;
        let accelerating = acceleration > Decimal::ZERO;
        match (rising, accelerating) {
            (true, true) => Quadrant::Leading,
            (true, false) => Quadrant::Weakening,
            (false, false) => Quadrant::Lagging,
            (false, true) => Quadrant::Improving,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RotationPoint {
    pub ticker: String,
    pub label: String,
    /// The 1M return.
    pub momentum: Decimal,
    /// The 1W return against the average weekly pace of the 1M return.
    pub acceleration: Decimal,
    /// |YTD|, used as the bubble size by renderers.
    pub size: Decimal,
    pub quadrant: Quadrant,
}

pub fn compute(records: &RecordMap, config: &RotationConfig) -> Vec<RotationPoint> {
    config
        .sectors
        .iter()
        .filter_map(|sector| {
            let r = records.get(&sector.ticker)?;
            let momentum = r.month1;
            let acceleration = r.week1 - r.month1 / dec!(4);
            Some(RotationPoint {
                ticker: sector.ticker.clone(),
                label: sector.label.clone(),
                momentum,
                acceleration,
                size: r.ytd.abs(),
                quadrant: Quadrant::classify(momentum, acceleration),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{map_of, record};
    use configuration::LabeledTicker;

    #[test]
    fn test_quadrant_boundaries() {
        assert_eq!(Quadrant::classify(dec!(1), dec!(1)), Quadrant::Leading);
        assert_eq!(Quadrant::classify(dec!(1), dec!(0)), Quadrant::Weakening);
        assert_eq!(Quadrant::classify(dec!(0), dec!(0)), Quadrant::Lagging);
        assert_eq!(Quadrant::classify(dec!(-2), dec!(-1)), Quadrant::Lagging);
        assert_eq!(Quadrant::classify(dec!(0), dec!(0.5)), Quadrant::Improving);
    }

    #[test]
    fn test_acceleration_against_quarter_month() {
        let mut xlk = record("XLK");
        xlk.month1 = dec!(8);
        xlk.week1 = dec!(1);
        xlk.ytd = dec!(-12.5);
        let mut xle = record("XLE");
        xle.month1 = dec!(-4);
        xle.week1 = dec!(0.5);
        let records = map_of(vec![xlk, xle]);
        let config = RotationConfig {
            sectors: vec![
                LabeledTicker { ticker: "XLK".to_string(), label: "Tech".to_string() },
                LabeledTicker { ticker: "XLV".to_string(), label: "Health".to_string() },
                LabeledTicker { ticker: "XLE".to_string(), label: "Energy".to_string() },
            ],
        };

        let points = compute(&records, &config);
        assert_eq!(points.len(), 2);

        assert_eq!(points[0].acceleration, dec!(-1));
        assert_eq!(points[0].quadrant, Quadrant::Weakening);
        assert_eq!(points[0].size, dec!(12.5));

        assert_eq!(points[1].ticker, "XLE");
        assert_eq!(points[1].acceleration, dec!(1.5));
        assert_eq!(points[1].quadrant, Quadrant::Improving);
    }
}
