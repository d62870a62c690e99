use analytics::{MetricRecord, RecordMap, TrendFlag};
use core_types::ReturnHorizon;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Bands for a percentage of instruments trading above a moving average.
    pub fn from_trend_pct(pct: Decimal) -> Self {
        if pct >= dec!(70) {
            Sentiment::Positive
        } else if pct >= dec!(40) {
            Sentiment::Neutral
        } else {
            Sentiment::Negative
        }
    }

    /// Bands for an average return in percent.
    pub fn from_return(value: Decimal) -> Self {
        if value > Decimal::ONE {
            Sentiment::Positive
        } else if value > Decimal::NEGATIVE_ONE {
            Sentiment::Neutral
        } else {
            Sentiment::Negative
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReading {
    pub flag: TrendFlag,
    pub label: &'static str,
    pub pct: Decimal,
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnReading {
    pub horizon: ReturnHorizon,
    pub average: Decimal,
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceOverview {
    pub averages: Vec<ReturnReading>,
    /// Distance of the benchmark from its 52-week high, as a positive number.
    pub benchmark_off_high: Decimal,
    pub volatility_price: Decimal,
}

const AVERAGED_HORIZONS: [ReturnHorizon; 4] = [
    ReturnHorizon::Ytd,
    ReturnHorizon::Week1,
    ReturnHorizon::Month1,
    ReturnHorizon::Year1,
];

/// Share of all records above each moving average. A flag nobody has enough history for reads 50%.
pub fn trend_overview(records: &RecordMap) -> Vec<TrendReading> {
    TrendFlag::ALL
        .iter()
        .map(|&flag| {
            let known: Vec<_> = records
                .values()
                .map(|r| r.trend(flag))
                .filter(|s| s.is_known())
                .collect();
            let pct = if known.is_empty() {
                dec!(50)
            } else {
                let above = known.iter().filter(|s| s.is_above()).count();
                Decimal::from(above) / Decimal::from(known.len()) * Decimal::ONE_HUNDRED
            };
            TrendReading {
                flag,
                label: flag.label(),
                pct,
                sentiment: Sentiment::from_trend_pct(pct),
            }
        })
        .collect()
}

pub fn performance_overview(
    records: &RecordMap,
    benchmark: &str,
    volatility: Option<&str>,
) -> PerformanceOverview {
    let averages = AVERAGED_HORIZONS
        .iter()
        .map(|&horizon| {
            let average = mean(records.values(), horizon);
            ReturnReading {
                horizon,
                average,
                sentiment: Sentiment::from_return(average),
            }
        })
        .collect();

    PerformanceOverview {
        averages,
        benchmark_off_high: records
            .get(benchmark)
            .map(|r| r.pct_from_52w_high.abs())
            .unwrap_or_default(),
        volatility_price: volatility
            .and_then(|symbol| records.get(symbol))
            .map(|r| r.price)
            .unwrap_or_default(),
    }
}

fn mean<'a>(records: impl Iterator<Item = &'a MetricRecord>, horizon: ReturnHorizon) -> Decimal {
    let (sum, count) = records.fold((Decimal::ZERO, 0u32), |(sum, count), r| {
        (sum + r.trailing(horizon), count + 1)
    });
    if count == 0 {
        return Decimal::ZERO;
    }
    sum / Decimal::from(count)
}
