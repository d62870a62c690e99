use analytics::{MetricRecord, RecordMap};
use chrono::NaiveDate;
use core_types::TrendState;
use rust_decimal::Decimal;

/// A record with flat returns and no trend history.
pub fn record(symbol: &str) -> MetricRecord {
    MetricRecord {
        symbol: symbol.to_string(),
        as_of: NaiveDate::from_ymd_opt(2024, 6, 14).unwrap(),
        price: Decimal::ONE_HUNDRED,
        change_1d: Decimal::ZERO,
        ytd: Decimal::ZERO,
        week1: Decimal::ZERO,
        month1: Decimal::ZERO,
        year1: Decimal::ZERO,
        pct_from_52w_high: Decimal::ZERO,
        sma10: None,
        sma20: None,
        sma50: None,
        sma200: None,
        above_sma10: TrendState::Unknown,
        above_sma20: TrendState::Unknown,
        above_sma50: TrendState::Unknown,
        above_sma200: TrendState::Unknown,
        above_50_and_200: TrendState::Unknown,
    }
}

pub fn map_of(records: Vec<MetricRecord>) -> RecordMap {
    records.into_iter().map(|r| (r.symbol.clone(), r)).collect()
}
