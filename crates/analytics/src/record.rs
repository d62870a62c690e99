use chrono::NaiveDate;
use core_types::{ReturnHorizon, TrendState};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One instrument's derived snapshot.
///
/// This struct is the hand-off artifact between the metric engine, the cross-sectional
/// analyzer and any renderer. Field names on the wire follow the report's JSON schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRecord {
    pub symbol: String,
    /// Date of the latest bar the record was computed from.
    pub as_of: NaiveDate,
    /// Latest adjusted close, rounded to cents.
    pub price: Decimal,

    // I. Trailing returns (percent, 2 dp)
    #[serde(rename = "change1D")]
    pub change_1d: Decimal,
    pub ytd: Decimal,
    pub week1: Decimal,
    pub month1: Decimal,
    pub year1: Decimal,
    #[serde(rename = "pctFrom52wHigh")]
    pub pct_from_52w_high: Decimal,

    // II. Moving averages, None when the history is shorter than the period
    pub sma10: Option<Decimal>,
    pub sma20: Option<Decimal>,
    pub sma50: Option<Decimal>,
    pub sma200: Option<Decimal>,

    // III. Trend flags
    #[serde(rename = "aboveSMA10")]
    pub above_sma10: TrendState,
    #[serde(rename = "aboveSMA20")]
    pub above_sma20: TrendState,
    #[serde(rename = "aboveSMA50")]
    pub above_sma50: TrendState,
    #[serde(rename = "aboveSMA200")]
    pub above_sma200: TrendState,
    /// 50-period average above the 200-period average (golden cross).
    #[serde(rename = "above50and200")]
    pub above_50_and_200: TrendState,
}

/// The five boolean trend signals carried by every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendFlag {
    Sma10,
    Sma20,
    Sma50,
    Sma200,
    GoldenCross,
}

impl TrendFlag {
    pub const ALL: [TrendFlag; 5] = [
        TrendFlag::Sma10,
        TrendFlag::Sma20,
        TrendFlag::Sma50,
        TrendFlag::Sma200,
        TrendFlag::GoldenCross,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TrendFlag::Sma10 => "Above 10 SMA",
            TrendFlag::Sma20 => "Above 20 SMA",
            TrendFlag::Sma50 => "Above 50 SMA",
            TrendFlag::Sma200 => "Above 200 SMA",
            TrendFlag::GoldenCross => "50 > 200 SMA",
        }
    }
}

impl MetricRecord {
    pub fn trend(&self, flag: TrendFlag) -> TrendState {
        match flag {
            TrendFlag::Sma10 => self.above_sma10,
            TrendFlag::Sma20 => self.above_sma20,
            TrendFlag::Sma50 => self.above_sma50,
            TrendFlag::Sma200 => self.above_sma200,
            TrendFlag::GoldenCross => self.above_50_and_200,
        }
    }

    pub fn trailing(&self, horizon: ReturnHorizon) -> Decimal {
        match horizon {
            ReturnHorizon::Day1 => self.change_1d,
            ReturnHorizon::Week1 => self.week1,
            ReturnHorizon::Month1 => self.month1,
            ReturnHorizon::Year1 => self.year1,
            ReturnHorizon::Ytd => self.ytd,
        }
    }
}

/// The read-only hand-off from the metric engine to the analyzer, keyed by symbol.
pub type RecordMap = std::collections::BTreeMap<String, MetricRecord>;
