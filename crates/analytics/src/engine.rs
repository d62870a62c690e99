use crate::error::AnalyticsError;
use crate::math::{pct_change, pct_from_high, round_pct, sma, trailing_return};
use crate::record::MetricRecord;
use chrono::{Datelike, NaiveDate};
use core_types::{PriceSeries, ReturnHorizon, TrendState};
use rust_decimal::Decimal;

/// Bars in the trailing 52-week window.
pub const FIFTY_TWO_WEEK_BARS: usize = 252;

/// A stateless calculator deriving a `MetricRecord` from one price series.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricEngine {}

impl MetricEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for deriving an instrument's metrics.
    ///
    /// # Arguments
    ///
    /// * `series` - The instrument's history, oldest bar first.
    /// * `as_of` - The reporting date. Its calendar year anchors the YTD return.
    ///
    /// # Returns
    ///
    /// The `MetricRecord`, or `AnalyticsError::EmptySeries` when there is nothing to
    /// compute from. Short histories never fail; they yield `None` averages instead.
    pub fn calculate(
        &self,
        series: &PriceSeries,
        as_of: NaiveDate,
    ) -> Result<MetricRecord, AnalyticsError> {
        let latest = series
            .latest()
            .ok_or_else(|| AnalyticsError::EmptySeries(series.symbol().to_string()))?;

        let closes = series.adjusted_closes();
        let current = latest.adjusted_close;

        let sma10 = sma(&closes, 10);
        let sma20 = sma(&closes, 20);
        let sma50 = sma(&closes, 50);
        let sma200 = sma(&closes, 200);

        let above_50_and_200 = match (sma50, sma200) {
            (Some(fast), Some(slow)) => TrendState::compare(fast, Some(slow)),
            _ => TrendState::Unknown,
        };

        let record = MetricRecord {
            symbol: series.symbol().to_string(),
            as_of: latest.date,
            price: round_pct(current),
            change_1d: trailing_for(&closes, ReturnHorizon::Day1),
            ytd: self.ytd_return(series, current, as_of.year()),
            week1: trailing_for(&closes, ReturnHorizon::Week1),
            month1: trailing_for(&closes, ReturnHorizon::Month1),
            year1: trailing_for(&closes, ReturnHorizon::Year1),
            pct_from_52w_high: pct_from_high(&closes, FIFTY_TWO_WEEK_BARS),
            sma10,
            sma20,
            sma50,
            sma200,
            above_sma10: TrendState::compare(current, sma10),
            above_sma20: TrendState::compare(current, sma20),
            above_sma50: TrendState::compare(current, sma50),
            above_sma200: TrendState::compare(current, sma200),
            above_50_and_200,
        };

        tracing::debug!(
            symbol = %record.symbol,
            bars = series.len(),
            price = %record.price,
            ytd = %record.ytd,
            "Computed metric record"
        );

        Ok(record)
    }

    /// Year-to-date return anchored on the last close before January 1 of `year`.
    ///
    /// The series' first bar is the base when nothing precedes the first bar of the
    /// year, or when no bar falls in `year` at all.
    fn ytd_return(&self, series: &PriceSeries, current: Decimal, year: i32) -> Decimal {
        let bars = series.bars();
        let base = match bars.iter().position(|b| b.date.year() >= year) {
            Some(i) if i > 0 => bars[i - 1].adjusted_close,
            _ => bars[0].adjusted_close,
        };
        round_pct(pct_change(current, base))
    }
}

fn trailing_for(closes: &[Decimal], horizon: ReturnHorizon) -> Decimal {
    horizon
        .trading_days()
        .map(|days| trailing_return(closes, days))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use core_types::PriceBar;
    use rust_decimal_macros::dec;

    fn series_from(symbol: &str, start: NaiveDate, closes: &[Decimal]) -> PriceSeries {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: start + Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                adjusted_close: close,
                volume: dec!(1000),
            })
            .collect();
        PriceSeries::new(symbol, bars).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_empty_series_is_refused() {
        let series = PriceSeries::new("SPY", vec![]).unwrap();
        let result = MetricEngine::new().calculate(&series, date("2024-06-01"));
        assert_eq!(result, Err(AnalyticsError::EmptySeries("SPY".to_string())));
    }

    #[test]
    fn test_five_bar_series() {
        let closes = [dec!(100), dec!(102), dec!(101), dec!(105), dec!(110)];
        let series = series_from("QQQ", date("2024-03-01"), &closes);
        let record = MetricEngine::new().calculate(&series, date("2024-03-05")).unwrap();

        assert_eq!(record.price, dec!(110));
        assert_eq!(record.change_1d, dec!(4.76));
        assert_eq!(record.week1, Decimal::ZERO);
        assert_eq!(record.month1, Decimal::ZERO);
        assert_eq!(record.year1, Decimal::ZERO);
        assert_eq!(record.sma10, None);
        assert_eq!(record.above_sma10, TrendState::Unknown);
        assert_eq!(record.above_50_and_200, TrendState::Unknown);
        assert_eq!(record.pct_from_52w_high, Decimal::ZERO);
        assert_eq!(record.as_of, date("2024-03-05"));
    }

    #[test]
    fn test_flat_series_is_never_above() {
        let closes = vec![dec!(50.00); 300];
        let series = series_from("TLT", date("2023-01-01"), &closes);
        let record = MetricEngine::new().calculate(&series, date("2023-10-27")).unwrap();

        for average in [record.sma10, record.sma20, record.sma50, record.sma200] {
            assert_eq!(average, Some(dec!(50.00)));
        }
        assert_eq!(record.above_sma10, TrendState::Below);
        assert_eq!(record.above_sma20, TrendState::Below);
        assert_eq!(record.above_sma50, TrendState::Below);
        assert_eq!(record.above_sma200, TrendState::Below);
        assert_eq!(record.above_50_and_200, TrendState::Below);
        assert_eq!(record.pct_from_52w_high, Decimal::ZERO);
    }

    #[test]
    fn test_sma_nullability_tracks_history_length() {
        let engine = MetricEngine::new();
        for len in [1usize, 9, 10, 19, 20, 49, 50, 199, 200] {
            let closes: Vec<Decimal> = (1..=len).map(Decimal::from).collect();
            let series = series_from("IWM", date("2023-01-01"), &closes);
            let record = engine.calculate(&series, date("2024-01-01")).unwrap();

            for (period, average, flag) in [
                (10, record.sma10, record.above_sma10),
                (20, record.sma20, record.above_sma20),
                (50, record.sma50, record.above_sma50),
                (200, record.sma200, record.above_sma200),
            ] {
                assert_eq!(average.is_none(), len < period, "len {len} period {period}");
                assert_eq!(flag.is_known(), average.is_some());
            }
        }
    }

    #[test]
    fn test_rising_series_sets_golden_cross() {
        let closes: Vec<Decimal> = (1..=260).map(Decimal::from).collect();
        let series = series_from("SPY", date("2023-01-01"), &closes);
        let record = MetricEngine::new().calculate(&series, date("2023-09-17")).unwrap();

        assert_eq!(record.above_sma200, TrendState::Above);
        assert_eq!(record.above_50_and_200, TrendState::Above);
        // 260 vs 255 five bars back.
        assert_eq!(record.week1, dec!(1.96));
        // 260 vs 8 two hundred fifty-two bars back.
        assert_eq!(record.year1, dec!(3150.00));
    }

    #[test]
    fn test_ytd_base_is_last_bar_before_new_year() {
        // Dec 29, 30, 31 then Jan 1, 2 of 2024.
        let closes = [dec!(90), dec!(95), dec!(100), dec!(104), dec!(110)];
        let series = series_from("EWJ", date("2023-12-29"), &closes);
        let record = MetricEngine::new().calculate(&series, date("2024-01-02")).unwrap();
        assert_eq!(record.ytd, dec!(10.00));
    }

    #[test]
    fn test_ytd_falls_back_to_first_bar_when_series_starts_in_year() {
        let closes = [dec!(80), dec!(100)];
        let series = series_from("IBIT", date("2024-01-11"), &closes);
        let record = MetricEngine::new().calculate(&series, date("2024-01-12")).unwrap();
        assert_eq!(record.ytd, dec!(25.00));
    }

    #[test]
    fn test_ytd_uses_first_bar_when_no_bar_in_year() {
        let closes = [dec!(80), dec!(90), dec!(100)];
        let series = series_from("VGK", date("2023-12-27"), &closes);
        let record = MetricEngine::new().calculate(&series, date("2024-01-01")).unwrap();
        assert_eq!(record.ytd, dec!(25.00));
    }

    #[test]
    fn test_record_serializes_with_report_field_names() {
        let closes = [dec!(10), dec!(11)];
        let series = series_from("GLD", date("2024-05-01"), &closes);
        let record = MetricEngine::new().calculate(&series, date("2024-05-02")).unwrap();
        let json = serde_json::to_value(&record).unwrap();

        assert!(json.get("change1D").is_some());
        assert!(json.get("pctFrom52wHigh").is_some());
        assert_eq!(json["aboveSMA10"], serde_json::Value::Null);
        assert_eq!(json["sma200"], serde_json::Value::Null);
    }
}
