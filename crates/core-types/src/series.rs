use crate::error::CoreError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One trading day of one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    /// Dividend and split adjusted close. All return and average math runs on this field.
    pub adjusted_close: Decimal,
    pub volume: Decimal,
}

/// An ordered, read-only price history for one symbol, oldest bar first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Builds a series, rejecting any pair of bars whose dates are not strictly increasing.
    pub fn new(symbol: impl Into<String>, bars: Vec<PriceBar>) -> Result<Self, CoreError> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "symbol".to_string(),
                "symbol must not be empty".to_string(),
            ));
        }

        if let Some(pair) = bars.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(CoreError::UnorderedBars {
                symbol,
                previous: pair[0].date,
                next: pair[1].date,
            });
        }

        Ok(Self { symbol, bars })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn latest(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// The adjusted closes in chronological order.
    pub fn adjusted_closes(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.adjusted_close).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn bar(date: &str, close: Decimal) -> PriceBar {
        PriceBar {
            date: date.parse().unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            adjusted_close: close,
            volume: dec!(1000),
        }
    }

    #[test]
    fn test_new_accepts_increasing_dates() {
        let series = PriceSeries::new(
            "SPY",
            vec![bar("2024-01-02", dec!(100)), bar("2024-01-03", dec!(101))],
        )
        .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.latest().unwrap().adjusted_close, dec!(101));
        assert_eq!(series.adjusted_closes(), vec![dec!(100), dec!(101)]);
    }

    #[test]
    fn test_new_rejects_duplicate_dates() {
        let result = PriceSeries::new(
            "SPY",
            vec![bar("2024-01-02", dec!(100)), bar("2024-01-02", dec!(101))],
        );
        assert!(matches!(result, Err(CoreError::UnorderedBars { .. })));
    }

    #[test]
    fn test_new_rejects_descending_dates() {
        let result = PriceSeries::new(
            "SPY",
            vec![bar("2024-01-03", dec!(100)), bar("2024-01-02", dec!(101))],
        );
        assert!(matches!(result, Err(CoreError::UnorderedBars { .. })));
    }

    #[test]
    fn test_new_rejects_blank_symbol() {
        let result = PriceSeries::new("  ", vec![]);
        assert!(matches!(result, Err(CoreError::InvalidInput(_, _))));
    }

    #[test]
    fn test_empty_series_is_representable() {
        let series = PriceSeries::new("SPY", vec![]).unwrap();
        assert!(series.is_empty());
        assert!(series.latest().is_none());
    }
}
