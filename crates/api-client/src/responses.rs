use crate::error::ApiError;
use chrono::NaiveDate;
use core_types::PriceBar;
use rust_decimal::Decimal;
use serde::Deserialize;

// Using `#[serde(rename_all = "camelCase")]` to map the provider's camelCase fields.

/// One row of `GET /tiingo/daily/{ticker}/prices`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EodPrice {
    /// ISO timestamp at midnight UTC, e.g. `2024-06-14T00:00:00.000Z`.
    pub date: String,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    #[serde(default)]
    pub volume: Decimal,
    /// Missing for a handful of thinly traded funds; the raw close is used instead.
    #[serde(default)]
    pub adj_close: Option<Decimal>,
    #[serde(default)]
    pub div_cash: Decimal,
    #[serde(default)]
    pub split_factor: Option<Decimal>,
}

impl EodPrice {
    pub fn into_bar(self) -> Result<PriceBar, ApiError> {
        let day = self.date.get(..10).unwrap_or(&self.date);
        let date = NaiveDate::parse_from_str(day, "%Y-%m-%d")
            .map_err(|e| ApiError::InvalidData(format!("Invalid bar date '{}': {}", self.date, e)))?;

        Ok(PriceBar {
            date,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            adjusted_close: self.adj_close.unwrap_or(self.close),
            volume: self.volume,
        })
    }
}

/// The provider's error body, e.g. `{"detail": "Error: Ticker 'XYZ' not found"}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const BODY: &str = r#"[
        {"date":"2024-06-13T00:00:00.000Z","close":542.78,"high":543.35,"low":539.59,"open":543.1,
         "volume":44760900,"adjClose":536.65,"adjHigh":537.21,"adjLow":533.49,"adjOpen":536.96,
         "adjVolume":44760900,"divCash":0.0,"splitFactor":1.0},
        {"date":"2024-06-14T00:00:00.000Z","close":542.66,"high":542.81,"low":539.85,"open":540.88,
         "volume":40089900,"adjClose":null,"divCash":0.0,"splitFactor":1.0}
    ]"#;

    #[test]
    fn test_parse_eod_rows() {
        let rows: Vec<EodPrice> = serde_json::from_str(BODY).unwrap();
        let bars: Vec<PriceBar> = rows
            .into_iter()
            .map(EodPrice::into_bar)
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 6, 13).unwrap());
        assert_eq!(bars[0].adjusted_close, dec!(536.65));
        assert_eq!(bars[0].close, dec!(542.78));
        assert_eq!(bars[1].adjusted_close, dec!(542.66));
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        let row = EodPrice {
            date: "14/06/2024".to_string(),
            open: dec!(1),
            high: dec!(1),
            low: dec!(1),
            close: dec!(1),
            volume: dec!(0),
            adj_close: None,
            div_cash: dec!(0),
            split_factor: None,
        };
        assert!(matches!(row.into_bar(), Err(ApiError::InvalidData(_))));
    }

    #[test]
    fn test_parse_error_body() {
        let body: ErrorResponse =
            serde_json::from_str(r#"{"detail":"Error: Ticker 'NOPE' not found"}"#).unwrap();
        assert!(body.detail.contains("NOPE"));
    }
}
