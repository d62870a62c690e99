use crate::error::ApiError;
use async_trait::async_trait;
use chrono::NaiveDate;
use configuration::ProviderConfig;
use core_types::{PriceBar, PriceSeries};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use std::time::Duration;

pub mod error;
pub mod responses;
// --- Public API ---
pub use responses::{EodPrice, ErrorResponse};

/// The abstract source of daily price history.
///
/// The engine only depends on this contract, so the live provider can be swapped for an
/// in-memory implementation in tests.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetches daily bars for `symbol` between `start` and `end` (inclusive), oldest first.
    ///
    /// An unknown symbol is an error; a known symbol with no bars in range returns an
    /// empty series.
    async fn fetch_series(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ApiError>;
}

/// A concrete `PriceSource` backed by the Tiingo end-of-day API.
#[derive(Clone)]
pub struct TiingoClient {
    client: reqwest::Client,
    base_url: String,
}

impl TiingoClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ApiError> {
        if config.api_key.trim().is_empty() {
            return Err(ApiError::MissingApiKey);
        }

        let mut headers = HeaderMap::new();
        let token = HeaderValue::from_str(&format!("Token {}", config.api_key.trim()))
            .map_err(|e| ApiError::InvalidData(format!("Invalid API key: {}", e)))?;
        headers.insert(AUTHORIZATION, token);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn prices_url(&self, symbol: &str) -> String {
        format!("{}/tiingo/daily/{}/prices", self.base_url, symbol)
    }
}

#[async_trait]
impl PriceSource for TiingoClient {
    async fn fetch_series(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PriceSeries, ApiError> {
        let response = self
            .client
            .get(self.prices_url(symbol))
            .query(&[
                ("startDate", start.format("%Y-%m-%d").to_string()),
                ("endDate", end.format("%Y-%m-%d").to_string()),
            ])
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|body| body.detail)
                .unwrap_or(text);
            return Err(ApiError::Status {
                symbol: symbol.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let rows: Vec<EodPrice> =
            serde_json::from_str(&text).map_err(|e| ApiError::Deserialization(e.to_string()))?;
        let bars = rows
            .into_iter()
            .map(EodPrice::into_bar)
            .collect::<Result<Vec<PriceBar>, ApiError>>()?;

        tracing::debug!(symbol, bars = bars.len(), "Fetched daily bars");
        Ok(PriceSeries::new(symbol, bars)?)
    }
}
