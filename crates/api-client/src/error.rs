use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to send the HTTP request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The price API returned {status} for {symbol}: {message}")]
    Status {
        symbol: String,
        status: u16,
        message: String,
    },

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("Invalid data format from API: {0}")]
    InvalidData(String),

    #[error("Price data rejected: {0}")]
    Core(#[from] CoreError),

    #[error("No API key configured; set provider.api_key or TIINGO_API_KEY")]
    MissingApiKey,
}
