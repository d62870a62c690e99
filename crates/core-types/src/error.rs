use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Bars for {symbol} are not strictly increasing: {previous} is followed by {next}")]
    UnorderedBars {
        symbol: String,
        previous: NaiveDate,
        next: NaiveDate,
    },
}
