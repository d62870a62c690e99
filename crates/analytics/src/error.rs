use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("No price history available for {0}")]
    EmptySeries(String),
}
