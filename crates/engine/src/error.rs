use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Price source error: {0}")]
    PriceSource(#[from] api_client::error::ApiError),

    #[error("Metric calculation error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),

    #[error("Invalid progress bar template: {0}")]
    ProgressBarTemplate(String),

    #[error("None of the {requested} requested symbols produced a metric record")]
    NoRecords { requested: usize },
}
