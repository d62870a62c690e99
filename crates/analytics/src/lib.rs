//! # Marketscope Metric Engine
//!
//! Turns one instrument's end-of-day history into a fixed-shape `MetricRecord`:
//! trailing returns, distance from the 52-week high, simple moving averages and
//! the trend flags derived from them.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no knowledge of where prices come from. Depends only on `core-types`.
//! - **Graceful degradation:** a short history produces `None` averages and `Unknown`
//!   flags, never an error. Only an empty series is refused.
//! - **Stateless:** the `MetricEngine` can be shared freely across concurrent tasks.

pub mod engine;
pub mod error;
pub mod math;
pub mod record;

pub use engine::MetricEngine;
pub use error::AnalyticsError;
pub use record::{MetricRecord, RecordMap, TrendFlag};
