use crate::error::EngineError;
use analytics::{MetricEngine, MetricRecord, RecordMap};
use analyzer::{AggregateView, Analyzer};
use api_client::PriceSource;
use chrono::{Duration, NaiveDate};
use configuration::{ScanConfig, UniverseConfig};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

pub mod error;

/// The output of one reporting cycle: the per-symbol records and the views built on them.
#[derive(Debug, Clone, Serialize)]
pub struct MarketSnapshot {
    pub records: RecordMap,
    pub view: AggregateView,
}

/// The central orchestrator: fetches history, derives metrics and aggregates them.
pub struct Engine {
    source: Arc<dyn PriceSource>,
    metrics: MetricEngine,
    analyzer: Analyzer,
    scan: ScanConfig,
    progress_style: Option<ProgressStyle>,
}

impl Engine {
    pub fn new(source: Arc<dyn PriceSource>, scan: ScanConfig, universe: UniverseConfig) -> Self {
        Self {
            source,
            metrics: MetricEngine::new(),
            analyzer: Analyzer::new(universe),
            scan,
            progress_style: None,
        }
    }

    /// Shows a terminal progress bar while symbols are being computed.
    pub fn with_progress_bar(mut self) -> Result<Self, EngineError> {
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map_err(|e| EngineError::ProgressBarTemplate(e.to_string()))?
            .progress_chars("=>-");
        self.progress_style = Some(style);
        Ok(self)
    }

    /// First calendar day of history requested for a cycle ending on `as_of`.
    pub fn lookback_start(&self, as_of: NaiveDate) -> NaiveDate {
        as_of - Duration::days(self.scan.lookback_days)
    }

    /// Fetches and computes a single symbol, surfacing any failure.
    pub async fn metrics_for(
        &self,
        symbol: &str,
        as_of: NaiveDate,
    ) -> Result<MetricRecord, EngineError> {
        let series = self
            .source
            .fetch_series(symbol, self.lookback_start(as_of), as_of)
            .await?;
        Ok(self.metrics.calculate(&series, as_of)?)
    }

    /// Computes a record for every distinct symbol, at most `batch_size` at a time.
    ///
    /// A symbol whose fetch or calculation fails is logged and left out of the map;
    /// it never aborts the rest of the batch.
    pub async fn compute(&self, symbols: &[String], as_of: NaiveDate) -> RecordMap {
        let mut seen = HashSet::new();
        let unique: Vec<&str> = symbols
            .iter()
            .map(String::as_str)
            .filter(|symbol| seen.insert(*symbol))
            .collect();

        let progress_bar = match &self.progress_style {
            Some(style) => ProgressBar::new(unique.len() as u64).with_style(style.clone()),
            None => ProgressBar::hidden(),
        };
        let bar = &progress_bar;

        let records: RecordMap = stream::iter(unique)
            .map(|symbol| async move {
                let result = self.metrics_for(symbol, as_of).await;
                bar.inc(1);
                match result {
                    Ok(record) => Some((symbol.to_string(), record)),
                    Err(e) => {
                        warn!(symbol, error = %e, "Skipping symbol");
                        None
                    }
                }
            })
            .buffer_unordered(self.scan.batch_size.max(1))
            .filter_map(|entry| async { entry })
            .collect()
            .await;

        progress_bar.finish_and_clear();
        records
    }

    /// Runs one full cycle over every symbol named in the universe configuration.
    pub async fn run_cycle(&self, as_of: NaiveDate) -> Result<MarketSnapshot, EngineError> {
        let symbols = self.analyzer.config().all_symbols();
        info!(symbols = symbols.len(), %as_of, "Starting market cycle");

        let records = self.compute(&symbols, as_of).await;
        if records.is_empty() && !symbols.is_empty() {
            return Err(EngineError::NoRecords {
                requested: symbols.len(),
            });
        }

        let view = self.analyzer.run(&records, as_of);
        info!(
            computed = records.len(),
            skipped = symbols.len() - records.len(),
            regime = view.risk.regime.label(),
            "Market cycle complete"
        );
        Ok(MarketSnapshot { records, view })
    }
}
