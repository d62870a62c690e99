//! Cross-sectional views over a full map of metric records.
//!
//! Every view is a pure function of the record map and the static universe
//! configuration. The `Analyzer` folds them into one `AggregateView` per cycle.

use analytics::{MetricRecord, RecordMap};
use chrono::NaiveDate;
use configuration::UniverseConfig;
use serde::Serialize;

pub mod breadth;
pub mod calendar;
pub mod correlation;
pub mod exposure;
pub mod overview;
pub mod risk;
pub mod rotation;
pub mod strength;

#[cfg(test)]
mod fixtures;

pub use breadth::{BreadthGauge, BreadthRatio, BreadthReport};
pub use calendar::{MacroEvent, PerformanceWindow};
pub use correlation::CorrelationMatrix;
pub use exposure::{ExposureBand, ExposureScore};
pub use overview::{PerformanceOverview, Sentiment, TrendReading};
pub use risk::{RiskMonitor, RiskRegime, RiskSignal, SignalState};
pub use rotation::{Quadrant, RotationPoint};
pub use strength::StrengthEntry;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionRow {
    pub ticker: String,
    pub label: String,
    /// `None` when the instrument could not be computed this cycle.
    pub record: Option<MetricRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    pub title: String,
    pub rows: Vec<SectionRow>,
}

/// Everything a report consumer renders for one reporting date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateView {
    pub as_of: NaiveDate,
    /// Number of instruments with a record this cycle.
    pub instruments: usize,
    pub sections: Vec<SectionView>,
    pub breadth: BreadthReport,
    pub trend_overview: Vec<TrendReading>,
    pub performance_overview: PerformanceOverview,
    pub exposure: ExposureScore,
    pub relative_strength: Vec<StrengthEntry>,
    pub rotation: Vec<RotationPoint>,
    pub correlation: Option<CorrelationMatrix>,
    pub risk: RiskMonitor,
    pub calendar: Vec<MacroEvent>,
    pub performance_windows: Vec<PerformanceWindow>,
}

/// The aggregation engine.
pub struct Analyzer {
    config: UniverseConfig,
}

impl Analyzer {
    pub fn new(config: UniverseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &UniverseConfig {
        &self.config
    }

    /// Builds every aggregate view from a complete record map.
    pub fn run(&self, records: &RecordMap, as_of: NaiveDate) -> AggregateView {
        let config = &self.config;
        let breadth_universe = self.breadth_universe(records);

        tracing::debug!(
            instruments = records.len(),
            breadth_universe = breadth_universe.len(),
            %as_of,
            "Aggregating metric records"
        );

        AggregateView {
            as_of,
            instruments: records.len(),
            sections: self.sections(records),
            breadth: breadth::compute(&breadth_universe, &config.breadth),
            trend_overview: overview::trend_overview(records),
            performance_overview: overview::performance_overview(
                records,
                &config.exposure.benchmark,
                config.overview.volatility.as_deref(),
            ),
            exposure: exposure::compute(records, &config.exposure),
            relative_strength: strength::rank(records, &config.relative_strength),
            rotation: rotation::compute(records, &config.rotation),
            correlation: correlation::compute(records, &config.correlation),
            risk: risk::compute(records, &config.risk),
            calendar: calendar::upcoming(&config.calendar, as_of),
            performance_windows: calendar::performance_windows(records, &config.calendar),
        }
    }

    /// The configured breadth universe, or every record when none is configured.
    fn breadth_universe<'a>(&self, records: &'a RecordMap) -> Vec<&'a MetricRecord> {
        let universe = &self.config.breadth.universe;
        if universe.is_empty() {
            return records.values().collect();
        }
        let mut seen = std::collections::HashSet::new();
        universe
            .iter()
            .filter(|symbol| seen.insert(symbol.as_str()))
            .filter_map(|symbol| records.get(symbol))
            .collect()
    }

    fn sections(&self, records: &RecordMap) -> Vec<SectionView> {
        self.config
            .sections
            .iter()
            .map(|section| SectionView {
                title: section.title.clone(),
                rows: section
                    .tickers
                    .iter()
                    .map(|t| SectionRow {
                        ticker: t.ticker.clone(),
                        label: t.label.clone(),
                        record: records.get(&t.ticker).cloned(),
                    })
                    .collect(),
            })
            .collect()
    }
}
