use chrono::NaiveDate;
use core_types::ReturnHorizon;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::ConfigError;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub universe: UniverseConfig,
}

/// Connection settings for the end-of-day price provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub base_url: String,
    /// Usually left empty in the file and supplied through `TIINGO_API_KEY`.
    #[serde(default)]
    pub api_key: String,
    pub timeout_secs: u64,
}

/// Parameters for one computation cycle.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Maximum number of in-flight fetch + compute tasks.
    pub batch_size: usize,
    /// Calendar days of history requested per symbol.
    pub lookback_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is not set.
    pub level: String,
    /// When set, logs are additionally written to a daily rolling file in this directory.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

/// Every symbol group the aggregator works on. None of these tables are compiled in;
/// they come from `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UniverseConfig {
    /// Display sections of the report (e.g. "Market", "Sectors", "Developed Markets").
    #[serde(default)]
    pub sections: Vec<SectionConfig>,
    #[serde(default)]
    pub breadth: BreadthConfig,
    #[serde(default)]
    pub exposure: ExposureConfig,
    #[serde(default)]
    pub relative_strength: RelativeStrengthConfig,
    #[serde(default)]
    pub rotation: RotationConfig,
    #[serde(default)]
    pub correlation: CorrelationConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub overview: OverviewConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SectionConfig {
    pub title: String,
    pub tickers: Vec<LabeledTicker>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LabeledTicker {
    pub ticker: String,
    pub label: String,
}

/// A ticker tagged with the region it stands for.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RegionTicker {
    pub ticker: String,
    pub label: String,
    pub region: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BreadthConfig {
    /// Symbols included in breadth ratios. Empty means every computed record.
    #[serde(default)]
    pub universe: Vec<String>,
    /// Instruments within this distance (in percent) of their 52-week high count as "near".
    pub near_high_pct: Decimal,
    /// Instruments further than this distance count as "far".
    pub far_from_high_pct: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExposureConfig {
    /// Contributes one point per trend flag.
    pub benchmark: String,
    /// Each contributes half a point for its 50 and 200 SMA flags.
    #[serde(default)]
    pub companions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelativeStrengthConfig {
    #[serde(default)]
    pub weights: StrengthWeights,
    #[serde(default)]
    pub members: Vec<RegionTicker>,
}

/// Weights of the composite momentum score. Must sum to 1.0.
#[derive(Debug, Clone, Deserialize)]
pub struct StrengthWeights {
    pub ytd: Decimal,
    pub month1: Decimal,
    pub week1: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RotationConfig {
    #[serde(default)]
    pub sectors: Vec<LabeledTicker>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorrelationConfig {
    #[serde(default)]
    pub members: Vec<LabeledTicker>,
    /// The matrix is only produced when at least this many members have records.
    pub min_instruments: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RiskConfig {
    /// Growth-sensitive instruments read through their 50/200 SMA alignment.
    #[serde(default)]
    pub risk_assets: Vec<LabeledTicker>,
    /// Instruments whose rising price signals risk-off.
    #[serde(default)]
    pub safe_havens: Vec<SafeHavenConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SafeHavenConfig {
    pub ticker: String,
    pub label: String,
    /// Horizons that must all agree on a direction before a signal is emitted.
    pub horizons: Vec<ReturnHorizon>,
    /// Treat a flat reading as rising, so the signal is never neutral.
    #[serde(default)]
    pub flat_is_rising: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverviewConfig {
    /// Instrument whose latest price is reported as the volatility gauge.
    #[serde(default)]
    pub volatility: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    pub past_days: i64,
    pub future_days: i64,
    #[serde(default)]
    pub events: Vec<MacroEventConfig>,
    /// Region proxies whose recent performance is shown next to the calendar.
    #[serde(default)]
    pub performance_windows: Vec<RegionTicker>,
}

/// An event recurring every year on the same month and day.
#[derive(Debug, Clone, Deserialize)]
pub struct MacroEventConfig {
    pub month: u32,
    pub day: u32,
    pub name: String,
    pub region: String,
    pub impact: Impact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

// --- Default Implementations ---
// These allow a user to omit whole sections from their toml.

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.tiingo.com".to_string(),
            api_key: String::new(),
            timeout_secs: 30,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            lookback_days: 400,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "marketscope.log".to_string(),
        }
    }
}

impl Default for BreadthConfig {
    fn default() -> Self {
        Self {
            universe: Vec::new(),
            near_high_pct: dec!(5),
            far_from_high_pct: dec!(20),
        }
    }
}

impl Default for ExposureConfig {
    fn default() -> Self {
        Self {
            benchmark: "SPY".to_string(),
            companions: vec!["QQQ".to_string(), "IWM".to_string()],
        }
    }
}

impl Default for RelativeStrengthConfig {
    fn default() -> Self {
        Self {
            weights: StrengthWeights::default(),
            members: Vec::new(),
        }
    }
}

impl Default for StrengthWeights {
    fn default() -> Self {
        Self {
            ytd: dec!(0.4),
            month1: dec!(0.35),
            week1: dec!(0.25),
        }
    }
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            members: Vec::new(),
            min_instruments: 3,
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            past_days: 7,
            future_days: 30,
            events: Vec::new(),
            performance_windows: Vec::new(),
        }
    }
}

impl Config {
    /// Checks the invariants the rest of the system relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.batch_size == 0 {
            return Err(ConfigError::ValidationError(
                "scan.batch_size must be greater than zero".to_string(),
            ));
        }
        // 252 trading days of returns plus a 200-bar average need roughly 300 calendar days.
        if self.scan.lookback_days < 300 {
            return Err(ConfigError::ValidationError(format!(
                "scan.lookback_days must be at least 300, got {}",
                self.scan.lookback_days
            )));
        }
        self.universe.validate()
    }
}

impl UniverseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.relative_strength.weights;
        if w.ytd + w.month1 + w.week1 != Decimal::ONE {
            return Err(ConfigError::ValidationError(format!(
                "relative_strength.weights must sum to 1.0, got {}",
                w.ytd + w.month1 + w.week1
            )));
        }

        if self.exposure.benchmark.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "exposure.benchmark must not be empty".to_string(),
            ));
        }

        let risk_symbols = self
            .risk
            .risk_assets
            .iter()
            .map(|t| t.ticker.as_str())
            .chain(self.risk.safe_havens.iter().map(|s| s.ticker.as_str()));
        for ticker in risk_symbols {
            if ticker.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "risk signal tickers must not be empty".to_string(),
                ));
            }
        }

        for haven in &self.risk.safe_havens {
            if haven.horizons.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "safe haven {} needs at least one horizon",
                    haven.ticker
                )));
            }
        }

        if self.calendar.past_days < 0 || self.calendar.future_days < 0 {
            return Err(ConfigError::ValidationError(
                "calendar window bounds must be non-negative".to_string(),
            ));
        }

        for event in &self.calendar.events {
            // 2024 is a leap year, so Feb 29 is accepted here and skipped in other years.
            if NaiveDate::from_ymd_opt(2024, event.month, event.day).is_none() {
                return Err(ConfigError::ValidationError(format!(
                    "calendar event '{}' has an invalid date {:02}-{:02}",
                    event.name, event.month, event.day
                )));
            }
        }

        Ok(())
    }

    /// Every symbol referenced anywhere in the universe, in first-seen order.
    pub fn all_symbols(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut symbols = Vec::new();

        let candidates = self
            .sections
            .iter()
            .flat_map(|s| s.tickers.iter().map(|t| t.ticker.as_str()))
            .chain(self.breadth.universe.iter().map(String::as_str))
            .chain(std::iter::once(self.exposure.benchmark.as_str()))
            .chain(self.exposure.companions.iter().map(String::as_str))
            .chain(self.relative_strength.members.iter().map(|t| t.ticker.as_str()))
            .chain(self.rotation.sectors.iter().map(|t| t.ticker.as_str()))
            .chain(self.correlation.members.iter().map(|t| t.ticker.as_str()))
            .chain(self.risk.risk_assets.iter().map(|t| t.ticker.as_str()))
            .chain(self.risk.safe_havens.iter().map(|s| s.ticker.as_str()))
            .chain(self.overview.volatility.iter().map(String::as_str))
            .chain(self.calendar.performance_windows.iter().map(|t| t.ticker.as_str()));

        for symbol in candidates {
            if !symbol.is_empty() && seen.insert(symbol.to_string()) {
                symbols.push(symbol.to_string());
            }
        }
        symbols
    }
}
