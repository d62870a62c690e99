use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_logging;
pub use settings::{
    BreadthConfig, CalendarConfig, Config, CorrelationConfig, ExposureConfig, Impact,
    LabeledTicker, LoggingConfig, MacroEventConfig, OverviewConfig, ProviderConfig, RegionTicker,
    RelativeStrengthConfig, RiskConfig, RotationConfig, SafeHavenConfig, ScanConfig,
    SectionConfig, StrengthWeights, UniverseConfig,
};

/// Environment variable holding the price provider's API token.
pub const API_KEY_ENV: &str = "TIINGO_API_KEY";

/// Loads the application configuration from a TOML file plus `MARKETSCOPE__*` overrides.
///
/// A missing file is not an error; every section has defaults. The provider key is taken
/// from `TIINGO_API_KEY` (a `.env` file is honoured) when the file leaves it empty.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();

    let builder = config::Config::builder()
        .add_source(config::File::from(path.as_ref()).required(false))
        // e.g. MARKETSCOPE__SCAN__BATCH_SIZE=5
        .add_source(config::Environment::with_prefix("MARKETSCOPE").separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let mut config = builder.try_deserialize::<Config>()?;

    if config.provider.api_key.is_empty() {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            config.provider.api_key = key;
        }
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn test_load_config_reads_toml_tables() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[scan]
batch_size = 4
lookback_days = 420

[universe.exposure]
benchmark = "VOO"
companions = ["QQQ"]

[universe.relative_strength.weights]
ytd = 0.5
month1 = 0.3
week1 = 0.2

[[universe.rotation.sectors]]
ticker = "XLK"
label = "Tech"

[[universe.risk.safe_havens]]
ticker = "GLD"
label = "Gold"
horizons = ["week1", "month1"]
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.scan.batch_size, 4);
        assert_eq!(config.scan.lookback_days, 420);
        assert_eq!(config.universe.exposure.benchmark, "VOO");
        assert_eq!(config.universe.relative_strength.weights.ytd, dec!(0.5));
        assert_eq!(config.universe.rotation.sectors[0].label, "Tech");
        assert_eq!(config.universe.risk.safe_havens[0].horizons.len(), 2);
        assert!(!config.universe.risk.safe_havens[0].flat_is_rising);
        // Untouched sections fall back to defaults.
        assert_eq!(config.universe.correlation.min_instruments, 3);
        assert_eq!(config.universe.calendar.future_days, 30);
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[scan]\nbatch_size = 0\nlookback_days = 400").unwrap();

        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }
}
