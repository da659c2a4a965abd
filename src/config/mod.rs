pub mod analyzer;
pub mod builder;
pub mod kaspa;
pub mod log;

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

pub use analyzer::AnalyzerConfig;
pub use analyzer::CentralityConfig;
pub use analyzer::CyclingConfig;
pub use analyzer::ExchangeHeuristicConfig;
pub use analyzer::LayeringConfig;
pub use analyzer::SmurfingConfig;
pub use analyzer::SuddenActivityConfig;
pub use builder::GraphBuilderConfig;
pub use kaspa::KaspaApiConfig;
pub use log::LoggingConfig;

use crate::error::ConfigError;

pub const KASPA_API_URL_ENV: &str = "KASPA_API_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub kaspa_api: KaspaApiConfig,
    pub graph_builder: GraphBuilderConfig,
    pub analyzer: AnalyzerConfig,
    pub logging: LoggingConfig,
    /// Known exchange addresses, address -> exchange name
    pub exchanges: BTreeMap<String, String>,
}

impl Config {
    pub fn from_toml(config_str: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.graph_builder.max_concurrent_requests == 0 {
            return Err(ConfigError::InvalidValue(
                "graph_builder.max_concurrent_requests must be at least 1".to_string(),
            ));
        }
        if let Some(min_amount) = self.graph_builder.min_amount {
            if min_amount < 0.0 {
                return Err(ConfigError::InvalidValue(format!(
                    "graph_builder.min_amount must not be negative, got {}",
                    min_amount
                )));
            }
        }
        Ok(())
    }

    /// Environment overrides, applied after the file is parsed
    pub fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var(KASPA_API_URL_ENV) {
            if !base_url.is_empty() {
                self.kaspa_api.base_url = base_url;
            }
        }
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let config_str = std::fs::read_to_string(path).map_err(|source| ConfigError::OpenFileError {
        path: path.display().to_string(),
        source,
    })?;
    let mut config = Config::from_toml(&config_str)?;
    config.apply_env_overrides();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.graph_builder, GraphBuilderConfig::default());
        assert_eq!(config.analyzer, AnalyzerConfig::default());
        assert_eq!(config.kaspa_api.base_url, "https://api.kaspa.org");
        assert!(config.exchanges.is_empty());
    }

    #[test]
    fn test_partial_sections_override_fields() {
        let config = Config::from_toml(
            r#"
            [graph_builder]
            depth = 4
            min_amount = 1.5

            [analyzer.smurfing]
            max_time_gap = 600

            [exchanges]
            "kaspa:qexchange" = "Exchange"
            "#,
        )
        .unwrap();

        assert_eq!(config.graph_builder.depth, 4);
        assert_eq!(config.graph_builder.max_nodes, 1000);
        assert_eq!(config.graph_builder.min_amount, Some(1.5));
        assert_eq!(config.analyzer.smurfing.max_time_gap, 600);
        assert_eq!(config.analyzer.smurfing.max_amount_cv, 0.3);
        assert_eq!(config.exchanges.get("kaspa:qexchange").map(String::as_str), Some("Exchange"));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            Config::from_toml("[graph_builder]\nmax_concurrent_requests = 0"),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(Config::from_toml("[graph_builder]\ndepth = \"two\""), Err(ConfigError::ParseError(_))));
    }

    #[test]
    #[serial]
    fn test_env_overrides_base_url() {
        temp_env::with_var(KASPA_API_URL_ENV, Some("http://localhost:8080"), || {
            let mut config = Config::from_toml("").unwrap();
            config.apply_env_overrides();
            assert_eq!(config.kaspa_api.base_url, "http://localhost:8080");
        });

        temp_env::with_var(KASPA_API_URL_ENV, Some(""), || {
            let mut config = Config::from_toml("").unwrap();
            config.apply_env_overrides();
            assert_eq!(config.kaspa_api.base_url, "https://api.kaspa.org");
        });
    }
}
