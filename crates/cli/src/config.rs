//! Application configuration loaded from environment variables.

use std::path::PathBuf;

use document_store::StoreConfig;

/// Default tracing filter. Receipts go to stdout, so logging stays quiet
/// unless asked for.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// CLI configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `APP_ENVIRONMENT`: selects the database file (default: `"development"`)
/// - `BANK_DATA_DIR`: directory holding the database file (default: `"data"`)
/// - `RUST_LOG`: tracing filter directive (default: `"warn"`)
/// - `DEBUG`: `"true"` logs every command with its options
#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub data_dir: PathBuf,
    pub log_level: String,
    pub debug: bool,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let store = StoreConfig::from_env();
        Self {
            environment: store.environment,
            data_dir: store.data_dir,
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string()),
            debug: std::env::var("DEBUG").is_ok_and(|v| v == "true"),
        }
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.data_dir.clone(), self.environment.clone())
    }

    /// Filter directive for the tracing subscriber. `DEBUG` wins over
    /// `RUST_LOG`.
    pub fn filter_directive(&self) -> &str {
        if self.debug { "debug" } else { &self.log_level }
    }
}

impl Default for Config {
    fn default() -> Self {
        let store = StoreConfig::default();
        Self {
            environment: store.environment,
            data_dir: store.data_dir,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            debug: false,
        }
    }
}
