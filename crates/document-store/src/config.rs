//! Store location configuration.

use std::path::PathBuf;

/// Environment used when `APP_ENVIRONMENT` is not set.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Data directory used when `BANK_DATA_DIR` is not set.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Where the store keeps its data file.
///
/// Each deployment environment gets its own file, `db_<environment>.json`,
/// inside the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub environment: String,
}

impl StoreConfig {
    /// Creates a configuration for the given directory and environment.
    pub fn new(data_dir: impl Into<PathBuf>, environment: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            environment: environment.into(),
        }
    }

    /// Loads configuration from environment variables, falling back to defaults.
    ///
    /// - `APP_ENVIRONMENT` (default: `"development"`)
    /// - `BANK_DATA_DIR` (default: `"data"`)
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("BANK_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR)),
            environment: std::env::var("APP_ENVIRONMENT")
                .unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string()),
        }
    }

    /// Returns the data file name for the configured environment.
    pub fn database_filename(&self) -> String {
        format!("db_{}.json", self.environment)
    }

    /// Returns the full path of the data file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(self.database_filename())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR, DEFAULT_ENVIRONMENT)
    }
}
