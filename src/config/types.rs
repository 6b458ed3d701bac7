//! Configuration types

use serde::{Deserialize, Serialize};

use crate::filter::FilterParams;
use crate::payout::PoolSize;
use crate::rows::{GeneratorOptions, MAX_ROWS};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Row generation settings
    #[serde(default)]
    pub sampling: SamplingConfig,
    /// Pool size; payout fields are only computed when present
    #[serde(default)]
    pub pool: Option<PoolSize>,
    /// Filter chain parameters
    #[serde(default)]
    pub filters: FilterParams,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// Row generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Row spaces larger than this are sampled
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
    /// Fixed seed for reproducible samples
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            max_rows: default_max_rows(),
            seed: None,
        }
    }
}

impl From<&SamplingConfig> for GeneratorOptions {
    fn from(config: &SamplingConfig) -> Self {
        GeneratorOptions {
            max_rows: config.max_rows,
            seed: config.seed,
        }
    }
}

fn default_max_rows() -> usize {
    MAX_ROWS
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
