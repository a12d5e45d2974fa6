//! Settings type definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default location of the PassWall UCI file on OpenWrt
pub const DEFAULT_CONFIG_PATH: &str = "/etc/config/passwall";

/// Default tracing filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Root settings for uciwall
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Path of the UCI configuration file to edit
    #[serde(default = "default_config_path")]
    pub config_path: PathBuf,

    /// Tracing filter directive
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config_path: default_config_path(),
            log_filter: default_log_filter(),
        }
    }
}

fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_PATH)
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}
