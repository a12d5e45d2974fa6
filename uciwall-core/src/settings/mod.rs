//! Tool settings
//!
//! Where the PassWall configuration lives and how loud the logs are.

mod loader;
mod types;

pub use loader::{SettingsLoader, ENV_CONFIG_PATH, ENV_LOG_FILTER};
pub use types::{Settings, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
