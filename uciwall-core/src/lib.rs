//! uciwall core library
//!
//! This crate wires the UCI codec to where the configuration is stored:
//! settings, the store abstraction, the read-modify-write manager and error
//! handling.

pub mod error;
pub mod manager;
pub mod settings;
pub mod store;

pub use error::{Error, Result, StoreError};
pub use manager::ConfigManager;
pub use settings::{Settings, SettingsLoader};
pub use store::{ConfigStore, FileStore, MemoryStore};

/// uciwall version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
