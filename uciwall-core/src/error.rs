//! Error types for uciwall

use std::path::PathBuf;
use thiserror::Error;
use uciwall_config::{ConfigError, DocumentError, ParseError, SectionError};

/// Result type for uciwall operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the store that holds the configuration text.
///
/// Kept apart from codec errors: a store failure says nothing about the
/// content of the configuration.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading the configuration failed
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the configuration failed
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Main error type for uciwall
#[derive(Error, Debug)]
pub enum Error {
    /// Store (transport) error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration content error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Settings error
    #[error("Settings error: {0}")]
    Settings(String),
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Error::Config(e.into())
    }
}

impl From<DocumentError> for Error {
    fn from(e: DocumentError) -> Self {
        Error::Config(e.into())
    }
}

impl From<SectionError> for Error {
    fn from(e: SectionError) -> Self {
        Error::Config(e.into())
    }
}
