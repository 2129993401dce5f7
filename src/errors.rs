//! Error handling module
//!
//! Library-level errors for loading documents and configuration and for
//! resolving selection targets.

use std::path::PathBuf;

use dom_snapshot::DomError;
use thiserror::Error;
use xpath_locator::LocatorError;

#[derive(Debug, Error)]
pub enum PickerError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no configuration directory available on this platform")]
    NoConfigDir,

    #[error(transparent)]
    Document(#[from] DomError),

    #[error(transparent)]
    Locator(#[from] LocatorError),

    #[error("target '{xpath}' must match exactly one element, matched {count}")]
    AmbiguousTarget { xpath: String, count: usize },

    #[error("target '{xpath}' does not select an element")]
    NotAnElement { xpath: String },

    #[error("failed to serialize output: {0}")]
    Serialize(String),
}

impl PickerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for PickerError {
    fn from(err: serde_json::Error) -> Self {
        PickerError::Serialize(err.to_string())
    }
}

pub type PickerResult<T> = Result<T, PickerError>;
