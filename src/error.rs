// ⚠️ Errors - fallible edges only
// The tip pipeline itself is total; these cover config and locale selection.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TipTimeError {
    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Failed to read config file {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {source}")]
    ConfigParse {
        #[from]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, TipTimeError>;
