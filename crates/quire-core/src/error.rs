//! Error types for quire-core.
//!
//! Only the kernel's setup path can fail. Once a kernel exists, every action is
//! accepted: script failures and dependency load failures are recorded on the
//! cells they belong to rather than returned as errors.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for quire-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in quire-core.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file could not be read.
    #[error("failed to read config {path}: {message}")]
    ConfigRead { path: PathBuf, message: String },

    /// Configuration is malformed or inconsistent.
    #[error("invalid config: {0}")]
    Config(String),

    /// A prelude constant could not be converted into a script value.
    #[error("invalid prelude binding '{name}': {message}")]
    Prelude { name: String, message: String },

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Get a recovery hint for the error, if one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ConfigRead { .. } => Some("check the --config path"),
            Self::Prelude { .. } => {
                Some("prelude values must be plain JSON scalars, arrays or objects")
            }
            _ => None,
        }
    }

    /// Format the error together with its recovery hint.
    pub fn with_hint(&self) -> String {
        match self.hint() {
            Some(hint) => format!("{} (hint: {})", self, hint),
            None => self.to_string(),
        }
    }
}
