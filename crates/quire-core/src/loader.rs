//! Loading of external dependencies named by dependency cells.

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Whether a dependency resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Ok,
    Error,
}

/// Result of loading one dependency specifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalDependencyResult {
    /// The specifier as written in the cell.
    pub src: String,
    pub status: LoadStatus,
}

impl ExternalDependencyResult {
    pub fn ok(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            status: LoadStatus::Ok,
        }
    }

    pub fn error(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            status: LoadStatus::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == LoadStatus::Error
    }
}

/// Why a dependency's source could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("{0} is not a file")]
    NotAFile(PathBuf),

    #[error("unknown dependency '{0}'")]
    Unknown(String),
}

/// Fetches the source of dependency specifiers.
///
/// The evaluation dispatcher runs whatever source comes back in the shared
/// execution context, so definitions in a dependency become visible to every
/// script cell evaluated afterwards.
pub trait DependencyLoader: Send {
    fn load(&self, specifier: &str) -> Result<String, LoadError>;
}

/// Resolves specifiers as file paths under a root directory.
#[derive(Debug, Clone)]
pub struct FileLoader {
    root: PathBuf,
}

impl FileLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, specifier: &str) -> PathBuf {
        let path = Path::new(specifier);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl DependencyLoader for FileLoader {
    fn load(&self, specifier: &str) -> Result<String, LoadError> {
        let path = self.resolve(specifier);
        if path.is_dir() {
            return Err(LoadError::NotAFile(path));
        }

        let source = fs::read_to_string(&path).map_err(|e| LoadError::Read {
            path: path.clone(),
            message: e.to_string(),
        })?;
        tracing::debug!("Read dependency {} from {}", specifier, path.display());
        Ok(source)
    }
}

/// Answers from a fixed table; unknown specifiers fail.
#[derive(Debug, Clone, Default)]
pub struct StaticLoader {
    /// `None` marks a specifier that fails to load.
    table: FxHashMap<String, Option<String>>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a specifier with the status loading it should report. An `Ok`
    /// specifier has empty source.
    pub fn with(mut self, specifier: impl Into<String>, status: LoadStatus) -> Self {
        let source = match status {
            LoadStatus::Ok => Some(String::new()),
            LoadStatus::Error => None,
        };
        self.table.insert(specifier.into(), source);
        self
    }

    /// Register a specifier that loads the given source.
    pub fn with_source(mut self, specifier: impl Into<String>, source: impl Into<String>) -> Self {
        self.table.insert(specifier.into(), Some(source.into()));
        self
    }
}

impl DependencyLoader for StaticLoader {
    fn load(&self, specifier: &str) -> Result<String, LoadError> {
        self.table
            .get(specifier)
            .cloned()
            .flatten()
            .ok_or_else(|| LoadError::Unknown(specifier.to_string()))
    }
}
