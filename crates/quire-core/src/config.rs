//! Notebook configuration.
//!
//! Configuration is read once when a kernel is created. It is plain JSON:
//!
//! ```json
//! {
//!   "ignored_bindings": ["scratch"],
//!   "prelude": { "TAU": 6.283185 },
//!   "dependency_root": "./vendor",
//!   "comment_marker": "//"
//! }
//! ```
//!
//! Every field is optional.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Editor metadata for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Human-readable name.
    pub display_name: String,
    /// Syntax mode the editor component should load.
    pub editor_mode: String,
    /// Extension used when exporting cell content.
    pub file_extension: String,
}

impl Language {
    fn new(display_name: &str, editor_mode: &str, file_extension: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            editor_mode: editor_mode.to_string(),
            file_extension: file_extension.to_string(),
        }
    }
}

/// Language id -> editor metadata.
pub type Languages = BTreeMap<String, Language>;

/// Languages known to every notebook, keyed by cell type name.
pub fn default_languages() -> Languages {
    [
        ("script", Language::new("Rhai", "rust", "rhai")),
        ("markdown", Language::new("Markdown", "markdown", "md")),
        ("stylesheet", Language::new("CSS", "css", "css")),
        ("dependencies", Language::new("Dependencies", "text", "txt")),
    ]
    .into_iter()
    .map(|(id, lang)| (id.to_string(), lang))
    .collect()
}

fn default_comment_marker() -> String {
    "//".to_string()
}

/// Settings for a notebook kernel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotebookConfig {
    /// Names the binding tracker never reports, in addition to whatever is
    /// already bound when the kernel starts.
    pub ignored_bindings: Vec<String>,

    /// Constants installed in the shared execution context before the
    /// baseline is captured.
    pub prelude: BTreeMap<String, serde_json::Value>,

    /// Directory dependency specifiers are resolved against.
    /// Defaults to the current directory.
    pub dependency_root: Option<PathBuf>,

    /// Lines of a dependency cell starting with this marker are skipped.
    #[serde(default = "default_comment_marker")]
    pub comment_marker: String,

    /// Extra or overriding language metadata, merged over the defaults.
    pub languages: Languages,
}

impl Default for NotebookConfig {
    fn default() -> Self {
        Self {
            ignored_bindings: Vec::new(),
            prelude: BTreeMap::new(),
            dependency_root: None,
            comment_marker: default_comment_marker(),
            languages: Languages::new(),
        }
    }
}

impl NotebookConfig {
    /// Parse a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a configuration file.
    ///
    /// A relative `dependency_root` is resolved against the file's directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut config = Self::from_json_str(&json)?;
        if let Some(dir) = path.parent() {
            config.dependency_root = config
                .dependency_root
                .take()
                .map(|root| if root.is_relative() { dir.join(root) } else { root });
        }

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Default languages with the configured ones merged over them.
    pub fn languages(&self) -> Languages {
        let mut languages = default_languages();
        languages.extend(self.languages.clone());
        languages
    }

    /// Root for dependency specifiers.
    pub fn dependency_root(&self) -> PathBuf {
        self.dependency_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn validate(&self) -> Result<()> {
        if self.comment_marker.trim().is_empty() {
            return Err(Error::Config("comment_marker must not be empty".to_string()));
        }
        if let Some(name) = self.ignored_bindings.iter().find(|n| n.trim().is_empty()) {
            return Err(Error::Config(format!(
                "ignored_bindings contains an empty name: {:?}",
                name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = NotebookConfig::from_json_str("{}").unwrap();
        assert_eq!(config.comment_marker, "//");
        assert!(config.prelude.is_empty());
        assert_eq!(config.dependency_root(), PathBuf::from("."));
        assert!(config.languages().contains_key("script"));
    }

    #[test]
    fn test_languages_merge_over_defaults() {
        let config = NotebookConfig::from_json_str(
            r#"{"languages": {"script": {"display_name": "Script", "editor_mode": "rhai", "file_extension": "rhai"}}}"#,
        )
        .unwrap();
        let languages = config.languages();
        assert_eq!(languages["script"].editor_mode, "rhai");
        assert_eq!(languages["markdown"].editor_mode, "markdown");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = NotebookConfig::from_json_str(r#"{"bogus": 1}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_empty_comment_marker_rejected() {
        let err = NotebookConfig::from_json_str(r#"{"comment_marker": " "}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_from_file_resolves_relative_root() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quire.json");
        fs::write(&path, r#"{"dependency_root": "libs"}"#).unwrap();

        let config = NotebookConfig::from_file(&path).unwrap();
        assert_eq!(config.dependency_root(), dir.path().join("libs"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = NotebookConfig::from_file("/nonexistent/quire.json").unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
        assert!(err.with_hint().contains("hint"));
    }
}
