//! Cell types for the notebook model.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::context::{EvaluationError, ScriptValue};
use crate::loader::ExternalDependencyResult;

use super::state::ViewMode;

/// Unique identifier for a cell within a notebook.
///
/// Ids are handed out by the notebook's generator and are never reused, even
/// after the cell holding one is deleted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CellId(pub(crate) u64);

impl CellId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell_{}", self.0)
    }
}

/// Kind of a cell, which selects its evaluation protocol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CellType {
    /// Script executed in the shared execution context.
    Script,
    /// Markdown rendered to HTML.
    Markdown,
    /// Newline-separated list of external dependency specifiers.
    Dependencies,
    /// Raw stylesheet passed through untouched.
    Stylesheet,
    /// Any type the engine does not know how to evaluate.
    Other(String),
}

impl CellType {
    /// Canonical wire name of this type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Script => "script",
            Self::Markdown => "markdown",
            Self::Dependencies => "dependencies",
            Self::Stylesheet => "stylesheet",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for CellType {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "script" | "rhai" | "javascript" | "code" => Self::Script,
            "markdown" | "md" => Self::Markdown,
            "dependencies" | "external dependencies" | "external_dependencies" => {
                Self::Dependencies
            }
            "stylesheet" | "css" => Self::Stylesheet,
            _ => Self::Other(name.to_string()),
        }
    }
}

impl From<String> for CellType {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<CellType> for String {
    fn from(cell_type: CellType) -> Self {
        cell_type.as_str().to_string()
    }
}

impl FromStr for CellType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the last evaluation of a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvalStatus {
    /// Never evaluated, or the protocol does not report a status.
    #[default]
    None,
    Success,
    Error,
}

/// How a row of a cell is laid out in a given view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOverflow {
    Visible,
    Scroll,
    Hidden,
}

/// Row type of the editable source.
pub const INPUT_ROW: &str = "input";
/// Row type of the rendered result.
pub const OUTPUT_ROW: &str = "output";

/// Presentation metadata: row type -> view mode -> overflow.
///
/// The engine stores and resets these but never interprets them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowSettings(BTreeMap<String, BTreeMap<ViewMode, RowOverflow>>);

impl RowSettings {
    /// Default settings for a freshly created cell of the given type.
    pub fn defaults_for(cell_type: &CellType) -> Self {
        use RowOverflow::{Hidden, Visible};

        let (input, output) = match cell_type {
            CellType::Script | CellType::Markdown => ((Visible, Hidden), (Visible, Visible)),
            CellType::Dependencies => ((Visible, Hidden), (Visible, Hidden)),
            CellType::Stylesheet => ((Visible, Hidden), (Hidden, Hidden)),
            CellType::Other(_) => ((Visible, Visible), (Visible, Visible)),
        };

        let mut settings = Self::default();
        for (row, (editor, presentation)) in [(INPUT_ROW, input), (OUTPUT_ROW, output)] {
            settings.set(row, ViewMode::Editor, editor);
            settings.set(row, ViewMode::Presentation, presentation);
        }
        settings
    }

    /// Overflow for a row in a view, if one has been set.
    pub fn get(&self, row_type: &str, view_mode: ViewMode) -> Option<RowOverflow> {
        self.0.get(row_type)?.get(&view_mode).copied()
    }

    pub fn set(&mut self, row_type: &str, view_mode: ViewMode, overflow: RowOverflow) {
        self.0
            .entry(row_type.to_string())
            .or_default()
            .insert(view_mode, overflow);
    }
}

/// Last computed output of a cell. The variant depends on the cell type.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum CellValue {
    /// Result of a successful script evaluation.
    Script(ScriptValue),
    /// Failure captured from a script evaluation.
    Error(EvaluationError),
    /// Rendered markdown.
    Html(String),
    /// Every dependency record this cell has loaded so far.
    Dependencies(Vec<ExternalDependencyResult>),
    /// Raw text passed through unchanged.
    Text(String),
}

impl CellValue {
    pub fn as_script(&self) -> Option<&ScriptValue> {
        match self {
            Self::Script(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&EvaluationError> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }

    pub fn as_html(&self) -> Option<&str> {
        match self {
            Self::Html(html) => Some(html),
            _ => None,
        }
    }

    pub fn as_dependencies(&self) -> Option<&[ExternalDependencyResult]> {
        match self {
            Self::Dependencies(records) => Some(records),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// A single typed, editable unit of notebook content.
#[derive(Debug, Clone, Serialize)]
pub struct Cell {
    pub id: CellId,
    pub cell_type: CellType,
    /// Raw editable source.
    pub content: String,
    pub value: Option<CellValue>,
    /// Whether `value` reflects the current `content`.
    pub rendered: bool,
    pub eval_status: EvalStatus,
    /// Execution number stamped by the last counted evaluation.
    pub execution_status: Option<String>,
    pub selected: bool,
    pub row_settings: RowSettings,
    pub element_type: Option<String>,
    pub dom_element_id: Option<String>,
}

impl Cell {
    /// Create an empty, unselected cell of the given type.
    pub fn new(id: CellId, cell_type: CellType) -> Self {
        let row_settings = RowSettings::defaults_for(&cell_type);
        Self {
            id,
            cell_type,
            content: String::new(),
            value: None,
            rendered: false,
            eval_status: EvalStatus::None,
            execution_status: None,
            selected: false,
            row_settings,
            element_type: None,
            dom_element_id: None,
        }
    }
}
