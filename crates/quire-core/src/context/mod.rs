//! The shared execution context scripts run in.
//!
//! Every script cell in a notebook runs against one context. Nothing isolates
//! cells from each other: a cell may read or overwrite anything an earlier
//! evaluation bound, and evaluations happen strictly in dispatch order.

mod rhai_context;

use std::fmt;

use serde::Serialize;

pub use rhai_context::RhaiContext;

/// Value produced by, or bound in, the execution context.
pub type ScriptValue = rhai::Dynamic;

/// Snapshot of every binding visible in a context, by name.
pub type Bindings = std::collections::BTreeMap<String, ScriptValue>;

/// Whether a script failed before or while running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationErrorKind {
    /// The source did not parse.
    Syntax,
    /// The script raised an error while running.
    Runtime,
}

/// Failure of a script evaluation.
///
/// Stored as the cell's value; never surfaced as an `Err` from dispatch.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationError {
    pub kind: EvaluationErrorKind,
    pub message: String,
    /// Value passed to `throw`, if the script threw one.
    pub thrown: Option<ScriptValue>,
    /// 1-indexed line of the failure, when known.
    pub line: Option<usize>,
    /// 1-indexed column of the failure, when known.
    pub column: Option<usize>,
}

impl EvaluationError {
    pub fn syntax(message: impl Into<String>) -> Self {
        Self {
            kind: EvaluationErrorKind::Syntax,
            message: message.into(),
            thrown: None,
            line: None,
            column: None,
        }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self {
            kind: EvaluationErrorKind::Runtime,
            message: message.into(),
            thrown: None,
            line: None,
            column: None,
        }
    }

    pub fn at(mut self, line: Option<usize>, column: Option<usize>) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    pub fn with_thrown(mut self, value: ScriptValue) -> Self {
        self.thrown = Some(value);
        self
    }
}

impl fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            EvaluationErrorKind::Syntax => "syntax error",
            EvaluationErrorKind::Runtime => "runtime error",
        };
        write!(f, "{}: {}", kind, self.message)?;
        if let Some(line) = self.line {
            write!(f, " (line {}", line)?;
            if let Some(column) = self.column {
                write!(f, ", column {}", column)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl std::error::Error for EvaluationError {}

/// A scope that script source can be executed in.
pub trait ExecutionContext: Send {
    /// Run `source`, returning the value of its final expression.
    ///
    /// Bindings created by the source stay visible to later calls.
    fn execute(&mut self, source: &str) -> Result<ScriptValue, EvaluationError>;

    /// Snapshot of every binding currently visible, script functions
    /// included.
    fn bindings(&self) -> Bindings;
}
