//! State engine for quire interactive notebooks.
//!
//! A notebook is an ordered sequence of typed cells. The UI shell sends
//! [`Action`]s to a [`Kernel`], which answers with a new [`Notebook`] value:
//!
//! ```text
//! Action ──► Kernel::dispatch ─┬─► notebook::apply          (structural actions)
//!                              │
//!                              └─► evaluation dispatcher    (EvaluateCell)
//!                                      │
//!                                      ├── ExecutionContext (script cells)
//!                                      ├── MarkdownRenderer (markdown cells)
//!                                      ├── DependencyLoader (dependency cells)
//!                                      └── BindingTracker   (user variables)
//! ```
//!
//! This crate provides:
//! - The notebook data model and action protocol
//! - A pure reducer for structural actions
//! - Per-cell-type evaluation with an append-only history and execution counter
//! - A shared Rhai execution context with binding tracking

pub mod bindings;
pub mod clock;
pub mod config;
pub mod context;
pub mod error;
mod evaluate;
pub mod history;
pub mod kernel;
pub mod loader;
pub mod notebook;
pub mod render;

pub use bindings::BindingTracker;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{Language, Languages, NotebookConfig};
pub use context::{
    Bindings, EvaluationError, EvaluationErrorKind, ExecutionContext, RhaiContext, ScriptValue,
};
pub use error::{Error, Result};
pub use evaluate::Collaborators;
pub use history::{ExecutionCounter, History, HistoryEntry};
pub use kernel::{Dispatch, Kernel};
pub use loader::{
    DependencyLoader, ExternalDependencyResult, FileLoader, LoadError, LoadStatus, StaticLoader,
};
pub use notebook::{
    Action, Cell, CellId, CellType, CellValue, Direction, Effect, EvalStatus, Mode, Notebook,
    Outcome, RowOverflow, RowSettings, Transition, ViewMode, apply,
};
pub use render::{CmarkRenderer, MarkdownRenderer};
