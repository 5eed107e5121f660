//! The notebook state aggregate.

use std::collections::BTreeMap;
use std::sync::Arc;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::config::Languages;
use crate::context::ScriptValue;
use crate::history::{ExecutionCounter, History};

use super::cell::{Cell, CellId, CellType};

/// Current input mode of the notebook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Edit,
    #[default]
    Command,
}

/// Which surface the notebook is shown on.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Editor,
    Presentation,
}

/// Names newly bound in the shared execution context, with their values.
pub type Variables = BTreeMap<String, ScriptValue>;

/// Root state of a notebook.
///
/// A `Notebook` is a value: transitions build a new one and never touch a cell
/// that an older snapshot can still see. Cells sit behind [`Arc`] so that a
/// transition copies only the cells it changes.
#[derive(Debug, Clone, Serialize)]
pub struct Notebook {
    pub(crate) cells: Vec<Arc<Cell>>,
    pub(crate) mode: Mode,
    pub(crate) view_mode: ViewMode,
    pub(crate) execution_number: ExecutionCounter,
    pub(crate) history: History,
    pub(crate) external_dependencies: IndexSet<String>,
    pub(crate) user_defined_variables: Variables,
    pub(crate) languages: Arc<Languages>,
    /// Next id the generator hands out.
    #[serde(skip)]
    pub(crate) next_cell_id: u64,
}

impl Notebook {
    /// Create a notebook without any cells.
    pub fn new(languages: Arc<Languages>) -> Self {
        Self {
            cells: Vec::new(),
            mode: Mode::default(),
            view_mode: ViewMode::default(),
            execution_number: ExecutionCounter::new(),
            history: History::new(),
            external_dependencies: IndexSet::new(),
            user_defined_variables: Variables::new(),
            languages,
            next_cell_id: 0,
        }
    }

    /// Create a notebook holding a single selected script cell.
    pub fn with_initial_cell(languages: Arc<Languages>) -> Self {
        let mut notebook = Self::new(languages);
        let mut cell = Cell::new(notebook.generate_id(), CellType::Script);
        cell.selected = true;
        notebook.cells.push(Arc::new(cell));
        notebook
    }

    pub fn cells(&self) -> &[Arc<Cell>] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.iter().find(|c| c.id == id).map(Arc::as_ref)
    }

    pub fn index_of(&self, id: CellId) -> Option<usize> {
        self.cells.iter().position(|c| c.id == id)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.cells.iter().position(|c| c.selected)
    }

    pub fn selected_id(&self) -> Option<CellId> {
        self.selected_cell().map(|c| c.id)
    }

    pub fn selected_cell(&self) -> Option<&Cell> {
        self.cells.iter().find(|c| c.selected).map(Arc::as_ref)
    }

    /// Cell ids in display order.
    pub fn cell_ids(&self) -> Vec<CellId> {
        self.cells.iter().map(|c| c.id).collect()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn execution_number(&self) -> u64 {
        self.execution_number.get()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Registered dependency specifiers, in registration order.
    pub fn external_dependencies(&self) -> &IndexSet<String> {
        &self.external_dependencies
    }

    pub fn user_defined_variables(&self) -> &Variables {
        &self.user_defined_variables
    }

    pub fn languages(&self) -> &Languages {
        &self.languages
    }

    /// Hand out a fresh id, never equal to any id seen so far.
    pub(crate) fn generate_id(&mut self) -> CellId {
        let floor = self
            .cells
            .iter()
            .map(|c| c.id.0 + 1)
            .max()
            .unwrap_or(0);
        let id = self.next_cell_id.max(floor);
        self.next_cell_id = id + 1;
        CellId(id)
    }

    /// Mutable access to the cell at `index`, copying it first if an older
    /// snapshot still shares it.
    pub(crate) fn cell_mut(&mut self, index: usize) -> &mut Cell {
        Arc::make_mut(&mut self.cells[index])
    }
}
