//! Actions accepted by the notebook engine.
//!
//! Actions are the engine's wire protocol: the UI shell sends one JSON object
//! per action, tagged by `type`. Names are snake_case; the PascalCase type
//! names and camelCase fields of the editor component are accepted too.

use serde::{Deserialize, Serialize};

use super::cell::{CellId, CellType, RowOverflow};
use super::state::{Mode, ViewMode};

/// Where a new cell goes relative to the selected cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Above,
    Below,
}

/// A request to change the notebook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Insert a new script cell next to the selected cell.
    #[serde(alias = "InsertCell")]
    InsertCell { direction: Direction },

    /// Append a new cell of the given type.
    #[serde(alias = "AddCell")]
    AddCell {
        #[serde(alias = "cellType")]
        cell_type: CellType,
    },

    /// Select exactly the cell with this id (or none if it does not exist).
    #[serde(alias = "SelectCell")]
    SelectCell {
        id: CellId,
        #[serde(default, alias = "scrollToCell")]
        scroll_to_cell: bool,
    },

    /// Swap the selected cell with the one above it.
    #[serde(alias = "MoveCellUp")]
    MoveCellUp,

    /// Swap the selected cell with the one below it.
    #[serde(alias = "MoveCellDown")]
    MoveCellDown,

    /// Replace the selected cell's source.
    #[serde(alias = "UpdateInputContent")]
    UpdateInputContent { content: String },

    #[serde(alias = "ChangeElementType")]
    ChangeElementType {
        #[serde(alias = "elementType")]
        element_type: String,
    },

    #[serde(alias = "ChangeDomElementId")]
    ChangeDomElementId {
        #[serde(alias = "elemID")]
        elem_id: String,
    },

    /// Change the selected cell's type, dropping its value.
    #[serde(alias = "ChangeCellType")]
    ChangeCellType {
        #[serde(alias = "cellType")]
        cell_type: CellType,
    },

    /// Set row presentation for a cell (the selected one by default).
    #[serde(alias = "SetCellRowCollapseState")]
    SetCellRowCollapseState {
        #[serde(default, skip_serializing_if = "Option::is_none", alias = "cellId")]
        cell_id: Option<CellId>,
        #[serde(alias = "rowType")]
        row_type: String,
        #[serde(alias = "viewMode")]
        view_mode: ViewMode,
        #[serde(alias = "rowOverflow")]
        row_overflow: RowOverflow,
    },

    /// Force the selected cell to re-render.
    #[serde(alias = "MarkCellNotRendered")]
    MarkCellNotRendered,

    /// Evaluate a cell (the selected one by default).
    #[serde(alias = "EvaluateCell")]
    EvaluateCell {
        #[serde(default, skip_serializing_if = "Option::is_none", alias = "cellId")]
        cell_id: Option<CellId>,
    },

    /// Delete the selected cell.
    #[serde(alias = "DeleteCell")]
    DeleteCell,

    #[serde(alias = "ChangeMode")]
    ChangeMode { mode: Mode },

    #[serde(alias = "ChangeViewMode")]
    ChangeViewMode {
        #[serde(alias = "viewMode")]
        view_mode: ViewMode,
    },

    /// Any action type the engine does not recognise.
    #[serde(other)]
    Unknown,
}

impl Action {
    pub fn select(id: CellId) -> Self {
        Self::SelectCell {
            id,
            scroll_to_cell: false,
        }
    }

    pub fn update_content(content: impl Into<String>) -> Self {
        Self::UpdateInputContent {
            content: content.into(),
        }
    }

    /// Evaluate the selected cell.
    pub fn evaluate() -> Self {
        Self::EvaluateCell { cell_id: None }
    }

    pub fn evaluate_cell(cell_id: CellId) -> Self {
        Self::EvaluateCell {
            cell_id: Some(cell_id),
        }
    }

    /// Wire name of the action.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InsertCell { .. } => "insert_cell",
            Self::AddCell { .. } => "add_cell",
            Self::SelectCell { .. } => "select_cell",
            Self::MoveCellUp => "move_cell_up",
            Self::MoveCellDown => "move_cell_down",
            Self::UpdateInputContent { .. } => "update_input_content",
            Self::ChangeElementType { .. } => "change_element_type",
            Self::ChangeDomElementId { .. } => "change_dom_element_id",
            Self::ChangeCellType { .. } => "change_cell_type",
            Self::SetCellRowCollapseState { .. } => "set_cell_row_collapse_state",
            Self::MarkCellNotRendered => "mark_cell_not_rendered",
            Self::EvaluateCell { .. } => "evaluate_cell",
            Self::DeleteCell => "delete_cell",
            Self::ChangeMode { .. } => "change_mode",
            Self::ChangeViewMode { .. } => "change_view_mode",
            Self::Unknown => "unknown",
        }
    }
}
