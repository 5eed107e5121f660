//! Notebook data model and structural transitions.
//!
//! - `cell` - cells, their types, values and presentation settings
//! - `state` - the [`Notebook`] aggregate
//! - `action` - the action protocol
//! - `reducer` - the pure transition function for structural actions

mod action;
mod cell;
mod reducer;
mod state;

pub use action::{Action, Direction};
pub use cell::{
    Cell, CellId, CellType, CellValue, EvalStatus, INPUT_ROW, OUTPUT_ROW, RowOverflow,
    RowSettings,
};
pub use reducer::{Effect, Outcome, Transition, apply};
pub use state::{Mode, Notebook, Variables, ViewMode};
