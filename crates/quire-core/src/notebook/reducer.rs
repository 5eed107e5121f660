//! Structural transitions over notebook state.
//!
//! [`apply`] is a pure function: it reads one notebook and returns a new one,
//! leaving the input (and every cell it shares with older snapshots)
//! untouched. Evaluation is not handled here; see [`Kernel`](crate::Kernel).

use std::sync::Arc;

use super::action::{Action, Direction};
use super::cell::{Cell, CellId, CellType};
use super::state::Notebook;

/// How an action was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The action was recognised and applied. The state may still be equal to
    /// the input, e.g. moving the first cell up.
    Applied,
    /// The action targets a cell that does not exist. Nothing changed, except
    /// that `SelectCell` still clears the selection.
    NoTarget,
    /// The action is not handled by this transition; nothing changed.
    Ignored,
}

/// Side-channel request for the UI shell. Not part of notebook state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ScrollToCell(CellId),
}

/// Result of applying one action.
#[derive(Debug, Clone)]
#[must_use]
pub struct Transition {
    pub notebook: Notebook,
    pub outcome: Outcome,
    pub effects: Vec<Effect>,
}

impl Transition {
    pub(crate) fn applied(notebook: Notebook) -> Self {
        Self {
            notebook,
            outcome: Outcome::Applied,
            effects: Vec::new(),
        }
    }

    pub(crate) fn no_target(state: &Notebook) -> Self {
        Self {
            notebook: state.clone(),
            outcome: Outcome::NoTarget,
            effects: Vec::new(),
        }
    }

    pub(crate) fn ignored(state: &Notebook) -> Self {
        Self {
            notebook: state.clone(),
            outcome: Outcome::Ignored,
            effects: Vec::new(),
        }
    }

    fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Apply a structural action to `state`.
///
/// `EvaluateCell` needs an execution context and is reported as
/// [`Outcome::Ignored`]; unknown actions are the identity.
pub fn apply(state: &Notebook, action: &Action) -> Transition {
    match action {
        Action::InsertCell { direction } => insert_cell(state, *direction),
        Action::AddCell { cell_type } => add_cell(state, cell_type.clone()),
        Action::SelectCell { id, scroll_to_cell } => select_cell(state, *id, *scroll_to_cell),
        Action::MoveCellUp => move_selected(state, Move::Up),
        Action::MoveCellDown => move_selected(state, Move::Down),
        Action::UpdateInputContent { content } => {
            update_selected(state, |cell| cell.content = content.clone())
        }
        Action::ChangeElementType { element_type } => {
            update_selected(state, |cell| cell.element_type = Some(element_type.clone()))
        }
        Action::ChangeDomElementId { elem_id } => {
            update_selected(state, |cell| cell.dom_element_id = Some(elem_id.clone()))
        }
        Action::ChangeCellType { cell_type } => update_selected(state, |cell| {
            // Defaults come from a throwaway cell of the new type.
            let template = Cell::new(cell.id, cell_type.clone());
            cell.cell_type = template.cell_type;
            cell.row_settings = template.row_settings;
            cell.value = None;
            cell.rendered = false;
        }),
        Action::SetCellRowCollapseState {
            cell_id,
            row_type,
            view_mode,
            row_overflow,
        } => {
            let target = cell_id.or_else(|| state.selected_id());
            match target {
                Some(id) => update_cell(state, id, |cell| {
                    cell.row_settings.set(row_type, *view_mode, *row_overflow)
                }),
                None => Transition::no_target(state),
            }
        }
        Action::MarkCellNotRendered => update_selected(state, |cell| cell.rendered = false),
        Action::DeleteCell => delete_selected(state),
        Action::ChangeMode { mode } => {
            let mut next = state.clone();
            next.mode = *mode;
            Transition::applied(next)
        }
        Action::ChangeViewMode { view_mode } => {
            let mut next = state.clone();
            next.view_mode = *view_mode;
            Transition::applied(next)
        }
        Action::EvaluateCell { .. } | Action::Unknown => Transition::ignored(state),
    }
}

fn insert_cell(state: &Notebook, direction: Direction) -> Transition {
    let mut next = state.clone();
    let index = match (state.selected_index(), direction) {
        (Some(i), Direction::Above) => i,
        (Some(i), Direction::Below) => i + 1,
        (None, _) => 0,
    };
    let cell = Cell::new(next.generate_id(), CellType::Script);
    next.cells.insert(index, Arc::new(cell));
    Transition::applied(next)
}

fn add_cell(state: &Notebook, cell_type: CellType) -> Transition {
    let mut next = state.clone();
    let cell = Cell::new(next.generate_id(), cell_type);
    next.cells.push(Arc::new(cell));
    Transition::applied(next)
}

fn select_cell(state: &Notebook, id: CellId, scroll: bool) -> Transition {
    let mut next = state.clone();
    for index in 0..next.cells.len() {
        let should_select = next.cells[index].id == id;
        if next.cells[index].selected != should_select {
            next.cell_mut(index).selected = should_select;
        }
    }

    if state.index_of(id).is_none() {
        // Selection is still cleared.
        return Transition {
            outcome: Outcome::NoTarget,
            ..Transition::applied(next)
        };
    }

    let transition = Transition::applied(next);
    if scroll {
        transition.with_effect(Effect::ScrollToCell(id))
    } else {
        transition
    }
}

#[derive(Clone, Copy)]
enum Move {
    Up,
    Down,
}

fn move_selected(state: &Notebook, direction: Move) -> Transition {
    let Some(index) = state.selected_index() else {
        return Transition::no_target(state);
    };
    let neighbor = match direction {
        Move::Up => index.checked_sub(1),
        Move::Down => Some(index + 1).filter(|&i| i < state.len()),
    };
    let Some(neighbor) = neighbor else {
        return Transition::applied(state.clone());
    };

    let mut next = state.clone();
    next.cells.swap(index, neighbor);
    let id = next.cells[neighbor].id;
    Transition::applied(next).with_effect(Effect::ScrollToCell(id))
}

fn update_selected(state: &Notebook, f: impl FnOnce(&mut Cell)) -> Transition {
    match state.selected_id() {
        Some(id) => update_cell(state, id, f),
        None => Transition::no_target(state),
    }
}

fn update_cell(state: &Notebook, id: CellId, f: impl FnOnce(&mut Cell)) -> Transition {
    let Some(index) = state.index_of(id) else {
        return Transition::no_target(state);
    };
    let mut next = state.clone();
    f(next.cell_mut(index));
    Transition::applied(next)
}

fn delete_selected(state: &Notebook) -> Transition {
    if state.is_empty() {
        return Transition::no_target(state);
    }
    let Some(index) = state.selected_index() else {
        return Transition::no_target(state);
    };

    let mut next = state.clone();
    let len = next.cells.len();
    if len > 1 {
        // The cell after the deleted one takes over the selection; when the
        // last cell goes, the one before it does.
        let heir = if index == len - 1 { len - 2 } else { index + 1 };
        next.cell_mut(heir).selected = true;
    }
    next.cells.remove(index);
    Transition::applied(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_languages;
    use crate::notebook::cell::{OUTPUT_ROW, RowOverflow, RowSettings};
    use crate::notebook::state::{Mode, ViewMode};

    fn notebook() -> Notebook {
        Notebook::with_initial_cell(Arc::new(default_languages()))
    }

    /// Notebook with `n` script cells, none selected.
    fn notebook_with(n: usize) -> Notebook {
        let mut nb = Notebook::new(Arc::new(default_languages()));
        for _ in 0..n {
            nb = apply(&nb, &Action::AddCell { cell_type: CellType::Script }).notebook;
        }
        nb
    }

    fn ids(nb: &Notebook) -> Vec<u64> {
        nb.cells().iter().map(|c| c.id.as_u64()).collect()
    }

    fn run(nb: &Notebook, actions: &[Action]) -> Notebook {
        actions
            .iter()
            .fold(nb.clone(), |nb, action| apply(&nb, action).notebook)
    }

    #[test]
    fn test_insert_above_and_below() {
        let nb = notebook();
        let nb = apply(&nb, &Action::InsertCell { direction: Direction::Above }).notebook;
        let nb = apply(&nb, &Action::InsertCell { direction: Direction::Below }).notebook;
        assert_eq!(ids(&nb), [1, 0, 2]);
        assert_eq!(nb.selected_id(), Some(CellId::new(0)));
        assert!(nb.cells().iter().all(|c| c.cell_type == CellType::Script));
    }

    #[test]
    fn test_insert_without_selection_prepends() {
        let nb = notebook_with(2);
        let above = apply(&nb, &Action::InsertCell { direction: Direction::Above }).notebook;
        let below = apply(&nb, &Action::InsertCell { direction: Direction::Below }).notebook;
        assert_eq!(ids(&above), [2, 0, 1]);
        assert_eq!(ids(&below), [2, 0, 1]);
    }

    #[test]
    fn test_add_cell_appends() {
        let nb = apply(&notebook(), &Action::AddCell { cell_type: CellType::Markdown }).notebook;
        assert_eq!(ids(&nb), [0, 1]);
        assert_eq!(nb.cells()[1].cell_type, CellType::Markdown);
        assert!(!nb.cells()[1].selected);
    }

    #[test]
    fn test_select_cell() {
        let nb = notebook_with(3);
        let t = apply(
            &nb,
            &Action::SelectCell {
                id: CellId::new(1),
                scroll_to_cell: true,
            },
        );
        assert_eq!(t.outcome, Outcome::Applied);
        assert_eq!(t.effects, [Effect::ScrollToCell(CellId::new(1))]);
        let selected: Vec<_> = t.notebook.cells().iter().filter(|c| c.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, CellId::new(1));
    }

    #[test]
    fn test_select_missing_cell_clears_selection() {
        let nb = notebook();
        let t = apply(&nb, &Action::select(CellId::new(99)));
        assert_eq!(t.outcome, Outcome::NoTarget);
        assert!(t.notebook.selected_cell().is_none());
        assert!(t.effects.is_empty());
    }

    #[test]
    fn test_move_cell_swaps_with_neighbor() {
        let nb = run(&notebook_with(3), &[Action::select(CellId::new(1))]);
        let up = apply(&nb, &Action::MoveCellUp);
        assert_eq!(ids(&up.notebook), [1, 0, 2]);
        assert_eq!(up.effects, [Effect::ScrollToCell(CellId::new(1))]);

        let down = apply(&nb, &Action::MoveCellDown).notebook;
        assert_eq!(ids(&down), [0, 2, 1]);
    }

    #[test]
    fn test_move_at_boundary_is_noop() {
        let nb = run(&notebook_with(2), &[Action::select(CellId::new(0))]);
        let t = apply(&nb, &Action::MoveCellUp);
        assert_eq!(t.outcome, Outcome::Applied);
        assert_eq!(ids(&t.notebook), [0, 1]);
        assert!(t.effects.is_empty());

        let nb = run(&nb, &[Action::select(CellId::new(1))]);
        assert_eq!(ids(&apply(&nb, &Action::MoveCellDown).notebook), [0, 1]);
    }

    #[test]
    fn test_update_content_keeps_rendered_flag() {
        let mut nb = notebook();
        nb.cell_mut(0).rendered = true;
        let next = apply(&nb, &Action::update_content("1 + 1")).notebook;
        assert_eq!(next.cells()[0].content, "1 + 1");
        assert!(next.cells()[0].rendered);
        assert_eq!(nb.cells()[0].content, "");
    }

    #[test]
    fn test_presentation_fields() {
        let nb = run(
            &notebook(),
            &[
                Action::ChangeElementType {
                    element_type: "div".into(),
                },
                Action::ChangeDomElementId {
                    elem_id: "plot".into(),
                },
            ],
        );
        let cell = &nb.cells()[0];
        assert_eq!(cell.element_type.as_deref(), Some("div"));
        assert_eq!(cell.dom_element_id.as_deref(), Some("plot"));
    }

    #[test]
    fn test_change_cell_type_resets_value() {
        let mut nb = notebook();
        {
            let cell = nb.cell_mut(0);
            cell.rendered = true;
            cell.value = Some(crate::notebook::CellValue::Text("x".into()));
        }
        let next = apply(
            &nb,
            &Action::ChangeCellType {
                cell_type: CellType::Stylesheet,
            },
        )
        .notebook;
        let cell = &next.cells()[0];
        assert_eq!(cell.cell_type, CellType::Stylesheet);
        assert!(cell.value.is_none());
        assert!(!cell.rendered);
        assert_eq!(
            cell.row_settings,
            RowSettings::defaults_for(&CellType::Stylesheet)
        );
    }

    #[test]
    fn test_row_collapse_defaults_to_selected() {
        let action = Action::SetCellRowCollapseState {
            cell_id: None,
            row_type: OUTPUT_ROW.into(),
            view_mode: ViewMode::Presentation,
            row_overflow: RowOverflow::Scroll,
        };
        let nb = apply(&notebook(), &action).notebook;
        assert_eq!(
            nb.cells()[0].row_settings.get(OUTPUT_ROW, ViewMode::Presentation),
            Some(RowOverflow::Scroll)
        );
    }

    #[test]
    fn test_row_collapse_explicit_cell() {
        let nb = notebook_with(2);
        let action = Action::SetCellRowCollapseState {
            cell_id: Some(CellId::new(1)),
            row_type: "input".into(),
            view_mode: ViewMode::Editor,
            row_overflow: RowOverflow::Hidden,
        };
        let nb = apply(&nb, &action).notebook;
        assert_eq!(
            nb.cells()[1].row_settings.get("input", ViewMode::Editor),
            Some(RowOverflow::Hidden)
        );
        assert_eq!(
            nb.cells()[0].row_settings.get("input", ViewMode::Editor),
            Some(RowOverflow::Visible)
        );
    }

    #[test]
    fn test_mark_not_rendered() {
        let mut nb = notebook();
        nb.cell_mut(0).rendered = true;
        let next = apply(&nb, &Action::MarkCellNotRendered).notebook;
        assert!(!next.cells()[0].rendered);
    }

    #[test]
    fn test_delete_first_selects_following() {
        let nb = run(&notebook_with(3), &[Action::select(CellId::new(0))]);
        let nb = apply(&nb, &Action::DeleteCell).notebook;
        assert_eq!(ids(&nb), [1, 2]);
        assert_eq!(nb.selected_id(), Some(CellId::new(1)));
    }

    #[test]
    fn test_delete_last_selects_previous() {
        let nb = run(&notebook_with(3), &[Action::select(CellId::new(2))]);
        let nb = apply(&nb, &Action::DeleteCell).notebook;
        assert_eq!(ids(&nb), [0, 1]);
        assert_eq!(nb.selected_id(), Some(CellId::new(1)));
    }

    #[test]
    fn test_delete_sole_cell() {
        let t = apply(&notebook(), &Action::DeleteCell);
        assert_eq!(t.outcome, Outcome::Applied);
        assert!(t.notebook.is_empty());

        let t = apply(&t.notebook, &Action::DeleteCell);
        assert_eq!(t.outcome, Outcome::NoTarget);
    }

    #[test]
    fn test_delete_without_selection() {
        let t = apply(&notebook_with(2), &Action::DeleteCell);
        assert_eq!(t.outcome, Outcome::NoTarget);
        assert_eq!(t.notebook.len(), 2);
    }

    #[test]
    fn test_deleted_id_not_reused() {
        let nb = run(
            &notebook(),
            &[
                Action::AddCell { cell_type: CellType::Script },
                Action::select(CellId::new(1)),
                Action::DeleteCell,
                Action::AddCell { cell_type: CellType::Script },
            ],
        );
        assert_eq!(ids(&nb), [0, 2]);
    }

    #[test]
    fn test_modes() {
        let nb = run(
            &notebook(),
            &[
                Action::ChangeMode { mode: Mode::Edit },
                Action::ChangeViewMode {
                    view_mode: ViewMode::Presentation,
                },
            ],
        );
        assert_eq!(nb.mode(), Mode::Edit);
        assert_eq!(nb.view_mode(), ViewMode::Presentation);
    }

    #[test]
    fn test_unknown_and_evaluate_are_ignored() {
        let nb = notebook();
        assert_eq!(apply(&nb, &Action::Unknown).outcome, Outcome::Ignored);
        assert_eq!(apply(&nb, &Action::evaluate()).outcome, Outcome::Ignored);
    }

    #[test]
    fn test_untouched_cells_are_shared() {
        let nb = run(&notebook_with(2), &[Action::select(CellId::new(0))]);
        let next = apply(&nb, &Action::update_content("x")).notebook;
        assert!(!Arc::ptr_eq(&nb.cells()[0], &next.cells()[0]));
        assert!(Arc::ptr_eq(&nb.cells()[1], &next.cells()[1]));
    }
}
