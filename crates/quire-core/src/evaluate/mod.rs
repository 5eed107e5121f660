//! Evaluation dispatcher.
//!
//! Each cell type has one [`CellEvaluator`]. The dispatcher picks it from the
//! cell's type, hands it the collaborators and the notebook-wide ledgers
//! (history, execution counter, dependency set), and builds the new notebook
//! from the result.
//!
//! | type         | value                  | status        | counter          | history          |
//! |--------------|------------------------|---------------|------------------|------------------|
//! | script       | result or failure      | success/error | +1               | before running   |
//! | markdown     | rendered HTML          | success       | -                | -                |
//! | dependencies | all records so far     | success/error | +1 if new loads  | if new loads     |
//! | stylesheet   | content, unchanged     | unchanged     | -                | -                |
//! | other        | unchanged, not rendered| unchanged     | -                | -                |
//!
//! Dependency sources run in the same context as script cells, so the user
//! variables are recomputed after either.

mod dependencies;
mod markdown;
mod script;
mod stylesheet;

use std::sync::Arc;

use indexmap::IndexSet;

use crate::bindings::BindingTracker;
use crate::clock::Clock;
use crate::context::ExecutionContext;
use crate::history::{ExecutionCounter, History};
use crate::loader::DependencyLoader;
use crate::notebook::{Cell, CellId, CellType, Notebook, Transition};
use crate::render::MarkdownRenderer;

use dependencies::DependencyEvaluator;
use markdown::MarkdownEvaluator;
use script::ScriptEvaluator;
use stylesheet::StylesheetEvaluator;

/// External services evaluation relies on.
pub struct Collaborators {
    pub context: Box<dyn ExecutionContext>,
    pub renderer: Box<dyn MarkdownRenderer>,
    pub loader: Box<dyn DependencyLoader>,
    pub clock: Box<dyn Clock>,
}

/// What an evaluation touched beyond its own cell.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Evaluated {
    /// The execution counter was advanced.
    pub(crate) counted: bool,
    /// Source ran in the shared execution context.
    pub(crate) ran_script: bool,
}

/// Everything an evaluator may read or extend while evaluating one cell.
pub(crate) struct EvalEnv<'a> {
    pub(crate) context: &'a mut dyn ExecutionContext,
    pub(crate) renderer: &'a dyn MarkdownRenderer,
    pub(crate) loader: &'a dyn DependencyLoader,
    pub(crate) clock: &'a dyn Clock,
    pub(crate) comment_marker: &'a str,
    pub(crate) history: &'a mut History,
    pub(crate) counter: &'a mut ExecutionCounter,
    pub(crate) dependencies: &'a mut IndexSet<String>,
}

impl EvalEnv<'_> {
    /// Advance the execution counter and stamp the new number on `cell`.
    pub(crate) fn count(&mut self, cell: &mut Cell) {
        let number = self.counter.advance();
        cell.execution_status = Some(number.to_string());
    }
}

/// The evaluation protocol of one cell type.
pub(crate) trait CellEvaluator {
    fn evaluate(&self, cell: &mut Cell, env: &mut EvalEnv<'_>) -> Evaluated;
}

/// Types the engine has no protocol for: the cell is marked not rendered.
struct UnrecognizedEvaluator;

impl CellEvaluator for UnrecognizedEvaluator {
    fn evaluate(&self, cell: &mut Cell, _env: &mut EvalEnv<'_>) -> Evaluated {
        tracing::debug!("No evaluator for cell type '{}'", cell.cell_type);
        cell.rendered = false;
        Evaluated::default()
    }
}

fn evaluator_for(cell_type: &CellType) -> &'static dyn CellEvaluator {
    match cell_type {
        CellType::Script => &ScriptEvaluator,
        CellType::Markdown => &MarkdownEvaluator,
        CellType::Dependencies => &DependencyEvaluator,
        CellType::Stylesheet => &StylesheetEvaluator,
        CellType::Other(_) => &UnrecognizedEvaluator,
    }
}

/// Evaluate a cell (the selected one when `cell_id` is `None`).
///
/// Never fails: script and dependency failures end up on the cell.
pub(crate) fn evaluate(
    state: &Notebook,
    cell_id: Option<CellId>,
    collaborators: &mut Collaborators,
    tracker: &BindingTracker,
    comment_marker: &str,
) -> Transition {
    let Some(id) = cell_id.or_else(|| state.selected_id()) else {
        return Transition::no_target(state);
    };
    let Some(index) = state.index_of(id) else {
        tracing::debug!("Evaluate: {} not found", id);
        return Transition::no_target(state);
    };

    let mut next = state.clone();
    let cell = Arc::make_mut(&mut next.cells[index]);
    let evaluator = evaluator_for(&cell.cell_type);

    let mut env = EvalEnv {
        context: collaborators.context.as_mut(),
        renderer: collaborators.renderer.as_ref(),
        loader: collaborators.loader.as_ref(),
        clock: collaborators.clock.as_ref(),
        comment_marker,
        history: &mut next.history,
        counter: &mut next.execution_number,
        dependencies: &mut next.external_dependencies,
    };
    let evaluated = evaluator.evaluate(cell, &mut env);

    if evaluated.counted {
        tracing::info!(
            "Evaluated {} ({}) as [{}]: {:?}",
            cell.id,
            cell.cell_type,
            next.execution_number.get(),
            cell.eval_status
        );
    } else {
        tracing::debug!("Evaluated {} ({}): {:?}", cell.id, cell.cell_type, cell.eval_status);
    }

    if evaluated.ran_script {
        next.user_defined_variables = tracker.user_defined(collaborators.context.as_ref());
    }

    Transition::applied(next)
}
