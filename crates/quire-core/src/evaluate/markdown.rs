//! Markdown cells: render the source to HTML.

use crate::notebook::{Cell, CellValue, EvalStatus};

use super::{CellEvaluator, EvalEnv, Evaluated};

pub(crate) struct MarkdownEvaluator;

impl CellEvaluator for MarkdownEvaluator {
    fn evaluate(&self, cell: &mut Cell, env: &mut EvalEnv<'_>) -> Evaluated {
        cell.value = Some(CellValue::Html(env.renderer.render(&cell.content)));
        cell.rendered = true;
        cell.eval_status = EvalStatus::Success;
        Evaluated::default()
    }
}
