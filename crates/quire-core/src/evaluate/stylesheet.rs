//! Stylesheet cells: the source is the value.

use crate::notebook::{Cell, CellValue};

use super::{CellEvaluator, EvalEnv, Evaluated};

pub(crate) struct StylesheetEvaluator;

impl CellEvaluator for StylesheetEvaluator {
    fn evaluate(&self, cell: &mut Cell, _env: &mut EvalEnv<'_>) -> Evaluated {
        cell.value = Some(CellValue::Text(cell.content.clone()));
        cell.rendered = true;
        Evaluated::default()
    }
}
