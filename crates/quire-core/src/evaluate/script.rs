//! Script cells: run the source in the shared execution context.

use crate::history::HistoryEntry;
use crate::notebook::{Cell, CellValue, EvalStatus};

use super::{CellEvaluator, EvalEnv, Evaluated};

pub(crate) struct ScriptEvaluator;

impl CellEvaluator for ScriptEvaluator {
    fn evaluate(&self, cell: &mut Cell, env: &mut EvalEnv<'_>) -> Evaluated {
        // Recorded before running so failed attempts are kept too.
        env.history.push(HistoryEntry {
            cell_id: cell.id,
            timestamp: env.clock.now_millis(),
            content: cell.content.clone(),
        });

        cell.value = None;
        match env.context.execute(&cell.content) {
            Ok(value) => {
                cell.eval_status = EvalStatus::Success;
                if !value.is_unit() {
                    cell.value = Some(CellValue::Script(value));
                }
            }
            Err(err) => {
                tracing::debug!("{} failed: {}", cell.id, err);
                cell.eval_status = EvalStatus::Error;
                cell.value = Some(CellValue::Error(err));
            }
        }
        cell.rendered = true;
        env.count(cell);

        Evaluated {
            counted: true,
            ran_script: true,
        }
    }
}
