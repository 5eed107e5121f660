//! Dependency cells: load every specifier not registered yet and run its
//! source in the shared execution context.

use indexmap::IndexSet;

use crate::history::HistoryEntry;
use crate::loader::ExternalDependencyResult;
use crate::notebook::{Cell, CellValue, EvalStatus};

use super::{CellEvaluator, EvalEnv, Evaluated};

pub(crate) struct DependencyEvaluator;

impl CellEvaluator for DependencyEvaluator {
    fn evaluate(&self, cell: &mut Cell, env: &mut EvalEnv<'_>) -> Evaluated {
        let pending: Vec<String> = parse_specifiers(&cell.content, env.comment_marker)
            .into_iter()
            .filter(|spec| !env.dependencies.contains(spec))
            .collect();

        let loaded: Vec<ExternalDependencyResult> =
            pending.iter().map(|spec| install(spec, env)).collect();
        for record in &loaded {
            env.dependencies.insert(record.src.clone());
        }

        cell.eval_status = if loaded.iter().any(ExternalDependencyResult::is_error) {
            EvalStatus::Error
        } else {
            EvalStatus::Success
        };

        let mut records = match cell.value.take() {
            Some(CellValue::Dependencies(records)) => records,
            _ => Vec::new(),
        };
        records.extend(loaded.iter().cloned());
        cell.value = Some(CellValue::Dependencies(records));
        cell.rendered = true;

        if loaded.is_empty() {
            return Evaluated::default();
        }

        env.history.push(HistoryEntry {
            cell_id: cell.id,
            timestamp: env.clock.now_millis(),
            content: summary(&loaded, env.comment_marker),
        });
        env.count(cell);

        Evaluated {
            counted: true,
            ran_script: loaded.iter().any(|record| !record.is_error()),
        }
    }
}

/// Fetch one dependency and run its source in the shared context.
fn install(specifier: &str, env: &mut EvalEnv<'_>) -> ExternalDependencyResult {
    let source = match env.loader.load(specifier) {
        Ok(source) => source,
        Err(e) => {
            tracing::warn!("Failed to load dependency {}: {}", specifier, e);
            return ExternalDependencyResult::error(specifier);
        }
    };

    match env.context.execute(&source) {
        Ok(_) => {
            tracing::debug!("Installed dependency {}", specifier);
            ExternalDependencyResult::ok(specifier)
        }
        Err(e) => {
            tracing::warn!("Dependency {} failed to run: {}", specifier, e);
            ExternalDependencyResult::error(specifier)
        }
    }
}

/// Specifiers named in a dependency cell, in order and without repeats.
///
/// Blank lines and lines starting with `comment_marker` are skipped.
pub(crate) fn parse_specifiers(content: &str, comment_marker: &str) -> IndexSet<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(comment_marker))
        .map(str::to_string)
        .collect()
}

/// History text recorded for newly loaded dependencies.
fn summary(loaded: &[ExternalDependencyResult], marker: &str) -> String {
    let mut text = format!("{} added external dependencies:", marker);
    for record in loaded {
        text.push('\n');
        text.push_str(marker);
        text.push(' ');
        text.push_str(&record.src);
    }
    text
}
