//! Human-readable rendering of notebook state for the terminal.

use quire_core::{Cell, CellValue, Dispatch, Effect, EvalStatus, LoadStatus, Notebook, Outcome};

use crate::colors;

/// Longest value preview shown on one line.
const PREVIEW_LEN: usize = 60;

/// Print one line per cell, followed by the notebook-wide counters.
pub fn print_notebook(notebook: &Notebook) {
    println!(
        "{}Notebook{} {}({} cells, mode {:?}, view {:?}){}",
        colors::BOLD,
        colors::RESET,
        colors::DIM,
        notebook.len(),
        notebook.mode(),
        notebook.view_mode(),
        colors::RESET
    );
    println!("{}", "─".repeat(50));

    for cell in notebook.cells() {
        println!("{}", cell_line(cell));
    }

    println!("{}", "─".repeat(50));
    println!(
        "execution number: {}, history entries: {}",
        notebook.execution_number(),
        notebook.history().len()
    );
    if !notebook.external_dependencies().is_empty() {
        let deps: Vec<&str> = notebook
            .external_dependencies()
            .iter()
            .map(String::as_str)
            .collect();
        println!("dependencies: {}", deps.join(", "));
    }
    let vars = notebook.user_defined_variables();
    if !vars.is_empty() {
        let names: Vec<&str> = vars.keys().map(String::as_str).collect();
        println!("variables: {}", names.join(", "));
    }
}

/// One summary line for a cell.
pub fn cell_line(cell: &Cell) -> String {
    let marker = if cell.selected { ">" } else { " " };
    let number = cell
        .execution_status
        .as_deref()
        .map(|n| format!("[{}]", n))
        .unwrap_or_else(|| "[ ]".to_string());

    let mut line = format!(
        "{} {}{:<8}{} {:<6} {:<14} {}",
        marker,
        colors::CYAN,
        cell.id.to_string(),
        colors::RESET,
        number,
        cell.cell_type.to_string(),
        status_label(cell.eval_status)
    );
    if let Some(value) = &cell.value {
        line.push_str("  ");
        line.push_str(&value_preview(value));
    }
    line
}

fn status_label(status: EvalStatus) -> String {
    match status {
        EvalStatus::None => format!("{}-{}", colors::DIM, colors::RESET),
        EvalStatus::Success => format!("{}success{}", colors::GREEN, colors::RESET),
        EvalStatus::Error => format!("{}error{}", colors::RED, colors::RESET),
    }
}

/// Short single-line rendering of a cell value.
pub fn value_preview(value: &CellValue) -> String {
    let text = match value {
        CellValue::Script(value) => value.to_string(),
        CellValue::Error(err) => err.to_string(),
        CellValue::Html(html) | CellValue::Text(html) => {
            html.lines().next().unwrap_or_default().to_string()
        }
        CellValue::Dependencies(records) => records
            .iter()
            .map(|r| match r.status {
                LoadStatus::Ok => format!("{} ok", r.src),
                LoadStatus::Error => format!("{} error", r.src),
            })
            .collect::<Vec<_>>()
            .join(", "),
    };
    truncate(&text, PREVIEW_LEN)
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push_str("...");
    out
}

/// One line describing how an action was handled.
pub fn dispatch_line(action: &str, report: &Dispatch) -> String {
    let outcome = match report.outcome {
        Outcome::Applied => format!("{}applied{}", colors::GREEN, colors::RESET),
        Outcome::NoTarget => format!("{}no target{}", colors::YELLOW, colors::RESET),
        Outcome::Ignored => format!("{}ignored{}", colors::DIM, colors::RESET),
    };
    let mut line = format!("{} {}", action, outcome);
    for effect in &report.effects {
        match effect {
            Effect::ScrollToCell(id) => line.push_str(&format!(" (scroll to {})", id)),
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 4), "abcd...");
        assert_eq!(truncate("ééééé", 2), "éé...");
    }

    #[test]
    fn test_dependency_preview() {
        let value = CellValue::Dependencies(vec![
            quire_core::ExternalDependencyResult::ok("a.rhai"),
            quire_core::ExternalDependencyResult::error("b.rhai"),
        ]);
        assert_eq!(value_preview(&value), "a.rhai ok, b.rhai error");
    }

    #[test]
    fn test_html_preview_first_line() {
        let value = CellValue::Html("<h1>Title</h1>\n<p>body</p>\n".to_string());
        assert_eq!(value_preview(&value), "<h1>Title</h1>");
    }

    #[test]
    fn test_dispatch_line_effects() {
        let report = Dispatch {
            outcome: Outcome::Applied,
            effects: vec![Effect::ScrollToCell(quire_core::CellId::new(3))],
        };
        let line = dispatch_line("select_cell", &report);
        assert!(line.starts_with("select_cell "));
        assert!(line.ends_with("(scroll to cell_3)"));
    }
}
