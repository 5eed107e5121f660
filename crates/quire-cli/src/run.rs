//! Run command implementation for Quire CLI.
//!
//! Applies a file of actions to a fresh kernel and prints the final state.

use std::path::Path;
use std::time::Instant;

use quire_core::Outcome;

use crate::colors;
use crate::input::{parse_actions, read_source};
use crate::summary::print_notebook;

/// How the final notebook is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Json,
    PrettyJson,
    Summary,
}

/// Execute an action file.
pub fn execute(actions_path: &str, config: Option<&Path>, output: Output) -> anyhow::Result<()> {
    let start = Instant::now();

    let text = read_source(actions_path)?;
    let actions = parse_actions(&text)?;
    let mut kernel = crate::load_kernel(config)?;

    let reports = kernel.dispatch_all(&actions);
    for (action, report) in actions.iter().zip(&reports) {
        if report.outcome != Outcome::Applied {
            tracing::warn!("{} was {:?}", action.name(), report.outcome);
        }
    }

    match output {
        Output::Json => println!("{}", serde_json::to_string(kernel.notebook())?),
        Output::PrettyJson => println!("{}", serde_json::to_string_pretty(kernel.notebook())?),
        Output::Summary => {
            print_notebook(kernel.notebook());

            let applied = reports
                .iter()
                .filter(|r| r.outcome == Outcome::Applied)
                .count();
            println!(
                "\n{}Completed{} {} actions ({} applied) in {:.2}s",
                colors::GREEN,
                colors::RESET,
                reports.len(),
                applied,
                start.elapsed().as_secs_f64()
            );
        }
    }

    Ok(())
}
