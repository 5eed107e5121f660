//! Interactive loop: one JSON action per line on stdin.
//!
//! Besides actions, a few commands inspect the kernel:
//! `:cells`, `:vars`, `:state`, `:history` and `:quit`.

use std::io::{self, BufRead, IsTerminal};
use std::path::Path;

use quire_core::Kernel;

use crate::colors;
use crate::input::{is_action_line, parse_action};
use crate::summary::{cell_line, dispatch_line, print_notebook};

const PROMPT: &str = "quire> ";

/// Run the loop until stdin closes or `:quit` is read.
pub fn execute(config: Option<&Path>) -> anyhow::Result<()> {
    let mut kernel = crate::load_kernel(config)?;
    let interactive = io::stdin().is_terminal();

    if interactive {
        println!(
            "{}quire{} - enter JSON actions, :help for commands",
            colors::BOLD,
            colors::RESET
        );
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            print!("{}", PROMPT);
            colors::flush_stdout();
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let line = line.trim();

        if let Some(command) = line.strip_prefix(':') {
            if !run_command(&kernel, command)? {
                break;
            }
            continue;
        }
        if !is_action_line(line) {
            continue;
        }

        match parse_action(line) {
            Ok(action) => {
                let report = kernel.dispatch(&action);
                println!("{}", dispatch_line(action.name(), &report));
                if let Some(cell) = kernel.notebook().selected_cell() {
                    println!("{}", cell_line(cell));
                }
            }
            Err(err) => eprintln!("{}error:{} {:#}", colors::RED, colors::RESET, err),
        }
    }

    Ok(())
}

/// Handle a `:command`. Returns `false` when the loop should stop.
fn run_command(kernel: &Kernel, command: &str) -> anyhow::Result<bool> {
    let notebook = kernel.notebook();
    match command.trim() {
        "quit" | "q" => return Ok(false),
        "cells" => print_notebook(notebook),
        "state" => println!("{}", serde_json::to_string_pretty(notebook)?),
        "vars" => {
            for (name, value) in notebook.user_defined_variables() {
                println!("{} = {}", name, value);
            }
        }
        "history" => {
            for entry in notebook.history() {
                println!(
                    "{}{} @ {}{}\n{}",
                    colors::DIM,
                    entry.cell_id,
                    entry.timestamp,
                    colors::RESET,
                    entry.content
                );
            }
        }
        "help" => {
            println!(":cells    summary of every cell");
            println!(":vars     user-defined variables");
            println!(":state    full notebook as JSON");
            println!(":history  evaluation history");
            println!(":quit     leave");
        }
        other => eprintln!(
            "{}unknown command:{} {}",
            colors::YELLOW,
            colors::RESET,
            other
        ),
    }
    Ok(true)
}
