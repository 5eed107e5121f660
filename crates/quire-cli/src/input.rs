//! Reading actions from action files.
//!
//! An action file holds one JSON action per line. Blank lines and lines
//! starting with `#` are skipped.

use std::fs;
use std::io::{self, Read};

use anyhow::Context;
use quire_core::Action;

/// Read the whole action source: a file path, or `-` for stdin.
pub fn read_source(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read actions from stdin")?;
        return Ok(text);
    }

    fs::read_to_string(path).with_context(|| format!("action file not found: {}", path))
}

/// Whether a line carries an action.
pub fn is_action_line(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && !line.starts_with('#')
}

/// Parse one action line.
pub fn parse_action(line: &str) -> anyhow::Result<Action> {
    serde_json::from_str(line.trim()).with_context(|| format!("invalid action: {}", line.trim()))
}

/// Parse every action in `text`, reporting the line number of the first bad one.
pub fn parse_actions(text: &str) -> anyhow::Result<Vec<Action>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| is_action_line(line))
        .map(|(index, line)| parse_action(line).with_context(|| format!("line {}", index + 1)))
        .collect()
}
