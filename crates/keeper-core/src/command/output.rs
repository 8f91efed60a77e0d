//! Command results and their plain-text rendering.

use crate::error::KeeperError;
use crate::namespace::NodeSnapshot;

/// Successful result of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// `(path, child count)` rows
    Table(Vec<NodeSnapshot>),
    Lines(Vec<String>),
    Text(String),
    Nothing,
}

impl CommandOutput {
    /// Tab-separated rows for tables, one line per entry otherwise.
    pub fn render(&self) -> Vec<String> {
        match self {
            CommandOutput::Table(rows) => rows
                .iter()
                .map(|row| format!("{}\t{}", row.path, row.child_count))
                .collect(),
            CommandOutput::Lines(lines) => lines.clone(),
            CommandOutput::Text(text) => vec![text.clone()],
            CommandOutput::Nothing => Vec::new(),
        }
    }
}

/// Result of one issued command, kept in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReport {
    /// Raw command text as issued
    pub command: String,
    pub result: Result<CommandOutput, KeeperError>,
    /// Output produced before the command failed part-way
    pub partial: Option<CommandOutput>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>, result: Result<CommandOutput, KeeperError>) -> Self {
        Self {
            command: command.into(),
            result,
            partial: None,
        }
    }

    pub fn is_error(&self) -> bool {
        self.result.is_err()
    }

    /// Lines to show on stdout: the output, or whatever was produced before
    /// the failure.
    pub fn output_lines(&self) -> Vec<String> {
        match (&self.result, &self.partial) {
            (Ok(output), _) => output.render(),
            (Err(_), Some(partial)) => partial.render(),
            (Err(_), None) => Vec::new(),
        }
    }
}
