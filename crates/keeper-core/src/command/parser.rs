//! Splitting of raw input into commands.

/// Separates commands within one input line.
pub const COMMAND_SEPARATOR: char = ';';

/// One tokenized command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub args: Vec<String>,
}

impl Command {
    /// Tokenizes on whitespace; `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut tokens = raw.split_whitespace().map(str::to_string);
        let name = tokens.next()?;
        Some(Self {
            name,
            args: tokens.collect(),
        })
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}

/// Splits `input` into trimmed, non-empty raw command strings.
pub fn split_commands(input: &str) -> Vec<String> {
    input
        .split(COMMAND_SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}
