//! Interactive shell.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use keeper_core::command::{AnswerSource, COMMAND_SEPARATOR, Dispatcher, commands, find_command};
use keeper_core::four_letter::is_four_letter_word;

use crate::output::print_reports;
use crate::run_cancellable;

type KeeperEditor = Editor<CliHelper, DefaultHistory>;

/// Completion, hints and highlighting for command names.
#[derive(Clone)]
struct CliHelper {
    names: Vec<&'static str>,
}

impl CliHelper {
    fn new() -> Self {
        let mut names: Vec<&'static str> = commands()
            .iter()
            .flat_map(|spec| std::iter::once(spec.name).chain(spec.aliases.iter().copied()))
            .collect();
        names.sort_unstable();
        Self { names }
    }

    /// Start of the word under the cursor, if it is a command name position.
    fn command_word_start(line: &str) -> Option<usize> {
        let segment_start = line
            .rfind(COMMAND_SEPARATOR)
            .map(|i| i + COMMAND_SEPARATOR.len_utf8())
            .unwrap_or(0);
        let segment = &line[segment_start..];
        let word = segment.trim_start();
        if word.contains(char::is_whitespace) {
            return None;
        }
        Some(line.len() - word.len())
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        let Some(start) = Self::command_word_start(line) else {
            return Ok((pos, vec![]));
        };
        let prefix = &line[start..];
        let candidates = self
            .names
            .iter()
            .filter(|name| name.starts_with(prefix))
            .map(|name| Pair {
                display: name.to_string(),
                replacement: format!("{name} "),
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let first = line.split_whitespace().next().unwrap_or_default();
        if find_command(first).is_some() || is_four_letter_word(first) {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() {
            return None;
        }
        let start = Self::command_word_start(line)?;
        let prefix = &line[start..];
        if prefix.is_empty() {
            return None;
        }
        self.names
            .iter()
            .find(|name| name.starts_with(prefix) && name.len() > prefix.len())
            .map(|name| name[prefix.len()..].dimmed().to_string())
    }
}

impl Validator for CliHelper {}

/// Asks the user directly when a batch has no answer queued.
struct PromptAnswers<'a> {
    editor: &'a mut KeeperEditor,
}

impl AnswerSource for PromptAnswers<'_> {
    fn answer(&mut self, prompt: &str) -> Option<String> {
        match self.editor.readline(&format!("{prompt} (y/n) ")) {
            Ok(line) => Some(line),
            Err(e) => {
                tracing::debug!(error = %e, "confirmation aborted");
                None
            }
        }
    }
}

/// Runs the shell until `quit`, `exit` or end of input.
pub async fn run(dispatcher: &mut Dispatcher, history_file: Option<PathBuf>) -> Result<()> {
    let mut editor: KeeperEditor = Editor::new()?;
    editor.set_helper(Some(CliHelper::new()));
    if let Some(path) = &history_file {
        if let Err(e) = editor.load_history(path) {
            tracing::debug!(path = %path.display(), error = %e, "no history loaded");
        }
    }

    println!("{}", "=== keeper-client ===".bright_magenta().bold());
    println!(
        "{}",
        "Type 'help' for the command list, 'quit' to exit.".bright_black()
    );

    loop {
        let prompt = format!("{} :) ", dispatcher.cwd());
        match editor.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed == "quit" || trimmed == "exit" {
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(trimmed);

                let mut answers = PromptAnswers {
                    editor: &mut editor,
                };
                let reports = run_cancellable(dispatcher, trimmed, &mut answers).await;
                print_reports(&reports, true);
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    if let Some(path) = &history_file {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = editor.save_history(path) {
            tracing::warn!(path = %path.display(), error = %e, "failed to save history");
        }
    }
    Ok(())
}
