//! Command parsing, catalogue and dispatch.
//!
//! Input is a `;`-separated batch. Each segment becomes a [`Command`] that the
//! [`Dispatcher`] routes to its handler; results come back as one
//! [`CommandReport`] per command, in issue order.

pub mod builtin;
pub mod dispatcher;
pub mod output;
pub mod parser;

pub use builtin::{CommandKind, CommandSpec, commands, find_command, help_lines};
pub use dispatcher::{AnswerSource, Dispatcher, NoAnswers, Session};
pub use output::{CommandOutput, CommandReport};
pub use parser::{COMMAND_SEPARATOR, Command, split_commands};
