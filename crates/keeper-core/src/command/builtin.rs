//! Catalogue of the commands the dispatcher understands.
//!
//! The catalogue backs command lookup, `help` output and shell completion.

use std::sync::OnceLock;

/// What a command does, independent of how it was spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Ls,
    Cd,
    Get,
    Set,
    Create,
    Touch,
    Exists,
    GetStat,
    Rm,
    Rmr,
    GetDirectChildrenNumber,
    GetAllChildrenNumber,
    FindSuperNodes,
    FindBigFamily,
    DeleteStaleBackups,
    FourLetterWord,
    Help,
}

/// A command known to the client.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub usage: &'static str,
    pub description: &'static str,
    pub kind: CommandKind,
}

impl CommandSpec {
    pub const fn new(
        name: &'static str,
        aliases: &'static [&'static str],
        usage: &'static str,
        description: &'static str,
        kind: CommandKind,
    ) -> Self {
        Self {
            name,
            aliases,
            usage,
            description,
            kind,
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }
}

static COMMANDS: OnceLock<Vec<CommandSpec>> = OnceLock::new();

/// Returns all commands, initialized on first access.
pub fn commands() -> &'static [CommandSpec] {
    COMMANDS.get_or_init(|| {
        vec![
            CommandSpec::new(
                "ls",
                &[],
                "ls [path]",
                "Lists the nodes for the given path",
                CommandKind::Ls,
            ),
            CommandSpec::new("cd", &[], "cd [path]", "Changes the working path", CommandKind::Cd),
            CommandSpec::new(
                "get",
                &[],
                "get <path>",
                "Returns the node's value",
                CommandKind::Get,
            ),
            CommandSpec::new(
                "set",
                &[],
                "set <path> <value> [version]",
                "Updates the node's value, only if version matches when given",
                CommandKind::Set,
            ),
            CommandSpec::new(
                "create",
                &[],
                "create <path> <value>",
                "Creates a new node",
                CommandKind::Create,
            ),
            CommandSpec::new(
                "touch",
                &[],
                "touch <path>",
                "Creates an empty node; no error if it already exists",
                CommandKind::Touch,
            ),
            CommandSpec::new(
                "exists",
                &[],
                "exists <path>",
                "Returns 1 if the node exists, 0 otherwise",
                CommandKind::Exists,
            ),
            CommandSpec::new(
                "get_stat",
                &[],
                "get_stat [path]",
                "Returns the node's status info",
                CommandKind::GetStat,
            ),
            CommandSpec::new(
                "rm",
                &[],
                "rm <path> [version]",
                "Removes the node, only if version matches when given",
                CommandKind::Rm,
            ),
            CommandSpec::new(
                "rmr",
                &[],
                "rmr <path>",
                "Recursively deletes the path; confirmation required",
                CommandKind::Rmr,
            ),
            CommandSpec::new(
                "get_direct_children_number",
                &[],
                "get_direct_children_number [path]",
                "Gets the number of direct children of the node",
                CommandKind::GetDirectChildrenNumber,
            ),
            CommandSpec::new(
                "get_all_children_number",
                &[],
                "get_all_children_number [path]",
                "Gets the number of all descendants of the node",
                CommandKind::GetAllChildrenNumber,
            ),
            CommandSpec::new(
                "find_super_nodes",
                &[],
                "find_super_nodes <threshold> [path]",
                "Finds nodes with at least threshold children",
                CommandKind::FindSuperNodes,
            ),
            CommandSpec::new(
                "find_big_family",
                &[],
                "find_big_family [path] [n]",
                "Returns the top n nodes with the most children in the subtree",
                CommandKind::FindBigFamily,
            ),
            CommandSpec::new(
                "delete_stale_backups",
                &["delete_stable_backups"],
                "delete_stale_backups",
                "Deletes backup nodes that are no longer active; confirmation required",
                CommandKind::DeleteStaleBackups,
            ),
            CommandSpec::new(
                "flwc",
                &[],
                "flwc <word>",
                "Sends a four-letter-word administrative command",
                CommandKind::FourLetterWord,
            ),
            CommandSpec::new("help", &[], "help", "Prints this message", CommandKind::Help),
        ]
    })
}

/// Finds a command by name or alias.
pub fn find_command(name: &str) -> Option<&'static CommandSpec> {
    commands().iter().find(|spec| spec.matches(name))
}

/// One `usage -- description` line per command.
pub fn help_lines() -> Vec<String> {
    commands()
        .iter()
        .map(|spec| format!("{} -- {}", spec.usage, spec.description))
        .collect()
}
