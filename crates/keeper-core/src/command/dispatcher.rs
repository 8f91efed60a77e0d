//! Sequential execution of `;`-separated command batches.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::builtin::{CommandKind, find_command, help_lines};
use super::output::{CommandOutput, CommandReport};
use super::parser::{Command, split_commands};
use crate::backup::{BackupMaintainer, CONFIRM_TOKEN};
use crate::config::ClientConfig;
use crate::error::{KeeperError, Result};
use crate::family::RankedFamilyFinder;
use crate::four_letter::{FourLetterWordProxy, is_four_letter_word};
use crate::guard::GuardedClient;
use crate::liveness::LivenessPolicy;
use crate::namespace::NamespaceClient;
use crate::path::NodePath;
use crate::resolver::{resolve, resolve_or_cwd};

/// Supplies answers to confirmation prompts when the batch itself has no
/// further command to consume.
pub trait AnswerSource {
    fn answer(&mut self, prompt: &str) -> Option<String>;
}

/// Non-interactive mode: every unanswered prompt is declined.
pub struct NoAnswers;

impl AnswerSource for NoAnswers {
    fn answer(&mut self, _prompt: &str) -> Option<String> {
        None
    }
}

/// Per-session state. Only `cd` changes it.
#[derive(Debug, Clone, Default)]
pub struct Session {
    cwd: NodePath,
}

impl Session {
    pub fn cwd(&self) -> &NodePath {
        &self.cwd
    }
}

/// Routes parsed commands to their handlers, one at a time.
pub struct Dispatcher {
    client: Arc<dyn NamespaceClient>,
    proxy: FourLetterWordProxy,
    policy: Arc<dyn LivenessPolicy>,
    config: ClientConfig,
    session: Session,
}

/// Everything a single command needs, borrowed for its duration.
struct Invocation<'a, 'b> {
    command: &'a Command,
    client: &'a GuardedClient,
    pending: &'a mut VecDeque<String>,
    answers: &'a mut (dyn AnswerSource + 'b),
    /// Output of a command that failed after doing part of its work
    partial: Option<CommandOutput>,
}

impl Invocation<'_, '_> {
    /// The next raw command answers the prompt; otherwise ask the source.
    fn confirm(&mut self, prompt: &str) -> Option<String> {
        self.pending
            .pop_front()
            .or_else(|| self.answers.answer(prompt))
    }

    fn expect_args(&self, min: usize, max: usize) -> Result<()> {
        let count = self.command.args.len();
        if count < min {
            return Err(KeeperError::invalid_argument(
                &self.command.name,
                format!("expected at least {min} argument(s), got {count}"),
            ));
        }
        if count > max {
            return Err(KeeperError::invalid_argument(
                &self.command.name,
                format!("expected at most {max} argument(s), got {count}"),
            ));
        }
        Ok(())
    }

    fn number_arg(&self, index: usize) -> Result<Option<u64>> {
        self.command
            .arg(index)
            .map(|raw| {
                raw.parse::<u64>().map_err(|_| {
                    KeeperError::invalid_argument(
                        &self.command.name,
                        format!("'{raw}' is not a non-negative number"),
                    )
                })
            })
            .transpose()
    }
}

impl Dispatcher {
    pub fn new(
        client: Arc<dyn NamespaceClient>,
        proxy: FourLetterWordProxy,
        policy: Arc<dyn LivenessPolicy>,
        config: ClientConfig,
    ) -> Self {
        Self {
            client,
            proxy,
            policy,
            config,
            session: Session::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn cwd(&self) -> &NodePath {
        self.session.cwd()
    }

    /// Runs a batch without interaction or cancellation.
    pub async fn execute_batch(&mut self, input: &str) -> Vec<CommandReport> {
        self.execute(input, &mut NoAnswers, CancellationToken::new())
            .await
    }

    /// Executes every command in `input` in order and returns one report per
    /// dispatched command.
    ///
    /// A command that asks for confirmation consumes the next raw command as
    /// its answer. Per-command errors are recorded and the batch continues;
    /// a lost connection or cancellation ends it.
    pub async fn execute(
        &mut self,
        input: &str,
        answers: &mut dyn AnswerSource,
        cancel: CancellationToken,
    ) -> Vec<CommandReport> {
        let client = GuardedClient::new(self.client.clone(), self.config.timeout(), cancel);
        let mut pending: VecDeque<String> = split_commands(input).into();
        let mut reports = Vec::new();

        while let Some(raw) = pending.pop_front() {
            let Some(command) = Command::parse(&raw) else {
                continue;
            };
            tracing::debug!(command = %raw, cwd = %self.session.cwd, "executing command");

            let mut invocation = Invocation {
                command: &command,
                client: &client,
                pending: &mut pending,
                answers: &mut *answers,
                partial: None,
            };
            let result = self.run(&mut invocation).await;
            let partial = invocation.partial.take();

            let stop = match &result {
                Err(e) if e.stops_workflow() => {
                    tracing::warn!(command = %raw, error = %e, "aborting remaining commands");
                    true
                }
                _ => false,
            };
            reports.push(CommandReport {
                command: raw,
                result,
                partial,
            });
            if stop {
                break;
            }
        }

        reports
    }

    async fn run(&mut self, inv: &mut Invocation<'_, '_>) -> Result<CommandOutput> {
        let command = inv.command;
        let Some(spec) = find_command(&command.name) else {
            if is_four_letter_word(&command.name) && command.args.is_empty() {
                return Ok(CommandOutput::Text(self.proxy.send(&command.name).await?));
            }
            return Err(KeeperError::unknown_command(&command.name));
        };

        let client = inv.client;
        match spec.kind {
            CommandKind::Ls => {
                inv.expect_args(0, 1)?;
                let path = self.path_or_cwd(command.arg(0))?;
                let children = client.children(&path).await?;
                Ok(CommandOutput::Text(children.join(" ")))
            }
            CommandKind::Cd => {
                inv.expect_args(0, 1)?;
                let path = match command.arg(0) {
                    Some(raw) => self.path(raw)?,
                    None => NodePath::root(),
                };
                if !client.exists(&path).await? {
                    return Err(KeeperError::path_not_found(&path));
                }
                self.session.cwd = path;
                Ok(CommandOutput::Nothing)
            }
            CommandKind::Get => {
                inv.expect_args(1, 1)?;
                let path = self.path(&command.args[0])?;
                let value = client.get(&path).await?;
                Ok(CommandOutput::Text(String::from_utf8_lossy(&value).into_owned()))
            }
            CommandKind::Set => {
                inv.expect_args(2, 3)?;
                let path = self.path(&command.args[0])?;
                let version = inv.number_arg(2)?;
                client.set(&path, command.args[1].as_bytes(), version).await?;
                Ok(CommandOutput::Nothing)
            }
            CommandKind::Create => {
                inv.expect_args(2, 2)?;
                let path = self.path(&command.args[0])?;
                client.create(&path, command.args[1].as_bytes()).await?;
                Ok(CommandOutput::Nothing)
            }
            CommandKind::Touch => {
                inv.expect_args(1, 1)?;
                let path = self.path(&command.args[0])?;
                match client.create(&path, b"").await {
                    Ok(()) => Ok(CommandOutput::Nothing),
                    Err(e) if e.is_node_exists() => Ok(CommandOutput::Nothing),
                    Err(e) => Err(e),
                }
            }
            CommandKind::Exists => {
                inv.expect_args(1, 1)?;
                let path = self.path(&command.args[0])?;
                let exists = client.exists(&path).await?;
                Ok(CommandOutput::Text(if exists { "1" } else { "0" }.to_string()))
            }
            CommandKind::GetStat => {
                inv.expect_args(0, 1)?;
                let path = self.path_or_cwd(command.arg(0))?;
                let stat = client.stat(&path).await?;
                Ok(CommandOutput::Lines(vec![
                    format!("version\t{}", stat.version),
                    format!("numChildren\t{}", stat.num_children),
                    format!("dataLength\t{}", stat.data_length),
                ]))
            }
            CommandKind::Rm => {
                inv.expect_args(1, 2)?;
                let path = self.removable_path(&command.name, &command.args[0])?;
                let version = inv.number_arg(1)?;
                client.delete(&path, version).await?;
                Ok(CommandOutput::Nothing)
            }
            CommandKind::Rmr => {
                inv.expect_args(1, 1)?;
                let path = self.removable_path(&command.name, &command.args[0])?;
                let prompt = format!("You are going to recursively delete path {path}. Continue?");
                let answer = inv.confirm(&prompt);
                if answer.as_deref().map(str::trim) != Some(CONFIRM_TOKEN) {
                    return Ok(CommandOutput::Lines(vec![prompt]));
                }
                if !client.exists(&path).await? {
                    return Err(KeeperError::path_not_found(&path));
                }
                let removed = client.delete_recursive(&path).await?;
                tracing::info!(%path, removed, "recursively deleted");
                Ok(CommandOutput::Lines(vec![prompt]))
            }
            CommandKind::GetDirectChildrenNumber => {
                inv.expect_args(0, 1)?;
                let path = self.path_or_cwd(command.arg(0))?;
                let count = self.finder(client).direct_children_number(&path).await?;
                Ok(CommandOutput::Text(count.to_string()))
            }
            CommandKind::GetAllChildrenNumber => {
                inv.expect_args(0, 1)?;
                let path = self.path_or_cwd(command.arg(0))?;
                let count = self.finder(client).all_children_number(&path).await?;
                Ok(CommandOutput::Text(count.to_string()))
            }
            CommandKind::FindSuperNodes => {
                inv.expect_args(1, 2)?;
                let threshold = inv.number_arg(0)?.unwrap_or_default() as usize;
                let path = self.path_or_cwd(command.arg(1))?;
                let nodes = self.finder(client).super_nodes(&path, threshold).await?;
                Ok(CommandOutput::Table(nodes))
            }
            CommandKind::FindBigFamily => {
                inv.expect_args(0, 2)?;
                let path = self.path_or_cwd(command.arg(0))?;
                let limit = inv.number_arg(1)?.map(|n| n as usize);
                let family = self.finder(client).big_family(&path, limit).await?;
                Ok(CommandOutput::Table(family))
            }
            CommandKind::DeleteStaleBackups => {
                inv.expect_args(0, 0)?;
                let root = self.config.backups_root()?;
                let maintainer = BackupMaintainer::new(client, self.policy.as_ref(), root);
                let answer = inv.confirm(&maintainer.prompt());
                let report = maintainer.run(answer.as_deref()).await?;
                match report.interrupted {
                    Some(e) => {
                        inv.partial = Some(CommandOutput::Lines(report.lines));
                        Err(e)
                    }
                    None => Ok(CommandOutput::Lines(report.lines)),
                }
            }
            CommandKind::FourLetterWord => {
                inv.expect_args(1, 1)?;
                Ok(CommandOutput::Text(self.proxy.send(&command.args[0]).await?))
            }
            CommandKind::Help => Ok(CommandOutput::Lines(help_lines())),
        }
    }

    fn finder<'a>(&self, client: &'a GuardedClient) -> RankedFamilyFinder<'a> {
        RankedFamilyFinder::new(client, self.config.concurrency, self.config.sibling_order)
    }

    fn path(&self, raw: &str) -> Result<NodePath> {
        resolve(&self.session.cwd, raw)
    }

    fn path_or_cwd(&self, raw: Option<&str>) -> Result<NodePath> {
        resolve_or_cwd(&self.session.cwd, raw)
    }

    fn removable_path(&self, command: &str, raw: &str) -> Result<NodePath> {
        let path = self.path(raw)?;
        if path.is_root() {
            return Err(KeeperError::invalid_argument(command, "cannot remove the root node"));
        }
        Ok(path)
    }
}
