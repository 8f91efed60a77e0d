//! Cleanup of stale backup records.
//!
//! A backup is a direct child of the backups root. Its `stage` child holds
//! liveness markers; a backup without live markers (or without `stage` at
//! all) is abandoned and gets deleted after the user confirms.

use crate::error::{KeeperError, Result};
use crate::liveness::LivenessPolicy;
use crate::namespace::NamespaceClient;
use crate::path::NodePath;

/// The only answer that lets the cleanup proceed.
pub const CONFIRM_TOKEN: &str = "y";

/// Default location of backup records.
pub const DEFAULT_BACKUPS_ROOT: &str = "/clickhouse/backups";

const STAGE_NODE: &str = "stage";

/// Outcome of one cleanup run.
#[derive(Debug, Default)]
pub struct BackupReport {
    /// Human-readable status lines, prompt first
    pub lines: Vec<String>,
    pub declined: bool,
    /// Candidates this run actually removed
    pub deleted: usize,
    pub failures: Vec<(NodePath, KeeperError)>,
    /// Error that stopped the run early; candidates after it were not touched
    pub interrupted: Option<KeeperError>,
}

pub struct BackupMaintainer<'a> {
    client: &'a dyn NamespaceClient,
    policy: &'a dyn LivenessPolicy,
    root: NodePath,
}

impl<'a> BackupMaintainer<'a> {
    pub fn new(
        client: &'a dyn NamespaceClient,
        policy: &'a dyn LivenessPolicy,
        root: NodePath,
    ) -> Self {
        Self {
            client,
            policy,
            root,
        }
    }

    pub fn prompt(&self) -> String {
        format!(
            "You are going to delete all inactive backups in {}. Continue?",
            self.root
        )
    }

    /// Runs the whole workflow with the user's `answer` to [`Self::prompt`].
    ///
    /// Anything but [`CONFIRM_TOKEN`] declines without touching the namespace.
    /// Deletes are issued one candidate at a time; a failed delete is
    /// reported and skipped. Cancellation or a lost connection stops the run:
    /// the report keeps what was done so far and carries the error in
    /// [`BackupReport::interrupted`].
    ///
    /// # Errors
    ///
    /// `BackupRootNotFound` if the root is missing, or any error from listing
    /// it. Nothing has been deleted in either case.
    pub async fn run(&self, answer: Option<&str>) -> Result<BackupReport> {
        let mut report = BackupReport {
            lines: vec![self.prompt()],
            ..Default::default()
        };

        if answer.map(str::trim) != Some(CONFIRM_TOKEN) {
            tracing::debug!(root = %self.root, "backup cleanup declined");
            report.declined = true;
            return Ok(report);
        }

        let candidates = match self.client.children(&self.root).await {
            Ok(names) => names,
            Err(e) if e.is_not_found() => {
                return Err(KeeperError::backup_root_not_found(&self.root));
            }
            Err(e) => return Err(e),
        };

        for name in candidates {
            let backup = self.root.child(&name)?;
            if let Err(e) = self.process(&backup, &mut report).await {
                tracing::warn!(%backup, error = %e, "backup cleanup interrupted");
                report.interrupted = Some(e);
                break;
            }
        }

        report
            .lines
            .push(format!("Deleted {} inactive backup(s)", report.deleted));
        Ok(report)
    }

    /// Checks and, if inactive, deletes one candidate. Only errors that stop
    /// the whole workflow are returned.
    async fn process(&self, backup: &NodePath, report: &mut BackupReport) -> Result<()> {
        report
            .lines
            .push(format!("Found backup \"{backup}\", checking if it's active"));

        let active = match self.classify(backup).await {
            Ok(active) => active,
            Err(e) if e.stops_workflow() => return Err(e),
            Err(e) => {
                tracing::warn!(%backup, error = %e, "could not check backup");
                report
                    .lines
                    .push(format!("Failed to check backup \"{backup}\": {e}"));
                report.failures.push((backup.clone(), e));
                return Ok(());
            }
        };

        if active {
            report
                .lines
                .push(format!("Backup \"{backup}\" is active, not going to delete"));
            return Ok(());
        }

        report
            .lines
            .push(format!("Backup \"{backup}\" is not active, deleting it"));
        match self.client.delete_recursive(backup).await {
            Ok(0) => {
                tracing::debug!(%backup, "backup vanished before it could be deleted");
            }
            Ok(removed) => {
                tracing::info!(%backup, removed, "deleted inactive backup");
                report.deleted += 1;
            }
            Err(e) if e.stops_workflow() => return Err(e),
            Err(e) => {
                tracing::warn!(%backup, error = %e, "failed to delete backup");
                report
                    .lines
                    .push(format!("Failed to delete backup \"{backup}\": {e}"));
                report.failures.push((backup.clone(), e));
            }
        }
        Ok(())
    }

    /// A missing `stage` node marks the record as abandoned.
    async fn classify(&self, backup: &NodePath) -> Result<bool> {
        let stage = backup.child(STAGE_NODE)?;
        match self.client.children(&stage).await {
            Ok(markers) => Ok(self.policy.is_active(backup, &markers)),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
