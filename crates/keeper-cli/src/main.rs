use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;

use keeper_core::command::{AnswerSource, CommandReport, Dispatcher, NoAnswers};
use keeper_core::four_letter::FourLetterWordProxy;
use keeper_core::liveness::MarkerPrefixPolicy;
use keeper_infrastructure::{KeeperPaths, MemoryNamespace, SnapshotStorage, TcpProbeChannel};

mod args;
mod output;
mod repl;

use args::Cli;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

/// Executes one input line; Ctrl-C cancels whatever remote call is in flight.
pub(crate) async fn run_cancellable(
    dispatcher: &mut Dispatcher,
    input: &str,
    answers: &mut dyn AnswerSource,
) -> Vec<CommandReport> {
    let cancel = CancellationToken::new();
    let watcher = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupted, cancelling");
                cancel.cancel();
            }
        })
    };
    let reports = dispatcher.execute(input, answers, cancel).await;
    watcher.abort();
    reports
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.load_config()?;
    tracing::debug!(?config, "effective configuration");

    let namespace = Arc::new(match &cli.snapshot {
        Some(path) => SnapshotStorage::new(path).load()?,
        None => MemoryNamespace::new(),
    });
    let proxy = FourLetterWordProxy::new(Arc::new(TcpProbeChannel::new(
        config.endpoint(),
        config.timeout(),
    )));
    let policy = Arc::new(MarkerPrefixPolicy::new(config.alive_marker_prefix.clone()));
    let history_file = match &config.history_file {
        Some(path) => Some(path.clone()),
        None => KeeperPaths::history_file().ok(),
    };
    let mut dispatcher = Dispatcher::new(namespace.clone(), proxy, policy, config);

    let succeeded = match &cli.query {
        Some(query) => {
            let reports = run_cancellable(&mut dispatcher, query, &mut NoAnswers).await;
            output::print_reports(&reports, false)
        }
        None => {
            repl::run(&mut dispatcher, history_file).await?;
            true
        }
    };

    if cli.persist {
        if let Some(path) = &cli.snapshot {
            SnapshotStorage::new(path).save(&namespace)?;
        }
    }

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
