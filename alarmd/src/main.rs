/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use tokio::io::BufReader;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use alarmd::alarm::Clock;
use alarmd::config::AlarmConfig;
use alarmd::error::FatalError;
use alarmd::intake::Intake;
use alarmd::store::SharedAlarmStore;
use alarmd::worker::{SchedulerWorker, StdoutSink};

// ── CLI argument definition ───────────────────────────────────────────────────

/// alarmd – fire a message after N seconds.
///
/// Reads `<seconds> <message>` lines from stdin and prints
/// `(<seconds>) <message>` when each alarm is due.  Exits at end of input.
///
/// Example:
///   echo "2 tea is ready" | alarmd --no-prompt
#[derive(Debug, Parser)]
#[command(
    name = "alarmd",
    about = "Single-process alarm scheduler",
    long_about = None,
)]
struct Cli {
    /// Path to an optional YAML configuration file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Seconds the worker waits before re-checking an empty store.
    #[arg(short = 'p', long = "poll-interval")]
    poll_interval: Option<u64>,

    /// Do not print the interactive prompt.
    #[arg(long = "no-prompt", default_value_t = false)]
    no_prompt: bool,
}

impl Cli {
    fn resolve_config(&self) -> Result<AlarmConfig> {
        let base = match &self.config {
            Some(path) => AlarmConfig::load_from_file(path)?,
            None => AlarmConfig::default(),
        };
        let prompt = self.no_prompt.then(String::new);
        base.with_overrides(self.poll_interval, prompt)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Initialise structured logging on stderr; stdout carries prompts and
    // fired alarms only.  Level is controlled by RUST_LOG (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match cli.resolve_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            process::exit(1);
        }
    };

    info!(
        poll_interval_secs = config.poll_interval.as_secs(),
        prompt = ?config.prompt,
        config_file = ?cli.config,
        "alarmd starting up"
    );

    let store = SharedAlarmStore::new();
    let clock = Clock::start();

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let mut worker =
        SchedulerWorker::new(store.clone(), clock, StdoutSink, config.poll_interval)
            .spawn(shutdown_rx);

    let intake = Intake::new(store.clone(), clock, config.prompt);
    let stdin = BufReader::new(tokio::io::stdin());

    let outcome: Result<(), FatalError> = tokio::select! {
        res = intake.run(stdin) => res.map(|summary| {
            info!(
                accepted = summary.accepted,
                rejected = summary.rejected,
                "end of input, shutting down"
            );
        }),
        joined = &mut worker => Err(match joined {
            Ok(Ok(())) => FatalError::WorkerPanicked("worker exited before end of input".into()),
            Ok(Err(e)) => e,
            Err(e) => FatalError::WorkerPanicked(e.to_string()),
        }),
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
            Ok(())
        }
    };

    if let Err(e) = outcome {
        error!(error = %e, "fatal error");
        eprintln!("alarmd: {e}");
        process::exit(1);
    }

    let _ = shutdown_tx.send(());
    match worker.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "worker failed during shutdown"),
        Err(e) => warn!(error = %e, "worker task did not stop cleanly"),
    }

    if let Ok(pending) = store.len() {
        if pending > 0 {
            info!(pending, "discarding unfired alarms");
        }
    }

    // stdin may still have a blocking read in flight after Ctrl+C; exit
    // explicitly rather than waiting for the runtime to drain it.
    process::exit(0);
}
