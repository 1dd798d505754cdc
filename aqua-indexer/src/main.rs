use std::env;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use dotenv::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use aqua_indexer::{Cli, Dependencies, Settings};
use aqua_indexer_pipeline::{RunReport, RunState};

/// Exit code for runs that could not be set up.
const SETUP_FAILURE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(report) => {
            println!("{}", report.summary);
            print_status(&report);
            ExitCode::from(report.exit_code())
        }
        Err(e) => {
            error!("Indexer failed to start: {}", e);
            eprintln!("\n{} {}", "Error:".red().bold(), e);

            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("  Caused by: {}", err);
                source = err.source();
            }

            ExitCode::from(SETUP_FAILURE)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn run(cli: Cli) -> Result<RunReport> {
    let settings = Settings::from_cli(&cli).context("Invalid configuration")?;
    let Dependencies { mut orchestrator } =
        Dependencies::new(settings).context("Failed to initialize dependencies")?;

    let shutdown = orchestrator.shutdown_signal();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing in-flight requests");
            shutdown.trigger();
        }
    });

    info!("Aqua indexer starting");
    let report = orchestrator.run().await;
    info!(state = ?report.state, exit_code = report.exit_code(), "Aqua indexer finished");

    Ok(report)
}

fn print_status(report: &RunReport) {
    let tally = &report.tally;
    match report.state {
        RunState::Completed if tally.is_clean() => {
            println!("{} {} rows indexed", "OK".green().bold(), tally.succeeded);
        }
        RunState::Completed => {
            println!(
                "{} {} of {} rows failed",
                "FAILED".yellow().bold(),
                tally.failed,
                tally.attempted
            );
        }
        RunState::Cancelled => {
            println!(
                "{} cancelled after {} rows",
                "CANCELLED".yellow().bold(),
                tally.attempted
            );
        }
        _ => {
            let cause = report
                .error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_default();
            println!("{} {}", "ABORTED".red().bold(), cause);
        }
    }
}
