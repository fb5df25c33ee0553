//! `oss-list`: inventory a project's third-party dependencies and export a
//! numbered license report.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and load config ([`config::load_config`]).
//! 2. Detect `package.json` or `go.mod` ([`detector`]) and parse it ([`manifest`]).
//! 3. Resolve every dependency's license against its registry pages
//!    ([`resolver`]), a bounded number at a time ([`pipeline`]).
//! 4. Number the results in manifest order and write the report ([`report`]).
//! 5. Print the output path and optionally open the project directory.

mod cli;
mod config;
mod detector;
mod error;
mod manifest;
mod models;
mod pipeline;
mod report;
mod resolver;

use std::future::Future;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::load_config;
use pipeline::Pipeline;
use report::write_report;
use resolver::fetch::HttpFetcher;
use resolver::rate_limit::IntervalGate;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "warn,oss_list=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    // Resolve project path
    let path = cli
        .path
        .canonicalize()
        .unwrap_or_else(|_| cli.path.clone());

    let config = load_config(&path, cli.config.as_deref())?.merge_cli(&cli);

    let limiter = Arc::new(IntervalGate::new(config.resolver.delay()));
    let fetcher = HttpFetcher::new(config.resolver.timeout(), &config.resolver.user_agent, limiter)
        .context("failed to build HTTP client")?;
    let pipeline = Pipeline::new(
        Arc::new(fetcher),
        config.resolver.concurrency,
        config.manifest.include_dev_dependencies,
    );

    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if watch_interrupts(tokio::signal::ctrl_c, cancel_tx).await {
            eprintln!("  {} interrupted again, exiting", "✗".red());
            std::process::exit(130);
        }
    });

    let pb = if !cli.quiet {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let inventory = pipeline.run(&path, &cancel_rx, pb.as_ref()).await?;

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    if !cli.quiet {
        eprintln!(
            "  {} {} {} dependencies ({})",
            "→".cyan(),
            inventory.ecosystem,
            inventory.entries.len(),
            inventory.manifest.display()
        );
    }
    if inventory.cancelled {
        eprintln!(
            "  {} interrupted; unresolved dependencies are listed as unknown",
            "⚠".yellow()
        );
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| path.join(config.report.file_name()));
    write_report(&inventory.entries, config.report.format, config.report.locale, &output)?;

    if cli.quiet {
        println!("{}", output.display());
    } else {
        report::terminal::render(&inventory.entries, inventory.ecosystem, &output, cli.verbose);
    }

    if cli.open {
        open_directory(&path);
    }

    Ok(())
}

/// The first interrupt asks the pipeline to stop starting new lookups.
/// Returns `true` once a second interrupt arrives.
async fn watch_interrupts<F, Fut>(mut interrupt: F, cancel: watch::Sender<bool>) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    if interrupt().await.is_err() {
        return false;
    }
    let _ = cancel.send(true);
    tracing::info!("interrupt received; finishing in-flight lookups");

    interrupt().await.is_ok()
}

/// Open `dir` in the platform file browser without waiting for it.
fn open_directory(dir: &Path) {
    let program = if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };

    if let Err(e) = std::process::Command::new(program).arg(dir).spawn() {
        tracing::warn!(program, error = %e, "could not open output directory");
    }
}
