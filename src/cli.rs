use std::path::PathBuf;

use clap::Parser;

use crate::report::{Locale, ReportFormat};

#[derive(Parser, Debug)]
#[command(
    name = "oss-list",
    about = "List a project's third-party dependencies with their licenses",
    version
)]
pub struct Cli {
    /// Project directory containing package.json or go.mod
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Config file [default: ./.oss-list/config.toml, fallback ~/.config/oss-list/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report path [default: <PATH>/oss_list.csv]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Report format
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<ReportFormat>,

    /// Language of the report headers
    #[arg(long, value_name = "LOCALE")]
    pub locale: Option<Locale>,

    /// Dependencies resolved at the same time
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Minimum delay between requests to the same host, in milliseconds
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Per-request timeout, in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Also list devDependencies from package.json
    #[arg(long)]
    pub include_dev: bool,

    /// Open the project directory in the file browser when done
    #[arg(long)]
    pub open: bool,

    /// Show every dependency in the summary and enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print the report path
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
