//! CLI argument definitions for stockdash.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tui` | Interactive terminal dashboard (default) |
//! | `snapshot` | Fetch once and print the chart dataset as JSON |
//!
//! # Global Options
//!
//! | Option | Env | Default | Description |
//! |--------|-----|---------|-------------|
//! | `--base-url` | `STOCKDASH_BASE_URL` | `http://127.0.0.1:8000` | Prediction API root |
//! | `--timeout-ms` | `STOCKDASH_TIMEOUT_MS` | `10000` | Per-request timeout |
//! | `--retries` | `STOCKDASH_RETRIES` | `0` | Extra attempts for transient failures |
//! | `--log-file` | `STOCKDASH_LOG_FILE` | `stockdash.log` | Log destination while the dashboard owns the terminal |
//!
//! # Examples
//!
//! ```bash
//! stockdash
//! stockdash tui --ticker TSLA --chart line
//! stockdash snapshot MSFT --chart bar --pretty
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use stockdash_core::{ChartKind, Ticker, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};

/// Stock prediction dashboard for the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "stockdash",
    author,
    version,
    about = "Stock prediction dashboard",
    long_about = "Fetches close prices, intraday candles, and model predictions for a ticker \
from the prediction API and charts them as candlestick, line, bar, or scatter plots."
)]
pub struct Cli {
    /// Base URL of the prediction API.
    #[arg(long, global = true, env = "STOCKDASH_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in milliseconds.
    #[arg(long, global = true, env = "STOCKDASH_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Extra attempts for timeouts, refused connections, and 5xx/429 answers.
    #[arg(long, global = true, env = "STOCKDASH_RETRIES", default_value_t = 0)]
    pub retries: u32,

    /// Log file used while the dashboard owns the terminal.
    #[arg(long, global = true, env = "STOCKDASH_LOG_FILE", default_value = "stockdash.log")]
    pub log_file: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Subcommand to run; a bare `stockdash` opens the dashboard.
    pub fn command_or_default(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Tui(TuiArgs::default()))
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Open the interactive dashboard.
    ///
    /// Keys: t/T next/previous ticker, 1-5 pick ticker, c next chart kind,
    /// left/right pan, +/- zoom, 0 reset zoom, q quit.
    Tui(TuiArgs),

    /// Fetch all three endpoints once and print the chart dataset as JSON.
    ///
    /// # Examples
    ///
    ///   stockdash snapshot AAPL
    ///   stockdash snapshot TSLA --chart line --pretty
    Snapshot(SnapshotArgs),
}

#[derive(Debug, Clone, Args)]
pub struct TuiArgs {
    /// Ticker selected at startup.
    #[arg(long, default_value = "AAPL", value_parser = parse_ticker)]
    pub ticker: Ticker,

    /// Chart kind selected at startup.
    #[arg(long, default_value = "candlestick", value_parser = parse_chart_kind)]
    pub chart: ChartKind,
}

impl Default for TuiArgs {
    fn default() -> Self {
        Self {
            ticker: Ticker::default(),
            chart: ChartKind::default(),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct SnapshotArgs {
    /// Ticker to fetch (AAPL, GOOGL, MSFT, AMZN, TSLA).
    #[arg(value_parser = parse_ticker)]
    pub ticker: Ticker,

    /// Chart kind whose dataset is printed.
    #[arg(long, default_value = "candlestick", value_parser = parse_chart_kind)]
    pub chart: ChartKind,

    /// Pretty-print JSON output with indentation.
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
}

fn parse_ticker(value: &str) -> Result<Ticker, String> {
    Ticker::parse(value).map_err(|error| error.to_string())
}

fn parse_chart_kind(value: &str) -> Result<ChartKind, String> {
    value.parse().map_err(|error: stockdash_core::ValidationError| error.to_string())
}
