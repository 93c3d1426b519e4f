//! CLI argument definitions for cambio.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `convert` | Convert an amount between two currencies |
//! | `rates` | Show current rates for a base currency |
//! | `history` | Show a historical rate series for a pair |
//! | `log` | Show or clear stored conversion history |
//! | `currencies` | List the common currency codes |
//! | `interactive` | Interactive conversion loop |
//!
//! # Examples
//!
//! ```bash
//! cambio convert 100 USD EUR
//! cambio convert 250 gbp jpy --date 2026-07-01
//! cambio rates EUR
//! cambio history USD EUR --days 14 --format json
//! cambio log --limit 5
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Currency conversion CLI with cached rate resolution.
///
/// Rates come from exchangerate-api.com; each observed rate is cached for
/// the day and reused as a fallback when the source is unreachable.
#[derive(Debug, Parser)]
#[command(
    name = "cambio",
    author,
    version,
    about = "Currency conversion CLI with cached rate resolution"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Serve deterministic offline rates instead of calling the live API.
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert an amount between two currencies.
    Convert(ConvertArgs),
    /// Show current rates for a base currency against the common set.
    Rates(RatesArgs),
    /// Show a historical rate series for a currency pair.
    History(HistoryArgs),
    /// Show or clear stored conversion history.
    Log(LogArgs),
    /// List the common currency codes.
    Currencies,
    /// Interactive conversion loop.
    Interactive,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Amount to convert, in the source currency.
    pub amount: f64,

    /// Source currency code (e.g. USD).
    pub from: String,

    /// Target currency code (e.g. EUR).
    pub to: String,

    /// Convert at a past day's rate (YYYY-MM-DD) instead of the latest.
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, Args)]
pub struct RatesArgs {
    /// Base currency code.
    #[arg(default_value = "USD")]
    pub base: String,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Base currency code.
    pub from: String,

    /// Quote currency code.
    pub to: String,

    /// Lookback window in days (1..=365).
    #[arg(long, default_value_t = 30)]
    pub days: u32,
}

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Maximum number of records to show.
    #[arg(long, default_value_t = 10)]
    pub limit: usize,

    /// Clear all stored conversion history instead of showing it.
    #[arg(long, default_value_t = false)]
    pub clear: bool,
}
