//! CLI argument definitions for quotefall.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `price` | Fetch the current price quote for a ticker |
//! | `info`  | Fetch the merged quote-plus-profile record |
//! | `cache` | Manage the in-process quote cache |

use clap::{Args, Parser, Subcommand};

/// quotefall - multi-source ticker quote aggregator
///
/// Resolves a ticker against several market-data providers in priority
/// order (gold spot rates, polygon.io aggregates, Yahoo Finance as the
/// universal fallback), with a short-lived in-memory cache in front of
/// the chain. The polygon.io source is used only when
/// QUOTEFALL_POLYGON_API_KEY is set.
#[derive(Debug, Parser)]
#[command(name = "quotefall", version, about = "Multi-source ticker quote aggregator")]
pub struct Cli {
    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the current price quote for a ticker.
    Price(PriceArgs),
    /// Fetch the full quote-plus-profile record for a ticker.
    Info(InfoArgs),
    /// Manage the in-process quote cache.
    Cache(CacheArgs),
}

#[derive(Debug, Args)]
pub struct PriceArgs {
    /// Ticker symbol or alias (e.g. AAPL, gold).
    pub ticker: String,

    /// Print only the bare price, as plain text.
    #[arg(long, default_value_t = false)]
    pub plain: bool,
}

#[derive(Debug, Args)]
pub struct InfoArgs {
    /// Ticker symbol or alias (e.g. AAPL, gold).
    pub ticker: String,
}

#[derive(Debug, Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommand,
}

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Drop every cached quote and info record.
    Clear,
}
