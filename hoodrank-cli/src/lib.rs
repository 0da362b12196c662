//! Command-line interface for ranking neighbourhoods with hoodrank.
//!
//! `hoodrank rank <request.json>` reads areas, priorities and budget answers
//! from a JSON request, ranks the areas, picks sub-areas inside the leading
//! ones, and prints the shortlist as pretty JSON. Shortlist sizes and
//! reconciliation thresholds can be layered from CLI flags, `HOODRANK_*`
//! environment variables and configuration files.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

mod error;
mod rank;
mod request;

pub use error::CliError;
pub use request::{BudgetAnswers, RankRequest};

use rank::{RankArgs, run_rank};

pub(crate) const ARG_RANK_REQUEST: &str = "request";
pub(crate) const ARG_RANK_TOP_AREAS: &str = "top-areas";
pub(crate) const ARG_RANK_SUB_AREA_LIMIT: &str = "sub-area-limit";
pub(crate) const ARG_RANK_SWAP_OVERALL_GAP: &str = "swap-overall-gap";
pub(crate) const ARG_RANK_SWAP_PROFILE_EPSILON: &str = "swap-profile-epsilon";
pub(crate) const ARG_RANK_DIVERSITY: &str = "diversity";
pub(crate) const ENV_RANK_REQUEST: &str = "HOODRANK_CMDS_RANK_REQUEST_PATH";

/// Default log filter when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "warn";

/// Run the hoodrank CLI with the current process arguments and environment.
///
/// # Errors
/// Returns a [`CliError`] when arguments, configuration, the request file or
/// the ranking itself are invalid, or when output cannot be written.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Rank(args) => run_rank(args),
    }
}

/// Install a stderr `tracing` subscriber filtered by `RUST_LOG`.
///
/// Library crates log through `log`; the subscriber forwards those records
/// too.
///
/// # Errors
/// Returns [`TryInitError`] when a global subscriber is already installed.
pub fn init_logging() -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
        .try_init()
}

#[derive(Debug, Parser)]
#[command(
    name = "hoodrank",
    about = "Rank neighbourhoods against a priority profile",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank the areas in a JSON request and shortlist their sub-areas.
    Rank(RankArgs),
}

#[cfg(test)]
mod tests;
