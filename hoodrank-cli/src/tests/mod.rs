//! Shared test harness modules for the hoodrank CLI.
#![expect(
    clippy::panic,
    clippy::expect_used,
    reason = "Tests assert panic branches and fail fast when setup breaks"
)]

use super::*;
use crate::rank::{
    RankConfig, ScoringOverrides, config_from_layers_for_test, load_rank_request, run_rank_with,
};

mod helpers;
mod rank_steps;
