//! Rank command implementation for the hoodrank CLI.

use std::io::{self, BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use clap::Parser;
use hoodrank_core::TagRegistry;
use hoodrank_scorer::{ScoringConfig, Shortlist, ShortlistOptions, Shortlister};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_RANK_DIVERSITY, ARG_RANK_REQUEST, ARG_RANK_SUB_AREA_LIMIT, ARG_RANK_SWAP_OVERALL_GAP,
    ARG_RANK_SWAP_PROFILE_EPSILON, ARG_RANK_TOP_AREAS, CliError, ENV_RANK_REQUEST, RankRequest,
};

/// CLI arguments for the `rank` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Rank the areas in a JSON request against its priority \
                 profile and budget, then shortlist sub-areas inside the \
                 leading areas. Shortlist sizes and reconciliation \
                 thresholds can come from CLI flags, configuration files, \
                 or environment variables.",
    about = "Rank areas and shortlist their sub-areas"
)]
#[ortho_config(prefix = "HOODRANK")]
pub(crate) struct RankArgs {
    /// Path to a JSON file containing a rank request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Number of leading areas whose sub-areas are shortlisted.
    #[arg(long = ARG_RANK_TOP_AREAS, value_name = "count")]
    #[serde(default)]
    pub(crate) top_areas: Option<usize>,
    /// Number of sub-areas picked per area.
    #[arg(long = ARG_RANK_SUB_AREA_LIMIT, value_name = "count")]
    #[serde(default)]
    pub(crate) sub_area_limit: Option<usize>,
    /// Overall gap at which a lower area may overtake its neighbour.
    #[arg(long = ARG_RANK_SWAP_OVERALL_GAP, value_name = "gap")]
    #[serde(default)]
    pub(crate) swap_overall_gap: Option<u8>,
    /// Largest profile lead an Overall swap may overturn.
    #[arg(long = ARG_RANK_SWAP_PROFILE_EPSILON, value_name = "epsilon")]
    #[serde(default)]
    pub(crate) swap_profile_epsilon: Option<f64>,
    /// Penalise sub-area picks that repeat the leader's strongest tags.
    #[arg(long = ARG_RANK_DIVERSITY, value_name = "bool")]
    #[serde(default)]
    pub(crate) diversity: Option<bool>,
}

impl RankArgs {
    pub(crate) fn into_config(self) -> Result<RankConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RankConfig::try_from(merged)
    }
}

/// Scoring values the command line may override.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct ScoringOverrides {
    pub(crate) overall_gap: Option<u8>,
    pub(crate) profile_epsilon: Option<f64>,
    pub(crate) diversity: Option<bool>,
}

impl ScoringOverrides {
    /// Layer these overrides over the request's configuration.
    pub(crate) const fn apply(self, mut config: ScoringConfig) -> ScoringConfig {
        if let Some(gap) = self.overall_gap {
            config.reconcile.overall_gap = gap;
        }
        if let Some(epsilon) = self.profile_epsilon {
            config.reconcile.profile_epsilon = epsilon;
        }
        if let Some(enabled) = self.diversity {
            config.diversity.enabled = enabled;
        }
        config
    }
}

/// Resolved `rank` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RankConfig {
    /// Path to the JSON request file.
    pub(crate) request_path: Utf8PathBuf,
    /// Shortlist sizes.
    pub(crate) options: ShortlistOptions,
    /// Scoring overrides.
    pub(crate) overrides: ScoringOverrides,
}

impl RankConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.request_path, ARG_RANK_REQUEST)
    }
}

impl TryFrom<RankArgs> for RankConfig {
    type Error = CliError;

    fn try_from(args: RankArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_RANK_REQUEST,
            env: ENV_RANK_REQUEST,
        })?;
        let defaults = ShortlistOptions::default();
        Ok(Self {
            request_path,
            options: ShortlistOptions {
                top_areas: args.top_areas.unwrap_or(defaults.top_areas),
                sub_area_limit: args.sub_area_limit.unwrap_or(defaults.sub_area_limit),
            },
            overrides: ScoringOverrides {
                overall_gap: args.swap_overall_gap,
                profile_epsilon: args.swap_profile_epsilon,
                diversity: args.diversity,
            },
        })
    }
}

fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Whether `path` exists and is a regular file, checked through its parent
/// directory capability.
fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "path has no file name"))?;
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.metadata(name).map(|meta| meta.is_file())
}

pub(super) fn run_rank(args: RankArgs) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    run_rank_with(args, &mut stdout)
}

pub(super) fn run_rank_with(args: RankArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let shortlist = execute_rank(args)?;
    write_shortlist(writer, &shortlist)
}

fn execute_rank(args: RankArgs) -> Result<Shortlist, CliError> {
    let config = resolve_rank_config(args)?;
    let request = load_rank_request(&config.request_path)?;
    let scoring = config
        .overrides
        .apply(request.config.unwrap_or_default());
    let shortlister = Shortlister::new(TagRegistry::standard(), scoring, config.options)?;
    let budget = request.budget.resolve();
    tracing::debug!(
        areas = request.areas.len(),
        selected = request.priorities.selected().len(),
        budget = ?budget,
        "ranking request"
    );
    let shortlist = shortlister.shortlist(&request.areas, &request.priorities, budget.as_ref())?;
    tracing::info!(
        areas = shortlist.ranking.areas.len(),
        swaps = shortlist.ranking.reconcile.swaps,
        "ranked areas"
    );
    Ok(shortlist)
}

fn resolve_rank_config(args: RankArgs) -> Result<RankConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

/// Loads a JSON-encoded [`RankRequest`] from disk.
pub(super) fn load_rank_request(path: &Utf8Path) -> Result<RankRequest, CliError> {
    let file = fs_utf8::File::open_ambient(path, ambient_authority()).map_err(|source| {
        CliError::OpenRankRequest {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|source| CliError::ParseRankRequest {
        path: path.to_path_buf(),
        source,
    })
}

fn write_shortlist(writer: &mut dyn Write, shortlist: &Shortlist) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(shortlist).map_err(CliError::SerialiseShortlist)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RankConfig, CliError> {
    let merged = RankArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RankConfig::try_from(merged)
}
