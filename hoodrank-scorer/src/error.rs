//! Error types raised while configuring scorers or ranking areas.

use hoodrank_core::RecordError;
use thiserror::Error;

/// Invalid [`ScoringConfig`](crate::ScoringConfig) values.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// A value is not finite or lies outside its allowed range.
    #[error("{field} = {value} is out of range")]
    OutOfRange {
        /// Dotted configuration path.
        field: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// Thresholds that must ascend do not.
    #[error("{field} thresholds must be in ascending order")]
    Unordered {
        /// Configuration group.
        field: &'static str,
    },
    /// Reconciliation would swap areas with equal Overall ratings.
    #[error("reconcile.overall_gap must be at least 1")]
    ZeroOverallGap,
    /// Diversity compares no tags.
    #[error("diversity.top_tags must be at least 1")]
    NoDiversityTags,
}

/// Errors raised before ranking begins.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RankError {
    /// An input record is malformed.
    #[error(transparent)]
    Record(#[from] RecordError),
    /// The scoring configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
