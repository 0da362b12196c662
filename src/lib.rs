//! Facade crate for the hoodrank neighbourhood ranking engine.
//!
//! This crate re-exports the core domain types and, behind the default
//! `scorer` feature, the rankers that order areas and pick sub-areas.

#![forbid(unsafe_code)]

pub use hoodrank_core::{
    Affinity, AffinityScorer, Area, Confidence, DerivedMetric, Dimension, Distributions,
    MetricKey, PercentileAffinity, PriorityProfile, PriorityProfileError, RawMetrics,
    RecordError, SubArea, TagDefinition, TagRegistry,
};

#[cfg(feature = "scorer")]
pub use hoodrank_scorer::{
    AreaRanker, AreaRanking, Budget, ConfigError, DimensionScore, RankError, RankedArea,
    ScoringConfig, Shortlist, ShortlistOptions, Shortlister, SubAreaRanker, SubAreaSelection,
    TenureMode,
};
