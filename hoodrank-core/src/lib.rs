//! Core domain types for the hoodrank engine.
//!
//! The crate models the inputs of a ranking call and the building blocks
//! shared by every scorer:
//! - **Records**: [`Area`] and [`SubArea`] carry raw metrics, tag ids and
//!   per-tag [`Confidence`]. Malformed names are rejected up front by
//!   [`validate_areas`].
//! - **Metrics**: [`RawMetrics`] read missing or non-numeric values as zero;
//!   [`DerivedMetric`] formulas are evaluated lazily through [`MetricKey`].
//! - **Tags**: the [`TagRegistry`] maps tag ids to [`TagDefinition`]s with
//!   their signals, dimension affinities, nudges and premium flag.
//! - **Distributions**: sibling values per metric and the mid-rank
//!   percentile used everywhere.
//! - **Affinity**: the [`AffinityScorer`] trait and its standard
//!   [`PercentileAffinity`] implementation.
//! - **Priorities**: the user's validated [`PriorityProfile`].
//!
//! Nothing here performs I/O. Every function is deterministic.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod affinity;
mod dimension;
mod distribution;
mod error;
pub mod metric;
mod priority;
mod record;
mod registry;
mod tag;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use affinity::{
    Affinity, AffinityScorer, PercentileAffinity, SignalTrace, TagAffinity, apply_confidence,
    resolve_tag_affinity,
};
pub use dimension::Dimension;
pub use distribution::{Distribution, Distributions, NEUTRAL_PERCENTILE};
pub use error::{PriorityProfileError, RecordError};
pub use metric::{DerivedMetric, MetricKey, RawMetrics};
pub use priority::{MAX_SELECTED_TAGS, MAX_TOP_TAGS, PriorityProfile, Tier};
pub use record::{
    Area, Confidence, MetricRecord, SubArea, TagConfidence, validate_areas, validate_sub_areas,
};
pub use registry::TagRegistry;
pub use tag::{Direction, Nudge, Scope, Signal, TagDefinition, TagScope};
