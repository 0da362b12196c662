//! Validation errors raised before any ranking begins.

use thiserror::Error;

/// Malformed area or sub-area records.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// An area name was empty or whitespace only.
    #[error("area name must not be empty")]
    EmptyAreaName,
    /// A sub-area name was empty or whitespace only.
    #[error("sub-area name in area '{area}' must not be empty")]
    EmptySubAreaName {
        /// Parent area name.
        area: String,
    },
    /// Two areas in one call share a name.
    #[error("duplicate area name '{name}'")]
    DuplicateArea {
        /// Offending name.
        name: String,
    },
    /// Two sub-areas of the same area share a name.
    #[error("duplicate sub-area name '{name}' in area '{area}'")]
    DuplicateSubArea {
        /// Parent area name.
        area: String,
        /// Offending name.
        name: String,
    },
}

/// Malformed priority profiles.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PriorityProfileError {
    /// More selected tags than allowed after de-duplication.
    #[error("{count} selected tags exceeds the maximum of {max}")]
    TooManySelected {
        /// Number of distinct selected tags.
        count: usize,
        /// Allowed maximum.
        max: usize,
    },
    /// More top tags than allowed after de-duplication.
    #[error("{count} top tags exceeds the maximum of {max}")]
    TooManyTop {
        /// Number of distinct top tags.
        count: usize,
        /// Allowed maximum.
        max: usize,
    },
    /// A top tag is missing from the selected list.
    #[error("top tag '{tag}' is not among the selected tags")]
    TopNotSelected {
        /// Offending tag id.
        tag: String,
    },
}
