//! Area and sub-area records supplied by callers.
//!
//! Records are plain data: a name, raw metrics, the tag ids a city pack
//! assigned, and an optional per-tag confidence label. Constructors validate
//! names; deserialized records are checked with [`Area::validate`] before any
//! ranking runs.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{RawMetrics, RecordError};

/// Confidence a city pack attaches to one of a record's tags.
///
/// # Examples
/// ```
/// use hoodrank_core::Confidence;
///
/// assert_eq!(" High ".parse::<Confidence>(), Ok(Confidence::High));
/// assert_eq!(Confidence::Low.as_str(), "low");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Strong evidence for the tag.
    High,
    /// Some evidence for the tag.
    Medium,
    /// Weak evidence for the tag.
    Low,
}

impl Confidence {
    /// Return the lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Multiplier applied to an affinity carrying this confidence.
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::High => 1.08,
            Self::Medium => 1.03,
            Self::Low => 0.97,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(format!("unknown confidence '{s}'")),
        }
    }
}

/// Per-tag confidence labels for one record.
///
/// Unknown labels are dropped on input so they behave like an absent entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagConfidence {
    labels: BTreeMap<String, Confidence>,
}

impl TagConfidence {
    /// Construct an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the confidence for `tag`.
    pub fn insert(&mut self, tag: impl Into<String>, confidence: Confidence) {
        self.labels.insert(tag.into(), confidence);
    }

    /// Return the confidence recorded for `tag`, if any.
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<Confidence> {
        self.labels.get(tag).copied()
    }

    /// Multiplier for `tag`; `1.0` when no confidence is recorded.
    #[must_use]
    pub fn multiplier(&self, tag: &str) -> f64 {
        self.get(tag).map_or(1.0, Confidence::multiplier)
    }

    /// Report whether no confidence is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Loosely typed confidence label accepted on input.
#[derive(Deserialize)]
#[serde(untagged)]
enum ConfidenceLabel {
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl ConfidenceLabel {
    fn into_confidence(self) -> Option<Confidence> {
        match self {
            Self::Text(label) => label.parse().ok(),
            Self::Other(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for TagConfidence {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = BTreeMap::<String, ConfidenceLabel>::deserialize(deserializer)?;
        let labels = raw
            .into_iter()
            .filter_map(|(tag, label)| label.into_confidence().map(|confidence| (tag, confidence)))
            .collect();
        Ok(Self { labels })
    }
}

/// Read access shared by areas and sub-areas.
///
/// Scorers accept any record through this trait so the same affinity code
/// runs at both scopes.
pub trait MetricRecord {
    /// Display name, unique among siblings.
    fn name(&self) -> &str;
    /// Raw metric values.
    fn metrics(&self) -> &RawMetrics;
    /// Tag ids assigned to the record.
    fn tags(&self) -> &[String];
    /// Per-tag confidence labels.
    fn confidence(&self) -> &TagConfidence;
}

/// A sub-area ("microhood") nested in an [`Area`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubArea {
    /// Display name, unique within the parent area.
    pub name: String,
    /// Raw metric values.
    #[serde(default)]
    pub metrics: RawMetrics,
    /// Assigned tag ids.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Per-tag confidence labels.
    #[serde(default)]
    pub tag_confidence: TagConfidence,
}

impl SubArea {
    /// Create a sub-area with no metrics or tags.
    ///
    /// # Errors
    /// Returns [`RecordError::EmptySubAreaName`] when `name` is blank.
    pub fn new(name: impl Into<String>) -> Result<Self, RecordError> {
        let sub_area = Self {
            name: name.into(),
            ..Self::default()
        };
        if sub_area.name.trim().is_empty() {
            return Err(RecordError::EmptySubAreaName {
                area: String::new(),
            });
        }
        Ok(sub_area)
    }

    /// Replace the metrics.
    #[must_use]
    pub fn with_metrics(mut self, metrics: RawMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Append a tag id.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Append a tag id with a confidence label.
    #[must_use]
    pub fn with_confident_tag(mut self, tag: impl Into<String>, confidence: Confidence) -> Self {
        let tag = tag.into();
        self.tag_confidence.insert(tag.clone(), confidence);
        self.tags.push(tag);
        self
    }
}

impl MetricRecord for SubArea {
    fn name(&self) -> &str {
        &self.name
    }

    fn metrics(&self) -> &RawMetrics {
        &self.metrics
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn confidence(&self) -> &TagConfidence {
        &self.tag_confidence
    }
}

/// A candidate area, optionally carrying sub-areas.
///
/// # Examples
/// ```
/// use hoodrank_core::{Area, RawMetrics, SubArea};
///
/// # fn main() -> Result<(), hoodrank_core::RecordError> {
/// let area = Area::new("Ixelles")?
///     .with_metrics(RawMetrics::new().with("cafes_density", 14.0))
///     .with_tag("cafes_brunch")
///     .with_sub_area(SubArea::new("Flagey")?);
/// area.validate()?;
/// assert_eq!(area.sub_areas.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Area {
    /// Display name, unique within one ranking call.
    pub name: String,
    /// Raw metric values.
    #[serde(default)]
    pub metrics: RawMetrics,
    /// Assigned tag ids.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Per-tag confidence labels.
    #[serde(default)]
    pub tag_confidence: TagConfidence,
    /// Nested sub-areas.
    #[serde(default)]
    pub sub_areas: Vec<SubArea>,
}

impl Area {
    /// Create an area with no metrics, tags or sub-areas.
    ///
    /// # Errors
    /// Returns [`RecordError::EmptyAreaName`] when `name` is blank.
    pub fn new(name: impl Into<String>) -> Result<Self, RecordError> {
        let area = Self {
            name: name.into(),
            ..Self::default()
        };
        if area.name.trim().is_empty() {
            return Err(RecordError::EmptyAreaName);
        }
        Ok(area)
    }

    /// Replace the metrics.
    #[must_use]
    pub fn with_metrics(mut self, metrics: RawMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Append a tag id.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Append a tag id with a confidence label.
    #[must_use]
    pub fn with_confident_tag(mut self, tag: impl Into<String>, confidence: Confidence) -> Self {
        let tag = tag.into();
        self.tag_confidence.insert(tag.clone(), confidence);
        self.tags.push(tag);
        self
    }

    /// Append a sub-area.
    #[must_use]
    pub fn with_sub_area(mut self, sub_area: SubArea) -> Self {
        self.sub_areas.push(sub_area);
        self
    }

    /// Check the name and the sub-area names.
    ///
    /// # Errors
    /// Returns a [`RecordError`] for a blank name, a blank sub-area name or a
    /// repeated sub-area name.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.name.trim().is_empty() {
            return Err(RecordError::EmptyAreaName);
        }
        validate_sub_areas(&self.name, &self.sub_areas)
    }
}

impl MetricRecord for Area {
    fn name(&self) -> &str {
        &self.name
    }

    fn metrics(&self) -> &RawMetrics {
        &self.metrics
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn confidence(&self) -> &TagConfidence {
        &self.tag_confidence
    }
}

/// Validate every area and reject repeated area names.
///
/// Names are compared with surrounding whitespace removed.
///
/// # Errors
/// Returns the first [`RecordError`] found, in input order.
///
/// # Examples
/// ```
/// use hoodrank_core::{validate_areas, Area, RecordError};
///
/// # fn main() -> Result<(), RecordError> {
/// let areas = [Area::new("Uccle")?, Area::new("Uccle")?];
/// assert_eq!(
///     validate_areas(&areas),
///     Err(RecordError::DuplicateArea { name: "Uccle".into() })
/// );
/// # Ok(())
/// # }
/// ```
pub fn validate_areas(areas: &[Area]) -> Result<(), RecordError> {
    let mut seen = BTreeSet::new();
    for area in areas {
        area.validate()?;
        if !seen.insert(area.name.trim()) {
            return Err(RecordError::DuplicateArea {
                name: area.name.clone(),
            });
        }
    }
    Ok(())
}

/// Validate sub-area names within the area called `area`.
///
/// Names are compared with surrounding whitespace removed.
///
/// # Errors
/// Returns [`RecordError::EmptySubAreaName`] or
/// [`RecordError::DuplicateSubArea`].
pub fn validate_sub_areas(area: &str, sub_areas: &[SubArea]) -> Result<(), RecordError> {
    let mut seen = BTreeSet::new();
    for sub_area in sub_areas {
        if sub_area.name.trim().is_empty() {
            return Err(RecordError::EmptySubAreaName {
                area: area.to_owned(),
            });
        }
        if !seen.insert(sub_area.name.trim()) {
            return Err(RecordError::DuplicateSubArea {
                area: area.to_owned(),
                name: sub_area.name.clone(),
            });
        }
    }
    Ok(())
}
