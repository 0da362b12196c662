//! Tag definitions: what a tag means and how it is measured.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{Dimension, MetricKey};

/// Whether a larger metric value improves a tag's fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Larger values fit better.
    #[serde(rename = "high")]
    HigherIsBetter,
    /// Smaller values fit better.
    #[serde(rename = "low")]
    LowerIsBetter,
}

impl Direction {
    /// Orient a percentile so that `1.0` always means "best fit".
    ///
    /// # Examples
    /// ```
    /// use hoodrank_core::Direction;
    ///
    /// assert_eq!(Direction::HigherIsBetter.orient(0.75), 0.75);
    /// assert_eq!(Direction::LowerIsBetter.orient(0.75), 0.25);
    /// ```
    #[expect(clippy::float_arithmetic, reason = "percentile inversion")]
    #[must_use]
    pub fn orient(self, percentile: f64) -> f64 {
        match self {
            Self::HigherIsBetter => percentile,
            Self::LowerIsBetter => 1.0 - percentile,
        }
    }
}

/// Level at which a record is ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Top-level areas of a city.
    Area,
    /// Sub-areas inside one area.
    SubArea,
}

/// Scopes at which a tag applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagScope {
    /// Areas only.
    Area,
    /// Sub-areas only.
    SubArea,
    /// Areas and sub-areas.
    #[default]
    Both,
}

impl TagScope {
    /// Report whether a tag with this scope applies at `scope`.
    #[must_use]
    pub const fn covers(self, scope: Scope) -> bool {
        matches!(
            (self, scope),
            (Self::Both, _) | (Self::Area, Scope::Area) | (Self::SubArea, Scope::SubArea)
        )
    }
}

/// One measurable proxy contributing to a tag's affinity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Raw or derived metric the signal reads.
    pub metric: MetricKey,
    /// How the metric relates to fit.
    pub direction: Direction,
    /// Relative importance; non-positive weights are ignored when scoring.
    pub weight: f64,
}

impl Signal {
    /// Signal where higher values fit better.
    #[must_use]
    pub fn high(metric: impl Into<MetricKey>, weight: f64) -> Self {
        Self {
            metric: metric.into(),
            direction: Direction::HigherIsBetter,
            weight,
        }
    }

    /// Signal where lower values fit better.
    #[must_use]
    pub fn low(metric: impl Into<MetricKey>, weight: f64) -> Self {
        Self {
            metric: metric.into(),
            direction: Direction::LowerIsBetter,
            weight,
        }
    }
}

/// Direction in which a tag nudges a dimension rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nudge {
    /// One step up.
    Raise,
    /// One step down.
    Lower,
}

/// Immutable description of a tag.
///
/// # Examples
/// ```
/// use hoodrank_core::{Dimension, Nudge, Signal, TagDefinition};
///
/// let tag = TagDefinition::new("metro_strong", "Strong metro access.")
///     .with_signal(Signal::high("metro_density", 1.0))
///     .with_dimension(Dimension::Commute, 1.0)
///     .with_nudge(Dimension::Commute, Nudge::Raise);
/// assert_eq!(tag.dimension_affinity(Dimension::Commute), 1.0);
/// assert_eq!(tag.dimension_affinity(Dimension::Safety), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagDefinition {
    /// Stable identifier shared with city packs and user profiles.
    pub id: String,
    /// Scopes the tag applies to.
    #[serde(default)]
    pub scope: TagScope,
    /// Human readable meaning.
    pub description: String,
    /// Signals in evaluation order.
    #[serde(default)]
    pub signals: Vec<Signal>,
    /// Non-negative affinity to each dimension used to build priority weights.
    #[serde(default)]
    pub dimensions: BTreeMap<Dimension, f64>,
    /// Rating nudges applied when an area carries the tag.
    #[serde(default)]
    pub nudges: BTreeMap<Dimension, Nudge>,
    /// Tags that cancel this tag's nudge on a dimension when the area also
    /// carries them.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub nudge_waivers: BTreeMap<Dimension, BTreeSet<String>>,
    /// Whether the tag marks an area as premium for budget fit.
    #[serde(default)]
    pub premium: bool,
    /// Free-form remarks surfaced in debug output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TagDefinition {
    /// Start a definition applying at both scopes with no signals.
    #[must_use]
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            scope: TagScope::Both,
            description: description.into(),
            signals: Vec::new(),
            dimensions: BTreeMap::new(),
            nudges: BTreeMap::new(),
            nudge_waivers: BTreeMap::new(),
            premium: false,
            notes: None,
        }
    }

    /// Restrict the scope.
    #[must_use]
    pub const fn with_scope(mut self, scope: TagScope) -> Self {
        self.scope = scope;
        self
    }

    /// Append a signal.
    #[must_use]
    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signals.push(signal);
        self
    }

    /// Set the affinity to `dimension`; negative values are stored as `0.0`.
    #[must_use]
    pub fn with_dimension(mut self, dimension: Dimension, affinity: f64) -> Self {
        let clamped = if affinity.is_finite() { affinity.max(0.0) } else { 0.0 };
        self.dimensions.insert(dimension, clamped);
        self
    }

    /// Set the nudge applied to `dimension`.
    #[must_use]
    pub fn with_nudge(mut self, dimension: Dimension, nudge: Nudge) -> Self {
        self.nudges.insert(dimension, nudge);
        self
    }

    /// Cancel the nudge on `dimension` for areas that also carry `tag`.
    #[must_use]
    pub fn with_nudge_waiver(mut self, dimension: Dimension, tag: impl Into<String>) -> Self {
        self.nudge_waivers
            .entry(dimension)
            .or_default()
            .insert(tag.into());
        self
    }

    /// Flag the tag as premium.
    #[must_use]
    pub const fn premium(mut self) -> Self {
        self.premium = true;
        self
    }

    /// Attach notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Affinity to `dimension`, `0.0` when unmapped.
    #[must_use]
    pub fn dimension_affinity(&self, dimension: Dimension) -> f64 {
        self.dimensions
            .get(&dimension)
            .copied()
            .filter(|value| value.is_finite() && *value > 0.0)
            .unwrap_or(0.0)
    }

    /// Nudge for `dimension`, if any.
    #[must_use]
    pub fn nudge(&self, dimension: Dimension) -> Option<Nudge> {
        self.nudges.get(&dimension).copied()
    }

    /// Nudge for `dimension` on a record carrying `tags`, after waivers.
    #[must_use]
    pub fn nudge_for<S: AsRef<str>>(&self, dimension: Dimension, tags: &[S]) -> Option<Nudge> {
        let waived = self.nudge_waivers.get(&dimension).is_some_and(|waivers| {
            tags.iter()
                .map(AsRef::<str>::as_ref)
                .any(|tag| waivers.contains(tag))
        });
        self.nudge(dimension).filter(|_| !waived)
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests should fail fast when setup breaks")]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TagScope::Both, Scope::Area, true)]
    #[case(TagScope::Both, Scope::SubArea, true)]
    #[case(TagScope::Area, Scope::SubArea, false)]
    #[case(TagScope::SubArea, Scope::SubArea, true)]
    fn scope_coverage(#[case] tag: TagScope, #[case] scope: Scope, #[case] expected: bool) {
        assert_eq!(tag.covers(scope), expected);
    }

    #[test]
    fn negative_dimension_affinity_is_clamped() {
        let tag = TagDefinition::new("odd", "").with_dimension(Dimension::Family, -0.5);
        assert_eq!(tag.dimension_affinity(Dimension::Family), 0.0);
    }

    #[rstest]
    #[case(&["busy_traffic_noise"], Some(Nudge::Lower))]
    #[case(&["busy_traffic_noise", "car_friendly"], None)]
    fn waivers_cancel_nudges(#[case] tags: &[&str], #[case] expected: Option<Nudge>) {
        let tag = TagDefinition::new("busy_traffic_noise", "")
            .with_nudge(Dimension::Commute, Nudge::Lower)
            .with_nudge(Dimension::Safety, Nudge::Lower)
            .with_nudge_waiver(Dimension::Commute, "car_friendly");
        assert_eq!(tag.nudge_for(Dimension::Commute, tags), expected);
        assert_eq!(tag.nudge_for(Dimension::Safety, tags), Some(Nudge::Lower));
    }

    #[test]
    fn directions_use_short_labels() {
        let json = serde_json::to_string(&Signal::low("bars_density", 0.6)).expect("encode");
        assert!(json.contains(r#""direction":"low""#), "{json}");
    }
}
