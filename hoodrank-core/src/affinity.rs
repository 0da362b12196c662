//! Tag affinity: how well one record fits one tag.
//!
//! The [`AffinityScorer`] trait turns a tag's signals into a score in
//! `0.0..=1.0`. [`PercentileAffinity`] is the standard implementation; it
//! averages the signals' sibling percentiles by weight.
//! [`resolve_tag_affinity`] wraps registry lookup, scoring and the record's
//! confidence multiplier, and is what rankers call.

use serde::{Deserialize, Serialize};

use crate::{
    Confidence, Direction, Distributions, MetricKey, MetricRecord, RawMetrics, TagDefinition,
    TagRegistry,
};

/// Per-signal breakdown surfaced in debug payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalTrace {
    /// Metric read by the signal.
    pub metric: MetricKey,
    /// Signal direction.
    pub direction: Direction,
    /// Signal weight.
    pub weight: f64,
    /// Resolved metric value.
    pub raw: f64,
    /// Percentile after orienting for direction.
    pub percentile: f64,
}

/// Unadjusted affinity with its per-signal trace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Affinity {
    /// Weighted mean of oriented percentiles, in `0.0..=1.0`.
    pub score: f64,
    /// Signals that contributed, in definition order.
    pub signals: Vec<SignalTrace>,
}

/// Compute a record's affinity to a tag.
///
/// Implementations must be thread-safe so scorers can run across threads,
/// must return finite scores in `0.0..=1.0`, and must return `0.0` when the
/// tag carries no usable signal. Use [`AffinityScorer::sanitise`] to apply
/// these guards.
///
/// # Examples
/// ```
/// use hoodrank_core::{Affinity, AffinityScorer, Distributions, RawMetrics, TagDefinition};
///
/// struct Always;
///
/// impl AffinityScorer for Always {
///     fn affinity(&self, _: &TagDefinition, _: &RawMetrics, _: &Distributions) -> Affinity {
///         Affinity { score: 1.0, signals: Vec::new() }
///     }
/// }
///
/// let tag = TagDefinition::new("anything", "");
/// let affinity = Always.affinity(&tag, &RawMetrics::new(), &Distributions::default());
/// assert_eq!(affinity.score, 1.0);
/// ```
pub trait AffinityScorer: Send + Sync {
    /// Return the affinity of `metrics` to `tag` among `distributions`.
    fn affinity(
        &self,
        tag: &TagDefinition,
        metrics: &RawMetrics,
        distributions: &Distributions,
    ) -> Affinity;

    /// Clamp a raw affinity into `0.0..=1.0`, mapping non-finite values to
    /// `0.0`.
    fn sanitise(score: f64) -> f64
    where
        Self: Sized,
    {
        if !score.is_finite() {
            return 0.0;
        }
        score.clamp(0.0, 1.0)
    }
}

/// Weighted mean of sibling percentiles.
///
/// Signals with a non-positive weight are skipped. Lower-is-better signals
/// use the inverted percentile.
///
/// # Examples
/// ```
/// use hoodrank_core::{
///     AffinityScorer, Distributions, MetricKey, PercentileAffinity, RawMetrics, Signal,
///     SubArea, TagDefinition,
/// };
///
/// # fn main() -> Result<(), hoodrank_core::RecordError> {
/// let siblings = vec![
///     SubArea::new("a")?.with_metrics(RawMetrics::new().with("bars_density", 1.0)),
///     SubArea::new("b")?.with_metrics(RawMetrics::new().with("bars_density", 3.0)),
/// ];
/// let distributions = Distributions::build(&siblings, [MetricKey::parse("bars_density")]);
/// let quiet = TagDefinition::new("quiet", "").with_signal(Signal::low("bars_density", 1.0));
/// let affinity = PercentileAffinity.affinity(&quiet, &siblings[0].metrics, &distributions);
/// assert_eq!(affinity.score, 0.75);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PercentileAffinity;

impl AffinityScorer for PercentileAffinity {
    #[expect(clippy::float_arithmetic, reason = "weighted mean of percentiles")]
    fn affinity(
        &self,
        tag: &TagDefinition,
        metrics: &RawMetrics,
        distributions: &Distributions,
    ) -> Affinity {
        let mut signals = Vec::with_capacity(tag.signals.len());
        let mut accumulated = 0.0;
        let mut total_weight = 0.0;
        for signal in &tag.signals {
            if !(signal.weight.is_finite() && signal.weight > 0.0) {
                continue;
            }
            let raw = signal.metric.resolve(metrics);
            let percentile = signal
                .direction
                .orient(distributions.percentile(&signal.metric, raw));
            accumulated += signal.weight * percentile;
            total_weight += signal.weight;
            signals.push(SignalTrace {
                metric: signal.metric.clone(),
                direction: signal.direction,
                weight: signal.weight,
                raw,
                percentile,
            });
        }
        let score = if total_weight > 0.0 {
            Self::sanitise(accumulated / total_weight)
        } else {
            0.0
        };
        Affinity { score, signals }
    }
}

/// Scale `score` by the confidence multiplier and clamp into `0.0..=1.0`.
///
/// # Examples
/// ```
/// use hoodrank_core::{apply_confidence, Confidence};
///
/// assert_eq!(apply_confidence(0.95, Some(Confidence::High)), 1.0);
/// assert_eq!(apply_confidence(0.5, None), 0.5);
/// ```
#[expect(clippy::float_arithmetic, reason = "confidence scaling")]
#[must_use]
pub fn apply_confidence(score: f64, confidence: Option<Confidence>) -> f64 {
    let multiplier = confidence.map_or(1.0, Confidence::multiplier);
    PercentileAffinity::sanitise(score * multiplier)
}

/// A record's confidence-adjusted affinity to one tag id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagAffinity {
    /// Tag id as requested.
    pub tag: String,
    /// Whether the registry knows the tag.
    pub resolved: bool,
    /// Affinity before the confidence multiplier.
    pub raw_affinity: f64,
    /// Confidence recorded on the record for this tag.
    pub confidence: Option<Confidence>,
    /// Affinity after the confidence multiplier, in `0.0..=1.0`.
    pub adjusted: f64,
    /// Per-signal breakdown.
    pub signals: Vec<SignalTrace>,
}

/// Look up `tag_id`, score it for `record` and apply the record's confidence.
///
/// Unknown tags are not an error: they score `0.0` and are marked
/// unresolved.
pub fn resolve_tag_affinity<S, R>(
    registry: &TagRegistry,
    scorer: &S,
    tag_id: &str,
    record: &R,
    distributions: &Distributions,
) -> TagAffinity
where
    S: AffinityScorer + ?Sized,
    R: MetricRecord + ?Sized,
{
    let confidence = record.confidence().get(tag_id);
    let Some(definition) = registry.lookup(tag_id) else {
        log::debug!("tag '{tag_id}' is not in the registry; scoring it as zero");
        return TagAffinity {
            tag: tag_id.to_owned(),
            resolved: false,
            raw_affinity: 0.0,
            confidence,
            adjusted: 0.0,
            signals: Vec::new(),
        };
    };
    let affinity = scorer.affinity(definition, record.metrics(), distributions);
    TagAffinity {
        tag: tag_id.to_owned(),
        resolved: true,
        raw_affinity: affinity.score,
        confidence,
        adjusted: apply_confidence(affinity.score, confidence),
        signals: affinity.signals,
    }
}
