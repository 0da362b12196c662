//! Sibling value distributions and mid-rank percentiles.
//!
//! A [`Distributions`] value is built once per scope (the areas of a city, or
//! the sub-areas of one area) and queried by every scorer in that call. Values
//! are sorted with a total order so the result does not depend on record
//! order.

use std::collections::{BTreeMap, BTreeSet};

use crate::{DerivedMetric, MetricKey, MetricRecord, Scope, TagRegistry};

/// Percentile returned when there is nothing to compare against.
pub const NEUTRAL_PERCENTILE: f64 = 0.5;

/// Sorted sibling values for one metric.
///
/// # Examples
/// ```
/// use hoodrank_core::Distribution;
///
/// let distribution = Distribution::new([3.0, 1.0, 2.0, 2.0]);
/// assert_eq!(distribution.percentile(2.0), 0.5);
/// assert_eq!(distribution.percentile(0.0), 0.0);
/// assert_eq!(Distribution::default().percentile(7.0), 0.5);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Distribution {
    values: Vec<f64>,
}

impl Distribution {
    /// Build a distribution from unsorted sibling values.
    ///
    /// Non-finite values are recorded as `0.0`.
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let mut sorted: Vec<f64> = values.into_iter().map(normalise).collect();
        sorted.sort_by(f64::total_cmp);
        Self { values: sorted }
    }

    /// Sorted values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of sibling values.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    /// Report whether the distribution holds no values.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Mid-rank percentile of `value`: `(less + 0.5 * equal) / total`.
    ///
    /// Ties share the midpoint of their run so sparse counts do not inflate
    /// scores. An empty distribution yields [`NEUTRAL_PERCENTILE`].
    #[expect(
        clippy::float_arithmetic,
        reason = "mid-rank percentile is a ratio of counts"
    )]
    #[expect(
        clippy::cast_precision_loss,
        reason = "sibling counts are far below 2^52"
    )]
    #[must_use]
    pub fn percentile(&self, value: f64) -> f64 {
        if self.values.is_empty() {
            return NEUTRAL_PERCENTILE;
        }
        let probe = normalise(value);
        let less = self
            .values
            .partition_point(|candidate| candidate.total_cmp(&probe).is_lt());
        let less_or_equal = self
            .values
            .partition_point(|candidate| candidate.total_cmp(&probe).is_le());
        let equal = less_or_equal.saturating_sub(less);
        (less as f64 + 0.5 * equal as f64) / self.values.len() as f64
    }
}

#[expect(clippy::float_arithmetic, reason = "adding zero folds -0.0 into 0.0")]
fn normalise(value: f64) -> f64 {
    if value.is_finite() { value + 0.0 } else { 0.0 }
}

/// Distributions for every metric queried in one scope.
///
/// # Examples
/// ```
/// use hoodrank_core::{Area, Distributions, MetricKey, RawMetrics};
///
/// # fn main() -> Result<(), hoodrank_core::RecordError> {
/// let areas = vec![
///     Area::new("Uccle")?.with_metrics(RawMetrics::new().with("parks_share", 0.4)),
///     Area::new("Ixelles")?.with_metrics(RawMetrics::new().with("parks_share", 0.1)),
/// ];
/// let distributions = Distributions::build(&areas, [MetricKey::parse("parks_share")]);
/// assert_eq!(distributions.percentile(&MetricKey::parse("parks_share"), 0.4), 0.75);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Distributions {
    by_metric: BTreeMap<MetricKey, Distribution>,
}

impl Distributions {
    /// Collect sibling values for each key.
    ///
    /// A raw metric missing from every record yields an empty distribution.
    /// Otherwise each record contributes one value, reading `0.0` where the
    /// metric is absent.
    pub fn build<R, I>(records: &[R], keys: I) -> Self
    where
        R: MetricRecord,
        I: IntoIterator<Item = MetricKey>,
    {
        let by_metric = keys
            .into_iter()
            .map(|key| {
                let present = match &key {
                    MetricKey::Raw(name) => {
                        records.iter().any(|record| record.metrics().contains(name))
                    }
                    MetricKey::Derived(_) => true,
                };
                let distribution = if present {
                    Distribution::new(records.iter().map(|record| key.resolve(record.metrics())))
                } else {
                    Distribution::default()
                };
                (key, distribution)
            })
            .collect();
        Self { by_metric }
    }

    /// Build distributions for a scope: every raw metric present on a record,
    /// every signal metric of a registry tag applying at `scope`, and every
    /// derived metric.
    pub fn for_scope<R: MetricRecord>(records: &[R], registry: &TagRegistry, scope: Scope) -> Self {
        let mut keys: BTreeSet<MetricKey> = records
            .iter()
            .flat_map(|record| record.metrics().names().map(MetricKey::parse))
            .collect();
        keys.extend(registry.signal_metrics(scope));
        keys.extend(DerivedMetric::ALL.into_iter().map(MetricKey::Derived));
        Self::build(records, keys)
    }

    /// Distribution for `key`, if it was built.
    #[must_use]
    pub fn get(&self, key: &MetricKey) -> Option<&Distribution> {
        self.by_metric.get(key)
    }

    /// Percentile of `value` for `key`; unknown keys yield
    /// [`NEUTRAL_PERCENTILE`].
    #[must_use]
    pub fn percentile(&self, key: &MetricKey, value: f64) -> f64 {
        self.get(key)
            .map_or(NEUTRAL_PERCENTILE, |distribution| distribution.percentile(value))
    }

    /// Iterate over keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &MetricKey> {
        self.by_metric.keys()
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests should fail fast when setup breaks")]
mod tests {
    use super::*;
    use crate::{Area, RawMetrics};
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[], 1.0, 0.5)]
    #[case(&[1.0, 1.0, 1.0, 1.0], 1.0, 0.5)]
    #[case(&[0.0, 1.0, 2.0, 3.0, 4.0], 4.0, 0.9)]
    #[case(&[0.0, 1.0, 2.0, 3.0, 4.0], 9.0, 1.0)]
    #[case(&[-0.0, 0.0, 5.0], 0.0, 1.0 / 3.0)]
    fn mid_rank(#[case] values: &[f64], #[case] probe: f64, #[case] expected: f64) {
        let distribution = Distribution::new(values.iter().copied());
        assert!((distribution.percentile(probe) - expected).abs() < 1e-12);
    }

    #[test]
    fn absent_raw_metrics_build_empty_distributions() {
        let areas = vec![
            Area::new("A").expect("area").with_metrics(RawMetrics::new().with("bars_density", 1.0)),
            Area::new("B").expect("area"),
        ];
        let key = MetricKey::parse("tram_density");
        let distributions = Distributions::build(&areas, [key.clone()]);
        assert!(distributions.get(&key).is_some_and(Distribution::is_empty));
        assert_eq!(distributions.percentile(&key, 3.0), NEUTRAL_PERCENTILE);
    }

    #[test]
    fn partially_present_metrics_read_zero() {
        let areas = vec![
            Area::new("A").expect("area").with_metrics(RawMetrics::new().with("bars_density", 2.0)),
            Area::new("B").expect("area"),
        ];
        let key = MetricKey::parse("bars_density");
        let distributions = Distributions::build(&areas, [key.clone()]);
        assert_eq!(
            distributions.get(&key).map(Distribution::values),
            Some([0.0, 2.0].as_slice())
        );
    }

    #[test]
    fn scope_distributions_cover_derived_metrics() {
        let areas = vec![Area::new("A").expect("area")];
        let distributions = Distributions::for_scope(&areas, &TagRegistry::standard(), Scope::Area);
        for metric in DerivedMetric::ALL {
            assert!(distributions.get(&MetricKey::Derived(metric)).is_some());
        }
    }

    proptest! {
        #[test]
        fn percentile_is_monotonic(
            values in prop::collection::vec(-1.0e6..1.0e6f64, 0..40),
            a in -1.0e6..1.0e6f64,
            b in -1.0e6..1.0e6f64,
        ) {
            let distribution = Distribution::new(values);
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(distribution.percentile(low) <= distribution.percentile(high));
        }

        #[test]
        fn percentile_ignores_input_order(mut values in prop::collection::vec(-100.0..100.0f64, 1..20)) {
            let forward = Distribution::new(values.clone());
            values.reverse();
            prop_assert_eq!(forward, Distribution::new(values));
        }
    }
}
