//! Raw and derived metrics attached to areas and sub-areas.
//!
//! Records carry a free-form map of raw metric values. A handful of metrics
//! are never stored directly; they are computed on demand from the raw map by
//! [`DerivedMetric`]. [`MetricKey`] unifies both so signals and distributions
//! can refer to either without string branching.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Well-known raw metric names exposed by city packs.
pub mod names {
    /// Cafes per square kilometre.
    pub const CAFES_DENSITY: &str = "cafes_density";
    /// Restaurants per square kilometre.
    pub const RESTAURANTS_DENSITY: &str = "restaurants_density";
    /// Bars per square kilometre.
    pub const BARS_DENSITY: &str = "bars_density";
    /// Share of the surface covered by parks, `0.0..=1.0`.
    pub const PARKS_SHARE: &str = "parks_share";
    /// Park surface in square kilometres.
    pub const PARKS_KM2: &str = "parks_km2";
    /// Schools per square kilometre.
    pub const SCHOOLS_DENSITY: &str = "schools_density";
    /// Childcare facilities per square kilometre.
    pub const CHILDCARE_DENSITY: &str = "childcare_density";
    /// Metro stations per square kilometre.
    pub const METRO_DENSITY: &str = "metro_density";
    /// Tram stops per square kilometre.
    pub const TRAM_DENSITY: &str = "tram_density";
    /// Train stations per square kilometre.
    pub const TRAIN_DENSITY: &str = "train_density";
    /// Surface in square kilometres.
    pub const AREA_KM2: &str = "area_km2";
}

use names::{
    BARS_DENSITY, CAFES_DENSITY, CHILDCARE_DENSITY, METRO_DENSITY, PARKS_SHARE,
    RESTAURANTS_DENSITY, SCHOOLS_DENSITY, TRAIN_DENSITY, TRAM_DENSITY,
};

const AMENITY_TERMS: &[(&str, f64)] = &[
    (CAFES_DENSITY, 1.0),
    (RESTAURANTS_DENSITY, 1.0),
    (BARS_DENSITY, 1.0),
];
const TRANSIT_TERMS: &[(&str, f64)] = &[
    (METRO_DENSITY, 1.0),
    (TRAM_DENSITY, 1.0),
    (TRAIN_DENSITY, 1.0),
];
const SAFETY_TERMS: &[(&str, f64)] = &[
    (PARKS_SHARE, 10.0),
    (BARS_DENSITY, -1.0),
    (RESTAURANTS_DENSITY, -0.3),
    (METRO_DENSITY, -0.2),
];
const FAMILY_TERMS: &[(&str, f64)] = &[
    (SCHOOLS_DENSITY, 1.2),
    (CHILDCARE_DENSITY, 2.0),
    (PARKS_SHARE, 18.0),
];
const COMMUTE_TERMS: &[(&str, f64)] = &[
    (METRO_DENSITY, 3.0),
    (TRAM_DENSITY, 1.0),
    (TRAIN_DENSITY, 2.0),
];
const LIFESTYLE_TERMS: &[(&str, f64)] = &[
    (CAFES_DENSITY, 1.0),
    (RESTAURANTS_DENSITY, 0.6),
    (BARS_DENSITY, 0.8),
];

/// Raw metric values for one record.
///
/// Missing keys read as `0.0`. Non-finite values are stored as `0.0`, and on
/// deserialization numeric strings are parsed while any other non-numeric
/// payload (null, booleans, nested objects) becomes `0.0`.
///
/// # Examples
/// ```
/// use hoodrank_core::RawMetrics;
///
/// let metrics = RawMetrics::new()
///     .with("cafes_density", 12.0)
///     .with("bars_density", f64::NAN);
/// assert_eq!(metrics.get("cafes_density"), 12.0);
/// assert_eq!(metrics.get("bars_density"), 0.0);
/// assert_eq!(metrics.get("tram_density"), 0.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RawMetrics {
    values: BTreeMap<String, f64>,
}

impl RawMetrics {
    /// Construct an empty metric map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a metric value.
    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), finite_or_zero(value));
    }

    /// Insert a metric while returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    /// Return the value for `name`, or `0.0` when it is absent.
    #[must_use]
    pub fn get(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    /// Report whether the record carries `name` at all.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterate over the metric names present on the record.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Number of stored metrics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Report whether no metric is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "derived metrics are linear combinations of raw values"
    )]
    fn weighted_sum(&self, terms: &[(&str, f64)]) -> f64 {
        terms
            .iter()
            .map(|&(name, coefficient)| coefficient * self.get(name))
            .sum()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for RawMetrics {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut metrics = Self::new();
        for (name, value) in iter {
            metrics.insert(name, value);
        }
        metrics
    }
}

/// Loosely typed metric payload accepted on input.
#[derive(Deserialize)]
#[serde(untagged)]
enum MetricValue {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl MetricValue {
    fn into_f64(self) -> f64 {
        match self {
            Self::Number(value) => finite_or_zero(value),
            Self::Text(text) => text.trim().parse::<f64>().map_or(0.0, finite_or_zero),
            Self::Other(_) => 0.0,
        }
    }
}

impl<'de> Deserialize<'de> for RawMetrics {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = BTreeMap::<String, MetricValue>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|(name, value)| (name, value.into_f64()))
            .collect())
    }
}

const fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Metrics computed from a fixed formula over raw metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivedMetric {
    /// Cafes, restaurants and bars combined.
    AmenityDensity,
    /// Metro, tram and train combined.
    TransitDensity,
    /// Blend of transit and amenity intensity describing dense urban fabric.
    UrbanDenseProxy,
    /// Price-pressure proxy: amenity plus transit density.
    CostPressure,
    /// Raw input to the Safety dimension.
    SafetyComposite,
    /// Raw input to the Family dimension.
    FamilyComposite,
    /// Raw input to the Commute dimension.
    CommuteComposite,
    /// Raw input to the Lifestyle dimension.
    LifestyleComposite,
}

impl DerivedMetric {
    /// Every derived metric, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::AmenityDensity,
        Self::TransitDensity,
        Self::UrbanDenseProxy,
        Self::CostPressure,
        Self::SafetyComposite,
        Self::FamilyComposite,
        Self::CommuteComposite,
        Self::LifestyleComposite,
    ];

    /// Return the metric name used in signals and debug output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AmenityDensity => "amenity_density",
            Self::TransitDensity => "transit_density",
            Self::UrbanDenseProxy => "urban_dense_proxy",
            Self::CostPressure => "cost_pressure",
            Self::SafetyComposite => "safety_composite",
            Self::FamilyComposite => "family_composite",
            Self::CommuteComposite => "commute_composite",
            Self::LifestyleComposite => "lifestyle_composite",
        }
    }

    /// Look up a derived metric by name.
    ///
    /// # Examples
    /// ```
    /// use hoodrank_core::DerivedMetric;
    ///
    /// assert_eq!(
    ///     DerivedMetric::from_name("transit_density"),
    ///     Some(DerivedMetric::TransitDensity)
    /// );
    /// assert!(DerivedMetric::from_name("cafes_density").is_none());
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|metric| metric.as_str() == name)
    }

    /// Evaluate the formula against a record's raw metrics.
    #[expect(
        clippy::float_arithmetic,
        reason = "derived metrics blend other derived metrics"
    )]
    #[must_use]
    pub fn evaluate(self, metrics: &RawMetrics) -> f64 {
        match self {
            Self::AmenityDensity => metrics.weighted_sum(AMENITY_TERMS),
            Self::TransitDensity => metrics.weighted_sum(TRANSIT_TERMS),
            Self::UrbanDenseProxy => {
                0.6 * Self::TransitDensity.evaluate(metrics)
                    + 0.4 * Self::AmenityDensity.evaluate(metrics)
            }
            Self::CostPressure => {
                Self::AmenityDensity.evaluate(metrics) + Self::TransitDensity.evaluate(metrics)
            }
            Self::SafetyComposite => metrics.weighted_sum(SAFETY_TERMS),
            Self::FamilyComposite => metrics.weighted_sum(FAMILY_TERMS),
            Self::CommuteComposite => metrics.weighted_sum(COMMUTE_TERMS),
            Self::LifestyleComposite => metrics.weighted_sum(LIFESTYLE_TERMS),
        }
    }
}

impl fmt::Display for DerivedMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to either a raw metric or a derived formula.
///
/// # Examples
/// ```
/// use hoodrank_core::{DerivedMetric, MetricKey, RawMetrics};
///
/// let metrics = RawMetrics::new()
///     .with("metro_density", 2.0)
///     .with("tram_density", 1.0);
/// let transit = MetricKey::parse("transit_density");
/// assert_eq!(transit, MetricKey::Derived(DerivedMetric::TransitDensity));
/// assert_eq!(transit.resolve(&metrics), 3.0);
/// assert_eq!(MetricKey::parse("metro_density").resolve(&metrics), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MetricKey {
    /// Direct lookup in the record's raw metrics.
    Raw(String),
    /// Lazily evaluated formula.
    Derived(DerivedMetric),
}

impl MetricKey {
    /// Interpret a metric name, preferring derived formulas.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        DerivedMetric::from_name(name).map_or_else(|| Self::Raw(name.to_owned()), Self::Derived)
    }

    /// Return the metric name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Raw(name) => name,
            Self::Derived(metric) => metric.as_str(),
        }
    }

    /// Resolve the metric value for a record; absent values read as `0.0`.
    #[must_use]
    pub fn resolve(&self, metrics: &RawMetrics) -> f64 {
        match self {
            Self::Raw(name) => metrics.get(name),
            Self::Derived(metric) => metric.evaluate(metrics),
        }
    }
}

impl From<DerivedMetric> for MetricKey {
    fn from(metric: DerivedMetric) -> Self {
        Self::Derived(metric)
    }
}

impl From<&str> for MetricKey {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl From<String> for MetricKey {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<MetricKey> for String {
    fn from(key: MetricKey) -> Self {
        match key {
            MetricKey::Raw(name) => name,
            MetricKey::Derived(metric) => metric.as_str().to_owned(),
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests should fail fast when setup breaks")]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample() -> RawMetrics {
        RawMetrics::new()
            .with(CAFES_DENSITY, 4.0)
            .with(RESTAURANTS_DENSITY, 2.0)
            .with(BARS_DENSITY, 1.0)
            .with(METRO_DENSITY, 3.0)
            .with(TRAM_DENSITY, 1.0)
            .with(TRAIN_DENSITY, 0.5)
    }

    #[rstest]
    #[case(DerivedMetric::AmenityDensity, 7.0)]
    #[case(DerivedMetric::TransitDensity, 4.5)]
    #[case(DerivedMetric::CostPressure, 11.5)]
    #[case(DerivedMetric::CommuteComposite, 11.0)]
    fn derived_formulas(#[case] metric: DerivedMetric, #[case] expected: f64) {
        let value = metric.evaluate(&sample());
        assert!((value - expected).abs() < 1e-9, "{metric}: {value}");
    }

    #[rstest]
    fn urban_proxy_blends_transit_and_amenities() {
        let value = DerivedMetric::UrbanDenseProxy.evaluate(&sample());
        assert!((value - (0.6 * 4.5 + 0.4 * 7.0)).abs() < 1e-9);
    }

    #[rstest]
    fn every_derived_name_round_trips() {
        for metric in DerivedMetric::ALL {
            assert_eq!(MetricKey::parse(metric.as_str()), MetricKey::Derived(metric));
        }
    }

    #[rstest]
    fn non_numeric_payloads_read_as_zero() {
        let metrics: RawMetrics = serde_json::from_str(
            r#"{"cafes_density":"3.5","bars_density":null,"tram_density":"n/a","parks_share":true,"metro_density":2}"#,
        )
        .expect("metrics decode");
        assert_eq!(metrics.get(CAFES_DENSITY), 3.5);
        assert_eq!(metrics.get(BARS_DENSITY), 0.0);
        assert_eq!(metrics.get(TRAM_DENSITY), 0.0);
        assert_eq!(metrics.get(PARKS_SHARE), 0.0);
        assert_eq!(metrics.get(METRO_DENSITY), 2.0);
        assert!(metrics.contains(BARS_DENSITY));
    }

    #[rstest]
    fn metric_keys_serialise_as_names() {
        let json = serde_json::to_string(&MetricKey::Derived(DerivedMetric::CostPressure))
            .expect("serialise key");
        assert_eq!(json, r#""cost_pressure""#);
    }
}
