//! Per-dimension weights derived from the user's selected tags.

use std::collections::BTreeMap;

use hoodrank_core::{Dimension, PriorityProfile, TagRegistry, Tier};
use serde::Serialize;

use crate::{DimensionScore, TierWeights};

/// Aggregate raw weight at or below which the equal-weight fallback applies.
const FALLBACK_EPSILON: f64 = 1e-9;

/// One selected tag's contribution to the raw weights.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagWeight {
    /// Tag id.
    pub tag: String,
    /// Tier of the tag in the profile.
    pub tier: Tier,
    /// Multiplier for the tier.
    pub tier_weight: f64,
    /// Dimension affinity multiplied by the tier weight.
    pub contributions: BTreeMap<Dimension, f64>,
}

/// How the weights were built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightsTrace {
    /// Selected tags in profile order.
    pub selected_tags: Vec<String>,
    /// Top tags in profile order.
    pub top_tags: Vec<String>,
    /// Summed contributions before normalisation.
    pub raw_weights: BTreeMap<Dimension, f64>,
    /// Contributions per resolved tag.
    pub per_tag: Vec<TagWeight>,
    /// Selected tags missing from the registry.
    pub unresolved: Vec<String>,
    /// Whether the equal-weight fallback applied.
    pub fallback: bool,
}

/// Normalised per-dimension weights summing to `1.0`.
///
/// # Examples
/// ```
/// use hoodrank_core::{Dimension, PriorityProfile, TagRegistry};
/// use hoodrank_scorer::{PriorityWeights, TierWeights};
///
/// # fn main() -> Result<(), hoodrank_core::PriorityProfileError> {
/// let profile = PriorityProfile::new(["metro_strong"], ["metro_strong"])?;
/// let weights = PriorityWeights::build(&TagRegistry::standard(), &profile, TierWeights::default());
/// assert_eq!(weights.get(Dimension::Commute), 1.0);
/// assert_eq!(weights.get(Dimension::Safety), 0.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityWeights {
    weights: BTreeMap<Dimension, f64>,
    trace: WeightsTrace,
}

impl PriorityWeights {
    /// Sum each selected tag's dimension affinities, weighted by tier, then
    /// normalise. Falls back to equal weights when nothing contributes.
    #[expect(clippy::float_arithmetic, reason = "weights are normalised sums")]
    #[must_use]
    pub fn build(registry: &TagRegistry, profile: &PriorityProfile, tiers: TierWeights) -> Self {
        let mut raw_weights: BTreeMap<Dimension, f64> =
            Dimension::ALL.into_iter().map(|dimension| (dimension, 0.0)).collect();
        let mut per_tag = Vec::new();
        let mut unresolved = Vec::new();
        for tag in profile.selected() {
            let Some(definition) = registry.lookup(tag) else {
                log::debug!("priority tag '{tag}' is not in the registry");
                unresolved.push(tag.clone());
                continue;
            };
            let tier = profile.tier(tag);
            let tier_weight = tiers.get(tier);
            let contributions: BTreeMap<Dimension, f64> = Dimension::ALL
                .into_iter()
                .map(|dimension| (dimension, definition.dimension_affinity(dimension) * tier_weight))
                .filter(|(_, contribution)| *contribution > 0.0)
                .collect();
            for (dimension, contribution) in &contributions {
                if let Some(total) = raw_weights.get_mut(dimension) {
                    *total += contribution;
                }
            }
            per_tag.push(TagWeight {
                tag: tag.clone(),
                tier,
                tier_weight,
                contributions,
            });
        }
        let total: f64 = raw_weights.values().sum();
        let fallback = !(total.is_finite() && total > FALLBACK_EPSILON);
        let weights = if fallback {
            let share = 1.0 / 5.0;
            Dimension::ALL.into_iter().map(|dimension| (dimension, share)).collect()
        } else {
            raw_weights
                .iter()
                .map(|(dimension, value)| (*dimension, value / total))
                .collect()
        };
        Self {
            weights,
            trace: WeightsTrace {
                selected_tags: profile.selected().to_vec(),
                top_tags: profile.top().to_vec(),
                raw_weights,
                per_tag,
                unresolved,
                fallback,
            },
        }
    }

    /// Weight of `dimension`.
    #[must_use]
    pub fn get(&self, dimension: Dimension) -> f64 {
        self.weights.get(&dimension).copied().unwrap_or(0.0)
    }

    /// Iterate over `(dimension, weight)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        self.weights.iter().map(|(dimension, weight)| (*dimension, *weight))
    }

    /// How the weights were built.
    #[must_use]
    pub const fn trace(&self) -> &WeightsTrace {
        &self.trace
    }

    /// Weighted dot product of `score` against these weights.
    #[expect(clippy::float_arithmetic, reason = "weighted sum of ratings")]
    #[must_use]
    pub fn profile_score(&self, score: &DimensionScore) -> f64 {
        self.iter()
            .map(|(dimension, weight)| weight * f64::from(score.get(dimension)))
            .sum()
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests should fail fast when setup breaks")]
mod tests {
    use super::*;
    use hoodrank_core::{MAX_SELECTED_TAGS, TagDefinition};
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    fn top_tags_outweigh_other_tags() {
        let profile =
            PriorityProfile::new(["metro_strong", "families"], ["metro_strong"]).expect("profile");
        let weights =
            PriorityWeights::build(&TagRegistry::standard(), &profile, TierWeights::default());
        // families: Family 1.0, Safety 0.4 at 0.55; metro_strong: Commute 1.0.
        let total = 1.0 + 0.55 * 1.4;
        assert!((weights.get(Dimension::Commute) - 1.0 / total).abs() < 1e-12);
        assert!((weights.get(Dimension::Family) - 0.55 / total).abs() < 1e-12);
        assert!(!weights.trace().fallback);
    }

    #[rstest]
    fn unknown_tags_fall_back_to_equal_weights() {
        let profile = PriorityProfile::new(["sea_view"], ["sea_view"]).expect("profile");
        let weights =
            PriorityWeights::build(&TagRegistry::standard(), &profile, TierWeights::default());
        assert!(weights.trace().fallback);
        assert_eq!(weights.trace().unresolved, vec!["sea_view".to_owned()]);
        for dimension in Dimension::ALL {
            assert_eq!(weights.get(dimension), 0.2);
        }
    }

    #[rstest]
    fn profile_score_is_a_dot_product() {
        let registry = TagRegistry::new().with_tag(
            TagDefinition::new("split", "")
                .with_dimension(Dimension::Safety, 1.0)
                .with_dimension(Dimension::Lifestyle, 1.0),
        );
        let profile = PriorityProfile::new(["split"], ["split"]).expect("profile");
        let weights = PriorityWeights::build(&registry, &profile, TierWeights::default());
        let score = DimensionScore::new(5, 1, 1, 3, 1);
        assert!((weights.profile_score(&score) - 4.0).abs() < 1e-12);
    }

    fn tag_ids() -> impl Strategy<Value = Vec<String>> {
        let ids: Vec<String> = TagRegistry::standard()
            .iter()
            .map(|tag| tag.id.clone())
            .chain(["unknown_a".to_owned(), "unknown_b".to_owned()])
            .collect();
        prop::collection::vec(prop::sample::select(ids), 0..=MAX_SELECTED_TAGS)
    }

    proptest! {
        #[test]
        fn weights_are_normalised(selected in tag_ids(), top_count in 0usize..=3) {
            let top: Vec<String> = selected.iter().take(top_count).cloned().collect();
            let profile = PriorityProfile::new(&selected, &top).expect("valid profile");
            let weights =
                PriorityWeights::build(&TagRegistry::standard(), &profile, TierWeights::default());
            let sum: f64 = weights.iter().map(|(_, weight)| weight).sum();
            prop_assert!((sum - 1.0).abs() <= 1e-9);
            prop_assert!(weights.iter().all(|(_, weight)| weight >= 0.0));
        }
    }
}
