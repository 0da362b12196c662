//! Area ranking: priority fit first, reconciled against Overall.
//!
//! Areas are ordered by profile score with fixed tie-breaks. A bounded
//! adjacent-swap pass then lets an area with a clearly better Overall move
//! above a neighbour whose profile lead is small.

use std::cmp::Ordering;

use hoodrank_core::{Area, Dimension, Distributions, PriorityProfile, Scope, TagRegistry, validate_areas};
use serde::Serialize;

use crate::{
    Budget, DimensionScore, DimensionScorer, DimensionTrace, PriorityWeights, RankError,
    ReconcileThresholds, ScoringConfig,
};

/// Explanation attached to each ranked area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankDebug {
    /// Weighted fit against the priorities.
    pub profile_score: f64,
    /// Overall rating.
    pub overall: u8,
    /// Weights used, with their trace.
    pub weights: PriorityWeights,
    /// How each dimension was rated.
    pub dimensions: DimensionTrace,
}

/// An area with its scorecard and final position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedArea {
    /// The input record.
    pub area: Area,
    /// Ratings on the five dimensions.
    pub scores: DimensionScore,
    /// Weighted fit against the priorities.
    pub profile_score: f64,
    /// 1-based contiguous rank.
    pub rank: usize,
    /// Explanation.
    pub debug: RankDebug,
}

/// Outcome of the reconciliation loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    /// Full passes run, including the final pass without swaps.
    pub passes: usize,
    /// Adjacent swaps made.
    pub swaps: usize,
}

/// Ranked areas and the weights that ordered them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaRanking {
    /// Areas in rank order.
    pub areas: Vec<RankedArea>,
    /// Weights shared by every area.
    pub weights: PriorityWeights,
    /// Reconciliation outcome.
    pub reconcile: ReconcileStats,
}

/// Items that take part in Overall reconciliation.
pub trait Reconcilable {
    /// Overall rating.
    fn overall(&self) -> u8;
    /// Profile score.
    fn profile_score(&self) -> f64;
}

impl Reconcilable for RankedArea {
    fn overall(&self) -> u8 {
        self.scores.overall()
    }

    fn profile_score(&self) -> f64 {
        self.profile_score
    }
}

/// Swap adjacent items while the later one has a clearly better Overall and
/// the earlier one's profile lead is small.
///
/// Runs full passes until one makes no swap. Every swap removes an Overall
/// inversion, so at most `n(n-1)/2 + 1` passes run.
///
/// # Examples
/// ```
/// use hoodrank_scorer::{Reconcilable, ReconcileThresholds, reconcile};
///
/// struct Entry(u8, f64);
///
/// impl Reconcilable for Entry {
///     fn overall(&self) -> u8 { self.0 }
///     fn profile_score(&self) -> f64 { self.1 }
/// }
///
/// let mut entries = vec![Entry(3, 3.9), Entry(5, 3.6)];
/// let stats = reconcile(&mut entries, ReconcileThresholds::default());
/// assert_eq!(stats.swaps, 1);
/// assert_eq!(entries[0].0, 5);
/// ```
#[expect(clippy::float_arithmetic, reason = "profile score difference")]
pub fn reconcile<T: Reconcilable>(items: &mut [T], thresholds: ReconcileThresholds) -> ReconcileStats {
    let count = items.len();
    let max_passes = count
        .saturating_mul(count.saturating_sub(1))
        .checked_div(2)
        .unwrap_or(0)
        .saturating_add(1);
    let gap = i16::from(thresholds.overall_gap);
    let mut stats = ReconcileStats::default();
    while stats.passes < max_passes {
        stats.passes += 1;
        let mut swapped = false;
        for index in 1..count {
            let earlier_index = index - 1;
            let (Some(earlier), Some(later)) = (items.get(earlier_index), items.get(index)) else {
                continue;
            };
            let overall_gain = i16::from(later.overall()) - i16::from(earlier.overall());
            let profile_lead = earlier.profile_score() - later.profile_score();
            if overall_gain >= gap && profile_lead <= thresholds.profile_epsilon {
                log::debug!(
                    "reconcile: moving position {} above {} (overall +{overall_gain}, profile lead {profile_lead:.3})",
                    index + 1,
                    index
                );
                items.swap(earlier_index, index);
                stats.swaps += 1;
                swapped = true;
            }
        }
        if !swapped {
            break;
        }
    }
    stats
}

/// Ranks the areas of one city against a priority profile.
///
/// # Examples
/// ```
/// use hoodrank_core::{PriorityProfile, TagRegistry};
/// use hoodrank_core::test_support::area;
/// use hoodrank_scorer::AreaRanker;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let areas = vec![
///     area("Schaerbeek", &[("metro_density", 1.0)], &[]),
///     area("Etterbeek", &[("metro_density", 4.0)], &["metro_strong"]),
/// ];
/// let profile = PriorityProfile::new(["metro_strong"], ["metro_strong"])?;
/// let ranking = AreaRanker::with_defaults().rank(&areas, &profile, None)?;
/// assert_eq!(ranking.areas[0].area.name, "Etterbeek");
/// assert_eq!(ranking.areas[1].rank, 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AreaRanker {
    registry: TagRegistry,
    config: ScoringConfig,
}

impl AreaRanker {
    /// Create a ranker with a validated configuration.
    ///
    /// # Errors
    /// Returns [`RankError::Config`] when `config` is invalid.
    pub fn new(registry: TagRegistry, config: ScoringConfig) -> Result<Self, RankError> {
        Ok(Self {
            registry,
            config: config.validate()?,
        })
    }

    /// Ranker using the standard registry and default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            registry: TagRegistry::standard(),
            config: ScoringConfig::default(),
        }
    }

    /// Registry used for tag lookups.
    #[must_use]
    pub const fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score, order and reconcile `areas`.
    ///
    /// The result depends only on the inputs, not on the order of `areas`.
    ///
    /// # Errors
    /// Returns [`RankError::Record`] for blank or repeated names before any
    /// scoring happens.
    pub fn rank(
        &self,
        areas: &[Area],
        profile: &PriorityProfile,
        budget: Option<&Budget>,
    ) -> Result<AreaRanking, RankError> {
        validate_areas(areas)?;
        let weights = PriorityWeights::build(&self.registry, profile, self.config.tiers);
        let distributions = Distributions::for_scope(areas, &self.registry, Scope::Area);
        let scorer =
            DimensionScorer::new(&self.registry, &self.config).with_budget(budget.copied());
        let mut ranked: Vec<RankedArea> = areas
            .iter()
            .map(|area| {
                let scored = scorer.score(area, &distributions);
                let profile_score = weights.profile_score(&scored.score);
                RankedArea {
                    area: area.clone(),
                    scores: scored.score,
                    profile_score,
                    rank: 0,
                    debug: RankDebug {
                        profile_score,
                        overall: scored.score.overall(),
                        weights: weights.clone(),
                        dimensions: scored.trace,
                    },
                }
            })
            .collect();
        ranked.sort_by(compare_ranked);
        let reconcile_stats = reconcile(&mut ranked, self.config.reconcile);
        for (position, entry) in ranked.iter_mut().enumerate() {
            entry.rank = position + 1;
        }
        Ok(AreaRanking {
            areas: ranked,
            weights,
            reconcile: reconcile_stats,
        })
    }
}

impl Default for AreaRanker {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Profile score, Overall, Family and Safety descending, then name.
fn compare_ranked(left: &RankedArea, right: &RankedArea) -> Ordering {
    right
        .profile_score
        .total_cmp(&left.profile_score)
        .then_with(|| right.scores.overall().cmp(&left.scores.overall()))
        .then_with(|| {
            right
                .scores
                .get(Dimension::Family)
                .cmp(&left.scores.get(Dimension::Family))
        })
        .then_with(|| {
            right
                .scores
                .get(Dimension::Safety)
                .cmp(&left.scores.get(Dimension::Safety))
        })
        .then_with(|| left.area.name.cmp(&right.area.name))
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests should fail fast when setup breaks")]
mod tests {
    use super::*;
    use hoodrank_core::test_support::area;
    use proptest::prelude::*;
    use rstest::rstest;

    #[derive(Debug, Clone)]
    struct Entry {
        overall: u8,
        profile: f64,
    }

    impl Reconcilable for Entry {
        fn overall(&self) -> u8 {
            self.overall
        }

        fn profile_score(&self) -> f64 {
            self.profile
        }
    }

    #[rstest]
    fn worst_case_reverses_within_the_pass_bound() {
        let mut entries: Vec<Entry> = [1, 3, 5]
            .into_iter()
            .map(|overall| Entry {
                overall,
                profile: 4.0,
            })
            .collect();
        let stats = reconcile(&mut entries, ReconcileThresholds::default());
        let order: Vec<u8> = entries.iter().map(|entry| entry.overall).collect();
        assert_eq!(order, vec![5, 3, 1]);
        assert_eq!(stats.swaps, 3);
        assert!(stats.passes <= 3 * 2 / 2 + 1);
    }

    #[rstest]
    fn large_profile_leads_are_kept() {
        let mut entries = vec![
            Entry {
                overall: 3,
                profile: 4.2,
            },
            Entry {
                overall: 5,
                profile: 3.6,
            },
        ];
        let stats = reconcile(&mut entries, ReconcileThresholds::default());
        assert_eq!(stats.swaps, 0);
        assert_eq!(stats.passes, 1);
    }

    #[rstest]
    fn duplicate_area_names_are_rejected() {
        let areas = vec![area("Uccle", &[], &[]), area("Uccle", &[], &[])];
        let profile = PriorityProfile::default();
        let result = AreaRanker::with_defaults().rank(&areas, &profile, None);
        assert!(matches!(result, Err(RankError::Record(_))));
    }

    #[rstest]
    fn invalid_configuration_is_rejected() {
        let mut config = ScoringConfig::default();
        config.safety_cap_percentile = 1.5;
        assert!(matches!(
            AreaRanker::new(TagRegistry::standard(), config),
            Err(RankError::Config(_))
        ));
    }

    fn city() -> impl Strategy<Value = Vec<Area>> {
        prop::collection::vec(
            (0.0..1.0f64, 0.0..20.0f64, 0.0..10.0f64, 0.0..5.0f64, any::<bool>()),
            1..8,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(index, (parks, cafes, bars, metro, quiet))| {
                    let tags: &[&str] = if quiet { &["residential_quiet"] } else { &["nightlife"] };
                    area(
                        &format!("area-{index}"),
                        &[
                            ("parks_share", parks),
                            ("cafes_density", cafes),
                            ("bars_density", bars),
                            ("metro_density", metro),
                        ],
                        tags,
                    )
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn ranking_ignores_input_order(areas in city()) {
            let ranker = AreaRanker::with_defaults();
            let profile = PriorityProfile::new(["families", "nightlife"], ["families"]).expect("profile");
            let forward = ranker.rank(&areas, &profile, None).expect("forward ranking");
            let mut reversed_input = areas.clone();
            reversed_input.reverse();
            let reversed = ranker.rank(&reversed_input, &profile, None).expect("reversed ranking");
            let names = |ranking: &AreaRanking| -> Vec<String> {
                ranking.areas.iter().map(|entry| entry.area.name.clone()).collect()
            };
            prop_assert_eq!(names(&forward), names(&reversed));
            let ranks: Vec<usize> = forward.areas.iter().map(|entry| entry.rank).collect();
            prop_assert_eq!(ranks, (1..=areas.len()).collect::<Vec<_>>());
        }

        #[test]
        fn reconciliation_is_idempotent(areas in city()) {
            let ranker = AreaRanker::with_defaults();
            let profile = PriorityProfile::new(["metro_strong"], Vec::<String>::new()).expect("profile");
            let mut ranking = ranker.rank(&areas, &profile, None).expect("ranking");
            let again = reconcile(&mut ranking.areas, ranker.config().reconcile);
            prop_assert_eq!(again.swaps, 0);
            prop_assert_eq!(again.passes, 1);
        }
    }
}
