//! Sub-area selection inside one area.
//!
//! Candidates are scored by tier-weighted tag affinity plus a bonus for
//! covering many selected tags. The best candidate is always picked first;
//! later picks are penalised for repeating the first pick's strongest tags so
//! the shortlist shows some variety.

use std::cmp::Ordering;

use hoodrank_core::{
    AffinityScorer, Area, Distributions, PercentileAffinity, PriorityProfile, Scope, SubArea,
    TagAffinity, TagRegistry, Tier, resolve_tag_affinity, validate_sub_areas,
};
use serde::Serialize;

use crate::{RankError, ScoringConfig, TierWeights};

/// One selected tag scored for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagContribution {
    /// Tag id.
    pub tag: String,
    /// Tier of the tag in the profile.
    pub tier: Tier,
    /// Multiplier for the tier.
    pub tier_weight: f64,
    /// Adjusted affinity multiplied by the tier weight.
    pub weighted: f64,
    /// Affinity detail.
    pub affinity: TagAffinity,
}

/// Score breakdown for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateScore {
    /// Sub-area name.
    pub name: String,
    /// Weighted affinity sum plus coverage bonus.
    pub score: f64,
    /// Selected tags at or above the coverage threshold.
    pub coverage_hits: usize,
    /// Bonus included in `score`.
    pub coverage_bonus: f64,
    /// Strongest tags by adjusted affinity, then tag id.
    pub top_tags: Vec<String>,
    /// Overlap penalty against the first pick, for later candidates.
    pub diversity_penalty: Option<f64>,
    /// Per-tag detail in profile order.
    pub contributions: Vec<TagContribution>,
}

/// Explanation of a sub-area selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubAreaDebug {
    /// Tier multipliers.
    pub tier_weights: TierWeights,
    /// Coverage threshold.
    pub coverage_threshold: f64,
    /// Full coverage bonus.
    pub coverage_bonus: f64,
    /// Penalty per shared strongest tag.
    pub overlap_penalty: f64,
    /// Whether the overlap penalty applied.
    pub diversity: bool,
    /// Selected tags in profile order.
    pub priority_tags: Vec<String>,
    /// Top tags in profile order.
    pub top_tags: Vec<String>,
    /// Number of candidates considered.
    pub candidate_count: usize,
    /// Selected tags missing from the registry.
    pub unresolved: Vec<String>,
    /// Picked candidates in pick order.
    pub selected: Vec<CandidateScore>,
    /// Candidate names ordered by score before diversity.
    pub ranking: Vec<String>,
}

/// Picked sub-area names and their explanation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubAreaSelection {
    /// Picked names in order, never repeated.
    pub names: Vec<String>,
    /// Explanation.
    pub debug: SubAreaDebug,
}

/// Picks the sub-areas that best match a priority profile.
///
/// # Examples
/// ```
/// use hoodrank_core::PriorityProfile;
/// use hoodrank_core::test_support::sub_area;
/// use hoodrank_scorer::SubAreaRanker;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let candidates = vec![
///     sub_area("Flagey", &[("bars_density", 6.0)], &[]),
///     sub_area("Chatelain", &[("bars_density", 9.0)], &[]),
///     sub_area("Brugmann", &[("bars_density", 1.0)], &[]),
/// ];
/// let profile = PriorityProfile::new(["nightlife"], ["nightlife"])?;
/// let selection = SubAreaRanker::with_defaults().rank(&candidates, &profile, 2)?;
/// assert_eq!(selection.names, ["Chatelain", "Flagey"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SubAreaRanker<S = PercentileAffinity> {
    registry: TagRegistry,
    config: ScoringConfig,
    scorer: S,
}

impl SubAreaRanker<PercentileAffinity> {
    /// Create a ranker using percentile affinity.
    ///
    /// # Errors
    /// Returns [`RankError::Config`] when `config` is invalid.
    pub fn new(registry: TagRegistry, config: ScoringConfig) -> Result<Self, RankError> {
        Self::with_scorer(registry, config, PercentileAffinity)
    }

    /// Ranker using the standard registry and default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            registry: TagRegistry::standard(),
            config: ScoringConfig::default(),
            scorer: PercentileAffinity,
        }
    }
}

impl Default for SubAreaRanker<PercentileAffinity> {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl<S: AffinityScorer> SubAreaRanker<S> {
    /// Create a ranker with a custom affinity scorer.
    ///
    /// # Errors
    /// Returns [`RankError::Config`] when `config` is invalid.
    pub fn with_scorer(
        registry: TagRegistry,
        config: ScoringConfig,
        scorer: S,
    ) -> Result<Self, RankError> {
        Ok(Self {
            registry,
            config: config.validate()?,
            scorer,
        })
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Rank the sub-areas of `area`.
    ///
    /// # Errors
    /// Returns [`RankError::Record`] for blank or repeated sub-area names.
    pub fn rank_within(
        &self,
        area: &Area,
        profile: &PriorityProfile,
        limit: usize,
    ) -> Result<SubAreaSelection, RankError> {
        validate_sub_areas(&area.name, &area.sub_areas)?;
        Ok(self.select(&area.sub_areas, profile, limit))
    }

    /// Rank a free-standing list of candidates.
    ///
    /// Returns at most `limit` names, fewer only when fewer candidates exist.
    ///
    /// # Errors
    /// Returns [`RankError::Record`] for blank or repeated names.
    pub fn rank(
        &self,
        candidates: &[SubArea],
        profile: &PriorityProfile,
        limit: usize,
    ) -> Result<SubAreaSelection, RankError> {
        validate_sub_areas("", candidates)?;
        Ok(self.select(candidates, profile, limit))
    }

    fn select(
        &self,
        candidates: &[SubArea],
        profile: &PriorityProfile,
        limit: usize,
    ) -> SubAreaSelection {
        let diversity = self.config.diversity;
        let distributions = Distributions::for_scope(candidates, &self.registry, Scope::SubArea);
        let mut ranked: Vec<CandidateScore> = candidates
            .iter()
            .map(|candidate| self.score_candidate(candidate, profile, &distributions))
            .collect();
        ranked.sort_by(compare_candidates);
        let ranking: Vec<String> = ranked.iter().map(|candidate| candidate.name.clone()).collect();
        let selected = pick(ranked, limit, diversity.enabled, diversity.overlap_penalty);
        let unresolved = profile
            .selected()
            .iter()
            .filter(|tag| self.registry.lookup(tag).is_none())
            .cloned()
            .collect();
        SubAreaSelection {
            names: selected.iter().map(|candidate| candidate.name.clone()).collect(),
            debug: SubAreaDebug {
                tier_weights: self.config.tiers,
                coverage_threshold: diversity.coverage_threshold,
                coverage_bonus: diversity.coverage_bonus,
                overlap_penalty: diversity.overlap_penalty,
                diversity: diversity.enabled,
                priority_tags: profile.selected().to_vec(),
                top_tags: profile.top().to_vec(),
                candidate_count: candidates.len(),
                unresolved,
                selected,
                ranking,
            },
        }
    }

    #[expect(clippy::float_arithmetic, reason = "weighted affinity sum")]
    fn score_candidate(
        &self,
        candidate: &SubArea,
        profile: &PriorityProfile,
        distributions: &Distributions,
    ) -> CandidateScore {
        let settings = self.config.diversity;
        let contributions: Vec<TagContribution> = profile
            .selected()
            .iter()
            .map(|tag| {
                let affinity =
                    resolve_tag_affinity(&self.registry, &self.scorer, tag, candidate, distributions);
                let tier = profile.tier(tag);
                let tier_weight = self.config.tiers.get(tier);
                TagContribution {
                    tag: tag.clone(),
                    tier,
                    tier_weight,
                    weighted: affinity.adjusted * tier_weight,
                    affinity,
                }
            })
            .collect();
        let weighted: f64 = contributions.iter().map(|contribution| contribution.weighted).sum();
        let coverage_hits = contributions
            .iter()
            .filter(|contribution| contribution.affinity.adjusted >= settings.coverage_threshold)
            .count();
        let coverage_bonus = match (
            u32::try_from(coverage_hits),
            u32::try_from(contributions.len()),
        ) {
            (Ok(hits), Ok(total)) if total > 0 => {
                settings.coverage_bonus * f64::from(hits) / f64::from(total)
            }
            _ => 0.0,
        };
        CandidateScore {
            name: candidate.name.clone(),
            score: weighted + coverage_bonus,
            coverage_hits,
            coverage_bonus,
            top_tags: strongest_tags(&contributions, settings.top_tags),
            diversity_penalty: None,
            contributions,
        }
    }
}

/// Tag ids ordered by adjusted affinity descending, then id.
fn strongest_tags(contributions: &[TagContribution], count: usize) -> Vec<String> {
    let mut ordered: Vec<&TagContribution> = contributions.iter().collect();
    ordered.sort_by(|left, right| {
        right
            .affinity
            .adjusted
            .total_cmp(&left.affinity.adjusted)
            .then_with(|| left.tag.cmp(&right.tag))
    });
    ordered
        .into_iter()
        .take(count)
        .map(|contribution| contribution.tag.clone())
        .collect()
}

/// Score descending, then case-folded name, then name.
fn compare_candidates(left: &CandidateScore, right: &CandidateScore) -> Ordering {
    right
        .score
        .total_cmp(&left.score)
        .then_with(|| left.name.to_lowercase().cmp(&right.name.to_lowercase()))
        .then_with(|| left.name.cmp(&right.name))
}

/// Take the leader, then the best of the rest after the overlap penalty.
///
/// The penalty only depends on the first pick, so a stable sort by penalised
/// score keeps ties with the earlier candidate.
#[expect(clippy::float_arithmetic, reason = "overlap penalty")]
fn pick(
    ranked: Vec<CandidateScore>,
    limit: usize,
    diversity: bool,
    overlap_penalty: f64,
) -> Vec<CandidateScore> {
    let mut remaining = ranked.into_iter();
    let Some(first) = remaining.next().filter(|_| limit > 0) else {
        return Vec::new();
    };
    let mut rest: Vec<CandidateScore> = remaining.collect();
    if diversity {
        for candidate in &mut rest {
            let shared = candidate
                .top_tags
                .iter()
                .filter(|tag| first.top_tags.contains(tag))
                .count();
            let penalty = u32::try_from(shared).map_or(0.0, |overlap| {
                overlap_penalty * f64::from(overlap)
            });
            candidate.diversity_penalty = Some(penalty);
        }
        rest.sort_by(|left, right| penalised(right).total_cmp(&penalised(left)));
    }
    let mut selected = Vec::with_capacity(limit.min(rest.len() + 1));
    selected.push(first);
    selected.extend(rest.into_iter().take(limit - 1));
    selected
}

#[expect(clippy::float_arithmetic, reason = "overlap penalty")]
fn penalised(candidate: &CandidateScore) -> f64 {
    candidate.score - candidate.diversity_penalty.unwrap_or(0.0)
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests should fail fast when setup breaks")]
mod tests {
    use super::*;
    use hoodrank_core::test_support::sub_area;
    use proptest::prelude::*;
    use rstest::rstest;

    fn candidates(count: u8) -> Vec<SubArea> {
        (0..count)
            .map(|index| {
                let level = f64::from(index);
                sub_area(
                    &format!("sub-{index}"),
                    &[("bars_density", level), ("parks_share", 1.0 - level / 10.0)],
                    &[],
                )
            })
            .collect()
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(2, 2)]
    #[case(5, 3)]
    fn limit_caps_the_selection(#[case] limit: usize, #[case] expected: usize) {
        let profile = PriorityProfile::new(["nightlife"], ["nightlife"]).expect("profile");
        let selection = SubAreaRanker::with_defaults()
            .rank(&candidates(3), &profile, limit)
            .expect("selection");
        assert_eq!(selection.names.len(), expected);
        assert_eq!(selection.debug.candidate_count, 3);
    }

    #[rstest]
    fn coverage_bonus_scales_with_hits() {
        let profile = PriorityProfile::new(["nightlife", "sea_view"], ["nightlife"]).expect("profile");
        let selection = SubAreaRanker::with_defaults()
            .rank(&candidates(4), &profile, 1)
            .expect("selection");
        let leader = selection.debug.selected.first().expect("leader");
        assert_eq!(leader.name, "sub-3");
        assert_eq!(leader.coverage_hits, 1);
        assert!((leader.coverage_bonus - 0.125).abs() < 1e-12);
        assert_eq!(selection.debug.unresolved, vec!["sea_view".to_owned()]);
    }

    #[rstest]
    fn names_tie_break_case_insensitively() {
        let tied = vec![
            sub_area("beta", &[], &[]),
            sub_area("Alpha", &[], &[]),
            sub_area("alpha", &[], &[]),
        ];
        let selection = SubAreaRanker::with_defaults()
            .rank(&tied, &PriorityProfile::default(), 3)
            .expect("selection");
        assert_eq!(selection.debug.ranking, ["Alpha", "alpha", "beta"]);
    }

    #[rstest]
    fn duplicate_sub_areas_in_an_area_are_rejected() {
        let mut area = hoodrank_core::test_support::area("Ixelles", &[], &[]);
        area.sub_areas = vec![sub_area("Flagey", &[], &[]), sub_area("Flagey", &[], &[])];
        let result = SubAreaRanker::with_defaults().rank_within(&area, &PriorityProfile::default(), 2);
        assert!(matches!(result, Err(RankError::Record(_))));
    }

    proptest! {
        #[test]
        fn selections_never_repeat(count in 0u8..9, limit in 0usize..6, diversity in any::<bool>()) {
            let mut config = ScoringConfig::default();
            config.diversity.enabled = diversity;
            let ranker = SubAreaRanker::new(TagRegistry::standard(), config).expect("ranker");
            let profile = PriorityProfile::new(["nightlife", "green_parks"], ["green_parks"]).expect("profile");
            let selection = ranker.rank(&candidates(count), &profile, limit).expect("selection");
            let mut names = selection.names.clone();
            names.sort();
            names.dedup();
            prop_assert_eq!(names.len(), selection.names.len());
            prop_assert_eq!(selection.names.len(), limit.min(usize::from(count)));
        }
    }
}
