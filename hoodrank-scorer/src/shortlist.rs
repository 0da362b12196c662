//! Area ranking followed by sub-area picks for the leading areas.

use hoodrank_core::{AffinityScorer, Area, PercentileAffinity, PriorityProfile, TagRegistry};
use serde::{Deserialize, Serialize};

use crate::{AreaRanker, AreaRanking, Budget, RankError, ScoringConfig, SubAreaRanker, SubAreaSelection};

/// How much of the ranking to expand into sub-areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortlistOptions {
    /// Leading areas whose sub-areas are ranked.
    pub top_areas: usize,
    /// Sub-areas picked per area.
    pub sub_area_limit: usize,
}

impl Default for ShortlistOptions {
    fn default() -> Self {
        Self {
            top_areas: 3,
            sub_area_limit: 2,
        }
    }
}

/// Sub-area picks for one ranked area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaShortlist {
    /// Area name.
    pub area: String,
    /// Rank of the area.
    pub rank: usize,
    /// Picked sub-areas.
    pub selection: SubAreaSelection,
}

/// Full ranking plus sub-area picks for the leading areas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shortlist {
    /// Every area in rank order.
    pub ranking: AreaRanking,
    /// Sub-area picks in rank order.
    pub sub_areas: Vec<AreaShortlist>,
}

/// Runs both rankers with one registry and configuration.
///
/// # Examples
/// ```
/// use hoodrank_core::PriorityProfile;
/// use hoodrank_core::test_support::{area, sub_area};
/// use hoodrank_scorer::Shortlister;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut ixelles = area("Ixelles", &[("bars_density", 5.0)], &["nightlife"]);
/// ixelles.sub_areas = vec![
///     sub_area("Flagey", &[("bars_density", 6.0)], &[]),
///     sub_area("Brugmann", &[("bars_density", 1.0)], &[]),
/// ];
/// let profile = PriorityProfile::new(["nightlife"], ["nightlife"])?;
/// let shortlist = Shortlister::with_defaults().shortlist(&[ixelles], &profile, None)?;
/// assert_eq!(shortlist.sub_areas[0].selection.names, ["Flagey", "Brugmann"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Shortlister<S = PercentileAffinity> {
    areas: AreaRanker,
    sub_areas: SubAreaRanker<S>,
    options: ShortlistOptions,
}

impl Shortlister<PercentileAffinity> {
    /// Create a shortlister with a validated configuration.
    ///
    /// # Errors
    /// Returns [`RankError::Config`] when `config` is invalid.
    pub fn new(
        registry: TagRegistry,
        config: ScoringConfig,
        options: ShortlistOptions,
    ) -> Result<Self, RankError> {
        Ok(Self {
            areas: AreaRanker::new(registry.clone(), config)?,
            sub_areas: SubAreaRanker::new(registry, config)?,
            options,
        })
    }

    /// Shortlister with the standard registry and defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            areas: AreaRanker::with_defaults(),
            sub_areas: SubAreaRanker::with_defaults(),
            options: ShortlistOptions::default(),
        }
    }
}

impl<S: AffinityScorer> Shortlister<S> {
    /// Options in use.
    #[must_use]
    pub const fn options(&self) -> ShortlistOptions {
        self.options
    }

    /// Rank `areas`, then pick sub-areas inside the leading ones.
    ///
    /// # Errors
    /// Returns [`RankError::Record`] when any area or sub-area name is blank
    /// or repeated.
    pub fn shortlist(
        &self,
        areas: &[Area],
        profile: &PriorityProfile,
        budget: Option<&Budget>,
    ) -> Result<Shortlist, RankError> {
        let ranking = self.areas.rank(areas, profile, budget)?;
        let sub_areas = ranking
            .areas
            .iter()
            .take(self.options.top_areas)
            .map(|ranked| {
                self.sub_areas
                    .rank_within(&ranked.area, profile, self.options.sub_area_limit)
                    .map(|selection| AreaShortlist {
                        area: ranked.area.name.clone(),
                        rank: ranked.rank,
                        selection,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Shortlist { ranking, sub_areas })
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests should fail fast when setup breaks")]
mod tests {
    use super::*;
    use hoodrank_core::test_support::{area, sub_area};
    use rstest::rstest;

    fn city() -> Vec<Area> {
        (1..=4_u8)
            .map(|step| {
                let mut record = area(
                    &format!("area-{step}"),
                    &[("metro_density", f64::from(step))],
                    &[],
                );
                record.sub_areas = vec![
                    sub_area("north", &[("metro_density", 1.0)], &[]),
                    sub_area("south", &[("metro_density", 2.0)], &[]),
                    sub_area("west", &[("metro_density", 3.0)], &[]),
                ];
                record
            })
            .collect()
    }

    #[rstest]
    fn expands_only_the_leading_areas() {
        let profile = PriorityProfile::new(["metro_strong"], ["metro_strong"]).expect("profile");
        let shortlist = Shortlister::with_defaults()
            .shortlist(&city(), &profile, None)
            .expect("shortlist");
        assert_eq!(shortlist.ranking.areas.len(), 4);
        let expanded: Vec<&str> = shortlist.sub_areas.iter().map(|entry| entry.area.as_str()).collect();
        assert_eq!(expanded, ["area-4", "area-3", "area-2"]);
        for entry in &shortlist.sub_areas {
            assert_eq!(entry.selection.names, ["west", "south"]);
        }
    }

    #[rstest]
    fn blank_sub_area_names_fail_the_call() {
        let mut areas = city();
        if let Some(first) = areas.first_mut() {
            first.sub_areas.push(sub_area(" ", &[], &[]));
        }
        let profile = PriorityProfile::default();
        let result = Shortlister::with_defaults().shortlist(&areas, &profile, None);
        assert!(matches!(result, Err(RankError::Record(_))));
    }
}
