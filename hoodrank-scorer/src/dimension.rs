//! Area ratings on the five scorecard dimensions.
//!
//! Safety, Family, Commute and Lifestyle are rated from the percentile of a
//! composite metric among sibling areas, then nudged by the area's tags.
//! BudgetFit compares the user's budget with price bands and penalises areas
//! under high cost pressure.

use std::collections::BTreeMap;

use hoodrank_core::{
    Area, DerivedMetric, Dimension, Distributions, MetricKey, Nudge, TagRegistry,
};
use serde::Serialize;

use crate::{Budget, DimensionScore, ScoringConfig};

/// Lowest rating the heuristics assign.
const MIN_RATING: u8 = 2;
/// Highest rating.
const MAX_RATING: u8 = 5;
/// Neutral BudgetFit when no budget is known.
const NEUTRAL_BUDGET_FIT: u8 = 3;

/// How one composite dimension was rated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingTrace {
    /// Composite metric rated.
    pub composite: DerivedMetric,
    /// Composite value for the area.
    pub raw: f64,
    /// Percentile among sibling areas.
    pub percentile: f64,
    /// Rating from the percentile buckets.
    pub base: u8,
    /// Net tag nudge: -1, 0 or +1.
    pub adjustment: i8,
    /// Whether a nudged 5 was capped at 4.
    pub demoted: bool,
    /// Final rating.
    pub rating: u8,
}

/// How BudgetFit was rated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetTrace {
    /// Effective budget, if one was supplied.
    pub budget: Option<Budget>,
    /// Whether the area carries a premium tag.
    pub premium: bool,
    /// Cost-pressure percentile among siblings, when a budget applies.
    pub pressure_percentile: Option<f64>,
    /// Band fit before the pressure penalty.
    pub base: u8,
    /// Pressure penalty.
    pub penalty: u8,
    /// Final rating.
    pub rating: u8,
}

/// Full explanation of an area's scorecard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionTrace {
    /// Composite dimension traces keyed by dimension.
    pub ratings: BTreeMap<Dimension, RatingTrace>,
    /// BudgetFit trace.
    pub budget: BudgetTrace,
}

/// A scorecard together with its explanation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredArea {
    /// Final ratings.
    pub score: DimensionScore,
    /// How each rating was reached.
    pub trace: DimensionTrace,
}

/// Rates areas against their siblings.
///
/// # Examples
/// ```
/// use hoodrank_core::{Dimension, Distributions, Scope, TagRegistry};
/// use hoodrank_core::test_support::area;
/// use hoodrank_scorer::{DimensionScorer, ScoringConfig};
///
/// let areas: Vec<_> = [0.1, 0.2, 0.3, 0.4, 0.5]
///     .into_iter()
///     .enumerate()
///     .map(|(index, parks)| area(&format!("area-{index}"), &[("parks_share", parks)], &[]))
///     .collect();
/// let registry = TagRegistry::standard();
/// let config = ScoringConfig::default();
/// let distributions = Distributions::for_scope(&areas, &registry, Scope::Area);
/// let scorer = DimensionScorer::new(&registry, &config);
/// let greenest = scorer.score(&areas[4], &distributions);
/// assert_eq!(greenest.score.get(Dimension::Safety), 5);
/// assert_eq!(greenest.score.get(Dimension::BudgetFit), 3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DimensionScorer<'a> {
    registry: &'a TagRegistry,
    config: &'a ScoringConfig,
    budget: Option<Budget>,
}

impl<'a> DimensionScorer<'a> {
    /// Create a scorer without a budget.
    #[must_use]
    pub const fn new(registry: &'a TagRegistry, config: &'a ScoringConfig) -> Self {
        Self {
            registry,
            config,
            budget: None,
        }
    }

    /// Use `budget` for BudgetFit.
    #[must_use]
    pub const fn with_budget(mut self, budget: Option<Budget>) -> Self {
        self.budget = budget;
        self
    }

    /// Rate `area` among the siblings described by `distributions`.
    #[must_use]
    pub fn score(&self, area: &Area, distributions: &Distributions) -> ScoredArea {
        let ratings: BTreeMap<Dimension, RatingTrace> = Dimension::ALL
            .into_iter()
            .filter_map(|dimension| {
                dimension
                    .composite()
                    .map(|composite| (dimension, self.rate(dimension, composite, area, distributions)))
            })
            .collect();
        let budget = self.budget_fit(area, distributions);
        let score = DimensionScore::from_fn(|dimension| match dimension {
            Dimension::BudgetFit => budget.rating,
            _ => ratings
                .get(&dimension)
                .map_or(NEUTRAL_BUDGET_FIT, |trace| trace.rating),
        });
        ScoredArea {
            score,
            trace: DimensionTrace { ratings, budget },
        }
    }

    fn rate(
        &self,
        dimension: Dimension,
        composite: DerivedMetric,
        area: &Area,
        distributions: &Distributions,
    ) -> RatingTrace {
        let raw = composite.evaluate(&area.metrics);
        let percentile = distributions.percentile(&MetricKey::Derived(composite), raw);
        let base = self.config.breakpoints.bucket(percentile);
        let adjustment = self.nudge(dimension, &area.tags);
        let nudged = i16::from(base) + i16::from(adjustment);
        let clamped = nudged.clamp(i16::from(MIN_RATING), i16::from(MAX_RATING));
        let mut rating = u8::try_from(clamped).unwrap_or(MIN_RATING);
        let demoted = dimension == Dimension::Safety
            && rating == MAX_RATING
            && base < MAX_RATING
            && adjustment > 0
            && percentile < self.config.safety_cap_percentile;
        if demoted {
            rating = MAX_RATING - 1;
        }
        RatingTrace {
            composite,
            raw,
            percentile,
            base,
            adjustment,
            demoted,
            rating,
        }
    }

    /// Any raising tag adds one, any lowering tag removes one.
    fn nudge(&self, dimension: Dimension, tags: &[String]) -> i8 {
        let nudges: Vec<Nudge> = tags
            .iter()
            .filter_map(|tag| self.registry.lookup(tag))
            .filter_map(|definition| definition.nudge_for(dimension, tags))
            .collect();
        let raise = i8::from(nudges.contains(&Nudge::Raise));
        let lower = i8::from(nudges.contains(&Nudge::Lower));
        raise - lower
    }

    fn budget_fit(&self, area: &Area, distributions: &Distributions) -> BudgetTrace {
        let premium = self.registry.any_premium(&area.tags);
        let Some(budget) = self.budget else {
            return BudgetTrace {
                budget: None,
                premium,
                pressure_percentile: None,
                base: NEUTRAL_BUDGET_FIT,
                penalty: 0,
                rating: NEUTRAL_BUDGET_FIT,
            };
        };
        let pressure = DerivedMetric::CostPressure;
        let percentile =
            distributions.percentile(&MetricKey::Derived(pressure), pressure.evaluate(&area.metrics));
        let penalty = self.config.pressure.penalty(percentile);
        let base = self.config.budget.base_fit(budget, premium);
        let rating = base.saturating_sub(penalty).clamp(MIN_RATING, MAX_RATING);
        BudgetTrace {
            budget: Some(budget),
            premium,
            pressure_percentile: Some(percentile),
            base,
            penalty,
            rating,
        }
    }
}
