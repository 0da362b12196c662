//! Scoring and ranking for hoodrank.
//!
//! The crate turns validated records from `hoodrank_core` into ranked
//! recommendations:
//! - **Dimension scoring** rates each area on Safety, Family, Commute,
//!   Lifestyle and BudgetFit from sibling percentiles, tag nudges and the
//!   user's budget. See [`DimensionScorer`].
//! - **Area ranking** weights the scorecard by the user's priorities and
//!   reconciles the order against Overall. See [`AreaRanker`].
//! - **Sub-area ranking** picks a short, varied list of sub-areas inside an
//!   area. See [`SubAreaRanker`].
//! - **Shortlists** combine both for the leading areas. See [`Shortlister`].
//!
//! Every threshold lives in [`ScoringConfig`]. Unknown tags and missing
//! metrics never fail a call; they score neutrally and show up in the debug
//! payloads.
//!
//! # Examples
//!
//! ```
//! use hoodrank_core::PriorityProfile;
//! use hoodrank_core::test_support::area;
//! use hoodrank_scorer::{Budget, Shortlister, TenureMode};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let areas = vec![
//!     area("Forest", &[("parks_share", 0.4)], &["residential_quiet"]),
//!     area("Saint-Gilles", &[("bars_density", 9.0)], &["nightlife"]),
//! ];
//! let profile = PriorityProfile::new(["residential_quiet"], ["residential_quiet"])?;
//! let budget = Budget::from_expression(TenureMode::Rent, "1400-1800");
//! let shortlist = Shortlister::with_defaults().shortlist(&areas, &profile, budget.as_ref())?;
//! assert_eq!(shortlist.ranking.areas[0].area.name, "Forest");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod area;
mod budget;
mod config;
mod dimension;
mod error;
mod score;
mod shortlist;
mod subarea;
mod weights;

pub use area::{
    AreaRanker, AreaRanking, RankDebug, RankedArea, Reconcilable, ReconcileStats, reconcile,
};
pub use budget::{
    Budget, BudgetTiers, PriceBand, PriceRange, TenureBands, TenureMode, parse_price_range,
};
pub use config::{
    Breakpoints, DiversitySettings, PressureThresholds, ReconcileThresholds, ScoringConfig,
    TierWeights,
};
pub use dimension::{BudgetTrace, DimensionScorer, DimensionTrace, RatingTrace, ScoredArea};
pub use error::{ConfigError, RankError};
pub use score::DimensionScore;
pub use shortlist::{AreaShortlist, Shortlist, ShortlistOptions, Shortlister};
pub use subarea::{CandidateScore, SubAreaDebug, SubAreaRanker, SubAreaSelection, TagContribution};
pub use weights::{PriorityWeights, TagWeight, WeightsTrace};
