//! JSON request accepted by `hoodrank rank`.

use hoodrank_core::{Area, PriorityProfile};
use hoodrank_scorer::{Budget, ScoringConfig};
use serde::{Deserialize, Serialize};

/// Free-text budget answers as collected from the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetAnswers {
    /// Purchase budget, e.g. `"745000-1205000"`.
    #[serde(default)]
    pub buy: Option<String>,
    /// Monthly rent budget, e.g. `"1500"`.
    #[serde(default)]
    pub rent: Option<String>,
}

impl BudgetAnswers {
    /// Effective budget, preferring the purchase answer.
    #[must_use]
    pub fn resolve(&self) -> Option<Budget> {
        Budget::from_answers(self.buy.as_deref(), self.rent.as_deref())
    }
}

/// Everything needed for one ranking call.
///
/// # Examples
/// ```
/// use hoodrank_cli::RankRequest;
///
/// let request: RankRequest = serde_json::from_str(
///     r#"{
///         "areas": [{ "name": "Uccle", "metrics": { "parks_share": 0.4 } }],
///         "priorities": { "selected": ["green_parks"], "top3": ["green_parks"] },
///         "budget": { "rent": "1800" }
///     }"#,
/// )?;
/// assert_eq!(request.areas.len(), 1);
/// assert_eq!(request.budget.resolve().map(|budget| budget.amount), Some(1_800));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankRequest {
    /// Candidate areas of one city.
    pub areas: Vec<Area>,
    /// Selected and top priority tags.
    #[serde(default)]
    pub priorities: PriorityProfile,
    /// Budget answers.
    #[serde(default)]
    pub budget: BudgetAnswers,
    /// Scoring overrides; defaults apply when absent.
    #[serde(default)]
    pub config: Option<ScoringConfig>,
}
