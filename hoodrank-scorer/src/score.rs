//! The 1 to 5 scorecard attached to each area.

use hoodrank_core::Dimension;
use serde::{Deserialize, Serialize};

/// Ratings on the five dimensions plus the derived Overall.
///
/// Every rating is clamped into `1..=5`. Overall is never stored
/// independently: it is the half-up rounded mean of the five ratings.
///
/// # Examples
/// ```
/// use hoodrank_core::Dimension;
/// use hoodrank_scorer::DimensionScore;
///
/// let score = DimensionScore::new(5, 4, 3, 3, 2);
/// assert_eq!(score.overall(), 3);
/// assert_eq!(DimensionScore::new(5, 5, 3, 3, 2).overall(), 4);
/// assert_eq!(score.get(Dimension::Safety), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Scorecard", from = "Scorecard")]
pub struct DimensionScore {
    safety: u8,
    family: u8,
    commute: u8,
    lifestyle: u8,
    budget_fit: u8,
}

impl DimensionScore {
    /// Build a score, clamping each rating into `1..=5`.
    #[must_use]
    pub fn new(safety: u8, family: u8, commute: u8, lifestyle: u8, budget_fit: u8) -> Self {
        Self {
            safety: safety.clamp(1, 5),
            family: family.clamp(1, 5),
            commute: commute.clamp(1, 5),
            lifestyle: lifestyle.clamp(1, 5),
            budget_fit: budget_fit.clamp(1, 5),
        }
    }

    /// Build a score from a per-dimension lookup.
    #[must_use]
    pub fn from_fn(mut rating: impl FnMut(Dimension) -> u8) -> Self {
        Self::new(
            rating(Dimension::Safety),
            rating(Dimension::Family),
            rating(Dimension::Commute),
            rating(Dimension::Lifestyle),
            rating(Dimension::BudgetFit),
        )
    }

    /// Rating for `dimension`.
    #[must_use]
    pub const fn get(&self, dimension: Dimension) -> u8 {
        match dimension {
            Dimension::Safety => self.safety,
            Dimension::Family => self.family,
            Dimension::Commute => self.commute,
            Dimension::Lifestyle => self.lifestyle,
            Dimension::BudgetFit => self.budget_fit,
        }
    }

    /// Half-up rounded mean of the five ratings, in `1..=5`.
    #[expect(
        clippy::integer_division,
        reason = "half-up rounding of a mean of small integers"
    )]
    #[must_use]
    pub fn overall(&self) -> u8 {
        let sum: u16 = Dimension::ALL
            .into_iter()
            .map(|dimension| u16::from(self.get(dimension)))
            .sum();
        let rounded = (2 * sum + 5) / 10;
        u8::try_from(rounded).map_or(5, |value| value.clamp(1, 5))
    }

    /// Iterate over `(dimension, rating)` pairs in scorecard order.
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, u8)> + '_ {
        Dimension::ALL
            .into_iter()
            .map(|dimension| (dimension, self.get(dimension)))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Scorecard {
    safety: u8,
    family: u8,
    commute: u8,
    lifestyle: u8,
    budget_fit: u8,
    #[serde(default)]
    overall: u8,
}

impl From<DimensionScore> for Scorecard {
    fn from(score: DimensionScore) -> Self {
        Self {
            safety: score.safety,
            family: score.family,
            commute: score.commute,
            lifestyle: score.lifestyle,
            budget_fit: score.budget_fit,
            overall: score.overall(),
        }
    }
}

impl From<Scorecard> for DimensionScore {
    fn from(card: Scorecard) -> Self {
        Self::new(
            card.safety,
            card.family,
            card.commute,
            card.lifestyle,
            card.budget_fit,
        )
    }
}
