//! The five fixed scorecard dimensions.
//!
//! # Examples
//! ```
//! use hoodrank_core::Dimension;
//!
//! assert_eq!(Dimension::BudgetFit.as_str(), "BudgetFit");
//! assert_eq!("budget_fit".parse::<Dimension>(), Ok(Dimension::BudgetFit));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DerivedMetric;

/// A scorecard dimension rated from 1 to 5.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Dimension {
    /// Quiet streets and low night-time activity.
    Safety,
    /// Schools, childcare and green space.
    Family,
    /// Public transport reach.
    Commute,
    /// Cafes, restaurants, bars and culture.
    Lifestyle,
    /// Affordability against the user's budget.
    BudgetFit,
}

impl Dimension {
    /// Every dimension in scorecard order.
    pub const ALL: [Self; 5] = [
        Self::Safety,
        Self::Family,
        Self::Commute,
        Self::Lifestyle,
        Self::BudgetFit,
    ];

    /// Return the dimension name as it appears on the scorecard.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safety => "Safety",
            Self::Family => "Family",
            Self::Commute => "Commute",
            Self::Lifestyle => "Lifestyle",
            Self::BudgetFit => "BudgetFit",
        }
    }

    /// Composite metric rated by percentile, or `None` for
    /// [`Dimension::BudgetFit`], which uses the budget heuristic.
    #[must_use]
    pub const fn composite(self) -> Option<DerivedMetric> {
        match self {
            Self::Safety => Some(DerivedMetric::SafetyComposite),
            Self::Family => Some(DerivedMetric::FamilyComposite),
            Self::Commute => Some(DerivedMetric::CommuteComposite),
            Self::Lifestyle => Some(DerivedMetric::LifestyleComposite),
            Self::BudgetFit => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "safety" => Ok(Self::Safety),
            "family" => Ok(Self::Family),
            "commute" => Ok(Self::Commute),
            "lifestyle" => Ok(Self::Lifestyle),
            "budgetfit" | "budget_fit" => Ok(Self::BudgetFit),
            _ => Err(format!("unknown dimension '{s}'")),
        }
    }
}
