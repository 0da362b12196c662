//! Tunable thresholds for dimension scoring and ranking.
//!
//! The defaults are hand-tuned and preserved for behavioural compatibility.
//! Every value can be overridden, and [`ScoringConfig::validate`] rejects
//! combinations the scorers cannot honour.

use hoodrank_core::Tier;
use serde::{Deserialize, Serialize};

use crate::{BudgetTiers, ConfigError};

/// Percentile cut points mapping a sibling percentile to a rating of 2 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakpoints {
    /// Below this percentile the rating is 2.
    pub low: f64,
    /// Below this percentile the rating is 3.
    pub mid: f64,
    /// Below this percentile the rating is 4; otherwise 5.
    pub high: f64,
}

impl Breakpoints {
    /// Map a percentile to a base rating.
    ///
    /// # Examples
    /// ```
    /// use hoodrank_scorer::Breakpoints;
    ///
    /// let breakpoints = Breakpoints::default();
    /// assert_eq!(breakpoints.bucket(0.1), 2);
    /// assert_eq!(breakpoints.bucket(0.55), 4);
    /// assert_eq!(breakpoints.bucket(0.8), 5);
    /// ```
    #[must_use]
    pub fn bucket(self, percentile: f64) -> u8 {
        if percentile < self.low {
            2
        } else if percentile < self.mid {
            3
        } else if percentile < self.high {
            4
        } else {
            5
        }
    }
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            low: 0.25,
            mid: 0.55,
            high: 0.80,
        }
    }
}

/// Cost-pressure percentiles that reduce budget fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PressureThresholds {
    /// At or above this percentile the penalty is 1.
    pub moderate: f64,
    /// At or above this percentile the penalty is 2.
    pub high: f64,
}

impl PressureThresholds {
    /// Penalty for a cost-pressure percentile.
    #[must_use]
    pub fn penalty(self, percentile: f64) -> u8 {
        if percentile >= self.high {
            2
        } else if percentile >= self.moderate {
            1
        } else {
            0
        }
    }
}

impl Default for PressureThresholds {
    fn default() -> Self {
        Self {
            moderate: 0.55,
            high: 0.80,
        }
    }
}

/// When a lower-placed area with a clearly better Overall may move up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileThresholds {
    /// Minimum Overall advantage of the later area.
    pub overall_gap: u8,
    /// Maximum profile-score lead of the earlier area.
    pub profile_epsilon: f64,
}

impl Default for ReconcileThresholds {
    fn default() -> Self {
        Self {
            overall_gap: 2,
            profile_epsilon: 0.45,
        }
    }
}

/// Multipliers for top and other selected tags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierWeights {
    /// Weight of a top tag.
    pub top: f64,
    /// Weight of any other selected tag.
    pub other: f64,
}

impl TierWeights {
    /// Weight for `tier`.
    #[must_use]
    pub const fn get(self, tier: Tier) -> f64 {
        match tier {
            Tier::Top => self.top,
            Tier::Other => self.other,
        }
    }
}

impl Default for TierWeights {
    fn default() -> Self {
        Self {
            top: 1.0,
            other: 0.55,
        }
    }
}

/// Sub-area coverage bonus and diversity settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiversitySettings {
    /// Penalise later picks that repeat the first pick's strongest tags.
    pub enabled: bool,
    /// Adjusted affinity at which a tag counts as covered.
    pub coverage_threshold: f64,
    /// Bonus for covering every selected tag.
    pub coverage_bonus: f64,
    /// Penalty per shared strongest tag.
    pub overlap_penalty: f64,
    /// Number of strongest tags compared between picks.
    pub top_tags: usize,
}

impl Default for DiversitySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            coverage_threshold: 0.6,
            coverage_bonus: 0.25,
            overlap_penalty: 0.08,
            top_tags: 3,
        }
    }
}

/// Complete scoring configuration.
///
/// # Examples
/// ```
/// use hoodrank_scorer::ScoringConfig;
///
/// let mut config = ScoringConfig::default();
/// config.reconcile.overall_gap = 0;
/// assert!(config.validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Percentile buckets for composite dimensions.
    pub breakpoints: Breakpoints,
    /// Minimum percentile for a nudged Safety rating to stay at 5.
    pub safety_cap_percentile: f64,
    /// Cost-pressure penalty thresholds.
    pub pressure: PressureThresholds,
    /// Price bands for the base budget fit.
    pub budget: BudgetTiers,
    /// Overall reconciliation thresholds.
    pub reconcile: ReconcileThresholds,
    /// Tier multipliers.
    pub tiers: TierWeights,
    /// Sub-area coverage and diversity.
    pub diversity: DiversitySettings,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            breakpoints: Breakpoints::default(),
            safety_cap_percentile: 0.85,
            pressure: PressureThresholds::default(),
            budget: BudgetTiers::default(),
            reconcile: ReconcileThresholds::default(),
            tiers: TierWeights::default(),
            diversity: DiversitySettings::default(),
        }
    }
}

impl ScoringConfig {
    /// Validate the configuration and return a copy.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when a percentile leaves `0.0..=1.0`, cut
    /// points are out of order, a weight or penalty is negative or not
    /// finite, the Overall gap is zero, or no tags are compared for
    /// diversity.
    pub fn validate(self) -> Result<Self, ConfigError> {
        let breakpoints = self.breakpoints;
        for (field, value) in [
            ("breakpoints.low", breakpoints.low),
            ("breakpoints.mid", breakpoints.mid),
            ("breakpoints.high", breakpoints.high),
            ("safety_cap_percentile", self.safety_cap_percentile),
            ("pressure.moderate", self.pressure.moderate),
            ("pressure.high", self.pressure.high),
            ("diversity.coverage_threshold", self.diversity.coverage_threshold),
        ] {
            unit_interval(field, value)?;
        }
        for (field, value) in [
            ("reconcile.profile_epsilon", self.reconcile.profile_epsilon),
            ("tiers.top", self.tiers.top),
            ("tiers.other", self.tiers.other),
            ("diversity.coverage_bonus", self.diversity.coverage_bonus),
            ("diversity.overlap_penalty", self.diversity.overlap_penalty),
        ] {
            non_negative(field, value)?;
        }
        if !(breakpoints.low <= breakpoints.mid && breakpoints.mid <= breakpoints.high) {
            return Err(ConfigError::Unordered {
                field: "breakpoints",
            });
        }
        if self.pressure.moderate > self.pressure.high {
            return Err(ConfigError::Unordered { field: "pressure" });
        }
        if self.reconcile.overall_gap == 0 {
            return Err(ConfigError::ZeroOverallGap);
        }
        if self.diversity.top_tags == 0 {
            return Err(ConfigError::NoDiversityTags);
        }
        self.budget.validate()?;
        Ok(self)
    }
}

fn unit_interval(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}
