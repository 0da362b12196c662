//! A user's selected priority tags.
//!
//! Profiles hold up to seven selected tag ids and up to three "top" tags.
//! Entries are trimmed, blanks dropped and repeats removed while keeping first
//! occurrence order, so callers can pass raw form input.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::PriorityProfileError;

/// Maximum number of distinct selected tags.
pub const MAX_SELECTED_TAGS: usize = 7;
/// Maximum number of distinct top tags.
pub const MAX_TOP_TAGS: usize = 3;

/// Weighting tier of a selected tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// One of the user's top tags.
    Top,
    /// Selected but not top.
    Other,
}

/// Validated priority tags.
///
/// # Examples
/// ```
/// use hoodrank_core::{PriorityProfile, Tier};
///
/// # fn main() -> Result<(), hoodrank_core::PriorityProfileError> {
/// let profile = PriorityProfile::new(
///     ["green_parks", " metro_strong", "green_parks", ""],
///     ["green_parks"],
/// )?;
/// assert_eq!(profile.selected(), ["green_parks", "metro_strong"]);
/// assert_eq!(profile.tier("green_parks"), Tier::Top);
/// assert_eq!(profile.tier("metro_strong"), Tier::Other);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawProfile", into = "RawProfile")]
pub struct PriorityProfile {
    selected: Vec<String>,
    top: Vec<String>,
}

impl PriorityProfile {
    /// Validate and construct a profile.
    ///
    /// # Errors
    /// Returns a [`PriorityProfileError`] when either list is too long after
    /// de-duplication or a top tag is not selected.
    pub fn new<S, T>(
        selected: impl IntoIterator<Item = S>,
        top: impl IntoIterator<Item = T>,
    ) -> Result<Self, PriorityProfileError>
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let selected_tags = dedupe(selected);
        let top_tags = dedupe(top);
        if selected_tags.len() > MAX_SELECTED_TAGS {
            return Err(PriorityProfileError::TooManySelected {
                count: selected_tags.len(),
                max: MAX_SELECTED_TAGS,
            });
        }
        if top_tags.len() > MAX_TOP_TAGS {
            return Err(PriorityProfileError::TooManyTop {
                count: top_tags.len(),
                max: MAX_TOP_TAGS,
            });
        }
        if let Some(tag) = top_tags.iter().find(|tag| !selected_tags.contains(tag)) {
            return Err(PriorityProfileError::TopNotSelected { tag: tag.clone() });
        }
        Ok(Self {
            selected: selected_tags,
            top: top_tags,
        })
    }

    /// Selected tag ids in first-seen order.
    #[must_use]
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// Top tag ids in first-seen order.
    #[must_use]
    pub fn top(&self) -> &[String] {
        &self.top
    }

    /// Report whether `tag` is one of the top tags.
    #[must_use]
    pub fn is_top(&self, tag: &str) -> bool {
        self.top.iter().any(|candidate| candidate == tag)
    }

    /// Weighting tier of `tag`.
    #[must_use]
    pub fn tier(&self, tag: &str) -> Tier {
        if self.is_top(tag) { Tier::Top } else { Tier::Other }
    }

    /// Report whether no tag is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

fn dedupe<S: AsRef<str>>(entries: impl IntoIterator<Item = S>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    entries
        .into_iter()
        .filter_map(|entry| {
            let trimmed = entry.as_ref().trim();
            (!trimmed.is_empty() && seen.insert(trimmed.to_owned())).then(|| trimmed.to_owned())
        })
        .collect()
}

#[derive(Serialize, Deserialize)]
struct RawProfile {
    #[serde(default)]
    selected: Vec<String>,
    #[serde(default)]
    top3: Vec<String>,
}

impl TryFrom<RawProfile> for PriorityProfile {
    type Error = PriorityProfileError;

    fn try_from(raw: RawProfile) -> Result<Self, Self::Error> {
        Self::new(raw.selected, raw.top3)
    }
}

impl From<PriorityProfile> for RawProfile {
    fn from(profile: PriorityProfile) -> Self {
        Self {
            selected: profile.selected,
            top3: profile.top,
        }
    }
}
