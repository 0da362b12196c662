//! Immutable catalog mapping tag ids to their definitions.
//!
//! A registry is an explicit value handed to every scorer. Tests and callers
//! with their own city packs build alternate registries with
//! [`TagRegistry::new`] and [`TagRegistry::with_tag`]; everything else uses
//! [`TagRegistry::standard`].

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{MetricKey, Scope, TagDefinition};

mod catalog;

/// Lookup table of tag definitions keyed by id.
///
/// # Examples
/// ```
/// use hoodrank_core::{Dimension, TagRegistry};
///
/// let registry = TagRegistry::standard();
/// let tag = registry.lookup("metro_strong").expect("catalogued tag");
/// assert_eq!(tag.dimension_affinity(Dimension::Commute), 1.0);
/// assert!(registry.lookup("sea_view").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<TagDefinition>", into = "Vec<TagDefinition>")]
pub struct TagRegistry {
    tags: BTreeMap<String, TagDefinition>,
}

impl TagRegistry {
    /// Construct an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tags: BTreeMap::new(),
        }
    }

    /// Built-in catalog of lifestyle, family, mobility and housing tags.
    #[must_use]
    pub fn standard() -> Self {
        catalog::standard_tags().into_iter().collect()
    }

    /// Insert or replace a definition.
    pub fn insert(&mut self, tag: TagDefinition) {
        self.tags.insert(tag.id.clone(), tag);
    }

    /// Insert a definition while returning `self` for chaining.
    #[must_use]
    pub fn with_tag(mut self, tag: TagDefinition) -> Self {
        self.insert(tag);
        self
    }

    /// Return the definition for `id`; unknown ids are not an error.
    #[must_use]
    pub fn lookup(&self, id: &str) -> Option<&TagDefinition> {
        self.tags.get(id)
    }

    /// Number of catalogued tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Report whether the registry holds no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterate over definitions ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &TagDefinition> {
        self.tags.values()
    }

    /// Every metric read by a signal of a tag applying at `scope`.
    #[must_use]
    pub fn signal_metrics(&self, scope: Scope) -> BTreeSet<MetricKey> {
        self.iter()
            .filter(|tag| tag.scope.covers(scope))
            .flat_map(|tag| tag.signals.iter().map(|signal| signal.metric.clone()))
            .collect()
    }

    /// Report whether any of `tags` is flagged premium.
    #[must_use]
    pub fn any_premium<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        tags.iter()
            .filter_map(|id| self.lookup(id.as_ref()))
            .any(|tag| tag.premium)
    }
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl FromIterator<TagDefinition> for TagRegistry {
    fn from_iter<I: IntoIterator<Item = TagDefinition>>(iter: I) -> Self {
        let mut registry = Self::new();
        for tag in iter {
            registry.insert(tag);
        }
        registry
    }
}

impl From<Vec<TagDefinition>> for TagRegistry {
    fn from(tags: Vec<TagDefinition>) -> Self {
        tags.into_iter().collect()
    }
}

impl From<TagRegistry> for Vec<TagDefinition> {
    fn from(registry: TagRegistry) -> Self {
        registry.tags.into_values().collect()
    }
}
