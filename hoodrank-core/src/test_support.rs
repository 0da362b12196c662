//! Record builders shared by unit and behaviour tests.

use crate::{Area, RawMetrics, SubArea};

/// Build raw metrics from `(name, value)` pairs.
#[must_use]
pub fn metrics(pairs: &[(&str, f64)]) -> RawMetrics {
    pairs.iter().copied().collect()
}

/// Build an area without validating its name.
#[must_use]
pub fn area(name: &str, pairs: &[(&str, f64)], tags: &[&str]) -> Area {
    Area {
        name: name.to_owned(),
        metrics: metrics(pairs),
        tags: tags.iter().map(|tag| (*tag).to_owned()).collect(),
        ..Area::default()
    }
}

/// Build a sub-area without validating its name.
#[must_use]
pub fn sub_area(name: &str, pairs: &[(&str, f64)], tags: &[&str]) -> SubArea {
    SubArea {
        name: name.to_owned(),
        metrics: metrics(pairs),
        tags: tags.iter().map(|tag| (*tag).to_owned()).collect(),
        ..SubArea::default()
    }
}
