//! Behavioural coverage for resolving tag affinities against siblings.

use std::cell::RefCell;

use hoodrank_core::{
    Confidence, Distributions, PercentileAffinity, RawMetrics, Scope, SubArea, TagAffinity,
    TagRegistry, resolve_tag_affinity,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

/// Sibling sub-areas under test, calmest first.
#[fixture]
pub fn siblings() -> RefCell<Vec<SubArea>> {
    RefCell::new(Vec::new())
}

/// Outcome of the affinity lookup.
#[fixture]
pub fn outcome() -> RefCell<Option<TagAffinity>> {
    RefCell::new(None)
}

fn score(
    siblings: &RefCell<Vec<SubArea>>,
    outcome: &RefCell<Option<TagAffinity>>,
    tag: &str,
    calmest: bool,
) {
    let records = siblings.borrow();
    let registry = TagRegistry::standard();
    let distributions = Distributions::for_scope(records.as_slice(), &registry, Scope::SubArea);
    let record = if calmest { records.first() } else { records.last() };
    let Some(record) = record else {
        panic!("siblings must be initialised");
    };
    let affinity = resolve_tag_affinity(&registry, &PercentileAffinity, tag, record, &distributions);
    *outcome.borrow_mut() = Some(affinity);
}

#[given("four sibling sub-areas from quiet to lively")]
fn four_siblings(siblings: &RefCell<Vec<SubArea>>) {
    let records = [0.0, 1.0, 2.0, 3.0]
        .into_iter()
        .zip(["Calm", "Mild", "Busy", "Loud"])
        .map(|(level, name)| {
            let metrics = RawMetrics::new()
                .with("bars_density", level)
                .with("restaurants_density", level)
                .with("parks_share", (3.0 - level) / 10.0);
            SubArea::new(name)
                .unwrap_or_else(|err| panic!("sub-area {name}: {err}"))
                .with_metrics(metrics)
        })
        .collect();
    *siblings.borrow_mut() = records;
}

#[given("the liveliest sub-area is tagged nightlife with high confidence")]
fn liveliest_is_confident(siblings: &RefCell<Vec<SubArea>>) {
    let mut records = siblings.borrow_mut();
    let Some(last) = records.pop() else {
        panic!("siblings must be initialised");
    };
    records.push(last.with_confident_tag("nightlife", Confidence::High));
}

#[when("I score an unknown tag for the liveliest sub-area")]
fn score_unknown(siblings: &RefCell<Vec<SubArea>>, outcome: &RefCell<Option<TagAffinity>>) {
    score(siblings, outcome, "sea_view", false);
}

#[when("I score residential quiet for the calmest sub-area")]
fn score_quiet(siblings: &RefCell<Vec<SubArea>>, outcome: &RefCell<Option<TagAffinity>>) {
    score(siblings, outcome, "residential_quiet", true);
}

#[when("I score nightlife for the liveliest sub-area")]
fn score_nightlife(siblings: &RefCell<Vec<SubArea>>, outcome: &RefCell<Option<TagAffinity>>) {
    score(siblings, outcome, "nightlife", false);
}

#[then("the affinity is unresolved and zero")]
fn unresolved_zero(outcome: &RefCell<Option<TagAffinity>>) {
    let binding = outcome.borrow();
    let Some(affinity) = binding.as_ref() else {
        panic!("affinity must be recorded");
    };
    assert!(!affinity.resolved);
    assert_eq!(affinity.adjusted, 0.0);
    assert!(affinity.signals.is_empty());
}

#[then("the adjusted affinity is 0.875")]
fn affinity_is_seven_eighths(outcome: &RefCell<Option<TagAffinity>>) {
    assert_adjusted(outcome, 0.875);
}

#[then("the adjusted affinity is 0.945")]
fn affinity_is_lifted(outcome: &RefCell<Option<TagAffinity>>) {
    assert_adjusted(outcome, 0.945);
}

fn assert_adjusted(outcome: &RefCell<Option<TagAffinity>>, expected: f64) {
    let binding = outcome.borrow();
    let Some(affinity) = binding.as_ref() else {
        panic!("affinity must be recorded");
    };
    assert!(
        (affinity.adjusted - expected).abs() < 1e-9,
        "expected {expected}, got {}",
        affinity.adjusted
    );
}

#[scenario(path = "tests/features/tag_affinity.feature", index = 0)]
fn unknown_tags_score_zero(siblings: RefCell<Vec<SubArea>>, outcome: RefCell<Option<TagAffinity>>) {
    let _ = (siblings, outcome);
}

#[scenario(path = "tests/features/tag_affinity.feature", index = 1)]
fn quiet_tags_favour_calm(siblings: RefCell<Vec<SubArea>>, outcome: RefCell<Option<TagAffinity>>) {
    let _ = (siblings, outcome);
}

#[scenario(path = "tests/features/tag_affinity.feature", index = 2)]
fn confidence_lifts_affinity(
    siblings: RefCell<Vec<SubArea>>,
    outcome: RefCell<Option<TagAffinity>>,
) {
    let _ = (siblings, outcome);
}
