//! Criterion benchmarks for area ranking and shortlists.
//!
//! Measures ranking time across city sizes (20, 80, 320 areas) with four
//! sub-areas each. Inputs are generated deterministically so runs compare.
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench --package hoodrank-scorer
//! ```

// Criterion macros generate code that triggers missing_docs warnings.
#![allow(missing_docs, reason = "Criterion macros generate undocumented code")]

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use hoodrank_core::test_support::{area, sub_area};
use hoodrank_core::{Area, PriorityProfile};
use hoodrank_scorer::{AreaRanker, Budget, Shortlister, TenureMode};

/// City sizes to benchmark.
const CITY_SIZES: &[u32] = &[20, 80, 320];

/// Sub-areas generated per area.
const SUB_AREAS: u32 = 4;

/// Metric value cycling through `0.0..10.0` for a given seed.
#[expect(
    clippy::float_arithmetic,
    clippy::integer_division_remainder_used,
    reason = "deterministic pseudo-random metrics"
)]
fn level(seed: u32, salt: u32) -> f64 {
    f64::from(seed.wrapping_mul(2_654_435_761).wrapping_add(salt) % 100) / 10.0
}

/// Build `count` areas with varied metrics and a rotating tag.
#[expect(
    clippy::float_arithmetic,
    clippy::integer_division_remainder_used,
    reason = "deterministic pseudo-random metrics"
)]
fn build_city(count: u32) -> Vec<Area> {
    const TAGS: [&str; 4] = ["residential_quiet", "nightlife", "families", "metro_strong"];
    (0..count)
        .map(|index| {
            let tag = TAGS
                .get(usize::try_from(index % 4).unwrap_or_default())
                .copied()
                .unwrap_or("nightlife");
            let mut record = area(
                &format!("area-{index}"),
                &[
                    ("parks_share", level(index, 1) / 10.0),
                    ("bars_density", level(index, 2)),
                    ("cafes_density", level(index, 3)),
                    ("schools_density", level(index, 4)),
                    ("metro_density", level(index, 5)),
                ],
                &[tag],
            );
            record.sub_areas = (0..SUB_AREAS)
                .map(|sub| {
                    let seed = index * SUB_AREAS + sub;
                    sub_area(
                        &format!("sub-{sub}"),
                        &[
                            ("parks_share", level(seed, 6) / 10.0),
                            ("bars_density", level(seed, 7)),
                            ("metro_density", level(seed, 8)),
                        ],
                        &[],
                    )
                })
                .collect();
            record
        })
        .collect()
}

fn bench_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_areas");
    group.measurement_time(Duration::from_secs(5));

    let profile = PriorityProfile::new(
        ["families", "green_parks", "metro_strong", "nightlife"],
        ["families", "metro_strong"],
    )
    .unwrap_or_default();
    let budget = Budget::from_expression(TenureMode::Rent, "1500-2100");
    let ranker = AreaRanker::with_defaults();
    let shortlister = Shortlister::with_defaults();

    for &size in CITY_SIZES {
        let city = build_city(size);
        group.throughput(Throughput::Elements(u64::from(size)));
        group.bench_with_input(BenchmarkId::new("areas", size), &city, |b, areas| {
            b.iter(|| ranker.rank(areas, &profile, budget.as_ref()));
        });
        group.bench_with_input(BenchmarkId::new("shortlist", size), &city, |b, areas| {
            b.iter(|| shortlister.shortlist(areas, &profile, budget.as_ref()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ranking);
criterion_main!(benches);
