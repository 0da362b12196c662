//! Test helpers for writing rank requests into temporary workspaces.

use camino::{Utf8Path, Utf8PathBuf};
use hoodrank_core::PriorityProfile;
use hoodrank_core::test_support::{area, sub_area};
use tempfile::TempDir;

use crate::{BudgetAnswers, RankRequest};

/// Write `contents` to a UTF-8 path, failing the test on error.
pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write test file");
}

/// Create a temporary directory and return it with its UTF-8 root.
pub(super) fn workspace() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

/// Three Brussels communes with two sub-areas each.
pub(super) fn sample_request() -> RankRequest {
    let mut ixelles = area(
        "Ixelles",
        &[("bars_density", 8.0), ("restaurants_density", 9.0), ("metro_density", 2.0)],
        &["nightlife"],
    );
    ixelles.sub_areas = vec![
        sub_area("Flagey", &[("bars_density", 9.0), ("restaurants_density", 8.0)], &[]),
        sub_area("Brugmann", &[("bars_density", 2.0), ("restaurants_density", 3.0)], &[]),
    ];
    let mut uccle = area(
        "Uccle",
        &[("parks_share", 0.45), ("schools_density", 6.0), ("bars_density", 1.0)],
        &["residential_quiet", "families"],
    );
    uccle.sub_areas = vec![
        sub_area("Fort Jaco", &[("parks_share", 0.5), ("bars_density", 0.5)], &[]),
        sub_area("Globe", &[("parks_share", 0.1), ("bars_density", 4.0)], &[]),
    ];
    let etterbeek = area(
        "Etterbeek",
        &[("metro_density", 5.0), ("bars_density", 3.0), ("parks_share", 0.2)],
        &["metro_strong"],
    );
    RankRequest {
        areas: vec![ixelles, uccle, etterbeek],
        priorities: PriorityProfile::new(["nightlife", "metro_strong"], ["nightlife"])
            .expect("profile"),
        budget: BudgetAnswers {
            buy: None,
            rent: Some("1400-1900".to_owned()),
        },
        config: None,
    }
}

/// Serialise `request` as JSON at `path`.
pub(super) fn write_request(path: &Utf8Path, request: &RankRequest) {
    let payload = serde_json::to_string_pretty(request).expect("serialise request");
    write_utf8(path, payload.as_bytes());
}
