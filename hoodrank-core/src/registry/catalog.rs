//! Built-in tag catalog.
//!
//! Signals read the metric keys exposed by current city packs. Several tags
//! have no direct measurement yet and rely on amenity or transit proxies; the
//! `notes` field says so.

use crate::metric::names::{
    AREA_KM2, BARS_DENSITY, CAFES_DENSITY, CHILDCARE_DENSITY, METRO_DENSITY, PARKS_KM2,
    PARKS_SHARE, RESTAURANTS_DENSITY, SCHOOLS_DENSITY, TRAIN_DENSITY, TRAM_DENSITY,
};
use crate::{DerivedMetric, Dimension, Nudge, Signal, TagDefinition};

use Dimension::{BudgetFit, Commute, Family, Lifestyle, Safety};

fn tag(id: &str, description: &str, signals: Vec<Signal>) -> TagDefinition {
    signals
        .into_iter()
        .fold(TagDefinition::new(id, description), TagDefinition::with_signal)
}

fn mapped(definition: TagDefinition, dimensions: &[(Dimension, f64)]) -> TagDefinition {
    dimensions
        .iter()
        .fold(definition, |acc, &(dimension, affinity)| {
            acc.with_dimension(dimension, affinity)
        })
}

pub(super) fn standard_tags() -> Vec<TagDefinition> {
    let mut tags = lifestyle();
    tags.extend(family_and_quiet());
    tags.extend(mobility());
    tags.extend(housing());
    tags
}

fn lifestyle() -> Vec<TagDefinition> {
    vec![
        mapped(
            tag(
                "cafes_brunch",
                "Plenty of cafes and brunch spots.",
                vec![Signal::high(CAFES_DENSITY, 1.0)],
            ),
            &[(Lifestyle, 1.0)],
        )
        .with_nudge(Lifestyle, Nudge::Raise),
        mapped(
            tag(
                "restaurants",
                "Dense and varied restaurant scene.",
                vec![Signal::high(RESTAURANTS_DENSITY, 1.0)],
            ),
            &[(Lifestyle, 1.0)],
        )
        .with_nudge(Lifestyle, Nudge::Raise),
        mapped(
            tag(
                "nightlife",
                "Bars and evening activity.",
                vec![
                    Signal::high(BARS_DENSITY, 0.8),
                    Signal::high(RESTAURANTS_DENSITY, 0.2),
                ],
            ),
            &[(Lifestyle, 1.0)],
        )
        .with_nudge(Safety, Nudge::Lower),
        mapped(
            tag(
                "culture_museums",
                "Museums and cultural venues within reach.",
                vec![
                    Signal::high(RESTAURANTS_DENSITY, 0.5),
                    Signal::high(CAFES_DENSITY, 0.5),
                ],
            ),
            &[(Lifestyle, 0.8), (Commute, 0.2)],
        )
        .with_nudge(Lifestyle, Nudge::Raise)
        .with_notes("Proxy: central amenity intensity."),
        mapped(
            tag(
                "art_design",
                "Creative and design-minded streets.",
                vec![
                    Signal::high(CAFES_DENSITY, 0.6),
                    Signal::high(RESTAURANTS_DENSITY, 0.4),
                ],
            ),
            &[(Lifestyle, 1.0)],
        )
        .with_notes("Proxy until a culture venue metric exists."),
        mapped(
            tag(
                "shopping",
                "Shops within easy reach.",
                vec![
                    Signal::high(RESTAURANTS_DENSITY, 0.5),
                    Signal::high(METRO_DENSITY, 0.5),
                ],
            ),
            &[(Lifestyle, 0.7), (Commute, 0.3)],
        ),
        mapped(
            tag(
                "local_market_vibe",
                "Neighbourhood market feel.",
                vec![
                    Signal::high(CAFES_DENSITY, 0.6),
                    Signal::high(PARKS_SHARE, 0.4),
                ],
            ),
            &[(Lifestyle, 0.7), (Family, 0.3)],
        ),
        mapped(
            tag(
                "touristy",
                "Landmarks and visitor traffic.",
                vec![
                    Signal::high(RESTAURANTS_DENSITY, 0.7),
                    Signal::high(CAFES_DENSITY, 0.3),
                ],
            ),
            &[(Lifestyle, 1.0)],
        ),
        mapped(
            tag(
                "premium_feel",
                "Curated, upmarket feel.",
                vec![
                    Signal::high(RESTAURANTS_DENSITY, 0.5),
                    Signal::high(CAFES_DENSITY, 0.3),
                    Signal::high(METRO_DENSITY, 0.2),
                ],
            ),
            &[(Lifestyle, 0.6), (BudgetFit, 0.4)],
        )
        .premium()
        .with_notes("Proxy until a price index exists."),
        mapped(
            tag(
                "value_for_money",
                "Better value for the budget.",
                vec![
                    Signal::low(RESTAURANTS_DENSITY, 0.5),
                    Signal::low(CAFES_DENSITY, 0.3),
                    Signal::low(METRO_DENSITY, 0.2),
                ],
            ),
            &[(BudgetFit, 1.0)],
        )
        .with_notes("Proxy: lower amenity intensity tends to be cheaper."),
        mapped(
            tag(
                "urban_dense",
                "Dense urban fabric.",
                vec![
                    Signal::high(METRO_DENSITY, 0.4),
                    Signal::high(TRAM_DENSITY, 0.2),
                    Signal::high(RESTAURANTS_DENSITY, 0.2),
                    Signal::high(CAFES_DENSITY, 0.2),
                ],
            ),
            &[(Lifestyle, 0.5), (Commute, 0.5)],
        ),
        mapped(
            tag(
                "mixed_vibes",
                "Balance of amenities and green space.",
                vec![
                    Signal::high(RESTAURANTS_DENSITY, 0.4),
                    Signal::high(PARKS_SHARE, 0.6),
                ],
            ),
            &[(Lifestyle, 0.5), (Family, 0.5)],
        ),
        mapped(
            tag(
                "young_professionals",
                "Young professional crowd.",
                vec![
                    Signal::high(CAFES_DENSITY, 0.6),
                    Signal::high(METRO_DENSITY, 0.4),
                ],
            ),
            &[(Lifestyle, 0.6), (Commute, 0.4)],
        ),
        mapped(
            tag(
                "students",
                "Student energy.",
                vec![
                    Signal::high(CAFES_DENSITY, 0.5),
                    Signal::high(METRO_DENSITY, 0.25),
                    Signal::high(BARS_DENSITY, 0.25),
                ],
            ),
            &[(Lifestyle, 0.6), (Commute, 0.2), (BudgetFit, 0.2)],
        ),
    ]
}

fn family_and_quiet() -> Vec<TagDefinition> {
    let quiet_signals = || {
        vec![
            Signal::low(BARS_DENSITY, 0.6),
            Signal::low(RESTAURANTS_DENSITY, 0.2),
            Signal::high(PARKS_SHARE, 0.2),
        ]
    };
    vec![
        mapped(
            tag(
                "families",
                "Schools, childcare and parks close by.",
                vec![
                    Signal::high(SCHOOLS_DENSITY, 0.4),
                    Signal::high(CHILDCARE_DENSITY, 0.3),
                    Signal::high(PARKS_SHARE, 0.3),
                ],
            ),
            &[(Family, 1.0), (Safety, 0.4)],
        )
        .with_nudge(Family, Nudge::Raise),
        mapped(
            tag(
                "schools_strong",
                "Good access to schools.",
                vec![Signal::high(SCHOOLS_DENSITY, 1.0)],
            ),
            &[(Family, 1.0)],
        )
        .with_nudge(Family, Nudge::Raise),
        mapped(
            tag(
                "childcare_strong",
                "Good access to childcare.",
                vec![Signal::high(CHILDCARE_DENSITY, 1.0)],
            ),
            &[(Family, 1.0)],
        )
        .with_nudge(Family, Nudge::Raise),
        mapped(
            tag(
                "green_parks",
                "Parks and green pockets.",
                vec![
                    Signal::high(PARKS_SHARE, 0.7),
                    Signal::high(PARKS_KM2, 0.3),
                ],
            ),
            &[(Family, 0.6), (Lifestyle, 0.4)],
        )
        .with_nudge(Family, Nudge::Raise),
        mapped(
            tag(
                "older_quiet",
                "Calmer, older crowd.",
                quiet_signals(),
            ),
            &[(Safety, 0.7), (Family, 0.3)],
        )
        .with_nudge(Safety, Nudge::Raise),
        mapped(
            tag(
                "residential_quiet",
                "Residential streets, little nightlife.",
                quiet_signals(),
            ),
            &[(Safety, 0.7), (Family, 0.3)],
        )
        .with_nudge(Safety, Nudge::Raise),
        mapped(
            tag(
                "night_caution",
                "Take care at night.",
                vec![
                    Signal::high(BARS_DENSITY, 0.7),
                    Signal::high(RESTAURANTS_DENSITY, 0.3),
                ],
            ),
            &[(Safety, 1.0)],
        )
        .with_nudge(Safety, Nudge::Lower),
        mapped(
            tag(
                "busy_traffic_noise",
                "Busy, noisy streets.",
                vec![
                    Signal::high(METRO_DENSITY, 0.4),
                    Signal::high(TRAM_DENSITY, 0.2),
                    Signal::high(RESTAURANTS_DENSITY, 0.2),
                    Signal::high(CAFES_DENSITY, 0.2),
                ],
            ),
            &[(Safety, 0.6), (Commute, 0.4)],
        )
        .with_nudge(Safety, Nudge::Lower)
        .with_nudge(Commute, Nudge::Lower)
        .with_nudge_waiver(Commute, "car_friendly"),
    ]
}

fn mobility() -> Vec<TagDefinition> {
    vec![
        mapped(
            tag(
                "metro_strong",
                "Strong metro access.",
                vec![Signal::high(METRO_DENSITY, 1.0)],
            ),
            &[(Commute, 1.0)],
        )
        .with_nudge(Commute, Nudge::Raise),
        mapped(
            tag(
                "tram_strong",
                "Strong tram access.",
                vec![Signal::high(TRAM_DENSITY, 1.0)],
            ),
            &[(Commute, 1.0)],
        )
        .with_nudge(Commute, Nudge::Raise),
        mapped(
            tag(
                "train_hubs_access",
                "Close to train hubs.",
                vec![Signal::high(TRAIN_DENSITY, 1.0)],
            ),
            &[(Commute, 1.0)],
        )
        .with_nudge(Commute, Nudge::Raise),
        mapped(
            tag(
                "central_access",
                "Central, well connected.",
                vec![
                    Signal::high(METRO_DENSITY, 0.4),
                    Signal::high(TRAM_DENSITY, 0.2),
                    Signal::high(RESTAURANTS_DENSITY, 0.2),
                    Signal::high(CAFES_DENSITY, 0.2),
                ],
            ),
            &[(Commute, 0.6), (Lifestyle, 0.4)],
        )
        .premium(),
        mapped(
            tag(
                "eu_quarter_access",
                "Quick access to the EU quarter.",
                vec![
                    Signal::high(METRO_DENSITY, 0.5),
                    Signal::high(TRAM_DENSITY, 0.25),
                    Signal::high(RESTAURANTS_DENSITY, 0.25),
                ],
            ),
            &[(Commute, 1.0)],
        )
        .with_notes("Proxy until job-centre travel times exist."),
        mapped(
            tag(
                "airport_access",
                "Quick access to the airport.",
                vec![
                    Signal::high(TRAIN_DENSITY, 0.7),
                    Signal::high(METRO_DENSITY, 0.3),
                ],
            ),
            &[(Commute, 1.0)],
        )
        .with_notes("Proxy until airport travel times exist."),
        mapped(
            tag(
                "car_friendly",
                "Easier to get around by car.",
                vec![
                    Signal::low(METRO_DENSITY, 0.4),
                    Signal::low(TRAM_DENSITY, 0.4),
                    Signal::high(AREA_KM2, 0.2),
                ],
            ),
            &[(Commute, 0.6), (Family, 0.4)],
        ),
        mapped(
            tag(
                "bike_friendly",
                "Pleasant to cycle.",
                vec![
                    Signal::high(PARKS_SHARE, 0.6),
                    Signal::high(TRAM_DENSITY, 0.2),
                    Signal::high(METRO_DENSITY, 0.2),
                ],
            ),
            &[(Commute, 0.5), (Lifestyle, 0.5)],
        )
        .with_notes("Proxy until a bike lane metric exists."),
    ]
}

fn housing() -> Vec<TagDefinition> {
    vec![
        mapped(
            tag(
                "apartments_more",
                "Mostly apartments.",
                vec![Signal::high(DerivedMetric::UrbanDenseProxy, 1.0)],
            ),
            &[(Lifestyle, 0.5), (BudgetFit, 0.5)],
        )
        .with_notes("Uses the derived density proxy."),
        mapped(
            tag(
                "houses_more",
                "More houses, greener and less dense.",
                vec![
                    Signal::high(PARKS_SHARE, 0.5),
                    Signal::low(METRO_DENSITY, 0.25),
                    Signal::low(TRAM_DENSITY, 0.25),
                ],
            ),
            &[(Family, 0.7), (BudgetFit, 0.3)],
        ),
        mapped(
            tag(
                "expats_international",
                "International community.",
                vec![
                    Signal::high(METRO_DENSITY, 0.4),
                    Signal::high(RESTAURANTS_DENSITY, 0.3),
                    Signal::high(CAFES_DENSITY, 0.3),
                ],
            ),
            &[(Lifestyle, 0.6), (Commute, 0.4)],
        ),
    ]
}
