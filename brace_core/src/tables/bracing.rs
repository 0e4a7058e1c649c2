//! Bracing system ratings.
//!
//! Ratings are keyed by (system, type). Length-based types list rows keyed by
//! minimum member length: a member takes the row with the largest key not
//! exceeding its length, rated in BU per metre. Count-based types carry a
//! single rating in BU per item.
//!
//! Length-based ratings are capped by floor type when used (see
//! [`FloorType::rating_cap`]).

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Floor construction under the bracing line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FloorType {
    #[default]
    Timber,
    Concrete,
}

impl FloorType {
    /// Ceiling on length-based ratings (BU/m)
    pub fn rating_cap(&self) -> f64 {
        match self {
            FloorType::Timber => 120.0,
            FloorType::Concrete => 150.0,
        }
    }
}

/// Wind and earthquake rating pair
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct UnitRating {
    pub wind: f64,
    pub eq: f64,
}

impl UnitRating {
    pub const ZERO: UnitRating = UnitRating { wind: 0.0, eq: 0.0 };

    pub const fn new(wind: f64, eq: f64) -> Self {
        UnitRating { wind, eq }
    }

    /// Both components clipped to `cap`
    pub fn capped(self, cap: f64) -> Self {
        UnitRating {
            wind: self.wind.min(cap),
            eq: self.eq.min(cap),
        }
    }
}

/// A length row: members at least `min_length_m` long use `rating` (BU/m)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LengthRating {
    pub min_length_m: f64,
    pub rating: UnitRating,
}

/// How a bracing type is rated
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RatingBasis {
    /// BU per metre, rows sorted by ascending minimum length
    Length(Vec<LengthRating>),
    /// BU per item
    Count(UnitRating),
}

impl RatingBasis {
    pub fn is_count_based(&self) -> bool {
        matches!(self, RatingBasis::Count(_))
    }

    /// Unrated lookup: the nearest-not-exceeding row for length-based types,
    /// the single rating for count-based types. `None` when the member is
    /// shorter than the shortest tabulated length.
    pub fn lookup(&self, length_or_count: f64) -> Option<UnitRating> {
        match self {
            RatingBasis::Count(rating) => Some(*rating),
            RatingBasis::Length(rows) => rows
                .iter()
                .take_while(|row| row.min_length_m <= length_or_count)
                .last()
                .map(|row| row.rating),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BracingType {
    pub name: &'static str,
    pub basis: RatingBasis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BracingSystem {
    pub name: &'static str,
    pub types: Vec<BracingType>,
}

fn length_type(name: &'static str, rows: &[(f64, f64, f64)]) -> BracingType {
    BracingType {
        name,
        basis: RatingBasis::Length(
            rows.iter()
                .map(|&(min_length_m, wind, eq)| LengthRating {
                    min_length_m,
                    rating: UnitRating::new(wind, eq),
                })
                .collect(),
        ),
    }
}

fn count_type(name: &'static str, wind: f64, eq: f64) -> BracingType {
    BracingType {
        name,
        basis: RatingBasis::Count(UnitRating::new(wind, eq)),
    }
}

/// The bracing systems available to members
pub static BRACING_SYSTEMS: Lazy<Vec<BracingSystem>> = Lazy::new(|| {
    vec![
        BracingSystem {
            name: "GIB",
            types: vec![
                length_type("GS1-N", &[(0.4, 45.0, 40.0), (0.6, 50.0, 45.0), (1.2, 60.0, 55.0)]),
                length_type("GS2-N", &[(0.4, 60.0, 50.0), (0.6, 75.0, 65.0), (1.2, 100.0, 95.0)]),
                length_type("BL1-H", &[(0.4, 70.0, 60.0), (0.6, 90.0, 80.0), (1.2, 130.0, 125.0)]),
                length_type("BLG-H", &[(0.4, 80.0, 70.0), (0.6, 105.0, 95.0), (1.2, 145.0, 140.0)]),
            ],
        },
        BracingSystem {
            name: "Plywood",
            types: vec![
                length_type("PB1", &[(0.4, 65.0, 60.0), (0.6, 85.0, 80.0), (1.2, 125.0, 115.0)]),
                length_type("PB2", &[(0.6, 110.0, 95.0), (1.2, 160.0, 140.0)]),
            ],
        },
        BracingSystem {
            name: "NZS3604",
            types: vec![
                count_type("Timber diagonal brace", 70.0, 60.0),
                count_type("Cut-in brace", 30.0, 30.0),
                count_type("Steel strap brace", 40.0, 40.0),
            ],
        },
    ]
});

/// Find a bracing type by system and type name.
pub fn find_type(system: &str, type_name: &str) -> Option<&'static BracingType> {
    BRACING_SYSTEMS
        .iter()
        .find(|s| s.name == system)?
        .types
        .iter()
        .find(|t| t.name == type_name)
}

/// Name of the first type listed for a system
pub fn first_type_name(system: &str) -> Option<&'static str> {
    BRACING_SYSTEMS
        .iter()
        .find(|s| s.name == system)
        .and_then(|s| s.types.first())
        .map(|t| t.name)
}
