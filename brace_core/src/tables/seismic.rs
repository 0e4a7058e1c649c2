//! Seismic lookup tables per NZS 1170.0 / NZS 1170.5.
//!
//! - Spectral shape factor Ch(T) for the equivalent static method (Table 3.1)
//! - Annual probability of exceedance by design life and importance level
//!   (NZS 1170.0 Table 3.3), stored as return periods in years
//! - Return period factor Ru (NZS 1170.5 Table 3.5)
//! - Hazard factor Z for the main towns (NZS 1170.5 Table 3.3)

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::interpolate;

/// Site subsoil class (NZS 1170.5 §3.1.3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SubsoilClass {
    /// Strong rock
    A,
    /// Rock
    B,
    /// Shallow soil
    C,
    /// Deep or soft soil
    #[default]
    D,
    /// Very soft soil
    E,
}

impl SubsoilClass {
    pub const ALL: [SubsoilClass; 5] = [
        SubsoilClass::A,
        SubsoilClass::B,
        SubsoilClass::C,
        SubsoilClass::D,
        SubsoilClass::E,
    ];
}

/// Importance level (NZS 1170.0 Table 3.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ImportanceLevel {
    IL1,
    #[default]
    IL2,
    IL3,
    IL4,
}

/// Intended design working life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DesignLife {
    SixMonths,
    FiveYears,
    TwentyFiveYears,
    #[default]
    FiftyYears,
    HundredYears,
}

impl DesignLife {
    pub const ALL: [DesignLife; 5] = [
        DesignLife::SixMonths,
        DesignLife::FiveYears,
        DesignLife::TwentyFiveYears,
        DesignLife::FiftyYears,
        DesignLife::HundredYears,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            DesignLife::SixMonths => "6 months",
            DesignLife::FiveYears => "5 years",
            DesignLife::TwentyFiveYears => "25 years",
            DesignLife::FiftyYears => "50 years",
            DesignLife::HundredYears => "100 years",
        }
    }
}

/// Periods (s) at which Ch(T) is tabulated
const PERIODS: [f64; 18] = [
    0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5,
];

const CH_AB: [f64; 18] = [
    1.89, 1.89, 1.89, 1.89, 1.89, 1.60, 1.40, 1.24, 1.12, 1.03, 0.95, 0.70, 0.53, 0.42, 0.35, 0.26, 0.20, 0.16,
];
const CH_C: [f64; 18] = [
    2.36, 2.36, 2.36, 2.36, 2.36, 2.00, 1.74, 1.55, 1.41, 1.29, 1.19, 0.88, 0.66, 0.53, 0.44, 0.32, 0.25, 0.20,
];
const CH_D: [f64; 18] = [
    3.00, 3.00, 3.00, 3.00, 3.00, 2.84, 2.53, 2.29, 2.09, 1.93, 1.80, 1.43, 1.04, 0.82, 0.69, 0.50, 0.38, 0.30,
];
const CH_E: [f64; 18] = [
    3.00, 3.00, 3.00, 3.00, 3.00, 3.00, 3.00, 3.00, 3.00, 3.00, 3.00, 2.21, 1.66, 1.33, 1.11, 0.81, 0.62, 0.49,
];

fn ch_column(class: SubsoilClass) -> &'static [f64; 18] {
    match class {
        SubsoilClass::A | SubsoilClass::B => &CH_AB,
        SubsoilClass::C => &CH_C,
        SubsoilClass::D => &CH_D,
        SubsoilClass::E => &CH_E,
    }
}

/// (period, Ch) points for a subsoil class
pub fn cht_points(class: SubsoilClass) -> Vec<(f64, f64)> {
    PERIODS.iter().copied().zip(ch_column(class).iter().copied()).collect()
}

/// Spectral shape factor Ch(T1), linearly interpolated and clamped to the
/// table endpoints.
pub fn cht(t1: f64, class: SubsoilClass) -> f64 {
    interpolate(&cht_points(class), t1)
}

/// ULS return period in years for (design life, importance level).
pub fn return_period(life: DesignLife, level: ImportanceLevel) -> u32 {
    use DesignLife::*;
    use ImportanceLevel::*;
    match (life, level) {
        (SixMonths, IL1) => 25,
        (SixMonths, IL2) => 100,
        (SixMonths, IL3) => 250,
        (SixMonths, IL4) => 1000,
        (FiveYears, IL1) => 25,
        (FiveYears, IL2) => 250,
        (FiveYears, IL3) => 500,
        (FiveYears, IL4) => 1000,
        (TwentyFiveYears, IL1) => 50,
        (TwentyFiveYears, IL2) => 500,
        (TwentyFiveYears, IL3) => 1000,
        (TwentyFiveYears, IL4) => 2500,
        (FiftyYears, IL1) => 100,
        (FiftyYears, IL2) => 500,
        (FiftyYears, IL3) => 1000,
        (FiftyYears, IL4) => 2500,
        (HundredYears, IL1) => 250,
        (HundredYears, IL2) => 1000,
        (HundredYears, IL3) => 2500,
        (HundredYears, IL4) => 2500,
    }
}

/// Return period factor Ru by return period (years)
const RU_VALUES: [(u32, f64); 9] = [
    (20, 0.20),
    (25, 0.25),
    (50, 0.35),
    (100, 0.5),
    (250, 0.75),
    (500, 1.0),
    (1000, 1.3),
    (2000, 1.7),
    (2500, 1.8),
];

/// Return period factor Ru, if the return period is tabulated.
pub fn ru(return_period: u32) -> Option<f64> {
    RU_VALUES
        .iter()
        .find(|(period, _)| *period == return_period)
        .map(|(_, ru)| *ru)
}

/// Hazard factor Z by town name
static TOWNS: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    [
        ("Kaitaia", 0.13),
        ("Whangarei", 0.10),
        ("Auckland", 0.13),
        ("Hamilton", 0.16),
        ("Tauranga", 0.20),
        ("Rotorua", 0.24),
        ("Taupo", 0.28),
        ("Gisborne", 0.36),
        ("New Plymouth", 0.18),
        ("Napier", 0.38),
        ("Hastings", 0.39),
        ("Whanganui", 0.25),
        ("Palmerston North", 0.38),
        ("Masterton", 0.42),
        ("Wellington", 0.40),
        ("Nelson", 0.27),
        ("Blenheim", 0.33),
        ("Kaikoura", 0.42),
        ("Greymouth", 0.37),
        ("Christchurch", 0.30),
        ("Timaru", 0.15),
        ("Queenstown", 0.32),
        ("Dunedin", 0.13),
        ("Invercargill", 0.17),
    ]
    .into_iter()
    .collect()
});

/// Hazard factor Z for a town, if the town is tabulated.
pub fn hazard_factor(town: &str) -> Option<f64> {
    TOWNS.get(town).copied()
}

/// Tabulated town names, sorted for display
pub fn town_names() -> Vec<&'static str> {
    let mut names: Vec<_> = TOWNS.keys().copied().collect();
    names.sort_unstable();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cht_table_points() {
        assert_eq!(cht(0.4, SubsoilClass::D), 3.0);
        assert_eq!(cht(1.0, SubsoilClass::C), 1.19);
        assert_eq!(cht(0.5, SubsoilClass::A), cht(0.5, SubsoilClass::B));
    }

    #[test]
    fn test_cht_interpolates() {
        // halfway between 0.5 (2.84) and 0.6 (2.53)
        let value = cht(0.55, SubsoilClass::D);
        assert!((value - 2.685).abs() < 1e-9);
    }

    #[test]
    fn test_cht_clamps_to_endpoints() {
        assert_eq!(cht(-0.2, SubsoilClass::D), 3.0);
        assert_eq!(cht(10.0, SubsoilClass::D), 0.30);
        assert_eq!(cht(10.0, SubsoilClass::E), 0.49);
    }

    #[test]
    fn test_return_period_and_ru() {
        let period = return_period(DesignLife::FiftyYears, ImportanceLevel::IL2);
        assert_eq!(period, 500);
        assert_eq!(ru(period), Some(1.0));
        assert_eq!(ru(return_period(DesignLife::HundredYears, ImportanceLevel::IL4)), Some(1.8));
        assert_eq!(ru(123), None);
    }

    #[test]
    fn test_hazard_factor() {
        assert_eq!(hazard_factor("Auckland"), Some(0.13));
        assert_eq!(hazard_factor("Wellington"), Some(0.40));
        assert_eq!(hazard_factor("Atlantis"), None);
        assert!(town_names().contains(&"Christchurch"));
    }

    #[test]
    fn test_subsoil_serialization() {
        let json = serde_json::to_string(&SubsoilClass::E).unwrap();
        assert_eq!(json, "\"E\"");
    }
}
