//! Wind lookup tables.
//!
//! ## NZS 3604 (zone method)
//!
//! Each wind zone maps to a pressure-per-shape-factor constant (kPa). The roof
//! external pressure coefficient Cpe,r,h varies with height; walls use a fixed
//! coefficient.
//!
//! ## NZS 1170.2 (detailed method)
//!
//! - Leeward wall Cp,w (Table 5.2(B)): rows bounded by roof pitch (exclusive),
//!   each row a list of `d/b` upper bounds.
//! - Roof Cp,r (Table 5.3): rows bounded by roof pitch (inclusive), each row a
//!   list of `h/d` upper bounds. Pitches of 45° and above use a closed form.

use serde::{Deserialize, Serialize};

use super::interpolate;

/// External pressure coefficient applied to walls in the zone method
pub const CPE_WALL: f64 = 1.2;

/// Windward wall pressure coefficient Cp,w (NZS 1170.2 Table 5.2(A))
pub const CPW_WINDWARD: f64 = 0.7;

/// Leeward coefficient used when the pitch is beyond every row
pub const CPW_LEEWARD_FALLBACK: f64 = -0.5;

/// Roof coefficient used when the pitch is beyond every row
pub const CPR_FALLBACK: f64 = -1.0;

/// NZS 3604 wind zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WindZone {
    Low,
    #[default]
    Medium,
    High,
    VeryHigh,
    ExtraHigh,
}

impl WindZone {
    pub const ALL: [WindZone; 5] = [
        WindZone::Low,
        WindZone::Medium,
        WindZone::High,
        WindZone::VeryHigh,
        WindZone::ExtraHigh,
    ];

    /// Zone pressure constant p (kPa) per unit shape factor
    pub fn pressure_kpa(&self) -> f64 {
        match self {
            WindZone::Low => 0.61,
            WindZone::Medium => 0.82,
            WindZone::High => 1.16,
            WindZone::VeryHigh => 1.50,
            WindZone::ExtraHigh => 1.82,
        }
    }

    /// Design wind speed associated with the zone (m/s)
    pub fn speed_ms(&self) -> f64 {
        match self {
            WindZone::Low => 32.0,
            WindZone::Medium => 37.0,
            WindZone::High => 44.0,
            WindZone::VeryHigh => 50.0,
            WindZone::ExtraHigh => 55.0,
        }
    }
}

/// Roof Cpe,r,h against lookup height (m)
pub const CPERH_POINTS: [(f64, f64); 7] = [
    (0.0, 0.20),
    (1.0, 0.30),
    (2.0, 0.45),
    (3.0, 0.55),
    (4.0, 0.65),
    (6.0, 0.80),
    (8.0, 0.90),
];

/// Interpolated roof coefficient Cpe,r,h at a lookup height.
pub fn cperh(height_m: f64) -> f64 {
    interpolate(&CPERH_POINTS, height_m)
}

/// A pitch-bounded table row: `(condition bound, coefficient)` pairs.
struct CoefficientRow {
    max_alpha: f64,
    conditions: &'static [(f64, f64)],
}

const CPWL_TABLE: [CoefficientRow; 5] = [
    CoefficientRow { max_alpha: 10.0, conditions: &[(1.0, -0.5), (2.0, -0.3), (4.0, -0.2)] },
    CoefficientRow { max_alpha: 15.0, conditions: &[(f64::INFINITY, -0.3)] },
    CoefficientRow { max_alpha: 20.0, conditions: &[(f64::INFINITY, -0.3)] },
    CoefficientRow { max_alpha: 25.0, conditions: &[(f64::INFINITY, -0.4)] },
    CoefficientRow { max_alpha: 90.0, conditions: &[(1.0, -0.5), (f64::INFINITY, -0.75)] },
];

const CPR_TABLE: [CoefficientRow; 7] = [
    CoefficientRow { max_alpha: 10.0, conditions: &[(0.25, -0.7), (0.5, -0.9), (1.0, -1.3)] },
    CoefficientRow { max_alpha: 15.0, conditions: &[(0.25, -0.5), (0.5, -0.7), (1.0, -1.0)] },
    CoefficientRow { max_alpha: 20.0, conditions: &[(0.25, -0.3), (0.5, -0.4), (1.0, -0.7)] },
    CoefficientRow { max_alpha: 25.0, conditions: &[(0.25, -0.2), (0.5, -0.3), (1.0, -0.5)] },
    CoefficientRow { max_alpha: 30.0, conditions: &[(0.25, -0.2), (0.5, -0.2), (1.0, -0.3)] },
    CoefficientRow { max_alpha: 35.0, conditions: &[(0.25, -0.2), (0.5, -0.2), (1.0, -0.2)] },
    CoefficientRow { max_alpha: 45.0, conditions: &[(0.25, 0.0), (0.5, -0.2), (1.0, -0.2)] },
];

/// First condition whose bound is met, else the row's last value.
fn row_value(row: &CoefficientRow, ratio: f64) -> Option<f64> {
    row.conditions
        .iter()
        .find(|(bound, _)| ratio <= *bound)
        .or(row.conditions.last())
        .map(|(_, value)| *value)
}

/// Leeward wall coefficient Cp,w for roof pitch `alpha` (degrees) and
/// along-wind/cross-wind ratio `d/b`.
pub fn cpw_leeward(alpha: f64, db: f64) -> f64 {
    CPWL_TABLE
        .iter()
        .find(|row| alpha < row.max_alpha)
        .and_then(|row| row_value(row, db))
        .unwrap_or(CPW_LEEWARD_FALLBACK)
}

/// Roof coefficient Cp,r for roof pitch `alpha` (degrees) and height/depth
/// ratio `h/d`.
pub fn cpr(alpha: f64, hd: f64) -> f64 {
    if alpha >= 45.0 {
        return -0.8 * alpha.to_radians().sin() - 0.9;
    }
    CPR_TABLE
        .iter()
        .find(|row| alpha <= row.max_alpha)
        .and_then(|row| row_value(row, hd))
        .unwrap_or(CPR_FALLBACK)
}
