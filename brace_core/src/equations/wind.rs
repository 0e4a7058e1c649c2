//! Wind pressure formulas.
//!
//! Pressures are in kPa. Wind speeds are in m/s.

use crate::tables::wind::{CPE_WALL, CPW_WINDWARD};
use crate::units::{Degrees, Kpa, Pascals};

/// Multiplier on the average roof height before the Cpe,r,h lookup.
///
/// TODO: confirm the doubled lookup height with a wind engineer; results
/// depend on it and it is not derived from the standard.
pub const ROOF_LOOKUP_HEIGHT_FACTOR: f64 = 2.0;

/// Dynamic pressure `0.6·V²` (Pa)
#[inline]
pub fn dynamic_pressure_pa(v_ms: f64) -> f64 {
    0.6 * v_ms * v_ms
}

/// Zone method roof pressure `p·Cpe,r,h`
#[inline]
pub fn zone_roof_pressure(p_zone: f64, cperh: f64) -> f64 {
    p_zone * cperh
}

/// Zone method wall pressure `p·1.2`
#[inline]
pub fn zone_wall_pressure(p_zone: f64) -> f64 {
    p_zone * CPE_WALL
}

/// Combined windward and leeward wall pressure
/// `0.6·V²·(Cp,w,W − Cp,w,L) / 1000`.
#[inline]
pub fn detailed_wall_pressure(v_ms: f64, cpw_leeward: f64) -> f64 {
    Kpa::from(Pascals(dynamic_pressure_pa(v_ms) * (CPW_WINDWARD - cpw_leeward))).value()
}

/// Horizontal roof pressure `−0.6·V²·cos α·Cp,r / 1000`.
#[inline]
pub fn detailed_roof_pressure(v_ms: f64, alpha_deg: f64, cpr: f64) -> f64 {
    -Kpa::from(Pascals(dynamic_pressure_pa(v_ms) * Degrees(alpha_deg).cos() * cpr)).value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dynamic_pressure() {
        assert_relative_eq!(dynamic_pressure_pa(37.0), 821.4, epsilon = 1e-9);
    }

    #[test]
    fn test_zone_pressures() {
        assert_relative_eq!(zone_wall_pressure(0.82), 0.984, epsilon = 1e-12);
        assert_relative_eq!(zone_roof_pressure(0.82, 0.5), 0.41, epsilon = 1e-12);
    }

    #[test]
    fn test_detailed_wall_pressure() {
        // 821.4 * (0.7 + 0.5) / 1000
        assert_relative_eq!(detailed_wall_pressure(37.0, -0.5), 0.98568, epsilon = 1e-9);
    }

    #[test]
    fn test_detailed_roof_pressure_sign() {
        // suction coefficients give a positive horizontal pressure
        let pr = detailed_roof_pressure(37.0, 0.0, -0.7);
        assert_relative_eq!(pr, 0.57498, epsilon = 1e-9);
        assert!(detailed_roof_pressure(37.0, 60.0, -0.7) < pr);
    }
}
