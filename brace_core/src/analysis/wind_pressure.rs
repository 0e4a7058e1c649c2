//! # Wind Pressure Deriver
//!
//! Two independent methods:
//!
//! - **Zone** (NZS 3604): `pr = p·Cpe,r,h(2·h̄)` with `h̄` the area-weighted
//!   average roof height of the top level, and `pw = 1.2·p`.
//! - **Detailed** (NZS 1170.2), per wind direction, when enabled and the
//!   building has levels:
//!
//! ```text
//! b  = min cross-wind plan dimension    d = max along-wind plan dimension
//! h  = Σ storey heights
//! pw = 0.6 V² (0.7 − Cp,w,L(α, d/b)) / 1000
//! pr = −0.6 V² cos α Cp,r(α, h/d) / 1000
//! ```
//!
//! A direction whose dimensions are not positive is skipped.

use serde::{Deserialize, Serialize};

use crate::equations::wind::{
    detailed_roof_pressure, detailed_wall_pressure, zone_roof_pressure, zone_wall_pressure, ROOF_LOOKUP_HEIGHT_FACTOR,
};
use crate::errors::{ensure_at_least, ensure_in_range, CalcResult};
use crate::level::{top_down, Direction, Level};
use crate::tables::wind::{cperh, cpr, cpw_leeward, WindZone};

/// Which pressures drive the wind actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PressureSource {
    /// NZS 3604 zone method
    #[default]
    Zone,
    /// NZS 1170.2 detailed method
    Detailed,
    /// Larger magnitude of the two, per pressure and direction
    Max,
}

impl PressureSource {
    pub const ALL: [PressureSource; 3] = [PressureSource::Zone, PressureSource::Detailed, PressureSource::Max];

    pub fn display_name(&self) -> &'static str {
        match self {
            PressureSource::Zone => "NZS 3604",
            PressureSource::Detailed => "NZS 1170.2",
            PressureSource::Max => "Max",
        }
    }
}

/// Wind design parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindInput {
    /// Roof pitch α (degrees)
    pub slope_deg: f64,
    pub ns_gable: bool,
    pub ew_gable: bool,
    /// Derive pressures with the detailed method as well
    pub use_detailed: bool,
    pub zone: WindZone,
    /// Design wind speed for N-S wind (m/s)
    pub v_ns_ms: f64,
    /// Design wind speed for E-W wind (m/s)
    pub v_ew_ms: f64,
    /// Combination factor Kc
    pub kc: f64,
    pub pressure_source: PressureSource,
}

impl Default for WindInput {
    fn default() -> Self {
        WindInput {
            slope_deg: 15.0,
            ns_gable: false,
            ew_gable: false,
            use_detailed: false,
            zone: WindZone::Medium,
            v_ns_ms: 37.0,
            v_ew_ms: 37.0,
            kc: 0.9,
            pressure_source: PressureSource::Zone,
        }
    }
}

impl WindInput {
    pub fn validate(&self) -> CalcResult<()> {
        ensure_in_range("slope_deg", self.slope_deg, 0.0, 90.0)?;
        ensure_at_least("v_ns_ms", self.v_ns_ms, 0.0)?;
        ensure_at_least("v_ew_ms", self.v_ew_ms, 0.0)?;
        ensure_at_least("kc", self.kc, 0.0)?;
        Ok(())
    }

    pub fn speed_ms(&self, direction: Direction) -> f64 {
        match direction {
            Direction::NS => self.v_ns_ms,
            Direction::EW => self.v_ew_ms,
        }
    }

    pub fn is_gable(&self, direction: Direction) -> bool {
        match direction {
            Direction::NS => self.ns_gable,
            Direction::EW => self.ew_gable,
        }
    }
}

/// NZS 3604 zone method results
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ZonePressures {
    /// Zone constant p (kPa)
    pub p_zone: f64,
    /// Average top-level roof height h̄ (m)
    pub avg_roof_height_m: f64,
    /// Height used for the Cpe,r,h lookup (m)
    pub lookup_height_m: f64,
    pub cperh: f64,
    pub pr: f64,
    pub pw: f64,
}

/// NZS 1170.2 results for one wind direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionPressures {
    /// Cross-wind dimension b (m)
    pub b_m: f64,
    /// Along-wind dimension d (m)
    pub d_m: f64,
    pub db: f64,
    pub hd: f64,
    pub cpw_leeward: f64,
    pub cpr: f64,
    pub pw: f64,
    pub pr: f64,
}

/// NZS 1170.2 results
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DetailedPressures {
    /// Building height h (m)
    pub h_m: f64,
    pub ns_min_m: f64,
    pub ns_max_m: f64,
    pub ew_min_m: f64,
    pub ew_max_m: f64,
    pub ns: Option<DirectionPressures>,
    pub ew: Option<DirectionPressures>,
}

impl DetailedPressures {
    pub fn direction(&self, direction: Direction) -> Option<&DirectionPressures> {
        match direction {
            Direction::NS => self.ns.as_ref(),
            Direction::EW => self.ew.as_ref(),
        }
    }
}

/// Every intermediate wind factor
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WindFactors {
    pub zone: ZonePressures,
    /// Present only when the detailed method is enabled and levels exist
    pub detailed: Option<DetailedPressures>,
}

/// Zone method over the top level's roofs.
pub fn zone_pressures(levels: &[Level], zone: WindZone) -> ZonePressures {
    let p_zone = zone.pressure_kpa();
    let avg_roof_height_m = top_down(levels).next().map_or(0.0, Level::average_roof_height_m);
    let lookup_height_m = avg_roof_height_m * ROOF_LOOKUP_HEIGHT_FACTOR;
    let cperh = cperh(lookup_height_m);
    ZonePressures {
        p_zone,
        avg_roof_height_m,
        lookup_height_m,
        cperh,
        pr: zone_roof_pressure(p_zone, cperh),
        pw: zone_wall_pressure(p_zone),
    }
}

fn direction_pressures(b_m: f64, d_m: f64, h_m: f64, v_ms: f64, alpha_deg: f64) -> Option<DirectionPressures> {
    if !(b_m > 0.0 && d_m > 0.0) {
        return None;
    }
    let db = d_m / b_m;
    let hd = h_m / d_m;
    let cpw_leeward = cpw_leeward(alpha_deg, db);
    let cpr = cpr(alpha_deg, hd);
    Some(DirectionPressures {
        b_m,
        d_m,
        db,
        hd,
        cpw_leeward,
        cpr,
        pw: detailed_wall_pressure(v_ms, cpw_leeward),
        pr: detailed_roof_pressure(v_ms, alpha_deg, cpr),
    })
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

/// Detailed method, `None` for an empty building.
pub fn detailed_pressures(levels: &[Level], input: &WindInput) -> Option<DetailedPressures> {
    if levels.is_empty() {
        return None;
    }
    let (ns_min_m, ns_max_m) = min_max(levels.iter().map(|l| l.plan_dim_ns_m));
    let (ew_min_m, ew_max_m) = min_max(levels.iter().map(|l| l.plan_dim_ew_m));
    let h_m: f64 = levels.iter().map(|l| l.storey_height_m).sum();

    // N-S wind strikes the E-W face and travels along the N-S dimension
    let ns = direction_pressures(ew_min_m, ns_max_m, h_m, input.v_ns_ms, input.slope_deg);
    let ew = direction_pressures(ns_min_m, ew_max_m, h_m, input.v_ew_ms, input.slope_deg);

    Some(DetailedPressures {
        h_m,
        ns_min_m,
        ns_max_m,
        ew_min_m,
        ew_max_m,
        ns,
        ew,
    })
}

/// Both methods for the current geometry and wind input.
pub fn calculate_factors(levels: &[Level], input: &WindInput) -> WindFactors {
    let zone = zone_pressures(levels, input.zone);
    let detailed = if input.use_detailed {
        detailed_pressures(levels, input)
    } else {
        None
    };
    tracing::debug!(
        zone_pr = zone.pr,
        zone_pw = zone.pw,
        detailed = detailed.is_some(),
        "wind factors calculated"
    );
    WindFactors { zone, detailed }
}

/// Roof and wall pressure pair used by the action distributor
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DesignPressures {
    pub pr: f64,
    pub pw: f64,
}

fn larger_magnitude(a: f64, b: f64) -> f64 {
    if b.abs() > a.abs() {
        b
    } else {
        a
    }
}

impl WindFactors {
    /// Pressures for one direction from the chosen source. Missing detailed
    /// values count as zero.
    pub fn design_pressures(&self, source: PressureSource, direction: Direction) -> DesignPressures {
        let zone = DesignPressures {
            pr: self.zone.pr,
            pw: self.zone.pw,
        };
        let detailed = self
            .detailed
            .as_ref()
            .and_then(|d| d.direction(direction))
            .map(|d| DesignPressures { pr: d.pr, pw: d.pw })
            .unwrap_or_default();

        match source {
            PressureSource::Zone => zone,
            PressureSource::Detailed => detailed,
            PressureSource::Max => DesignPressures {
                pr: larger_magnitude(zone.pr, detailed.pr),
                pw: larger_magnitude(zone.pw, detailed.pw),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::AssemblyCategory;
    use crate::level::{LevelPart, PartGeometry};
    use crate::tables::wind::CPERH_POINTS;
    use approx::assert_relative_eq;

    fn roofed_level(roof_height_m: f64) -> Level {
        let mut level = Level::new("Top");
        let mut roof = LevelPart::placed("Roof", None, AssemblyCategory::Roof, false, 0.45, 2.4);
        roof.geometry = PartGeometry::Surface {
            area_m2: 40.0,
            roof_height_m: Some(roof_height_m),
        };
        level.parts.push(roof);
        level
    }

    #[test]
    fn test_zone_lookup_uses_doubled_roof_height() {
        let levels = vec![Level::new("Ground"), roofed_level(1.0)];
        let z = zone_pressures(&levels, WindZone::Medium);
        assert_eq!(z.avg_roof_height_m, 1.0);
        assert_eq!(z.lookup_height_m, 2.0);
        assert_eq!(z.cperh, 0.45);
        assert_relative_eq!(z.pr, 0.82 * 0.45, epsilon = 1e-12);
        assert_relative_eq!(z.pw, 0.82 * 1.2, epsilon = 1e-12);
    }

    #[test]
    fn test_zone_without_roof_uses_lowest_coefficient() {
        let z = zone_pressures(&[Level::new("Only")], WindZone::High);
        assert_eq!(z.cperh, CPERH_POINTS[0].1);
        assert_eq!(zone_pressures(&[], WindZone::High).avg_roof_height_m, 0.0);
    }

    #[test]
    fn test_detailed_disabled_by_default() {
        let f = calculate_factors(&[Level::new("L1")], &WindInput::default());
        assert!(f.detailed.is_none());
    }

    #[test]
    fn test_detailed_dimensions() {
        let mut ground = Level::new("Ground");
        ground.plan_dim_ns_m = 12.0;
        ground.plan_dim_ew_m = 8.0;
        let mut upper = Level::new("Upper");
        upper.plan_dim_ns_m = 10.0;
        upper.plan_dim_ew_m = 6.0;
        upper.storey_height_m = 2.7;
        let input = WindInput {
            use_detailed: true,
            ..Default::default()
        };

        let d = detailed_pressures(&[ground, upper], &input).unwrap();
        assert_relative_eq!(d.h_m, 5.1, epsilon = 1e-12);
        let ns = d.ns.unwrap();
        assert_eq!(ns.b_m, 6.0);
        assert_eq!(ns.d_m, 12.0);
        assert_eq!(ns.db, 2.0);
        // pitch bounds are exclusive: 15 degrees uses the 15-20 row
        assert_eq!(ns.cpw_leeward, -0.3);
        assert_relative_eq!(ns.pw, 0.6 * 37.0 * 37.0 * 1.0 / 1000.0, epsilon = 1e-12);

        let ew = d.ew.unwrap();
        assert_eq!(ew.b_m, 10.0);
        assert_eq!(ew.d_m, 8.0);
    }

    #[test]
    fn test_detailed_skips_degenerate_direction() {
        let mut level = Level::new("Flat");
        level.plan_dim_ew_m = 0.0;
        let input = WindInput {
            use_detailed: true,
            ..Default::default()
        };
        let d = detailed_pressures(&[level], &input).unwrap();
        assert!(d.ns.is_none());
        assert!(d.ew.is_none());
        assert!(detailed_pressures(&[], &input).is_none());
    }

    #[test]
    fn test_pressure_source_selection() {
        let factors = WindFactors {
            zone: ZonePressures {
                pr: 0.3,
                pw: 1.0,
                ..Default::default()
            },
            detailed: Some(DetailedPressures {
                ns: Some(DirectionPressures {
                    b_m: 1.0,
                    d_m: 1.0,
                    db: 1.0,
                    hd: 1.0,
                    cpw_leeward: -0.5,
                    cpr: -0.7,
                    pw: 0.9,
                    pr: 0.5,
                }),
                ..Default::default()
            }),
        };
        let zone = factors.design_pressures(PressureSource::Zone, Direction::NS);
        assert_eq!((zone.pr, zone.pw), (0.3, 1.0));
        let detailed = factors.design_pressures(PressureSource::Detailed, Direction::NS);
        assert_eq!((detailed.pr, detailed.pw), (0.5, 0.9));
        let max = factors.design_pressures(PressureSource::Max, Direction::NS);
        assert_eq!((max.pr, max.pw), (0.5, 1.0));
        // EW was not derived: detailed counts as zero
        let ew = factors.design_pressures(PressureSource::Detailed, Direction::EW);
        assert_eq!((ew.pr, ew.pw), (0.0, 0.0));
    }

    #[test]
    fn test_validate_slope_range() {
        let bad = WindInput {
            slope_deg: 95.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        assert!(WindInput::default().validate().is_ok());
    }
}
