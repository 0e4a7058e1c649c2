//! # Bracing Demand/Capacity Ledger
//!
//! ## Member capacity
//!
//! ```text
//! length-based:  total = min(rating, cap) × L × 2.4 / h      (0 when h ≤ 0)
//! count-based:   total = rating × n
//! ```
//!
//! `rating` is the row with the largest minimum length not exceeding `L`;
//! `cap` is 120 BU/m on timber floors and 150 BU/m on concrete.
//!
//! ## Line minimum demand
//!
//! ```text
//! min = max(100, 15 × external wall length, 0.5 × section demand / line count)
//! ```
//!
//! A line is OK when its achieved capacity reaches the minimum. A section
//! passes a direction when achieved ≥ 100 % of its demand.
//!
//! ## Example
//!
//! ```rust
//! use brace_core::bracing::{line_min_demand, member_capacity, BracingMember};
//! use brace_core::tables::bracing::FloorType;
//!
//! let mut member = BracingMember::new("BL-1-1");
//! member.type_name = "GS2-N".into();
//! member.length_or_count = 1.25;
//!
//! let capacity = member_capacity(&member, FloorType::Timber);
//! assert!((capacity.total.wind - 125.0).abs() < 1e-9);
//! assert_eq!(line_min_demand(3.0, 500.0, 2), 125.0);
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{BracingLine, BracingMember, BracingSection};
use crate::tables::bracing::{find_type, FloorType, RatingBasis, UnitRating};

/// Reference wall height for length-based ratings (m)
pub const REFERENCE_HEIGHT_M: f64 = 2.4;

/// Absolute minimum line demand (BU)
pub const LINE_MIN_DEMAND_BU: f64 = 100.0;

/// Minimum line demand per metre of external wall (BU/m)
pub const LINE_DEMAND_PER_EXTERNAL_M: f64 = 15.0;

/// Share of the even split of section demand each line must carry
pub const LINE_DEMAND_SHARE: f64 = 0.5;

/// Capacity of one member
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MemberCapacity {
    pub member_id: Uuid,
    /// Capacity per metre or per item, for display
    pub unit: UnitRating,
    pub total: UnitRating,
}

/// Capacity of a member under the section's floor type. Unknown systems or
/// types and members shorter than every row give zero.
pub fn member_capacity(member: &BracingMember, floor_type: FloorType) -> MemberCapacity {
    let Some(bracing_type) = find_type(&member.system, &member.type_name) else {
        tracing::warn!(system = %member.system, type_name = %member.type_name, "unknown bracing type");
        return MemberCapacity {
            member_id: member.id,
            ..Default::default()
        };
    };

    let n = member.length_or_count;
    let total = match (&bracing_type.basis, bracing_type.basis.lookup(n)) {
        (_, None) => UnitRating::ZERO,
        (RatingBasis::Count(_), Some(rating)) => UnitRating::new(rating.wind * n, rating.eq * n),
        (RatingBasis::Length(_), Some(rating)) => {
            let rating = rating.capped(floor_type.rating_cap());
            let height_ratio = if member.height_m > 0.0 {
                REFERENCE_HEIGHT_M / member.height_m
            } else {
                0.0
            };
            UnitRating::new(rating.wind * n * height_ratio, rating.eq * n * height_ratio)
        }
    };

    let divisor = if n == 0.0 { 1.0 } else { n };
    MemberCapacity {
        member_id: member.id,
        unit: UnitRating::new(total.wind / divisor, total.eq / divisor),
        total,
    }
}

/// Minimum capacity a line must provide, with the line count floored at one.
pub fn line_min_demand(external_wall_length_m: f64, section_demand_bu: f64, line_count: usize) -> f64 {
    let share = section_demand_bu / line_count.max(1) as f64 * LINE_DEMAND_SHARE;
    LINE_MIN_DEMAND_BU
        .max(LINE_DEMAND_PER_EXTERNAL_M * external_wall_length_m)
        .max(share)
}

/// Line totals against the line minimums
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSummary {
    pub line_id: Uuid,
    pub name: String,
    pub members: Vec<MemberCapacity>,
    pub achieved: UnitRating,
    pub min_demand: UnitRating,
}

impl LineSummary {
    pub fn wind_ok(&self) -> bool {
        self.achieved.wind >= self.min_demand.wind
    }

    pub fn eq_ok(&self) -> bool {
        self.achieved.eq >= self.min_demand.eq
    }

    pub fn passes(&self) -> bool {
        self.wind_ok() && self.eq_ok()
    }
}

/// Section totals against the section demand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSummary {
    pub section_id: Uuid,
    pub name: String,
    pub demand: UnitRating,
    pub achieved: UnitRating,
    /// Achieved as a percentage of demand (0 when the demand is 0)
    pub wind_rate_pct: f64,
    pub eq_rate_pct: f64,
    pub lines: Vec<LineSummary>,
}

impl SectionSummary {
    pub fn wind_passes(&self) -> bool {
        self.wind_rate_pct >= 100.0
    }

    pub fn eq_passes(&self) -> bool {
        self.eq_rate_pct >= 100.0
    }

    pub fn passes(&self) -> bool {
        self.wind_passes() && self.eq_passes()
    }
}

fn rate_pct(achieved: f64, demand: f64) -> f64 {
    if demand > 0.0 {
        achieved / demand * 100.0
    } else {
        0.0
    }
}

fn summarize_line(line: &BracingLine, section: &BracingSection) -> LineSummary {
    let members: Vec<MemberCapacity> = line
        .members
        .iter()
        .map(|m| member_capacity(m, section.floor_type))
        .collect();
    let achieved = members.iter().fold(UnitRating::ZERO, |acc, m| {
        UnitRating::new(acc.wind + m.total.wind, acc.eq + m.total.eq)
    });
    let count = section.lines.len();
    LineSummary {
        line_id: line.id,
        name: line.name.clone(),
        members,
        achieved,
        min_demand: UnitRating::new(
            line_min_demand(line.external_wall_length_m, section.demand_wind_bu, count),
            line_min_demand(line.external_wall_length_m, section.demand_eq_bu, count),
        ),
    }
}

/// Ledger for one section.
pub fn summarize_section(section: &BracingSection) -> SectionSummary {
    let lines: Vec<LineSummary> = section.lines.iter().map(|l| summarize_line(l, section)).collect();
    let achieved = lines.iter().fold(UnitRating::ZERO, |acc, l| {
        UnitRating::new(acc.wind + l.achieved.wind, acc.eq + l.achieved.eq)
    });
    SectionSummary {
        section_id: section.id,
        name: section.name.clone(),
        demand: UnitRating::new(section.demand_wind_bu, section.demand_eq_bu),
        achieved,
        wind_rate_pct: rate_pct(achieved.wind, section.demand_wind_bu),
        eq_rate_pct: rate_pct(achieved.eq, section.demand_eq_bu),
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Direction;
    use approx::assert_relative_eq;

    fn member(system: &str, type_name: &str, length_or_count: f64, height_m: f64) -> BracingMember {
        BracingMember {
            system: system.into(),
            type_name: type_name.into(),
            length_or_count,
            height_m,
            ..BracingMember::new("M")
        }
    }

    #[test]
    fn test_nearest_not_exceeding_row() {
        let c = member_capacity(&member("GIB", "GS1-N", 0.9, 2.4), FloorType::Timber);
        // 0.6 row: 50/45 per metre
        assert_relative_eq!(c.total.wind, 45.0, epsilon = 1e-12);
        assert_relative_eq!(c.unit.eq, 45.0, epsilon = 1e-12);
    }

    #[test]
    fn test_short_member_has_no_capacity() {
        let c = member_capacity(&member("GIB", "GS1-N", 0.3, 2.4), FloorType::Timber);
        assert_eq!(c.total, UnitRating::ZERO);
    }

    #[test]
    fn test_floor_type_cap() {
        let m = member("GIB", "BLG-H", 1.2, 2.4);
        let timber = member_capacity(&m, FloorType::Timber);
        assert_relative_eq!(timber.total.wind, 120.0 * 1.2, epsilon = 1e-9);
        let concrete = member_capacity(&m, FloorType::Concrete);
        assert_relative_eq!(concrete.total.wind, 145.0 * 1.2, epsilon = 1e-9);
        assert_relative_eq!(concrete.total.eq, 140.0 * 1.2, epsilon = 1e-9);
    }

    #[test]
    fn test_height_ratio() {
        let tall = member_capacity(&member("GIB", "GS2-N", 1.2, 3.0), FloorType::Timber);
        assert_relative_eq!(tall.total.wind, 100.0 * 1.2 * 0.8, epsilon = 1e-9);
        let flat = member_capacity(&member("GIB", "GS2-N", 1.2, 0.0), FloorType::Timber);
        assert_eq!(flat.total.wind, 0.0);
    }

    #[test]
    fn test_count_based_ignores_cap_and_height() {
        let c = member_capacity(&member("NZS3604", "Timber diagonal brace", 3.0, 0.0), FloorType::Timber);
        assert_eq!(c.total, UnitRating::new(210.0, 180.0));
        assert_eq!(c.unit, UnitRating::new(70.0, 60.0));

        let none = member_capacity(&member("NZS3604", "Cut-in brace", 0.0, 2.4), FloorType::Timber);
        assert_eq!(none.total, UnitRating::ZERO);
    }

    #[test]
    fn test_unknown_type_is_zero() {
        let c = member_capacity(&member("GIB", "Nope", 1.2, 2.4), FloorType::Timber);
        assert_eq!(c.total, UnitRating::ZERO);
    }

    #[test]
    fn test_line_min_demand_terms() {
        assert_eq!(line_min_demand(0.0, 100.0, 2), 100.0);
        assert_eq!(line_min_demand(10.0, 100.0, 2), 150.0);
        assert_eq!(line_min_demand(0.0, 1000.0, 2), 250.0);
        assert_eq!(line_min_demand(0.0, 1000.0, 0), 500.0);
    }

    #[test]
    fn test_section_rates() {
        let mut section = BracingSection::new("S", None, Direction::NS, FloorType::Timber, 120.0, 0.0);
        // two default members: 60 x 1.2 = 72 each
        let summary = summarize_section(&section);
        assert_relative_eq!(summary.achieved.wind, 144.0, epsilon = 1e-9);
        assert_relative_eq!(summary.wind_rate_pct, 120.0, epsilon = 1e-9);
        assert!(summary.wind_passes());
        assert_eq!(summary.eq_rate_pct, 0.0);
        assert!(!summary.eq_passes());

        section.demand_wind_bu = 288.0;
        assert!(!summarize_section(&section).wind_passes());
    }

    #[test]
    fn test_line_ok_flags() {
        let section = BracingSection::new("S", None, Direction::EW, FloorType::Timber, 100.0, 100.0);
        let summary = summarize_section(&section);
        let line = &summary.lines[0];
        assert_eq!(line.min_demand, UnitRating::new(100.0, 100.0));
        // 72 wind, 66 eq on a 100 BU minimum
        assert!(!line.wind_ok());
        assert!(!line.passes());
    }
}
