//! # Bracing Sections
//!
//! A bracing section is the design unit for one level and one wind/earthquake
//! direction. It owns an ordered list of bracing lines, each owning an
//! ordered list of members. Capacity checks live in [`ledger`].
//!
//! Structural guards:
//!
//! - a section keeps at least [`MIN_LINES`] lines
//! - a line keeps at least [`MIN_MEMBERS`] member
//!
//! ## Example
//!
//! ```rust
//! use brace_core::bracing::BracingSection;
//!
//! let mut section = BracingSection::custom(None);
//! assert_eq!(section.lines.len(), 2);
//!
//! let id = section.add_line(0);
//! assert_eq!(section.lines[1].id, id);
//! assert_eq!(section.lines[1].name, "BL-3");
//! ```

pub mod ledger;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{ensure_at_least, CalcError, CalcResult};
use crate::level::Direction;
use crate::tables::bracing::{first_type_name, FloorType};
use crate::units::{BracingUnits, Kilonewtons};

pub use ledger::{line_min_demand, member_capacity, summarize_section, LineSummary, MemberCapacity, SectionSummary};

pub const MIN_LINES: usize = 2;
pub const MIN_MEMBERS: usize = 1;

/// Demand given to a custom section (BU)
pub const CUSTOM_SECTION_DEMAND_BU: f64 = 100.0;

pub const DEFAULT_MEMBER_SYSTEM: &str = "GIB";
pub const DEFAULT_MEMBER_TYPE: &str = "GS1-N";
pub const DEFAULT_MEMBER_LENGTH_M: f64 = 1.2;
pub const DEFAULT_MEMBER_HEIGHT_M: f64 = 2.4;

/// Bracing demand for a storey shear, rounded to whole BUs.
pub fn demand_from_shear(shear_kn: f64) -> f64 {
    BracingUnits::from(Kilonewtons(shear_kn)).rounded().value()
}

/// Move `items[from]` to `to`, clamping `to` to the list.
fn reorder<T>(items: &mut Vec<T>, from: usize, to: usize, entity: &str) -> CalcResult<()> {
    if from >= items.len() {
        return Err(CalcError::invalid_input(
            format!("{entity} index"),
            from.to_string(),
            format!("Index out of range for {} items", items.len()),
        ));
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
    Ok(())
}

/// One bracing element on a line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracingMember {
    pub id: Uuid,
    pub name: String,
    pub system: String,
    #[serde(rename = "type")]
    pub type_name: String,
    /// Member length (m) for length-based types, item count otherwise
    pub length_or_count: f64,
    pub height_m: f64,
}

impl BracingMember {
    /// A GIB GS1-N member, 1.2 m long and 2.4 m high.
    pub fn new(name: impl Into<String>) -> Self {
        BracingMember {
            id: Uuid::new_v4(),
            name: name.into(),
            system: DEFAULT_MEMBER_SYSTEM.to_string(),
            type_name: DEFAULT_MEMBER_TYPE.to_string(),
            length_or_count: DEFAULT_MEMBER_LENGTH_M,
            height_m: DEFAULT_MEMBER_HEIGHT_M,
        }
    }

    /// Switch system and reset the type to the system's first type (empty
    /// for an unknown system).
    pub fn set_system(&mut self, system: impl Into<String>) {
        self.system = system.into();
        self.type_name = first_type_name(&self.system).unwrap_or_default().to_string();
    }
}

/// Partial update of a member
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberPatch {
    pub name: Option<String>,
    pub system: Option<String>,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub length_or_count: Option<f64>,
    pub height_m: Option<f64>,
}

impl MemberPatch {
    /// Apply the patch. A system change resets the type after any explicit
    /// type in the same patch.
    pub fn apply(self, member: &mut BracingMember) -> CalcResult<()> {
        if let Some(v) = self.length_or_count {
            ensure_at_least("length_or_count", v, 0.0)?;
        }
        if let Some(v) = self.height_m {
            ensure_at_least("height_m", v, 0.0)?;
        }
        if let Some(name) = self.name {
            member.name = name;
        }
        if let Some(type_name) = self.type_name {
            member.type_name = type_name;
        }
        if let Some(system) = self.system {
            member.set_system(system);
        }
        if let Some(v) = self.length_or_count {
            member.length_or_count = v;
        }
        if let Some(v) = self.height_m {
            member.height_m = v;
        }
        Ok(())
    }
}

/// A line of bracing members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracingLine {
    pub id: Uuid,
    pub name: String,
    /// External wall length along the line (m)
    #[serde(default)]
    pub external_wall_length_m: f64,
    pub members: Vec<BracingMember>,
}

impl BracingLine {
    /// A line with one default member named `{name}-1`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        BracingLine {
            id: Uuid::new_v4(),
            members: vec![BracingMember::new(format!("{name}-1"))],
            name,
            external_wall_length_m: 0.0,
        }
    }

    pub fn member(&self, member_id: Uuid) -> Option<&BracingMember> {
        self.members.iter().find(|m| m.id == member_id)
    }

    pub fn member_mut(&mut self, member_id: Uuid) -> CalcResult<&mut BracingMember> {
        self.members
            .iter_mut()
            .find(|m| m.id == member_id)
            .ok_or_else(|| CalcError::not_found("BracingMember", member_id))
    }

    /// Insert a default member after `index` (clamped). Returns its id.
    pub fn add_member(&mut self, index: usize) -> Uuid {
        let member = BracingMember::new(format!("{}-{}", self.name, self.members.len() + 1));
        let id = member.id;
        let at = (index + 1).min(self.members.len());
        self.members.insert(at, member);
        id
    }

    pub fn remove_member(&mut self, member_id: Uuid) -> CalcResult<BracingMember> {
        let pos = self
            .members
            .iter()
            .position(|m| m.id == member_id)
            .ok_or_else(|| CalcError::not_found("BracingMember", member_id))?;
        if self.members.len() <= MIN_MEMBERS {
            return Err(CalcError::invalid_input(
                "members",
                self.members.len().to_string(),
                format!("A bracing line keeps at least {MIN_MEMBERS} member"),
            ));
        }
        Ok(self.members.remove(pos))
    }

    pub fn reorder_members(&mut self, from: usize, to: usize) -> CalcResult<()> {
        reorder(&mut self.members, from, to, "member")
    }
}

/// Partial update of a line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinePatch {
    pub name: Option<String>,
    pub external_wall_length_m: Option<f64>,
}

impl LinePatch {
    pub fn apply(self, line: &mut BracingLine) -> CalcResult<()> {
        if let Some(v) = self.external_wall_length_m {
            line.external_wall_length_m = ensure_at_least("external_wall_length_m", v, 0.0)?;
        }
        if let Some(name) = self.name {
            line.name = name;
        }
        Ok(())
    }
}

/// Bracing design unit for one level and direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracingSection {
    pub id: Uuid,
    /// Level the section belongs to, `None` for a detached custom section
    pub level_id: Option<Uuid>,
    pub direction: Direction,
    pub name: String,
    pub floor_type: FloorType,
    /// Wind demand (BU)
    pub demand_wind_bu: f64,
    /// Earthquake demand (BU)
    pub demand_eq_bu: f64,
    pub lines: Vec<BracingLine>,
}

fn default_lines() -> Vec<BracingLine> {
    (1..=MIN_LINES).map(|i| BracingLine::new(format!("BL-{i}"))).collect()
}

impl BracingSection {
    /// A section with lines `BL-1` and `BL-2`.
    pub fn new(
        name: impl Into<String>,
        level_id: Option<Uuid>,
        direction: Direction,
        floor_type: FloorType,
        demand_wind_bu: f64,
        demand_eq_bu: f64,
    ) -> Self {
        BracingSection {
            id: Uuid::new_v4(),
            level_id,
            direction,
            name: name.into(),
            floor_type,
            demand_wind_bu,
            demand_eq_bu,
            lines: default_lines(),
        }
    }

    /// A user-defined N-S section with 100 BU demands.
    pub fn custom(level_id: Option<Uuid>) -> Self {
        BracingSection::new(
            "Custom Section",
            level_id,
            Direction::NS,
            FloorType::default(),
            CUSTOM_SECTION_DEMAND_BU,
            CUSTOM_SECTION_DEMAND_BU,
        )
    }

    pub fn line(&self, line_id: Uuid) -> Option<&BracingLine> {
        self.lines.iter().find(|l| l.id == line_id)
    }

    pub fn line_mut(&mut self, line_id: Uuid) -> CalcResult<&mut BracingLine> {
        self.lines
            .iter_mut()
            .find(|l| l.id == line_id)
            .ok_or_else(|| CalcError::not_found("BracingLine", line_id))
    }

    /// Insert a default line after `index` (clamped). Returns its id.
    pub fn add_line(&mut self, index: usize) -> Uuid {
        let line = BracingLine::new(format!("BL-{}", self.lines.len() + 1));
        let id = line.id;
        let at = (index + 1).min(self.lines.len());
        self.lines.insert(at, line);
        id
    }

    pub fn remove_line(&mut self, line_id: Uuid) -> CalcResult<BracingLine> {
        let pos = self
            .lines
            .iter()
            .position(|l| l.id == line_id)
            .ok_or_else(|| CalcError::not_found("BracingLine", line_id))?;
        if self.lines.len() <= MIN_LINES {
            return Err(CalcError::invalid_input(
                "lines",
                self.lines.len().to_string(),
                format!("A bracing section keeps at least {MIN_LINES} lines"),
            ));
        }
        Ok(self.lines.remove(pos))
    }

    pub fn reorder_lines(&mut self, from: usize, to: usize) -> CalcResult<()> {
        reorder(&mut self.lines, from, to, "line")
    }

    /// Replace the demands with the calculated shears where available.
    pub fn reset_demands(&mut self, wind_shear_kn: Option<f64>, eq_shear_kn: Option<f64>) {
        if let Some(shear) = wind_shear_kn {
            self.demand_wind_bu = demand_from_shear(shear);
        }
        if let Some(shear) = eq_shear_kn {
            self.demand_eq_bu = demand_from_shear(shear);
        }
    }
}

/// Partial update of a section's details
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionPatch {
    pub name: Option<String>,
    pub floor_type: Option<FloorType>,
    pub direction: Option<Direction>,
    pub demand_wind_bu: Option<f64>,
    pub demand_eq_bu: Option<f64>,
}

impl SectionPatch {
    pub fn apply(self, section: &mut BracingSection) -> CalcResult<()> {
        if let Some(v) = self.demand_wind_bu {
            ensure_at_least("demand_wind_bu", v, 0.0)?;
        }
        if let Some(v) = self.demand_eq_bu {
            ensure_at_least("demand_eq_bu", v, 0.0)?;
        }
        if let Some(name) = self.name {
            section.name = name;
        }
        if let Some(floor_type) = self.floor_type {
            section.floor_type = floor_type;
        }
        if let Some(direction) = self.direction {
            section.direction = direction;
        }
        if let Some(v) = self.demand_wind_bu {
            section.demand_wind_bu = v;
        }
        if let Some(v) = self.demand_eq_bu {
            section.demand_eq_bu = v;
        }
        Ok(())
    }
}
