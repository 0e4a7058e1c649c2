//! # Levels
//!
//! A building is a strictly linear stack of levels, index 0 at the bottom.
//! Each level owns the parts placed on it: assemblies (or predefined
//! weights) with instance geometry. Level totals are pure functions of the
//! part list and are refreshed by [`Level::recalculate`] after every edit.
//!
//! Traversal direction is explicit: use [`bottom_up`] and [`top_down`]
//! rather than reversing slices inline.
//!
//! ## Example
//!
//! ```rust
//! use brace_core::assembly::AssemblyCategory;
//! use brace_core::level::{Level, LevelPart};
//!
//! let mut level = Level::new("Ground");
//! level.parts.push(LevelPart::placed("Floor", None, AssemblyCategory::Floor, false, 0.45, level.storey_height_m));
//! level.recalculate();
//!
//! assert_eq!(level.total_area_m2, 50.0);
//! assert!((level.total_level_weight_kn - 22.5).abs() < 1e-12);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assembly::AssemblyCategory;
use crate::units::{Kpa, SqMetres};

pub const DEFAULT_STOREY_HEIGHT_M: f64 = 2.4;
pub const DEFAULT_PLAN_DIM_M: f64 = 10.0;

/// Default placement geometry
pub const DEFAULT_SURFACE_AREA_M2: f64 = 50.0;
pub const DEFAULT_ROOF_HEIGHT_M: f64 = 0.9;
pub const DEFAULT_WALL_LENGTH_M: f64 = 10.0;
pub const DEFAULT_ROOF_LIVE_LOAD_KPA: f64 = 0.25;
pub const DEFAULT_FLOOR_LIVE_LOAD_KPA: f64 = 2.0;

/// Levels listed from the ground up
pub fn bottom_up<T>(stack: &[T]) -> std::slice::Iter<'_, T> {
    stack.iter()
}

/// Levels listed from the top down
pub fn top_down<T>(stack: &[T]) -> std::iter::Rev<std::slice::Iter<'_, T>> {
    stack.iter().rev()
}

/// Plan direction of a design action or bracing section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Direction {
    #[default]
    NS,
    EW,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::NS, Direction::EW];
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::NS => write!(f, "NS"),
            Direction::EW => write!(f, "EW"),
        }
    }
}

/// Instance geometry of a placed part
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape")]
pub enum PartGeometry {
    Wall {
        length_m: f64,
        height_m: f64,
        opening_factor: f64,
    },
    Surface {
        area_m2: f64,
        /// Roof height above the storey, used by the wind tributary areas
        #[serde(default, skip_serializing_if = "Option::is_none")]
        roof_height_m: Option<f64>,
    },
}

impl PartGeometry {
    /// Geometry a newly placed part of `category` starts with.
    pub fn default_for(category: AssemblyCategory, storey_height_m: f64) -> Self {
        match category {
            AssemblyCategory::Wall => PartGeometry::Wall {
                length_m: DEFAULT_WALL_LENGTH_M,
                height_m: storey_height_m,
                opening_factor: 1.0,
            },
            AssemblyCategory::Roof => PartGeometry::Surface {
                area_m2: DEFAULT_SURFACE_AREA_M2,
                roof_height_m: Some(DEFAULT_ROOF_HEIGHT_M),
            },
            AssemblyCategory::Floor | AssemblyCategory::Other => PartGeometry::Surface {
                area_m2: DEFAULT_SURFACE_AREA_M2,
                roof_height_m: None,
            },
        }
    }

    pub fn area_m2(&self) -> f64 {
        match self {
            PartGeometry::Surface { area_m2, .. } => *area_m2,
            PartGeometry::Wall { .. } => 0.0,
        }
    }

    pub fn roof_height_m(&self) -> f64 {
        match self {
            PartGeometry::Surface { roof_height_m, .. } => roof_height_m.unwrap_or(0.0),
            PartGeometry::Wall { .. } => 0.0,
        }
    }

    /// Weight of the part at `base_weight_kpa` (kN)
    pub fn weight_kn(&self, base_weight_kpa: f64) -> f64 {
        match self {
            PartGeometry::Wall {
                length_m,
                height_m,
                opening_factor,
            } => length_m * height_m * opening_factor * base_weight_kpa,
            PartGeometry::Surface { area_m2, .. } => (Kpa(base_weight_kpa) * SqMetres(*area_m2)).value(),
        }
    }
}

fn default_live_load(category: AssemblyCategory) -> Option<f64> {
    match category {
        AssemblyCategory::Roof => Some(DEFAULT_ROOF_LIVE_LOAD_KPA),
        AssemblyCategory::Floor => Some(DEFAULT_FLOOR_LIVE_LOAD_KPA),
        AssemblyCategory::Wall | AssemblyCategory::Other => None,
    }
}

/// An assembly or predefined weight placed on a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelPart {
    pub instance_id: Uuid,
    pub name: String,
    /// Source assembly, `None` for predefined or ad-hoc parts
    pub assembly_id: Option<Uuid>,
    pub category: AssemblyCategory,
    #[serde(default)]
    pub is_partition: bool,
    /// Area load (kPa) copied from the source
    pub base_weight_kpa: f64,
    pub geometry: PartGeometry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_load_kpa: Option<f64>,
}

impl LevelPart {
    /// A part with the default placement geometry and live load for its category.
    pub fn placed(
        name: impl Into<String>,
        assembly_id: Option<Uuid>,
        category: AssemblyCategory,
        is_partition: bool,
        base_weight_kpa: f64,
        storey_height_m: f64,
    ) -> Self {
        LevelPart {
            instance_id: Uuid::new_v4(),
            name: name.into(),
            assembly_id,
            category,
            is_partition,
            base_weight_kpa,
            geometry: PartGeometry::default_for(category, storey_height_m),
            live_load_kpa: default_live_load(category),
        }
    }

    /// Dead weight of the part (kN)
    pub fn dead_weight_kn(&self) -> f64 {
        self.geometry.weight_kn(self.base_weight_kpa)
    }

    /// Change the category and reshape the geometry: a change between wall
    /// and surface shapes restarts from the placement defaults, a surface
    /// keeps its area and only roofs keep a roof height.
    pub fn set_category(&mut self, category: AssemblyCategory, storey_height_m: f64) {
        self.category = category;
        self.geometry = match (self.geometry, category) {
            (geometry @ PartGeometry::Wall { .. }, AssemblyCategory::Wall) => geometry,
            (PartGeometry::Surface { area_m2, roof_height_m }, c) if c != AssemblyCategory::Wall => {
                PartGeometry::Surface {
                    area_m2,
                    roof_height_m: if c == AssemblyCategory::Roof { roof_height_m } else { None },
                }
            }
            (_, c) => PartGeometry::default_for(c, storey_height_m),
        };
    }
}

/// One storey of the building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub id: Uuid,
    pub name: String,
    pub storey_height_m: f64,
    /// Plan dimension along the N-S axis (length of the E-W walls)
    pub plan_dim_ns_m: f64,
    /// Plan dimension along the E-W axis (length of the N-S walls)
    pub plan_dim_ew_m: f64,
    pub parts: Vec<LevelPart>,
    /// Σ floor and roof areas (m²)
    #[serde(default)]
    pub total_area_m2: f64,
    /// Σ part dead weights (kN)
    #[serde(default)]
    pub total_level_weight_kn: f64,
}

impl Level {
    pub fn new(name: impl Into<String>) -> Self {
        Level {
            id: Uuid::new_v4(),
            name: name.into(),
            storey_height_m: DEFAULT_STOREY_HEIGHT_M,
            plan_dim_ns_m: DEFAULT_PLAN_DIM_M,
            plan_dim_ew_m: DEFAULT_PLAN_DIM_M,
            parts: Vec::new(),
            total_area_m2: 0.0,
            total_level_weight_kn: 0.0,
        }
    }

    /// Refresh the derived totals from the part list.
    pub fn recalculate(&mut self) {
        self.total_area_m2 = self
            .parts
            .iter()
            .filter(|p| p.category.counts_towards_area())
            .fold(0.0, |total, p| total + p.geometry.area_m2());
        // folded from +0.0: an empty f64 sum is -0.0
        self.total_level_weight_kn = self.parts.iter().fold(0.0, |total, p| total + p.dead_weight_kn());
    }

    pub fn part(&self, instance_id: Uuid) -> Option<&LevelPart> {
        self.parts.iter().find(|p| p.instance_id == instance_id)
    }

    pub fn part_mut(&mut self, instance_id: Uuid) -> Option<&mut LevelPart> {
        self.parts.iter_mut().find(|p| p.instance_id == instance_id)
    }

    pub fn roof_parts(&self) -> impl Iterator<Item = &LevelPart> {
        self.parts.iter().filter(|p| p.category == AssemblyCategory::Roof)
    }

    pub fn has_roof(&self) -> bool {
        self.roof_parts().next().is_some()
    }

    /// Area-weighted average roof height over the level's roof parts (zero
    /// when there is no roof area).
    pub fn average_roof_height_m(&self) -> f64 {
        let (area, weighted) = self.roof_parts().fold((0.0, 0.0), |(area, weighted), p| {
            let a = p.geometry.area_m2();
            (area + a, weighted + p.geometry.roof_height_m() * a)
        });
        if area > 0.0 {
            weighted / area
        } else {
            0.0
        }
    }

    /// Plan width facing wind of the given direction: N-S wind loads the
    /// E-W dimension and vice versa.
    pub fn windward_width_m(&self, direction: Direction) -> f64 {
        match direction {
            Direction::NS => self.plan_dim_ew_m,
            Direction::EW => self.plan_dim_ns_m,
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::new("Level 1")
    }
}
