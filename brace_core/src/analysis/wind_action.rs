//! # Wind Action Distributor
//!
//! Per wind direction the stack is walked from the top down. `dim` is the
//! level's plan width facing the wind.
//!
//! | Level | Ar                               | Aw                      | F                        |
//! |-------|----------------------------------|-------------------------|--------------------------|
//! | top   | `h̄r·dim`                         | `0.5·h·dim`             | `pw(Ar+Aw)` or `pr·Ar+pw·Aw` (hip) |
//! | below | `h̄r·(dim − dim_above)` on a step | `Aw_above + 0.5·h·dim`  | `pw(Ar+Aw)`              |
//!
//! Every force is scaled by `Kc` and the shear accumulates downwards.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::wind_pressure::{DesignPressures, WindFactors, WindInput};
use crate::level::{top_down, Direction, Level};

/// Warning attached to a stepped-out level without a roof
pub const SETBACK_ROOF_WARNING: &str = "Roof may be missing for this setback, please check.";

/// Wind force and shear at one level for one direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindAction {
    pub level_id: Uuid,
    pub level_name: String,
    /// Plan width facing the wind (m)
    pub dim_m: f64,
    /// Effective roof area Ar (m²)
    pub roof_area_m2: f64,
    /// Effective wall area Aw (m²)
    pub wall_area_m2: f64,
    /// Force after Kc (kN)
    pub force_kn: f64,
    /// Cumulative shear (kN)
    pub shear_kn: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Wind actions for both directions, bottom level first
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WindActionResult {
    pub ns: Vec<WindAction>,
    pub ew: Vec<WindAction>,
}

impl WindActionResult {
    pub fn direction(&self, direction: Direction) -> &[WindAction] {
        match direction {
            Direction::NS => &self.ns,
            Direction::EW => &self.ew,
        }
    }

    pub fn action_for(&self, level_id: Uuid, direction: Direction) -> Option<&WindAction> {
        self.direction(direction).iter().find(|a| a.level_id == level_id)
    }
}

/// Distribute one direction's pressures over the stack.
pub fn distribute(levels: &[Level], pressures: DesignPressures, gable: bool, kc: f64, direction: Direction) -> Vec<WindAction> {
    let mut actions = Vec::with_capacity(levels.len());
    let mut shear = 0.0;
    let mut wall_area_above = 0.0;
    let mut dim_above: Option<f64> = None;

    for level in top_down(levels) {
        let dim = level.windward_width_m(direction);
        let half_wall = 0.5 * level.storey_height_m * dim;
        let avg_roof_height = level.average_roof_height_m();
        let mut warning = None;

        let (roof_area, wall_area, force) = match dim_above {
            None => {
                let roof_area = avg_roof_height * dim;
                let force = if gable {
                    pressures.pw * (roof_area + half_wall)
                } else {
                    pressures.pr * roof_area + pressures.pw * half_wall
                };
                (roof_area, half_wall, force)
            }
            Some(above) => {
                let step = dim - above;
                let roof_area = if step > 0.0 && level.has_roof() {
                    avg_roof_height * step
                } else {
                    if step > 0.0 {
                        tracing::warn!(level = %level.name, %direction, step_m = step, "{}", SETBACK_ROOF_WARNING);
                        warning = Some(SETBACK_ROOF_WARNING.to_string());
                    }
                    0.0
                };
                let wall_area = wall_area_above + half_wall;
                (roof_area, wall_area, pressures.pw * (roof_area + wall_area))
            }
        };

        let force_kn = force * kc;
        shear += force_kn;
        actions.push(WindAction {
            level_id: level.id,
            level_name: level.name.clone(),
            dim_m: dim,
            roof_area_m2: roof_area,
            wall_area_m2: wall_area,
            force_kn,
            shear_kn: shear,
            warning,
        });

        wall_area_above = wall_area;
        dim_above = Some(dim);
    }

    actions.reverse();
    actions
}

/// Wind actions in both directions from the selected pressure source.
pub fn calculate(levels: &[Level], input: &WindInput, factors: &WindFactors) -> WindActionResult {
    let for_direction = |direction: Direction| {
        let pressures = factors.design_pressures(input.pressure_source, direction);
        distribute(levels, pressures, input.is_gable(direction), input.kc, direction)
    };
    let result = WindActionResult {
        ns: for_direction(Direction::NS),
        ew: for_direction(Direction::EW),
    };
    tracing::info!(
        base_shear_ns_kn = result.ns.first().map_or(0.0, |a| a.shear_kn),
        base_shear_ew_kn = result.ew.first().map_or(0.0, |a| a.shear_kn),
        "wind actions calculated"
    );
    result
}
