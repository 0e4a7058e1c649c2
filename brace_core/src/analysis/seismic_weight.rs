//! # Seismic Weight Distributor
//!
//! Turns the parts placed on each level into seismic dead and live weight
//! per level, traversing the stack from the top down.
//!
//! | Part                   | DL                     | LL                     |
//! |------------------------|------------------------|------------------------|
//! | Wall                   | `l·h·of·w · hf`        | 0                      |
//! | Other, partition       | `A·w · hf`             | 0                      |
//! | Floor                  | `A·w`                  | `Q·A·φe`               |
//! | Roof, other            | `A·w`                  | 0                      |
//!
//! The remaining `(1 − hf)` share of wall and partition weight is carried
//! down and added to the effective DL of the level below. The level LL is
//! scaled by `φa = 0.3 + 3/√ΣA_floor` when the area factor is applied.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assembly::AssemblyCategory;
use crate::equations::seismic::area_reduction_factor;
use crate::level::{bottom_up, top_down, Level, PartGeometry};

/// Share of wall weight assigned to the level the wall stands on
pub const DEFAULT_HEIGHT_FACTOR: f64 = 0.5;

/// Earthquake live load combination factor
pub const DEFAULT_PHI_E: f64 = 0.3;

/// Per-analysis copy of a placed part with its seismic deduction factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeismicPartInstance {
    pub instance_id: Uuid,
    pub level_id: Uuid,
    pub name: String,
    pub category: AssemblyCategory,
    pub is_partition: bool,
    pub base_weight_kpa: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_load_kpa: Option<f64>,
    pub geometry: PartGeometry,
    pub height_factor: f64,
    pub phi_e: f64,
}

impl SeismicPartInstance {
    /// Walls and partitions split their weight with the level below
    pub fn is_wall_like(&self) -> bool {
        self.category == AssemblyCategory::Wall || (self.category == AssemblyCategory::Other && self.is_partition)
    }
}

/// Seismic weight of one level
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SeismicLevelResult {
    pub level_id: Uuid,
    /// Wi dead load including wall weight carried down from above (kN)
    pub effective_dl_kn: f64,
    /// Live load after φe and φa (kN)
    pub effective_ll_kn: f64,
    /// Wall weight carried to the level below (kN)
    pub lower_half_wall_weight_kn: f64,
}

impl SeismicLevelResult {
    pub fn seismic_weight_kn(&self) -> f64 {
        self.effective_dl_kn + self.effective_ll_kn
    }
}

/// Fresh instances for every placed part, bottom level first, with default
/// deduction factors. Previous edits to the factors are discarded.
pub fn sync_instances(levels: &[Level]) -> Vec<SeismicPartInstance> {
    bottom_up(levels)
        .flat_map(|level| {
            level.parts.iter().map(move |part| SeismicPartInstance {
                instance_id: part.instance_id,
                level_id: level.id,
                name: part.name.clone(),
                category: part.category,
                is_partition: part.is_partition,
                base_weight_kpa: part.base_weight_kpa,
                live_load_kpa: part.live_load_kpa,
                geometry: part.geometry,
                height_factor: DEFAULT_HEIGHT_FACTOR,
                phi_e: DEFAULT_PHI_E,
            })
        })
        .collect()
}

/// Seismic weights for every level, keyed by level id.
pub fn distribute_weights(
    levels: &[Level],
    instances: &[SeismicPartInstance],
    apply_area_factor: bool,
) -> BTreeMap<Uuid, SeismicLevelResult> {
    let mut results = BTreeMap::new();
    let mut carried_from_above = 0.0;

    for level in top_down(levels) {
        let mut level_dl = 0.0;
        let mut level_ll = 0.0;
        let mut carried_down = 0.0;
        let mut floor_area = 0.0;

        for inst in instances.iter().filter(|i| i.level_id == level.id) {
            let area = inst.geometry.area_m2();
            if inst.is_wall_like() {
                let total = inst.geometry.weight_kn(inst.base_weight_kpa);
                level_dl += total * inst.height_factor;
                carried_down += total * (1.0 - inst.height_factor);
            } else if inst.category == AssemblyCategory::Floor {
                level_dl += area * inst.base_weight_kpa;
                level_ll += inst.live_load_kpa.unwrap_or(0.0) * area * inst.phi_e;
                floor_area += area;
            } else {
                level_dl += area * inst.base_weight_kpa;
            }
        }

        let phi_a = if apply_area_factor { area_reduction_factor(floor_area) } else { 1.0 };

        let result = SeismicLevelResult {
            level_id: level.id,
            effective_dl_kn: level_dl + carried_from_above,
            effective_ll_kn: level_ll * phi_a,
            lower_half_wall_weight_kn: carried_down,
        };
        tracing::debug!(
            level = %level.name,
            dl_kn = result.effective_dl_kn,
            ll_kn = result.effective_ll_kn,
            carried_kn = carried_down,
            "seismic level weight"
        );
        results.insert(level.id, result);
        carried_from_above = carried_down;
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LevelPart;
    use approx::assert_relative_eq;

    fn two_storeys() -> Vec<Level> {
        let mut ground = Level::new("Ground");
        ground.parts.push(LevelPart::placed("Floor", None, AssemblyCategory::Floor, false, 0.5, 2.4));
        ground.parts.push(LevelPart::placed("Wall", None, AssemblyCategory::Wall, false, 0.5, 2.4));

        let mut upper = Level::new("Upper");
        upper.parts.push(LevelPart::placed("Roof", None, AssemblyCategory::Roof, false, 0.45, 2.4));
        upper.parts.push(LevelPart::placed("Wall", None, AssemblyCategory::Wall, false, 0.5, 2.4));
        upper.parts.push(LevelPart::placed("Partition Wall", None, AssemblyCategory::Other, true, 0.3, 2.4));
        vec![ground, upper]
    }

    #[test]
    fn test_sync_resets_factors() {
        let levels = two_storeys();
        let instances = sync_instances(&levels);
        assert_eq!(instances.len(), 5);
        assert_eq!(instances[0].level_id, levels[0].id);
        assert!(instances.iter().all(|i| i.height_factor == 0.5 && i.phi_e == 0.3));
    }

    #[test]
    fn test_wall_weight_carried_down() {
        let levels = two_storeys();
        let instances = sync_instances(&levels);
        let results = distribute_weights(&levels, &instances, false);

        let upper = results[&levels[1].id];
        let ground = results[&levels[0].id];

        // upper wall 10 x 2.4 x 1.0 x 0.5 = 12 kN, partition 50 x 0.3 = 15 kN
        assert_relative_eq!(upper.lower_half_wall_weight_kn, 6.0 + 7.5, epsilon = 1e-9);
        assert_relative_eq!(upper.effective_dl_kn, 50.0 * 0.45 + 6.0 + 7.5, epsilon = 1e-9);
        assert_eq!(upper.effective_ll_kn, 0.0);

        // ground: floor 25 + half its own wall 6 + 13.5 from above
        assert_relative_eq!(ground.effective_dl_kn, 25.0 + 6.0 + 13.5, epsilon = 1e-9);
        assert_relative_eq!(ground.effective_ll_kn, 2.0 * 50.0 * 0.3, epsilon = 1e-9);
    }

    #[test]
    fn test_area_factor_scales_live_load() {
        let levels = two_storeys();
        let instances = sync_instances(&levels);
        let results = distribute_weights(&levels, &instances, true);
        let ground = results[&levels[0].id];
        let phi_a = 0.3 + 3.0 / 50f64.sqrt();
        assert_relative_eq!(ground.effective_ll_kn, 30.0 * phi_a, epsilon = 1e-9);
    }

    #[test]
    fn test_non_partition_other_is_surface_load() {
        let mut level = Level::new("L");
        level.parts.push(LevelPart::placed("Tank", None, AssemblyCategory::Other, false, 1.0, 2.4));
        let levels = vec![level];
        let mut instances = sync_instances(&levels);
        instances[0].height_factor = 0.0;
        let results = distribute_weights(&levels, &instances, false);
        let r = results[&levels[0].id];
        assert_eq!(r.effective_dl_kn, 50.0);
        assert_eq!(r.lower_half_wall_weight_kn, 0.0);
    }

    #[test]
    fn test_bottom_level_carried_weight_is_dropped_below_ground() {
        let levels = two_storeys();
        let instances = sync_instances(&levels);
        let results = distribute_weights(&levels, &instances, false);
        let total_parts: f64 = levels
            .iter()
            .flat_map(|l| l.parts.iter())
            .map(|p| p.dead_weight_kn())
            .sum();
        let total_dl: f64 = results.values().map(|r| r.effective_dl_kn).sum();
        let ground_carried = results[&levels[0].id].lower_half_wall_weight_kn;
        assert_relative_eq!(total_dl + ground_carried, total_parts, epsilon = 1e-9);
    }
}
