//! Level and placed-part mutators.
//!
//! Every edit here changes geometry: level totals, seismic instances and
//! wind pressures are re-derived at once, while the seismic chain is marked
//! stale.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Project;
use crate::assembly::AssemblyCategory;
use crate::errors::{ensure_at_least, CalcError, CalcResult};
use crate::level::{Level, LevelPart, PartGeometry};
use crate::library::find_predefined_part;
use crate::staleness::Change;

/// Partial update of a level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelPatch {
    pub name: Option<String>,
    pub storey_height_m: Option<f64>,
    pub plan_dim_ns_m: Option<f64>,
    pub plan_dim_ew_m: Option<f64>,
}

/// Partial update of a placed part
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartPatch {
    pub name: Option<String>,
    /// Reshapes the geometry before `geometry` is applied
    pub category: Option<AssemblyCategory>,
    pub is_partition: Option<bool>,
    pub base_weight_kpa: Option<f64>,
    pub geometry: Option<PartGeometry>,
    /// `Some(None)` clears the live load
    pub live_load_kpa: Option<Option<f64>>,
}

fn validate_geometry(geometry: &PartGeometry) -> CalcResult<()> {
    match *geometry {
        PartGeometry::Wall {
            length_m,
            height_m,
            opening_factor,
        } => {
            ensure_at_least("length_m", length_m, 0.0)?;
            ensure_at_least("height_m", height_m, 0.0)?;
            ensure_at_least("opening_factor", opening_factor, 0.0)?;
        }
        PartGeometry::Surface { area_m2, roof_height_m } => {
            ensure_at_least("area_m2", area_m2, 0.0)?;
            if let Some(h) = roof_height_m {
                ensure_at_least("roof_height_m", h, 0.0)?;
            }
        }
    }
    Ok(())
}

impl Project {
    /// Add a level on top of the stack.
    pub fn add_level(&mut self, name: impl Into<String>) -> Uuid {
        let level = Level::new(name);
        let id = level.id;
        self.levels.push(level);
        self.geometry_changed();
        id
    }

    /// Remove a level. Bracing sections on it are kept but detached.
    pub fn remove_level(&mut self, level_id: Uuid) -> CalcResult<Level> {
        let index = self.level_index(level_id)?;
        let level = self.levels.remove(index);
        for section in self.sections.iter_mut().filter(|s| s.level_id == Some(level_id)) {
            section.level_id = None;
        }
        self.seismic.instances.retain(|i| i.level_id != level_id);
        self.geometry_changed();
        Ok(level)
    }

    pub fn update_level(&mut self, level_id: Uuid, patch: LevelPatch) -> CalcResult<()> {
        for (field, value) in [
            ("storey_height_m", patch.storey_height_m),
            ("plan_dim_ns_m", patch.plan_dim_ns_m),
            ("plan_dim_ew_m", patch.plan_dim_ew_m),
        ] {
            if let Some(v) = value {
                ensure_at_least(field, v, 0.0)?;
            }
        }
        let level = self.level_mut(level_id)?;
        if let Some(name) = patch.name {
            level.name = name;
        }
        if let Some(v) = patch.storey_height_m {
            level.storey_height_m = v;
        }
        if let Some(v) = patch.plan_dim_ns_m {
            level.plan_dim_ns_m = v;
        }
        if let Some(v) = patch.plan_dim_ew_m {
            level.plan_dim_ew_m = v;
        }
        self.geometry_changed();
        Ok(())
    }

    /// Move a level within the stack; `to` is clamped.
    pub fn reorder_levels(&mut self, from: usize, to: usize) -> CalcResult<()> {
        if from >= self.levels.len() {
            return Err(CalcError::invalid_input(
                "from",
                from.to_string(),
                format!("Level index out of range (0..{})", self.levels.len()),
            ));
        }
        let level = self.levels.remove(from);
        let to = to.min(self.levels.len());
        self.levels.insert(to, level);
        self.geometry_changed();
        Ok(())
    }

    /// Place an assembly on a level with the default geometry for its
    /// category. Returns the new instance id.
    pub fn place_assembly(&mut self, level_id: Uuid, assembly_id: Uuid) -> CalcResult<Uuid> {
        let assembly = self
            .assemblies
            .get(&assembly_id)
            .ok_or_else(|| CalcError::not_found("Assembly", assembly_id))?;
        let (name, category, is_partition, weight) = (
            assembly.name.clone(),
            assembly.category,
            assembly.is_partition,
            assembly.total_weight_kpa,
        );
        self.push_part(level_id, |storey_h| {
            LevelPart::placed(name, Some(assembly_id), category, is_partition, weight, storey_h)
        })
    }

    /// Place one of the predefined NZS 3604 weights on a level.
    pub fn place_predefined_part(&mut self, level_id: Uuid, name: &str) -> CalcResult<Uuid> {
        let predefined = find_predefined_part(name).ok_or_else(|| CalcError::not_found("Predefined part", name))?;
        self.push_part(level_id, |storey_h| {
            LevelPart::placed(
                predefined.name,
                None,
                predefined.category,
                predefined.is_partition,
                predefined.base_weight_kpa,
                storey_h,
            )
        })
    }

    fn push_part(&mut self, level_id: Uuid, make: impl FnOnce(f64) -> LevelPart) -> CalcResult<Uuid> {
        let level = self.level_mut(level_id)?;
        let part = make(level.storey_height_m);
        let id = part.instance_id;
        level.parts.push(part);
        level.recalculate();
        self.geometry_changed();
        Ok(id)
    }

    pub fn remove_part(&mut self, level_id: Uuid, instance_id: Uuid) -> CalcResult<LevelPart> {
        let level = self.level_mut(level_id)?;
        let index = level
            .parts
            .iter()
            .position(|p| p.instance_id == instance_id)
            .ok_or_else(|| CalcError::not_found("LevelPart", instance_id))?;
        let part = level.parts.remove(index);
        level.recalculate();
        self.geometry_changed();
        Ok(part)
    }

    /// Update a placed part. The final geometry must match the category's
    /// shape: walls take wall geometry, everything else a surface.
    pub fn update_part(&mut self, level_id: Uuid, instance_id: Uuid, patch: PartPatch) -> CalcResult<()> {
        if let Some(w) = patch.base_weight_kpa {
            ensure_at_least("base_weight_kpa", w, 0.0)?;
        }
        if let Some(Some(q)) = patch.live_load_kpa {
            ensure_at_least("live_load_kpa", q, 0.0)?;
        }
        if let Some(geometry) = &patch.geometry {
            validate_geometry(geometry)?;
        }

        let level = self.level_mut(level_id)?;
        let storey_h = level.storey_height_m;
        let part = level
            .part_mut(instance_id)
            .ok_or_else(|| CalcError::not_found("LevelPart", instance_id))?;

        let category = patch.category.unwrap_or(part.category);
        if let Some(geometry) = &patch.geometry {
            let is_wall_shape = matches!(geometry, PartGeometry::Wall { .. });
            if is_wall_shape != (category == AssemblyCategory::Wall) {
                return Err(CalcError::invalid_input(
                    "geometry",
                    format!("{geometry:?}"),
                    format!("Geometry shape does not match category {category}"),
                ));
            }
        }

        if let Some(category) = patch.category {
            part.set_category(category, storey_h);
        }
        if let Some(name) = patch.name {
            part.name = name;
        }
        if let Some(is_partition) = patch.is_partition {
            part.is_partition = is_partition;
        }
        if let Some(w) = patch.base_weight_kpa {
            part.base_weight_kpa = w;
        }
        if let Some(geometry) = patch.geometry {
            part.geometry = geometry;
        }
        if let Some(q) = patch.live_load_kpa {
            part.live_load_kpa = q;
        }
        level.recalculate();
        self.geometry_changed();
        Ok(())
    }

    /// Refresh every level's derived totals.
    pub fn recalculate_level_weights(&mut self) {
        for level in &mut self.levels {
            level.recalculate();
        }
        tracing::debug!(
            levels = self.levels.len(),
            total_kn = self.levels.iter().map(|l| l.total_level_weight_kn).sum::<f64>(),
            "level weights recalculated"
        );
    }

    fn geometry_changed(&mut self) {
        self.resync_seismic_instances();
        self.staleness.record(Change::Geometry);
        self.recalculate_wind_factors();
        self.touch();
    }
}
