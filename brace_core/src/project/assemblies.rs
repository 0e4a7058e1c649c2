//! Assembly and layer mutators.
//!
//! Any change to an assembly's weight is pushed to the parts placed from it
//! and re-aggregates the owning levels.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Project;
use crate::assembly::{Assembly, AssemblyCategory};
use crate::errors::{ensure_at_least, ensure_in_range, CalcError, CalcResult};
use crate::library::LayerParams;
use crate::staleness::Change;

/// Partial update of an assembly's own fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssemblyPatch {
    pub name: Option<String>,
    pub category: Option<AssemblyCategory>,
    pub is_partition: Option<bool>,
    /// `Some(None)` clears the slope
    pub slope_deg: Option<Option<f64>>,
}

fn validate_params(params: &LayerParams) -> CalcResult<()> {
    for (field, value) in params.fields() {
        ensure_at_least(field, value, 0.0)?;
    }
    Ok(())
}

impl Project {
    /// Add a blank assembly (a roof at the default pitch).
    pub fn add_assembly(&mut self, name: impl Into<String>) -> Uuid {
        let assembly = Assembly::new(name);
        let id = assembly.id;
        self.assemblies.insert(id, assembly);
        self.touch();
        id
    }

    /// Add an assembly built from a predefined template.
    pub fn add_assembly_from_template(&mut self, template_id: &str) -> CalcResult<Uuid> {
        let assembly = Assembly::from_template(template_id)?;
        let id = assembly.id;
        self.assemblies.insert(id, assembly);
        self.touch();
        Ok(id)
    }

    /// Remove an assembly. Parts placed from it keep their weight and lose
    /// the link.
    pub fn remove_assembly(&mut self, assembly_id: Uuid) -> CalcResult<Assembly> {
        let assembly = self
            .assemblies
            .remove(&assembly_id)
            .ok_or_else(|| CalcError::not_found("Assembly", assembly_id))?;
        for part in self.levels.iter_mut().flat_map(|l| l.parts.iter_mut()) {
            if part.assembly_id == Some(assembly_id) {
                part.assembly_id = None;
            }
        }
        self.touch();
        Ok(assembly)
    }

    pub fn update_assembly(&mut self, assembly_id: Uuid, patch: AssemblyPatch) -> CalcResult<()> {
        if let Some(Some(slope)) = patch.slope_deg {
            ensure_in_range("slope_deg", slope, 0.0, 90.0)?;
        }
        self.edit_assembly(assembly_id, |assembly| {
            if let Some(name) = patch.name {
                assembly.name = name;
            }
            if let Some(is_partition) = patch.is_partition {
                assembly.is_partition = is_partition;
            }
            if let Some(category) = patch.category {
                assembly.set_category(category);
            }
            if let Some(slope) = patch.slope_deg {
                assembly.set_slope(slope);
            }
            Ok(())
        })
    }

    /// Append a component layer, with the component defaults when `params`
    /// is `None`.
    pub fn add_component_layer(
        &mut self,
        assembly_id: Uuid,
        component_id: &str,
        params: Option<LayerParams>,
    ) -> CalcResult<Uuid> {
        if let Some(params) = &params {
            validate_params(params)?;
        }
        self.edit_assembly(assembly_id, |assembly| match params {
            Some(params) => assembly.add_component_layer_with(component_id, params),
            None => assembly.add_component_layer(component_id),
        })
    }

    pub fn add_custom_layer(&mut self, assembly_id: Uuid, weight_kpa: f64) -> CalcResult<Uuid> {
        ensure_at_least("weight_kpa", weight_kpa, 0.0)?;
        self.edit_assembly(assembly_id, |assembly| assembly.add_custom_layer(weight_kpa))
    }

    pub fn remove_layer(&mut self, assembly_id: Uuid, layer_id: Uuid) -> CalcResult<()> {
        self.edit_assembly(assembly_id, |assembly| assembly.remove_layer(layer_id).map(drop))
    }

    pub fn update_layer_params(&mut self, assembly_id: Uuid, layer_id: Uuid, params: LayerParams) -> CalcResult<()> {
        validate_params(&params)?;
        self.edit_assembly(assembly_id, |assembly| assembly.update_layer_params(layer_id, params))
    }

    pub fn update_custom_layer_weight(&mut self, assembly_id: Uuid, layer_id: Uuid, weight_kpa: f64) -> CalcResult<()> {
        ensure_at_least("weight_kpa", weight_kpa, 0.0)?;
        self.edit_assembly(assembly_id, |assembly| assembly.update_custom_weight(layer_id, weight_kpa))
    }

    pub fn rename_layer(&mut self, assembly_id: Uuid, layer_id: Uuid, name: impl Into<String>) -> CalcResult<()> {
        let assembly = self
            .assemblies
            .get_mut(&assembly_id)
            .ok_or_else(|| CalcError::not_found("Assembly", assembly_id))?;
        assembly.rename_layer(layer_id, name)?;
        self.touch();
        Ok(())
    }

    pub fn reorder_layers(&mut self, assembly_id: Uuid, from: usize, to: usize) -> CalcResult<()> {
        let assembly = self
            .assemblies
            .get_mut(&assembly_id)
            .ok_or_else(|| CalcError::not_found("Assembly", assembly_id))?;
        assembly.reorder_layers(from, to)?;
        self.touch();
        Ok(())
    }

    /// Run a weight-affecting edit, then push the new weight to every part
    /// placed from the assembly.
    fn edit_assembly<T>(
        &mut self,
        assembly_id: Uuid,
        edit: impl FnOnce(&mut Assembly) -> CalcResult<T>,
    ) -> CalcResult<T> {
        let assembly = self
            .assemblies
            .get_mut(&assembly_id)
            .ok_or_else(|| CalcError::not_found("Assembly", assembly_id))?;
        let out = edit(assembly)?;
        let weight = assembly.total_weight_kpa;
        if self.propagate_assembly_weight(assembly_id, weight) {
            self.resync_seismic_instances();
        }
        self.staleness.record(Change::Material);
        self.touch();
        Ok(out)
    }

    /// Returns whether any placed part was refreshed.
    fn propagate_assembly_weight(&mut self, assembly_id: Uuid, weight_kpa: f64) -> bool {
        let mut any_changed = false;
        for level in &mut self.levels {
            let mut changed = false;
            for part in level.parts.iter_mut().filter(|p| p.assembly_id == Some(assembly_id)) {
                part.base_weight_kpa = weight_kpa;
                changed = true;
            }
            if changed {
                level.recalculate();
                tracing::debug!(level = %level.name, weight_kpa, "placed parts refreshed from assembly");
                any_changed = true;
            }
        }
        any_changed
    }
}
