//! Stage orchestration: each `recalculate_*` runs one pure stage over the
//! current inputs, stores the output and updates the staleness tracker.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Project;
use crate::analysis::{seismic_action, seismic_weight, wind_action, wind_pressure, SeismicDesignInput, WindInput};
use crate::errors::{ensure_in_range, CalcError, CalcResult};
use crate::staleness::{Change, Stage};

/// Partial update of a seismic part instance's deduction factors
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InstancePatch {
    pub height_factor: Option<f64>,
    pub phi_e: Option<f64>,
}

impl Project {
    /// Replace the seismic instances with fresh copies of every placed part.
    /// Edited deduction factors are discarded.
    pub fn sync_seismic_instances(&mut self) {
        self.resync_seismic_instances();
        self.staleness.record(Change::SeismicInstances);
        self.touch();
    }

    /// Regenerate the instance mirror after a geometry or material edit.
    pub(crate) fn resync_seismic_instances(&mut self) {
        self.seismic.instances = seismic_weight::sync_instances(&self.levels);
        tracing::debug!(instances = self.seismic.instances.len(), "seismic instances synced");
    }

    pub fn update_seismic_instance(&mut self, instance_id: Uuid, patch: InstancePatch) -> CalcResult<()> {
        if let Some(v) = patch.height_factor {
            ensure_in_range("height_factor", v, 0.0, 1.0)?;
        }
        if let Some(v) = patch.phi_e {
            ensure_in_range("phi_e", v, 0.0, 1.0)?;
        }
        let instance = self
            .seismic
            .instances
            .iter_mut()
            .find(|i| i.instance_id == instance_id)
            .ok_or_else(|| CalcError::not_found("SeismicPartInstance", instance_id))?;
        if let Some(v) = patch.height_factor {
            instance.height_factor = v;
        }
        if let Some(v) = patch.phi_e {
            instance.phi_e = v;
        }
        self.staleness.record(Change::SeismicInstances);
        self.touch();
        Ok(())
    }

    pub fn set_apply_area_factor(&mut self, apply: bool) {
        if self.seismic.apply_area_factor != apply {
            self.seismic.apply_area_factor = apply;
            self.staleness.record(Change::AreaFactor);
            self.touch();
        }
    }

    pub fn recalculate_seismic_weights(&mut self) {
        self.seismic.level_results =
            seismic_weight::distribute_weights(&self.levels, &self.seismic.instances, self.seismic.apply_area_factor);
        self.staleness.mark_recomputed(Stage::SeismicWeights);
    }

    pub fn update_seismic_design_input(&mut self, input: SeismicDesignInput) -> CalcResult<()> {
        input.validate()?;
        self.seismic.design_input = input;
        self.staleness.record(Change::SeismicDesign);
        self.touch();
        Ok(())
    }

    pub fn recalculate_seismic_actions(&mut self) {
        self.seismic.result =
            seismic_action::calculate(&self.seismic.design_input, &self.levels, &self.seismic.level_results);
        self.staleness.mark_recomputed(Stage::SeismicActions);
    }

    /// Replace the wind input and re-derive the pressures.
    pub fn update_wind_input(&mut self, input: WindInput) -> CalcResult<()> {
        input.validate()?;
        self.wind.input = input;
        self.staleness.record(Change::WindInput);
        self.recalculate_wind_factors();
        self.touch();
        Ok(())
    }

    pub fn recalculate_wind_factors(&mut self) {
        self.wind.factors = wind_pressure::calculate_factors(&self.levels, &self.wind.input);
        self.staleness.mark_recomputed(Stage::WindPressures);
    }

    pub fn recalculate_wind_actions(&mut self) {
        self.wind.actions = wind_action::calculate(&self.levels, &self.wind.input, &self.wind.factors);
        self.staleness.mark_recomputed(Stage::WindActions);
    }

    /// Run every stale stage in dependency order. Bracing demands are user
    /// data and are left to [`Project::reset_all_section_demands`].
    pub fn recalculate_stale(&mut self) {
        self.recalculate_level_weights();
        if self.staleness.is_stale(Stage::SeismicWeights) {
            self.recalculate_seismic_weights();
        }
        if self.staleness.is_stale(Stage::SeismicActions) {
            self.recalculate_seismic_actions();
        }
        if self.staleness.is_stale(Stage::WindPressures) {
            self.recalculate_wind_factors();
        }
        if self.staleness.is_stale(Stage::WindActions) {
            self.recalculate_wind_actions();
        }
    }
}
