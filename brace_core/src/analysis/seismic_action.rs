//! # Seismic Action Distributor
//!
//! Equivalent static method (NZS 1170.5 §6.2):
//!
//! 1. Site spectrum: `Ch(T1)`, return period, `Ru`, `Z`, `C(T1)` and `Cs(T1)`
//! 2. Design coefficient: `Mζ`, `Sp`, `kμ` and `Cd(T1)`
//! 3. Distribution: `V = Cd(T1)·W`, `Fi = 0.92·V·Wi·hi/ΣWj·hj` plus
//!    `Ft = 0.08·V` at the top level, shears accumulated from the top down
//!
//! Heights from ground are accumulated bottom-up before the forces are
//! distributed. The action table is returned bottom level first.
//!
//! ## Example
//!
//! ```rust
//! use brace_core::analysis::seismic_action::{calculate_factors, SeismicDesignInput};
//!
//! let factors = calculate_factors(&SeismicDesignInput::default());
//! assert_eq!(factors.return_period, 500);
//! assert!((factors.sp - 0.7).abs() < 1e-12);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::equations::seismic::{
    capped_z_ru, damping_factor, design_coefficient, distributed_force, ductility_factor, performance_factor,
    TOP_FORCE_FRACTION,
};
use crate::errors::{ensure_at_least, ensure_in_range, CalcResult};
use crate::level::{bottom_up, top_down, Level};
use crate::tables::seismic::{cht, hazard_factor, return_period, ru, DesignLife, ImportanceLevel, SubsoilClass};

use super::seismic_weight::SeismicLevelResult;

/// Site and structure parameters for the seismic design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeismicDesignInput {
    pub subsoil_class: SubsoilClass,
    /// Fundamental period T1 (s)
    pub t1_s: f64,
    pub importance_level: ImportanceLevel,
    pub design_life: DesignLife,
    pub town: String,
    /// Use `custom_z` instead of the town's hazard factor
    pub use_custom_z: bool,
    pub custom_z: f64,
    /// SLS return period factor
    pub rs: f64,
    pub near_fault_factor: f64,
    /// Structural ductility factor μ
    pub mu: f64,
    /// Damping ratio ζ
    pub zeta: f64,
}

impl Default for SeismicDesignInput {
    fn default() -> Self {
        SeismicDesignInput {
            subsoil_class: SubsoilClass::D,
            t1_s: 0.4,
            importance_level: ImportanceLevel::IL2,
            design_life: DesignLife::FiftyYears,
            town: "Auckland".to_string(),
            use_custom_z: false,
            custom_z: 0.4,
            rs: 0.25,
            near_fault_factor: 1.0,
            mu: 2.0,
            zeta: 0.05,
        }
    }
}

impl SeismicDesignInput {
    /// Reject values the formulas cannot use.
    pub fn validate(&self) -> CalcResult<()> {
        ensure_at_least("t1_s", self.t1_s, 0.0)?;
        ensure_at_least("custom_z", self.custom_z, 0.0)?;
        ensure_at_least("rs", self.rs, 0.0)?;
        ensure_at_least("near_fault_factor", self.near_fault_factor, 0.0)?;
        ensure_at_least("mu", self.mu, 0.0)?;
        ensure_in_range("zeta", self.zeta, 0.0, 1.0)?;
        Ok(())
    }
}

/// Intermediate factors, exposed for display
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SeismicFactors {
    pub cht: f64,
    pub return_period: u32,
    pub z: f64,
    pub ru: f64,
    pub z_ru: f64,
    /// ULS spectrum C(T1)
    pub ct: f64,
    /// SLS spectrum Cs(T1)
    pub cts: f64,
    pub m_zeta: f64,
    pub sp: f64,
    pub k_mu: f64,
    pub cd_t1: f64,
    pub cd_t1_sls: f64,
}

/// Force and shear at one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeismicAction {
    pub level_id: Uuid,
    pub level_name: String,
    pub effective_dl_kn: f64,
    pub effective_ll_kn: f64,
    pub storey_height_m: f64,
    /// hi, top of this storey above ground (m)
    pub height_from_ground_m: f64,
    /// Fi (kN)
    pub force_kn: f64,
    /// Vi, storey shear (kN)
    pub shear_kn: f64,
}

/// Output of the seismic action stage
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeismicActionResult {
    pub factors: SeismicFactors,
    /// W, total seismic weight (kN)
    pub total_weight_kn: f64,
    /// V (kN)
    pub base_shear_kn: f64,
    /// Ft (kN)
    pub top_force_kn: f64,
    /// Bottom level first
    pub actions: Vec<SeismicAction>,
}

impl SeismicActionResult {
    pub fn action_for(&self, level_id: Uuid) -> Option<&SeismicAction> {
        self.actions.iter().find(|a| a.level_id == level_id)
    }
}

/// Hazard factor for the input: the custom value, the town's tabulated
/// value, or zero for an unknown town.
pub fn resolve_hazard_factor(input: &SeismicDesignInput) -> f64 {
    if input.use_custom_z {
        return input.custom_z;
    }
    hazard_factor(&input.town).unwrap_or_else(|| {
        tracing::warn!(town = %input.town, "unknown town, hazard factor set to zero");
        0.0
    })
}

/// Steps 1 and 2: spectrum and design coefficient.
pub fn calculate_factors(input: &SeismicDesignInput) -> SeismicFactors {
    let cht = cht(input.t1_s, input.subsoil_class);
    let period = return_period(input.design_life, input.importance_level);
    let z = resolve_hazard_factor(input);
    let ru = ru(period).unwrap_or_else(|| {
        tracing::warn!(return_period = period, "no Ru tabulated for return period, using zero");
        0.0
    });

    let z_ru = capped_z_ru(z, ru);
    let ct = cht * z_ru * input.near_fault_factor;
    let cts = cht * z * input.rs * input.near_fault_factor;

    let m_zeta = damping_factor(input.zeta);
    let sp = performance_factor(input.mu);
    let k_mu = ductility_factor(input.mu, input.t1_s, input.subsoil_class);
    let cd_t1 = design_coefficient(m_zeta, ct, sp, k_mu);

    SeismicFactors {
        cht,
        return_period: period,
        z,
        ru,
        z_ru,
        ct,
        cts,
        m_zeta,
        sp,
        k_mu,
        cd_t1,
        cd_t1_sls: cts,
    }
}

struct LevelWeight<'a> {
    level: &'a Level,
    result: SeismicLevelResult,
    height_from_ground_m: f64,
}

impl LevelWeight<'_> {
    fn weight(&self) -> f64 {
        self.result.seismic_weight_kn()
    }
}

/// Heights from ground, accumulated from the bottom level up. Levels without
/// a weight result weigh nothing.
fn level_weights<'a>(levels: &'a [Level], weights: &BTreeMap<Uuid, SeismicLevelResult>) -> Vec<LevelWeight<'a>> {
    let mut height = 0.0;
    bottom_up(levels)
        .map(|level| {
            height += level.storey_height_m;
            LevelWeight {
                level,
                result: weights.get(&level.id).copied().unwrap_or(SeismicLevelResult {
                    level_id: level.id,
                    ..Default::default()
                }),
                height_from_ground_m: height,
            }
        })
        .collect()
}

/// Step 3: distribute `V = Cd·W` over the levels.
pub fn calculate(
    input: &SeismicDesignInput,
    levels: &[Level],
    weights: &BTreeMap<Uuid, SeismicLevelResult>,
) -> SeismicActionResult {
    let factors = calculate_factors(input);
    let stack = level_weights(levels, weights);

    let total_weight_kn = stack.iter().fold(0.0, |total, l| total + l.weight());
    let base_shear_kn = factors.cd_t1 * total_weight_kn;
    let top_force_kn = TOP_FORCE_FRACTION * base_shear_kn;
    let sum_wi_hi = stack.iter().fold(0.0, |total, l| total + l.weight() * l.height_from_ground_m);

    let mut shear = 0.0;
    let mut actions: Vec<SeismicAction> = top_down(&stack)
        .enumerate()
        .map(|(index, l)| {
            let mut force = distributed_force(base_shear_kn, l.weight() * l.height_from_ground_m, sum_wi_hi);
            if index == 0 && sum_wi_hi > 0.0 {
                force += top_force_kn;
            }
            shear += force;
            SeismicAction {
                level_id: l.level.id,
                level_name: l.level.name.clone(),
                effective_dl_kn: l.result.effective_dl_kn,
                effective_ll_kn: l.result.effective_ll_kn,
                storey_height_m: l.level.storey_height_m,
                height_from_ground_m: l.height_from_ground_m,
                force_kn: force,
                shear_kn: shear,
            }
        })
        .collect();
    actions.reverse();

    tracing::info!(
        cd_t1 = factors.cd_t1,
        total_weight_kn,
        base_shear_kn,
        "seismic actions calculated"
    );

    SeismicActionResult {
        factors,
        total_weight_kn,
        base_shear_kn,
        top_force_kn,
        actions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn stack(heights: &[f64], dl_kn: f64) -> (Vec<Level>, BTreeMap<Uuid, SeismicLevelResult>) {
        let levels: Vec<Level> = heights
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let mut level = Level::new(format!("L{}", i + 1));
                level.storey_height_m = *h;
                level
            })
            .collect();
        let weights = levels
            .iter()
            .map(|l| {
                (
                    l.id,
                    SeismicLevelResult {
                        level_id: l.id,
                        effective_dl_kn: dl_kn,
                        ..Default::default()
                    },
                )
            })
            .collect();
        (levels, weights)
    }

    #[test]
    fn test_default_factors() {
        let f = calculate_factors(&SeismicDesignInput::default());
        assert_eq!(f.cht, 3.0);
        assert_eq!(f.z, 0.13);
        assert_eq!(f.ru, 1.0);
        assert_relative_eq!(f.ct, 0.39, epsilon = 1e-12);
        assert_relative_eq!(f.cts, 3.0 * 0.13 * 0.25, epsilon = 1e-12);
        assert_relative_eq!(f.m_zeta, 1.0, epsilon = 1e-12);
        assert_relative_eq!(f.k_mu, 1.0 + 0.4 / 0.7, epsilon = 1e-12);
        assert_relative_eq!(f.cd_t1, 0.39 * 0.7 / (1.0 + 0.4 / 0.7), epsilon = 1e-12);
        assert_eq!(f.cd_t1_sls, f.cts);
    }

    #[test]
    fn test_custom_z_is_capped_with_ru() {
        let input = SeismicDesignInput {
            use_custom_z: true,
            custom_z: 0.6,
            importance_level: ImportanceLevel::IL4,
            ..Default::default()
        };
        let f = calculate_factors(&input);
        assert_eq!(f.z, 0.6);
        assert_eq!(f.z_ru, 0.7);
    }

    #[test]
    fn test_unknown_town_falls_back_to_zero() {
        let input = SeismicDesignInput {
            town: "Atlantis".to_string(),
            ..Default::default()
        };
        let f = calculate_factors(&input);
        assert_eq!(f.z, 0.0);
        assert_eq!(f.cd_t1, 0.0);
    }

    #[test]
    fn test_distribution_sums_to_base_shear() {
        let (levels, weights) = stack(&[2.4, 2.7, 2.7], 100.0);
        let result = calculate(&SeismicDesignInput::default(), &levels, &weights);

        assert_relative_eq!(result.total_weight_kn, 300.0, epsilon = 1e-9);
        let force_sum: f64 = result.actions.iter().map(|a| a.force_kn).sum();
        assert_relative_eq!(force_sum, result.base_shear_kn, epsilon = 1e-9);
        // bottom level first; base shear equals V
        assert_eq!(result.actions[0].level_id, levels[0].id);
        assert_relative_eq!(result.actions[0].shear_kn, result.base_shear_kn, epsilon = 1e-9);
        assert_relative_eq!(result.actions[2].height_from_ground_m, 7.8, epsilon = 1e-12);
    }

    #[test]
    fn test_top_force_on_top_level_only() {
        let (levels, weights) = stack(&[3.0, 3.0], 50.0);
        let result = calculate(&SeismicDesignInput::default(), &levels, &weights);
        let v = result.base_shear_kn;
        // Wi hi: 150 and 300, Σ 450
        assert_relative_eq!(result.actions[0].force_kn, 0.92 * v / 3.0, epsilon = 1e-9);
        assert_relative_eq!(result.actions[1].force_kn, 0.92 * v * 2.0 / 3.0 + 0.08 * v, epsilon = 1e-9);
    }

    #[test]
    fn test_missing_weights_give_zero_forces() {
        let (levels, _) = stack(&[2.4, 2.4], 0.0);
        let result = calculate(&SeismicDesignInput::default(), &levels, &BTreeMap::new());
        assert_eq!(result.total_weight_kn, 0.0);
        assert!(result.actions.iter().all(|a| a.force_kn == 0.0 && a.shear_kn == 0.0));
        assert_eq!(result.actions.len(), 2);
    }

    #[test]
    fn test_validate() {
        assert!(SeismicDesignInput::default().validate().is_ok());
        let bad = SeismicDesignInput {
            zeta: -0.1,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
