//! Serializable snapshot of everything a report displays.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Project;
use crate::analysis::{SeismicActionResult, SeismicLevelResult, WindActionResult, WindFactors};
use crate::bracing::SectionSummary;
use crate::level::bottom_up;
use crate::staleness::StalenessFlags;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelWeightRow {
    pub level_id: Uuid,
    pub name: String,
    pub total_area_m2: f64,
    pub total_level_weight_kn: f64,
}

/// Outbound display data, bottom level first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub project_name: String,
    pub levels: Vec<LevelWeightRow>,
    pub seismic_weights: Vec<SeismicLevelResult>,
    pub seismic: SeismicActionResult,
    pub wind_factors: WindFactors,
    pub wind_actions: WindActionResult,
    pub sections: Vec<SectionSummary>,
    pub staleness: StalenessFlags,
}

impl Project {
    /// Snapshot the stored results without recomputing anything.
    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            project_name: self.meta.project_name.clone(),
            levels: bottom_up(&self.levels)
                .map(|l| LevelWeightRow {
                    level_id: l.id,
                    name: l.name.clone(),
                    total_area_m2: l.total_area_m2,
                    total_level_weight_kn: l.total_level_weight_kn,
                })
                .collect(),
            seismic_weights: bottom_up(&self.levels)
                .filter_map(|l| self.seismic.level_results.get(&l.id).copied())
                .collect(),
            seismic: self.seismic.result.clone(),
            wind_factors: self.wind.factors,
            wind_actions: self.wind.actions.clone(),
            sections: self.section_summaries(),
            staleness: self.staleness.flags(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_reports_stale_results() {
        let mut project = Project::new("Summary");
        let ground = project.levels[0].id;
        project.place_predefined_part(ground, "Floor - NZS3604").unwrap();
        project.sync_seismic_instances();
        project.recalculate_stale();
        let fresh = project.summary();
        assert!(!fresh.staleness.weights_stale);
        assert_eq!(fresh.seismic_weights.len(), 1);

        project.place_predefined_part(ground, "Other").unwrap();
        let stale = project.summary();
        assert!(stale.staleness.weights_stale);
        // results stay visible while stale
        assert_eq!(stale.seismic, fresh.seismic);
        assert!(stale.levels[0].total_level_weight_kn > fresh.levels[0].total_level_weight_kn);

        let json = serde_json::to_string(&stale).unwrap();
        assert!(json.contains("\"weights_stale\":true"));
    }
}
