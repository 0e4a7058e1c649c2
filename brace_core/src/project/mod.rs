//! # Project Document
//!
//! The `Project` struct is the root container for a bracing design. It owns
//! the inputs (assemblies, levels, design parameters, bracing sections) and
//! the stored outputs of every derived stage, together with the staleness
//! tracker that says which outputs no longer match the inputs.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, job info, timestamps)
//! ├── settings: GlobalSettings (code edition, bracing defaults)
//! ├── assemblies: HashMap<Uuid, Assembly>
//! ├── levels: Vec<Level> (index 0 = ground)
//! ├── seismic: SeismicState (instances, weights, design input, actions)
//! ├── wind: WindState (input, factors, actions)
//! ├── sections: Vec<BracingSection>
//! └── staleness: StalenessTracker
//! ```
//!
//! Every mutator lives on `Project` and takes `&mut self`. Stages read
//! shared borrows of the inputs and return new outputs which the project
//! stores. Mutators return [`CalcResult`](crate::errors::CalcResult) only
//! for unknown ids and invalid field values.
//!
//! ## Example
//!
//! ```rust
//! use brace_core::project::Project;
//!
//! let mut project = Project::new("Smith Residence");
//! let ground = project.levels[0].id;
//! project.place_predefined_part(ground, "Floor - NZS3604").unwrap();
//! project.place_predefined_part(ground, "Light Roof - NZS3604").unwrap();
//!
//! project.sync_seismic_instances();
//! project.recalculate_seismic_weights();
//! project.recalculate_seismic_actions();
//!
//! assert!(project.seismic.result.base_shear_kn > 0.0);
//! assert!(!project.staleness.flags().seismic_actions_stale);
//! ```

mod analysis;
mod assemblies;
mod levels;
mod sections;
mod summary;

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::{
    SeismicActionResult, SeismicDesignInput, SeismicLevelResult, SeismicPartInstance, WindActionResult, WindFactors,
    WindInput,
};
use crate::assembly::Assembly;
use crate::bracing::BracingSection;
use crate::errors::{CalcError, CalcResult};
use crate::level::Level;
use crate::staleness::{Change, StalenessTracker};
use crate::tables::bracing::FloorType;

pub use analysis::InstancePatch;
pub use assemblies::AssemblyPatch;
pub use levels::{LevelPatch, PartPatch};
pub use summary::{LevelWeightRow, ProjectSummary};

/// Current schema version for project files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container, serialized to JSON project files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub meta: ProjectMetadata,

    pub settings: GlobalSettings,

    /// Assembly library of this project, keyed by UUID
    pub assemblies: HashMap<Uuid, Assembly>,

    /// Storeys from the ground up
    pub levels: Vec<Level>,

    #[serde(default)]
    pub seismic: SeismicState,

    #[serde(default)]
    pub wind: WindState,

    #[serde(default)]
    pub sections: Vec<BracingSection>,

    #[serde(default)]
    pub staleness: StalenessTracker,
}

impl Project {
    /// A project with one default level and default design inputs.
    ///
    /// # Example
    ///
    /// ```rust
    /// use brace_core::project::Project;
    ///
    /// let project = Project::new("Smith Residence");
    /// assert_eq!(project.meta.project_name, "Smith Residence");
    /// assert_eq!(project.levels.len(), 1);
    /// assert!(project.staleness.flags().weights_stale);
    /// ```
    pub fn new(project_name: impl Into<String>) -> Self {
        let now = Utc::now();
        let mut project = Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                project_name: project_name.into(),
                address: String::new(),
                job_number: String::new(),
                client: String::new(),
                designer: String::new(),
                note: String::new(),
                created: now,
                modified: now,
            },
            settings: GlobalSettings::default(),
            assemblies: HashMap::new(),
            levels: vec![Level::default()],
            seismic: SeismicState::default(),
            wind: WindState::default(),
            sections: Vec::new(),
            staleness: StalenessTracker::default(),
        };
        project.staleness.record(Change::Geometry);
        project.recalculate_wind_factors();
        project
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn level(&self, level_id: Uuid) -> Option<&Level> {
        self.levels.iter().find(|l| l.id == level_id)
    }

    pub(crate) fn level_index(&self, level_id: Uuid) -> CalcResult<usize> {
        self.levels
            .iter()
            .position(|l| l.id == level_id)
            .ok_or_else(|| CalcError::not_found("Level", level_id))
    }

    pub(crate) fn level_mut(&mut self, level_id: Uuid) -> CalcResult<&mut Level> {
        self.levels
            .iter_mut()
            .find(|l| l.id == level_id)
            .ok_or_else(|| CalcError::not_found("Level", level_id))
    }

    pub fn assembly(&self, assembly_id: Uuid) -> Option<&Assembly> {
        self.assemblies.get(&assembly_id)
    }

    /// Assemblies sorted by name, for stable listings
    pub fn assemblies_by_name(&self) -> Vec<&Assembly> {
        let mut list: Vec<&Assembly> = self.assemblies.values().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        list
    }

    pub fn section(&self, section_id: Uuid) -> Option<&BracingSection> {
        self.sections.iter().find(|s| s.id == section_id)
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    pub project_name: String,

    /// Site address
    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub job_number: String,

    #[serde(default)]
    pub client: String,

    /// Name of the responsible designer
    #[serde(default)]
    pub designer: String,

    #[serde(default)]
    pub note: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

/// Global project settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Code edition the design follows
    pub code: String,

    /// Floor type given to generated bracing sections
    #[serde(default)]
    pub default_floor_type: FloorType,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        GlobalSettings {
            code: "NZS3604:2011".to_string(),
            default_floor_type: FloorType::Timber,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Seismic inputs and stored outputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeismicState {
    /// Copies of the placed parts with their deduction factors
    #[serde(default)]
    pub instances: Vec<SeismicPartInstance>,

    /// Scale live loads by the area reduction factor
    #[serde(default = "default_true")]
    pub apply_area_factor: bool,

    #[serde(default)]
    pub level_results: BTreeMap<Uuid, SeismicLevelResult>,

    #[serde(default)]
    pub design_input: SeismicDesignInput,

    #[serde(default)]
    pub result: SeismicActionResult,
}

impl Default for SeismicState {
    fn default() -> Self {
        SeismicState {
            instances: Vec::new(),
            apply_area_factor: true,
            level_results: BTreeMap::new(),
            design_input: SeismicDesignInput::default(),
            result: SeismicActionResult::default(),
        }
    }
}

/// Wind inputs and stored outputs
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WindState {
    #[serde(default)]
    pub input: WindInput,

    #[serde(default)]
    pub factors: WindFactors,

    #[serde(default)]
    pub actions: WindActionResult,
}
