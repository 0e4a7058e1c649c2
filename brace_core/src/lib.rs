//! # brace_core - Bracing Pre-Design Engine
//!
//! `brace_core` takes a timber-framed building from material layers to a
//! bracing pass/fail check under NZS 3604:2011 and NZS 1170. All inputs and
//! outputs are JSON-serializable, so a UI or report generator only ever
//! exchanges plain data with the engine.
//!
//! ## Pipeline
//!
//! 1. Material layers sum to assembly weights ([`assembly`], [`library`])
//! 2. Placed parts sum to level weights ([`level`])
//! 3. Seismic weights with live-load and partition deductions
//!    ([`analysis::seismic_weight`])
//! 4. Equivalent static earthquake forces ([`analysis::seismic_action`])
//! 5. Wind pressures and storey wind shears ([`analysis::wind_pressure`],
//!    [`analysis::wind_action`])
//! 6. Bracing demand against achieved capacity ([`bracing`])
//!
//! [`project::Project`] owns the state and [`staleness`] tracks which stage
//! outputs are out of date after an edit.
//!
//! ## Quick Start
//!
//! ```rust
//! use brace_core::project::Project;
//!
//! let mut project = Project::new("Smith Residence");
//! let ground = project.levels[0].id;
//! project.place_predefined_part(ground, "Floor - NZS3604")?;
//! project.place_predefined_part(ground, "Light Roof - NZS3604")?;
//!
//! project.sync_seismic_instances();
//! project.recalculate_stale();
//! project.generate_default_bracing_sections();
//!
//! let json = serde_json::to_string_pretty(&project.summary()).unwrap();
//! assert!(json.contains("Smith Residence"));
//! # Ok::<(), brace_core::CalcError>(())
//! ```
//!
//! ## Modules
//!
//! - [`project`] - Project container, mutators and stage orchestration
//! - [`analysis`] - Seismic and wind calculation stages
//! - [`bracing`] - Sections, lines, members and the bracing ledger
//! - [`tables`] - Reference tables from the loading standards
//! - [`equations`] - Code formulas with their clause references
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - Atomic project saves and versioned loads

pub mod analysis;
pub mod assembly;
pub mod bracing;
pub mod equations;
pub mod errors;
pub mod file_io;
pub mod level;
pub mod library;
pub mod project;
pub mod staleness;
pub mod tables;
pub mod units;

pub use errors::{CalcError, CalcResult};
pub use file_io::{load_project, save_project};
pub use level::Direction;
pub use project::{GlobalSettings, Project, ProjectMetadata, ProjectSummary};
pub use staleness::{Stage, StalenessFlags};
