//! # Analysis Stages
//!
//! Pure functions from a snapshot of the project to derived results:
//!
//! 1. [`seismic_weight`] - placed parts to per-level seismic weights
//! 2. [`seismic_action`] - weights to lateral forces and storey shears
//! 3. [`wind_pressure`] - zone and detailed wind pressures
//! 4. [`wind_action`] - pressures to storey wind shears per direction
//!
//! Stages never fail. Unknown lookups and degenerate geometry resolve to zero
//! or a documented fallback.

pub mod seismic_action;
pub mod seismic_weight;
pub mod wind_action;
pub mod wind_pressure;

pub use seismic_action::{SeismicAction, SeismicActionResult, SeismicDesignInput, SeismicFactors};
pub use seismic_weight::{SeismicLevelResult, SeismicPartInstance};
pub use wind_action::{WindAction, WindActionResult};
pub use wind_pressure::{PressureSource, WindFactors, WindInput};
