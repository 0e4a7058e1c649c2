//! # Staleness Tracker
//!
//! Derived results form a small dependency graph:
//!
//! ```text
//! SeismicWeights ──► SeismicActions ──┐
//!                                     ├──► BracingDemand
//! WindPressures  ──► WindActions ─────┘
//! ```
//!
//! An edit marks its root stages and every descendant dirty. Recomputing a
//! stage clears it and marks its descendants dirty, since they were derived
//! from the old values. Stale results stay visible; the flags only tell the
//! caller what to refresh.
//!
//! ## Example
//!
//! ```rust
//! use brace_core::staleness::{Change, Stage, StalenessTracker};
//!
//! let mut tracker = StalenessTracker::default();
//! tracker.record(Change::SeismicDesign);
//! assert!(tracker.is_stale(Stage::SeismicActions));
//! assert!(tracker.is_stale(Stage::BracingDemand));
//! assert!(!tracker.is_stale(Stage::SeismicWeights));
//!
//! tracker.mark_recomputed(Stage::SeismicActions);
//! assert!(!tracker.is_stale(Stage::SeismicActions));
//! assert!(tracker.is_stale(Stage::BracingDemand));
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A derived stage of the calculation pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    SeismicWeights,
    SeismicActions,
    WindPressures,
    WindActions,
    BracingDemand,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::SeismicWeights,
        Stage::SeismicActions,
        Stage::WindPressures,
        Stage::WindActions,
        Stage::BracingDemand,
    ];

    /// Stages derived directly from this one
    pub fn dependents(&self) -> &'static [Stage] {
        match self {
            Stage::SeismicWeights => &[Stage::SeismicActions],
            Stage::SeismicActions => &[Stage::BracingDemand],
            Stage::WindPressures => &[Stage::WindActions],
            Stage::WindActions => &[Stage::BracingDemand],
            Stage::BracingDemand => &[],
        }
    }
}

/// Kind of edit made to the project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Change {
    /// Levels, storey heights, plan dimensions or part geometry
    Geometry,
    /// Assembly layers or weights
    Material,
    /// Seismic deduction factors on the synced instances
    SeismicInstances,
    /// Live load area factor toggle
    AreaFactor,
    /// Seismic design parameters
    SeismicDesign,
    /// Wind design parameters
    WindInput,
}

impl Change {
    /// Stages invalidated first by this change
    pub fn roots(&self) -> &'static [Stage] {
        match self {
            Change::Geometry => &[Stage::SeismicWeights, Stage::WindPressures],
            Change::Material | Change::SeismicInstances | Change::AreaFactor => &[Stage::SeismicWeights],
            Change::SeismicDesign => &[Stage::SeismicActions],
            Change::WindInput => &[Stage::WindPressures],
        }
    }
}

/// Flags surfaced to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StalenessFlags {
    pub weights_stale: bool,
    pub seismic_actions_stale: bool,
    pub wind_actions_stale: bool,
    pub bracing_demand_stale: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StalenessTracker {
    dirty: BTreeSet<Stage>,
}

impl StalenessTracker {
    pub fn record(&mut self, change: Change) {
        for &stage in change.roots() {
            self.mark_dirty(stage);
        }
    }

    /// Mark a stage and everything downstream of it dirty.
    pub fn mark_dirty(&mut self, stage: Stage) {
        let mut pending = vec![stage];
        while let Some(next) = pending.pop() {
            if self.dirty.insert(next) {
                pending.extend_from_slice(next.dependents());
            }
        }
    }

    pub fn mark_recomputed(&mut self, stage: Stage) {
        self.dirty.remove(&stage);
        for &dependent in stage.dependents() {
            self.mark_dirty(dependent);
        }
    }

    pub fn is_stale(&self, stage: Stage) -> bool {
        self.dirty.contains(&stage)
    }

    pub fn stale_stages(&self) -> impl Iterator<Item = Stage> + '_ {
        self.dirty.iter().copied()
    }

    pub fn flags(&self) -> StalenessFlags {
        StalenessFlags {
            weights_stale: self.is_stale(Stage::SeismicWeights),
            seismic_actions_stale: self.is_stale(Stage::SeismicActions),
            wind_actions_stale: self.is_stale(Stage::WindActions),
            bracing_demand_stale: self.is_stale(Stage::BracingDemand),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_dirties_both_chains() {
        let mut t = StalenessTracker::default();
        t.record(Change::Geometry);
        assert_eq!(t.stale_stages().count(), Stage::ALL.len());
    }

    #[test]
    fn test_wind_input_leaves_seismic_clean() {
        let mut t = StalenessTracker::default();
        t.record(Change::WindInput);
        let flags = t.flags();
        assert!(!flags.weights_stale);
        assert!(!flags.seismic_actions_stale);
        assert!(flags.wind_actions_stale);
        assert!(flags.bracing_demand_stale);
    }

    #[test]
    fn test_recompute_propagates_downstream() {
        let mut t = StalenessTracker::default();
        t.mark_recomputed(Stage::SeismicWeights);
        assert!(t.is_stale(Stage::SeismicActions));
        assert!(t.is_stale(Stage::BracingDemand));
        assert!(!t.is_stale(Stage::WindActions));
    }

    #[test]
    fn test_full_refresh_clears_everything() {
        let mut t = StalenessTracker::default();
        t.record(Change::Geometry);
        for stage in Stage::ALL {
            t.mark_recomputed(stage);
        }
        assert_eq!(t.flags(), StalenessFlags::default());
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut t = StalenessTracker::default();
        t.record(Change::Material);
        let json = serde_json::to_string(&t).unwrap();
        let back: StalenessTracker = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }
}
