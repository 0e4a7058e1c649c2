//! Bracing section, line and member mutators.

use uuid::Uuid;

use super::Project;
use crate::bracing::{
    demand_from_shear, summarize_section, BracingLine, BracingMember, BracingSection, LinePatch, MemberPatch,
    SectionPatch, SectionSummary,
};
use crate::errors::{CalcError, CalcResult};
use crate::level::{bottom_up, Direction};
use crate::staleness::Stage;

impl Project {
    /// Calculated (wind, earthquake) shears for a level and direction.
    fn calculated_shears(&self, level_id: Option<Uuid>, direction: Direction) -> (Option<f64>, Option<f64>) {
        let Some(level_id) = level_id else {
            return (None, None);
        };
        let wind = self.wind.actions.action_for(level_id, direction).map(|a| a.shear_kn);
        let eq = self.seismic.result.action_for(level_id).map(|a| a.shear_kn);
        (wind, eq)
    }

    /// Replace all sections with one per level and direction, demands
    /// seeded from the current shears.
    pub fn generate_default_bracing_sections(&mut self) {
        let floor_type = self.settings.default_floor_type;
        let sections: Vec<BracingSection> = bottom_up(&self.levels)
            .flat_map(|level| Direction::ALL.into_iter().map(move |direction| (level, direction)))
            .map(|(level, direction)| {
                let (wind, eq) = self.calculated_shears(Some(level.id), direction);
                BracingSection::new(
                    format!("{} - {}", level.name, direction),
                    Some(level.id),
                    direction,
                    floor_type,
                    demand_from_shear(wind.unwrap_or(0.0)),
                    demand_from_shear(eq.unwrap_or(0.0)),
                )
            })
            .collect();
        tracing::info!(sections = sections.len(), "bracing sections generated");
        self.sections = sections;
        self.staleness.mark_recomputed(Stage::BracingDemand);
        self.touch();
    }

    /// Add a custom section on the bottom level. Returns its id.
    pub fn add_custom_section(&mut self) -> Uuid {
        let section = BracingSection::custom(self.levels.first().map(|l| l.id));
        let id = section.id;
        self.sections.push(section);
        self.touch();
        id
    }

    pub fn remove_section(&mut self, section_id: Uuid) -> CalcResult<BracingSection> {
        let index = self
            .sections
            .iter()
            .position(|s| s.id == section_id)
            .ok_or_else(|| CalcError::not_found("BracingSection", section_id))?;
        self.touch();
        Ok(self.sections.remove(index))
    }

    fn section_mut(&mut self, section_id: Uuid) -> CalcResult<&mut BracingSection> {
        self.sections
            .iter_mut()
            .find(|s| s.id == section_id)
            .ok_or_else(|| CalcError::not_found("BracingSection", section_id))
    }

    fn edit_section<T>(
        &mut self,
        section_id: Uuid,
        edit: impl FnOnce(&mut BracingSection) -> CalcResult<T>,
    ) -> CalcResult<T> {
        let out = edit(self.section_mut(section_id)?)?;
        self.touch();
        Ok(out)
    }

    fn edit_line<T>(
        &mut self,
        section_id: Uuid,
        line_id: Uuid,
        edit: impl FnOnce(&mut BracingLine) -> CalcResult<T>,
    ) -> CalcResult<T> {
        self.edit_section(section_id, |section| edit(section.line_mut(line_id)?))
    }

    pub fn update_section(&mut self, section_id: Uuid, patch: SectionPatch) -> CalcResult<()> {
        self.edit_section(section_id, |section| patch.apply(section))
    }

    /// Insert a default line after `index`. Returns its id.
    pub fn add_line(&mut self, section_id: Uuid, index: usize) -> CalcResult<Uuid> {
        self.edit_section(section_id, |section| Ok(section.add_line(index)))
    }

    pub fn remove_line(&mut self, section_id: Uuid, line_id: Uuid) -> CalcResult<BracingLine> {
        self.edit_section(section_id, |section| section.remove_line(line_id))
    }

    pub fn update_line(&mut self, section_id: Uuid, line_id: Uuid, patch: LinePatch) -> CalcResult<()> {
        self.edit_line(section_id, line_id, |line| patch.apply(line))
    }

    pub fn reorder_lines(&mut self, section_id: Uuid, from: usize, to: usize) -> CalcResult<()> {
        self.edit_section(section_id, |section| section.reorder_lines(from, to))
    }

    /// Insert a default member after `index`. Returns its id.
    pub fn add_member(&mut self, section_id: Uuid, line_id: Uuid, index: usize) -> CalcResult<Uuid> {
        self.edit_line(section_id, line_id, |line| Ok(line.add_member(index)))
    }

    pub fn remove_member(&mut self, section_id: Uuid, line_id: Uuid, member_id: Uuid) -> CalcResult<BracingMember> {
        self.edit_line(section_id, line_id, |line| line.remove_member(member_id))
    }

    pub fn update_member(
        &mut self,
        section_id: Uuid,
        line_id: Uuid,
        member_id: Uuid,
        patch: MemberPatch,
    ) -> CalcResult<()> {
        self.edit_line(section_id, line_id, |line| patch.apply(line.member_mut(member_id)?))
    }

    pub fn reorder_members(&mut self, section_id: Uuid, line_id: Uuid, from: usize, to: usize) -> CalcResult<()> {
        self.edit_line(section_id, line_id, |line| line.reorder_members(from, to))
    }

    /// Reset a section's demands to the calculated shears. A direction with
    /// no calculated shear keeps its current demand.
    pub fn reset_section_demands(&mut self, section_id: Uuid) -> CalcResult<()> {
        let section = self
            .section(section_id)
            .ok_or_else(|| CalcError::not_found("BracingSection", section_id))?;
        let (wind, eq) = self.calculated_shears(section.level_id, section.direction);
        self.edit_section(section_id, |section| {
            section.reset_demands(wind, eq);
            Ok(())
        })
    }

    pub fn reset_all_section_demands(&mut self) {
        let shears: Vec<_> = self
            .sections
            .iter()
            .map(|s| self.calculated_shears(s.level_id, s.direction))
            .collect();
        for (section, (wind, eq)) in self.sections.iter_mut().zip(shears) {
            section.reset_demands(wind, eq);
        }
        self.staleness.mark_recomputed(Stage::BracingDemand);
        self.touch();
    }

    /// Ledger for every section, in section order.
    pub fn section_summaries(&self) -> Vec<SectionSummary> {
        self.sections.iter().map(summarize_section).collect()
    }
}
