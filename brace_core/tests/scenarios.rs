//! End-to-end design scenarios through the public API.

use std::collections::BTreeMap;

use approx::assert_relative_eq;
use brace_core::analysis::{seismic_action, SeismicDesignInput, SeismicLevelResult};
use brace_core::bracing::{LinePatch, MemberPatch, SectionPatch};
use brace_core::file_io::{load_project, save_project};
use brace_core::level::Level;
use brace_core::project::{AssemblyPatch, LevelPatch, Project};
use brace_core::tables::seismic::hazard_factor;

#[test]
fn seismic_two_storey_uniform_weight() {
    let mut ground = Level::new("Ground");
    ground.storey_height_m = 2.4;
    let mut upper = Level::new("Upper");
    upper.storey_height_m = 2.7;
    let levels = vec![ground, upper];

    let weights: BTreeMap<_, _> = levels
        .iter()
        .map(|l| {
            (
                l.id,
                SeismicLevelResult {
                    level_id: l.id,
                    effective_dl_kn: 100.0,
                    ..Default::default()
                },
            )
        })
        .collect();

    let input = SeismicDesignInput::default();
    let result = seismic_action::calculate(&input, &levels, &weights);

    assert_eq!(result.factors.z, hazard_factor("Auckland").unwrap());
    assert_relative_eq!(result.factors.sp, 0.7, epsilon = 1e-12);
    assert_relative_eq!(result.factors.k_mu, 1.0 + 0.4 / 0.7, epsilon = 1e-12);
    assert_relative_eq!(result.total_weight_kn, 200.0, epsilon = 1e-12);

    let base = &result.actions[0];
    let top = &result.actions[1];
    assert_eq!(base.level_name, "Ground");
    assert_relative_eq!(top.height_from_ground_m, 5.1, epsilon = 1e-12);
    assert!(base.shear_kn > top.shear_kn);
    assert_relative_eq!(base.shear_kn, result.base_shear_kn, epsilon = 1e-9);
}

#[test]
fn wind_setback_without_roof_warns() {
    let mut project = Project::new("Set-back");
    let ground = project.levels[0].id;
    project
        .update_level(
            ground,
            LevelPatch {
                plan_dim_ew_m: Some(14.0),
                ..Default::default()
            },
        )
        .unwrap();
    project.place_predefined_part(ground, "Floor - NZS3604").unwrap();
    let upper = project.add_level("Upper");
    project.place_predefined_part(upper, "Light Roof - NZS3604").unwrap();
    project.recalculate_stale();

    let ns_ground = project.wind.actions.action_for(ground, brace_core::Direction::NS).unwrap();
    assert!(ns_ground.warning.as_deref().is_some_and(|w| !w.is_empty()));
    assert_eq!(ns_ground.roof_area_m2, 0.0);

    // E-W wind sees equal widths on both storeys
    let ew_ground = project.wind.actions.action_for(ground, brace_core::Direction::EW).unwrap();
    assert!(ew_ground.warning.is_none());
}

#[test]
fn bracing_line_meets_minimum_exactly() {
    let mut project = Project::new("Bracing");
    let section = project.add_custom_section();
    project
        .update_section(
            section,
            SectionPatch {
                demand_wind_bu: Some(500.0),
                demand_eq_bu: Some(500.0),
                ..Default::default()
            },
        )
        .unwrap();

    let line = project.section(section).unwrap().lines[0].id;
    let member = project.section(section).unwrap().lines[0].members[0].id;
    project
        .update_line(
            section,
            line,
            LinePatch {
                external_wall_length_m: Some(3.0),
                ..Default::default()
            },
        )
        .unwrap();
    project
        .update_member(
            section,
            line,
            member,
            MemberPatch {
                type_name: Some("GS2-N".into()),
                length_or_count: Some(1.25),
                ..Default::default()
            },
        )
        .unwrap();

    let summary = &project.section_summaries()[0];
    let line_summary = &summary.lines[0];
    assert_eq!(line_summary.min_demand.wind, 125.0);
    assert_relative_eq!(line_summary.achieved.wind, 125.0, epsilon = 1e-9);
    assert!(line_summary.wind_ok());
    // earthquake rating of the same panel is 95 BU/m
    assert!(!line_summary.eq_ok());
    assert!(!summary.passes());
}

#[test]
fn layer_weight_with_roof_slope() {
    let mut project = Project::new("Layers");
    let roof = project.add_assembly("Tile Roof");
    project
        .update_assembly(
            roof,
            AssemblyPatch {
                slope_deg: Some(Some(30.0)),
                ..Default::default()
            },
        )
        .unwrap();
    project.add_component_layer(roof, "ceramic-tile", None).unwrap();

    let assembly = project.assembly(roof).unwrap();
    assert_relative_eq!(assembly.layers[0].weight_kpa, 0.24, epsilon = 1e-12);
    assert_relative_eq!(assembly.total_weight_kpa, 0.24 / 30f64.to_radians().cos(), epsilon = 1e-12);
    assert_relative_eq!(assembly.total_weight_kpa, 0.277, epsilon = 1e-3);
}

#[test]
fn assembly_edits_flow_into_placed_parts() {
    let mut project = Project::new("Flow");
    let roof = project.add_assembly("Tile Roof");
    project.add_component_layer(roof, "ceramic-tile", None).unwrap();
    let ground = project.levels[0].id;
    project.place_assembly(ground, roof).unwrap();
    let before = project.levels[0].total_level_weight_kn;

    project.add_custom_layer(roof, 0.1).unwrap();
    assert!(project.levels[0].total_level_weight_kn > before);
    assert!(project.staleness.flags().weights_stale);
}

#[test]
fn full_pipeline_survives_save_and_load() {
    let mut project = Project::new("Pipeline");
    let ground = project.levels[0].id;
    project.place_predefined_part(ground, "Floor - NZS3604").unwrap();
    project.place_predefined_part(ground, "Medium Cladding Wall - NZS3604").unwrap();
    let upper = project.add_level("Upper");
    project.place_predefined_part(upper, "Light Cladding Wall - NZS3604").unwrap();
    project.place_predefined_part(upper, "Heavy Roof - NZS3604").unwrap();

    project.sync_seismic_instances();
    project.recalculate_stale();
    project.generate_default_bracing_sections();
    assert_eq!(project.sections.len(), 4);
    let flags = project.staleness.flags();
    assert!(!flags.weights_stale && !flags.seismic_actions_stale && !flags.wind_actions_stale);

    let path = std::env::temp_dir().join(format!("brace_test_pipeline_{}.json", std::process::id()));
    save_project(&project, &path).unwrap();
    let mut loaded = load_project(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(loaded.summary(), project.summary());

    loaded.recalculate_seismic_weights();
    loaded.recalculate_seismic_actions();
    loaded.recalculate_wind_actions();
    assert_eq!(loaded.seismic.result, project.seismic.result);
    assert_eq!(loaded.wind.actions, project.wind.actions);
}
