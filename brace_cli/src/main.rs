//! # Bracewell CLI
//!
//! Runs the full load and bracing pipeline on a project file, or on a
//! built-in two storey demo house, and prints the results.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use brace_core::equations::Equation;
use brace_core::project::Project;
use brace_core::{load_project, save_project, Direction};

/// Bracewell bracing pre-design
#[derive(Parser, Debug)]
#[command(name = "brace_cli")]
#[command(about = "NZS 3604 bracing pre-design from a project file", long_about = None)]
struct Args {
    /// Project file to analyse; a demo house is used when omitted
    project: Option<PathBuf>,

    /// Write the analysed project to this file
    #[arg(long)]
    save: Option<PathBuf>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Keep the bracing sections stored in the file instead of regenerating them
    #[arg(long)]
    keep_sections: bool,
}

fn demo_project() -> Result<Project> {
    let mut project = Project::new("Demo House");
    project.meta.designer = "Bracewell".into();

    let ground = project.levels[0].id;
    project.place_predefined_part(ground, "Floor - NZS3604")?;
    project.place_predefined_part(ground, "Light Cladding Wall - NZS3604")?;
    project.place_predefined_part(ground, "Light Roof - NZS3604")?;

    let upper = project.add_level("Level 2");
    project.place_predefined_part(upper, "Floor - NZS3604")?;
    project.place_predefined_part(upper, "Light Cladding Wall - NZS3604")?;
    project.place_predefined_part(upper, "Light Roof - NZS3604")?;
    Ok(project)
}

fn status_icon(pass: bool) -> &'static str {
    if pass {
        "[OK]"
    } else {
        "[FAIL]"
    }
}

fn print_report(project: &Project) {
    let summary = project.summary();

    println!("═══════════════════════════════════════");
    println!("  {}", summary.project_name);
    println!("═══════════════════════════════════════");
    println!();
    println!("Level weights:");
    for row in &summary.levels {
        println!(
            "  {:<12} {:>8.1} m²  {:>8.2} kN",
            row.name, row.total_area_m2, row.total_level_weight_kn
        );
    }

    let seismic = &summary.seismic;
    println!();
    println!("Earthquake (Cd(T1) = {:.4}):", seismic.factors.cd_t1);
    println!("  W = {:.2} kN   V = {:.2} kN   Ft = {:.2} kN", seismic.total_weight_kn, seismic.base_shear_kn, seismic.top_force_kn);
    for action in &seismic.actions {
        println!(
            "  {:<12} hi = {:>5.2} m  Fi = {:>7.2} kN  Vi = {:>7.2} kN",
            action.level_name, action.height_from_ground_m, action.force_kn, action.shear_kn
        );
    }

    println!();
    println!("Wind:");
    for direction in Direction::ALL {
        for action in summary.wind_actions.direction(direction) {
            println!(
                "  {} {:<12} F = {:>7.2} kN  V = {:>7.2} kN{}",
                direction,
                action.level_name,
                action.force_kn,
                action.shear_kn,
                action.warning.as_deref().map(|w| format!("  ! {w}")).unwrap_or_default()
            );
        }
    }

    println!();
    println!("Bracing:");
    for section in &summary.sections {
        println!(
            "  {:<20} W {:>6.0}/{:<6.0} ({:>5.1}%)  E {:>6.0}/{:<6.0} ({:>5.1}%) {}",
            section.name,
            section.achieved.wind,
            section.demand.wind,
            section.wind_rate_pct,
            section.achieved.eq,
            section.demand.eq,
            section.eq_rate_pct,
            status_icon(section.passes())
        );
        for line in &section.lines {
            println!(
                "    {:<8} W {:>6.0} (min {:>5.0})  E {:>6.0} (min {:>5.0}) {}",
                line.name,
                line.achieved.wind,
                line.min_demand.wind,
                line.achieved.eq,
                line.min_demand.eq,
                status_icon(line.passes())
            );
        }
    }

    println!();
    println!("References:");
    for equation in Equation::ALL {
        let meta = equation.metadata();
        println!("  {:<38} {:<44} {}", meta.name, meta.formula, meta.reference.citation());
    }

    let all_pass = summary.sections.iter().all(|s| s.passes());
    println!();
    println!("═══════════════════════════════════════");
    println!("  RESULT: {}", if all_pass { "PASS" } else { "FAIL" });
    println!("═══════════════════════════════════════");
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut project = match &args.project {
        Some(path) => load_project(path).with_context(|| format!("loading {}", path.display()))?,
        None => {
            info!("no project file given, using the demo house");
            demo_project()?
        }
    };

    if project.seismic.instances.is_empty() {
        project.sync_seismic_instances();
    }
    project.recalculate_stale();
    if args.keep_sections && !project.sections.is_empty() {
        project.reset_all_section_demands();
    } else {
        project.generate_default_bracing_sections();
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&project.summary())?);
    } else {
        print_report(&project);
    }

    if let Some(path) = &args.save {
        save_project(&project, path).with_context(|| format!("saving {}", path.display()))?;
        info!(path = %path.display(), "project saved");
    }
    Ok(())
}
