//! # Component Library
//!
//! Read-only catalogue of building materials and systems that assembly layers
//! reference, plus the predefined assembly templates and the predefined level
//! parts that can be placed without an assembly.
//!
//! ## Calculation Modes
//!
//! | Mode    | Unit weight | Layer weight (kPa)                  |
//! |---------|-------------|-------------------------------------|
//! | `Area`  | kN/m³       | `unit × thickness`                  |
//! | `Solid` | kN/m³       | `unit × depth × width / spacing`    |
//! | `Count` | kN          | `unit / spacing`                    |
//!
//! A component without a unit weight contributes nothing. A missing or
//! non-positive spacing counts as 1.0 m.
//!
//! ## Example
//!
//! ```rust
//! use brace_core::library::{find_component, LayerParams};
//!
//! let tile = find_component("ceramic-tile").unwrap();
//! let weight = tile.layer_weight(&LayerParams::with_thickness(0.012));
//! assert!((weight - 0.24).abs() < 1e-12);
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::assembly::AssemblyCategory;

/// How a component's unit weight turns into a layer weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CalcMode {
    /// Sheet or slab: kN/m³ over a thickness
    #[default]
    Area,
    /// Repeated solid member (joist, stud, rafter): kN/m³ over a section at a spacing
    Solid,
    /// Repeated item of known weight at a spacing
    Count,
}

impl CalcMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            CalcMode::Area => "Per area",
            CalcMode::Solid => "Per solid",
            CalcMode::Count => "Per count",
        }
    }
}

/// Instance parameters of a layer (metres)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayerParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<f64>,
}

impl LayerParams {
    pub fn with_thickness(thickness: f64) -> Self {
        LayerParams {
            thickness: Some(thickness),
            ..Default::default()
        }
    }

    pub fn solid(depth: f64, width: f64, spacing: f64) -> Self {
        LayerParams {
            depth: Some(depth),
            width: Some(width),
            spacing: Some(spacing),
            ..Default::default()
        }
    }

    pub fn at_spacing(spacing: f64) -> Self {
        LayerParams {
            spacing: Some(spacing),
            ..Default::default()
        }
    }

    /// Spacing used in the weight formulas
    pub fn effective_spacing(&self) -> f64 {
        match self.spacing {
            Some(s) if s > 0.0 => s,
            _ => 1.0,
        }
    }

    /// Every present parameter, by name
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("thickness", self.thickness),
            ("depth", self.depth),
            ("width", self.width),
            ("spacing", self.spacing),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
    }
}

/// Library category (roofing, framing, lining...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentCategory {
    pub id: String,
    pub name: String,
}

/// A named material or system layers can reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryComponent {
    pub id: String,
    pub name: String,
    pub category_ids: Vec<String>,
    pub calc_mode: CalcMode,
    /// kN/m³ for `Area` and `Solid`, kN for `Count`
    pub unit_weight: Option<f64>,
    pub default_params: LayerParams,
    #[serde(default)]
    pub spec: String,
    #[serde(default)]
    pub note: String,
}

impl LibraryComponent {
    /// Layer weight in kPa for the given instance parameters.
    pub fn layer_weight(&self, params: &LayerParams) -> f64 {
        let unit = self.unit_weight.unwrap_or(0.0);
        match self.calc_mode {
            CalcMode::Area => unit * params.thickness.unwrap_or(0.0),
            CalcMode::Solid => {
                unit * params.depth.unwrap_or(0.0) * params.width.unwrap_or(0.0) / params.effective_spacing()
            }
            CalcMode::Count => unit / params.effective_spacing(),
        }
    }
}

fn component(
    id: &str,
    name: &str,
    categories: &[&str],
    calc_mode: CalcMode,
    unit_weight: f64,
    default_params: LayerParams,
    spec: &str,
) -> LibraryComponent {
    LibraryComponent {
        id: id.to_string(),
        name: name.to_string(),
        category_ids: categories.iter().map(|c| c.to_string()).collect(),
        calc_mode,
        unit_weight: Some(unit_weight),
        default_params,
        spec: spec.to_string(),
        note: String::new(),
    }
}

pub static CATEGORIES: Lazy<Vec<ComponentCategory>> = Lazy::new(|| {
    [
        ("roofing", "Roofing"),
        ("framing", "Framing"),
        ("lining", "Linings"),
        ("cladding", "Cladding"),
        ("flooring", "Flooring"),
        ("insulation", "Insulation"),
        ("concrete", "Concrete & masonry"),
    ]
    .into_iter()
    .map(|(id, name)| ComponentCategory {
        id: id.to_string(),
        name: name.to_string(),
    })
    .collect()
});

pub static COMPONENTS: Lazy<Vec<LibraryComponent>> = Lazy::new(|| {
    use CalcMode::*;
    vec![
        component("steel-roofing", "Long-run steel roofing 0.55 BMT", &["roofing"], Area, 78.5, LayerParams::with_thickness(0.00055), "Corrugate / trapezoidal"),
        component("concrete-tile", "Concrete roof tiles", &["roofing"], Area, 22.0, LayerParams::with_thickness(0.025), ""),
        component("ceramic-tile", "Ceramic tiles", &["roofing", "flooring"], Area, 20.0, LayerParams::with_thickness(0.012), ""),
        component("timber-purlin", "Timber purlin 70x45", &["roofing", "framing"], Solid, 5.0, LayerParams::solid(0.07, 0.045, 0.9), "SG8"),
        component("timber-rafter", "Timber rafter 140x45", &["roofing", "framing"], Solid, 5.0, LayerParams::solid(0.14, 0.045, 0.9), "SG8"),
        component("timber-stud", "Timber stud 90x45", &["framing"], Solid, 5.0, LayerParams::solid(0.09, 0.045, 0.6), "SG8"),
        component("timber-joist", "Timber joist 240x45", &["flooring", "framing"], Solid, 5.0, LayerParams::solid(0.24, 0.045, 0.45), "SG8"),
        component("ceiling-batten", "Steel ceiling batten", &["framing", "lining"], Count, 0.01, LayerParams::at_spacing(0.6), "kN per m run"),
        component("gib-standard", "GIB Standard 10 mm", &["lining"], Area, 6.6, LayerParams::with_thickness(0.010), "GIB"),
        component("gib-braceline", "GIB Braceline 10 mm", &["lining"], Area, 8.5, LayerParams::with_thickness(0.010), "GIB"),
        component("plywood-flooring", "Structural plywood flooring", &["flooring"], Area, 5.5, LayerParams::with_thickness(0.020), "CD grade"),
        component("weatherboard", "Timber weatherboard", &["cladding"], Area, 5.0, LayerParams::with_thickness(0.019), ""),
        component("brick-veneer", "Clay brick veneer", &["cladding", "concrete"], Area, 19.0, LayerParams::with_thickness(0.07), ""),
        component("fibre-cement", "Fibre cement sheet", &["cladding"], Area, 15.0, LayerParams::with_thickness(0.0075), ""),
        component("glass-wool", "Glass wool insulation", &["insulation"], Area, 0.5, LayerParams::with_thickness(0.09), ""),
        component("concrete-slab", "Reinforced concrete", &["concrete", "flooring"], Area, 24.0, LayerParams::with_thickness(0.1), ""),
    ]
});

/// Look up a library component by id.
pub fn find_component(id: &str) -> Option<&'static LibraryComponent> {
    COMPONENTS.iter().find(|c| c.id == id)
}

/// Components in a library category
pub fn components_in(category_id: &str) -> impl Iterator<Item = &'static LibraryComponent> + '_ {
    COMPONENTS
        .iter()
        .filter(move |c| c.category_ids.iter().any(|id| id == category_id))
}

/// A predefined assembly: layers by component id with their parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub category: AssemblyCategory,
    pub is_partition: bool,
    pub slope_deg: Option<f64>,
    pub layers: Vec<(&'static str, LayerParams)>,
}

pub static ASSEMBLY_TEMPLATES: Lazy<Vec<AssemblyTemplate>> = Lazy::new(|| {
    vec![
        AssemblyTemplate {
            id: "light-roof",
            name: "Light roof (steel)",
            category: AssemblyCategory::Roof,
            is_partition: false,
            slope_deg: Some(15.0),
            layers: vec![
                ("steel-roofing", LayerParams::with_thickness(0.00055)),
                ("timber-purlin", LayerParams::solid(0.07, 0.045, 0.9)),
                ("timber-rafter", LayerParams::solid(0.14, 0.045, 0.9)),
                ("glass-wool", LayerParams::with_thickness(0.09)),
                ("ceiling-batten", LayerParams::at_spacing(0.6)),
                ("gib-standard", LayerParams::with_thickness(0.010)),
            ],
        },
        AssemblyTemplate {
            id: "heavy-roof",
            name: "Heavy roof (concrete tile)",
            category: AssemblyCategory::Roof,
            is_partition: false,
            slope_deg: Some(25.0),
            layers: vec![
                ("concrete-tile", LayerParams::with_thickness(0.025)),
                ("timber-purlin", LayerParams::solid(0.07, 0.045, 0.32)),
                ("timber-rafter", LayerParams::solid(0.14, 0.045, 0.9)),
                ("gib-standard", LayerParams::with_thickness(0.010)),
            ],
        },
        AssemblyTemplate {
            id: "timber-floor",
            name: "Timber floor",
            category: AssemblyCategory::Floor,
            is_partition: false,
            slope_deg: Some(0.0),
            layers: vec![
                ("plywood-flooring", LayerParams::with_thickness(0.020)),
                ("timber-joist", LayerParams::solid(0.24, 0.045, 0.45)),
                ("gib-standard", LayerParams::with_thickness(0.010)),
            ],
        },
        AssemblyTemplate {
            id: "concrete-floor",
            name: "Concrete slab floor",
            category: AssemblyCategory::Floor,
            is_partition: false,
            slope_deg: Some(0.0),
            layers: vec![("concrete-slab", LayerParams::with_thickness(0.1))],
        },
        AssemblyTemplate {
            id: "weatherboard-wall",
            name: "Weatherboard wall",
            category: AssemblyCategory::Wall,
            is_partition: false,
            slope_deg: None,
            layers: vec![
                ("weatherboard", LayerParams::with_thickness(0.019)),
                ("timber-stud", LayerParams::solid(0.09, 0.045, 0.6)),
                ("glass-wool", LayerParams::with_thickness(0.09)),
                ("gib-standard", LayerParams::with_thickness(0.010)),
            ],
        },
        AssemblyTemplate {
            id: "brick-veneer-wall",
            name: "Brick veneer wall",
            category: AssemblyCategory::Wall,
            is_partition: false,
            slope_deg: None,
            layers: vec![
                ("brick-veneer", LayerParams::with_thickness(0.07)),
                ("timber-stud", LayerParams::solid(0.09, 0.045, 0.6)),
                ("gib-standard", LayerParams::with_thickness(0.010)),
            ],
        },
        AssemblyTemplate {
            id: "partition-wall",
            name: "Internal partition",
            category: AssemblyCategory::Other,
            is_partition: true,
            slope_deg: None,
            layers: vec![
                ("gib-standard", LayerParams::with_thickness(0.010)),
                ("timber-stud", LayerParams::solid(0.09, 0.045, 0.6)),
                ("gib-standard", LayerParams::with_thickness(0.010)),
            ],
        },
    ]
});

pub fn find_template(id: &str) -> Option<&'static AssemblyTemplate> {
    ASSEMBLY_TEMPLATES.iter().find(|t| t.id == id)
}

/// A weight that can go on a level without defining an assembly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredefinedPart {
    pub name: &'static str,
    pub base_weight_kpa: f64,
    pub category: AssemblyCategory,
    pub is_partition: bool,
}

const fn predefined(name: &'static str, base_weight_kpa: f64, category: AssemblyCategory) -> PredefinedPart {
    PredefinedPart {
        name,
        base_weight_kpa,
        category,
        is_partition: false,
    }
}

pub const PREDEFINED_PARTS: [PredefinedPart; 8] = [
    predefined("Light Roof - NZS3604", 0.45, AssemblyCategory::Roof),
    predefined("Heavy Roof - NZS3604", 0.85, AssemblyCategory::Roof),
    predefined("Light Cladding Wall - NZS3604", 0.5, AssemblyCategory::Wall),
    predefined("Medium Cladding Wall - NZS3604", 0.8, AssemblyCategory::Wall),
    predefined("Heavy Cladding Wall - NZS3604", 2.2, AssemblyCategory::Wall),
    predefined("Floor - NZS3604", 0.45, AssemblyCategory::Floor),
    PredefinedPart {
        name: "Partition Wall",
        base_weight_kpa: 0.3,
        category: AssemblyCategory::Other,
        is_partition: true,
    },
    predefined("Other", 1.0, AssemblyCategory::Other),
];

pub fn find_predefined_part(name: &str) -> Option<&'static PredefinedPart> {
    PREDEFINED_PARTS.iter().find(|p| p.name == name)
}
