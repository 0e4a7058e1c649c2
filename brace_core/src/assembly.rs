//! # Assemblies
//!
//! An assembly (roof, floor, wall or other build-up) is an ordered stack of
//! layers. Each layer either references a [`LibraryComponent`] with instance
//! parameters or carries a custom weight. The assembly's total weight is the
//! sum of its layer weights, corrected for slope:
//!
//! ```text
//! w = Σ w_layer / cos(slope)     0 < slope < 90
//! w = Σ w_layer                  slope absent or 0
//! w = 0                          slope ≥ 90
//! ```
//!
//! Cached weights are refreshed by every mutator on [`Assembly`].
//!
//! ## Example
//!
//! ```rust
//! use brace_core::assembly::{Assembly, AssemblyCategory};
//! use brace_core::library::LayerParams;
//!
//! let mut roof = Assembly::new("Tiled roof");
//! roof.set_slope(Some(30.0));
//! roof.add_component_layer_with("ceramic-tile", LayerParams::with_thickness(0.012)).unwrap();
//!
//! assert_eq!(roof.category, AssemblyCategory::Roof);
//! assert!((roof.total_weight_kpa - 0.24 / 30f64.to_radians().cos()).abs() < 1e-12);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CalcError, CalcResult};
use crate::library::{find_component, find_template, LayerParams, LibraryComponent};
use crate::units::Degrees;

/// Default pitch given to roofs that have none
pub const DEFAULT_ROOF_SLOPE_DEG: f64 = 15.0;

/// What an assembly (and the parts placed from it) is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AssemblyCategory {
    Wall,
    Floor,
    #[default]
    Roof,
    Other,
}

impl AssemblyCategory {
    pub const ALL: [AssemblyCategory; 4] = [
        AssemblyCategory::Wall,
        AssemblyCategory::Floor,
        AssemblyCategory::Roof,
        AssemblyCategory::Other,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            AssemblyCategory::Wall => "Wall",
            AssemblyCategory::Floor => "Floor",
            AssemblyCategory::Roof => "Roof",
            AssemblyCategory::Other => "Other",
        }
    }

    /// Roofs and floors may carry a slope
    pub fn is_sloped(&self) -> bool {
        matches!(self, AssemblyCategory::Roof | AssemblyCategory::Floor)
    }

    /// Floors and roofs count towards the level area
    pub fn counts_towards_area(&self) -> bool {
        self.is_sloped()
    }
}

impl fmt::Display for AssemblyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Where a layer's weight comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum LayerSource {
    Component { component_id: String, params: LayerParams },
    Custom { weight_kpa: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: Uuid,
    pub name: String,
    pub source: LayerSource,
    /// Cached layer weight (kPa)
    pub weight_kpa: f64,
}

impl Layer {
    /// A layer from a library component, with the component's default parameters.
    pub fn from_component(component: &LibraryComponent) -> Self {
        Layer::with_params(component, component.default_params)
    }

    pub fn with_params(component: &LibraryComponent, params: LayerParams) -> Self {
        Layer {
            id: Uuid::new_v4(),
            name: component.name.clone(),
            weight_kpa: component.layer_weight(&params),
            source: LayerSource::Component {
                component_id: component.id.clone(),
                params,
            },
        }
    }

    pub fn custom(weight_kpa: f64) -> Self {
        Layer {
            id: Uuid::new_v4(),
            name: "Custom Weight Layer".to_string(),
            source: LayerSource::Custom { weight_kpa },
            weight_kpa,
        }
    }

    /// Refresh the cached weight from the library.
    ///
    /// A component missing from the library weighs nothing.
    pub fn recalculate(&mut self) {
        self.weight_kpa = match &self.source {
            LayerSource::Component { component_id, params } => match find_component(component_id) {
                Some(component) => component.layer_weight(params),
                None => {
                    tracing::warn!(component_id = %component_id, "unknown library component, layer weight set to zero");
                    0.0
                }
            },
            LayerSource::Custom { weight_kpa } => *weight_kpa,
        };
    }

    pub fn is_custom(&self) -> bool {
        matches!(self.source, LayerSource::Custom { .. })
    }
}

/// Total assembly weight from the summed layer weights and an optional slope.
///
/// # Example
/// ```rust
/// use brace_core::assembly::assembly_weight;
///
/// assert_eq!(assembly_weight(0.5, None), 0.5);
/// assert_eq!(assembly_weight(0.5, Some(0.0)), 0.5);
/// assert_eq!(assembly_weight(0.5, Some(90.0)), 0.0);
/// assert!((assembly_weight(0.5, Some(60.0)) - 1.0).abs() < 1e-12);
/// ```
pub fn assembly_weight(layer_sum_kpa: f64, slope_deg: Option<f64>) -> f64 {
    match slope_deg {
        Some(slope) if slope >= 90.0 => 0.0,
        Some(slope) if slope > 0.0 => layer_sum_kpa / Degrees(slope).cos(),
        _ => layer_sum_kpa,
    }
}

/// A building assembly ("part") built from layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assembly {
    pub id: Uuid,
    pub name: String,
    pub category: AssemblyCategory,
    /// Internal partitions are treated like walls by the seismic weight split
    #[serde(default)]
    pub is_partition: bool,
    pub layers: Vec<Layer>,
    /// Roof or floor pitch in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slope_deg: Option<f64>,
    /// Cached total weight (kPa)
    pub total_weight_kpa: f64,
}

impl Assembly {
    /// A blank assembly: a roof at the default pitch with no layers.
    pub fn new(name: impl Into<String>) -> Self {
        Assembly {
            id: Uuid::new_v4(),
            name: name.into(),
            category: AssemblyCategory::Roof,
            is_partition: false,
            layers: Vec::new(),
            slope_deg: Some(DEFAULT_ROOF_SLOPE_DEG),
            total_weight_kpa: 0.0,
        }
    }

    /// A new assembly built from a predefined template.
    pub fn from_template(template_id: &str) -> CalcResult<Self> {
        let template =
            find_template(template_id).ok_or_else(|| CalcError::not_found("Assembly template", template_id))?;

        let layers = template
            .layers
            .iter()
            .map(|(component_id, params)| match find_component(component_id) {
                Some(component) => Ok(Layer::with_params(component, *params)),
                None => Err(CalcError::not_found("Library component", component_id)),
            })
            .collect::<CalcResult<Vec<_>>>()?;

        let mut assembly = Assembly {
            id: Uuid::new_v4(),
            name: template.name.to_string(),
            category: template.category,
            is_partition: template.is_partition,
            layers,
            slope_deg: template.slope_deg,
            total_weight_kpa: 0.0,
        };
        assembly.recalculate();
        Ok(assembly)
    }

    /// Sum of the cached layer weights before slope correction
    pub fn layer_sum_kpa(&self) -> f64 {
        self.layers.iter().fold(0.0, |total, l| total + l.weight_kpa)
    }

    /// Refresh every layer and the total.
    pub fn recalculate(&mut self) {
        for layer in &mut self.layers {
            layer.recalculate();
        }
        self.total_weight_kpa = assembly_weight(self.layer_sum_kpa(), self.slope_deg);
    }

    fn refresh_total(&mut self) {
        self.total_weight_kpa = assembly_weight(self.layer_sum_kpa(), self.slope_deg);
    }

    /// Change the category, then adjust the slope for the new category:
    /// walls and other parts drop their slope, a roof without a slope gets
    /// the default pitch and a floor becomes level.
    pub fn set_category(&mut self, category: AssemblyCategory) {
        self.category = category;
        match category {
            AssemblyCategory::Wall | AssemblyCategory::Other => self.slope_deg = None,
            AssemblyCategory::Roof => {
                if self.slope_deg.map_or(true, |s| s == 0.0) {
                    self.slope_deg = Some(DEFAULT_ROOF_SLOPE_DEG);
                }
            }
            AssemblyCategory::Floor => self.slope_deg = Some(0.0),
        }
        self.refresh_total();
    }

    pub fn set_slope(&mut self, slope_deg: Option<f64>) {
        self.slope_deg = slope_deg;
        self.refresh_total();
    }

    /// Append a layer from a library component with its default parameters.
    pub fn add_component_layer(&mut self, component_id: &str) -> CalcResult<Uuid> {
        let component =
            find_component(component_id).ok_or_else(|| CalcError::not_found("Library component", component_id))?;
        self.push_layer(Layer::from_component(component))
    }

    /// Append a layer from a library component with explicit parameters.
    pub fn add_component_layer_with(&mut self, component_id: &str, params: LayerParams) -> CalcResult<Uuid> {
        let component =
            find_component(component_id).ok_or_else(|| CalcError::not_found("Library component", component_id))?;
        self.push_layer(Layer::with_params(component, params))
    }

    pub fn add_custom_layer(&mut self, weight_kpa: f64) -> CalcResult<Uuid> {
        self.push_layer(Layer::custom(weight_kpa))
    }

    fn push_layer(&mut self, layer: Layer) -> CalcResult<Uuid> {
        let id = layer.id;
        self.layers.push(layer);
        self.refresh_total();
        Ok(id)
    }

    fn layer_mut(&mut self, layer_id: Uuid) -> CalcResult<&mut Layer> {
        self.layers
            .iter_mut()
            .find(|l| l.id == layer_id)
            .ok_or_else(|| CalcError::not_found("Layer", layer_id))
    }

    pub fn remove_layer(&mut self, layer_id: Uuid) -> CalcResult<Layer> {
        let index = self
            .layers
            .iter()
            .position(|l| l.id == layer_id)
            .ok_or_else(|| CalcError::not_found("Layer", layer_id))?;
        let layer = self.layers.remove(index);
        self.refresh_total();
        Ok(layer)
    }

    /// Replace a component layer's parameters.
    pub fn update_layer_params(&mut self, layer_id: Uuid, new_params: LayerParams) -> CalcResult<()> {
        let layer = self.layer_mut(layer_id)?;
        match &mut layer.source {
            LayerSource::Component { params, .. } => *params = new_params,
            LayerSource::Custom { .. } => {
                return Err(CalcError::invalid_input(
                    "params",
                    layer_id.to_string(),
                    "Custom layers carry a weight, not component parameters",
                ))
            }
        }
        layer.recalculate();
        self.refresh_total();
        Ok(())
    }

    /// Replace a custom layer's weight.
    pub fn update_custom_weight(&mut self, layer_id: Uuid, weight_kpa: f64) -> CalcResult<()> {
        let layer = self.layer_mut(layer_id)?;
        match &mut layer.source {
            LayerSource::Custom { weight_kpa: w } => *w = weight_kpa,
            LayerSource::Component { .. } => {
                return Err(CalcError::invalid_input(
                    "weight_kpa",
                    layer_id.to_string(),
                    "Component layers derive their weight from the library",
                ))
            }
        }
        layer.recalculate();
        self.refresh_total();
        Ok(())
    }

    pub fn rename_layer(&mut self, layer_id: Uuid, name: impl Into<String>) -> CalcResult<()> {
        self.layer_mut(layer_id)?.name = name.into();
        Ok(())
    }

    /// Move a layer from one position to another. Order does not affect weight.
    pub fn reorder_layers(&mut self, from: usize, to: usize) -> CalcResult<()> {
        if from >= self.layers.len() {
            return Err(CalcError::invalid_input(
                "from",
                from.to_string(),
                format!("Layer index out of range (0..{})", self.layers.len()),
            ));
        }
        let layer = self.layers.remove(from);
        let to = to.min(self.layers.len());
        self.layers.insert(to, layer);
        Ok(())
    }
}
