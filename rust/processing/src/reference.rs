// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reference data: materials, glazing, constructions per era and the
//! climate table.
//!
//! Reference data is loaded once, validated, and then only read. The
//! built-in set covers three construction eras and the eight ASHRAE climate
//! zones; a JSON file with the same shape can replace it.

use std::collections::BTreeMap;

use bemgen_core::choices::Roughness;
use bemgen_core::RESERVED_CHARACTERS;
use bemgen_geometry::ConstructionRole;
use bemgen_topology::ClimateZone;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::ReferenceError;

/// Age class of the building envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum ConstructionEra {
    #[serde(rename = "pre_1980")]
    Pre1980,
    #[serde(rename = "post_1980")]
    Post1980,
    #[default]
    #[serde(rename = "new")]
    New,
}

impl ConstructionEra {
    pub const ALL: [ConstructionEra; 3] = [
        ConstructionEra::Pre1980,
        ConstructionEra::Post1980,
        ConstructionEra::New,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstructionEra::Pre1980 => "pre_1980",
            ConstructionEra::Post1980 => "post_1980",
            ConstructionEra::New => "new",
        }
    }
}

/// Opaque layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSpec {
    pub name: String,
    pub roughness: Roughness,
    /// m
    pub thickness: f64,
    /// W/m·K
    pub conductivity: f64,
    /// kg/m³
    pub density: f64,
    /// J/kg·K
    pub specific_heat: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thermal_absorptance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solar_absorptance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_absorptance: Option<f64>,
}

/// Simple glazing system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlazingSpec {
    pub name: String,
    /// W/m²·K
    pub u_factor: f64,
    pub solar_heat_gain_coefficient: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_transmittance: Option<f64>,
}

/// Layered assembly, outside layer first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructionSpec {
    pub name: String,
    pub layers: Vec<String>,
}

/// Construction names for every surface role of one era.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructionSet {
    pub exterior_wall: String,
    pub interior_wall: String,
    pub roof: String,
    pub interior_ceiling: String,
    pub interior_floor: String,
    pub ground_floor: String,
    pub window: String,
}

impl ConstructionSet {
    /// Returns the construction name for a surface role.
    pub fn for_role(&self, role: ConstructionRole) -> &str {
        match role {
            ConstructionRole::ExteriorWall => &self.exterior_wall,
            ConstructionRole::InteriorWall => &self.interior_wall,
            ConstructionRole::Roof => &self.roof,
            ConstructionRole::InteriorCeiling => &self.interior_ceiling,
            ConstructionRole::InteriorFloor => &self.interior_floor,
            ConstructionRole::GroundFloor => &self.ground_floor,
            ConstructionRole::Window => &self.window,
        }
    }
}

/// Per-climate design values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateSpec {
    pub zone: u8,
    pub description: String,
    /// High limit of the dry-bulb economizer, °C
    pub economizer_max_dry_bulb: f64,
}

/// Constructions and layers one era needs, in emission order.
#[derive(Debug, Clone)]
pub struct ResolvedConstructions<'a> {
    pub set: &'a ConstructionSet,
    pub materials: Vec<&'a MaterialSpec>,
    pub glazings: Vec<&'a GlazingSpec>,
    pub constructions: Vec<&'a ConstructionSpec>,
}

/// Immutable reference data shared by every generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    pub materials: Vec<MaterialSpec>,
    pub glazings: Vec<GlazingSpec>,
    pub constructions: Vec<ConstructionSpec>,
    pub eras: BTreeMap<ConstructionEra, ConstructionSet>,
    pub climates: Vec<ClimateSpec>,
}

impl ReferenceData {
    /// Loads reference data from JSON and validates it.
    pub fn from_json(json: &str) -> Result<Self, ReferenceError> {
        let data: ReferenceData = serde_json::from_str(json)
            .map_err(|e| ReferenceError::InvalidReferenceData(e.to_string()))?;
        data.validate()?;
        Ok(data)
    }

    pub fn to_json(&self) -> Result<String, ReferenceError> {
        serde_json::to_string_pretty(self).map_err(|e| ReferenceError::InvalidReferenceData(e.to_string()))
    }

    pub fn material(&self, name: &str) -> Option<&MaterialSpec> {
        self.materials.iter().find(|m| m.name.eq_ignore_ascii_case(name))
    }

    pub fn glazing(&self, name: &str) -> Option<&GlazingSpec> {
        self.glazings.iter().find(|g| g.name.eq_ignore_ascii_case(name))
    }

    pub fn construction(&self, name: &str) -> Option<&ConstructionSpec> {
        self.constructions.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn construction_set(&self, era: ConstructionEra) -> Result<&ConstructionSet, ReferenceError> {
        self.eras.get(&era).ok_or_else(|| {
            ReferenceError::InvalidReferenceData(format!("no constructions for era '{}'", era.as_str()))
        })
    }

    pub fn climate(&self, zone: ClimateZone) -> Option<&ClimateSpec> {
        self.climates.iter().find(|c| c.zone == zone.number())
    }

    /// Collects the constructions of an era and the layers they use.
    ///
    /// Each object appears once, in the order the set first names it.
    pub fn resolve(&self, era: ConstructionEra) -> Result<ResolvedConstructions<'_>, ReferenceError> {
        let set = self.construction_set(era)?;
        let mut resolved = ResolvedConstructions {
            set,
            materials: Vec::new(),
            glazings: Vec::new(),
            constructions: Vec::new(),
        };
        let mut seen = FxHashSet::default();

        for role in ConstructionRole::ALL {
            let name = set.for_role(*role);
            let construction = self.construction(name).ok_or_else(|| ReferenceError::MissingConstruction {
                surface: role.as_str().to_string(),
                construction: name.to_string(),
            })?;
            if !seen.insert(construction.name.to_ascii_lowercase()) {
                continue;
            }
            resolved.constructions.push(construction);

            for layer in &construction.layers {
                if !seen.insert(layer.to_ascii_lowercase()) {
                    continue;
                }
                if let Some(m) = self.material(layer) {
                    resolved.materials.push(m);
                } else if let Some(g) = self.glazing(layer) {
                    resolved.glazings.push(g);
                } else {
                    return Err(ReferenceError::MissingMaterial {
                        construction: construction.name.clone(),
                        material: layer.clone(),
                    });
                }
            }
        }
        Ok(resolved)
    }

    /// Checks names, values and cross references.
    pub fn validate(&self) -> Result<(), ReferenceError> {
        let invalid = |msg: String| Err(ReferenceError::InvalidReferenceData(msg));

        let mut names = FxHashSet::default();
        let layer_names = self
            .materials
            .iter()
            .map(|m| &m.name)
            .chain(self.glazings.iter().map(|g| &g.name));
        for name in layer_names.chain(self.constructions.iter().map(|c| &c.name)) {
            if name.trim().is_empty() {
                return invalid("empty object name".to_string());
            }
            if name.contains(RESERVED_CHARACTERS) {
                return invalid(format!("name '{}' contains a field or record separator", name));
            }
            if !names.insert(name.to_ascii_lowercase()) {
                return invalid(format!("name '{}' is defined twice", name));
            }
        }

        for m in &self.materials {
            let values = [m.thickness, m.conductivity, m.density, m.specific_heat];
            if values.iter().any(|v| !v.is_finite() || *v <= 0.0) {
                return invalid(format!("material '{}' has a non-positive property", m.name));
            }
        }
        for g in &self.glazings {
            if g.u_factor <= 0.0 || !(0.0..1.0).contains(&g.solar_heat_gain_coefficient) {
                return invalid(format!("glazing '{}' is out of range", g.name));
            }
        }
        for c in &self.constructions {
            if c.layers.is_empty() || c.layers.len() > 10 {
                return invalid(format!("construction '{}' has {} layers", c.name, c.layers.len()));
            }
        }

        for era in ConstructionEra::ALL {
            let resolved = self.resolve(era)?;
            let window = resolved
                .constructions
                .iter()
                .find(|c| c.name.eq_ignore_ascii_case(&resolved.set.window));
            if let Some(window) = window {
                if window.layers.len() != 1 || self.glazing(&window.layers[0]).is_none() {
                    return invalid(format!(
                        "window construction '{}' must be a single glazing layer",
                        window.name
                    ));
                }
            }
        }

        for zone in 1..=8u8 {
            if !self.climates.iter().any(|c| c.zone == zone) {
                return invalid(format!("climate zone {} missing", zone));
            }
        }
        Ok(())
    }

    /// Built-in reference data.
    pub fn builtin() -> Self {
        let material = |name: &str, roughness, thickness, conductivity, density, specific_heat| MaterialSpec {
            name: name.to_string(),
            roughness,
            thickness,
            conductivity,
            density,
            specific_heat,
            thermal_absorptance: Some(0.9),
            solar_absorptance: Some(0.7),
            visible_absorptance: Some(0.7),
        };
        let glazing = |name: &str, u_factor, shgc, vt| GlazingSpec {
            name: name.to_string(),
            u_factor,
            solar_heat_gain_coefficient: shgc,
            visible_transmittance: Some(vt),
        };
        let construction = |name: &str, layers: &[&str]| ConstructionSpec {
            name: name.to_string(),
            layers: layers.iter().map(|l| l.to_string()).collect(),
        };

        let materials = vec![
            material("Face Brick", Roughness::MediumRough, 0.1016, 0.89, 1920.0, 790.0),
            material("Concrete Block", Roughness::MediumRough, 0.2032, 1.11, 800.0, 920.0),
            material("Gypsum Board", Roughness::Smooth, 0.0127, 0.16, 800.0, 1090.0),
            material("Wall Insulation 25mm", Roughness::MediumRough, 0.025, 0.043, 32.0, 1210.0),
            material("Wall Insulation 75mm", Roughness::MediumRough, 0.075, 0.043, 32.0, 1210.0),
            material("Wall Insulation 125mm", Roughness::MediumRough, 0.125, 0.043, 32.0, 1210.0),
            material("Roof Membrane", Roughness::VeryRough, 0.0095, 0.16, 1121.29, 1460.0),
            material("Roof Insulation 50mm", Roughness::MediumRough, 0.05, 0.049, 265.0, 836.8),
            material("Roof Insulation 100mm", Roughness::MediumRough, 0.1, 0.049, 265.0, 836.8),
            material("Roof Insulation 200mm", Roughness::MediumRough, 0.2, 0.049, 265.0, 836.8),
            material("Metal Decking", Roughness::MediumSmooth, 0.0015, 45.006, 7680.0, 418.4),
            material("Concrete Slab", Roughness::MediumRough, 0.1016, 1.311, 2240.0, 836.8),
            material("Acoustic Tile", Roughness::MediumSmooth, 0.0191, 0.06, 368.0, 590.0),
        ];
        let glazings = vec![
            glazing("Single Pane Glazing", 5.8, 0.75, 0.8),
            glazing("Double Pane Glazing", 2.8, 0.6, 0.7),
            glazing("Low-E Double Glazing", 1.6, 0.35, 0.6),
        ];

        let mut constructions = vec![
            construction("Interior Partition", &["Gypsum Board", "Gypsum Board"]),
            construction("Interior Ceiling", &["Concrete Slab", "Acoustic Tile"]),
            construction("Interior Floor", &["Acoustic Tile", "Concrete Slab"]),
            construction("Slab on Grade", &["Concrete Slab"]),
        ];
        let mut eras = BTreeMap::new();
        let era_layers = [
            (ConstructionEra::Pre1980, "Pre-1980", "25mm", "50mm", "Single Pane Glazing"),
            (ConstructionEra::Post1980, "Post-1980", "75mm", "100mm", "Double Pane Glazing"),
            (ConstructionEra::New, "New", "125mm", "200mm", "Low-E Double Glazing"),
        ];
        for (era, label, wall, roof, glass) in era_layers {
            let wall_insulation = format!("Wall Insulation {}", wall);
            let roof_insulation = format!("Roof Insulation {}", roof);
            let exterior_wall = format!("{} Exterior Wall", label);
            let roof_name = format!("{} Roof", label);
            let window = format!("{} Window", label);
            constructions.push(construction(
                &exterior_wall,
                &["Face Brick", wall_insulation.as_str(), "Concrete Block", "Gypsum Board"],
            ));
            constructions.push(construction(&roof_name, &["Roof Membrane", roof_insulation.as_str(), "Metal Decking"]));
            constructions.push(construction(&window, &[glass]));
            eras.insert(
                era,
                ConstructionSet {
                    exterior_wall,
                    interior_wall: "Interior Partition".to_string(),
                    roof: roof_name,
                    interior_ceiling: "Interior Ceiling".to_string(),
                    interior_floor: "Interior Floor".to_string(),
                    ground_floor: "Slab on Grade".to_string(),
                    window,
                },
            );
        }

        let climates = [
            (1, "Very Hot", 24.0),
            (2, "Hot", 24.0),
            (3, "Warm", 24.0),
            (4, "Mixed", 21.0),
            (5, "Cool", 21.0),
            (6, "Cold", 21.0),
            (7, "Very Cold", 24.0),
            (8, "Subarctic", 24.0),
        ]
        .into_iter()
        .map(|(zone, description, limit)| ClimateSpec {
            zone,
            description: description.to_string(),
            economizer_max_dry_bulb: limit,
        })
        .collect();

        Self {
            materials,
            glazings,
            constructions,
            eras,
            climates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_is_valid() {
        let data = ReferenceData::builtin();
        assert!(data.validate().is_ok());
        for era in ConstructionEra::ALL {
            let resolved = data.resolve(era).unwrap();
            assert_eq!(resolved.constructions.len(), 7);
            assert_eq!(resolved.glazings.len(), 1);
        }
    }

    #[test]
    fn eras_differ_in_envelope() {
        let data = ReferenceData::builtin();
        let old = data.construction_set(ConstructionEra::Pre1980).unwrap();
        let new = data.construction_set(ConstructionEra::New).unwrap();
        assert_ne!(old.exterior_wall, new.exterior_wall);
        assert_eq!(old.interior_wall, new.interior_wall);
        assert_eq!(new.for_role(ConstructionRole::Window), "New Window");
    }

    #[test]
    fn json_roundtrip() {
        let data = ReferenceData::builtin();
        let json = data.to_json().unwrap();
        assert!(json.contains("\"post_1980\""));
        let restored = ReferenceData::from_json(&json).unwrap();
        assert_eq!(restored, data);
    }

    #[test]
    fn missing_layer_is_reported() {
        let mut data = ReferenceData::builtin();
        data.constructions[0].layers.push("Unobtainium".to_string());
        assert_eq!(
            data.validate(),
            Err(ReferenceError::MissingMaterial {
                construction: "Interior Partition".to_string(),
                material: "Unobtainium".to_string(),
            })
        );
    }

    #[test]
    fn missing_construction_is_reported() {
        let mut data = ReferenceData::builtin();
        data.constructions.retain(|c| c.name != "Slab on Grade");
        assert!(matches!(
            data.resolve(ConstructionEra::New),
            Err(ReferenceError::MissingConstruction { .. })
        ));
    }

    #[test]
    fn separator_in_name_is_rejected() {
        let mut json = ReferenceData::builtin().to_json().unwrap();
        let name = ReferenceData::builtin().materials[0].name.clone();
        json = json.replace(&format!("\"{}\"", name), &format!("\"{}; Red\"", name));
        assert!(matches!(
            ReferenceData::from_json(&json),
            Err(ReferenceError::InvalidReferenceData(_))
        ));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut data = ReferenceData::builtin();
        let copy = data.materials[0].clone();
        data.materials.push(copy);
        assert!(matches!(data.validate(), Err(ReferenceError::InvalidReferenceData(_))));
    }
}
