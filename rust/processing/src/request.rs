// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generation request contract.

use bemgen_core::{SchemaVersion, RESERVED_CHARACTERS};
use bemgen_geometry::{BuildingParams, ZoneLayout};
use bemgen_topology::{ClimateZone, HvacDefaults, HvacOptions, SystemType};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::reference::ConstructionEra;
use crate::warning::{Stage, Warning};

/// Relative deviation between the upstream floor area and the generated one
/// above which a warning is raised.
pub const FLOOR_AREA_TOLERANCE: f64 = 0.05;

/// One building to generate, as resolved by upstream services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub name: String,
    /// Outline in meters, `[[x, y], ...]`
    pub footprint: Vec<[f64; 2]>,
    pub story_count: u32,
    /// Floor-to-floor height in meters
    pub story_height: f64,
    #[serde(default)]
    pub window_to_wall_ratio: f64,
    #[serde(default)]
    pub zone_layout: ZoneLayout,
    pub climate_zone: ClimateZone,
    #[serde(default)]
    pub construction_era: ConstructionEra,
    #[serde(default)]
    pub system_type: SystemType,
    #[serde(default)]
    pub economizer: bool,
    #[serde(default)]
    pub schema_version: SchemaVersion,
    /// Degrees clockwise from true north
    #[serde(default)]
    pub north_axis: f64,
    /// Gross floor area reported upstream, m²
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_area: Option<f64>,
}

impl GenerationRequest {
    /// Parses a request from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidRequest(e.to_string()))
    }

    /// Checks the fields the geometry engine does not own.
    pub fn validate(&self) -> Result<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::InvalidRequest("building name is empty".to_string()));
        }
        if let Some(c) = name.chars().find(|c| RESERVED_CHARACTERS.contains(c)) {
            return Err(Error::InvalidRequest(format!(
                "building name '{}' contains reserved character '{}'",
                name, c
            )));
        }
        if !self.north_axis.is_finite() {
            return Err(Error::InvalidRequest(format!("north axis {} is not finite", self.north_axis)));
        }
        if let Some(area) = self.floor_area {
            if !area.is_finite() || area <= 0.0 {
                return Err(Error::InvalidRequest(format!("floor area {} must be positive", area)));
            }
        }
        Ok(())
    }

    pub fn building_params(&self) -> BuildingParams {
        BuildingParams {
            footprint: self.footprint.clone(),
            story_count: self.story_count,
            story_height: self.story_height,
            window_to_wall_ratio: self.window_to_wall_ratio,
            zone_layout: self.zone_layout,
        }
    }

    pub fn hvac_options(&self, design: &HvacDefaults) -> HvacOptions {
        HvacOptions {
            system_type: self.system_type,
            climate: self.climate_zone,
            economizer: self.economizer,
            design: *design,
        }
    }

    /// North axis normalised to `[0, 360)`.
    pub fn north_axis_degrees(&self) -> f64 {
        self.north_axis.rem_euclid(360.0)
    }

    /// Compares the upstream floor area with the generated one.
    pub fn check_floor_area(&self, generated: f64) -> Option<Warning> {
        let reported = self.floor_area?;
        let deviation = (generated - reported).abs() / reported;
        (deviation > FLOOR_AREA_TOLERANCE).then(|| {
            Warning::new(
                Stage::Request,
                "floor_area_mismatch",
                format!(
                    "generated floor area {:.1} m² deviates {:.1}% from the reported {:.1} m²",
                    generated,
                    deviation * 100.0,
                    reported
                ),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"{
        "name": "Office",
        "footprint": [[0, 0], [20, 0], [20, 10], [0, 10]],
        "story_count": 2,
        "story_height": 3.5,
        "window_to_wall_ratio": 0.3,
        "zone_layout": { "type": "perimeter_core", "depth": 4.0 },
        "climate_zone": 5,
        "construction_era": "post_1980",
        "system_type": "vav_reheat",
        "economizer": true,
        "schema_version": "9.6",
        "floor_area": 400.0
    }"#;

    #[test]
    fn parses_full_request() {
        let request = GenerationRequest::from_json(JSON).unwrap();
        assert_eq!(request.story_count, 2);
        assert_eq!(request.zone_layout, ZoneLayout::PerimeterCore { depth: 4.0 });
        assert_eq!(request.climate_zone.number(), 5);
        assert_eq!(request.construction_era, ConstructionEra::Post1980);
        assert_eq!(request.schema_version, SchemaVersion::V9_6);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn defaults_apply() {
        let json = r#"{
            "name": "Shed",
            "footprint": [[0, 0], [5, 0], [5, 5], [0, 5]],
            "story_count": 1,
            "story_height": 3.0,
            "climate_zone": 2
        }"#;
        let request = GenerationRequest::from_json(json).unwrap();
        assert_eq!(request.zone_layout, ZoneLayout::SingleZone);
        assert_eq!(request.system_type, SystemType::VavReheat);
        assert_eq!(request.schema_version, SchemaVersion::V23_2);
        assert_eq!(request.north_axis, 0.0);
        assert!(request.floor_area.is_none());
    }

    #[test]
    fn rejects_bad_requests() {
        assert!(GenerationRequest::from_json("{}").is_err());
        let mut request = GenerationRequest::from_json(JSON).unwrap();
        request.name = "A;B".to_string();
        assert!(matches!(request.validate(), Err(Error::InvalidRequest(_))));

        let bad_climate = JSON.replace("\"climate_zone\": 5", "\"climate_zone\": 9");
        assert!(GenerationRequest::from_json(&bad_climate).is_err());
    }

    #[test]
    fn floor_area_cross_check() {
        let request = GenerationRequest::from_json(JSON).unwrap();
        assert!(request.check_floor_area(410.0).is_none());
        let warning = request.check_floor_area(300.0).unwrap();
        assert_eq!(warning.code, "floor_area_mismatch");
    }

    #[test]
    fn north_axis_wraps() {
        let mut request = GenerationRequest::from_json(JSON).unwrap();
        request.north_axis = -90.0;
        assert_eq!(request.north_axis_degrees(), 270.0);
    }
}
