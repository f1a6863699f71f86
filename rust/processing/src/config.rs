// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generator configuration.

use bemgen_core::choices::ReportingFrequency;
use bemgen_core::RESERVED_CHARACTERS;
use bemgen_geometry::Tolerances;
use bemgen_topology::HvacDefaults;
use serde::{Deserialize, Serialize};

use crate::autofix::AutoFixPolicy;
use crate::error::{Error, Result};

/// Report variables requested from the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub variables: Vec<String>,
    pub frequency: ReportingFrequency,
    /// Write results to the SQLite output as well
    pub sqlite: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            variables: vec![
                "Zone Mean Air Temperature".to_string(),
                "Zone Air System Sensible Heating Energy".to_string(),
                "Zone Air System Sensible Cooling Energy".to_string(),
                "Facility Total Electricity Demand Rate".to_string(),
            ],
            frequency: ReportingFrequency::Hourly,
            sqlite: true,
        }
    }
}

/// Tunables shared by every request of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub tolerances: Tolerances,
    pub hvac: HvacDefaults,
    pub autofix: AutoFixPolicy,
    /// Simulation timesteps per hour
    pub timestep: u32,
    pub outputs: OutputSettings,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default(),
            hvac: HvacDefaults::default(),
            autofix: AutoFixPolicy::default(),
            timestep: 6,
            outputs: OutputSettings::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: GeneratorConfig =
            serde_json::from_str(json).map_err(|e| Error::InvalidRequest(format!("config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timestep == 0 || self.timestep > 60 || 60 % self.timestep != 0 {
            return Err(Error::InvalidRequest(format!(
                "timestep {} must divide an hour evenly",
                self.timestep
            )));
        }
        let t = &self.tolerances;
        let positive = [t.vertex_merge, t.min_area, t.min_wall_length, t.planarity];
        if positive.iter().any(|v| !v.is_finite() || *v <= 0.0) || t.window_inset < 0.0 {
            return Err(Error::InvalidRequest("tolerances must be positive".to_string()));
        }
        if let Some(v) = self
            .outputs
            .variables
            .iter()
            .find(|v| v.trim().is_empty() || v.contains(RESERVED_CHARACTERS))
        {
            return Err(Error::InvalidRequest(format!("output variable '{}' is not a valid name", v)));
        }
        if self.autofix.max_repair_passes == 0 {
            return Err(Error::InvalidRequest("at least one repair pass is required".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = GeneratorConfig::from_json(r#"{ "timestep": 4, "outputs": { "sqlite": false } }"#).unwrap();
        assert_eq!(config.timestep, 4);
        assert!(!config.outputs.sqlite);
        assert_eq!(config.outputs.frequency, ReportingFrequency::Hourly);
        assert_eq!(config.tolerances, Tolerances::default());
        assert!(config.autofix.repair_node_collisions);
    }

    #[test]
    fn output_variables_cannot_split_records() {
        let err = GeneratorConfig::from_json(
            r#"{ "outputs": { "variables": ["Zone Mean Air Temperature, Hourly"] } }"#,
        );
        assert!(matches!(err, Err(Error::InvalidRequest(_))));
        assert!(GeneratorConfig::from_json(r#"{ "outputs": { "variables": [""] } }"#).is_err());
    }

    #[test]
    fn timestep_must_divide_an_hour() {
        assert!(GeneratorConfig::from_json(r#"{ "timestep": 7 }"#).is_err());
        assert!(GeneratorConfig::from_json(r#"{ "timestep": 0 }"#).is_err());
        assert!(GeneratorConfig::default().validate().is_ok());
    }
}
