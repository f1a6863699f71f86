// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structured non-fatal warnings returned with every generated model.

use std::fmt;

use bemgen_geometry::GeometryWarning;
use bemgen_topology::HvacWarning;
use serde::{Deserialize, Serialize};

/// Pipeline stage that raised a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Request,
    Geometry,
    AutoFix,
    Hvac,
    Serializer,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Request => "request",
            Stage::Geometry => "geometry",
            Stage::AutoFix => "auto_fix",
            Stage::Hvac => "hvac",
            Stage::Serializer => "serializer",
        }
    }
}

/// A repair, simplification or cross-check finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub stage: Stage,
    /// Stable identifier, e.g. `window_ratio_reduced`
    pub code: String,
    pub message: String,
}

impl Warning {
    pub fn new(stage: Stage, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage,
            code: code.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}] {}", self.stage.as_str(), self.code, self.message)
    }
}

impl From<&GeometryWarning> for Warning {
    fn from(w: &GeometryWarning) -> Self {
        Warning::new(Stage::Geometry, w.code(), w.to_string())
    }
}

impl From<&HvacWarning> for Warning {
    fn from(w: &HvacWarning) -> Self {
        Warning::new(Stage::Hvac, w.code(), w.to_string())
    }
}
