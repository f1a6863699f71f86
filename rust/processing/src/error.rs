// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the generation pipeline.

use thiserror::Error;

/// Result type alias for generation.
pub type Result<T> = std::result::Result<T, Error>;

/// Cross-reference failures between emitted objects and reference data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReferenceError {
    #[error("surface '{surface}' uses construction '{construction}', which is not defined")]
    MissingConstruction { surface: String, construction: String },

    #[error("construction '{construction}' uses layer '{material}', which is not defined")]
    MissingMaterial { construction: String, material: String },

    #[error("zone '{0}' is bounded by no surface")]
    ZoneWithoutSurfaces(String),

    #[error("surface '{surface}' belongs to zone '{zone}', which is not defined")]
    UnknownZone { surface: String, zone: String },

    #[error("invalid reference data: {0}")]
    InvalidReferenceData(String),
}

/// Any failure that stops a generation run. No document is produced.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("geometry error: {0}")]
    Geometry(#[from] bemgen_geometry::Error),

    #[error("graph error: {0}")]
    Graph(#[from] bemgen_topology::Error),

    #[error("schema error: {0}")]
    Schema(#[from] bemgen_core::Error),

    #[error("reference error: {0}")]
    Reference(#[from] ReferenceError),
}

impl Error {
    /// Short class name used in logs and CLI output.
    pub fn class(&self) -> &'static str {
        match self {
            Error::InvalidRequest(_) => "request",
            Error::Geometry(_) => "geometry",
            Error::Graph(_) => "graph",
            Error::Schema(_) => "schema",
            Error::Reference(_) => "reference",
        }
    }
}

impl From<Vec<bemgen_topology::Violation>> for Error {
    fn from(violations: Vec<bemgen_topology::Violation>) -> Self {
        Error::Graph(bemgen_topology::Error::Violations(violations))
    }
}
