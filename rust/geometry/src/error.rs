// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during geometry processing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Degenerate polygon: {0}")]
    DegeneratePolygon(String),

    #[error("Self-intersecting polygon: {0}")]
    SelfIntersecting(String),

    #[error("Non-planar polygon: deviation {deviation:.6} m exceeds {tolerance} m")]
    NonPlanar { deviation: f64, tolerance: f64 },

    #[error("Invalid building parameters: {0}")]
    InvalidParameters(String),

    #[error("No valid zones remain")]
    EmptyModel,
}
