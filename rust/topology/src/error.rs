// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for flow graph operations.

use crate::validate::Violation;

/// Result type alias for flow graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or editing a flow graph.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The graph breaks one or more connection rules.
    #[error("{} connection violation(s), first: {}", .0.len(), .0.first().map(|v| v.to_string()).unwrap_or_default())]
    Violations(Vec<Violation>),

    /// A component key does not resolve in the graph.
    #[error("component not found: {0}")]
    ComponentNotFound(String),

    /// A loop key does not resolve in the graph.
    #[error("air loop not found: {0}")]
    LoopNotFound(String),

    /// Builder inputs are out of range or inconsistent.
    #[error("invalid HVAC options: {0}")]
    InvalidOptions(String),

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}
