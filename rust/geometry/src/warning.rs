// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Non-fatal geometry findings

use std::fmt;

/// A repair or simplification the geometry engine applied
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GeometryWarning {
    DuplicateVerticesRemoved { count: usize },
    FootprintRepaired { detail: String },
    DegenerateWallsSkipped { zone: String, count: usize },
    WindowRatioReduced { wall: String, requested: f64, achieved: f64 },
    LayoutFallback { reason: String },
    SurfaceRepaired { surface: String },
    SurfaceDropped { surface: String, reason: String },
    ZoneDropped { zone: String, reason: String },
}

impl GeometryWarning {
    /// Stable identifier for machine consumers
    pub fn code(&self) -> &'static str {
        match self {
            GeometryWarning::DuplicateVerticesRemoved { .. } => "duplicate_vertices_removed",
            GeometryWarning::FootprintRepaired { .. } => "footprint_repaired",
            GeometryWarning::DegenerateWallsSkipped { .. } => "degenerate_walls_skipped",
            GeometryWarning::WindowRatioReduced { .. } => "window_ratio_reduced",
            GeometryWarning::LayoutFallback { .. } => "layout_fallback",
            GeometryWarning::SurfaceRepaired { .. } => "surface_repaired",
            GeometryWarning::SurfaceDropped { .. } => "surface_dropped",
            GeometryWarning::ZoneDropped { .. } => "zone_dropped",
        }
    }
}

impl fmt::Display for GeometryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryWarning::DuplicateVerticesRemoved { count } => {
                write!(f, "removed {} duplicate footprint vertices", count)
            }
            GeometryWarning::FootprintRepaired { detail } => {
                write!(f, "footprint repaired: {}", detail)
            }
            GeometryWarning::DegenerateWallsSkipped { zone, count } => {
                write!(f, "zone {}: skipped {} degenerate walls", zone, count)
            }
            GeometryWarning::WindowRatioReduced {
                wall,
                requested,
                achieved,
            } => write!(
                f,
                "wall {}: window ratio reduced from {:.3} to {:.3} to keep the edge margin",
                wall, requested, achieved
            ),
            GeometryWarning::LayoutFallback { reason } => {
                write!(f, "perimeter/core layout not possible, using a single zone per story: {}", reason)
            }
            GeometryWarning::SurfaceRepaired { surface } => {
                write!(f, "surface {} was self-intersecting and has been buffered", surface)
            }
            GeometryWarning::SurfaceDropped { surface, reason } => {
                write!(f, "surface {} dropped: {}", surface, reason)
            }
            GeometryWarning::ZoneDropped { zone, reason } => {
                write!(f, "zone {} dropped: {}", zone, reason)
            }
        }
    }
}
