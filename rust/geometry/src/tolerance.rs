// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometric tolerances

/// Thresholds shared by every geometry operation, in meters and square meters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Tolerances {
    /// Consecutive vertices closer than this are merged
    pub vertex_merge: f64,
    /// Polygons below this area are degenerate
    pub min_area: f64,
    /// Footprint edges shorter than this produce no wall
    pub min_wall_length: f64,
    /// Maximum vertex distance from the polygon plane
    pub planarity: f64,
    /// Minimum margin between a window and its wall's edges
    pub window_inset: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            vertex_merge: 0.01,
            min_area: 0.01,
            min_wall_length: 0.1,
            planarity: 1e-4,
            window_inset: 0.025,
        }
    }
}
