// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building surfaces and the orientation contract
//!
//! Tilt is the angle between the outward normal and +Z: roofs and ceilings
//! face up (0°), walls and windows are vertical (90°), floors face down
//! (180°). Vertices of walls start at the upper-left corner seen from outside
//! and run counter-clockwise.

use std::fmt;

use nalgebra::Point2;

use crate::footprint::point_in_contour;
use crate::polygon::Polygon3;

/// Maximum deviation from the expected tilt, degrees
pub const TILT_TOLERANCE: f64 = 1.0;

/// Probe distance used to test which side of a wall is inside its zone
const INSIDE_PROBE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SurfaceType {
    Floor,
    Wall,
    Ceiling,
    Roof,
    Window,
}

impl SurfaceType {
    /// Tilt the outward normal must have, degrees
    pub fn expected_tilt(&self) -> f64 {
        match self {
            SurfaceType::Roof | SurfaceType::Ceiling => 0.0,
            SurfaceType::Wall | SurfaceType::Window => 90.0,
            SurfaceType::Floor => 180.0,
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, SurfaceType::Floor | SurfaceType::Ceiling | SurfaceType::Roof)
    }
}

/// What lies on the other side of a surface
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Boundary {
    Outdoors,
    Ground,
    /// Interzone surface; names the partner surface
    Surface(String),
    Adiabatic,
}

impl Boundary {
    pub fn partner(&self) -> Option<&str> {
        match self {
            Boundary::Surface(name) => Some(name),
            _ => None,
        }
    }
}

/// Thermal role of a surface, mapped to a construction by reference data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstructionRole {
    ExteriorWall,
    InteriorWall,
    Roof,
    InteriorCeiling,
    InteriorFloor,
    GroundFloor,
    Window,
}

impl ConstructionRole {
    pub const ALL: &'static [ConstructionRole] = &[
        ConstructionRole::ExteriorWall,
        ConstructionRole::InteriorWall,
        ConstructionRole::Roof,
        ConstructionRole::InteriorCeiling,
        ConstructionRole::InteriorFloor,
        ConstructionRole::GroundFloor,
        ConstructionRole::Window,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConstructionRole::ExteriorWall => "exterior_wall",
            ConstructionRole::InteriorWall => "interior_wall",
            ConstructionRole::Roof => "roof",
            ConstructionRole::InteriorCeiling => "interior_ceiling",
            ConstructionRole::InteriorFloor => "interior_floor",
            ConstructionRole::GroundFloor => "ground_floor",
            ConstructionRole::Window => "window",
        }
    }
}

impl fmt::Display for ConstructionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A boundary element of a zone
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub name: String,
    pub zone: String,
    pub surface_type: SurfaceType,
    pub boundary: Boundary,
    pub construction: ConstructionRole,
    pub polygon: Polygon3,
    /// Host wall of a window
    pub parent: Option<String>,
}

impl Surface {
    pub fn tilt(&self) -> Option<f64> {
        self.polygon.tilt()
    }

    pub fn area(&self) -> f64 {
        self.polygon.area()
    }

    pub fn is_window(&self) -> bool {
        self.surface_type == SurfaceType::Window
    }

    /// Whether the computed tilt matches the declared type
    pub fn tilt_matches(&self) -> bool {
        self.tilt()
            .is_some_and(|t| (t - self.surface_type.expected_tilt()).abs() <= TILT_TOLERANCE)
    }

    /// Reverse the polygon if its tilt disagrees with the declared type.
    /// Returns whether the polygon was reversed.
    pub fn orient(&mut self) -> bool {
        let Some(normal) = self.polygon.normal() else {
            return false;
        };
        let flip = match self.surface_type {
            SurfaceType::Roof | SurfaceType::Ceiling => normal.z < 0.0,
            SurfaceType::Floor => normal.z > 0.0,
            SurfaceType::Wall | SurfaceType::Window => false,
        };
        if flip {
            self.polygon.reverse();
        }
        flip
    }

    /// Reverse a wall whose normal points into its zone's outline.
    /// Returns whether the polygon was reversed.
    pub fn orient_outward(&mut self, outline: &[Point2<f64>]) -> bool {
        if self.surface_type.is_horizontal() {
            return false;
        }
        let Some(normal) = self.polygon.normal() else {
            return false;
        };
        let c = self.polygon.centroid();
        let behind = Point2::new(c.x - normal.x * INSIDE_PROBE, c.y - normal.y * INSIDE_PROBE);
        let flip = !point_in_contour(&behind, outline);
        if flip {
            self.polygon.reverse();
        }
        flip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn outline() -> Vec<Point2<f64>> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
            Point2::new(0.0, 10.0),
        ]
    }

    fn surface(surface_type: SurfaceType, polygon: Polygon3) -> Surface {
        Surface {
            name: "S".to_string(),
            zone: "Z".to_string(),
            surface_type,
            boundary: Boundary::Outdoors,
            construction: ConstructionRole::Roof,
            polygon,
            parent: None,
        }
    }

    #[test]
    fn test_orient_flips_downward_roof() {
        let mut roof = surface(
            SurfaceType::Roof,
            Polygon3::horizontal(&outline(), 3.0).reversed(),
        );
        assert!(!roof.tilt_matches());
        assert!(roof.orient());
        assert!(roof.tilt_matches());
        assert_relative_eq!(roof.tilt().unwrap(), 0.0);
        assert!(!roof.orient());
    }

    #[test]
    fn test_orient_flips_upward_floor() {
        let mut floor = surface(SurfaceType::Floor, Polygon3::horizontal(&outline(), 0.0));
        assert!(floor.orient());
        assert_relative_eq!(floor.tilt().unwrap(), 180.0);
    }

    #[test]
    fn test_orient_outward_wall() {
        // Inward-facing south wall
        let mut wall = surface(
            SurfaceType::Wall,
            Polygon3::new(vec![
                Point3::new(10.0, 0.0, 3.0),
                Point3::new(10.0, 0.0, 0.0),
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(0.0, 0.0, 3.0),
            ]),
        );
        assert!(wall.orient_outward(&outline()));
        assert_relative_eq!(wall.polygon.normal().unwrap().y, -1.0);
        assert!(!wall.orient_outward(&outline()));
    }
}
