// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! bemgen Geometry
//!
//! Turns a 2D footprint and story parameters into thermal zones bounded by
//! planar, outward-facing surfaces, using nalgebra for vector math and
//! i_overlay for footprint repair.
//!
//! ```
//! use bemgen_geometry::{generate_building, BuildingParams, Tolerances, ZoneLayout};
//!
//! let params = BuildingParams {
//!     footprint: vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]],
//!     story_count: 2,
//!     story_height: 3.0,
//!     window_to_wall_ratio: 0.3,
//!     zone_layout: ZoneLayout::SingleZone,
//! };
//! let output = generate_building(&params, &Tolerances::default()).unwrap();
//! assert_eq!(output.zones.len(), 2);
//! ```

pub mod building;
pub mod error;
pub mod fenestration;
pub mod footprint;
pub mod polygon;
pub mod surface;
pub mod tolerance;
pub mod warning;
pub mod zoning;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector3};

pub use building::{generate_building, BuildingParams, GeometryOutput, Zone};
pub use error::{Error, Result};
pub use fenestration::{carve_window, CarvedWindow, MAX_WINDOW_RATIO};
pub use footprint::{compute_signed_area, point_in_contour, Footprint};
pub use polygon::Polygon3;
pub use surface::{Boundary, ConstructionRole, Surface, SurfaceType, TILT_TOLERANCE};
pub use tolerance::Tolerances;
pub use warning::GeometryWarning;
pub use zoning::{subdivide, ZoneLayout, ZonePlan, ZoneRole};
