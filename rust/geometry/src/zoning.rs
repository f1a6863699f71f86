// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Story subdivision
//!
//! Splits a footprint into zone outlines: either the whole footprint, or one
//! perimeter strip per footprint edge around a core obtained by a mitered
//! inward offset.

use nalgebra::{Point2, Vector2};

use crate::footprint::{compute_signed_area, is_simple, Footprint};
use crate::tolerance::Tolerances;
use crate::warning::GeometryWarning;

/// How each story is divided into zones
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum ZoneLayout {
    /// One zone per story
    #[default]
    SingleZone,
    /// Perimeter strips of the given depth around a core zone
    PerimeterCore { depth: f64 },
}

/// Role of a zone outline within its story
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneRole {
    Whole,
    Core,
    /// Perimeter strip along footprint edge `n` (1-based)
    Perimeter(usize),
}

impl ZoneRole {
    /// Zone name for a story
    pub fn zone_name(&self, story: u32) -> String {
        match self {
            ZoneRole::Whole => format!("Story{}", story),
            ZoneRole::Core => format!("Story{}_Core", story),
            ZoneRole::Perimeter(n) => format!("Story{}_Perim{}", story, n),
        }
    }
}

/// 2D outline of one zone, counter-clockwise
#[derive(Debug, Clone, PartialEq)]
pub struct ZonePlan {
    pub role: ZoneRole,
    pub outline: Vec<Point2<f64>>,
}

impl ZonePlan {
    pub fn area(&self) -> f64 {
        compute_signed_area(&self.outline)
    }
}

/// Divide a footprint into zone plans, falling back to a single zone when
/// the perimeter/core split is not geometrically possible
pub fn subdivide(
    footprint: &Footprint,
    layout: ZoneLayout,
    tolerances: &Tolerances,
) -> (Vec<ZonePlan>, Vec<GeometryWarning>) {
    let whole = || ZonePlan {
        role: ZoneRole::Whole,
        outline: footprint.points().to_vec(),
    };

    match layout {
        ZoneLayout::SingleZone => (vec![whole()], Vec::new()),
        ZoneLayout::PerimeterCore { depth } => match perimeter_core(footprint, depth, tolerances) {
            Ok(plans) => (plans, Vec::new()),
            Err(reason) => (
                vec![whole()],
                vec![GeometryWarning::LayoutFallback { reason }],
            ),
        },
    }
}

fn perimeter_core(
    footprint: &Footprint,
    depth: f64,
    tolerances: &Tolerances,
) -> std::result::Result<Vec<ZonePlan>, String> {
    if !depth.is_finite() || depth <= 0.0 {
        return Err(format!("perimeter depth {} is not positive", depth));
    }

    let outer = footprint.points();
    let core = inset(outer, depth).ok_or_else(|| "inset has parallel opposing edges".to_string())?;

    let n = outer.len();
    for i in 0..n {
        let j = (i + 1) % n;
        let original = outer[j] - outer[i];
        let shifted = core[j] - core[i];
        if original.dot(&shifted) <= 0.0 {
            return Err(format!("edge {} collapses at depth {}", i + 1, depth));
        }
    }

    let core_area = compute_signed_area(&core);
    if core_area < tolerances.min_area {
        return Err(format!("core area {:.3} m² too small", core_area));
    }
    if !is_simple(&core) {
        return Err("inset core self-intersects".to_string());
    }

    let mut plans = Vec::with_capacity(n + 1);
    for i in 0..n {
        let j = (i + 1) % n;
        let outline = vec![outer[i], outer[j], core[j], core[i]];
        let area = compute_signed_area(&outline);
        if area < tolerances.min_area || !is_simple(&outline) {
            return Err(format!("perimeter strip {} is degenerate", i + 1));
        }
        plans.push(ZonePlan {
            role: ZoneRole::Perimeter(i + 1),
            outline,
        });
    }
    plans.push(ZonePlan {
        role: ZoneRole::Core,
        outline: core,
    });

    Ok(plans)
}

/// Mitered inward offset of a counter-clockwise contour
fn inset(contour: &[Point2<f64>], depth: f64) -> Option<Vec<Point2<f64>>> {
    let n = contour.len();
    let inward = |a: &Point2<f64>, b: &Point2<f64>| -> Option<Vector2<f64>> {
        let d = b - a;
        let len = d.norm();
        (len > 0.0).then(|| Vector2::new(-d.y, d.x) / len)
    };

    (0..n)
        .map(|i| {
            let prev = &contour[(i + n - 1) % n];
            let curr = &contour[i];
            let next = &contour[(i + 1) % n];
            let n1 = inward(prev, curr)?;
            let n2 = inward(curr, next)?;
            let denom = 1.0 + n1.dot(&n2);
            if denom < 1e-6 {
                return None;
            }
            Some(*curr + (n1 + n2) * (depth / denom))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn footprint(points: &[[f64; 2]]) -> Footprint {
        Footprint::new(points, &Tolerances::default()).unwrap().0
    }

    #[test]
    fn test_single_zone() {
        let fp = footprint(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]);
        let (plans, warnings) = subdivide(&fp, ZoneLayout::SingleZone, &Tolerances::default());
        assert_eq!(plans.len(), 1);
        assert!(warnings.is_empty());
        assert_eq!(plans[0].role.zone_name(2), "Story2");
    }

    #[test]
    fn test_perimeter_core_square() {
        let fp = footprint(&[[0.0, 0.0], [20.0, 0.0], [20.0, 20.0], [0.0, 20.0]]);
        let (plans, warnings) = subdivide(
            &fp,
            ZoneLayout::PerimeterCore { depth: 4.0 },
            &Tolerances::default(),
        );
        assert!(warnings.is_empty());
        assert_eq!(plans.len(), 5);
        let total: f64 = plans.iter().map(|p| p.area()).sum();
        assert_relative_eq!(total, 400.0, epsilon = 1e-9);
        let core = plans.last().unwrap();
        assert_eq!(core.role, ZoneRole::Core);
        assert_relative_eq!(core.area(), 144.0, epsilon = 1e-9);
        assert_eq!(plans[0].role.zone_name(1), "Story1_Perim1");
    }

    #[test]
    fn test_perimeter_core_l_shape() {
        let fp = footprint(&[
            [0.0, 0.0],
            [30.0, 0.0],
            [30.0, 10.0],
            [10.0, 10.0],
            [10.0, 30.0],
            [0.0, 30.0],
        ]);
        let (plans, warnings) = subdivide(
            &fp,
            ZoneLayout::PerimeterCore { depth: 2.0 },
            &Tolerances::default(),
        );
        assert!(warnings.is_empty());
        let total: f64 = plans.iter().map(|p| p.area()).sum();
        assert_relative_eq!(total, fp.area(), epsilon = 1e-9);
    }

    #[test]
    fn test_too_deep_falls_back() {
        let fp = footprint(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]);
        let (plans, warnings) = subdivide(
            &fp,
            ZoneLayout::PerimeterCore { depth: 6.0 },
            &Tolerances::default(),
        );
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].role, ZoneRole::Whole);
        assert!(matches!(warnings[0], GeometryWarning::LayoutFallback { .. }));
    }
}
