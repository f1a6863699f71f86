// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D footprint repair
//!
//! Cleans up the outline handed in by the caller before anything is extruded:
//! closing vertices, near-duplicates, zero-area spikes, winding, and
//! self-intersections. Self-intersections are resolved with a polygon union
//! of the contour with itself under the non-zero fill rule (i_overlay), the
//! equivalent of a zero-width buffer.

use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;

use crate::error::{Error, Result};
use crate::polygon::{has_self_intersection, orient};
use crate::tolerance::Tolerances;
use crate::warning::GeometryWarning;

/// Relative cross-product threshold for collinear vertices
const SPIKE_EPSILON: f64 = 1e-9;

/// Repaired, counter-clockwise outer contour of a building
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    points: Vec<Point2<f64>>,
}

impl Footprint {
    /// Repair and validate a footprint
    pub fn new(
        points: &[[f64; 2]],
        tolerances: &Tolerances,
    ) -> Result<(Self, Vec<GeometryWarning>)> {
        let mut warnings = Vec::new();

        if points.iter().any(|p| !p[0].is_finite() || !p[1].is_finite()) {
            return Err(Error::InvalidParameters(
                "footprint contains non-finite coordinates".to_string(),
            ));
        }

        let mut contour: Vec<Point2<f64>> = points.iter().map(|p| Point2::new(p[0], p[1])).collect();

        let removed = merge_duplicates(&mut contour, tolerances.vertex_merge);
        if removed > 0 {
            warnings.push(GeometryWarning::DuplicateVerticesRemoved { count: removed });
        }

        let spikes = remove_collinear(&mut contour);
        if spikes > 0 {
            warnings.push(GeometryWarning::FootprintRepaired {
                detail: format!("removed {} collinear or spike vertices", spikes),
            });
        }

        if contour.len() < 3 {
            return Err(Error::DegeneratePolygon(format!(
                "footprint has {} distinct vertices",
                contour.len()
            )));
        }

        if has_self_intersection(&contour) {
            contour = union_self(&contour, tolerances)?;
            warnings.push(GeometryWarning::FootprintRepaired {
                detail: "resolved self-intersection".to_string(),
            });
        }

        let contour = ensure_ccw(&contour);
        let area = compute_signed_area(&contour);
        if area < tolerances.min_area {
            return Err(Error::DegeneratePolygon(format!(
                "footprint area {:.6} m² below minimum",
                area
            )));
        }

        Ok((Self { points: contour }, warnings))
    }

    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    pub fn area(&self) -> f64 {
        compute_signed_area(&self.points)
    }

    /// Directed edges in counter-clockwise order
    pub fn edges(&self) -> impl Iterator<Item = (Point2<f64>, Point2<f64>)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    pub fn perimeter(&self) -> f64 {
        self.edges().map(|(a, b)| (b - a).norm()).sum()
    }
}

/// Drop an explicit closing vertex and consecutive points closer than `distance`
fn merge_duplicates(contour: &mut Vec<Point2<f64>>, distance: f64) -> usize {
    let before = contour.len();
    let mut kept: Vec<Point2<f64>> = Vec::with_capacity(before);
    for p in contour.iter() {
        if kept.last().map_or(true, |last| (p - last).norm() >= distance) {
            kept.push(*p);
        }
    }
    while kept.len() > 1 && (kept[0] - kept[kept.len() - 1]).norm() < distance {
        kept.pop();
    }
    *contour = kept;
    before - contour.len()
}

/// Remove vertices whose neighbours are collinear with them, which covers
/// zero-area spikes (direction reversal) as well as redundant mid-edge points
fn remove_collinear(contour: &mut Vec<Point2<f64>>) -> usize {
    let mut removed = 0;
    let mut changed = true;
    while changed && contour.len() >= 3 {
        changed = false;
        let n = contour.len();
        for i in 0..n {
            let prev = contour[(i + n - 1) % n];
            let curr = contour[i];
            let next = contour[(i + 1) % n];
            let scale = (curr - prev).norm() * (next - curr).norm();
            if scale == 0.0 || orient(&prev, &curr, &next).abs() <= SPIKE_EPSILON * scale {
                contour.remove(i);
                removed += 1;
                changed = true;
                break;
            }
        }
    }
    removed
}

/// Zero-width buffer: union of the contour with itself under the non-zero rule.
/// Only a single outer contour without holes is accepted.
pub(crate) fn union_self(contour: &[Point2<f64>], tolerances: &Tolerances) -> Result<Vec<Point2<f64>>> {
    let subject = vec![contour_to_path(contour)];
    let clip: Vec<Vec<[f64; 2]>> = Vec::new();
    let shapes = subject.overlay(&clip, OverlayRule::Union, FillRule::NonZero);

    let mut outers: Vec<Vec<Point2<f64>>> = Vec::new();
    for shape in &shapes {
        if shape.len() > 1 {
            return Err(Error::SelfIntersecting(
                "outline resolves to a shape with holes".to_string(),
            ));
        }
        if let Some(outer) = shape.first() {
            let points: Vec<Point2<f64>> = outer.iter().map(|p| Point2::new(p[0], p[1])).collect();
            if compute_signed_area(&points).abs() >= tolerances.min_area {
                outers.push(points);
            }
        }
    }

    match outers.len() {
        1 => {
            let mut outer = outers.remove(0);
            merge_duplicates(&mut outer, tolerances.vertex_merge);
            remove_collinear(&mut outer);
            if outer.len() < 3 || has_self_intersection(&outer) {
                return Err(Error::SelfIntersecting(
                    "outline could not be resolved to a simple contour".to_string(),
                ));
            }
            Ok(outer)
        }
        0 => Err(Error::SelfIntersecting(
            "outline resolves to no area".to_string(),
        )),
        n => Err(Error::SelfIntersecting(format!(
            "outline resolves to {} separate contours",
            n
        ))),
    }
}

/// Compute the signed area of a 2D contour
/// Positive = counter-clockwise, Negative = clockwise
pub fn compute_signed_area(contour: &[Point2<f64>]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let n = contour.len();

    for i in 0..n {
        let j = (i + 1) % n;
        area += contour[i].x * contour[j].y;
        area -= contour[j].x * contour[i].y;
    }

    area * 0.5
}

/// Ensure contour has counter-clockwise winding (positive area)
pub fn ensure_ccw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let area = compute_signed_area(contour);
    if area < 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Whether a closed contour is free of self-intersections
pub fn is_simple(contour: &[Point2<f64>]) -> bool {
    !has_self_intersection(contour)
}

/// Check if a point is inside a contour using ray casting
pub fn point_in_contour(point: &Point2<f64>, contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    let mut inside = false;
    let n = contour.len();

    let mut j = n - 1;
    for i in 0..n {
        let pi = &contour[i];
        let pj = &contour[j];

        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Convert a Point2 contour to i_overlay path format
fn contour_to_path(contour: &[Point2<f64>]) -> Vec<[f64; 2]> {
    contour.iter().map(|p| [p.x, p.y]).collect()
}
