// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar 3D polygons
//!
//! Normals follow the right-hand rule over the vertex order and are computed
//! with Newell's method, which is robust for concave and slightly non-planar
//! polygons.

use nalgebra::{Point2, Point3, Vector3};

use crate::error::{Error, Result};
use crate::footprint::union_self;
use crate::tolerance::Tolerances;

/// Epsilon for orientation predicates
const EPSILON: f64 = 1e-9;

/// Ordered vertex loop, implicitly closed
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon3 {
    vertices: Vec<Point3<f64>>,
}

impl Polygon3 {
    pub fn new(vertices: Vec<Point3<f64>>) -> Self {
        Self { vertices }
    }

    /// Horizontal polygon from a 2D outline at an elevation
    pub fn horizontal(outline: &[Point2<f64>], z: f64) -> Self {
        Self::new(outline.iter().map(|p| Point3::new(p.x, p.y, z)).collect())
    }

    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Unnormalized Newell normal; its length is twice the area
    pub fn newell(&self) -> Vector3<f64> {
        let mut normal = Vector3::new(0.0, 0.0, 0.0);
        let n = self.vertices.len();

        for i in 0..n {
            let curr = &self.vertices[i];
            let next = &self.vertices[(i + 1) % n];

            normal.x += (curr.y - next.y) * (curr.z + next.z);
            normal.y += (curr.z - next.z) * (curr.x + next.x);
            normal.z += (curr.x - next.x) * (curr.y + next.y);
        }

        normal
    }

    /// Unit normal, `None` for degenerate polygons
    pub fn normal(&self) -> Option<Vector3<f64>> {
        if self.vertices.len() < 3 {
            return None;
        }
        let normal = self.newell();
        let len = normal.norm();
        if len < 1e-15 {
            return None;
        }
        Some(normal / len)
    }

    pub fn area(&self) -> f64 {
        self.newell().norm() * 0.5
    }

    /// Vertex average
    pub fn centroid(&self) -> Point3<f64> {
        if self.vertices.is_empty() {
            return Point3::origin();
        }
        let sum = self
            .vertices
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords);
        Point3::from(sum / self.vertices.len() as f64)
    }

    /// Angle between the normal and +Z in degrees: 0 faces up, 90 vertical, 180 down
    pub fn tilt(&self) -> Option<f64> {
        let n = self.normal()?;
        Some(n.z.clamp(-1.0, 1.0).acos().to_degrees())
    }

    /// Compass bearing of the normal in degrees, clockwise from +Y (north)
    pub fn azimuth(&self) -> Option<f64> {
        let n = self.normal()?;
        if n.x.abs() < EPSILON && n.y.abs() < EPSILON {
            return Some(0.0);
        }
        let deg = n.x.atan2(n.y).to_degrees();
        Some(if deg < 0.0 { deg + 360.0 } else { deg })
    }

    /// Reverse the winding while keeping the first vertex in place
    pub fn reverse(&mut self) {
        if self.vertices.len() > 1 {
            self.vertices[1..].reverse();
        }
    }

    pub fn reversed(&self) -> Self {
        let mut copy = self.clone();
        copy.reverse();
        copy
    }

    /// Shift every vertex vertically
    pub fn translated_z(&self, dz: f64) -> Self {
        Self::new(
            self.vertices
                .iter()
                .map(|p| Point3::new(p.x, p.y, p.z + dz))
                .collect(),
        )
    }

    /// Remove near-duplicate consecutive vertices, including the closing pair.
    /// Returns the number of vertices removed.
    pub fn repair(&mut self, merge_distance: f64) -> usize {
        let before = self.vertices.len();
        let mut kept: Vec<Point3<f64>> = Vec::with_capacity(before);
        for p in &self.vertices {
            if kept
                .last()
                .map_or(true, |last| (p - last).norm() >= merge_distance)
            {
                kept.push(*p);
            }
        }
        while kept.len() > 1 {
            let (first, last) = (kept[0], kept[kept.len() - 1]);
            if (first - last).norm() < merge_distance {
                kept.pop();
            } else {
                break;
            }
        }
        self.vertices = kept;
        before - self.vertices.len()
    }

    /// Largest distance of a vertex from the best-fit plane through the centroid
    pub fn max_plane_deviation(&self) -> f64 {
        let Some(n) = self.normal() else {
            return 0.0;
        };
        let c = self.centroid();
        self.vertices
            .iter()
            .map(|p| (p - c).dot(&n).abs())
            .fold(0.0, f64::max)
    }

    /// Vertices projected onto the coordinate plane that best preserves the shape
    pub fn project_2d(&self) -> Vec<Point2<f64>> {
        let n = self.newell();
        let (ax, ay, az) = (n.x.abs(), n.y.abs(), n.z.abs());
        self.vertices
            .iter()
            .map(|p| {
                if az >= ax && az >= ay {
                    Point2::new(p.x, p.y)
                } else if ax >= ay {
                    Point2::new(p.y, p.z)
                } else {
                    Point2::new(p.z, p.x)
                }
            })
            .collect()
    }

    /// Whether any two non-adjacent edges touch in the polygon's own plane
    pub fn is_self_intersecting(&self) -> bool {
        has_self_intersection(&self.project_2d())
    }

    /// Check the invariants every emitted polygon must satisfy
    pub fn validate(&self, tolerances: &Tolerances) -> Result<()> {
        if self.vertices.len() < 3 {
            return Err(Error::DegeneratePolygon(format!(
                "{} vertices",
                self.vertices.len()
            )));
        }
        let area = self.area();
        if area < tolerances.min_area {
            return Err(Error::DegeneratePolygon(format!("area {:.6} m²", area)));
        }
        let deviation = self.max_plane_deviation();
        if deviation > tolerances.planarity {
            return Err(Error::NonPlanar {
                deviation,
                tolerance: tolerances.planarity,
            });
        }
        if self.is_self_intersecting() {
            return Err(Error::SelfIntersecting(format!(
                "{} vertices",
                self.vertices.len()
            )));
        }
        Ok(())
    }

    /// Zero-width buffer in the polygon's own plane.
    ///
    /// The outline is projected, unioned with itself under the non-zero fill
    /// rule and lifted back onto the original plane with the original facing.
    /// Fails unless the fill resolves to exactly one simple contour.
    pub fn buffered(&self, tolerances: &Tolerances) -> Result<Polygon3> {
        let n = self.newell();
        if n.norm() < EPSILON {
            return Err(Error::DegeneratePolygon("no defined plane".to_string()));
        }
        let c = self.centroid();
        let (ax, ay, az) = (n.x.abs(), n.y.abs(), n.z.abs());
        let outline = union_self(&self.project_2d(), tolerances)?;

        let lifted = outline
            .iter()
            .map(|p| {
                if az >= ax && az >= ay {
                    let z = c.z - (n.x * (p.x - c.x) + n.y * (p.y - c.y)) / n.z;
                    Point3::new(p.x, p.y, z)
                } else if ax >= ay {
                    let x = c.x - (n.y * (p.x - c.y) + n.z * (p.y - c.z)) / n.x;
                    Point3::new(x, p.x, p.y)
                } else {
                    let y = c.y - (n.z * (p.x - c.z) + n.x * (p.y - c.x)) / n.y;
                    Point3::new(p.y, y, p.x)
                }
            })
            .collect();

        let mut buffered = Polygon3::new(lifted);
        if buffered.newell().dot(&n) < 0.0 {
            buffered.reverse();
        }
        Ok(buffered)
    }

    /// Validate, replacing a self-intersecting outline with its zero-width
    /// buffer when that validates. Returns whether the outline was replaced.
    pub fn validate_or_buffer(&mut self, tolerances: &Tolerances) -> Result<bool> {
        match self.validate(tolerances) {
            Ok(()) => Ok(false),
            Err(Error::SelfIntersecting(reason)) => {
                let buffered = self
                    .buffered(tolerances)
                    .map_err(|_| Error::SelfIntersecting(reason))?;
                buffered.validate(tolerances)?;
                *self = buffered;
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }

    /// Same vertex set within a distance, regardless of order and winding
    pub fn coincident_with(&self, other: &Polygon3, distance: f64) -> bool {
        self.vertices.len() == other.vertices.len()
            && self
                .vertices
                .iter()
                .all(|p| other.vertices.iter().any(|q| (p - q).norm() < distance))
    }
}

/// Orientation of the triangle (a, b, c): positive when counter-clockwise
#[inline]
pub(crate) fn orient(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

#[inline]
fn on_segment(a: &Point2<f64>, b: &Point2<f64>, p: &Point2<f64>) -> bool {
    p.x >= a.x.min(b.x) - EPSILON
        && p.x <= a.x.max(b.x) + EPSILON
        && p.y >= a.y.min(b.y) - EPSILON
        && p.y <= a.y.max(b.y) + EPSILON
}

/// Whether two closed segments intersect or touch
pub(crate) fn segments_intersect(
    a1: &Point2<f64>,
    a2: &Point2<f64>,
    b1: &Point2<f64>,
    b2: &Point2<f64>,
) -> bool {
    let d1 = orient(b1, b2, a1);
    let d2 = orient(b1, b2, a2);
    let d3 = orient(a1, a2, b1);
    let d4 = orient(a1, a2, b2);

    if ((d1 > EPSILON && d2 < -EPSILON) || (d1 < -EPSILON && d2 > EPSILON))
        && ((d3 > EPSILON && d4 < -EPSILON) || (d3 < -EPSILON && d4 > EPSILON))
    {
        return true;
    }

    (d1.abs() <= EPSILON && on_segment(b1, b2, a1))
        || (d2.abs() <= EPSILON && on_segment(b1, b2, a2))
        || (d3.abs() <= EPSILON && on_segment(a1, a2, b1))
        || (d4.abs() <= EPSILON && on_segment(a1, a2, b2))
}

/// Segment test over every pair of non-adjacent edges of a closed contour
pub(crate) fn has_self_intersection(contour: &[Point2<f64>]) -> bool {
    let n = contour.len();
    if n < 4 {
        return false;
    }
    for i in 0..n {
        let a1 = &contour[i];
        let a2 = &contour[(i + 1) % n];
        for j in (i + 2)..n {
            // Edge n-1 is adjacent to edge 0
            if i == 0 && j == n - 1 {
                continue;
            }
            let b1 = &contour[j];
            let b2 = &contour[(j + 1) % n];
            if segments_intersect(a1, a2, b1, b2) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(z: f64) -> Polygon3 {
        Polygon3::horizontal(
            &[
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
                Point2::new(0.0, 10.0),
            ],
            z,
        )
    }

    #[test]
    fn test_newell_normal_and_area() {
        let poly = square(3.0);
        let n = poly.normal().unwrap();
        assert_relative_eq!(n.z, 1.0);
        assert_relative_eq!(poly.area(), 100.0);
        assert_relative_eq!(poly.tilt().unwrap(), 0.0);
    }

    #[test]
    fn test_reverse_keeps_first_vertex() {
        let poly = square(0.0);
        let rev = poly.reversed();
        assert_eq!(rev.vertices()[0], poly.vertices()[0]);
        assert_eq!(rev.vertices()[1], poly.vertices()[3]);
        assert_relative_eq!(rev.tilt().unwrap(), 180.0);
        assert_relative_eq!(rev.area(), poly.area());
    }

    #[test]
    fn test_wall_tilt_and_azimuth() {
        // South-facing wall: upper-left, lower-left, lower-right, upper-right from outside
        let wall = Polygon3::new(vec![
            Point3::new(0.0, 0.0, 3.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 3.0),
        ]);
        assert_relative_eq!(wall.tilt().unwrap(), 90.0);
        assert_relative_eq!(wall.azimuth().unwrap(), 180.0);
        assert_relative_eq!(wall.area(), 30.0);
    }

    #[test]
    fn test_repair_removes_near_duplicates() {
        let mut poly = Polygon3::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.001, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 10.0, 0.0),
            Point3::new(0.0, 10.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
        ]);
        assert_eq!(poly.repair(0.01), 2);
        assert_eq!(poly.len(), 4);
        assert_relative_eq!(poly.area(), 100.0, epsilon = 0.1);
    }

    #[test]
    fn test_validate() {
        let tol = Tolerances::default();
        assert!(square(0.0).validate(&tol).is_ok());

        let sliver = Polygon3::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.001, 0.0),
        ]);
        assert!(matches!(sliver.validate(&tol), Err(Error::DegeneratePolygon(_))));

        let warped = Polygon3::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 10.0, 0.5),
            Point3::new(0.0, 10.0, 0.0),
        ]);
        assert!(matches!(warped.validate(&tol), Err(Error::NonPlanar { .. })));

        let bowtie = Polygon3::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 10.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(0.0, 10.0, 0.0),
        ]);
        assert!(bowtie.is_self_intersecting());
    }

    #[test]
    fn test_self_intersecting_wall_is_buffered() {
        let tol = Tolerances::default();
        // Pentagram drawn in one stroke on a south-facing wall plane
        let mut star = Polygon3::new(
            (0..5)
                .map(|k| {
                    let angle = (90.0 + 144.0 * k as f64).to_radians();
                    Point3::new(10.0 * angle.cos(), 0.0, 10.0 + 10.0 * angle.sin())
                })
                .collect(),
        );
        let facing = star.normal().unwrap();
        assert!(matches!(star.validate(&tol), Err(Error::SelfIntersecting(_))));

        assert!(star.validate_or_buffer(&tol).unwrap());
        assert_eq!(star.len(), 10);
        assert!(star.validate(&tol).is_ok());
        assert_relative_eq!(star.normal().unwrap().dot(&facing), 1.0, epsilon = 1e-9);
        assert!(star.vertices().iter().all(|p| p.y.abs() < 1e-9));

        // Already valid outlines are left alone
        let mut plain = square(0.0);
        assert!(!plain.validate_or_buffer(&tol).unwrap());
        assert_eq!(plain, square(0.0));
    }

    #[test]
    fn test_two_lobes_cannot_be_buffered() {
        let mut bowtie = Polygon3::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 10.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
        ]);
        let result = bowtie.validate_or_buffer(&Tolerances::default());
        assert!(matches!(result, Err(Error::SelfIntersecting(_))));
    }

    #[test]
    fn test_coincident() {
        let a = square(3.0);
        let b = a.reversed();
        assert!(a.coincident_with(&b, 0.01));
        assert!(!a.coincident_with(&square(0.0), 0.01));
    }
}
