// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Window placement on rectangular walls

use nalgebra::{Point3, Vector3};

use crate::polygon::Polygon3;

/// Largest accepted window-to-wall ratio
pub const MAX_WINDOW_RATIO: f64 = 0.95;

/// A window carved into a wall
#[derive(Debug, Clone, PartialEq)]
pub struct CarvedWindow {
    pub polygon: Polygon3,
    /// Window area over wall area actually achieved
    pub ratio: f64,
}

/// Centre a window of `ratio` × wall area on a rectangular wall.
///
/// The wall is scaled by `sqrt(ratio)` in both directions around its centre,
/// then shrunk further, keeping the aspect, until every edge keeps at least
/// `inset` from the wall's edges. The window has the wall's vertex order
/// (upper-left, lower-left, lower-right, upper-right) and therefore the same
/// normal. Returns `None` for non-rectangular walls or when nothing remains.
pub fn carve_window(wall: &Polygon3, ratio: f64, inset: f64) -> Option<CarvedWindow> {
    if ratio.is_nan() || ratio <= 0.0 || wall.len() != 4 {
        return None;
    }
    let ratio = ratio.min(MAX_WINDOW_RATIO);

    let v = wall.vertices();
    let (upper_left, lower_left, lower_right) = (v[0], v[1], v[2]);
    let along = lower_right - lower_left;
    let up = upper_left - lower_left;
    let width = along.norm();
    let height = up.norm();
    if width <= 2.0 * inset || height <= 2.0 * inset {
        return None;
    }
    // Rectangular walls only
    if along.dot(&up).abs() > 1e-6 * width * height {
        return None;
    }

    let u: Vector3<f64> = along / width;
    let w: Vector3<f64> = up / height;

    let scale = ratio
        .sqrt()
        .min((width - 2.0 * inset) / width)
        .min((height - 2.0 * inset) / height);
    if scale <= 0.0 {
        return None;
    }

    let half_w = width * scale * 0.5;
    let half_h = height * scale * 0.5;
    let centre: Point3<f64> = lower_left + along * 0.5 + up * 0.5;

    let polygon = Polygon3::new(vec![
        centre - u * half_w + w * half_h,
        centre - u * half_w - w * half_h,
        centre + u * half_w - w * half_h,
        centre + u * half_w + w * half_h,
    ]);

    Some(CarvedWindow {
        polygon,
        ratio: scale * scale,
    })
}
