// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Envelope closure and orientation checks over whole generated buildings.

use approx::assert_relative_eq;
use bemgen_geometry::{
    generate_building, Boundary, BuildingParams, GeometryOutput, GeometryWarning, SurfaceType,
    Tolerances, Vector3, ZoneLayout, TILT_TOLERANCE,
};

fn build(footprint: Vec<[f64; 2]>, stories: u32, ratio: f64, layout: ZoneLayout) -> GeometryOutput {
    let params = BuildingParams {
        footprint,
        story_count: stories,
        story_height: 3.5,
        window_to_wall_ratio: ratio,
        zone_layout: layout,
    };
    generate_building(&params, &Tolerances::default()).expect("building generates")
}

fn l_shape() -> Vec<[f64; 2]> {
    vec![
        [0.0, 0.0],
        [30.0, 0.0],
        [30.0, 12.0],
        [12.0, 12.0],
        [12.0, 30.0],
        [0.0, 30.0],
    ]
}

/// The Newell normals of a closed zone cancel out
fn assert_closed(output: &GeometryOutput) {
    for zone in &output.zones {
        let mut sum = Vector3::new(0.0, 0.0, 0.0);
        for surface in zone.surfaces.iter().filter(|s| !s.is_window()) {
            sum += surface.polygon.newell();
        }
        assert!(sum.norm() < 1e-6, "zone {} is not closed: {:?}", zone.name, sum);
    }
}

#[test]
fn every_surface_has_the_expected_tilt() {
    let out = build(l_shape(), 3, 0.35, ZoneLayout::PerimeterCore { depth: 3.0 });
    for zone in &out.zones {
        for surface in &zone.surfaces {
            let tilt = surface.tilt().expect("non-degenerate");
            assert!(
                (tilt - surface.surface_type.expected_tilt()).abs() <= TILT_TOLERANCE,
                "{} has tilt {}",
                surface.name,
                tilt
            );
        }
    }
}

#[test]
fn zones_are_closed() {
    assert_closed(&build(l_shape(), 2, 0.0, ZoneLayout::SingleZone));
    assert_closed(&build(l_shape(), 2, 0.0, ZoneLayout::PerimeterCore { depth: 3.0 }));
}

#[test]
fn interzone_partners_are_mutual_and_coincident() {
    let out = build(l_shape(), 3, 0.2, ZoneLayout::PerimeterCore { depth: 3.0 });
    let mut pairs = 0;
    for zone in &out.zones {
        for surface in &zone.surfaces {
            if let Boundary::Surface(partner) = &surface.boundary {
                let (other_zone, other) = out.find_surface(partner).expect("partner exists");
                assert_ne!(other_zone.name, zone.name);
                assert_eq!(other.boundary.partner(), Some(surface.name.as_str()));
                assert!(surface.polygon.coincident_with(&other.polygon, 1e-6));
                let n1 = surface.polygon.normal().unwrap();
                let n2 = other.polygon.normal().unwrap();
                assert_relative_eq!(n1.dot(&n2), -1.0, epsilon = 1e-9);
                pairs += 1;
            }
        }
    }
    assert!(pairs > 0);
}

#[test]
fn floor_areas_add_up_to_the_footprint() {
    let out = build(l_shape(), 2, 0.0, ZoneLayout::PerimeterCore { depth: 3.0 });
    let footprint_area = out.footprint.area();
    assert_relative_eq!(footprint_area, 30.0 * 12.0 + 12.0 * 18.0, epsilon = 1e-9);
    for story in 1..=2 {
        let total: f64 = out
            .zones
            .iter()
            .filter(|z| z.story == story)
            .map(|z| z.floor_area)
            .sum();
        assert_relative_eq!(total, footprint_area, epsilon = 1e-6);
    }
}

#[test]
fn only_exterior_walls_carry_windows() {
    let out = build(l_shape(), 1, 0.4, ZoneLayout::PerimeterCore { depth: 3.0 });
    for zone in &out.zones {
        for window in zone.surfaces_of(SurfaceType::Window) {
            let host = zone
                .surface(window.parent.as_deref().expect("window has a host"))
                .expect("host in same zone");
            assert_eq!(host.boundary, Boundary::Outdoors);
            assert!(window.area() < host.area());
        }
    }
}

#[test]
fn self_intersecting_footprint_is_repaired() {
    // Pentagram drawn in one stroke; the non-zero fill yields the star outline
    let footprint: Vec<[f64; 2]> = (0..5)
        .map(|k| {
            let angle = (90.0 + 144.0 * k as f64).to_radians();
            [10.0 * angle.cos(), 10.0 * angle.sin()]
        })
        .collect();
    let params = BuildingParams {
        footprint,
        story_count: 1,
        story_height: 3.0,
        window_to_wall_ratio: 0.0,
        zone_layout: ZoneLayout::SingleZone,
    };
    let out = generate_building(&params, &Tolerances::default()).expect("repaired");
    assert!(out
        .warnings
        .iter()
        .any(|w| matches!(w, GeometryWarning::FootprintRepaired { .. })));
    assert_eq!(out.footprint.points().len(), 10);
    assert_eq!(out.zones[0].surfaces_of(SurfaceType::Wall).count(), 10);
    assert_closed(&out);
}
