// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Zone and surface generation from a footprint and story parameters

use nalgebra::{Point2, Point3};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{Error, Result};
use crate::fenestration::{carve_window, MAX_WINDOW_RATIO};
use crate::footprint::Footprint;
use crate::polygon::Polygon3;
use crate::surface::{Boundary, ConstructionRole, Surface, SurfaceType};
use crate::tolerance::Tolerances;
use crate::warning::GeometryWarning;
use crate::zoning::{subdivide, ZoneLayout, ZonePlan, ZoneRole};

/// Grid used to match shared zone edges, in meters
const EDGE_MATCH_GRID: f64 = 1e-3;

/// Building parameters the geometry is generated from
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingParams {
    /// Outer footprint, meters, any winding
    pub footprint: Vec<[f64; 2]>,
    pub story_count: u32,
    pub story_height: f64,
    pub window_to_wall_ratio: f64,
    pub zone_layout: ZoneLayout,
}

impl BuildingParams {
    fn validate(&self) -> Result<()> {
        if self.story_count == 0 {
            return Err(Error::InvalidParameters("story count must be at least 1".to_string()));
        }
        if !self.story_height.is_finite() || self.story_height <= 0.0 {
            return Err(Error::InvalidParameters(format!(
                "story height {} must be positive",
                self.story_height
            )));
        }
        let ratio = self.window_to_wall_ratio;
        if !(0.0..=MAX_WINDOW_RATIO).contains(&ratio) {
            return Err(Error::InvalidParameters(format!(
                "window-to-wall ratio {} outside [0, {}]",
                ratio, MAX_WINDOW_RATIO
            )));
        }
        if let ZoneLayout::PerimeterCore { depth } = self.zone_layout {
            if !depth.is_finite() || depth <= 0.0 {
                return Err(Error::InvalidParameters(format!(
                    "perimeter depth {} must be positive",
                    depth
                )));
            }
        }
        Ok(())
    }
}

/// A thermal zone with its surfaces
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub name: String,
    /// 1-based story number
    pub story: u32,
    pub role: ZoneRole,
    pub outline: Vec<Point2<f64>>,
    /// Elevation of the floor
    pub origin_z: f64,
    pub height: f64,
    /// Sum of the floor surface areas
    pub floor_area: f64,
    pub surfaces: Vec<Surface>,
}

impl Zone {
    pub fn volume(&self) -> f64 {
        self.floor_area * self.height
    }

    /// Floor area recomputed from the floor surfaces
    pub fn computed_floor_area(&self) -> f64 {
        self.surfaces_of(SurfaceType::Floor).map(|s| s.area()).sum()
    }

    pub fn surfaces_of(&self, surface_type: SurfaceType) -> impl Iterator<Item = &Surface> {
        self.surfaces
            .iter()
            .filter(move |s| s.surface_type == surface_type)
    }

    pub fn has_floor(&self) -> bool {
        self.surfaces_of(SurfaceType::Floor).next().is_some()
    }

    /// Whether the zone is closed at the top by a ceiling or roof
    pub fn has_top(&self) -> bool {
        self.surfaces
            .iter()
            .any(|s| matches!(s.surface_type, SurfaceType::Ceiling | SurfaceType::Roof))
    }

    pub fn surface(&self, name: &str) -> Option<&Surface> {
        self.surfaces.iter().find(|s| s.name == name)
    }

    /// Centre of the zone volume
    pub fn centroid(&self) -> Point3<f64> {
        let n = self.outline.len().max(1) as f64;
        let (sx, sy) = self
            .outline
            .iter()
            .fold((0.0, 0.0), |(x, y), p| (x + p.x, y + p.y));
        Point3::new(sx / n, sy / n, self.origin_z + self.height * 0.5)
    }
}

/// Generated zones with the warnings collected on the way
#[derive(Debug, Clone)]
pub struct GeometryOutput {
    pub footprint: Footprint,
    pub zones: Vec<Zone>,
    pub warnings: Vec<GeometryWarning>,
}

impl GeometryOutput {
    pub fn surface_count(&self) -> usize {
        self.zones.iter().map(|z| z.surfaces.len()).sum()
    }

    pub fn find_surface(&self, name: &str) -> Option<(&Zone, &Surface)> {
        self.zones
            .iter()
            .find_map(|z| z.surface(name).map(|s| (z, s)))
    }
}

/// Generate every story's zones and surfaces
pub fn generate_building(params: &BuildingParams, tolerances: &Tolerances) -> Result<GeometryOutput> {
    params.validate()?;

    let (footprint, mut warnings) = Footprint::new(&params.footprint, tolerances)?;
    let (plans, layout_warnings) = subdivide(&footprint, params.zone_layout, tolerances);
    warnings.extend(layout_warnings);

    let partners = edge_partners(&plans);
    let height = params.story_height;
    let mut zones = Vec::with_capacity(plans.len() * params.story_count as usize);

    for story in 1..=params.story_count {
        let origin_z = f64::from(story - 1) * height;
        for (plan_idx, plan) in plans.iter().enumerate() {
            let name = plan.role.zone_name(story);
            let mut surfaces = Vec::new();

            let skipped = add_walls(
                &mut surfaces,
                &name,
                story,
                plan_idx,
                &plans,
                &partners,
                origin_z,
                height,
                tolerances,
            );
            if skipped > 0 {
                warnings.push(GeometryWarning::DegenerateWallsSkipped {
                    zone: name.clone(),
                    count: skipped,
                });
            }

            add_floor_and_top(
                &mut surfaces,
                &name,
                story,
                params.story_count,
                plan,
                origin_z,
                height,
            );

            for surface in &mut surfaces {
                surface.orient();
                surface.orient_outward(&plan.outline);
            }

            if params.window_to_wall_ratio > 0.0 {
                add_windows(&mut surfaces, params.window_to_wall_ratio, tolerances, &mut warnings);
            }

            let surfaces = repair_surfaces(surfaces, tolerances, &mut warnings);

            let mut zone = Zone {
                name,
                story,
                role: plan.role,
                outline: plan.outline.clone(),
                origin_z,
                height,
                floor_area: 0.0,
                surfaces,
            };
            zone.floor_area = zone.computed_floor_area();

            if !zone.has_floor() {
                warnings.push(GeometryWarning::ZoneDropped {
                    zone: zone.name,
                    reason: "no valid floor".to_string(),
                });
                continue;
            }
            if !zone.has_top() {
                warnings.push(GeometryWarning::ZoneDropped {
                    zone: zone.name,
                    reason: "no valid ceiling or roof".to_string(),
                });
                continue;
            }
            zones.push(zone);
        }
    }

    if zones.is_empty() {
        return Err(Error::EmptyModel);
    }

    Ok(GeometryOutput {
        footprint,
        zones,
        warnings,
    })
}

type EdgeKey = ((i64, i64), (i64, i64));

fn grid(p: &Point2<f64>) -> (i64, i64) {
    (
        (p.x / EDGE_MATCH_GRID).round() as i64,
        (p.y / EDGE_MATCH_GRID).round() as i64,
    )
}

/// Map each (plan, edge) to the plan edge running the opposite way
fn edge_partners(plans: &[ZonePlan]) -> FxHashMap<(usize, usize), (usize, usize)> {
    let mut directed: FxHashMap<EdgeKey, (usize, usize)> = FxHashMap::default();
    for (pi, plan) in plans.iter().enumerate() {
        let n = plan.outline.len();
        for ei in 0..n {
            let key = (grid(&plan.outline[ei]), grid(&plan.outline[(ei + 1) % n]));
            directed.insert(key, (pi, ei));
        }
    }

    let mut partners = FxHashMap::default();
    for (&(a, b), &owner) in &directed {
        if let Some(&other) = directed.get(&(b, a)) {
            if other.0 != owner.0 {
                partners.insert(owner, other);
            }
        }
    }
    partners
}

fn wall_name(zone: &str, edge: usize) -> String {
    format!("{}_Wall_{}", zone, edge + 1)
}

#[allow(clippy::too_many_arguments)]
fn add_walls(
    surfaces: &mut Vec<Surface>,
    zone: &str,
    story: u32,
    plan_idx: usize,
    plans: &[ZonePlan],
    partners: &FxHashMap<(usize, usize), (usize, usize)>,
    origin_z: f64,
    height: f64,
    tolerances: &Tolerances,
) -> usize {
    let outline = &plans[plan_idx].outline;
    let n = outline.len();
    let mut skipped = 0;

    for edge in 0..n {
        let a = outline[edge];
        let b = outline[(edge + 1) % n];
        let length = (b - a).norm();
        if length < tolerances.min_wall_length || length * height < tolerances.min_area {
            skipped += 1;
            continue;
        }

        let top = origin_z + height;
        let polygon = Polygon3::new(vec![
            Point3::new(a.x, a.y, top),
            Point3::new(a.x, a.y, origin_z),
            Point3::new(b.x, b.y, origin_z),
            Point3::new(b.x, b.y, top),
        ]);

        let (boundary, construction) = match partners.get(&(plan_idx, edge)) {
            Some(&(other_plan, other_edge)) => {
                let other_zone = plans[other_plan].role.zone_name(story);
                (
                    Boundary::Surface(wall_name(&other_zone, other_edge)),
                    ConstructionRole::InteriorWall,
                )
            }
            None => (Boundary::Outdoors, ConstructionRole::ExteriorWall),
        };

        surfaces.push(Surface {
            name: wall_name(zone, edge),
            zone: zone.to_string(),
            surface_type: SurfaceType::Wall,
            boundary,
            construction,
            polygon,
            parent: None,
        });
    }

    skipped
}

fn add_floor_and_top(
    surfaces: &mut Vec<Surface>,
    zone: &str,
    story: u32,
    story_count: u32,
    plan: &ZonePlan,
    origin_z: f64,
    height: f64,
) {
    let (boundary, construction) = if story == 1 {
        (Boundary::Ground, ConstructionRole::GroundFloor)
    } else {
        let below = plan.role.zone_name(story - 1);
        (
            Boundary::Surface(format!("{}_Ceiling", below)),
            ConstructionRole::InteriorFloor,
        )
    };
    surfaces.push(Surface {
        name: format!("{}_Floor", zone),
        zone: zone.to_string(),
        surface_type: SurfaceType::Floor,
        boundary,
        construction,
        polygon: Polygon3::horizontal(&plan.outline, origin_z).reversed(),
        parent: None,
    });

    let top = Polygon3::horizontal(&plan.outline, origin_z + height);
    let surface = if story == story_count {
        Surface {
            name: format!("{}_Roof", zone),
            zone: zone.to_string(),
            surface_type: SurfaceType::Roof,
            boundary: Boundary::Outdoors,
            construction: ConstructionRole::Roof,
            polygon: top,
            parent: None,
        }
    } else {
        let above = plan.role.zone_name(story + 1);
        Surface {
            name: format!("{}_Ceiling", zone),
            zone: zone.to_string(),
            surface_type: SurfaceType::Ceiling,
            boundary: Boundary::Surface(format!("{}_Floor", above)),
            construction: ConstructionRole::InteriorCeiling,
            polygon: top,
            parent: None,
        }
    };
    surfaces.push(surface);
}

fn add_windows(
    surfaces: &mut Vec<Surface>,
    ratio: f64,
    tolerances: &Tolerances,
    warnings: &mut Vec<GeometryWarning>,
) {
    let mut windows = Vec::new();
    for wall in surfaces
        .iter()
        .filter(|s| s.surface_type == SurfaceType::Wall && s.boundary == Boundary::Outdoors)
    {
        let carved = carve_window(&wall.polygon, ratio, tolerances.window_inset)
            .filter(|w| w.polygon.area() >= tolerances.min_area);
        let achieved = carved.as_ref().map_or(0.0, |w| w.ratio);
        if achieved + 1e-9 < ratio {
            warnings.push(GeometryWarning::WindowRatioReduced {
                wall: wall.name.clone(),
                requested: ratio,
                achieved,
            });
        }
        if let Some(window) = carved {
            windows.push(Surface {
                name: format!("{}_Window", wall.name),
                zone: wall.zone.clone(),
                surface_type: SurfaceType::Window,
                boundary: Boundary::Outdoors,
                construction: ConstructionRole::Window,
                polygon: window.polygon,
                parent: Some(wall.name.clone()),
            });
        }
    }
    surfaces.extend(windows);
}

/// Repair and validate every polygon, buffering self-intersecting ones;
/// invalid surfaces go, and their windows with them
fn repair_surfaces(
    surfaces: Vec<Surface>,
    tolerances: &Tolerances,
    warnings: &mut Vec<GeometryWarning>,
) -> Vec<Surface> {
    let mut dropped: FxHashSet<String> = FxHashSet::default();
    let mut kept = Vec::with_capacity(surfaces.len());

    for mut surface in surfaces {
        if let Some(parent) = &surface.parent {
            if dropped.contains(parent) {
                warnings.push(GeometryWarning::SurfaceDropped {
                    surface: surface.name,
                    reason: "host wall dropped".to_string(),
                });
                continue;
            }
        }
        surface.polygon.repair(tolerances.vertex_merge);
        match surface.polygon.validate_or_buffer(tolerances) {
            Ok(buffered) => {
                if buffered {
                    warnings.push(GeometryWarning::SurfaceRepaired {
                        surface: surface.name.clone(),
                    });
                }
                kept.push(surface);
            }
            Err(e) => {
                warnings.push(GeometryWarning::SurfaceDropped {
                    surface: surface.name.clone(),
                    reason: e.to_string(),
                });
                dropped.insert(surface.name);
            }
        }
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(footprint: Vec<[f64; 2]>, stories: u32, ratio: f64, layout: ZoneLayout) -> BuildingParams {
        BuildingParams {
            footprint,
            story_count: stories,
            story_height: 3.0,
            window_to_wall_ratio: ratio,
            zone_layout: layout,
        }
    }

    fn square(side: f64) -> Vec<[f64; 2]> {
        vec![[0.0, 0.0], [side, 0.0], [side, side], [0.0, side]]
    }

    #[test]
    fn test_unit_box() {
        let out = generate_building(
            &params(square(10.0), 1, 0.0, ZoneLayout::SingleZone),
            &Tolerances::default(),
        )
        .unwrap();
        assert_eq!(out.zones.len(), 1);
        let zone = &out.zones[0];
        assert_eq!(zone.name, "Story1");
        assert_relative_eq!(zone.floor_area, 100.0);
        assert_relative_eq!(zone.volume(), 300.0);

        let walls: Vec<_> = zone.surfaces_of(SurfaceType::Wall).collect();
        assert_eq!(walls.len(), 4);
        for wall in &walls {
            assert_relative_eq!(wall.area(), 30.0);
            assert_relative_eq!(wall.tilt().unwrap(), 90.0);
            assert_eq!(wall.boundary, Boundary::Outdoors);
        }

        let floor = zone.surface("Story1_Floor").unwrap();
        assert_relative_eq!(floor.area(), 100.0);
        assert_relative_eq!(floor.tilt().unwrap(), 180.0);
        assert_eq!(floor.boundary, Boundary::Ground);

        let roof = zone.surface("Story1_Roof").unwrap();
        assert_relative_eq!(roof.area(), 100.0);
        assert_relative_eq!(roof.tilt().unwrap(), 0.0);
    }

    #[test]
    fn test_walls_face_outward() {
        let out = generate_building(
            &params(square(10.0), 1, 0.0, ZoneLayout::SingleZone),
            &Tolerances::default(),
        )
        .unwrap();
        let zone = &out.zones[0];
        let centre = zone.centroid();
        for wall in zone.surfaces_of(SurfaceType::Wall) {
            let n = wall.polygon.normal().unwrap();
            let offset = wall.polygon.centroid() - centre;
            assert!(n.dot(&offset) > 0.0, "{} faces inward", wall.name);
        }
    }

    #[test]
    fn test_windows_on_exterior_walls() {
        let out = generate_building(
            &params(square(10.0), 1, 0.4, ZoneLayout::SingleZone),
            &Tolerances::default(),
        )
        .unwrap();
        let zone = &out.zones[0];
        let windows: Vec<_> = zone.surfaces_of(SurfaceType::Window).collect();
        assert_eq!(windows.len(), 4);
        for window in windows {
            assert_relative_eq!(window.area(), 12.0, epsilon = 1e-9);
            let parent = zone.surface(window.parent.as_deref().unwrap()).unwrap();
            let n1 = parent.polygon.normal().unwrap();
            let n2 = window.polygon.normal().unwrap();
            assert_relative_eq!(n1.dot(&n2), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_stories_pair_ceiling_and_floor() {
        let out = generate_building(
            &params(square(10.0), 3, 0.0, ZoneLayout::SingleZone),
            &Tolerances::default(),
        )
        .unwrap();
        assert_eq!(out.zones.len(), 3);
        let (_, ceiling) = out.find_surface("Story1_Ceiling").unwrap();
        assert_eq!(ceiling.boundary, Boundary::Surface("Story2_Floor".to_string()));
        let (_, floor) = out.find_surface("Story2_Floor").unwrap();
        assert_eq!(floor.boundary, Boundary::Surface("Story1_Ceiling".to_string()));
        assert!(floor.polygon.coincident_with(&ceiling.polygon, 1e-9));
        assert!(out.find_surface("Story3_Roof").is_some());
        assert!(out.find_surface("Story1_Roof").is_none());
    }

    #[test]
    fn test_perimeter_core_interior_walls() {
        let out = generate_building(
            &params(square(20.0), 1, 0.3, ZoneLayout::PerimeterCore { depth: 4.0 }),
            &Tolerances::default(),
        )
        .unwrap();
        assert_eq!(out.zones.len(), 5);
        let total: f64 = out.zones.iter().map(|z| z.floor_area).sum();
        assert_relative_eq!(total, 400.0, epsilon = 1e-9);

        // Every interzone wall names a partner that names it back
        for zone in &out.zones {
            for surface in &zone.surfaces {
                if let Boundary::Surface(partner) = &surface.boundary {
                    let (_, other) = out.find_surface(partner).unwrap();
                    assert_eq!(other.boundary, Boundary::Surface(surface.name.clone()));
                }
            }
        }

        // The core has no exterior walls and so no windows
        let core = out.zones.iter().find(|z| z.role == ZoneRole::Core).unwrap();
        assert_eq!(core.surfaces_of(SurfaceType::Window).count(), 0);
    }

    #[test]
    fn test_short_edge_skipped() {
        let footprint = vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.05, 10.0], [0.0, 9.95]];
        let out = generate_building(
            &params(footprint, 1, 0.0, ZoneLayout::SingleZone),
            &Tolerances::default(),
        )
        .unwrap();
        assert_eq!(out.zones[0].surfaces_of(SurfaceType::Wall).count(), 4);
        assert!(out
            .warnings
            .iter()
            .any(|w| matches!(w, GeometryWarning::DegenerateWallsSkipped { count: 1, .. })));
    }

    #[test]
    fn test_invalid_parameters() {
        let tol = Tolerances::default();
        assert!(matches!(
            generate_building(&params(square(10.0), 0, 0.0, ZoneLayout::SingleZone), &tol),
            Err(Error::InvalidParameters(_))
        ));
        assert!(matches!(
            generate_building(&params(square(10.0), 1, 0.96, ZoneLayout::SingleZone), &tol),
            Err(Error::InvalidParameters(_))
        ));
    }

    fn wall(name: &str, vertices: Vec<Point3<f64>>) -> Surface {
        Surface {
            name: name.to_string(),
            zone: "Z1".to_string(),
            surface_type: SurfaceType::Wall,
            boundary: Boundary::Outdoors,
            construction: ConstructionRole::ExteriorWall,
            polygon: Polygon3::new(vertices),
            parent: None,
        }
    }

    fn window_on(host: &str) -> Surface {
        Surface {
            name: format!("{}_Window", host),
            surface_type: SurfaceType::Window,
            construction: ConstructionRole::Window,
            polygon: Polygon3::new(vec![
                Point3::new(1.0, 0.0, 1.0),
                Point3::new(2.0, 0.0, 1.0),
                Point3::new(2.0, 0.0, 2.0),
                Point3::new(1.0, 0.0, 2.0),
            ]),
            parent: Some(host.to_string()),
            ..wall(host, Vec::new())
        }
    }

    #[test]
    fn test_self_intersecting_surfaces_buffered_before_dropping() {
        let star = (0..5)
            .map(|k| {
                let angle = (90.0 + 144.0 * k as f64).to_radians();
                Point3::new(10.0 * angle.cos(), 0.0, 10.0 + 10.0 * angle.sin())
            })
            .collect();
        let two_lobes = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 10.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 4.0),
        ];
        let surfaces = vec![
            wall("Star", star),
            window_on("Star"),
            wall("Lobes", two_lobes),
            window_on("Lobes"),
        ];

        let mut warnings = Vec::new();
        let kept = repair_surfaces(surfaces, &Tolerances::default(), &mut warnings);

        let names: Vec<&str> = kept.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Star", "Star_Window"]);
        assert_eq!(kept[0].polygon.len(), 10);
        assert!(warnings
            .iter()
            .any(|w| matches!(w, GeometryWarning::SurfaceRepaired { surface } if surface == "Star")));
        let dropped: Vec<&str> = warnings
            .iter()
            .filter_map(|w| match w {
                GeometryWarning::SurfaceDropped { surface, .. } => Some(surface.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(dropped, vec!["Lobes", "Lobes_Window"]);
    }
}
