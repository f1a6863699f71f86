// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Consistency and auto-fix pass.
//!
//! Three sweeps run at fixed points of the pipeline:
//!
//! - [`sweep_geometry`] after geometry generation: drops invalid surfaces and
//!   incomplete zones, detaches interzone references left behind, settles
//!   coincident surfaces and recomputes floor areas.
//! - [`sweep_graph`] after the HVAC topology is built: renames colliding
//!   nodes until the validator is satisfied, or fails on anything else.
//! - [`check_references`] on the assembled document: every construction,
//!   layer, zone and setpoint node a record names must exist.
//!
//! Every repair is reported as a [`Warning`]; everything that cannot be
//! repaired is an error and no document is produced.

use bemgen_core::{Document, ObjectType};
use bemgen_geometry::{
    Boundary, ConstructionRole, GeometryWarning, SurfaceType, Tolerances, Zone,
};
use bemgen_topology::{
    allocate, validate, ComponentKey, FlowGraph, LoopKey, LoopSide, NodeId, NodeRole, RenameScope,
    Violation, ViolationKind,
};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{Error, ReferenceError, Result};
use crate::warning::{Stage, Warning};

/// Which repairs the sweeps may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoFixPolicy {
    /// Rename colliding nodes instead of failing
    pub repair_node_collisions: bool,
    /// Validate/repair rounds before giving up
    pub max_repair_passes: usize,
}

impl Default for AutoFixPolicy {
    fn default() -> Self {
        Self {
            repair_node_collisions: true,
            max_repair_passes: 8,
        }
    }
}

fn geometry_warning(w: GeometryWarning) -> Warning {
    Warning::new(Stage::AutoFix, w.code(), w.to_string())
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Repairs the zone set in place.
///
/// Fails with `EmptyModel` when no zone survives.
pub fn sweep_geometry(zones: &mut Vec<Zone>, tolerances: &Tolerances) -> Result<Vec<Warning>> {
    let mut warnings = Vec::new();

    drop_invalid_surfaces(zones, tolerances, &mut warnings);
    drop_incomplete_zones(zones, &mut warnings);
    if zones.is_empty() {
        return Err(Error::Geometry(bemgen_geometry::Error::EmptyModel));
    }

    resolve_coincident(zones, tolerances, &mut warnings);
    drop_orphan_windows(zones, &mut warnings);
    detach_orphan_boundaries(zones, &mut warnings);

    for zone in zones.iter_mut() {
        let computed = zone.computed_floor_area();
        if (zone.floor_area - computed).abs() > 1e-6 * computed.max(1.0) {
            warnings.push(Warning::new(
                Stage::AutoFix,
                "floor_area_recomputed",
                format!(
                    "zone {}: floor area {:.3} m² replaced by {:.3} m² from its floor surfaces",
                    zone.name, zone.floor_area, computed
                ),
            ));
            zone.floor_area = computed;
        }
    }

    Ok(warnings)
}

fn drop_invalid_surfaces(zones: &mut [Zone], tolerances: &Tolerances, warnings: &mut Vec<Warning>) {
    for zone in zones.iter_mut() {
        zone.surfaces.retain_mut(|s| match s.polygon.validate_or_buffer(tolerances) {
            Ok(buffered) => {
                if buffered {
                    warnings.push(geometry_warning(GeometryWarning::SurfaceRepaired {
                        surface: s.name.clone(),
                    }));
                }
                true
            }
            Err(e) => {
                warnings.push(geometry_warning(GeometryWarning::SurfaceDropped {
                    surface: s.name.clone(),
                    reason: e.to_string(),
                }));
                false
            }
        });
    }
}

fn drop_incomplete_zones(zones: &mut Vec<Zone>, warnings: &mut Vec<Warning>) {
    zones.retain(|zone| {
        let reason = if zone.surfaces.is_empty() {
            "no surfaces"
        } else if !zone.has_floor() {
            "no valid floor"
        } else if !zone.has_top() {
            "no valid ceiling or roof"
        } else {
            return true;
        };
        warnings.push(geometry_warning(GeometryWarning::ZoneDropped {
            zone: zone.name.clone(),
            reason: reason.to_string(),
        }));
        false
    });
}

/// Windows whose host wall is gone, or no longer faces outdoors.
fn drop_orphan_windows(zones: &mut [Zone], warnings: &mut Vec<Warning>) {
    for zone in zones.iter_mut() {
        let hosts: FxHashSet<String> = zone
            .surfaces
            .iter()
            .filter(|s| s.surface_type == SurfaceType::Wall && s.boundary == Boundary::Outdoors)
            .map(|s| s.name.to_ascii_lowercase())
            .collect();
        zone.surfaces.retain(|s| {
            let Some(parent) = s.parent.as_deref().filter(|_| s.is_window()) else {
                return true;
            };
            if hosts.contains(&parent.to_ascii_lowercase()) {
                return true;
            }
            warnings.push(geometry_warning(GeometryWarning::SurfaceDropped {
                surface: s.name.clone(),
                reason: format!("host wall {} is not exterior", parent),
            }));
            false
        });
    }
}

fn detach_orphan_boundaries(zones: &mut [Zone], warnings: &mut Vec<Warning>) {
    let names: FxHashSet<String> = zones
        .iter()
        .flat_map(|z| z.surfaces.iter())
        .map(|s| s.name.to_ascii_lowercase())
        .collect();

    for surface in zones.iter_mut().flat_map(|z| z.surfaces.iter_mut()) {
        let Some(partner) = surface.boundary.partner() else {
            continue;
        };
        if names.contains(&partner.to_ascii_lowercase()) {
            continue;
        }
        warnings.push(Warning::new(
            Stage::AutoFix,
            "boundary_made_adiabatic",
            format!(
                "surface {}: partner {} no longer exists, boundary set to adiabatic",
                surface.name, partner
            ),
        ));
        surface.boundary = Boundary::Adiabatic;
    }
}

#[derive(Debug)]
enum CoincidentFix {
    DropDuplicate { zone: usize, surface: String, of: String },
    Reorient { zone: usize, surface: usize },
    Pair { a: (usize, usize), b: (usize, usize) },
}

/// Settles pairs of surfaces that share the same vertices.
fn resolve_coincident(zones: &mut [Zone], tolerances: &Tolerances, warnings: &mut Vec<Warning>) {
    let opaque: Vec<(usize, usize)> = zones
        .iter()
        .enumerate()
        .flat_map(|(zi, z)| {
            z.surfaces
                .iter()
                .enumerate()
                .filter(|(_, s)| !s.is_window())
                .map(move |(si, _)| (zi, si))
        })
        .collect();

    let mut fixes = Vec::new();
    for (i, &(za, sa)) in opaque.iter().enumerate() {
        let a = &zones[za].surfaces[sa];
        let ca = a.polygon.centroid();
        for &(zb, sb) in &opaque[i + 1..] {
            let b = &zones[zb].surfaces[sb];
            if (b.polygon.centroid() - ca).norm() > tolerances.vertex_merge
                || !a.polygon.coincident_with(&b.polygon, tolerances.vertex_merge)
            {
                continue;
            }

            if za == zb {
                fixes.push(CoincidentFix::DropDuplicate {
                    zone: zb,
                    surface: b.name.clone(),
                    of: a.name.clone(),
                });
                continue;
            }

            let same_direction = match (a.polygon.normal(), b.polygon.normal()) {
                (Some(na), Some(nb)) => na.dot(&nb) > 0.0,
                _ => false,
            };
            if same_direction {
                fixes.push(CoincidentFix::Reorient { zone: za, surface: sa });
                fixes.push(CoincidentFix::Reorient { zone: zb, surface: sb });
            }
            if a.boundary == Boundary::Outdoors
                && b.boundary == Boundary::Outdoors
                && a.surface_type == SurfaceType::Wall
                && b.surface_type == SurfaceType::Wall
            {
                fixes.push(CoincidentFix::Pair {
                    a: (za, sa),
                    b: (zb, sb),
                });
            }
        }
    }

    // Index-based fixes first; drops shift indices.
    let mut drops = Vec::new();
    for fix in fixes {
        match fix {
            CoincidentFix::Reorient { zone, surface } => {
                let outline = zones[zone].outline.clone();
                let s = &mut zones[zone].surfaces[surface];
                let flipped = if s.surface_type.is_horizontal() {
                    s.orient()
                } else {
                    s.orient_outward(&outline)
                };
                if flipped {
                    warnings.push(Warning::new(
                        Stage::AutoFix,
                        "surface_reversed",
                        format!("surface {}: normal pointed into its zone, vertices reversed", s.name),
                    ));
                }
            }
            CoincidentFix::Pair { a, b } => {
                let name_a = zones[a.0].surfaces[a.1].name.clone();
                let name_b = zones[b.0].surfaces[b.1].name.clone();
                for ((zi, si), partner) in [(a, &name_b), (b, &name_a)] {
                    let s = &mut zones[zi].surfaces[si];
                    s.boundary = Boundary::Surface(partner.clone());
                    s.construction = ConstructionRole::InteriorWall;
                }
                warnings.push(Warning::new(
                    Stage::AutoFix,
                    "surfaces_paired",
                    format!("exterior walls {} and {} coincide and were paired", name_a, name_b),
                ));
            }
            CoincidentFix::DropDuplicate { .. } => drops.push(fix),
        }
    }

    for fix in drops {
        if let CoincidentFix::DropDuplicate { zone, surface, of } = fix {
            let before = zones[zone].surfaces.len();
            zones[zone].surfaces.retain(|s| s.name != surface);
            if zones[zone].surfaces.len() < before {
                warnings.push(Warning::new(
                    Stage::AutoFix,
                    "duplicate_surface_dropped",
                    format!("surface {} duplicates {} and was dropped", surface, of),
                ));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Flow graph
// ---------------------------------------------------------------------------

/// Validates the graph, renaming colliding nodes while the policy allows.
pub fn sweep_graph(graph: &mut FlowGraph, policy: &AutoFixPolicy) -> Result<Vec<Warning>> {
    let mut warnings = Vec::new();

    for _ in 0..policy.max_repair_passes {
        let violations = validate(graph);
        if violations.is_empty() {
            return Ok(warnings);
        }
        if !policy.repair_node_collisions || violations.iter().any(|v| !v.kind.is_repairable()) {
            return Err(violations.into());
        }

        // One rename per pass; it may clear several violations at once.
        let violation = violations[0].clone();
        let Some((scope, fresh)) = plan_rename(graph, &violation) else {
            return Err(violations.into());
        };
        let changed = graph.rename_node(scope, &violation.node, &fresh)?;
        warnings.push(Warning::new(
            Stage::AutoFix,
            "node_renamed",
            format!("{}: renamed to '{}' in {} places", violation, fresh, changed),
        ));
    }

    let remaining = validate(graph);
    if remaining.is_empty() {
        Ok(warnings)
    } else {
        Err(remaining.into())
    }
}

struct Owner {
    air_loop: Option<LoopKey>,
    side: LoopSide,
    component: Option<ComponentKey>,
}

fn owner(graph: &FlowGraph, name: &str) -> Option<Owner> {
    if let Some(key) = graph.component_by_name(name) {
        let c = graph.component(key)?;
        return Some(Owner {
            air_loop: c.air_loop,
            side: c.side.unwrap_or(LoopSide::Supply),
            component: Some(key),
        });
    }
    graph.zone_connection(name).map(|z| Owner {
        air_loop: z.air_loop,
        side: LoopSide::Demand,
        component: None,
    })
}

/// Scope and new name that resolve one collision.
///
/// Duplicates rename the later owner. Across loops its whole loop side
/// moves. Within one loop only a supply-branch outlet can move, taking the
/// inlets downstream of it along; other same-loop duplicates are left to
/// fail. Aliases move the demand side onto a distinct identifier.
fn plan_rename(graph: &FlowGraph, violation: &Violation) -> Option<(RenameScope, NodeId)> {
    match violation.kind {
        ViolationKind::DuplicateOutlet | ViolationKind::DuplicateInlet => {
            let first = owner(graph, violation.components.first()?)?;
            let later = owner(graph, violation.components.last()?)?;
            let scope = match (later.air_loop, later.component) {
                (Some(key), _) if first.air_loop != Some(key) => RenameScope::Side(key, later.side),
                (Some(key), Some(component))
                    if violation.kind == ViolationKind::DuplicateOutlet
                        && graph.air_loop(key)?.branch.contains(&component) =>
                {
                    RenameScope::Outlet(component)
                }
                _ => return None,
            };
            Some((scope, fresh_name(graph, &violation.node)))
        }
        ViolationKind::SupplyDemandAlias => {
            let key = graph.loop_by_name(violation.air_loop.as_deref()?)?;
            let l = graph.air_loop(key)?;
            let base = if violation.node == l.demand_inlet {
                allocate(&l.zone, NodeRole::DemandInlet)
            } else if violation.node == l.demand_outlet {
                allocate(&l.zone, NodeRole::DemandOutlet)
            } else {
                violation.node.clone()
            };
            Some((RenameScope::Side(key, LoopSide::Demand), fresh_name(graph, &base)))
        }
        _ => None,
    }
}

/// `base` if unused, otherwise its first free numbered variant.
fn fresh_name(graph: &FlowGraph, base: &NodeId) -> NodeId {
    let taken = graph.node_names();
    if !taken.contains(base) {
        return base.clone();
    }
    (2..)
        .map(|n| base.disambiguated(n))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.disambiguated(taken.len() + 2))
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// Checks cross references of an assembled document.
pub fn check_references(document: &Document) -> Result<()> {
    let lower = |s: &str| s.to_ascii_lowercase();

    let layers: FxHashSet<String> = document
        .of_type(ObjectType::Material)
        .chain(document.of_type(ObjectType::WindowMaterialSimpleGlazingSystem))
        .map(|r| lower(r.name()))
        .collect();
    let mut constructions = FxHashSet::default();
    for c in document.of_type(ObjectType::Construction) {
        for layer in c.fields.iter().skip(1).filter_map(|f| f.as_str()) {
            if !layers.contains(&lower(layer)) {
                return Err(ReferenceError::MissingMaterial {
                    construction: c.name().to_string(),
                    material: layer.to_string(),
                }
                .into());
            }
        }
        constructions.insert(lower(c.name()));
    }

    let mut zone_use: FxHashMap<String, usize> = document
        .of_type(ObjectType::Zone)
        .map(|z| (lower(z.name()), 0))
        .collect();
    let surfaces = document
        .of_type(ObjectType::BuildingSurfaceDetailed)
        .chain(document.of_type(ObjectType::FenestrationSurfaceDetailed));
    for s in surfaces {
        let construction = s.text("Construction Name").unwrap_or_default();
        if !constructions.contains(&lower(construction)) {
            return Err(ReferenceError::MissingConstruction {
                surface: s.name().to_string(),
                construction: construction.to_string(),
            }
            .into());
        }
        if let Some(zone) = s.text("Zone Name") {
            match zone_use.get_mut(&lower(zone)) {
                Some(count) => *count += 1,
                None => {
                    return Err(ReferenceError::UnknownZone {
                        surface: s.name().to_string(),
                        zone: zone.to_string(),
                    }
                    .into())
                }
            }
        }
    }
    // Document order, not map order, so the reported zone is stable
    for z in document.of_type(ObjectType::Zone) {
        if zone_use.get(&lower(z.name())) == Some(&0) {
            return Err(ReferenceError::ZoneWithoutSurfaces(z.name().to_string()).into());
        }
    }

    let setpoint_types = [
        ObjectType::SetpointManagerScheduled,
        ObjectType::SetpointManagerMixedAir,
    ];
    let nodes: FxHashSet<String> = document
        .records()
        .iter()
        .filter(|r| !setpoint_types.contains(&r.object_type))
        .flat_map(|r| r.node_fields())
        .map(|(_, node)| lower(node))
        .collect();
    let unknown: Vec<Violation> = document
        .records()
        .iter()
        .filter(|r| setpoint_types.contains(&r.object_type))
        .flat_map(|r| {
            r.node_fields()
                .into_iter()
                .filter(|(_, node)| !nodes.contains(&lower(node)))
                .map(|(_, node)| Violation {
                    kind: ViolationKind::UnknownSetpointNode,
                    node: NodeId::new(node),
                    components: vec![r.name().to_string()],
                    air_loop: None,
                })
                .collect::<Vec<_>>()
        })
        .collect();
    if !unknown.is_empty() {
        return Err(unknown.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bemgen_core::{Record, SchemaVersion};
    use bemgen_geometry::{generate_building, BuildingParams, ZoneLayout};
    use bemgen_topology::{build_air_systems, HvacOptions, ZoneLoad};

    fn zones(stories: u32) -> Vec<Zone> {
        let params = BuildingParams {
            footprint: vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]],
            story_count: stories,
            story_height: 3.0,
            window_to_wall_ratio: 0.0,
            zone_layout: ZoneLayout::SingleZone,
        };
        generate_building(&params, &Tolerances::default())
            .unwrap()
            .zones
    }

    fn codes(warnings: &[Warning]) -> Vec<&str> {
        warnings.iter().map(|w| w.code.as_str()).collect()
    }

    #[test]
    fn clean_building_needs_no_repairs() {
        let mut zones = zones(2);
        let warnings = sweep_geometry(&mut zones, &Tolerances::default()).unwrap();
        assert!(warnings.is_empty(), "{:?}", warnings);
        assert_eq!(zones.len(), 2);
    }

    #[test]
    fn zone_without_roof_is_dropped_and_partner_detached() {
        let mut zones = zones(2);
        zones[1].surfaces.retain(|s| s.surface_type != SurfaceType::Roof);

        let warnings = sweep_geometry(&mut zones, &Tolerances::default()).unwrap();
        assert_eq!(zones.len(), 1);
        assert!(codes(&warnings).contains(&"zone_dropped"));
        assert!(codes(&warnings).contains(&"boundary_made_adiabatic"));

        let ceiling = zones[0]
            .surfaces
            .iter()
            .find(|s| s.surface_type == SurfaceType::Ceiling)
            .unwrap();
        assert_eq!(ceiling.boundary, Boundary::Adiabatic);
    }

    #[test]
    fn no_zones_left_is_fatal() {
        let mut zones = zones(1);
        zones[0].surfaces.retain(|s| s.surface_type != SurfaceType::Floor);
        assert!(matches!(
            sweep_geometry(&mut zones, &Tolerances::default()),
            Err(Error::Geometry(bemgen_geometry::Error::EmptyModel))
        ));
    }

    #[test]
    fn floor_area_is_recomputed() {
        let mut zones = zones(1);
        zones[0].floor_area = 80.0;
        let warnings = sweep_geometry(&mut zones, &Tolerances::default()).unwrap();
        assert_eq!(codes(&warnings), vec!["floor_area_recomputed"]);
        approx::assert_relative_eq!(zones[0].floor_area, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn inward_ceiling_is_reversed() {
        let mut zones = zones(2);
        let ceiling = zones[0]
            .surfaces
            .iter_mut()
            .find(|s| s.surface_type == SurfaceType::Ceiling)
            .unwrap();
        ceiling.polygon.reverse();

        let warnings = sweep_geometry(&mut zones, &Tolerances::default()).unwrap();
        assert_eq!(codes(&warnings), vec!["surface_reversed"]);
        let ceiling = zones[0]
            .surfaces
            .iter()
            .find(|s| s.surface_type == SurfaceType::Ceiling)
            .unwrap();
        assert!(ceiling.polygon.normal().unwrap().z > 0.0);
    }

    #[test]
    fn duplicate_surface_in_zone_is_dropped() {
        let mut zones = zones(1);
        let mut copy = zones[0].surfaces[0].clone();
        copy.name = "Copy".to_string();
        zones[0].surfaces.push(copy);

        let warnings = sweep_geometry(&mut zones, &Tolerances::default()).unwrap();
        assert_eq!(codes(&warnings), vec!["duplicate_surface_dropped"]);
        assert!(zones[0].surface("Copy").is_none());
    }

    fn graph(names: &[&str]) -> FlowGraph {
        let loads: Vec<ZoneLoad> = names
            .iter()
            .map(|n| ZoneLoad {
                name: n.to_string(),
                floor_area: 100.0,
                volume: 300.0,
            })
            .collect();
        build_air_systems(&loads, &HvacOptions::default()).unwrap().graph
    }

    fn force_collision(graph: &mut FlowGraph) {
        let first = graph.loop_by_name("A Air Loop").unwrap();
        let second = graph.loop_by_name("B Air Loop").unwrap();
        let taken = graph.air_loop(first).unwrap().supply_outlet.clone();
        let original = graph.air_loop(second).unwrap().supply_outlet.clone();
        graph
            .rename_node(RenameScope::Side(second, LoopSide::Supply), &original, &taken)
            .unwrap();
    }

    #[test]
    fn collisions_are_renamed() {
        let mut graph = graph(&["A", "B"]);
        force_collision(&mut graph);
        assert!(!validate(&graph).is_empty());

        let warnings = sweep_graph(&mut graph, &AutoFixPolicy::default()).unwrap();
        assert!(validate(&graph).is_empty());
        assert!(codes(&warnings).iter().all(|c| *c == "node_renamed"));
        assert!(!warnings.is_empty());
    }

    #[test]
    fn collisions_are_fatal_without_repairs() {
        let mut graph = graph(&["A", "B"]);
        force_collision(&mut graph);
        let policy = AutoFixPolicy {
            repair_node_collisions: false,
            ..AutoFixPolicy::default()
        };
        assert!(matches!(
            sweep_graph(&mut graph, &policy),
            Err(Error::Graph(bemgen_topology::Error::Violations(_)))
        ));
    }

    fn share_node_within_loop(graph: &mut FlowGraph, from: NodeRole, onto: NodeRole) {
        let key = graph.loop_by_name("A Air Loop").unwrap();
        graph
            .rename_node(
                RenameScope::Side(key, LoopSide::Supply),
                &allocate("A", from),
                &allocate("A", onto),
            )
            .unwrap();
    }

    #[test]
    fn same_loop_outlet_collision_is_renamed() {
        let mut graph = graph(&["A"]);
        share_node_within_loop(&mut graph, NodeRole::CoolingCoilOutlet, NodeRole::FanOutlet);
        assert!(validate(&graph)
            .iter()
            .any(|v| v.kind == ViolationKind::DuplicateOutlet));

        let warnings = sweep_graph(&mut graph, &AutoFixPolicy::default()).unwrap();
        assert_eq!(codes(&warnings), vec!["node_renamed"]);
        assert!(validate(&graph).is_empty());

        let key = graph.loop_by_name("A Air Loop").unwrap();
        let branch = graph.air_loop(key).unwrap().branch.clone();
        let fan = graph.component(branch[0]).unwrap();
        let coil = graph.component(branch[1]).unwrap();
        let heater = graph.component(branch[2]).unwrap();
        assert_eq!(fan.outlet(), Some(&allocate("A", NodeRole::FanOutlet)));
        assert_eq!(coil.inlet(), fan.outlet());
        assert_ne!(coil.outlet(), fan.outlet());
        assert_eq!(heater.inlet(), coil.outlet());
    }

    #[test]
    fn same_loop_collision_off_the_branch_is_fatal() {
        let mut graph = graph(&["A"]);
        let key = graph.loop_by_name("A Air Loop").unwrap();
        // The zone mixer consumes the terminal inlet as well
        graph
            .rename_node(
                RenameScope::Side(key, LoopSide::Demand),
                &allocate("A", NodeRole::ZoneReturn),
                &allocate("A", NodeRole::TerminalInlet),
            )
            .unwrap();
        assert!(sweep_graph(&mut graph, &AutoFixPolicy::default()).is_err());
    }

    #[test]
    fn valid_graph_passes_untouched() {
        let mut graph = graph(&["A"]);
        assert!(sweep_graph(&mut graph, &AutoFixPolicy::default())
            .unwrap()
            .is_empty());
    }

    fn square_surface(version: SchemaVersion, construction: &str, zone: &str) -> Record {
        let mut b = Record::builder(ObjectType::BuildingSurfaceDetailed, version)
            .text("Floor")
            .choice(bemgen_core::choices::SurfaceKind::Floor)
            .text(construction)
            .text(zone)
            .choice(bemgen_core::choices::OutsideBoundary::Ground)
            .blank()
            .choice(bemgen_core::choices::SunExposure::NoSun)
            .choice(bemgen_core::choices::WindExposure::NoWind)
            .autocalculate()
            .int(4);
        for (x, y) in [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)] {
            b = b.reals([x, y, 0.0]);
        }
        b.build().unwrap()
    }

    fn document(construction: &str, zone: &str) -> Document {
        let version = SchemaVersion::V9_6;
        let mut doc = Document::new(version);
        doc.push(
            Record::builder(ObjectType::Material, version)
                .text("Slab")
                .choice(bemgen_core::choices::Roughness::Rough)
                .reals([0.1, 1.0, 2000.0, 900.0])
                .build()
                .unwrap(),
        )
        .unwrap();
        doc.push(
            Record::builder(ObjectType::Construction, version)
                .text("Floor Construction")
                .text("Slab")
                .build()
                .unwrap(),
        )
        .unwrap();
        doc.push(
            Record::builder(ObjectType::Zone, version)
                .text("Z")
                .build()
                .unwrap(),
        )
        .unwrap();
        doc.push(square_surface(version, construction, zone)).unwrap();
        doc
    }

    #[test]
    fn consistent_document_passes() {
        assert!(check_references(&document("Floor Construction", "Z")).is_ok());
    }

    #[test]
    fn missing_construction_is_fatal() {
        assert!(matches!(
            check_references(&document("Nope", "Z")),
            Err(Error::Reference(ReferenceError::MissingConstruction { .. }))
        ));
    }

    #[test]
    fn unknown_zone_is_fatal() {
        assert!(matches!(
            check_references(&document("Floor Construction", "Elsewhere")),
            Err(Error::Reference(ReferenceError::UnknownZone { .. }))
        ));
    }
}
