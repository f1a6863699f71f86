// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection properties of built air systems.

use std::collections::BTreeMap;

use approx::assert_relative_eq;
use bemgen_topology::{
    build_air_systems, validate, ClimateZone, ComponentKind, FlowGraph, HeatingFuel, HvacOptions,
    NodeId, RenameScope, SystemType, ViolationKind, ZoneLoad,
};

fn zones(names: &[&str]) -> Vec<ZoneLoad> {
    names
        .iter()
        .map(|n| ZoneLoad {
            name: n.to_string(),
            floor_area: 150.0,
            volume: 525.0,
        })
        .collect()
}

fn build(system_type: SystemType, climate: u8, economizer: bool) -> FlowGraph {
    let options = HvacOptions {
        system_type,
        climate: ClimateZone::new(climate).expect("valid climate"),
        economizer,
        ..Default::default()
    };
    build_air_systems(&zones(&["Story1_Core", "Story1_Perimeter_1", "Story2_Core"]), &options)
        .expect("systems build")
        .graph
}

#[test]
fn every_node_has_at_most_one_producer() {
    for system_type in [SystemType::VavReheat, SystemType::ConstantVolume] {
        for economizer in [false, true] {
            let graph = build(system_type, 5, economizer);
            let mut producers: BTreeMap<&NodeId, usize> = BTreeMap::new();
            for (_, c) in graph.top_level() {
                for node in c.outlets() {
                    *producers.entry(node).or_default() += 1;
                }
            }
            for (node, count) in producers {
                assert_eq!(count, 1, "{} produced {} times", node, count);
            }
            assert!(validate(&graph).is_empty());
        }
    }
}

#[test]
fn supply_outlet_never_aliases_demand_inlet() {
    let graph = build(SystemType::VavReheat, 3, true);
    for (_, l) in graph.loops() {
        assert_ne!(l.supply_outlet, l.demand_inlet);
        assert_ne!(l.demand_outlet, l.supply_inlet);
        let last = graph.component(*l.branch.last().unwrap()).unwrap();
        assert_eq!(last.outlet(), Some(&l.supply_outlet));
    }
}

#[test]
fn fuel_choice_is_uniform() {
    let warm = build(SystemType::VavReheat, 2, false);
    let cold = build(SystemType::VavReheat, 7, false);
    let fuels = |g: &FlowGraph| {
        g.components()
            .filter_map(|(_, c)| match c.kind {
                ComponentKind::HeatingCoil(fuel) => Some(fuel),
                _ => None,
            })
            .collect::<Vec<_>>()
    };
    assert!(fuels(&warm).iter().all(|f| *f == HeatingFuel::Electric));
    assert!(fuels(&cold).iter().all(|f| matches!(f, HeatingFuel::Fuel(_))));
    assert_eq!(fuels(&cold).len(), 6);
}

#[test]
fn design_flows_scale_with_area() {
    let graph = build(SystemType::VavReheat, 4, true);
    for (_, l) in graph.loops() {
        assert_relative_eq!(l.design_supply_flow, 150.0 * 0.005, epsilon = 1e-12);
        assert_relative_eq!(l.outdoor_air_flow, 150.0 * 0.0006, epsilon = 1e-12);
        assert!(l.outdoor_air_flow <= l.design_supply_flow);
    }
}

#[test]
fn forced_collision_is_caught_and_repaired() {
    let mut graph = build(SystemType::VavReheat, 4, false);
    let core = graph.loop_by_name("Story1_Core Air Loop").unwrap();
    let other = graph.loop_by_name("Story2_Core Air Loop").unwrap();
    let taken = graph.air_loop(core).unwrap().supply_outlet.clone();
    let original = graph.air_loop(other).unwrap().supply_outlet.clone();

    // Point the second loop's supply outlet at the first loop's
    graph
        .rename_node(RenameScope::Side(other, bemgen_topology::LoopSide::Supply), &original, &taken)
        .unwrap();
    let violations = validate(&graph);
    assert!(violations
        .iter()
        .any(|v| v.kind == ViolationKind::DuplicateOutlet && v.node == taken));
    assert!(violations.iter().all(|v| v.kind.is_repairable()));

    let fresh = taken.disambiguated(2);
    let changed = graph
        .rename_node(RenameScope::Side(other, bemgen_topology::LoopSide::Supply), &taken, &fresh)
        .unwrap();
    assert!(changed >= 3);
    assert!(validate(&graph).is_empty());
}

#[test]
fn duplicate_zone_names_are_rejected() {
    let options = HvacOptions::default();
    assert!(build_air_systems(&zones(&["A", "B", "A"]), &options).is_err());
}
