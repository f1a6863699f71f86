// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Node graph validation.
//!
//! Every node must be produced by exactly one component outlet and consumed
//! by exactly one inlet, branch components must chain outlet to inlet, and
//! setpoint managers must sit on the node their kind requires. Violations are
//! collected, never short-circuited, so a caller sees the whole picture.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::component::PortRole;
use crate::graph::{FlowGraph, SetpointKind};
use crate::keys::{LoopKey, LoopSide};
use crate::node::{NodeId, MAX_NODE_NAME_LEN};

/// Kind of node graph violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViolationKind {
    /// Node produced by more than one outlet
    DuplicateOutlet,
    /// Node consumed by more than one inlet
    DuplicateInlet,
    /// Supply and demand boundary nodes of a loop coincide
    SupplyDemandAlias,
    /// A branch component's outlet is not the next component's inlet
    BrokenChain,
    /// Node consumed but never produced
    DanglingInlet,
    /// Setpoint manager refers to a node nothing else names
    UnknownSetpointNode,
    /// Setpoint manager controls the wrong node
    MisplacedSetpoint,
    /// Node name longer than the engine accepts
    NameTooLong,
}

impl ViolationKind {
    /// Returns the kind as a stable identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::DuplicateOutlet => "duplicate_outlet",
            ViolationKind::DuplicateInlet => "duplicate_inlet",
            ViolationKind::SupplyDemandAlias => "supply_demand_alias",
            ViolationKind::BrokenChain => "broken_chain",
            ViolationKind::DanglingInlet => "dangling_inlet",
            ViolationKind::UnknownSetpointNode => "unknown_setpoint_node",
            ViolationKind::MisplacedSetpoint => "misplaced_setpoint",
            ViolationKind::NameTooLong => "name_too_long",
        }
    }

    /// Collisions can be fixed by renaming; everything else is fatal.
    pub fn is_repairable(&self) -> bool {
        matches!(
            self,
            ViolationKind::DuplicateOutlet
                | ViolationKind::DuplicateInlet
                | ViolationKind::SupplyDemandAlias
        )
    }
}

/// A node graph violation with the components and loop involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub node: NodeId,
    /// Owners involved, in graph order
    pub components: Vec<String>,
    pub air_loop: Option<String>,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at node '{}'", self.kind.as_str(), self.node)?;
        if !self.components.is_empty() {
            write!(f, " ({})", self.components.join(", "))?;
        }
        if let Some(name) = &self.air_loop {
            write!(f, " in loop '{}'", name)?;
        }
        Ok(())
    }
}

/// Something that produces or consumes a node.
#[derive(Debug, Clone)]
struct Owner {
    name: String,
    air_loop: Option<LoopKey>,
}

/// Checks the whole graph and returns every violation found, sorted by kind
/// and node.
pub fn validate(graph: &FlowGraph) -> Vec<Violation> {
    let loop_name = |key: Option<LoopKey>| {
        key.and_then(|k| graph.air_loop(k))
            .map(|l| l.name.clone())
    };

    let mut producers: BTreeMap<&NodeId, Vec<Owner>> = BTreeMap::new();
    let mut consumers: BTreeMap<&NodeId, Vec<Owner>> = BTreeMap::new();
    // Consumed nodes fed from outside the graph
    let mut external: BTreeSet<&NodeId> = BTreeSet::new();

    for (_, c) in graph.top_level() {
        let owner = Owner {
            name: c.name.clone(),
            air_loop: c.air_loop,
        };
        for port in &c.ports {
            if port.role == PortRole::OutdoorAir {
                external.insert(&port.node);
            }
            let map = if port.role.is_inlet() {
                &mut consumers
            } else {
                &mut producers
            };
            map.entry(&port.node).or_default().push(owner.clone());
        }
    }

    for z in graph.zone_connections() {
        let owner = Owner {
            name: z.zone.clone(),
            air_loop: z.air_loop,
        };
        consumers.entry(&z.inlet).or_default().push(owner.clone());
        producers.entry(&z.return_node).or_default().push(owner.clone());
        producers.entry(&z.zone_air_node).or_default().push(owner);
    }

    for (_, l) in graph.loops() {
        external.insert(&l.supply_inlet);
        external.insert(&l.demand_inlet);
    }

    let mut violations = Vec::new();

    // Duplicates
    for (kind, map) in [
        (ViolationKind::DuplicateOutlet, &producers),
        (ViolationKind::DuplicateInlet, &consumers),
    ] {
        for (node, owners) in map {
            if owners.len() > 1 {
                violations.push(Violation {
                    kind,
                    node: (*node).clone(),
                    components: owners.iter().map(|o| o.name.clone()).collect(),
                    air_loop: owners.last().and_then(|o| loop_name(o.air_loop)),
                });
            }
        }
    }

    for (_, l) in graph.loops() {
        let alias = |node: &NodeId, components: Vec<String>| Violation {
            kind: ViolationKind::SupplyDemandAlias,
            node: node.clone(),
            components,
            air_loop: Some(l.name.clone()),
        };

        // Loop boundaries
        if l.supply_outlet == l.demand_inlet {
            violations.push(alias(&l.supply_outlet, Vec::new()));
        }
        if l.demand_outlet == l.supply_inlet {
            violations.push(alias(&l.demand_outlet, Vec::new()));
        }

        // Supply-side outlets reused on the demand side
        let supply_outlets: BTreeSet<&NodeId> = l
            .branch
            .iter()
            .filter_map(|k| graph.component(*k))
            .flat_map(|c| c.outlets())
            .collect();
        for key in l.side_components(LoopSide::Demand) {
            let Some(c) = graph.component(key) else {
                continue;
            };
            for node in c.inlets() {
                if supply_outlets.contains(node) && node != &l.supply_outlet {
                    violations.push(alias(node, vec![c.name.clone()]));
                }
            }
        }

        // Chain
        let chain: Vec<_> = l.branch.iter().filter_map(|k| graph.component(*k)).collect();
        match (chain.first(), chain.last()) {
            (Some(first), Some(last)) => {
                if first.inlet() != Some(&l.supply_inlet) {
                    violations.push(Violation {
                        kind: ViolationKind::BrokenChain,
                        node: l.supply_inlet.clone(),
                        components: vec![first.name.clone()],
                        air_loop: Some(l.name.clone()),
                    });
                }
                if last.outlet() != Some(&l.supply_outlet) {
                    violations.push(Violation {
                        kind: ViolationKind::BrokenChain,
                        node: l.supply_outlet.clone(),
                        components: vec![last.name.clone()],
                        air_loop: Some(l.name.clone()),
                    });
                }
            }
            _ => violations.push(Violation {
                kind: ViolationKind::BrokenChain,
                node: l.supply_inlet.clone(),
                components: Vec::new(),
                air_loop: Some(l.name.clone()),
            }),
        }
        for pair in chain.windows(2) {
            let (up, down) = (pair[0], pair[1]);
            if up.outlet().is_none() || up.outlet() != down.inlet() {
                violations.push(Violation {
                    kind: ViolationKind::BrokenChain,
                    node: up
                        .outlet()
                        .or(down.inlet())
                        .cloned()
                        .unwrap_or_else(|| NodeId::new("")),
                    components: vec![up.name.clone(), down.name.clone()],
                    air_loop: Some(l.name.clone()),
                });
            }
        }
    }

    // Dangling inlets
    for (node, owners) in &consumers {
        if !producers.contains_key(node) && !external.contains(node) {
            violations.push(Violation {
                kind: ViolationKind::DanglingInlet,
                node: (*node).clone(),
                components: owners.iter().map(|o| o.name.clone()).collect(),
                air_loop: owners.first().and_then(|o| loop_name(o.air_loop)),
            });
        }
    }

    // Setpoint managers
    let known = graph.node_names_excluding_setpoints();
    for m in graph.setpoint_managers() {
        let air_loop = loop_name(Some(m.air_loop));
        for node in m.nodes() {
            if !known.contains(node) {
                violations.push(Violation {
                    kind: ViolationKind::UnknownSetpointNode,
                    node: node.clone(),
                    components: vec![m.name.clone()],
                    air_loop: air_loop.clone(),
                });
            }
        }

        let Some(l) = graph.air_loop(m.air_loop) else {
            continue;
        };
        let placed = match &m.kind {
            SetpointKind::Scheduled { .. } => m.node == l.supply_outlet,
            SetpointKind::MixedAir { .. } => l
                .branch
                .iter()
                .filter_map(|k| graph.component(*k))
                .any(|c| c.outlet() == Some(&m.node)),
        };
        if !placed {
            violations.push(Violation {
                kind: ViolationKind::MisplacedSetpoint,
                node: m.node.clone(),
                components: vec![m.name.clone()],
                air_loop,
            });
        }
    }

    // Name length
    for node in graph.node_names() {
        if node.len() > MAX_NODE_NAME_LEN {
            violations.push(Violation {
                kind: ViolationKind::NameTooLong,
                node: node.clone(),
                components: Vec::new(),
                air_loop: None,
            });
        }
    }

    violations.sort_by(|a, b| (a.kind, &a.node).cmp(&(b.kind, &b.node)));
    violations
}

impl FlowGraph {
    /// Nodes named by components, loops and zones.
    fn node_names_excluding_setpoints(&self) -> BTreeSet<&NodeId> {
        let mut nodes: BTreeSet<&NodeId> = BTreeSet::new();
        for (_, c) in self.components() {
            nodes.extend(c.ports.iter().map(|p| &p.node));
        }
        for (_, l) in self.loops() {
            nodes.extend([&l.supply_inlet, &l.supply_outlet, &l.demand_inlet, &l.demand_outlet]);
        }
        for z in self.zone_connections() {
            nodes.extend([&z.zone_air_node, &z.inlet, &z.return_node]);
        }
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, ComponentKind};
    use crate::graph::{AirLoop, SetpointManager};

    fn n(name: &str) -> NodeId {
        NodeId::new(name)
    }

    /// Two-component loop: fan SI -> F, coil F -> SO, splitter DI -> T
    fn graph() -> (FlowGraph, LoopKey) {
        let mut g = FlowGraph::new();
        let key = g.add_loop(AirLoop {
            name: "L".to_string(),
            zone: "Z".to_string(),
            supply_inlet: n("SI"),
            supply_outlet: n("SO"),
            demand_inlet: n("DI"),
            demand_outlet: n("DO"),
            branch: Vec::new(),
            splitter: None,
            mixer: None,
            terminals: Vec::new(),
            economizer: false,
            design_supply_flow: 1.0,
            outdoor_air_flow: 0.1,
        });
        let fan = g.add_component(
            Component::new("Fan", ComponentKind::FanConstantVolume)
                .with_port(PortRole::Inlet, n("SI"))
                .with_port(PortRole::Outlet, n("F"))
                .on_loop(key, LoopSide::Supply),
        );
        let coil = g.add_component(
            Component::new("Coil", ComponentKind::CoilSystemCoolingDx)
                .with_port(PortRole::Inlet, n("F"))
                .with_port(PortRole::Outlet, n("SO"))
                .on_loop(key, LoopSide::Supply),
        );
        let splitter = g.add_component(
            Component::new("Splitter", ComponentKind::ZoneSplitter)
                .with_port(PortRole::Inlet, n("DI"))
                .with_port(PortRole::Outlet, n("T"))
                .on_loop(key, LoopSide::Demand),
        );
        let mixer = g.add_component(
            Component::new("Mixer", ComponentKind::ZoneMixer)
                .with_port(PortRole::Inlet, n("T"))
                .with_port(PortRole::Outlet, n("DO"))
                .on_loop(key, LoopSide::Demand),
        );
        let l = g.air_loop_mut(key).unwrap();
        l.branch = vec![fan, coil];
        l.splitter = Some(splitter);
        l.mixer = Some(mixer);
        (g, key)
    }

    #[test]
    fn clean_graph_has_no_violations() {
        let (g, _) = graph();
        assert_eq!(validate(&g), Vec::new());
    }

    #[test]
    fn duplicate_outlet_is_reported() {
        let (mut g, key) = graph();
        g.add_component(
            Component::new("Second Fan", ComponentKind::FanConstantVolume)
                .with_port(PortRole::Inlet, n("SO"))
                .with_port(PortRole::Outlet, n("F"))
                .on_loop(key, LoopSide::Supply),
        );
        let v = validate(&g);
        let dup = v.iter().find(|v| v.kind == ViolationKind::DuplicateOutlet).unwrap();
        assert_eq!(dup.node, n("F"));
        assert_eq!(dup.components, vec!["Fan".to_string(), "Second Fan".to_string()]);
        assert_eq!(dup.air_loop.as_deref(), Some("L"));
        assert!(dup.kind.is_repairable());
    }

    #[test]
    fn alias_between_supply_outlet_and_demand_inlet() {
        let (mut g, key) = graph();
        g.air_loop_mut(key).unwrap().demand_inlet = n("SO");
        let v = validate(&g);
        assert!(v.iter().any(|v| v.kind == ViolationKind::SupplyDemandAlias && v.node == n("SO")));
    }

    #[test]
    fn broken_chain_and_dangling_inlet() {
        let (mut g, key) = graph();
        let coil = g.air_loop(key).unwrap().branch[1];
        g.component_mut(coil).unwrap().ports[0].node = n("Nowhere");
        let kinds: Vec<_> = validate(&g).into_iter().map(|v| v.kind).collect();
        assert!(kinds.contains(&ViolationKind::BrokenChain));
        assert!(kinds.contains(&ViolationKind::DanglingInlet));
        assert!(!kinds.iter().all(|k| k.is_repairable()));
    }

    #[test]
    fn setpoint_checks() {
        let (mut g, key) = graph();
        g.add_setpoint_manager(SetpointManager {
            name: "Supply Temp".to_string(),
            kind: SetpointKind::Scheduled {
                schedule: "S".to_string(),
            },
            node: n("F"),
            air_loop: key,
        });
        g.add_setpoint_manager(SetpointManager {
            name: "Mixed".to_string(),
            kind: SetpointKind::MixedAir {
                reference: n("SO"),
                fan_inlet: n("SI"),
                fan_outlet: n("Missing"),
            },
            node: n("F"),
            air_loop: key,
        });
        let v = validate(&g);
        let misplaced: Vec<_> = v
            .iter()
            .filter(|v| v.kind == ViolationKind::MisplacedSetpoint)
            .collect();
        assert_eq!(misplaced.len(), 1);
        assert_eq!(misplaced[0].components, vec!["Supply Temp".to_string()]);
        let unknown: Vec<_> = v
            .iter()
            .filter(|v| v.kind == ViolationKind::UnknownSetpointNode)
            .collect();
        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown[0].node, n("Missing"));
    }

    #[test]
    fn long_names_are_reported() {
        let (mut g, key) = graph();
        let long = n(&"N".repeat(MAX_NODE_NAME_LEN + 1));
        g.air_loop_mut(key).unwrap().demand_outlet = long.clone();
        let mixer = g.air_loop(key).unwrap().mixer.unwrap();
        g.component_mut(mixer).unwrap().ports[1].node = long.clone();
        let v = validate(&g);
        assert!(v.iter().any(|v| v.kind == ViolationKind::NameTooLong && v.node == long));
    }
}
