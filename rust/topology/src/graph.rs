// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based air flow graph.
//!
//! The [`FlowGraph`] owns every HVAC component, air loop, zone connection and
//! setpoint manager of a model. Components live in a slot map with stable
//! keys; loops refer to their supply branch and demand components by key.
//! Since nothing is ever removed while a graph is built, slot map iteration
//! follows insertion order and every dump of the graph is deterministic.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::component::{Component, PortRole};
use crate::error::{Error, Result};
use crate::keys::{ComponentKey, LoopKey, LoopSide};
use crate::node::NodeId;

const SUPPLY_SIDE: &[LoopSide] = &[LoopSide::Supply];
const DEMAND_SIDE: &[LoopSide] = &[LoopSide::Demand];
const BOTH_SIDES: &[LoopSide] = &[LoopSide::Supply, LoopSide::Demand];

/// One air loop: a supply branch feeding the demand side of one or more zones.
#[derive(Debug, Clone, PartialEq)]
pub struct AirLoop {
    pub name: String,
    /// Zone the loop serves
    pub zone: String,
    pub supply_inlet: NodeId,
    pub supply_outlet: NodeId,
    pub demand_inlet: NodeId,
    pub demand_outlet: NodeId,
    /// Supply branch components, upstream first
    pub branch: Vec<ComponentKey>,
    pub splitter: Option<ComponentKey>,
    pub mixer: Option<ComponentKey>,
    /// Zone equipment fed by the splitter
    pub terminals: Vec<ComponentKey>,
    pub economizer: bool,
    /// Design supply air flow, m³/s
    pub design_supply_flow: f64,
    /// Minimum outdoor air flow, m³/s
    pub outdoor_air_flow: f64,
}

impl AirLoop {
    /// Name of the loop's branch.
    pub fn branch_name(&self) -> String {
        format!("{} Main Branch", self.name)
    }

    pub fn branch_list_name(&self) -> String {
        format!("{} Branches", self.name)
    }

    pub fn supply_path_name(&self) -> String {
        format!("{} Supply Path", self.name)
    }

    pub fn return_path_name(&self) -> String {
        format!("{} Return Path", self.name)
    }

    /// Components of one side of the loop, branch order first.
    pub fn side_components(&self, side: LoopSide) -> Vec<ComponentKey> {
        match side {
            LoopSide::Supply => self.branch.clone(),
            LoopSide::Demand => self
                .splitter
                .iter()
                .chain(self.terminals.iter())
                .chain(self.mixer.iter())
                .copied()
                .collect(),
        }
    }
}

/// Connection of a zone to its air system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneConnection {
    pub zone: String,
    pub zone_air_node: NodeId,
    pub inlet: NodeId,
    pub return_node: NodeId,
    pub equipment_list: String,
    pub thermostat: String,
    /// Air distribution unit serving the zone
    #[serde(skip)]
    pub equipment: Option<ComponentKey>,
    #[serde(skip)]
    pub air_loop: Option<LoopKey>,
}

/// What a setpoint manager computes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SetpointKind {
    /// Fixed temperature from a schedule
    Scheduled { schedule: String },
    /// Reference setpoint corrected for fan heat gain
    MixedAir {
        reference: NodeId,
        fan_inlet: NodeId,
        fan_outlet: NodeId,
    },
}

/// Binds a temperature setpoint to a node.
#[derive(Debug, Clone, PartialEq)]
pub struct SetpointManager {
    pub name: String,
    pub kind: SetpointKind,
    pub node: NodeId,
    pub air_loop: LoopKey,
}

impl SetpointManager {
    /// Every node the manager refers to, controlled node first.
    pub fn nodes(&self) -> Vec<&NodeId> {
        match &self.kind {
            SetpointKind::Scheduled { .. } => vec![&self.node],
            SetpointKind::MixedAir {
                reference,
                fan_inlet,
                fan_outlet,
            } => vec![&self.node, reference, fan_inlet, fan_outlet],
        }
    }
}

/// Where a node rename applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameScope {
    /// One component and its children
    Component(ComponentKey),
    /// One side of a loop, with its boundary nodes and attachments
    Side(LoopKey, LoopSide),
    /// A whole loop
    Loop(LoopKey),
    /// The outlets of one supply-branch component and the inlets downstream
    /// of it on the same branch
    Outlet(ComponentKey),
}

/// Counts reported in generation summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub air_loops: usize,
    pub components: usize,
    pub nodes: usize,
    pub setpoint_managers: usize,
}

/// The air flow graph of a model.
///
/// # Example
///
/// ```
/// use bemgen_topology::{Component, ComponentKind, FlowGraph, NodeId, PortRole};
///
/// let mut graph = FlowGraph::new();
/// let fan = graph.add_component(
///     Component::new("Fan", ComponentKind::FanConstantVolume)
///         .with_port(PortRole::Inlet, NodeId::new("Fan Inlet"))
///         .with_port(PortRole::Outlet, NodeId::new("Fan Outlet")),
/// );
///
/// assert_eq!(graph.component_count(), 1);
/// assert_eq!(graph.component(fan).unwrap().name, "Fan");
/// ```
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    pub(crate) components: SlotMap<ComponentKey, Component>,
    pub(crate) loops: SlotMap<LoopKey, AirLoop>,
    pub(crate) zones: Vec<ZoneConnection>,
    pub(crate) setpoint_managers: Vec<SetpointManager>,
}

impl FlowGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // --- Components ---

    /// Adds a top-level component.
    pub fn add_component(&mut self, component: Component) -> ComponentKey {
        self.components.insert(component)
    }

    /// Adds a component owned by `parent`; it inherits the parent's loop and side.
    pub fn add_child(&mut self, parent: ComponentKey, mut child: Component) -> Result<ComponentKey> {
        let (air_loop, side) = {
            let p = self
                .components
                .get(parent)
                .ok_or_else(|| Error::ComponentNotFound(format!("{:?}", parent)))?;
            (p.air_loop, p.side)
        };
        child.parent = Some(parent);
        child.air_loop = air_loop;
        child.side = side;
        let key = self.components.insert(child);
        if let Some(p) = self.components.get_mut(parent) {
            p.children.push(key);
        }
        Ok(key)
    }

    /// Returns the component for the given key, or `None` if not found.
    pub fn component(&self, key: ComponentKey) -> Option<&Component> {
        self.components.get(key)
    }

    pub fn component_mut(&mut self, key: ComponentKey) -> Option<&mut Component> {
        self.components.get_mut(key)
    }

    /// Looks a component up by name.
    pub fn component_by_name(&self, name: &str) -> Option<ComponentKey> {
        self.components
            .iter()
            .find(|(_, c)| c.name == name)
            .map(|(k, _)| k)
    }

    /// All components in insertion order.
    pub fn components(&self) -> impl Iterator<Item = (ComponentKey, &Component)> {
        self.components.iter()
    }

    /// Components without a parent, in insertion order.
    pub fn top_level(&self) -> impl Iterator<Item = (ComponentKey, &Component)> {
        self.components.iter().filter(|(_, c)| c.is_top_level())
    }

    /// Direct children of a component.
    pub fn children_of(&self, key: ComponentKey) -> Vec<(ComponentKey, &Component)> {
        self.components
            .get(key)
            .map(|c| {
                c.children
                    .iter()
                    .filter_map(|k| self.components.get(*k).map(|child| (*k, child)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// A component and all of its descendants, depth first.
    pub fn subtree(&self, key: ComponentKey) -> Vec<ComponentKey> {
        let mut out = Vec::new();
        let mut stack = vec![key];
        while let Some(k) = stack.pop() {
            if let Some(c) = self.components.get(k) {
                out.push(k);
                stack.extend(c.children.iter().rev().copied());
            }
        }
        out
    }

    /// Returns the number of components, children included.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    // --- Loops ---

    /// Adds an air loop.
    pub fn add_loop(&mut self, air_loop: AirLoop) -> LoopKey {
        self.loops.insert(air_loop)
    }

    pub fn air_loop(&self, key: LoopKey) -> Option<&AirLoop> {
        self.loops.get(key)
    }

    pub fn air_loop_mut(&mut self, key: LoopKey) -> Option<&mut AirLoop> {
        self.loops.get_mut(key)
    }

    pub fn loop_by_name(&self, name: &str) -> Option<LoopKey> {
        self.loops
            .iter()
            .find(|(_, l)| l.name == name)
            .map(|(k, _)| k)
    }

    /// All loops in insertion order.
    pub fn loops(&self) -> impl Iterator<Item = (LoopKey, &AirLoop)> {
        self.loops.iter()
    }

    pub fn loop_count(&self) -> usize {
        self.loops.len()
    }

    // --- Zones and setpoints ---

    pub fn add_zone_connection(&mut self, connection: ZoneConnection) {
        self.zones.push(connection);
    }

    pub fn zone_connections(&self) -> &[ZoneConnection] {
        &self.zones
    }

    pub fn zone_connection(&self, zone: &str) -> Option<&ZoneConnection> {
        self.zones.iter().find(|z| z.zone == zone)
    }

    pub fn add_setpoint_manager(&mut self, manager: SetpointManager) {
        self.setpoint_managers.push(manager);
    }

    pub fn setpoint_managers(&self) -> &[SetpointManager] {
        &self.setpoint_managers
    }

    // --- Queries ---

    /// Every node named anywhere in the graph, sorted.
    pub fn node_names(&self) -> BTreeSet<&NodeId> {
        let mut nodes: BTreeSet<&NodeId> = BTreeSet::new();
        for (_, c) in self.components.iter() {
            nodes.extend(c.ports.iter().map(|p| &p.node));
        }
        for (_, l) in self.loops.iter() {
            nodes.extend([&l.supply_inlet, &l.supply_outlet, &l.demand_inlet, &l.demand_outlet]);
        }
        for z in &self.zones {
            nodes.extend([&z.zone_air_node, &z.inlet, &z.return_node]);
        }
        for m in &self.setpoint_managers {
            nodes.extend(m.nodes());
        }
        nodes
    }

    /// Outdoor air inlet nodes of every loop, in loop order.
    pub fn outdoor_air_nodes(&self) -> Vec<&NodeId> {
        self.components
            .iter()
            .filter(|(_, c)| c.is_top_level())
            .flat_map(|(_, c)| c.ports_with(PortRole::OutdoorAir))
            .collect()
    }

    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            air_loops: self.loops.len(),
            components: self.components.len(),
            nodes: self.node_names().len(),
            setpoint_managers: self.setpoint_managers.len(),
        }
    }

    // --- Repairs ---

    /// Renames `from` to `to` wherever `scope` reaches. Returns the number of
    /// references changed.
    pub fn rename_node(&mut self, scope: RenameScope, from: &NodeId, to: &NodeId) -> Result<usize> {
        let (key, sides): (LoopKey, &[LoopSide]) = match scope {
            RenameScope::Component(key) => {
                if !self.components.contains_key(key) {
                    return Err(Error::ComponentNotFound(format!("{:?}", key)));
                }
                let mut changed = 0;
                for k in self.subtree(key) {
                    if let Some(c) = self.components.get_mut(k) {
                        changed += c.rename(from, to);
                    }
                }
                return Ok(changed);
            }
            RenameScope::Outlet(key) => return self.rename_outlet(key, from, to),
            RenameScope::Side(key, LoopSide::Supply) => (key, SUPPLY_SIDE),
            RenameScope::Side(key, LoopSide::Demand) => (key, DEMAND_SIDE),
            RenameScope::Loop(key) => (key, BOTH_SIDES),
        };
        let air_loop = self
            .loops
            .get(key)
            .ok_or_else(|| Error::LoopNotFound(format!("{:?}", key)))?
            .clone();

        let mut changed = 0;
        for side in sides {
            for top in air_loop.side_components(*side) {
                for k in self.subtree(top) {
                    if let Some(c) = self.components.get_mut(k) {
                        changed += c.rename(from, to);
                    }
                }
            }
        }

        let supply = sides.contains(&LoopSide::Supply);
        let demand = sides.contains(&LoopSide::Demand);
        if let Some(l) = self.loops.get_mut(key) {
            let boundary: [(&mut NodeId, bool); 4] = [
                (&mut l.supply_inlet, supply),
                (&mut l.supply_outlet, supply),
                (&mut l.demand_inlet, demand),
                (&mut l.demand_outlet, demand),
            ];
            for (node, applies) in boundary {
                if applies && node == from {
                    *node = to.clone();
                    changed += 1;
                }
            }
        }

        if demand {
            for z in self.zones.iter_mut().filter(|z| z.air_loop == Some(key)) {
                for node in [&mut z.zone_air_node, &mut z.inlet, &mut z.return_node] {
                    if node == from {
                        *node = to.clone();
                        changed += 1;
                    }
                }
            }
        }

        if supply {
            for m in self.setpoint_managers.iter_mut().filter(|m| m.air_loop == key) {
                if &m.node == from {
                    m.node = to.clone();
                    changed += 1;
                }
                if let SetpointKind::MixedAir {
                    reference,
                    fan_inlet,
                    fan_outlet,
                } = &mut m.kind
                {
                    for node in [reference, fan_inlet, fan_outlet] {
                        if node == from {
                            *node = to.clone();
                            changed += 1;
                        }
                    }
                }
            }
        }

        Ok(changed)
    }

    /// Moves the outlet of a branch component to `to` and reconnects the
    /// rest of the branch to it. Upstream components keep `from`.
    fn rename_outlet(&mut self, key: ComponentKey, from: &NodeId, to: &NodeId) -> Result<usize> {
        let component = self
            .components
            .get(key)
            .ok_or_else(|| Error::ComponentNotFound(format!("{:?}", key)))?;
        let loop_key = component
            .air_loop
            .ok_or_else(|| Error::LoopNotFound(component.name.clone()))?;
        let air_loop = self
            .loops
            .get(loop_key)
            .ok_or_else(|| Error::LoopNotFound(format!("{:?}", loop_key)))?;
        let position = air_loop
            .branch
            .iter()
            .position(|k| *k == key)
            .ok_or_else(|| Error::InvalidOptions(format!("'{}' is not on a supply branch", component.name)))?;
        let downstream = air_loop.branch[position + 1..].to_vec();
        let is_last = downstream.is_empty() && air_loop.supply_outlet == *from;

        let mut changed = 0;
        for k in self.subtree(key) {
            if let Some(c) = self.components.get_mut(k) {
                changed += c.rename_where(from, to, PortRole::is_outlet);
            }
        }
        for top in downstream {
            for k in self.subtree(top) {
                if let Some(c) = self.components.get_mut(k) {
                    changed += c.rename_where(from, to, PortRole::is_inlet);
                }
            }
        }

        if is_last {
            if let Some(l) = self.loops.get_mut(loop_key) {
                l.supply_outlet = to.clone();
                changed += 1;
            }
            for m in self.setpoint_managers.iter_mut().filter(|m| m.air_loop == loop_key) {
                if &m.node == from && matches!(m.kind, SetpointKind::Scheduled { .. }) {
                    m.node = to.clone();
                    changed += 1;
                }
                if let SetpointKind::MixedAir { reference, .. } = &mut m.kind {
                    if reference == from {
                        *reference = to.clone();
                        changed += 1;
                    }
                }
            }
        }

        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentKind;

    fn simple_loop(graph: &mut FlowGraph) -> (LoopKey, ComponentKey) {
        let key = graph.add_loop(AirLoop {
            name: "Z Air Loop".to_string(),
            zone: "Z".to_string(),
            supply_inlet: NodeId::new("SI"),
            supply_outlet: NodeId::new("SO"),
            demand_inlet: NodeId::new("DI"),
            demand_outlet: NodeId::new("DO"),
            branch: Vec::new(),
            splitter: None,
            mixer: None,
            terminals: Vec::new(),
            economizer: false,
            design_supply_flow: 1.0,
            outdoor_air_flow: 0.1,
        });
        let fan = graph.add_component(
            Component::new("Z Fan", ComponentKind::FanConstantVolume)
                .with_port(PortRole::Inlet, NodeId::new("SI"))
                .with_port(PortRole::Outlet, NodeId::new("SO"))
                .on_loop(key, LoopSide::Supply),
        );
        graph.air_loop_mut(key).unwrap().branch.push(fan);
        (key, fan)
    }

    #[test]
    fn child_inherits_loop() {
        let mut graph = FlowGraph::new();
        let (key, fan) = simple_loop(&mut graph);
        let child = graph
            .add_child(fan, Component::new("Z Motor", ComponentKind::FanConstantVolume))
            .unwrap();
        let c = graph.component(child).unwrap();
        assert_eq!(c.air_loop, Some(key));
        assert_eq!(c.side, Some(LoopSide::Supply));
        assert_eq!(graph.children_of(fan).len(), 1);
        assert_eq!(graph.top_level().count(), 1);
        assert_eq!(graph.subtree(fan), vec![fan, child]);
    }

    #[test]
    fn rename_supply_side() {
        let mut graph = FlowGraph::new();
        let (key, fan) = simple_loop(&mut graph);
        let changed = graph
            .rename_node(
                RenameScope::Side(key, LoopSide::Supply),
                &NodeId::new("SO"),
                &NodeId::new("SO 2"),
            )
            .unwrap();
        assert_eq!(changed, 2);
        assert_eq!(graph.component(fan).unwrap().outlet().unwrap().as_str(), "SO 2");
        assert_eq!(graph.air_loop(key).unwrap().supply_outlet.as_str(), "SO 2");
    }

    #[test]
    fn rename_demand_side_leaves_supply() {
        let mut graph = FlowGraph::new();
        let (key, _) = simple_loop(&mut graph);
        let changed = graph
            .rename_node(
                RenameScope::Side(key, LoopSide::Demand),
                &NodeId::new("SO"),
                &NodeId::new("X"),
            )
            .unwrap();
        assert_eq!(changed, 0);
    }

    #[test]
    fn rename_outlet_reconnects_downstream() {
        let mut graph = FlowGraph::new();
        let (key, fan) = simple_loop(&mut graph);
        // Second branch component pushed onto the fan's outlet
        graph.component_mut(fan).unwrap().rename(&NodeId::new("SO"), &NodeId::new("FO"));
        let coil = graph.add_component(
            Component::new("Z Coil", ComponentKind::DxCoolingCoil)
                .with_port(PortRole::Inlet, NodeId::new("FO"))
                .with_port(PortRole::Outlet, NodeId::new("FO"))
                .on_loop(key, LoopSide::Supply),
        );
        let heater = graph.add_component(
            Component::new("Z Heater", ComponentKind::FanConstantVolume)
                .with_port(PortRole::Inlet, NodeId::new("FO"))
                .with_port(PortRole::Outlet, NodeId::new("SO"))
                .on_loop(key, LoopSide::Supply),
        );
        graph.air_loop_mut(key).unwrap().branch.extend([coil, heater]);

        let changed = graph
            .rename_node(RenameScope::Outlet(coil), &NodeId::new("FO"), &NodeId::new("FO 2"))
            .unwrap();
        assert_eq!(changed, 2);
        let node = |k: ComponentKey, role| graph.component(k).unwrap().port(role).unwrap().as_str();
        assert_eq!(node(fan, PortRole::Outlet), "FO");
        assert_eq!(node(coil, PortRole::Inlet), "FO");
        assert_eq!(node(coil, PortRole::Outlet), "FO 2");
        assert_eq!(node(heater, PortRole::Inlet), "FO 2");
        assert_eq!(graph.air_loop(key).unwrap().supply_outlet.as_str(), "SO");
    }

    #[test]
    fn rename_outlet_needs_a_branch_component() {
        let mut graph = FlowGraph::new();
        simple_loop(&mut graph);
        let loose = graph.add_component(Component::new("Loose", ComponentKind::ZoneMixer));
        assert!(graph
            .rename_node(RenameScope::Outlet(loose), &NodeId::new("A"), &NodeId::new("B"))
            .is_err());
    }

    #[test]
    fn node_names_are_sorted_and_unique() {
        let mut graph = FlowGraph::new();
        simple_loop(&mut graph);
        let names: Vec<&str> = graph.node_names().into_iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["DI", "DO", "SI", "SO"]);
        assert_eq!(graph.summary().nodes, 4);
    }
}
