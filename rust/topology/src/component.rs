// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HVAC components and their ports.
//!
//! A component owns typed ports, each naming one node. Child components
//! (the DX coil inside its coil system, the reheat coil inside a terminal,
//! the outdoor-air mixer inside the outdoor-air system, the terminal inside
//! its air distribution unit) repeat nodes their parent already exposes, so
//! graph checks only look at top-level components.

use bemgen_core::choices::BranchComponentType;
use bemgen_core::ObjectType;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::climate::HeatingFuel;
use crate::keys::{ComponentKey, LoopKey, LoopSide};
use crate::node::NodeId;

/// What a port does for its component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortRole {
    /// Main air inlet
    Inlet,
    /// Main air outlet
    Outlet,
    /// Outdoor air stream, fed from outside the graph
    OutdoorAir,
    /// Relief air stream leaving the building
    Relief,
    /// Damper outlet of a terminal, feeding its reheat coil
    Damper,
}

impl PortRole {
    /// Whether the component consumes the node.
    pub fn is_inlet(&self) -> bool {
        matches!(self, PortRole::Inlet | PortRole::OutdoorAir)
    }

    /// Whether the component produces the node.
    pub fn is_outlet(&self) -> bool {
        !self.is_inlet()
    }
}

/// A node attached to a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub role: PortRole,
    pub node: NodeId,
}

impl Port {
    pub fn inlet(node: NodeId) -> Self {
        Self { role: PortRole::Inlet, node }
    }

    pub fn outlet(node: NodeId) -> Self {
        Self { role: PortRole::Outlet, node }
    }

    pub fn new(role: PortRole, node: NodeId) -> Self {
        Self { role, node }
    }
}

/// Kind of an HVAC component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    OutdoorAirSystem,
    OutdoorAirMixer,
    FanVariableVolume,
    FanConstantVolume,
    CoilSystemCoolingDx,
    DxCoolingCoil,
    HeatingCoil(HeatingFuel),
    ZoneSplitter,
    ZoneMixer,
    AirDistributionUnit,
    TerminalVavReheat,
    TerminalConstantVolume,
}

impl ComponentKind {
    /// Object type the component is written as.
    pub fn object_type(&self) -> ObjectType {
        match self {
            ComponentKind::OutdoorAirSystem => ObjectType::AirLoopHvacOutdoorAirSystem,
            ComponentKind::OutdoorAirMixer => ObjectType::OutdoorAirMixer,
            ComponentKind::FanVariableVolume => ObjectType::FanVariableVolume,
            ComponentKind::FanConstantVolume => ObjectType::FanConstantVolume,
            ComponentKind::CoilSystemCoolingDx => ObjectType::CoilSystemCoolingDx,
            ComponentKind::DxCoolingCoil => ObjectType::CoilCoolingDxSingleSpeed,
            ComponentKind::HeatingCoil(HeatingFuel::Electric) => ObjectType::CoilHeatingElectric,
            ComponentKind::HeatingCoil(HeatingFuel::Fuel(_)) => ObjectType::CoilHeatingFuel,
            ComponentKind::ZoneSplitter => ObjectType::AirLoopHvacZoneSplitter,
            ComponentKind::ZoneMixer => ObjectType::AirLoopHvacZoneMixer,
            ComponentKind::AirDistributionUnit => ObjectType::ZoneHvacAirDistributionUnit,
            ComponentKind::TerminalVavReheat => ObjectType::AirTerminalVavReheat,
            ComponentKind::TerminalConstantVolume => ObjectType::AirTerminalConstantVolumeNoReheat,
        }
    }

    /// Branch component type, for components that may sit on a supply branch.
    pub fn branch_type(&self) -> Option<BranchComponentType> {
        match self {
            ComponentKind::OutdoorAirSystem => Some(BranchComponentType::OutdoorAirSystem),
            ComponentKind::FanVariableVolume => Some(BranchComponentType::FanVariableVolume),
            ComponentKind::FanConstantVolume => Some(BranchComponentType::FanConstantVolume),
            ComponentKind::CoilSystemCoolingDx => Some(BranchComponentType::CoilSystemCoolingDx),
            ComponentKind::HeatingCoil(fuel) => Some(fuel.branch_type()),
            _ => None,
        }
    }

    pub fn is_fan(&self) -> bool {
        matches!(
            self,
            ComponentKind::FanVariableVolume | ComponentKind::FanConstantVolume
        )
    }
}

/// An HVAC component stored in the flow graph arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub name: String,
    pub kind: ComponentKind,
    pub ports: SmallVec<[Port; 4]>,
    pub parent: Option<ComponentKey>,
    pub children: SmallVec<[ComponentKey; 2]>,
    pub air_loop: Option<LoopKey>,
    pub side: Option<LoopSide>,
}

impl Component {
    pub fn new(name: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ports: SmallVec::new(),
            parent: None,
            children: SmallVec::new(),
            air_loop: None,
            side: None,
        }
    }

    /// Adds a port (builder style).
    pub fn with_port(mut self, role: PortRole, node: NodeId) -> Self {
        self.ports.push(Port::new(role, node));
        self
    }

    /// Places the component on one side of an air loop (builder style).
    pub fn on_loop(mut self, air_loop: LoopKey, side: LoopSide) -> Self {
        self.air_loop = Some(air_loop);
        self.side = Some(side);
        self
    }

    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }

    /// First node with the given role.
    pub fn port(&self, role: PortRole) -> Option<&NodeId> {
        self.ports.iter().find(|p| p.role == role).map(|p| &p.node)
    }

    /// Main inlet node.
    pub fn inlet(&self) -> Option<&NodeId> {
        self.port(PortRole::Inlet)
    }

    /// Main outlet node.
    pub fn outlet(&self) -> Option<&NodeId> {
        self.port(PortRole::Outlet)
    }

    /// Every node the component consumes.
    pub fn inlets(&self) -> impl Iterator<Item = &NodeId> {
        self.ports.iter().filter(|p| p.role.is_inlet()).map(|p| &p.node)
    }

    /// Every node the component produces.
    pub fn outlets(&self) -> impl Iterator<Item = &NodeId> {
        self.ports.iter().filter(|p| p.role.is_outlet()).map(|p| &p.node)
    }

    /// All nodes with the given role, in port order.
    pub fn ports_with(&self, role: PortRole) -> impl Iterator<Item = &NodeId> {
        self.ports.iter().filter(move |p| p.role == role).map(|p| &p.node)
    }

    /// Renames every port using `from`. Returns the number of ports changed.
    pub(crate) fn rename(&mut self, from: &NodeId, to: &NodeId) -> usize {
        self.rename_where(from, to, |_| true)
    }

    /// Renames the ports using `from` whose role passes `applies`.
    pub(crate) fn rename_where(
        &mut self,
        from: &NodeId,
        to: &NodeId,
        applies: impl Fn(&PortRole) -> bool,
    ) -> usize {
        let mut changed = 0;
        for port in self.ports.iter_mut().filter(|p| &p.node == from && applies(&p.role)) {
            port.node = to.clone();
            changed += 1;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bemgen_core::choices::FuelType;

    #[test]
    fn ports_by_direction() {
        let mixer = Component::new("OA Mixer", ComponentKind::OutdoorAirMixer)
            .with_port(PortRole::Inlet, NodeId::new("Return"))
            .with_port(PortRole::OutdoorAir, NodeId::new("Outside"))
            .with_port(PortRole::Relief, NodeId::new("Relief"))
            .with_port(PortRole::Outlet, NodeId::new("Mixed"));
        let inlets: Vec<_> = mixer.inlets().map(|n| n.as_str()).collect();
        let outlets: Vec<_> = mixer.outlets().map(|n| n.as_str()).collect();
        assert_eq!(inlets, vec!["Return", "Outside"]);
        assert_eq!(outlets, vec!["Relief", "Mixed"]);
        assert_eq!(mixer.inlet().unwrap().as_str(), "Return");
        assert_eq!(mixer.outlet().unwrap().as_str(), "Mixed");
    }

    #[test]
    fn heating_coil_types_follow_fuel() {
        let gas = ComponentKind::HeatingCoil(HeatingFuel::Fuel(FuelType::NaturalGas));
        assert_eq!(gas.object_type(), ObjectType::CoilHeatingFuel);
        assert_eq!(gas.branch_type(), Some(BranchComponentType::CoilHeatingFuel));
        let electric = ComponentKind::HeatingCoil(HeatingFuel::Electric);
        assert_eq!(electric.object_type(), ObjectType::CoilHeatingElectric);
        assert_eq!(ComponentKind::ZoneSplitter.branch_type(), None);
    }

    #[test]
    fn rename_ports() {
        let mut fan = Component::new("Fan", ComponentKind::FanConstantVolume)
            .with_port(PortRole::Inlet, NodeId::new("A"))
            .with_port(PortRole::Outlet, NodeId::new("B"));
        assert_eq!(fan.rename(&NodeId::new("B"), &NodeId::new("C")), 1);
        assert_eq!(fan.outlet().unwrap().as_str(), "C");
        assert_eq!(fan.rename(&NodeId::new("B"), &NodeId::new("C")), 0);
    }
}
