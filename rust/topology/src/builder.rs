// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HVAC topology builder.
//!
//! Builds one air loop per zone. The supply branch is chained component by
//! component: each outlet is allocated from the zone name and becomes the
//! next component's inlet, and the last outlet is the loop's supply outlet.
//! The builder is a pure function of the zone list, so callers regenerate the
//! whole graph whenever the zone list changes.

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::climate::{ClimateZone, HeatingFuel};
use crate::component::{Component, ComponentKind, Port, PortRole};
use crate::error::{Error, Result};
use crate::graph::{AirLoop, FlowGraph, SetpointKind, SetpointManager, ZoneConnection};
use crate::keys::{ComponentKey, LoopKey, LoopSide};
use crate::node::{allocate, NodeId, NodeRole};

/// Schedule holding the supply air temperature setpoint.
pub const SUPPLY_AIR_TEMPERATURE_SCHEDULE: &str = "Supply Air Temperature";
/// Schedule holding the zone heating setpoint.
pub const HEATING_SETPOINT_SCHEDULE: &str = "Heating Setpoint";
/// Schedule holding the zone cooling setpoint.
pub const COOLING_SETPOINT_SCHEDULE: &str = "Cooling Setpoint";
/// Schedule selecting the dual-setpoint thermostat control type.
pub const CONTROL_TYPE_SCHEDULE: &str = "Thermostat Control Type";
/// Schedule that is always 1.
pub const ALWAYS_ON_SCHEDULE: &str = "Always On";

/// Air system configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemType {
    /// Variable-volume fan, VAV terminals with reheat
    #[default]
    VavReheat,
    /// Constant-volume fan, terminals without reheat
    ConstantVolume,
}

impl SystemType {
    fn fan_kind(&self) -> ComponentKind {
        match self {
            SystemType::VavReheat => ComponentKind::FanVariableVolume,
            SystemType::ConstantVolume => ComponentKind::FanConstantVolume,
        }
    }

    fn terminal_kind(&self) -> ComponentKind {
        match self {
            SystemType::VavReheat => ComponentKind::TerminalVavReheat,
            SystemType::ConstantVolume => ComponentKind::TerminalConstantVolume,
        }
    }
}

/// Design values shared by every air system of a model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HvacDefaults {
    /// Supply air flow per floor area, m³/s per m²
    pub supply_flow_per_area: f64,
    /// Minimum outdoor air flow per floor area, m³/s per m²
    pub outdoor_air_per_area: f64,
    /// Supply air temperature setpoint, °C
    pub supply_air_temperature: f64,
    /// Zone heating setpoint, °C
    pub heating_setpoint: f64,
    /// Zone cooling setpoint, °C
    pub cooling_setpoint: f64,
    /// Fan total efficiency
    pub fan_efficiency: f64,
    /// Fan pressure rise, Pa
    pub fan_pressure_rise: f64,
    /// Fan motor efficiency
    pub motor_efficiency: f64,
    /// Minimum flow fraction of VAV terminals
    pub minimum_flow_fraction: f64,
    /// Rated COP of the DX cooling coils
    pub cooling_cop: f64,
    /// Burner efficiency of fuel-fired coils
    pub burner_efficiency: f64,
}

impl Default for HvacDefaults {
    fn default() -> Self {
        Self {
            supply_flow_per_area: 0.005,
            outdoor_air_per_area: 0.0006,
            supply_air_temperature: 12.8,
            heating_setpoint: 21.0,
            cooling_setpoint: 24.0,
            fan_efficiency: 0.6,
            fan_pressure_rise: 600.0,
            motor_efficiency: 0.9,
            minimum_flow_fraction: 0.3,
            cooling_cop: 3.0,
            burner_efficiency: 0.8,
        }
    }
}

impl HvacDefaults {
    fn validate(&self) -> Result<()> {
        let positive = [
            ("supply flow per area", self.supply_flow_per_area),
            ("fan efficiency", self.fan_efficiency),
            ("fan pressure rise", self.fan_pressure_rise),
            ("motor efficiency", self.motor_efficiency),
            ("cooling COP", self.cooling_cop),
            ("burner efficiency", self.burner_efficiency),
        ];
        for (what, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidOptions(format!("{} must be positive, got {}", what, value)));
            }
        }
        if !self.outdoor_air_per_area.is_finite() || self.outdoor_air_per_area < 0.0 {
            return Err(Error::InvalidOptions(format!(
                "outdoor air per area must not be negative, got {}",
                self.outdoor_air_per_area
            )));
        }
        if self.heating_setpoint >= self.cooling_setpoint {
            return Err(Error::InvalidOptions(format!(
                "heating setpoint {} must be below cooling setpoint {}",
                self.heating_setpoint, self.cooling_setpoint
            )));
        }
        if !(0.0..=1.0).contains(&self.minimum_flow_fraction) {
            return Err(Error::InvalidOptions(format!(
                "minimum flow fraction {} outside [0, 1]",
                self.minimum_flow_fraction
            )));
        }
        Ok(())
    }
}

/// Options for building the air systems of a model.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HvacOptions {
    pub system_type: SystemType,
    pub climate: ClimateZone,
    pub economizer: bool,
    #[serde(default)]
    pub design: HvacDefaults,
}

/// A conditioned zone as the builder sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneLoad {
    pub name: String,
    /// m²
    pub floor_area: f64,
    /// m³
    pub volume: f64,
}

/// Non-fatal findings of the builder.
#[derive(Debug, Clone, PartialEq)]
pub enum HvacWarning {
    EconomizerDisabled { air_loop: String, reason: String },
}

impl HvacWarning {
    /// Stable identifier for machine consumers.
    pub fn code(&self) -> &'static str {
        match self {
            HvacWarning::EconomizerDisabled { .. } => "economizer_disabled",
        }
    }
}

impl fmt::Display for HvacWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HvacWarning::EconomizerDisabled { air_loop, reason } => {
                write!(f, "economizer disabled on {}: {}", air_loop, reason)
            }
        }
    }
}

/// Result of a build: the graph and the warnings collected on the way.
#[derive(Debug, Clone)]
pub struct HvacOutput {
    pub graph: FlowGraph,
    pub warnings: Vec<HvacWarning>,
    pub heating_fuel: HeatingFuel,
}

/// Names of the objects that make up a loop's outdoor air system.
pub fn outdoor_air_names(zone: &str) -> OutdoorAirNames {
    OutdoorAirNames {
        system: format!("{} OA System", zone),
        mixer: format!("{} OA Mixer", zone),
        controller: format!("{} OA Controller", zone),
        controller_list: format!("{} OA Controllers", zone),
        equipment_list: format!("{} OA Equipment", zone),
    }
}

/// See [`outdoor_air_names`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutdoorAirNames {
    pub system: String,
    pub mixer: String,
    pub controller: String,
    pub controller_list: String,
    pub equipment_list: String,
}

/// Builds one air loop per zone.
///
/// The heating fuel is decided once from the climate and used for every
/// heating coil and reheat coil of the model.
pub fn build_air_systems(zones: &[ZoneLoad], options: &HvacOptions) -> Result<HvacOutput> {
    options.design.validate()?;

    let mut seen = FxHashSet::default();
    for zone in zones {
        if zone.name.trim().is_empty() {
            return Err(Error::InvalidOptions("zone with an empty name".to_string()));
        }
        if !seen.insert(zone.name.as_str()) {
            return Err(Error::InvalidOptions(format!("zone '{}' listed twice", zone.name)));
        }
        if !zone.floor_area.is_finite() || zone.floor_area <= 0.0 {
            return Err(Error::InvalidOptions(format!(
                "zone '{}' has floor area {}",
                zone.name, zone.floor_area
            )));
        }
    }

    let fuel = HeatingFuel::for_climate(options.climate);
    let mut graph = FlowGraph::new();
    let mut warnings = Vec::new();

    for zone in zones {
        build_zone_loop(&mut graph, &mut warnings, zone, options, fuel)?;
    }

    Ok(HvacOutput {
        graph,
        warnings,
        heating_fuel: fuel,
    })
}

/// Outdoor air nodes of an economizer, checked before anything is wired.
struct OutdoorAirPlan {
    outdoor_air: NodeId,
    relief: NodeId,
    mixed: NodeId,
}

fn plan_outdoor_air(zone: &ZoneLoad, design: &HvacDefaults) -> std::result::Result<OutdoorAirPlan, String> {
    let roles = [
        NodeRole::SupplyInlet,
        NodeRole::OutdoorAirInlet,
        NodeRole::ReliefAir,
        NodeRole::MixedAir,
    ];
    let nodes: Vec<NodeId> = roles.iter().map(|r| allocate(&zone.name, *r)).collect();

    if let Some(long) = nodes.iter().find(|n| !n.fits()) {
        return Err(format!("node name '{}' is too long", long));
    }
    let distinct: FxHashSet<&NodeId> = nodes.iter().collect();
    if distinct.len() != nodes.len() {
        return Err("mixer nodes are not distinct".to_string());
    }

    let fraction = design.outdoor_air_per_area / design.supply_flow_per_area;
    if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
        return Err(format!("outdoor air fraction {:.3} outside (0, 1]", fraction));
    }

    let mut nodes = nodes.into_iter().skip(1);
    match (nodes.next(), nodes.next(), nodes.next()) {
        (Some(outdoor_air), Some(relief), Some(mixed)) => Ok(OutdoorAirPlan {
            outdoor_air,
            relief,
            mixed,
        }),
        _ => Err("mixer nodes could not be allocated".to_string()),
    }
}

fn build_zone_loop(
    graph: &mut FlowGraph,
    warnings: &mut Vec<HvacWarning>,
    zone: &ZoneLoad,
    options: &HvacOptions,
    fuel: HeatingFuel,
) -> Result<LoopKey> {
    let name = zone.name.as_str();
    let design = &options.design;
    let loop_name = format!("{} Air Loop", name);
    let design_supply_flow = zone.floor_area * design.supply_flow_per_area;
    let outdoor_air_flow = (zone.floor_area * design.outdoor_air_per_area).min(design_supply_flow);

    let outdoor_air = if options.economizer {
        match plan_outdoor_air(zone, design) {
            Ok(plan) => Some(plan),
            Err(reason) => {
                warnings.push(HvacWarning::EconomizerDisabled {
                    air_loop: loop_name.clone(),
                    reason,
                });
                None
            }
        }
    } else {
        None
    };

    let supply_inlet = allocate(name, NodeRole::SupplyInlet);
    let supply_outlet = allocate(name, NodeRole::SupplyOutlet);
    let demand_inlet = allocate(name, NodeRole::DemandInlet);
    let demand_outlet = allocate(name, NodeRole::DemandOutlet);

    let key = graph.add_loop(AirLoop {
        name: loop_name,
        zone: name.to_string(),
        supply_inlet: supply_inlet.clone(),
        supply_outlet: supply_outlet.clone(),
        demand_inlet: demand_inlet.clone(),
        demand_outlet: demand_outlet.clone(),
        branch: Vec::new(),
        splitter: None,
        mixer: None,
        terminals: Vec::new(),
        economizer: outdoor_air.is_some(),
        design_supply_flow,
        outdoor_air_flow,
    });

    // Supply branch
    let mut chain = Chain::new(graph, key, name, supply_inlet);
    let mut mixed_air = None;
    if let Some(plan) = outdoor_air {
        let names = outdoor_air_names(name);
        let system = chain.push(
            Component::new(names.system, ComponentKind::OutdoorAirSystem)
                .with_port(PortRole::OutdoorAir, plan.outdoor_air.clone())
                .with_port(PortRole::Relief, plan.relief.clone()),
            plan.mixed.clone(),
        );
        let ports = chain.ports_of(system);
        chain.graph.add_child(system, with_ports(Component::new(names.mixer, ComponentKind::OutdoorAirMixer), ports))?;
        mixed_air = Some(plan.mixed);
    }

    let fan_inlet = chain.current.clone();
    chain.push_role(
        Component::new(format!("{} Supply Fan", name), options.system_type.fan_kind()),
        NodeRole::FanOutlet,
    );
    let fan_outlet = chain.current.clone();

    let coil_system = chain.push_role(
        Component::new(format!("{} Cooling Coil System", name), ComponentKind::CoilSystemCoolingDx),
        NodeRole::CoolingCoilOutlet,
    );
    let ports = chain.ports_of(coil_system);
    chain.graph.add_child(
        coil_system,
        with_ports(Component::new(format!("{} Cooling Coil", name), ComponentKind::DxCoolingCoil), ports),
    )?;
    let coil_outlet = chain.current.clone();

    chain.push(
        Component::new(format!("{} Heating Coil", name), ComponentKind::HeatingCoil(fuel)),
        supply_outlet.clone(),
    );
    let branch = chain.finish();

    // Demand side
    let terminal_inlet = allocate(name, NodeRole::TerminalInlet);
    let zone_inlet = allocate(name, NodeRole::ZoneInlet);
    let zone_return = allocate(name, NodeRole::ZoneReturn);
    let zone_air = allocate(name, NodeRole::ZoneAir);

    let splitter = graph.add_component(
        Component::new(format!("{} Zone Splitter", name), ComponentKind::ZoneSplitter)
            .with_port(PortRole::Inlet, demand_inlet.clone())
            .with_port(PortRole::Outlet, terminal_inlet.clone())
            .on_loop(key, LoopSide::Demand),
    );

    let adu = graph.add_component(
        Component::new(format!("{} ADU", name), ComponentKind::AirDistributionUnit)
            .with_port(PortRole::Inlet, terminal_inlet.clone())
            .with_port(PortRole::Outlet, zone_inlet.clone())
            .on_loop(key, LoopSide::Demand),
    );
    let terminal_kind = options.system_type.terminal_kind();
    let mut terminal = Component::new(format!("{} Terminal", name), terminal_kind)
        .with_port(PortRole::Inlet, terminal_inlet.clone());
    let damper = allocate(name, NodeRole::DamperOutlet);
    if terminal_kind == ComponentKind::TerminalVavReheat {
        terminal = terminal.with_port(PortRole::Damper, damper.clone());
    }
    let terminal = graph.add_child(adu, terminal.with_port(PortRole::Outlet, zone_inlet.clone()))?;
    if terminal_kind == ComponentKind::TerminalVavReheat {
        graph.add_child(
            terminal,
            Component::new(format!("{} Reheat Coil", name), ComponentKind::HeatingCoil(fuel))
                .with_port(PortRole::Inlet, damper)
                .with_port(PortRole::Outlet, zone_inlet.clone()),
        )?;
    }

    let mixer = graph.add_component(
        Component::new(format!("{} Zone Mixer", name), ComponentKind::ZoneMixer)
            .with_port(PortRole::Inlet, zone_return.clone())
            .with_port(PortRole::Outlet, demand_outlet)
            .on_loop(key, LoopSide::Demand),
    );

    graph.add_zone_connection(ZoneConnection {
        zone: name.to_string(),
        zone_air_node: zone_air,
        inlet: zone_inlet,
        return_node: zone_return,
        equipment_list: format!("{} Equipment", name),
        thermostat: format!("{} Thermostat", name),
        equipment: Some(adu),
        air_loop: Some(key),
    });

    if let Some(l) = graph.air_loop_mut(key) {
        l.branch = branch;
        l.splitter = Some(splitter);
        l.mixer = Some(mixer);
        l.terminals = vec![adu];
    }

    // Setpoints
    graph.add_setpoint_manager(SetpointManager {
        name: format!("{} Supply Air Temperature Manager", name),
        kind: SetpointKind::Scheduled {
            schedule: SUPPLY_AIR_TEMPERATURE_SCHEDULE.to_string(),
        },
        node: supply_outlet.clone(),
        air_loop: key,
    });
    let mixed_air_kind = SetpointKind::MixedAir {
        reference: supply_outlet,
        fan_inlet,
        fan_outlet,
    };
    graph.add_setpoint_manager(SetpointManager {
        name: format!("{} Cooling Coil Manager", name),
        kind: mixed_air_kind.clone(),
        node: coil_outlet,
        air_loop: key,
    });
    if let Some(mixed) = mixed_air {
        graph.add_setpoint_manager(SetpointManager {
            name: format!("{} Mixed Air Manager", name),
            kind: mixed_air_kind,
            node: mixed,
            air_loop: key,
        });
    }

    Ok(key)
}

fn with_ports(mut component: Component, ports: Vec<(PortRole, NodeId)>) -> Component {
    for (role, node) in ports {
        component = component.with_port(role, node);
    }
    component
}

/// Appends supply branch components, threading the current node through.
struct Chain<'a> {
    graph: &'a mut FlowGraph,
    air_loop: LoopKey,
    zone: &'a str,
    current: NodeId,
    branch: Vec<ComponentKey>,
}

impl<'a> Chain<'a> {
    fn new(graph: &'a mut FlowGraph, air_loop: LoopKey, zone: &'a str, inlet: NodeId) -> Self {
        Self {
            graph,
            air_loop,
            zone,
            current: inlet,
            branch: Vec::new(),
        }
    }

    /// Adds a component from the current node to `outlet`.
    fn push(&mut self, component: Component, outlet: NodeId) -> ComponentKey {
        let inlet = std::mem::replace(&mut self.current, outlet.clone());
        let mut component = component.on_loop(self.air_loop, LoopSide::Supply);
        component.ports.insert(0, Port::inlet(inlet));
        component.ports.push(Port::outlet(outlet));
        let key = self.graph.add_component(component);
        self.branch.push(key);
        key
    }

    /// Adds a component whose outlet is allocated for `role`.
    fn push_role(&mut self, component: Component, role: NodeRole) -> ComponentKey {
        let outlet = allocate(self.zone, role);
        self.push(component, outlet)
    }

    fn ports_of(&self, key: ComponentKey) -> Vec<(PortRole, NodeId)> {
        self.graph
            .component(key)
            .map(|c| c.ports.iter().map(|p| (p.role, p.node.clone())).collect())
            .unwrap_or_default()
    }

    fn finish(self) -> Vec<ComponentKey> {
        self.branch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::validate;

    fn zone(name: &str) -> ZoneLoad {
        ZoneLoad {
            name: name.to_string(),
            floor_area: 100.0,
            volume: 300.0,
        }
    }

    fn options(system_type: SystemType, climate: u8, economizer: bool) -> HvacOptions {
        HvacOptions {
            system_type,
            climate: ClimateZone::new(climate).unwrap(),
            economizer,
            design: HvacDefaults::default(),
        }
    }

    #[test]
    fn vav_loop_is_valid() {
        let out = build_air_systems(&[zone("Story1")], &options(SystemType::VavReheat, 4, false)).unwrap();
        assert!(out.warnings.is_empty());
        assert_eq!(validate(&out.graph), Vec::new());
        assert_eq!(out.graph.loop_count(), 1);

        let (_, l) = out.graph.loops().next().unwrap();
        let kinds: Vec<_> = l
            .branch
            .iter()
            .map(|k| out.graph.component(*k).unwrap().kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                ComponentKind::FanVariableVolume,
                ComponentKind::CoilSystemCoolingDx,
                ComponentKind::HeatingCoil(HeatingFuel::Electric),
            ]
        );
        assert_eq!(l.supply_outlet.as_str(), "Story1 Supply Side Outlet Node");
        assert_ne!(l.supply_outlet, l.demand_inlet);
    }

    #[test]
    fn economizer_adds_outdoor_air_system() {
        let out = build_air_systems(&[zone("Story1")], &options(SystemType::VavReheat, 6, true)).unwrap();
        assert_eq!(validate(&out.graph), Vec::new());
        let (_, l) = out.graph.loops().next().unwrap();
        assert!(l.economizer);
        let first = out.graph.component(l.branch[0]).unwrap();
        assert_eq!(first.kind, ComponentKind::OutdoorAirSystem);
        assert_eq!(out.graph.children_of(l.branch[0]).len(), 1);
        assert_eq!(out.graph.outdoor_air_nodes().len(), 1);
        assert_eq!(out.graph.setpoint_managers().len(), 3);
    }

    #[test]
    fn economizer_disabled_when_names_too_long() {
        let long = "Z".repeat(80);
        let out = build_air_systems(&[zone(&long)], &options(SystemType::VavReheat, 4, true)).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].code(), "economizer_disabled");
        let (_, l) = out.graph.loops().next().unwrap();
        assert!(!l.economizer);
    }

    #[test]
    fn fuel_follows_climate() {
        let cold = build_air_systems(&[zone("A")], &options(SystemType::VavReheat, 7, false)).unwrap();
        assert!(matches!(cold.heating_fuel, HeatingFuel::Fuel(_)));
        let reheat = cold
            .graph
            .components()
            .filter(|(_, c)| matches!(c.kind, ComponentKind::HeatingCoil(_)))
            .count();
        assert_eq!(reheat, 2);
        assert!(cold
            .graph
            .components()
            .all(|(_, c)| c.kind != ComponentKind::HeatingCoil(HeatingFuel::Electric)));
    }

    #[test]
    fn constant_volume_has_no_reheat() {
        let out = build_air_systems(&[zone("A"), zone("B")], &options(SystemType::ConstantVolume, 2, false)).unwrap();
        assert_eq!(validate(&out.graph), Vec::new());
        assert_eq!(out.graph.loop_count(), 2);
        let heating = out
            .graph
            .components()
            .filter(|(_, c)| matches!(c.kind, ComponentKind::HeatingCoil(_)))
            .count();
        assert_eq!(heating, 2);
    }

    #[test]
    fn rejects_duplicate_zones() {
        let err = build_air_systems(&[zone("A"), zone("A")], &options(SystemType::VavReheat, 4, false));
        assert!(matches!(err, Err(Error::InvalidOptions(_))));
    }
}
