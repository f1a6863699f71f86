// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity to record emission.
//!
//! Walks the zones, the constructions they use and the flow graph, and turns
//! every entity into one or more validated records. Record order is fixed:
//! simulation parameters, schedules, materials and constructions, zones and
//! surfaces, air loops with their components, zone equipment, setpoint
//! managers, curves and outputs.

use bemgen_core::choices::{
    ControlVariable, ControllerType, CoordinateSystem, CoolingCoilType,
    EconomizerControlActionType, EconomizerControlType, FanPowerMinimumFlowRateInputMethod,
    FenestrationKind, LoadDistributionScheme, LockoutType, MinimumLimitType, OutdoorAirEquipmentType,
    OutsideBoundary, ReturnPathComponentType, SolarDistribution, SqliteOption,
    StartingVertexPosition, SunExposure, SupplyPathComponentType, SurfaceKind, Terrain,
    TerminalType, ThermostatControlType, VertexEntryDirection, WindExposure, YesNo,
    ZoneEquipmentType, ZoneMinimumAirFlowInputMethod,
};
use bemgen_core::{Document, ObjectType, Record, RecordBuilder, SchemaVersion};
use bemgen_geometry::{Boundary, Surface, SurfaceType, Zone};
use bemgen_topology::{
    outdoor_air_names, AirLoop, Component, ComponentKey, ComponentKind, FlowGraph, HeatingFuel,
    HvacDefaults, PortRole, SetpointKind, ALWAYS_ON_SCHEDULE, CONTROL_TYPE_SCHEDULE,
    COOLING_SETPOINT_SCHEDULE, HEATING_SETPOINT_SCHEDULE,
};

use crate::config::OutputSettings;
use crate::error::{Error, Result};
use crate::reference::{ClimateSpec, ResolvedConstructions};
use crate::schedule::ScheduleSet;

/// Economizer high limit used when the climate table has no entry.
const DEFAULT_ECONOMIZER_LIMIT: f64 = 21.0;

/// Rated evaporator fan power per flow, W/(m³/s)
const RATED_FAN_POWER_2017: f64 = 773.3;
const RATED_FAN_POWER_2023: f64 = 934.4;

/// Part-load power curve of a variable-volume fan
const VAV_FAN_COEFFICIENTS: [f64; 5] = [0.040759894, 0.08804497, -0.07292612, 0.943739823, 0.0];

const COOL_CAP_FT: &str = "DX Cooling Capacity fT";
const COOL_CAP_FFF: &str = "DX Cooling Capacity fFF";
const COOL_EIR_FT: &str = "DX Cooling EIR fT";
const COOL_EIR_FFF: &str = "DX Cooling EIR fFF";
const COOL_PLF_FPLR: &str = "DX Cooling PLF fPLR";

/// Everything the emitter reads.
#[derive(Debug, Clone, Copy)]
pub struct EmitInput<'a> {
    pub name: &'a str,
    pub version: SchemaVersion,
    /// Degrees
    pub north_axis: f64,
    pub timestep: u32,
    pub zones: &'a [Zone],
    pub graph: &'a FlowGraph,
    pub constructions: &'a ResolvedConstructions<'a>,
    pub schedules: &'a ScheduleSet,
    pub climate: Option<&'a ClimateSpec>,
    pub design: &'a HvacDefaults,
    pub outputs: &'a OutputSettings,
}

/// Emits the whole model as a document.
pub fn emit_document(input: &EmitInput<'_>) -> Result<Document> {
    let mut emitter = Emitter::new(input);
    emitter.simulation()?;
    emitter.schedules()?;
    emitter.constructions()?;
    emitter.zones()?;
    emitter.air_loops()?;
    emitter.zone_equipment()?;
    emitter.setpoint_managers()?;
    emitter.curves()?;
    emitter.outputs()?;
    Ok(emitter.document)
}

struct Emitter<'a> {
    input: &'a EmitInput<'a>,
    version: SchemaVersion,
    document: Document,
}

impl<'a> Emitter<'a> {
    fn new(input: &'a EmitInput<'a>) -> Self {
        Self {
            input,
            version: input.version,
            document: Document::new(input.version),
        }
    }

    fn builder(&self, object_type: ObjectType) -> RecordBuilder {
        Record::builder(object_type, self.version)
    }

    fn push(&mut self, builder: RecordBuilder) -> Result<()> {
        self.document.push(builder.build()?)?;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Simulation parameters
    // ---------------------------------------------------------------------

    fn simulation(&mut self) -> Result<()> {
        let b = self
            .builder(ObjectType::SimulationControl)
            .choice(YesNo::Yes)
            .choice(YesNo::Yes)
            .choice(YesNo::No)
            .choice(YesNo::No)
            .choice(YesNo::Yes);
        self.push(b)?;

        let b = self
            .builder(ObjectType::Building)
            .text(self.input.name)
            .real(self.input.north_axis)
            .choice(Terrain::Suburbs)
            .real(0.04)
            .real(0.4)
            .choice(SolarDistribution::FullExterior)
            .int(25)
            .int(6);
        self.push(b)?;

        let b = self
            .builder(ObjectType::Timestep)
            .int(i64::from(self.input.timestep));
        self.push(b)?;

        let b = self
            .builder(ObjectType::GlobalGeometryRules)
            .choice(StartingVertexPosition::UpperLeftCorner)
            .choice(VertexEntryDirection::Counterclockwise)
            .choice(CoordinateSystem::Relative);
        self.push(b)?;

        let b = self
            .builder(ObjectType::RunPeriod)
            .text("Annual")
            .int(1)
            .int(1)
            .blank()
            .int(12)
            .int(31)
            .blank()
            .blank()
            .choice(YesNo::Yes)
            .choice(YesNo::Yes)
            .choice(YesNo::No)
            .choice(YesNo::Yes)
            .choice(YesNo::Yes);
        self.push(b)
    }

    fn schedules(&mut self) -> Result<()> {
        for record in self.input.schedules.records(self.version)? {
            self.document.push(record)?;
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Materials and constructions
    // ---------------------------------------------------------------------

    fn constructions(&mut self) -> Result<()> {
        let resolved = self.input.constructions;
        for m in &resolved.materials {
            let mut b = self
                .builder(ObjectType::Material)
                .text(&m.name)
                .choice(m.roughness)
                .real(m.thickness)
                .real(m.conductivity)
                .real(m.density)
                .real(m.specific_heat);
            for value in [m.thermal_absorptance, m.solar_absorptance, m.visible_absorptance] {
                b = match value {
                    Some(v) => b.real(v),
                    None => b.blank(),
                };
            }
            self.push(b)?;
        }
        for g in &resolved.glazings {
            let b = self
                .builder(ObjectType::WindowMaterialSimpleGlazingSystem)
                .text(&g.name)
                .real(g.u_factor)
                .real(g.solar_heat_gain_coefficient);
            let b = match g.visible_transmittance {
                Some(vt) => b.real(vt),
                None => b,
            };
            self.push(b)?;
        }
        for c in &resolved.constructions {
            let mut b = self.builder(ObjectType::Construction).text(&c.name);
            for layer in &c.layers {
                b = b.text(layer);
            }
            self.push(b)?;
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Zones and surfaces
    // ---------------------------------------------------------------------

    fn zones(&mut self) -> Result<()> {
        for zone in self.input.zones {
            let b = self
                .builder(ObjectType::Zone)
                .text(&zone.name)
                .real(0.0)
                .real(0.0)
                .real(0.0)
                .real(0.0)
                .int(1)
                .int(1)
                .real(zone.height)
                .real(zone.volume())
                .real(zone.floor_area);
            self.push(b)?;
        }
        for zone in self.input.zones {
            for surface in zone.surfaces.iter().filter(|s| !s.is_window()) {
                self.building_surface(surface)?;
            }
            for window in zone.surfaces_of(SurfaceType::Window) {
                self.fenestration(window)?;
            }
        }
        Ok(())
    }

    fn building_surface(&mut self, surface: &Surface) -> Result<()> {
        let kind = match surface.surface_type {
            SurfaceType::Floor => SurfaceKind::Floor,
            SurfaceType::Wall => SurfaceKind::Wall,
            SurfaceType::Ceiling => SurfaceKind::Ceiling,
            SurfaceType::Roof => SurfaceKind::Roof,
            SurfaceType::Window => {
                return Err(Error::InvalidRequest(format!(
                    "window '{}' emitted as a building surface",
                    surface.name
                )))
            }
        };
        let (boundary, object, sun, wind) = match &surface.boundary {
            Boundary::Outdoors => (
                OutsideBoundary::Outdoors,
                None,
                SunExposure::SunExposed,
                WindExposure::WindExposed,
            ),
            Boundary::Ground => (OutsideBoundary::Ground, None, SunExposure::NoSun, WindExposure::NoWind),
            Boundary::Surface(partner) => (
                OutsideBoundary::Surface,
                Some(partner.as_str()),
                SunExposure::NoSun,
                WindExposure::NoWind,
            ),
            Boundary::Adiabatic => (OutsideBoundary::Adiabatic, None, SunExposure::NoSun, WindExposure::NoWind),
        };
        let construction = self.input.constructions.set.for_role(surface.construction);

        let mut b = self
            .builder(ObjectType::BuildingSurfaceDetailed)
            .text(&surface.name)
            .choice(kind)
            .text(construction)
            .text(&surface.zone);
        if self.version.has_spaces() {
            b = b.blank();
        }
        b = b
            .choice(boundary)
            .text(object.unwrap_or_default())
            .choice(sun)
            .choice(wind)
            .autocalculate()
            .int(surface.polygon.len() as i64);
        self.push(with_vertices(b, surface))
    }

    fn fenestration(&mut self, window: &Surface) -> Result<()> {
        let construction = self.input.constructions.set.for_role(window.construction);
        let b = self
            .builder(ObjectType::FenestrationSurfaceDetailed)
            .text(&window.name)
            .choice(FenestrationKind::Window)
            .text(construction)
            .text(window.parent.as_deref().unwrap_or_default())
            .blank()
            .autocalculate()
            .blank()
            .real(1.0)
            .int(window.polygon.len() as i64);
        self.push(with_vertices(b, window))
    }

    // ---------------------------------------------------------------------
    // Air loops
    // ---------------------------------------------------------------------

    fn air_loops(&mut self) -> Result<()> {
        let graph = self.input.graph;
        for (_, air_loop) in graph.loops() {
            self.air_loop(graph, air_loop)?;
        }

        let outdoor_air = graph.outdoor_air_nodes();
        if !outdoor_air.is_empty() {
            let mut b = self.builder(ObjectType::OutdoorAirNodeList);
            for node in outdoor_air {
                b = b.node(node.as_str());
            }
            self.push(b)?;
        }
        Ok(())
    }

    fn air_loop(&mut self, graph: &FlowGraph, l: &AirLoop) -> Result<()> {
        let b = self
            .builder(ObjectType::AirLoopHvac)
            .text(&l.name)
            .blank()
            .blank()
            .real(l.design_supply_flow)
            .text(l.branch_list_name())
            .blank()
            .node(l.supply_inlet.as_str())
            .node(l.demand_outlet.as_str())
            .node(l.demand_inlet.as_str())
            .node(l.supply_outlet.as_str());
        self.push(b)?;

        let b = self
            .builder(ObjectType::BranchList)
            .text(l.branch_list_name())
            .text(l.branch_name());
        self.push(b)?;

        let mut b = self.builder(ObjectType::Branch).text(l.branch_name()).blank();
        for key in &l.branch {
            let c = component(graph, *key)?;
            let branch_type = c.kind.branch_type().ok_or_else(|| misplaced(c, "a supply branch"))?;
            b = b
                .choice(branch_type)
                .text(&c.name)
                .node(port(c, PortRole::Inlet)?)
                .node(port(c, PortRole::Outlet)?);
        }
        self.push(b)?;

        for key in &l.branch {
            self.component(graph, *key, l)?;
        }

        // Demand side
        let splitter = component(graph, l.splitter.ok_or_else(|| missing(l, "zone splitter"))?)?;
        let b = self
            .builder(ObjectType::AirLoopHvacSupplyPath)
            .text(l.supply_path_name())
            .node(l.demand_inlet.as_str())
            .choice(SupplyPathComponentType::ZoneSplitter)
            .text(&splitter.name);
        self.push(b)?;
        let mut b = self
            .builder(ObjectType::AirLoopHvacZoneSplitter)
            .text(&splitter.name)
            .node(port(splitter, PortRole::Inlet)?);
        for outlet in splitter.outlets() {
            b = b.node(outlet.as_str());
        }
        self.push(b)?;

        for key in &l.terminals {
            self.component(graph, *key, l)?;
        }

        let mixer = component(graph, l.mixer.ok_or_else(|| missing(l, "zone mixer"))?)?;
        let b = self
            .builder(ObjectType::AirLoopHvacReturnPath)
            .text(l.return_path_name())
            .node(l.demand_outlet.as_str())
            .choice(ReturnPathComponentType::ZoneMixer)
            .text(&mixer.name);
        self.push(b)?;
        let mut b = self
            .builder(ObjectType::AirLoopHvacZoneMixer)
            .text(&mixer.name)
            .node(port(mixer, PortRole::Outlet)?);
        for inlet in mixer.inlets() {
            b = b.node(inlet.as_str());
        }
        self.push(b)
    }

    /// Emits a component and then its children.
    fn component(&mut self, graph: &FlowGraph, key: ComponentKey, l: &AirLoop) -> Result<()> {
        let c = component(graph, key)?;
        let design = self.input.design;
        let children = graph.children_of(key);
        let first_child = || {
            children
                .first()
                .map(|(_, child)| *child)
                .ok_or_else(|| misplaced(c, "a component with children"))
        };

        match c.kind {
            ComponentKind::OutdoorAirSystem => {
                let names = outdoor_air_names(&l.zone);
                let mixer = first_child()?;
                let b = self
                    .builder(ObjectType::AirLoopHvacOutdoorAirSystem)
                    .text(&c.name)
                    .text(&names.controller_list)
                    .text(&names.equipment_list);
                self.push(b)?;
                let b = self
                    .builder(ObjectType::AirLoopHvacControllerList)
                    .text(&names.controller_list)
                    .choice(ControllerType::OutdoorAir)
                    .text(&names.controller);
                self.push(b)?;
                let b = self
                    .builder(ObjectType::AirLoopHvacOutdoorAirSystemEquipmentList)
                    .text(&names.equipment_list)
                    .choice(OutdoorAirEquipmentType::Mixer)
                    .text(&mixer.name);
                self.push(b)?;

                let limit = self
                    .input
                    .climate
                    .map(|c| c.economizer_max_dry_bulb)
                    .unwrap_or(DEFAULT_ECONOMIZER_LIMIT);
                let b = self
                    .builder(ObjectType::ControllerOutdoorAir)
                    .text(&names.controller)
                    .node(port(c, PortRole::Relief)?)
                    .node(port(c, PortRole::Inlet)?)
                    .node(port(c, PortRole::Outlet)?)
                    .node(port(c, PortRole::OutdoorAir)?)
                    .real(l.outdoor_air_flow)
                    .real(l.design_supply_flow)
                    .choice(EconomizerControlType::FixedDryBulb)
                    .choice(EconomizerControlActionType::ModulateFlow)
                    .real(limit)
                    .blank()
                    .blank()
                    .blank()
                    .blank()
                    .choice(LockoutType::NoLockout)
                    .choice(MinimumLimitType::FixedMinimum);
                self.push(b)?;
            }
            ComponentKind::OutdoorAirMixer => {
                let b = self
                    .builder(ObjectType::OutdoorAirMixer)
                    .text(&c.name)
                    .node(port(c, PortRole::Outlet)?)
                    .node(port(c, PortRole::OutdoorAir)?)
                    .node(port(c, PortRole::Relief)?)
                    .node(port(c, PortRole::Inlet)?);
                self.push(b)?;
            }
            ComponentKind::FanVariableVolume => {
                let b = self
                    .builder(ObjectType::FanVariableVolume)
                    .text(&c.name)
                    .text(ALWAYS_ON_SCHEDULE)
                    .real(design.fan_efficiency)
                    .real(design.fan_pressure_rise)
                    .real(l.design_supply_flow)
                    .choice(FanPowerMinimumFlowRateInputMethod::Fraction)
                    .real(design.minimum_flow_fraction)
                    .blank()
                    .real(design.motor_efficiency)
                    .real(1.0)
                    .reals(VAV_FAN_COEFFICIENTS)
                    .node(port(c, PortRole::Inlet)?)
                    .node(port(c, PortRole::Outlet)?);
                self.push(b)?;
            }
            ComponentKind::FanConstantVolume => {
                let b = self
                    .builder(ObjectType::FanConstantVolume)
                    .text(&c.name)
                    .text(ALWAYS_ON_SCHEDULE)
                    .real(design.fan_efficiency)
                    .real(design.fan_pressure_rise)
                    .real(l.design_supply_flow)
                    .real(design.motor_efficiency)
                    .real(1.0)
                    .node(port(c, PortRole::Inlet)?)
                    .node(port(c, PortRole::Outlet)?);
                self.push(b)?;
            }
            ComponentKind::CoilSystemCoolingDx => {
                let coil = first_child()?;
                let outlet = port(c, PortRole::Outlet)?;
                let b = self
                    .builder(ObjectType::CoilSystemCoolingDx)
                    .text(&c.name)
                    .text(ALWAYS_ON_SCHEDULE)
                    .node(port(c, PortRole::Inlet)?)
                    .node(outlet)
                    .node(outlet)
                    .choice(CoolingCoilType::DxSingleSpeed)
                    .text(&coil.name);
                self.push(b)?;
            }
            ComponentKind::DxCoolingCoil => {
                let mut b = self
                    .builder(ObjectType::CoilCoolingDxSingleSpeed)
                    .text(&c.name)
                    .text(ALWAYS_ON_SCHEDULE)
                    .autosize()
                    .autosize()
                    .real(design.cooling_cop)
                    .autosize()
                    .real(RATED_FAN_POWER_2017);
                if self.version == SchemaVersion::V23_2 {
                    b = b.real(RATED_FAN_POWER_2023);
                }
                b = b
                    .node(port(c, PortRole::Inlet)?)
                    .node(port(c, PortRole::Outlet)?)
                    .text(COOL_CAP_FT)
                    .text(COOL_CAP_FFF)
                    .text(COOL_EIR_FT)
                    .text(COOL_EIR_FFF)
                    .text(COOL_PLF_FPLR);
                self.push(b)?;
            }
            ComponentKind::HeatingCoil(fuel) => {
                let b = match fuel {
                    HeatingFuel::Electric => self
                        .builder(ObjectType::CoilHeatingElectric)
                        .text(&c.name)
                        .text(ALWAYS_ON_SCHEDULE)
                        .real(1.0),
                    HeatingFuel::Fuel(fuel_type) => self
                        .builder(ObjectType::CoilHeatingFuel)
                        .text(&c.name)
                        .text(ALWAYS_ON_SCHEDULE)
                        .choice(fuel_type)
                        .real(design.burner_efficiency),
                };
                let b = b
                    .autosize()
                    .node(port(c, PortRole::Inlet)?)
                    .node(port(c, PortRole::Outlet)?);
                self.push(b)?;
            }
            ComponentKind::AirDistributionUnit => {
                let terminal = first_child()?;
                let terminal_type = match terminal.kind {
                    ComponentKind::TerminalVavReheat => TerminalType::VavReheat,
                    ComponentKind::TerminalConstantVolume => TerminalType::ConstantVolumeNoReheat,
                    _ => return Err(misplaced(terminal, "an air distribution unit")),
                };
                let b = self
                    .builder(ObjectType::ZoneHvacAirDistributionUnit)
                    .text(&c.name)
                    .node(port(c, PortRole::Outlet)?)
                    .choice(terminal_type)
                    .text(&terminal.name);
                self.push(b)?;
            }
            ComponentKind::TerminalVavReheat => {
                let coil = first_child()?;
                let ComponentKind::HeatingCoil(fuel) = coil.kind else {
                    return Err(misplaced(coil, "a reheat terminal"));
                };
                let b = self
                    .builder(ObjectType::AirTerminalVavReheat)
                    .text(&c.name)
                    .text(ALWAYS_ON_SCHEDULE)
                    .node(port(c, PortRole::Damper)?)
                    .node(port(c, PortRole::Inlet)?)
                    .real(l.design_supply_flow)
                    .choice(ZoneMinimumAirFlowInputMethod::Constant)
                    .real(design.minimum_flow_fraction)
                    .blank()
                    .blank()
                    .choice(fuel.coil_type())
                    .text(&coil.name)
                    .blank()
                    .blank()
                    .node(port(c, PortRole::Outlet)?);
                self.push(b)?;
            }
            ComponentKind::TerminalConstantVolume => {
                let b = self
                    .builder(ObjectType::AirTerminalConstantVolumeNoReheat)
                    .text(&c.name)
                    .text(ALWAYS_ON_SCHEDULE)
                    .node(port(c, PortRole::Inlet)?)
                    .node(port(c, PortRole::Outlet)?)
                    .real(l.design_supply_flow);
                self.push(b)?;
            }
            // Written with their supply and return paths
            ComponentKind::ZoneSplitter | ComponentKind::ZoneMixer => {}
        }

        for (child, _) in children {
            self.component(graph, child, l)?;
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Zone equipment and controls
    // ---------------------------------------------------------------------

    fn zone_equipment(&mut self) -> Result<()> {
        let graph = self.input.graph;
        for z in graph.zone_connections() {
            let equipment = z
                .equipment
                .and_then(|k| graph.component(k))
                .ok_or_else(|| {
                    Error::Graph(bemgen_topology::Error::ComponentNotFound(format!(
                        "equipment of zone '{}'",
                        z.zone
                    )))
                })?;

            let b = self
                .builder(ObjectType::ZoneHvacEquipmentConnections)
                .text(&z.zone)
                .text(&z.equipment_list)
                .node(z.inlet.as_str())
                .blank()
                .node(z.zone_air_node.as_str())
                .node(z.return_node.as_str());
            self.push(b)?;

            let b = self
                .builder(ObjectType::ZoneHvacEquipmentList)
                .text(&z.equipment_list)
                .choice(LoadDistributionScheme::SequentialLoad)
                .choice(ZoneEquipmentType::AirDistributionUnit)
                .text(&equipment.name)
                .int(1)
                .int(1);
            self.push(b)?;

            let dual_setpoint = format!("{} Dual Setpoint", z.zone);
            let b = self
                .builder(ObjectType::ZoneControlThermostat)
                .text(&z.thermostat)
                .text(&z.zone)
                .text(CONTROL_TYPE_SCHEDULE)
                .choice(ThermostatControlType::DualSetpoint)
                .text(&dual_setpoint);
            self.push(b)?;

            let b = self
                .builder(ObjectType::ThermostatSetpointDualSetpoint)
                .text(&dual_setpoint)
                .text(HEATING_SETPOINT_SCHEDULE)
                .text(COOLING_SETPOINT_SCHEDULE);
            self.push(b)?;
        }
        Ok(())
    }

    fn setpoint_managers(&mut self) -> Result<()> {
        for m in self.input.graph.setpoint_managers() {
            let b = match &m.kind {
                SetpointKind::Scheduled { schedule } => self
                    .builder(ObjectType::SetpointManagerScheduled)
                    .text(&m.name)
                    .choice(ControlVariable::Temperature)
                    .text(schedule)
                    .node(m.node.as_str()),
                SetpointKind::MixedAir {
                    reference,
                    fan_inlet,
                    fan_outlet,
                } => self
                    .builder(ObjectType::SetpointManagerMixedAir)
                    .text(&m.name)
                    .choice(ControlVariable::Temperature)
                    .node(reference.as_str())
                    .node(fan_inlet.as_str())
                    .node(fan_outlet.as_str())
                    .node(m.node.as_str()),
            };
            self.push(b)?;
        }
        Ok(())
    }

    /// DX performance curves, shared by every cooling coil.
    fn curves(&mut self) -> Result<()> {
        let has_dx = self
            .input
            .graph
            .components()
            .any(|(_, c)| c.kind == ComponentKind::DxCoolingCoil);
        if !has_dx {
            return Ok(());
        }

        let biquadratic = [
            (COOL_CAP_FT, [0.942587793, 0.009543347, 0.00068377, -0.011042676, 0.000005249, -0.00000972]),
            (COOL_EIR_FT, [0.342414409, 0.034885008, -0.0006237, 0.004977216, 0.000437951, -0.000728028]),
        ];
        for (name, coefficients) in biquadratic {
            let b = self
                .builder(ObjectType::CurveBiquadratic)
                .text(name)
                .reals(coefficients)
                .reals([12.77778, 23.88889, 18.0, 46.11111]);
            self.push(b)?;
        }

        let quadratic = [
            (COOL_CAP_FFF, [0.8, 0.2, 0.0, 0.5, 1.5]),
            (COOL_EIR_FFF, [1.1552, -0.1808, 0.0256, 0.5, 1.5]),
            (COOL_PLF_FPLR, [0.85, 0.15, 0.0, 0.0, 1.0]),
        ];
        for (name, values) in quadratic {
            let b = self.builder(ObjectType::CurveQuadratic).text(name).reals(values);
            self.push(b)?;
        }
        Ok(())
    }

    fn outputs(&mut self) -> Result<()> {
        let outputs = self.input.outputs;
        for variable in &outputs.variables {
            let b = self
                .builder(ObjectType::OutputVariable)
                .text("*")
                .text(variable)
                .choice(outputs.frequency);
            self.push(b)?;
        }
        if outputs.sqlite {
            let b = self
                .builder(ObjectType::OutputSqlite)
                .choice(SqliteOption::SimpleAndTabular);
            self.push(b)?;
        }
        Ok(())
    }
}

fn with_vertices(builder: RecordBuilder, surface: &Surface) -> RecordBuilder {
    builder.reals(
        surface
            .polygon
            .vertices()
            .iter()
            .flat_map(|v| [v.x, v.y, v.z]),
    )
}

fn component(graph: &FlowGraph, key: ComponentKey) -> Result<&Component> {
    graph
        .component(key)
        .ok_or_else(|| Error::Graph(bemgen_topology::Error::ComponentNotFound(format!("{:?}", key))))
}

fn port(c: &Component, role: PortRole) -> Result<&str> {
    c.port(role).map(|n| n.as_str()).ok_or_else(|| {
        Error::Graph(bemgen_topology::Error::InvalidOptions(format!(
            "component '{}' has no {:?} port",
            c.name, role
        )))
    })
}

fn misplaced(c: &Component, place: &str) -> Error {
    Error::Graph(bemgen_topology::Error::InvalidOptions(format!(
        "component '{}' ({}) cannot be part of {}",
        c.name,
        c.kind.object_type(),
        place
    )))
}

fn missing(l: &AirLoop, what: &str) -> Error {
    Error::Graph(bemgen_topology::Error::InvalidOptions(format!(
        "air loop '{}' has no {}",
        l.name, what
    )))
}

