// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Versioned field layouts
//!
//! One [`ObjectLayout`] per object type and schema version: field order,
//! field kinds, which fields are required, where `Autocalculate`/`Autosize`
//! are accepted, the minimum field count, and the repeating group at the end
//! of extensible objects. Every record is validated against its layout when
//! it is built and again when it is decoded from text.

use std::borrow::Cow;

use crate::choices::*;
use crate::schema::{ObjectType, SchemaVersion};

/// Kind of value a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free alphanumeric value (names, references to other objects)
    Alpha,
    Real,
    Integer,
    /// Closed keyword set
    Choice(&'static [&'static str]),
    /// Flow-graph node reference
    Node,
}

impl FieldKind {
    pub fn describe(&self) -> &'static str {
        match self {
            FieldKind::Alpha => "text",
            FieldKind::Real => "a real number",
            FieldKind::Integer => "an integer",
            FieldKind::Choice(_) => "a keyword",
            FieldKind::Node => "a node name",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldKind::Real | FieldKind::Integer)
    }
}

/// One field of a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name; group fields carry a `{n}` placeholder for the group number
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub autocalculate: bool,
    pub autosize: bool,
}

impl FieldSpec {
    const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            autocalculate: false,
            autosize: false,
        }
    }

    pub const fn alpha(name: &'static str) -> Self {
        Self::new(name, FieldKind::Alpha)
    }

    pub const fn real(name: &'static str) -> Self {
        Self::new(name, FieldKind::Real)
    }

    pub const fn int(name: &'static str) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub const fn choice(name: &'static str, values: &'static [&'static str]) -> Self {
        Self::new(name, FieldKind::Choice(values))
    }

    pub const fn node(name: &'static str) -> Self {
        Self::new(name, FieldKind::Node)
    }

    pub const fn optional(self) -> Self {
        Self {
            required: false,
            ..self
        }
    }

    pub const fn autocalc(self) -> Self {
        Self {
            autocalculate: true,
            ..self
        }
    }

    pub const fn autosize(self) -> Self {
        Self {
            autosize: true,
            ..self
        }
    }
}

/// Repeating field group at the end of an extensible object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensibleGroup {
    pub fields: &'static [FieldSpec],
    /// Number substituted for `{n}` in the first group
    pub first_index: usize,
    pub min_groups: usize,
    pub max_groups: usize,
}

impl ExtensibleGroup {
    /// Fields a trailing group must carry: everything up to the last required field
    pub fn required_prefix(&self) -> usize {
        self.fields
            .iter()
            .rposition(|f| f.required)
            .map(|i| i + 1)
            .unwrap_or(1)
    }
}

/// Field layout of one object type in one schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectLayout {
    pub object_type: ObjectType,
    pub fields: &'static [FieldSpec],
    /// Minimum number of fields a record must carry
    pub min_fields: usize,
    pub extensible: Option<ExtensibleGroup>,
}

impl ObjectLayout {
    /// Maximum number of fields a record may carry
    pub fn max_fields(&self) -> usize {
        match &self.extensible {
            Some(group) => self.fields.len() + group.fields.len() * group.max_groups,
            None => self.fields.len(),
        }
    }

    /// Field spec at an index, resolving the extensible group
    pub fn field(&self, index: usize) -> Option<&'static FieldSpec> {
        if let Some(spec) = self.fields.get(index) {
            return Some(spec);
        }
        let group = self.extensible.as_ref()?;
        let offset = index - self.fields.len();
        if offset >= group.fields.len() * group.max_groups {
            return None;
        }
        group.fields.get(offset % group.fields.len())
    }

    /// Field name at an index with the group number filled in
    pub fn field_name(&self, index: usize) -> Cow<'static, str> {
        if let Some(spec) = self.fields.get(index) {
            return Cow::Borrowed(spec.name);
        }
        match (&self.extensible, self.field(index)) {
            (Some(group), Some(spec)) => {
                let n = (index - self.fields.len()) / group.fields.len() + group.first_index;
                Cow::Owned(spec.name.replace("{n}", &n.to_string()))
            }
            _ => Cow::Owned(format!("Field {}", index + 1)),
        }
    }

    /// Index of a fixed field by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Whether a field count is structurally valid
    pub fn accepts_count(&self, count: usize) -> bool {
        if count < self.min_fields || count > self.max_fields() {
            return false;
        }
        let Some(group) = &self.extensible else {
            return true;
        };
        let extra = count.saturating_sub(self.fields.len());
        let size = group.fields.len();
        let full = extra / size;
        let partial = extra % size;
        let groups = full + usize::from(partial > 0);
        if groups < group.min_groups {
            return false;
        }
        partial == 0 || partial >= group.required_prefix()
    }
}

/// Layout of an object type in a schema version
pub fn layout(object_type: ObjectType, version: SchemaVersion) -> &'static ObjectLayout {
    use ObjectType as T;
    let v23 = version == SchemaVersion::V23_2;
    match object_type {
        T::Version => &VERSION,
        T::SimulationControl => &SIMULATION_CONTROL,
        T::Building => &BUILDING,
        T::Timestep => &TIMESTEP,
        T::GlobalGeometryRules => &GLOBAL_GEOMETRY_RULES,
        T::RunPeriod => &RUN_PERIOD,
        T::ScheduleTypeLimits => &SCHEDULE_TYPE_LIMITS,
        T::ScheduleCompact => &SCHEDULE_COMPACT,
        T::Material => &MATERIAL,
        T::WindowMaterialSimpleGlazingSystem => &SIMPLE_GLAZING,
        T::Construction => &CONSTRUCTION,
        T::Zone => &ZONE,
        T::BuildingSurfaceDetailed if v23 => &BUILDING_SURFACE_23_2,
        T::BuildingSurfaceDetailed => &BUILDING_SURFACE_9_6,
        T::FenestrationSurfaceDetailed => &FENESTRATION_SURFACE,
        T::ZoneControlThermostat => &ZONE_THERMOSTAT,
        T::ThermostatSetpointDualSetpoint => &DUAL_SETPOINT,
        T::ZoneHvacEquipmentConnections => &EQUIPMENT_CONNECTIONS,
        T::ZoneHvacEquipmentList => &EQUIPMENT_LIST,
        T::ZoneHvacAirDistributionUnit => &AIR_DISTRIBUTION_UNIT,
        T::AirTerminalVavReheat => &VAV_REHEAT,
        T::AirTerminalConstantVolumeNoReheat => &CONSTANT_VOLUME_NO_REHEAT,
        T::AirLoopHvac => &AIR_LOOP,
        T::BranchList => &BRANCH_LIST,
        T::Branch => &BRANCH,
        T::AirLoopHvacSupplyPath => &SUPPLY_PATH,
        T::AirLoopHvacZoneSplitter => &ZONE_SPLITTER,
        T::AirLoopHvacReturnPath => &RETURN_PATH,
        T::AirLoopHvacZoneMixer => &ZONE_MIXER,
        T::AirLoopHvacOutdoorAirSystem => &OUTDOOR_AIR_SYSTEM,
        T::AirLoopHvacControllerList => &CONTROLLER_LIST,
        T::AirLoopHvacOutdoorAirSystemEquipmentList => &OUTDOOR_AIR_EQUIPMENT_LIST,
        T::OutdoorAirMixer => &OUTDOOR_AIR_MIXER,
        T::ControllerOutdoorAir => &CONTROLLER_OUTDOOR_AIR,
        T::OutdoorAirNodeList => &OUTDOOR_AIR_NODE_LIST,
        T::FanVariableVolume => &FAN_VARIABLE_VOLUME,
        T::FanConstantVolume => &FAN_CONSTANT_VOLUME,
        T::CoilSystemCoolingDx => &COIL_SYSTEM_COOLING_DX,
        T::CoilCoolingDxSingleSpeed if v23 => &DX_SINGLE_SPEED_23_2,
        T::CoilCoolingDxSingleSpeed => &DX_SINGLE_SPEED_9_6,
        T::CoilHeatingFuel => &COIL_HEATING_FUEL,
        T::CoilHeatingElectric => &COIL_HEATING_ELECTRIC,
        T::CurveBiquadratic => &CURVE_BIQUADRATIC,
        T::CurveQuadratic => &CURVE_QUADRATIC,
        T::SetpointManagerScheduled => &SPM_SCHEDULED,
        T::SetpointManagerMixedAir => &SPM_MIXED_AIR,
        T::OutputVariable => &OUTPUT_VARIABLE,
        T::OutputSqlite => &OUTPUT_SQLITE,
    }
}

type F = FieldSpec;

const fn fixed(object_type: ObjectType, fields: &'static [FieldSpec], min_fields: usize) -> ObjectLayout {
    ObjectLayout {
        object_type,
        fields,
        min_fields,
        extensible: None,
    }
}

const fn extensible(
    object_type: ObjectType,
    fields: &'static [FieldSpec],
    group: &'static [FieldSpec],
    first_index: usize,
    min_groups: usize,
    max_groups: usize,
) -> ObjectLayout {
    ObjectLayout {
        object_type,
        fields,
        min_fields: fields.len() + min_groups * group.len(),
        extensible: Some(ExtensibleGroup {
            fields: group,
            first_index,
            min_groups,
            max_groups,
        }),
    }
}

// ---------------------------------------------------------------------------
// Simulation parameters
// ---------------------------------------------------------------------------

static VERSION: ObjectLayout = fixed(ObjectType::Version, &[F::alpha("Version Identifier")], 1);

static SIMULATION_CONTROL: ObjectLayout = fixed(
    ObjectType::SimulationControl,
    &[
        F::choice("Do Zone Sizing Calculation", YesNo::VALUES),
        F::choice("Do System Sizing Calculation", YesNo::VALUES),
        F::choice("Do Plant Sizing Calculation", YesNo::VALUES),
        F::choice("Run Simulation for Sizing Periods", YesNo::VALUES),
        F::choice("Run Simulation for Weather File Run Periods", YesNo::VALUES),
        F::choice("Do HVAC Sizing Simulation for Sizing Periods", YesNo::VALUES).optional(),
        F::int("Maximum Number of HVAC Sizing Simulation Passes").optional(),
    ],
    5,
);

static BUILDING: ObjectLayout = fixed(
    ObjectType::Building,
    &[
        F::alpha("Name"),
        F::real("North Axis"),
        F::choice("Terrain", Terrain::VALUES),
        F::real("Loads Convergence Tolerance Value"),
        F::real("Temperature Convergence Tolerance Value"),
        F::choice("Solar Distribution", SolarDistribution::VALUES),
        F::int("Maximum Number of Warmup Days"),
        F::int("Minimum Number of Warmup Days"),
    ],
    8,
);

static TIMESTEP: ObjectLayout = fixed(
    ObjectType::Timestep,
    &[F::int("Number of Timesteps per Hour")],
    1,
);

static GLOBAL_GEOMETRY_RULES: ObjectLayout = fixed(
    ObjectType::GlobalGeometryRules,
    &[
        F::choice("Starting Vertex Position", StartingVertexPosition::VALUES),
        F::choice("Vertex Entry Direction", VertexEntryDirection::VALUES),
        F::choice("Coordinate System", CoordinateSystem::VALUES),
        F::choice("Daylighting Reference Point Coordinate System", CoordinateSystem::VALUES).optional(),
        F::choice("Rectangular Surface Coordinate System", CoordinateSystem::VALUES).optional(),
    ],
    3,
);

static RUN_PERIOD: ObjectLayout = fixed(
    ObjectType::RunPeriod,
    &[
        F::alpha("Name"),
        F::int("Begin Month"),
        F::int("Begin Day of Month"),
        F::int("Begin Year").optional(),
        F::int("End Month"),
        F::int("End Day of Month"),
        F::int("End Year").optional(),
        F::choice("Day of Week for Start Day", DayOfWeek::VALUES).optional(),
        F::choice("Use Weather File Holidays and Special Days", YesNo::VALUES),
        F::choice("Use Weather File Daylight Saving Period", YesNo::VALUES),
        F::choice("Apply Weekend Holiday Rule", YesNo::VALUES),
        F::choice("Use Weather File Rain Indicators", YesNo::VALUES),
        F::choice("Use Weather File Snow Indicators", YesNo::VALUES),
    ],
    13,
);

// ---------------------------------------------------------------------------
// Schedules, materials, constructions
// ---------------------------------------------------------------------------

static SCHEDULE_TYPE_LIMITS: ObjectLayout = fixed(
    ObjectType::ScheduleTypeLimits,
    &[
        F::alpha("Name"),
        F::real("Lower Limit Value").optional(),
        F::real("Upper Limit Value").optional(),
        F::choice("Numeric Type", NumericType::VALUES).optional(),
        F::choice("Unit Type", UnitType::VALUES).optional(),
    ],
    1,
);

static SCHEDULE_COMPACT: ObjectLayout = extensible(
    ObjectType::ScheduleCompact,
    &[F::alpha("Name"), F::alpha("Schedule Type Limits Name").optional()],
    &[F::alpha("Field {n}")],
    1,
    1,
    5000,
);

static MATERIAL: ObjectLayout = fixed(
    ObjectType::Material,
    &[
        F::alpha("Name"),
        F::choice("Roughness", Roughness::VALUES),
        F::real("Thickness"),
        F::real("Conductivity"),
        F::real("Density"),
        F::real("Specific Heat"),
        F::real("Thermal Absorptance").optional(),
        F::real("Solar Absorptance").optional(),
        F::real("Visible Absorptance").optional(),
    ],
    6,
);

static SIMPLE_GLAZING: ObjectLayout = fixed(
    ObjectType::WindowMaterialSimpleGlazingSystem,
    &[
        F::alpha("Name"),
        F::real("U-Factor"),
        F::real("Solar Heat Gain Coefficient"),
        F::real("Visible Transmittance").optional(),
    ],
    3,
);

static CONSTRUCTION: ObjectLayout = extensible(
    ObjectType::Construction,
    &[F::alpha("Name"), F::alpha("Outside Layer")],
    &[F::alpha("Layer {n}")],
    2,
    0,
    9,
);

// ---------------------------------------------------------------------------
// Zones and surfaces
// ---------------------------------------------------------------------------

static ZONE: ObjectLayout = fixed(
    ObjectType::Zone,
    &[
        F::alpha("Name"),
        F::real("Direction of Relative North").optional(),
        F::real("X Origin").optional(),
        F::real("Y Origin").optional(),
        F::real("Z Origin").optional(),
        F::int("Type").optional(),
        F::int("Multiplier").optional(),
        F::real("Ceiling Height").optional().autocalc(),
        F::real("Volume").optional().autocalc(),
        F::real("Floor Area").optional().autocalc(),
        F::alpha("Zone Inside Convection Algorithm").optional(),
        F::alpha("Zone Outside Convection Algorithm").optional(),
        F::choice("Part of Total Floor Area", YesNo::VALUES).optional(),
    ],
    1,
);

const VERTEX_GROUP: &[FieldSpec] = &[
    F::real("Vertex {n} X-coordinate"),
    F::real("Vertex {n} Y-coordinate"),
    F::real("Vertex {n} Z-coordinate"),
];

static BUILDING_SURFACE_9_6: ObjectLayout = extensible(
    ObjectType::BuildingSurfaceDetailed,
    &[
        F::alpha("Name"),
        F::choice("Surface Type", SurfaceKind::VALUES),
        F::alpha("Construction Name"),
        F::alpha("Zone Name"),
        F::choice("Outside Boundary Condition", OutsideBoundary::VALUES),
        F::alpha("Outside Boundary Condition Object").optional(),
        F::choice("Sun Exposure", SunExposure::VALUES),
        F::choice("Wind Exposure", WindExposure::VALUES),
        F::real("View Factor to Ground").optional().autocalc(),
        F::int("Number of Vertices").optional().autocalc(),
    ],
    VERTEX_GROUP,
    1,
    3,
    120,
);

static BUILDING_SURFACE_23_2: ObjectLayout = extensible(
    ObjectType::BuildingSurfaceDetailed,
    &[
        F::alpha("Name"),
        F::choice("Surface Type", SurfaceKind::VALUES),
        F::alpha("Construction Name"),
        F::alpha("Zone Name"),
        F::alpha("Space Name").optional(),
        F::choice("Outside Boundary Condition", OutsideBoundary::VALUES),
        F::alpha("Outside Boundary Condition Object").optional(),
        F::choice("Sun Exposure", SunExposure::VALUES),
        F::choice("Wind Exposure", WindExposure::VALUES),
        F::real("View Factor to Ground").optional().autocalc(),
        F::int("Number of Vertices").optional().autocalc(),
    ],
    VERTEX_GROUP,
    1,
    3,
    120,
);

static FENESTRATION_SURFACE: ObjectLayout = extensible(
    ObjectType::FenestrationSurfaceDetailed,
    &[
        F::alpha("Name"),
        F::choice("Surface Type", FenestrationKind::VALUES),
        F::alpha("Construction Name"),
        F::alpha("Building Surface Name"),
        F::alpha("Outside Boundary Condition Object").optional(),
        F::real("View Factor to Ground").optional().autocalc(),
        F::alpha("Frame and Divider Name").optional(),
        F::real("Multiplier").optional(),
        F::int("Number of Vertices").optional().autocalc(),
    ],
    VERTEX_GROUP,
    1,
    3,
    4,
);

// ---------------------------------------------------------------------------
// Zone controls and zone equipment
// ---------------------------------------------------------------------------

static ZONE_THERMOSTAT: ObjectLayout = fixed(
    ObjectType::ZoneControlThermostat,
    &[
        F::alpha("Name"),
        F::alpha("Zone or ZoneList Name"),
        F::alpha("Control Type Schedule Name"),
        F::choice("Control 1 Object Type", ThermostatControlType::VALUES),
        F::alpha("Control 1 Name"),
    ],
    5,
);

static DUAL_SETPOINT: ObjectLayout = fixed(
    ObjectType::ThermostatSetpointDualSetpoint,
    &[
        F::alpha("Name"),
        F::alpha("Heating Setpoint Temperature Schedule Name"),
        F::alpha("Cooling Setpoint Temperature Schedule Name"),
    ],
    3,
);

static EQUIPMENT_CONNECTIONS: ObjectLayout = fixed(
    ObjectType::ZoneHvacEquipmentConnections,
    &[
        F::alpha("Zone Name"),
        F::alpha("Zone Conditioning Equipment List Name"),
        F::node("Zone Air Inlet Node or NodeList Name"),
        F::node("Zone Air Exhaust Node or NodeList Name").optional(),
        F::node("Zone Air Node Name"),
        F::node("Zone Return Air Node or NodeList Name"),
    ],
    6,
);

static EQUIPMENT_LIST: ObjectLayout = extensible(
    ObjectType::ZoneHvacEquipmentList,
    &[
        F::alpha("Name"),
        F::choice("Load Distribution Scheme", LoadDistributionScheme::VALUES),
    ],
    &[
        F::choice("Zone Equipment {n} Object Type", ZoneEquipmentType::VALUES),
        F::alpha("Zone Equipment {n} Name"),
        F::int("Zone Equipment {n} Cooling Sequence"),
        F::int("Zone Equipment {n} Heating or No-Load Sequence"),
        F::alpha("Zone Equipment {n} Sequential Cooling Fraction Schedule Name").optional(),
        F::alpha("Zone Equipment {n} Sequential Heating Fraction Schedule Name").optional(),
    ],
    1,
    1,
    100,
);

static AIR_DISTRIBUTION_UNIT: ObjectLayout = fixed(
    ObjectType::ZoneHvacAirDistributionUnit,
    &[
        F::alpha("Name"),
        F::node("Air Distribution Unit Outlet Node Name"),
        F::choice("Air Terminal Object Type", TerminalType::VALUES),
        F::alpha("Air Terminal Name"),
    ],
    4,
);

static VAV_REHEAT: ObjectLayout = fixed(
    ObjectType::AirTerminalVavReheat,
    &[
        F::alpha("Name"),
        F::alpha("Availability Schedule Name").optional(),
        F::node("Damper Air Outlet Node Name"),
        F::node("Air Inlet Node Name"),
        F::real("Maximum Air Flow Rate").autosize(),
        F::choice("Zone Minimum Air Flow Input Method", ZoneMinimumAirFlowInputMethod::VALUES),
        F::real("Constant Minimum Air Flow Fraction").optional().autosize(),
        F::real("Fixed Minimum Air Flow Rate").optional().autosize(),
        F::alpha("Minimum Air Flow Fraction Schedule Name").optional(),
        F::choice("Reheat Coil Object Type", HeatingCoilType::VALUES),
        F::alpha("Reheat Coil Name"),
        F::real("Maximum Hot Water or Steam Flow Rate").optional().autosize(),
        F::real("Minimum Hot Water or Steam Flow Rate").optional(),
        F::node("Air Outlet Node Name"),
        F::real("Convergence Tolerance").optional(),
        F::choice("Damper Heating Action", DamperHeatingAction::VALUES).optional(),
        F::real("Maximum Flow per Zone Floor Area During Reheat").optional().autocalc(),
        F::real("Maximum Flow Fraction During Reheat").optional().autocalc(),
        F::real("Maximum Reheat Air Temperature").optional(),
    ],
    14,
);

static CONSTANT_VOLUME_NO_REHEAT: ObjectLayout = fixed(
    ObjectType::AirTerminalConstantVolumeNoReheat,
    &[
        F::alpha("Name"),
        F::alpha("Availability Schedule Name").optional(),
        F::node("Air Inlet Node Name"),
        F::node("Air Outlet Node Name"),
        F::real("Maximum Air Flow Rate").autosize(),
    ],
    5,
);

// ---------------------------------------------------------------------------
// Air loops
// ---------------------------------------------------------------------------

static AIR_LOOP: ObjectLayout = fixed(
    ObjectType::AirLoopHvac,
    &[
        F::alpha("Name"),
        F::alpha("Controller List Name").optional(),
        F::alpha("Availability Manager List Name").optional(),
        F::real("Design Supply Air Flow Rate").autosize(),
        F::alpha("Branch List Name"),
        F::alpha("Connector List Name").optional(),
        F::node("Supply Side Inlet Node Name"),
        F::node("Demand Side Outlet Node Name"),
        F::node("Demand Side Inlet Node Names"),
        F::node("Supply Side Outlet Node Names"),
        F::real("Design Return Air Flow Fraction of Supply Air Flow").optional(),
    ],
    10,
);

static BRANCH_LIST: ObjectLayout = extensible(
    ObjectType::BranchList,
    &[F::alpha("Name")],
    &[F::alpha("Branch {n} Name")],
    1,
    1,
    500,
);

static BRANCH: ObjectLayout = extensible(
    ObjectType::Branch,
    &[F::alpha("Name"), F::alpha("Pressure Drop Curve Name").optional()],
    &[
        F::choice("Component {n} Object Type", BranchComponentType::VALUES),
        F::alpha("Component {n} Name"),
        F::node("Component {n} Inlet Node Name"),
        F::node("Component {n} Outlet Node Name"),
    ],
    1,
    1,
    50,
);

static SUPPLY_PATH: ObjectLayout = extensible(
    ObjectType::AirLoopHvacSupplyPath,
    &[F::alpha("Name"), F::node("Supply Air Path Inlet Node Name")],
    &[
        F::choice("Component {n} Object Type", SupplyPathComponentType::VALUES),
        F::alpha("Component {n} Name"),
    ],
    1,
    1,
    50,
);

static ZONE_SPLITTER: ObjectLayout = extensible(
    ObjectType::AirLoopHvacZoneSplitter,
    &[F::alpha("Name"), F::node("Inlet Node Name")],
    &[F::node("Outlet {n} Node Name")],
    1,
    1,
    500,
);

static RETURN_PATH: ObjectLayout = extensible(
    ObjectType::AirLoopHvacReturnPath,
    &[F::alpha("Name"), F::node("Return Air Path Outlet Node Name")],
    &[
        F::choice("Component {n} Object Type", ReturnPathComponentType::VALUES),
        F::alpha("Component {n} Name"),
    ],
    1,
    1,
    50,
);

static ZONE_MIXER: ObjectLayout = extensible(
    ObjectType::AirLoopHvacZoneMixer,
    &[F::alpha("Name"), F::node("Outlet Node Name")],
    &[F::node("Inlet {n} Node Name")],
    1,
    1,
    500,
);

static OUTDOOR_AIR_SYSTEM: ObjectLayout = fixed(
    ObjectType::AirLoopHvacOutdoorAirSystem,
    &[
        F::alpha("Name"),
        F::alpha("Controller List Name"),
        F::alpha("Outdoor Air Equipment List Name"),
        F::alpha("Availability Manager List Name").optional(),
    ],
    3,
);

static CONTROLLER_LIST: ObjectLayout = extensible(
    ObjectType::AirLoopHvacControllerList,
    &[F::alpha("Name")],
    &[
        F::choice("Controller {n} Object Type", ControllerType::VALUES),
        F::alpha("Controller {n} Name"),
    ],
    1,
    1,
    8,
);

static OUTDOOR_AIR_EQUIPMENT_LIST: ObjectLayout = extensible(
    ObjectType::AirLoopHvacOutdoorAirSystemEquipmentList,
    &[F::alpha("Name")],
    &[
        F::choice("Component {n} Object Type", OutdoorAirEquipmentType::VALUES),
        F::alpha("Component {n} Name"),
    ],
    1,
    1,
    9,
);

static OUTDOOR_AIR_MIXER: ObjectLayout = fixed(
    ObjectType::OutdoorAirMixer,
    &[
        F::alpha("Name"),
        F::node("Mixed Air Node Name"),
        F::node("Outdoor Air Stream Node Name"),
        F::node("Relief Air Stream Node Name"),
        F::node("Return Air Stream Node Name"),
    ],
    5,
);

static CONTROLLER_OUTDOOR_AIR: ObjectLayout = fixed(
    ObjectType::ControllerOutdoorAir,
    &[
        F::alpha("Name"),
        F::node("Relief Air Outlet Node Name"),
        F::node("Return Air Node Name"),
        F::node("Mixed Air Node Name"),
        F::node("Actuator Node Name"),
        F::real("Minimum Outdoor Air Flow Rate").autosize(),
        F::real("Maximum Outdoor Air Flow Rate").autosize(),
        F::choice("Economizer Control Type", EconomizerControlType::VALUES),
        F::choice("Economizer Control Action Type", EconomizerControlActionType::VALUES),
        F::real("Economizer Maximum Limit Dry-Bulb Temperature").optional(),
        F::real("Economizer Maximum Limit Enthalpy").optional(),
        F::real("Economizer Maximum Limit Dewpoint Temperature").optional(),
        F::alpha("Electronic Enthalpy Limit Curve Name").optional(),
        F::real("Economizer Minimum Limit Dry-Bulb Temperature").optional(),
        F::choice("Lockout Type", LockoutType::VALUES),
        F::choice("Minimum Limit Type", MinimumLimitType::VALUES),
    ],
    16,
);

static OUTDOOR_AIR_NODE_LIST: ObjectLayout = extensible(
    ObjectType::OutdoorAirNodeList,
    &[],
    &[F::node("Node or NodeList Name {n}")],
    1,
    1,
    25,
);

// ---------------------------------------------------------------------------
// Fans, coils, curves
// ---------------------------------------------------------------------------

static FAN_VARIABLE_VOLUME: ObjectLayout = fixed(
    ObjectType::FanVariableVolume,
    &[
        F::alpha("Name"),
        F::alpha("Availability Schedule Name").optional(),
        F::real("Fan Total Efficiency"),
        F::real("Pressure Rise"),
        F::real("Maximum Flow Rate").autosize(),
        F::choice(
            "Fan Power Minimum Flow Rate Input Method",
            FanPowerMinimumFlowRateInputMethod::VALUES,
        ),
        F::real("Fan Power Minimum Flow Fraction").optional(),
        F::real("Fan Power Minimum Air Flow Rate").optional(),
        F::real("Motor Efficiency"),
        F::real("Motor In Airstream Fraction"),
        F::real("Fan Power Coefficient 1").optional(),
        F::real("Fan Power Coefficient 2").optional(),
        F::real("Fan Power Coefficient 3").optional(),
        F::real("Fan Power Coefficient 4").optional(),
        F::real("Fan Power Coefficient 5").optional(),
        F::node("Air Inlet Node Name"),
        F::node("Air Outlet Node Name"),
    ],
    17,
);

static FAN_CONSTANT_VOLUME: ObjectLayout = fixed(
    ObjectType::FanConstantVolume,
    &[
        F::alpha("Name"),
        F::alpha("Availability Schedule Name").optional(),
        F::real("Fan Total Efficiency"),
        F::real("Pressure Rise"),
        F::real("Maximum Flow Rate").autosize(),
        F::real("Motor Efficiency"),
        F::real("Motor In Airstream Fraction"),
        F::node("Air Inlet Node Name"),
        F::node("Air Outlet Node Name"),
    ],
    9,
);

static COIL_SYSTEM_COOLING_DX: ObjectLayout = fixed(
    ObjectType::CoilSystemCoolingDx,
    &[
        F::alpha("Name"),
        F::alpha("Availability Schedule Name").optional(),
        F::node("DX Cooling Coil System Inlet Node Name"),
        F::node("DX Cooling Coil System Outlet Node Name"),
        F::node("DX Cooling Coil System Sensor Node Name"),
        F::choice("Cooling Coil Object Type", CoolingCoilType::VALUES),
        F::alpha("Cooling Coil Name"),
    ],
    7,
);

static DX_SINGLE_SPEED_9_6: ObjectLayout = fixed(
    ObjectType::CoilCoolingDxSingleSpeed,
    &[
        F::alpha("Name"),
        F::alpha("Availability Schedule Name").optional(),
        F::real("Gross Rated Total Cooling Capacity").autosize(),
        F::real("Gross Rated Sensible Heat Ratio").autosize(),
        F::real("Gross Rated Cooling COP"),
        F::real("Rated Air Flow Rate").autosize(),
        F::real("2017 Rated Evaporator Fan Power Per Volume Flow Rate").optional(),
        F::node("Air Inlet Node Name"),
        F::node("Air Outlet Node Name"),
        F::alpha("Total Cooling Capacity Function of Temperature Curve Name"),
        F::alpha("Total Cooling Capacity Function of Flow Fraction Curve Name"),
        F::alpha("Energy Input Ratio Function of Temperature Curve Name"),
        F::alpha("Energy Input Ratio Function of Flow Fraction Curve Name"),
        F::alpha("Part Load Fraction Correlation Curve Name"),
    ],
    14,
);

static DX_SINGLE_SPEED_23_2: ObjectLayout = fixed(
    ObjectType::CoilCoolingDxSingleSpeed,
    &[
        F::alpha("Name"),
        F::alpha("Availability Schedule Name").optional(),
        F::real("Gross Rated Total Cooling Capacity").autosize(),
        F::real("Gross Rated Sensible Heat Ratio").autosize(),
        F::real("Gross Rated Cooling COP"),
        F::real("Rated Air Flow Rate").autosize(),
        F::real("2017 Rated Evaporator Fan Power Per Volume Flow Rate").optional(),
        F::real("2023 Rated Evaporator Fan Power Per Volume Flow Rate").optional(),
        F::node("Air Inlet Node Name"),
        F::node("Air Outlet Node Name"),
        F::alpha("Total Cooling Capacity Function of Temperature Curve Name"),
        F::alpha("Total Cooling Capacity Function of Flow Fraction Curve Name"),
        F::alpha("Energy Input Ratio Function of Temperature Curve Name"),
        F::alpha("Energy Input Ratio Function of Flow Fraction Curve Name"),
        F::alpha("Part Load Fraction Correlation Curve Name"),
    ],
    15,
);

static COIL_HEATING_FUEL: ObjectLayout = fixed(
    ObjectType::CoilHeatingFuel,
    &[
        F::alpha("Name"),
        F::alpha("Availability Schedule Name").optional(),
        F::choice("Fuel Type", FuelType::VALUES),
        F::real("Burner Efficiency"),
        F::real("Nominal Capacity").autosize(),
        F::node("Air Inlet Node Name"),
        F::node("Air Outlet Node Name"),
        F::node("Temperature Setpoint Node Name").optional(),
    ],
    7,
);

static COIL_HEATING_ELECTRIC: ObjectLayout = fixed(
    ObjectType::CoilHeatingElectric,
    &[
        F::alpha("Name"),
        F::alpha("Availability Schedule Name").optional(),
        F::real("Efficiency"),
        F::real("Nominal Capacity").autosize(),
        F::node("Air Inlet Node Name"),
        F::node("Air Outlet Node Name"),
        F::node("Temperature Setpoint Node Name").optional(),
    ],
    6,
);

static CURVE_BIQUADRATIC: ObjectLayout = fixed(
    ObjectType::CurveBiquadratic,
    &[
        F::alpha("Name"),
        F::real("Coefficient1 Constant"),
        F::real("Coefficient2 x"),
        F::real("Coefficient3 x**2"),
        F::real("Coefficient4 y"),
        F::real("Coefficient5 y**2"),
        F::real("Coefficient6 x*y"),
        F::real("Minimum Value of x"),
        F::real("Maximum Value of x"),
        F::real("Minimum Value of y"),
        F::real("Maximum Value of y"),
    ],
    11,
);

static CURVE_QUADRATIC: ObjectLayout = fixed(
    ObjectType::CurveQuadratic,
    &[
        F::alpha("Name"),
        F::real("Coefficient1 Constant"),
        F::real("Coefficient2 x"),
        F::real("Coefficient3 x**2"),
        F::real("Minimum Value of x"),
        F::real("Maximum Value of x"),
    ],
    6,
);

// ---------------------------------------------------------------------------
// Setpoint managers and outputs
// ---------------------------------------------------------------------------

static SPM_SCHEDULED: ObjectLayout = fixed(
    ObjectType::SetpointManagerScheduled,
    &[
        F::alpha("Name"),
        F::choice("Control Variable", ControlVariable::VALUES),
        F::alpha("Schedule Name"),
        F::node("Setpoint Node or NodeList Name"),
    ],
    4,
);

static SPM_MIXED_AIR: ObjectLayout = fixed(
    ObjectType::SetpointManagerMixedAir,
    &[
        F::alpha("Name"),
        F::choice("Control Variable", ControlVariable::VALUES),
        F::node("Reference Setpoint Node Name"),
        F::node("Fan Inlet Node Name"),
        F::node("Fan Outlet Node Name"),
        F::node("Setpoint Node or NodeList Name"),
    ],
    6,
);

static OUTPUT_VARIABLE: ObjectLayout = fixed(
    ObjectType::OutputVariable,
    &[
        F::alpha("Key Value"),
        F::alpha("Variable Name"),
        F::choice("Reporting Frequency", ReportingFrequency::VALUES),
        F::alpha("Schedule Name").optional(),
    ],
    3,
);

static OUTPUT_SQLITE: ObjectLayout = fixed(
    ObjectType::OutputSqlite,
    &[
        F::choice("Option Type", SqliteOption::VALUES),
        F::alpha("Unit Conversion for Tabular Data").optional(),
    ],
    1,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_a_layout() {
        for version in SchemaVersion::ALL {
            for ty in ObjectType::ALL {
                let layout = layout(*ty, *version);
                assert_eq!(layout.object_type, *ty);
                assert!(layout.min_fields <= layout.max_fields());
            }
        }
    }

    #[test]
    fn test_surface_space_name_only_in_23_2() {
        let old = layout(ObjectType::BuildingSurfaceDetailed, SchemaVersion::V9_6);
        let new = layout(ObjectType::BuildingSurfaceDetailed, SchemaVersion::V23_2);
        assert_eq!(old.index_of("Space Name"), None);
        assert_eq!(new.index_of("Space Name"), Some(4));
        assert_eq!(new.fields.len(), old.fields.len() + 1);
    }

    #[test]
    fn test_dx_coil_fan_power_field_in_23_2() {
        let new = layout(ObjectType::CoilCoolingDxSingleSpeed, SchemaVersion::V23_2);
        let idx_2017 = new.index_of("2017 Rated Evaporator Fan Power Per Volume Flow Rate").unwrap();
        let idx_2023 = new.index_of("2023 Rated Evaporator Fan Power Per Volume Flow Rate").unwrap();
        assert_eq!(idx_2023, idx_2017 + 1);
        let old = layout(ObjectType::CoilCoolingDxSingleSpeed, SchemaVersion::V9_6);
        assert!(old.index_of("2023 Rated Evaporator Fan Power Per Volume Flow Rate").is_none());
    }

    #[test]
    fn test_group_field_names() {
        let surface = layout(ObjectType::BuildingSurfaceDetailed, SchemaVersion::V9_6);
        let first = surface.fields.len();
        assert_eq!(surface.field_name(first), "Vertex 1 X-coordinate");
        assert_eq!(surface.field_name(first + 5), "Vertex 2 Z-coordinate");

        let construction = layout(ObjectType::Construction, SchemaVersion::V9_6);
        assert_eq!(construction.field_name(1), "Outside Layer");
        assert_eq!(construction.field_name(2), "Layer 2");
    }

    #[test]
    fn test_accepts_count() {
        let surface = layout(ObjectType::BuildingSurfaceDetailed, SchemaVersion::V9_6);
        let fixed = surface.fields.len();
        assert!(!surface.accepts_count(fixed + 6));
        assert!(surface.accepts_count(fixed + 9));
        assert!(!surface.accepts_count(fixed + 10));

        // Trailing equipment group may stop after its required fields
        let list = layout(ObjectType::ZoneHvacEquipmentList, SchemaVersion::V23_2);
        assert!(list.accepts_count(2 + 4));
        assert!(list.accepts_count(2 + 6));
        assert!(!list.accepts_count(2 + 3));

        let window = layout(ObjectType::FenestrationSurfaceDetailed, SchemaVersion::V23_2);
        assert!(!window.accepts_count(window.fields.len() + 15));
    }
}
