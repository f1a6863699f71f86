// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Object types and schema versions
//!
//! Fast type checking using an enum instead of string comparison. Class
//! keywords are matched case-insensitively, like the consuming engine does.

use std::fmt;

use crate::error::{Error, Result};

macro_rules! object_types {
    ($($variant:ident => $keyword:literal),+ $(,)?) => {
        /// Object types the serializer knows how to lay out
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum ObjectType {
            $($variant),+
        }

        impl ObjectType {
            /// Every known object type, in declaration order
            pub const ALL: &'static [ObjectType] = &[$(ObjectType::$variant),+];

            /// Class keyword as written in the document
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(ObjectType::$variant => $keyword),+
                }
            }

            /// Parse a class keyword (case-insensitive)
            pub fn from_keyword(s: &str) -> Option<Self> {
                let s = s.trim();
                $(
                    if s.eq_ignore_ascii_case($keyword) {
                        return Some(ObjectType::$variant);
                    }
                )+
                None
            }
        }
    };
}

object_types! {
    Version => "Version",
    SimulationControl => "SimulationControl",
    Building => "Building",
    Timestep => "Timestep",
    GlobalGeometryRules => "GlobalGeometryRules",
    RunPeriod => "RunPeriod",
    ScheduleTypeLimits => "ScheduleTypeLimits",
    ScheduleCompact => "Schedule:Compact",
    Material => "Material",
    WindowMaterialSimpleGlazingSystem => "WindowMaterial:SimpleGlazingSystem",
    Construction => "Construction",
    Zone => "Zone",
    BuildingSurfaceDetailed => "BuildingSurface:Detailed",
    FenestrationSurfaceDetailed => "FenestrationSurface:Detailed",
    ZoneControlThermostat => "ZoneControl:Thermostat",
    ThermostatSetpointDualSetpoint => "ThermostatSetpoint:DualSetpoint",
    ZoneHvacEquipmentConnections => "ZoneHVAC:EquipmentConnections",
    ZoneHvacEquipmentList => "ZoneHVAC:EquipmentList",
    ZoneHvacAirDistributionUnit => "ZoneHVAC:AirDistributionUnit",
    AirTerminalVavReheat => "AirTerminal:SingleDuct:VAV:Reheat",
    AirTerminalConstantVolumeNoReheat => "AirTerminal:SingleDuct:ConstantVolume:NoReheat",
    AirLoopHvac => "AirLoopHVAC",
    BranchList => "BranchList",
    Branch => "Branch",
    AirLoopHvacSupplyPath => "AirLoopHVAC:SupplyPath",
    AirLoopHvacZoneSplitter => "AirLoopHVAC:ZoneSplitter",
    AirLoopHvacReturnPath => "AirLoopHVAC:ReturnPath",
    AirLoopHvacZoneMixer => "AirLoopHVAC:ZoneMixer",
    AirLoopHvacOutdoorAirSystem => "AirLoopHVAC:OutdoorAirSystem",
    AirLoopHvacControllerList => "AirLoopHVAC:ControllerList",
    AirLoopHvacOutdoorAirSystemEquipmentList => "AirLoopHVAC:OutdoorAirSystem:EquipmentList",
    OutdoorAirMixer => "OutdoorAir:Mixer",
    ControllerOutdoorAir => "Controller:OutdoorAir",
    OutdoorAirNodeList => "OutdoorAir:NodeList",
    FanVariableVolume => "Fan:VariableVolume",
    FanConstantVolume => "Fan:ConstantVolume",
    CoilSystemCoolingDx => "CoilSystem:Cooling:DX",
    CoilCoolingDxSingleSpeed => "Coil:Cooling:DX:SingleSpeed",
    CoilHeatingFuel => "Coil:Heating:Fuel",
    CoilHeatingElectric => "Coil:Heating:Electric",
    CurveBiquadratic => "Curve:Biquadratic",
    CurveQuadratic => "Curve:Quadratic",
    SetpointManagerScheduled => "SetpointManager:Scheduled",
    SetpointManagerMixedAir => "SetpointManager:MixedAir",
    OutputVariable => "Output:Variable",
    OutputSqlite => "Output:SQLite",
}

impl ObjectType {
    /// Parse a class keyword, failing with a schema error
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_keyword(s).ok_or_else(|| Error::UnknownObjectType(s.trim().to_string()))
    }

    /// Objects whose first field is not a unique name
    pub fn is_unnamed(&self) -> bool {
        matches!(
            self,
            ObjectType::Version
                | ObjectType::SimulationControl
                | ObjectType::Timestep
                | ObjectType::GlobalGeometryRules
                | ObjectType::OutputVariable
                | ObjectType::OutputSqlite
                | ObjectType::OutdoorAirNodeList
        )
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared schema version of a document.
///
/// Every record is laid out for exactly one version and a document refuses
/// records laid out for another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SchemaVersion {
    #[cfg_attr(feature = "serde", serde(rename = "9.6"))]
    V9_6,
    #[cfg_attr(feature = "serde", serde(rename = "23.2"))]
    V23_2,
}

impl SchemaVersion {
    /// All supported versions, oldest first
    pub const ALL: &'static [SchemaVersion] = &[SchemaVersion::V9_6, SchemaVersion::V23_2];

    /// Version identifier written into the `Version` record
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::V9_6 => "9.6",
            SchemaVersion::V23_2 => "23.2",
        }
    }

    /// Parse a version identifier, ignoring a trailing patch component
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let mut parts = s.split('.');
        let major = parts.next().unwrap_or_default();
        let minor = parts.next().unwrap_or_default();
        match (major, minor) {
            ("9", "6") => Ok(SchemaVersion::V9_6),
            ("23", "2") => Ok(SchemaVersion::V23_2),
            _ => Err(Error::UnsupportedVersion(s.to_string())),
        }
    }

    /// Whether surfaces carry a `Space Name` field
    pub fn has_spaces(&self) -> bool {
        matches!(self, SchemaVersion::V23_2)
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        SchemaVersion::V23_2
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_round_trip() {
        for ty in ObjectType::ALL {
            assert_eq!(ObjectType::from_keyword(ty.as_str()), Some(*ty));
        }
    }

    #[test]
    fn test_keyword_case_insensitive() {
        assert_eq!(
            ObjectType::from_keyword("buildingsurface:detailed"),
            Some(ObjectType::BuildingSurfaceDetailed)
        );
        assert_eq!(ObjectType::from_keyword("  ZONE "), Some(ObjectType::Zone));
        assert!(ObjectType::parse("Zone:Bogus").is_err());
    }

    #[test]
    fn test_version_parse() {
        assert_eq!(SchemaVersion::parse("9.6").unwrap(), SchemaVersion::V9_6);
        assert_eq!(SchemaVersion::parse("23.2.0").unwrap(), SchemaVersion::V23_2);
        assert!(matches!(
            SchemaVersion::parse("8.9"),
            Err(Error::UnsupportedVersion(_))
        ));
    }
}
