// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Closed value sets for enumerated fields
//!
//! Each enumerated field of the schema has a Rust enum here. Builders only
//! accept these enums, so an out-of-set value cannot be constructed; the
//! `VALUES` slices double as the allowed sets in the field layouts, which is
//! what parsed (free-text) values are checked against.

use std::fmt;

/// A value drawn from a closed set of keywords
pub trait Choice: Copy {
    /// Keyword as written in the document
    fn keyword(&self) -> &'static str;
}

macro_rules! choice_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Allowed keywords, in declaration order
            pub const VALUES: &'static [&'static str] = &[$($text),+];

            /// Keyword as written in the document
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// Parse a keyword (case-insensitive)
            pub fn parse(s: &str) -> Option<Self> {
                let s = s.trim();
                $(
                    if s.eq_ignore_ascii_case($text) {
                        return Some($name::$variant);
                    }
                )+
                None
            }
        }

        impl Choice for $name {
            fn keyword(&self) -> &'static str {
                self.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice_enum! {
    /// Opaque building surface type
    SurfaceKind {
        Floor => "Floor",
        Wall => "Wall",
        Ceiling => "Ceiling",
        Roof => "Roof",
    }
}

choice_enum! {
    /// Fenestration surface type
    FenestrationKind {
        Window => "Window",
        Door => "Door",
        GlassDoor => "GlassDoor",
    }
}

choice_enum! {
    /// Outside boundary condition of a building surface
    OutsideBoundary {
        Adiabatic => "Adiabatic",
        Surface => "Surface",
        Zone => "Zone",
        Outdoors => "Outdoors",
        Ground => "Ground",
    }
}

choice_enum! {
    SunExposure {
        SunExposed => "SunExposed",
        NoSun => "NoSun",
    }
}

choice_enum! {
    WindExposure {
        WindExposed => "WindExposed",
        NoWind => "NoWind",
    }
}

choice_enum! {
    /// Outside surface roughness of a material
    Roughness {
        VeryRough => "VeryRough",
        Rough => "Rough",
        MediumRough => "MediumRough",
        MediumSmooth => "MediumSmooth",
        Smooth => "Smooth",
        VerySmooth => "VerySmooth",
    }
}

choice_enum! {
    Terrain {
        Country => "Country",
        Suburbs => "Suburbs",
        City => "City",
        Ocean => "Ocean",
        Urban => "Urban",
    }
}

choice_enum! {
    SolarDistribution {
        MinimalShadowing => "MinimalShadowing",
        FullExterior => "FullExterior",
        FullInteriorAndExterior => "FullInteriorAndExterior",
        FullExteriorWithReflections => "FullExteriorWithReflections",
        FullInteriorAndExteriorWithReflections => "FullInteriorAndExteriorWithReflections",
    }
}

choice_enum! {
    StartingVertexPosition {
        UpperLeftCorner => "UpperLeftCorner",
        LowerLeftCorner => "LowerLeftCorner",
        UpperRightCorner => "UpperRightCorner",
        LowerRightCorner => "LowerRightCorner",
    }
}

choice_enum! {
    VertexEntryDirection {
        Counterclockwise => "Counterclockwise",
        Clockwise => "Clockwise",
    }
}

choice_enum! {
    CoordinateSystem {
        Relative => "Relative",
        World => "World",
        Absolute => "Absolute",
    }
}

choice_enum! {
    YesNo {
        Yes => "Yes",
        No => "No",
    }
}

choice_enum! {
    DayOfWeek {
        Sunday => "Sunday",
        Monday => "Monday",
        Tuesday => "Tuesday",
        Wednesday => "Wednesday",
        Thursday => "Thursday",
        Friday => "Friday",
        Saturday => "Saturday",
    }
}

choice_enum! {
    NumericType {
        Continuous => "Continuous",
        Discrete => "Discrete",
    }
}

choice_enum! {
    /// Unit type of a schedule type limit
    UnitType {
        Dimensionless => "Dimensionless",
        Temperature => "Temperature",
        DeltaTemperature => "DeltaTemperature",
        Availability => "Availability",
        Control => "Control",
        Percent => "Percent",
        Power => "Power",
    }
}

choice_enum! {
    /// Fuel burned by a fuel-fired heating coil
    FuelType {
        NaturalGas => "NaturalGas",
        Propane => "Propane",
        FuelOilNo1 => "FuelOilNo1",
        FuelOilNo2 => "FuelOilNo2",
        Diesel => "Diesel",
        Gasoline => "Gasoline",
        OtherFuel1 => "OtherFuel1",
        OtherFuel2 => "OtherFuel2",
    }
}

choice_enum! {
    /// Variable controlled by a setpoint manager
    ControlVariable {
        Temperature => "Temperature",
        MaximumTemperature => "MaximumTemperature",
        MinimumTemperature => "MinimumTemperature",
        HumidityRatio => "HumidityRatio",
    }
}

choice_enum! {
    LoadDistributionScheme {
        SequentialLoad => "SequentialLoad",
        UniformLoad => "UniformLoad",
        UniformPLR => "UniformPLR",
        SequentialUniformPLR => "SequentialUniformPLR",
    }
}

choice_enum! {
    ZoneMinimumAirFlowInputMethod {
        Constant => "Constant",
        FixedFlowRate => "FixedFlowRate",
        Scheduled => "Scheduled",
    }
}

choice_enum! {
    DamperHeatingAction {
        Normal => "Normal",
        Reverse => "Reverse",
        ReverseWithLimits => "ReverseWithLimits",
    }
}

choice_enum! {
    FanPowerMinimumFlowRateInputMethod {
        Fraction => "Fraction",
        FixedFlowRate => "FixedFlowRate",
    }
}

choice_enum! {
    EconomizerControlType {
        FixedDryBulb => "FixedDryBulb",
        FixedEnthalpy => "FixedEnthalpy",
        DifferentialDryBulb => "DifferentialDryBulb",
        DifferentialEnthalpy => "DifferentialEnthalpy",
        FixedDewPointAndDryBulb => "FixedDewPointAndDryBulb",
        NoEconomizer => "NoEconomizer",
    }
}

choice_enum! {
    EconomizerControlActionType {
        ModulateFlow => "ModulateFlow",
        MinimumFlowWithBypass => "MinimumFlowWithBypass",
    }
}

choice_enum! {
    LockoutType {
        NoLockout => "NoLockout",
        LockoutWithHeating => "LockoutWithHeating",
        LockoutWithCompressor => "LockoutWithCompressor",
    }
}

choice_enum! {
    MinimumLimitType {
        FixedMinimum => "FixedMinimum",
        ProportionalMinimum => "ProportionalMinimum",
    }
}

choice_enum! {
    ReportingFrequency {
        Detailed => "Detailed",
        Timestep => "Timestep",
        Hourly => "Hourly",
        Daily => "Daily",
        Monthly => "Monthly",
        RunPeriod => "RunPeriod",
        Annual => "Annual",
    }
}

choice_enum! {
    SqliteOption {
        Simple => "Simple",
        SimpleAndTabular => "SimpleAndTabular",
    }
}

choice_enum! {
    /// Thermostat setpoint object referenced by a zone thermostat
    ThermostatControlType {
        SingleHeating => "ThermostatSetpoint:SingleHeating",
        SingleCooling => "ThermostatSetpoint:SingleCooling",
        SingleHeatingOrCooling => "ThermostatSetpoint:SingleHeatingOrCooling",
        DualSetpoint => "ThermostatSetpoint:DualSetpoint",
    }
}

choice_enum! {
    /// Equipment object types accepted by a zone equipment list
    ZoneEquipmentType {
        AirDistributionUnit => "ZoneHVAC:AirDistributionUnit",
        IdealLoadsAirSystem => "ZoneHVAC:IdealLoadsAirSystem",
    }
}

choice_enum! {
    /// Terminal unit object types accepted by an air distribution unit
    TerminalType {
        VavReheat => "AirTerminal:SingleDuct:VAV:Reheat",
        ConstantVolumeNoReheat => "AirTerminal:SingleDuct:ConstantVolume:NoReheat",
    }
}

choice_enum! {
    /// Heating coil object types, used both for branch components and reheat coils
    HeatingCoilType {
        Electric => "Coil:Heating:Electric",
        Fuel => "Coil:Heating:Fuel",
        Water => "Coil:Heating:Water",
    }
}

choice_enum! {
    CoolingCoilType {
        DxSingleSpeed => "Coil:Cooling:DX:SingleSpeed",
    }
}

choice_enum! {
    /// Component object types allowed on an air loop branch
    BranchComponentType {
        OutdoorAirSystem => "AirLoopHVAC:OutdoorAirSystem",
        FanVariableVolume => "Fan:VariableVolume",
        FanConstantVolume => "Fan:ConstantVolume",
        CoilSystemCoolingDx => "CoilSystem:Cooling:DX",
        CoilHeatingFuel => "Coil:Heating:Fuel",
        CoilHeatingElectric => "Coil:Heating:Electric",
    }
}

choice_enum! {
    ControllerType {
        OutdoorAir => "Controller:OutdoorAir",
        WaterCoil => "Controller:WaterCoil",
    }
}

choice_enum! {
    SupplyPathComponentType {
        ZoneSplitter => "AirLoopHVAC:ZoneSplitter",
        SupplyPlenum => "AirLoopHVAC:SupplyPlenum",
    }
}

choice_enum! {
    ReturnPathComponentType {
        ZoneMixer => "AirLoopHVAC:ZoneMixer",
        ReturnPlenum => "AirLoopHVAC:ReturnPlenum",
    }
}

choice_enum! {
    OutdoorAirEquipmentType {
        Mixer => "OutdoorAir:Mixer",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(SurfaceKind::parse("roof"), Some(SurfaceKind::Roof));
        assert_eq!(OutsideBoundary::parse(" OUTDOORS"), Some(OutsideBoundary::Outdoors));
        assert_eq!(SurfaceKind::parse("Skylight"), None);
    }

    #[test]
    fn test_values_match_variants() {
        assert_eq!(FuelType::VALUES.len(), 8);
        for value in HeatingCoilType::VALUES {
            let parsed = HeatingCoilType::parse(value).unwrap();
            assert_eq!(parsed.keyword(), *value);
        }
    }

    #[test]
    fn test_branch_types_cover_heating_coils() {
        for coil in [HeatingCoilType::Electric, HeatingCoilType::Fuel] {
            assert!(BranchComponentType::parse(coil.as_str()).is_some());
        }
    }
}
