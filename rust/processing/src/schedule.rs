// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Compact schedules and their type limits.

use bemgen_core::choices::{NumericType, UnitType};
use bemgen_core::{ObjectType, Record, SchemaVersion};
use bemgen_topology::{
    HvacDefaults, ALWAYS_ON_SCHEDULE, CONTROL_TYPE_SCHEDULE, COOLING_SETPOINT_SCHEDULE,
    HEATING_SETPOINT_SCHEDULE, SUPPLY_AIR_TEMPERATURE_SCHEDULE,
};

/// Setback (heating) or setup (cooling) applied outside occupied hours, K.
pub const SETBACK_DELTA: f64 = 5.0;

/// Value selecting the dual-setpoint control type.
const DUAL_SETPOINT_CONTROL: f64 = 4.0;

const TEMPERATURE_LIMITS: &str = "Temperature";
const FRACTION_LIMITS: &str = "Fraction";
const CONTROL_TYPE_LIMITS: &str = "Control Type";

/// Range and unit of the values a schedule may take.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleLimits {
    pub name: &'static str,
    pub lower: f64,
    pub upper: f64,
    pub numeric: NumericType,
    pub unit: Option<UnitType>,
}

impl ScheduleLimits {
    pub fn to_record(&self, version: SchemaVersion) -> bemgen_core::Result<Record> {
        let builder = Record::builder(ObjectType::ScheduleTypeLimits, version)
            .text(self.name)
            .real(self.lower)
            .real(self.upper)
            .choice(self.numeric);
        match self.unit {
            Some(unit) => builder.choice(unit),
            None => builder,
        }
        .build()
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.lower..=self.upper).contains(&value)
    }
}

/// One line of a compact schedule.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleRule {
    /// Last day of a period, `mm/dd`
    Through(&'static str),
    /// Day types the following times apply to
    For(&'static str),
    /// Value until a time of day, `hh:mm`
    Until(&'static str, f64),
}

/// A named compact schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSpec {
    pub name: &'static str,
    pub limits: &'static str,
    pub rules: Vec<ScheduleRule>,
}

impl ScheduleSpec {
    /// The same value all year.
    pub fn constant(name: &'static str, limits: &'static str, value: f64) -> Self {
        Self {
            name,
            limits,
            rules: vec![
                ScheduleRule::Through("12/31"),
                ScheduleRule::For("AllDays"),
                ScheduleRule::Until("24:00", value),
            ],
        }
    }

    /// `occupied` on weekdays 06:00 to 22:00 and on design days, `unoccupied`
    /// otherwise.
    pub fn occupied(name: &'static str, limits: &'static str, occupied: f64, unoccupied: f64) -> Self {
        Self {
            name,
            limits,
            rules: vec![
                ScheduleRule::Through("12/31"),
                ScheduleRule::For("Weekdays SummerDesignDay WinterDesignDay"),
                ScheduleRule::Until("06:00", unoccupied),
                ScheduleRule::Until("22:00", occupied),
                ScheduleRule::Until("24:00", unoccupied),
                ScheduleRule::For("AllOtherDays"),
                ScheduleRule::Until("24:00", unoccupied),
            ],
        }
    }

    /// Every value the schedule can take.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.rules.iter().filter_map(|r| match r {
            ScheduleRule::Until(_, v) => Some(*v),
            _ => None,
        })
    }

    pub fn to_record(&self, version: SchemaVersion) -> bemgen_core::Result<Record> {
        let mut builder = Record::builder(ObjectType::ScheduleCompact, version)
            .text(self.name)
            .text(self.limits);
        for rule in &self.rules {
            builder = match rule {
                ScheduleRule::Through(date) => builder.text(format!("Through: {}", date)),
                ScheduleRule::For(days) => builder.text(format!("For: {}", days)),
                ScheduleRule::Until(time, value) => builder
                    .text(format!("Until: {}", time))
                    .text(bemgen_core::FieldValue::real(*value).to_string()),
            };
        }
        builder.build()
    }
}

/// Schedules every generated model references.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSet {
    pub limits: Vec<ScheduleLimits>,
    pub schedules: Vec<ScheduleSpec>,
}

impl ScheduleSet {
    pub fn standard(design: &HvacDefaults) -> Self {
        let limits = vec![
            ScheduleLimits {
                name: TEMPERATURE_LIMITS,
                lower: -60.0,
                upper: 200.0,
                numeric: NumericType::Continuous,
                unit: Some(UnitType::Temperature),
            },
            ScheduleLimits {
                name: FRACTION_LIMITS,
                lower: 0.0,
                upper: 1.0,
                numeric: NumericType::Continuous,
                unit: None,
            },
            ScheduleLimits {
                name: CONTROL_TYPE_LIMITS,
                lower: 0.0,
                upper: 4.0,
                numeric: NumericType::Discrete,
                unit: None,
            },
        ];
        let schedules = vec![
            ScheduleSpec::constant(ALWAYS_ON_SCHEDULE, FRACTION_LIMITS, 1.0),
            ScheduleSpec::constant(
                SUPPLY_AIR_TEMPERATURE_SCHEDULE,
                TEMPERATURE_LIMITS,
                design.supply_air_temperature,
            ),
            ScheduleSpec::occupied(
                HEATING_SETPOINT_SCHEDULE,
                TEMPERATURE_LIMITS,
                design.heating_setpoint,
                design.heating_setpoint - SETBACK_DELTA,
            ),
            ScheduleSpec::occupied(
                COOLING_SETPOINT_SCHEDULE,
                TEMPERATURE_LIMITS,
                design.cooling_setpoint,
                design.cooling_setpoint + SETBACK_DELTA,
            ),
            ScheduleSpec::constant(CONTROL_TYPE_SCHEDULE, CONTROL_TYPE_LIMITS, DUAL_SETPOINT_CONTROL),
        ];
        Self { limits, schedules }
    }

    /// Type limits first, then schedules.
    pub fn records(&self, version: SchemaVersion) -> bemgen_core::Result<Vec<Record>> {
        let limits = self.limits.iter().map(|l| l.to_record(version));
        let schedules = self.schedules.iter().map(|s| s.to_record(version));
        limits.chain(schedules).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schedules.iter().any(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Schedules whose values fall outside their type limits.
    pub fn out_of_range(&self) -> Vec<&'static str> {
        self.schedules
            .iter()
            .filter(|s| {
                let limits = self.limits.iter().find(|l| l.name == s.limits);
                match limits {
                    Some(l) => s.values().any(|v| !l.contains(v)),
                    None => true,
                }
            })
            .map(|s| s.name)
            .collect()
    }
}
