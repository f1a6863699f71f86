// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Climate zones and the heating fuel policy.

use std::fmt;

use bemgen_core::choices::{BranchComponentType, FuelType, HeatingCoilType};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// First ASHRAE climate zone that gets fuel-fired heating.
const COLD_CLIMATE_THRESHOLD: u8 = 5;

/// ASHRAE 169 climate zone number, 1 (very hot) to 8 (subarctic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ClimateZone(u8);

impl ClimateZone {
    /// Creates a climate zone, rejecting numbers outside 1..=8.
    pub fn new(number: u8) -> Result<Self> {
        if (1..=8).contains(&number) {
            Ok(Self(number))
        } else {
            Err(Error::InvalidOptions(format!(
                "climate zone {} outside 1..=8",
                number
            )))
        }
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    /// Zones 5 to 8.
    pub fn is_cold(&self) -> bool {
        self.0 >= COLD_CLIMATE_THRESHOLD
    }
}

impl Default for ClimateZone {
    fn default() -> Self {
        Self(4)
    }
}

impl TryFrom<u8> for ClimateZone {
    type Error = Error;

    fn try_from(number: u8) -> Result<Self> {
        Self::new(number)
    }
}

impl From<ClimateZone> for u8 {
    fn from(zone: ClimateZone) -> u8 {
        zone.0
    }
}

impl fmt::Display for ClimateZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ASHRAE {}", self.0)
    }
}

/// Energy source of the heating coils of a system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "fuel", rename_all = "snake_case")]
pub enum HeatingFuel {
    Electric,
    Fuel(FuelType),
}

impl HeatingFuel {
    /// Cold climates burn natural gas, warm ones use electric resistance.
    pub fn for_climate(climate: ClimateZone) -> Self {
        if climate.is_cold() {
            HeatingFuel::Fuel(FuelType::NaturalGas)
        } else {
            HeatingFuel::Electric
        }
    }

    /// Heating coil object type, used for branch coils and reheat coils alike.
    pub fn coil_type(&self) -> HeatingCoilType {
        match self {
            HeatingFuel::Electric => HeatingCoilType::Electric,
            HeatingFuel::Fuel(_) => HeatingCoilType::Fuel,
        }
    }

    /// Branch component type of the heating coil.
    pub fn branch_type(&self) -> BranchComponentType {
        match self {
            HeatingFuel::Electric => BranchComponentType::CoilHeatingElectric,
            HeatingFuel::Fuel(_) => BranchComponentType::CoilHeatingFuel,
        }
    }
}
