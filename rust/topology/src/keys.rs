// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key types for arena-based storage of the flow graph.
//!
//! Keys are created by `slotmap::SlotMap` and remain valid even after other
//! entries are removed (generational indices).

use slotmap::new_key_type;

new_key_type! {
    /// Key for an HVAC component (fan, coil, terminal, splitter, ...).
    pub struct ComponentKey;

    /// Key for an air loop.
    pub struct LoopKey;
}

/// Side of an air loop a component or node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopSide {
    Supply,
    Demand,
}

impl LoopSide {
    /// Returns the side name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            LoopSide::Supply => "supply",
            LoopSide::Demand => "demand",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn keys_are_distinct() {
        let mut sm: SlotMap<ComponentKey, &str> = SlotMap::with_key();
        let a = sm.insert("fan");
        let b = sm.insert("coil");
        assert_ne!(a, b);
        assert_eq!(sm[a], "fan");
    }

    #[test]
    fn side_names() {
        assert_eq!(LoopSide::Supply.as_str(), "supply");
        assert_eq!(LoopSide::Demand.as_str(), "demand");
    }
}
