// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Node identifiers and the naming contract.
//!
//! Every node in the flow graph is named by [`allocate`], which derives the
//! name from the owning zone and the node's role. Each role has its own
//! suffix, so two roles of one zone never share a name.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Longest node name the simulation engine accepts.
pub const MAX_NODE_NAME_LEN: usize = 100;

/// A named endpoint in the flow graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wraps an existing name without any checks.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the node name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the length of the name in characters.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the name fits the engine's length limit.
    pub fn fits(&self) -> bool {
        self.len() <= MAX_NODE_NAME_LEN
    }

    /// A new name with a numeric suffix, used to resolve collisions.
    pub fn disambiguated(&self, n: usize) -> NodeId {
        NodeId(format!("{} {}", self.0, n))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Topological role of a node within a zone's air system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeRole {
    ZoneAir,
    ZoneReturn,
    ZoneInlet,
    TerminalInlet,
    DamperOutlet,
    SupplyInlet,
    OutdoorAirInlet,
    ReliefAir,
    MixedAir,
    FanOutlet,
    CoolingCoilOutlet,
    SupplyOutlet,
    DemandInlet,
    DemandOutlet,
}

impl NodeRole {
    pub const ALL: &'static [NodeRole] = &[
        NodeRole::ZoneAir,
        NodeRole::ZoneReturn,
        NodeRole::ZoneInlet,
        NodeRole::TerminalInlet,
        NodeRole::DamperOutlet,
        NodeRole::SupplyInlet,
        NodeRole::OutdoorAirInlet,
        NodeRole::ReliefAir,
        NodeRole::MixedAir,
        NodeRole::FanOutlet,
        NodeRole::CoolingCoilOutlet,
        NodeRole::SupplyOutlet,
        NodeRole::DemandInlet,
        NodeRole::DemandOutlet,
    ];

    /// Returns the suffix appended to the zone name.
    pub fn suffix(&self) -> &'static str {
        match self {
            NodeRole::ZoneAir => "Zone Air Node",
            NodeRole::ZoneReturn => "Return Air Node",
            NodeRole::ZoneInlet => "Zone Inlet Node",
            NodeRole::TerminalInlet => "Terminal Inlet Node",
            NodeRole::DamperOutlet => "Damper Outlet Node",
            NodeRole::SupplyInlet => "Supply Side Inlet Node",
            NodeRole::OutdoorAirInlet => "Outdoor Air Inlet Node",
            NodeRole::ReliefAir => "Relief Air Node",
            NodeRole::MixedAir => "Mixed Air Node",
            NodeRole::FanOutlet => "Fan Outlet Node",
            NodeRole::CoolingCoilOutlet => "Cooling Coil Outlet Node",
            NodeRole::SupplyOutlet => "Supply Side Outlet Node",
            NodeRole::DemandInlet => "Demand Side Inlet Node",
            NodeRole::DemandOutlet => "Demand Side Outlet Node",
        }
    }

    /// Recovers the zone and role from an allocated name.
    pub fn parse(node: &str) -> Option<(&str, NodeRole)> {
        NodeRole::ALL.iter().find_map(|role| {
            node.strip_suffix(role.suffix())
                .and_then(|rest| rest.strip_suffix(' '))
                .map(|zone| (zone, *role))
        })
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Allocates the node of `role` for `zone`.
///
/// Pure and deterministic: the same inputs always give the same name.
pub fn allocate(zone: &str, role: NodeRole) -> NodeId {
    NodeId(format!("{} {}", zone, role.suffix()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn allocate_is_deterministic() {
        assert_eq!(
            allocate("Story1", NodeRole::FanOutlet),
            allocate("Story1", NodeRole::FanOutlet)
        );
        assert_eq!(
            allocate("Story1", NodeRole::FanOutlet).as_str(),
            "Story1 Fan Outlet Node"
        );
    }

    #[test]
    fn roles_never_collide_within_a_zone() {
        let names: FxHashSet<NodeId> = NodeRole::ALL
            .iter()
            .map(|role| allocate("Story2_Perim1", *role))
            .collect();
        assert_eq!(names.len(), NodeRole::ALL.len());
    }

    #[test]
    fn parse_recovers_zone_and_role() {
        for role in NodeRole::ALL {
            let node = allocate("Story3_Core", *role);
            assert_eq!(NodeRole::parse(node.as_str()), Some(("Story3_Core", *role)));
        }
        assert_eq!(NodeRole::parse("Outside Air"), None);
    }

    #[test]
    fn name_length_limit() {
        let long_zone = "Z".repeat(90);
        assert!(!allocate(&long_zone, NodeRole::CoolingCoilOutlet).fits());
        assert!(allocate("Story1", NodeRole::CoolingCoilOutlet).fits());
    }

    #[test]
    fn disambiguation_suffix() {
        let node = allocate("Story1", NodeRole::MixedAir);
        assert_eq!(node.disambiguated(2).as_str(), "Story1 Mixed Air Node 2");
    }
}
