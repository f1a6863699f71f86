// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # bemgen Topology
//!
//! Air flow graph for the HVAC systems of a generated building model.
//!
//! Components, air loops, zone connections and setpoint managers are stored
//! in an arena with stable slot map keys. Every node a component touches is a
//! [`NodeId`] allocated from the owning zone's name and a [`NodeRole`], so
//! two components share a node only when the builder wires them together.
//! [`validate`] checks the connection rules before a graph is emitted, and
//! [`FlowGraph::rename_node`] repairs a violation within a bounded scope.
//!
//! ```
//! use bemgen_topology::{build_air_systems, validate, ClimateZone, HvacOptions, ZoneLoad};
//!
//! let zones = [ZoneLoad { name: "Office".into(), floor_area: 120.0, volume: 420.0 }];
//! let options = HvacOptions { climate: ClimateZone::new(5).unwrap(), ..Default::default() };
//! let output = build_air_systems(&zones, &options).unwrap();
//!
//! assert_eq!(output.graph.loop_count(), 1);
//! assert!(validate(&output.graph).is_empty());
//! ```

pub mod builder;
pub mod climate;
pub mod component;
pub mod error;
pub mod graph;
pub mod keys;
pub mod node;
pub mod serialization;
pub mod validate;

pub use builder::{
    build_air_systems, outdoor_air_names, HvacDefaults, HvacOptions, HvacOutput, HvacWarning,
    OutdoorAirNames, SystemType, ZoneLoad, ALWAYS_ON_SCHEDULE, CONTROL_TYPE_SCHEDULE,
    COOLING_SETPOINT_SCHEDULE, HEATING_SETPOINT_SCHEDULE, SUPPLY_AIR_TEMPERATURE_SCHEDULE,
};
pub use climate::{ClimateZone, HeatingFuel};
pub use component::{Component, ComponentKind, Port, PortRole};
pub use error::{Error, Result};
pub use graph::{
    AirLoop, FlowGraph, GraphSummary, RenameScope, SetpointKind, SetpointManager, ZoneConnection,
};
pub use keys::{ComponentKey, LoopKey, LoopSide};
pub use node::{allocate, NodeId, NodeRole, MAX_NODE_NAME_LEN};
pub use serialization::GraphSnapshot;
pub use validate::{validate, Violation, ViolationKind};
