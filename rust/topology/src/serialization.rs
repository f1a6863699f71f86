// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON serialization for flow graphs.
//!
//! Slot map keys are not portable, so components and loops are written with
//! sequential integer ids and every cross reference uses those ids.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::component::{Component, ComponentKind, Port};
use crate::error::{Error, Result};
use crate::graph::{AirLoop, FlowGraph, SetpointKind, SetpointManager, ZoneConnection};
use crate::keys::{ComponentKey, LoopKey, LoopSide};
use crate::node::NodeId;

/// Serializable representation of a whole flow graph.
#[derive(Debug, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub components: Vec<ComponentSnapshot>,
    pub air_loops: Vec<LoopSnapshot>,
    pub zones: Vec<ZoneSnapshot>,
    pub setpoint_managers: Vec<SetpointSnapshot>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentSnapshot {
    pub id: usize,
    pub name: String,
    pub kind: ComponentKind,
    pub ports: Vec<Port>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub air_loop: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<LoopSide>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoopSnapshot {
    pub id: usize,
    pub name: String,
    pub zone: String,
    pub supply_inlet: NodeId,
    pub supply_outlet: NodeId,
    pub demand_inlet: NodeId,
    pub demand_outlet: NodeId,
    pub branch: Vec<usize>,
    pub splitter: Option<usize>,
    pub mixer: Option<usize>,
    pub terminals: Vec<usize>,
    pub economizer: bool,
    pub design_supply_flow: f64,
    pub outdoor_air_flow: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ZoneSnapshot {
    #[serde(flatten)]
    pub connection: ZoneConnection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub air_loop: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetpointSnapshot {
    pub name: String,
    #[serde(flatten)]
    pub kind: SetpointKind,
    pub node: NodeId,
    pub air_loop: usize,
}

impl FlowGraph {
    /// Serializes the graph to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        let snapshot = self.to_snapshot();
        serde_json::to_string_pretty(&snapshot).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Creates a serializable snapshot of the graph.
    pub fn to_snapshot(&self) -> GraphSnapshot {
        let component_ids: FxHashMap<ComponentKey, usize> = self
            .components
            .keys()
            .enumerate()
            .map(|(i, k)| (k, i))
            .collect();
        let loop_ids: FxHashMap<LoopKey, usize> =
            self.loops.keys().enumerate().map(|(i, k)| (k, i)).collect();
        let cid = |k: &ComponentKey| component_ids[k];
        let lid = |k: &LoopKey| loop_ids[k];

        let components = self
            .components
            .iter()
            .map(|(k, c)| ComponentSnapshot {
                id: cid(&k),
                name: c.name.clone(),
                kind: c.kind,
                ports: c.ports.to_vec(),
                parent: c.parent.as_ref().map(cid),
                children: c.children.iter().map(cid).collect(),
                air_loop: c.air_loop.as_ref().map(lid),
                side: c.side,
            })
            .collect();

        let air_loops = self
            .loops
            .iter()
            .map(|(k, l)| LoopSnapshot {
                id: lid(&k),
                name: l.name.clone(),
                zone: l.zone.clone(),
                supply_inlet: l.supply_inlet.clone(),
                supply_outlet: l.supply_outlet.clone(),
                demand_inlet: l.demand_inlet.clone(),
                demand_outlet: l.demand_outlet.clone(),
                branch: l.branch.iter().map(cid).collect(),
                splitter: l.splitter.as_ref().map(cid),
                mixer: l.mixer.as_ref().map(cid),
                terminals: l.terminals.iter().map(cid).collect(),
                economizer: l.economizer,
                design_supply_flow: l.design_supply_flow,
                outdoor_air_flow: l.outdoor_air_flow,
            })
            .collect();

        let zones = self
            .zones
            .iter()
            .map(|z| ZoneSnapshot {
                connection: z.clone(),
                equipment: z.equipment.as_ref().map(cid),
                air_loop: z.air_loop.as_ref().map(lid),
            })
            .collect();

        let setpoint_managers = self
            .setpoint_managers
            .iter()
            .map(|m| SetpointSnapshot {
                name: m.name.clone(),
                kind: m.kind.clone(),
                node: m.node.clone(),
                air_loop: lid(&m.air_loop),
            })
            .collect();

        GraphSnapshot {
            components,
            air_loops,
            zones,
            setpoint_managers,
        }
    }

    /// Deserializes a graph from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: GraphSnapshot =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        Self::from_snapshot(&snapshot)
    }

    /// Reconstructs a graph from a snapshot.
    ///
    /// Components are inserted first without links, then loops, then the
    /// parent, child and loop links are restored by id.
    pub fn from_snapshot(snap: &GraphSnapshot) -> Result<Self> {
        let mut graph = FlowGraph::new();

        let mut component_keys = Vec::with_capacity(snap.components.len());
        for (i, cs) in snap.components.iter().enumerate() {
            if cs.id != i {
                return Err(Error::Serialization(format!(
                    "component ids must be sequential, found {} at {}",
                    cs.id, i
                )));
            }
            let mut component = Component::new(cs.name.clone(), cs.kind);
            component.ports = cs.ports.iter().cloned().collect();
            component_keys.push(graph.components.insert(component));
        }
        let ck = |id: usize| {
            component_keys
                .get(id)
                .copied()
                .ok_or_else(|| Error::Serialization(format!("unknown component id {}", id)))
        };

        let mut loop_keys = Vec::with_capacity(snap.air_loops.len());
        for (i, ls) in snap.air_loops.iter().enumerate() {
            if ls.id != i {
                return Err(Error::Serialization(format!(
                    "loop ids must be sequential, found {} at {}",
                    ls.id, i
                )));
            }
            let air_loop = AirLoop {
                name: ls.name.clone(),
                zone: ls.zone.clone(),
                supply_inlet: ls.supply_inlet.clone(),
                supply_outlet: ls.supply_outlet.clone(),
                demand_inlet: ls.demand_inlet.clone(),
                demand_outlet: ls.demand_outlet.clone(),
                branch: ls.branch.iter().map(|id| ck(*id)).collect::<Result<_>>()?,
                splitter: ls.splitter.map(ck).transpose()?,
                mixer: ls.mixer.map(ck).transpose()?,
                terminals: ls.terminals.iter().map(|id| ck(*id)).collect::<Result<_>>()?,
                economizer: ls.economizer,
                design_supply_flow: ls.design_supply_flow,
                outdoor_air_flow: ls.outdoor_air_flow,
            };
            loop_keys.push(graph.loops.insert(air_loop));
        }
        let lk = |id: usize| {
            loop_keys
                .get(id)
                .copied()
                .ok_or_else(|| Error::Serialization(format!("unknown loop id {}", id)))
        };

        for (cs, key) in snap.components.iter().zip(&component_keys) {
            let parent = cs.parent.map(ck).transpose()?;
            let children = cs.children.iter().map(|id| ck(*id)).collect::<Result<_>>()?;
            let air_loop = cs.air_loop.map(lk).transpose()?;
            if let Some(c) = graph.components.get_mut(*key) {
                c.parent = parent;
                c.children = children;
                c.air_loop = air_loop;
                c.side = cs.side;
            }
        }

        for zs in &snap.zones {
            let mut connection = zs.connection.clone();
            connection.equipment = zs.equipment.map(ck).transpose()?;
            connection.air_loop = zs.air_loop.map(lk).transpose()?;
            graph.zones.push(connection);
        }

        for ms in &snap.setpoint_managers {
            graph.setpoint_managers.push(SetpointManager {
                name: ms.name.clone(),
                kind: ms.kind.clone(),
                node: ms.node.clone(),
                air_loop: lk(ms.air_loop)?,
            });
        }

        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build_air_systems, HvacOptions, SystemType, ZoneLoad};
    use crate::climate::ClimateZone;
    use crate::validate::validate;

    fn sample() -> FlowGraph {
        let zones = vec![
            ZoneLoad {
                name: "Core".to_string(),
                floor_area: 200.0,
                volume: 700.0,
            },
            ZoneLoad {
                name: "Perimeter 1".to_string(),
                floor_area: 80.0,
                volume: 280.0,
            },
        ];
        let options = HvacOptions {
            system_type: SystemType::VavReheat,
            climate: ClimateZone::new(6).unwrap(),
            economizer: true,
            ..Default::default()
        };
        build_air_systems(&zones, &options).unwrap().graph
    }

    #[test]
    fn roundtrip_empty_graph() {
        let graph = FlowGraph::new();
        let json = graph.to_json().unwrap();
        let restored = FlowGraph::from_json(&json).unwrap();
        assert_eq!(restored.component_count(), 0);
        assert_eq!(restored.loop_count(), 0);
    }

    #[test]
    fn roundtrip_built_graph() {
        let graph = sample();
        let json = graph.to_json().unwrap();
        let restored = FlowGraph::from_json(&json).unwrap();

        assert_eq!(restored.summary(), graph.summary());
        assert_eq!(validate(&restored), Vec::new());

        let key = restored.component_by_name("Core Terminal").unwrap();
        let terminal = restored.component(key).unwrap();
        let parent = restored.component(terminal.parent.unwrap()).unwrap();
        assert_eq!(parent.name, "Core ADU");
        assert_eq!(terminal.side, Some(LoopSide::Demand));

        let connection = restored.zone_connection("Perimeter 1").unwrap();
        let equipment = restored.component(connection.equipment.unwrap()).unwrap();
        assert_eq!(equipment.name, "Perimeter 1 ADU");
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let graph = sample();
        let mut snapshot = graph.to_snapshot();
        snapshot.air_loops[0].branch.push(9999);
        assert!(matches!(
            FlowGraph::from_snapshot(&snapshot),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(matches!(FlowGraph::from_json("{"), Err(Error::Serialization(_))));
    }
}
