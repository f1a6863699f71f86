// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reading generated documents back.
//!
//! [`ModelView`] is the part of a model that must survive serialization:
//! zones, surface vertices and the node graph. It can be built from the
//! in-memory entities or from a parsed document, and two views are compared
//! within a distance tolerance. [`ModelSummary`] counts records by type
//! straight from the text.

use std::collections::{BTreeMap, BTreeSet};

use bemgen_core::{Document, ObjectType, Record, RecordScanner};
use bemgen_geometry::Zone;
use bemgen_topology::{FlowGraph, PortRole};
use serde::{Deserialize, Serialize};

/// Geometry and connectivity of a model, keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelView {
    /// Zone name to floor area
    pub zones: BTreeMap<String, f64>,
    /// Surface name to (zone, vertices)
    pub surfaces: BTreeMap<String, (String, Vec<[f64; 3]>)>,
    /// Every node name
    pub nodes: BTreeSet<String>,
    /// Supply branch components as (name, inlet, outlet), per loop in order
    pub branches: BTreeMap<String, Vec<(String, String, String)>>,
}

impl ModelView {
    /// View of the entities the document was emitted from.
    pub fn from_entities(zones: &[Zone], graph: &FlowGraph) -> Self {
        let mut view = ModelView::default();
        for zone in zones {
            view.zones.insert(zone.name.clone(), zone.floor_area);
            for s in &zone.surfaces {
                let vertices = s.polygon.vertices().iter().map(|p| [p.x, p.y, p.z]).collect();
                view.surfaces.insert(s.name.clone(), (zone.name.clone(), vertices));
            }
        }
        view.nodes = graph.node_names().into_iter().map(|n| n.to_string()).collect();
        for (_, l) in graph.loops() {
            let chain = l
                .branch
                .iter()
                .filter_map(|k| graph.component(*k))
                .map(|c| {
                    let port = |role| c.port(role).map(|n| n.to_string()).unwrap_or_default();
                    (c.name.clone(), port(PortRole::Inlet), port(PortRole::Outlet))
                })
                .collect();
            view.branches.insert(l.branch_name(), chain);
        }
        view
    }

    /// View of a parsed document.
    pub fn from_document(document: &Document) -> Self {
        let mut view = ModelView::default();
        for z in document.of_type(ObjectType::Zone) {
            view.zones
                .insert(z.name().to_string(), z.real("Floor Area").unwrap_or_default());
        }

        let mut surface_zone: BTreeMap<String, String> = BTreeMap::new();
        for s in document.of_type(ObjectType::BuildingSurfaceDetailed) {
            let zone = s.text("Zone Name").unwrap_or_default().to_string();
            surface_zone.insert(s.name().to_string(), zone.clone());
            view.surfaces.insert(s.name().to_string(), (zone, vertices(s)));
        }
        for w in document.of_type(ObjectType::FenestrationSurfaceDetailed) {
            let host = w.text("Building Surface Name").unwrap_or_default();
            let zone = surface_zone.get(host).cloned().unwrap_or_default();
            view.surfaces.insert(w.name().to_string(), (zone, vertices(w)));
        }

        for record in document.records() {
            for (_, node) in record.node_fields() {
                view.nodes.insert(node.to_string());
            }
        }
        for b in document.of_type(ObjectType::Branch) {
            let chain = b
                .groups()
                .map(|g| {
                    let text = |i: usize| g.get(i).and_then(|v| v.as_str()).unwrap_or_default().to_string();
                    (text(1), text(2), text(3))
                })
                .collect();
            view.branches.insert(b.name().to_string(), chain);
        }
        view
    }

    /// First difference between two views, if any.
    pub fn difference(&self, other: &ModelView, tolerance: f64) -> Option<String> {
        if self.zones.len() != other.zones.len() {
            return Some(format!("{} zones vs {}", self.zones.len(), other.zones.len()));
        }
        for ((name, area), (other_name, other_area)) in self.zones.iter().zip(&other.zones) {
            if name != other_name || (area - other_area).abs() > tolerance {
                return Some(format!("zone {} ({}) vs {} ({})", name, area, other_name, other_area));
            }
        }

        if self.surfaces.len() != other.surfaces.len() {
            return Some(format!("{} surfaces vs {}", self.surfaces.len(), other.surfaces.len()));
        }
        for (name, (zone, vertices)) in &self.surfaces {
            let Some((other_zone, other_vertices)) = other.surfaces.get(name) else {
                return Some(format!("surface {} missing", name));
            };
            if zone != other_zone {
                return Some(format!("surface {} in zone {} vs {}", name, zone, other_zone));
            }
            let same = vertices.len() == other_vertices.len()
                && vertices
                    .iter()
                    .zip(other_vertices)
                    .all(|(a, b)| a.iter().zip(b).all(|(x, y)| (x - y).abs() <= tolerance));
            if !same {
                return Some(format!("surface {} vertices differ", name));
            }
        }

        if let Some(node) = self.nodes.symmetric_difference(&other.nodes).next() {
            return Some(format!("node {} not in both models", node));
        }
        if self.branches != other.branches {
            return Some("supply branches differ".to_string());
        }
        None
    }
}

fn vertices(record: &Record) -> Vec<[f64; 3]> {
    record
        .groups()
        .map(|g| {
            let c = |i: usize| g.get(i).and_then(|v| v.as_f64()).unwrap_or(f64::NAN);
            [c(0), c(1), c(2)]
        })
        .collect()
}

/// Record counts of a generated document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub zones: usize,
    pub surfaces: usize,
    pub windows: usize,
    pub air_loops: usize,
    /// Every record, including `Version`
    pub records: usize,
}

impl ModelSummary {
    /// Counts records without decoding fields.
    pub fn scan(text: &str) -> Self {
        let counts = RecordScanner::new(text).count_by_type();
        let count = |t: ObjectType| counts.get(&t).copied().unwrap_or(0);
        ModelSummary {
            zones: count(ObjectType::Zone),
            surfaces: count(ObjectType::BuildingSurfaceDetailed),
            windows: count(ObjectType::FenestrationSurfaceDetailed),
            air_loops: count(ObjectType::AirLoopHvac),
            records: counts.values().sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bemgen_core::SchemaVersion;

    #[test]
    fn summary_counts_records() {
        let text = "Version,\n  23.2;\n\nZone,\n  A;\n\nZone,\n  B;\n\nOutput:SQLite,\n  SimpleAndTabular;\n";
        let summary = ModelSummary::scan(text);
        assert_eq!(summary.zones, 2);
        assert_eq!(summary.records, 4);
        assert_eq!(summary.air_loops, 0);
    }

    #[test]
    fn difference_reports_moved_vertex() {
        let mut a = ModelView::default();
        a.surfaces
            .insert("S".to_string(), ("Z".to_string(), vec![[0.0, 0.0, 0.0]]));
        let mut b = a.clone();
        assert!(a.difference(&b, 1e-6).is_none());

        if let Some((_, v)) = b.surfaces.get_mut("S") {
            v[0][2] = 1e-3;
        }
        assert_eq!(a.difference(&b, 1e-6).as_deref(), Some("surface S vertices differ"));
        assert!(a.difference(&b, 1e-2).is_none());
    }

    #[test]
    fn empty_document_view() {
        let view = ModelView::from_document(&Document::new(SchemaVersion::V9_6));
        assert_eq!(view, ModelView::default());
    }
}
