// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request to document pipeline.

use std::time::Instant;

use bemgen_core::SchemaVersion;
use bemgen_geometry::{generate_building, Zone};
use bemgen_topology::{build_air_systems, FlowGraph, GraphSnapshot, ZoneLoad};
use rayon::prelude::*;
use serde::Serialize;

use crate::autofix::{check_references, sweep_geometry, sweep_graph};
use crate::config::GeneratorConfig;
use crate::emit::{emit_document, EmitInput};
use crate::error::{Error, Result};
use crate::inspect::ModelSummary;
use crate::reference::ReferenceData;
use crate::request::GenerationRequest;
use crate::schedule::ScheduleSet;
use crate::warning::Warning;

/// Timing of one generation run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationStats {
    pub geometry_time_ms: u64,
    pub hvac_time_ms: u64,
    pub emit_time_ms: u64,
    pub total_time_ms: u64,
}

/// A complete, validated simulation input.
#[derive(Debug, Serialize)]
pub struct GeneratedModel {
    pub name: String,
    pub schema_version: SchemaVersion,
    /// Document text, ready for the simulation engine
    pub document: String,
    pub warnings: Vec<Warning>,
    pub summary: ModelSummary,
    /// Final air-system graph, after repairs
    pub graph: GraphSnapshot,
    /// Zones the document was emitted from
    #[serde(skip)]
    pub zones: Vec<Zone>,
    #[serde(skip)]
    pub stats: GenerationStats,
}

/// Generates one model.
///
/// Either every stage succeeds and a complete document is returned with the
/// warnings collected on the way, or the first fatal error is returned and
/// nothing is emitted.
pub fn generate(
    request: &GenerationRequest,
    reference: &ReferenceData,
    config: &GeneratorConfig,
) -> Result<GeneratedModel> {
    let total_start = Instant::now();
    config.validate()?;
    request.validate()?;

    tracing::info!(
        building = %request.name,
        stories = request.story_count,
        climate = %request.climate_zone,
        version = %request.schema_version,
        "Starting model generation"
    );

    // Geometry
    let geometry_start = Instant::now();
    let geometry = generate_building(&request.building_params(), &config.tolerances)?;
    let mut warnings: Vec<Warning> = geometry.warnings.iter().map(Warning::from).collect();
    let mut zones = geometry.zones;
    warnings.extend(sweep_geometry(&mut zones, &config.tolerances)?);

    let floor_area: f64 = zones.iter().map(|z| z.floor_area).sum();
    warnings.extend(request.check_floor_area(floor_area));
    let geometry_time = geometry_start.elapsed();
    tracing::debug!(
        zones = zones.len(),
        surfaces = zones.iter().map(|z| z.surfaces.len()).sum::<usize>(),
        floor_area = floor_area,
        "Geometry complete"
    );

    // Air systems, built from the zones that survived the sweep
    let hvac_start = Instant::now();
    let loads: Vec<ZoneLoad> = zones
        .iter()
        .map(|z| ZoneLoad {
            name: z.name.clone(),
            floor_area: z.floor_area,
            volume: z.volume(),
        })
        .collect();
    let hvac = build_air_systems(&loads, &request.hvac_options(&config.hvac))?;
    warnings.extend(hvac.warnings.iter().map(Warning::from));
    let mut graph: FlowGraph = hvac.graph;
    warnings.extend(sweep_graph(&mut graph, &config.autofix)?);
    let hvac_time = hvac_start.elapsed();
    let graph_summary = graph.summary();
    tracing::debug!(
        air_loops = graph_summary.air_loops,
        components = graph_summary.components,
        nodes = graph_summary.nodes,
        "Air systems complete"
    );

    // Records
    let emit_start = Instant::now();
    let constructions = reference.resolve(request.construction_era)?;
    let schedules = ScheduleSet::standard(&config.hvac);
    if let Some(name) = schedules.out_of_range().first() {
        return Err(Error::InvalidRequest(format!(
            "schedule '{}' has values outside its type limits",
            name
        )));
    }
    let input = EmitInput {
        name: request.name.trim(),
        version: request.schema_version,
        north_axis: request.north_axis_degrees(),
        timestep: config.timestep,
        zones: &zones,
        graph: &graph,
        constructions: &constructions,
        schedules: &schedules,
        climate: reference.climate(request.climate_zone),
        design: &config.hvac,
        outputs: &config.outputs,
    };
    let document = emit_document(&input)?;
    check_references(&document)?;
    let text = document.to_idf_string();
    let summary = ModelSummary::scan(&text);
    let emit_time = emit_start.elapsed();

    for w in &warnings {
        tracing::warn!(building = %request.name, stage = w.stage.as_str(), code = %w.code, "{}", w.message);
    }

    let total_time = total_start.elapsed();
    tracing::info!(
        building = %request.name,
        records = summary.records,
        zones = summary.zones,
        air_loops = summary.air_loops,
        warnings = warnings.len(),
        total_time_ms = total_time.as_millis(),
        "Model generation complete"
    );

    Ok(GeneratedModel {
        name: request.name.trim().to_string(),
        schema_version: request.schema_version,
        document: text,
        warnings,
        summary,
        graph: graph.to_snapshot(),
        zones,
        stats: GenerationStats {
            geometry_time_ms: geometry_time.as_millis() as u64,
            hvac_time_ms: hvac_time.as_millis() as u64,
            emit_time_ms: emit_time.as_millis() as u64,
            total_time_ms: total_time.as_millis() as u64,
        },
    })
}

/// Generates independent requests in parallel, one result per request in
/// input order.
pub fn generate_batch(
    requests: &[GenerationRequest],
    reference: &ReferenceData,
    config: &GeneratorConfig,
) -> Vec<Result<GeneratedModel>> {
    tracing::info!(count = requests.len(), "Starting batch generation");
    requests
        .par_iter()
        .map(|request| {
            generate(request, reference, config).inspect_err(|e| {
                tracing::error!(building = %request.name, class = e.class(), error = %e, "Model generation failed");
            })
        })
        .collect()
}
