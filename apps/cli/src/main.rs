// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! bemgen - generate simulation input documents from building requests.
//!
//! ```text
//! bemgen <request.json>... [--output model.idf] [--reference refdata.json]
//!        [--warnings warnings.json] [--graph graph.json] [--config config.json]
//! ```
//!
//! With one request the output paths are taken from the flags. With several,
//! requests are generated in parallel and every model is written to
//! `BEMGEN_OUTPUT_DIR` as `<request>.idf` next to `<request>.warnings.json`.
//!
//! # Environment
//!
//! - `WORKER_THREADS` - batch parallelism (default: CPU count)
//! - `BEMGEN_REFERENCE` - reference data file (default: built-in)
//! - `BEMGEN_CONFIG` - generator configuration file (default: built-in)
//! - `BEMGEN_OUTPUT_DIR` - output directory (default: current directory)
//! - `RUST_LOG` - log filter (default: `info,bemgen=debug`)

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use bemgen_processing::{
    generate_batch, GeneratedModel, GenerationRequest, GeneratorConfig, ReferenceData,
};
use clap::Parser;

mod config;

use config::Config;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Generation request files (JSON)
    #[arg(required = true)]
    requests: Vec<PathBuf>,

    /// Output document (single request only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Reference data file, overrides BEMGEN_REFERENCE
    #[arg(short, long)]
    reference: Option<PathBuf>,

    /// Warnings file (single request only)
    #[arg(short, long)]
    warnings: Option<PathBuf>,

    /// Air-system graph dump (single request only)
    #[arg(short, long)]
    graph: Option<PathBuf>,

    /// Generator configuration file, overrides BEMGEN_CONFIG
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info,bemgen=debug".into()))
        .with_writer(std::io::stderr)
        .pretty()
        .init();

    let args = Args::parse();
    let config = Config::from_env();

    tracing::info!(
        requests = args.requests.len(),
        worker_threads = config.worker_threads,
        output_dir = %config.output_dir.display(),
        "Starting bemgen"
    );

    rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads)
        .build_global()
        .context("failed to initialise the worker pool")?;

    let single = args.requests.len() == 1;
    if !single && (args.output.is_some() || args.warnings.is_some() || args.graph.is_some()) {
        bail!("--output, --warnings and --graph need exactly one request");
    }

    let reference = match args.reference.as_ref().or(config.reference.as_ref()) {
        Some(path) => {
            let json = read(path)?;
            ReferenceData::from_json(&json)
                .with_context(|| format!("invalid reference data in {}", path.display()))?
        }
        None => ReferenceData::builtin(),
    };
    let generator = match args.config.as_ref().or(config.generator.as_ref()) {
        Some(path) => GeneratorConfig::from_json(&read(path)?)
            .with_context(|| format!("invalid configuration in {}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    let requests = args
        .requests
        .iter()
        .map(|path| {
            GenerationRequest::from_json(&read(path)?)
                .with_context(|| format!("invalid request in {}", path.display()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let results = generate_batch(&requests, &reference, &generator);

    let mut failed = 0;
    for (path, result) in args.requests.iter().zip(results) {
        match result {
            Ok(model) => {
                let outputs = if single {
                    Outputs {
                        document: args
                            .output
                            .clone()
                            .unwrap_or_else(|| artifact_path(&config.output_dir, path, "idf")),
                        warnings: args.warnings.clone(),
                        graph: args.graph.clone(),
                    }
                } else {
                    Outputs {
                        document: artifact_path(&config.output_dir, path, "idf"),
                        warnings: Some(artifact_path(&config.output_dir, path, "warnings.json")),
                        graph: None,
                    }
                };
                write_model(&model, &outputs)?;
            }
            Err(e) => {
                failed += 1;
                tracing::error!(request = %path.display(), class = e.class(), "{}", e);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} requests failed", failed, args.requests.len());
    }
    Ok(())
}

struct Outputs {
    document: PathBuf,
    warnings: Option<PathBuf>,
    graph: Option<PathBuf>,
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

fn write_model(model: &GeneratedModel, outputs: &Outputs) -> anyhow::Result<()> {
    write(&outputs.document, &model.document)?;
    if let Some(path) = &outputs.warnings {
        write(path, &serde_json::to_string_pretty(&model.warnings)?)?;
    }
    if let Some(path) = &outputs.graph {
        write(path, &serde_json::to_string_pretty(&model.graph)?)?;
    }

    tracing::info!(
        building = %model.name,
        document = %outputs.document.display(),
        zones = model.summary.zones,
        surfaces = model.summary.surfaces,
        air_loops = model.summary.air_loops,
        warnings = model.warnings.len(),
        total_time_ms = model.stats.total_time_ms,
        "Model written"
    );
    Ok(())
}

/// `<dir>/<request file stem>.<extension>`
fn artifact_path(dir: &Path, request: &Path, extension: &str) -> PathBuf {
    let stem = request
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());
    dir.join(format!("{}.{}", stem, extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_paths_follow_request_names() {
        let dir = Path::new("out");
        assert_eq!(
            artifact_path(dir, Path::new("requests/office.json"), "idf"),
            PathBuf::from("out/office.idf")
        );
        assert_eq!(
            artifact_path(dir, Path::new("office.json"), "warnings.json"),
            PathBuf::from("out/office.warnings.json")
        );
    }

    #[test]
    fn arguments_parse() {
        let args = Args::try_parse_from(["bemgen", "a.json", "-o", "a.idf", "--graph", "g.json"]).unwrap();
        assert_eq!(args.requests, vec![PathBuf::from("a.json")]);
        assert_eq!(args.output, Some(PathBuf::from("a.idf")));
        assert!(Args::try_parse_from(["bemgen"]).is_err());
    }
}
