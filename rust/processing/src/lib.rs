// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # bemgen processing
//!
//! The generation pipeline shared by the CLI and library users: a
//! [`GenerationRequest`] goes through geometry generation, the geometry
//! sweep, the HVAC topology builder and the graph sweep, is emitted as
//! validated records, checked for dangling references and rendered as text.
//!
//! ```no_run
//! use bemgen_processing::{generate, GenerationRequest, GeneratorConfig, ReferenceData};
//!
//! let request = GenerationRequest::from_json(r#"{
//!     "name": "Office",
//!     "footprint": [[0, 0], [20, 0], [20, 10], [0, 10]],
//!     "story_count": 2,
//!     "story_height": 3.5,
//!     "climate_zone": 5
//! }"#)?;
//! let model = generate(&request, &ReferenceData::builtin(), &GeneratorConfig::default())?;
//! println!("{}", model.document);
//! # Ok::<(), bemgen_processing::Error>(())
//! ```

pub mod autofix;
pub mod config;
pub mod emit;
pub mod error;
pub mod inspect;
pub mod pipeline;
pub mod reference;
pub mod request;
pub mod schedule;
pub mod warning;

pub use autofix::{check_references, sweep_geometry, sweep_graph, AutoFixPolicy};
pub use config::{GeneratorConfig, OutputSettings};
pub use emit::{emit_document, EmitInput};
pub use error::{Error, ReferenceError, Result};
pub use inspect::{ModelSummary, ModelView};
pub use pipeline::{generate, generate_batch, GeneratedModel, GenerationStats};
pub use reference::{
    ClimateSpec, ConstructionEra, ConstructionSet, ConstructionSpec, GlazingSpec, MaterialSpec,
    ReferenceData, ResolvedConstructions,
};
pub use request::{GenerationRequest, FLOOR_AREA_TOLERANCE};
pub use schedule::{ScheduleLimits, ScheduleRule, ScheduleSet, ScheduleSpec};
pub use warning::{Stage, Warning};
