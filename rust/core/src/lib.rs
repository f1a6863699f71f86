// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # bemgen Core
//!
//! Object schema, record builder and text codec for building energy model
//! documents (`Type, field, ..., field;` records with `!` comments).
//!
//! ## Overview
//!
//! - **Schema**: [`ObjectType`] and [`SchemaVersion`], with one versioned
//!   [`ObjectLayout`] per object type (field order, kinds, arity)
//! - **Closed enumerations**: every keyword field is a Rust enum implementing
//!   [`Choice`], so invalid keywords cannot be built
//! - **Records**: [`RecordBuilder`] validates arity, kinds, required fields
//!   and keywords before a [`Record`] exists
//! - **Documents**: [`Document`] refuses records laid out for another version
//!   and renders deterministic text
//! - **Parsing**: nom-based [`parse_records`] and [`Document::parse`] for
//!   round-trips, plus a memchr [`RecordScanner`] for quick counts
//!
//! ## Quick Start
//!
//! ```rust
//! use bemgen_core::{Document, ObjectType, Record, SchemaVersion};
//! use bemgen_core::choices::Roughness;
//!
//! let version = SchemaVersion::V23_2;
//! let brick = Record::builder(ObjectType::Material, version)
//!     .text("Brick")
//!     .choice(Roughness::MediumRough)
//!     .real(0.1)
//!     .real(0.89)
//!     .real(1920.0)
//!     .real(790.0)
//!     .build()
//!     .unwrap();
//!
//! let mut doc = Document::new(version);
//! doc.push(brick).unwrap();
//! let text = doc.to_idf_string();
//! assert!(text.starts_with("Version,"));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for records and keywords

pub mod choices;
pub mod decoder;
pub mod error;
pub mod layout;
pub mod parser;
pub mod record;
pub mod schema;
pub mod value;
pub mod writer;

pub use choices::Choice;
pub use decoder::decode_record;
pub use error::{Error, Result};
pub use layout::{layout, ExtensibleGroup, FieldKind, FieldSpec, ObjectLayout};
pub use parser::{parse_records, RawRecord, RecordScanner};
pub use record::{Record, RecordBuilder, RESERVED_CHARACTERS};
pub use schema::{ObjectType, SchemaVersion};
pub use value::{round_real, FieldValue, REAL_PRECISION};
pub use writer::Document;
