// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Schema errors raised while building, writing or parsing records.

use thiserror::Error;

use crate::schema::{ObjectType, SchemaVersion};

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing or reading records
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("unknown object type: {0}")]
    UnknownObjectType(String),

    #[error("unsupported schema version: {0}")]
    UnsupportedVersion(String),

    #[error("{object_type} '{name}': field '{field}' does not accept '{value}' (allowed: {allowed})")]
    InvalidChoice {
        object_type: ObjectType,
        name: String,
        field: String,
        value: String,
        allowed: String,
    },

    #[error("{object_type} '{name}': {count} fields is outside the allowed range {min}..={max}")]
    Arity {
        object_type: ObjectType,
        name: String,
        count: usize,
        min: usize,
        max: usize,
    },

    #[error("{object_type} '{name}': field '{field}' expects {expected}, got '{value}'")]
    FieldKind {
        object_type: ObjectType,
        name: String,
        field: String,
        expected: &'static str,
        value: String,
    },

    #[error("{object_type} '{name}': required field '{field}' is blank")]
    RequiredFieldBlank {
        object_type: ObjectType,
        name: String,
        field: String,
    },

    #[error("{object_type} '{name}': field '{field}' does not allow {keyword}")]
    AutoValueNotAllowed {
        object_type: ObjectType,
        name: String,
        field: String,
        keyword: &'static str,
    },

    #[error("{object_type} '{name}': field '{field}' contains reserved character {character:?} in '{value}'")]
    ReservedCharacter {
        object_type: ObjectType,
        name: String,
        field: String,
        value: String,
        character: char,
    },

    #[error("{object_type} '{name}' was laid out for version {record} but the document declares {document}")]
    VersionMismatch {
        object_type: ObjectType,
        name: String,
        record: SchemaVersion,
        document: SchemaVersion,
    },

    #[error("parse error at byte {position}: {message}")]
    Parse { position: usize, message: String },
}

impl Error {
    /// Create a parse error
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }
}
