// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Document assembly and text output

use std::fmt::Write as _;

use crate::error::{Error, Result};
use crate::record::{validate_fields, Record};
use crate::schema::{ObjectType, SchemaVersion};

/// Column where field name comments start
const COMMENT_COLUMN: usize = 30;

/// An ordered set of records sharing one declared schema version
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    version: SchemaVersion,
    records: Vec<Record>,
}

impl Document {
    /// Create an empty document declaring a schema version
    pub fn new(version: SchemaVersion) -> Self {
        Self {
            version,
            records: Vec::new(),
        }
    }

    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// Records in push order, without the `Version` record
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record.
    ///
    /// Records laid out for another version are refused. The record is
    /// validated again so hand-assembled records cannot bypass the layout.
    /// A `Version` record is implied by the document and only checked.
    pub fn push(&mut self, mut record: Record) -> Result<()> {
        if record.version != self.version {
            return Err(Error::VersionMismatch {
                object_type: record.object_type,
                name: record.name().to_string(),
                record: record.version,
                document: self.version,
            });
        }
        validate_fields(record.object_type, record.version, &mut record.fields)?;

        if record.object_type == ObjectType::Version {
            let declared = record
                .get(0)
                .and_then(|v| v.as_str())
                .map(SchemaVersion::parse)
                .transpose()?;
            return match declared {
                Some(v) if v == self.version => Ok(()),
                Some(v) => Err(Error::VersionMismatch {
                    object_type: ObjectType::Version,
                    name: String::new(),
                    record: v,
                    document: self.version,
                }),
                None => Err(Error::RequiredFieldBlank {
                    object_type: ObjectType::Version,
                    name: String::new(),
                    field: "Version Identifier".to_string(),
                }),
            };
        }

        self.records.push(record);
        Ok(())
    }

    /// Append several records, stopping at the first error
    pub fn extend(&mut self, records: impl IntoIterator<Item = Record>) -> Result<()> {
        for record in records {
            self.push(record)?;
        }
        Ok(())
    }

    /// Records of one type
    pub fn of_type(&self, object_type: ObjectType) -> impl Iterator<Item = &Record> {
        self.records
            .iter()
            .filter(move |r| r.object_type == object_type)
    }

    /// Find a named record of one type (case-insensitive, like the consumer)
    pub fn find(&self, object_type: ObjectType, name: &str) -> Option<&Record> {
        self.of_type(object_type)
            .find(|r| r.name().eq_ignore_ascii_case(name))
    }

    /// Render the document.
    ///
    /// Output is deterministic: the `Version` record, then every record in
    /// push order, one field per line with its field name as a comment.
    pub fn to_idf_string(&self) -> String {
        let mut out = String::with_capacity(64 * (self.records.len() + 1));
        write_fields(
            &mut out,
            ObjectType::Version,
            self.version,
            &[self.version.as_str().to_string()],
        );
        for record in &self.records {
            let values: Vec<String> = record.fields.iter().map(|v| v.to_string()).collect();
            write_fields(&mut out, record.object_type, record.version, &values);
        }
        out
    }
}

fn write_fields(out: &mut String, object_type: ObjectType, version: SchemaVersion, values: &[String]) {
    let layout = crate::layout::layout(object_type, version);
    out.push_str(object_type.as_str());
    if values.is_empty() {
        out.push_str(";\n\n");
        return;
    }
    out.push_str(",\n");
    let last = values.len() - 1;
    for (index, value) in values.iter().enumerate() {
        let terminator = if index == last { ';' } else { ',' };
        let cell = format!("    {}{}", value, terminator);
        let pad = COMMENT_COLUMN.saturating_sub(cell.len()).max(2);
        let _ = writeln!(
            out,
            "{}{:pad$}!- {}",
            cell,
            "",
            layout.field_name(index),
            pad = pad
        );
    }
    out.push('\n');
}
