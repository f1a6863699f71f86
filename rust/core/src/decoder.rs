// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Record decoder
//!
//! Types raw records against the layouts of the document's declared version.

use crate::error::{Error, Result};
use crate::layout::{layout, FieldKind};
use crate::parser::{parse_records, RawRecord};
use crate::record::Record;
use crate::schema::{ObjectType, SchemaVersion};
use crate::value::FieldValue;
use crate::writer::Document;

/// Decode one field's text according to its kind
fn decode_field(text: &str, kind: Option<FieldKind>) -> std::result::Result<FieldValue, &'static str> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(FieldValue::Blank);
    }
    if text.eq_ignore_ascii_case("autocalculate") {
        return Ok(FieldValue::Autocalculate);
    }
    if text.eq_ignore_ascii_case("autosize") {
        return Ok(FieldValue::Autosize);
    }
    match kind {
        Some(FieldKind::Real) => lexical_core::parse::<f64>(text.as_bytes())
            .map(FieldValue::real)
            .map_err(|_| "a real number"),
        Some(FieldKind::Integer) => match lexical_core::parse::<i64>(text.as_bytes()) {
            Ok(v) => Ok(FieldValue::Integer(v)),
            Err(_) => lexical_core::parse::<f64>(text.as_bytes())
                .ok()
                .filter(|v| v.fract() == 0.0)
                .map(|v| FieldValue::Integer(v as i64))
                .ok_or("an integer"),
        },
        _ => Ok(FieldValue::Text(text.to_string())),
    }
}

/// Decode a raw record into a validated record
pub fn decode_record(raw: &RawRecord, version: SchemaVersion) -> Result<Record> {
    let object_type = ObjectType::from_keyword(&raw.type_name)
        .ok_or_else(|| Error::UnknownObjectType(raw.type_name.clone()))?;
    let layout = layout(object_type, version);

    let mut fields = Vec::with_capacity(raw.fields.len());
    for (index, text) in raw.fields.iter().enumerate() {
        let kind = layout.field(index).map(|spec| spec.kind);
        let value = decode_field(text, kind).map_err(|expected| Error::FieldKind {
            object_type,
            name: raw.fields.first().cloned().unwrap_or_default(),
            field: layout.field_name(index).into_owned(),
            expected,
            value: text.clone(),
        })?;
        fields.push(value);
    }

    Record::new(object_type, version, fields)
}

impl Document {
    /// Parse document text.
    ///
    /// The `Version` record declares the schema version; every other record
    /// is decoded against that version's layouts.
    pub fn parse(text: &str) -> Result<Self> {
        let raw = parse_records(text)?;

        let version_record = raw
            .iter()
            .find(|r| ObjectType::from_keyword(&r.type_name) == Some(ObjectType::Version))
            .ok_or_else(|| Error::parse(0, "document has no Version record"))?;
        let identifier = version_record
            .fields
            .first()
            .ok_or_else(|| Error::parse(version_record.position, "empty Version record"))?;
        let version = SchemaVersion::parse(identifier)?;

        let mut document = Document::new(version);
        for record in &raw {
            if std::ptr::eq(record, version_record) {
                continue;
            }
            document.push(decode_record(record, version)?)?;
        }
        Ok(document)
    }
}
