// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed records and the validating record builder

use crate::choices::Choice;
use crate::error::{Error, Result};
use crate::layout::{layout, FieldKind, ObjectLayout};
use crate::schema::{ObjectType, SchemaVersion};
use crate::value::FieldValue;

/// One object of the document, laid out for a schema version
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    pub object_type: ObjectType,
    pub version: SchemaVersion,
    pub fields: Vec<FieldValue>,
}

impl Record {
    /// Start building a record
    pub fn builder(object_type: ObjectType, version: SchemaVersion) -> RecordBuilder {
        RecordBuilder {
            object_type,
            version,
            fields: Vec::new(),
        }
    }

    /// Create and validate a record from raw field values
    pub fn new(
        object_type: ObjectType,
        version: SchemaVersion,
        mut fields: Vec<FieldValue>,
    ) -> Result<Self> {
        validate_fields(object_type, version, &mut fields)?;
        Ok(Self {
            object_type,
            version,
            fields,
        })
    }

    /// Layout this record was built against
    pub fn layout(&self) -> &'static ObjectLayout {
        layout(self.object_type, self.version)
    }

    /// Record name: the first field, unless the type has no name field
    pub fn name(&self) -> &str {
        if self.object_type.is_unnamed() {
            return "";
        }
        self.fields.first().and_then(FieldValue::as_str).unwrap_or("")
    }

    /// Field by index
    pub fn get(&self, index: usize) -> Option<&FieldValue> {
        self.fields.get(index)
    }

    /// Field by fixed field name
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        let idx = self.layout().index_of(name)?;
        self.fields.get(idx)
    }

    /// Text of a fixed field by name
    pub fn text(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(FieldValue::as_str)
    }

    /// Real value of a fixed field by name
    pub fn real(&self, name: &str) -> Option<f64> {
        self.field(name).and_then(FieldValue::as_f64)
    }

    /// Fields of the extensible group, chunked by group
    pub fn groups(&self) -> impl Iterator<Item = &[FieldValue]> {
        let layout = self.layout();
        let start = layout.fields.len().min(self.fields.len());
        let size = layout.extensible.map(|g| g.fields.len()).unwrap_or(1);
        let rest = if layout.extensible.is_some() {
            &self.fields[start..]
        } else {
            &self.fields[self.fields.len()..]
        };
        rest.chunks(size)
    }

    /// Every node reference in field order, with its field name
    pub fn node_fields(&self) -> Vec<(String, &str)> {
        let layout = self.layout();
        self.fields
            .iter()
            .enumerate()
            .filter_map(|(i, value)| {
                let spec = layout.field(i)?;
                match (spec.kind, value) {
                    (FieldKind::Node, FieldValue::Text(s)) => {
                        Some((layout.field_name(i).into_owned(), s.as_str()))
                    }
                    _ => None,
                }
            })
            .collect()
    }
}

/// Accumulates fields in layout order and validates them on `build`
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    object_type: ObjectType,
    version: SchemaVersion,
    fields: Vec<FieldValue>,
}

impl RecordBuilder {
    pub fn text(mut self, value: impl Into<String>) -> Self {
        self.fields.push(FieldValue::text(value));
        self
    }

    /// Node reference
    pub fn node(self, value: impl Into<String>) -> Self {
        self.text(value)
    }

    pub fn real(mut self, value: f64) -> Self {
        self.fields.push(FieldValue::real(value));
        self
    }

    pub fn int(mut self, value: i64) -> Self {
        self.fields.push(FieldValue::Integer(value));
        self
    }

    /// Keyword from a closed value set
    pub fn choice(mut self, value: impl Choice) -> Self {
        self.fields.push(FieldValue::Text(value.keyword().to_string()));
        self
    }

    pub fn autocalculate(mut self) -> Self {
        self.fields.push(FieldValue::Autocalculate);
        self
    }

    pub fn autosize(mut self) -> Self {
        self.fields.push(FieldValue::Autosize);
        self
    }

    pub fn blank(mut self) -> Self {
        self.fields.push(FieldValue::Blank);
        self
    }

    /// Push an arbitrary value
    pub fn value(mut self, value: FieldValue) -> Self {
        self.fields.push(value);
        self
    }

    /// Push one real per coordinate
    pub fn reals(mut self, values: impl IntoIterator<Item = f64>) -> Self {
        self.fields.extend(values.into_iter().map(FieldValue::real));
        self
    }

    /// Validate against the layout and produce the record
    pub fn build(self) -> Result<Record> {
        Record::new(self.object_type, self.version, self.fields)
    }
}

/// Characters that separate fields, end records or start comments in the
/// document text. No text field may contain them.
pub const RESERVED_CHARACTERS: &[char] = &[',', ';', '!', '\n', '\r'];

/// Validate fields against the layout of a type and version.
///
/// Trailing blank optional fields beyond the minimum are dropped, numbers
/// are coerced to the field kind, and choice keywords are normalised to
/// their canonical spelling.
pub fn validate_fields(
    object_type: ObjectType,
    version: SchemaVersion,
    fields: &mut Vec<FieldValue>,
) -> Result<()> {
    let layout = layout(object_type, version);

    while fields.len() > layout.min_fields && fields.last().is_some_and(FieldValue::is_blank) {
        fields.pop();
    }

    let name = if object_type.is_unnamed() {
        String::new()
    } else {
        fields
            .first()
            .and_then(FieldValue::as_str)
            .unwrap_or_default()
            .to_string()
    };

    if !layout.accepts_count(fields.len()) {
        return Err(Error::Arity {
            object_type,
            name,
            count: fields.len(),
            min: layout.min_fields,
            max: layout.max_fields(),
        });
    }

    for (index, value) in fields.iter_mut().enumerate() {
        let Some(spec) = layout.field(index) else {
            return Err(Error::Arity {
                object_type,
                name,
                count: index + 1,
                min: layout.min_fields,
                max: layout.max_fields(),
            });
        };

        let field_name = || layout.field_name(index).into_owned();

        match value {
            FieldValue::Blank => {
                if spec.required {
                    return Err(Error::RequiredFieldBlank {
                        object_type,
                        name,
                        field: field_name(),
                    });
                }
            }
            FieldValue::Autocalculate if !spec.autocalculate => {
                return Err(Error::AutoValueNotAllowed {
                    object_type,
                    name,
                    field: field_name(),
                    keyword: "Autocalculate",
                });
            }
            FieldValue::Autosize if !spec.autosize => {
                return Err(Error::AutoValueNotAllowed {
                    object_type,
                    name,
                    field: field_name(),
                    keyword: "Autosize",
                });
            }
            FieldValue::Autocalculate | FieldValue::Autosize => {}
            FieldValue::Text(text) if text.contains(RESERVED_CHARACTERS) => {
                let character = text
                    .chars()
                    .find(|c| RESERVED_CHARACTERS.contains(c))
                    .unwrap_or(',');
                return Err(Error::ReservedCharacter {
                    object_type,
                    name,
                    field: field_name(),
                    value: text.clone(),
                    character,
                });
            }
            FieldValue::Text(text) => match spec.kind {
                FieldKind::Alpha | FieldKind::Node => {}
                FieldKind::Choice(allowed) => {
                    let canonical = allowed
                        .iter()
                        .find(|candidate| candidate.eq_ignore_ascii_case(text.trim()));
                    match canonical {
                        Some(keyword) => *text = keyword.to_string(),
                        None => {
                            return Err(Error::InvalidChoice {
                                object_type,
                                name,
                                field: field_name(),
                                value: text.clone(),
                                allowed: allowed.join(", "),
                            })
                        }
                    }
                }
                FieldKind::Real | FieldKind::Integer => {
                    return Err(Error::FieldKind {
                        object_type,
                        name,
                        field: field_name(),
                        expected: spec.kind.describe(),
                        value: text.clone(),
                    });
                }
            },
            FieldValue::Real(v) => match spec.kind {
                FieldKind::Real => {}
                FieldKind::Integer if v.fract() == 0.0 => *value = FieldValue::Integer(*v as i64),
                _ => {
                    return Err(Error::FieldKind {
                        object_type,
                        name,
                        field: field_name(),
                        expected: spec.kind.describe(),
                        value: value.to_string(),
                    });
                }
            },
            FieldValue::Integer(v) => match spec.kind {
                FieldKind::Integer => {}
                FieldKind::Real => *value = FieldValue::real(*v as f64),
                _ => {
                    return Err(Error::FieldKind {
                        object_type,
                        name,
                        field: field_name(),
                        expected: spec.kind.describe(),
                        value: value.to_string(),
                    });
                }
            },
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choices::{Roughness, SurfaceKind, YesNo};

    fn material(version: SchemaVersion) -> RecordBuilder {
        Record::builder(ObjectType::Material, version)
            .text("Brick")
            .choice(Roughness::MediumRough)
            .real(0.1)
            .real(0.89)
            .real(1920.0)
            .real(790.0)
    }

    #[test]
    fn test_builder_accepts_valid_record() {
        let record = material(SchemaVersion::V23_2).build().unwrap();
        assert_eq!(record.name(), "Brick");
        assert_eq!(record.real("Conductivity"), Some(0.89));
        assert_eq!(record.text("Roughness"), Some("MediumRough"));
    }

    #[test]
    fn test_builder_rejects_short_record() {
        let err = Record::builder(ObjectType::Material, SchemaVersion::V9_6)
            .text("Brick")
            .choice(Roughness::Rough)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Arity { count: 2, min: 6, .. }));
    }

    #[test]
    fn test_builder_rejects_wrong_choice_set() {
        // A YesNo keyword where a roughness is expected
        let err = Record::builder(ObjectType::Material, SchemaVersion::V9_6)
            .text("Brick")
            .choice(YesNo::Yes)
            .real(0.1)
            .real(0.89)
            .real(1920.0)
            .real(790.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidChoice { .. }));
    }

    #[test]
    fn test_builder_rejects_text_in_numeric_field() {
        let err = Record::builder(ObjectType::Material, SchemaVersion::V9_6)
            .text("Brick")
            .choice(Roughness::Rough)
            .text("thick")
            .real(0.89)
            .real(1920.0)
            .real(790.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::FieldKind { .. }));
    }

    #[test]
    fn test_autosize_only_where_allowed() {
        let err = Record::builder(ObjectType::Material, SchemaVersion::V9_6)
            .text("Brick")
            .choice(Roughness::Rough)
            .autosize()
            .real(0.89)
            .real(1920.0)
            .real(790.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::AutoValueNotAllowed { keyword: "Autosize", .. }));
    }

    #[test]
    fn test_required_blank_rejected() {
        let err = Record::builder(ObjectType::Material, SchemaVersion::V9_6)
            .blank()
            .choice(Roughness::Rough)
            .real(0.1)
            .real(0.89)
            .real(1920.0)
            .real(790.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::RequiredFieldBlank { .. }));
    }

    #[test]
    fn test_trailing_blanks_trimmed() {
        let record = material(SchemaVersion::V9_6).blank().blank().build().unwrap();
        assert_eq!(record.fields.len(), 6);
    }

    #[test]
    fn test_surface_groups_and_version_layout() {
        let record = Record::builder(ObjectType::BuildingSurfaceDetailed, SchemaVersion::V23_2)
            .text("Story1_Floor")
            .choice(SurfaceKind::Floor)
            .text("Ground Floor")
            .text("Story1")
            .blank()
            .text("Ground")
            .blank()
            .text("NoSun")
            .text("NoWind")
            .autocalculate()
            .int(3)
            .reals([0.0, 0.0, 0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0])
            .build()
            .unwrap();
        assert_eq!(record.groups().count(), 3);
        assert_eq!(record.text("Zone Name"), Some("Story1"));

        // The same field list misses a field under 9.6
        let err = Record::new(
            ObjectType::BuildingSurfaceDetailed,
            SchemaVersion::V9_6,
            record.fields.clone(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidChoice { .. } | Error::Arity { .. }));
    }

    #[test]
    fn test_reserved_characters_rejected() {
        for name in ["Brick; Red", "Brick, Red", "Brick ! Red", "Brick\nRed"] {
            let err = Record::builder(ObjectType::Material, SchemaVersion::V9_6)
                .text(name)
                .choice(Roughness::Rough)
                .real(0.1)
                .real(0.89)
                .real(1920.0)
                .real(790.0)
                .build()
                .unwrap_err();
            assert!(matches!(err, Error::ReservedCharacter { .. }), "{:?} accepted", name);
        }
    }

    #[test]
    fn test_choice_canonicalised() {
        let record = Record::new(
            ObjectType::OutputSqlite,
            SchemaVersion::V9_6,
            vec![FieldValue::text("simpleandtabular")],
        )
        .unwrap();
        assert_eq!(record.get(0).and_then(FieldValue::as_str), Some("SimpleAndTabular"));
    }

    #[test]
    fn test_node_fields() {
        let record = Record::builder(ObjectType::OutdoorAirMixer, SchemaVersion::V23_2)
            .text("Loop OA Mixer")
            .node("Loop Mixed Air Node")
            .node("Loop OA Inlet Node")
            .node("Loop Relief Air Node")
            .node("Loop Supply Inlet Node")
            .build()
            .unwrap();
        let nodes = record.node_fields();
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[0], ("Mixed Air Node Name".to_string(), "Loop Mixed Air Node"));
    }
}
