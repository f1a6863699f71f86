// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Field values

use std::fmt;

/// Rounding applied to every real before it is stored
pub const REAL_PRECISION: f64 = 1e-6;

/// Round a real to the serializer precision, normalising negative zero
#[inline]
pub fn round_real(value: f64) -> f64 {
    let steps = 1.0 / REAL_PRECISION;
    let rounded = (value * steps).round() / steps;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// A single field of a record
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldValue {
    /// Alphanumeric value: names, node references and choice keywords
    Text(String),
    /// Real number, already rounded
    Real(f64),
    /// Integer number
    Integer(i64),
    /// `Autocalculate` keyword
    Autocalculate,
    /// `Autosize` keyword
    Autosize,
    /// Empty field
    Blank,
}

impl FieldValue {
    /// Real value, rounded to the serializer precision
    pub fn real(value: f64) -> Self {
        FieldValue::Real(round_real(value))
    }

    /// Text value; empty strings become blank fields
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            FieldValue::Blank
        } else {
            FieldValue::Text(value)
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Blank)
    }

    /// Get as text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get as a float, accepting integers as well
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Real(v) => Some(*v),
            FieldValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Short description of the value kind, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Real(_) => "real",
            FieldValue::Integer(_) => "integer",
            FieldValue::Autocalculate => "autocalculate",
            FieldValue::Autosize => "autosize",
            FieldValue::Blank => "blank",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Real(v) => {
                let v = round_real(*v);
                if v.fract() == 0.0 && v.abs() < 1e15 {
                    write!(f, "{}", v as i64)
                } else {
                    write!(f, "{}", v)
                }
            }
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Autocalculate => f.write_str("Autocalculate"),
            FieldValue::Autosize => f.write_str("Autosize"),
            FieldValue::Blank => Ok(()),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::real(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::text(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_real() {
        assert_eq!(round_real(0.1 + 0.2), 0.3);
        assert_eq!(round_real(1.000_000_4), 1.0);
        assert!(round_real(-0.000_000_1).is_sign_positive());
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::real(3.0).to_string(), "3");
        assert_eq!(FieldValue::real(0.25).to_string(), "0.25");
        assert_eq!(FieldValue::real(-12.5).to_string(), "-12.5");
        assert_eq!(FieldValue::Integer(4).to_string(), "4");
        assert_eq!(FieldValue::Autosize.to_string(), "Autosize");
        assert_eq!(FieldValue::Blank.to_string(), "");
    }

    #[test]
    fn test_empty_text_is_blank() {
        assert!(FieldValue::text("  ").is_blank());
        assert_eq!(FieldValue::text("Zone 1").as_str(), Some("Zone 1"));
    }
}
