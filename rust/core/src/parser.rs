// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Record parser using nom
//!
//! Splits document text into raw records (`Type, field, ..., field;`),
//! dropping `!` comments. Typing happens in the decoder.

use memchr::{memchr, memchr3};
use nom::{
    branch::alt,
    bytes::complete::{is_not, take_while1},
    character::complete::{char, not_line_ending},
    combinator::map,
    multi::{many0, many0_count, separated_list1},
    sequence::{preceded, terminated},
    IResult,
};
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::schema::ObjectType;

/// A record as written: class keyword and untyped field text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub type_name: String,
    pub fields: Vec<String>,
    /// Byte offset of the class keyword
    pub position: usize,
}

/// Comment: `!` to end of line
fn comment(input: &str) -> IResult<&str, &str> {
    preceded(char('!'), not_line_ending)(input)
}

/// Skip whitespace and comments
fn ws(input: &str) -> IResult<&str, ()> {
    map(
        many0_count(alt((take_while1(|c: char| c.is_whitespace()), comment))),
        |_| (),
    )(input)
}

/// One field: everything up to `,` or `;`, comments removed, trimmed
fn field(input: &str) -> IResult<&str, String> {
    map(
        many0(alt((map(is_not(",;!"), Some), map(comment, |_| None)))),
        |parts: Vec<Option<&str>>| {
            let text: String = parts.into_iter().flatten().collect();
            text.trim().to_string()
        },
    )(input)
}

/// One record: keyword and fields separated by commas, terminated by `;`
fn record(input: &str) -> IResult<&str, Vec<String>> {
    terminated(separated_list1(char(','), field), char(';'))(input)
}

/// Parse every record in a document
pub fn parse_records(text: &str) -> Result<Vec<RawRecord>> {
    let mut records = Vec::new();
    let mut rest = text;

    loop {
        rest = match ws(rest) {
            Ok((r, _)) => r,
            Err(_) => rest,
        };
        if rest.is_empty() {
            break;
        }
        let position = text.len() - rest.len();

        let (remaining, mut parts) = record(rest)
            .map_err(|_| Error::parse(position, "expected a record terminated by ';'"))?;
        if parts.is_empty() || parts[0].is_empty() {
            return Err(Error::parse(position, "record without an object type"));
        }
        let type_name = parts.remove(0);
        // `Type;` carries no fields, `Type,;` carries one blank field
        records.push(RawRecord {
            type_name,
            fields: parts,
            position,
        });
        rest = remaining;
    }

    Ok(records)
}

/// Fast record scanner - finds record boundaries without tokenizing fields
pub struct RecordScanner<'a> {
    content: &'a str,
    position: usize,
}

impl<'a> RecordScanner<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            position: 0,
        }
    }

    /// Skip whitespace and comment lines
    fn skip_trivia(&mut self) {
        let bytes = self.content.as_bytes();
        while self.position < bytes.len() {
            match bytes[self.position] {
                b'!' => {
                    self.position = memchr(b'\n', &bytes[self.position..])
                        .map(|i| self.position + i + 1)
                        .unwrap_or(bytes.len());
                }
                b if b.is_ascii_whitespace() => self.position += 1,
                _ => break,
            }
        }
    }

    /// Scan for the next record
    /// Returns (type_name, record_start, record_end)
    pub fn next_record(&mut self) -> Option<(&'a str, usize, usize)> {
        self.skip_trivia();
        let bytes = self.content.as_bytes();
        let start = self.position;
        if start >= bytes.len() {
            return None;
        }

        let mut type_end = None;
        let mut cursor = start;
        loop {
            let offset = memchr3(b',', b';', b'!', &bytes[cursor..])?;
            let at = cursor + offset;
            match bytes[at] {
                b'!' => {
                    type_end.get_or_insert(at);
                    cursor = memchr(b'\n', &bytes[at..]).map(|i| at + i + 1)?;
                }
                b',' => {
                    type_end.get_or_insert(at);
                    cursor = at + 1;
                }
                _ => {
                    let type_end = type_end.unwrap_or(at);
                    self.position = at + 1;
                    let type_name = self.content[start..type_end].trim();
                    return Some((type_name, start, at + 1));
                }
            }
        }
    }

    /// Count records by object type; unknown keywords are skipped
    pub fn count_by_type(&mut self) -> FxHashMap<ObjectType, usize> {
        let mut counts = FxHashMap::default();
        while let Some((type_name, _, _)) = self.next_record() {
            if let Some(ty) = ObjectType::from_keyword(type_name) {
                *counts.entry(ty).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Reset scanner to beginning
    pub fn reset(&mut self) {
        self.position = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "! header comment\n\
Version,\n    23.2;                    !- Version Identifier\n\
\n\
Zone,\n    Story1,                  !- Name\n    0,                       !- Direction of Relative North\n    ,                        !- X Origin\n    0;                       !- Y Origin\n\
\n\
Output:SQLite,\n    SimpleAndTabular;        !- Option Type\n";

    #[test]
    fn test_comment_and_ws() {
        assert_eq!(ws("  ! note\n  Zone").unwrap().0, "Zone");
    }

    #[test]
    fn test_field_strips_comment() {
        let (rest, value) = field("  Story1  !- Name\n").unwrap();
        assert_eq!(value, "Story1");
        assert_eq!(rest, "");
        let (rest, value) = field(" 3.5,").unwrap();
        assert_eq!(value, "3.5");
        assert_eq!(rest, ",");
    }

    #[test]
    fn test_parse_records() {
        let records = parse_records(SAMPLE).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].type_name, "Version");
        assert_eq!(records[0].fields, vec!["23.2"]);
        assert_eq!(records[1].fields, vec!["Story1", "0", "", "0"]);
        assert_eq!(records[2].type_name, "Output:SQLite");
    }

    #[test]
    fn test_field_comment_with_separator() {
        let records = parse_records("Zone, A; ! not, a; record\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].fields, vec!["A"]);
    }

    #[test]
    fn test_unterminated_record() {
        let err = parse_records("Version,\n 9.6;\nZone,\n A\n").unwrap_err();
        assert!(matches!(err, Error::Parse { position: 15, .. }));
    }

    #[test]
    fn test_record_scanner() {
        let mut scanner = RecordScanner::new(SAMPLE);
        let (ty, start, end) = scanner.next_record().unwrap();
        assert_eq!(ty, "Version");
        assert!(SAMPLE[start..end].ends_with(';'));

        scanner.reset();
        let counts = scanner.count_by_type();
        assert_eq!(counts.get(&ObjectType::Zone), Some(&1));
        assert_eq!(counts.get(&ObjectType::OutputSqlite), Some(&1));
    }
}
