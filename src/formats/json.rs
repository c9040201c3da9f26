//! Support for JSON text resources.
//!
//! The document must be a single top-level object. Each member is one entry,
//! read in document order. String values are used verbatim; numbers and
//! booleans use their JSON spelling. Any other value is reported against its
//! key and skipped without failing the rest of the file.

use std::{fmt, path::Path};

use serde::de::{DeserializeSeed, Deserializer, MapAccess, Visitor};
use serde_json::Value;

use crate::{
    error::Error,
    traits::Parser,
    types::{ParsedFile, Row},
};

/// Parser for the JSON syntax.
#[derive(Debug, Clone, Copy, Default)]
pub struct Format;

impl Parser for Format {
    fn from_str<P: AsRef<Path>>(path: P, text: &str) -> Result<ParsedFile, Error> {
        let path = path.as_ref();
        let json_error = |source| Error::Json {
            path: path.to_path_buf(),
            source,
        };

        let mut deserializer = serde_json::Deserializer::from_str(text);
        let (rows, errors) = Members { path }
            .deserialize(&mut deserializer)
            .map_err(json_error)?;
        deserializer.end().map_err(json_error)?;

        Ok(ParsedFile::from_rows(path, rows, errors))
    }
}

type Rows = (Vec<Row>, Vec<Error>);

/// Walks the top-level object without building an intermediate map, so
/// document order and repeated keys are both observable.
struct Members<'a> {
    path: &'a Path,
}

impl<'de> DeserializeSeed<'de> for Members<'_> {
    type Value = Rows;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for Members<'_> {
    type Value = Rows;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object of text resource members")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut rows = Vec::new();
        let mut errors = Vec::new();

        while let Some(key) = map.next_key::<String>()? {
            let value = map.next_value::<Value>()?;
            if key.trim().is_empty() {
                errors.push(Error::InvalidRow {
                    path: self.path.to_path_buf(),
                    line: None,
                    reason: "blank key".to_string(),
                });
                continue;
            }
            let text = match value {
                Value::String(text) => text,
                Value::Number(number) => number.to_string(),
                Value::Bool(flag) => flag.to_string(),
                other => {
                    errors.push(Error::InvalidValue {
                        path: self.path.to_path_buf(),
                        key: key.clone(),
                        found: value_kind(&other),
                    });
                    rows.push(Row::rejected(key, None));
                    continue;
                }
            };
            rows.push(Row::accepted(key, text, None));
        }

        Ok((rows, errors))
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LocaleEntry;
    use indoc::indoc;

    #[test]
    fn test_parse_simple_json() {
        let parsed = Format::from_str(
            "Greeting.en.json",
            r#"{"hello": "Hello", "bye": "Goodbye"}"#,
        )
        .unwrap();
        assert_eq!(
            parsed.entries,
            vec![
                LocaleEntry::new("hello", "Hello"),
                LocaleEntry::new("bye", "Goodbye"),
            ]
        );
        assert!(parsed.is_clean());
    }

    #[test]
    fn test_document_order_is_kept() {
        let parsed = Format::from_str("T.en.json", r#"{"z": "1", "a": "2", "m": "3"}"#).unwrap();
        let keys: Vec<_> = parsed.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_scalars_are_converted() {
        let parsed = Format::from_str("T.en.json", r#"{"n": 42, "f": 1.5, "b": true}"#).unwrap();
        assert_eq!(parsed.get("n"), Some("42"));
        assert_eq!(parsed.get("f"), Some("1.5"));
        assert_eq!(parsed.get("b"), Some("true"));
    }

    #[test]
    fn test_nested_object_is_reported_against_its_key() {
        let parsed = Format::from_str(
            "Greeting.en.json",
            indoc! {r#"
                {
                    "hi": {"x": 1},
                    "bye": "Goodbye"
                }
            "#},
        )
        .unwrap();
        assert_eq!(parsed.entries, vec![LocaleEntry::new("bye", "Goodbye")]);
        assert_eq!(parsed.errors.len(), 1);
        match &parsed.errors[0] {
            Error::InvalidValue { key, found, .. } => {
                assert_eq!(key, "hi");
                assert_eq!(*found, "an object");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_array_and_null_values_are_rejected() {
        let parsed = Format::from_str("T.en.json", r#"{"a": [1], "b": null}"#).unwrap();
        assert!(parsed.entries.is_empty());
        assert_eq!(parsed.errors.len(), 2);
    }

    #[test]
    fn test_duplicate_key_yields_no_entry() {
        let parsed = Format::from_str(
            "T.en.json",
            r#"{"a": "1", "b": "2", "a": "3"}"#,
        )
        .unwrap();
        assert_eq!(parsed.entries, vec![LocaleEntry::new("b", "2")]);
        assert!(matches!(
            &parsed.errors[..],
            [Error::DuplicateKey { key, .. }] if key == "a"
        ));
    }

    #[test]
    fn test_duplicate_of_rejected_value_yields_no_entry() {
        let parsed = Format::from_str("T.en.json", r#"{"a": {"x": 1}, "a": "2", "b": "3"}"#).unwrap();
        assert_eq!(parsed.get("a"), None);
        assert_eq!(parsed.entries, vec![LocaleEntry::new("b", "3")]);
        assert_eq!(parsed.errors.len(), 2);
        assert!(matches!(&parsed.errors[0], Error::InvalidValue { key, .. } if key == "a"));
        assert!(matches!(&parsed.errors[1], Error::DuplicateKey { key, .. } if key == "a"));
    }

    #[test]
    fn test_blank_key_is_rejected() {
        let parsed = Format::from_str("T.en.json", r#"{" ": "x", "a": "1"}"#).unwrap();
        assert_eq!(parsed.entries.len(), 1);
        assert!(matches!(parsed.errors[0], Error::InvalidRow { .. }));
    }

    #[test]
    fn test_top_level_must_be_an_object() {
        let err = Format::from_str("T.en.json", r#"["a", "b"]"#).unwrap_err();
        assert!(matches!(err, Error::Json { .. }));
    }

    #[test]
    fn test_malformed_json_reports_line() {
        let err = Format::from_str("T.en.json", "{\n  \"a\": \"1\",\n  \"b\": \n}").unwrap_err();
        let location = err.location().unwrap();
        assert_eq!(location.line, Some(4));
    }

    #[test]
    fn test_trailing_characters_are_rejected() {
        let err = Format::from_str("T.en.json", r#"{"a": "1"} {"#).unwrap_err();
        assert!(matches!(err, Error::Json { .. }));
    }

    #[test]
    fn test_escapes_are_decoded() {
        let parsed = Format::from_str("T.en.json", r#"{"q": "say \"hi\"\né"}"#).unwrap();
        assert_eq!(parsed.get("q"), Some("say \"hi\"\né"));
    }
}
