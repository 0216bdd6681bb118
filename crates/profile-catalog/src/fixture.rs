//! Fixture file parsing and date coercion.
//!
//! Each entity may ship one optional JSON fixture file named
//! `<entity>.json` containing an array of flat objects. Parsing converts
//! every object into a [`FixtureRecord`], coercing date-like string
//! values to calendar dates on the way: a field whose name contains
//! `date` or `birth` (case-insensitive) and whose value matches the
//! strict `YYYY-MM-DD` shape becomes [`FixtureValue::Date`]. Strings that
//! do not match are left untouched and never raise.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::FixtureError;

/// One scalar fixture value.
#[derive(Debug, Clone, PartialEq)]
pub enum FixtureValue {
    /// JSON null.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON number without a fractional part.
    Integer(i64),
    /// JSON number with a fractional part (or out of integer range).
    Float(f64),
    /// JSON string.
    Text(String),
    /// A string value coerced to a calendar date.
    Date(NaiveDate),
}

/// One row's worth of field-name/value pairs, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureRecord {
    fields: Vec<(String, FixtureValue)>,
}

impl FixtureRecord {
    /// Returns the record's fields in document order.
    #[must_use]
    pub fn fields(&self) -> &[(String, FixtureValue)] {
        &self.fields
    }

    /// Look up a value by field name.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&FixtureValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }
}

/// A parsed fixture file for one entity.
#[derive(Debug, Clone, PartialEq)]
pub enum FixtureDocument {
    /// No fixture file exists for the entity; fixtures are optional.
    Missing,
    /// The parsed records; an empty file parses to an empty vector.
    Records(Vec<FixtureRecord>),
}

impl FixtureDocument {
    /// Load the fixture file for `entity_name` from `dir`.
    ///
    /// A missing file is reported as [`FixtureDocument::Missing`], not as
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] when the file exists but cannot be read,
    /// is not valid JSON, is not an array of objects, or contains nested
    /// values.
    pub fn load(dir: &Path, entity_name: &str) -> Result<Self, FixtureError> {
        let path = dir.join(format!("{entity_name}.json"));
        if !path.exists() {
            return Ok(Self::Missing);
        }

        let contents = fs::read_to_string(&path).map_err(|error| FixtureError::Io {
            path: path.clone(),
            message: error.to_string(),
        })?;
        Self::from_json(&contents, &path)
    }

    /// Parse fixture records from a JSON string.
    ///
    /// `path` is used for error context only.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] for malformed JSON, a non-array root, a
    /// non-object element, or a nested field value.
    pub fn from_json(json: &str, path: &Path) -> Result<Self, FixtureError> {
        let root: Value = serde_json::from_str(json).map_err(|error| FixtureError::Parse {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;

        let Value::Array(items) = root else {
            return Err(FixtureError::NotAnArray {
                path: path.to_path_buf(),
            });
        };

        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let Value::Object(object) = item else {
                return Err(FixtureError::RecordNotObject {
                    path: path.to_path_buf(),
                    index,
                });
            };

            let mut fields = Vec::with_capacity(object.len());
            for (name, value) in object {
                let converted = match value {
                    Value::Null => FixtureValue::Null,
                    Value::Bool(flag) => FixtureValue::Bool(flag),
                    Value::Number(number) => number.as_i64().map_or_else(
                        || FixtureValue::Float(number.as_f64().unwrap_or(f64::NAN)),
                        FixtureValue::Integer,
                    ),
                    Value::String(text) => coerce_text(&name, text),
                    Value::Array(_) | Value::Object(_) => {
                        return Err(FixtureError::UnsupportedValue {
                            path: path.to_path_buf(),
                            index,
                            field: name,
                        });
                    }
                };
                fields.push((name, converted));
            }
            records.push(FixtureRecord { fields });
        }

        Ok(Self::Records(records))
    }

    /// Number of records, treating a missing document as empty.
    #[must_use]
    pub fn record_count(&self) -> usize {
        match self {
            Self::Missing => 0,
            Self::Records(records) => records.len(),
        }
    }
}

/// Coerce a text value to a date when the field name and value shape say
/// it holds one.
fn coerce_text(field_name: &str, text: String) -> FixtureValue {
    if !date_like_field(field_name) {
        return FixtureValue::Text(text);
    }
    match parse_strict_date(&text) {
        Some(date) => FixtureValue::Date(date),
        None => FixtureValue::Text(text),
    }
}

fn date_like_field(name: &str) -> bool {
    let lowered = name.to_ascii_lowercase();
    lowered.contains("date") || lowered.contains("birth")
}

/// Parse a date in the exact `YYYY-MM-DD` shape.
///
/// Chrono alone would also accept unpadded forms such as `1990-1-1`, so
/// the shape is checked first.
fn parse_strict_date(text: &str) -> Option<NaiveDate> {
    let bytes = text.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let digits_ok = bytes
        .iter()
        .enumerate()
        .all(|(i, byte)| matches!(i, 4 | 7) || byte.is_ascii_digit());
    if !digits_ok {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn parse(json: &str) -> Result<FixtureDocument, FixtureError> {
        FixtureDocument::from_json(json, Path::new("students.json"))
    }

    fn records(document: FixtureDocument) -> Vec<FixtureRecord> {
        match document {
            FixtureDocument::Records(records) => records,
            FixtureDocument::Missing => panic!("expected parsed records"),
        }
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().expect("create temp dir");

        let document =
            FixtureDocument::load(dir.path(), "students").expect("missing file loads");

        assert_eq!(document, FixtureDocument::Missing);
        assert_eq!(document.record_count(), 0);
    }

    #[test]
    fn empty_array_parses_to_zero_records() {
        let document = parse("[]").expect("empty array parses");

        assert_eq!(document.record_count(), 0);
    }

    #[test]
    fn load_reads_records_from_disk() {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::write(
            dir.path().join("students.json"),
            r#"[{"first_name": "Mia", "birth_date": "2011-09-02"}]"#,
        )
        .expect("write fixture");

        let document = FixtureDocument::load(dir.path(), "students").expect("load");

        assert_eq!(document.record_count(), 1);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let result = parse("not json");

        assert!(matches!(result, Err(FixtureError::Parse { .. })));
    }

    #[test]
    fn non_array_root_is_rejected() {
        let result = parse(r#"{"first_name": "Mia"}"#);

        assert!(matches!(result, Err(FixtureError::NotAnArray { .. })));
    }

    #[test]
    fn non_object_element_is_rejected_with_index() {
        let result = parse(r#"[{"first_name": "Mia"}, 42]"#);

        assert!(matches!(
            result,
            Err(FixtureError::RecordNotObject { index: 1, .. })
        ));
    }

    #[test]
    fn nested_value_is_rejected_with_field() {
        let result = parse(r#"[{"grades": [5, 4]}]"#);

        match result {
            Err(FixtureError::UnsupportedValue { field, index, .. }) => {
                assert_eq!(field, "grades");
                assert_eq!(index, 0);
            }
            other => panic!("expected UnsupportedValue, got {other:?}"),
        }
    }

    #[test]
    fn scalar_values_convert_by_json_type() {
        let document = parse(
            r#"[{"title": "Portal", "release_year": 2007, "rating": 9.5, "in_stock": null, "active": true}]"#,
        )
        .expect("parses");
        let record = &records(document)[0];

        assert_eq!(
            record.value("title"),
            Some(&FixtureValue::Text("Portal".to_owned()))
        );
        assert_eq!(record.value("release_year"), Some(&FixtureValue::Integer(2007)));
        assert_eq!(record.value("rating"), Some(&FixtureValue::Float(9.5)));
        assert_eq!(record.value("in_stock"), Some(&FixtureValue::Null));
        assert_eq!(record.value("active"), Some(&FixtureValue::Bool(true)));
    }

    #[test]
    fn birth_date_string_is_coerced_to_date() {
        let document = parse(r#"[{"birth_date": "1990-01-01"}]"#).expect("parses");
        let record = &records(document)[0];

        let expected = NaiveDate::from_ymd_opt(1990, 1, 1).expect("valid date");
        assert_eq!(record.value("birth_date"), Some(&FixtureValue::Date(expected)));
    }

    #[rstest]
    #[case::not_a_date("not-a-date")]
    #[case::unpadded("1990-1-1")]
    #[case::trailing_text("1990-01-01 extra")]
    #[case::impossible_date("1990-13-45")]
    #[case::wrong_separator("1990/01/01")]
    fn non_matching_date_strings_stay_text(#[case] value: &str) {
        let json = format!(r#"[{{"birth_date": "{value}"}}]"#);
        let document = parse(&json).expect("parses");
        let record = &records(document)[0];

        assert_eq!(
            record.value("birth_date"),
            Some(&FixtureValue::Text(value.to_owned()))
        );
    }

    #[rstest]
    #[case::registration("registration_date", true)]
    #[case::birth("date_of_birth", true)]
    #[case::uppercase("Birth_Date", true)]
    #[case::plain_name("title", false)]
    #[case::updated("updated_at", true)]
    #[case::created("created_at", false)]
    fn coercion_applies_only_to_date_like_fields(#[case] name: &str, #[case] coerced: bool) {
        let json = format!(r#"[{{"{name}": "2024-05-01"}}]"#);
        let document = parse(&json).expect("parses");
        let record = &records(document)[0];

        let is_date = matches!(record.value(name), Some(FixtureValue::Date(_)));
        assert_eq!(is_date, coerced);
    }
}
