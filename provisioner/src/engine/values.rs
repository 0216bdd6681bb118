//! Dynamic SQL parameter values.
//!
//! Fixture records are untyped JSON; insert parameters must be concrete
//! Rust values the driver can bind. [`bind_value`] converts one fixture
//! value under the entity's declared field type. Decimal and timestamp
//! columns travel as text with an explicit SQL cast so that malformed
//! fixture data fails as an ordinary per-record insert error on the
//! server rather than a client-side bind failure.

use bytes::BytesMut;
use chrono::NaiveDate;
use postgres::types::{IsNull, ToSql, Type, to_sql_checked};
use profile_catalog::{FieldType, FixtureValue};
use thiserror::Error;

/// A record-level conversion failure.
///
/// These fail the affected record only, without touching the database,
/// and are counted as "other" insert errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// An integer fixture value does not fit a 32-bit column.
    #[error("field '{field}': integer {value} does not fit a 32-bit column")]
    IntegerOutOfRange {
        /// Field holding the value.
        field: String,
        /// The out-of-range value.
        value: i64,
    },

    /// The fixture value's kind does not match the declared column type.
    #[error("field '{field}': expected {expected}, got {found}")]
    TypeMismatch {
        /// Field holding the value.
        field: String,
        /// What the declared column type accepts.
        expected: &'static str,
        /// Kind of value the fixture supplied.
        found: &'static str,
    },
}

/// A concrete parameter value bound to one insert placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// SQL NULL, valid for any column.
    Null,
    /// Boolean column value.
    Bool(bool),
    /// 32-bit integer column value.
    Int(i32),
    /// Double-precision column value.
    Double(f64),
    /// Text column value (also the carrier for cast columns).
    Text(String),
    /// Date column value.
    Date(NaiveDate),
}

impl ToSql for SqlValue {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match self {
            Self::Null => Ok(IsNull::Yes),
            Self::Bool(value) => value.to_sql(ty, out),
            Self::Int(value) => value.to_sql(ty, out),
            Self::Double(value) => value.to_sql(ty, out),
            Self::Text(value) => value.to_sql(ty, out),
            Self::Date(value) => value.to_sql(ty, out),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        // Parameter/column correspondence is enforced by bind_value and
        // the DDL generator, not by the driver's static check.
        true
    }

    to_sql_checked!();
}

/// A value plus the SQL cast its placeholder needs, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundValue {
    /// The parameter value.
    pub value: SqlValue,
    /// Cast suffix appended to the placeholder (e.g. `::text::numeric`).
    pub cast: Option<&'static str>,
}

impl BoundValue {
    fn plain(value: SqlValue) -> Self {
        Self { value, cast: None }
    }

    fn cast(value: SqlValue, cast: &'static str) -> Self {
        Self {
            value,
            cast: Some(cast),
        }
    }
}

/// Convert one fixture value for the column it targets.
///
/// `declared` is `None` for fields the entity does not declare; those are
/// passed through as text so the server itself reports the unknown
/// column.
///
/// # Errors
///
/// Returns [`ValueError`] when the value cannot be represented in the
/// declared column type.
pub fn bind_value(
    field: &str,
    declared: Option<&FieldType>,
    value: &FixtureValue,
) -> Result<BoundValue, ValueError> {
    if matches!(value, FixtureValue::Null) {
        return Ok(BoundValue::plain(SqlValue::Null));
    }

    let Some(declared) = declared else {
        return Ok(BoundValue::plain(SqlValue::Text(render_text(value))));
    };

    match declared {
        FieldType::Integer | FieldType::Reference { .. } => match value {
            FixtureValue::Integer(raw) => {
                let narrowed =
                    i32::try_from(*raw).map_err(|_| ValueError::IntegerOutOfRange {
                        field: field.to_owned(),
                        value: *raw,
                    })?;
                Ok(BoundValue::plain(SqlValue::Int(narrowed)))
            }
            other => Err(mismatch(field, "an integer", other)),
        },
        FieldType::Float => match value {
            FixtureValue::Float(raw) => Ok(BoundValue::plain(SqlValue::Double(*raw))),
            #[expect(clippy::cast_precision_loss, reason = "fixture magnitudes are small")]
            FixtureValue::Integer(raw) => Ok(BoundValue::plain(SqlValue::Double(*raw as f64))),
            other => Err(mismatch(field, "a number", other)),
        },
        FieldType::Boolean => match value {
            FixtureValue::Bool(flag) => Ok(BoundValue::plain(SqlValue::Bool(*flag))),
            other => Err(mismatch(field, "a boolean", other)),
        },
        FieldType::Text { .. } => Ok(BoundValue::plain(SqlValue::Text(render_text(value)))),
        FieldType::Date => match value {
            FixtureValue::Date(date) => Ok(BoundValue::plain(SqlValue::Date(*date))),
            // Uncoerced strings go to the server as text; a bad date is
            // then an ordinary insert error, never a client panic.
            FixtureValue::Text(text) => {
                Ok(BoundValue::cast(SqlValue::Text(text.clone()), "::text::date"))
            }
            other => Err(mismatch(field, "a date", other)),
        },
        FieldType::Timestamp => Ok(BoundValue::cast(
            SqlValue::Text(render_text(value)),
            "::text::timestamp",
        )),
        FieldType::Decimal { .. } => Ok(BoundValue::cast(
            SqlValue::Text(render_text(value)),
            "::text::numeric",
        )),
    }
}

fn mismatch(field: &str, expected: &'static str, found: &FixtureValue) -> ValueError {
    ValueError::TypeMismatch {
        field: field.to_owned(),
        expected,
        found: kind_name(found),
    }
}

fn kind_name(value: &FixtureValue) -> &'static str {
    match value {
        FixtureValue::Null => "null",
        FixtureValue::Bool(_) => "a boolean",
        FixtureValue::Integer(_) => "an integer",
        FixtureValue::Float(_) => "a float",
        FixtureValue::Text(_) => "text",
        FixtureValue::Date(_) => "a date",
    }
}

fn render_text(value: &FixtureValue) -> String {
    match value {
        FixtureValue::Null => String::new(),
        FixtureValue::Bool(flag) => flag.to_string(),
        FixtureValue::Integer(raw) => raw.to_string(),
        FixtureValue::Float(raw) => raw.to_string(),
        FixtureValue::Text(text) => text.clone(),
        FixtureValue::Date(date) => date.format("%Y-%m-%d").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const TEXT_TYPE: FieldType = FieldType::Text { max_length: None };
    const DECIMAL_TYPE: FieldType = FieldType::Decimal {
        precision: 10,
        scale: 2,
    };

    #[test]
    fn integer_column_narrows_to_i32() {
        let bound = bind_value("grade", Some(&FieldType::Integer), &FixtureValue::Integer(5))
            .expect("converts");

        assert_eq!(bound.value, SqlValue::Int(5));
        assert_eq!(bound.cast, None);
    }

    #[test]
    fn integer_overflow_fails_the_record() {
        let result = bind_value(
            "grade",
            Some(&FieldType::Integer),
            &FixtureValue::Integer(i64::from(i32::MAX) + 1),
        );

        assert!(matches!(result, Err(ValueError::IntegerOutOfRange { .. })));
    }

    #[test]
    fn float_column_accepts_integers() {
        let bound = bind_value("rating", Some(&FieldType::Float), &FixtureValue::Integer(9))
            .expect("converts");

        assert_eq!(bound.value, SqlValue::Double(9.0));
    }

    #[test]
    fn null_is_valid_for_any_column() {
        let bound =
            bind_value("phone", Some(&TEXT_TYPE), &FixtureValue::Null).expect("converts");

        assert_eq!(bound.value, SqlValue::Null);
    }

    #[test]
    fn coerced_date_binds_natively() {
        let date = NaiveDate::from_ymd_opt(1990, 1, 1).expect("valid date");
        let bound = bind_value("birth_date", Some(&FieldType::Date), &FixtureValue::Date(date))
            .expect("converts");

        assert_eq!(bound.value, SqlValue::Date(date));
        assert_eq!(bound.cast, None);
    }

    #[test]
    fn uncoerced_date_string_travels_as_cast_text() {
        let bound = bind_value(
            "birth_date",
            Some(&FieldType::Date),
            &FixtureValue::Text("not-a-date".to_owned()),
        )
        .expect("converts");

        assert_eq!(bound.value, SqlValue::Text("not-a-date".to_owned()));
        assert_eq!(bound.cast, Some("::text::date"));
    }

    #[rstest]
    #[case::decimal(&DECIMAL_TYPE, "::text::numeric")]
    #[case::timestamp(&FieldType::Timestamp, "::text::timestamp")]
    fn cast_columns_travel_as_text(#[case] declared: &FieldType, #[case] cast: &str) {
        let bound = bind_value(
            "amount",
            Some(declared),
            &FixtureValue::Text("19.99".to_owned()),
        )
        .expect("converts");

        assert_eq!(bound.cast, Some(cast));
        assert!(matches!(bound.value, SqlValue::Text(_)));
    }

    #[test]
    fn decimal_accepts_numeric_fixture_values() {
        let bound = bind_value(
            "price",
            Some(&DECIMAL_TYPE),
            &FixtureValue::Float(19.99),
        )
        .expect("converts");

        assert_eq!(bound.value, SqlValue::Text("19.99".to_owned()));
    }

    #[test]
    fn undeclared_field_passes_through_as_text() {
        let bound = bind_value("mystery", None, &FixtureValue::Integer(7)).expect("converts");

        assert_eq!(bound.value, SqlValue::Text("7".to_owned()));
        assert_eq!(bound.cast, None);
    }

    #[rstest]
    #[case(FieldType::Integer, FixtureValue::Text("five".to_owned()))]
    #[case(FieldType::Boolean, FixtureValue::Integer(1))]
    #[case(FieldType::Date, FixtureValue::Integer(20240101))]
    fn kind_mismatches_fail_the_record(
        #[case] declared: FieldType,
        #[case] value: FixtureValue,
    ) {
        let result = bind_value("field", Some(&declared), &value);

        assert!(matches!(result, Err(ValueError::TypeMismatch { .. })));
    }
}
