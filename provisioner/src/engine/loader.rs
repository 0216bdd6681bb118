//! Per-record fixture loading.
//!
//! The central design decision of the whole tool lives here: every record
//! is inserted in its own transaction, so teaching datasets full of
//! duplicates and dangling references load as far as they can, and every
//! failure is classified and counted instead of aborting the table.

use std::path::Path;

use postgres::error::SqlState;
use profile_catalog::{EntityDefinition, FixtureDocument, FixtureRecord};
use tracing::{debug, warn};

use crate::engine::ddl::quote_ident;
use crate::engine::values::{SqlValue, bind_value};
use crate::report::{EntityReport, FixtureStatus, InsertErrorKind};

/// Load one entity's fixture file into its table.
///
/// Never fails: fixture problems and per-record insert failures are all
/// captured into the returned report.
pub fn load_entity(
    client: &mut postgres::Client,
    entity: &EntityDefinition,
    fixture_dir: &Path,
) -> EntityReport {
    let records = match FixtureDocument::load(fixture_dir, entity.name()) {
        Ok(FixtureDocument::Missing) => {
            warn!(entity = entity.name(), "no fixture file, skipping");
            return EntityReport::new(entity.name(), FixtureStatus::Missing);
        }
        Ok(FixtureDocument::Records(records)) => records,
        Err(error) => {
            warn!(entity = entity.name(), %error, "fixture file unusable");
            return EntityReport::new(entity.name(), FixtureStatus::Malformed(error.to_string()));
        }
    };

    if records.is_empty() {
        return EntityReport::new(entity.name(), FixtureStatus::Empty);
    }

    let mut report = EntityReport::new(entity.name(), FixtureStatus::Loaded);
    report.attempted = records.len();

    for (index, record) in records.iter().enumerate() {
        match insert_record(client, entity, record) {
            Ok(()) => report.inserted += 1,
            Err(failure) => {
                debug!(
                    entity = entity.name(),
                    record = index + 1,
                    kind = ?failure.kind,
                    message = %failure.message,
                    "record skipped"
                );
                report.record_failure(failure.kind, failure.message);
            }
        }
    }

    report
}

struct InsertFailure {
    kind: InsertErrorKind,
    message: String,
}

/// Insert one record inside its own transaction.
fn insert_record(
    client: &mut postgres::Client,
    entity: &EntityDefinition,
    record: &FixtureRecord,
) -> Result<(), InsertFailure> {
    let (sql, params) = build_insert(entity, record).map_err(|error| InsertFailure {
        kind: InsertErrorKind::Other,
        message: error,
    })?;

    let mut transaction = client.transaction().map_err(classify)?;
    let borrowed: Vec<&(dyn postgres::types::ToSql + Sync)> = params
        .iter()
        .map(|value| value as &(dyn postgres::types::ToSql + Sync))
        .collect();
    transaction.execute(sql.as_str(), &borrowed).map_err(classify)?;
    transaction.commit().map_err(classify)?;
    Ok(())
}

/// Build the insert statement and parameters from the record's own keys.
///
/// Undeclared keys are passed through so the server itself reports the
/// unknown column; a record with no fields falls back to default values.
fn build_insert(
    entity: &EntityDefinition,
    record: &FixtureRecord,
) -> Result<(String, Vec<SqlValue>), String> {
    if record.fields().is_empty() {
        return Ok((
            format!("INSERT INTO {} DEFAULT VALUES", quote_ident(entity.name())),
            Vec::new(),
        ));
    }

    let mut columns = Vec::with_capacity(record.fields().len());
    let mut placeholders = Vec::with_capacity(record.fields().len());
    let mut params = Vec::with_capacity(record.fields().len());

    for (position, (name, value)) in record.fields().iter().enumerate() {
        let bound =
            bind_value(name, entity.field_type(name), value).map_err(|error| error.to_string())?;
        columns.push(quote_ident(name));
        let index = position + 1;
        placeholders.push(match bound.cast {
            Some(cast) => format!("${index}{cast}"),
            None => format!("${index}"),
        });
        params.push(bound.value);
    }

    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(entity.name()),
        columns.join(", "),
        placeholders.join(", ")
    );
    Ok((sql, params))
}

fn classify(error: postgres::Error) -> InsertFailure {
    if let Some(db_error) = error.as_db_error() {
        let kind = if db_error.code() == &SqlState::UNIQUE_VIOLATION {
            InsertErrorKind::Duplicate
        } else if db_error.code() == &SqlState::FOREIGN_KEY_VIOLATION {
            InsertErrorKind::ReferenceViolation
        } else {
            classify_message(db_error.message())
        };
        return InsertFailure {
            kind,
            message: db_error.message().to_owned(),
        };
    }
    let message = error.to_string();
    InsertFailure {
        kind: classify_message(&message),
        message,
    }
}

/// Text-based fallback classification for errors without a SQLSTATE.
fn classify_message(message: &str) -> InsertErrorKind {
    let lowered = message.to_ascii_lowercase();
    if lowered.contains("duplicate key") || lowered.contains("unique constraint") {
        InsertErrorKind::Duplicate
    } else if lowered.contains("foreign key") {
        InsertErrorKind::ReferenceViolation
    } else {
        InsertErrorKind::Other
    }
}
