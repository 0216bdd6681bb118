//! DDL generation from entity definitions.
//!
//! Every entity becomes one table with an implicit `id SERIAL PRIMARY
//! KEY`. Provisioning is a reset: tables are dropped (children first, via
//! the reversed load plan) and recreated on every run.

use profile_catalog::{EntityDefinition, FieldDef, FieldType, PRIMARY_KEY_COLUMN};

/// Quote a SQL identifier, doubling embedded quotes.
#[must_use]
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Render the `CREATE TABLE` statement for an entity.
#[must_use]
pub fn create_table_sql(entity: &EntityDefinition) -> String {
    let mut clauses = Vec::with_capacity(entity.fields().len() + 1);
    clauses.push(format!(
        "{} SERIAL PRIMARY KEY",
        quote_ident(PRIMARY_KEY_COLUMN)
    ));
    for field in entity.fields() {
        clauses.push(column_sql(field));
    }
    for constraint in entity.unique_constraints() {
        let columns: Vec<String> = constraint.iter().map(|c| quote_ident(c)).collect();
        clauses.push(format!("UNIQUE ({})", columns.join(", ")));
    }
    format!(
        "CREATE TABLE {} ({})",
        quote_ident(entity.name()),
        clauses.join(", ")
    )
}

/// Render the `DROP TABLE` statement for a table name.
///
/// `CASCADE` keeps the reset robust if a previous run left the schema in
/// a partial state.
#[must_use]
pub fn drop_table_sql(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {} CASCADE", quote_ident(table))
}

fn column_sql(field: &FieldDef) -> String {
    let mut sql = format!("{} {}", quote_ident(field.name()), sql_type(field.field_type()));
    if let FieldType::Reference { entity } = field.field_type() {
        sql.push_str(&format!(
            " REFERENCES {} ({})",
            quote_ident(entity),
            quote_ident(PRIMARY_KEY_COLUMN)
        ));
    }
    if !field.is_nullable() {
        sql.push_str(" NOT NULL");
    }
    if field.is_unique() {
        sql.push_str(" UNIQUE");
    }
    if let Some(literal) = field.default_literal() {
        sql.push_str(&format!(" DEFAULT {literal}"));
    }
    sql
}

fn sql_type(field_type: &FieldType) -> String {
    match field_type {
        FieldType::Text {
            max_length: Some(length),
        } => format!("VARCHAR({length})"),
        FieldType::Text { max_length: None } => "TEXT".to_owned(),
        FieldType::Integer | FieldType::Reference { .. } => "INTEGER".to_owned(),
        FieldType::Float => "DOUBLE PRECISION".to_owned(),
        FieldType::Boolean => "BOOLEAN".to_owned(),
        FieldType::Date => "DATE".to_owned(),
        FieldType::Timestamp => "TIMESTAMP".to_owned(),
        FieldType::Decimal { precision, scale } => format!("NUMERIC({precision}, {scale})"),
    }
}
