//! Static catalogue of teaching-database profiles.
//!
//! This crate is the pure-data half of the provisioner: it describes the
//! shipped database profiles (entities, typed fields, foreign-key edges),
//! computes a safe fixture load order from those edges, and parses JSON
//! fixture files into typed records with date coercion. It performs no
//! database I/O; the `provisioner` crate consumes these types to drive an
//! actual PostgreSQL server.

mod builtin;
mod catalog;
mod entity;
mod error;
mod fixture;
mod plan;

pub use catalog::{Catalog, DatabaseProfile};
pub use entity::{EntityDefinition, FieldDef, FieldType, PRIMARY_KEY_COLUMN};
pub use error::{CatalogError, FixtureError};
pub use fixture::{FixtureDocument, FixtureRecord, FixtureValue};
pub use plan::LoadPlan;
