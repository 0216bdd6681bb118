//! Error types for the profile-catalog crate.
//!
//! Catalogue lookups and load-order resolution surface [`CatalogError`];
//! fixture file reading and parsing surface [`FixtureError`]. Both follow
//! the project's error conventions with `thiserror`.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by catalogue lookups and load-order resolution.
///
/// These are configuration errors: they are detected before any database
/// I/O is attempted for the affected profile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The requested profile key does not exist in the catalogue.
    #[error("unknown profile '{key}'")]
    UnknownProfile {
        /// The profile key that was requested.
        key: String,
    },

    /// Load-order resolution revisited an entity that was still being
    /// resolved, which means the reference graph contains a cycle.
    #[error("dependency cycle detected at entity '{entity}'")]
    DependencyCycle {
        /// Entity at which the cycle was detected.
        entity: String,
    },

    /// An entity declares a reference to an entity that is not part of
    /// the same profile.
    #[error("entity '{entity}' references unknown entity '{referenced}'")]
    UnknownReference {
        /// Entity declaring the reference.
        entity: String,
        /// The referenced entity name that could not be found.
        referenced: String,
    },
}

/// Errors raised while reading or parsing a fixture file.
///
/// A missing fixture file is deliberately *not* an error; see
/// [`crate::FixtureDocument::load`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixtureError {
    /// The fixture file exists but could not be read.
    #[error("failed to read fixture file '{path}': {message}")]
    Io {
        /// Path to the fixture file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The fixture file is not valid JSON.
    #[error("invalid JSON in fixture file '{path}': {message}")]
    Parse {
        /// Path to the fixture file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// The fixture document's root is not a JSON array.
    #[error("fixture file '{path}' must contain a JSON array of objects")]
    NotAnArray {
        /// Path to the fixture file.
        path: PathBuf,
    },

    /// An element of the fixture array is not a JSON object.
    #[error("record {index} in fixture file '{path}' is not a JSON object")]
    RecordNotObject {
        /// Path to the fixture file.
        path: PathBuf,
        /// Zero-based index of the offending element.
        index: usize,
    },

    /// A record field holds a nested array or object, which has no
    /// column representation.
    #[error("record {index} in fixture file '{path}' has unsupported nested value in field '{field}'")]
    UnsupportedValue {
        /// Path to the fixture file.
        path: PathBuf,
        /// Zero-based index of the offending record.
        index: usize,
        /// Field holding the nested value.
        field: String,
    },
}
