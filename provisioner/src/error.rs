//! Error taxonomy for the provisioning engine.
//!
//! Only profile-level failures become [`ProvisionError`]: connection and
//! administration failures, schema (DDL) failures, and configuration
//! errors from the catalogue. Record-level insert failures and fixture
//! file problems never propagate this far; they are captured into the
//! report by the fixture loader.

use profile_catalog::CatalogError;
use thiserror::Error;

/// A failure that aborts provisioning of one profile.
///
/// Sibling profiles in the same request still run; the orchestrator
/// captures this error into the profile's report entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisionError {
    /// The server could not be reached or authenticated against.
    #[error("connection failed ({context}): {message}")]
    Connection {
        /// What was being connected to (host, database).
        context: String,
        /// Underlying driver error text.
        message: String,
    },

    /// A create/drop/existence-check on the maintenance database failed.
    #[error("database administration failed for '{database}': {message}")]
    Admin {
        /// Database the operation targeted.
        database: String,
        /// Underlying driver error text.
        message: String,
    },

    /// A table drop or creation failed.
    #[error("schema operation failed for table '{table}': {message}")]
    Schema {
        /// Table the DDL statement targeted.
        table: String,
        /// Underlying driver error text.
        message: String,
    },

    /// The catalogue rejected the request (unknown profile, bad graph).
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_error_formats_correctly() {
        let err = ProvisionError::Connection {
            context: "maintenance database at localhost:5432".to_owned(),
            message: "connection refused".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "connection failed (maintenance database at localhost:5432): connection refused"
        );
    }

    #[test]
    fn admin_error_formats_correctly() {
        let err = ProvisionError::Admin {
            database: "school_world".to_owned(),
            message: "permission denied to create database".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "database administration failed for 'school_world': permission denied to create database"
        );
    }

    #[test]
    fn schema_error_formats_correctly() {
        let err = ProvisionError::Schema {
            table: "students".to_owned(),
            message: "type mismatch".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "schema operation failed for table 'students': type mismatch"
        );
    }

    #[test]
    fn catalog_errors_pass_through() {
        let err = ProvisionError::from(CatalogError::UnknownProfile {
            key: "space_travel".to_owned(),
        });
        assert_eq!(err.to_string(), "unknown profile 'space_travel'");
    }
}
