//! Maintenance-database administration.
//!
//! Databases cannot be created or dropped from a connection into
//! themselves, so these operations run against the server's maintenance
//! database. The client is scoped to one profile step and dropped
//! unconditionally when the step ends, success or failure.

use postgres::NoTls;
use tracing::{debug, info};

use crate::engine::ddl::quote_ident;
use crate::error::ProvisionError;
use crate::settings::ConnectionSettings;

/// A client connected to the server's maintenance database.
pub struct MaintenanceClient {
    client: postgres::Client,
}

impl MaintenanceClient {
    /// Connect to the maintenance database.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::Connection`] when the server cannot be
    /// reached or authentication fails.
    pub fn connect(settings: &ConnectionSettings) -> Result<Self, ProvisionError> {
        let client = settings.maintenance_config().connect(NoTls).map_err(|error| {
            ProvisionError::Connection {
                context: format!(
                    "maintenance database at {}:{}",
                    settings.host(),
                    settings.port()
                ),
                message: error.to_string(),
            }
        })?;
        debug!(
            host = settings.host(),
            port = settings.port(),
            "connected to maintenance database"
        );
        Ok(Self { client })
    }

    /// Whether a database with this name exists on the server.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::Admin`] when the catalog query fails.
    pub fn database_exists(&mut self, database: &str) -> Result<bool, ProvisionError> {
        let row = self
            .client
            .query_opt(
                "SELECT 1 FROM pg_catalog.pg_database WHERE datname = $1",
                &[&database],
            )
            .map_err(|error| admin_error(database, error))?;
        Ok(row.is_some())
    }

    /// Create the database.
    ///
    /// `CREATE DATABASE` cannot run inside a transaction block; the
    /// statement executes directly on the session.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::Admin`] when creation fails (for
    /// example, insufficient privileges).
    pub fn create_database(&mut self, database: &str) -> Result<(), ProvisionError> {
        self.client
            .batch_execute(&format!("CREATE DATABASE {}", quote_ident(database)))
            .map_err(|error| admin_error(database, error))?;
        info!(database, "database created");
        Ok(())
    }

    /// Terminate every other session connected to the database, so a
    /// following drop is not blocked by active connections.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::Admin`] when the termination query
    /// fails.
    pub fn terminate_sessions(&mut self, database: &str) -> Result<usize, ProvisionError> {
        let rows = self
            .client
            .query(
                "SELECT pg_terminate_backend(pid) FROM pg_stat_activity \
                 WHERE datname = $1 AND pid <> pg_backend_pid()",
                &[&database],
            )
            .map_err(|error| admin_error(database, error))?;
        if !rows.is_empty() {
            debug!(database, sessions = rows.len(), "terminated active sessions");
        }
        Ok(rows.len())
    }

    /// Drop the database.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::Admin`] when the drop fails.
    pub fn drop_database(&mut self, database: &str) -> Result<(), ProvisionError> {
        self.client
            .batch_execute(&format!("DROP DATABASE {}", quote_ident(database)))
            .map_err(|error| admin_error(database, error))?;
        info!(database, "database dropped");
        Ok(())
    }
}

fn admin_error(database: &str, error: postgres::Error) -> ProvisionError {
    ProvisionError::Admin {
        database: database.to_owned(),
        message: error.to_string(),
    }
}
