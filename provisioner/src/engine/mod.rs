//! The provisioning engine.
//!
//! One blocking call per request: [`ProvisioningEngine::provision`]
//! creates and seeds the requested profiles, [`ProvisioningEngine::clean`]
//! drops their databases. Unknown profile keys are rejected eagerly,
//! before any connection is opened. A profile-level failure is captured
//! into that profile's report entry and the remaining profiles still run.
//!
//! The engine assumes exactly one invocation in flight against a given
//! database at a time; callers wanting background execution wrap the call
//! themselves.

pub mod admin;
pub mod ddl;
pub mod loader;
pub mod values;

use std::path::PathBuf;

use postgres::NoTls;
use profile_catalog::{Catalog, CatalogError, DatabaseProfile, LoadPlan};
use tracing::{debug, info};

use crate::error::ProvisionError;
use crate::report::{
    CleanOutcome, CleanReport, ProfileCleanReport, ProfileOutcome, ProfileReport, ProfileStage,
    ProvisionReport,
};
use crate::settings::ConnectionSettings;

use admin::MaintenanceClient;

/// Provisions and cleans catalogued teaching databases.
#[derive(Debug, Clone)]
pub struct ProvisioningEngine {
    settings: ConnectionSettings,
    fixtures_root: PathBuf,
}

impl ProvisioningEngine {
    /// Create an engine with explicit settings and a fixtures root
    /// directory (profiles name subdirectories beneath it).
    #[must_use]
    pub fn new(settings: ConnectionSettings, fixtures_root: PathBuf) -> Self {
        Self {
            settings,
            fixtures_root,
        }
    }

    /// Provision the requested profiles (all of them when `keys` is
    /// empty).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when a requested key does not exist;
    /// this is validated before any database I/O. All other failures are
    /// captured into the returned report.
    pub fn provision(
        &self,
        catalog: &Catalog,
        keys: &[String],
    ) -> Result<ProvisionReport, CatalogError> {
        let profiles = catalog.resolve(keys)?;
        let mut reports = Vec::with_capacity(profiles.len());
        for profile in profiles {
            reports.push(self.provision_profile(profile));
        }
        Ok(ProvisionReport { profiles: reports })
    }

    /// Drop the requested profiles' databases (all of them when `keys`
    /// is empty).
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when a requested key does not exist.
    pub fn clean(&self, catalog: &Catalog, keys: &[String]) -> Result<CleanReport, CatalogError> {
        let profiles = catalog.resolve(keys)?;
        let mut reports = Vec::with_capacity(profiles.len());
        for profile in profiles {
            reports.push(ProfileCleanReport {
                profile: profile.key().to_owned(),
                database: profile.database_name().to_owned(),
                outcome: self.clean_profile(profile),
            });
        }
        Ok(CleanReport { profiles: reports })
    }

    fn provision_profile(&self, profile: &DatabaseProfile) -> ProfileReport {
        info!(
            profile = profile.key(),
            database = profile.database_name(),
            "provisioning profile"
        );

        let failed = |stage, error: &dyn std::fmt::Display| ProfileReport {
            profile: profile.key().to_owned(),
            database: profile.database_name().to_owned(),
            outcome: ProfileOutcome::Failed {
                stage,
                message: error.to_string(),
            },
            entities: Vec::new(),
        };

        // Resolve the load order first: configuration errors must surface
        // before any database I/O for the profile.
        let plan = match LoadPlan::resolve(profile) {
            Ok(plan) => plan,
            Err(error) => return failed(ProfileStage::Plan, &error),
        };
        info!(
            profile = profile.key(),
            order = plan.entity_names().join(", "),
            "load order resolved"
        );

        if let Err(error) = self.ensure_database(profile.database_name()) {
            return failed(ProfileStage::CreateDatabase, &error);
        }

        let mut client = match self.connect(profile.database_name()) {
            Ok(client) => client,
            Err(error) => return failed(ProfileStage::Connect, &error),
        };

        if let Err(error) = reset_tables(&mut client, profile, &plan) {
            return failed(ProfileStage::Schema, &error);
        }
        info!(profile = profile.key(), "tables created");

        let fixture_dir = self.fixtures_root.join(profile.fixture_dir());
        let mut entities = Vec::with_capacity(plan.entity_names().len());
        for name in plan.entity_names() {
            let Some(entity) = profile.entity(name) else {
                continue;
            };
            let mut report = loader::load_entity(&mut client, entity, &fixture_dir);
            report.rows_after = count_rows(&mut client, name).ok();
            entities.push(report);
        }

        // Client drops here, closing the connection whatever happened.
        ProfileReport {
            profile: profile.key().to_owned(),
            database: profile.database_name().to_owned(),
            outcome: ProfileOutcome::Provisioned,
            entities,
        }
    }

    /// Create the target database when the catalog has no entry for it.
    ///
    /// The maintenance connection lives only for this call and is closed
    /// on every path, including failure part-way through.
    fn ensure_database(&self, database: &str) -> Result<(), ProvisionError> {
        let mut maintenance = MaintenanceClient::connect(&self.settings)?;
        if maintenance.database_exists(database)? {
            info!(database, "database already exists");
        } else {
            maintenance.create_database(database)?;
        }
        Ok(())
    }

    fn connect(&self, database: &str) -> Result<postgres::Client, ProvisionError> {
        let client = self
            .settings
            .client_config(database)
            .connect(NoTls)
            .map_err(|error| ProvisionError::Connection {
                context: format!(
                    "database '{database}' at {}:{}",
                    self.settings.host(),
                    self.settings.port()
                ),
                message: error.to_string(),
            })?;
        debug!(database, "connected to target database");
        Ok(client)
    }

    fn clean_profile(&self, profile: &DatabaseProfile) -> CleanOutcome {
        let database = profile.database_name();
        let mut maintenance = match MaintenanceClient::connect(&self.settings) {
            Ok(client) => client,
            Err(error) => {
                return CleanOutcome::Failed {
                    message: error.to_string(),
                };
            }
        };

        match maintenance.database_exists(database) {
            Ok(false) => {
                info!(database, "database does not exist, nothing to clean");
                CleanOutcome::DidNotExist
            }
            Ok(true) => {
                let dropped = maintenance
                    .terminate_sessions(database)
                    .and_then(|_| maintenance.drop_database(database));
                match dropped {
                    Ok(()) => CleanOutcome::Dropped,
                    Err(error) => CleanOutcome::Failed {
                        message: error.to_string(),
                    },
                }
            }
            Err(error) => CleanOutcome::Failed {
                message: error.to_string(),
            },
        }
    }
}

/// Drop all of the profile's tables (children first) and recreate them
/// in load order.
fn reset_tables(
    client: &mut postgres::Client,
    profile: &DatabaseProfile,
    plan: &LoadPlan,
) -> Result<(), ProvisionError> {
    for table in plan.reversed() {
        client
            .batch_execute(&ddl::drop_table_sql(table))
            .map_err(|error| schema_error(table, error))?;
    }
    for name in plan.entity_names() {
        let Some(entity) = profile.entity(name) else {
            continue;
        };
        client
            .batch_execute(&ddl::create_table_sql(entity))
            .map_err(|error| schema_error(name, error))?;
    }
    Ok(())
}

fn schema_error(table: &str, error: postgres::Error) -> ProvisionError {
    ProvisionError::Schema {
        table: table.to_owned(),
        message: error.to_string(),
    }
}

fn count_rows(client: &mut postgres::Client, table: &str) -> Result<i64, postgres::Error> {
    let sql = format!("SELECT count(*) FROM {}", ddl::quote_ident(table));
    let row = client.query_one(sql.as_str(), &[])?;
    Ok(row.get(0))
}
