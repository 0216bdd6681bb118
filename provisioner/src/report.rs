//! Structured provisioning and clean reports.
//!
//! The engine's public contract is a blocking call returning one of these
//! reports. Counters and error samples are structured fields so callers
//! and tests can assert on them directly; the text renderers exist only
//! for console consumption.

use serde::Serialize;

use crate::settings::ConnectionSettings;

/// Number of error messages kept per entity for diagnostics.
pub const MAX_SAMPLE_ERRORS: usize = 5;

/// Classification of one failed record insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertErrorKind {
    /// Unique-constraint conflict; expected in teaching datasets.
    Duplicate,
    /// Foreign-key violation, usually a dangling reference.
    ReferenceViolation,
    /// Any other failure; the raw message is retained.
    Other,
}

/// What became of an entity's fixture file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "detail")]
pub enum FixtureStatus {
    /// The file existed and parsed to at least one record.
    Loaded,
    /// No fixture file exists for the entity.
    Missing,
    /// The file parsed to an empty array.
    Empty,
    /// The file could not be read or parsed; non-fatal, the entity is
    /// simply left unseeded.
    Malformed(String),
}

/// Per-entity load counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityReport {
    /// Table name.
    pub entity: String,
    /// Outcome for the entity's fixture file.
    pub fixture: FixtureStatus,
    /// Records read from the fixture file.
    pub attempted: usize,
    /// Records inserted successfully.
    pub inserted: usize,
    /// Records skipped as duplicates.
    pub duplicates: usize,
    /// Records rejected for dangling references.
    pub reference_errors: usize,
    /// Records that failed for any other reason.
    pub other_errors: usize,
    /// First few raw error messages, for diagnostics.
    pub sample_errors: Vec<String>,
    /// Row count queried after the load, when available.
    pub rows_after: Option<i64>,
}

impl EntityReport {
    /// Create an empty report for `entity`.
    #[must_use]
    pub fn new(entity: impl Into<String>, fixture: FixtureStatus) -> Self {
        Self {
            entity: entity.into(),
            fixture,
            attempted: 0,
            inserted: 0,
            duplicates: 0,
            reference_errors: 0,
            other_errors: 0,
            sample_errors: Vec::new(),
            rows_after: None,
        }
    }

    /// Count one failed insert, keeping the first few messages.
    pub fn record_failure(&mut self, kind: InsertErrorKind, message: String) {
        match kind {
            InsertErrorKind::Duplicate => self.duplicates += 1,
            InsertErrorKind::ReferenceViolation => self.reference_errors += 1,
            InsertErrorKind::Other => self.other_errors += 1,
        }
        if self.sample_errors.len() < MAX_SAMPLE_ERRORS {
            self.sample_errors.push(message);
        }
    }

    /// Total failed records across all classifications.
    #[must_use]
    pub const fn failed(&self) -> usize {
        self.duplicates + self.reference_errors + self.other_errors
    }
}

/// Stage at which a profile-level failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStage {
    /// Load-order resolution (configuration error).
    Plan,
    /// Creating or checking the database on the maintenance connection.
    CreateDatabase,
    /// Connecting to the target database.
    Connect,
    /// Dropping and recreating tables.
    Schema,
}

/// Outcome of provisioning one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum ProfileOutcome {
    /// The database was created (or found) and its tables reloaded.
    Provisioned,
    /// Provisioning aborted at `stage`; sibling profiles still ran.
    Failed {
        /// Stage at which the failure occurred.
        stage: ProfileStage,
        /// Underlying error text.
        message: String,
    },
}

/// Provisioning results for one profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileReport {
    /// Profile key.
    pub profile: String,
    /// Target database name.
    pub database: String,
    /// Profile-level outcome.
    pub outcome: ProfileOutcome,
    /// Per-entity load reports, in load order.
    pub entities: Vec<EntityReport>,
}

impl ProfileReport {
    /// Whether this profile was fully provisioned.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self.outcome, ProfileOutcome::Provisioned)
    }
}

/// Results for a whole provisioning request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProvisionReport {
    /// Per-profile reports, in request order.
    pub profiles: Vec<ProfileReport>,
}

impl ProvisionReport {
    /// Whether every requested profile was provisioned.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.profiles.iter().all(ProfileReport::succeeded)
    }

    /// Render a console summary, with a psql hint per provisioned
    /// database.
    #[must_use]
    pub fn render(&self, settings: &ConnectionSettings) -> String {
        let mut out = String::new();
        for profile in &self.profiles {
            out.push_str(&format!(
                "profile {} (database {})\n",
                profile.profile, profile.database
            ));
            match &profile.outcome {
                ProfileOutcome::Provisioned => {
                    for entity in &profile.entities {
                        out.push_str(&render_entity_line(entity));
                    }
                }
                ProfileOutcome::Failed { stage, message } => {
                    out.push_str(&format!("  failed ({stage:?}): {message}\n"));
                }
            }
        }

        let provisioned: Vec<&ProfileReport> =
            self.profiles.iter().filter(|p| p.succeeded()).collect();
        out.push_str(&format!(
            "\nprovisioned {} of {} profiles\n",
            provisioned.len(),
            self.profiles.len()
        ));
        for profile in provisioned {
            out.push_str(&format!(
                "  psql -h {} -p {} -U {} -d {}\n",
                settings.host(),
                settings.port(),
                settings.user(),
                profile.database
            ));
        }
        out
    }
}

fn render_entity_line(entity: &EntityReport) -> String {
    let note = match &entity.fixture {
        FixtureStatus::Missing => " (no fixture file)",
        FixtureStatus::Empty => " (empty fixture)",
        FixtureStatus::Malformed(_) => " (fixture unreadable)",
        FixtureStatus::Loaded => "",
    };
    format!(
        "  {}: attempted {}, inserted {}, duplicates {}, reference errors {}, other errors {}{note}\n",
        entity.entity,
        entity.attempted,
        entity.inserted,
        entity.duplicates,
        entity.reference_errors,
        entity.other_errors,
    )
}

/// Outcome of cleaning one profile's database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum CleanOutcome {
    /// The database existed and was dropped.
    Dropped,
    /// The database did not exist; nothing to do.
    DidNotExist,
    /// The drop (or a step before it) failed.
    Failed {
        /// Underlying error text.
        message: String,
    },
}

/// Clean results for one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileCleanReport {
    /// Profile key.
    pub profile: String,
    /// Target database name.
    pub database: String,
    /// Per-profile clean outcome.
    pub outcome: CleanOutcome,
}

/// Results for a whole clean request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    /// Per-profile reports, in request order.
    pub profiles: Vec<ProfileCleanReport>,
}

impl CleanReport {
    /// Whether no profile reported a failure.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.profiles
            .iter()
            .all(|profile| !matches!(profile.outcome, CleanOutcome::Failed { .. }))
    }

    /// Render a console summary.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for profile in &self.profiles {
            let line = match &profile.outcome {
                CleanOutcome::Dropped => format!("{}: dropped\n", profile.database),
                CleanOutcome::DidNotExist => {
                    format!("{}: did not exist\n", profile.database)
                }
                CleanOutcome::Failed { message } => {
                    format!("{}: failed: {message}\n", profile.database)
                }
            };
            out.push_str(&line);
        }
        out
    }
}
