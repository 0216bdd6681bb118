//! Connection settings for the PostgreSQL server.
//!
//! Settings are read from a small JSON file (`postgres.json` by
//! convention) holding `user`, `password`, `host`, and `port`. They are
//! passed explicitly into the engine at call time; there is no ambient
//! process-wide configuration state.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// Errors raised while loading a settings file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings file '{path}': {message}")]
    Io {
        /// Path to the settings file.
        path: std::path::PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The settings file is not valid JSON or misses a required field.
    #[error("invalid settings file '{path}': {message}")]
    Parse {
        /// Path to the settings file.
        path: std::path::PathBuf,
        /// Description of the parse error.
        message: String,
    },
}

/// Connection parameters for one PostgreSQL server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionSettings {
    host: String,
    port: u16,
    user: String,
    password: String,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            host: "localhost".to_owned(),
            port: 5432,
            user: "postgres".to_owned(),
            password: String::new(),
        }
    }
}

impl ConnectionSettings {
    /// Conventional settings file name, looked up in the working directory.
    pub const DEFAULT_FILE: &'static str = "postgres.json";

    /// The always-present administrative database used to create and drop
    /// other databases.
    pub const MAINTENANCE_DATABASE: &'static str = "postgres";

    /// Load settings from a JSON file.
    ///
    /// All four fields (`user`, `password`, `host`, `port`) are required.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|error| SettingsError::Io {
            path: path.to_path_buf(),
            message: error.to_string(),
        })?;
        serde_json::from_str(&contents).map_err(|error| SettingsError::Parse {
            path: path.to_path_buf(),
            message: error.to_string(),
        })
    }

    /// Load settings from the conventional file, falling back to defaults
    /// when it does not exist or cannot be parsed.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            warn!(path = %path.display(), "settings file not found, using defaults");
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(settings) => settings,
            Err(error) => {
                warn!(%error, "settings file unusable, using defaults");
                Self::default()
            }
        }
    }

    /// Returns the server host name.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the server port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Returns the connecting user.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Build a client configuration scoped to `database`.
    #[must_use]
    pub fn client_config(&self, database: &str) -> postgres::Config {
        let mut config = postgres::Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .user(&self.user)
            .password(&self.password)
            .dbname(database);
        config
    }

    /// Build a client configuration for the maintenance database.
    #[must_use]
    pub fn maintenance_config(&self) -> postgres::Config {
        self.client_config(Self::MAINTENANCE_DATABASE)
    }

    /// Render the settings with the password masked.
    #[must_use]
    pub fn display_safe(&self) -> String {
        format!(
            "host: {}\nport: {}\nuser: {}\npassword: ***",
            self.host, self.port, self.user
        )
    }
}
