//! Profile catalogue and lookup.
//!
//! A [`DatabaseProfile`] is one named teaching database: its target
//! database name, description, fixture directory, and entity set. The
//! [`Catalog`] holds the ordered profile set and validates requested keys
//! eagerly, before any database connection is opened.

use crate::entity::EntityDefinition;
use crate::error::CatalogError;

/// Static descriptor for one teaching database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseProfile {
    key: String,
    database_name: String,
    description: String,
    fixture_dir: String,
    entities: Vec<EntityDefinition>,
}

impl DatabaseProfile {
    /// Create a profile descriptor.
    pub fn new(
        key: impl Into<String>,
        database_name: impl Into<String>,
        description: impl Into<String>,
        fixture_dir: impl Into<String>,
        entities: Vec<EntityDefinition>,
    ) -> Self {
        Self {
            key: key.into(),
            database_name: database_name.into(),
            description: description.into(),
            fixture_dir: fixture_dir.into(),
            entities,
        }
    }

    /// Returns the catalogue key used to request this profile.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the name of the database to create on the server.
    #[must_use]
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Returns the human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the fixture directory name, relative to the fixtures root.
    #[must_use]
    pub fn fixture_dir(&self) -> &str {
        &self.fixture_dir
    }

    /// Returns the entity definitions in declaration order.
    #[must_use]
    pub fn entities(&self) -> &[EntityDefinition] {
        &self.entities
    }

    /// Look up an entity by table name.
    #[must_use]
    pub fn entity(&self, name: &str) -> Option<&EntityDefinition> {
        self.entities.iter().find(|entity| entity.name() == name)
    }
}

/// Ordered set of the profiles this tool can provision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    profiles: Vec<DatabaseProfile>,
}

impl Catalog {
    /// Create a catalogue from an explicit profile list.
    #[must_use]
    pub fn new(profiles: Vec<DatabaseProfile>) -> Self {
        Self { profiles }
    }

    /// The catalogue of profiles shipped with this tool.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(crate::builtin::profiles())
    }

    /// Returns every profile in catalogue order.
    #[must_use]
    pub fn profiles(&self) -> &[DatabaseProfile] {
        &self.profiles
    }

    /// Look up a profile by key.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownProfile`] when no profile carries
    /// the requested key.
    pub fn profile(&self, key: &str) -> Result<&DatabaseProfile, CatalogError> {
        self.profiles
            .iter()
            .find(|profile| profile.key() == key)
            .ok_or_else(|| CatalogError::UnknownProfile {
                key: key.to_owned(),
            })
    }

    /// Resolve a requested key set into profiles, validating every key
    /// before any work starts.
    ///
    /// An empty request selects the whole catalogue. Duplicate keys are
    /// collapsed; the first occurrence decides the order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownProfile`] for the first key that
    /// does not exist in the catalogue.
    pub fn resolve(&self, keys: &[String]) -> Result<Vec<&DatabaseProfile>, CatalogError> {
        if keys.is_empty() {
            return Ok(self.profiles.iter().collect());
        }

        let mut selected: Vec<&DatabaseProfile> = Vec::with_capacity(keys.len());
        for key in keys {
            let profile = self.profile(key)?;
            if !selected.iter().any(|chosen| chosen.key() == profile.key()) {
                selected.push(profile);
            }
        }
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::entity::FieldDef;

    fn two_profile_catalog() -> Catalog {
        Catalog::new(vec![
            DatabaseProfile::new(
                "alpha",
                "alpha_db",
                "First profile",
                "alpha",
                vec![EntityDefinition::new(
                    "things",
                    vec![FieldDef::text("name", 50)],
                )],
            ),
            DatabaseProfile::new(
                "beta",
                "beta_db",
                "Second profile",
                "beta",
                vec![EntityDefinition::new(
                    "widgets",
                    vec![FieldDef::text("name", 50)],
                )],
            ),
        ])
    }

    #[test]
    fn profile_lookup_finds_known_key() {
        let catalog = two_profile_catalog();
        let profile = catalog.profile("beta").expect("profile exists");

        assert_eq!(profile.database_name(), "beta_db");
    }

    #[test]
    fn profile_lookup_rejects_unknown_key() {
        let catalog = two_profile_catalog();

        assert_eq!(
            catalog.profile("gamma"),
            Err(CatalogError::UnknownProfile {
                key: "gamma".to_owned()
            })
        );
    }

    #[test]
    fn empty_request_selects_all_profiles() {
        let catalog = two_profile_catalog();
        let selected = catalog.resolve(&[]).expect("resolve all");

        let keys: Vec<&str> = selected.iter().map(|p| p.key()).collect();
        assert_eq!(keys, vec!["alpha", "beta"]);
    }

    #[test]
    fn resolve_preserves_request_order_and_dedupes() {
        let catalog = two_profile_catalog();
        let request = vec!["beta".to_owned(), "alpha".to_owned(), "beta".to_owned()];
        let selected = catalog.resolve(&request).expect("resolve");

        let keys: Vec<&str> = selected.iter().map(|p| p.key()).collect();
        assert_eq!(keys, vec!["beta", "alpha"]);
    }

    #[rstest]
    #[case::first_key(vec!["gamma".to_owned()])]
    #[case::after_valid_key(vec!["alpha".to_owned(), "gamma".to_owned()])]
    fn resolve_fails_eagerly_on_unknown_key(#[case] request: Vec<String>) {
        let catalog = two_profile_catalog();

        assert_eq!(
            catalog.resolve(&request),
            Err(CatalogError::UnknownProfile {
                key: "gamma".to_owned()
            })
        );
    }

    #[test]
    fn entity_lookup_by_table_name() {
        let catalog = two_profile_catalog();
        let profile = catalog.profile("alpha").expect("profile exists");

        assert!(profile.entity("things").is_some());
        assert!(profile.entity("widgets").is_none());
    }
}
