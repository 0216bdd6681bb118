//! Load-order planning.
//!
//! The fixture loader must populate referenced tables before the tables
//! that reference them. [`LoadPlan::resolve`] derives that order from the
//! explicit reference edges with a post-order depth-first traversal. The
//! shipped profiles are acyclic by construction, but resolution still
//! tracks an in-progress marker per entity so that a mis-authored cycle
//! fails fast with a configuration error instead of recursing forever.

use std::collections::BTreeMap;

use crate::catalog::DatabaseProfile;
use crate::entity::EntityDefinition;
use crate::error::CatalogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    InProgress,
    Done,
}

/// Ordered sequence of entity names safe for fixture loading.
///
/// Every entity of the profile appears exactly once, after every entity
/// it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadPlan {
    entities: Vec<String>,
}

impl LoadPlan {
    /// Compute the load order for a profile.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DependencyCycle`] when the reference graph
    /// contains a cycle (including a self-reference), and
    /// [`CatalogError::UnknownReference`] when an entity references a
    /// table that is not part of the profile.
    pub fn resolve(profile: &DatabaseProfile) -> Result<Self, CatalogError> {
        let mut states: BTreeMap<&str, VisitState> = BTreeMap::new();
        let mut order: Vec<String> = Vec::with_capacity(profile.entities().len());

        for entity in profile.entities() {
            visit(profile, entity, &mut states, &mut order)?;
        }

        Ok(Self { entities: order })
    }

    /// Entity names in load order.
    #[must_use]
    pub fn entity_names(&self) -> &[String] {
        &self.entities
    }

    /// Entity names in reverse order, suitable for dropping tables.
    #[must_use]
    pub fn reversed(&self) -> Vec<&str> {
        self.entities.iter().rev().map(String::as_str).collect()
    }
}

fn visit<'profile>(
    profile: &'profile DatabaseProfile,
    entity: &'profile EntityDefinition,
    states: &mut BTreeMap<&'profile str, VisitState>,
    order: &mut Vec<String>,
) -> Result<(), CatalogError> {
    match states.get(entity.name()) {
        Some(VisitState::Done) => return Ok(()),
        Some(VisitState::InProgress) => {
            return Err(CatalogError::DependencyCycle {
                entity: entity.name().to_owned(),
            });
        }
        None => {}
    }
    states.insert(entity.name(), VisitState::InProgress);

    for referenced in entity.references() {
        let target = profile
            .entity(referenced)
            .ok_or_else(|| CatalogError::UnknownReference {
                entity: entity.name().to_owned(),
                referenced: referenced.to_owned(),
            })?;
        visit(profile, target, states, order)?;
    }

    states.insert(entity.name(), VisitState::Done);
    order.push(entity.name().to_owned());
    Ok(())
}
