//! The teaching-database profiles shipped with this tool.
//!
//! Four profiles of increasing difficulty: a single-table warm-up, a
//! school with a small reference chain, a shop with orders, and an air
//! travel schema with nullable references and composite uniqueness.

use crate::catalog::DatabaseProfile;
use crate::entity::{EntityDefinition, FieldDef};

/// All built-in profiles in catalogue order.
pub(crate) fn profiles() -> Vec<DatabaseProfile> {
    vec![games_easy(), school_world(), games_shop(), air_travel()]
}

fn games_easy() -> DatabaseProfile {
    DatabaseProfile::new(
        "games_easy",
        "games_easy",
        "Video game catalogue (single table)",
        "games_easy",
        vec![EntityDefinition::new(
            "games",
            vec![
                FieldDef::text("title", 100),
                FieldDef::text("genre", 50),
                FieldDef::text("platform", 50),
                FieldDef::integer("release_year"),
                FieldDef::float("rating"),
                FieldDef::text("developer", 100),
                FieldDef::float("price"),
            ],
        )],
    )
}

fn school_world() -> DatabaseProfile {
    DatabaseProfile::new(
        "school_world",
        "school_world",
        "School with teachers, classes, students, and grades",
        "school_world",
        vec![
            EntityDefinition::new(
                "teachers",
                vec![
                    FieldDef::text("first_name", 50),
                    FieldDef::text("last_name", 50),
                    FieldDef::text("subject", 50),
                ],
            ),
            EntityDefinition::new(
                "classes",
                vec![
                    FieldDef::text("name", 10).unique(),
                    FieldDef::text("classroom", 10),
                ],
            ),
            EntityDefinition::new(
                "students",
                vec![
                    FieldDef::text("first_name", 50),
                    FieldDef::text("last_name", 50),
                    FieldDef::date("birth_date"),
                    FieldDef::reference("class_id", "classes"),
                ],
            ),
            EntityDefinition::new(
                "subjects",
                vec![
                    FieldDef::text("name", 50),
                    FieldDef::reference("teacher_id", "teachers"),
                ],
            ),
            EntityDefinition::new(
                "grades",
                vec![
                    FieldDef::reference("student_id", "students"),
                    FieldDef::reference("subject_id", "subjects"),
                    FieldDef::integer("grade"),
                    FieldDef::date("date"),
                ],
            ),
        ],
    )
}

fn games_shop() -> DatabaseProfile {
    DatabaseProfile::new(
        "games_shop",
        "games_shop",
        "Video game shop with customers and orders",
        "games_shop",
        vec![
            EntityDefinition::new(
                "games",
                vec![
                    FieldDef::text("title", 100),
                    FieldDef::text("genre", 50),
                    FieldDef::text("platform", 50),
                    FieldDef::integer("release_year"),
                    FieldDef::decimal("price", 10, 2),
                    FieldDef::text("developer", 100),
                    FieldDef::text("publisher", 100),
                    FieldDef::integer("in_stock").with_default("0"),
                    FieldDef::unbounded_text("description").nullable(),
                ],
            ),
            EntityDefinition::new(
                "customers",
                vec![
                    FieldDef::text("first_name", 50),
                    FieldDef::text("last_name", 50),
                    FieldDef::text("email", 100).unique(),
                    FieldDef::text("phone", 20).nullable(),
                    FieldDef::date("registration_date"),
                    FieldDef::text("city", 50).nullable(),
                ],
            ),
            EntityDefinition::new(
                "orders",
                vec![
                    FieldDef::reference("customer_id", "customers"),
                    FieldDef::date("order_date"),
                    FieldDef::decimal("total_amount", 10, 2),
                    FieldDef::text("status", 20).with_default("'pending'"),
                    FieldDef::unbounded_text("shipping_address"),
                ],
            ),
            EntityDefinition::new(
                "order_items",
                vec![
                    FieldDef::reference("order_id", "orders"),
                    FieldDef::reference("game_id", "games"),
                    FieldDef::integer("quantity").with_default("1"),
                    FieldDef::decimal("unit_price", 10, 2),
                ],
            ),
        ],
    )
}

fn air_travel() -> DatabaseProfile {
    DatabaseProfile::new(
        "air_travel",
        "air_travel",
        "Airlines, airports, flights, and passengers",
        "air_travel",
        vec![
            EntityDefinition::new(
                "airlines",
                vec![
                    FieldDef::text("iata_code", 2).unique(),
                    FieldDef::text("icao_code", 3).unique(),
                    FieldDef::text("name", 100),
                    FieldDef::text("country", 50).nullable(),
                    FieldDef::boolean("is_active").with_default("TRUE"),
                ],
            ),
            EntityDefinition::new(
                "airports",
                vec![
                    FieldDef::text("iata_code", 3).unique(),
                    FieldDef::text("icao_code", 4).unique(),
                    FieldDef::text("name", 150),
                    FieldDef::text("city", 50),
                    FieldDef::text("country", 50),
                    FieldDef::text("timezone", 50).nullable(),
                    FieldDef::decimal("latitude", 10, 8).nullable(),
                    FieldDef::decimal("longitude", 11, 8).nullable(),
                ],
            ),
            EntityDefinition::new(
                "aircrafts",
                vec![
                    FieldDef::text("registration_number", 10).unique(),
                    FieldDef::text("model", 50),
                    FieldDef::text("manufacturer", 50).nullable(),
                    FieldDef::integer("capacity_economy").nullable(),
                    FieldDef::integer("capacity_business").nullable(),
                    FieldDef::reference("airline_id", "airlines").nullable(),
                    FieldDef::integer("year_of_production").nullable(),
                ],
            ),
            EntityDefinition::new(
                "flights",
                vec![
                    FieldDef::text("flight_number", 10),
                    FieldDef::reference("airline_id", "airlines"),
                    FieldDef::reference("departure_airport_id", "airports"),
                    FieldDef::reference("arrival_airport_id", "airports"),
                    FieldDef::timestamp("departure_time"),
                    FieldDef::timestamp("arrival_time"),
                    FieldDef::integer("duration_minutes").nullable(),
                    FieldDef::reference("aircraft_id", "aircrafts").nullable(),
                    FieldDef::decimal("base_price_economy", 10, 2).nullable(),
                    FieldDef::decimal("base_price_business", 10, 2).nullable(),
                    FieldDef::text("status", 20).with_default("'scheduled'"),
                ],
            ),
            EntityDefinition::new(
                "passengers",
                vec![
                    FieldDef::text("ticket_number", 20).unique(),
                    FieldDef::reference("flight_id", "flights"),
                    FieldDef::text("first_name", 50),
                    FieldDef::text("last_name", 50),
                    FieldDef::text("passport_number", 20),
                    FieldDef::text("nationality", 50).nullable(),
                    FieldDef::date("date_of_birth").nullable(),
                    FieldDef::text("seat_number", 5).nullable(),
                    FieldDef::text("class_type", 20),
                    FieldDef::text("booking_reference", 10).nullable(),
                    FieldDef::boolean("checked_in").with_default("FALSE"),
                    FieldDef::timestamp("boarding_time").nullable(),
                ],
            )
            .with_unique_constraint(&["flight_id", "seat_number"]),
        ],
    )
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::catalog::Catalog;
    use crate::entity::FieldType;

    #[test]
    fn catalogue_ships_four_profiles() {
        let catalog = Catalog::builtin();
        let keys: Vec<&str> = catalog.profiles().iter().map(DatabaseProfile::key).collect();

        assert_eq!(
            keys,
            vec!["games_easy", "school_world", "games_shop", "air_travel"]
        );
    }

    #[test]
    fn every_reference_targets_an_entity_in_the_same_profile() {
        for profile in Catalog::builtin().profiles() {
            for entity in profile.entities() {
                for referenced in entity.references() {
                    assert!(
                        profile.entity(referenced).is_some(),
                        "profile '{}': entity '{}' references missing '{referenced}'",
                        profile.key(),
                        entity.name()
                    );
                }
            }
        }
    }

    #[test]
    fn field_names_are_unique_within_each_entity() {
        for profile in Catalog::builtin().profiles() {
            for entity in profile.entities() {
                let mut seen: Vec<&str> = Vec::new();
                for field in entity.fields() {
                    assert!(
                        !seen.contains(&field.name()),
                        "duplicate field '{}' in '{}.{}'",
                        field.name(),
                        profile.key(),
                        entity.name()
                    );
                    seen.push(field.name());
                }
            }
        }
    }

    #[rstest]
    #[case("games_easy", 1)]
    #[case("school_world", 5)]
    #[case("games_shop", 4)]
    #[case("air_travel", 5)]
    fn profile_entity_counts(#[case] key: &str, #[case] entities: usize) {
        let catalog = Catalog::builtin();
        let profile = catalog.profile(key).expect("builtin profile");

        assert_eq!(profile.entities().len(), entities);
    }

    #[test]
    fn students_reference_classes() {
        let catalog = Catalog::builtin();
        let profile = catalog.profile("school_world").expect("builtin profile");
        let students = profile.entity("students").expect("students entity");

        assert_eq!(
            students.field_type("class_id"),
            Some(&FieldType::Reference {
                entity: "classes".to_owned()
            })
        );
    }
}
