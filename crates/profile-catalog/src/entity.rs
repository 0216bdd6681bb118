//! Entity and field definitions.
//!
//! An [`EntityDefinition`] describes one table in a profile: its name, its
//! typed fields, and any composite unique constraints. Foreign-key edges
//! are declared explicitly with [`FieldType::Reference`]; nothing is
//! inferred from a live schema at runtime.

/// Name of the implicit surrogate primary-key column every entity gets.
pub const PRIMARY_KEY_COLUMN: &str = "id";

static PRIMARY_KEY_TYPE: FieldType = FieldType::Integer;

/// Semantic type of an entity field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Variable-length text, optionally bounded to a maximum length.
    Text {
        /// Maximum length in characters; `None` means unbounded.
        max_length: Option<u32>,
    },
    /// 32-bit signed integer.
    Integer,
    /// Double-precision floating point number.
    Float,
    /// Boolean flag.
    Boolean,
    /// Calendar date without a time component.
    Date,
    /// Date and time without a timezone.
    Timestamp,
    /// Fixed-point decimal number.
    Decimal {
        /// Total number of significant digits.
        precision: u8,
        /// Digits after the decimal point.
        scale: u8,
    },
    /// Foreign-key reference to another entity in the same profile.
    ///
    /// The column stores the referenced entity's primary key and the
    /// reference doubles as a dependency edge for load-order planning.
    Reference {
        /// Name of the referenced entity.
        entity: String,
    },
}

/// One typed field of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    name: String,
    field_type: FieldType,
    nullable: bool,
    unique: bool,
    default: Option<String>,
}

impl FieldDef {
    /// Create a field with an explicit type.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            nullable: false,
            unique: false,
            default: None,
        }
    }

    /// Create a bounded text field.
    pub fn text(name: impl Into<String>, max_length: u32) -> Self {
        Self::new(
            name,
            FieldType::Text {
                max_length: Some(max_length),
            },
        )
    }

    /// Create an unbounded text field.
    pub fn unbounded_text(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Text { max_length: None })
    }

    /// Create an integer field.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Integer)
    }

    /// Create a floating-point field.
    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Float)
    }

    /// Create a boolean field.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    /// Create a date field.
    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Date)
    }

    /// Create a timestamp field.
    pub fn timestamp(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Timestamp)
    }

    /// Create a fixed-point decimal field.
    pub fn decimal(name: impl Into<String>, precision: u8, scale: u8) -> Self {
        Self::new(name, FieldType::Decimal { precision, scale })
    }

    /// Create a foreign-key reference field pointing at `entity`.
    pub fn reference(name: impl Into<String>, entity: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldType::Reference {
                entity: entity.into(),
            },
        )
    }

    /// Allow NULL values for this field.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Add a single-column unique constraint.
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Set a SQL default literal, rendered verbatim into the DDL.
    #[must_use]
    pub fn with_default(mut self, literal: impl Into<String>) -> Self {
        self.default = Some(literal.into());
        self
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the field's semantic type.
    #[must_use]
    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// Whether the field accepts NULL.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Whether the field carries a single-column unique constraint.
    #[must_use]
    pub const fn is_unique(&self) -> bool {
        self.unique
    }

    /// The SQL default literal, if one was declared.
    #[must_use]
    pub fn default_literal(&self) -> Option<&str> {
        self.default.as_deref()
    }
}

/// Definition of one table within a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDefinition {
    name: String,
    fields: Vec<FieldDef>,
    unique_constraints: Vec<Vec<String>>,
}

impl EntityDefinition {
    /// Create an entity with the given table name and ordered fields.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            fields,
            unique_constraints: Vec::new(),
        }
    }

    /// Add a composite unique constraint over the named columns.
    #[must_use]
    pub fn with_unique_constraint(mut self, columns: &[&str]) -> Self {
        self.unique_constraints
            .push(columns.iter().map(|c| (*c).to_owned()).collect());
        self
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared fields in order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Returns the composite unique constraints.
    #[must_use]
    pub fn unique_constraints(&self) -> &[Vec<String>] {
        &self.unique_constraints
    }

    /// Names of the entities this entity references, in field order.
    #[must_use]
    pub fn references(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter_map(|field| match field.field_type() {
                FieldType::Reference { entity } => Some(entity.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Look up the type declared for `name`.
    ///
    /// The implicit primary-key column resolves as [`FieldType::Integer`];
    /// undeclared names resolve to `None`.
    #[must_use]
    pub fn field_type(&self, name: &str) -> Option<&FieldType> {
        if name == PRIMARY_KEY_COLUMN {
            return Some(&PRIMARY_KEY_TYPE);
        }
        self.fields
            .iter()
            .find(|field| field.name() == name)
            .map(FieldDef::field_type)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn sample_entity() -> EntityDefinition {
        EntityDefinition::new(
            "passengers",
            vec![
                FieldDef::text("ticket_number", 20).unique(),
                FieldDef::reference("flight_id", "flights"),
                FieldDef::date("date_of_birth").nullable(),
                FieldDef::boolean("checked_in").with_default("FALSE"),
            ],
        )
        .with_unique_constraint(&["flight_id", "seat_number"])
    }

    #[test]
    fn references_follow_field_order() {
        let entity = EntityDefinition::new(
            "flights",
            vec![
                FieldDef::reference("airline_id", "airlines"),
                FieldDef::text("flight_number", 10),
                FieldDef::reference("departure_airport_id", "airports"),
            ],
        );

        assert_eq!(entity.references(), vec!["airlines", "airports"]);
    }

    #[test]
    fn field_type_resolves_primary_key_as_integer() {
        let entity = sample_entity();

        assert_eq!(entity.field_type("id"), Some(&FieldType::Integer));
    }

    #[rstest]
    #[case("ticket_number", true)]
    #[case("seat_number", false)]
    #[case("TICKET_NUMBER", false)]
    fn field_type_lookup_is_exact(#[case] name: &str, #[case] found: bool) {
        let entity = sample_entity();

        assert_eq!(entity.field_type(name).is_some(), found);
    }

    #[test]
    fn builder_flags_are_recorded() {
        let entity = sample_entity();
        let ticket = &entity.fields()[0];
        let birth = &entity.fields()[2];
        let checked_in = &entity.fields()[3];

        assert!(ticket.is_unique());
        assert!(!ticket.is_nullable());
        assert!(birth.is_nullable());
        assert_eq!(checked_in.default_literal(), Some("FALSE"));
        assert_eq!(
            entity.unique_constraints(),
            &[vec!["flight_id".to_owned(), "seat_number".to_owned()]]
        );
    }
}
