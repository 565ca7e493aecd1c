use std::collections::HashSet;
use std::fs;

use crate::error::Error;
use crate::schema::{FieldGenerator, HeaderMode, Schema};

const ACCOUNT_SCHEMA: &str = include_str!("../schemas/account.json");
const CONTACT_SCHEMA: &str = include_str!("../schemas/contact.json");

/// Names accepted by [`builtin_schema`].
pub const BUILTIN_ENTITIES: [&str; 3] = ["account", "account-api", "contact"];

/// Loads one of the schemas compiled into the binary.
///
/// `account-api` is the Account schema with backend field names as headers.
///
/// # Examples
///
/// let schema = builtin_schema("contact")?;
///
pub fn builtin_schema(entity: &str) -> Result<Schema, Error> {
    match entity {
        "account" => parse_json(ACCOUNT_SCHEMA),
        "account-api" => Ok(parse_json(ACCOUNT_SCHEMA)?.with_header(HeaderMode::Api)),
        "contact" => parse_json(CONTACT_SCHEMA),
        other => Err(Error::Usage(format!(
            "Unknown entity '{}', expected one of: {}",
            other,
            BUILTIN_ENTITIES.join(", ")
        ))),
    }
}

/// load_schema_from_file reads a JSON schema from disk, then parses and
/// validates it.
///
/// # Examples
///
/// let result = load_schema_from_file("leads.json");
///
pub fn load_schema_from_file(file_name: &str) -> Result<Schema, Error> {
    let raw_json = fs::read_to_string(file_name)?;
    parse_json(&raw_json)
}

/// Parses a schema document and checks it can generate rows.
///
/// # Examples
///
/// let result = parse_json("{\"entity\": \"Lead\", \"fields\": [...]}");
///
pub fn parse_json(raw_json: &str) -> Result<Schema, Error> {
    let schema: Schema = serde_json::from_str(raw_json)?;
    validate(&schema)?;
    Ok(schema)
}

fn validate(schema: &Schema) -> Result<(), Error> {
    if schema.entity.trim().is_empty() {
        return Err(Error::Schema("Entity name must not be empty.".to_string()));
    }
    if schema.fields.is_empty() {
        return Err(Error::Schema(format!(
            "Schema '{}' must define at least one field.",
            schema.entity
        )));
    }

    let mut labels = HashSet::new();
    let mut api_names = HashSet::new();

    for field in schema.fields.iter() {
        if field.label.is_empty() || field.api_name.is_empty() {
            return Err(Error::Schema(
                "Every field needs a non-empty label and api_name.".to_string(),
            ));
        }
        if !labels.insert(field.label.as_str()) {
            return Err(Error::Schema(format!("Duplicate label '{}'.", field.label)));
        }
        if !api_names.insert(field.api_name.as_str()) {
            return Err(Error::Schema(format!(
                "Duplicate api_name '{}'.",
                field.api_name
            )));
        }

        validate_generator(&field.label, &field.generator)?;
    }

    Ok(())
}

fn validate_generator(label: &str, generator: &FieldGenerator) -> Result<(), Error> {
    let fail = |message: &str| Err(Error::Schema(format!("Field '{}': {}", label, message)));

    match *generator {
        FieldGenerator::Bool { probability } => {
            if !is_probability(probability) {
                return fail("probability must be between 0 and 1.");
            }
        }
        FieldGenerator::Choice { ref choices } => {
            if choices.is_empty() {
                return fail("a choice field must have choices.");
            }
        }
        FieldGenerator::Identity {
            person_probability,
            ref given_names,
            ref legal_suffixes,
        } => {
            if !is_probability(person_probability) {
                return fail("person_probability must be between 0 and 1.");
            }
            if given_names.is_empty() || legal_suffixes.is_empty() {
                return fail("given_names and legal_suffixes must not be empty.");
            }
        }
        FieldGenerator::PersonName { ref parts } => {
            if parts.is_empty() || parts.iter().any(|part| part.is_empty()) {
                return fail("every name part needs at least one token.");
            }
        }
        FieldGenerator::Sequential { width, .. } => {
            if width == 0 {
                return fail("width must be at least 1.");
            }
        }
        FieldGenerator::RecordId => {}
    }

    Ok(())
}

fn is_probability(p: f64) -> bool {
    p.is_finite() && (0.0..=1.0).contains(&p)
}
