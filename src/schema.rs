use std::collections::HashMap;
use std::fmt;

use rand::Rng;
use serde::Deserialize;

use crate::generators::*;

/// Produces one field value for a given record.
pub trait Generator {
    fn generate<R: Rng>(&self, rng: &mut R, index: u64) -> String;
}

/// How a field's value is synthesized.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "generator", rename_all = "snake_case")]
pub enum FieldGenerator {
    /// "true" with the given probability.
    Bool { probability: f64 },
    Choice { choices: Vec<String> },
    /// Person name or organization name.
    Identity {
        person_probability: f64,
        given_names: Vec<String>,
        legal_suffixes: Vec<String>,
    },
    PersonName { parts: Vec<Vec<String>> },
    /// Prefix plus the zero-padded 1-based record index.
    Sequential { prefix: String, width: usize },
    RecordId,
}

impl Generator for FieldGenerator {
    fn generate<R: Rng>(&self, rng: &mut R, index: u64) -> String {
        match *self {
            FieldGenerator::Bool { probability } => generate_bool(rng, probability).to_string(),
            FieldGenerator::Choice { ref choices } => generate_choice(rng, choices).clone(),
            FieldGenerator::Identity {
                person_probability,
                ref given_names,
                ref legal_suffixes,
            } => generate_identity(rng, person_probability, given_names, legal_suffixes),
            FieldGenerator::PersonName { ref parts } => generate_person_name(rng, parts),
            FieldGenerator::Sequential { ref prefix, width } => {
                generate_sequential(prefix, width, index)
            }
            FieldGenerator::RecordId => generate_record_id(rng),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Field {
    pub label: String,
    pub api_name: String,
    #[serde(flatten)]
    pub generator: FieldGenerator,
}

impl Field {
    /// The identifier this field is written under for the given header mode.
    pub fn column(&self, header: HeaderMode) -> &str {
        match header {
            HeaderMode::Label => &self.label,
            HeaderMode::Api => &self.api_name,
        }
    }
}

impl Generator for Field {
    fn generate<R: Rng>(&self, rng: &mut R, index: u64) -> String {
        self.generator.generate(rng, index)
    }
}

/// Whether columns are identified by display label or backend field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderMode {
    #[default]
    Label,
    Api,
}

impl HeaderMode {
    pub fn parse(value: &str) -> Option<HeaderMode> {
        match value {
            "label" => Some(HeaderMode::Label),
            "api" => Some(HeaderMode::Api),
            _ => None,
        }
    }
}

/// Per-entity run settings, overridable from the command line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub num_rows: u64,
    pub output_file: String,
    pub seed: Option<u64>,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            num_rows: 100,
            output_file: "output.csv".to_string(),
            seed: None,
        }
    }
}

/// One synthetic record, keyed by column identifier.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    index: u64,
    values: HashMap<String, String>,
}

impl Row {
    pub fn new(index: u64) -> Row {
        Row {
            index,
            values: HashMap::new(),
        }
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.values.insert(column.into(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// Values in the order of `columns`, with absent columns as "".
    pub fn ordered<'a, S: AsRef<str>>(&'a self, columns: &[S]) -> Vec<&'a str> {
        columns
            .iter()
            .map(|column| self.get(column.as_ref()).unwrap_or(""))
            .collect()
    }
}

/// An entity's field table: ordered fields, each with its label, backend
/// name and generator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Schema {
    pub entity: String,
    #[serde(default)]
    pub header: HeaderMode,
    #[serde(default)]
    pub defaults: Defaults,
    pub fields: Vec<Field>,
}

impl Schema {
    /// The same schema, written under a different header mode.
    pub fn with_header(mut self, header: HeaderMode) -> Schema {
        self.header = header;
        self
    }

    /// Backend field name for a display label.
    pub fn api_name(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.api_name.as_str())
    }

    /// Display label for a backend field name.
    pub fn label(&self, api_name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.api_name == api_name)
            .map(|f| f.label.as_str())
    }

    /// Ordered output column identifiers.
    pub fn columns(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.column(self.header)).collect()
    }

    /// Synthesizes the record at 1-based `index`.
    ///
    /// Fields are generated in schema order, so a schema always draws the
    /// same number of values from `rng` in the same order for every row.
    pub fn synthesize<R: Rng>(&self, rng: &mut R, index: u64) -> Row {
        let mut row = Row::new(index);
        for field in self.fields.iter() {
            let value = field.generate(rng, index);
            row.insert(field.column(self.header), value);
        }
        row
    }

    /// Lazily synthesizes rows `1..=count` from a shared random source.
    pub fn rows<'a, R: Rng>(&'a self, rng: &'a mut R, count: u64) -> Rows<'a, R> {
        Rows {
            schema: self,
            rng,
            next_index: 1,
            count,
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.entity)
    }
}

/// Iterator returned by [`Schema::rows`].
pub struct Rows<'a, R> {
    schema: &'a Schema,
    rng: &'a mut R,
    next_index: u64,
    count: u64,
}

impl<R: Rng> Iterator for Rows<'_, R> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        if self.next_index > self.count {
            return None;
        }
        let row = self.schema.synthesize(&mut *self.rng, self.next_index);
        self.next_index += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count.saturating_sub(self.next_index - 1) as usize;
        (remaining, Some(remaining))
    }
}

impl<R: Rng> ExactSizeIterator for Rows<'_, R> {}
