//! Schema registry
//!
//! - Schemas are looked up by record type name
//! - Registering a name twice fails; nothing is ever shadowed
//! - Filled at startup, read-only afterwards

use indexmap::IndexMap;
use tracing::info;

use super::errors::{SchemaError, SchemaResult};
use super::model::RecordSchema;
use crate::errors::Result;
use crate::record::ValidatedRecord;
use crate::value::Mapping;

/// In-memory registry of built schemas, keyed by name.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    /// Registered schemas in registration order
    schemas: IndexMap<String, RecordSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a built schema under its own name.
    ///
    /// # Errors
    ///
    /// `DuplicateSchema` if the name is already taken.
    pub fn register(&mut self, schema: RecordSchema) -> SchemaResult<RecordSchema> {
        if self.schemas.contains_key(schema.name()) {
            return Err(SchemaError::DuplicateSchema(schema.name().to_string()));
        }

        info!(
            event = "SCHEMA_REGISTERED",
            schema = %schema.name(),
            fields = schema.field_count(),
        );

        self.schemas.insert(schema.name().to_string(), schema.clone());
        Ok(schema)
    }

    /// Gets a schema by name.
    pub fn get(&self, name: &str) -> Option<&RecordSchema> {
        self.schemas.get(name)
    }

    /// Gets a schema by name, failing if it is unknown.
    pub fn require(&self, name: &str) -> SchemaResult<&RecordSchema> {
        self.get(name)
            .ok_or_else(|| SchemaError::UnknownSchema(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Returns all registered schemas.
    pub fn all_schemas(&self) -> impl Iterator<Item = &RecordSchema> {
        self.schemas.values()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Looks up `name` and validates `input` against it.
    pub fn validate(&self, name: &str, input: Mapping) -> Result<ValidatedRecord> {
        let schema = self.require(name)?;
        Ok(schema.validate(input)?)
    }
}
