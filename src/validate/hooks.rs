//! User-supplied validation hooks
//!
//! Field hooks run per field, either before coercion (raw value) or after
//! constraint checking (typed value). Model hooks run once per record
//! against the assembled candidate.

use std::sync::Arc;

use thiserror::Error;

use super::coerce::coerce;
use super::constraints;
use crate::schema::RecordSchema;
use crate::value::{Mapping, Value};

/// Per-field hook: receives a value, returns it (possibly transformed) or rejects.
pub type FieldHook = Arc<dyn Fn(Value) -> Result<Value, HookError> + Send + Sync>;

/// Cross-field hook over the assembled candidate record.
pub type ModelHook = Arc<dyn Fn(&mut Candidate<'_>) -> Result<(), HookError> + Send + Sync>;

/// Rejection raised by a hook.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HookError {
    message: String,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for HookError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for HookError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Mutable view of a record between field validation and freezing.
///
/// Only declared fields can be written. Writes here do not count as
/// explicitly supplied input.
pub struct Candidate<'a> {
    schema: &'a RecordSchema,
    values: &'a mut Mapping,
}

impl<'a> Candidate<'a> {
    pub(crate) fn new(schema: &'a RecordSchema, values: &'a mut Mapping) -> Self {
        Self { schema, values }
    }

    pub fn schema(&self) -> &RecordSchema {
        self.schema
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    /// Returns true if the field holds a non-null value
    pub fn is_present(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_null())
    }

    /// Rewrites a declared field.
    ///
    /// The value is coerced to the field's type and checked against its
    /// constraints, exactly like input. Field hooks do not run.
    ///
    /// # Errors
    ///
    /// - Names the schema does not declare
    /// - Values that do not coerce to the field's type
    /// - Values that break one of the field's constraints
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<(), HookError> {
        let Some(spec) = self.schema.field(name) else {
            return Err(HookError::new(format!(
                "'{}' has no field named '{}'",
                self.schema.name(),
                name
            )));
        };

        let strict = spec.is_strict() || self.schema.config().strict;
        let value = coerce(value.into(), spec.field_type(), strict, name).map_err(|errors| {
            let detail = errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");
            HookError::new(format!("cannot set '{}': {}", name, detail))
        })?;
        constraints::check(&value, spec, name)
            .map_err(|e| HookError::new(format!("cannot set '{}': {}", name, e)))?;

        self.values.insert(name.to_string(), value);
        Ok(())
    }
}
