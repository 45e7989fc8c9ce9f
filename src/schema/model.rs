//! Record schemas and their builder
//!
//! A `RecordSchema` is a cheap, shareable handle. Once built it never
//! changes, so nested schemas can only point at schemas that already exist:
//! nesting always forms a tree.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use super::config::SchemaConfig;
use super::errors::{SchemaError, SchemaResult};
use super::types::{Constraints, FieldSpec};
use crate::record::ValidatedRecord;
use crate::validate::coerce::{coerce, InputSource};
use crate::validate::errors::ValidationError;
use crate::validate::hooks::{Candidate, HookError, ModelHook};
use crate::validate::pipeline;
use crate::value::{Mapping, Value};

/// Derivation function behind a computed field
pub type ComputeFn = Arc<dyn Fn(&ValidatedRecord) -> Value + Send + Sync>;

/// Read-only value derived from a record's stored fields.
#[derive(Clone)]
pub struct ComputedField {
    name: String,
    compute: ComputeFn,
}

impl ComputedField {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluates against the given record. Nothing is cached.
    pub fn evaluate(&self, record: &ValidatedRecord) -> Value {
        (self.compute)(record)
    }
}

impl fmt::Debug for ComputedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputedField").field("name", &self.name).finish()
    }
}

struct SchemaInner {
    name: String,
    description: Option<String>,
    fields: IndexMap<String, FieldSpec>,
    model_hooks: Vec<ModelHook>,
    computed: IndexMap<String, ComputedField>,
    config: SchemaConfig,
}

/// Immutable, ordered set of field specifications for one record type.
#[derive(Clone)]
pub struct RecordSchema {
    inner: Arc<SchemaInner>,
}

impl RecordSchema {
    /// Starts a new schema definition
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn description(&self) -> Option<&str> {
        self.inner.description.as_deref()
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.inner.config
    }

    /// Field specs in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.inner.fields.values()
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.inner.fields.get(name)
    }

    pub fn field_count(&self) -> usize {
        self.inner.fields.len()
    }

    pub fn computed_fields(&self) -> impl Iterator<Item = &ComputedField> {
        self.inner.computed.values()
    }

    pub fn computed_field(&self, name: &str) -> Option<&ComputedField> {
        self.inner.computed.get(name)
    }

    pub(crate) fn model_hooks(&self) -> &[ModelHook] {
        &self.inner.model_hooks
    }

    /// True if both handles point at the same built schema
    pub fn same_as(&self, other: &RecordSchema) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Validates a mapping of raw input values.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` listing every field-level violation, or the
    /// single model-level rejection if all fields passed individually.
    pub fn validate(&self, input: Mapping) -> Result<ValidatedRecord, ValidationError> {
        pipeline::run(self, input, InputSource::Native)
    }

    /// Validates any value that converts into a mapping, such as a JSON object.
    pub fn validate_value(&self, input: impl Into<Value>) -> Result<ValidatedRecord, ValidationError> {
        self.validate_from(input.into(), InputSource::Native)
    }

    /// Parses JSON text, then validates it.
    ///
    /// Strict date fields accept `YYYY-MM-DD` strings here, so text written
    /// by `to_text` reads back.
    pub fn validate_json(&self, text: &str) -> Result<ValidatedRecord, ValidationError> {
        let json: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| ValidationError::invalid_input(self.name(), format!("invalid JSON: {}", e)))?;
        self.validate_from(json.into(), InputSource::Json)
    }

    fn validate_from(&self, input: Value, source: InputSource) -> Result<ValidatedRecord, ValidationError> {
        match input {
            Value::Map(map) => pipeline::run(self, map, source),
            Value::Record(record) if record.schema().same_as(self) => Ok(*record),
            other => Err(ValidationError::invalid_input(
                self.name(),
                format!("input should be a mapping, got {}", other.type_name()),
            )),
        }
    }
}

impl fmt::Debug for RecordSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSchema")
            .field("name", &self.inner.name)
            .field("fields", &self.inner.fields.keys().collect::<Vec<_>>())
            .field("model_hooks", &self.inner.model_hooks.len())
            .field("computed", &self.inner.computed.keys().collect::<Vec<_>>())
            .field("config", &self.inner.config)
            .finish()
    }
}

/// Collects field specs and hooks, then freezes them into a `RecordSchema`.
pub struct SchemaBuilder {
    name: String,
    description: Option<String>,
    fields: Vec<FieldSpec>,
    model_hooks: Vec<ModelHook>,
    computed: Vec<ComputedField>,
    config: SchemaConfig,
}

impl SchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
            model_hooks: Vec::new(),
            computed: Vec::new(),
            config: SchemaConfig::default(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn config(mut self, config: SchemaConfig) -> Self {
        self.config = config;
        self
    }

    /// Adds a cross-field hook run once all fields passed individually.
    pub fn model_validator<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut Candidate<'_>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.model_hooks.push(Arc::new(hook));
        self
    }

    pub fn computed_field<F>(mut self, name: impl Into<String>, compute: F) -> Self
    where
        F: Fn(&ValidatedRecord) -> Value + Send + Sync + 'static,
    {
        self.computed.push(ComputedField {
            name: name.into(),
            compute: Arc::new(compute),
        });
        self
    }

    /// Freezes the definition.
    ///
    /// # Errors
    ///
    /// - `DuplicateField` if two specs share a name
    /// - `InvalidPattern` if a regex failed to compile
    /// - `InvalidConstraint` if a bound or allowed value does not fit the field type
    /// - `InvalidDefault` if a default fails its own coercion or constraints
    /// - `ComputedShadowsField` if a computed field reuses a field name
    pub fn build(self) -> SchemaResult<RecordSchema> {
        let mut fields: IndexMap<String, FieldSpec> = IndexMap::with_capacity(self.fields.len());

        for mut spec in self.fields {
            if fields.contains_key(&spec.name) {
                return Err(SchemaError::DuplicateField {
                    schema: self.name,
                    field: spec.name,
                });
            }

            if let Some(reason) = spec.pattern_error.take() {
                return Err(SchemaError::InvalidPattern {
                    schema: self.name,
                    field: spec.name,
                    reason,
                });
            }

            if let Err(reason) = coerce_constraint_values(&mut spec) {
                return Err(SchemaError::InvalidConstraint {
                    schema: self.name,
                    field: spec.name,
                    reason,
                });
            }

            if let Some(default) = spec.default.take() {
                let strict = spec.strict || self.config.strict;
                match pipeline::check_default(&spec, default, strict) {
                    Ok(checked) => spec.default = Some(checked),
                    Err(errors) => {
                        let reason = errors
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join("; ");
                        return Err(SchemaError::InvalidDefault {
                            schema: self.name,
                            field: spec.name,
                            reason,
                        });
                    }
                }
            }

            fields.insert(spec.name.clone(), spec);
        }

        let mut computed = IndexMap::with_capacity(self.computed.len());
        for field in self.computed {
            if fields.contains_key(&field.name) {
                return Err(SchemaError::ComputedShadowsField {
                    schema: self.name,
                    field: field.name,
                });
            }
            computed.insert(field.name.clone(), field);
        }

        debug!(
            event = "SCHEMA_BUILT",
            schema = %self.name,
            fields = fields.len(),
            model_hooks = self.model_hooks.len(),
            computed = computed.len(),
        );

        Ok(RecordSchema {
            inner: Arc::new(SchemaInner {
                name: self.name,
                description: self.description,
                fields,
                model_hooks: self.model_hooks,
                computed,
                config: self.config,
            }),
        })
    }
}

/// Coerces bounds and allowed values to the field's own type.
///
/// Container fields cannot carry them at all.
fn coerce_constraint_values(spec: &mut FieldSpec) -> Result<(), String> {
    let field_type = spec.field_type.innermost().clone();
    let name = spec.name.clone();
    let c: &mut Constraints = &mut spec.constraints;

    let convert = |value: Value, rule: &str| -> Result<Value, String> {
        if field_type.is_container() {
            return Err(format!("'{}' does not apply to {}", rule, field_type.type_name()));
        }
        coerce(value, &field_type, false, &name).map_err(|errors| {
            let detail = errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");
            format!("'{}' value does not fit {}: {}", rule, field_type.type_name(), detail)
        })
    };

    for (rule, slot) in [("gt", &mut c.gt), ("ge", &mut c.ge), ("lt", &mut c.lt), ("le", &mut c.le)] {
        if let Some(bound) = slot.take() {
            *slot = Some(convert(bound, rule)?);
        }
    }
    if let Some(allowed) = c.one_of.take() {
        let allowed = allowed
            .into_iter()
            .map(|value| convert(value, "one_of"))
            .collect::<Result<Vec<_>, _>>()?;
        c.one_of = Some(allowed);
    }
    Ok(())
}
