//! Record construction pipeline
//!
//! Per field, in declaration order:
//!
//! ```text
//! Raw -> BeforeHooks -> Coerce -> Constrain -> AfterHooks
//! ```
//!
//! then, once every field passed:
//!
//! ```text
//! Assembled -> ModelHooks -> Valid | Rejected
//! ```
//!
//! - A field failing a phase skips its own later phases
//! - Other fields keep going so every field error is reported together
//! - Model hooks only run on a fully valid candidate; the first rejection
//!   is reported on its own
//! - Nothing partially validated is ever returned

use std::collections::BTreeSet;

use tracing::{debug, trace};

use super::coerce::{coerce, coerce_from, InputSource};
use super::constraints;
use super::errors::{CustomValidationError, FieldError, HookPhase, ValidationError};
use super::hooks::{Candidate, FieldHook};
use crate::record::ValidatedRecord;
use crate::schema::{ExtraPolicy, FieldSpec, FieldType, RecordSchema, SchemaConfig};
use crate::value::{Mapping, Value};

/// Runs the full pipeline for one record construction attempt.
pub fn run(schema: &RecordSchema, mut input: Mapping, source: InputSource) -> Result<ValidatedRecord, ValidationError> {
    let config = schema.config();
    let mut values = Mapping::with_capacity(schema.field_count());
    let mut fields_set = BTreeSet::new();
    let mut errors: Vec<FieldError> = Vec::new();

    for spec in schema.fields() {
        let raw = match input.shift_remove(spec.input_key()) {
            Some(raw) => Some(raw),
            // Fall back to the field name when an alias is declared
            None if spec.alias_name().is_some() => input.shift_remove(spec.name()),
            None => None,
        };

        match raw {
            Some(raw) => match validate_field(spec, raw, config, source) {
                Ok(value) => {
                    values.insert(spec.name().to_string(), value);
                    fields_set.insert(spec.name().to_string());
                }
                Err(field_errors) => errors.extend(field_errors),
            },
            None => match spec.default_value() {
                Some(default) => {
                    values.insert(spec.name().to_string(), default.clone());
                }
                None => errors.push(FieldError::Missing {
                    path: spec.name().to_string(),
                }),
            },
        }
    }

    if config.extra == ExtraPolicy::Forbid {
        errors.extend(input.into_keys().map(|path| FieldError::ExtraForbidden { path }));
    }

    if !errors.is_empty() {
        let err = ValidationError::new(schema.name(), errors);
        debug!(
            event = "RECORD_REJECTED",
            schema = %schema.name(),
            violations = err.violation_count(),
        );
        return Err(err);
    }

    trace!(event = "RECORD_ASSEMBLED", schema = %schema.name());

    let mut candidate = Candidate::new(schema, &mut values);
    for hook in schema.model_hooks() {
        if let Err(e) = hook(&mut candidate) {
            debug!(
                event = "MODEL_HOOK_REJECTED",
                schema = %schema.name(),
                reason = %e,
            );
            return Err(ValidationError::model(schema.name(), e.message()));
        }
    }

    debug!(
        event = "RECORD_VALIDATED",
        schema = %schema.name(),
        supplied = fields_set.len(),
    );

    Ok(ValidatedRecord::new(schema.clone(), values, fields_set))
}

/// Runs the per-field phases for one supplied value.
fn validate_field(
    spec: &FieldSpec,
    raw: Value,
    config: &SchemaConfig,
    source: InputSource,
) -> Result<Value, Vec<FieldError>> {
    let path = spec.name();
    let strict = spec.is_strict() || config.strict;

    let mut raw = run_hooks(&spec.before, raw, path, HookPhase::Before)?;
    if config.strip_whitespace {
        raw = strip_strings(raw, spec.field_type());
    }

    let value = coerce_from(raw, spec.field_type(), strict, source, path)?;
    trace!(event = "FIELD_COERCED", field = %path, value = %value);

    constraints::check(&value, spec, path).map_err(|e| vec![FieldError::Constraint(e)])?;

    run_hooks(&spec.after, value, path, HookPhase::After)
}

fn run_hooks(hooks: &[FieldHook], mut value: Value, path: &str, phase: HookPhase) -> Result<Value, Vec<FieldError>> {
    for hook in hooks {
        value = hook(value).map_err(|e| {
            vec![FieldError::Custom(CustomValidationError {
                path: path.to_string(),
                phase,
                message: e.message().to_string(),
            })]
        })?;
    }
    Ok(value)
}

/// Trims string input, including list elements and dict values.
///
/// Nested record input is left alone; its own schema config decides.
fn strip_strings(raw: Value, field_type: &FieldType) -> Value {
    match (field_type, raw) {
        (FieldType::Optional(inner), raw) => strip_strings(raw, inner),
        (FieldType::Record(_), raw) => raw,
        (FieldType::List(inner), Value::List(items)) => {
            Value::List(items.into_iter().map(|item| strip_strings(item, inner)).collect())
        }
        (FieldType::Dict(inner), Value::Map(map)) => {
            Value::Map(map.into_iter().map(|(k, v)| (k, strip_strings(v, inner))).collect())
        }
        (_, Value::Str(s)) => Value::Str(s.trim().to_string()),
        (_, other) => other,
    }
}

/// Coerces and constraint-checks a declared default. Hooks do not run.
pub(crate) fn check_default(spec: &FieldSpec, default: Value, strict: bool) -> Result<Value, Vec<FieldError>> {
    let value = coerce(default, spec.field_type(), strict, spec.name())?;
    constraints::check(&value, spec, spec.name()).map_err(|e| vec![FieldError::Constraint(e)])?;
    Ok(value)
}
