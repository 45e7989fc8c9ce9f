//! Projection of validated records into plain mappings and JSON text
//!
//! - Field order follows the schema
//! - Nested records become nested mappings
//! - Include/exclude paths reach into nested records, and into every
//!   record inside a list or dict
//! - On a plain dict they select keys instead
//! - `exclude_unset` applies at every nesting level
//! - Computed fields only appear when asked for

mod options;

pub use options::{DumpOptions, FieldPaths, Selection};

use thiserror::Error;

use crate::record::ValidatedRecord;
use crate::value::{Mapping, Value};

/// Encoding failure.
#[derive(Debug, Error)]
#[error("failed to encode '{schema}' record as JSON: {source}")]
pub struct SerializeError {
    schema: String,
    #[source]
    source: serde_json::Error,
}

/// Projects a record into an ordered mapping of plain values.
pub fn to_mapping(record: &ValidatedRecord, options: &DumpOptions) -> Mapping {
    dump_record(record, options, options.include.as_ref(), options.exclude.as_ref())
}

/// Projects a record into a `serde_json::Value`.
pub fn to_json(record: &ValidatedRecord, options: &DumpOptions) -> serde_json::Value {
    Value::Map(to_mapping(record, options)).to_json()
}

/// Encodes a record as compact JSON text.
pub fn to_text(record: &ValidatedRecord, options: &DumpOptions) -> Result<String, SerializeError> {
    serde_json::to_string(&to_mapping(record, options)).map_err(|source| SerializeError {
        schema: record.schema_name().to_string(),
        source,
    })
}

/// Encodes a record as indented JSON text.
pub fn to_text_pretty(record: &ValidatedRecord, options: &DumpOptions) -> Result<String, SerializeError> {
    serde_json::to_string_pretty(&to_mapping(record, options)).map_err(|source| SerializeError {
        schema: record.schema_name().to_string(),
        source,
    })
}

fn dump_record(
    record: &ValidatedRecord,
    options: &DumpOptions,
    include: Option<&FieldPaths>,
    exclude: Option<&FieldPaths>,
) -> Mapping {
    let schema = record.schema();
    let mut out = Mapping::with_capacity(record.len());

    for (name, value) in record.iter() {
        let Some((sub_include, sub_exclude)) = narrow(name, include, exclude) else {
            continue;
        };

        if options.exclude_unset && !record.is_set(name) {
            continue;
        }
        if options.exclude_none && value.is_null() {
            continue;
        }

        let spec = schema.field(name);
        if options.exclude_defaults && spec.and_then(|s| s.default_value()) == Some(value) {
            continue;
        }

        let key = match spec.and_then(|s| s.alias_name()) {
            Some(alias) if options.by_alias => alias.to_string(),
            _ => name.to_string(),
        };
        out.insert(key, dump_value(value, options, sub_include, sub_exclude));
    }

    if options.computed {
        for computed in schema.computed_fields() {
            if narrow(computed.name(), include, exclude).is_none() {
                continue;
            }
            let value = computed.evaluate(record);
            if options.exclude_none && value.is_null() {
                continue;
            }
            out.insert(computed.name().to_string(), dump_value(&value, options, None, None));
        }
    }

    out
}

/// Applies include/exclude filters to one field.
///
/// Returns `None` if the field is filtered out, otherwise the filters to
/// apply beneath it.
fn narrow<'a>(
    name: &str,
    include: Option<&'a FieldPaths>,
    exclude: Option<&'a FieldPaths>,
) -> Option<(Option<&'a FieldPaths>, Option<&'a FieldPaths>)> {
    let sub_include = match include {
        None => None,
        Some(paths) => match paths.select(name)? {
            Selection::Whole => None,
            Selection::Nested(sub) => Some(sub),
        },
    };
    let sub_exclude = match exclude.and_then(|paths| paths.select(name)) {
        Some(Selection::Whole) => return None,
        Some(Selection::Nested(sub)) => Some(sub),
        None => None,
    };
    Some((sub_include, sub_exclude))
}

fn dump_value(
    value: &Value,
    options: &DumpOptions,
    include: Option<&FieldPaths>,
    exclude: Option<&FieldPaths>,
) -> Value {
    match value {
        Value::Record(record) => Value::Map(dump_record(record, options, include, exclude)),
        Value::List(items) => Value::List(
            items
                .iter()
                .map(|item| dump_value(item, options, include, exclude))
                .collect(),
        ),
        // Dict of records: the filters apply to each record
        Value::Map(map) if map.values().any(|v| matches!(v, Value::Record(_))) => Value::Map(
            map.iter()
                .map(|(k, v)| (k.clone(), dump_value(v, options, include, exclude)))
                .collect(),
        ),
        // Plain dict: the filters select keys
        Value::Map(map) => Value::Map(
            map.iter()
                .filter_map(|(k, v)| {
                    let (sub_include, sub_exclude) = narrow(k, include, exclude)?;
                    Some((k.clone(), dump_value(v, options, sub_include, sub_exclude)))
                })
                .collect(),
        ),
        other => other.clone(),
    }
}
