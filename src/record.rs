//! Validated records
//!
//! A `ValidatedRecord` only comes out of the validation pipeline and has no
//! mutators. It remembers which fields were explicitly supplied so dumps
//! can leave out defaulted ones.

use std::collections::BTreeSet;
use std::fmt;

use crate::schema::RecordSchema;
use crate::serialize::{self, DumpOptions, SerializeError};
use crate::value::{Mapping, Value};

/// Immutable, fully validated record.
#[derive(Clone)]
pub struct ValidatedRecord {
    schema: RecordSchema,
    values: Mapping,
    fields_set: BTreeSet<String>,
}

impl ValidatedRecord {
    pub(crate) fn new(schema: RecordSchema, values: Mapping, fields_set: BTreeSet<String>) -> Self {
        Self {
            schema,
            values,
            fields_set,
        }
    }

    /// Schema the record was validated against
    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    pub fn schema_name(&self) -> &str {
        self.schema.name()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Field values in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True if the field was present in the input, as opposed to defaulted
    pub fn is_set(&self, name: &str) -> bool {
        self.fields_set.contains(name)
    }

    /// Names of explicitly supplied fields, sorted
    pub fn fields_set(&self) -> impl Iterator<Item = &str> {
        self.fields_set.iter().map(String::as_str)
    }

    /// Evaluates a computed field. `None` if the schema declares no such field.
    pub fn computed(&self, name: &str) -> Option<Value> {
        self.schema.computed_field(name).map(|c| c.evaluate(self))
    }

    /// Gives up the record, keeping only its field values
    pub fn into_values(self) -> Mapping {
        self.values
    }

    /// Plain mapping view; see `serialize::to_mapping`
    pub fn to_mapping(&self, options: &DumpOptions) -> Mapping {
        serialize::to_mapping(self, options)
    }

    /// JSON text; see `serialize::to_text`
    pub fn to_text(&self, options: &DumpOptions) -> Result<String, SerializeError> {
        serialize::to_text(self, options)
    }
}

impl PartialEq for ValidatedRecord {
    /// Same schema name and same field values. Supplied-field tracking is
    /// not part of equality.
    fn eq(&self, other: &Self) -> bool {
        self.schema.name() == other.schema.name() && self.values == other.values
    }
}

impl fmt::Debug for ValidatedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedRecord")
            .field("schema", &self.schema.name())
            .field("values", &self.values)
            .field("fields_set", &self.fields_set)
            .finish()
    }
}

impl fmt::Display for ValidatedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.schema.name())?;
        for (i, (name, value)) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        write!(f, ")")
    }
}
