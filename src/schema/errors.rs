//! Schema definition and registration errors
//!
//! Error codes:
//! - VD_DUPLICATE_SCHEMA
//! - VD_UNKNOWN_SCHEMA
//! - VD_DUPLICATE_FIELD
//! - VD_INVALID_DEFAULT
//! - VD_INVALID_PATTERN
//! - VD_INVALID_CONSTRAINT
//! - VD_COMPUTED_SHADOWS_FIELD

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Raised while building or registering schemas, never while validating records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("schema '{0}' is already registered")]
    DuplicateSchema(String),

    #[error("schema '{0}' is not registered")]
    UnknownSchema(String),

    #[error("schema '{schema}' declares field '{field}' more than once")]
    DuplicateField { schema: String, field: String },

    #[error("default for '{schema}.{field}' does not satisfy its own field: {reason}")]
    InvalidDefault {
        schema: String,
        field: String,
        reason: String,
    },

    #[error("pattern on '{schema}.{field}' does not compile: {reason}")]
    InvalidPattern {
        schema: String,
        field: String,
        reason: String,
    },

    #[error("constraint on '{schema}.{field}' is unusable: {reason}")]
    InvalidConstraint {
        schema: String,
        field: String,
        reason: String,
    },

    #[error("computed field '{field}' on '{schema}' has the same name as a declared field")]
    ComputedShadowsField { schema: String, field: String },
}

impl SchemaError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::DuplicateSchema(_) => "VD_DUPLICATE_SCHEMA",
            SchemaError::UnknownSchema(_) => "VD_UNKNOWN_SCHEMA",
            SchemaError::DuplicateField { .. } => "VD_DUPLICATE_FIELD",
            SchemaError::InvalidDefault { .. } => "VD_INVALID_DEFAULT",
            SchemaError::InvalidPattern { .. } => "VD_INVALID_PATTERN",
            SchemaError::InvalidConstraint { .. } => "VD_INVALID_CONSTRAINT",
            SchemaError::ComputedShadowsField { .. } => "VD_COMPUTED_SHADOWS_FIELD",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaError::DuplicateSchema("a".into()).code(), "VD_DUPLICATE_SCHEMA");
        assert_eq!(SchemaError::UnknownSchema("a".into()).code(), "VD_UNKNOWN_SCHEMA");
    }

    #[test]
    fn test_display_names_schema_and_field() {
        let err = SchemaError::InvalidDefault {
            schema: "Person".into(),
            field: "age".into(),
            reason: "age: input should be greater than or equal to 18".into(),
        };
        let display = err.to_string();
        assert!(display.contains("Person.age"));
        assert!(display.contains("greater than or equal to 18"));
    }
}
