//! Validation error types
//!
//! Every field-level failure is a `FieldError`. A failed record
//! construction returns one `ValidationError` aggregating all of them, or
//! exactly one model-level `CustomValidationError` if every field passed.

use std::fmt;

use thiserror::Error;

use crate::value::Value;

/// Coercion or strictness failure.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("input should be a valid {expected}, got {} {raw}", .raw.type_name())]
pub struct TypeMismatchError {
    /// Field path (e.g., "address.pincode", "hobbies[2]")
    pub path: String,
    /// Declared type name
    pub expected: String,
    /// Offending raw value
    pub raw: Value,
}

impl TypeMismatchError {
    pub fn new(path: impl Into<String>, expected: impl Into<String>, raw: Value) -> Self {
        Self {
            path: path.into(),
            expected: expected.into(),
            raw,
        }
    }
}

/// Which declarative rule failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    TooShort,
    TooLong,
    GreaterThan,
    GreaterThanEqual,
    LessThan,
    LessThanEqual,
    NotOneOf,
    PatternMismatch,
    InvalidFormat,
}

impl ConstraintKind {
    pub fn code(&self) -> &'static str {
        match self {
            ConstraintKind::TooShort => "too_short",
            ConstraintKind::TooLong => "too_long",
            ConstraintKind::GreaterThan => "greater_than",
            ConstraintKind::GreaterThanEqual => "greater_than_equal",
            ConstraintKind::LessThan => "less_than",
            ConstraintKind::LessThanEqual => "less_than_equal",
            ConstraintKind::NotOneOf => "not_one_of",
            ConstraintKind::PatternMismatch => "pattern_mismatch",
            ConstraintKind::InvalidFormat => "invalid_format",
        }
    }

    /// True for the two length rules
    pub fn is_length(&self) -> bool {
        matches!(self, ConstraintKind::TooShort | ConstraintKind::TooLong)
    }
}

/// One violated constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintFailure {
    pub kind: ConstraintKind,
    pub message: String,
}

impl ConstraintFailure {
    pub fn new(kind: ConstraintKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Every constraint a single field violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_failures(.failures))]
pub struct ConstraintViolationError {
    pub path: String,
    pub failures: Vec<ConstraintFailure>,
}

fn join_failures(failures: &[ConstraintFailure]) -> String {
    failures
        .iter()
        .map(|f| f.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Phase a custom hook ran in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
    Before,
    After,
    Model,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookPhase::Before => write!(f, "before"),
            HookPhase::After => write!(f, "after"),
            HookPhase::Model => write!(f, "model"),
        }
    }
}

/// Rejection raised by a user hook.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CustomValidationError {
    /// Field path, empty for model hooks on the root record
    pub path: String,
    pub phase: HookPhase,
    pub message: String,
}

/// A single field-level failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("field required")]
    Missing { path: String },

    #[error("extra inputs are not permitted")]
    ExtraForbidden { path: String },

    #[error("{message}")]
    InvalidInput { path: String, message: String },

    #[error(transparent)]
    TypeMismatch(#[from] TypeMismatchError),

    #[error(transparent)]
    Constraint(#[from] ConstraintViolationError),

    #[error(transparent)]
    Custom(#[from] CustomValidationError),
}

impl FieldError {
    pub fn path(&self) -> &str {
        match self {
            FieldError::Missing { path }
            | FieldError::ExtraForbidden { path }
            | FieldError::InvalidInput { path, .. } => path,
            FieldError::TypeMismatch(e) => &e.path,
            FieldError::Constraint(e) => &e.path,
            FieldError::Custom(e) => &e.path,
        }
    }

    fn path_mut(&mut self) -> &mut String {
        match self {
            FieldError::Missing { path }
            | FieldError::ExtraForbidden { path }
            | FieldError::InvalidInput { path, .. } => path,
            FieldError::TypeMismatch(e) => &mut e.path,
            FieldError::Constraint(e) => &mut e.path,
            FieldError::Custom(e) => &mut e.path,
        }
    }

    /// Re-roots the error under a parent field path.
    pub fn prefixed(mut self, prefix: &str) -> Self {
        let path = self.path_mut();
        *path = join_path(prefix, path);
        self
    }

    /// Number of individual violations carried
    pub fn violation_count(&self) -> usize {
        match self {
            FieldError::Constraint(e) => e.failures.len(),
            _ => 1,
        }
    }

    /// Flattens into one entry per individual violation
    pub fn violations(&self) -> Vec<Violation> {
        match self {
            FieldError::Missing { path } => vec![Violation::new(path, "missing", self.to_string())],
            FieldError::ExtraForbidden { path } => {
                vec![Violation::new(path, "extra_forbidden", self.to_string())]
            }
            FieldError::InvalidInput { path, message } => {
                vec![Violation::new(path, "invalid_input", message.clone())]
            }
            FieldError::TypeMismatch(e) => vec![Violation::new(&e.path, "type_mismatch", e.to_string())],
            FieldError::Constraint(e) => e
                .failures
                .iter()
                .map(|f| Violation::new(&e.path, f.kind.code(), f.message.clone()))
                .collect(),
            FieldError::Custom(e) => {
                let code = match e.phase {
                    HookPhase::Model => "model_error",
                    _ => "value_error",
                };
                vec![Violation::new(&e.path, code, e.message.clone())]
            }
        }
    }
}

/// Joins a parent path and a child path segment.
pub(crate) fn join_path(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        path.to_string()
    } else if path.is_empty() {
        prefix.to_string()
    } else if path.starts_with('[') {
        format!("{}{}", prefix, path)
    } else {
        format!("{}.{}", prefix, path)
    }
}

/// Flat view of a single violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub code: &'static str,
    pub message: String,
}

impl Violation {
    fn new(path: &str, code: &'static str, message: String) -> Self {
        Self {
            path: path.to_string(),
            code,
            message,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "$root" } else { &self.path };
        write!(f, "{}\n  {} [{}]", path, self.message, self.code)
    }
}

/// Failed record construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    schema: String,
    errors: Vec<FieldError>,
}

impl ValidationError {
    pub(crate) fn new(schema: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            schema: schema.into(),
            errors,
        }
    }

    /// Single model-level rejection
    pub(crate) fn model(schema: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            schema,
            vec![FieldError::Custom(CustomValidationError {
                path: String::new(),
                phase: HookPhase::Model,
                message: message.into(),
            })],
        )
    }

    pub(crate) fn invalid_input(schema: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            schema,
            vec![FieldError::InvalidInput {
                path: String::new(),
                message: message.into(),
            }],
        )
    }

    /// Name of the schema validation ran against
    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    /// One entry per individual violation, in field order
    pub fn violations(&self) -> Vec<Violation> {
        self.errors.iter().flat_map(FieldError::violations).collect()
    }

    pub fn violation_count(&self) -> usize {
        self.errors.iter().map(FieldError::violation_count).sum()
    }

    /// Errors reported at exactly this path
    pub fn errors_at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.errors.iter().filter(move |e| e.path() == path)
    }

    /// True if the rejection came from a model-level hook on this record
    pub fn is_model_error(&self) -> bool {
        matches!(
            self.errors.as_slice(),
            [FieldError::Custom(CustomValidationError { phase: HookPhase::Model, path, .. })] if path.is_empty()
        )
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.violation_count();
        let noun = if count == 1 { "error" } else { "errors" };
        write!(f, "{} validation {} for {}", count, noun, self.schema)?;
        for violation in self.violations() {
            write!(f, "\n{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
