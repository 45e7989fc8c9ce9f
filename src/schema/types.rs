//! Field type and field specification definitions
//!
//! Supported types:
//! - str: UTF-8 string
//! - int: 64-bit signed integer
//! - float: 64-bit floating point
//! - bool: Boolean
//! - date: calendar date (`YYYY-MM-DD`)
//! - email / url: strings carrying an implied format constraint
//! - list / dict: homogeneous collections
//! - optional: accepts null in addition to the inner type
//! - record: nested record validated against its own schema

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::model::RecordSchema;
use crate::validate::hooks::{FieldHook, HookError};
use crate::value::Value;

/// Declared semantic type of a field.
#[derive(Debug, Clone)]
pub enum FieldType {
    Str,
    Int,
    Float,
    Bool,
    Date,
    Email,
    Url,
    /// Homogeneous list with a single element type
    List(Box<FieldType>),
    /// String-keyed map with a single value type
    Dict(Box<FieldType>),
    /// The inner type, or null
    Optional(Box<FieldType>),
    /// Nested record with its own schema
    Record(RecordSchema),
    /// Any value, passed through untouched
    Any,
}

impl FieldType {
    pub fn list(element: FieldType) -> Self {
        FieldType::List(Box::new(element))
    }

    pub fn dict(value: FieldType) -> Self {
        FieldType::Dict(Box::new(value))
    }

    pub fn optional(inner: FieldType) -> Self {
        FieldType::Optional(Box::new(inner))
    }

    pub fn record(schema: &RecordSchema) -> Self {
        FieldType::Record(schema.clone())
    }

    /// Returns the type name for error messages
    pub fn type_name(&self) -> String {
        match self {
            FieldType::Str => "str".into(),
            FieldType::Int => "int".into(),
            FieldType::Float => "float".into(),
            FieldType::Bool => "bool".into(),
            FieldType::Date => "date".into(),
            FieldType::Email => "email".into(),
            FieldType::Url => "url".into(),
            FieldType::List(inner) => format!("list[{}]", inner.type_name()),
            FieldType::Dict(inner) => format!("dict[str, {}]", inner.type_name()),
            FieldType::Optional(inner) => format!("optional[{}]", inner.type_name()),
            FieldType::Record(schema) => schema.name().to_string(),
            FieldType::Any => "any".into(),
        }
    }

    /// Strips any `Optional` wrappers.
    pub fn innermost(&self) -> &FieldType {
        match self {
            FieldType::Optional(inner) => inner.innermost(),
            other => other,
        }
    }

    /// True for lists, dicts and nested records.
    pub fn is_container(&self) -> bool {
        matches!(self, FieldType::List(_) | FieldType::Dict(_) | FieldType::Record(_))
    }

    /// Format implied by the type itself, if any.
    pub fn implied_format(&self) -> Option<Format> {
        match self.innermost() {
            FieldType::Email => Some(Format::Email),
            FieldType::Url => Some(Format::Url),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Structured string formats checked by the constraint checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Email,
    Url,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Email => "email",
            Format::Url => "url",
        }
    }
}

/// Declarative per-field rules, applied after coercion.
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    /// Characters for strings, items for collections, digits for integers
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub gt: Option<Value>,
    pub ge: Option<Value>,
    pub lt: Option<Value>,
    pub le: Option<Value>,
    pub one_of: Option<Vec<Value>>,
    pub pattern: Option<Regex>,
    pub format: Option<Format>,
}

impl Constraints {
    /// Returns true if no rule is declared
    pub fn is_empty(&self) -> bool {
        self.min_length.is_none()
            && self.max_length.is_none()
            && self.gt.is_none()
            && self.ge.is_none()
            && self.lt.is_none()
            && self.le.is_none()
            && self.one_of.is_none()
            && self.pattern.is_none()
            && self.format.is_none()
    }
}

/// Informational annotations. Never consulted during validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub examples: Vec<Value>,
}

/// Declarative description of one record field.
#[derive(Clone)]
pub struct FieldSpec {
    pub(crate) name: String,
    pub(crate) alias: Option<String>,
    pub(crate) field_type: FieldType,
    pub(crate) default: Option<Value>,
    pub(crate) constraints: Constraints,
    pub(crate) strict: bool,
    pub(crate) meta: FieldMeta,
    pub(crate) before: Vec<FieldHook>,
    pub(crate) after: Vec<FieldHook>,
    /// Deferred until the schema is built
    pub(crate) pattern_error: Option<String>,
}

impl FieldSpec {
    /// Creates a required field of the given type
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            alias: None,
            field_type,
            default: None,
            constraints: Constraints::default(),
            strict: false,
            meta: FieldMeta::default(),
            before: Vec::new(),
            after: Vec::new(),
            pattern_error: None,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Str)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Int)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Float)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Bool)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Date)
    }

    pub fn email(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Email)
    }

    pub fn url(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Url)
    }

    pub fn list(name: impl Into<String>, element: FieldType) -> Self {
        Self::new(name, FieldType::list(element))
    }

    pub fn dict(name: impl Into<String>, value: FieldType) -> Self {
        Self::new(name, FieldType::dict(value))
    }

    /// Creates an optional field defaulting to null
    pub fn optional(name: impl Into<String>, inner: FieldType) -> Self {
        Self::new(name, FieldType::optional(inner)).default(Value::Null)
    }

    pub fn record(name: impl Into<String>, schema: &RecordSchema) -> Self {
        Self::new(name, FieldType::record(schema))
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Input key to read instead of the field name
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Disables coercion for this field
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    pub fn min_length(mut self, n: usize) -> Self {
        self.constraints.min_length = Some(n);
        self
    }

    pub fn max_length(mut self, n: usize) -> Self {
        self.constraints.max_length = Some(n);
        self
    }

    /// Exact length: sets both bounds
    pub fn length(self, n: usize) -> Self {
        self.min_length(n).max_length(n)
    }

    pub fn gt(mut self, bound: impl Into<Value>) -> Self {
        self.constraints.gt = Some(bound.into());
        self
    }

    pub fn ge(mut self, bound: impl Into<Value>) -> Self {
        self.constraints.ge = Some(bound.into());
        self
    }

    pub fn lt(mut self, bound: impl Into<Value>) -> Self {
        self.constraints.lt = Some(bound.into());
        self
    }

    pub fn le(mut self, bound: impl Into<Value>) -> Self {
        self.constraints.le = Some(bound.into());
        self
    }

    pub fn one_of<V: Into<Value>>(mut self, allowed: impl IntoIterator<Item = V>) -> Self {
        self.constraints.one_of = Some(allowed.into_iter().map(Into::into).collect());
        self
    }

    /// Regex the string value must match. Compile errors surface at build time.
    pub fn pattern(mut self, source: &str) -> Self {
        match Regex::new(source) {
            Ok(regex) => {
                self.constraints.pattern = Some(regex);
                self.pattern_error = None;
            }
            Err(e) => self.pattern_error = Some(e.to_string()),
        }
        self
    }

    pub fn format(mut self, format: Format) -> Self {
        self.constraints.format = Some(format);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.meta.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.meta.description = Some(description.into());
        self
    }

    pub fn examples<V: Into<Value>>(mut self, examples: impl IntoIterator<Item = V>) -> Self {
        self.meta.examples = examples.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a hook that sees the raw input before coercion.
    pub fn before<F>(mut self, hook: F) -> Self
    where
        F: Fn(Value) -> Result<Value, HookError> + Send + Sync + 'static,
    {
        self.before.push(std::sync::Arc::new(hook));
        self
    }

    /// Adds a hook that sees the coerced, constraint-checked value.
    pub fn after<F>(mut self, hook: F) -> Self
    where
        F: Fn(Value) -> Result<Value, HookError> + Send + Sync + 'static,
    {
        self.after.push(std::sync::Arc::new(hook));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Key looked up in the raw input
    pub fn input_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// A field without a default must be supplied
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn meta(&self) -> &FieldMeta {
        &self.meta
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("alias", &self.alias)
            .field("field_type", &self.field_type)
            .field("default", &self.default)
            .field("constraints", &self.constraints)
            .field("strict", &self.strict)
            .field("meta", &self.meta)
            .field("before_hooks", &self.before.len())
            .field("after_hooks", &self.after.len())
            .finish()
    }
}
