//! Declarative constraint checking
//!
//! Pure predicates over an already coerced value. Every declared rule is
//! evaluated; all failures for the field come back in one error.

use std::cmp::Ordering;

use once_cell::sync::Lazy;
use regex::Regex;

use super::errors::{ConstraintFailure, ConstraintKind, ConstraintViolationError};
use crate::schema::{FieldSpec, Format};
use crate::value::Value;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9-]+(\.[a-zA-Z0-9-]+)*\.[a-zA-Z]{2,}$").unwrap()
});

static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://[^\s/$.?#][^\s]*$").unwrap()
});

/// Checks `value` against every constraint declared on `spec`.
///
/// Null values (only reachable through optional types) are not checked.
pub fn check(value: &Value, spec: &FieldSpec, path: &str) -> Result<(), ConstraintViolationError> {
    if value.is_null() {
        return Ok(());
    }

    let constraints = spec.constraints();
    let mut failures = Vec::new();

    if constraints.min_length.is_some() || constraints.max_length.is_some() {
        if let Some(size) = Size::of(value) {
            if let Some(min) = constraints.min_length {
                if size.count < min {
                    failures.push(ConstraintFailure::new(
                        ConstraintKind::TooShort,
                        format!("{} should have at least {} {}, not {}", size.subject, min, size.unit, size.count),
                    ));
                }
            }
            if let Some(max) = constraints.max_length {
                if size.count > max {
                    failures.push(ConstraintFailure::new(
                        ConstraintKind::TooLong,
                        format!("{} should have at most {} {}, not {}", size.subject, max, size.unit, size.count),
                    ));
                }
            }
        }
    }

    let bounds: [(Option<&Value>, ConstraintKind, fn(Ordering) -> bool, &str); 4] = [
        (constraints.gt.as_ref(), ConstraintKind::GreaterThan, Ordering::is_gt, "greater than"),
        (constraints.ge.as_ref(), ConstraintKind::GreaterThanEqual, Ordering::is_ge, "greater than or equal to"),
        (constraints.lt.as_ref(), ConstraintKind::LessThan, Ordering::is_lt, "less than"),
        (constraints.le.as_ref(), ConstraintKind::LessThanEqual, Ordering::is_le, "less than or equal to"),
    ];
    for (bound, kind, holds, phrase) in bounds {
        let Some(bound) = bound else { continue };
        if !value.compare(bound).is_some_and(holds) {
            failures.push(ConstraintFailure::new(kind, format!("input should be {} {}", phrase, bound)));
        }
    }

    if let Some(allowed) = &constraints.one_of {
        if !allowed.contains(value) {
            let listed = allowed.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
            failures.push(ConstraintFailure::new(
                ConstraintKind::NotOneOf,
                format!("input should be one of: {}", listed),
            ));
        }
    }

    if let (Some(pattern), Some(s)) = (&constraints.pattern, value.as_str()) {
        if !pattern.is_match(s) {
            failures.push(ConstraintFailure::new(
                ConstraintKind::PatternMismatch,
                format!("string should match pattern '{}'", pattern.as_str()),
            ));
        }
    }

    let format = constraints.format.or_else(|| spec.field_type().implied_format());
    if let (Some(format), Some(s)) = (format, value.as_str()) {
        if !matches_format(format, s) {
            let message = match format {
                Format::Email => "value is not a valid email address",
                Format::Url => "input should be a valid URL",
            };
            failures.push(ConstraintFailure::new(ConstraintKind::InvalidFormat, message));
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(ConstraintViolationError {
            path: path.to_string(),
            failures,
        })
    }
}

/// Returns true if `s` is well-formed for `format`
pub fn matches_format(format: Format, s: &str) -> bool {
    match format {
        Format::Email => EMAIL_REGEX.is_match(s),
        Format::Url => URL_REGEX.is_match(s),
    }
}

/// What length bounds measure for a given value.
struct Size {
    count: usize,
    subject: &'static str,
    unit: &'static str,
}

impl Size {
    fn of(value: &Value) -> Option<Size> {
        let (count, subject, unit) = match value {
            Value::Str(s) => (s.chars().count(), "string", "characters"),
            Value::List(items) => (items.len(), "list", "items"),
            Value::Map(map) => (map.len(), "dict", "items"),
            Value::Int(i) => (i.unsigned_abs().to_string().len(), "integer", "digits"),
            _ => return None,
        };
        Some(Size { count, subject, unit })
    }
}
