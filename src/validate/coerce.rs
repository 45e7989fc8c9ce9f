//! Coercion of raw values to declared field types
//!
//! Strict fields accept exact type matches only. Lax fields additionally
//! accept narrow, lossless conversions:
//! - int <- integral float, numeral string
//! - float <- int, numeric string (finite)
//! - bool <- true/false/yes/no/on/off/t/f/y/n/1/0 tokens, integer 0/1
//! - date <- `YYYY-MM-DD` string
//!
//! Nothing is truncated: `2.5` never becomes an int.
//!
//! JSON has no date type, so input parsed from JSON text also accepts
//! `YYYY-MM-DD` strings on strict date fields.

use chrono::NaiveDate;

use super::errors::{join_path, FieldError, TypeMismatchError};
use super::pipeline;
use crate::schema::{FieldType, RecordSchema};
use crate::value::{Mapping, Value};

/// Coerced value, or every failure found inside it
pub type CoerceResult = Result<Value, Vec<FieldError>>;

/// Where raw input came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputSource {
    /// Values built in Rust
    #[default]
    Native,
    /// Values parsed from JSON text
    Json,
}

/// Coerces `raw` to `field_type`.
///
/// Containers coerce element by element and report every failing element
/// under its own path. Nested records run through the full pipeline.
pub fn coerce(raw: Value, field_type: &FieldType, strict: bool, path: &str) -> CoerceResult {
    coerce_from(raw, field_type, strict, InputSource::Native, path)
}

/// Like `coerce`, for input that came from `source`.
pub fn coerce_from(raw: Value, field_type: &FieldType, strict: bool, source: InputSource, path: &str) -> CoerceResult {
    match field_type {
        FieldType::Any => Ok(raw),
        FieldType::Optional(inner) => {
            if raw.is_null() {
                Ok(Value::Null)
            } else {
                coerce_from(raw, inner, strict, source, path)
            }
        }
        FieldType::List(inner) => coerce_list(raw, field_type, inner, strict, source, path),
        FieldType::Dict(inner) => coerce_dict(raw, field_type, inner, strict, source, path),
        FieldType::Record(schema) => coerce_record(raw, schema, source, path),
        scalar => coerce_scalar(raw, scalar, strict, source).map_err(|raw| vec![mismatch(path, scalar, raw)]),
    }
}

fn mismatch(path: &str, expected: &FieldType, raw: Value) -> FieldError {
    FieldError::TypeMismatch(TypeMismatchError::new(path, expected.type_name(), raw))
}

/// Hands the raw value back on failure so the error can carry it.
fn coerce_scalar(raw: Value, field_type: &FieldType, strict: bool, source: InputSource) -> Result<Value, Value> {
    match (field_type, raw) {
        (FieldType::Str | FieldType::Email | FieldType::Url, Value::Str(s)) => Ok(Value::Str(s)),
        (FieldType::Int, Value::Int(i)) => Ok(Value::Int(i)),
        (FieldType::Float, Value::Float(x)) => Ok(Value::Float(x)),
        (FieldType::Bool, Value::Bool(b)) => Ok(Value::Bool(b)),
        (FieldType::Date, Value::Date(d)) => Ok(Value::Date(d)),
        (FieldType::Date, raw @ Value::Str(_)) if source == InputSource::Json => {
            date_from(&raw).map(Value::Date).ok_or(raw)
        }
        (_, raw) if strict => Err(raw),
        (FieldType::Int, raw) => int_from(&raw).map(Value::Int).ok_or(raw),
        (FieldType::Float, raw) => float_from(&raw).map(Value::Float).ok_or(raw),
        (FieldType::Bool, raw) => bool_from(&raw).map(Value::Bool).ok_or(raw),
        (FieldType::Date, raw) => date_from(&raw).map(Value::Date).ok_or(raw),
        (_, raw) => Err(raw),
    }
}

fn int_from(raw: &Value) -> Option<i64> {
    match raw {
        Value::Float(x) if x.is_finite() && x.fract() == 0.0 => {
            // Range check before the cast; `as` saturates silently.
            if *x >= i64::MIN as f64 && *x < i64::MAX as f64 {
                Some(*x as i64)
            } else {
                None
            }
        }
        Value::Str(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn float_from(raw: &Value) -> Option<f64> {
    match raw {
        Value::Int(i) => Some(*i as f64),
        Value::Str(s) => s.trim().parse::<f64>().ok().filter(|x| x.is_finite()),
        _ => None,
    }
}

fn bool_from(raw: &Value) -> Option<bool> {
    match raw {
        Value::Int(0) => Some(false),
        Value::Int(1) => Some(true),
        Value::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "t" | "y" | "1" => Some(true),
            "false" | "no" | "off" | "f" | "n" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn date_from(raw: &Value) -> Option<NaiveDate> {
    match raw {
        Value::Str(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok(),
        _ => None,
    }
}

fn coerce_list(
    raw: Value,
    declared: &FieldType,
    element: &FieldType,
    strict: bool,
    source: InputSource,
    path: &str,
) -> CoerceResult {
    let items = match raw {
        Value::List(items) => items,
        other => return Err(vec![mismatch(path, declared, other)]),
    };

    let mut out = Vec::with_capacity(items.len());
    let mut errors = Vec::new();
    for (i, item) in items.into_iter().enumerate() {
        let item_path = format!("{}[{}]", path, i);
        match coerce_from(item, element, strict, source, &item_path) {
            Ok(value) => out.push(value),
            Err(errs) => errors.extend(errs),
        }
    }

    if errors.is_empty() {
        Ok(Value::List(out))
    } else {
        Err(errors)
    }
}

fn coerce_dict(
    raw: Value,
    declared: &FieldType,
    element: &FieldType,
    strict: bool,
    source: InputSource,
    path: &str,
) -> CoerceResult {
    let map = match raw {
        Value::Map(map) => map,
        other => return Err(vec![mismatch(path, declared, other)]),
    };

    let mut out = Mapping::with_capacity(map.len());
    let mut errors = Vec::new();
    for (key, value) in map {
        match coerce_from(value, element, strict, source, &join_path(path, &key)) {
            Ok(value) => {
                out.insert(key, value);
            }
            Err(errs) => errors.extend(errs),
        }
    }

    if errors.is_empty() {
        Ok(Value::Map(out))
    } else {
        Err(errors)
    }
}

fn coerce_record(raw: Value, schema: &RecordSchema, source: InputSource, path: &str) -> CoerceResult {
    let input = match raw {
        Value::Record(record) if record.schema().same_as(schema) => return Ok(Value::Record(record)),
        Value::Record(record) => record.into_values(),
        Value::Map(map) => map,
        other => return Err(vec![mismatch(path, &FieldType::Record(schema.clone()), other)]),
    };

    pipeline::run(schema, input, source).map(Value::from).map_err(|err| {
        err.into_errors()
            .into_iter()
            .map(|e| e.prefixed(path))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSpec;
    use rstest::rstest;

    fn lax(raw: impl Into<Value>, ty: FieldType) -> CoerceResult {
        coerce(raw.into(), &ty, false, "f")
    }

    fn strict(raw: impl Into<Value>, ty: FieldType) -> CoerceResult {
        coerce(raw.into(), &ty, true, "f")
    }

    #[rstest]
    #[case(Value::from("20"), Value::Int(20))]
    #[case(Value::from(" -7 "), Value::Int(-7))]
    #[case(Value::from(10.0), Value::Int(10))]
    #[case(Value::from(42), Value::Int(42))]
    fn test_lax_int_accepts(#[case] raw: Value, #[case] expected: Value) {
        assert_eq!(lax(raw, FieldType::Int).unwrap(), expected);
    }

    #[rstest]
    #[case(Value::from("thirty"))]
    #[case(Value::from(2.5))]
    #[case(Value::from("2.5"))]
    #[case(Value::from(true))]
    #[case(Value::Null)]
    #[case(Value::from(1e30))]
    fn test_lax_int_rejects(#[case] raw: Value) {
        let errs = lax(raw, FieldType::Int).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert!(matches!(&errs[0], FieldError::TypeMismatch(e) if e.path == "f" && e.expected == "int"));
    }

    #[rstest]
    #[case(Value::from("20"), Value::Float(20.0))]
    #[case(Value::from(20), Value::Float(20.0))]
    #[case(Value::from("18.5"), Value::Float(18.5))]
    fn test_lax_float_accepts(#[case] raw: Value, #[case] expected: Value) {
        assert_eq!(lax(raw, FieldType::Float).unwrap(), expected);
    }

    #[test]
    fn test_lax_float_rejects_non_finite() {
        assert!(lax("inf", FieldType::Float).is_err());
        assert!(lax("NaN", FieldType::Float).is_err());
    }

    #[rstest]
    #[case("true", true)]
    #[case("YES", true)]
    #[case(" on ", true)]
    #[case("0", false)]
    #[case("f", false)]
    #[case("No", false)]
    fn test_lax_bool_tokens(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(lax(raw, FieldType::Bool).unwrap(), Value::Bool(expected));
    }

    #[test]
    fn test_lax_bool_rejects_other_ints() {
        assert_eq!(lax(1, FieldType::Bool).unwrap(), Value::Bool(true));
        assert!(lax(2, FieldType::Bool).is_err());
        assert!(lax("maybe", FieldType::Bool).is_err());
    }

    #[test]
    fn test_lax_date_from_iso_string() {
        let d = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        assert_eq!(lax("2022-01-01", FieldType::Date).unwrap(), Value::Date(d));
        assert!(lax("01/01/2022", FieldType::Date).is_err());
        assert!(lax("2022-02-30", FieldType::Date).is_err());
    }

    #[test]
    fn test_string_never_coerced_from_number() {
        assert!(lax(5, FieldType::Str).is_err());
    }

    #[rstest]
    #[case(Value::from("20"), FieldType::Int)]
    #[case(Value::from(20), FieldType::Float)]
    #[case(Value::from("true"), FieldType::Bool)]
    #[case(Value::from("2022-01-01"), FieldType::Date)]
    #[case(Value::from(10.0), FieldType::Int)]
    fn test_strict_rejects_convertible(#[case] raw: Value, #[case] ty: FieldType) {
        assert!(strict(raw, ty).is_err());
    }

    #[test]
    fn test_strict_accepts_exact() {
        assert_eq!(strict(20, FieldType::Int).unwrap(), Value::Int(20));
        assert_eq!(strict("a@b.io", FieldType::Email).unwrap(), Value::from("a@b.io"));
    }

    #[test]
    fn test_json_input_accepts_iso_date_on_strict_field() {
        let d = NaiveDate::from_ymd_opt(1997, 8, 7).unwrap();
        let json = |raw: Value, ty: FieldType| coerce_from(raw, &ty, true, InputSource::Json, "f");

        assert_eq!(json(Value::from("1997-08-07"), FieldType::Date).unwrap(), Value::Date(d));
        assert_eq!(
            json(Value::from(vec!["1997-08-07"]), FieldType::list(FieldType::Date)).unwrap(),
            Value::from(vec![d])
        );
        assert!(json(Value::from("07/08/1997"), FieldType::Date).is_err());
        // Only dates get the exception
        assert!(json(Value::from("20"), FieldType::Int).is_err());
    }

    #[test]
    fn test_json_source_reaches_nested_records() {
        let employee = RecordSchema::builder("Employee")
            .field(FieldSpec::date("dob").strict())
            .build()
            .unwrap();
        let raw = Value::from(crate::record! { "dob" => "1997-08-07" });
        assert!(coerce(raw.clone(), &FieldType::record(&employee), false, "e").is_err());
        assert!(coerce_from(raw, &FieldType::record(&employee), false, InputSource::Json, "e").is_ok());
    }

    #[test]
    fn test_optional_accepts_null_only_when_declared() {
        assert_eq!(lax(Value::Null, FieldType::optional(FieldType::Int)).unwrap(), Value::Null);
        assert_eq!(lax("5", FieldType::optional(FieldType::Int)).unwrap(), Value::Int(5));
        assert!(lax(Value::Null, FieldType::Str).is_err());
    }

    #[test]
    fn test_list_reports_every_bad_element() {
        let raw = Value::from(vec![Value::from("1"), Value::from("x"), Value::from(3), Value::from("y")]);
        let errs = lax(raw, FieldType::list(FieldType::Int)).unwrap_err();
        let paths: Vec<_> = errs.iter().map(FieldError::path).collect();
        assert_eq!(paths, vec!["f[1]", "f[3]"]);
    }

    #[test]
    fn test_list_strictness_reaches_elements() {
        let raw = Value::from(vec!["1", "2"]);
        assert!(strict(raw.clone(), FieldType::list(FieldType::Int)).is_err());
        assert_eq!(
            lax(raw, FieldType::list(FieldType::Int)).unwrap(),
            Value::from(vec![1, 2])
        );
    }

    #[test]
    fn test_dict_paths_use_keys() {
        let raw = Value::from(crate::record! { "phone" => "1234567890", "fax" => 5 });
        let errs = lax(raw, FieldType::dict(FieldType::Str)).unwrap_err();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].path(), "f.fax");
    }

    #[test]
    fn test_nested_record_errors_are_rerooted() {
        let address = RecordSchema::builder("Address")
            .field(FieldSpec::string("city"))
            .field(FieldSpec::int("pincode"))
            .build()
            .unwrap();
        let raw = Value::from(crate::record! { "pincode" => "abc" });
        let errs = coerce(raw, &FieldType::record(&address), false, "address").unwrap_err();
        let paths: Vec<_> = errs.iter().map(FieldError::path).collect();
        assert_eq!(paths, vec!["address.city", "address.pincode"]);
    }

    #[test]
    fn test_validated_record_passes_through() {
        let address = RecordSchema::builder("Address")
            .field(FieldSpec::string("city"))
            .build()
            .unwrap();
        let record = address.validate(crate::record! { "city" => "Delhi" }).unwrap();
        let out = coerce(Value::from(record.clone()), &FieldType::record(&address), true, "address").unwrap();
        assert_eq!(out.as_record(), Some(&record));
    }
}
