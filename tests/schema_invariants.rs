//! Schema Invariant Tests
//!
//! Properties every schema and record must keep:
//! - Registration is write-once per name
//! - Validation is deterministic and reports every field error at once
//! - Constraints are checked against coerced values
//! - Dumped records validate back to equal records
//! - Schemas are shareable across threads

use veridata::{
    record, DumpOptions, Error, ExtraPolicy, FieldSpec, FieldType, RecordSchema, SchemaConfig, SchemaError,
    SchemaRegistry, Value,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_registry() -> SchemaRegistry {
    let mut registry = SchemaRegistry::new();

    let address = registry
        .register(
            RecordSchema::builder("Address")
                .field(FieldSpec::string("city"))
                .field(FieldSpec::int("pincode").length(6))
                .build()
                .unwrap(),
        )
        .unwrap();

    registry
        .register(
            RecordSchema::builder("People")
                .description("A person with an address")
                .field(FieldSpec::string("name").min_length(3))
                .field(FieldSpec::int("age").default(18).ge(18).le(90))
                .field(FieldSpec::optional("hobbies", FieldType::list(FieldType::Str)).max_length(5))
                .field(FieldSpec::record("address", &address))
                .build()
                .unwrap(),
        )
        .unwrap();

    registry
}

// =============================================================================
// Registry Tests
// =============================================================================

/// A name can only be registered once.
#[test]
fn test_duplicate_registration_rejected() {
    let mut registry = setup_registry();
    let again = RecordSchema::builder("People").build().unwrap();

    let err = registry.register(again).unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateSchema(ref name) if name == "People"));
    assert_eq!(err.code(), "VD_DUPLICATE_SCHEMA");

    // Original definition untouched
    assert_eq!(registry.require("People").unwrap().field_count(), 4);
}

/// Registration order is kept.
#[test]
fn test_registry_names_in_order() {
    let registry = setup_registry();
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Address", "People"]);
    assert_eq!(registry.len(), 2);
}

/// Unknown schema names surface as schema errors.
#[test]
fn test_unknown_schema_fails() {
    let registry = setup_registry();
    let err = registry.validate("Missing", record! {}).unwrap_err();
    assert!(matches!(err, Error::Schema(SchemaError::UnknownSchema(_))));
    assert!(err.as_validation().is_none());
}

// =============================================================================
// Schema Definition Tests
// =============================================================================

#[test]
fn test_duplicate_field_rejected() {
    let err = RecordSchema::builder("Dup")
        .field(FieldSpec::string("name"))
        .field(FieldSpec::int("name"))
        .build()
        .unwrap_err();
    assert_eq!(err.code(), "VD_DUPLICATE_FIELD");
}

#[test]
fn test_default_violating_constraint_rejected() {
    let err = RecordSchema::builder("Person")
        .field(FieldSpec::int("age").default(10).ge(18))
        .build()
        .unwrap_err();
    assert!(matches!(err, SchemaError::InvalidDefault { ref field, .. } if field == "age"));
}

#[test]
fn test_bad_pattern_rejected() {
    let err = RecordSchema::builder("Code")
        .field(FieldSpec::string("code").pattern("([a-z"))
        .build()
        .unwrap_err();
    assert_eq!(err.code(), "VD_INVALID_PATTERN");
}

// =============================================================================
// Validation Determinism Tests
// =============================================================================

/// Same input validates the same way every time.
#[test]
fn test_validation_is_deterministic() {
    let registry = setup_registry();
    let input = record! {
        "name" => "Rahul",
        "age" => "25",
        "address" => record! { "city" => "Delhi", "pincode" => 110059 },
    };

    let first = registry.validate("People", input.clone()).unwrap();
    for _ in 0..100 {
        assert_eq!(registry.validate("People", input.clone()).unwrap(), first);
    }
}

/// Invalid input fails the same way every time.
#[test]
fn test_invalid_input_fails_consistently() {
    let registry = setup_registry();
    let input = record! { "name" => "Ra", "address" => record! { "city" => "Delhi", "pincode" => 1 } };

    let expected = registry.validate("People", input.clone()).unwrap_err().to_string();
    for _ in 0..100 {
        assert_eq!(registry.validate("People", input.clone()).unwrap_err().to_string(), expected);
    }
}

// =============================================================================
// Error Aggregation Tests
// =============================================================================

/// Every failing field is reported, not just the first.
#[test]
fn test_all_field_errors_reported() {
    let registry = setup_registry();
    let err = registry
        .validate(
            "People",
            record! {
                "name" => "Ra",
                "age" => 10,
                "hobbies" => vec!["a", "b", "c", "d", "e", "f"],
                "address" => record! { "city" => "Delhi", "pincode" => 11005 },
            },
        )
        .unwrap_err();

    let err = err.as_validation().unwrap();
    assert_eq!(err.schema(), "People");
    assert_eq!(err.violation_count(), 4);
    let paths: Vec<_> = err.violations().into_iter().map(|v| v.path).collect();
    assert_eq!(paths, vec!["name", "age", "hobbies", "address.pincode"]);
    assert!(err.to_string().starts_with("4 validation errors for People"));
}

/// A value violating several constraints counts each one.
#[test]
fn test_multiple_constraints_on_one_field() {
    let schema = RecordSchema::builder("Code")
        .field(FieldSpec::string("code").min_length(5).pattern("^[0-9]+$"))
        .build()
        .unwrap();
    let err = schema.validate(record! { "code" => "ab" }).unwrap_err();
    assert_eq!(err.errors().len(), 1);
    assert_eq!(err.violation_count(), 2);
}

/// Constraints are not checked on values that failed coercion.
#[test]
fn test_type_error_skips_constraints() {
    let registry = setup_registry();
    let err = registry
        .validate(
            "People",
            record! { "name" => "Rahul", "age" => "ten", "address" => record! { "city" => "Delhi", "pincode" => 110059 } },
        )
        .unwrap_err();
    let err = err.as_validation().unwrap();
    assert_eq!(err.violation_count(), 1);
    assert_eq!(err.violations()[0].code, "type_mismatch");
}

// =============================================================================
// Extra Key Tests
// =============================================================================

#[test]
fn test_extra_keys_ignored_by_default() {
    let schema = RecordSchema::builder("Person")
        .field(FieldSpec::string("name"))
        .build()
        .unwrap();
    let rec = schema.validate(record! { "name" => "Kavi", "nickname" => "K" }).unwrap();
    assert!(rec.get("nickname").is_none());
}

#[test]
fn test_extra_keys_forbidden() {
    let schema = RecordSchema::builder("Person")
        .config(SchemaConfig::default().with_extra(ExtraPolicy::Forbid))
        .field(FieldSpec::string("name"))
        .build()
        .unwrap();
    let err = schema.validate(record! { "name" => "Kavi", "nickname" => "K" }).unwrap_err();
    assert_eq!(err.violations()[0].code, "extra_forbidden");
    assert_eq!(err.violations()[0].path, "nickname");
}

// =============================================================================
// Round Trip Tests
// =============================================================================

/// A dumped record validates back to an equal record.
#[test]
fn test_dump_then_validate_round_trip() {
    let registry = setup_registry();
    let people = registry.require("People").unwrap();
    let original = people
        .validate(record! {
            "name" => "Rahul",
            "age" => "25",
            "hobbies" => vec!["chess"],
            "address" => record! { "city" => "Delhi", "pincode" => "110059" },
        })
        .unwrap();

    let mapping = original.to_mapping(&DumpOptions::new());
    assert_eq!(people.validate(mapping).unwrap(), original);

    let text = original.to_text(&DumpOptions::new()).unwrap();
    assert_eq!(people.validate_json(&text).unwrap(), original);
}

/// A validated instance passes through its own schema unchanged.
#[test]
fn test_validated_instance_accepted_as_is() {
    let registry = setup_registry();
    let people = registry.require("People").unwrap();
    let rec = people
        .validate(record! { "name" => "Rahul", "address" => record! { "city" => "Delhi", "pincode" => 110059 } })
        .unwrap();

    let again = people.validate_value(rec.clone()).unwrap();
    assert_eq!(again, rec);
    assert!(!again.is_set("age"));

    let address = registry.require("Address").unwrap();
    assert!(address.validate_value(rec).is_err());
    assert!(address.validate_value(Value::Int(3)).is_err());
}

// =============================================================================
// Concurrency Tests
// =============================================================================

/// One schema validates from many threads at once.
#[test]
fn test_concurrent_validation() {
    let registry = setup_registry();
    let people = registry.require("People").unwrap().clone();

    std::thread::scope(|scope| {
        for i in 0..8 {
            let people = people.clone();
            scope.spawn(move || {
                for j in 0..50 {
                    let age = 18 + ((i * 50 + j) % 70);
                    let rec = people
                        .validate(record! {
                            "name" => format!("worker{}", i),
                            "age" => age,
                            "address" => record! { "city" => "Delhi", "pincode" => 110059 },
                        })
                        .unwrap();
                    assert_eq!(rec.get("age"), Some(&Value::Int(i64::from(age))));
                }
            });
        }
    });
}
