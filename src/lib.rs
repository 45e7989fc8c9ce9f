//! veridata - declarative schema validation for records
//!
//! Declare a `RecordSchema` once, then turn raw input mappings into
//! `ValidatedRecord`s:
//!
//! ```
//! use veridata::{record, FieldSpec, RecordSchema, DumpOptions};
//!
//! let person = RecordSchema::builder("Person")
//!     .field(FieldSpec::string("name").min_length(3).max_length(30))
//!     .field(FieldSpec::int("age").default(18).ge(18).le(90))
//!     .build()
//!     .unwrap();
//!
//! let kavi = person.validate(record! { "name" => "Kavi", "age" => "21" }).unwrap();
//! assert_eq!(kavi.to_text(&DumpOptions::new()).unwrap(), r#"{"name":"Kavi","age":21}"#);
//!
//! let err = person.validate(record! { "name" => "Ra", "age" => 10 }).unwrap_err();
//! assert_eq!(err.violation_count(), 2);
//! ```

pub mod errors;
pub mod record;
pub mod schema;
pub mod serialize;
pub mod validate;
pub mod value;

pub use errors::{Error, Result};
pub use record::ValidatedRecord;
pub use schema::{
    ExtraPolicy, FieldSpec, FieldType, Format, RecordSchema, SchemaBuilder, SchemaConfig, SchemaError,
    SchemaRegistry,
};
pub use serialize::{DumpOptions, FieldPaths};
pub use validate::{Candidate, FieldError, HookError, ValidationError};
pub use value::{Mapping, Value};
