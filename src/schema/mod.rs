//! Schema definitions for veridata
//!
//! Schemas are declared once, frozen by `SchemaBuilder::build`, and shared
//! read-only afterwards.
//!
//! # Design Principles
//!
//! - Field order is declaration order
//! - Defaults must satisfy their own field
//! - Metadata is annotation only
//! - Registration never overwrites

mod config;
mod describe;
mod errors;
mod model;
mod registry;
mod types;

pub use config::{ExtraPolicy, SchemaConfig};
pub use errors::{SchemaError, SchemaResult};
pub use model::{ComputeFn, ComputedField, RecordSchema, SchemaBuilder};
pub use registry::SchemaRegistry;
pub use types::{Constraints, FieldMeta, FieldSpec, FieldType, Format};
