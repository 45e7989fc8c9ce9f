//! Validation engine
//!
//! Turns raw input mappings into `ValidatedRecord`s:
//!
//! - Coercion to declared types, disabled per field by `strict`
//! - Declarative constraints, all failures reported per field
//! - Before/after field hooks and model-level hooks
//! - Every field error collected into one `ValidationError`

pub mod coerce;
pub mod constraints;
pub mod errors;
pub mod hooks;
pub(crate) mod pipeline;

pub use errors::{
    ConstraintFailure, ConstraintKind, ConstraintViolationError, CustomValidationError, FieldError, HookPhase,
    TypeMismatchError, ValidationError, Violation,
};
pub use coerce::InputSource;
pub use hooks::{Candidate, FieldHook, HookError, ModelHook};
