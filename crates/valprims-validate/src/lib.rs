//! Recursive schema interpreter and rule evaluator for untyped input values.
//!
//! [`validate_value`] walks a [`SchemaNode`](valprims_schema::SchemaNode)
//! against a raw `serde_json::Value`: it applies the empty-string, default
//! and null policies, maps itself over arrays and declared object fields,
//! type-checks and parses leaves, then runs the node's rules. The first
//! failure is returned as a structured [`ValidateError`]; nothing is
//! aggregated and nothing is recovered locally.
//!
//! Absent values are `None`; explicit nulls are `Some(Value::Null)`.

pub mod context;
pub mod error;
pub mod evaluator;
pub mod interpreter;
pub mod rules;

pub use context::{ValidationContext, ValidationContextBuilder};
pub use error::{Diagnostic, InvalidTypeError, Reason, Result, ValidateError, ValidationError};
pub use evaluator::apply_rules;
pub use interpreter::validate_value;
pub use rules::{RuleFn, RuleRegistry};
