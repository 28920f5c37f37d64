//! Declarative schema nodes and type descriptors for parameter validation.
//!
//! A [`SchemaNode`] describes how one logical field is validated: as a
//! scalar leaf governed by a [`TypeDescriptor`], as an array of such
//! values, or as a nested object with its own declared fields.
//!
//! This crate only holds the data model and the configuration layer that
//! builds it from JSON. The interpreter lives in `valprims-validate`.

pub mod config;
pub mod error;
pub mod loader;
pub mod node;
pub mod registry;
pub mod rule;
pub mod types;

pub use config::LoaderConfig;
pub use error::{Result, SchemaError};
pub use loader::SchemaLoader;
pub use node::{Field, SchemaNode};
pub use registry::TypeRegistry;
pub use rule::{InlineCheck, Rule, RuleCheck, NEGATION_PREFIX};
pub use types::{AnyType, BooleanType, IntegerType, NumberType, StringType, TypeDescriptor};
