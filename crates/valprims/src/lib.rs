//! Declarative validation and normalization of untyped request parameters.
//!
//! valprims checks raw query, body and path values against schema nodes
//! before they reach application logic: shape (scalar, array, nested
//! object), defaults and null handling, type parsing, and named or inline
//! rules, failing fast with a structured error.
//!
//! # Crate Structure
//!
//! - [`schema`]: Schema nodes, type descriptors and the JSON schema loader
//! - [`validate`]: The recursive interpreter, rule evaluator and errors
//! - [`request`]: Query/body/params adapter and route documentation
//!   (behind `request` feature)

/// Re-export schema types.
pub mod schema {
    pub use valprims_schema::*;
}

/// Re-export validator types.
pub mod validate {
    pub use valprims_validate::*;
}

/// Re-export request adapter types (requires `request` feature).
#[cfg(feature = "request")]
pub mod request {
    pub use valprims_request::*;
}

pub use valprims_schema::{SchemaLoader, SchemaNode};
pub use valprims_validate::{validate_value, ValidateError, ValidationContext};
