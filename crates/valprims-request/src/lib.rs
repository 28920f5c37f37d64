//! Request-level validation of query, body and path parameters.
//!
//! This is the "just works" layer over `valprims-validate`. A
//! [`RouteValidation`] declares the accepted fields of each request map;
//! [`RequestValidator`] runs the interpreter over the raw maps and stores
//! the normalized results under configurable keys. [`describe_route`]
//! turns the same declarations into documentation without validating
//! anything, and [`RouteTable`] loads route declarations from JSON files.

pub mod adapter;
pub mod config;
pub mod describe;
pub mod error;
pub mod route;
pub mod table;

pub use adapter::{RequestParts, RequestValidator};
pub use config::{AdapterConfig, TableConfig};
pub use describe::{describe_node, describe_route, DocRow, FieldDoc, NamedField, RouteDoc};
pub use error::{RequestError, Result};
pub use route::RouteValidation;
pub use table::RouteTable;
