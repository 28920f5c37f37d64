//! Validates a "list users" request the way an HTTP handler would before
//! touching its arguments.
//!
//! Run with:
//!   cargo run --example list-users

use std::sync::Arc;

use serde_json::json;
use valprims::request::{RequestParts, RequestValidator, RouteValidation};
use valprims::schema::{IntegerType, SchemaNode, StringType};
use valprims::ValidationContext;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let ctx = ValidationContext::builder()
        .with_builtins()
        .rule("isSlug", |value: &serde_json::Value, _: &[serde_json::Value]| {
            value.as_str().is_some_and(|s| {
                !s.is_empty() && s.chars().all(|c| c.is_ascii_lowercase() || c == '-')
            })
        })
        .build();
    let ctx = Arc::new(ctx);

    let route = RouteValidation::new()
        .query_field(
            "page",
            SchemaNode::leaf(Arc::new(IntegerType))
                .default_value(1)
                .check(|v| v.as_i64().is_some_and(|n| n >= 1)),
        )
        .query_field(
            "role",
            SchemaNode::leaf(Arc::new(StringType)).multiple().optional(),
        )
        .param(
            "org",
            SchemaNode::leaf(Arc::new(StringType))
                .rule(valprims::schema::Rule::named("isSlug")),
        );

    let validator = RequestValidator::new(ctx);

    let mut req = RequestParts::new()
        .with_query(json!({ "page": "3", "role": ["admin", "owner"] }))
        .with_params(json!({ "org": "three-leaps" }));
    validator.validate_request(&route, &mut req)?;
    println!("query:  {}", req.validated("query").unwrap_or(&json!(null)));
    println!("params: {}", req.validated("params").unwrap_or(&json!(null)));

    let mut bad = RequestParts::new()
        .with_query(json!({ "page": "0" }))
        .with_params(json!({ "org": "3leaps" }));
    if let Err(err) = validator.validate_request(&route, &mut bad) {
        println!("rejected: {err}");
    }

    Ok(())
}
