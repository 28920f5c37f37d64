use std::sync::Arc;

use serde_json::{Map, Value};
use valprims_schema::SchemaNode;
use valprims_validate::{validate_value, ValidationContext};

use crate::config::AdapterConfig;
use crate::error::Result;
use crate::route::RouteValidation;

/// Raw request maps as extracted by the transport, plus the slots the
/// validated results are written to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParts {
    pub query: Option<Value>,
    pub body: Option<Value>,
    pub params: Option<Value>,
    /// Validated maps, keyed by [`AdapterConfig`] target keys.
    pub validated: Map<String, Value>,
}

impl RequestParts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    /// Validated map stored under `key`.
    pub fn validated(&self, key: &str) -> Option<&Value> {
        self.validated.get(key)
    }

    fn store(&mut self, key: &str, value: Option<Value>) {
        match value {
            Some(value) => {
                self.validated.insert(key.to_string(), value);
            }
            None => {
                self.validated.remove(key);
            }
        }
    }
}

/// Runs route declarations over request maps.
#[derive(Debug, Clone)]
pub struct RequestValidator {
    ctx: Arc<ValidationContext>,
    config: AdapterConfig,
}

impl RequestValidator {
    /// Validator writing to the default `query`/`body`/`params` keys.
    pub fn new(ctx: Arc<ValidationContext>) -> Self {
        Self::with_config(ctx, AdapterConfig::default())
    }

    pub fn with_config(ctx: Arc<ValidationContext>, config: AdapterConfig) -> Self {
        Self { ctx, config }
    }

    /// Validate the query, body and params of `req` against `route`.
    ///
    /// Skipped maps are copied through raw. Undeclared params leave their
    /// target key untouched. A map that resolves to absent removes its
    /// target key. Stops at the first failing map; earlier maps stay
    /// written.
    pub fn validate_request(&self, route: &RouteValidation, req: &mut RequestParts) -> Result<()> {
        let query = if route.skip_query {
            req.query.clone()
        } else {
            self.validate_map(&route.query_node(), "query", req.query.as_ref())?
        };
        req.store(&self.config.query_key, query);

        let body = if route.skip_body {
            req.body.clone()
        } else {
            self.validate_map(&route.body_node(), "body", req.body.as_ref())?
        };
        req.store(&self.config.body_key, body);

        if route.skip_params {
            let params = req.params.clone();
            req.store(&self.config.params_key, params);
        } else if let Some(node) = route.params_node() {
            let params = self.validate_map(&node, "params", req.params.as_ref())?;
            req.store(&self.config.params_key, params);
        }

        Ok(())
    }

    /// Validate a single path parameter.
    pub fn validate_param(
        &self,
        node: &SchemaNode,
        key: &str,
        value: Option<&Value>,
    ) -> Result<Option<Value>> {
        Ok(validate_value(node, &self.ctx, key, value)?)
    }

    pub fn context(&self) -> &ValidationContext {
        &self.ctx
    }

    /// Get adapter configuration.
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn validate_map(
        &self,
        node: &SchemaNode,
        name: &str,
        raw: Option<&Value>,
    ) -> Result<Option<Value>> {
        tracing::debug!(map = name, fields = node.format.len(), "validating request map");
        validate_value(node, &self.ctx, name, raw).map_err(|err| {
            tracing::warn!(
                map = name,
                field = err.field(),
                reason = err.reason_code(),
                "request map rejected"
            );
            err.into()
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use valprims_schema::{SchemaLoader, StringType};
    use valprims_validate::{Reason, ValidateError};

    use super::*;
    use crate::error::RequestError;

    const ROUTE: &str = r#"{
        "query": {
            "page": { "type": "integer", "defaultValue": 1 },
            "tags": { "type": "string", "multiple": true, "optional": true }
        },
        "body": {
            "name": { "type": "string", "validate": { "isLength": [1, 20] } },
            "admin": { "type": "boolean", "optional": true }
        },
        "params": { "id": { "type": "integer" } }
    }"#;

    fn validator() -> RequestValidator {
        RequestValidator::new(Arc::new(ValidationContext::with_builtins()))
    }

    fn route(validator: &RequestValidator, json: &str) -> RouteValidation {
        RouteValidation::load_str(&SchemaLoader::new(validator.context().types()), json).unwrap()
    }

    #[test]
    fn validates_all_three_maps() {
        let validator = validator();
        let route = route(&validator, ROUTE);
        let mut req = RequestParts::new()
            .with_query(json!({ "tags": ["a", "b"] }))
            .with_body(json!({ "name": "ada", "admin": "1" }))
            .with_params(json!({ "id": "42" }));

        validator.validate_request(&route, &mut req).unwrap();
        assert_eq!(req.validated("query"), Some(&json!({ "page": 1, "tags": ["a", "b"] })));
        assert_eq!(req.validated("body"), Some(&json!({ "name": "ada", "admin": true })));
        assert_eq!(req.validated("params"), Some(&json!({ "id": 42 })));
        // Raw maps are left as received.
        assert_eq!(req.params, Some(json!({ "id": "42" })));
    }

    #[test]
    fn custom_target_keys() {
        let validator = RequestValidator::with_config(
            Arc::new(ValidationContext::with_builtins()),
            AdapterConfig {
                query_key: "validQuery".into(),
                body_key: "validBody".into(),
                params_key: "validParams".into(),
            },
        );
        let route = route(&validator, ROUTE);
        let mut req = RequestParts::new()
            .with_query(json!({}))
            .with_body(json!({ "name": "x" }))
            .with_params(json!({ "id": 1 }));

        validator.validate_request(&route, &mut req).unwrap();
        let keys: Vec<&String> = req.validated.keys().collect();
        assert_eq!(keys, ["validQuery", "validBody", "validParams"]);
    }

    #[test]
    fn skipped_maps_pass_through_raw() {
        let validator = validator();
        let mut route = route(&validator, ROUTE);
        route.skip_query = true;
        route.skip_body = true;
        route.skip_params = true;

        let mut req = RequestParts::new()
            .with_query(json!({ "anything": "" }))
            .with_body(json!([1, 2]))
            .with_params(json!({ "id": "nope" }));
        validator.validate_request(&route, &mut req).unwrap();

        assert_eq!(req.validated("query"), Some(&json!({ "anything": "" })));
        assert_eq!(req.validated("body"), Some(&json!([1, 2])));
        assert_eq!(req.validated("params"), Some(&json!({ "id": "nope" })));
    }

    #[test]
    fn undeclared_params_are_untouched() {
        let validator = validator();
        let route = route(&validator, r#"{ "query": {} }"#);
        let mut req = RequestParts::new()
            .with_query(json!({}))
            .with_params(json!({ "id": "1" }));
        req.validated.insert("params".into(), json!("preset"));

        validator.validate_request(&route, &mut req).unwrap();
        assert_eq!(req.validated("params"), Some(&json!("preset")));
        // Absent body resolves to absent and leaves no key.
        assert_eq!(req.validated("body"), None);
    }

    #[test]
    fn undeclared_query_rejects_any_key() {
        let validator = validator();
        let route = RouteValidation::new();
        let mut req = RequestParts::new().with_query(json!({ "debug": "1" }));

        let err = validator.validate_request(&route, &mut req).unwrap_err();
        match err {
            RequestError::Validate(ValidateError::Validation(err)) => {
                assert_eq!(err.field, "debug");
                assert_eq!(err.reason, Reason::Unexpected);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn failure_stops_at_first_map() {
        let validator = validator();
        let route = route(&validator, ROUTE);
        let mut req = RequestParts::new()
            .with_query(json!({ "page": "2" }))
            .with_body(json!({ "name": "" }))
            .with_params(json!({ "id": "1" }));

        let err = validator.validate_request(&route, &mut req).unwrap_err();
        assert!(matches!(
            err,
            RequestError::Validate(ValidateError::Validation(ref e)) if e.field == "name" && e.reason == Reason::Required
        ));
        assert_eq!(req.validated("query"), Some(&json!({ "page": 2 })));
        assert_eq!(req.validated("params"), None);
    }

    #[test]
    fn multiple_body_validates_each_object() {
        let validator = validator();
        let mut route = route(&validator, ROUTE);
        route.multiple_body = true;
        let mut req = RequestParts::new()
            .with_query(json!({}))
            .with_body(json!([{ "name": "a" }, { "name": "b", "admin": false }]))
            .with_params(json!({ "id": 3 }));

        validator.validate_request(&route, &mut req).unwrap();
        assert_eq!(
            req.validated("body"),
            Some(&json!([{ "name": "a" }, { "name": "b", "admin": false }]))
        );
    }

    #[test]
    fn single_param_handler() {
        let validator = validator();
        let node = SchemaNode::leaf(Arc::new(StringType)).default_value("main");
        assert_eq!(
            validator.validate_param(&node, "branch", None).unwrap(),
            Some(json!("main"))
        );
        assert!(validator
            .validate_param(&node, "branch", Some(&json!(5)))
            .is_err());
    }
}
