use serde::Deserialize;
use serde_json::Value;
use valprims_schema::{Field, Rule, SchemaLoader, SchemaNode};

use crate::error::Result;

/// Per-route validation declaration for the three request maps.
///
/// Each declared map is validated as an implicit object node, so keys not
/// listed are rejected. Undeclared `query`/`body` maps validate as empty
/// objects; undeclared `params` are left untouched.
#[derive(Debug, Clone, Default)]
pub struct RouteValidation {
    pub query: Option<Vec<Field>>,
    pub body: Option<Vec<Field>>,
    pub params: Option<Vec<Field>>,
    /// The query map is an array of objects.
    pub multiple_query: bool,
    /// The body is an array of objects.
    pub multiple_body: bool,
    pub validate_query: Vec<Rule>,
    pub validate_body: Vec<Rule>,
    pub validate_params: Vec<Rule>,
    /// Pass the raw query through without validation.
    pub skip_query: bool,
    pub skip_body: bool,
    pub skip_params: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawRoute {
    query: Option<Value>,
    body: Option<Value>,
    params: Option<Value>,
    #[serde(default)]
    multiple_query: bool,
    #[serde(default)]
    multiple_body: bool,
    validate_query: Option<Value>,
    validate_body: Option<Value>,
    validate_params: Option<Value>,
    #[serde(default)]
    skip_query: bool,
    #[serde(default)]
    skip_body: bool,
    #[serde(default)]
    skip_params: bool,
}

impl RouteValidation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a route declaration such as
    /// `{"query": {"page": {"type": "integer"}}, "skipBody": true}`.
    pub fn load(loader: &SchemaLoader<'_>, value: &Value) -> Result<Self> {
        let raw = RawRoute::deserialize(value)?;

        let format = |v: &Option<Value>| -> Result<Option<Vec<Field>>> {
            v.as_ref()
                .map(|v| loader.load_format(v))
                .transpose()
                .map_err(Into::into)
        };
        let rules = |v: &Option<Value>| -> Result<Vec<Rule>> {
            match v {
                Some(v) => Ok(loader.load_rules(v)?),
                None => Ok(Vec::new()),
            }
        };

        Ok(Self {
            query: format(&raw.query)?,
            body: format(&raw.body)?,
            params: format(&raw.params)?,
            multiple_query: raw.multiple_query,
            multiple_body: raw.multiple_body,
            validate_query: rules(&raw.validate_query)?,
            validate_body: rules(&raw.validate_body)?,
            validate_params: rules(&raw.validate_params)?,
            skip_query: raw.skip_query,
            skip_body: raw.skip_body,
            skip_params: raw.skip_params,
        })
    }

    /// Load from a JSON string.
    pub fn load_str(loader: &SchemaLoader<'_>, json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::load(loader, &value)
    }

    pub fn query_field(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        self.query.get_or_insert_with(Vec::new).push((name.into(), node));
        self
    }

    pub fn body_field(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        self.body.get_or_insert_with(Vec::new).push((name.into(), node));
        self
    }

    pub fn param(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        self.params.get_or_insert_with(Vec::new).push((name.into(), node));
        self
    }

    /// Implicit object node for the query map.
    pub fn query_node(&self) -> SchemaNode {
        implicit_object(
            self.query.as_deref(),
            self.multiple_query,
            &self.validate_query,
        )
    }

    /// Implicit object node for the body.
    pub fn body_node(&self) -> SchemaNode {
        implicit_object(self.body.as_deref(), self.multiple_body, &self.validate_body)
    }

    /// Implicit object node for the path parameters, if any are declared.
    pub fn params_node(&self) -> Option<SchemaNode> {
        self.params
            .as_deref()
            .map(|fields| implicit_object(Some(fields), false, &self.validate_params))
    }
}

fn implicit_object(fields: Option<&[Field]>, multiple: bool, rules: &[Rule]) -> SchemaNode {
    SchemaNode {
        object: true,
        format: fields.map(<[Field]>::to_vec).unwrap_or_default(),
        multiple,
        rules: rules.to_vec(),
        ..SchemaNode::default()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use valprims_schema::{IntegerType, TypeRegistry};

    use super::*;
    use crate::error::RequestError;

    const LIST_USERS: &str = r#"{
        "query": {
            "page": { "type": "integer", "defaultValue": 1 },
            "q": { "type": "string", "optional": true }
        },
        "params": { "org": { "type": "string" } },
        "validateParams": { "NOT_equals": [{ "org": "root" }] },
        "skipBody": true
    }"#;

    #[test]
    fn loads_route_declaration() {
        let types = TypeRegistry::with_builtins();
        let route = RouteValidation::load_str(&SchemaLoader::new(&types), LIST_USERS).unwrap();

        let query = route.query.as_ref().unwrap();
        assert_eq!(query.len(), 2);
        assert_eq!(query[0].0, "page");
        assert!(route.body.is_none());
        assert!(route.skip_body && !route.skip_query);
        assert_eq!(route.validate_params.len(), 1);
        assert!(route.validate_params[0].negate);
    }

    #[test]
    fn implicit_nodes_wrap_fields() {
        let route = RouteValidation::new()
            .query_field("page", SchemaNode::leaf(Arc::new(IntegerType)))
            .param("id", SchemaNode::leaf(Arc::new(IntegerType)));

        let query = route.query_node();
        assert!(query.object && !query.multiple);
        assert!(query.declares("page"));

        let body = route.body_node();
        assert!(body.object && body.format.is_empty());

        assert!(route.params_node().is_some_and(|n| n.declares("id")));
        assert!(RouteValidation::new().params_node().is_none());
    }

    #[test]
    fn multiple_flags_carry_over_except_params() {
        let route = RouteValidation {
            multiple_query: true,
            multiple_body: true,
            params: Some(Vec::new()),
            ..RouteValidation::default()
        };
        assert!(route.query_node().multiple);
        assert!(route.body_node().multiple);
        assert!(!route.params_node().unwrap().multiple);
    }

    #[test]
    fn unknown_route_keys_are_rejected() {
        let types = TypeRegistry::with_builtins();
        let err = RouteValidation::load(&SchemaLoader::new(&types), &json!({ "headers": {} }))
            .unwrap_err();
        assert!(matches!(err, RequestError::InvalidJson(_)));
    }

    #[test]
    fn schema_errors_propagate() {
        let types = TypeRegistry::with_builtins();
        let err = RouteValidation::load(
            &SchemaLoader::new(&types),
            &json!({ "body": { "when": { "type": "date" } } }),
        )
        .unwrap_err();
        assert!(matches!(err, RequestError::Schema(_)));
    }
}
