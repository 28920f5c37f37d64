use serde::Serialize;
use serde_json::Value;
use valprims_schema::{Field, SchemaNode};

use crate::route::RouteValidation;

/// Documentation view of one schema node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDoc {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(skip_serializing_if = "is_false")]
    pub multiple: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub accept_null: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub accept_other_keys: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Rule keys as configured, negated ones with their `NOT_` prefix.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<NamedField>,
}

/// A documented sub-field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedField {
    pub name: String,
    #[serde(flatten)]
    pub doc: FieldDoc,
}

/// Accepted body and query shapes of a route.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<FieldDoc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<FieldDoc>,
}

/// One flattened line of a [`FieldDoc`] tree, for tabular output.
#[derive(Debug, Clone, PartialEq)]
pub struct DocRow {
    /// Dotted path; array elements are marked with `[]`.
    pub path: String,
    pub type_name: String,
    pub required: bool,
    pub default: Option<Value>,
    pub rules: Vec<String>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Describe a node and its sub-fields without validating anything.
pub fn describe_node(node: &SchemaNode) -> FieldDoc {
    FieldDoc {
        type_name: node.type_name().to_string(),
        multiple: node.multiple,
        optional: node.optional,
        accept_null: node.accept_null,
        accept_other_keys: node.object && node.accept_other_keys,
        default: node.has_default().then(|| node.default_value.clone()).flatten(),
        rules: node.rules.iter().map(|rule| rule.display_key()).collect(),
        fields: describe_fields(&node.format),
    }
}

/// Describe the declared body and query of `route`. Params are not part
/// of route documentation.
pub fn describe_route(route: &RouteValidation) -> RouteDoc {
    let wrap = |fields: &Option<Vec<Field>>| {
        fields
            .as_deref()
            .map(|fields| describe_node(&SchemaNode::object(fields.to_vec())))
    };
    RouteDoc {
        body: wrap(&route.body),
        query: wrap(&route.query),
    }
}

fn describe_fields(fields: &[Field]) -> Vec<NamedField> {
    fields
        .iter()
        .map(|(name, node)| NamedField {
            name: name.clone(),
            doc: describe_node(node),
        })
        .collect()
}

impl FieldDoc {
    /// Flatten the sub-fields into rows with dotted paths under `prefix`.
    pub fn rows(&self, prefix: &str) -> Vec<DocRow> {
        let mut rows = Vec::new();
        collect_rows(&self.fields, prefix, &mut rows);
        rows
    }
}

fn collect_rows(fields: &[NamedField], prefix: &str, rows: &mut Vec<DocRow>) {
    for field in fields {
        let mut path = if prefix.is_empty() {
            field.name.clone()
        } else {
            format!("{prefix}.{}", field.name)
        };
        if field.doc.multiple {
            path.push_str("[]");
        }
        rows.push(DocRow {
            path: path.clone(),
            type_name: field.doc.type_name.clone(),
            required: !field.doc.optional && field.doc.default.is_none(),
            default: field.doc.default.clone(),
            rules: field.doc.rules.clone(),
        });
        collect_rows(&field.doc.fields, &path, rows);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use valprims_schema::{SchemaLoader, TypeRegistry};

    use super::*;

    const ROUTE: &str = r#"{
        "query": {
            "page": { "type": "int", "defaultValue": 1, "validate": { "min": [1] } }
        },
        "body": {
            "user": {
                "object": true,
                "format": {
                    "email": { "type": "string", "validate": { "isEmail": true, "NOT_contains": ["+"] } },
                    "nick": { "type": "string", "optional": true, "acceptNull": true }
                },
                "acceptOtherKeys": true
            },
            "tags": { "type": "string", "multiple": true, "optional": true }
        },
        "params": { "id": { "type": "integer" } }
    }"#;

    fn route() -> RouteValidation {
        let types = TypeRegistry::with_builtins();
        RouteValidation::load_str(&SchemaLoader::new(&types), ROUTE).unwrap()
    }

    #[test]
    fn route_doc_covers_body_and_query_only() {
        let doc = describe_route(&route());
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            json,
            json!({
                "body": {
                    "type": "object",
                    "fields": [
                        {
                            "name": "user",
                            "type": "object",
                            "accept_other_keys": true,
                            "fields": [
                                { "name": "email", "type": "string", "rules": ["isEmail", "NOT_contains"] },
                                { "name": "nick", "type": "string", "optional": true, "accept_null": true }
                            ]
                        },
                        { "name": "tags", "type": "string", "multiple": true, "optional": true }
                    ]
                },
                "query": {
                    "type": "object",
                    "fields": [
                        { "name": "page", "type": "integer", "default": 1, "rules": ["min"] }
                    ]
                }
            })
        );
    }

    #[test]
    fn undeclared_maps_are_not_documented() {
        let doc = describe_route(&RouteValidation::new());
        assert_eq!(doc, RouteDoc::default());
        assert_eq!(serde_json::to_value(&doc).unwrap(), json!({}));
    }

    #[test]
    fn rows_flatten_nested_fields() {
        let doc = describe_route(&route());
        let rows = doc.body.unwrap().rows("body");
        let paths: Vec<&str> = rows.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            ["body.user", "body.user.email", "body.user.nick", "body.tags[]"]
        );
        assert!(rows[1].required);
        assert!(!rows[2].required);

        let query_rows = doc.query.unwrap().rows("");
        assert_eq!(query_rows[0].path, "page");
        assert!(!query_rows[0].required);
        assert_eq!(query_rows[0].default, Some(json!(1)));
    }
}
