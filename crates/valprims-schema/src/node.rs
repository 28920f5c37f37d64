use std::sync::Arc;

use serde_json::Value;

use crate::rule::Rule;
use crate::types::TypeDescriptor;

/// A declared sub-field of an object node: name and its schema.
pub type Field = (String, SchemaNode);

/// Describes how one logical field is validated and normalized.
///
/// Nodes are plain immutable data: the interpreter borrows them and never
/// writes back. Build them with the constructors and consuming setters, or
/// load them from JSON with [`SchemaLoader`](crate::SchemaLoader).
#[derive(Debug, Clone)]
pub struct SchemaNode {
    /// Pass the value through untouched.
    pub skip: bool,
    /// Value is an array whose elements are each validated by this node.
    pub multiple: bool,
    /// Value is a mapping validated field by field against `format`.
    pub object: bool,
    /// Declared sub-fields, in declaration order.
    pub format: Vec<Field>,
    /// Copy undeclared keys through instead of rejecting them.
    pub accept_other_keys: bool,
    /// Keep explicit nulls instead of turning them into "absent".
    pub accept_null: bool,
    /// Substituted for absent/null input. A `Null` default counts as none.
    pub default_value: Option<Value>,
    /// Treat an empty string as null.
    pub trim: bool,
    /// As an object sub-field, tolerate an absent result.
    pub optional: bool,
    /// Leaf type, used when not in object mode.
    pub type_desc: Option<Arc<dyn TypeDescriptor>>,
    /// Post-checks, in declaration order.
    pub rules: Vec<Rule>,
}

impl Default for SchemaNode {
    fn default() -> Self {
        Self {
            skip: false,
            multiple: false,
            object: false,
            format: Vec::new(),
            accept_other_keys: false,
            accept_null: false,
            default_value: None,
            trim: true,
            optional: false,
            type_desc: None,
            rules: Vec::new(),
        }
    }
}

impl SchemaNode {
    /// Scalar node governed by `type_desc`.
    pub fn leaf(type_desc: Arc<dyn TypeDescriptor>) -> Self {
        Self {
            type_desc: Some(type_desc),
            ..Self::default()
        }
    }

    /// Object node with the given declared fields.
    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, SchemaNode)>,
        K: Into<String>,
    {
        Self {
            object: true,
            format: fields.into_iter().map(|(k, n)| (k.into(), n)).collect(),
            ..Self::default()
        }
    }

    /// Node that passes every value through.
    pub fn skipped() -> Self {
        Self {
            skip: true,
            ..Self::default()
        }
    }

    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn accept_null(mut self) -> Self {
        self.accept_null = true;
        self
    }

    pub fn accept_other_keys(mut self) -> Self {
        self.accept_other_keys = true;
        self
    }

    /// Keep empty strings as-is instead of treating them as null.
    pub fn no_trim(mut self) -> Self {
        self.trim = false;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Append a declared field (object mode).
    pub fn field(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        self.object = true;
        self.format.push((name.into(), node));
        self
    }

    /// Append a rule.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append an inline predicate reported as `validate` when it fails.
    pub fn check<F>(self, check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.rule(Rule::inline("validate", check))
    }

    /// Whether a usable default is configured.
    pub fn has_default(&self) -> bool {
        matches!(&self.default_value, Some(v) if !v.is_null())
    }

    /// Whether `key` is one of the declared fields.
    pub fn declares(&self, key: &str) -> bool {
        self.format.iter().any(|(name, _)| name == key)
    }

    /// Declared sub-node for `key`, if any.
    pub fn sub_node(&self, key: &str) -> Option<&SchemaNode> {
        self.format
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, node)| node)
    }

    /// Name of the leaf type, `object` for object nodes, `any` when skipped.
    pub fn type_name(&self) -> &str {
        if self.skip {
            "any"
        } else if self.object {
            "object"
        } else {
            self.type_desc.as_deref().map_or("unknown", |t| t.name())
        }
    }
}
