use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::LoaderConfig;
use crate::error::{Result, SchemaError};
use crate::node::{Field, SchemaNode};
use crate::registry::TypeRegistry;
use crate::rule::Rule;

/// Builds [`SchemaNode`]s from JSON schema documents.
///
/// Type names are resolved against the borrowed [`TypeRegistry`] while
/// loading; rule names stay symbolic and are resolved by the validator at
/// call time.
///
/// ```json
/// {
///   "object": true,
///   "format": {
///     "id":   { "type": "integer" },
///     "tags": { "type": "string", "multiple": true, "optional": true },
///     "role": { "type": "string", "defaultValue": "user",
///               "validate": { "isIn": [["user", "admin"]] } }
///   }
/// }
/// ```
pub struct SchemaLoader<'a> {
    types: &'a TypeRegistry,
    config: LoaderConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawNode {
    #[serde(rename = "type")]
    type_name: Option<String>,
    #[serde(default)]
    skip: bool,
    #[serde(default)]
    multiple: bool,
    #[serde(default)]
    object: bool,
    format: Option<Map<String, Value>>,
    #[serde(default)]
    accept_other_keys: bool,
    #[serde(default)]
    accept_null: bool,
    #[serde(alias = "default")]
    default_value: Option<Value>,
    trim: Option<bool>,
    #[serde(default)]
    optional: bool,
    validate: Option<Map<String, Value>>,
}

impl<'a> SchemaLoader<'a> {
    /// Loader with default config.
    pub fn new(types: &'a TypeRegistry) -> Self {
        Self::with_config(types, LoaderConfig::default())
    }

    /// Loader with explicit config.
    pub fn with_config(types: &'a TypeRegistry, config: LoaderConfig) -> Self {
        Self { types, config }
    }

    /// Load a single node from a JSON string.
    pub fn load_str(&self, json: &str) -> Result<SchemaNode> {
        let value: Value = serde_json::from_str(json)?;
        self.load_value(&value)
    }

    /// Load a single node from a JSON value.
    pub fn load_value(&self, value: &Value) -> Result<SchemaNode> {
        self.node_at(value, "$", 0)
    }

    /// Load a field map (`{"name": node, ...}`) keeping declaration order.
    pub fn load_format(&self, value: &Value) -> Result<Vec<Field>> {
        self.format_at(value, "$", 0)
    }

    /// Load a `validate` map.
    pub fn load_rules(&self, value: &Value) -> Result<Vec<Rule>> {
        match value {
            Value::Object(map) => self.rules_at(map, "$"),
            other => Err(SchemaError::InvalidNode {
                path: "$".to_string(),
                message: format!("validate must be an object, got {}", kind_of(other)),
            }),
        }
    }

    /// Registry used to resolve type names.
    pub fn types(&self) -> &TypeRegistry {
        self.types
    }

    /// Get loader configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    fn node_at(&self, value: &Value, path: &str, depth: usize) -> Result<SchemaNode> {
        if depth > self.config.max_depth {
            return Err(SchemaError::TooDeep {
                path: path.to_string(),
                max: self.config.max_depth,
            });
        }

        let raw = RawNode::deserialize(value).map_err(|err| SchemaError::InvalidNode {
            path: path.to_string(),
            message: err.to_string(),
        })?;

        let type_desc = match &raw.type_name {
            Some(name) => Some(self.types.get(name).ok_or_else(|| SchemaError::UnknownType {
                name: name.clone(),
                path: path.to_string(),
            })?),
            None => None,
        };

        let object = raw.object || raw.format.is_some();
        if object && type_desc.is_some() {
            return Err(SchemaError::InvalidNode {
                path: path.to_string(),
                message: "node declares both a type and object format".to_string(),
            });
        }
        if !object && !raw.skip && type_desc.is_none() {
            return Err(SchemaError::InvalidNode {
                path: path.to_string(),
                message: "leaf node requires a type".to_string(),
            });
        }

        let format = match &raw.format {
            Some(map) => self.fields_at(map, &format!("{path}.format"), depth + 1)?,
            None => Vec::new(),
        };
        let rules = match &raw.validate {
            Some(map) => self.rules_at(map, &format!("{path}.validate"))?,
            None => Vec::new(),
        };

        Ok(SchemaNode {
            skip: raw.skip,
            multiple: raw.multiple,
            object,
            format,
            accept_other_keys: raw.accept_other_keys,
            accept_null: raw.accept_null,
            default_value: raw.default_value,
            trim: raw.trim.unwrap_or(true),
            optional: raw.optional,
            type_desc,
            rules,
        })
    }

    fn format_at(&self, value: &Value, path: &str, depth: usize) -> Result<Vec<Field>> {
        match value {
            Value::Object(map) => self.fields_at(map, path, depth),
            other => Err(SchemaError::InvalidNode {
                path: path.to_string(),
                message: format!("format must be an object, got {}", kind_of(other)),
            }),
        }
    }

    fn fields_at(&self, map: &Map<String, Value>, path: &str, depth: usize) -> Result<Vec<Field>> {
        map.iter()
            .map(|(name, sub)| {
                let node = self.node_at(sub, &format!("{path}.{name}"), depth)?;
                Ok((name.clone(), node))
            })
            .collect()
    }

    fn rules_at(&self, map: &Map<String, Value>, path: &str) -> Result<Vec<Rule>> {
        let mut rules = Vec::with_capacity(map.len());
        for (key, setting) in map {
            let (name, negate) = Rule::parse_name(key);
            let mut rule = match setting {
                Value::Bool(true) => Rule::named(name),
                Value::Array(args) => Rule::with_args(name, args.clone()),
                Value::Bool(false) if self.config.allow_disabled_rules => {
                    tracing::debug!(rule = %key, path, "skipping disabled rule");
                    continue;
                }
                other => {
                    return Err(SchemaError::InvalidRule {
                        rule: key.clone(),
                        path: path.to_string(),
                        reason: format!("expected true or an argument array, got {}", kind_of(other)),
                    })
                }
            };
            rule.negate = negate;
            rules.push(rule);
        }
        Ok(rules)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
