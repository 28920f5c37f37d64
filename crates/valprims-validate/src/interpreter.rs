use serde_json::{Map, Value};
use valprims_schema::SchemaNode;

use crate::context::ValidationContext;
use crate::error::{InvalidTypeError, Reason, Result, ValidateError, ValidationError};
use crate::evaluator::apply_rules;

/// Whether the node's `multiple` flag applies at this level. Array
/// elements are validated with the same node under [`Shape::Single`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    AsDeclared,
    Single,
}

/// Input after the empty-string normalization.
enum Input<'a> {
    Absent,
    Null,
    Present(&'a Value),
}

/// Validate and normalize `value` against `node`.
///
/// `name` is the field name reported in errors. `None` means the value is
/// absent; the result is `None` when the field resolves to absent.
pub fn validate_value(
    node: &SchemaNode,
    ctx: &ValidationContext,
    name: &str,
    value: Option<&Value>,
) -> Result<Option<Value>> {
    validate_shaped(node, Shape::AsDeclared, ctx, name, value)
}

fn validate_shaped(
    node: &SchemaNode,
    shape: Shape,
    ctx: &ValidationContext,
    name: &str,
    value: Option<&Value>,
) -> Result<Option<Value>> {
    if node.skip {
        return Ok(value.cloned());
    }

    let input = match value {
        None => Input::Absent,
        Some(Value::Null) => Input::Null,
        Some(Value::String(s)) if s.is_empty() && node.trim => Input::Null,
        Some(v) => Input::Present(v),
    };

    let value = match input {
        Input::Present(v) => v,
        _ if node.has_default() => {
            tracing::trace!(field = name, "substituting default");
            return Ok(node.default_value.clone());
        }
        Input::Null if node.accept_null => return Ok(Some(Value::Null)),
        Input::Null | Input::Absent => return Ok(None),
    };

    if node.multiple && shape == Shape::AsDeclared {
        return validate_elements(node, ctx, name, value).map(Some);
    }

    let validated = if node.object {
        validate_object(node, ctx, name, value)?
    } else {
        validate_leaf(node, name, value)?
    };

    apply_rules(&node.rules, ctx, &validated)?;
    Ok(Some(validated))
}

fn validate_elements(
    node: &SchemaNode,
    ctx: &ValidationContext,
    name: &str,
    value: &Value,
) -> Result<Value> {
    let Value::Array(items) = value else {
        return Err(reject(name, Some(value), Reason::NotArray));
    };

    tracing::trace!(field = name, len = items.len(), "validating elements");
    items
        .iter()
        .map(|item| {
            validate_shaped(node, Shape::Single, ctx, name, Some(item))
                .map(|element| element.unwrap_or(Value::Null))
        })
        .collect::<Result<Vec<_>>>()
        .map(Value::Array)
}

fn validate_object(
    node: &SchemaNode,
    ctx: &ValidationContext,
    name: &str,
    value: &Value,
) -> Result<Value> {
    let Value::Object(input) = value else {
        return Err(reject(name, Some(value), Reason::NotObject));
    };

    let mut result = Map::new();
    for (key, sub) in &node.format {
        match validate_value(sub, ctx, key, input.get(key))? {
            None if sub.optional => {}
            None => return Err(reject(key, None, Reason::Required)),
            // Null leaking out of a sub-field that does not accept it is
            // dropped, not rejected.
            Some(Value::Null) if !sub.accept_null => {
                tracing::trace!(field = %key, "dropping null field");
            }
            Some(v) => {
                result.insert(key.clone(), v);
            }
        }
    }

    let mut leftovers = input.iter().filter(|(key, _)| !node.declares(key));
    if node.accept_other_keys {
        for (key, v) in leftovers {
            result.insert(key.clone(), v.clone());
        }
    } else if let Some((key, v)) = leftovers.next() {
        return Err(reject(key, Some(v), Reason::Unexpected));
    }

    Ok(Value::Object(result))
}

fn validate_leaf(node: &SchemaNode, name: &str, value: &Value) -> Result<Value> {
    let type_desc = node
        .type_desc
        .as_deref()
        .ok_or_else(|| ValidateError::MissingType {
            field: name.to_string(),
        })?;

    if !type_desc.matches(value) {
        tracing::debug!(field = name, type_name = type_desc.name(), "type mismatch");
        return Err(InvalidTypeError {
            field: name.to_string(),
            value: value.clone(),
            type_name: type_desc.name().to_string(),
        }
        .into());
    }

    Ok(type_desc.parse(value.clone()))
}

fn reject(field: &str, value: Option<&Value>, reason: Reason) -> ValidateError {
    tracing::debug!(field, reason = %reason, "validation failed");
    ValidationError::new(field, value.cloned(), reason).into()
}
