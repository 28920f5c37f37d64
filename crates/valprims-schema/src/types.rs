use std::fmt;

use serde_json::{Number, Value};

/// Leaf validator: a type predicate plus an optional conversion.
///
/// Descriptors are resolved by name through a
/// [`TypeRegistry`](crate::TypeRegistry) when schemas are loaded. The
/// interpreter only ever calls [`matches`](Self::matches) and, when it
/// holds, [`parse`](Self::parse).
pub trait TypeDescriptor: Send + Sync + fmt::Debug {
    /// Registered name, used for diagnostics and documentation.
    fn name(&self) -> &str;

    /// Whether `value` is acceptable for this type.
    fn matches(&self, value: &Value) -> bool;

    /// Convert an accepted value into its normalized form.
    ///
    /// Only called after [`matches`](Self::matches) returned true.
    fn parse(&self, value: Value) -> Value {
        value
    }
}

/// Any JSON string.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringType;

impl TypeDescriptor for StringType {
    fn name(&self) -> &str {
        "string"
    }

    fn matches(&self, value: &Value) -> bool {
        value.is_string()
    }
}

/// Whole numbers, given as JSON integers, integral floats such as `5.0`,
/// or decimal strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerType;

impl TypeDescriptor for IntegerType {
    fn name(&self) -> &str {
        "integer"
    }

    fn matches(&self, value: &Value) -> bool {
        match value {
            Value::Number(n) => n.is_i64() || n.is_u64() || whole_float(n).is_some(),
            Value::String(s) => parse_int(s).is_some(),
            _ => false,
        }
    }

    fn parse(&self, value: Value) -> Value {
        match &value {
            Value::String(s) => parse_int(s).map(Value::from).unwrap_or(value),
            Value::Number(n) if n.is_f64() => whole_float(n).map(Value::from).unwrap_or(value),
            _ => value,
        }
    }
}

/// Any JSON number, or an unsigned decimal string such as `"1.5"` or `".5"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberType;

impl TypeDescriptor for NumberType {
    fn name(&self) -> &str {
        "number"
    }

    fn matches(&self, value: &Value) -> bool {
        match value {
            Value::Number(_) => true,
            Value::String(s) => parse_float(s).is_some(),
            _ => false,
        }
    }

    fn parse(&self, value: Value) -> Value {
        let Value::String(s) = &value else {
            return value;
        };
        match parse_float(s) {
            Some(f) if f.fract() == 0.0 && !s.contains('.') => parse_int(s)
                .map(Value::from)
                .unwrap_or_else(|| float_value(f, &value)),
            Some(f) => float_value(f, &value),
            None => value,
        }
    }
}

/// Booleans, plus the string/number spellings `"true"`, `"false"`, `"1"`,
/// `"0"`, `1` and `0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanType;

impl TypeDescriptor for BooleanType {
    fn name(&self) -> &str {
        "boolean"
    }

    fn matches(&self, value: &Value) -> bool {
        match value {
            Value::Bool(_) => true,
            Value::String(s) => matches!(s.as_str(), "true" | "false" | "1" | "0"),
            Value::Number(n) => matches!(n.as_u64(), Some(0 | 1)),
            _ => false,
        }
    }

    fn parse(&self, value: Value) -> Value {
        Value::Bool(parse_boolean(&value))
    }
}

/// Accepts every present value unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyType;

impl TypeDescriptor for AnyType {
    fn name(&self) -> &str {
        "any"
    }

    fn matches(&self, _value: &Value) -> bool {
        true
    }
}

/// Strict integer parse: optional leading `-` followed by ASCII digits only.
pub fn parse_int(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Strict float parse: digits with an optional fractional part, no sign,
/// no exponent.
pub fn parse_float(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    let (whole, frac) = match s.split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (s, None),
    };
    if !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Some(frac) = frac {
        if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }
    s.parse().ok().filter(|f: &f64| f.is_finite())
}

/// Truthiness used by [`BooleanType`]: only `true`, `"true"`, `"1"` and `1`
/// are true.
pub fn parse_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true" || s == "1",
        Value::Number(n) => n.as_u64() == Some(1),
        _ => false,
    }
}

/// Integral value of a float-encoded number, if it fits an `i64`.
fn whole_float(n: &Number) -> Option<i64> {
    let f = n.as_f64()?;
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.fract() == 0.0 && in_range).then_some(f as i64)
}

fn float_value(f: f64, original: &Value) -> Value {
    Number::from_f64(f)
        .map(Value::Number)
        .unwrap_or_else(|| original.clone())
}
