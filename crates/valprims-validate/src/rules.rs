use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use regex::{Regex, RegexBuilder};
use serde_json::Value;

/// A named rule: called with the value followed by the node's extra
/// arguments.
pub trait RuleFn: Send + Sync {
    fn check(&self, value: &Value, args: &[Value]) -> bool;
}

impl<F> RuleFn for F
where
    F: Fn(&Value, &[Value]) -> bool + Send + Sync,
{
    fn check(&self, value: &Value, args: &[Value]) -> bool {
        self(value, args)
    }
}

/// Name-keyed registry of rule functions.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, Arc<dyn RuleFn>>,
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.names())
            .finish()
    }
}

impl RuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in string and range rules:
    /// `equals`, `contains`, `isIn`, `isLength`, `matches`, `isEmail`,
    /// `isNumeric`, `isAlphanumeric`, `min`, `max`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("equals", equals);
        registry.register("contains", contains);
        registry.register("isIn", is_in);
        registry.register("isLength", is_length);
        registry.register("matches", matches_pattern);
        registry.register("isEmail", is_email);
        registry.register("isNumeric", is_numeric);
        registry.register("isAlphanumeric", is_alphanumeric);
        registry.register("min", min);
        registry.register("max", max);
        registry
    }

    /// Register `rule` under `name`, replacing any previous one.
    pub fn register<R>(&mut self, name: impl Into<String>, rule: R)
    where
        R: RuleFn + 'static,
    {
        let name = name.into();
        tracing::trace!(rule = %name, "registered rule");
        self.rules.insert(name, Arc::new(rule));
    }

    /// Copy in every rule of `other` whose name is not registered yet.
    pub fn merge_missing(&mut self, other: RuleRegistry) {
        for (name, rule) in other.rules {
            self.rules.entry(name).or_insert(rule);
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn RuleFn> {
        self.rules.get(name).map(|rule| rule.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("email pattern is valid")
});

static NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?([0-9]*[.])?[0-9]+$").expect("numeric pattern is valid"));

/// String form used by the text rules. Numbers and booleans are
/// stringified; other shapes have no text form.
fn as_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
        _ => None,
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) if NUMERIC.is_match(s) => s.parse().ok(),
        _ => None,
    }
}

fn loosely_equal(a: &Value, b: &Value) -> bool {
    a == b || matches!((as_text(a), as_text(b)), (Some(x), Some(y)) if x == y)
}

fn equals(value: &Value, args: &[Value]) -> bool {
    args.first().is_some_and(|expected| loosely_equal(value, expected))
}

fn contains(value: &Value, args: &[Value]) -> bool {
    let Some(seed) = args.first() else {
        return false;
    };
    match value {
        Value::Array(items) => items.iter().any(|item| loosely_equal(item, seed)),
        _ => match (as_text(value), as_text(seed)) {
            (Some(text), Some(seed)) => text.contains(&*seed),
            _ => false,
        },
    }
}

fn is_in(value: &Value, args: &[Value]) -> bool {
    match args.first() {
        Some(Value::Array(options)) => options.iter().any(|option| loosely_equal(value, option)),
        _ => false,
    }
}

/// `isLength(min)`, `isLength(min, max)` or `isLength({"min": .., "max": ..})`.
/// Counts characters for strings and elements for arrays.
fn is_length(value: &Value, args: &[Value]) -> bool {
    let len = match value {
        Value::Array(items) => items.len(),
        _ => match as_text(value) {
            Some(text) => text.chars().count(),
            None => return false,
        },
    };
    let (min, max) = match args {
        [Value::Object(bounds)] => (
            bounds.get("min").and_then(Value::as_u64),
            bounds.get("max").and_then(Value::as_u64),
        ),
        [min] => (min.as_u64(), None),
        [min, max, ..] => (min.as_u64(), max.as_u64()),
        [] => (None, None),
    };
    let len = len as u64;
    min.is_none_or(|min| len >= min) && max.is_none_or(|max| len <= max)
}

/// `matches(pattern)` or `matches(pattern, flags)`; only the `i` flag is
/// honored.
fn matches_pattern(value: &Value, args: &[Value]) -> bool {
    let (Some(text), Some(Value::String(pattern))) = (as_text(value), args.first()) else {
        return false;
    };
    let case_insensitive = args
        .get(1)
        .and_then(Value::as_str)
        .is_some_and(|flags| flags.contains('i'));
    match RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
    {
        Ok(re) => re.is_match(&text),
        Err(err) => {
            tracing::warn!(pattern = %pattern, error = %err, "invalid pattern in matches rule");
            false
        }
    }
}

fn is_email(value: &Value, _args: &[Value]) -> bool {
    value.as_str().is_some_and(|s| EMAIL.is_match(s))
}

fn is_numeric(value: &Value, _args: &[Value]) -> bool {
    as_text(value).is_some_and(|text| NUMERIC.is_match(&text))
}

fn is_alphanumeric(value: &Value, _args: &[Value]) -> bool {
    value
        .as_str()
        .is_some_and(|s| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric()))
}

fn min(value: &Value, args: &[Value]) -> bool {
    match (as_f64(value), args.first().and_then(as_f64)) {
        (Some(n), Some(bound)) => n >= bound,
        _ => false,
    }
}

fn max(value: &Value, args: &[Value]) -> bool {
    match (as_f64(value), args.first().and_then(as_f64)) {
        (Some(n), Some(bound)) => n <= bound,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn run(name: &str, value: Value, args: &[Value]) -> bool {
        let registry = RuleRegistry::with_builtins();
        registry.get(name).unwrap().check(&value, args)
    }

    #[test]
    fn builtin_names() {
        let registry = RuleRegistry::with_builtins();
        assert_eq!(registry.names().len(), 10);
        assert!(registry.contains("isEmail"));
        assert!(registry.get("isShiny").is_none());
    }

    #[test]
    fn closures_register_as_rules() {
        let mut registry = RuleRegistry::new();
        registry.register("isZero", |v: &Value, _: &[Value]| v == &json!(0));
        let rule = registry.get("isZero").unwrap();
        assert!(rule.check(&json!(0), &[]));
        assert!(!rule.check(&json!(5), &[]));
    }

    #[test]
    fn equality_and_membership() {
        assert!(run("equals", json!("abc"), &[json!("abc")]));
        assert!(run("equals", json!(5), &[json!("5")]));
        assert!(!run("equals", json!("abc"), &[]));

        assert!(run("isIn", json!("admin"), &[json!(["user", "admin"])]));
        assert!(run("isIn", json!(2), &[json!([1, 2, 3])]));
        assert!(!run("isIn", json!("root"), &[json!(["user", "admin"])]));
        assert!(!run("isIn", json!("x"), &[json!("x")]));

        assert!(run("contains", json!("hello world"), &[json!("lo w")]));
        assert!(run("contains", json!([1, 2]), &[json!(2)]));
        assert!(!run("contains", json!({}), &[json!("a")]));
    }

    #[test]
    fn length_bounds() {
        assert!(run("isLength", json!("abc"), &[json!(2), json!(3)]));
        assert!(!run("isLength", json!("abcd"), &[json!(2), json!(3)]));
        assert!(run("isLength", json!("héllo"), &[json!({ "min": 5, "max": 5 })]));
        assert!(run("isLength", json!([1, 2]), &[json!(1)]));
        assert!(!run("isLength", json!(null), &[json!(0)]));
    }

    #[test]
    fn patterns_and_formats() {
        assert!(run("matches", json!("ABC-1"), &[json!("^[a-z]+-\\d$"), json!("i")]));
        assert!(!run("matches", json!("ABC-1"), &[json!("^[a-z]+-\\d$")]));
        assert!(!run("matches", json!("x"), &[json!("(")]));

        assert!(run("isEmail", json!("dev@example.org"), &[]));
        assert!(!run("isEmail", json!("dev@"), &[]));
        assert!(!run("isEmail", json!(42), &[]));

        assert!(run("isNumeric", json!("-12.5"), &[]));
        assert!(run("isNumeric", json!(7), &[]));
        assert!(!run("isNumeric", json!("1e5"), &[]));

        assert!(run("isAlphanumeric", json!("abc123"), &[]));
        assert!(!run("isAlphanumeric", json!("abc 123"), &[]));
        assert!(!run("isAlphanumeric", json!(""), &[]));
    }

    #[test]
    fn numeric_ranges() {
        assert!(run("min", json!(5), &[json!(5)]));
        assert!(run("min", json!("10"), &[json!(5)]));
        assert!(!run("min", json!(4.5), &[json!(5)]));
        assert!(run("max", json!(3), &[json!("3")]));
        assert!(!run("max", json!(4), &[json!(3)]));
        assert!(!run("max", json!("many"), &[json!(3)]));
    }
}
