use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Prefix that negates a rule when schemas are written as configuration.
pub const NEGATION_PREFIX: &str = "NOT_";

/// Inline predicate attached directly to a schema node.
pub type InlineCheck = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// How a rule obtains its verdict.
#[derive(Clone)]
pub enum RuleCheck {
    /// Resolved by name in the rule registry at validation time and called
    /// with the value followed by `args`.
    Named { args: Vec<Value> },
    /// Called with the value as its only argument.
    Inline(InlineCheck),
}

impl fmt::Debug for RuleCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCheck::Named { args } => f.debug_struct("Named").field("args", args).finish(),
            RuleCheck::Inline(_) => f.write_str("Inline(..)"),
        }
    }
}

/// A post-type-check constraint on a value.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Rule name without any negation prefix. Also the reason code
    /// reported when the rule fails.
    pub name: String,
    /// Invert the verdict.
    pub negate: bool,
    pub check: RuleCheck,
}

impl Rule {
    /// Named rule with no extra arguments.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            negate: false,
            check: RuleCheck::Named { args: Vec::new() },
        }
    }

    /// Named rule whose registry function receives `args` after the value.
    pub fn with_args(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            negate: false,
            check: RuleCheck::Named { args },
        }
    }

    /// Inline predicate reported under `name` when it fails.
    pub fn inline<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            negate: false,
            check: RuleCheck::Inline(Arc::new(check)),
        }
    }

    /// Invert this rule.
    pub fn negated(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    /// Split a configured rule key into its bare name and negation flag.
    ///
    /// `"NOT_isZero"` yields `("isZero", true)`. Only the first prefix is
    /// stripped.
    pub fn parse_name(key: &str) -> (&str, bool) {
        match key.strip_prefix(NEGATION_PREFIX) {
            Some(name) => (name, true),
            None => (key, false),
        }
    }

    /// Rule key as it would be written in configuration.
    pub fn display_key(&self) -> String {
        if self.negate {
            format!("{NEGATION_PREFIX}{}", self.name)
        } else {
            self.name.clone()
        }
    }
}
