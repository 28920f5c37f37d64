use serde_json::Value;
use valprims_schema::{Rule, RuleCheck};

use crate::context::ValidationContext;
use crate::error::{Reason, Result, ValidateError, ValidationError};

/// Run `rules` in order against an already type-checked value.
///
/// Stops at the first rule whose (possibly negated) verdict is false and
/// reports it with the rule name as both field and reason code.
pub fn apply_rules(rules: &[Rule], ctx: &ValidationContext, value: &Value) -> Result<()> {
    for rule in rules {
        let verdict = match &rule.check {
            RuleCheck::Inline(check) => check(value),
            RuleCheck::Named { args } => {
                let rule_fn =
                    ctx.rules()
                        .get(&rule.name)
                        .ok_or_else(|| ValidateError::UnknownRule {
                            rule: rule.name.clone(),
                        })?;
                rule_fn.check(value, args)
            }
        };

        if verdict == rule.negate {
            tracing::debug!(rule = %rule.display_key(), "rule rejected value");
            return Err(ValidationError::new(
                rule.name.clone(),
                Some(value.clone()),
                Reason::Rule(rule.name.clone()),
            )
            .into());
        }
        tracing::trace!(rule = %rule.display_key(), "rule passed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use serde_json::json;

    use super::*;

    fn ctx() -> ValidationContext {
        ValidationContext::builder()
            .with_builtins()
            .rule("isZero", |v: &Value, _: &[Value]| v == &json!(0))
            .build()
    }

    #[test]
    fn negated_rule_inverts_verdict() {
        let rules = vec![Rule::named("isZero").negated()];
        assert!(apply_rules(&rules, &ctx(), &json!(5)).is_ok());

        let err = apply_rules(&rules, &ctx(), &json!(0)).unwrap_err();
        match err {
            ValidateError::Validation(err) => {
                assert_eq!(err.field, "isZero");
                assert_eq!(err.reason, Reason::Rule("isZero".into()));
                assert_eq!(err.value, Some(json!(0)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn args_follow_the_value() {
        let rules = vec![Rule::with_args("isLength", vec![json!(2), json!(4)])];
        assert!(apply_rules(&rules, &ctx(), &json!("abc")).is_ok());
        assert!(apply_rules(&rules, &ctx(), &json!("abcde")).is_err());
    }

    #[test]
    fn inline_checks_take_only_the_value() {
        let rules = vec![Rule::inline("positive", |v| v.as_i64().is_some_and(|n| n > 0))];
        assert!(apply_rules(&rules, &ctx(), &json!(3)).is_ok());
        let err = apply_rules(&rules, &ctx(), &json!(-3)).unwrap_err();
        assert_eq!(err.reason_code(), "positive");

        let negated = vec![Rule::inline("positive", |v| v.as_i64().is_some_and(|n| n > 0)).negated()];
        assert!(apply_rules(&negated, &ctx(), &json!(-3)).is_ok());
    }

    #[test]
    fn first_failure_wins_and_stops_evaluation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let rules = vec![
            Rule::with_args("min", vec![json!(10)]),
            Rule::inline("counted", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            }),
        ];
        let err = apply_rules(&rules, &ctx(), &json!(5)).unwrap_err();
        assert_eq!(err.reason_code(), "min");
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert!(apply_rules(&rules, &ctx(), &json!(15)).is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unknown_named_rule_is_a_schema_error() {
        let rules = vec![Rule::named("isShiny")];
        assert_eq!(
            apply_rules(&rules, &ctx(), &json!("x")),
            Err(ValidateError::UnknownRule {
                rule: "isShiny".into()
            })
        );
    }

    #[test]
    fn empty_rule_list_passes() {
        assert!(apply_rules(&[], &ctx(), &json!(null)).is_ok());
    }
}
