use valprims_schema::{TypeDescriptor, TypeRegistry};

use crate::rules::{RuleFn, RuleRegistry};

/// Read-only registries of type descriptors and rules.
///
/// Built once through [`ValidationContext::builder`] before serving and
/// never mutated afterwards; wrap it in an `Arc` to share it across
/// request-handling threads.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    types: TypeRegistry,
    rules: RuleRegistry,
}

impl ValidationContext {
    /// Start an empty builder.
    pub fn builder() -> ValidationContextBuilder {
        ValidationContextBuilder::default()
    }

    /// Context holding only the built-in types and rules.
    pub fn with_builtins() -> Self {
        Self::builder().with_builtins().build()
    }

    /// Type registry, for loading schemas by type name.
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Rule registry consulted by the rule evaluator.
    pub fn rules(&self) -> &RuleRegistry {
        &self.rules
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Collects registrations for a [`ValidationContext`].
#[derive(Debug, Default)]
pub struct ValidationContextBuilder {
    types: TypeRegistry,
    rules: RuleRegistry,
}

impl ValidationContextBuilder {
    /// Add the built-in types and rules. Explicit registrations win over
    /// builtins regardless of call order.
    pub fn with_builtins(mut self) -> Self {
        let builtin_types = TypeRegistry::with_builtins();
        for name in builtin_types.names() {
            if self.types.contains(name) {
                continue;
            }
            if let Some(descriptor) = builtin_types.get(name) {
                self.types.register_arc(name, descriptor);
            }
        }
        self.rules.merge_missing(RuleRegistry::with_builtins());
        self
    }

    /// Register a type descriptor.
    pub fn type_desc<T>(mut self, name: impl Into<String>, descriptor: T) -> Self
    where
        T: TypeDescriptor + 'static,
    {
        self.types.register(name, descriptor);
        self
    }

    /// Register a rule.
    pub fn rule<R>(mut self, name: impl Into<String>, rule: R) -> Self
    where
        R: RuleFn + 'static,
    {
        self.rules.register(name, rule);
        self
    }

    /// Freeze the registries.
    pub fn build(self) -> ValidationContext {
        tracing::debug!(
            types = self.types.names().len(),
            rules = self.rules.names().len(),
            "validation context built"
        );
        ValidationContext {
            types: self.types,
            rules: self.rules,
        }
    }
}
