use std::collections::HashMap;
use std::sync::Arc;

use crate::types::{AnyType, BooleanType, IntegerType, NumberType, StringType, TypeDescriptor};

/// Name-keyed registry of type descriptors.
///
/// Populate it before loading schemas; it is read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    descriptors: HashMap<String, Arc<dyn TypeDescriptor>>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `string`, `integer`/`int`, `number`/`float`,
    /// `boolean`/`bool` and `any`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        let integer: Arc<dyn TypeDescriptor> = Arc::new(IntegerType);
        let number: Arc<dyn TypeDescriptor> = Arc::new(NumberType);
        let boolean: Arc<dyn TypeDescriptor> = Arc::new(BooleanType);

        registry.register_arc("string", Arc::new(StringType));
        registry.register_arc("integer", Arc::clone(&integer));
        registry.register_arc("int", integer);
        registry.register_arc("number", Arc::clone(&number));
        registry.register_arc("float", number);
        registry.register_arc("boolean", Arc::clone(&boolean));
        registry.register_arc("bool", boolean);
        registry.register_arc("any", Arc::new(AnyType));
        registry
    }

    /// Register a descriptor under `name`, replacing any previous one.
    pub fn register<T>(&mut self, name: impl Into<String>, descriptor: T)
    where
        T: TypeDescriptor + 'static,
    {
        self.register_arc(name, Arc::new(descriptor));
    }

    /// Register an already shared descriptor.
    pub fn register_arc(&mut self, name: impl Into<String>, descriptor: Arc<dyn TypeDescriptor>) {
        let name = name.into();
        tracing::trace!(type_name = %name, "registered type descriptor");
        self.descriptors.insert(name, descriptor);
    }

    /// Look up a descriptor by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn TypeDescriptor>> {
        self.descriptors.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.descriptors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    #[derive(Debug)]
    struct Even;

    impl TypeDescriptor for Even {
        fn name(&self) -> &str {
            "even"
        }

        fn matches(&self, value: &Value) -> bool {
            value.as_i64().is_some_and(|n| n % 2 == 0)
        }
    }

    #[test]
    fn builtins_are_registered_with_aliases() {
        let registry = TypeRegistry::with_builtins();
        assert_eq!(
            registry.names(),
            vec!["any", "bool", "boolean", "float", "int", "integer", "number", "string"]
        );
        assert_eq!(registry.get("int").map(|t| t.name().to_string()).as_deref(), Some("integer"));
        assert!(registry.get("date").is_none());
    }

    #[test]
    fn custom_descriptor_registration() {
        let mut registry = TypeRegistry::new();
        assert!(!registry.contains("even"));
        registry.register("even", Even);

        let even = registry.get("even").unwrap();
        assert!(even.matches(&json!(4)));
        assert!(!even.matches(&json!(5)));
        assert_eq!(even.parse(json!(4)), json!(4));
    }
}
