//! Rule registry: rule name to rule function

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::RuleError;
use crate::rules;
use crate::tag::Params;
use crate::value::Value;

/// A validation rule
///
/// Receives the field value and the rule's parsed parameters. Rules are shared
/// between threads and must not rely on call order.
pub type RuleFn = Arc<dyn Fn(&Value<'_>, &Params) -> Result<(), RuleError> + Send + Sync>;

/// Mapping from rule name to rule function
#[derive(Clone, Default)]
pub struct Registry {
    rules: HashMap<String, RuleFn>,
}

impl Registry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the builtin rules (`len`, `max`, `min`, `nonzero`, `regexp`)
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        rules::register_builtins(&mut registry);
        registry
    }

    /// Insert or replace a rule
    pub fn register<F>(&mut self, name: impl Into<String>, rule: F)
    where
        F: Fn(&Value<'_>, &Params) -> Result<(), RuleError> + Send + Sync + 'static,
    {
        self.insert(name, Arc::new(rule));
    }

    /// Insert or replace an already shared rule
    pub fn insert(&mut self, name: impl Into<String>, rule: RuleFn) {
        self.rules.insert(name.into(), rule);
    }

    /// Remove a rule; absent names are ignored
    pub fn remove(&mut self, name: &str) -> Option<RuleFn> {
        self.rules.remove(name)
    }

    pub fn lookup(&self, name: &str) -> Option<&RuleFn> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered rule names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("rules", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names() {
        let registry = Registry::builtin();
        assert_eq!(
            registry.names(),
            vec!["len", "max", "min", "nonzero", "regexp"]
        );
    }

    #[test]
    fn test_register_replace_remove() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());

        registry.register("always", |_: &Value<'_>, _: &Params| Ok(()));
        assert!(registry.contains("always"));

        registry.register("always", |_: &Value<'_>, _: &Params| {
            Err(RuleError::violation("replaced"))
        });
        assert_eq!(registry.len(), 1);

        let rule = registry.lookup("always").cloned();
        let result = rule.map(|rule| rule(&Value::Nil, &Params::new()));
        assert_eq!(result, Some(Err(RuleError::violation("replaced"))));

        assert!(registry.remove("always").is_some());
        assert!(registry.remove("always").is_none());
        assert!(registry.lookup("always").is_none());
    }
}
