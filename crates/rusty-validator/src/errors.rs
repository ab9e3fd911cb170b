//! Validation and registration errors

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::value::Kind;

/// Why a single rule failed for a field
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("unknown rule `{0}`")]
    UnknownRule(String),

    #[error("{0}")]
    Violation(String),

    #[error("{rule} does not support {found} values")]
    TypeMismatch { rule: String, found: Kind },

    #[error("invalid parameter `{param}` for {rule}: {reason}")]
    InvalidParameter {
        rule: String,
        param: String,
        reason: String,
    },
}

impl RuleError {
    pub fn violation(message: impl Into<String>) -> Self {
        RuleError::Violation(message.into())
    }

    pub fn type_mismatch(rule: impl Into<String>, found: Kind) -> Self {
        RuleError::TypeMismatch {
            rule: rule.into(),
            found,
        }
    }

    pub fn invalid_parameter(
        rule: impl Into<String>,
        param: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        RuleError::InvalidParameter {
            rule: rule.into(),
            param: param.into(),
            reason: reason.into(),
        }
    }
}

/// Rejected rule registration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("invalid rule function `{name}`: {reason}")]
    InvalidRuleFunction { name: String, reason: &'static str },
}

/// Failures of one validation run, keyed by field display name
///
/// Never empty when returned from a validator: a clean record yields `Ok(())`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<RuleError>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a failure for a field
    pub fn add(&mut self, field: impl Into<String>, error: RuleError) {
        self.fields.entry(field.into()).or_default().push(error);
    }

    /// Append every failure of `other`, keeping the existing ones first
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, mut errors) in other.fields {
            self.fields.entry(field).or_default().append(&mut errors);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields with failures
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Get all errors for a specific field
    pub fn get(&self, field: &str) -> Option<&[RuleError]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Get first error for a specific field
    pub fn first(&self, field: &str) -> Option<&RuleError> {
        self.fields.get(field).and_then(|errors| errors.first())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<RuleError>> {
        self.fields.iter()
    }

    /// Field name to rendered messages
    pub fn messages(&self) -> BTreeMap<String, Vec<String>> {
        self.fields
            .iter()
            .map(|(field, errors)| {
                (
                    field.clone(),
                    errors.iter().map(ToString::to_string).collect(),
                )
            })
            .collect()
    }

    pub fn into_inner(self) -> BTreeMap<String, Vec<RuleError>> {
        self.fields
    }

    /// `Ok(())` for an empty report
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, errors) in &self.fields {
            for error in errors {
                if !first {
                    writeln!(f)?;
                }
                write!(f, "{}: {}", field, error)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = (&'a String, &'a Vec<RuleError>);
    type IntoIter = btree_map::Iter<'a, String, Vec<RuleError>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, errors) in &self.fields {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            map.serialize_entry(field, &messages)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_render() {
        assert_eq!(
            RuleError::UnknownRule("shout".to_string()).to_string(),
            "unknown rule `shout`"
        );
        assert_eq!(
            RuleError::type_mismatch("regexp", Kind::Int).to_string(),
            "regexp does not support integer values"
        );
        assert_eq!(
            RegistrationError::InvalidRuleFunction {
                name: String::new(),
                reason: "rule name is empty",
            }
            .to_string(),
            "invalid rule function ``: rule name is empty"
        );
    }

    #[test]
    fn test_add_keeps_order() {
        let mut errors = ValidationErrors::new();
        errors.add("name", RuleError::violation("first"));
        errors.add("name", RuleError::violation("second"));

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.first("name"), Some(&RuleError::violation("first")));
        assert_eq!(errors.get("name").map(<[RuleError]>::len), Some(2));
        assert!(errors.get("age").is_none());
    }

    #[test]
    fn test_merge_appends() {
        let mut left = ValidationErrors::new();
        left.add("id", RuleError::violation("a"));

        let mut right = ValidationErrors::new();
        right.add("id", RuleError::violation("b"));
        right.add("other", RuleError::violation("c"));

        left.merge(right);
        assert_eq!(
            left.messages().get("id"),
            Some(&vec!["a".to_string(), "b".to_string()])
        );
        assert!(left.contains("other"));
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());

        let mut errors = ValidationErrors::new();
        errors.add("x", RuleError::violation("bad"));
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_display_lists_every_failure() {
        let mut errors = ValidationErrors::new();
        errors.add("b", RuleError::violation("two"));
        errors.add("a", RuleError::violation("one"));
        assert_eq!(errors.to_string(), "a: one\nb: two");
    }
}
