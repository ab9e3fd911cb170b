//! Field resolution: display key, rule tag and runtime value of a field

use crate::config::ValidatorConfig;
use crate::value::Value;
use crate::Validate;

/// One field of a record, ready for rule evaluation
#[derive(Debug)]
pub struct ResolvedField<'a> {
    /// Name failures are reported under
    pub key: &'static str,
    /// Raw rule tag, empty when the field declares none
    pub rules: &'static str,
    pub value: Value<'a>,
}

impl ResolvedField<'_> {
    /// True when the value is a record or directly holds records
    pub fn is_recursable(&self) -> bool {
        match &self.value {
            Value::Record(_) => true,
            Value::Seq(items) => items.iter().any(|item| item.as_record().is_some()),
            Value::Map(entries) => entries
                .iter()
                .any(|(_, value)| value.as_record().is_some()),
            _ => false,
        }
    }
}

/// Resolve field `index` of `record`
///
/// Returns `None` when the record has no such field.
pub fn resolve<'a>(
    record: &'a dyn Validate,
    index: usize,
    config: &ValidatorConfig,
) -> Option<ResolvedField<'a>> {
    let descriptor = record.fields().get(index)?;

    let alternate = if config.read_alternate_name {
        descriptor
            .tag(&config.alternate_name_tag)
            .filter(|name| !name.is_empty())
    } else {
        None
    };

    Some(ResolvedField {
        key: alternate.unwrap_or(descriptor.name),
        rules: descriptor.tag(&config.tag).unwrap_or_default(),
        value: record.field_value(index),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ToValue;
    use crate::FieldDescriptor;

    struct Login {
        user: String,
        attempts: u32,
    }

    impl Validate for Login {
        fn fields(&self) -> &'static [FieldDescriptor] {
            const FIELDS: &[FieldDescriptor] = &[
                FieldDescriptor::new("user", &[("validate", "nonzero"), ("json", "username")]),
                FieldDescriptor::new("attempts", &[("json", "")]),
            ];
            FIELDS
        }

        fn field_value(&self, index: usize) -> Value<'_> {
            match index {
                0 => self.user.to_value(),
                1 => self.attempts.to_value(),
                _ => Value::Nil,
            }
        }
    }

    fn login() -> Login {
        Login {
            user: "ada".to_string(),
            attempts: 2,
        }
    }

    #[test]
    fn test_declared_name_by_default() {
        let record = login();
        let field = resolve(&record, 0, &ValidatorConfig::default()).unwrap();
        assert_eq!(field.key, "user");
        assert_eq!(field.rules, "nonzero");
        assert!(matches!(field.value, Value::Str("ada")));
        assert!(!field.is_recursable());
    }

    #[test]
    fn test_alternate_name() {
        let record = login();
        let config = ValidatorConfig {
            read_alternate_name: true,
            ..ValidatorConfig::default()
        };

        assert_eq!(resolve(&record, 0, &config).unwrap().key, "username");
        // empty alternate name falls back to the declared one
        assert_eq!(resolve(&record, 1, &config).unwrap().key, "attempts");
    }

    #[test]
    fn test_other_tag_key() {
        let record = login();
        let config = ValidatorConfig {
            tag: "check".to_string(),
            ..ValidatorConfig::default()
        };
        assert_eq!(resolve(&record, 0, &config).unwrap().rules, "");
    }

    #[test]
    fn test_recursable_values() {
        let inner = login();
        let field = |value| ResolvedField {
            key: "nested",
            rules: "",
            value,
        };

        assert!(field(Value::Record(&inner)).is_recursable());
        assert!(field(Value::Seq(vec![Value::Int(1), Value::Record(&inner)])).is_recursable());
        assert!(field(Value::Map(vec![(Value::Str("a"), Value::Record(&inner))])).is_recursable());

        // keys and nested sequences are not searched
        assert!(!field(Value::Map(vec![(Value::Record(&inner), Value::Nil)])).is_recursable());
        assert!(!field(Value::Seq(vec![Value::Seq(vec![Value::Record(&inner)])])).is_recursable());
        assert!(!field(Value::Seq(Vec::new())).is_recursable());
    }

    #[test]
    fn test_out_of_range() {
        assert!(resolve(&login(), 2, &ValidatorConfig::default()).is_none());
    }
}
