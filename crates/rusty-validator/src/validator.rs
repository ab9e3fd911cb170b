//! Validation engine
//!
//! Walks a record graph field by field, runs each field's rules from the
//! registry and collects every failure into one [`ValidationErrors`].

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, trace};

use crate::config::ValidatorConfig;
use crate::errors::{RegistrationError, RuleError, ValidationErrors};
use crate::registry::{Registry, RuleFn};
use crate::resolve::{resolve, ResolvedField};
use crate::tag::{self, Params, RuleSpec};
use crate::value::{ToValue, Value};
use crate::Validate;

/// Characters with a meaning in the tag grammar
const RESERVED_CHARS: [char; 4] = [',', '?', '&', '='];

/// Record identity: data address plus concrete type
///
/// The type is part of the key because a record and its first field can
/// share an address.
type Identity = (usize, &'static str);

/// Validates records against the rules declared in their field tags
///
/// Configure before use: mutation needs `&mut self`, validation only `&self`,
/// so a validator shared between threads is read-only.
pub struct Validator {
    registry: Registry,
    config: ValidatorConfig,
    cache: RwLock<HashMap<&'static str, Arc<[RuleSpec]>>>,
}

impl Validator {
    /// Validator with the builtin rules and default configuration
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    /// Validator without any rule
    pub fn empty() -> Self {
        Self::from_parts(Registry::new(), ValidatorConfig::default())
    }

    /// Validator with the builtin rules and the given configuration
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self::from_parts(Registry::builtin(), config)
    }

    pub fn from_parts(registry: Registry, config: ValidatorConfig) -> Self {
        Self {
            registry,
            config,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Select the annotation key holding rule tags
    pub fn set_tag(&mut self, tag: impl Into<String>) {
        self.config.tag = tag.into();
        debug!(tag = %self.config.tag, "validation tag changed");
    }

    /// Report failures under the alternate field name when one is declared
    pub fn set_read_alternate_name_tag(&mut self, enabled: bool) {
        self.config.read_alternate_name = enabled;
        debug!(enabled, "alternate field names toggled");
    }

    /// Select the annotation key holding alternate field names
    pub fn set_alternate_name_tag(&mut self, tag: impl Into<String>) {
        self.config.alternate_name_tag = tag.into();
        debug!(tag = %self.config.alternate_name_tag, "alternate name tag changed");
    }

    /// Register or replace a rule
    ///
    /// Names that no tag could ever reference are rejected.
    pub fn set_validation_func<F>(
        &mut self,
        name: impl Into<String>,
        rule: F,
    ) -> Result<(), RegistrationError>
    where
        F: Fn(&Value<'_>, &Params) -> Result<(), RuleError> + Send + Sync + 'static,
    {
        self.set_shared_validation_func(name, Arc::new(rule))
    }

    /// Register or replace an already shared rule
    pub fn set_shared_validation_func(
        &mut self,
        name: impl Into<String>,
        rule: RuleFn,
    ) -> Result<(), RegistrationError> {
        let name = name.into();
        check_rule_name(&name)?;
        debug!(rule = %name, "registering validation rule");
        self.registry.insert(name, rule);
        Ok(())
    }

    /// Remove a rule; unknown names are ignored
    pub fn remove_validation_func(&mut self, name: &str) {
        if self.registry.remove(name).is_some() {
            debug!(rule = %name, "removed validation rule");
        }
    }

    /// Validate a record and everything reachable from it
    ///
    /// Absent values (`None`, unset cells) and scalars have nothing to
    /// validate and pass. Sequences and maps are searched for records.
    pub fn validate<T: ToValue + ?Sized>(&self, value: &T) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut path = Vec::new();

        for record in value.to_value().records() {
            self.validate_record(record, &mut path, &mut errors);
        }

        errors.into_result()
    }

    fn validate_record(
        &self,
        record: &dyn Validate,
        path: &mut Vec<Identity>,
        errors: &mut ValidationErrors,
    ) {
        let identity = identity(record);
        if path.contains(&identity) {
            trace!(record = identity.1, "record already on the validation path, skipping");
            return;
        }
        path.push(identity);

        for index in 0..record.fields().len() {
            let Some(field) = resolve(record, index, &self.config) else {
                continue;
            };
            self.validate_field(&field, errors);

            if field.is_recursable() {
                for nested in field.value.records() {
                    self.validate_record(nested, path, errors);
                }
            }
        }

        path.pop();
    }

    fn validate_field(&self, field: &ResolvedField<'_>, errors: &mut ValidationErrors) {
        let rules = self.rules_for(field.rules);
        if rules.is_empty() {
            return;
        }
        trace!(field = field.key, rules = field.rules, "validating field");

        for rule in rules.iter() {
            let Some(check) = self.registry.lookup(&rule.name) else {
                debug!(field = field.key, rule = %rule.name, "unknown validation rule");
                errors.add(field.key, RuleError::UnknownRule(rule.name.clone()));
                continue;
            };

            if let Err(err) = check(&field.value, &rule.params) {
                let err = match &rule.custom_error {
                    Some(message) => RuleError::Violation(message.clone()),
                    None => err,
                };
                errors.add(field.key, err);
            }
        }
    }

    /// Parsed tag, cached per tag string
    fn rules_for(&self, raw: &'static str) -> Arc<[RuleSpec]> {
        if let Some(rules) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(raw)
        {
            return Arc::clone(rules);
        }

        let rules: Arc<[RuleSpec]> = tag::parse(raw).into();
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(raw, Arc::clone(&rules));
        rules
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Validator {
    fn clone(&self) -> Self {
        Self::from_parts(self.registry.clone(), self.config.clone())
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish()
    }
}

fn identity(record: &dyn Validate) -> Identity {
    let address = record as *const _ as *const () as usize;
    (address, record.type_name())
}

fn check_rule_name(name: &str) -> Result<(), RegistrationError> {
    let reason = if name.is_empty() {
        "rule name is empty"
    } else if name.trim() != name {
        "rule name has surrounding whitespace"
    } else if name.contains(&RESERVED_CHARS[..]) {
        "rule name contains one of `,` `?` `&` `=`"
    } else {
        return Ok(());
    };

    Err(RegistrationError::InvalidRuleFunction {
        name: name.to_string(),
        reason,
    })
}
