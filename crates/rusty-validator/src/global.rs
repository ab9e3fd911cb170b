//! Process-wide default validator
//!
//! Convenience for applications that configure validation once at startup.
//! Everything here is also available on an explicit [`Validator`].
//!
//! Configure before use: validations hold a read lock, so a reconfiguration
//! waits for in-flight validations and applies to the ones started after it.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use once_cell::sync::Lazy;

use crate::errors::{RegistrationError, RuleError, ValidationErrors};
use crate::tag::Params;
use crate::validator::Validator;
use crate::value::{ToValue, Value};

static DEFAULT: Lazy<RwLock<Validator>> = Lazy::new(|| RwLock::new(Validator::new()));

fn read() -> RwLockReadGuard<'static, Validator> {
    DEFAULT.read().unwrap_or_else(PoisonError::into_inner)
}

fn write() -> RwLockWriteGuard<'static, Validator> {
    DEFAULT.write().unwrap_or_else(PoisonError::into_inner)
}

/// Validate with the default validator
pub fn validate<T: ToValue + ?Sized>(value: &T) -> Result<(), ValidationErrors> {
    read().validate(value)
}

/// Snapshot of the default validator
pub fn default_validator() -> Validator {
    read().clone()
}

/// Select the annotation key holding rule tags
pub fn set_tag(tag: impl Into<String>) {
    write().set_tag(tag);
}

/// Toggle reporting under alternate field names
pub fn set_read_alternate_name_tag(enabled: bool) {
    write().set_read_alternate_name_tag(enabled);
}

/// Select the annotation key holding alternate field names
pub fn set_alternate_name_tag(tag: impl Into<String>) {
    write().set_alternate_name_tag(tag);
}

/// Register or replace a rule on the default validator
pub fn set_validation_func<F>(name: impl Into<String>, rule: F) -> Result<(), RegistrationError>
where
    F: Fn(&Value<'_>, &Params) -> Result<(), RuleError> + Send + Sync + 'static,
{
    write().set_validation_func(name, rule)
}

/// Remove a rule from the default validator
pub fn remove_validation_func(name: &str) {
    write().remove_validation_func(name);
}
