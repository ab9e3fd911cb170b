//! # rusty-validator
//!
//! Struct validation driven by compact rule tags on fields.
//!
//! ## Quick Start
//!
//! ```rust
//! use rusty_validator::{Validate, Validator};
//!
//! #[derive(Validate)]
//! struct CreateUser {
//!     #[tag(validate = "min?3,max?40")]
//!     username: String,
//!
//!     #[tag(validate = "nonzero&err=is required")]
//!     name: String,
//!
//!     #[tag(validate = "min?21")]
//!     age: u32,
//! }
//!
//! let user = CreateUser {
//!     username: "ada".to_string(),
//!     name: String::new(),
//!     age: 20,
//! };
//!
//! let errors = Validator::new().validate(&user).unwrap_err();
//! assert_eq!(errors.first("name").map(ToString::to_string).as_deref(), Some("is required"));
//! assert_eq!(errors.first("age").map(ToString::to_string).as_deref(), Some("Must be at least 21"));
//! assert!(!errors.contains("username"));
//! ```
//!
//! ## Tag grammar
//!
//! `rule[?param[&param...]][,rule...]` where a param is `value` (positional
//! keys `"0"`, `"1"`, ...), `key=value`, or `err=message` to replace the
//! failure message of that rule. Without a `?`, the first `&` opens the
//! params: `nonzero&err=is required`.
//!
//! ## Builtin rules
//!
//! - `len?n` - exact length (strings, collections) or value (numbers)
//! - `min?n` / `max?n` - length or value bounds
//! - `nonzero` - rejects `None`, `""`, `0`, `false`, empty collections
//! - `regexp?pattern` - string must match
//!
//! Custom rules are registered with [`Validator::set_validation_func`].
//!
//! ## Nested records
//!
//! Fields holding records (directly, behind pointers, in sequences or as map
//! values) are validated recursively. Failures of nested fields are reported
//! under the nested field's own name.

// Lets the derive's `::rusty_validator` paths resolve inside this crate
extern crate self as rusty_validator;

pub mod config;
pub mod errors;
pub mod global;
pub mod registry;
pub mod resolve;
pub mod rules;
pub mod tag;
pub mod validator;
pub mod value;

pub use config::ValidatorConfig;
pub use errors::{RegistrationError, RuleError, ValidationErrors};
pub use registry::{Registry, RuleFn};
pub use rusty_validator_derive::Validate;
pub use tag::{Params, RuleSpec, TagSpec};
pub use validator::Validator;
pub use value::{Kind, ToValue, Value};

/// Static description of one record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Declared field name
    pub name: &'static str,
    /// Annotations as `(key, value)` pairs, e.g. `("validate", "min?3")`
    pub tags: &'static [(&'static str, &'static str)],
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, tags: &'static [(&'static str, &'static str)]) -> Self {
        Self { name, tags }
    }

    /// Annotation stored under `key`
    pub fn tag(&self, key: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, value)| *value)
    }
}

/// A record whose fields can be validated
///
/// Automatically implemented by `#[derive(Validate)]`
pub trait Validate {
    /// Field descriptors in declaration order
    fn fields(&self) -> &'static [FieldDescriptor];

    /// Runtime value of the field at `index`
    fn field_value(&self, index: usize) -> Value<'_>;

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Validate with the process-wide default validator
    fn validate(&self) -> Result<(), ValidationErrors>
    where
        Self: ToValue + Sized,
    {
        global::validate(self)
    }
}
