//! Builtin rules
//!
//! Every builtin passes on an absent value (`None`, unset cell) except
//! `nonzero`, so optional fields are only checked when present.

pub mod numeric;
pub mod presence;
pub mod string;

use crate::errors::RuleError;
use crate::registry::Registry;
use crate::tag::Params;

pub use numeric::{len, max, min};
pub use presence::nonzero;
pub use string::regexp;

/// Add the builtin rules to a registry, replacing same-named entries
pub fn register_builtins(registry: &mut Registry) {
    registry.register("len", len);
    registry.register("max", max);
    registry.register("min", min);
    registry.register("nonzero", nonzero);
    registry.register("regexp", regexp);
}

/// First positional parameter of a rule
pub(crate) fn first_param<'p>(rule: &str, params: &'p Params) -> Result<&'p str, RuleError> {
    params
        .get("0")
        .map(String::as_str)
        .ok_or_else(|| RuleError::invalid_parameter(rule, "0", "missing parameter"))
}
