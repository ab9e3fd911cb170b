//! `regexp` rule

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use super::first_param;
use crate::errors::RuleError;
use crate::tag::Params;
use crate::value::Value;

/// Compiled patterns kept by the cache before it starts over
///
/// Tag patterns are static and few; the limit only matters for custom rules
/// that forward generated patterns to `regexp`.
const REGEX_CACHE_LIMIT: usize = 256;

static REGEX_CACHE: Lazy<Mutex<HashMap<String, Regex>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// `regexp?pattern`: the string must contain a match of `pattern`
///
/// Anchor the pattern (`^...$`) to require a full match.
pub fn regexp(value: &Value<'_>, params: &Params) -> Result<(), RuleError> {
    let text = match value {
        Value::Nil => return Ok(()),
        Value::Str(s) => *s,
        other => return Err(RuleError::type_mismatch("regexp", other.kind())),
    };

    let pattern = first_param("regexp", params)?;
    let regex = compiled(pattern)?;

    if regex.is_match(text) {
        Ok(())
    } else {
        Err(RuleError::Violation(format!("Must match pattern `{}`", pattern)))
    }
}

/// Compile a pattern once; `Regex` clones share the compiled program
fn compiled(pattern: &str) -> Result<Regex, RuleError> {
    let mut cache = REGEX_CACHE.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some(regex) = cache.get(pattern) {
        return Ok(regex.clone());
    }

    let regex = Regex::new(pattern)
        .map_err(|err| RuleError::invalid_parameter("regexp", "0", err.to_string()))?;
    if cache.len() >= REGEX_CACHE_LIMIT {
        trace!(limit = REGEX_CACHE_LIMIT, "regex cache full, clearing");
        cache.clear();
    }
    cache.insert(pattern.to_string(), regex.clone());
    Ok(regex)
}
