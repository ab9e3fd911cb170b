//! Rule tag parsing
//!
//! A tag is the string stored under the validation key of a field, e.g.
//! `#[tag(validate = "min?3,max?40&err=too long")]`.
//!
//! Grammar:
//! - rules are separated by `,`
//! - a rule is `name`, `name?params` or `name&params`
//! - params are separated by `&`
//! - a param is `key=value`, a bare `value` (stored under the positional keys
//!   `"0"`, `"1"`, ...) or `err=message`, which overrides the failure message

use std::collections::BTreeMap;

/// Parameters handed to a rule function
pub type Params = BTreeMap<String, String>;

/// Parsed rules of a single field, in declaration order
pub type TagSpec = Vec<RuleSpec>;

/// Reserved parameter key carrying a custom failure message
pub const ERR_PARAM: &str = "err";

/// One parsed rule occurrence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSpec {
    pub name: String,
    pub params: Params,
    pub custom_error: Option<String>,
}

impl RuleSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Positional parameter by index
    pub fn positional(&self, index: usize) -> Option<&str> {
        self.params.get(&index.to_string()).map(String::as_str)
    }
}

/// Parse a raw tag into its rules
///
/// Never fails: empty or malformed fragments are dropped.
///
/// # Examples
/// ```
/// use rusty_validator::tag::parse;
///
/// let rules = parse("min?123&foo&err=custom error message,nonzero");
/// assert_eq!(rules.len(), 2);
/// assert_eq!(rules[0].positional(1), Some("foo"));
/// assert_eq!(rules[0].custom_error.as_deref(), Some("custom error message"));
/// assert!(rules[1].params.is_empty());
/// ```
pub fn parse(raw: &str) -> TagSpec {
    raw.split(',').filter_map(parse_rule).collect()
}

fn parse_rule(fragment: &str) -> Option<RuleSpec> {
    // `?` or `&`, whichever comes first, opens the param section
    let (name, params) = match fragment.find(|c| c == '?' || c == '&') {
        Some(at) => (&fragment[..at], Some(&fragment[at + 1..])),
        None => (fragment, None),
    };

    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    let mut rule = RuleSpec::new(name);
    if let Some(params) = params {
        parse_params(params, &mut rule);
    }
    Some(rule)
}

fn parse_params(section: &str, rule: &mut RuleSpec) {
    let mut position = 0usize;

    for param in section.split('&') {
        let param = param.trim();
        if param.is_empty() {
            continue;
        }

        match param.split_once('=') {
            Some((key, value)) => {
                let key = key.trim();
                let value = value.trim();
                if key == ERR_PARAM {
                    rule.custom_error = Some(value.to_string());
                } else {
                    rule.params.insert(key.to_string(), value.to_string());
                }
            }
            None => {
                rule.params.insert(position.to_string(), param.to_string());
                position += 1;
            }
        }
    }
}
