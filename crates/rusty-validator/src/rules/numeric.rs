//! Size rules: `len`, `min`, `max`
//!
//! Strings are measured in characters, sequences and maps in items, numbers by
//! value.

use std::fmt::Display;
use std::str::FromStr;

use super::first_param;
use crate::errors::RuleError;
use crate::tag::Params;
use crate::value::Value;

#[derive(Clone, Copy)]
enum Bound {
    Exact,
    AtLeast,
    AtMost,
}

#[derive(Clone, Copy)]
enum Measure {
    Value,
    Characters,
    Items,
}

/// `len?n`: exact length or value
pub fn len(value: &Value<'_>, params: &Params) -> Result<(), RuleError> {
    check("len", Bound::Exact, value, params)
}

/// `min?n`: minimum length or value
pub fn min(value: &Value<'_>, params: &Params) -> Result<(), RuleError> {
    check("min", Bound::AtLeast, value, params)
}

/// `max?n`: maximum length or value
pub fn max(value: &Value<'_>, params: &Params) -> Result<(), RuleError> {
    check("max", Bound::AtMost, value, params)
}

fn check(rule: &str, bound: Bound, value: &Value<'_>, params: &Params) -> Result<(), RuleError> {
    if value.is_nil() {
        return Ok(());
    }
    let raw = first_param(rule, params)?;

    match value {
        Value::Str(s) => {
            let limit = parse_param::<usize>(rule, raw)?;
            compare(bound, Measure::Characters, s.chars().count(), limit)
        }
        Value::Seq(_) | Value::Map(_) => {
            let limit = parse_param::<usize>(rule, raw)?;
            let count = value.len().unwrap_or_default();
            compare(bound, Measure::Items, count, limit)
        }
        Value::Int(n) => match raw.parse::<i64>() {
            Ok(limit) => compare(bound, Measure::Value, *n, limit),
            Err(_) => compare(bound, Measure::Value, *n as f64, parse_param(rule, raw)?),
        },
        Value::Uint(n) => match raw.parse::<u64>() {
            Ok(limit) => compare(bound, Measure::Value, *n, limit),
            Err(_) => compare(bound, Measure::Value, *n as f64, parse_param(rule, raw)?),
        },
        Value::Float(n) => compare(bound, Measure::Value, *n, parse_param(rule, raw)?),
        other => Err(RuleError::type_mismatch(rule, other.kind())),
    }
}

fn parse_param<T: FromStr>(rule: &str, raw: &str) -> Result<T, RuleError> {
    raw.parse::<T>().map_err(|_| {
        RuleError::invalid_parameter(rule, "0", format!("`{}` is not a valid number", raw))
    })
}

fn compare<T: PartialOrd + Display>(
    bound: Bound,
    measure: Measure,
    actual: T,
    limit: T,
) -> Result<(), RuleError> {
    let (ok, qualifier) = match bound {
        Bound::Exact => (actual == limit, "exactly"),
        Bound::AtLeast => (actual >= limit, "at least"),
        Bound::AtMost => (actual <= limit, "at most"),
    };

    if ok {
        return Ok(());
    }

    let message = match (measure, bound) {
        (Measure::Value, Bound::Exact) => format!("Must equal {}", limit),
        (Measure::Value, _) => format!("Must be {} {}", qualifier, limit),
        (Measure::Characters, _) => format!("Must be {} {} characters", qualifier, limit),
        (Measure::Items, _) => format!("Must have {} {} items", qualifier, limit),
    };
    Err(RuleError::Violation(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ToValue;

    fn param(value: &str) -> Params {
        let mut params = Params::new();
        params.insert("0".to_string(), value.to_string());
        params
    }

    fn message(result: Result<(), RuleError>) -> String {
        match result {
            Err(err) => err.to_string(),
            Ok(()) => String::new(),
        }
    }

    #[test]
    fn test_min_validation() {
        assert!(min(&10i32.to_value(), &param("5")).is_ok());
        assert!(min(&5i32.to_value(), &param("5")).is_ok());
        assert_eq!(message(min(&3i32.to_value(), &param("5"))), "Must be at least 5");

        assert!(min(&18.5f64.to_value(), &param("18")).is_ok());
        assert!(min(&17.9f64.to_value(), &param("18")).is_err());
    }

    #[test]
    fn test_max_validation() {
        assert!(max(&5u8.to_value(), &param("10")).is_ok());
        assert!(max(&10u8.to_value(), &param("10")).is_ok());
        assert_eq!(message(max(&15u8.to_value(), &param("10"))), "Must be at most 10");

        assert!(max(&99.9f64.to_value(), &param("100")).is_ok());
        assert!(max(&100.1f64.to_value(), &param("100")).is_err());
    }

    #[test]
    fn test_length_validators() {
        assert!(min(&"hello".to_value(), &param("3")).is_ok());
        assert_eq!(
            message(min(&"hi".to_value(), &param("3"))),
            "Must be at least 3 characters"
        );

        assert!(max(&"hello".to_value(), &param("10")).is_ok());
        assert_eq!(
            message(max(&"verylongstring".to_value(), &param("5"))),
            "Must be at most 5 characters"
        );

        assert!(len(&"four".to_value(), &param("4")).is_ok());
        assert_eq!(
            message(len(&"five!".to_value(), &param("4"))),
            "Must be exactly 4 characters"
        );
    }

    #[test]
    fn test_collection_sizes() {
        let items = vec![1u8, 2, 3];
        assert!(min(&items.to_value(), &param("2")).is_ok());
        assert!(max(&items.to_value(), &param("3")).is_ok());
        assert_eq!(
            message(max(&items.to_value(), &param("2"))),
            "Must have at most 2 items"
        );
        assert_eq!(
            message(len(&items.to_value(), &param("2"))),
            "Must have exactly 2 items"
        );
    }

    #[test]
    fn test_len_on_numbers_is_equality() {
        assert!(len(&7i64.to_value(), &param("7")).is_ok());
        assert_eq!(message(len(&8i64.to_value(), &param("7"))), "Must equal 7");
    }

    #[test]
    fn test_fractional_limit_on_integer() {
        assert!(min(&3i32.to_value(), &param("2.5")).is_ok());
        assert!(min(&2i32.to_value(), &param("2.5")).is_err());
        assert!(min(&3u32.to_value(), &param("-1")).is_ok());
    }

    #[test]
    fn test_nil_passes() {
        assert!(min(&Value::Nil, &param("3")).is_ok());
        assert!(len(&Value::Nil, &Params::new()).is_ok());
    }

    #[test]
    fn test_bad_parameters() {
        assert_eq!(
            min(&"abc".to_value(), &Params::new()),
            Err(RuleError::invalid_parameter("min", "0", "missing parameter"))
        );
        assert!(matches!(
            max(&"abc".to_value(), &param("ten")),
            Err(RuleError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_unsupported_kinds() {
        assert!(matches!(
            min(&true.to_value(), &param("1")),
            Err(RuleError::TypeMismatch { .. })
        ));
    }
}
