//! `nonzero` rule

use crate::errors::RuleError;
use crate::tag::Params;
use crate::value::Value;

/// Rejects zero values: `None`, `""`, `0`, `false`, empty collections
pub fn nonzero(value: &Value<'_>, _params: &Params) -> Result<(), RuleError> {
    if value.is_zero() {
        Err(RuleError::violation("Must not be empty"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ToValue;

    #[test]
    fn test_nonzero() {
        let params = Params::new();

        assert!(nonzero(&"x".to_value(), &params).is_ok());
        assert!(nonzero(&1i32.to_value(), &params).is_ok());
        assert!(nonzero(&vec![0u8].to_value(), &params).is_ok());

        assert_eq!(
            nonzero(&"".to_value(), &params),
            Err(RuleError::violation("Must not be empty"))
        );
        assert!(nonzero(&0u64.to_value(), &params).is_err());
        assert!(nonzero(&Value::Nil, &params).is_err());
        assert!(nonzero(&false.to_value(), &params).is_err());
    }
}
