//! Request Validation
//!
//! Outbound payloads are checked before the request is built; a payload that
//! fails here never reaches the network.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self { field, message: message.into() }
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Length check counted in characters, not bytes (logins are often Cyrillic)
pub fn min_chars(
    field: &'static str,
    value: &str,
    min: usize,
    message: &str,
) -> Result<(), ValidationError> {
    if value.chars().count() < min {
        return Err(ValidationError::new(field, message));
    }
    Ok(())
}

pub fn max_chars(
    field: &'static str,
    value: &str,
    max: usize,
    message: &str,
) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::new(field, message));
    }
    Ok(())
}

pub fn non_negative(field: &'static str, value: f64, message: &str) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::new(field, message));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_chars_counts_characters() {
        assert!(min_chars("login", "Ёжи", 3, "short").is_ok());
        let err = min_chars("login", "ab", 3, "short").unwrap_err();
        assert_eq!(err.field, "login");
        assert_eq!(err.to_string(), "short");
    }

    #[test]
    fn test_non_negative() {
        assert!(non_negative("rate", 0.0, "bad").is_ok());
        assert!(non_negative("rate", -1.0, "bad").is_err());
        assert!(non_negative("rate", f64::NAN, "bad").is_err());
        assert!(non_negative("rate", f64::INFINITY, "bad").is_err());
    }
}
