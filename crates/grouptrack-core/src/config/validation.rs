//! Configuration validation utilities and rules

use crate::TrackerError;
use std::fmt;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value is required but missing
    Required {
        /// Dotted path of the missing field
        field: String,
    },
    /// Value is out of acceptable range
    OutOfRange {
        /// Dotted path of the offending field
        field: String,
        /// Smallest accepted value
        min: u64,
        /// Largest accepted value
        max: u64,
        /// Value found in the configuration
        actual: u64,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Required { field } => {
                write!(f, "Field '{field}' is required but missing")
            }
            ValidationError::OutOfRange {
                field,
                min,
                max,
                actual,
            } => write!(
                f,
                "Field '{field}' must be between {min} and {max} (got {actual})"
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validator that accumulates every rule violation before reporting.
#[derive(Debug, Default)]
pub struct ConfigValidator {
    errors: Vec<ValidationError>,
}

impl ConfigValidator {
    /// Create a new validator
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a non-blank string
    pub fn require(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.errors.push(ValidationError::Required {
                field: field.to_string(),
            });
        }
        self
    }

    /// Require `min <= value <= max`
    pub fn range(&mut self, field: &str, value: u64, min: u64, max: u64) -> &mut Self {
        if value < min || value > max {
            self.errors.push(ValidationError::OutOfRange {
                field: field.to_string(),
                min,
                max,
                actual: value,
            });
        }
        self
    }

    /// Finish validation, joining every violation into one error
    pub fn finish(&self) -> crate::Result<()> {
        if self.errors.is_empty() {
            return Ok(());
        }
        let message = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(TrackerError::config(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_errors() {
        let mut validator = ConfigValidator::new();
        validator
            .require("api.base_url", " ")
            .range("fetch.page_size", 0, 1, 100);
        let err = validator.finish().err().map(|e| e.to_string()).unwrap_or_default();
        assert!(err.contains("api.base_url"));
        assert!(err.contains("fetch.page_size"));
    }

    #[test]
    fn test_passes_valid_values() {
        let mut validator = ConfigValidator::new();
        validator.require("name", "x").range("n", 5, 1, 10);
        assert!(validator.finish().is_ok());
    }
}
