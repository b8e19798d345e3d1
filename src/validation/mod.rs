use serde_json::Value;
use std::fmt;

use crate::domain::MinorUnits;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

/// Only the empty string is rejected; whitespace is a legitimate value.
pub fn validate_required(field: &'static str, value: &str) -> ValidationResult {
    if value.is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }

    Ok(())
}

/// A required string field, kept exactly as supplied.
pub fn require_text(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    let value = value.ok_or_else(|| ValidationError::new(field, "is required"))?;
    validate_required(field, &value)?;
    Ok(value)
}

/// The amount must be a JSON number; strings such as `"150"` are rejected.
pub fn validate_amount(amount: Option<&Value>) -> Result<MinorUnits, ValidationError> {
    match amount {
        None | Some(Value::Null) => Err(ValidationError::new("amount", "is required")),
        Some(Value::Number(number)) => MinorUnits::from_major(number)
            .map_err(|e| ValidationError::new("amount", e.to_string())),
        Some(_) => Err(ValidationError::new("amount", "must be a positive number")),
    }
}

/// Falls back to `default` when the currency is absent.
pub fn validate_currency(currency: Option<String>, default: &str) -> Result<String, ValidationError> {
    match currency {
        None => Ok(default.to_string()),
        Some(code) => {
            validate_required("currency", &code)?;
            Ok(code)
        }
    }
}
