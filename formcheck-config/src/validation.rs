// Checks applied to loaded configuration

use crate::{ConfigError, Result};

/// Implemented by typed configuration structs that can reject bad values.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Reusable checks for [`Validate`] implementations.
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn not_empty(value: &str, field: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!("{} cannot be empty", field)));
        }
        Ok(())
    }

    pub fn one_of(value: &str, allowed: &[&str], field: &str) -> Result<()> {
        if !allowed.contains(&value) {
            return Err(ConfigError::ValidationError(format!(
                "{} must be one of {}, got {:?}",
                field,
                allowed.join(", "),
                value
            )));
        }
        Ok(())
    }
}
