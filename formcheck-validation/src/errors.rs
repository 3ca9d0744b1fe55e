// Engine configuration errors
//
// Validation failures are never errors; they are reported in the outcome.

use crate::rules::RuleName;
use formcheck_config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid email pattern: {0}")]
    InvalidEmailPattern(#[from] regex::Error),

    #[error("no rule registered for `{name}` (required field in row {row})")]
    UnknownRule { name: RuleName, row: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
