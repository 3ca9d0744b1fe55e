// Engine configuration

use crate::errors::Result;
use crate::rules::EmailPattern;
use formcheck_config::{ConfigManager, ConfigValidator, Validate};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Prefix of the environment variables read by [`EngineConfig::from_env`].
pub const ENV_PREFIX: &str = "FORMCHECK";

/// What a pass does with a required field whose rule has no registry entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingRule {
    /// Leave the field unchecked.
    #[default]
    Skip,
    /// Check the field with the `default` rule instead.
    Fallback,
    /// Refuse to run the pass.
    Reject,
}

impl MissingRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingRule::Skip => "skip",
            MissingRule::Fallback => "fallback",
            MissingRule::Reject => "reject",
        }
    }
}

impl FromStr for MissingRule {
    type Err = formcheck_config::ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        ConfigValidator::one_of(&s, &["skip", "fallback", "reject"], "missing_rule")?;
        Ok(match s.as_str() {
            "fallback" => MissingRule::Fallback,
            "reject" => MissingRule::Reject,
            _ => MissingRule::Skip,
        })
    }
}

impl fmt::Display for MissingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine settings that come from configuration rather than code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Regex the built-in `email` rule matches against.
    pub email_pattern: String,
    pub missing_rule: MissingRule,
    /// Rule names that are registered but never evaluated.
    #[serde(deserialize_with = "name_list")]
    pub inert_rules: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            email_pattern: EmailPattern::default().as_str().to_string(),
            missing_rule: MissingRule::default(),
            inert_rules: Vec::new(),
        }
    }
}

// Environment variables can only carry "a, b"; files carry real lists.
fn name_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Names {
        Joined(String),
        List(Vec<String>),
    }

    Ok(match Names::deserialize(deserializer)? {
        Names::Joined(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from)
            .collect(),
        Names::List(list) => list,
    })
}

impl Validate for EngineConfig {
    fn validate(&self) -> formcheck_config::Result<()> {
        ConfigValidator::not_empty(&self.email_pattern, "email_pattern")?;
        EmailPattern::new(&self.email_pattern).map_err(|e| {
            formcheck_config::ConfigError::ValidationError(format!("email_pattern: {}", e))
        })?;
        Ok(())
    }
}

impl EngineConfig {
    /// Read from an already-populated manager. Unrelated keys are ignored.
    pub fn from_manager(manager: &ConfigManager) -> Result<Self> {
        Ok(manager.load_validated::<Self>()?)
    }

    /// Read `FORMCHECK_EMAIL_PATTERN`, `FORMCHECK_MISSING_RULE` and
    /// `FORMCHECK_INERT_RULES`.
    pub fn from_env() -> Result<Self> {
        let manager = ConfigManager::with_prefix(ENV_PREFIX);
        manager.load_env()?;
        Self::from_manager(&manager)
    }

    /// Read a JSON, TOML or `.env` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let manager = ConfigManager::new();
        manager.load_file(path)?;
        Self::from_manager(&manager)
    }

    pub fn email(&self) -> Result<EmailPattern> {
        Ok(EmailPattern::new(&self.email_pattern)?)
    }
}
