// Caller settings for an engine

use crate::config::{EngineConfig, MissingRule};
use crate::rules::{EmailPattern, Rule, RuleName, RuleRegistry, RuleTarget};
use std::fmt;
use std::sync::Arc;

/// Outcome callback; takes no arguments.
pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// Callbacks, caller rules and configuration for one engine.
///
/// Built with [`Settings::builder`]. Anything that is not a callback or a
/// configuration value is a rule.
#[derive(Clone, Default)]
pub struct Settings {
    pub(crate) on_success: Option<Callback>,
    pub(crate) on_error: Option<Callback>,
    pub(crate) rules: RuleRegistry,
    pub(crate) config: EngineConfig,
    pub(crate) email: Option<EmailPattern>,
}

impl Settings {
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::default()
    }

    /// Caller rules only, without the built-ins.
    pub fn rules(&self) -> &RuleRegistry {
        &self.rules
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("rules", &self.rules)
            .field("config", &self.config)
            .finish()
    }
}

#[derive(Default)]
pub struct SettingsBuilder {
    settings: Settings,
}

impl SettingsBuilder {
    /// Fired when a pass finds no errors.
    pub fn on_success<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.settings.on_success = Some(Arc::new(callback));
        self
    }

    /// Fired when a committing pass finds errors.
    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.settings.on_error = Some(Arc::new(callback));
        self
    }

    /// Register a rule; a built-in of the same name is replaced.
    pub fn rule<F>(mut self, name: impl Into<RuleName>, predicate: F) -> Self
    where
        F: Fn(&RuleTarget<'_>) -> bool + Send + Sync + 'static,
    {
        self.settings.rules.insert(name, Rule::new(predicate));
        self
    }

    /// Keep `name` registered but never evaluate it.
    pub fn inert_rule(mut self, name: impl Into<RuleName>) -> Self {
        self.settings.rules.register_inert(name);
        self
    }

    /// Takes precedence over the configured `email_pattern`.
    pub fn email_pattern(mut self, pattern: EmailPattern) -> Self {
        self.settings.email = Some(pattern);
        self
    }

    pub fn missing_rule(mut self, policy: MissingRule) -> Self {
        self.settings.config.missing_rule = policy;
        self
    }

    /// Replace the whole configuration. Call before [`missing_rule`](Self::missing_rule).
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.settings.config = config;
        self
    }

    pub fn build(self) -> Settings {
        self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_rules() {
        let settings = Settings::builder()
            .rule("age", |t| !t.value().is_empty())
            .inert_rule("email")
            .missing_rule(MissingRule::Fallback)
            .build();

        assert_eq!(settings.rules().len(), 2);
        assert!(settings.rules().callable(&RuleName::from("age")).is_some());
        assert!(settings.rules().callable(&RuleName::Email).is_none());
        assert_eq!(settings.config().missing_rule, MissingRule::Fallback);
        assert!(settings.on_success.is_none());
    }

    #[test]
    fn test_config_then_policy() {
        let config = EngineConfig {
            missing_rule: MissingRule::Reject,
            ..EngineConfig::default()
        };
        let settings = Settings::builder()
            .config(config)
            .missing_rule(MissingRule::Skip)
            .build();
        assert_eq!(settings.config().missing_rule, MissingRule::Skip);
    }
}
