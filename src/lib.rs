// formcheck - rule-driven validation for marked-up HTML forms
//
// Fields are discovered by their `js-field` marker, checked with the rule their
// `data-type` names when their row is `js-required`, and failing rows receive
// `has-error`. A pass ends in one success or error callback.

// Re-export the engine
pub use formcheck_validation::*;

// Re-export supporting crates
pub use formcheck_config;
pub use formcheck_log;

/// Load the engine configuration from `FORMCHECK_*` variables, after reading a
/// `.env` file from the working directory if one exists.
pub fn config_from_environment() -> Result<EngineConfig> {
    let manager = formcheck_config::ConfigManager::with_prefix(ENV_PREFIX);
    manager.load_dotenv(None)?;
    EngineConfig::from_manager(&manager)
}

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        CallbackKind,
        Element,
        EmailPattern,
        EngineConfig,
        EngineError,
        FormScope,
        MissingRule,
        Row,
        RuleName,
        RuleTarget,
        Settings,
        Trigger,
        TriggerMode,
        ValidationEngine,
        ValidationOutcome,
        validate_form,
    };
}
