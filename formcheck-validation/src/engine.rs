// Validation engine

use crate::config::{EngineConfig, MissingRule};
use crate::descriptor::FieldDescriptor;
use crate::errors::{EngineError, Result};
use crate::markup::FormScope;
use crate::rules::{Rule, RuleName, RuleRegistry};
use crate::settings::{Callback, Settings};
use crate::trigger::{Trigger, TriggerMode};
use formcheck_log::{debug, trace, warn};
use serde::Serialize;
use std::fmt;

const LOG_TARGET: &str = "formcheck::engine";

/// Which outcome branch a pass took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CallbackKind {
    Success,
    Error,
}

/// Result of one pass. Failures live here, never in `Err`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    /// Failed rule evaluations, one per field
    pub errors: usize,
    pub errors_found: bool,
    /// Rows flagged `has-error`, in document order
    pub failed_rows: Vec<usize>,
    /// `None` when errors were found on an interactive or absent trigger
    pub callback: Option<CallbackKind>,
    /// The trigger's default action was suppressed
    pub cancelled: bool,
    /// Rule names that required fields referenced but that were not evaluated
    pub skipped: Vec<RuleName>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        !self.errors_found
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "valid": self.is_valid(),
            "errors": self.errors,
            "failedRows": self.failed_rows,
            "callback": self.callback,
            "cancelled": self.cancelled,
            "skipped": self.skipped,
        })
    }

    fn fail(&mut self, row: usize) {
        self.errors += 1;
        self.errors_found = true;
        if !self.failed_rows.contains(&row) {
            self.failed_rows.push(row);
        }
    }

    fn skip(&mut self, name: &RuleName) {
        if !self.skipped.contains(name) {
            self.skipped.push(name.clone());
        }
    }
}

/// Runs validation passes over form scopes.
///
/// Holds the merged rule registry, the callbacks and the configuration; a pass
/// leaves nothing behind in the engine.
pub struct ValidationEngine {
    registry: RuleRegistry,
    on_success: Option<Callback>,
    on_error: Option<Callback>,
    config: EngineConfig,
}

impl ValidationEngine {
    /// Merge the caller's rules over the built-ins.
    ///
    /// Configured inert rules are applied last, so they also disable caller rules.
    pub fn new(settings: Settings) -> Result<Self> {
        let email = match settings.email {
            Some(pattern) => pattern,
            None => settings.config.email()?,
        };

        let mut registry = RuleRegistry::with_defaults(email);
        registry.merge(settings.rules);
        for name in &settings.config.inert_rules {
            registry.register_inert(name.as_str());
        }

        debug!(
            target: LOG_TARGET,
            "engine ready with {} rules, missing rules: {}",
            registry.len(),
            settings.config.missing_rule
        );

        Ok(Self {
            registry,
            on_success: settings.on_success,
            on_error: settings.on_error,
            config: settings.config,
        })
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Rule names referenced by required fields of `scope` that have no registry entry.
    pub fn unresolved(&self, scope: &FormScope) -> Vec<RuleName> {
        let mut names = Vec::new();
        for field in FieldDescriptor::collect(scope) {
            if field.required
                && !self.registry.contains(&field.type_name)
                && !names.contains(&field.type_name)
            {
                names.push(field.type_name);
            }
        }
        names
    }

    /// Run one pass.
    ///
    /// Clears `has-error` on every field's row, evaluates each required field,
    /// flags failing rows, then fires at most one callback. On a committing
    /// trigger with errors the trigger's default action is prevented.
    ///
    /// Only [`MissingRule::Reject`] makes this return `Err`, and it does so
    /// before `scope` is touched.
    pub fn run(&self, trigger: Option<&mut Trigger>, scope: &mut FormScope) -> Result<ValidationOutcome> {
        let fields = FieldDescriptor::collect(scope);

        if self.config.missing_rule == MissingRule::Reject {
            if let Some(field) = fields
                .iter()
                .find(|f| f.required && !self.registry.contains(&f.type_name))
            {
                return Err(EngineError::UnknownRule {
                    name: field.type_name.clone(),
                    row: field.row,
                });
            }
        }

        debug!(
            target: LOG_TARGET,
            "validating {} fields ({:?} trigger)",
            fields.len(),
            trigger.as_ref().map(|t| t.mode())
        );

        for field in &fields {
            scope.rows[field.row].set_error(false);
        }

        let mut outcome = ValidationOutcome::default();
        for field in fields.iter().filter(|f| f.required) {
            if let Some(false) = self.check(field, scope, &mut outcome) {
                scope.rows[field.row].set_error(true);
                outcome.fail(field.row);
            }
        }

        if !outcome.errors_found {
            if let Some(callback) = &self.on_success {
                callback();
            }
            outcome.callback = Some(CallbackKind::Success);
        } else if let Some(trigger) = trigger {
            if trigger.mode() == TriggerMode::Committing {
                if let Some(callback) = &self.on_error {
                    callback();
                }
                trigger.prevent_default();
                outcome.callback = Some(CallbackKind::Error);
                outcome.cancelled = true;
            }
        }

        debug!(
            target: LOG_TARGET,
            "pass finished: {} errors in rows {:?}, cancelled: {}",
            outcome.errors,
            outcome.failed_rows,
            outcome.cancelled
        );

        Ok(outcome)
    }

    // `None` when the field was not evaluated.
    fn check(&self, field: &FieldDescriptor, scope: &FormScope, outcome: &mut ValidationOutcome) -> Option<bool> {
        let name = &field.type_name;
        let rule = match self.registry.get(name) {
            Some(Rule::Callable(rule)) => rule,
            Some(Rule::Inert) => {
                debug!(target: LOG_TARGET, "rule `{}` is inert, row {} not checked", name, field.row);
                outcome.skip(name);
                return None;
            }
            None => match self.config.missing_rule {
                MissingRule::Fallback => match self.registry.callable(&RuleName::Default) {
                    Some(rule) => {
                        debug!(target: LOG_TARGET, "no rule `{}`, checking row {} for presence", name, field.row);
                        rule
                    }
                    None => {
                        warn!(
                            target: LOG_TARGET,
                            "no rule `{}` and `default` is not callable, row {} not checked",
                            name,
                            field.row
                        );
                        outcome.skip(name);
                        return None;
                    }
                },
                MissingRule::Skip | MissingRule::Reject => {
                    warn!(target: LOG_TARGET, "no rule `{}`, row {} not checked", name, field.row);
                    outcome.skip(name);
                    return None;
                }
            },
        };

        let target = field.target(scope)?;
        let valid = rule(&target);
        trace!(target: LOG_TARGET, "rule `{}` on row {}: {}", name, field.row, valid);
        Some(valid)
    }
}

impl fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationEngine")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Build an engine from `settings` and run a single pass.
pub fn validate_form(
    trigger: Option<&mut Trigger>,
    scope: &mut FormScope,
    settings: Settings,
) -> Result<ValidationOutcome> {
    ValidationEngine::new(settings)?.run(trigger, scope)
}
