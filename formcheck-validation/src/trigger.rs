// The event that started a pass

use serde::{Deserialize, Serialize};

/// How the outcome of a pass may act on its trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    /// Live feedback while typing: failures only flag rows.
    Interactive,
    /// Submission: failures fire the error callback and cancel the trigger.
    Committing,
}

/// Host event handed to a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    mode: TriggerMode,
    event_type: Option<String>,
    default_prevented: bool,
}

impl Trigger {
    pub fn new(mode: TriggerMode) -> Self {
        Self {
            mode,
            event_type: None,
            default_prevented: false,
        }
    }

    pub fn submit() -> Self {
        Self::new(TriggerMode::Committing).with_event_type("submit")
    }

    pub fn keystroke() -> Self {
        Self::new(TriggerMode::Interactive).with_event_type("keydown")
    }

    /// Map a DOM event type onto a mode. Key and input events are interactive.
    pub fn from_event_type(event_type: &str) -> Self {
        let mode = match event_type.to_ascii_lowercase().as_str() {
            "keydown" | "keyup" | "keypress" | "input" => TriggerMode::Interactive,
            _ => TriggerMode::Committing,
        };
        Self::new(mode).with_event_type(event_type)
    }

    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn mode(&self) -> TriggerMode {
        self.mode
    }

    pub fn event_type(&self) -> Option<&str> {
        self.event_type.as_deref()
    }

    /// Suppress the event's default action (the form submission).
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_mapping() {
        assert_eq!(Trigger::from_event_type("keydown").mode(), TriggerMode::Interactive);
        assert_eq!(Trigger::from_event_type("input").mode(), TriggerMode::Interactive);
        assert_eq!(Trigger::from_event_type("submit").mode(), TriggerMode::Committing);
        assert_eq!(Trigger::from_event_type("click").mode(), TriggerMode::Committing);
        assert_eq!(Trigger::from_event_type("KeyUp").event_type(), Some("KeyUp"));
    }

    #[test]
    fn test_prevent_default() {
        let mut trigger = Trigger::submit();
        assert!(!trigger.is_default_prevented());
        trigger.prevent_default();
        assert!(trigger.is_default_prevented());
    }
}
