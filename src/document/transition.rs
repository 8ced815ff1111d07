//! Transition representation

use crate::document::StateId;
use serde::{Deserialize, Serialize};

/// A transition out of a state, triggered by an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub event: String,
    pub target: StateId,
    /// Action hooks in invocation order: the `action` attribute first, then nested actions
    pub actions: Vec<String>,
}

impl Transition {
    pub fn new(event: impl Into<String>, target: impl Into<StateId>) -> Self {
        Self {
            event: event.into(),
            target: target.into(),
            actions: Vec::new(),
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    /// Edge label: the event, then the actions in parentheses, one per line
    pub fn display_label(&self) -> String {
        if self.actions.is_empty() {
            self.event.clone()
        } else {
            format!("{}\\n({})", self.event, self.actions.join(",\\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_without_actions() {
        let transition = Transition::new("EventA", "StateTwo");
        assert_eq!(transition.display_label(), "EventA");
    }

    #[test]
    fn test_label_with_actions() {
        let transition = Transition::new("Dog", "Sleeping")
            .with_action("Grunt")
            .with_action("Kick");
        assert_eq!(transition.display_label(), r"Dog\n(Grunt,\nKick)");
    }
}
