//! State representation

use crate::document::Transition;
use serde::{Deserialize, Serialize};

pub type StateId = String;

/// A declared state and its outgoing transitions, in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub id: StateId,
    pub transitions: Vec<Transition>,
}

impl State {
    pub fn new(id: impl Into<StateId>) -> Self {
        Self {
            id: id.into(),
            transitions: Vec::new(),
        }
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// A state without outgoing transitions is terminal
    pub fn is_terminal(&self) -> bool {
        self.transitions.is_empty()
    }

    /// First transition for `event`, in document order
    pub fn transition_for(&self, event: &str) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.event == event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal() {
        assert!(State::new("Done").is_terminal());
        let state = State::new("Idle").with_transition(Transition::new("Go", "Done"));
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_first_matching_transition_wins() {
        let state = State::new("Idle")
            .with_transition(Transition::new("Go", "First"))
            .with_transition(Transition::new("Stop", "Idle"))
            .with_transition(Transition::new("Go", "Second"));

        assert_eq!(state.transition_for("Go").unwrap().target(), "First");
        assert!(state.transition_for("Jump").is_none());
    }
}
