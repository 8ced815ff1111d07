//! Caller-supplied callbacks of a running machine

use super::{Machine, StateError};
use std::cell::RefCell;

/// Side effects of a machine: one call per action, one per entered state
///
/// Hooks see the machine they belong to. Pushing an event from a hook is
/// rejected with [`StateError::Reentrant`].
pub trait MachineHooks: Sized {
    fn on_action(&self, machine: &Machine<'_, Self>, action: &str) -> Result<(), StateError>;

    fn on_state_change(&self, machine: &Machine<'_, Self>, state: &str) -> Result<(), StateError>;
}

/// Observer notified with literal names as a transition runs
pub trait DebugLogger {
    fn on_event(&self, event: &str);
    fn on_action(&self, action: &str);
    fn on_state(&self, state: &str);
}

/// One recorded hook invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Action(String),
    StateChange(String),
}

/// Hooks that only remember what was called
#[derive(Debug, Default)]
pub struct Recorder {
    steps: RefCell<Vec<Step>>,
}

impl Recorder {
    pub fn steps(&self) -> Vec<Step> {
        self.steps.borrow().clone()
    }
}

impl MachineHooks for Recorder {
    fn on_action(&self, _machine: &Machine<'_, Self>, action: &str) -> Result<(), StateError> {
        self.steps.borrow_mut().push(Step::Action(action.to_string()));
        Ok(())
    }

    fn on_state_change(&self, _machine: &Machine<'_, Self>, state: &str) -> Result<(), StateError> {
        self.steps
            .borrow_mut()
            .push(Step::StateChange(state.to_string()));
        Ok(())
    }
}

/// Forwards debug notifications to `tracing` at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl DebugLogger for TracingLogger {
    fn on_event(&self, event: &str) {
        tracing::debug!(target: "scxml_fsm::machine", "event {}", event);
    }

    fn on_action(&self, action: &str) {
        tracing::debug!(target: "scxml_fsm::machine", "action {}", action);
    }

    fn on_state(&self, state: &str) {
        tracing::debug!(target: "scxml_fsm::machine", "state {}", state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    #[test]
    fn test_recorder_keeps_call_order() {
        let doc = Document::parse(include_str!("../../testdata/code_entry.xml")).unwrap();
        let machine = Machine::new(&doc, Recorder::default());
        machine.start().unwrap();
        machine.push_event("DigitPressed").unwrap();
        machine.push_event("ResetPressed").unwrap();

        assert_eq!(
            machine.hooks().steps(),
            vec![
                Step::StateChange("Ready".to_string()),
                Step::Action("StoreDigit".to_string()),
                Step::StateChange("Entering".to_string()),
                Step::Action("ClearDigits".to_string()),
                Step::StateChange("Ready".to_string()),
            ]
        );
    }

    #[test]
    fn test_tracing_logger_is_a_debug_logger() {
        let doc = Document::parse(include_str!("../../testdata/debug.xml")).unwrap();
        let mut machine = Machine::new(&doc, Recorder::default());
        machine.set_debug_logger(Box::new(TracingLogger));
        machine.start().unwrap();
        assert_eq!(machine.push_event("EventA"), Ok(true));
    }
}
