//! Runtime module - drives a validated document directly
//!
//! [`Machine`] interprets a [`Document`] with the same contract the generated
//! code follows, so a machine can be exercised without generating and
//! compiling anything first.

use crate::document::{Document, State};
use std::cell::Cell;
use thiserror::Error;

pub mod hooks;

pub use hooks::{DebugLogger, MachineHooks, Recorder, Step, TracingLogger};

/// Illegal use of a running machine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("machine has already been started")]
    AlreadyStarted,

    #[error("machine has not been started")]
    NotStarted,

    #[error("event {event} pushed while another event is being handled")]
    Reentrant { event: String },

    #[error("event {event} is not handled in state {state}")]
    Unhandled { event: String, state: String },

    #[error("event {0} is not declared by this machine")]
    UnknownEvent(String),

    /// Failure reported by a caller-supplied hook
    #[error("{0}")]
    Hook(String),
}

/// Whether `start` may still be called
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    NotStarted,
    Started,
}

/// Clears the in-flight flag and any rejected event on every exit path out
/// of `push_event`
struct PushGuard<'a> {
    pushing: &'a Cell<bool>,
    rejected: &'a Cell<Option<String>>,
}

impl Drop for PushGuard<'_> {
    fn drop(&mut self) {
        self.pushing.set(false);
        self.rejected.set(None);
    }
}

/// A running instance of a document
///
/// All mutation goes through `Cell`s so hooks, which only get a shared
/// reference, can observe the machine and are rejected if they push events.
pub struct Machine<'d, H> {
    document: &'d Document,
    hooks: H,
    lifecycle: Cell<Lifecycle>,
    current_state: Cell<Option<usize>>,
    pushing_event: Cell<bool>,
    /// First event refused by the guard while a hook was running
    rejected_event: Cell<Option<String>>,
    debug_logger: Option<Box<dyn DebugLogger>>,
}

impl<'d, H: MachineHooks> Machine<'d, H> {
    pub fn new(document: &'d Document, hooks: H) -> Self {
        Self {
            document,
            hooks,
            lifecycle: Cell::new(Lifecycle::NotStarted),
            current_state: Cell::new(None),
            pushing_event: Cell::new(false),
            rejected_event: Cell::new(None),
            debug_logger: None,
        }
    }

    pub fn document(&self) -> &'d Document {
        self.document
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.get()
    }

    /// Install an observer for events, actions and state changes.
    /// It is only notified when the document sets `debug="true"`.
    pub fn set_debug_logger(&mut self, logger: Box<dyn DebugLogger>) {
        self.debug_logger = Some(logger);
    }

    pub fn current_state(&self) -> Option<&'d State> {
        self.current_state
            .get()
            .and_then(|idx| self.document.states().get(idx))
    }

    pub fn current_state_name(&self) -> Option<&'d str> {
        self.current_state().map(State::id)
    }

    /// True when the current state has no outgoing transitions in the document
    pub fn is_in_terminal_state(&self) -> bool {
        self.current_state()
            .is_some_and(|state| self.document.is_terminal(state.id()))
    }

    /// Enter the initial state, notifying `on_state_change` once
    pub fn start(&self) -> Result<(), StateError> {
        if self.lifecycle.get() == Lifecycle::Started {
            return Err(StateError::AlreadyStarted);
        }
        self.lifecycle.set(Lifecycle::Started);

        let initial = self.document.initial_state_name();
        self.current_state.set(self.document.state_position(initial));
        tracing::debug!("Machine {} started in {}", self.document.class_name(), initial);

        self.hooks.on_state_change(self, initial)
    }

    /// Dispatch one event
    ///
    /// Returns `Ok(true)` once the matching transition has run. An event with
    /// no local or base-state transition fails with [`StateError::Unhandled`].
    /// A hook that pushes an event fails the transition with
    /// [`StateError::Reentrant`], even if the hook drops the inner error.
    pub fn push_event(&self, event: &str) -> Result<bool, StateError> {
        if self.lifecycle.get() != Lifecycle::Started {
            return Err(StateError::NotStarted);
        }
        if self.pushing_event.replace(true) {
            let first = self.rejected_event.take();
            self.rejected_event.set(first.or_else(|| Some(event.to_string())));
            return Err(StateError::Reentrant {
                event: event.to_string(),
            });
        }
        let _guard = PushGuard {
            pushing: &self.pushing_event,
            rejected: &self.rejected_event,
        };

        if !self.document.events().contains(event) {
            return Err(StateError::UnknownEvent(event.to_string()));
        }

        let state = self.current_state_name().ok_or(StateError::NotStarted)?;
        let transition = self
            .document
            .resolve_transition(state, event)
            .ok_or_else(|| StateError::Unhandled {
                event: event.to_string(),
                state: state.to_string(),
            })?;

        tracing::trace!("{} --{}--> {}", state, event, transition.target());
        self.log(|logger| logger.on_event(event));

        for action in transition.actions() {
            self.log(|logger| logger.on_action(action));
            self.after_hook(self.hooks.on_action(self, action))?;
        }

        self.transition_to_state(transition.target())?;
        Ok(true)
    }

    fn transition_to_state(&self, target: &str) -> Result<(), StateError> {
        self.current_state.set(self.document.state_position(target));
        self.log(|logger| logger.on_state(target));
        self.after_hook(self.hooks.on_state_change(self, target))
    }

    fn after_hook(&self, result: Result<(), StateError>) -> Result<(), StateError> {
        if let Some(event) = self.rejected_event.take() {
            tracing::debug!("Hook pushed {} while a transition was running", event);
            return Err(StateError::Reentrant { event });
        }
        result
    }

    fn log(&self, notify: impl FnOnce(&dyn DebugLogger)) {
        if !self.document.debug_flag() {
            return;
        }
        if let Some(logger) = &self.debug_logger {
            notify(logger.as_ref());
        }
    }
}
