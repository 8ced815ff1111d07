//! Drives the checked-in output of the code generator for `testdata/debug.xml`.
//!
//! `codegen::tests` asserts the generator still produces this exact file, so
//! these tests cover the behavior of freshly generated machines.

#[path = "../testdata/tiny_machine.rs"]
mod tiny_machine;

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tiny_machine::pkg::tiny::{DebugLogger, Event, Hooks, State, StateError, Tiny};

#[derive(Default)]
struct Calls {
    log: RefCell<Vec<String>>,
    reenter_with: Cell<Option<Event>>,
    swallow: Cell<bool>,
    inner: RefCell<Option<Result<bool, StateError>>>,
}

impl Hooks for Calls {
    fn on_state_change(&self, _fsm: &Tiny<Self>, state: State) -> Result<(), StateError> {
        self.log.borrow_mut().push(format!("state {}", state));
        Ok(())
    }

    fn on_action_going_to_two(&self, fsm: &Tiny<Self>) -> Result<(), StateError> {
        self.log.borrow_mut().push("action GoingToTwo".to_string());
        if let Some(event) = self.reenter_with.take() {
            let inner = fsm.push_event(event);
            *self.inner.borrow_mut() = Some(inner.clone());
            if !self.swallow.get() {
                inner?;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
struct SharedLog(Rc<RefCell<Vec<String>>>);

impl DebugLogger for SharedLog {
    fn on_event(&self, event: &str) {
        self.0.borrow_mut().push(format!("event {}", event));
    }

    fn on_action(&self, action: &str) {
        self.0.borrow_mut().push(format!("action {}", action));
    }

    fn on_state(&self, state: &str) {
        self.0.borrow_mut().push(format!("state {}", state));
    }
}

#[test]
fn start_then_push() {
    let fsm = Tiny::new(Calls::default());
    fsm.start().unwrap();
    assert_eq!(fsm.current_state(), State::StateOne);
    assert!(!fsm.is_in_terminal_state());

    assert_eq!(fsm.push_event(Event::EventA), Ok(true));
    assert_eq!(fsm.current_state(), State::StateTwo);
    assert!(fsm.is_in_terminal_state());
    assert_eq!(
        *fsm.hooks().log.borrow(),
        vec!["state StateOne", "action GoingToTwo", "state StateTwo"]
    );
}

#[test]
fn lifecycle_errors() {
    let fsm = Tiny::new(Calls::default());
    assert_eq!(fsm.push_event(Event::EventA), Err(StateError::NotStarted));
    fsm.start().unwrap();
    assert_eq!(fsm.start(), Err(StateError::AlreadyStarted));
}

#[test]
fn base_state_handles_reset_everywhere() {
    let fsm = Tiny::new(Calls::default());
    fsm.start().unwrap();
    fsm.push_event(Event::EventA).unwrap();

    assert_eq!(fsm.push_event(Event::Reset), Ok(true));
    assert_eq!(fsm.current_state(), State::StateOne);
}

#[test]
fn unhandled_event_names_event_and_state() {
    let fsm = Tiny::new(Calls::default());
    fsm.start().unwrap();
    fsm.push_event(Event::EventA).unwrap();

    let err = fsm.push_event(Event::EventA).unwrap_err();
    assert_eq!(
        err,
        StateError::Unhandled {
            event: Event::EventA,
            state: State::StateTwo,
        }
    );
    assert_eq!(err.to_string(), "event EventA is not handled in state StateTwo");
}

#[test]
fn reentrant_push_is_rejected() {
    let fsm = Tiny::new(Calls::default());
    fsm.start().unwrap();
    fsm.hooks().reenter_with.set(Some(Event::Reset));

    assert_eq!(
        fsm.push_event(Event::EventA),
        Err(StateError::Reentrant(Event::Reset))
    );
    assert_eq!(
        *fsm.hooks().inner.borrow(),
        Some(Err(StateError::Reentrant(Event::Reset)))
    );
    assert_eq!(fsm.current_state(), State::StateOne);

    // The guard is released after the failure
    assert_eq!(fsm.push_event(Event::EventA), Ok(true));
    assert_eq!(fsm.current_state(), State::StateTwo);
}

#[test]
fn reentrant_push_fails_outer_push_even_when_swallowed() {
    let fsm = Tiny::new(Calls::default());
    fsm.start().unwrap();
    fsm.hooks().swallow.set(true);
    fsm.hooks().reenter_with.set(Some(Event::Reset));

    assert_eq!(
        fsm.push_event(Event::EventA),
        Err(StateError::Reentrant(Event::Reset))
    );
    assert_eq!(
        *fsm.hooks().inner.borrow(),
        Some(Err(StateError::Reentrant(Event::Reset)))
    );
    assert_eq!(fsm.current_state(), State::StateOne);
    assert_eq!(
        *fsm.hooks().log.borrow(),
        vec!["state StateOne", "action GoingToTwo"]
    );

    assert_eq!(fsm.push_event(Event::EventA), Ok(true));
    assert_eq!(fsm.current_state(), State::StateTwo);
}

#[test]
fn debug_logger_follows_the_transition() {
    let log = SharedLog::default();
    let mut fsm = Tiny::new(Calls::default());
    assert!(fsm.debug_logger().is_none());
    fsm.set_debug_logger(Box::new(log.clone()));
    fsm.start().unwrap();
    fsm.push_event(Event::EventA).unwrap();

    assert_eq!(
        *log.0.borrow(),
        vec!["event EventA", "action GoingToTwo", "state StateTwo"]
    );
}

#[test]
fn events_parse_from_names() {
    assert_eq!("Reset".parse::<Event>(), Ok(Event::Reset));
    assert_eq!(
        "Bogus".parse::<Event>(),
        Err(StateError::UnknownEvent("Bogus".to_string()))
    );
    assert_eq!(Event::ALL, [Event::EventA, Event::Reset]);
    assert_eq!(
        State::ALL.map(State::name),
        ["StateOne", "StateTwo", "BaseState"]
    );
}
