//! Drives the checked-in output of the code generator for `testdata/door.xml`.
//!
//! The door machine repeats an event within one state and overrides a base
//! state transition locally.

#[path = "../testdata/door_machine.rs"]
mod door_machine;

use door_machine::door::{Door, Event, Hooks, State, StateError};
use std::cell::RefCell;

#[derive(Default)]
struct Calls(RefCell<Vec<String>>);

impl Calls {
    fn push(&self, call: impl Into<String>) -> Result<(), StateError> {
        self.0.borrow_mut().push(call.into());
        Ok(())
    }

    fn take(&self) -> Vec<String> {
        self.0.take()
    }
}

impl Hooks for Calls {
    fn on_state_change(&self, _fsm: &Door<Self>, state: State) -> Result<(), StateError> {
        self.push(format!("-> {}", state))
    }

    fn on_action_rattle(&self, _fsm: &Door<Self>) -> Result<(), StateError> {
        self.push("Rattle")
    }

    fn on_action_smash(&self, _fsm: &Door<Self>) -> Result<(), StateError> {
        self.push("Smash")
    }

    fn on_action_sweep(&self, _fsm: &Door<Self>) -> Result<(), StateError> {
        self.push("Sweep")
    }

    fn on_action_unlock(&self, _fsm: &Door<Self>) -> Result<(), StateError> {
        self.push("Unlock")
    }
}

fn started() -> Door<Calls> {
    let fsm = Door::new(Calls::default());
    fsm.start().unwrap();
    fsm.hooks().take();
    fsm
}

#[test]
fn first_transition_for_an_event_wins() {
    let fsm = started();
    assert_eq!(fsm.push_event(Event::Open), Ok(true));
    assert_eq!(fsm.current_state(), State::Opened);
    assert_eq!(fsm.hooks().take(), vec!["Unlock", "-> Opened"]);
}

#[test]
fn local_transition_overrides_base_state() {
    let fsm = started();
    assert_eq!(fsm.push_event(Event::Kick), Ok(true));
    assert_eq!(fsm.current_state(), State::Closed);
    assert_eq!(fsm.hooks().take(), vec!["Rattle", "-> Closed"]);
}

#[test]
fn base_state_handles_event_the_state_lacks() {
    let fsm = started();
    fsm.push_event(Event::Open).unwrap();
    fsm.hooks().take();

    assert_eq!(fsm.push_event(Event::Kick), Ok(true));
    assert_eq!(fsm.current_state(), State::Broken);
    assert_eq!(fsm.hooks().take(), vec!["Smash", "Sweep", "-> Broken"]);
    assert!(fsm.is_in_terminal_state());
}

#[test]
fn terminal_state_still_reaches_base_state() {
    let fsm = started();
    fsm.push_event(Event::Open).unwrap();
    fsm.push_event(Event::Kick).unwrap();

    assert_eq!(
        fsm.push_event(Event::Close),
        Err(StateError::Unhandled {
            event: Event::Close,
            state: State::Broken,
        })
    );
    assert_eq!(fsm.push_event(Event::Kick), Ok(true));
    assert_eq!(fsm.current_state(), State::Broken);
}

#[test]
fn only_broken_is_terminal() {
    let terminal: Vec<State> = State::ALL.into_iter().filter(|s| s.is_terminal()).collect();
    assert_eq!(terminal, vec![State::Broken]);
}
