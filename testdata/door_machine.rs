// @generated by scxml-fsm from `Door`. Do not edit.

pub mod door {
    #![allow(dead_code, non_camel_case_types)]

    use std::cell::Cell;
    use std::fmt;
    use std::str::FromStr;

    /// States of `Door`, in declaration order
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum State {
        Closed,
        Opened,
        Broken,
        Anywhere,
    }

    impl State {
        pub const ALL: [State; 4] = [State::Closed, State::Opened, State::Broken, State::Anywhere];

        pub fn name(self) -> &'static str {
            match self {
                State::Closed => "Closed",
                State::Opened => "Opened",
                State::Broken => "Broken",
                State::Anywhere => "Anywhere",
            }
        }

        /// True for states without outgoing transitions
        pub fn is_terminal(self) -> bool {
            matches!(self, State::Broken)
        }
    }

    impl fmt::Display for State {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.name())
        }
    }

    /// Events accepted by `Door`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Event {
        Close,
        Kick,
        Open,
    }

    impl Event {
        pub const ALL: [Event; 3] = [Event::Close, Event::Kick, Event::Open];

        pub fn name(self) -> &'static str {
            match self {
                Event::Close => "Close",
                Event::Kick => "Kick",
                Event::Open => "Open",
            }
        }
    }

    impl fmt::Display for Event {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.name())
        }
    }

    impl FromStr for Event {
        type Err = StateError;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            Event::ALL
                .into_iter()
                .find(|event| event.name() == s)
                .ok_or_else(|| StateError::UnknownEvent(s.to_string()))
        }
    }

    /// Illegal use of a running machine
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum StateError {
        AlreadyStarted,
        NotStarted,
        Reentrant(Event),
        Unhandled { event: Event, state: State },
        UnknownEvent(String),
        Hook(String),
    }

    impl fmt::Display for StateError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                StateError::AlreadyStarted => f.write_str("machine has already been started"),
                StateError::NotStarted => f.write_str("machine has not been started"),
                StateError::Reentrant(event) => {
                    write!(f, "event {} pushed while another event is being handled", event)
                }
                StateError::Unhandled { event, state } => {
                    write!(f, "event {} is not handled in state {}", event, state)
                }
                StateError::UnknownEvent(name) => {
                    write!(f, "event {} is not declared by this machine", name)
                }
                StateError::Hook(message) => f.write_str(message),
            }
        }
    }

    impl std::error::Error for StateError {}

    /// Observer notified with literal names as a transition runs
    pub trait DebugLogger {
        fn on_event(&self, event: &str);
        fn on_action(&self, action: &str);
        fn on_state(&self, state: &str);
    }

    /// Side effects supplied by the owner of a `Door`
    pub trait Hooks: Sized {
        fn on_state_change(&self, fsm: &Door<Self>, state: State) -> Result<(), StateError>;
        fn on_action_rattle(&self, fsm: &Door<Self>) -> Result<(), StateError>;
        fn on_action_smash(&self, fsm: &Door<Self>) -> Result<(), StateError>;
        fn on_action_sweep(&self, fsm: &Door<Self>) -> Result<(), StateError>;
        fn on_action_unlock(&self, fsm: &Door<Self>) -> Result<(), StateError>;
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Lifecycle {
        NotStarted,
        Started,
    }

    struct PushGuard<'a> {
        pushing: &'a Cell<bool>,
        rejected: &'a Cell<Option<Event>>,
    }

    impl Drop for PushGuard<'_> {
        fn drop(&mut self) {
            self.pushing.set(false);
            self.rejected.set(None);
        }
    }

    pub struct Door<H> {
        hooks: H,
        lifecycle: Cell<Lifecycle>,
        current_state: Cell<State>,
        pushing_event: Cell<bool>,
        rejected_event: Cell<Option<Event>>,
        debug_logger: Option<Box<dyn DebugLogger>>,
    }

    impl<H: Hooks> Door<H> {
        pub const INITIAL_STATE: State = State::Closed;

        pub fn new(hooks: H) -> Self {
            Self {
                hooks,
                lifecycle: Cell::new(Lifecycle::NotStarted),
                current_state: Cell::new(Self::INITIAL_STATE),
                pushing_event: Cell::new(false),
                rejected_event: Cell::new(None),
                debug_logger: None,
            }
        }

        pub fn hooks(&self) -> &H {
            &self.hooks
        }

        pub fn set_debug_logger(&mut self, logger: Box<dyn DebugLogger>) {
            self.debug_logger = Some(logger);
        }

        pub fn debug_logger(&self) -> Option<&dyn DebugLogger> {
            self.debug_logger.as_deref()
        }

        pub fn current_state(&self) -> State {
            self.current_state.get()
        }

        pub fn is_in_terminal_state(&self) -> bool {
            self.current_state.get().is_terminal()
        }

        pub fn start(&self) -> Result<(), StateError> {
            if self.lifecycle.get() == Lifecycle::Started {
                return Err(StateError::AlreadyStarted);
            }
            self.lifecycle.set(Lifecycle::Started);
            self.current_state.set(Self::INITIAL_STATE);
            self.hooks.on_state_change(self, Self::INITIAL_STATE)
        }

        pub fn push_event(&self, event: Event) -> Result<bool, StateError> {
            if self.lifecycle.get() != Lifecycle::Started {
                return Err(StateError::NotStarted);
            }
            if self.pushing_event.replace(true) {
                if self.rejected_event.get().is_none() {
                    self.rejected_event.set(Some(event));
                }
                return Err(StateError::Reentrant(event));
            }
            let _guard = PushGuard {
                pushing: &self.pushing_event,
                rejected: &self.rejected_event,
            };

            let state = self.current_state.get();
            match (state, event) {
                (State::Closed, Event::Open) => {
                    self.after_hook(self.hooks.on_action_unlock(self))?;
                    self.transition_to_state(State::Opened)
                }
                (State::Closed, Event::Kick) => {
                    self.after_hook(self.hooks.on_action_rattle(self))?;
                    self.transition_to_state(State::Closed)
                }
                (State::Opened, Event::Close) => {
                    self.transition_to_state(State::Closed)
                }
                (State::Anywhere, Event::Kick) => {
                    self.after_hook(self.hooks.on_action_smash(self))?;
                    self.after_hook(self.hooks.on_action_sweep(self))?;
                    self.transition_to_state(State::Broken)
                }
                #[allow(unreachable_patterns)]
                _ => self.handle_base_event(state, event),
            }
        }

        fn handle_base_event(&self, state: State, event: Event) -> Result<bool, StateError> {
            match event {
                Event::Kick => {
                    self.after_hook(self.hooks.on_action_smash(self))?;
                    self.after_hook(self.hooks.on_action_sweep(self))?;
                    self.transition_to_state(State::Broken)
                }
                #[allow(unreachable_patterns)]
                _ => Err(StateError::Unhandled { event, state }),
            }
        }

        fn transition_to_state(&self, state: State) -> Result<bool, StateError> {
            self.current_state.set(state);
            self.after_hook(self.hooks.on_state_change(self, state))?;
            Ok(true)
        }

        fn after_hook(&self, result: Result<(), StateError>) -> Result<(), StateError> {
            if let Some(event) = self.rejected_event.take() {
                return Err(StateError::Reentrant(event));
            }
            result
        }
    }
}
