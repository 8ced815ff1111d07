//! Document module - the validated, in-memory form of a state machine
//!
//! A [`Document`] is only ever produced by [`DocumentBuilder`], so every
//! instance satisfies the referential-integrity rules: the initial state,
//! the base state and every transition target name a declared state.

use crate::markup::{self, Element};
use crate::Result;
use std::collections::BTreeSet;
use std::path::Path;
use std::str::FromStr;

pub mod builder;
pub mod state;
pub mod transition;

// Re-export key types
pub use builder::DocumentBuilder;
pub use state::{State, StateId};
pub use transition::Transition;

/// Separator between the package path and the class name in the `name` attribute
pub const NAME_SEPARATOR: char = '.';

/// Tag of the root element
pub const ROOT_ELEMENT: &str = "scxml";

/// A parsed and validated state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    class_name: String,
    package_name: Option<String>,
    initial_state_name: StateId,
    states: Vec<State>,
    base_state: Option<usize>,
    terminal_states: Vec<StateId>,
    events: BTreeSet<String>,
    actions: BTreeSet<String>,
    declared_state_names: Vec<StateId>,
    targets: BTreeSet<StateId>,
    debug: bool,
}

impl Document {
    /// Parse and validate markup text
    pub fn parse(input: &str) -> Result<Self> {
        let root = markup::parse_str(input)?;
        Self::from_element(&root)
    }

    /// Read, parse and validate a markup file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let root = markup::parse_file(path)?;
        Self::from_element(&root)
    }

    /// Validate an element tree and build the document from it
    pub fn from_element(root: &Element) -> Result<Self> {
        DocumentBuilder::new().build(root)
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn package_name(&self) -> Option<&str> {
        self.package_name.as_deref()
    }

    /// Package and class joined by the separator, as written in the source
    pub fn qualified_name(&self) -> String {
        match &self.package_name {
            Some(package) => format!("{}{}{}", package, NAME_SEPARATOR, self.class_name),
            None => self.class_name.clone(),
        }
    }

    /// Rename the class, e.g. to avoid clashes in generated output
    pub fn change_class_name(&mut self, class_name: impl Into<String>) {
        self.class_name = class_name.into();
    }

    pub fn initial_state_name(&self) -> &str {
        &self.initial_state_name
    }

    pub fn initial_state(&self) -> Option<&State> {
        self.state(&self.initial_state_name)
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn state(&self, id: &str) -> Option<&State> {
        self.states.iter().find(|s| s.id == id)
    }

    /// Position of a state in document order
    pub fn state_position(&self, id: &str) -> Option<usize> {
        self.states.iter().position(|s| s.id == id)
    }

    pub fn base_state(&self) -> Option<&State> {
        self.base_state.and_then(|idx| self.states.get(idx))
    }

    pub fn is_base_state(&self, id: &str) -> bool {
        self.base_state().is_some_and(|base| base.id == id)
    }

    /// Terminal states, in document order
    pub fn terminal_states(&self) -> impl Iterator<Item = &State> {
        self.states
            .iter()
            .filter(|s| self.terminal_states.contains(&s.id))
    }

    pub fn is_terminal(&self, id: &str) -> bool {
        self.terminal_states.iter().any(|t| t == id)
    }

    pub fn events(&self) -> &BTreeSet<String> {
        &self.events
    }

    pub fn actions(&self) -> &BTreeSet<String> {
        &self.actions
    }

    pub fn declared_state_names(&self) -> &[StateId] {
        &self.declared_state_names
    }

    pub fn targets(&self) -> &BTreeSet<StateId> {
        &self.targets
    }

    pub fn debug_flag(&self) -> bool {
        self.debug
    }

    pub fn transition_count(&self) -> usize {
        self.states.iter().map(|s| s.transitions.len()).sum()
    }

    /// Find the transition taken for `event` while in `state_id`
    ///
    /// The state's own transitions are scanned first, in document order; the
    /// base state's transitions are consulted only when none of them match.
    pub fn resolve_transition(&self, state_id: &str, event: &str) -> Option<&Transition> {
        let state = self.state(state_id)?;
        state
            .transition_for(event)
            .or_else(|| self.base_state()?.transition_for(event))
    }
}

impl FromStr for Document {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
