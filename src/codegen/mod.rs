//! Codegen module - emits a self-contained Rust state machine for a document
//!
//! The generated module declares `State` and `Event` enums, a `Hooks` trait
//! with one method per action, and a machine struct generic over the hooks:
//!
//! ```text
//! pub mod tiny {
//!     pub enum State { .. }
//!     pub enum Event { .. }
//!     pub trait Hooks: Sized { fn on_state_change(..); fn on_action_going_to_two(..); }
//!     pub struct Tiny<H> { .. }
//! }
//! ```

use crate::config::CodegenConfig;
use crate::document::{Document, NAME_SEPARATOR, Transition};
use crate::error::{Error, Result};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io;

pub mod naming;

pub use naming::{snake_case, validate_identifier};

/// Identifiers derived from a document, checked before anything is emitted
struct Names {
    class: String,
    module: String,
    packages: Vec<String>,
    /// Action name -> hook method
    hooks: BTreeMap<String, String>,
}

impl Names {
    fn resolve(document: &Document, config: &CodegenConfig) -> Result<Self> {
        let class = document.class_name().to_string();
        validate_identifier("class", &class)?;
        if naming::GENERATED_ITEMS.contains(&class.as_str()) {
            return Err(Error::generate(format!(
                "class name {} clashes with a generated item",
                class
            )));
        }
        if naming::REFERENCED_NAMES.contains(&class.as_str()) {
            return Err(Error::generate(format!(
                "class name {} shadows a name the generated module refers to",
                class
            )));
        }

        let module = snake_case(&class);
        validate_identifier("module", &module)?;

        let packages: Vec<String> = match document.package_name() {
            Some(package) if config.nest_package_modules => package
                .split(NAME_SEPARATOR)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };
        for segment in &packages {
            validate_identifier("package segment", segment)?;
        }

        for state in document.states() {
            validate_identifier("state", state.id())?;
        }
        for event in document.events() {
            validate_identifier("event", event)?;
        }

        let mut hooks = BTreeMap::new();
        let mut owners: HashMap<String, &str> = HashMap::new();
        for action in document.actions() {
            validate_identifier("action", action)?;
            let hook = format!("on_action_{}", snake_case(action));
            if let Some(other) = owners.insert(hook.clone(), action) {
                return Err(Error::generate(format!(
                    "actions {} and {} both map to hook {}",
                    other, action, hook
                )));
            }
            hooks.insert(action.clone(), hook);
        }

        Ok(Self {
            class,
            module,
            packages,
            hooks,
        })
    }

    /// Every document action gets a hook in `resolve`
    fn hook(&self, action: &str) -> Result<&str> {
        self.hooks
            .get(action)
            .map(String::as_str)
            .ok_or_else(|| Error::generate(format!("no hook resolved for action {}", action)))
    }
}

/// Indentation-aware line writer
#[derive(Default)]
struct Emitter {
    out: String,
    depth: usize,
}

impl Emitter {
    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str("    ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn open(&mut self, text: &str) {
        self.line(text);
        self.depth += 1;
    }

    fn close(&mut self, text: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }
}

/// Generates Rust source for a validated document
pub struct RustGenerator<'a> {
    document: &'a Document,
    config: CodegenConfig,
}

impl<'a> RustGenerator<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self {
            document,
            config: CodegenConfig::default(),
        }
    }

    pub fn with_config(mut self, config: &CodegenConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Render the machine module
    ///
    /// Fails when a name in the document cannot be used as a Rust identifier.
    pub fn generate(&self) -> Result<String> {
        let names = Names::resolve(self.document, &self.config)?;
        let mut e = Emitter::default();

        if self.config.header {
            e.line(&format!(
                "// @generated by scxml-fsm from `{}`. Do not edit.",
                self.document.qualified_name()
            ));
            e.blank();
        }

        for segment in &names.packages {
            e.open(&format!("pub mod {} {{", segment));
        }
        e.open(&format!("pub mod {} {{", names.module));
        e.line("#![allow(dead_code, non_camel_case_types)]");
        e.blank();
        e.line("use std::cell::Cell;");
        e.line("use std::fmt;");
        e.line("use std::str::FromStr;");
        e.blank();

        self.emit_state_enum(&mut e, &names);
        e.blank();
        self.emit_event_enum(&mut e, &names);
        e.blank();
        self.emit_error(&mut e);
        e.blank();
        self.emit_traits(&mut e, &names);
        e.blank();
        self.emit_machine(&mut e, &names)?;

        e.close("}");
        for _ in &names.packages {
            e.close("}");
        }

        tracing::debug!(
            "Generated {} lines for {}",
            e.out.lines().count(),
            self.document.qualified_name()
        );
        Ok(e.out)
    }

    /// Render and write to `writer`, e.g. stdout
    pub fn write_to(&self, writer: &mut impl io::Write) -> Result<()> {
        let source = self.generate()?;
        writer.write_all(source.as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    fn emit_state_enum(&self, e: &mut Emitter, names: &Names) {
        let states: Vec<&str> = self.document.states().iter().map(|s| s.id()).collect();

        e.line(&format!("/// States of `{}`, in declaration order", names.class));
        emit_enum(e, "State", &states);
        e.blank();

        e.open("impl State {");
        emit_all_and_name(e, "State", &states);
        e.blank();
        e.line("/// True for states without outgoing transitions");
        e.open("pub fn is_terminal(self) -> bool {");
        let terminal: Vec<String> = self
            .document
            .terminal_states()
            .map(|s| format!("State::{}", s.id()))
            .collect();
        if terminal.is_empty() {
            e.line("false");
        } else {
            e.line(&format!("matches!(self, {})", terminal.join(" | ")));
        }
        e.close("}");
        e.close("}");
        e.blank();

        emit_display(e, "State");
    }

    fn emit_event_enum(&self, e: &mut Emitter, names: &Names) {
        let events: Vec<&str> = self.document.events().iter().map(String::as_str).collect();

        e.line(&format!("/// Events accepted by `{}`", names.class));
        emit_enum(e, "Event", &events);
        e.blank();

        e.open("impl Event {");
        emit_all_and_name(e, "Event", &events);
        e.close("}");
        e.blank();

        emit_display(e, "Event");
        e.blank();

        e.open("impl FromStr for Event {");
        e.line("type Err = StateError;");
        e.blank();
        e.open("fn from_str(s: &str) -> Result<Self, Self::Err> {");
        e.line("Event::ALL");
        e.line("    .into_iter()");
        e.line("    .find(|event| event.name() == s)");
        e.line("    .ok_or_else(|| StateError::UnknownEvent(s.to_string()))");
        e.close("}");
        e.close("}");
    }

    fn emit_error(&self, e: &mut Emitter) {
        e.line("/// Illegal use of a running machine");
        e.line("#[derive(Debug, Clone, PartialEq, Eq)]");
        e.open("pub enum StateError {");
        e.line("AlreadyStarted,");
        e.line("NotStarted,");
        e.line("Reentrant(Event),");
        e.line("Unhandled { event: Event, state: State },");
        e.line("UnknownEvent(String),");
        e.line("Hook(String),");
        e.close("}");
        e.blank();

        e.open("impl fmt::Display for StateError {");
        e.open("fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {");
        e.open("match self {");
        e.line("StateError::AlreadyStarted => f.write_str(\"machine has already been started\"),");
        e.line("StateError::NotStarted => f.write_str(\"machine has not been started\"),");
        e.open("StateError::Reentrant(event) => {");
        e.line("write!(f, \"event {} pushed while another event is being handled\", event)");
        e.close("}");
        e.open("StateError::Unhandled { event, state } => {");
        e.line("write!(f, \"event {} is not handled in state {}\", event, state)");
        e.close("}");
        e.open("StateError::UnknownEvent(name) => {");
        e.line("write!(f, \"event {} is not declared by this machine\", name)");
        e.close("}");
        e.line("StateError::Hook(message) => f.write_str(message),");
        e.close("}");
        e.close("}");
        e.close("}");
        e.blank();

        e.line("impl std::error::Error for StateError {}");
    }

    fn emit_traits(&self, e: &mut Emitter, names: &Names) {
        e.line("/// Observer notified with literal names as a transition runs");
        e.open("pub trait DebugLogger {");
        e.line("fn on_event(&self, event: &str);");
        e.line("fn on_action(&self, action: &str);");
        e.line("fn on_state(&self, state: &str);");
        e.close("}");
        e.blank();

        e.line(&format!(
            "/// Side effects supplied by the owner of a `{}`",
            names.class
        ));
        e.open("pub trait Hooks: Sized {");
        e.line(&format!(
            "fn on_state_change(&self, fsm: &{}<Self>, state: State) -> Result<(), StateError>;",
            names.class
        ));
        for hook in names.hooks.values() {
            e.line(&format!(
                "fn {}(&self, fsm: &{}<Self>) -> Result<(), StateError>;",
                hook, names.class
            ));
        }
        e.close("}");
        e.blank();

        e.line("#[derive(Debug, Clone, Copy, PartialEq, Eq)]");
        e.open("enum Lifecycle {");
        e.line("NotStarted,");
        e.line("Started,");
        e.close("}");
        e.blank();

        e.open("struct PushGuard<'a> {");
        e.line("pushing: &'a Cell<bool>,");
        e.line("rejected: &'a Cell<Option<Event>>,");
        e.close("}");
        e.blank();
        e.open("impl Drop for PushGuard<'_> {");
        e.open("fn drop(&mut self) {");
        e.line("self.pushing.set(false);");
        e.line("self.rejected.set(None);");
        e.close("}");
        e.close("}");
    }

    fn emit_machine(&self, e: &mut Emitter, names: &Names) -> Result<()> {
        let class = &names.class;
        let debug = self.document.debug_flag();

        e.open(&format!("pub struct {}<H> {{", class));
        e.line("hooks: H,");
        e.line("lifecycle: Cell<Lifecycle>,");
        e.line("current_state: Cell<State>,");
        e.line("pushing_event: Cell<bool>,");
        e.line("rejected_event: Cell<Option<Event>>,");
        e.line("debug_logger: Option<Box<dyn DebugLogger>>,");
        e.close("}");
        e.blank();

        e.open(&format!("impl<H: Hooks> {}<H> {{", class));
        e.line(&format!(
            "pub const INITIAL_STATE: State = State::{};",
            self.document.initial_state_name()
        ));
        e.blank();

        e.open("pub fn new(hooks: H) -> Self {");
        e.open("Self {");
        e.line("hooks,");
        e.line("lifecycle: Cell::new(Lifecycle::NotStarted),");
        e.line("current_state: Cell::new(Self::INITIAL_STATE),");
        e.line("pushing_event: Cell::new(false),");
        e.line("rejected_event: Cell::new(None),");
        e.line("debug_logger: None,");
        e.close("}");
        e.close("}");
        e.blank();

        e.open("pub fn hooks(&self) -> &H {");
        e.line("&self.hooks");
        e.close("}");
        e.blank();

        e.open("pub fn set_debug_logger(&mut self, logger: Box<dyn DebugLogger>) {");
        e.line("self.debug_logger = Some(logger);");
        e.close("}");
        e.blank();

        e.open("pub fn debug_logger(&self) -> Option<&dyn DebugLogger> {");
        e.line("self.debug_logger.as_deref()");
        e.close("}");
        e.blank();

        e.open("pub fn current_state(&self) -> State {");
        e.line("self.current_state.get()");
        e.close("}");
        e.blank();

        e.open("pub fn is_in_terminal_state(&self) -> bool {");
        e.line("self.current_state.get().is_terminal()");
        e.close("}");
        e.blank();

        e.open("pub fn start(&self) -> Result<(), StateError> {");
        e.open("if self.lifecycle.get() == Lifecycle::Started {");
        e.line("return Err(StateError::AlreadyStarted);");
        e.close("}");
        e.line("self.lifecycle.set(Lifecycle::Started);");
        e.line("self.current_state.set(Self::INITIAL_STATE);");
        e.line("self.hooks.on_state_change(self, Self::INITIAL_STATE)");
        e.close("}");
        e.blank();

        self.emit_push_event(e, names, debug)?;
        e.blank();
        self.emit_handle_base_event(e, names, debug)?;
        e.blank();

        e.open("fn transition_to_state(&self, state: State) -> Result<bool, StateError> {");
        e.line("self.current_state.set(state);");
        if debug {
            e.line("self.log_state(state);");
        }
        e.line("self.after_hook(self.hooks.on_state_change(self, state))?;");
        e.line("Ok(true)");
        e.close("}");
        e.blank();

        e.open("fn after_hook(&self, result: Result<(), StateError>) -> Result<(), StateError> {");
        e.open("if let Some(event) = self.rejected_event.take() {");
        e.line("return Err(StateError::Reentrant(event));");
        e.close("}");
        e.line("result");
        e.close("}");

        if debug {
            for (name, arg, notify) in [
                ("log_event", "event: Event", "logger.on_event(event.name());"),
                ("log_action", "action: &str", "logger.on_action(action);"),
                ("log_state", "state: State", "logger.on_state(state.name());"),
            ] {
                e.blank();
                e.open(&format!("fn {}(&self, {}) {{", name, arg));
                e.open("if let Some(logger) = &self.debug_logger {");
                e.line(notify);
                e.close("}");
                e.close("}");
            }
        }

        e.close("}");
        Ok(())
    }

    fn emit_push_event(&self, e: &mut Emitter, names: &Names, debug: bool) -> Result<()> {
        e.open("pub fn push_event(&self, event: Event) -> Result<bool, StateError> {");
        e.open("if self.lifecycle.get() != Lifecycle::Started {");
        e.line("return Err(StateError::NotStarted);");
        e.close("}");
        e.open("if self.pushing_event.replace(true) {");
        e.open("if self.rejected_event.get().is_none() {");
        e.line("self.rejected_event.set(Some(event));");
        e.close("}");
        e.line("return Err(StateError::Reentrant(event));");
        e.close("}");
        e.open("let _guard = PushGuard {");
        e.line("pushing: &self.pushing_event,");
        e.line("rejected: &self.rejected_event,");
        e.close("};");
        e.blank();
        e.line("let state = self.current_state.get();");
        e.open("match (state, event) {");
        for state in self.document.states() {
            let mut seen = HashSet::new();
            for transition in state.transitions() {
                if !seen.insert(transition.event()) {
                    continue;
                }
                e.open(&format!(
                    "(State::{}, Event::{}) => {{",
                    state.id(),
                    transition.event()
                ));
                self.emit_transition_body(e, names, transition, debug)?;
                e.close("}");
            }
        }
        e.line("#[allow(unreachable_patterns)]");
        e.line("_ => self.handle_base_event(state, event),");
        e.close("}");
        e.close("}");
        Ok(())
    }

    fn emit_handle_base_event(&self, e: &mut Emitter, names: &Names, debug: bool) -> Result<()> {
        e.open("fn handle_base_event(&self, state: State, event: Event) -> Result<bool, StateError> {");
        match self.document.base_state() {
            Some(base) => {
                e.open("match event {");
                let mut seen = HashSet::new();
                for transition in base.transitions() {
                    if !seen.insert(transition.event()) {
                        continue;
                    }
                    e.open(&format!("Event::{} => {{", transition.event()));
                    self.emit_transition_body(e, names, transition, debug)?;
                    e.close("}");
                }
                e.line("#[allow(unreachable_patterns)]");
                e.line("_ => Err(StateError::Unhandled { event, state }),");
                e.close("}");
            }
            None => e.line("Err(StateError::Unhandled { event, state })"),
        }
        e.close("}");
        Ok(())
    }

    fn emit_transition_body(
        &self,
        e: &mut Emitter,
        names: &Names,
        transition: &Transition,
        debug: bool,
    ) -> Result<()> {
        if debug {
            e.line("self.log_event(event);");
        }
        for action in transition.actions() {
            if debug {
                e.line(&format!("self.log_action(\"{}\");", action));
            }
            e.line(&format!(
                "self.after_hook(self.hooks.{}(self))?;",
                names.hook(action)?
            ));
        }
        e.line(&format!(
            "self.transition_to_state(State::{})",
            transition.target()
        ));
        Ok(())
    }
}

fn emit_enum(e: &mut Emitter, name: &str, variants: &[&str]) {
    e.line("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]");
    e.open(&format!("pub enum {} {{", name));
    for variant in variants {
        e.line(&format!("{},", variant));
    }
    e.close("}");
}

fn emit_all_and_name(e: &mut Emitter, name: &str, variants: &[&str]) {
    let all: Vec<String> = variants
        .iter()
        .map(|v| format!("{}::{}", name, v))
        .collect();
    e.line(&format!(
        "pub const ALL: [{}; {}] = [{}];",
        name,
        variants.len(),
        all.join(", ")
    ));
    e.blank();
    e.open("pub fn name(self) -> &'static str {");
    e.open("match self {");
    for variant in variants {
        e.line(&format!("{}::{} => \"{}\",", name, variant, variant));
    }
    e.close("}");
    e.close("}");
}

fn emit_display(e: &mut Emitter, name: &str) {
    e.open(&format!("impl fmt::Display for {} {{", name));
    e.open("fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {");
    e.line("f.write_str(self.name())");
    e.close("}");
    e.close("}");
}

/// Generate with the default settings
pub fn to_rust(document: &Document) -> Result<String> {
    RustGenerator::new(document).generate()
}
