//! Document model builder
//!
//! Walks a validated element tree once, top to bottom, and accumulates the
//! names it needs for the cross-reference checks. The accumulators live on
//! the builder and are moved into the [`Document`] when every rule passes.

use super::{Document, NAME_SEPARATOR, ROOT_ELEMENT, State, StateId, Transition};
use crate::markup::{self, Element};
use crate::{Result, ensure, parse_error};
use std::collections::BTreeSet;

const STATE_ELEMENT: &str = "state";
const TRANSITION_ELEMENT: &str = "transition";
const ACTION_ELEMENT: &str = "action";

/// Builds a [`Document`] from an element tree, failing on the first violated rule
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    states: Vec<State>,
    terminal_states: Vec<StateId>,
    events: BTreeSet<String>,
    actions: BTreeSet<String>,
    declared_state_names: Vec<StateId>,
    /// Distinct targets in the order they were first seen
    targets: Vec<StateId>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the builder and produce a validated document
    ///
    /// Rules are checked in a fixed order and the first violation is reported:
    /// root tag, vocabulary, `name`, presence of states, per-state contents,
    /// base state, initial state, transition targets.
    pub fn build(mut self, root: &Element) -> Result<Document> {
        ensure!(
            root.name() == ROOT_ELEMENT,
            "document must be of type {}",
            ROOT_ELEMENT
        );

        markup::validate_tree(root)?;

        let (class_name, package_name) = split_name(root.attr("name"))?;
        let debug = root.attr("debug").eq_ignore_ascii_case("true");

        ensure!(
            root.children_named(STATE_ELEMENT).next().is_some(),
            "{} must contain at least one state",
            ROOT_ELEMENT
        );

        for child in root.children() {
            ensure!(
                child.name() == STATE_ELEMENT,
                "element {} is not allowed inside {}",
                child.name(),
                ROOT_ELEMENT
            );
            let state = self.parse_state(child)?;
            if state.is_terminal() {
                self.terminal_states.push(state.id.clone());
            }
            self.states.push(state);
        }

        let mut initial_state_name = root.attr("initial").to_string();
        if initial_state_name.is_empty()
            && let Some(first) = self.states.first()
        {
            initial_state_name = first.id.clone();
        }

        let base_name = root.attr("base");
        let base_state = if base_name.is_empty() {
            None
        } else {
            let position = self
                .states
                .iter()
                .position(|s| s.id == base_name)
                .ok_or_else(|| parse_error!("referenced base state {} is not declared", base_name))?;
            Some(position)
        };

        ensure!(
            self.declared_state_names.contains(&initial_state_name),
            "referenced initial state {} was not declared.",
            initial_state_name
        );

        if let Some(target) = self
            .targets
            .iter()
            .find(|t| !self.declared_state_names.contains(*t))
        {
            return Err(parse_error!(
                "target {} does not represent a state declared in this document",
                target
            ));
        }

        tracing::info!(
            "Built document {} with {} states, {} events, {} actions",
            root.attr("name"),
            self.states.len(),
            self.events.len(),
            self.actions.len()
        );

        Ok(Document {
            class_name,
            package_name,
            initial_state_name,
            states: self.states,
            base_state,
            terminal_states: self.terminal_states,
            events: self.events,
            actions: self.actions,
            declared_state_names: self.declared_state_names,
            targets: self.targets.into_iter().collect(),
            debug,
        })
    }

    fn parse_state(&mut self, element: &Element) -> Result<State> {
        let id = element.attr("id");
        ensure!(!id.is_empty(), "every state must have an id attribute");
        ensure!(
            !self.declared_state_names.iter().any(|declared| declared == id),
            "state {} is declared more than once",
            id
        );
        self.declared_state_names.push(id.to_string());

        let mut state = State::new(id);
        for child in element.children() {
            ensure!(
                child.name() == TRANSITION_ELEMENT,
                "element {} is not allowed inside state {}",
                child.name(),
                id
            );
            state.transitions.push(self.parse_transition(child)?);
        }

        tracing::debug!("Parsed state {} with {} transitions", id, state.transitions.len());
        Ok(state)
    }

    fn parse_transition(&mut self, element: &Element) -> Result<Transition> {
        let event = element.attr("event");
        ensure!(!event.is_empty(), "all transitions must be triggered by an event");
        self.events.insert(event.to_string());

        let target = element.attr("target");
        ensure!(!target.is_empty(), "all transitions must have a target");
        if !self.targets.iter().any(|t| t == target) {
            self.targets.push(target.to_string());
        }

        let mut transition = Transition::new(event, target);

        let action = element.attr("action");
        if !action.is_empty() {
            transition.actions.push(action.to_string());
        }

        for child in element.children() {
            ensure!(
                child.name() == ACTION_ELEMENT,
                "element {} is not allowed inside transition {}",
                child.name(),
                event
            );
            if let Some(nested) = child.children().first() {
                return Err(parse_error!(
                    "element {} is not allowed inside action",
                    nested.name()
                ));
            }
            let id = child.attr("id");
            ensure!(!id.is_empty(), "all actions must have an id attribute");
            transition.actions.push(id.to_string());
        }

        self.actions.extend(transition.actions.iter().cloned());

        tracing::debug!(
            "Parsed transition {} -> {} with {} actions",
            event,
            target,
            transition.actions.len()
        );
        Ok(transition)
    }
}

/// Split `name` on its last separator into (class, package)
fn split_name(name: &str) -> Result<(String, Option<String>)> {
    ensure!(
        !name.is_empty(),
        "{} tag must contain a name attribute to specify output class",
        ROOT_ELEMENT
    );
    ensure!(
        !name.ends_with(NAME_SEPARATOR),
        "{} name attribute must not end in a '{}'",
        ROOT_ELEMENT,
        NAME_SEPARATOR
    );

    Ok(match name.rsplit_once(NAME_SEPARATOR) {
        Some((package, class)) => (class.to_string(), Some(package.to_string())),
        None => (name.to_string(), None),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn parse(input: &str) -> Result<Document> {
        Document::parse(input)
    }

    fn parse_err(input: &str) -> String {
        match parse(input) {
            Err(Error::Parse(message)) => message,
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_tiny() {
        let doc = parse(include_str!("../../testdata/tiny.xml")).unwrap();
        let ids: Vec<&str> = doc.states().iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["StateOne", "StateTwo"]);
        assert_eq!(doc.class_name(), "tiny");
        assert_eq!(doc.package_name(), None);
        assert!(doc.base_state().is_none());
        assert!(!doc.debug_flag());
    }

    #[test]
    fn test_separates_package_and_class_names() {
        let doc = parse(include_str!("../../testdata/small.xml")).unwrap();
        assert_eq!(doc.class_name(), "Small");
        assert_eq!(doc.package_name(), Some("dummy.pkg"));
    }

    #[test]
    fn test_initial_state_inferred() {
        let doc = parse(include_str!("../../testdata/tiny.xml")).unwrap();
        assert_eq!(doc.initial_state_name(), "StateOne");
    }

    #[test]
    fn test_initial_state_parsed() {
        let doc = parse(include_str!("../../testdata/large.xml")).unwrap();
        assert_eq!(doc.initial_state_name(), "Sleeping");
        assert_eq!(doc.initial_state().unwrap().id(), "Sleeping");
    }

    #[test]
    fn test_debug_flag() {
        assert!(parse(include_str!("../../testdata/debug.xml")).unwrap().debug_flag());
        assert!(!parse(include_str!("../../testdata/debug_false.xml")).unwrap().debug_flag());

        let doc = parse(r#"<scxml name="A" debug="TrUe"><state id="S"/></scxml>"#).unwrap();
        assert!(doc.debug_flag());
        let doc = parse(r#"<scxml name="A" debug="yes"><state id="S"/></scxml>"#).unwrap();
        assert!(!doc.debug_flag());
    }

    #[test]
    fn test_terminal_states() {
        let tiny = parse(include_str!("../../testdata/tiny.xml")).unwrap();
        assert_eq!(tiny.terminal_states().count(), 1);

        let small = parse(include_str!("../../testdata/small.xml")).unwrap();
        assert_eq!(small.terminal_states().count(), 0);
    }

    #[test]
    fn test_base_state_parsed() {
        let doc = parse(include_str!("../../testdata/large.xml")).unwrap();
        assert_eq!(doc.base_state().unwrap().id(), "BaseState");
        assert!(doc.is_base_state("BaseState"));
    }

    #[test]
    fn test_transitions_parsed() {
        let doc = parse(include_str!("../../testdata/large.xml")).unwrap();
        let sleeping = doc.state("Sleeping").unwrap();
        let events: Vec<&str> = sleeping.transitions().iter().map(|t| t.event()).collect();
        assert_eq!(events, vec!["AlarmRings", "Dog", "Nightmare"]);
        assert_eq!(
            sleeping.transition_for("AlarmRings").unwrap().target(),
            "AnnoyedState"
        );
    }

    #[test]
    fn test_action_attribute_and_elements() {
        let doc = parse(include_str!("../../testdata/large.xml")).unwrap();

        let failure = doc.state("BaseState").unwrap().transition_for("RuntimeFailure").unwrap();
        assert_eq!(failure.actions(), ["WakeUp"]);

        let dog = doc.state("Sleeping").unwrap().transition_for("Dog").unwrap();
        assert_eq!(dog.actions(), ["Grunt", "Kick"]);

        // Attribute action comes first, nested actions follow in document order
        let get_up = doc.state("AnnoyedState").unwrap().transition_for("GetUp").unwrap();
        assert_eq!(get_up.actions(), ["Stretch", "Yawn", "Shower"]);
    }

    #[test]
    fn test_duplicate_actions_counted_per_transition() {
        let doc = parse(
            r#"<scxml name="Dup">
                 <state id="A">
                   <transition event="Go" target="A" action="Beep"><action id="Beep"/></transition>
                 </state>
               </scxml>"#,
        )
        .unwrap();
        assert_eq!(doc.state("A").unwrap().transitions()[0].actions(), ["Beep", "Beep"]);
        assert_eq!(doc.actions().len(), 1);
    }

    #[test]
    fn test_event_action_and_target_sets() {
        let doc = parse(include_str!("../../testdata/large.xml")).unwrap();
        let events: Vec<&str> = doc.events().iter().map(String::as_str).collect();
        assert_eq!(
            events,
            vec!["AlarmRings", "Dog", "GetUp", "HitSnooze", "Nightmare", "RuntimeFailure"]
        );

        for action in ["WakeUp", "Grunt", "Kick", "Scream", "ResetAlarm", "Stretch", "Yawn", "Shower"] {
            assert!(doc.actions().contains(action), "missing action {}", action);
        }

        assert!(
            doc.targets()
                .iter()
                .all(|t| doc.declared_state_names().contains(t))
        );
    }

    #[test]
    fn test_rejects_bad_doc_type() {
        let message = parse_err(r#"<fsm name="A"><state id="S"/></fsm>"#);
        assert_eq!(message, "document must be of type scxml");
    }

    #[test]
    fn test_rejects_bad_element_name() {
        let message = parse_err(r#"<scxml name="A"><state id="S"><onentry/></state></scxml>"#);
        assert_eq!(message, "element onentry is not accepted");
    }

    #[test]
    fn test_rejects_bad_attribute_name() {
        let message = parse_err(
            r#"<scxml name="A"><state id="S"><transition event="E" target="S" cond="x"/></state></scxml>"#,
        );
        assert_eq!(message, "attribute cond is not accepted");
    }

    #[test]
    fn test_rejects_bad_doc_attribute_name() {
        let message = parse_err(r#"<scxml name="A" datamodel="null"><state id="S"/></scxml>"#);
        assert_eq!(message, "attribute datamodel is not accepted");
    }

    #[test]
    fn test_vocabulary_checked_before_name() {
        let message = parse_err(r#"<scxml><state id="S" src="x"/></scxml>"#);
        assert_eq!(message, "attribute src is not accepted");
    }

    #[test]
    fn test_rejects_missing_name() {
        let message = parse_err(r#"<scxml><state id="S"/></scxml>"#);
        assert!(message.contains("name attribute"));
    }

    #[test]
    fn test_rejects_name_ending_in_separator() {
        let message = parse_err(r#"<scxml name="pkg."><state id="S"/></scxml>"#);
        assert_eq!(message, "scxml name attribute must not end in a '.'");
    }

    #[test]
    fn test_rejects_no_states() {
        let message = parse_err(r#"<scxml name="A"></scxml>"#);
        assert_eq!(message, "scxml must contain at least one state");
    }

    #[test]
    fn test_rejects_state_without_id() {
        let message = parse_err(r#"<scxml name="A"><state/></scxml>"#);
        assert_eq!(message, "every state must have an id attribute");
    }

    #[test]
    fn test_rejects_duplicate_state_id() {
        let message = parse_err(r#"<scxml name="A"><state id="S"/><state id="S"/></scxml>"#);
        assert_eq!(message, "state S is declared more than once");
    }

    #[test]
    fn test_rejects_transition_missing_event() {
        let message = parse_err(r#"<scxml name="A"><state id="S"><transition target="S"/></state></scxml>"#);
        assert_eq!(message, "all transitions must be triggered by an event");
    }

    #[test]
    fn test_rejects_transition_missing_target() {
        let message = parse_err(r#"<scxml name="A"><state id="S"><transition event="E"/></state></scxml>"#);
        assert_eq!(message, "all transitions must have a target");
    }

    #[test]
    fn test_rejects_action_missing_id() {
        let message = parse_err(
            r#"<scxml name="A"><state id="S"><transition event="E" target="S"><action/></transition></state></scxml>"#,
        );
        assert_eq!(message, "all actions must have an id attribute");
    }

    #[test]
    fn test_rejects_undeclared_base_state() {
        let message = parse_err(r#"<scxml name="A" base="Base"><state id="S"/></scxml>"#);
        assert_eq!(message, "referenced base state Base is not declared");
    }

    #[test]
    fn test_rejects_undeclared_initial_state() {
        let message = parse_err(r#"<scxml name="A" initial="Nope"><state id="S"/></scxml>"#);
        assert_eq!(message, "referenced initial state Nope was not declared.");
    }

    #[test]
    fn test_base_checked_before_initial() {
        let message = parse_err(r#"<scxml name="A" initial="Nope" base="Gone"><state id="S"/></scxml>"#);
        assert!(message.contains("base state Gone"));
    }

    #[test]
    fn test_reports_first_undeclared_target_in_document_order() {
        let message = parse_err(
            r#"<scxml name="A">
                 <state id="S">
                   <transition event="E1" target="S"/>
                   <transition event="E2" target="Zulu"/>
                   <transition event="E3" target="Alpha"/>
                 </state>
               </scxml>"#,
        );
        assert_eq!(
            message,
            "target Zulu does not represent a state declared in this document"
        );
    }

    #[test]
    fn test_rejects_nested_state() {
        let message = parse_err(r#"<scxml name="A"><state id="S"><state id="T"/></state></scxml>"#);
        assert_eq!(message, "element state is not allowed inside state S");
    }

    #[test]
    fn test_rejects_transition_outside_state() {
        let message = parse_err(
            r#"<scxml name="A"><state id="S"/><transition event="E" target="S"/></scxml>"#,
        );
        assert_eq!(message, "element transition is not allowed inside scxml");
    }

    #[test]
    fn test_builds_from_element_tree() {
        let root = Element::new("scxml")
            .with_attribute("name", "built.Machine")
            .with_child(
                Element::new("state").with_attribute("id", "On").with_child(
                    Element::new("transition")
                        .with_attribute("event", "Toggle")
                        .with_attribute("target", "Off"),
                ),
            )
            .with_child(
                Element::new("state").with_attribute("id", "Off").with_child(
                    Element::new("transition")
                        .with_attribute("event", "Toggle")
                        .with_attribute("target", "On"),
                ),
            );

        let doc = Document::from_element(&root).unwrap();
        assert_eq!(doc.qualified_name(), "built.Machine");
        assert_eq!(doc.initial_state_name(), "On");
        assert_eq!(doc.declared_state_names(), ["On", "Off"]);
    }

    #[test]
    fn test_rejects_malformed_markup() {
        let err = parse("<scxml name=\"A\"><state id=\"S\"></scxml>").unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Document::from_file(dir.path().join("nosuchfile")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
