//! Graphviz DOT rendering
//!
//! Initial and terminal states are drawn as ellipses, every other state as a
//! circle. The base state is not drawn with the ordinary states: its
//! transitions come after all of them, followed by a highlighted base node.

use crate::config::GraphConfig;
use crate::document::{Document, State, Transition};
use crate::error::Result;
use std::fmt::Write as _;
use std::io;

pub struct DotWriter<'a> {
    document: &'a Document,
    config: GraphConfig,
}

impl<'a> DotWriter<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self {
            document,
            config: GraphConfig::default(),
        }
    }

    pub fn with_config(mut self, config: &GraphConfig) -> Self {
        self.config = config.clone();
        self
    }

    /// Render the whole graph as a string
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.line(&mut out, 0, &format!("digraph {} {{", self.document.class_name()));

        for state in self.document.states() {
            if self.document.is_base_state(state.id()) {
                continue;
            }

            let shape = if self.is_highlighted(state) {
                "ellipse"
            } else {
                "circle"
            };
            self.line(&mut out, 1, &format!("{} [shape={}]", state.id(), shape));
            for transition in state.transitions() {
                self.edge(&mut out, state, transition);
            }
        }

        if let Some(base) = self.document.base_state() {
            for transition in base.transitions() {
                self.edge(&mut out, base, transition);
            }
            self.line(
                &mut out,
                1,
                &format!(
                    "{}[shape={}, color={}]",
                    base.id(),
                    self.config.base_shape,
                    self.config.base_color
                ),
            );
        }

        self.line(&mut out, 0, "}");
        out
    }

    /// Render to a writer, e.g. stdout
    pub fn write(&self, writer: &mut impl io::Write) -> Result<()> {
        writer.write_all(self.render().as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    fn is_highlighted(&self, state: &State) -> bool {
        state.id() == self.document.initial_state_name() || self.document.is_terminal(state.id())
    }

    fn edge(&self, out: &mut String, from: &State, transition: &Transition) {
        self.line(
            out,
            1,
            &format!(
                "{} -> {} [fontsize=10, label=\"{}\"];",
                from.id(),
                transition.target(),
                transition.display_label()
            ),
        );
    }

    fn line(&self, out: &mut String, depth: usize, text: &str) {
        let _ = writeln!(out, "{:width$}{}", "", text, width = depth * self.config.indent);
    }
}

/// Render a document with the default graph settings
pub fn to_dot(document: &Document) -> String {
    DotWriter::new(document).render()
}
