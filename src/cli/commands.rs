//! CLI command implementations
//!
//! This module contains the implementation for each CLI command. Every
//! command reads and validates its input before writing anything, so a bad
//! document never produces partial output.

use crate::document::Document;
use crate::{Config, Result};
use std::io::Write;
use std::path::Path;

fn load(input: &Path) -> Result<Document> {
    tracing::info!("Reading {:?}", input);
    Document::from_file(input)
}

/// Dot command implementation
pub mod dot {
    use super::*;
    use crate::graph::DotWriter;

    /// Execute the dot command
    pub fn execute(input: &Path, config: &Config, w: &mut impl Write) -> Result<()> {
        let document = load(input)?;
        DotWriter::new(&document).with_config(&config.graph).write(w)
    }
}

/// Rust command implementation
pub mod rust {
    use super::*;
    use crate::codegen::RustGenerator;

    /// Execute the rust command
    pub fn execute(
        input: &Path,
        class_name: Option<String>,
        config: &Config,
        w: &mut impl Write,
    ) -> Result<()> {
        let mut document = load(input)?;
        if let Some(name) = class_name {
            tracing::debug!("Renaming class {} to {}", document.class_name(), name);
            document.change_class_name(name);
        }

        RustGenerator::new(&document)
            .with_config(&config.codegen)
            .write_to(w)
    }
}

/// Check command implementation
pub mod check {
    use super::*;
    use crate::cli::{
        OutputFormat,
        output::{self, Summary},
    };
    use crate::graph::{StateGraph, detect_pattern};

    /// Execute the check command
    pub fn execute(input: &Path, format: OutputFormat, w: &mut impl Write) -> Result<()> {
        let document = load(input)?;
        let graph = StateGraph::from_document(&document);

        let unreachable = graph.unreachable_states();
        for id in &unreachable {
            tracing::warn!("State {} can never be reached from {}", id, document.initial_state_name());
        }

        let summary = Summary {
            document: &document,
            stats: graph.stats(),
            unreachable,
            analysis: detect_pattern(&graph),
        };

        match format {
            OutputFormat::Json => output::output_json(w, &summary),
            OutputFormat::Table => output::output_table(w, &summary),
        }
    }
}

/// Run command implementation
pub mod run {
    use super::*;
    use crate::cli::output;
    use crate::runtime::{Machine, Recorder, Step, TracingLogger};

    /// Execute the run command
    pub fn execute(input: &Path, events: &[String], w: &mut impl Write) -> Result<()> {
        let document = load(input)?;
        let mut machine = Machine::new(&document, Recorder::default());
        machine.set_debug_logger(Box::new(TracingLogger));

        machine.start()?;
        writeln!(w, "{:<20} -> {}", "(start)", document.initial_state_name())?;

        for event in events {
            let seen = machine.hooks().steps().len();
            machine.push_event(event)?;

            let steps = machine.hooks().steps();
            let mut actions = Vec::new();
            let mut state = "";
            for step in &steps[seen..] {
                match step {
                    Step::Action(action) => actions.push(action.clone()),
                    Step::StateChange(id) => state = id.as_str(),
                }
            }
            output::output_step(w, event, &actions, state)?;
        }

        if machine.is_in_terminal_state() {
            writeln!(w, "{:<20} -> {}", "(terminal)", machine.current_state_name().unwrap_or_default())?;
        }

        Ok(())
    }
}
