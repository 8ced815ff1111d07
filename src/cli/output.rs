//! Output formatting module
//!
//! This module formats the `check` summary and the `run` trace.

use crate::{
    Result,
    document::Document,
    graph::{AnalysisReport, GraphStats},
};
use serde_json::json;

/// Everything `check` reports about a document
pub struct Summary<'a> {
    pub document: &'a Document,
    pub stats: GraphStats,
    pub unreachable: Vec<&'a str>,
    pub analysis: AnalysisReport,
}

/// Output a check summary as JSON
pub fn output_json(w: &mut impl std::io::Write, summary: &Summary<'_>) -> Result<()> {
    let doc = summary.document;
    let output = json!({
        "machine": {
            "name": doc.qualified_name(),
            "class": doc.class_name(),
            "package": doc.package_name(),
            "initial_state": doc.initial_state_name(),
            "base_state": doc.base_state().map(|s| s.id()),
            "debug": doc.debug_flag(),
        },
        "summary": {
            "total_states": summary.stats.total_states,
            "total_transitions": summary.stats.total_transitions,
            "fallback_transitions": summary.stats.fallback_transitions,
            "terminal_states": summary.stats.terminal_states,
        },
        "states": doc.states(),
        "events": doc.events(),
        "actions": doc.actions(),
        "terminal_states": doc.terminal_states().map(|s| s.id()).collect::<Vec<_>>(),
        "unreachable_states": summary.unreachable,
        "analysis": summary.analysis,
    });

    serde_json::to_writer_pretty(&mut *w, &output)?;
    writeln!(w)?; // Add trailing newline
    Ok(())
}

/// Output a check summary as text table
pub fn output_table(w: &mut impl std::io::Write, summary: &Summary<'_>) -> Result<()> {
    let doc = summary.document;

    writeln!(w, "State Machine - {}", doc.qualified_name())?;
    writeln!(w, "{}", "=".repeat(80))?;
    writeln!(w)?;

    writeln!(w, "Summary:")?;
    writeln!(w, "  Initial State:     {}", doc.initial_state_name())?;
    writeln!(
        w,
        "  Base State:        {}",
        doc.base_state().map(|s| s.id()).unwrap_or("-")
    )?;
    writeln!(w, "  Debug:             {}", doc.debug_flag())?;
    writeln!(w, "  Total States:      {}", summary.stats.total_states)?;
    writeln!(w, "  Total Transitions: {}", summary.stats.total_transitions)?;
    writeln!(w, "  Events:            {}", doc.events().len())?;
    writeln!(w, "  Actions:           {}", doc.actions().len())?;
    writeln!(w, "  Pattern:           {}", summary.analysis.pattern.display_name())?;
    writeln!(w, "  Max Depth:         {}", summary.analysis.max_depth)?;
    writeln!(w)?;

    writeln!(w, "Transitions:")?;
    writeln!(w, "{:-<80}", "")?;
    writeln!(w, "{:<20} {:<20} {:<20} {:<17}", "From", "Event", "To", "Actions")?;
    writeln!(w, "{:-<80}", "")?;
    for state in doc.states() {
        if state.is_terminal() {
            writeln!(w, "{:<20} {:<20} {:<20} {:<17}", state.id(), "-", "(terminal)", "")?;
        }
        for transition in state.transitions() {
            writeln!(
                w,
                "{:<20} {:<20} {:<20} {:<17}",
                state.id(),
                transition.event(),
                transition.target(),
                transition.actions().join(", ")
            )?;
        }
    }
    writeln!(w)?;

    if !summary.unreachable.is_empty() {
        writeln!(w, "Unreachable States:")?;
        for id in &summary.unreachable {
            writeln!(w, "  - {}", id)?;
        }
        writeln!(w)?;
    }

    Ok(())
}

/// Output one line of a `run` trace
pub fn output_step(
    w: &mut impl std::io::Write,
    event: &str,
    actions: &[String],
    state: &str,
) -> Result<()> {
    if actions.is_empty() {
        writeln!(w, "{:<20} -> {}", event, state)?;
    } else {
        writeln!(w, "{:<20} -> {} ({})", event, state, actions.join(", "))?;
    }
    Ok(())
}
