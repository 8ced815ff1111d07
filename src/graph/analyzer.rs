//! Machine shape analyzer
//!
//! Classifies the transition graph of a document as linear, branching or
//! cyclic, and computes a few metrics for the `check` report.

use super::StateGraph;
use petgraph::Direction;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MachinePattern {
    /// A -> B -> C -> D
    Linear,

    /// A -> B
    ///   -> C
    Branching,

    /// A -> B -> A
    Cyclic,
}

impl MachinePattern {
    pub fn display_name(&self) -> &'static str {
        match self {
            MachinePattern::Linear => "Linear",
            MachinePattern::Branching => "Branching",
            MachinePattern::Cyclic => "Cyclic",
        }
    }
}

/// Analysis report containing pattern and metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub pattern: MachinePattern,
    pub branching_factor: f64,
    /// Most transitions needed to reach any reachable state from the initial one
    pub max_depth: usize,
    pub has_cycles: bool,
}

/// Detect the pattern of a state graph
pub fn detect_pattern(graph: &StateGraph) -> AnalysisReport {
    let node_count = graph.graph.node_count();

    let has_cycles = petgraph::algo::is_cyclic_directed(&graph.graph);

    let out_degrees: Vec<usize> = graph
        .graph
        .node_indices()
        .map(|idx| graph.graph.edges_directed(idx, Direction::Outgoing).count())
        .collect();

    let branching_factor = if node_count > 0 {
        out_degrees.iter().sum::<usize>() as f64 / node_count as f64
    } else {
        0.0
    };

    let pattern = if has_cycles {
        MachinePattern::Cyclic
    } else if out_degrees.iter().all(|&degree| degree <= 1) {
        MachinePattern::Linear
    } else {
        MachinePattern::Branching
    };

    AnalysisReport {
        pattern,
        branching_factor,
        max_depth: max_depth(graph),
        has_cycles,
    }
}

fn max_depth(graph: &StateGraph) -> usize {
    let mut depth = HashMap::from([(graph.initial_state, 0usize)]);
    let mut queue = VecDeque::from([graph.initial_state]);

    while let Some(idx) = queue.pop_front() {
        let next_depth = depth.get(&idx).copied().unwrap_or(0) + 1;
        for next in graph.graph.neighbors_directed(idx, Direction::Outgoing) {
            if !depth.contains_key(&next) {
                depth.insert(next, next_depth);
                queue.push_back(next);
            }
        }
    }

    depth.into_values().max().unwrap_or(0)
}
