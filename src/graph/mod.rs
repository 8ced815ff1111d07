//! Graph module - structural view of a machine and its Graphviz rendering

use crate::document::{Document, StateId};
use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use std::collections::{HashMap, VecDeque};

pub mod analyzer;
pub mod dot;

pub use analyzer::{AnalysisReport, MachinePattern, detect_pattern};
pub use dot::{DotWriter, to_dot};

/// Edge weight: one declared transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionEdge {
    pub event: String,
    pub actions: Vec<String>,
    /// Declared on the base state, so usable from every state
    pub fallback: bool,
}

/// A directed graph of the declared states and transitions of a document.
///
/// Nodes are inserted in document order, so iterating node indices follows the
/// source. Base-state transitions appear once, as edges leaving the base node.
pub struct StateGraph {
    pub graph: StableGraph<StateId, TransitionEdge>,

    /// Lookup from state id to node index
    pub state_index: HashMap<StateId, NodeIndex>,

    pub initial_state: NodeIndex,
    pub base_state: Option<NodeIndex>,
}

impl StateGraph {
    pub fn from_document(document: &Document) -> Self {
        let mut graph = StableGraph::new();
        let mut state_index = HashMap::new();

        for state in document.states() {
            let idx = graph.add_node(state.id.clone());
            state_index.insert(state.id.clone(), idx);
        }

        let base_state = document
            .base_state()
            .and_then(|base| state_index.get(&base.id).copied());

        for state in document.states() {
            let Some(&from) = state_index.get(&state.id) else {
                continue;
            };
            for transition in state.transitions() {
                // Targets are validated by the builder
                if let Some(&to) = state_index.get(&transition.target) {
                    graph.add_edge(
                        from,
                        to,
                        TransitionEdge {
                            event: transition.event.clone(),
                            actions: transition.actions.clone(),
                            fallback: Some(from) == base_state,
                        },
                    );
                }
            }
        }

        let initial_state = state_index
            .get(document.initial_state_name())
            .copied()
            .unwrap_or_else(|| NodeIndex::new(0));

        Self {
            graph,
            state_index,
            initial_state,
            base_state,
        }
    }

    /// State ids reachable from the initial state, in document order
    ///
    /// Base-state transitions may fire from any state, so their targets are
    /// reachable as soon as anything else is.
    pub fn reachable_states(&self) -> Vec<&str> {
        let mut visited = vec![self.initial_state];
        let mut queue = VecDeque::from([self.initial_state]);

        while let Some(idx) = queue.pop_front() {
            let fallback = self
                .base_state
                .filter(|&base| base != idx)
                .into_iter()
                .flat_map(|base| self.graph.neighbors_directed(base, Direction::Outgoing));

            for next in self
                .graph
                .neighbors_directed(idx, Direction::Outgoing)
                .chain(fallback)
            {
                if !visited.contains(&next) {
                    visited.push(next);
                    queue.push_back(next);
                }
            }
        }

        self.graph
            .node_indices()
            .filter(|idx| visited.contains(idx))
            .filter_map(|idx| self.graph.node_weight(idx).map(String::as_str))
            .collect()
    }

    /// Declared states that can never become current, in document order.
    /// The base state is excluded unless it is also a transition target.
    pub fn unreachable_states(&self) -> Vec<&str> {
        let reachable = self.reachable_states();
        self.graph
            .node_indices()
            .filter(|&idx| {
                Some(idx) != self.base_state
                    || self.graph.edges_directed(idx, Direction::Incoming).count() > 0
            })
            .filter_map(|idx| self.graph.node_weight(idx).map(String::as_str))
            .filter(|id| !reachable.contains(id))
            .collect()
    }

    /// Get graph statistics
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            total_states: self.graph.node_count(),
            total_transitions: self.graph.edge_count(),
            fallback_transitions: self
                .graph
                .edge_indices()
                .filter_map(|idx| self.graph.edge_weight(idx))
                .filter(|edge| edge.fallback)
                .count(),
            terminal_states: self
                .graph
                .node_indices()
                .filter(|&idx| self.graph.edges_directed(idx, Direction::Outgoing).count() == 0)
                .count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphStats {
    pub total_states: usize,
    pub total_transitions: usize,
    pub fallback_transitions: usize,
    pub terminal_states: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_for(input: &str) -> StateGraph {
        StateGraph::from_document(&Document::parse(input).unwrap())
    }

    #[test]
    fn test_graph_stats() {
        let graph = graph_for(include_str!("../../testdata/large.xml"));
        let stats = graph.stats();
        assert_eq!(stats.total_states, 4);
        assert_eq!(stats.total_transitions, 6);
        assert_eq!(stats.fallback_transitions, 1);
        assert_eq!(stats.terminal_states, 1);
    }

    #[test]
    fn test_all_states_reachable() {
        let graph = graph_for(include_str!("../../testdata/medium.xml"));
        assert_eq!(
            graph.reachable_states(),
            vec!["Sleeping", "Dreaming", "Annoyed", "Awake"]
        );
        assert!(graph.unreachable_states().is_empty());
    }

    #[test]
    fn test_unreachable_states() {
        let graph = graph_for(
            r#"<scxml name="Orphans">
                 <state id="A"><transition event="Go" target="B"/></state>
                 <state id="B"/>
                 <state id="C"><transition event="Go" target="B"/></state>
               </scxml>"#,
        );
        assert_eq!(graph.unreachable_states(), vec!["C"]);
    }

    #[test]
    fn test_base_targets_reachable_from_anywhere() {
        let graph = graph_for(
            r#"<scxml name="Fallback" base="Base">
                 <state id="A"/>
                 <state id="Recovery"/>
                 <state id="Base"><transition event="Fail" target="Recovery"/></state>
               </scxml>"#,
        );
        assert_eq!(graph.reachable_states(), vec!["A", "Recovery"]);
        // The base state only holds transitions, it is never entered
        assert!(graph.unreachable_states().is_empty());
    }
}
