//! Path search over the street multigraph
//!
//! Two objectives, selected per query: shortest cumulative distance
//! (label-setting over static lengths) and fastest cumulative time
//! (heuristic-guided search over dynamic costs). Both apply the same
//! parallel-edge tie-break, shared with the route assembler so reported
//! totals always agree with the rendered geometry.

pub mod astar;
pub mod dijkstra;
pub mod itinerary;

pub use astar::fastest_path;
pub use dijkstra::shortest_path;
pub use itinerary::{RouteResult, assemble_route};

use std::cmp::Ordering;
use std::str::FromStr;

use hashbrown::HashMap;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{StreetEdge, StreetNode};

/// Routing objective selected per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Objective {
    /// Minimize cumulative length in meters. Deliberately ignores the cost
    /// model: distance is a geometric property, so bans and access rules do
    /// not apply.
    Shortest,
    /// Minimize cumulative traversal time under the current overlay.
    Fastest,
}

impl Objective {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shortest => "shortest",
            Self::Fastest => "fastest",
        }
    }
}

impl FromStr for Objective {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().as_str() {
            "shortest" => Ok(Self::Shortest),
            "fastest" => Ok(Self::Fastest),
            other => Err(Error::InvalidInput(format!("unknown objective: {other}"))),
        }
    }
}

/// Heap entry: min-ordered by cost, ties broken by node index so the pop
/// order is deterministic.
#[derive(Copy, Clone, PartialEq)]
pub(crate) struct State {
    pub(crate) cost: f64,
    pub(crate) node: NodeIndex,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by cost (reversed from standard Rust BinaryHeap)
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Ordering applied when several parallel edges connect the same node pair:
/// lowest weight first, ties broken by lowest edge index. Both searches and
/// the assembler rank candidates with this single function.
pub(crate) fn edge_order(a: (EdgeIndex, f64), b: (EdgeIndex, f64)) -> Ordering {
    a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0))
}

/// Cheapest parallel edge between an ordered node pair under `weight`.
/// `None` when no connecting edge has a finite weight.
pub(crate) fn best_edge_between<F>(
    graph: &DiGraph<StreetNode, StreetEdge>,
    from: NodeIndex,
    to: NodeIndex,
    mut weight: F,
) -> Option<(EdgeIndex, f64)>
where
    F: FnMut(EdgeIndex, &StreetEdge) -> Option<f64>,
{
    graph
        .edges_connecting(from, to)
        .filter_map(|edge| weight(edge.id(), edge.weight()).map(|w| (edge.id(), w)))
        .min_by(|a, b| edge_order(*a, *b))
}

/// Per-target cheapest outgoing edges of `node` under `weight`, with the
/// shared parallel-edge tie-break already applied.
pub(crate) fn cheapest_out_edges<F>(
    graph: &DiGraph<StreetNode, StreetEdge>,
    node: NodeIndex,
    mut weight: F,
) -> Vec<(NodeIndex, EdgeIndex, f64)>
where
    F: FnMut(EdgeIndex, &StreetEdge) -> Option<f64>,
{
    let mut best: Vec<(NodeIndex, EdgeIndex, f64)> = Vec::new();
    for edge in graph.edges(node) {
        let Some(w) = weight(edge.id(), edge.weight()) else {
            continue;
        };
        match best.iter_mut().find(|(target, _, _)| *target == edge.target()) {
            Some(entry) => {
                if edge_order((edge.id(), w), (entry.1, entry.2)) == Ordering::Less {
                    entry.1 = edge.id();
                    entry.2 = w;
                }
            }
            None => best.push((edge.target(), edge.id(), w)),
        }
    }
    best
}

/// Rebuild the node sequence from `start` to `goal` out of the predecessor
/// map filled in during search.
pub(crate) fn trace_path(
    predecessors: &HashMap<NodeIndex, NodeIndex>,
    start: NodeIndex,
    goal: NodeIndex,
) -> Vec<NodeIndex> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        match predecessors.get(&current) {
            Some(&previous) => {
                path.push(previous);
                current = previous;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
