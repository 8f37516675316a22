//! Shortest-distance search: label-setting over static segment lengths
//!
//! This objective bypasses the cost model entirely, so banned or
//! access-restricted edges remain traversable here. Preserved observable
//! behavior; see DESIGN.md.

use std::collections::BinaryHeap;

use hashbrown::HashMap;
use petgraph::graph::NodeIndex;

use super::{State, cheapest_out_edges, trace_path};
use crate::error::Error;
use crate::model::StreetNetwork;

/// Shortest path from `start` to `goal` by cumulative length in meters.
/// Returns the node sequence, origin first.
///
/// `max_cost` bounds the search frontier (meters); exceeding it reports
/// [`Error::NoPathFound`].
pub fn shortest_path(
    network: &StreetNetwork,
    start: NodeIndex,
    goal: NodeIndex,
    max_cost: Option<f64>,
) -> Result<Vec<NodeIndex>, Error> {
    let graph = &network.graph;
    let estimated_nodes = graph.node_count().min(1000);
    let mut distances: HashMap<NodeIndex, f64> = HashMap::with_capacity(estimated_nodes);
    let mut predecessors: HashMap<NodeIndex, NodeIndex> = HashMap::with_capacity(estimated_nodes);
    let mut heap = BinaryHeap::with_capacity(estimated_nodes / 4);

    heap.push(State {
        cost: 0.0,
        node: start,
    });
    distances.insert(start, 0.0);

    while let Some(State { cost, node }) = heap.pop() {
        if node == goal {
            return Ok(trace_path(&predecessors, start, goal));
        }

        // Skip stale heap entries
        if let Some(&best) = distances.get(&node) {
            if cost > best {
                continue;
            }
        }

        if let Some(max) = max_cost {
            if cost > max {
                break;
            }
        }

        for (next, _, length) in cheapest_out_edges(graph, node, |_, edge| Some(edge.length_m)) {
            let next_cost = cost + length;
            match distances.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    predecessors.insert(next, node);
                    heap.push(State {
                        cost: next_cost,
                        node: next,
                    });
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        predecessors.insert(next, node);
                        heap.push(State {
                            cost: next_cost,
                            node: next,
                        });
                    }
                }
            }
        }
    }

    Err(Error::NoPathFound)
}
