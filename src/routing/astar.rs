//! Fastest-time search: A* over dynamic costs
//!
//! The heuristic is the great-circle distance to the goal divided by the
//! profile's maximum attainable speed. Parameterizing per profile keeps the
//! bound admissible for slow modes, where a single global car-speed
//! assumption would wildly overestimate. Edge costs are evaluated lazily
//! during relaxation against the overlay snapshot taken at query start;
//! only visited edges are ever priced.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use geo::{Distance, Haversine};
use hashbrown::HashMap;
use petgraph::graph::NodeIndex;

use super::{cheapest_out_edges, trace_path};
use crate::cost::traversal_seconds;
use crate::error::Error;
use crate::model::{StreetNetwork, VehicleProfile};
use crate::overlay::OverlayState;

/// Heap entry ordered by estimated total time (cost so far + lower bound
/// to the goal), min first.
#[derive(Copy, Clone, PartialEq)]
struct AstarState {
    estimate: f64,
    cost: f64,
    node: NodeIndex,
}

impl Eq for AstarState {}

impl Ord for AstarState {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .estimate
            .total_cmp(&self.estimate)
            .then_with(|| other.cost.total_cmp(&self.cost))
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for AstarState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Fastest path from `start` to `goal` by cumulative traversal time under
/// `overlay`. Returns the node sequence, origin first.
///
/// `max_cost` bounds the cumulative time in seconds; exceeding it reports
/// [`Error::NoPathFound`].
pub fn fastest_path(
    network: &StreetNetwork,
    start: NodeIndex,
    goal: NodeIndex,
    profile: &VehicleProfile,
    overlay: &OverlayState,
    max_cost: Option<f64>,
) -> Result<Vec<NodeIndex>, Error> {
    let graph = &network.graph;
    let goal_point = graph[goal].geometry;
    let heuristic = |node: NodeIndex| {
        Haversine.distance(graph[node].geometry, goal_point) / profile.max_speed_ms()
    };

    let estimated_nodes = graph.node_count().min(1000);
    let mut costs: HashMap<NodeIndex, f64> = HashMap::with_capacity(estimated_nodes);
    let mut predecessors: HashMap<NodeIndex, NodeIndex> = HashMap::with_capacity(estimated_nodes);
    let mut heap = BinaryHeap::with_capacity(estimated_nodes / 4);

    heap.push(AstarState {
        estimate: heuristic(start),
        cost: 0.0,
        node: start,
    });
    costs.insert(start, 0.0);

    while let Some(AstarState { cost, node, .. }) = heap.pop() {
        if node == goal {
            return Ok(trace_path(&predecessors, start, goal));
        }

        // Skip stale heap entries
        if let Some(&best) = costs.get(&node) {
            if cost > best {
                continue;
            }
        }

        if let Some(max) = max_cost {
            if cost > max {
                break;
            }
        }

        let relaxed = cheapest_out_edges(graph, node, |id, edge| {
            traversal_seconds(id, edge, profile, overlay)
        });
        for (next, _, seconds) in relaxed {
            let next_cost = cost + seconds;
            match costs.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    predecessors.insert(next, node);
                    heap.push(AstarState {
                        estimate: next_cost + heuristic(next),
                        cost: next_cost,
                        node: next,
                    });
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        predecessors.insert(next, node);
                        heap.push(AstarState {
                            estimate: next_cost + heuristic(next),
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
