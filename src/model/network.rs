//! Street network graph with spatial index and coverage boundary

use geo::{ConvexHull, Distance, Haversine, MultiPoint, Point, Polygon};
use petgraph::graph::{DiGraph, NodeIndex};
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use super::components::{StreetEdge, StreetNode};
use crate::error::Error;

/// Entry in the snapping index: node position plus its graph index.
#[derive(Debug, Clone)]
pub struct IndexedPoint {
    /// [lon, lat]
    pub point: [f64; 2],
    pub node: NodeIndex,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for IndexedPoint {
    /// Squared distance in degree space. Good enough to rank nearest-node
    /// candidates at city scale; the accept/reject check is done in meters.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Immutable street network: directed multigraph, snapping index and
/// coverage hull. Requires no synchronization; all runtime restrictions
/// live in the overlay.
pub struct StreetNetwork {
    /// Parallel edges between the same node pair are allowed and represent
    /// distinct carriageways or ways.
    pub graph: DiGraph<StreetNode, StreetEdge>,
    rtree: RTree<IndexedPoint>,
    boundary: Polygon<f64>,
}

impl StreetNetwork {
    pub(crate) fn new(graph: DiGraph<StreetNode, StreetEdge>, rtree: RTree<IndexedPoint>) -> Self {
        let points: MultiPoint<f64> = graph.node_weights().map(|node| node.geometry).collect();
        let boundary = points.convex_hull();
        Self {
            graph,
            rtree,
            boundary,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Convex hull of the node set, the externally visible coverage area.
    pub fn boundary(&self) -> &Polygon<f64> {
        &self.boundary
    }

    pub fn node_point(&self, node: NodeIndex) -> Point<f64> {
        self.graph[node].geometry
    }

    /// Snap a raw coordinate to its nearest graph node.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfCoverage`] when the network is empty or the nearest
    /// node lies farther than `max_snap_m` meters away.
    pub fn snap(&self, point: Point<f64>, max_snap_m: f64) -> Result<NodeIndex, Error> {
        let nearest = self
            .rtree
            .nearest_neighbor(&[point.x(), point.y()])
            .ok_or(Error::OutOfCoverage(point))?;
        if Haversine.distance(point, self.graph[nearest.node].geometry) > max_snap_m {
            return Err(Error::OutOfCoverage(point));
        }
        Ok(nearest.node)
    }
}
