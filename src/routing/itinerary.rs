//! Route assembly: node path → coordinate polyline plus aggregate totals
//!
//! The polyline starts at the raw origin coordinate and ends at the raw
//! destination coordinate, so the rendered route never jumps away from the
//! user's input points. Per-hop edge selection reuses the searches'
//! parallel-edge tie-break; a divergence here would make the reported
//! totals disagree with the drawn geometry.

use geo::{Coord, LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use itertools::Itertools;
use petgraph::graph::NodeIndex;
use serde_json::{Map, json};

use super::{Objective, best_edge_between};
use crate::cost::{base_seconds, traversal_seconds};
use crate::error::Error;
use crate::model::{StreetEdge, StreetNetwork, VehicleMode, VehicleProfile};
use crate::overlay::OverlayState;
use crate::{Meters, Seconds};

/// Externally visible result of a routing query.
#[derive(Debug, Clone)]
pub struct RouteResult {
    /// Polyline from the raw origin to the raw destination
    pub geometry: LineString<f64>,
    /// Total travel time, seconds
    pub travel_time: Seconds,
    /// Total distance, meters
    pub distance: Meters,
    pub mode: VehicleMode,
    pub objective: Objective,
    /// Raw query endpoints as given, before snapping
    pub origin: Point<f64>,
    pub destination: Point<f64>,
}

impl RouteResult {
    pub fn travel_time_minutes(&self) -> f64 {
        self.travel_time / 60.0
    }

    pub fn distance_km(&self) -> f64 {
        self.distance / 1000.0
    }

    /// Route line with summary properties, ready for map rendering.
    pub fn to_geojson(&self) -> FeatureCollection {
        let mut properties = Map::new();
        properties.insert("travel_time_seconds".into(), json!(self.travel_time));
        properties.insert("distance_meters".into(), json!(self.distance));
        properties.insert("vehicle".into(), json!(self.mode.as_str()));
        properties.insert("objective".into(), json!(self.objective.as_str()));

        let feature = Feature {
            bbox: None,
            geometry: Some(Geometry::new(GeoJsonValue::from(&self.geometry))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        };
        FeatureCollection {
            bbox: None,
            features: vec![feature],
            foreign_members: None,
        }
    }
}

/// Stitch the node sequence returned by a search into a [`RouteResult`].
///
/// # Errors
///
/// [`Error::InternalInconsistency`] when a consecutive node pair has no
/// connecting edge, or when a fastest-objective path contains an edge the
/// cost model rejects. Both indicate a search/assembler mismatch and are
/// never silently skipped.
pub fn assemble_route(
    network: &StreetNetwork,
    path: &[NodeIndex],
    origin: Point<f64>,
    destination: Point<f64>,
    profile: &VehicleProfile,
    overlay: &OverlayState,
    objective: Objective,
) -> Result<RouteResult, Error> {
    let graph = &network.graph;
    let mut coords: Vec<Coord<f64>> = Vec::with_capacity(path.len() + 2);
    push_coord(&mut coords, origin.into());

    let mut distance = 0.0;
    let mut travel_time = 0.0;

    for (&a, &b) in path.iter().tuple_windows() {
        let picked = match objective {
            Objective::Fastest => best_edge_between(graph, a, b, |id, edge| {
                traversal_seconds(id, edge, profile, overlay)
            }),
            Objective::Shortest => best_edge_between(graph, a, b, |_, edge| Some(edge.length_m)),
        };
        let Some((edge_id, weight)) = picked else {
            return Err(Error::InternalInconsistency(format!(
                "path contains hop {} -> {} with no traversable edge",
                graph[a].id, graph[b].id
            )));
        };

        let edge = &graph[edge_id];
        distance += edge.length_m;
        travel_time += match objective {
            // The selection weight already is the traversal time.
            Objective::Fastest => weight,
            // Shortest-distance paths may use edges the cost model rejects;
            // report the unrestricted travel time for those.
            Objective::Shortest => traversal_seconds(edge_id, edge, profile, overlay)
                .unwrap_or_else(|| base_seconds(edge, profile)),
        };

        append_edge_geometry(&mut coords, edge, graph[a].geometry, graph[b].geometry);
    }

    push_coord(&mut coords, destination.into());

    Ok(RouteResult {
        geometry: LineString::new(coords),
        travel_time,
        distance,
        mode: profile.mode,
        objective,
        origin,
        destination,
    })
}

/// Append the edge's stored geometry oriented from `from` to `to`, or the
/// straight-line fallback when no geometry was recorded.
fn append_edge_geometry(
    coords: &mut Vec<Coord<f64>>,
    edge: &StreetEdge,
    from: Point<f64>,
    to: Point<f64>,
) {
    match &edge.geometry {
        Some(line) if line.0.len() >= 2 => {
            // Two-way streets can share one stored line for both directions;
            // orient it so it leaves from the hop's first node.
            let first = line.0[0];
            let last = line.0[line.0.len() - 1];
            if squared_degree_distance(first, from.into())
                <= squared_degree_distance(last, from.into())
            {
                for &coord in &line.0 {
                    push_coord(coords, coord);
                }
            } else {
                for &coord in line.0.iter().rev() {
                    push_coord(coords, coord);
                }
            }
        }
        _ => push_coord(coords, to.into()),
    }
}

/// Push a coordinate unless it repeats the previous one (edges share their
/// joint nodes).
fn push_coord(coords: &mut Vec<Coord<f64>>, coord: Coord<f64>) {
    if coords.last() != Some(&coord) {
        coords.push(coord);
    }
}

fn squared_degree_distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}
