//! Construction of the street network from the collaborator hand-off
//!
//! Source tags arrive as either a scalar or a list ("value or list" shape).
//! Everything is collapsed into fixed-shape records here, so downstream
//! logic never branches on shape.

use geo::{Coord, Distance, Haversine, LineString, Point};
use hashbrown::HashMap;
use itertools::Itertools;
use log::{info, warn};
use petgraph::graph::{DiGraph, NodeIndex};
use rstar::RTree;
use serde::Deserialize;

use crate::error::Error;
use crate::model::{
    IndexedPoint, RoadClass, StreetEdge, StreetNetwork, StreetNode, parse_speed_tag,
};

/// A source tag that may carry one value or several.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    One(String),
    Many(Vec<String>),
}

impl TagValue {
    /// First value; multi-valued tags collapse to their head.
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::One(value) => Some(value.as_str()),
            Self::Many(values) => values.first().map(String::as_str),
        }
    }

    fn into_values(self) -> Vec<String> {
        match self {
            Self::One(value) => vec![value],
            Self::Many(values) => values,
        }
    }
}

/// Node record as handed off by the network-construction collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct RawNode {
    pub id: u64,
    pub lat: f64,
    pub lon: f64,
}

/// Edge record as handed off by the network-construction collaborator.
/// Directed; a two-way street arrives as two records.
#[derive(Debug, Clone, Deserialize)]
pub struct RawEdge {
    pub from: u64,
    pub to: u64,
    /// Measured length in meters; computed from the geometry when absent
    #[serde(default)]
    pub length_m: Option<f64>,
    /// Functional road category
    #[serde(default)]
    pub road_class: Option<TagValue>,
    /// Legal speed limit as free text
    #[serde(default)]
    pub speed_limit: Option<TagValue>,
    /// Display name(s) of the street
    #[serde(default)]
    pub name: Option<TagValue>,
    /// Lon/lat pairs tracing the segment from `from` to `to`
    #[serde(default)]
    pub geometry: Option<Vec<[f64; 2]>>,
}

/// Build the immutable street network from raw records.
///
/// The collaborator guarantees a single connected component; edges that
/// reference unknown nodes are dropped with a warning.
///
/// # Errors
///
/// [`Error::InvalidData`] when no usable nodes or edges remain. This is
/// fatal to startup, not recoverable per query.
pub fn create_street_network(
    nodes: Vec<RawNode>,
    edges: Vec<RawEdge>,
) -> Result<StreetNetwork, Error> {
    if nodes.is_empty() {
        return Err(Error::InvalidData(
            "network snapshot contains no nodes".to_string(),
        ));
    }

    let mut graph: DiGraph<StreetNode, StreetEdge> =
        DiGraph::with_capacity(nodes.len(), edges.len());
    let mut node_index: HashMap<u64, NodeIndex> = HashMap::with_capacity(nodes.len());
    for raw in nodes {
        let index = graph.add_node(StreetNode {
            id: raw.id,
            geometry: Point::new(raw.lon, raw.lat),
        });
        node_index.insert(raw.id, index);
    }

    let mut dangling = 0usize;
    for raw in edges {
        let (Some(&a), Some(&b)) = (node_index.get(&raw.from), node_index.get(&raw.to)) else {
            dangling += 1;
            continue;
        };
        let edge = normalize_edge(raw, graph[a].geometry, graph[b].geometry);
        graph.add_edge(a, b, edge);
    }
    if dangling > 0 {
        warn!("skipped {dangling} edges referencing unknown nodes");
    }
    if graph.edge_count() == 0 {
        return Err(Error::InvalidData(
            "network snapshot contains no usable edges".to_string(),
        ));
    }

    let rtree = RTree::bulk_load(
        graph
            .node_indices()
            .map(|index| IndexedPoint {
                point: [graph[index].geometry.x(), graph[index].geometry.y()],
                node: index,
            })
            .collect(),
    );

    info!(
        "street network ready: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(StreetNetwork::new(graph, rtree))
}

fn normalize_edge(raw: RawEdge, from: Point<f64>, to: Point<f64>) -> StreetEdge {
    let road_class = raw
        .road_class
        .as_ref()
        .and_then(TagValue::first)
        .map_or(RoadClass::Residential, RoadClass::from_tag);
    let speed_limit_kmh = raw
        .speed_limit
        .as_ref()
        .and_then(TagValue::first)
        .and_then(parse_speed_tag);
    let names = match raw.name {
        Some(tag) => {
            let mut values = tag.into_values();
            values.sort();
            values.dedup();
            values
        }
        None => Vec::new(),
    };
    let geometry = raw
        .geometry
        .filter(|points| points.len() >= 2)
        .map(|points| {
            LineString::new(points.iter().map(|&[x, y]| Coord { x, y }).collect())
        });
    let length_m = raw
        .length_m
        .filter(|length| *length > 0.0)
        .unwrap_or_else(|| measured_length(geometry.as_ref(), from, to));

    StreetEdge {
        length_m,
        road_class,
        speed_limit_kmh,
        geometry,
        names,
    }
}

/// Great-circle length of the stored geometry, or of the straight segment
/// between the endpoints when none was recorded.
fn measured_length(geometry: Option<&LineString<f64>>, from: Point<f64>, to: Point<f64>) -> f64 {
    match geometry {
        Some(line) => line
            .points()
            .tuple_windows()
            .map(|(a, b)| Haversine.distance(a, b))
            .sum(),
        None => Haversine.distance(from, to),
    }
}
