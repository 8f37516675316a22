//! The routing engine: query surface over the immutable network and the
//! mutable overlay
//!
//! Queries are read-only and run concurrently; overlay mutations serialize
//! against each other through the overlay handle. A query captures one
//! overlay snapshot up front, so a mutation committed mid-search is only
//! visible to later queries.

use geo::{LineString, Point, Polygon};
use geojson::{Feature, Geometry, Value as GeoJsonValue};
use log::info;
use petgraph::graph::EdgeIndex;
use rayon::prelude::*;

use crate::error::Error;
use crate::loading::EngineConfig;
use crate::model::{StreetNetwork, VehicleMode};
use crate::overlay::{OverlayHandle, congestion_multiplier};
use crate::routing::{Objective, RouteResult, assemble_route, fastest_path, shortest_path};

/// Resolves a free-text place name to a coordinate. Implemented by the
/// geocoding collaborator; failures surface as [`Error::UnresolvablePlace`].
pub trait Geocoder {
    fn resolve(&self, query: &str) -> Result<Point<f64>, Error>;
}

/// Outcome of a street ban: match count plus the matched segments for
/// visualization.
#[derive(Debug, Clone)]
pub struct BanOutcome {
    pub matched: usize,
    pub geometries: Vec<LineString<f64>>,
}

/// Outcome of a congestion update.
#[derive(Debug, Clone)]
pub struct CongestionOutcome {
    pub matched: usize,
    /// Multiplier that was recorded for the matched edges
    pub factor: f64,
}

pub struct RoutingEngine {
    network: StreetNetwork,
    overlay: OverlayHandle,
    config: EngineConfig,
}

impl RoutingEngine {
    pub fn new(network: StreetNetwork, config: EngineConfig) -> Self {
        Self {
            network,
            overlay: OverlayHandle::new(),
            config,
        }
    }

    pub fn network(&self) -> &StreetNetwork {
        &self.network
    }

    pub fn overlay(&self) -> &OverlayHandle {
        &self.overlay
    }

    /// Route between two raw coordinates.
    ///
    /// # Errors
    ///
    /// [`Error::OutOfCoverage`] when an endpoint has no nearby node,
    /// [`Error::PointsTooClose`] when both endpoints snap to the same node,
    /// [`Error::NoPathFound`] when the search exhausts without reaching the
    /// destination.
    pub fn compute_route(
        &self,
        origin: Point<f64>,
        destination: Point<f64>,
        mode: VehicleMode,
        objective: Objective,
    ) -> Result<RouteResult, Error> {
        let start = self.network.snap(origin, self.config.max_snap_distance_m)?;
        let goal = self
            .network
            .snap(destination, self.config.max_snap_distance_m)?;
        if start == goal {
            return Err(Error::PointsTooClose);
        }

        let profile = mode.profile();
        let overlay = self.overlay.snapshot();
        let path = match objective {
            Objective::Shortest => {
                shortest_path(&self.network, start, goal, self.config.max_search_cost)?
            }
            Objective::Fastest => fastest_path(
                &self.network,
                start,
                goal,
                profile,
                &overlay,
                self.config.max_search_cost,
            )?,
        };

        assemble_route(
            &self.network,
            &path,
            origin,
            destination,
            profile,
            &overlay,
            objective,
        )
    }

    /// Route between two geocoded place names.
    pub fn route_between_places(
        &self,
        geocoder: &dyn Geocoder,
        origin: &str,
        destination: &str,
        mode: VehicleMode,
        objective: Objective,
    ) -> Result<RouteResult, Error> {
        let from = geocoder.resolve(origin)?;
        let to = geocoder.resolve(destination)?;
        self.compute_route(from, to, mode, objective)
    }

    /// Close every segment whose display name contains `pattern`,
    /// case-insensitively. A zero-match pattern is a successful no-op.
    pub fn ban_street(&self, pattern: &str) -> Result<BanOutcome, Error> {
        let matches = self.matching_edges(pattern)?;
        let geometries = matches.iter().map(|&id| self.edge_line(id)).collect();
        info!("banning {} segments matching {pattern:?}", matches.len());
        self.overlay.ban(matches.iter().copied());
        Ok(BanOutcome {
            matched: matches.len(),
            geometries,
        })
    }

    /// Record the congestion multiplier for `level` on every segment whose
    /// display name contains `pattern`. Overwrites earlier factors.
    pub fn set_congestion(&self, pattern: &str, level: u32) -> Result<CongestionOutcome, Error> {
        let factor = congestion_multiplier(level);
        let matches = self.matching_edges(pattern)?;
        info!(
            "congestion factor {factor} on {} segments matching {pattern:?}",
            matches.len()
        );
        self.overlay.set_congestion(matches.iter().copied(), factor);
        Ok(CongestionOutcome {
            matched: matches.len(),
            factor,
        })
    }

    /// Drop every ban and congestion factor.
    pub fn reset_overlay(&self) {
        info!("overlay reset");
        self.overlay.reset();
    }

    /// Convex-hull outline of the covered area.
    pub fn boundary(&self) -> &Polygon<f64> {
        self.network.boundary()
    }

    pub fn boundary_geojson(&self) -> Feature {
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(GeoJsonValue::from(self.network.boundary()))),
            id: None,
            properties: None,
            foreign_members: None,
        }
    }

    fn matching_edges(&self, pattern: &str) -> Result<Vec<EdgeIndex>, Error> {
        let pattern = pattern.trim().to_lowercase();
        if pattern.is_empty() {
            return Err(Error::InvalidInput(
                "empty street name pattern".to_string(),
            ));
        }
        let graph = &self.network.graph;
        let matches = (0..graph.edge_count())
            .into_par_iter()
            .map(EdgeIndex::new)
            .filter(|&id| graph[id].matches_name(&pattern))
            .collect();
        Ok(matches)
    }

    /// Stored geometry, or the straight segment between the edge endpoints.
    fn edge_line(&self, id: EdgeIndex) -> LineString<f64> {
        let graph = &self.network.graph;
        if let Some(line) = &graph[id].geometry {
            return line.clone();
        }
        let Some((a, b)) = graph.edge_endpoints(id) else {
            return LineString::new(Vec::new());
        };
        LineString::new(vec![graph[a].geometry.into(), graph[b].geometry.into()])
    }
}
