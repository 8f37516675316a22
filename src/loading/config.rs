//! Engine configuration

use serde::Deserialize;

/// Tunables for snapping and search, deserializable from host configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Farthest a query endpoint may lie from its nearest node before the
    /// query is rejected as out of coverage, meters.
    pub max_snap_distance_m: f64,
    /// Optional ceiling on cumulative search cost (meters for the shortest
    /// objective, seconds for the fastest). Bounds worst-case work on
    /// pathological queries; `None` leaves searches bounded by graph size
    /// only.
    pub max_search_cost: Option<f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_snap_distance_m: 500.0,
            max_search_cost: None,
        }
    }
}
