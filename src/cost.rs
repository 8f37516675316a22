//! Cost model: static edge attributes + vehicle profile + overlay → seconds
//!
//! Pure functions of their inputs. Callers capture one overlay snapshot per
//! query, so every edge evaluated during a single search reflects the same
//! ban/congestion state.

use petgraph::graph::EdgeIndex;

use crate::Seconds;
use crate::model::profile::{MIN_SPEED_KMH, WALK_SPEED_KMH};
use crate::model::{StreetEdge, VehicleMode, VehicleProfile};
use crate::overlay::OverlayState;

const KMH_TO_MS: f64 = 1000.0 / 3600.0;

/// Traversal time in seconds, or `None` when the edge is impassable for
/// this profile under the current overlay.
///
/// A banned edge is impassable for every vehicle, regardless of congestion.
pub fn traversal_seconds(
    id: EdgeIndex,
    edge: &StreetEdge,
    profile: &VehicleProfile,
    overlay: &OverlayState,
) -> Option<Seconds> {
    if overlay.is_banned(id) {
        return None;
    }
    if !profile.allows(edge.road_class) {
        return None;
    }
    Some(base_seconds(edge, profile) * overlay.congestion_factor(id))
}

/// Traversal time ignoring bans, congestion and access rules.
///
/// Shortest-distance paths bypass the cost model and may legitimately use
/// edges it would reject; their reported travel time falls back to this.
pub fn base_seconds(edge: &StreetEdge, profile: &VehicleProfile) -> Seconds {
    let base_kmh = match profile.mode {
        VehicleMode::Foot => WALK_SPEED_KMH,
        VehicleMode::Bicycle => edge.road_class.default_speed_kmh(),
        VehicleMode::Car | VehicleMode::Motorbike => edge
            .speed_limit_kmh
            .map_or_else(|| edge.road_class.default_speed_kmh(), f64::from),
    };
    let mut speed_kmh = base_kmh * profile.speed_factor;
    if speed_kmh <= 0.0 {
        speed_kmh = MIN_SPEED_KMH;
    }
    edge.length_m / (speed_kmh * KMH_TO_MS)
}
