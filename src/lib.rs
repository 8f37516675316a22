//! Dynamic-weight routing over a fixed street network
//!
//! The engine answers "how do I get from A to B" under a travel mode
//! (car / motorbike / bicycle / foot) and an objective (shortest distance
//! or fastest time), while an operator imposes temporary restrictions -
//! street closures and congestion penalties - that take effect for
//! subsequent queries without rebuilding the network.
//!
//! The base network is immutable after construction; all runtime state
//! lives in the [`overlay`], consulted by the [`cost`] model during search.
//! Network acquisition, geocoding and the transport layer are external
//! collaborators, consumed through [`loading`] and the
//! [`engine::Geocoder`] seam.

pub mod cost;
pub mod engine;
pub mod error;
pub mod loading;
pub mod model;
pub mod overlay;
pub mod prelude;
pub mod routing;

pub use engine::{BanOutcome, CongestionOutcome, Geocoder, RoutingEngine};
pub use error::Error;
pub use loading::{EngineConfig, RawEdge, RawNode, TagValue, create_street_network};
pub use model::{RoadClass, StreetEdge, StreetNetwork, StreetNode, VehicleMode, VehicleProfile};
pub use overlay::{OverlayHandle, OverlayState};
pub use routing::{Objective, RouteResult};

/// Traversal cost in seconds.
pub type Seconds = f64;

/// Distance in meters.
pub type Meters = f64;
