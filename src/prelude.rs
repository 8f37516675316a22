// Re-export of the types most hosts need
pub use crate::engine::{BanOutcome, CongestionOutcome, Geocoder, RoutingEngine};
pub use crate::error::Error;
pub use crate::loading::{EngineConfig, RawEdge, RawNode, TagValue, create_street_network};
pub use crate::model::{RoadClass, StreetNetwork, VehicleMode, VehicleProfile};
pub use crate::overlay::{OverlayHandle, OverlayState};
pub use crate::routing::{Objective, RouteResult};
