//! Data model for street network routing
//!
//! The network itself is immutable after construction; per-query costs are
//! derived from it, never written back.

pub mod components;
pub mod network;
pub mod profile;

pub use components::{RoadClass, StreetEdge, StreetNode, parse_speed_tag};
pub use network::{IndexedPoint, StreetNetwork};
pub use profile::{VehicleMode, VehicleProfile};
