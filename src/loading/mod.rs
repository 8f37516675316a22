//! This module is responsible for turning the finalized hand-off from the
//! network-construction collaborator into the immutable routing model.

mod builder;
mod config;

pub use builder::{RawEdge, RawNode, TagValue, create_street_network};
pub use config::EngineConfig;
