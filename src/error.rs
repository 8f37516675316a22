use geo::Point;
use thiserror::Error;

/// Errors surfaced at the query boundary.
///
/// Every variant except [`Error::InvalidData`] is recoverable per query;
/// `InvalidData` is raised during network construction and is fatal to
/// startup.
#[derive(Error, Debug)]
pub enum Error {
    #[error("point ({}, {}) is outside the network coverage area", .0.x(), .0.y())]
    OutOfCoverage(Point<f64>),
    #[error("origin and destination snap to the same node")]
    PointsTooClose,
    #[error("no path found under the current access and overlay constraints")]
    NoPathFound,
    #[error("could not resolve place: {0}")]
    UnresolvablePlace(String),
    #[error("internal inconsistency: {0}")]
    InternalInconsistency(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid data: {0}")]
    InvalidData(String),
}
