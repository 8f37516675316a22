//! Street network components - nodes, edges, road classification

use geo::{LineString, Point};
use serde::{Deserialize, Serialize};

/// Street graph node
#[derive(Debug, Clone)]
pub struct StreetNode {
    /// Identifier from the source network snapshot
    pub id: u64,
    /// Node coordinates (lon/lat)
    pub geometry: Point<f64>,
}

/// Functional category of a road segment.
///
/// Unknown source tags collapse to [`RoadClass::Residential`] so downstream
/// logic always sees one of these fourteen values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadClass {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Residential,
    Service,
    Unclassified,
    LivingStreet,
    Footway,
    Pedestrian,
    Path,
    Steps,
    Cycleway,
}

impl RoadClass {
    /// Parse a source road-category tag value.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "motorway" => Self::Motorway,
            "trunk" => Self::Trunk,
            "primary" => Self::Primary,
            "secondary" => Self::Secondary,
            "tertiary" => Self::Tertiary,
            "service" => Self::Service,
            "unclassified" => Self::Unclassified,
            "living_street" => Self::LivingStreet,
            "footway" => Self::Footway,
            "pedestrian" => Self::Pedestrian,
            "path" => Self::Path,
            "steps" => Self::Steps,
            "cycleway" => Self::Cycleway,
            _ => Self::Residential,
        }
    }

    /// Default legal speed when the segment carries no parsable limit, km/h.
    pub fn default_speed_kmh(self) -> f64 {
        match self {
            Self::Motorway => 80.0,
            Self::Trunk => 70.0,
            Self::Primary => 60.0,
            Self::Secondary => 50.0,
            Self::Tertiary => 40.0,
            Self::Residential | Self::Unclassified => 25.0,
            Self::Service | Self::LivingStreet => 20.0,
            Self::Cycleway => 15.0,
            Self::Footway | Self::Pedestrian | Self::Path => 5.0,
            Self::Steps => 3.0,
        }
    }

    /// Classes where walking is prohibited.
    pub fn motorized_only(self) -> bool {
        matches!(self, Self::Motorway | Self::Trunk)
    }

    /// Classes reserved for non-motorized traffic.
    pub fn non_motorized_only(self) -> bool {
        matches!(
            self,
            Self::Footway | Self::Pedestrian | Self::Path | Self::Steps
        )
    }
}

/// Street graph edge (directed road segment).
///
/// All fields are fixed at construction time; runtime restrictions live in
/// the overlay, keyed by the edge's graph index.
#[derive(Debug, Clone)]
pub struct StreetEdge {
    /// Segment length in meters
    pub length_m: f64,
    pub road_class: RoadClass,
    /// Parsed legal speed limit, km/h
    pub speed_limit_kmh: Option<u32>,
    /// Coordinates tracing the segment; absent means a straight line
    pub geometry: Option<LineString<f64>>,
    /// Display names of the street this segment belongs to
    pub names: Vec<String>,
}

impl StreetEdge {
    /// Case-insensitive substring match against the segment's display names.
    /// `pattern` must already be lowercased.
    pub fn matches_name(&self, pattern: &str) -> bool {
        self.names
            .iter()
            .any(|name| name.to_lowercase().contains(pattern))
    }
}

/// Extract the first integer substring from a free-text speed tag,
/// ignoring units ("50", "50 km/h", "walk 30 mph" all parse).
pub fn parse_speed_tag(tag: &str) -> Option<u32> {
    let start = tag.find(|c: char| c.is_ascii_digit())?;
    let digits: String = tag[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}
