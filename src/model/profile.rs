//! Vehicle profiles: per-mode speed factors and road-class access rules

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::components::RoadClass;
use crate::error::Error;

/// Walking speed for the foot profile, km/h. Independent of road class.
pub const WALK_SPEED_KMH: f64 = 5.0;

/// Floor for the effective speed after the profile factor is applied, km/h.
pub const MIN_SPEED_KMH: f64 = 5.0;

/// Travel mode selected per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleMode {
    Car,
    Motorbike,
    Bicycle,
    Foot,
}

impl VehicleMode {
    pub fn profile(self) -> &'static VehicleProfile {
        &PROFILES[self as usize]
    }

    pub fn is_motorized(self) -> bool {
        matches!(self, Self::Car | Self::Motorbike)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Car => "car",
            Self::Motorbike => "motorbike",
            Self::Bicycle => "bicycle",
            Self::Foot => "foot",
        }
    }
}

impl FromStr for VehicleMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().as_str() {
            "car" => Ok(Self::Car),
            "motorbike" => Ok(Self::Motorbike),
            "bicycle" => Ok(Self::Bicycle),
            "foot" => Ok(Self::Foot),
            other => Err(Error::InvalidInput(format!("unknown vehicle mode: {other}"))),
        }
    }
}

/// Speed and access rules for one travel mode.
#[derive(Debug, Clone)]
pub struct VehicleProfile {
    pub mode: VehicleMode,
    /// Multiplier applied to the base speed of a segment
    pub speed_factor: f64,
    /// Upper bound on achievable speed, km/h. The fastest-time heuristic
    /// divides by this, so it must not undercut any reachable speed.
    pub max_speed_kmh: f64,
}

// Foot carries factor 1.0: its fixed walking speed already encodes the mode.
static PROFILES: [VehicleProfile; 4] = [
    VehicleProfile {
        mode: VehicleMode::Car,
        speed_factor: 1.0,
        max_speed_kmh: 130.0,
    },
    VehicleProfile {
        mode: VehicleMode::Motorbike,
        speed_factor: 0.8,
        max_speed_kmh: 104.0,
    },
    VehicleProfile {
        mode: VehicleMode::Bicycle,
        speed_factor: 0.4,
        max_speed_kmh: 32.0,
    },
    VehicleProfile {
        mode: VehicleMode::Foot,
        speed_factor: 1.0,
        max_speed_kmh: WALK_SPEED_KMH,
    },
];

impl VehicleProfile {
    /// Access predicate: may this mode traverse a segment of `class`?
    pub fn allows(&self, class: RoadClass) -> bool {
        match self.mode {
            VehicleMode::Car | VehicleMode::Motorbike => !class.non_motorized_only(),
            VehicleMode::Foot => !class.motorized_only(),
            VehicleMode::Bicycle => true,
        }
    }

    /// Heuristic speed in m/s.
    pub fn max_speed_ms(&self) -> f64 {
        self.max_speed_kmh / 3.6
    }
}
