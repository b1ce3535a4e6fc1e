//! Planning decisions and the decision log

use std::fmt;

use serde::{Deserialize, Serialize};

/// One decision taken while planning
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PlanEvent {
    // Setup
    Started { terrain: String, tech: String, range_km: f64, nodes: usize },
    TerrainFallback { requested: String, used: String },
    InvalidArea { polygon: usize, reason: String },

    // Anchor phase
    AnchorCentered { node: String, tower: String, distance_km: f64 },
    AnchorSlid { node: String, tower: String, centroid_km: f64 },
    AnchorOnPoint { node: String, tower: String },
    AnchorSuppressed { node: String, existing: String, distance_km: f64 },

    // Fill phase
    FillPlaced { tower: String, gain: usize },
    FillTargetReached { covered: usize, total: usize },
    FillExhausted { uncovered: usize },
    FillCapReached { cap: usize },
}

impl fmt::Display for PlanEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started { terrain, tech, range_km, nodes } => write!(
                f,
                "INIT: Geometric analysis of {} demand points ({} / {}, R={}km)...",
                nodes, terrain, tech, range_km
            ),
            Self::TerrainFallback { requested, used } => write!(
                f,
                "INIT: Unknown terrain '{}', using '{}' technology.",
                requested, used
            ),
            Self::InvalidArea { polygon, reason } => {
                write!(f, "WARN: Service area #{} ignored or degraded: {}.", polygon + 1, reason)
            }
            Self::AnchorCentered { node, tower, distance_km } => write!(
                f,
                "GEOMETRY: Anchor {} allows center placement ({:.2}km). {} optimal.",
                node, distance_km, tower
            ),
            Self::AnchorSlid { node, tower, centroid_km } => write!(
                f,
                "GEOMETRY: Center too far from {} ({:.2}km). Slid {} to edge of range.",
                node, centroid_km, tower
            ),
            Self::AnchorOnPoint { node, tower } => write!(
                f,
                "GEOMETRY: No service area near {}. {} placed on the point.",
                node, tower
            ),
            Self::AnchorSuppressed { node, existing, distance_km } => write!(
                f,
                "GEOMETRY: {} already served by {} ({:.2}km away). Duplicate anchor skipped.",
                node, existing, distance_km
            ),
            Self::FillPlaced { tower, gain } => {
                write!(f, "FILL: Added {} covering {} points.", tower, gain)
            }
            Self::FillTargetReached { covered, total } => write!(
                f,
                "FILL: Coverage target met ({}/{} area points, {:.1}%).",
                covered,
                total,
                percent(*covered, *total)
            ),
            Self::FillExhausted { uncovered } => write!(
                f,
                "FILL: No candidate improves coverage; {} points left uncovered.",
                uncovered
            ),
            Self::FillCapReached { cap } => {
                write!(f, "FILL: Tower cap of {} reached; stopping.", cap)
            }
        }
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

/// Ordered record of planning decisions
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlanLog {
    pub events: Vec<PlanEvent>,
}

impl PlanLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: PlanEvent) {
        tracing::debug!("{}", event);
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Human-readable lines, in decision order
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(|e| e.to_string()).collect()
    }
}
