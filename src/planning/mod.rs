//! Coverage planning: anchor placement, gap filling, reporting

pub mod anchor;
pub mod engine;
pub mod events;
pub mod fill;
pub mod report;
pub mod tech;
pub mod tower;

pub use engine::{CoveragePlan, Planner, PlanningRequest};
pub use events::{PlanEvent, PlanLog};
pub use report::PlanReport;
pub use tech::{TechSpec, TechTable};
pub use tower::{Tower, TowerKind};

use crate::core::types::Coordinate;
use crate::spatial::geometry::distance;
use crate::spatial::grid::DemandNode;

/// Mark every node within `range_km` of `site` covered; returns how many were
/// newly covered. Flags are only ever set, never cleared.
pub(crate) fn cover_within(nodes: &mut [DemandNode], site: Coordinate, range_km: f64) -> usize {
    let mut newly = 0;
    for node in nodes.iter_mut() {
        if distance(site, node.location()) <= range_km {
            if !node.covered {
                newly += 1;
            }
            node.covered = true;
        }
    }
    newly
}
