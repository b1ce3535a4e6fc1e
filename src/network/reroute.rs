//! Reroute around a failed tower

use serde::{Deserialize, Serialize};

use crate::core::error::{PlanError, Result};
use crate::planning::report::Link;
use crate::planning::tower::{nearest_tower, Tower};

/// Input for a reroute: the current network and the tower that went down
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RerouteRequest {
    pub towers: Vec<Tower>,
    pub dead_node_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RerouteOutcome {
    pub status: String,
    /// Surviving tower now bridging the dead tower's area, if any survive
    pub neighbor_id: Option<String>,
    pub new_links: Vec<Link>,
}

/// Connect the nearest surviving tower to the dead tower's location
pub fn reroute(towers: &[Tower], dead_id: &str) -> Result<RerouteOutcome> {
    let dead = towers
        .iter()
        .find(|t| t.id == dead_id)
        .ok_or_else(|| PlanError::TowerNotFound(dead_id.to_string()))?;

    let survivors = towers.iter().filter(|t| t.id != dead_id);
    let neighbor = nearest_tower(survivors, dead.location()).map(|(t, _)| t);

    if neighbor.is_none() {
        tracing::warn!("Tower {} failed with no surviving neighbor", dead_id);
    }

    Ok(RerouteOutcome {
        status: "REROUTED".to_string(),
        neighbor_id: neighbor.map(|t| t.id.clone()),
        new_links: neighbor
            .map(|t| Link {
                from: t.location().as_pair(),
                to: dead.location().as_pair(),
            })
            .into_iter()
            .collect(),
    })
}

impl RerouteRequest {
    pub fn execute(&self) -> Result<RerouteOutcome> {
        reroute(&self.towers, &self.dead_node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Coordinate;
    use crate::planning::tech::TechSpec;
    use crate::planning::tower::{TowerKind, TowerLedger};

    fn network() -> Vec<Tower> {
        let spec = TechSpec::new("High-Site Macro", 4.0, 80_000, 132_000);
        let mut ledger = TowerLedger::new();
        ledger.place(TowerKind::Anchor, Coordinate::new(0.0, 0.0), &spec);
        ledger.place(TowerKind::Fill, Coordinate::new(0.0, 0.05), &spec);
        ledger.place(TowerKind::Fill, Coordinate::new(0.0, 0.02), &spec);
        ledger.into_towers()
    }

    #[test]
    fn test_nearest_survivor_linked() {
        let outcome = reroute(&network(), "TWR-01").unwrap();
        assert_eq!(outcome.status, "REROUTED");
        assert_eq!(outcome.neighbor_id.as_deref(), Some("TWR-03"));
        assert_eq!(
            outcome.new_links,
            vec![Link {
                from: [0.0, 0.02],
                to: [0.0, 0.0]
            }]
        );
    }

    #[test]
    fn test_unknown_tower_is_error() {
        assert!(matches!(
            reroute(&network(), "TWR-99"),
            Err(PlanError::TowerNotFound(id)) if id == "TWR-99"
        ));
    }

    #[test]
    fn test_lone_tower_has_no_links() {
        let towers: Vec<Tower> = network().into_iter().take(1).collect();
        let outcome = reroute(&towers, "TWR-01").unwrap();
        assert!(outcome.new_links.is_empty());
        assert!(outcome.neighbor_id.is_none());
    }
}
