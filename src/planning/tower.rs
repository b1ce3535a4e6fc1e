//! Placed towers and the per-run tower ledger

use serde::{Deserialize, Serialize};

use crate::core::types::Coordinate;
use crate::planning::tech::TechSpec;
use crate::spatial::geometry::distance;

/// Why a tower was placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    /// Guarantees coverage of a critical point
    #[serde(alias = "master_hub")]
    Anchor,
    /// Added to raise area coverage
    #[serde(alias = "standard_tower")]
    Fill,
}

/// A placed relay tower. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tower {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "type")]
    pub kind: TowerKind,
    /// Effective range (km)
    pub range: f64,
    pub cost: u64,
    pub tech: String,
}

impl Tower {
    pub fn location(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    pub fn distance_to(&self, point: Coordinate) -> f64 {
        distance(self.location(), point)
    }
}

/// Nearest tower to `point` by linear scan; the first minimum wins ties.
///
/// Plans hold tens of towers, so no spatial index is kept. Revisit if grid
/// resolution or area size grows by orders of magnitude.
pub fn nearest_tower<'a, I>(towers: I, point: Coordinate) -> Option<(&'a Tower, f64)>
where
    I: IntoIterator<Item = &'a Tower>,
{
    let mut best: Option<(&Tower, f64)> = None;
    for tower in towers {
        let d = tower.distance_to(point);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((tower, d)),
        }
    }
    best
}

/// Append-only tower list for one planning run, issuing sequential ids
#[derive(Debug, Clone, Default)]
pub struct TowerLedger {
    towers: Vec<Tower>,
}

impl TowerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a tower with the active spec and return its id
    pub fn place(&mut self, kind: TowerKind, location: Coordinate, spec: &TechSpec) -> String {
        let id = format!("TWR-{:02}", self.towers.len() + 1);
        self.towers.push(Tower {
            id: id.clone(),
            lat: location.lat,
            lng: location.lng,
            kind,
            range: spec.range_km,
            cost: spec.cost,
            tech: spec.tech.clone(),
        });
        id
    }

    pub fn nearest(&self, point: Coordinate) -> Option<(&Tower, f64)> {
        nearest_tower(&self.towers, point)
    }

    pub fn towers(&self) -> &[Tower] {
        &self.towers
    }

    pub fn len(&self) -> usize {
        self.towers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.towers.is_empty()
    }

    pub fn count(&self, kind: TowerKind) -> usize {
        self.towers.iter().filter(|t| t.kind == kind).count()
    }

    pub fn into_towers(self) -> Vec<Tower> {
        self.towers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> TechSpec {
        TechSpec::new("Small Cell / Micro", 0.8, 20_000, 33_000)
    }

    #[test]
    fn test_sequential_ids() {
        let mut ledger = TowerLedger::new();
        assert_eq!(ledger.place(TowerKind::Anchor, Coordinate::new(0.0, 0.0), &spec()), "TWR-01");
        assert_eq!(ledger.place(TowerKind::Fill, Coordinate::new(0.0, 0.01), &spec()), "TWR-02");
        assert_eq!(ledger.count(TowerKind::Anchor), 1);
        assert_eq!(ledger.towers()[1].range, 0.8);
    }

    #[test]
    fn test_nearest_first_minimum_wins() {
        let mut ledger = TowerLedger::new();
        ledger.place(TowerKind::Fill, Coordinate::new(0.0, 0.01), &spec());
        ledger.place(TowerKind::Fill, Coordinate::new(0.0, -0.01), &spec());
        let (tower, _) = ledger.nearest(Coordinate::new(0.0, 0.0)).unwrap();
        assert_eq!(tower.id, "TWR-01");
        assert!(TowerLedger::new().nearest(Coordinate::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_tower_json_shape() {
        let mut ledger = TowerLedger::new();
        ledger.place(TowerKind::Anchor, Coordinate::new(31.3, 78.4), &spec());
        let json = serde_json::to_value(&ledger.towers()[0]).unwrap();
        assert_eq!(json["type"], "anchor");
        assert_eq!(json["id"], "TWR-01");

        let legacy: Tower = serde_json::from_str(
            r#"{"id":"TWR-09","lat":0,"lng":0,"type":"master_hub","range":4,"cost":1,"tech":"x"}"#,
        )
        .unwrap();
        assert_eq!(legacy.kind, TowerKind::Anchor);
    }
}
