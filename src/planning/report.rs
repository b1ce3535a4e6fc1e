//! Plan report: critical-point linking, KPIs and terrain breakdown

use serde::{Deserialize, Serialize};

use crate::core::config::PlannerConfig;
use crate::planning::engine::CoveragePlan;
use crate::planning::tower::{nearest_tower, Tower};

/// Serviceability of one critical point
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum CriticalStatus {
    Connected { tower_id: String, distance_km: f64 },
    Offline,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CriticalLink {
    pub name: String,
    /// Caller-supplied display name, when one was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(flatten)]
    pub status: CriticalStatus,
}

/// Map line from a critical point to the tower serving it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub from: [f64; 2],
    pub to: [f64; 2],
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Kpis {
    pub total_towers: usize,
    pub anchor_towers: usize,
    pub fill_towers: usize,
    pub capex: u64,
    pub legacy_capex: u64,
    pub area_km2: f64,
    /// Covered share of area points (1.0 when there are none)
    pub coverage_ratio: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TerrainBreakdown {
    pub zone: String,
    pub tech: String,
    pub radius: f64,
    pub unit_cost: u64,
}

/// Everything a front end needs to render a plan
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanReport {
    pub kpis: Kpis,
    pub critical_analysis: Vec<CriticalLink>,
    pub terrain_breakdown: TerrainBreakdown,
    pub links: Vec<Link>,
    pub logs: Vec<String>,
    pub towers: Vec<Tower>,
}

impl PlanReport {
    /// Build the report. Links are re-derived from tower positions rather
    /// than trusted from the engine's coverage flags.
    pub fn build(plan: &CoveragePlan, config: &PlannerConfig) -> Self {
        let mut links = Vec::new();
        let mut critical_analysis = Vec::new();

        for node in plan.nodes.iter().filter(|n| n.is_critical) {
            let location = node.location();
            let serving = nearest_tower(
                plan.towers
                    .iter()
                    .filter(|t| t.distance_to(location) <= t.range * config.link_tolerance),
                location,
            );

            let status = match serving {
                Some((tower, d)) => {
                    links.push(Link {
                        from: location.as_pair(),
                        to: tower.location().as_pair(),
                    });
                    CriticalStatus::Connected {
                        tower_id: tower.id.clone(),
                        distance_km: round2(d),
                    }
                }
                None => CriticalStatus::Offline,
            };

            critical_analysis.push(CriticalLink {
                name: node.label().to_string(),
                display_name: node.display_name.clone(),
                status,
            });
        }

        let area_total = plan.area_nodes().count();
        let area_covered = plan.area_nodes().filter(|n| n.covered).count();
        let coverage_ratio = if area_total == 0 {
            1.0
        } else {
            area_covered as f64 / area_total as f64
        };

        let kpis = Kpis {
            total_towers: plan.towers.len(),
            anchor_towers: plan.anchor_count(),
            fill_towers: plan.fill_count(),
            capex: plan.towers.iter().map(|t| t.cost).sum(),
            legacy_capex: plan.towers.len() as u64 * plan.tech.legacy_cost,
            area_km2: round2(area_total as f64 * config.area_per_node_km2),
            coverage_ratio,
        };

        Self {
            kpis,
            critical_analysis,
            terrain_breakdown: TerrainBreakdown {
                zone: plan.terrain.clone(),
                tech: plan.tech.tech.clone(),
                radius: plan.tech.range_km,
                unit_cost: plan.tech.cost,
            },
            links,
            logs: plan.logs.clone(),
            towers: plan.towers.clone(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn summary(&self) -> String {
        let connected = self
            .critical_analysis
            .iter()
            .filter(|c| matches!(c.status, CriticalStatus::Connected { .. }))
            .count();
        format!(
            "{} towers ({} anchor, {} fill) using {}\nCapex {} vs legacy {}\n{}/{} critical points connected, {:.1}% area coverage over {} km2",
            self.kpis.total_towers,
            self.kpis.anchor_towers,
            self.kpis.fill_towers,
            self.terrain_breakdown.tech,
            self.kpis.capex,
            self.kpis.legacy_capex,
            connected,
            self.critical_analysis.len(),
            self.kpis.coverage_ratio * 100.0,
            self.kpis.area_km2,
        )
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
