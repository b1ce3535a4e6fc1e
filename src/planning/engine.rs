//! Planning entry point: grid -> anchors -> fill

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::PlannerConfig;
use crate::core::error::{PlanError, Result};
use crate::core::types::{CriticalPoint, Polygon};
use crate::planning::anchor::{place_anchors, AnchorParams};
use crate::planning::events::{PlanEvent, PlanLog};
use crate::planning::fill::{fill_gaps, FillParams};
use crate::planning::tech::{ResolvedTech, TechSpec};
use crate::planning::tower::{Tower, TowerKind, TowerLedger};
use crate::spatial::grid::{generate_nodes, DemandNode, GridSpec};
use crate::spatial::validation::PolygonValidator;

fn default_terrain() -> String {
    "valley".to_string()
}

/// Caller input for one planning run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningRequest {
    #[serde(default)]
    pub polygons: Vec<Polygon>,
    #[serde(default)]
    pub critical_nodes: Vec<CriticalPoint>,
    #[serde(default = "default_terrain")]
    pub terrain_type: String,
}

impl PlanningRequest {
    pub fn new(polygons: Vec<Polygon>, critical_nodes: Vec<CriticalPoint>, terrain: &str) -> Self {
        Self {
            polygons,
            critical_nodes,
            terrain_type: terrain.to_string(),
        }
    }
}

/// Result of one planning run
#[derive(Debug, Clone, Serialize)]
pub struct CoveragePlan {
    pub towers: Vec<Tower>,
    /// Decision log rendered to text, in decision order
    pub logs: Vec<String>,
    /// Final demand nodes with coverage flags
    pub nodes: Vec<DemandNode>,
    /// Terrain key whose technology was used
    pub terrain: String,
    pub tech: TechSpec,
    /// Requested terrain was unknown and the default was used
    pub terrain_fell_back: bool,
    #[serde(skip)]
    pub log: PlanLog,
}

impl CoveragePlan {
    pub fn anchor_count(&self) -> usize {
        self.towers.iter().filter(|t| t.kind == TowerKind::Anchor).count()
    }

    pub fn fill_count(&self) -> usize {
        self.towers.iter().filter(|t| t.kind == TowerKind::Fill).count()
    }

    pub fn area_nodes(&self) -> impl Iterator<Item = &DemandNode> {
        self.nodes.iter().filter(|n| !n.is_critical)
    }
}

/// Stateless planner; every call owns its nodes and towers
#[derive(Debug, Clone)]
pub struct Planner {
    config: PlannerConfig,
    default_spec: TechSpec,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        let default_spec = config
            .tech
            .get(&config.default_terrain)
            .cloned()
            .ok_or_else(|| {
                PlanError::InvalidConfig(format!(
                    "default_terrain '{}' is missing from the tech table",
                    config.default_terrain
                ))
            })?;
        Ok(Self {
            config,
            default_spec,
        })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan with a ChaCha8 generator seeded from `seed`
    pub fn plan_seeded(&self, request: &PlanningRequest, seed: u64) -> CoveragePlan {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.plan(request, &mut rng)
    }

    /// Run grid generation, anchor placement and gap filling.
    ///
    /// `rng` only drives the fill phase's candidate downsampling; a fixed seed
    /// reproduces the plan exactly.
    pub fn plan<R: Rng + ?Sized>(&self, request: &PlanningRequest, rng: &mut R) -> CoveragePlan {
        let config = &self.config;
        let resolved = config
            .tech
            .resolve(&request.terrain_type, &config.default_terrain)
            .unwrap_or(ResolvedTech {
                terrain: &config.default_terrain,
                spec: &self.default_spec,
                fell_back: true,
            });
        let spec = resolved.spec;

        let grid = GridSpec {
            step_deg: config.grid_step_deg,
            include_centroids: config.include_centroid_nodes,
        };
        let mut nodes = generate_nodes(&request.polygons, &request.critical_nodes, grid);

        let mut log = PlanLog::new();
        log.push(PlanEvent::Started {
            terrain: resolved.terrain.to_string(),
            tech: spec.tech.clone(),
            range_km: spec.range_km,
            nodes: nodes.len(),
        });

        if resolved.fell_back {
            tracing::warn!(
                "Unknown terrain '{}', falling back to '{}'",
                request.terrain_type,
                resolved.terrain
            );
            log.push(PlanEvent::TerrainFallback {
                requested: request.terrain_type.clone(),
                used: resolved.terrain.to_string(),
            });
        }

        for (index, polygon) in request.polygons.iter().enumerate() {
            let problems = PolygonValidator::validate(polygon);
            if problems.is_empty() {
                continue;
            }
            let reason = problems
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            tracing::warn!("Service area #{}: {}", index + 1, reason);
            log.push(PlanEvent::InvalidArea {
                polygon: index,
                reason,
            });
        }

        let mut ledger = TowerLedger::new();

        place_anchors(
            &mut nodes,
            &request.polygons,
            spec,
            AnchorParams {
                range_margin: config.range_margin,
                duplicate_radius_km: config.duplicate_radius_km,
            },
            &mut ledger,
            &mut log,
        );

        fill_gaps(
            &mut nodes,
            spec,
            FillParams {
                stop_ratio: config.fill_stop_ratio,
                max_candidates: config.max_candidates,
                max_towers: config.max_fill_towers,
            },
            &mut ledger,
            &mut log,
            rng,
        );

        tracing::info!(
            "Plan complete: {} towers over {} demand points",
            ledger.len(),
            nodes.len()
        );

        CoveragePlan {
            towers: ledger.into_towers(),
            logs: log.lines(),
            nodes,
            terrain: resolved.terrain.to_string(),
            tech: spec.clone(),
            terrain_fell_back: resolved.fell_back,
            log,
        }
    }
}
