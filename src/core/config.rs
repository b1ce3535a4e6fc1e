//! Planner configuration with documented constants
//!
//! All tuning numbers of the coverage engine live here. The defaults are the
//! canonical production values; a TOML file can override any subset of them.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{PlanError, Result};
use crate::planning::tech::TechTable;

/// Configuration for a planning run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    // === GRID ===
    /// Lattice step in degrees used to discretize service areas
    ///
    /// 0.0005 degrees is roughly 55 m of latitude. Values between 0.0005 and
    /// 0.0008 keep node counts in the low thousands for village-sized areas.
    /// Halving the step quadruples the node count and the fill cost.
    pub grid_step_deg: f64,

    /// Emit each polygon's centroid as an area node ahead of its lattice
    ///
    /// Guarantees every area has a "center" candidate for the fill phase even
    /// when the lattice is too coarse to land inside a thin polygon.
    pub include_centroid_nodes: bool,

    // === ANCHOR PHASE ===
    /// Fraction of nominal range an anchor tower may sit from its critical point
    ///
    /// At 0.95 the critical point keeps a 5% margin inside the coverage disc.
    pub range_margin: f64,

    /// Anchors closer than this to an existing tower are suppressed (km)
    pub duplicate_radius_km: f64,

    // === FILL PHASE ===
    /// Fill stops once the uncovered share of area nodes drops below this
    ///
    /// 0.05 means the phase settles for 95% area coverage instead of chasing
    /// the last isolated corners with a tower each.
    pub fill_stop_ratio: f64,

    /// Upper bound on candidates scored per fill iteration
    ///
    /// Scoring is O(candidates * uncovered); larger values give slightly
    /// better placements at linear extra cost.
    pub max_candidates: usize,

    /// Optional cap on fill towers, for callers that need a bounded run time
    pub max_fill_towers: Option<usize>,

    // === REPORTING ===
    /// A critical point links to a tower within `range * link_tolerance`
    pub link_tolerance: f64,

    /// Area represented by one grid node (km^2) for the area KPI
    pub area_per_node_km2: f64,

    // === TECHNOLOGY ===
    /// Terrain key used when a request names an unknown terrain
    pub default_terrain: String,

    /// Terrain classifier -> technology lookup
    pub tech: TechTable,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            grid_step_deg: 0.0005,
            include_centroid_nodes: false,

            range_margin: 0.95,
            duplicate_radius_km: 0.05,

            fill_stop_ratio: 0.05,
            max_candidates: 50,
            max_fill_towers: None,

            link_tolerance: 1.05,
            area_per_node_km2: 0.008,

            default_terrain: "valley".to_string(),
            tech: TechTable::builtin(),
        }
    }
}

impl PlannerConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; missing keys keep their defaults and `[tech.*]`
    /// entries are merged over the built-in table.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: PlannerConfig = toml::from_str(content)?;

        let overrides = std::mem::replace(&mut config.tech, TechTable::builtin());
        config.tech.extend(overrides);

        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(self.grid_step_deg.is_finite() && self.grid_step_deg > 0.0) {
            return Err(PlanError::InvalidConfig(format!(
                "grid_step_deg ({}) must be a positive number",
                self.grid_step_deg
            )));
        }

        if !(self.range_margin > 0.0 && self.range_margin <= 1.0) {
            return Err(PlanError::InvalidConfig(format!(
                "range_margin ({}) must be in (0, 1]",
                self.range_margin
            )));
        }

        if self.duplicate_radius_km < 0.0 {
            return Err(PlanError::InvalidConfig(format!(
                "duplicate_radius_km ({}) must not be negative",
                self.duplicate_radius_km
            )));
        }

        if !(0.0..1.0).contains(&self.fill_stop_ratio) {
            return Err(PlanError::InvalidConfig(format!(
                "fill_stop_ratio ({}) must be in [0, 1)",
                self.fill_stop_ratio
            )));
        }

        if self.max_candidates == 0 {
            return Err(PlanError::InvalidConfig(
                "max_candidates must be at least 1".into(),
            ));
        }

        if self.link_tolerance <= 0.0 || self.area_per_node_km2 < 0.0 {
            return Err(PlanError::InvalidConfig(
                "link_tolerance must be positive and area_per_node_km2 non-negative".into(),
            ));
        }

        if self.tech.get(&self.default_terrain).is_none() {
            return Err(PlanError::InvalidConfig(format!(
                "default_terrain '{}' is missing from the tech table",
                self.default_terrain
            )));
        }

        for (terrain, spec) in self.tech.iter() {
            if !(spec.range_km.is_finite() && spec.range_km > 0.0) {
                return Err(PlanError::InvalidConfig(format!(
                    "tech '{}' has non-positive range {}",
                    terrain, spec.range_km
                )));
            }
        }

        Ok(())
    }
}
