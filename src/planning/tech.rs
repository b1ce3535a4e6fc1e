//! Terrain -> tower technology lookup

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Tower technology deployed for a terrain class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechSpec {
    /// Technology display name
    pub tech: String,
    /// Effective coverage radius (km)
    pub range_km: f64,
    /// Capital cost per tower
    pub cost: u64,
    /// Per-tower cost of the legacy technology the plan is compared against
    pub legacy_cost: u64,
}

impl TechSpec {
    pub fn new(tech: &str, range_km: f64, cost: u64, legacy_cost: u64) -> Self {
        Self {
            tech: tech.to_string(),
            range_km,
            cost,
            legacy_cost,
        }
    }
}

/// Technology table keyed by terrain classifier
///
/// Ordered map so config dumps and iteration are stable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TechTable(BTreeMap<String, TechSpec>);

impl TechTable {
    /// The production table. Legacy costs are the 1.65x multiple of
    /// conventional infrastructure for the same footprint.
    pub fn builtin() -> Self {
        let mut table = BTreeMap::new();
        table.insert(
            "flat".to_string(),
            TechSpec::new("Macro Tower (700MHz)", 10.0, 50_000, 82_500),
        );
        table.insert(
            "hilly".to_string(),
            TechSpec::new("High-Site Macro", 4.0, 80_000, 132_000),
        );
        table.insert(
            "forest".to_string(),
            TechSpec::new("Telescopic Mast", 3.0, 60_000, 99_000),
        );
        table.insert(
            "valley".to_string(),
            TechSpec::new("Small Cell / Micro", 0.8, 20_000, 33_000),
        );
        table.insert(
            "snow".to_string(),
            TechSpec::new("High-Site Macro", 4.0, 2_500_000, 4_125_000),
        );
        Self(table)
    }

    pub fn get(&self, terrain: &str) -> Option<&TechSpec> {
        self.0.get(terrain)
    }

    pub fn insert(&mut self, terrain: impl Into<String>, spec: TechSpec) {
        self.0.insert(terrain.into(), spec);
    }

    pub fn extend(&mut self, other: TechTable) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TechSpec)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Resolve a terrain key, falling back to `default_terrain` when unknown.
    ///
    /// Returns the spec, the key actually used, and whether a fallback happened.
    /// A table missing the default key yields `None` (rejected by config
    /// validation before any run).
    pub fn resolve<'a>(
        &'a self,
        terrain: &str,
        default_terrain: &'a str,
    ) -> Option<ResolvedTech<'a>> {
        if let Some((key, spec)) = self.0.get_key_value(terrain) {
            return Some(ResolvedTech {
                terrain: key,
                spec,
                fell_back: false,
            });
        }
        let (key, spec) = self.0.get_key_value(default_terrain)?;
        Some(ResolvedTech {
            terrain: key,
            spec,
            fell_back: true,
        })
    }
}

/// Outcome of a terrain lookup
#[derive(Debug, Clone, Copy)]
pub struct ResolvedTech<'a> {
    pub terrain: &'a str,
    pub spec: &'a TechSpec,
    pub fell_back: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_valley_spec() {
        let table = TechTable::builtin();
        let valley = table.get("valley").unwrap();
        assert_eq!(valley.range_km, 0.8);
        assert_eq!(valley.cost, 20_000);
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_resolve_known_terrain() {
        let table = TechTable::builtin();
        let resolved = table.resolve("hilly", "valley").unwrap();
        assert_eq!(resolved.terrain, "hilly");
        assert_eq!(resolved.spec.range_km, 4.0);
        assert!(!resolved.fell_back);
    }

    #[test]
    fn test_resolve_unknown_terrain_falls_back() {
        let table = TechTable::builtin();
        let resolved = table.resolve("swampland", "valley").unwrap();
        assert_eq!(resolved.terrain, "valley");
        assert!(resolved.fell_back);
    }
}
