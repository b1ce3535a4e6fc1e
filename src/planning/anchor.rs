//! Anchor phase: one tower per uncovered critical point

use crate::core::types::{Coordinate, Polygon};
use crate::planning::events::{PlanEvent, PlanLog};
use crate::planning::tech::TechSpec;
use crate::planning::tower::{TowerKind, TowerLedger};
use crate::planning::cover_within;
use crate::spatial::geometry::{centroid, distance, lerp};
use crate::spatial::grid::DemandNode;

#[derive(Debug, Clone, Copy)]
pub struct AnchorParams {
    /// Fraction of range the anchor may sit from its critical point
    pub range_margin: f64,
    /// Existing towers this close to a new anchor make it redundant (km)
    pub duplicate_radius_km: f64,
}

/// Where an anchor tower goes and why
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorSite {
    /// Nearest area centre is within reach
    Centroid { location: Coordinate, distance_km: f64 },
    /// Centre out of reach; slid from the point toward it
    Slid { location: Coordinate, centroid_km: f64 },
    /// No active service area at all
    OnPoint { location: Coordinate },
}

impl AnchorSite {
    pub fn location(&self) -> Coordinate {
        match *self {
            Self::Centroid { location, .. } | Self::Slid { location, .. } | Self::OnPoint { location } => {
                location
            }
        }
    }
}

/// Pick the anchor site for a critical point given the active area centres
pub fn choose_site(point: Coordinate, centroids: &[Coordinate], reach_km: f64) -> AnchorSite {
    let mut nearest: Option<(Coordinate, f64)> = None;
    for &center in centroids {
        let d = distance(point, center);
        if nearest.map_or(true, |(_, best)| d < best) {
            nearest = Some((center, d));
        }
    }

    match nearest {
        None => AnchorSite::OnPoint { location: point },
        Some((center, d)) if d <= reach_km => AnchorSite::Centroid {
            location: center,
            distance_km: d,
        },
        Some((center, d)) => AnchorSite::Slid {
            location: slide_toward(point, center, reach_km, d),
            centroid_km: d,
        },
    }
}

/// Move from `from` toward `to`, stopping so that `from` stays within `reach_km`.
///
/// Interpolation is linear in degrees while distance is great-circle, so the
/// first guess can overshoot by a hair; it is pulled back until it fits.
fn slide_toward(from: Coordinate, to: Coordinate, reach_km: f64, total_km: f64) -> Coordinate {
    let mut t = reach_km / total_km;
    let mut site = lerp(from, to, t);

    for _ in 0..8 {
        let actual = distance(from, site);
        if actual <= reach_km {
            return site;
        }
        t *= (reach_km / actual) * (1.0 - 1e-9);
        site = lerp(from, to, t);
    }

    if distance(from, site) <= reach_km {
        site
    } else {
        from
    }
}

/// Place anchor towers for every critical node not yet covered, in node order
pub fn place_anchors(
    nodes: &mut [DemandNode],
    polygons: &[Polygon],
    spec: &TechSpec,
    params: AnchorParams,
    ledger: &mut TowerLedger,
    log: &mut PlanLog,
) {
    let centroids: Vec<Coordinate> = polygons
        .iter()
        .filter(|p| p.is_plannable())
        .filter_map(centroid)
        .collect();
    let reach = spec.range_km * params.range_margin;

    for idx in 0..nodes.len() {
        if !nodes[idx].is_critical || nodes[idx].covered {
            continue;
        }
        let point = nodes[idx].location();
        let label = nodes[idx].label().to_string();
        let site = choose_site(point, &centroids, reach);

        if let Some((existing, d)) = ledger.nearest(site.location()) {
            if d <= params.duplicate_radius_km {
                log.push(PlanEvent::AnchorSuppressed {
                    node: label,
                    existing: existing.id.clone(),
                    distance_km: d,
                });
                nodes[idx].covered = true;
                continue;
            }
        }

        let tower = ledger.place(TowerKind::Anchor, site.location(), spec);
        let event = match site {
            AnchorSite::Centroid { distance_km, .. } => PlanEvent::AnchorCentered {
                node: label,
                tower,
                distance_km,
            },
            AnchorSite::Slid { centroid_km, .. } => PlanEvent::AnchorSlid {
                node: label,
                tower,
                centroid_km,
            },
            AnchorSite::OnPoint { .. } => PlanEvent::AnchorOnPoint { node: label, tower },
        };
        log.push(event);

        cover_within(nodes, site.location(), spec.range_km);
        // Rounding in the distance check must not leave the anchor's own point out
        nodes[idx].covered = true;
    }

    tracing::info!("Anchor phase placed {} towers", ledger.count(TowerKind::Anchor));
}
