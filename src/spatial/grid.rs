//! Demand node generation over service areas

use serde::{Deserialize, Serialize};

use crate::core::types::{Coordinate, CriticalPoint, Polygon};
use crate::spatial::geometry::{centroid, contains, BoundingBox};

/// A discretized point coverage is measured against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandNode {
    pub lat: f64,
    pub lng: f64,
    pub is_critical: bool,
    pub covered: bool,
    /// "Critical #N" for critical nodes, unnamed for area nodes
    pub name: Option<String>,
    /// Caller-supplied name of the critical point this node came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl DemandNode {
    pub fn critical(point: &CriticalPoint, ordinal: usize) -> Self {
        Self {
            lat: point.lat,
            lng: point.lng,
            is_critical: true,
            covered: false,
            name: Some(format!("Critical #{}", ordinal)),
            display_name: point.name.clone(),
        }
    }

    pub fn area(location: Coordinate) -> Self {
        Self {
            lat: location.lat,
            lng: location.lng,
            is_critical: false,
            covered: false,
            name: None,
            display_name: None,
        }
    }

    pub fn location(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    /// Display label used in decision logs
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("Area point")
    }
}

/// Lattice settings for area discretization
#[derive(Debug, Clone, Copy)]
pub struct GridSpec {
    /// Lattice step (degrees)
    pub step_deg: f64,
    /// Prepend each polygon's centroid as an area node
    pub include_centroids: bool,
}

impl GridSpec {
    pub fn new(step_deg: f64) -> Self {
        Self {
            step_deg,
            include_centroids: false,
        }
    }
}

/// Build the demand node set: critical nodes in input order, then each
/// plannable polygon's interior lattice points, latitude-major ascending.
pub fn generate_nodes(
    polygons: &[Polygon],
    critical_points: &[CriticalPoint],
    spec: GridSpec,
) -> Vec<DemandNode> {
    let mut nodes: Vec<DemandNode> = critical_points
        .iter()
        .enumerate()
        .map(|(i, point)| DemandNode::critical(point, i + 1))
        .collect();

    for polygon in polygons.iter().filter(|p| p.is_plannable()) {
        if spec.include_centroids {
            if let Some(center) = centroid(polygon) {
                nodes.push(DemandNode::area(center));
            }
        }
        nodes.extend(lattice_points(polygon, spec.step_deg).map(DemandNode::area));
    }

    nodes
}

/// Interior lattice points of one polygon, in scan order.
///
/// Lattice coordinates are `min + k * step` rather than accumulated sums so
/// the point set does not drift with the number of steps taken.
pub fn lattice_points(polygon: &Polygon, step_deg: f64) -> impl Iterator<Item = Coordinate> + '_ {
    let bbox = match BoundingBox::of(polygon) {
        Some(bbox) if polygon.is_plannable() && step_deg > 0.0 => bbox,
        _ => BoundingBox {
            min_lat: 0.0,
            max_lat: 0.0,
            min_lng: 0.0,
            max_lng: 0.0,
        },
    };

    let lat_steps = steps_below(bbox.min_lat, bbox.max_lat, step_deg);
    let lng_steps = steps_below(bbox.min_lng, bbox.max_lng, step_deg);

    (0..lat_steps)
        .flat_map(move |i| {
            let lat = bbox.min_lat + i as f64 * step_deg;
            (0..lng_steps).map(move |j| Coordinate::new(lat, bbox.min_lng + j as f64 * step_deg))
        })
        .filter(move |point| contains(polygon, *point))
}

/// Number of lattice indices `k` with `min + k * step < max`.
///
/// Returns 0 when the count is not representable; such a lattice could
/// never be walked anyway.
fn steps_below(min: f64, max: f64, step: f64) -> usize {
    if !(step > 0.0) || !(max > min) {
        return 0;
    }
    let quotient = ((max - min) / step).ceil();
    if !quotient.is_finite() || quotient >= usize::MAX as f64 {
        return 0;
    }
    let mut count = quotient as usize;
    // ceil can land one past or one short of the strict bound
    while count > 0 && min + (count - 1) as f64 * step >= max {
        count -= 1;
    }
    while min + count as f64 * step < max {
        count += 1;
    }
    count
}
