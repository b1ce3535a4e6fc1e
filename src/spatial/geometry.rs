//! Geometry kernel: great-circle distance, containment, centroid

use crate::core::types::{Coordinate, Polygon};

/// Mean Earth radius (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates (km), haversine formula
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = lat2 - lat1;
    let dlng = (b.lng - a.lng).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    // Clamp guards asin against h drifting past 1.0 for antipodal points
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Even-odd ray casting test.
///
/// x is longitude, y is latitude; the ray runs east from `point`. The half-open
/// `(yi > y) != (yj > y)` rule counts a vertex shared by two edges once and
/// never counts horizontal edges.
pub fn contains(polygon: &Polygon, point: Coordinate) -> bool {
    let vertices = polygon.vertices();
    if vertices.len() < 3 {
        return false;
    }

    let (x, y) = (point.lng, point.lat);
    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (xi, yi) = (vertices[i].lng, vertices[i].lat);
        let (xj, yj) = (vertices[j].lng, vertices[j].lat);

        if (yi > y) != (yj > y) {
            let x_cross = xi + (y - yi) * (xj - xi) / (yj - yi);
            if x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Arithmetic mean of the vertices; `None` for inert polygons
pub fn centroid(polygon: &Polygon) -> Option<Coordinate> {
    let vertices = polygon.vertices();
    if vertices.len() < 3 {
        return None;
    }
    let n = vertices.len() as f64;
    let lat = vertices.iter().map(|v| v.lat).sum::<f64>() / n;
    let lng = vertices.iter().map(|v| v.lng).sum::<f64>() / n;
    Some(Coordinate::new(lat, lng))
}

/// Point `t` of the way from `from` to `to`, interpolated in degree space.
///
/// Longitude takes the short way round, so a path across the antimeridian
/// stays on it rather than sweeping the globe; the result is wrapped back
/// into [-180, 180].
pub fn lerp(from: Coordinate, to: Coordinate, t: f64) -> Coordinate {
    let mut dlng = to.lng - from.lng;
    if dlng > 180.0 {
        dlng -= 360.0;
    } else if dlng < -180.0 {
        dlng += 360.0;
    }
    Coordinate::new(from.lat + (to.lat - from.lat) * t, wrap_lng(from.lng + dlng * t))
}

fn wrap_lng(lng: f64) -> f64 {
    if lng > 180.0 {
        lng - 360.0
    } else if lng < -180.0 {
        lng + 360.0
    } else {
        lng
    }
}

/// Axis-aligned bounds of a polygon in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Bounds of the polygon's vertices; `None` for an empty ring
    pub fn of(polygon: &Polygon) -> Option<Self> {
        let first = polygon.vertices().first()?;
        let init = Self {
            min_lat: first.lat,
            max_lat: first.lat,
            min_lng: first.lng,
            max_lng: first.lng,
        };
        Some(polygon.vertices().iter().fold(init, |b, v| Self {
            min_lat: b.min_lat.min(v.lat),
            max_lat: b.max_lat.max(v.lat),
            min_lng: b.min_lng.min(v.lng),
            max_lng: b.max_lng.max(v.lng),
        }))
    }
}
