//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Finite and inside lat [-90, 90] / lng [-180, 180]
    pub fn in_range(&self) -> bool {
        self.is_finite() && self.lat.abs() <= 90.0 && self.lng.abs() <= 180.0
    }

    /// `[lat, lng]` pair, the shape map layers expect for link endpoints
    pub fn as_pair(&self) -> [f64; 2] {
        [self.lat, self.lng]
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

/// Service area ring. Rings with fewer than 3 vertices are inert.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon(pub Vec<Coordinate>);

impl Polygon {
    pub fn new(vertices: Vec<Coordinate>) -> Self {
        Self(vertices)
    }

    pub fn vertices(&self) -> &[Coordinate] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the ring has enough vertices to enclose an area
    pub fn is_active(&self) -> bool {
        self.0.len() >= 3
    }

    /// Active and every vertex is a real position on the globe. Rings that
    /// fail this produce neither demand nodes nor anchor centroids.
    pub fn is_plannable(&self) -> bool {
        self.is_active() && self.0.iter().all(Coordinate::in_range)
    }
}

impl From<Vec<(f64, f64)>> for Polygon {
    fn from(points: Vec<(f64, f64)>) -> Self {
        Self(points.into_iter().map(Coordinate::from).collect())
    }
}

/// A must-cover point of interest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalPoint {
    pub lat: f64,
    pub lng: f64,
    /// Display name supplied by the caller (school, clinic, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CriticalPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng, name: None }
    }

    pub fn named(lat: f64, lng: f64, name: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            name: Some(name.into()),
        }
    }

    pub fn location(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}
