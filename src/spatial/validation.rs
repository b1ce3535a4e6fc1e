//! Advisory checks on caller-supplied service areas
//!
//! None of these are fatal: the engine already treats short rings as inert.
//! The findings are surfaced so a caller can tell why an area produced no
//! coverage.

use std::fmt;

use geo::{Intersects, Line};

use crate::core::types::{Coordinate, Polygon};

/// Problems found in a service area polygon
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    InsufficientVertices { count: usize, minimum: usize },
    NonFiniteCoordinate { index: usize },
    OutOfBounds { index: usize, coordinate: Coordinate },
    SelfIntersecting { edge_a: usize, edge_b: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientVertices { count, minimum } => {
                write!(f, "{} vertices, at least {} required", count, minimum)
            }
            Self::NonFiniteCoordinate { index } => {
                write!(f, "vertex {} is not a finite coordinate", index)
            }
            Self::OutOfBounds { index, coordinate } => write!(
                f,
                "vertex {} ({:.5}, {:.5}) is outside lat [-90, 90] / lng [-180, 180]",
                index, coordinate.lat, coordinate.lng
            ),
            Self::SelfIntersecting { edge_a, edge_b } => {
                write!(f, "edges {} and {} cross each other", edge_a, edge_b)
            }
        }
    }
}

pub struct PolygonValidator;

impl PolygonValidator {
    /// Validate a service area ring
    pub fn validate(polygon: &Polygon) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let vertices = polygon.vertices();

        if vertices.len() < 3 {
            errors.push(ValidationError::InsufficientVertices {
                count: vertices.len(),
                minimum: 3,
            });
            return errors;
        }

        for (index, vertex) in vertices.iter().enumerate() {
            if !vertex.is_finite() {
                errors.push(ValidationError::NonFiniteCoordinate { index });
            } else if !vertex.in_range() {
                errors.push(ValidationError::OutOfBounds {
                    index,
                    coordinate: *vertex,
                });
            }
        }

        // Edge tests are meaningless with NaNs in play
        if errors.is_empty() {
            if let Some((edge_a, edge_b)) = Self::first_crossing(vertices) {
                errors.push(ValidationError::SelfIntersecting { edge_a, edge_b });
            }
        }

        errors
    }

    /// First pair of non-adjacent edges that touch or cross
    fn first_crossing(vertices: &[Coordinate]) -> Option<(usize, usize)> {
        let n = vertices.len();
        if n < 4 {
            return None; // Triangle can't self-intersect
        }

        let edge = |i: usize| {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            Line::new((a.lng, a.lat), (b.lng, b.lat))
        };

        for i in 0..n {
            for j in (i + 2)..n {
                // Last edge wraps around to share vertex 0 with the first
                if i == 0 && j == n - 1 {
                    continue;
                }
                if edge(i).intersects(&edge(j)) {
                    return Some((i, j));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_square_passes() {
        let poly = Polygon::from(vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
        assert!(PolygonValidator::validate(&poly).is_empty());
    }

    #[test]
    fn test_bowtie_fails() {
        let poly = Polygon::from(vec![(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0)]);
        let errors = PolygonValidator::validate(&poly);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::SelfIntersecting { .. })));
    }

    #[test]
    fn test_short_ring_reported() {
        let poly = Polygon::from(vec![(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(
            PolygonValidator::validate(&poly),
            vec![ValidationError::InsufficientVertices { count: 2, minimum: 3 }]
        );
    }

    #[test]
    fn test_out_of_range_vertex() {
        let poly = Polygon::from(vec![(0.0, 0.0), (95.0, 1.0), (1.0, 0.0)]);
        let errors = PolygonValidator::validate(&poly);
        assert!(matches!(errors[0], ValidationError::OutOfBounds { index: 1, .. }));
    }
}
