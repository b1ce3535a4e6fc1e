pub mod geometry;
pub mod grid;
pub mod validation;

pub use geometry::{centroid, contains, distance, BoundingBox};
pub use grid::{generate_nodes, DemandNode, GridSpec};
pub use validation::{PolygonValidator, ValidationError};
