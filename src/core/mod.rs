pub mod config;
pub mod error;
pub mod types;

pub use config::PlannerConfig;
pub use error::{PlanError, Result};
pub use types::{Coordinate, CriticalPoint, Polygon};
