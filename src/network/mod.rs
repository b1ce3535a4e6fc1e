//! Operations on an already planned network

pub mod reroute;

pub use reroute::{reroute, RerouteOutcome, RerouteRequest};
