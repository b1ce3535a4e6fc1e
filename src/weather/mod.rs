//! Weather resilience and QoS simulation
//!
//! Independent of the coverage engine: it derives a bandwidth policy from a
//! weather severity score for an already deployed technology.

pub mod policy;
pub mod session;

pub use policy::{qos_policy, resilience, NetworkPolicy, QosStatus};
pub use session::{check_resilience, clock_stamp, DisasterSession, SessionStore, WeatherReport};
