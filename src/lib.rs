//! Relay Planner - relay tower coverage planning over service areas

pub mod core;
pub mod network;
pub mod planning;
pub mod spatial;
pub mod weather;
