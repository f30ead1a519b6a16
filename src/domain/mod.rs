//! Domain layer: pure value types and the ports the engine is wired through.

pub mod models;
pub mod ports;
