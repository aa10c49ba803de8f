//! Per-variant constants and the geometry resolver.

pub mod constants;
pub mod solver;
