//! Geometry, pixel and error primitives shared by every other module.

pub mod core;
pub mod error;
pub(crate) mod math;
