//! Fingerprint cache: request keys and the stores behind them.

pub mod disk;
pub mod fingerprint;
pub mod store;
