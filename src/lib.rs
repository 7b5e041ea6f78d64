//! Physicsim library
//!
//! Numerical engines behind a set of interactive physics visualizations,
//! exposed as a library so the binary, integration tests and benchmarks
//! share one implementation.

pub mod cli;
pub mod config;
pub mod events;
pub mod export;
pub mod physics;
pub mod plugins;
pub mod prelude;
pub mod resources;
pub mod simulations;
pub mod states;

// Test utilities are public for integration tests
pub mod test_utils;
