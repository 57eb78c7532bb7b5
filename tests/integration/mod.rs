//! Integration tests for the minos-rs library
//!
//! This module organizes all integration tests that test the library as a whole,
//! rather than individual components.


// Likelihood fits with genuinely asymmetric errors
pub mod real_world;
