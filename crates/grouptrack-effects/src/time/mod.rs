//! Time effect handlers

pub mod real;
pub mod simulated;
