//! Platform effect handlers

pub mod http;
pub mod mock;
mod wire;
