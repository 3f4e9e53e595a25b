//! Identifier and domain model types

pub mod identifiers;
pub mod model;
