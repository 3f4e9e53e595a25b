//! Effect traits
//!
//! # Effect Classification
//!
//! - `PlatformEffects`: Application effect, remote social-platform API
//! - `PhysicalTimeEffects`: Infrastructure effect, wall clock and sleeping
//! - `CancellationToken`: Infrastructure effect, cooperative interruption
//!
//! Handlers live in `grouptrack-effects`.

pub mod cancel;
pub mod platform;
pub mod time;

pub use cancel::{guarded, CancellationToken, NeverCancel};
pub use platform::{LoginOutcome, PlatformEffects};
pub use time::{PhysicalTime, PhysicalTimeEffects, TimeError};
