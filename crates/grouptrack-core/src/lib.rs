//! Grouptrack Core - Interface Layer
//!
//! This crate holds everything the feature crates agree on without depending
//! on any runtime:
//!
//! - Identifiers: `GroupId`, `UserId`, `RoleId`, `MembershipId`
//! - Domain model: `Role`, `Member`, `GroupSummary`, `CallerIdentity`
//! - The fixed `PermissionId` universe and its wire code table
//! - Effect traits: `PlatformEffects`, `PhysicalTimeEffects`, `CancellationToken`
//! - Configuration types with validation
//! - The unified `TrackerError`
//!
//! # Architecture
//!
//! Handlers for the effect traits live in `grouptrack-effects`. Feature crates
//! (`grouptrack-authentication`, `grouptrack-roster`) take effect references
//! per call, so the same code runs against the live platform and against the
//! deterministic handlers used in tests.

pub mod config;
pub mod effects;
pub mod errors;
pub mod permission;
pub mod types;

pub use config::{ApiConfig, AuthConfig, FetchConfig, ReportConfig, ReportKey, TrackerConfig};
pub use errors::{Result, TrackerError};
pub use permission::{verify_code_table, PermissionId};
pub use types::identifiers::{GroupId, MembershipId, RoleId, UserId};
pub use types::model::{
    CallerIdentity, Credentials, GroupSummary, Member, MemberSort, MemberUser, PageRequest, Role,
    SelfMembership, UserReport,
};
