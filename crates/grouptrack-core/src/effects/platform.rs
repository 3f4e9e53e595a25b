//! Remote platform API effect trait.
//!
//! The platform is a black box: each operation either yields a domain value
//! or fails with [`TrackerError::Remote`](crate::TrackerError::Remote) carrying the platform's message and
//! status code.

use crate::errors::Result;
use crate::types::identifiers::GroupId;
use crate::types::model::{
    CallerIdentity, Credentials, GroupSummary, Member, PageRequest, Role,
};
use async_trait::async_trait;

/// Result of submitting username and password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The session is fully authenticated
    Authenticated(CallerIdentity),
    /// The platform wants a second factor before resolving identity
    SecondFactorRequired,
}

/// Remote social-platform operations used by a tracking run.
#[async_trait]
pub trait PlatformEffects: Send + Sync {
    /// Open a session with username and password
    async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome>;

    /// Submit a time-based one-time code; returns whether it was accepted
    async fn verify_totp(&self, code: &str) -> Result<bool>;

    /// Identity of the current session, `None` while unresolved
    async fn current_user(&self) -> Result<Option<CallerIdentity>>;

    /// Group metadata, including the caller's own membership
    async fn group(&self, group_id: &GroupId) -> Result<GroupSummary>;

    /// Full role catalog of a group
    async fn group_roles(&self, group_id: &GroupId) -> Result<Vec<Role>>;

    /// One page of the group's member roster
    async fn group_members(&self, group_id: &GroupId, page: PageRequest) -> Result<Vec<Member>>;
}
