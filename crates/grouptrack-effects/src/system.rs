//! Effect system composition
//!
//! Feature crates ask for `E: PlatformEffects + PhysicalTimeEffects`. This
//! wrapper provides both from two independent handlers.

use async_trait::async_trait;
use grouptrack_core::effects::{
    LoginOutcome, PhysicalTime, PhysicalTimeEffects, PlatformEffects, TimeError,
};
use grouptrack_core::{
    CallerIdentity, Credentials, GroupId, GroupSummary, Member, PageRequest, Result, Role,
};

/// A platform handler paired with a clock handler.
#[derive(Debug, Clone)]
pub struct EffectSystem<P, T> {
    platform: P,
    time: T,
}

impl<P, T> EffectSystem<P, T> {
    /// Compose a platform handler with a clock handler
    pub fn new(platform: P, time: T) -> Self {
        Self { platform, time }
    }

    /// The platform handler
    pub fn platform(&self) -> &P {
        &self.platform
    }
}

#[async_trait]
impl<P, T> PlatformEffects for EffectSystem<P, T>
where
    P: PlatformEffects,
    T: Send + Sync,
{
    async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome> {
        self.platform.login(credentials).await
    }

    async fn verify_totp(&self, code: &str) -> Result<bool> {
        self.platform.verify_totp(code).await
    }

    async fn current_user(&self) -> Result<Option<CallerIdentity>> {
        self.platform.current_user().await
    }

    async fn group(&self, group_id: &GroupId) -> Result<GroupSummary> {
        self.platform.group(group_id).await
    }

    async fn group_roles(&self, group_id: &GroupId) -> Result<Vec<Role>> {
        self.platform.group_roles(group_id).await
    }

    async fn group_members(&self, group_id: &GroupId, page: PageRequest) -> Result<Vec<Member>> {
        self.platform.group_members(group_id, page).await
    }
}

#[async_trait]
impl<P, T> PhysicalTimeEffects for EffectSystem<P, T>
where
    P: Send + Sync,
    T: PhysicalTimeEffects,
{
    async fn physical_time(&self) -> std::result::Result<PhysicalTime, TimeError> {
        self.time.physical_time().await
    }

    async fn sleep_ms(&self, ms: u64) -> std::result::Result<(), TimeError> {
        self.time.sleep_ms(ms).await
    }
}
