//! In-memory platform handler for deterministic tests
//!
//! Groups, roles and rosters are seeded up front. Every call is recorded,
//! stamped with the simulated clock when one is attached, so tests can assert
//! on request order, paging and timing.

use crate::time::simulated::SimulatedTimeHandler;
use async_trait::async_trait;
use grouptrack_core::effects::{LoginOutcome, PlatformEffects};
use grouptrack_core::{
    CallerIdentity, Credentials, GroupId, GroupSummary, Member, PageRequest, Result, Role,
    TrackerError,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// A recorded platform call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    /// `login` with the given username
    Login {
        /// Username the login was attempted with
        username: String,
    },
    /// `verify_totp` with the submitted code and the clock at submission
    VerifyTotp {
        /// Submitted code
        code: String,
        /// Simulated clock at submission, in milliseconds
        at_ms: u64,
    },
    /// `current_user`
    CurrentUser,
    /// `group`
    Group {
        /// Requested group
        group_id: GroupId,
    },
    /// `group_roles`
    GroupRoles {
        /// Requested group
        group_id: GroupId,
    },
    /// `group_members`
    GroupMembers {
        /// Requested group
        group_id: GroupId,
        /// Requested page
        page: PageRequest,
        /// Simulated clock at the request, in milliseconds
        at_ms: u64,
    },
}

/// Seeded state of one group.
#[derive(Debug, Clone)]
pub struct MockGroup {
    /// Metadata returned by `group`
    pub summary: GroupSummary,
    /// Catalog returned by `group_roles`
    pub roles: Vec<Role>,
    /// Roster paged by `group_members`
    pub roster: Vec<Member>,
}

type TotpCheck = Arc<dyn Fn(&str, u64) -> bool + Send + Sync>;

struct MockState {
    login: LoginOutcome,
    identity_after_verify: Option<CallerIdentity>,
    totp_check: Option<TotpCheck>,
    session: Option<CallerIdentity>,
    groups: HashMap<GroupId, MockGroup>,
    max_page_len: Option<usize>,
    failures: HashMap<&'static str, TrackerError>,
    calls: Vec<MockCall>,
}

/// In-memory platform with call recording
#[derive(Clone)]
pub struct MockPlatformHandler {
    state: Arc<Mutex<MockState>>,
    clock: Option<SimulatedTimeHandler>,
}

impl std::fmt::Debug for MockPlatformHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockPlatformHandler")
            .field("calls", &self.state.lock().calls.len())
            .finish()
    }
}

impl MockPlatformHandler {
    /// A platform where password login resolves `identity` directly
    pub fn authenticated(identity: CallerIdentity) -> Self {
        Self::with_login(LoginOutcome::Authenticated(identity.clone()), Some(identity))
    }

    /// A platform that demands a second factor before resolving `identity`
    pub fn requiring_totp(identity: CallerIdentity) -> Self {
        Self::with_login(LoginOutcome::SecondFactorRequired, Some(identity))
    }

    fn with_login(login: LoginOutcome, identity_after_verify: Option<CallerIdentity>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                login,
                identity_after_verify,
                totp_check: None,
                session: None,
                groups: HashMap::new(),
                max_page_len: None,
                failures: HashMap::new(),
                calls: Vec::new(),
            })),
            clock: None,
        }
    }

    /// Stamp recorded calls with this clock
    pub fn with_clock(mut self, clock: SimulatedTimeHandler) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Accept a TOTP code only when `check(code, unix_seconds)` holds.
    ///
    /// Without a check every code is accepted.
    pub fn with_totp_check<F>(self, check: F) -> Self
    where
        F: Fn(&str, u64) -> bool + Send + Sync + 'static,
    {
        self.state.lock().totp_check = Some(Arc::new(check));
        self
    }

    /// Accept the code but never resolve identity afterwards
    pub fn without_identity_after_verify(self) -> Self {
        self.state.lock().identity_after_verify = None;
        self
    }

    /// Seed a group
    pub fn with_group(self, group: MockGroup) -> Self {
        self.state
            .lock()
            .groups
            .insert(group.summary.id.clone(), group);
        self
    }

    /// Cap every roster page at `len` entries regardless of the requested limit
    pub fn with_max_page_len(self, len: usize) -> Self {
        self.state.lock().max_page_len = Some(len);
        self
    }

    /// Fail every call to `operation` (`"login"`, `"group"`, ...) with `error`
    pub fn failing(self, operation: &'static str, error: TrackerError) -> Self {
        self.state.lock().failures.insert(operation, error);
        self
    }

    /// Every call made so far
    pub fn calls(&self) -> Vec<MockCall> {
        self.state.lock().calls.clone()
    }

    /// Roster page requests made so far
    pub fn member_pages(&self) -> Vec<(GroupId, PageRequest, u64)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MockCall::GroupMembers {
                    group_id,
                    page,
                    at_ms,
                } => Some((group_id, page, at_ms)),
                _ => None,
            })
            .collect()
    }

    fn now_ms(&self) -> u64 {
        self.clock.as_ref().map(|c| c.now_ms()).unwrap_or(0)
    }

    fn record(&self, operation: &'static str, call: MockCall) -> Result<()> {
        let mut state = self.state.lock();
        state.calls.push(call);
        match state.failures.get(operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn seeded_group(&self, group_id: &GroupId) -> Result<MockGroup> {
        self.state
            .lock()
            .groups
            .get(group_id)
            .cloned()
            .ok_or_else(|| TrackerError::remote(format!("Group {group_id} not found"), 404))
    }
}

#[async_trait]
impl PlatformEffects for MockPlatformHandler {
    async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome> {
        self.record(
            "login",
            MockCall::Login {
                username: credentials.username.clone(),
            },
        )?;
        let mut state = self.state.lock();
        if let LoginOutcome::Authenticated(identity) = &state.login {
            state.session = Some(identity.clone());
        }
        Ok(state.login.clone())
    }

    async fn verify_totp(&self, code: &str) -> Result<bool> {
        let at_ms = self.now_ms();
        self.record(
            "verify_totp",
            MockCall::VerifyTotp {
                code: code.to_string(),
                at_ms,
            },
        )?;
        let mut state = self.state.lock();
        let accepted = match &state.totp_check {
            Some(check) => check(code, at_ms / 1000),
            None => true,
        };
        if accepted {
            state.session = state.identity_after_verify.clone();
        }
        Ok(accepted)
    }

    async fn current_user(&self) -> Result<Option<CallerIdentity>> {
        self.record("current_user", MockCall::CurrentUser)?;
        Ok(self.state.lock().session.clone())
    }

    async fn group(&self, group_id: &GroupId) -> Result<GroupSummary> {
        self.record(
            "group",
            MockCall::Group {
                group_id: group_id.clone(),
            },
        )?;
        Ok(self.seeded_group(group_id)?.summary)
    }

    async fn group_roles(&self, group_id: &GroupId) -> Result<Vec<Role>> {
        self.record(
            "group_roles",
            MockCall::GroupRoles {
                group_id: group_id.clone(),
            },
        )?;
        Ok(self.seeded_group(group_id)?.roles)
    }

    async fn group_members(&self, group_id: &GroupId, page: PageRequest) -> Result<Vec<Member>> {
        self.record(
            "group_members",
            MockCall::GroupMembers {
                group_id: group_id.clone(),
                page,
                at_ms: self.now_ms(),
            },
        )?;
        let group = self.seeded_group(group_id)?;
        let limit = match self.state.lock().max_page_len {
            Some(cap) => page.limit.min(cap),
            None => page.limit,
        };
        Ok(group
            .roster
            .into_iter()
            .skip(page.offset)
            .take(limit)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grouptrack_core::{MemberSort, UserId};

    fn carol() -> CallerIdentity {
        CallerIdentity {
            id: UserId::new("usr_carol"),
            display_name: "Carol".to_string(),
        }
    }

    #[tokio::test]
    async fn test_session_resolves_only_after_verify() {
        let platform = MockPlatformHandler::requiring_totp(carol());
        let creds = Credentials::new("carol", "pw");

        assert_eq!(
            platform.login(&creds).await.unwrap(),
            LoginOutcome::SecondFactorRequired
        );
        assert_eq!(platform.current_user().await.unwrap(), None);
        assert!(platform.verify_totp("123456").await.unwrap());
        assert_eq!(platform.current_user().await.unwrap(), Some(carol()));
    }

    #[tokio::test]
    async fn test_rejected_code_keeps_session_unresolved() {
        let platform =
            MockPlatformHandler::requiring_totp(carol()).with_totp_check(|code, _| code == "000000");
        platform.login(&Credentials::new("carol", "pw")).await.unwrap();
        assert!(!platform.verify_totp("123456").await.unwrap());
        assert_eq!(platform.current_user().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let platform = MockPlatformHandler::authenticated(carol())
            .failing("group", TrackerError::remote("Too Many Requests", 429));
        let err = platform.group(&GroupId::new("grp_1")).await.unwrap_err();
        assert_eq!(err, TrackerError::remote("Too Many Requests", 429));
        assert_eq!(platform.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_group_is_not_found() {
        let platform = MockPlatformHandler::authenticated(carol());
        let page = PageRequest {
            limit: 100,
            offset: 0,
            sort: MemberSort::JoinedAtAsc,
        };
        let err = platform
            .group_members(&GroupId::new("grp_missing"), page)
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::Remote { code: 404, .. }));
    }
}
