//! Domain model for groups, roles and memberships
//!
//! These are the shapes the feature crates work with. The platform handler
//! translates its wire payloads into them; nothing here knows about HTTP.

use crate::permission::PermissionId;
use crate::types::identifiers::{GroupId, MembershipId, RoleId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Username and password for the session login.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Platform username or email
    pub username: String,
    /// Platform password
    pub password: String,
}

impl Credentials {
    /// Create credentials
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The authenticated account, as resolved by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    /// Account id
    pub id: UserId,
    /// Display name at the time of the run
    pub display_name: String,
}

/// Group metadata, including the caller's own partial membership record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// Group id
    pub id: GroupId,
    /// Human-readable group name
    pub name: String,
    /// Authoritative member count, self included
    pub member_count: usize,
    /// The caller's membership; `None` when the caller is not a member
    pub my_member: Option<SelfMembership>,
}

/// The caller's membership as reported by the group metadata.
///
/// It carries role assignments but no identity payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfMembership {
    /// Membership record id
    pub id: MembershipId,
    /// Group the membership belongs to
    pub group_id: GroupId,
    /// Account id, when the platform includes it
    pub user_id: Option<UserId>,
    /// Roles held in the group
    pub role_ids: Vec<RoleId>,
    /// Whether the caller displays this group on their profile
    pub is_representing: bool,
    /// Join timestamp as reported by the platform
    pub joined_at: Option<String>,
    /// Membership status (`member`, `requested`, ...)
    pub membership_status: Option<String>,
}

/// A role bundle scoped to one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role id
    pub id: RoleId,
    /// Owning group
    pub group_id: GroupId,
    /// Role name
    pub name: String,
    /// Raw wire permission codes, decoded during aggregation
    pub permissions: Vec<String>,
}

impl Role {
    /// Decode every permission code this role grants.
    pub fn decoded_permissions(&self) -> crate::Result<Vec<PermissionId>> {
        self.permissions
            .iter()
            .map(|code| PermissionId::decode(code))
            .collect()
    }
}

/// Identity payload attached to a roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberUser {
    /// Account id
    pub id: UserId,
    /// Display name
    pub display_name: String,
}

/// A member of one group, with the roles held there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Membership record id
    pub id: MembershipId,
    /// Group the membership belongs to
    pub group_id: GroupId,
    /// Account id
    pub user_id: UserId,
    /// Identity payload
    pub user: MemberUser,
    /// Roles held in the group
    pub role_ids: Vec<RoleId>,
    /// Whether the member displays this group on their profile
    pub is_representing: bool,
    /// Join timestamp as reported by the platform
    pub joined_at: Option<String>,
    /// Membership status
    pub membership_status: Option<String>,
}

impl Member {
    /// Build a complete member record for the caller.
    ///
    /// Membership fields come from the partial record; identity comes from
    /// the authenticated caller.
    pub fn reconcile_self(partial: &SelfMembership, caller: &CallerIdentity) -> Self {
        Self {
            id: partial.id.clone(),
            group_id: partial.group_id.clone(),
            user_id: caller.id.clone(),
            user: MemberUser {
                id: caller.id.clone(),
                display_name: caller.display_name.clone(),
            },
            role_ids: partial.role_ids.clone(),
            is_representing: partial.is_representing,
            joined_at: partial.joined_at.clone(),
            membership_status: partial.membership_status.clone(),
        }
    }

    /// Display name of the member
    pub fn display_name(&self) -> &str {
        &self.user.display_name
    }
}

/// Roster ordering understood by the member listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemberSort {
    /// Oldest members first
    #[default]
    JoinedAtAsc,
    /// Newest members first
    JoinedAtDesc,
}

impl MemberSort {
    /// Query string value for the listing endpoint
    pub fn as_query(self) -> &'static str {
        match self {
            MemberSort::JoinedAtAsc => "joinedAt:asc",
            MemberSort::JoinedAtDesc => "joinedAt:desc",
        }
    }
}

/// One page of the member roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Maximum entries to return
    pub limit: usize,
    /// Entries to skip
    pub offset: usize,
    /// Roster ordering
    pub sort: MemberSort,
}

/// Effective permissions per user, keyed by display name (or user id).
///
/// Keys iterate in lexicographic order; each value is deduplicated and sorted
/// by declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserReport(BTreeMap<String, Vec<PermissionId>>);

impl UserReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the effective permissions for a user
    pub fn insert(&mut self, key: impl Into<String>, permissions: Vec<PermissionId>) {
        self.0.insert(key.into(), permissions);
    }

    /// Effective permissions for a user
    pub fn get(&self, key: &str) -> Option<&[PermissionId]> {
        self.0.get(key).map(Vec::as_slice)
    }

    /// Number of users in the report
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the report has no users
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate users in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PermissionId])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}
