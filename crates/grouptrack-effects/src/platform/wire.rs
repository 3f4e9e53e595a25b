//! Wire payloads of the platform's REST API and their domain conversions.
//!
//! Only the fields a tracking run reads are modelled; everything else in the
//! responses is ignored.

use grouptrack_core::{
    CallerIdentity, GroupId, GroupSummary, Member, MemberUser, MembershipId, Role, RoleId,
    SelfMembership, UserId,
};
use serde::{Deserialize, Serialize};

/// `GET /auth/user`: either a user, or a request for a second factor.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CurrentUserPayload {
    #[serde(default)]
    pub requires_two_factor_auth: Option<Vec<String>>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl CurrentUserPayload {
    /// The resolved identity, `None` while a second factor is pending.
    pub fn into_identity(self) -> Option<CallerIdentity> {
        if self.requires_two_factor_auth.is_some() {
            return None;
        }
        match (self.id, self.display_name) {
            (Some(id), Some(display_name)) => Some(CallerIdentity {
                id: UserId::new(id),
                display_name,
            }),
            _ => None,
        }
    }
}

/// `POST /auth/twofactorauth/totp/verify` request body.
#[derive(Debug, Serialize)]
pub(crate) struct TwoFactorCodePayload<'a> {
    pub code: &'a str,
}

/// `POST /auth/twofactorauth/totp/verify` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct VerifyPayload {
    #[serde(default)]
    pub verified: bool,
}

/// `GET /groups/{groupId}`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GroupPayload {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub member_count: usize,
    #[serde(default)]
    pub my_member: Option<GroupMyMemberPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GroupMyMemberPayload {
    pub id: String,
    pub group_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub role_ids: Vec<String>,
    #[serde(default)]
    pub is_representing: bool,
    #[serde(default)]
    pub joined_at: Option<String>,
    #[serde(default)]
    pub membership_status: Option<String>,
}

impl From<GroupPayload> for GroupSummary {
    fn from(payload: GroupPayload) -> Self {
        GroupSummary {
            id: GroupId::new(payload.id),
            name: payload.name,
            member_count: payload.member_count,
            my_member: payload.my_member.map(|me| SelfMembership {
                id: MembershipId::new(me.id),
                group_id: GroupId::new(me.group_id),
                user_id: me.user_id.map(UserId::new),
                role_ids: me.role_ids.into_iter().map(RoleId::new).collect(),
                is_representing: me.is_representing,
                joined_at: me.joined_at,
                membership_status: me.membership_status,
            }),
        }
    }
}

/// Entry of `GET /groups/{groupId}/roles`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RolePayload {
    pub id: String,
    pub group_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl From<RolePayload> for Role {
    fn from(payload: RolePayload) -> Self {
        Role {
            id: RoleId::new(payload.id),
            group_id: GroupId::new(payload.group_id),
            name: payload.name,
            permissions: payload.permissions,
        }
    }
}

/// Entry of `GET /groups/{groupId}/members`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MemberPayload {
    pub id: String,
    pub group_id: String,
    pub user_id: String,
    #[serde(default)]
    pub user: Option<MemberUserPayload>,
    #[serde(default)]
    pub role_ids: Vec<String>,
    #[serde(default)]
    pub is_representing: bool,
    #[serde(default)]
    pub joined_at: Option<String>,
    #[serde(default)]
    pub membership_status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MemberUserPayload {
    pub id: String,
    pub display_name: String,
}

impl From<MemberPayload> for Member {
    fn from(payload: MemberPayload) -> Self {
        let user_id = UserId::new(payload.user_id);
        let user = match payload.user {
            Some(user) => MemberUser {
                id: UserId::new(user.id),
                display_name: user.display_name,
            },
            None => {
                tracing::debug!("member {user_id} has no user payload, keying by id");
                MemberUser {
                    id: user_id.clone(),
                    display_name: user_id.to_string(),
                }
            }
        };
        Member {
            id: MembershipId::new(payload.id),
            group_id: GroupId::new(payload.group_id),
            user_id,
            user,
            role_ids: payload.role_ids.into_iter().map(RoleId::new).collect(),
            is_representing: payload.is_representing,
            joined_at: payload.joined_at,
            membership_status: payload.membership_status,
        }
    }
}

/// Error envelope returned with non-success statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_factor_signal_has_no_identity() {
        let payload: CurrentUserPayload =
            serde_json::from_str(r#"{"requiresTwoFactorAuth":["totp","otp"]}"#).unwrap();
        assert!(payload.into_identity().is_none());
    }

    #[test]
    fn test_current_user_identity() {
        let payload: CurrentUserPayload = serde_json::from_str(
            r#"{"id":"usr_1","displayName":"Carol","bio":"ignored","tags":[]}"#,
        )
        .unwrap();
        let identity = payload.into_identity().unwrap();
        assert_eq!(identity.id, UserId::new("usr_1"));
        assert_eq!(identity.display_name, "Carol");
    }

    #[test]
    fn test_group_without_my_member() {
        let payload: GroupPayload = serde_json::from_str(
            r#"{"id":"grp_1","name":"Club","memberCount":12,"myMember":null}"#,
        )
        .unwrap();
        let summary = GroupSummary::from(payload);
        assert_eq!(summary.member_count, 12);
        assert!(summary.my_member.is_none());
    }

    #[test]
    fn test_group_with_my_member() {
        let payload: GroupPayload = serde_json::from_str(
            r#"{"id":"grp_1","name":"Club","memberCount":3,
                "myMember":{"id":"gmem_1","groupId":"grp_1","userId":"usr_1",
                            "roleIds":["grol_a"],"isRepresenting":false,
                            "membershipStatus":"member"}}"#,
        )
        .unwrap();
        let me = GroupSummary::from(payload).my_member.unwrap();
        assert_eq!(me.role_ids, vec![RoleId::new("grol_a")]);
        assert_eq!(me.membership_status.as_deref(), Some("member"));
    }

    #[test]
    fn test_member_without_user_payload_falls_back_to_id() {
        let payload: MemberPayload = serde_json::from_str(
            r#"{"id":"gmem_2","groupId":"grp_1","userId":"usr_2","roleIds":[]}"#,
        )
        .unwrap();
        let member = Member::from(payload);
        assert_eq!(member.display_name(), "usr_2");
    }

    #[test]
    fn test_role_payload() {
        let payload: RolePayload = serde_json::from_str(
            r#"{"id":"grol_a","groupId":"grp_1","name":"Mods",
                "permissions":["group-audit-view","group-bans-manage"],"order":2}"#,
        )
        .unwrap();
        let role = Role::from(payload);
        assert_eq!(role.permissions.len(), 2);
    }
}
