//! Group permission universe and its wire code table
//!
//! The platform describes role permissions with opaque strings such as
//! `"group-roles-manage"`. Every string maps to exactly one [`PermissionId`]
//! and back. The table is closed: a code outside it means the platform speaks
//! a newer protocol than this build, and decoding fails instead of dropping
//! the permission.

use crate::errors::{Result, TrackerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A semantic group permission.
///
/// Declaration order is the report order; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PermissionId {
    /// Sentinel granting every other permission
    Owner,
    /// Edit other members' data
    ManageGroupMemberData,
    /// Edit the group's own data
    ManageGroupData,
    /// Read the audit log
    ViewAuditLog,
    /// Create, edit and delete roles
    ManageGroupRoles,
    /// Assign roles to members
    AssignGroupRoles,
    /// Ban and unban users
    ManageGroupBans,
    /// Kick members
    RemoveGroupMembers,
    /// See the full member list
    ViewAllMembers,
    /// Post announcements
    ManageGroupAnnouncement,
    /// Manage galleries
    ManageGroupGalleries,
    /// Send and manage invites
    ManageGroupInvites,
    /// Moderate group instances
    ModerateGroupInstances,
    /// Priority in instance queues
    GroupInstanceQueuePriority,
    /// Open public instances
    CreateGroupPublicInstances,
    /// Open group+ instances
    CreateGroupPlusInstances,
    /// Open members-only instances
    CreateMembersOnlyGroupInstances,
    /// Open role-restricted instances
    RoleRestrictMembersOnlyInstances,
    /// Portal into group+ instances
    PortalToGroupPlusInstances,
    /// Portal into group+ instances without restriction
    UnlockedPortalToGroupPlusInstances,
    /// Join group instances
    JoinGroupInstances,
}

/// Semantic name and wire code for every permission, in declaration order.
const CODE_TABLE: [(PermissionId, &str, &str); 21] = [
    (PermissionId::Owner, "Owner", "*"),
    (
        PermissionId::ManageGroupMemberData,
        "ManageGroupMemberData",
        "group-members-manage",
    ),
    (PermissionId::ManageGroupData, "ManageGroupData", "group-data-manage"),
    (PermissionId::ViewAuditLog, "ViewAuditLog", "group-audit-view"),
    (PermissionId::ManageGroupRoles, "ManageGroupRoles", "group-roles-manage"),
    (PermissionId::AssignGroupRoles, "AssignGroupRoles", "group-roles-assign"),
    (PermissionId::ManageGroupBans, "ManageGroupBans", "group-bans-manage"),
    (
        PermissionId::RemoveGroupMembers,
        "RemoveGroupMembers",
        "group-members-remove",
    ),
    (PermissionId::ViewAllMembers, "ViewAllMembers", "group-members-viewall"),
    (
        PermissionId::ManageGroupAnnouncement,
        "ManageGroupAnnouncement",
        "group-announcement-manage",
    ),
    (
        PermissionId::ManageGroupGalleries,
        "ManageGroupGalleries",
        "group-galleries-manage",
    ),
    (
        PermissionId::ManageGroupInvites,
        "ManageGroupInvites",
        "group-invites-manage",
    ),
    (
        PermissionId::ModerateGroupInstances,
        "ModerateGroupInstances",
        "group-instance-moderate",
    ),
    (
        PermissionId::GroupInstanceQueuePriority,
        "GroupInstanceQueuePriority",
        "group-instance-queue-priority",
    ),
    (
        PermissionId::CreateGroupPublicInstances,
        "CreateGroupPublicInstances",
        "group-instance-public-create",
    ),
    (
        PermissionId::CreateGroupPlusInstances,
        "CreateGroupPlusInstances",
        "group-instance-plus-create",
    ),
    (
        PermissionId::CreateMembersOnlyGroupInstances,
        "CreateMembersOnlyGroupInstances",
        "group-instance-open-create",
    ),
    (
        PermissionId::RoleRestrictMembersOnlyInstances,
        "RoleRestrictMembersOnlyInstances",
        "group-instance-restricted-create",
    ),
    (
        PermissionId::PortalToGroupPlusInstances,
        "PortalToGroupPlusInstances",
        "group-instance-plus-portal",
    ),
    (
        PermissionId::UnlockedPortalToGroupPlusInstances,
        "UnlockedPortalToGroupPlusInstances",
        "group-instance-plus-portal-unlocked",
    ),
    (
        PermissionId::JoinGroupInstances,
        "JoinGroupInstances",
        "group-instance-join",
    ),
];

impl PermissionId {
    /// The complete permission universe, in declaration order.
    pub const ALL: [PermissionId; 21] = [
        PermissionId::Owner,
        PermissionId::ManageGroupMemberData,
        PermissionId::ManageGroupData,
        PermissionId::ViewAuditLog,
        PermissionId::ManageGroupRoles,
        PermissionId::AssignGroupRoles,
        PermissionId::ManageGroupBans,
        PermissionId::RemoveGroupMembers,
        PermissionId::ViewAllMembers,
        PermissionId::ManageGroupAnnouncement,
        PermissionId::ManageGroupGalleries,
        PermissionId::ManageGroupInvites,
        PermissionId::ModerateGroupInstances,
        PermissionId::GroupInstanceQueuePriority,
        PermissionId::CreateGroupPublicInstances,
        PermissionId::CreateGroupPlusInstances,
        PermissionId::CreateMembersOnlyGroupInstances,
        PermissionId::RoleRestrictMembersOnlyInstances,
        PermissionId::PortalToGroupPlusInstances,
        PermissionId::UnlockedPortalToGroupPlusInstances,
        PermissionId::JoinGroupInstances,
    ];

    /// Decode a wire permission code.
    ///
    /// Fails with [`TrackerError::UnknownPermission`] for any string outside
    /// the table; there is no fallback value.
    pub fn decode(code: &str) -> Result<Self> {
        CODE_TABLE
            .iter()
            .find(|(_, _, wire)| *wire == code)
            .map(|(id, _, _)| *id)
            .ok_or_else(|| TrackerError::unknown_permission(code))
    }

    /// Wire code for this permission.
    pub fn code(self) -> &'static str {
        CODE_TABLE[self as usize].2
    }

    /// Semantic name, as written to reports.
    pub fn name(self) -> &'static str {
        CODE_TABLE[self as usize].1
    }

    /// Whether this is the owner sentinel.
    pub fn is_owner(self) -> bool {
        self == PermissionId::Owner
    }
}

impl fmt::Display for PermissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PermissionId {
    type Err = TrackerError;

    /// Parse a semantic name such as `"ViewAuditLog"`. Use [`PermissionId::decode`]
    /// for wire codes.
    fn from_str(s: &str) -> Result<Self> {
        CODE_TABLE
            .iter()
            .find(|(_, name, _)| *name == s)
            .map(|(id, _, _)| *id)
            .ok_or_else(|| TrackerError::unknown_permission(s))
    }
}

/// Check that the code table is a bijection over the permission universe.
///
/// Run once at startup, before any remote call.
pub fn verify_code_table() -> Result<()> {
    for (index, id) in PermissionId::ALL.iter().enumerate() {
        let (table_id, _, code) = CODE_TABLE[index];
        if table_id != *id || *id as usize != index {
            return Err(TrackerError::config(format!(
                "permission table out of order at {id}"
            )));
        }
        let matches = CODE_TABLE.iter().filter(|(_, _, c)| *c == code).count();
        if matches != 1 {
            return Err(TrackerError::config(format!(
                "permission code {code:?} is mapped {matches} times"
            )));
        }
        if PermissionId::decode(code)? != *id {
            return Err(TrackerError::config(format!(
                "permission code {code:?} does not round-trip"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_code_table_is_complete() {
        assert!(verify_code_table().is_ok());
        assert_eq!(PermissionId::ALL.len(), CODE_TABLE.len());
    }

    #[test]
    fn test_decode_encode_round_trip() {
        for id in PermissionId::ALL {
            assert_eq!(PermissionId::decode(id.code()).ok(), Some(id));
        }
        for (_, _, code) in CODE_TABLE {
            let id = PermissionId::decode(code).ok();
            assert_eq!(id.map(PermissionId::code), Some(code));
        }
    }

    #[test]
    fn test_decode_unknown_code_fails() {
        assert_matches!(
            PermissionId::decode("group-future-thing"),
            Err(TrackerError::UnknownPermission { code }) if code == "group-future-thing"
        );
        assert!(PermissionId::decode("").is_err());
        // Semantic names are not wire codes
        assert!(PermissionId::decode("Owner").is_err());
        // Matching is exact
        assert!(PermissionId::decode("GROUP-AUDIT-VIEW").is_err());
        assert!(PermissionId::decode(" group-audit-view").is_err());
    }

    #[test]
    fn test_owner_is_star() {
        assert_eq!(PermissionId::decode("*").ok(), Some(PermissionId::Owner));
        assert!(PermissionId::Owner.is_owner());
        assert!(!PermissionId::ViewAuditLog.is_owner());
    }

    #[test]
    fn test_order_follows_declaration() {
        let mut sorted = PermissionId::ALL;
        sorted.reverse();
        sorted.sort();
        assert_eq!(sorted, PermissionId::ALL);
        assert!(PermissionId::ManageGroupData < PermissionId::ViewAuditLog);
    }

    #[test]
    fn test_serializes_as_name() {
        let json = serde_json::to_string(&vec![
            PermissionId::ManageGroupData,
            PermissionId::JoinGroupInstances,
        ])
        .unwrap();
        assert_eq!(json, r#"["ManageGroupData","JoinGroupInstances"]"#);
        assert_eq!(
            "ViewAuditLog".parse::<PermissionId>().ok(),
            Some(PermissionId::ViewAuditLog)
        );
    }
}
