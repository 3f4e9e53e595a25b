//! Effective permission aggregation
//!
//! A user's effective set is the union of the permissions of every role they
//! hold in any tracked group. Holding `Owner` anywhere expands to the whole
//! universe.

use crate::state::TrackedState;
use grouptrack_core::{Member, PermissionId, ReportKey, Result, RoleId, UserReport};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Reduces fetched state to a per-user permission report.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionAggregator {
    key: ReportKey,
}

impl PermissionAggregator {
    /// Create an aggregator keying users by `key`
    pub fn new(key: ReportKey) -> Self {
        Self { key }
    }

    /// Compute the effective permissions of every tracked member.
    ///
    /// Every role is decoded before any member is looked at, so a single
    /// unknown permission code fails the whole report. Members whose role ids
    /// match no fetched role simply contribute nothing for those ids.
    pub fn aggregate(&self, state: &TrackedState) -> Result<UserReport> {
        let mut grants: HashMap<&RoleId, Vec<PermissionId>> =
            HashMap::with_capacity(state.roles.len());
        for role in &state.roles {
            grants
                .entry(&role.id)
                .or_default()
                .extend(role.decoded_permissions()?);
        }

        let mut held: BTreeMap<&str, BTreeSet<&RoleId>> = BTreeMap::new();
        for member in &state.members {
            held.entry(self.key_of(member))
                .or_default()
                .extend(member.role_ids.iter());
        }

        let mut report = UserReport::new();
        for (user, role_ids) in held {
            let effective: BTreeSet<PermissionId> = role_ids
                .into_iter()
                .filter_map(|id| grants.get(id))
                .flatten()
                .copied()
                .collect();
            let permissions = if effective.iter().any(|p| p.is_owner()) {
                PermissionId::ALL.to_vec()
            } else {
                effective.into_iter().collect()
            };
            report.insert(user, permissions);
        }

        tracing::debug!("Aggregated permissions for {} users", report.len());
        Ok(report)
    }

    fn key_of<'a>(&self, member: &'a Member) -> &'a str {
        match self.key {
            ReportKey::DisplayName => member.display_name(),
            ReportKey::UserId => member.user_id.as_str(),
        }
    }
}
