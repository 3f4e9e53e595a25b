//! Group membership enumeration
//!
//! Groups are fetched strictly one after another. Within a group the roster
//! is paged with a fixed page size and a fixed pause after every page; the
//! platform rate-limits the listing endpoint and rejects clients that page
//! faster.

use crate::state::{GroupSnapshot, TrackedState};
use grouptrack_core::effects::{guarded, CancellationToken, PhysicalTimeEffects, PlatformEffects};
use grouptrack_core::{
    CallerIdentity, FetchConfig, GroupId, Member, PageRequest, Result, TrackerError,
};
use std::collections::HashSet;

/// Fetches role catalogs and rosters of tracked groups.
#[derive(Debug, Clone, Default)]
pub struct MembershipFetcher {
    config: FetchConfig,
}

impl MembershipFetcher {
    /// Create a fetcher with the given paging configuration
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }

    /// Fetch every group in order and fold the results into one state.
    ///
    /// Any failure aborts the whole fetch; no partial state is returned.
    pub async fn fetch_groups<E>(
        &self,
        effects: &E,
        cancel: &dyn CancellationToken,
        caller: &CallerIdentity,
        group_ids: &[GroupId],
    ) -> Result<TrackedState>
    where
        E: PlatformEffects + PhysicalTimeEffects,
    {
        let mut snapshots = Vec::with_capacity(group_ids.len());
        for group_id in group_ids {
            snapshots.push(self.fetch_group(effects, cancel, caller, group_id).await?);
        }
        Ok(TrackedState::from_snapshots(snapshots))
    }

    /// Fetch one group's roles and complete roster.
    ///
    /// The caller must be a member of the group. The returned roster holds
    /// exactly one record for the caller, synthesized from the group's
    /// membership record and `caller`.
    pub async fn fetch_group<E>(
        &self,
        effects: &E,
        cancel: &dyn CancellationToken,
        caller: &CallerIdentity,
        group_id: &GroupId,
    ) -> Result<GroupSnapshot>
    where
        E: PlatformEffects + PhysicalTimeEffects,
    {
        let summary = guarded(cancel, effects.group(group_id)).await?;
        tracing::info!(
            "Got Group {}, Members: {}",
            summary.name,
            summary.member_count
        );

        let partial_self = match &summary.my_member {
            Some(me) => me.clone(),
            None => {
                tracing::error!("User must be a member of the group!");
                return Err(TrackerError::not_group_member(group_id.clone()));
            }
        };

        tracing::info!("Getting Group Roles...");
        let roles = guarded(cancel, effects.group_roles(group_id)).await?;

        tracing::info!("Getting Group Members...");
        let mut members = self
            .fetch_roster(effects, cancel, caller, group_id, summary.member_count)
            .await?;

        tracing::info!("Getting Self...");
        members.push(Member::reconcile_self(&partial_self, caller));
        tracing::info!("Got {} Group Members", members.len());

        Ok(GroupSnapshot {
            summary,
            roles,
            members,
        })
    }

    /// Page through the roster until `member_count - 1` distinct non-self
    /// members have been collected.
    async fn fetch_roster<E>(
        &self,
        effects: &E,
        cancel: &dyn CancellationToken,
        caller: &CallerIdentity,
        group_id: &GroupId,
        member_count: usize,
    ) -> Result<Vec<Member>>
    where
        E: PlatformEffects + PhysicalTimeEffects,
    {
        let expected = member_count.saturating_sub(1);
        let mut members: Vec<Member> = Vec::with_capacity(expected);
        let mut seen = HashSet::with_capacity(expected);
        let mut offset = 0;

        while members.len() < expected {
            let page = PageRequest {
                limit: self.config.page_size,
                offset,
                sort: self.config.sort,
            };
            let batch = guarded(cancel, effects.group_members(group_id, page)).await?;
            if batch.is_empty() {
                tracing::error!(
                    "Roster ended after {} of {expected} members",
                    members.len()
                );
                return Err(TrackerError::RosterIncomplete {
                    group_id: group_id.clone(),
                    expected,
                    fetched: members.len(),
                });
            }

            // Offsets index the platform's listing, self entries included
            offset += batch.len();
            for member in batch {
                if member.user_id != caller.id && seen.insert(member.user_id.clone()) {
                    members.push(member);
                }
            }
            tracing::info!("{}", members.len());

            let delay = self.config.page_delay_ms;
            guarded(cancel, async {
                effects.sleep_ms(delay).await.map_err(TrackerError::from)
            })
            .await?;
        }

        if members.len() > expected {
            tracing::warn!(
                "Group {group_id} grew during the fetch: {} members listed, {expected} expected",
                members.len()
            );
        }
        Ok(members)
    }
}
