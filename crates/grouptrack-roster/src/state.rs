//! Fetched group state
//!
//! Each group fetch yields an immutable `GroupSnapshot`; the run folds them
//! into one `TrackedState` before aggregation starts.

use grouptrack_core::{GroupSummary, Member, Role};

/// Roles and complete roster of one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSnapshot {
    /// Group metadata at fetch time
    pub summary: GroupSummary,
    /// Role catalog
    pub roles: Vec<Role>,
    /// Every member, the caller included
    pub members: Vec<Member>,
}

/// Every role and member across all tracked groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedState {
    /// Roles of every tracked group
    pub roles: Vec<Role>,
    /// Members of every tracked group
    pub members: Vec<Member>,
}

impl TrackedState {
    /// Fold group snapshots into one state, preserving group order
    pub fn from_snapshots(snapshots: impl IntoIterator<Item = GroupSnapshot>) -> Self {
        snapshots
            .into_iter()
            .fold(TrackedState::default(), |mut state, snapshot| {
                state.roles.extend(snapshot.roles);
                state.members.extend(snapshot.members);
                state
            })
    }
}
