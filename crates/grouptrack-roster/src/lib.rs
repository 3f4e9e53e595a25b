//! Grouptrack Roster
//!
//! Turns an authenticated session into a permission report:
//!
//! - `MembershipFetcher`: role catalog and full roster of each tracked group,
//!   paged and throttled, with the caller's own record reconciled
//! - `TrackedState`: every role and member across all tracked groups
//! - `PermissionAggregator`: effective permissions per user
//! - `ReportEmitter`: the `data.json` artifact
//!
//! # Example
//!
//! ```ignore
//! let state = MembershipFetcher::new(config.fetch)
//!     .fetch_groups(&effects, &cancel, &caller, &group_ids)
//!     .await?;
//! let report = PermissionAggregator::new(ReportKey::DisplayName).aggregate(&state)?;
//! ReportEmitter::new(output_dir).emit(&report)?;
//! ```

pub mod aggregator;
pub mod fetcher;
pub mod report;
pub mod state;

pub use aggregator::PermissionAggregator;
pub use fetcher::MembershipFetcher;
pub use report::ReportEmitter;
pub use state::{GroupSnapshot, TrackedState};
