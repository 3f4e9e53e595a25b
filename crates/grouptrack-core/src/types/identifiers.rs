//! Platform identifier types
//!
//! The platform hands out opaque string identifiers (`grp_…`, `usr_…`,
//! `grol_…`, `gmem_…`). Each gets its own newtype so a role id can never be
//! passed where a user id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw platform identifier
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_identifier!(
    /// Identifier of a tracked group
    GroupId
);

string_identifier!(
    /// Stable identifier of a platform account
    UserId
);

string_identifier!(
    /// Identifier of a role within its group
    RoleId
);

string_identifier!(
    /// Identifier of a single membership record
    MembershipId
);

impl GroupId {
    /// Parse a comma-delimited list of group ids.
    ///
    /// Surrounding whitespace is trimmed and repeated ids are kept once, in
    /// first-seen order. Blank entries are rejected.
    pub fn parse_list(input: &str) -> crate::Result<Vec<GroupId>> {
        let mut groups: Vec<GroupId> = Vec::new();
        for raw in input.split(',') {
            let id = raw.trim();
            if id.is_empty() {
                return Err(crate::TrackerError::config(format!(
                    "group list {input:?} contains an empty entry"
                )));
            }
            let id = GroupId::new(id);
            if !groups.contains(&id) {
                groups.push(id);
            }
        }
        Ok(groups)
    }
}
