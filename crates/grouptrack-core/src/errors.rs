//! Unified error system for group tracking
//!
//! Every failure in a run is fatal, so a single error type carries enough
//! context for the diagnostic and for the process exit status.

use crate::types::identifiers::GroupId;
use serde::{Deserialize, Serialize};

/// Unified error type for all tracking operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum TrackerError {
    /// Malformed arguments or configuration, detected before any remote call
    #[error("Invalid configuration: {message}")]
    Config {
        /// What was wrong with the input
        message: String,
    },

    /// Login rejected, or second-factor verification did not resolve identity
    #[error("Authentication failed: {message}")]
    Authentication {
        /// Why authentication failed
        message: String,
    },

    /// The caller is not a member of a requested group
    #[error("User must be a member of group {group_id}")]
    NotGroupMember {
        /// The group the caller could not read
        group_id: GroupId,
    },

    /// A remote API call failed
    #[error("Exception when calling API: {message} (status code {code})")]
    Remote {
        /// Message reported by the platform or transport
        message: String,
        /// HTTP status, or 0 when no response was received
        code: u16,
    },

    /// The platform returned a permission code outside the known table
    #[error("Unknown permission code: {code:?}")]
    UnknownPermission {
        /// The unrecognized wire code
        code: String,
    },

    /// Roster listing ran dry before the advertised member count was reached
    #[error("Roster for group {group_id} ended after {fetched} of {expected} members")]
    RosterIncomplete {
        /// Group being enumerated
        group_id: GroupId,
        /// Non-self members the group metadata advertised
        expected: usize,
        /// Non-self members actually received
        fetched: usize,
    },

    /// The run was interrupted by the operator
    #[error("Operation cancelled")]
    Cancelled,

    /// Local file system failure while emitting the report
    #[error("I/O error: {message}")]
    Io {
        /// Error message describing the I/O failure
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message describing the serialization failure
        message: String,
    },
}

impl TrackerError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create a not-a-member error
    pub fn not_group_member(group_id: GroupId) -> Self {
        Self::NotGroupMember { group_id }
    }

    /// Create a remote call error
    pub fn remote(message: impl Into<String>, code: u16) -> Self {
        Self::Remote {
            message: message.into(),
            code,
        }
    }

    /// Create an unknown permission error
    pub fn unknown_permission(code: impl Into<String>) -> Self {
        Self::UnknownPermission { code: code.into() }
    }

    /// Create an I/O error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Process exit status for this failure. Never zero.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config { .. } => 2,
            Self::Authentication { .. } => 3,
            Self::NotGroupMember { .. } => 4,
            Self::Remote { .. } => 5,
            Self::UnknownPermission { .. } => 6,
            Self::RosterIncomplete { .. } => 7,
            Self::Cancelled => 130,
            Self::Io { .. } | Self::Serialization { .. } => 1,
        }
    }
}

/// Standard Result type for tracking operations
pub type Result<T> = std::result::Result<T, TrackerError>;

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TrackerError::remote("Missing Credentials", 401);
        assert!(err.to_string().contains("Missing Credentials"));
        assert!(err.to_string().contains("401"));

        let err = TrackerError::not_group_member(GroupId::new("grp_1"));
        assert!(err.to_string().contains("grp_1"));

        let err = TrackerError::unknown_permission("group-future-thing");
        assert!(err.to_string().contains("group-future-thing"));
    }

    #[test]
    fn test_exit_codes_are_never_success() {
        let errors = [
            TrackerError::config("x"),
            TrackerError::authentication("x"),
            TrackerError::not_group_member(GroupId::new("grp_1")),
            TrackerError::remote("x", 500),
            TrackerError::unknown_permission("x"),
            TrackerError::RosterIncomplete {
                group_id: GroupId::new("grp_1"),
                expected: 2,
                fetched: 1,
            },
            TrackerError::Cancelled,
            TrackerError::io("x"),
            TrackerError::serialization("x"),
        ];
        for err in errors {
            assert_ne!(err.exit_code(), 0, "{err}");
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: TrackerError = io.into();
        assert!(matches!(err, TrackerError::Io { .. }));
    }
}
