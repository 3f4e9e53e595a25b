//! Run configuration
//!
//! Every tunable has a default matching the platform's documented limits, so
//! the configuration file is optional. Values from the file are validated
//! before any remote call is made.

pub mod validation;

use crate::errors::{Result, TrackerError};
use crate::types::model::MemberSort;
use serde::{Deserialize, Serialize};
use std::path::Path;
use validation::ConfigValidator;

/// Largest page the member listing accepts.
pub const MAX_PAGE_SIZE: usize = 100;

/// Length of one TOTP step in seconds.
pub const TOTP_STEP_SECS: u64 = 30;

/// Complete configuration of a tracking run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    /// Remote API endpoint settings
    pub api: ApiConfig,
    /// Authentication tuning
    pub auth: AuthConfig,
    /// Roster fetch tuning
    pub fetch: FetchConfig,
    /// Report layout
    pub report: ReportConfig,
}

impl TrackerConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TrackerError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: TrackerConfig = toml::from_str(content)
            .map_err(|e| TrackerError::config(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let mut validator = ConfigValidator::new();
        validator
            .require("api.base_url", &self.api.base_url)
            .require("api.user_agent", &self.api.user_agent)
            .range(
                "auth.safety_margin_secs",
                self.auth.safety_margin_secs,
                0,
                TOTP_STEP_SECS - 1,
            )
            .range(
                "fetch.page_size",
                self.fetch.page_size as u64,
                1,
                MAX_PAGE_SIZE as u64,
            );
        validator.finish()
    }
}

/// Remote API endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the API, without trailing slash
    pub base_url: String,
    /// User-Agent header; the platform rejects requests without a contact
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.vrchat.cloud/api/1".to_string(),
            user_agent: concat!("grouptrack/", env!("CARGO_PKG_VERSION"), " admin%40kemocade.com")
                .to_string(),
        }
    }
}

/// Authentication tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    /// Minimum seconds a TOTP code must stay valid when submitted
    pub safety_margin_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            safety_margin_secs: 5,
        }
    }
}

/// Roster fetch tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Members requested per page
    pub page_size: usize,
    /// Pause after each page request, in milliseconds
    pub page_delay_ms: u64,
    /// Roster ordering
    pub sort: MemberSort,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
            page_delay_ms: 1000,
            sort: MemberSort::JoinedAtAsc,
        }
    }
}

/// Report layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// What identifies a user in the report
    pub key: ReportKey,
}

/// Grouping key for the permission report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKey {
    /// Display name; accounts sharing a name are merged
    #[default]
    DisplayName,
    /// Stable account id
    UserId,
}
