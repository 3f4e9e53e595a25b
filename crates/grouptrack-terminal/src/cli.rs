//! Command-line arguments
//!
//! Everything here is validated before the first remote call; a bad argument
//! never leaves a half-open session behind.

use clap::Parser;
use grouptrack_core::{Credentials, GroupId, Result, TrackerConfig, TrackerError};
use std::path::PathBuf;

/// Effective group permission report for tracked groups
#[derive(Debug, Clone, Parser)]
#[command(name = "grouptrack")]
#[command(about = "Report the effective permissions of every member of the tracked groups", long_about = None)]
pub struct Cli {
    /// Workspace root
    #[arg(short, long, default_value = ".")]
    pub workspace: PathBuf,

    /// Output directory, relative to the workspace
    #[arg(short, long, default_value = "output")]
    pub output: PathBuf,

    /// Platform username or email
    #[arg(short, long, env = "GROUPTRACK_USERNAME")]
    pub username: String,

    /// Platform password
    #[arg(short, long, env = "GROUPTRACK_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Comma-separated group ids to track
    #[arg(short, long)]
    pub groups: String,

    /// Base32 TOTP shared secret
    #[arg(short, long, env = "GROUPTRACK_TOTP_KEY", hide_env_values = true)]
    pub key: String,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Validated per-run inputs.
#[derive(Debug, Clone)]
pub struct RunInputs {
    /// Login credentials
    pub credentials: Credentials,
    /// TOTP shared secret
    pub totp_secret: String,
    /// Groups to track, in request order
    pub group_ids: Vec<GroupId>,
    /// Directory the report is written into
    pub output_dir: PathBuf,
}

impl Cli {
    /// Validate the arguments into run inputs.
    pub fn inputs(&self) -> Result<RunInputs> {
        let username = non_blank("username", &self.username)?;
        non_blank("password", &self.password)?;
        let totp_secret = non_blank("key", &self.key)?;
        let group_ids = GroupId::parse_list(&self.groups)?;

        Ok(RunInputs {
            credentials: Credentials::new(username, self.password.as_str()),
            totp_secret: totp_secret.to_string(),
            group_ids,
            output_dir: self.workspace.join(&self.output),
        })
    }

    /// Load the configuration file, or defaults when none was given.
    pub fn load_config(&self) -> Result<TrackerConfig> {
        match &self.config {
            Some(path) => TrackerConfig::load_from_file(path),
            None => Ok(TrackerConfig::default()),
        }
    }
}

fn non_blank<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TrackerError::config(format!("--{field} must not be empty")));
    }
    Ok(trimmed)
}
