//! Run orchestration: authenticate, fetch, aggregate, emit

use crate::cli::{Cli, RunInputs};
use grouptrack_authentication::Authenticator;
use grouptrack_core::effects::{CancellationToken, PhysicalTimeEffects, PlatformEffects};
use grouptrack_core::{verify_code_table, Result, TrackerConfig, UserReport};
use grouptrack_effects::{EffectSystem, HttpPlatformHandler, RealTimeHandler};
use grouptrack_roster::{MembershipFetcher, PermissionAggregator, ReportEmitter};
use std::path::PathBuf;

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// The emitted report
    pub report: UserReport,
    /// Where it was written
    pub path: PathBuf,
}

/// Run against the live platform.
///
/// Arguments, configuration and the permission table are all checked before
/// the first remote call.
pub async fn run(cli: &Cli, cancel: &dyn CancellationToken) -> Result<RunSummary> {
    verify_code_table()?;
    let config = cli.load_config()?;
    let inputs = cli.inputs()?;

    let effects = EffectSystem::new(HttpPlatformHandler::new(&config.api)?, RealTimeHandler::new());
    execute(&effects, cancel, &config, &inputs).await
}

/// Run the pipeline on any effect system.
pub async fn execute<E>(
    effects: &E,
    cancel: &dyn CancellationToken,
    config: &TrackerConfig,
    inputs: &RunInputs,
) -> Result<RunSummary>
where
    E: PlatformEffects + PhysicalTimeEffects,
{
    let caller = Authenticator::new(config.auth.clone())
        .authenticate(effects, cancel, &inputs.credentials, &inputs.totp_secret)
        .await?;

    let state = MembershipFetcher::new(config.fetch.clone())
        .fetch_groups(effects, cancel, &caller, &inputs.group_ids)
        .await?;

    let report = PermissionAggregator::new(config.report.key).aggregate(&state)?;
    println!("{}", ReportEmitter::to_json(&report)?);

    let path = ReportEmitter::new(inputs.output_dir.clone()).emit(&report)?;
    Ok(RunSummary { report, path })
}
