//! Session login with second-factor fallback
//!
//! The handler follows the per-call effects pattern: the authenticator holds
//! only its configuration and receives the effect system and cancellation
//! token on each call.

use crate::totp::Totp;
use grouptrack_core::effects::{
    guarded, CancellationToken, LoginOutcome, PhysicalTimeEffects, PlatformEffects,
};
use grouptrack_core::{AuthConfig, CallerIdentity, Credentials, Result, TrackerError};

/// Opens an authenticated platform session.
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    config: AuthConfig,
}

impl Authenticator {
    /// Create an authenticator with the given tuning
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Log in and resolve the caller's identity.
    ///
    /// When the platform asks for a second factor, one TOTP code derived from
    /// `totp_secret` is submitted. If the current code would expire within the
    /// safety margin, the run first sleeps into the next step so the code is
    /// still valid when the platform checks it.
    ///
    /// # Errors
    /// - [`TrackerError::Remote`] if any platform call fails, including a
    ///   rejected password
    /// - [`TrackerError::Authentication`] if the secret is malformed or the
    ///   session has no identity after verification
    /// - [`TrackerError::Cancelled`] if `cancel` fires first
    pub async fn authenticate<E>(
        &self,
        effects: &E,
        cancel: &dyn CancellationToken,
        credentials: &Credentials,
        totp_secret: &str,
    ) -> Result<CallerIdentity>
    where
        E: PlatformEffects + PhysicalTimeEffects,
    {
        tracing::info!("Logging in...");
        let identity = match guarded(cancel, effects.login(credentials)).await? {
            LoginOutcome::Authenticated(identity) => identity,
            LoginOutcome::SecondFactorRequired => {
                self.verify_second_factor(effects, cancel, totp_secret)
                    .await?
            }
        };
        tracing::info!("Logged in as {}", identity.display_name);
        Ok(identity)
    }

    async fn verify_second_factor<E>(
        &self,
        effects: &E,
        cancel: &dyn CancellationToken,
        totp_secret: &str,
    ) -> Result<CallerIdentity>
    where
        E: PlatformEffects + PhysicalTimeEffects,
    {
        tracing::info!("2FA needed...");
        let totp = Totp::from_base32(totp_secret)?;

        let mut now = unix_seconds(effects).await?;
        let remaining = totp.remaining_seconds(now);
        if remaining < self.config.safety_margin_secs {
            tracing::info!("Waiting for new token...");
            let wait_ms = (remaining + 1) * 1000;
            guarded(cancel, async {
                effects.sleep_ms(wait_ms).await.map_err(TrackerError::from)
            })
            .await?;
            now = unix_seconds(effects).await?;
        }

        tracing::info!("Using 2FA code...");
        let code = totp.code_at(now)?;
        let verified = guarded(cancel, effects.verify_totp(&code)).await?;
        if !verified {
            tracing::warn!("Platform did not accept the 2FA code");
        }

        match guarded(cancel, effects.current_user()).await? {
            Some(identity) => Ok(identity),
            None => {
                tracing::error!("Failed to validate 2FA!");
                Err(TrackerError::authentication("Failed to validate 2FA"))
            }
        }
    }
}

async fn unix_seconds<E: PhysicalTimeEffects>(effects: &E) -> Result<u64> {
    Ok(effects.physical_time().await?.unix_seconds())
}
