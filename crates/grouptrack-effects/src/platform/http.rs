//! Live platform handler over HTTPS
//!
//! Session state lives in the client's cookie store: the login request
//! carries basic auth, every later request rides on the `auth` cookie the
//! platform sets in response.

use super::wire::{
    CurrentUserPayload, ErrorEnvelope, GroupPayload, MemberPayload, RolePayload,
    TwoFactorCodePayload, VerifyPayload,
};
use async_trait::async_trait;
use grouptrack_core::effects::{LoginOutcome, PlatformEffects};
use grouptrack_core::{
    ApiConfig, CallerIdentity, Credentials, GroupId, GroupSummary, Member, PageRequest, Result,
    Role, TrackerError,
};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

/// Platform client for the live REST API.
#[derive(Debug, Clone)]
pub struct HttpPlatformHandler {
    client: Client,
    base_url: String,
}

impl HttpPlatformHandler {
    /// Create a client for the configured endpoint
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .cookie_store(true)
            .build()
            .map_err(|e| TrackerError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and decode a JSON body, mapping failures to remote errors.
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(|e| {
            let code = e.status().map(|s| s.as_u16()).unwrap_or(0);
            TrackerError::remote(format!("request failed: {e}"), code)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .ok()
                .filter(|message| !message.is_empty())
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("unexpected status")
                        .to_string()
                });
            return Err(TrackerError::remote(message, status.as_u16()));
        }

        response.json::<T>().await.map_err(|e| {
            TrackerError::remote(format!("invalid response body: {e}"), status.as_u16())
        })
    }
}

#[async_trait]
impl PlatformEffects for HttpPlatformHandler {
    async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome> {
        tracing::debug!("GET /auth/user as {}", credentials.username);
        let request = self
            .client
            .get(self.url("/auth/user"))
            .basic_auth(&credentials.username, Some(&credentials.password));
        let payload: CurrentUserPayload = self.send_json(request).await?;
        Ok(match payload.into_identity() {
            Some(identity) => LoginOutcome::Authenticated(identity),
            None => LoginOutcome::SecondFactorRequired,
        })
    }

    async fn verify_totp(&self, code: &str) -> Result<bool> {
        tracing::debug!("POST /auth/twofactorauth/totp/verify");
        let request = self
            .client
            .post(self.url("/auth/twofactorauth/totp/verify"))
            .json(&TwoFactorCodePayload { code });
        let payload: VerifyPayload = self.send_json(request).await?;
        Ok(payload.verified)
    }

    async fn current_user(&self) -> Result<Option<CallerIdentity>> {
        tracing::debug!("GET /auth/user");
        let request = self.client.get(self.url("/auth/user"));
        let payload: CurrentUserPayload = self.send_json(request).await?;
        Ok(payload.into_identity())
    }

    async fn group(&self, group_id: &GroupId) -> Result<GroupSummary> {
        tracing::debug!("GET /groups/{group_id}");
        let request = self.client.get(self.url(&format!("/groups/{group_id}")));
        let payload: GroupPayload = self.send_json(request).await?;
        Ok(payload.into())
    }

    async fn group_roles(&self, group_id: &GroupId) -> Result<Vec<Role>> {
        tracing::debug!("GET /groups/{group_id}/roles");
        let request = self
            .client
            .get(self.url(&format!("/groups/{group_id}/roles")));
        let payload: Vec<RolePayload> = self.send_json(request).await?;
        Ok(payload.into_iter().map(Role::from).collect())
    }

    async fn group_members(&self, group_id: &GroupId, page: PageRequest) -> Result<Vec<Member>> {
        tracing::debug!(
            "GET /groups/{group_id}/members n={} offset={}",
            page.limit,
            page.offset
        );
        let request = self
            .client
            .get(self.url(&format!("/groups/{group_id}/members")))
            .query(&[
                ("n", page.limit.to_string()),
                ("offset", page.offset.to_string()),
                ("sort", page.sort.as_query().to_string()),
            ]);
        let payload: Vec<MemberPayload> = self.send_json(request).await?;
        Ok(payload.into_iter().map(Member::from).collect())
    }
}
