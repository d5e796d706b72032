//! Resolves the caller of a request to an [`Identity`].
//!
//! A bearer token is checked against a Supabase-compatible auth endpoint.
//! Without a valid token, the `X-Device-Id` header identifies an anonymous
//! device. A request with neither is rejected.

use crate::error::ApiError;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ttobak_types::{DeviceId, Identity, UserId};

/// Header carrying the anonymous device identifier.
pub const DEVICE_ID_HEADER: &str = "x-device-id";

/// Auth provider settings. Sign-in is disabled unless both are set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupabaseConfig {
    /// Project URL (e.g. `https://xyz.supabase.co`).
    pub url: Option<String>,
    /// Public anon key.
    pub anon_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SupabaseUser {
    id: String,
    email: Option<String>,
}

/// Client for the auth provider's user endpoint.
pub struct SupabaseAuth {
    config: SupabaseConfig,
    client: Client,
}

impl SupabaseAuth {
    pub fn new(config: SupabaseConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Returns true if bearer tokens can be checked.
    pub fn is_configured(&self) -> bool {
        self.endpoint().is_some()
    }

    fn endpoint(&self) -> Option<(String, &str)> {
        let url = self.config.url.as_deref().filter(|u| !u.is_empty())?;
        let key = self.config.anon_key.as_deref().filter(|k| !k.is_empty())?;
        Some((format!("{}/auth/v1/user", url.trim_end_matches('/')), key))
    }

    /// Looks up the user owning `token`. Any failure yields no user.
    pub async fn lookup(&self, token: &str) -> Option<(UserId, Option<String>)> {
        let (url, anon_key) = self.endpoint()?;

        let response = match self
            .client
            .get(url)
            .header("apikey", anon_key)
            .bearer_auth(token)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Auth lookup failed");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(status = %response.status(), "Bearer token rejected");
            return None;
        }

        let user: SupabaseUser = match response.json().await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Failed to parse auth user");
                return None;
            }
        };

        match UserId::parse(&user.id) {
            Ok(id) => Some((id, user.email)),
            Err(e) => {
                warn!(id = %user.id, error = %e, "Auth user id is not a UUID");
                None
            }
        }
    }

    /// Resolves the request's identity.
    ///
    /// A valid bearer token wins; otherwise a well-formed device id is used.
    pub async fn resolve(&self, headers: &HeaderMap) -> Result<Identity, ApiError> {
        if let Some(token) = bearer_token(headers) {
            if let Some((user_id, email)) = self.lookup(token).await {
                return Ok(Identity::authenticated(user_id, email));
            }
        }

        match headers.get(DEVICE_ID_HEADER) {
            Some(value) => {
                let raw = value
                    .to_str()
                    .map_err(|_| ApiError::bad_request("invalid X-Device-Id header"))?;
                let device_id = DeviceId::parse(raw)
                    .map_err(|_| ApiError::bad_request("invalid X-Device-Id header"))?;
                Ok(Identity::anonymous(device_id))
            }
            None => Err(ApiError::unauthorized()),
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
