use std::fmt;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::config::{Config, Credentials};
use crate::error::{Result, StravaSyncError};

/// Body returned by the token endpoint.
///
/// Only `access_token` is required for a sync; everything else is optional so
/// that a missing access token is reported as such instead of a parse error.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl TokenResponse {
    /// Extract the access token, failing if it is absent or empty.
    pub fn into_access_token(self) -> Result<AccessToken> {
        let token = self
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| StravaSyncError::invalid_response("Token response missing access_token"))?;

        Ok(AccessToken {
            token,
            expires_at: self.expires_at.and_then(|ts| DateTime::from_timestamp(ts, 0)),
        })
    }
}

/// Short-lived bearer token for API requests.
/// Lives for one run and is never written anywhere.
#[derive(Clone, PartialEq)]
pub struct AccessToken {
    token: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_at: None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Returns the Authorization header value.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Exchanges the long-lived refresh token for an access token
pub struct TokenProvider {
    client: Client,
    token_url: String,
    credentials: Credentials,
}

impl TokenProvider {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: super::http_client(config.request_timeout)?,
            token_url: config.token_url.clone(),
            credentials: config.credentials.clone(),
        })
    }

    /// Perform the `refresh_token` grant. Any failure is final.
    pub async fn refresh(&self) -> Result<AccessToken> {
        tracing::debug!(url = %self.token_url, "Exchanging refresh token");

        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("refresh_token", self.credentials.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(StravaSyncError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Token refresh rejected");
            return Err(StravaSyncError::TokenRefresh {
                status: status.as_u16(),
                message,
            });
        }

        let body: TokenResponse = response.json().await.map_err(|e| {
            StravaSyncError::invalid_response(format!("Failed to parse token response: {}", e))
        })?;

        if let Some(rotated) = body.refresh_token.as_deref() {
            if !rotated.is_empty() && rotated != self.credentials.refresh_token {
                tracing::warn!("Strava issued a new refresh token; update STRAVA_REFRESH_TOKEN");
            }
        }

        let token = body.into_access_token()?;
        tracing::info!(expires_at = ?token.expires_at(), "Access token refreshed");
        Ok(token)
    }
}
