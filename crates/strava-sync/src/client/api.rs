//! Strava API client for authenticated requests
//!
//! Thin wrapper over `reqwest` that attaches the bearer token, maps HTTP
//! status codes onto [`StravaSyncError`] and decodes JSON bodies. No request
//! is ever retried.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::client::tokens::AccessToken;
use crate::config::Config;
use crate::error::{Result, StravaSyncError};
use crate::models::StravaActivity;

/// Path of the authenticated athlete's activity listing
const ACTIVITIES_PATH: &str = "/athlete/activities";

/// Strava API client
pub struct StravaClient {
    client: Client,
    base_url: String,
}

impl StravaClient {
    /// Create a client for the configured API base URL
    pub fn new(config: &Config) -> Result<Self> {
        Self::new_with_base_url(&config.api_base_url, config.request_timeout)
    }

    /// Create a client with a custom base URL (for testing)
    #[doc(hidden)]
    pub fn new_with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: super::http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build the full URL for a given path
    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build headers with authorization
    fn build_headers(&self, token: &AccessToken) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&token.authorization_header())
            .map_err(|_| StravaSyncError::invalid_response("Access token is not a valid header value"))?;
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    /// Make an authenticated GET request and deserialize the JSON response
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        token: &AccessToken,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.build_url(path);
        let headers = self.build_headers(token)?;

        let response = self
            .client
            .get(&url)
            .headers(headers)
            .query(query)
            .send()
            .await
            .map_err(StravaSyncError::Http)?;

        let response = self.handle_response_status(response).await?;
        response.json().await.map_err(|e| {
            StravaSyncError::invalid_response(format!("Failed to parse JSON response: {}", e))
        })
    }

    /// Fetch one page of the athlete's activities, newest first.
    ///
    /// `page` is 1-based. An empty vector means there are no more pages.
    pub async fn fetch_activities(
        &self,
        token: &AccessToken,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<StravaActivity>> {
        if page == 0 {
            return Err(StravaSyncError::invalid_param("page numbers start at 1"));
        }
        if per_page == 0 {
            return Err(StravaSyncError::invalid_param("per_page must be positive"));
        }

        tracing::debug!(page, per_page, "Fetching activities page");

        let query = [("page", page.to_string()), ("per_page", per_page.to_string())];
        self.get_json(token, ACTIVITIES_PATH, &query).await
    }

    /// Handle response status codes and convert to errors
    async fn handle_response_status(&self, response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), "Strava API request failed");

        match status {
            StatusCode::UNAUTHORIZED => Err(StravaSyncError::Unauthorized(body)),
            StatusCode::TOO_MANY_REQUESTS => Err(StravaSyncError::RateLimited),
            _ => Err(StravaSyncError::Api {
                status: status.as_u16(),
                message: body,
            }),
        }
    }
}
