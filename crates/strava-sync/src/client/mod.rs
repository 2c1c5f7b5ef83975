pub mod api;
pub mod tokens;

pub use api::StravaClient;
pub use tokens::{AccessToken, TokenProvider, TokenResponse};

use std::time::Duration;

use reqwest::Client;

use crate::error::{Result, StravaSyncError};

/// User agent sent with every request
const USER_AGENT: &str = concat!("strava-sync/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by the token exchange and the API client
pub(crate) fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(StravaSyncError::Http)
}
