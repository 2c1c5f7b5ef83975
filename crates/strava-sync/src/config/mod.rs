//! Run configuration
//!
//! Everything the sync needs is collected into a [`Config`] once at startup
//! and passed by reference to the components that use it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, StravaSyncError};

/// Strava OAuth2 token endpoint
pub const STRAVA_TOKEN_URL: &str = "https://www.strava.com/oauth/token";

/// Strava REST API base URL
pub const STRAVA_API_BASE: &str = "https://www.strava.com/api/v3";

/// Default database location, relative to the working directory
pub const DEFAULT_DB_PATH: &str = "data/fitness.duckdb";

/// Largest page size the activities endpoint accepts
pub const MAX_PER_PAGE: u32 = 200;

/// Default page size
pub const DEFAULT_PER_PAGE: u32 = MAX_PER_PAGE;

/// Default pause between page requests
pub const DEFAULT_PAGE_DELAY_MS: u64 = 200;

/// Default per-request network timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Pre-provisioned Strava application credentials.
///
/// Values are not checked locally; an empty or wrong value surfaces as a
/// rejected token exchange.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Immutable configuration for one sync run
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub db_path: PathBuf,
    pub per_page: u32,
    pub page_delay: Duration,
    pub request_timeout: Duration,
    pub token_url: String,
    pub api_base_url: String,
}

impl Config {
    /// Configuration with the production endpoints and default tuning
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            per_page: DEFAULT_PER_PAGE,
            page_delay: Duration::from_millis(DEFAULT_PAGE_DELAY_MS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            token_url: STRAVA_TOKEN_URL.to_string(),
            api_base_url: STRAVA_API_BASE.to_string(),
        }
    }

    pub fn with_db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = path.into();
        self
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Point the token exchange and the API at other hosts (used by tests)
    pub fn with_endpoints(
        mut self,
        token_url: impl Into<String>,
        api_base_url: impl Into<String>,
    ) -> Self {
        self.token_url = token_url.into();
        self.api_base_url = api_base_url.into();
        self
    }

    /// Check the operational settings. Credentials are left to the remote side.
    pub fn validate(&self) -> Result<()> {
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(StravaSyncError::config(format!(
                "per_page must be between 1 and {}, got {}",
                MAX_PER_PAGE, self.per_page
            )));
        }
        if self.db_path.as_os_str().is_empty() {
            return Err(StravaSyncError::config("database path is empty"));
        }
        if self.request_timeout.is_zero() {
            return Err(StravaSyncError::config("request timeout must be non-zero"));
        }
        Ok(())
    }

    /// Directory that holds the database file, if the path has one
    pub fn storage_dir(&self) -> Option<&Path> {
        self.db_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}
