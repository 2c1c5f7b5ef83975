use thiserror::Error;

/// Main error type for strava-sync
#[derive(Error, Debug)]
pub enum StravaSyncError {
    #[error("Token refresh failed ({status}): {message}")]
    TokenRefresh { status: u16, message: String },

    #[error("Strava rejected the access token: {0}")]
    Unauthorized(String),

    #[error("Rate limited by Strava. Please wait before retrying.")]
    RateLimited,

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, StravaSyncError>;

impl StravaSyncError {
    /// Create a configuration error from a message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid response error from a message
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Create an invalid parameter error from a message
    pub fn invalid_param(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Create a database error with context about the failed operation
    pub fn database(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Database(format!("{}: {}", context, err))
    }
}

/// Render an error for the terminal, with a hint where one helps.
pub fn format_user_error(err: &StravaSyncError) -> String {
    let hint = match err {
        StravaSyncError::TokenRefresh { .. } | StravaSyncError::Unauthorized(_) => Some(
            "Check STRAVA_CLIENT_ID, STRAVA_CLIENT_SECRET and STRAVA_REFRESH_TOKEN \
             (environment or .env file).",
        ),
        StravaSyncError::RateLimited => {
            Some("Strava allows 100 requests per 15 minutes. Try again later.")
        }
        StravaSyncError::Database(_) => {
            Some("Make sure no other process has the database file open.")
        }
        StravaSyncError::Http(e) if e.is_timeout() => {
            Some("The request timed out. Raise --timeout-secs or check your connection.")
        }
        _ => None,
    };

    match hint {
        Some(hint) => format!("{}\n{}", err, hint),
        None => err.to_string(),
    }
}
