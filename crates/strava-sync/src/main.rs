use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use strava_sync::cli::commands;
use strava_sync::config::{
    Config, Credentials, DEFAULT_DB_PATH, DEFAULT_PAGE_DELAY_MS, DEFAULT_PER_PAGE,
    DEFAULT_REQUEST_TIMEOUT_SECS, MAX_PER_PAGE,
};
use tracing_subscriber::EnvFilter;

/// Pull your Strava activities into a local DuckDB database.
///
/// Running without arguments performs one full sync using the credentials
/// from the environment (or a .env file).
#[derive(Parser)]
#[command(name = "strava-sync")]
#[command(author, version)]
struct Cli {
    /// Strava application client ID
    #[arg(long, env = "STRAVA_CLIENT_ID", default_value = "", hide_env_values = true)]
    client_id: String,

    /// Strava application client secret
    #[arg(long, env = "STRAVA_CLIENT_SECRET", default_value = "", hide_env_values = true)]
    client_secret: String,

    /// Long-lived refresh token for the athlete
    #[arg(long, env = "STRAVA_REFRESH_TOKEN", default_value = "", hide_env_values = true)]
    refresh_token: String,

    /// Database file path
    #[arg(long, env = "STRAVA_DB_PATH", default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Activities requested per page
    #[arg(
        long,
        env = "STRAVA_PER_PAGE",
        default_value_t = DEFAULT_PER_PAGE,
        value_parser = clap::value_parser!(u32).range(1..=MAX_PER_PAGE as i64)
    )]
    per_page: u32,

    /// Pause between page requests, in milliseconds
    #[arg(long, default_value_t = DEFAULT_PAGE_DELAY_MS)]
    page_delay_ms: u64,

    /// Per-request network timeout, in seconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: u64,
}

impl Cli {
    fn into_config(self) -> Config {
        let credentials = Credentials::new(self.client_id, self.client_secret, self.refresh_token);
        Config::new(credentials)
            .with_db_path(self.db)
            .with_per_page(self.per_page)
            .with_page_delay(Duration::from_millis(self.page_delay_ms))
            .with_request_timeout(Duration::from_secs(self.timeout_secs))
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("strava_sync=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // .env is optional; real environment variables take precedence
    dotenvy::dotenv().ok();
    init_logging();

    let config = Cli::parse().into_config();

    if let Err(e) = commands::sync_run(&config).await {
        eprintln!("Error: {}", strava_sync::error::format_user_error(&e));
        std::process::exit(1);
    }
}
