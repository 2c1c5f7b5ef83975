//! Sync module for Strava activity synchronization
//!
//! One linear pipeline: refresh the access token once, then walk the
//! activity listing page by page, upserting every record, until Strava
//! returns an empty page. Everything runs sequentially; any error ends the
//! run and whatever was already upserted stays in the database.

pub mod progress;
pub mod rate_limiter;

pub use progress::{SyncPhase, SyncProgress, SyncStats};
pub use rate_limiter::RateLimiter;

use crate::client::{AccessToken, StravaClient, TokenProvider};
use crate::config::{ensure_dir, Config};
use crate::db::{ActivityRow, ActivityStore};
use crate::Result;

/// Sync engine for orchestrating one run
pub struct SyncEngine<'a> {
    config: &'a Config,
    tokens: TokenProvider,
    client: StravaClient,
    rate_limiter: RateLimiter,
    progress: SyncProgress,
}

impl<'a> SyncEngine<'a> {
    /// Build the engine and its HTTP clients from the configuration
    pub fn new(config: &'a Config) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            tokens: TokenProvider::new(config)?,
            client: StravaClient::new(config)?,
            rate_limiter: RateLimiter::new(config.page_delay),
            progress: SyncProgress::new(),
        })
    }

    pub fn phase(&self) -> SyncPhase {
        self.progress.phase()
    }

    /// Run a full sync and return what it did
    pub async fn run(&mut self) -> Result<SyncStats> {
        if let Some(dir) = self.config.storage_dir() {
            ensure_dir(dir)?;
        }

        self.progress.set_phase(SyncPhase::Authenticating);
        println!("Refreshing access token...");
        let token = self.tokens.refresh().await?;

        println!("Connecting to DuckDB...");
        let store = ActivityStore::open(&self.config.db_path)?;
        store.ensure_schema()?;

        println!("Fetching activities from Strava...");
        let stats = self.sync_pages(&token, &store).await?;

        store.close()?;
        Ok(stats)
    }

    /// Fetch pages from 1 upward until one comes back empty
    async fn sync_pages(
        &mut self,
        token: &AccessToken,
        store: &ActivityStore,
    ) -> Result<SyncStats> {
        let per_page = self.config.per_page;
        let mut page: u32 = 1;

        loop {
            self.progress.set_phase(SyncPhase::FetchingPage(page));
            let activities = self.client.fetch_activities(token, page, per_page).await?;
            self.progress.record_fetch();

            if activities.is_empty() {
                break;
            }

            self.progress.record_page(page, activities.len());
            self.progress.set_phase(SyncPhase::Upserting(page));

            for activity in &activities {
                store.upsert(&ActivityRow::from(activity))?;
                self.progress.complete_one();
                tracing::debug!(
                    id = activity.id,
                    activity_name = activity.display_name(),
                    kind = activity.type_key(),
                    date = %activity.date(),
                    duration = %activity.duration_formatted(),
                    "Upserted activity"
                );
            }

            page += 1;
            self.rate_limiter.pause().await;
        }

        self.progress.set_phase(SyncPhase::Done);
        let stats = self.progress.stats();
        tracing::info!(
            upserted = stats.upserted,
            pages = stats.pages,
            fetch_calls = stats.fetch_calls,
            "Sync finished"
        );
        Ok(stats)
    }
}
