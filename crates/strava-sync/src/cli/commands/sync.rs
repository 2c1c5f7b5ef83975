//! Sync command for strava-sync

use crate::config::Config;
use crate::error::Result;
use crate::sync::{SyncEngine, SyncStats};

/// Run one full sync and print the summary
pub async fn run(config: &Config) -> Result<SyncStats> {
    println!("Using database: {}", config.db_path.display());

    let mut engine = SyncEngine::new(config)?;
    let stats = engine.run().await?;

    println!("Done. Upserted {} activities.", stats.upserted);
    tracing::info!(summary = %stats, "Sync complete");

    Ok(stats)
}
