//! Database schema

use duckdb::Connection;

use crate::error::{Result, StravaSyncError};

const CREATE_ACTIVITIES: &str = "CREATE TABLE IF NOT EXISTS strava_activities (
    strava_id BIGINT PRIMARY KEY,
    name TEXT,
    \"type\" TEXT,
    start_date TIMESTAMP,
    elapsed_time_sec INTEGER,
    moving_time_sec INTEGER
)";

/// Create the activities table if it does not exist yet.
/// An existing table is left untouched.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_ACTIVITIES)
        .map_err(|e| StravaSyncError::database("Failed to create strava_activities", e))?;
    Ok(())
}
