//! DuckDB storage for synced activities
//!
//! A single file-backed database with one table, `strava_activities`. The
//! store owns its connection for the lifetime of a run; every upsert is an
//! independent auto-committed statement, so rows written before a failure
//! stay committed.

pub mod models;
pub mod schema;

pub use models::ActivityRow;

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use duckdb::{params, Connection};

use crate::error::{Result, StravaSyncError};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const UPSERT_ACTIVITY: &str = "INSERT OR REPLACE INTO strava_activities
    (strava_id, name, \"type\", start_date, elapsed_time_sec, moving_time_sec)
    VALUES (?, ?, ?, CAST(? AS TIMESTAMP), ?, ?)";

const SELECT_ACTIVITY: &str = "SELECT strava_id, name, \"type\", CAST(start_date AS VARCHAR),
    elapsed_time_sec, moving_time_sec
    FROM strava_activities WHERE strava_id = ?";

/// Activity table backed by DuckDB
pub struct ActivityStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl ActivityStore {
    /// Open or create the database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            StravaSyncError::database(&format!("Failed to open {}", path.display()), e)
        })?;

        tracing::debug!(path = %path.display(), "Opened activity database");
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StravaSyncError::database("Failed to open in-memory database", e))?;
        Ok(Self { conn, path: None })
    }

    /// File backing this store, `None` when in memory
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Create the activities table if needed. Safe to call on every run.
    pub fn ensure_schema(&self) -> Result<()> {
        schema::ensure_schema(&self.conn)
    }

    /// Insert a new row, or replace every column of the existing row with the
    /// same `strava_id`. One statement, never a read-then-write.
    pub fn upsert(&self, row: &ActivityRow) -> Result<()> {
        let start_date = row
            .start_date
            .map(|d| d.format(TIMESTAMP_FORMAT).to_string());

        self.conn
            .execute(
                UPSERT_ACTIVITY,
                params![
                    row.strava_id,
                    row.name,
                    row.activity_type,
                    start_date,
                    row.elapsed_time_sec,
                    row.moving_time_sec,
                ],
            )
            .map_err(|e| {
                StravaSyncError::database(&format!("Failed to upsert activity {}", row.strava_id), e)
            })?;

        Ok(())
    }

    /// Look up a stored activity by its Strava id
    pub fn get(&self, strava_id: i64) -> Result<Option<ActivityRow>> {
        let result = self.conn.query_row(SELECT_ACTIVITY, params![strava_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, Option<String>>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<i32>>(4)?,
                row.get::<_, Option<i32>>(5)?,
            ))
        });

        let (id, name, activity_type, start_date, elapsed, moving) = match result {
            Ok(values) => values,
            Err(duckdb::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => {
                return Err(StravaSyncError::database(
                    &format!("Failed to read activity {}", strava_id),
                    e,
                ))
            }
        };

        let start_date = start_date
            .map(|s| parse_timestamp(&s))
            .transpose()?;

        Ok(Some(ActivityRow {
            strava_id: id,
            name,
            activity_type,
            start_date,
            elapsed_time_sec: elapsed,
            moving_time_sec: moving,
        }))
    }

    /// Number of stored activities
    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM strava_activities", [], |row| row.get(0))
            .map_err(|e| StravaSyncError::database("Failed to count activities", e))?;
        Ok(count as u64)
    }

    /// Close the connection, reporting any error DuckDB raises while doing so
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| StravaSyncError::database("Failed to close database", e))
    }
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").map_err(|e| {
        StravaSyncError::Database(format!("Unexpected timestamp '{}' in database: {}", s, e))
    })
}
