//! Activity data models for the Strava API
//!
//! These structures represent activities returned from
//! `GET /athlete/activities`. Only the fields that are stored are modelled;
//! everything else in the payload is ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary activity as listed by the activities endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StravaActivity {
    /// Unique activity identifier
    pub id: i64,

    /// User-provided or auto-generated activity name
    #[serde(default)]
    pub name: Option<String>,

    /// Legacy activity type ("Run", "Ride", ...)
    #[serde(default, rename = "type")]
    pub activity_type: Option<String>,

    /// Start time in UTC
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,

    /// Elapsed time in seconds (including pauses)
    #[serde(default)]
    pub elapsed_time: Option<i32>,

    /// Moving time in seconds
    #[serde(default)]
    pub moving_time: Option<i32>,
}

impl StravaActivity {
    /// Get a display-friendly name for the activity
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed Activity")
    }

    /// Get the activity type, or "unknown"
    pub fn type_key(&self) -> &str {
        self.activity_type.as_deref().unwrap_or("unknown")
    }

    /// Get elapsed time formatted as H:MM:SS or M:SS
    pub fn duration_formatted(&self) -> String {
        match self.elapsed_time {
            Some(secs) if secs >= 0 => {
                let total_secs = secs as u32;
                let hours = total_secs / 3600;
                let minutes = (total_secs % 3600) / 60;
                let seconds = total_secs % 60;
                if hours > 0 {
                    format!("{}:{:02}:{:02}", hours, minutes, seconds)
                } else {
                    format!("{}:{:02}", minutes, seconds)
                }
            }
            _ => "-".to_string(),
        }
    }

    /// Get the UTC date of the start time
    pub fn date(&self) -> String {
        self.start_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}
