//! Database models matching schema tables

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::StravaActivity;

/// One row of `strava_activities`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRow {
    pub strava_id: i64,
    pub name: Option<String>,
    pub activity_type: Option<String>,
    /// UTC start time, stored without an offset
    pub start_date: Option<NaiveDateTime>,
    pub elapsed_time_sec: Option<i32>,
    pub moving_time_sec: Option<i32>,
}

impl From<&StravaActivity> for ActivityRow {
    fn from(activity: &StravaActivity) -> Self {
        Self {
            strava_id: activity.id,
            name: activity.name.clone(),
            activity_type: activity.activity_type.clone(),
            start_date: activity.start_date.map(|d| d.naive_utc()),
            elapsed_time_sec: activity.elapsed_time,
            moving_time_sec: activity.moving_time,
        }
    }
}
