//! Data models for Strava API responses

pub mod activity;

pub use activity::StravaActivity;
