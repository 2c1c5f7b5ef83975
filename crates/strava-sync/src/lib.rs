pub mod cli;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod sync;

pub use config::{Config, Credentials};
pub use error::{Result, StravaSyncError};
