//! Progress tracking for a sync run

use std::fmt;
use std::time::{Duration, Instant};

/// Where the run currently is.
///
/// `Init -> Authenticating -> FetchingPage(1) -> Upserting(1) -> FetchingPage(2)
/// -> ... -> Done`, with `FetchingPage(n) -> Done` on the first empty page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Init,
    Authenticating,
    FetchingPage(u32),
    Upserting(u32),
    Done,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncPhase::Init => write!(f, "init"),
            SyncPhase::Authenticating => write!(f, "authenticating"),
            SyncPhase::FetchingPage(page) => write!(f, "fetching page {}", page),
            SyncPhase::Upserting(page) => write!(f, "upserting page {}", page),
            SyncPhase::Done => write!(f, "done"),
        }
    }
}

/// Counters for the current run
#[derive(Debug)]
pub struct SyncProgress {
    phase: SyncPhase,
    fetch_calls: u32,
    pages: u32,
    upserted: u64,
    start_time: Instant,
}

impl Default for SyncProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncProgress {
    pub fn new() -> Self {
        Self {
            phase: SyncPhase::Init,
            fetch_calls: 0,
            pages: 0,
            upserted: 0,
            start_time: Instant::now(),
        }
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn set_phase(&mut self, phase: SyncPhase) {
        tracing::debug!(from = %self.phase, to = %phase, "Sync phase change");
        self.phase = phase;
    }

    /// Count a completed fetch, empty or not
    pub fn record_fetch(&mut self) {
        self.fetch_calls += 1;
    }

    /// Count a page that returned activities and print it
    pub fn record_page(&mut self, page: u32, count: usize) {
        self.pages += 1;
        println!("Page {}: {} activities", page, count);
    }

    pub fn complete_one(&mut self) {
        self.upserted += 1;
    }

    pub fn upserted(&self) -> u64 {
        self.upserted
    }

    pub fn stats(&self) -> SyncStats {
        SyncStats {
            pages: self.pages,
            fetch_calls: self.fetch_calls,
            upserted: self.upserted,
            elapsed: self.start_time.elapsed(),
        }
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct SyncStats {
    /// Pages that returned at least one activity
    pub pages: u32,
    /// Fetches issued, including the final empty page
    pub fetch_calls: u32,
    /// Activities upserted
    pub upserted: u64,
    pub elapsed: Duration,
}

impl fmt::Display for SyncStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} activities from {} pages in {:.1}s",
            self.upserted,
            self.pages,
            self.elapsed.as_secs_f64()
        )
    }
}
