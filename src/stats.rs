use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Running counters for one sync run.
#[derive(Default)]
pub struct SyncStats {
    start_ms: AtomicU64,

    pages_fetched: AtomicU64,
    skipped: AtomicU64,
    total_scanned: AtomicU64,
    total_sent: AtomicU64,
}

impl SyncStats {
    pub fn new(now_ms: u64) -> Self {
        let s = Self::default();
        s.start_ms.store(now_ms, Ordering::Relaxed);
        s
    }

    pub fn inc_pages(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_scanned(&self) {
        self.total_scanned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_sent(&self) {
        self.total_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, now_ms: u64) -> StatsSnapshot {
        let start = self.start_ms.load(Ordering::Relaxed);
        StatsSnapshot {
            up_sec: now_ms.saturating_sub(start) / 1000,
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            total_scanned: self.total_scanned.load(Ordering::Relaxed),
            total_sent: self.total_sent.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub up_sec: u64,
    pub pages_fetched: u64,
    pub skipped: u64,
    pub total_scanned: u64,
    pub total_sent: u64,
}

pub fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}
