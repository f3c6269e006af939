//! Database statistics.
//!
//! # Usage
//!
//! ```rust
//! use algoedb_core::{Database, Query};
//! use algoedb_codec::record;
//!
//! let db = Database::open_in_memory().unwrap();
//! db.insert_one(record! { "name" => "a" }).unwrap();
//! let _ = db.find_one(&Query::new().eq("name", "b"));
//!
//! let stats = db.stats();
//! assert_eq!(stats.inserts, 1);
//! assert_eq!(stats.scans, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Operation counters for one database.
///
/// All counters are atomic and monotonically increasing.
#[derive(Debug, Default)]
pub struct DatabaseStats {
    /// Records inserted.
    inserts: AtomicU64,
    /// Records modified by updates.
    updates: AtomicU64,
    /// Records removed by deletes.
    deletes: AtomicU64,
    /// Full collection scans (one per query evaluation).
    scans: AtomicU64,
    /// Queries that matched nothing on an operation requiring a match.
    misses: AtomicU64,
    /// Successful persists.
    persists: AtomicU64,
    /// Bytes handed to the storage backend by successful persists.
    bytes_written: AtomicU64,
    /// Failed persists.
    persist_failures: AtomicU64,
}

impl DatabaseStats {
    /// Creates a new stats instance.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_inserts(&self, count: u64) {
        self.inserts.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn record_updates(&self, count: u64) {
        self.updates.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn record_deletes(&self, count: u64) {
        self.deletes.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn record_scan(&self) {
        self.scans.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_persist(&self, bytes: u64) {
        self.persists.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    pub(crate) fn record_persist_failure(&self) {
        self.persist_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a snapshot of all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            inserts: self.inserts.load(Ordering::Relaxed),
            updates: self.updates.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            scans: self.scans.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            persists: self.persists.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            persist_failures: self.persist_failures.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of database statistics.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Records inserted.
    pub inserts: u64,
    /// Records modified by updates.
    pub updates: u64,
    /// Records removed by deletes.
    pub deletes: u64,
    /// Full collection scans.
    pub scans: u64,
    /// Queries that matched nothing where a match was required.
    pub misses: u64,
    /// Successful persists.
    pub persists: u64,
    /// Bytes written by successful persists.
    pub bytes_written: u64,
    /// Failed persists.
    pub persist_failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stats_are_zero() {
        let stats = DatabaseStats::new();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn record_operations() {
        let stats = DatabaseStats::new();

        stats.record_inserts(3);
        stats.record_updates(2);
        stats.record_deletes(1);
        stats.record_scan();
        stats.record_miss();
        stats.record_persist(100);
        stats.record_persist(50);
        stats.record_persist_failure();

        let snap = stats.snapshot();
        assert_eq!(snap.inserts, 3);
        assert_eq!(snap.updates, 2);
        assert_eq!(snap.deletes, 1);
        assert_eq!(snap.scans, 1);
        assert_eq!(snap.misses, 1);
        assert_eq!(snap.persists, 2);
        assert_eq!(snap.bytes_written, 150);
        assert_eq!(snap.persist_failures, 1);
    }

    #[test]
    fn concurrent_updates() {
        use std::sync::Arc;
        use std::thread;

        let stats = Arc::new(DatabaseStats::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let s = Arc::clone(&stats);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    s.record_inserts(1);
                    s.record_scan();
                }
            }));
        }

        for h in handles {
            h.join().unwrap();
        }

        let snap = stats.snapshot();
        assert_eq!(snap.inserts, 1000);
        assert_eq!(snap.scans, 1000);
    }
}
