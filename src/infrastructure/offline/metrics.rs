use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SyncRunOutcome {
    /// every attempted operation was applied
    Clean,
    /// at least one operation stayed queued
    Partial,
    /// the run did not get to drain (offline, storage failure)
    Aborted,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SyncMetricsSnapshot {
    pub total_runs: u64,
    pub operations_synced: u64,
    pub operations_failed: u64,
    pub consecutive_unclean_runs: u64,
    pub last_outcome: Option<SyncRunOutcome>,
    pub last_trigger: Option<String>,
    pub last_duration_ms: Option<u64>,
    pub last_run_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncRunRecord {
    pub trigger: Option<String>,
    pub synced: u32,
    pub failed: u32,
    pub duration_ms: u64,
}

#[derive(Default, Clone)]
struct LastRunMetadata {
    outcome: Option<SyncRunOutcome>,
    trigger: Option<String>,
    duration_ms: Option<u64>,
}

/// Counters for one sync service; kept per instance so tests do not share state.
pub struct SyncMetrics {
    runs: AtomicU64,
    synced: AtomicU64,
    failed: AtomicU64,
    consecutive_unclean: AtomicU64,
    last_run_ms: AtomicU64,
    metadata: Mutex<LastRunMetadata>,
}

impl SyncMetrics {
    pub fn new() -> Self {
        Self {
            runs: AtomicU64::new(0),
            synced: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            consecutive_unclean: AtomicU64::new(0),
            last_run_ms: AtomicU64::new(0),
            metadata: Mutex::new(LastRunMetadata::default()),
        }
    }

    pub fn record(&self, outcome: SyncRunOutcome, run: &SyncRunRecord) {
        self.runs.fetch_add(1, Ordering::Relaxed);
        self.synced
            .fetch_add(u64::from(run.synced), Ordering::Relaxed);
        self.failed
            .fetch_add(u64::from(run.failed), Ordering::Relaxed);
        match outcome {
            SyncRunOutcome::Clean => self.consecutive_unclean.store(0, Ordering::Relaxed),
            SyncRunOutcome::Partial | SyncRunOutcome::Aborted => {
                self.consecutive_unclean.fetch_add(1, Ordering::Relaxed);
            }
        }
        self.last_run_ms.store(current_unix_ms(), Ordering::Relaxed);

        if let Ok(mut guard) = self.metadata.lock() {
            guard.outcome = Some(outcome);
            guard.trigger = run.trigger.clone();
            guard.duration_ms = Some(run.duration_ms);
        }
    }

    pub fn snapshot(&self) -> SyncMetricsSnapshot {
        let metadata = self
            .metadata
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default();

        SyncMetricsSnapshot {
            total_runs: self.runs.load(Ordering::Relaxed),
            operations_synced: self.synced.load(Ordering::Relaxed),
            operations_failed: self.failed.load(Ordering::Relaxed),
            consecutive_unclean_runs: self.consecutive_unclean.load(Ordering::Relaxed),
            last_outcome: metadata.outcome,
            last_trigger: metadata.trigger,
            last_duration_ms: metadata.duration_ms,
            last_run_ms: to_option(self.last_run_ms.load(Ordering::Relaxed)),
        }
    }
}

impl Default for SyncMetrics {
    fn default() -> Self {
        Self::new()
    }
}

fn to_option(value: u64) -> Option<u64> {
    if value == 0 {
        None
    } else {
        Some(value)
    }
}

fn current_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_unclean_resets_on_clean_run() {
        let metrics = SyncMetrics::new();
        assert_eq!(metrics.snapshot().last_outcome, None);

        metrics.record(
            SyncRunOutcome::Partial,
            &SyncRunRecord {
                trigger: Some("manual".into()),
                synced: 2,
                failed: 1,
                duration_ms: 40,
            },
        );
        metrics.record(SyncRunOutcome::Aborted, &SyncRunRecord::default());

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_runs, 2);
        assert_eq!(snapshot.operations_synced, 2);
        assert_eq!(snapshot.operations_failed, 1);
        assert_eq!(snapshot.consecutive_unclean_runs, 2);
        assert_eq!(snapshot.last_outcome, Some(SyncRunOutcome::Aborted));

        metrics.record(
            SyncRunOutcome::Clean,
            &SyncRunRecord {
                trigger: Some("reconnect".into()),
                synced: 1,
                failed: 0,
                duration_ms: 5,
            },
        );
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.consecutive_unclean_runs, 0);
        assert_eq!(snapshot.last_trigger.as_deref(), Some("reconnect"));
        assert!(snapshot.last_run_ms.is_some());
    }
}
