use crate::application::ports::offline_store::OfflineStore;
use crate::application::ports::remote_backend::RemoteBackend;
use crate::application::services::connectivity_service::ConnectivityMonitor;
use crate::domain::entities::offline::{PendingOperation, SyncFailure, SyncReport};
use crate::domain::value_objects::offline::{OperationKind, RecordId};
use crate::infrastructure::offline::metrics::{
    SyncMetrics, SyncMetricsSnapshot, SyncRunOutcome, SyncRunRecord,
};
use crate::shared::config::SyncConfig;
use crate::shared::error::AppError;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Interval, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncTrigger {
    Manual,
    Reconnect,
    Interval,
}

impl SyncTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncTrigger::Manual => "manual",
            SyncTrigger::Reconnect => "reconnect",
            SyncTrigger::Interval => "interval",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    pub is_syncing: bool,
    pub pending_count: u64,
    pub metrics: SyncMetricsSnapshot,
}

/// Replays queued mutations against the remote backend, oldest first.
///
/// At most one run is active per service; a second call while one is draining
/// gets [`AppError::SyncInProgress`] instead of replaying the same operations twice.
pub struct SyncService {
    store: Arc<dyn OfflineStore>,
    remote: Arc<dyn RemoteBackend>,
    connectivity: Arc<ConnectivityMonitor>,
    config: SyncConfig,
    gate: Mutex<()>,
    running: AtomicBool,
    metrics: Arc<SyncMetrics>,
}

/// Clears the running flag when a guarded run ends, however it ends.
struct RunningFlag<'a>(&'a AtomicBool);

impl<'a> RunningFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for RunningFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl SyncService {
    pub fn new(
        store: Arc<dyn OfflineStore>,
        remote: Arc<dyn RemoteBackend>,
        connectivity: Arc<ConnectivityMonitor>,
        config: SyncConfig,
    ) -> Self {
        Self {
            store,
            remote,
            connectivity,
            config,
            gate: Mutex::new(()),
            running: AtomicBool::new(false),
            metrics: Arc::new(SyncMetrics::new()),
        }
    }

    pub async fn sync(&self) -> Result<SyncReport, AppError> {
        self.sync_with_trigger(SyncTrigger::Manual).await
    }

    pub async fn sync_with_trigger(&self, trigger: SyncTrigger) -> Result<SyncReport, AppError> {
        let _guard = self.gate.try_lock().map_err(|_| AppError::SyncInProgress)?;
        let _running = RunningFlag::raise(&self.running);

        if !self.connectivity.currently_online().await {
            tracing::debug!(target: "offline::sync", trigger = trigger.as_str(), "skipping sync while offline");
            return Err(AppError::Offline);
        }

        match self.drain().await {
            Ok(report) => {
                let outcome = if report.is_success() {
                    SyncRunOutcome::Clean
                } else {
                    SyncRunOutcome::Partial
                };
                self.metrics.record(
                    outcome,
                    &SyncRunRecord {
                        trigger: Some(trigger.as_str().to_string()),
                        synced: report.synced,
                        failed: report.failed,
                        duration_ms: report.duration_ms,
                    },
                );
                Ok(report)
            }
            Err(err) => {
                tracing::warn!(target: "offline::sync", error = %err, "sync run aborted");
                self.metrics.record(
                    SyncRunOutcome::Aborted,
                    &SyncRunRecord {
                        trigger: Some(trigger.as_str().to_string()),
                        ..SyncRunRecord::default()
                    },
                );
                Err(err)
            }
        }
    }

    pub fn is_syncing(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn metrics(&self) -> SyncMetricsSnapshot {
        self.metrics.snapshot()
    }

    pub async fn status(&self) -> Result<SyncStatus, AppError> {
        Ok(SyncStatus {
            is_syncing: self.is_syncing(),
            pending_count: self.store.count_unsynced().await?,
            metrics: self.metrics(),
        })
    }

    /// One pass over the queue. Callers must hold `gate`.
    async fn drain(&self) -> Result<SyncReport, AppError> {
        let started = Instant::now();
        let operations = self.store.list_unsynced().await?;
        let mut report = SyncReport::default();

        for operation in &operations {
            report.attempted += 1;

            let reason = match self.dispatch_with_timeout(operation).await {
                Ok(()) => match self.store.mark_synced(&operation.id).await {
                    Ok(()) => {
                        report.synced += 1;
                        continue;
                    }
                    // stays queued; the replay carries the same idempotency key
                    Err(err) => format!("applied remotely but not marked synced: {err}"),
                },
                Err(err) => err.to_string(),
            };

            tracing::warn!(
                target: "offline::sync",
                operation_id = %operation.id,
                collection = %operation.collection,
                kind = %operation.kind,
                reason = %reason,
                "operation left in queue"
            );
            report.failed += 1;
            report.failures.push(SyncFailure {
                operation_id: operation.id.clone(),
                collection: operation.collection.clone(),
                kind: operation.kind,
                reason,
            });
        }

        report.purged = match self.store.purge_synced().await {
            Ok(purged) => purged,
            Err(err) => {
                tracing::warn!(target: "offline::sync", error = %err, "failed to purge synced operations");
                0
            }
        };
        report.remaining = match self.store.count_unsynced().await {
            Ok(remaining) => remaining,
            Err(err) => {
                tracing::warn!(target: "offline::sync", error = %err, "failed to count remaining operations");
                u64::from(report.failed)
            }
        };
        report.duration_ms = started.elapsed().as_millis() as u64;

        tracing::info!(
            target: "offline::sync",
            attempted = report.attempted,
            synced = report.synced,
            failed = report.failed,
            purged = report.purged,
            remaining = report.remaining,
            duration_ms = report.duration_ms,
            "{}",
            report.summary()
        );
        Ok(report)
    }

    async fn dispatch_with_timeout(&self, operation: &PendingOperation) -> Result<(), AppError> {
        if self.config.operation_timeout_ms == 0 {
            return self.dispatch(operation).await;
        }

        let limit = Duration::from_millis(self.config.operation_timeout_ms);
        tokio::time::timeout(limit, self.dispatch(operation))
            .await
            .map_err(|_| {
                AppError::Timeout(format!(
                    "{} on {} exceeded {}ms",
                    operation.kind, operation.collection, self.config.operation_timeout_ms
                ))
            })?
    }

    async fn dispatch(&self, operation: &PendingOperation) -> Result<(), AppError> {
        match operation.kind {
            OperationKind::Insert => self
                .remote
                .create(
                    &operation.collection,
                    &operation.payload,
                    &operation.idempotency_key,
                )
                .await
                .map(|_| ()),
            OperationKind::Update => {
                let id = required_record_id(operation)?;
                self.remote
                    .update(
                        &operation.collection,
                        &id,
                        &operation.payload.without_record_id(),
                    )
                    .await
            }
            OperationKind::Delete => {
                let id = required_record_id(operation)?;
                self.remote.delete(&operation.collection, &id).await
            }
        }
    }

    /// Runs a sync on every reconnect and, when configured, on a fixed interval.
    pub fn spawn_auto_sync(self: &Arc<Self>) -> JoinHandle<()> {
        let service = Arc::clone(self);
        let mut transitions = service.connectivity.transitions();

        tokio::spawn(async move {
            let mut ticker = periodic_ticker(service.config.auto_sync_interval_secs);

            loop {
                let trigger = tokio::select! {
                    change = transitions.recv() => match change {
                        Ok(change) if change.is_online() && service.config.auto_sync_on_reconnect => {
                            SyncTrigger::Reconnect
                        }
                        Ok(_) => continue,
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::debug!(target: "offline::sync", skipped, "missed connectivity transitions");
                            continue;
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                    _ = next_tick(&mut ticker) => SyncTrigger::Interval,
                };

                service.run_triggered(trigger).await;
            }
        })
    }

    async fn run_triggered(&self, trigger: SyncTrigger) {
        match self.sync_with_trigger(trigger).await {
            Ok(report) => {
                tracing::debug!(
                    target: "offline::sync",
                    trigger = trigger.as_str(),
                    synced = report.synced,
                    failed = report.failed,
                    "automatic sync finished"
                );
            }
            Err(err @ AppError::SyncInProgress) | Err(err @ AppError::Offline) => {
                tracing::debug!(target: "offline::sync", trigger = trigger.as_str(), reason = %err, "automatic sync skipped");
            }
            Err(err) => {
                tracing::error!(target: "offline::sync", trigger = trigger.as_str(), error = %err, "automatic sync failed");
            }
        }
    }
}

fn required_record_id(operation: &PendingOperation) -> Result<RecordId, AppError> {
    operation.record_id().ok_or_else(|| {
        AppError::ValidationError(format!(
            "{} on {} has no record id",
            operation.kind, operation.collection
        ))
    })
}

fn periodic_ticker(interval_secs: u64) -> Option<Interval> {
    if interval_secs == 0 {
        return None;
    }
    let period = Duration::from_secs(interval_secs);
    let mut ticker = interval_at(tokio::time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    Some(ticker)
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
