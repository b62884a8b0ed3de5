use crate::common::mocks::{FailingStore, MockRemoteBackend};
use plantera_offline::application::ports::OfflineStore;
use plantera_offline::application::services::{ConnectivityMonitor, OfflineService, SyncService};
use plantera_offline::infrastructure::network::ManualConnectivity;
use plantera_offline::infrastructure::offline::SqliteOfflineStore;
use plantera_offline::shared::config::{DatabaseConfig, SyncConfig};
use std::sync::Arc;
use std::time::Duration;

pub struct OfflineTestContext {
    pub store: Arc<SqliteOfflineStore>,
    pub offline: OfflineService,
}

pub struct SyncTestContext {
    pub store: Arc<SqliteOfflineStore>,
    pub offline: OfflineService,
    pub signal: Arc<ManualConnectivity>,
    pub monitor: Arc<ConnectivityMonitor>,
    pub remote: Arc<MockRemoteBackend>,
    pub sync: Arc<SyncService>,
}

pub async fn setup_offline_service() -> OfflineTestContext {
    setup_offline_service_with(DatabaseConfig::in_memory()).await
}

pub async fn setup_offline_service_with(config: DatabaseConfig) -> OfflineTestContext {
    let store = Arc::new(SqliteOfflineStore::new(config));
    store.initialize().await.expect("offline store");
    OfflineTestContext {
        offline: OfflineService::new(store.clone()),
        store,
    }
}

/// Online, in-memory setup with the given sync settings.
pub async fn setup_sync(config: SyncConfig) -> SyncTestContext {
    let OfflineTestContext { store, offline } = setup_offline_service().await;
    let signal = Arc::new(ManualConnectivity::new(true));
    let dyn_store: Arc<dyn OfflineStore> = store.clone();
    let monitor = Arc::new(ConnectivityMonitor::start(signal.clone(), dyn_store.clone()).await);
    let remote = Arc::new(MockRemoteBackend::new());
    let sync = Arc::new(SyncService::new(
        dyn_store,
        remote.clone(),
        monitor.clone(),
        config,
    ));

    SyncTestContext {
        store,
        offline,
        signal,
        monitor,
        remote,
        sync,
    }
}

pub struct FailingSyncTestContext {
    pub store: Arc<FailingStore>,
    pub offline: OfflineService,
    pub remote: Arc<MockRemoteBackend>,
    pub sync: Arc<SyncService>,
}

/// Online setup whose sync service writes through a [`FailingStore`].
pub async fn setup_sync_with_failing_store() -> FailingSyncTestContext {
    let OfflineTestContext { store, .. } = setup_offline_service().await;
    let store = Arc::new(FailingStore::new(store));
    let dyn_store: Arc<dyn OfflineStore> = store.clone();
    let monitor = Arc::new(
        ConnectivityMonitor::start(Arc::new(ManualConnectivity::new(true)), dyn_store.clone())
            .await,
    );
    let remote = Arc::new(MockRemoteBackend::new());
    let sync = Arc::new(SyncService::new(
        dyn_store.clone(),
        remote.clone(),
        monitor,
        SyncConfig::default(),
    ));

    FailingSyncTestContext {
        offline: OfflineService::new(dyn_store),
        store,
        remote,
        sync,
    }
}

pub async fn setup_sync_default() -> SyncTestContext {
    setup_sync(SyncConfig::default()).await
}

/// Polls `check` until it returns true or two seconds pass.
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while tokio::time::Instant::now() < deadline {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
