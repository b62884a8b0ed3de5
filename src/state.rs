use crate::application::ports::connectivity::ConnectivitySignal;
use crate::application::ports::offline_store::OfflineStore;
use crate::application::ports::remote_backend::RemoteBackend;
use crate::application::services::{ConnectivityMonitor, OfflineService, SyncService};
use crate::infrastructure::offline::SqliteOfflineStore;
use crate::shared::config::AppConfig;
use crate::shared::error::AppError;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Everything the offline layer needs, wired once and passed explicitly to callers.
pub struct OfflineContext {
    pub config: AppConfig,
    pub offline_service: Arc<OfflineService>,
    pub connectivity: Arc<ConnectivityMonitor>,
    pub sync_service: Arc<SyncService>,
    store: Arc<SqliteOfflineStore>,
    background_tasks: Vec<JoinHandle<()>>,
}

impl OfflineContext {
    pub async fn new(
        config: AppConfig,
        signal: Arc<dyn ConnectivitySignal>,
        remote: Arc<dyn RemoteBackend>,
    ) -> Result<Self, AppError> {
        config.validate().map_err(AppError::ConfigurationError)?;

        let store = Arc::new(SqliteOfflineStore::new(config.database.clone()));
        store.initialize().await?;
        let dyn_store: Arc<dyn OfflineStore> = store.clone();

        let offline_service = Arc::new(OfflineService::new(Arc::clone(&dyn_store)));
        let connectivity =
            Arc::new(ConnectivityMonitor::start(signal, Arc::clone(&dyn_store)).await);
        let sync_service = Arc::new(SyncService::new(
            dyn_store,
            remote,
            Arc::clone(&connectivity),
            config.sync.clone(),
        ));

        tracing::info!(
            target: "offline::store",
            database = %config.database.url,
            "offline context ready"
        );

        Ok(Self {
            config,
            offline_service,
            connectivity,
            sync_service,
            store,
            background_tasks: Vec::new(),
        })
    }

    pub fn store(&self) -> Arc<dyn OfflineStore> {
        self.store.clone()
    }

    /// Starts the connectivity poller and the automatic sync loop. Calling it twice is a no-op.
    pub fn start_background_tasks(&mut self) {
        if !self.background_tasks.is_empty() {
            return;
        }
        let poll_interval = Duration::from_secs(self.config.network.poll_interval_secs);
        self.background_tasks
            .push(self.connectivity.spawn_poller(poll_interval));
        self.background_tasks
            .push(self.sync_service.spawn_auto_sync());
    }

    pub async fn shutdown(mut self) {
        for task in self.background_tasks.drain(..) {
            task.abort();
        }
        self.store.close().await;
    }
}
