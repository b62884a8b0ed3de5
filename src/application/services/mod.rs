pub mod connectivity_service;
pub mod offline_service;
pub mod sync_service;

pub use connectivity_service::{ConnectivityMonitor, ConnectivitySubscription};
pub use offline_service::OfflineService;
pub use sync_service::{SyncService, SyncStatus, SyncTrigger};
