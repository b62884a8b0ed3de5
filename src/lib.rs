pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
pub mod state;

pub use application::ports::{ConnectivitySignal, OfflineStore, RemoteBackend, RemoteRecord};
pub use application::services::{
    ConnectivityMonitor, ConnectivitySubscription, OfflineService, SyncService, SyncStatus,
    SyncTrigger,
};
pub use domain::entities::offline::{
    CollectionCacheStatus, ConnectivityChange, ConnectivityState, PendingOperation,
    PendingOperationDraft, SyncFailure, SyncReport,
};
pub use domain::value_objects::offline::{
    CollectionName, IdempotencyKey, OperationId, OperationKind, OperationPayload, RecordId,
};
pub use shared::{AppConfig, AppError, Result};
pub use state::OfflineContext;
