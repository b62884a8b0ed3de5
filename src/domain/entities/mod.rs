pub mod offline;

pub use offline::{
    CollectionCacheStatus, ConnectivityChange, ConnectivityState, PendingOperation,
    PendingOperationDraft, SyncFailure, SyncReport,
};
