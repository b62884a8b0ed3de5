pub mod cache_status;
pub mod connectivity;
pub mod pending_operation;
pub mod sync_report;

pub use cache_status::CollectionCacheStatus;
pub use connectivity::{ConnectivityChange, ConnectivityState};
pub use pending_operation::{PendingOperation, PendingOperationDraft};
pub use sync_report::{SyncFailure, SyncReport};
