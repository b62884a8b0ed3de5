mod mappers;
pub mod metrics;
mod rows;
pub mod sqlite_store;

pub use metrics::{SyncMetrics, SyncMetricsSnapshot, SyncRunOutcome, SyncRunRecord};
pub use sqlite_store::SqliteOfflineStore;
