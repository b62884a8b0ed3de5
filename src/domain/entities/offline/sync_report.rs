use crate::domain::value_objects::offline::{CollectionName, OperationId, OperationKind};
use serde::{Deserialize, Serialize};

/// One operation the remote backend did not accept during a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncFailure {
    pub operation_id: OperationId,
    pub collection: CollectionName,
    pub kind: OperationKind,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncReport {
    pub attempted: u32,
    pub synced: u32,
    pub failed: u32,
    pub purged: u64,
    /// Unsynced operations left in the queue after cleanup.
    pub remaining: u64,
    pub duration_ms: u64,
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn summary(&self) -> String {
        match self.failed {
            0 if self.attempted == 0 => "Nothing to sync".to_string(),
            0 => format!("{} operations synced", self.synced),
            1 => "1 operation could not be synced".to_string(),
            n => format!("{n} operations could not be synced"),
        }
    }
}
