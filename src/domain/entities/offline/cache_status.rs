use crate::domain::value_objects::offline::CollectionName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionCacheStatus {
    pub collection: CollectionName,
    pub record_count: u64,
    pub refreshed_at: DateTime<Utc>,
}
