pub mod offline;

pub use offline::{
    CollectionName, IdempotencyKey, OperationId, OperationKind, OperationPayload, RecordId,
};
