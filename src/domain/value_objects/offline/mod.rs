pub mod collection_name;
pub mod idempotency_key;
pub mod operation_id;
pub mod operation_kind;
pub mod operation_payload;
pub mod record_id;

pub use collection_name::CollectionName;
pub use idempotency_key::IdempotencyKey;
pub use operation_id::OperationId;
pub use operation_kind::OperationKind;
pub use operation_payload::{OperationPayload, RECORD_ID_FIELD};
pub use record_id::RecordId;
