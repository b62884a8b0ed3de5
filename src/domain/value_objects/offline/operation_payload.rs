use super::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field carrying the target record identifier in update/delete payloads.
pub const RECORD_ID_FIELD: &str = "id";

/// Field-name to value mapping of a queued mutation. Always a JSON object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperationPayload(Map<String, Value>);

impl OperationPayload {
    pub fn new(value: Value) -> Result<Self, String> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Err("Operation payload cannot be null".to_string()),
            _ => Err("Operation payload must be a JSON object".to_string()),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| format!("Invalid JSON payload: {e}"))?;
        Self::new(value)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn record_id(&self) -> Option<RecordId> {
        self.0.get(RECORD_ID_FIELD).and_then(RecordId::from_json)
    }

    /// The payload minus the identifier field, i.e. the partial update to apply.
    pub fn without_record_id(&self) -> OperationPayload {
        let mut map = self.0.clone();
        map.remove(RECORD_ID_FIELD);
        OperationPayload(map)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<OperationPayload> for Value {
    fn from(payload: OperationPayload) -> Self {
        payload.into_value()
    }
}
