use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifier of a record in the remote backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: String) -> Result<Self, String> {
        if value.trim().is_empty() {
            return Err("Record ID cannot be empty".to_string());
        }
        Ok(Self(value))
    }

    /// Backends hand out both uuid strings and integer keys.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::new(s.clone()).ok(),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RecordId> for String {
    fn from(value: RecordId) -> Self {
        value.0
    }
}
