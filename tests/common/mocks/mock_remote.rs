use async_trait::async_trait;
use plantera_offline::application::ports::{RemoteBackend, RemoteRecord};
use plantera_offline::domain::value_objects::offline::{
    CollectionName, IdempotencyKey, OperationPayload, RecordId,
};
use plantera_offline::shared::error::AppError;
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    Create {
        collection: String,
        payload: Value,
        idempotency_key: String,
    },
    Update {
        collection: String,
        id: String,
        partial: Value,
    },
    Delete {
        collection: String,
        id: String,
    },
}

impl RemoteCall {
    pub fn collection(&self) -> &str {
        match self {
            RemoteCall::Create { collection, .. }
            | RemoteCall::Update { collection, .. }
            | RemoteCall::Delete { collection, .. } => collection,
        }
    }

    pub fn payload_field(&self, field: &str) -> Option<&Value> {
        match self {
            RemoteCall::Create { payload, .. } => payload.get(field),
            RemoteCall::Update { partial, .. } => partial.get(field),
            RemoteCall::Delete { .. } => None,
        }
    }
}

type CallPredicate = Box<dyn Fn(&RemoteCall) -> bool + Send + Sync>;

/// Records every call and answers according to scripted rules.
#[derive(Default)]
pub struct MockRemoteBackend {
    attempts: Mutex<Vec<RemoteCall>>,
    applied: Mutex<Vec<RemoteCall>>,
    fail_when: Mutex<Option<CallPredicate>>,
    hang_when: Mutex<Option<CallPredicate>>,
    delay: Mutex<Option<Duration>>,
}

impl MockRemoteBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_where<F>(&self, predicate: F)
    where
        F: Fn(&RemoteCall) -> bool + Send + Sync + 'static,
    {
        *self.fail_when.lock().unwrap() = Some(Box::new(predicate));
    }

    /// Matching calls never complete.
    pub fn hang_where<F>(&self, predicate: F)
    where
        F: Fn(&RemoteCall) -> bool + Send + Sync + 'static,
    {
        *self.hang_when.lock().unwrap() = Some(Box::new(predicate));
    }

    pub fn clear_failures(&self) {
        *self.fail_when.lock().unwrap() = None;
        *self.hang_when.lock().unwrap() = None;
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Every call received, including the ones that failed.
    pub fn attempts(&self) -> Vec<RemoteCall> {
        self.attempts.lock().unwrap().clone()
    }

    /// Calls that succeeded, in the order they were applied.
    pub fn applied(&self) -> Vec<RemoteCall> {
        self.applied.lock().unwrap().clone()
    }

    async fn handle(&self, call: RemoteCall) -> Result<(), AppError> {
        self.attempts.lock().unwrap().push(call.clone());

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let hang = self
            .hang_when
            .lock()
            .unwrap()
            .as_ref()
            .map(|predicate| predicate(&call))
            .unwrap_or(false);
        if hang {
            std::future::pending::<()>().await;
        }

        let fail = self
            .fail_when
            .lock()
            .unwrap()
            .as_ref()
            .map(|predicate| predicate(&call))
            .unwrap_or(false);
        if fail {
            return Err(AppError::Remote(format!(
                "scripted failure for {}",
                call.collection()
            )));
        }

        self.applied.lock().unwrap().push(call);
        Ok(())
    }
}

#[async_trait]
impl RemoteBackend for MockRemoteBackend {
    async fn create(
        &self,
        collection: &CollectionName,
        payload: &OperationPayload,
        idempotency_key: &IdempotencyKey,
    ) -> Result<RemoteRecord, AppError> {
        let data = payload.clone().into_value();
        self.handle(RemoteCall::Create {
            collection: collection.to_string(),
            payload: data.clone(),
            idempotency_key: idempotency_key.as_str().to_string(),
        })
        .await?;
        Ok(RemoteRecord {
            id: payload.record_id(),
            data,
        })
    }

    async fn update(
        &self,
        collection: &CollectionName,
        id: &RecordId,
        partial: &OperationPayload,
    ) -> Result<(), AppError> {
        self.handle(RemoteCall::Update {
            collection: collection.to_string(),
            id: id.as_str().to_string(),
            partial: partial.clone().into_value(),
        })
        .await
    }

    async fn delete(&self, collection: &CollectionName, id: &RecordId) -> Result<(), AppError> {
        self.handle(RemoteCall::Delete {
            collection: collection.to_string(),
            id: id.as_str().to_string(),
        })
        .await
    }
}
