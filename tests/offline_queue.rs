mod common;

use common::setup_offline_service;
use plantera_offline::application::ports::OfflineStore;
use plantera_offline::domain::value_objects::offline::{CollectionName, OperationId, OperationKind};
use plantera_offline::shared::error::AppError;
use serde_json::json;
use std::collections::HashSet;

#[tokio::test]
async fn unsynced_operations_list_in_enqueue_order() {
    let ctx = setup_offline_service().await;

    let first = ctx
        .offline
        .record_mutation("crops", OperationKind::Insert, json!({"name": "Tomato"}))
        .await
        .unwrap();
    let second = ctx
        .offline
        .record_mutation("harvest_records", OperationKind::Insert, json!({"kg": 3}))
        .await
        .unwrap();
    let third = ctx
        .offline
        .record_mutation("crops", OperationKind::Update, json!({"id": "7", "stage": "flowering"}))
        .await
        .unwrap();

    let ids: Vec<_> = ctx
        .offline
        .list_unsynced()
        .await
        .unwrap()
        .into_iter()
        .map(|op| op.id)
        .collect();
    assert_eq!(ids, vec![first.id, second.id, third.id]);
}

#[tokio::test]
async fn enqueue_assigns_unique_ids_and_keys() {
    let ctx = setup_offline_service().await;

    for n in 0..25 {
        ctx.offline
            .record_mutation("tasks", OperationKind::Insert, json!({"n": n}))
            .await
            .unwrap();
    }

    let pending = ctx.offline.list_unsynced().await.unwrap();
    let ids: HashSet<_> = pending.iter().map(|op| op.id.clone()).collect();
    let keys: HashSet<_> = pending.iter().map(|op| op.idempotency_key.clone()).collect();
    assert_eq!(ids.len(), 25);
    assert_eq!(keys.len(), 25);
    assert!(pending.windows(2).all(|w| w[0].seq < w[1].seq));
}

#[tokio::test]
async fn purge_removes_only_synced_operations() {
    let ctx = setup_offline_service().await;

    let keep = ctx
        .offline
        .record_mutation("crops", OperationKind::Insert, json!({"name": "Kale"}))
        .await
        .unwrap();
    let done = ctx
        .offline
        .record_mutation("crops", OperationKind::Insert, json!({"name": "Leek"}))
        .await
        .unwrap();

    ctx.store.mark_synced(&done.id).await.unwrap();
    let marked = ctx.store.get(&done.id).await.unwrap().unwrap();
    assert!(marked.synced);

    let unsynced = ctx.offline.list_unsynced().await.unwrap();
    assert_eq!(unsynced.len(), 1);
    assert_eq!(unsynced[0].id, keep.id);

    assert_eq!(ctx.store.purge_synced().await.unwrap(), 1);
    assert!(ctx.store.get(&done.id).await.unwrap().is_none());
    assert!(ctx.store.get(&keep.id).await.unwrap().is_some());

    // nothing left to purge
    assert_eq!(ctx.store.purge_synced().await.unwrap(), 0);
}

#[tokio::test]
async fn marking_unknown_operation_is_a_no_op() {
    let ctx = setup_offline_service().await;
    ctx.offline
        .record_mutation("crops", OperationKind::Insert, json!({"name": "Okra"}))
        .await
        .unwrap();

    let missing = OperationId::generate();
    ctx.store.mark_synced(&missing).await.unwrap();

    assert_eq!(ctx.offline.pending_count().await.unwrap(), 1);
}

#[tokio::test]
async fn update_and_delete_require_record_id() {
    let ctx = setup_offline_service().await;

    for kind in [OperationKind::Update, OperationKind::Delete] {
        let err = ctx
            .offline
            .record_mutation("crops", kind, json!({"stage": "seedling"}))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)), "{kind}: {err}");
    }
    assert_eq!(ctx.offline.pending_count().await.unwrap(), 0);
}

#[tokio::test]
async fn cache_replacement_is_wholesale() {
    let ctx = setup_offline_service().await;
    let crops = CollectionName::new("crops".into()).unwrap();
    let tasks = CollectionName::new("tasks".into()).unwrap();

    ctx.offline
        .refresh_cache(&crops, vec![json!({"id": "1"}), json!({"id": "2"})])
        .await
        .unwrap();
    ctx.offline
        .refresh_cache(&tasks, vec![json!({"id": "t1"})])
        .await
        .unwrap();
    ctx.offline
        .refresh_cache(&crops, vec![json!({"id": "3"})])
        .await
        .unwrap();

    assert_eq!(
        ctx.offline.cached_records(&crops).await.unwrap(),
        vec![json!({"id": "3"})]
    );
    assert_eq!(ctx.offline.cached_records(&tasks).await.unwrap().len(), 1);

    ctx.offline.refresh_cache(&crops, Vec::new()).await.unwrap();
    assert!(ctx.offline.cached_records(&crops).await.unwrap().is_empty());
}

#[tokio::test]
async fn cache_is_independent_of_queue() {
    let ctx = setup_offline_service().await;
    let crops = CollectionName::new("crops".into()).unwrap();

    ctx.offline
        .record_mutation("crops", OperationKind::Insert, json!({"name": "Bean"}))
        .await
        .unwrap();
    ctx.offline
        .refresh_cache(&crops, vec![json!({"id": "1", "name": "Pea"})])
        .await
        .unwrap();

    assert_eq!(ctx.offline.pending_count().await.unwrap(), 1);
    assert_eq!(ctx.offline.cached_records(&crops).await.unwrap().len(), 1);
}

#[tokio::test]
async fn concurrent_enqueues_are_all_kept() {
    let ctx = setup_offline_service().await;

    let writes = (0..10).map(|n| {
        ctx.offline
            .record_mutation("harvest_records", OperationKind::Insert, json!({"crate": n}))
    });
    let results = futures::future::join_all(writes).await;

    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(ctx.offline.pending_count().await.unwrap(), 10);
}
