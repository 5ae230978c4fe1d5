// ABOUTME: Integration tests for the SQLite task store
// ABOUTME: Runs against an in-memory database with migrations applied

use pretty_assertions::assert_eq;
use todolist_core::{TaskChanges, TaskCreateInput};
use todolist_storage::{SqliteTaskStore, TaskRepository, TaskStore, TaskTransaction};

async fn create_test_store() -> SqliteTaskStore {
    SqliteTaskStore::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to create in-memory store")
}

fn input(title: &str, completed: bool) -> TaskCreateInput {
    TaskCreateInput {
        title: title.to_string(),
        description: format!("{} description", title),
        completed,
    }
}

#[tokio::test]
async fn test_insert_assigns_id_and_initial_version() {
    let store = create_test_store().await;
    let mut conn = store.connection().await.unwrap();

    let task = conn.insert(&input("Buy milk", false)).await.unwrap();

    assert!(task.id >= 1);
    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.description, "Buy milk description");
    assert!(!task.completed);
    assert_eq!(task.version, 0);
    assert_eq!(task.created_at, task.updated_at);
}

#[tokio::test]
async fn test_find_by_id_missing_returns_none() {
    let store = create_test_store().await;
    let mut conn = store.connection().await.unwrap();

    assert!(conn.find_by_id(42).await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_page_is_newest_first() {
    let store = create_test_store().await;
    let mut conn = store.connection().await.unwrap();

    let first = conn.insert(&input("first", false)).await.unwrap();
    let second = conn.insert(&input("second", false)).await.unwrap();
    let third = conn.insert(&input("third", true)).await.unwrap();

    let (page, total) = conn.find_page(2, 0).await.unwrap();
    assert_eq!(total, 3);
    assert_eq!(
        page.iter().map(|t| t.id).collect::<Vec<_>>(),
        vec![third.id, second.id]
    );

    let (page, total) = conn.find_page(2, 2).await.unwrap();
    assert_eq!(total, 3);
    assert_eq!(page.iter().map(|t| t.id).collect::<Vec<_>>(), vec![first.id]);
}

#[tokio::test]
async fn test_update_bumps_version_and_only_touches_given_fields() {
    let store = create_test_store().await;
    let mut conn = store.connection().await.unwrap();
    let task = conn.insert(&input("original", false)).await.unwrap();

    let changes = TaskChanges {
        title: Some("renamed".to_string()),
        ..Default::default()
    };
    let affected = conn.update(task.id, &changes, task.version).await.unwrap();
    assert_eq!(affected, 1);

    let stored = conn.find_by_id(task.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "renamed");
    assert_eq!(stored.description, "original description");
    assert_eq!(stored.version, 1);
    assert!(stored.updated_at >= task.updated_at);
    assert_eq!(stored.created_at, task.created_at);
}

#[tokio::test]
async fn test_update_with_stale_version_affects_nothing() {
    let store = create_test_store().await;
    let mut conn = store.connection().await.unwrap();
    let task = conn.insert(&input("original", false)).await.unwrap();

    let changes = TaskChanges {
        completed: Some(true),
        ..Default::default()
    };
    let affected = conn.update(task.id, &changes, task.version + 3).await.unwrap();
    assert_eq!(affected, 0);

    let stored = conn.find_by_id(task.id).await.unwrap().unwrap();
    assert!(!stored.completed);
    assert_eq!(stored.version, 0);
}

#[tokio::test]
async fn test_empty_changes_still_bump_version() {
    let store = create_test_store().await;
    let mut conn = store.connection().await.unwrap();
    let task = conn.insert(&input("idle", false)).await.unwrap();

    let affected = conn
        .update(task.id, &TaskChanges::default(), task.version)
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let stored = conn.find_by_id(task.id).await.unwrap().unwrap();
    assert_eq!(stored.version, 1);
}

#[tokio::test]
async fn test_delete_removes_row() {
    let store = create_test_store().await;
    let mut conn = store.connection().await.unwrap();
    let task = conn.insert(&input("doomed", false)).await.unwrap();

    assert_eq!(conn.delete(&task).await.unwrap(), 1);
    assert!(conn.find_by_id(task.id).await.unwrap().is_none());
    assert_eq!(conn.delete(&task).await.unwrap(), 0);
}

#[tokio::test]
async fn test_transaction_commit_and_rollback() {
    let store = create_test_store().await;

    let mut tx = store.begin().await.unwrap();
    let kept = tx.insert(&input("kept", false)).await.unwrap();
    tx.commit().await.unwrap();

    let mut tx = store.begin().await.unwrap();
    let discarded = tx.insert(&input("discarded", false)).await.unwrap();
    tx.rollback().await.unwrap();

    let mut conn = store.connection().await.unwrap();
    assert!(conn.find_by_id(kept.id).await.unwrap().is_some());
    assert!(conn.find_by_id(discarded.id).await.unwrap().is_none());
}
