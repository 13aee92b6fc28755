//! Integration tests for subtask CRUD, including parent scoping.

use ralph_core::types::Priority;
use ralph_db::models::subtask::UpdateSubtask;
use ralph_db::repositories::{SubtaskRepo, TodoRepo};
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn list_is_oldest_first(pool: PgPool) {
    let todo = TodoRepo::create(&pool, "parent", None, Priority::Medium)
        .await
        .unwrap();

    SubtaskRepo::create(&pool, todo.id, "first").await.unwrap();
    SubtaskRepo::create(&pool, todo.id, "second").await.unwrap();
    SubtaskRepo::create(&pool, todo.id, "third").await.unwrap();

    let subtasks = SubtaskRepo::list_for_todo(&pool, todo.id).await.unwrap();
    let titles: Vec<&str> = subtasks.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, ["first", "second", "third"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn update_merges_partial_fields(pool: PgPool) {
    let todo = TodoRepo::create(&pool, "parent", None, Priority::Medium)
        .await
        .unwrap();
    let subtask = SubtaskRepo::create(&pool, todo.id, "step").await.unwrap();

    let changes = UpdateSubtask {
        completed: Some(true),
        ..UpdateSubtask::default()
    };
    let updated = SubtaskRepo::update(&pool, todo.id, subtask.id, &changes)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.title, "step");
    assert!(updated.completed);
}

#[sqlx::test(migrations = "./migrations")]
async fn update_is_scoped_to_the_parent(pool: PgPool) {
    let owner = TodoRepo::create(&pool, "owner", None, Priority::Medium)
        .await
        .unwrap();
    let other = TodoRepo::create(&pool, "other", None, Priority::Medium)
        .await
        .unwrap();
    let subtask = SubtaskRepo::create(&pool, owner.id, "step").await.unwrap();

    // The right id under the wrong parent behaves like a missing row.
    let changes = UpdateSubtask {
        completed: Some(true),
        ..UpdateSubtask::default()
    };
    let result = SubtaskRepo::update(&pool, other.id, subtask.id, &changes)
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_is_scoped_to_the_parent(pool: PgPool) {
    let owner = TodoRepo::create(&pool, "owner", None, Priority::Medium)
        .await
        .unwrap();
    let other = TodoRepo::create(&pool, "other", None, Priority::Medium)
        .await
        .unwrap();
    let subtask = SubtaskRepo::create(&pool, owner.id, "step").await.unwrap();

    assert!(!SubtaskRepo::delete(&pool, other.id, subtask.id).await.unwrap());
    assert!(SubtaskRepo::delete(&pool, owner.id, subtask.id).await.unwrap());

    let remaining = SubtaskRepo::list_for_todo(&pool, owner.id).await.unwrap();
    assert!(remaining.is_empty());
}
