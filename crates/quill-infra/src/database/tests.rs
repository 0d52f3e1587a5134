use chrono::{Duration, Utc};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use uuid::Uuid;

use quill_core::domain::{Category, Post};
use quill_core::ports::{CategoryRepository, PostRepository};

use super::entity::{category, post};
use super::postgres::{PostgresCategoryRepository, PostgresPostRepository};

fn category_model(name: &str) -> category::Model {
    let now = Utc::now();
    category::Model {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        is_active: true,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn finds_category_by_id() {
    let model = category_model("Tech");
    let id = model.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model]])
        .into_connection();

    let repo = PostgresCategoryRepository::new(db);

    let found: Option<Category> = repo.find_by_id(id).await.unwrap();

    let found = found.unwrap();
    assert_eq!(found.id, id);
    assert_eq!(found.name, "Tech");
}

#[tokio::test]
async fn maps_published_posts_to_domain() {
    let now = Utc::now();
    let model = post::Model {
        id: Uuid::new_v4(),
        name: "First".to_owned(),
        content: "uno dos tres".to_owned(),
        published_at: (now - Duration::days(1)).into(),
        created_at: now.into(),
        updated_at: now.into(),
    };
    let id = model.id;

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![model]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let posts: Vec<Post> = repo.list_published(now).await.unwrap();

    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, id);
    assert_eq!(posts[0].word_count(), 3);
}

#[tokio::test]
async fn delete_reports_missing_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![
            // association cleanup, then the row itself - neither hits anything
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
        ])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    assert!(!repo.delete(Uuid::new_v4()).await.unwrap());
}
