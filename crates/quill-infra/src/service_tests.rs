//! Service-behavior tests over the in-memory store.
//!
//! These exercise the category/post services end to end at the service
//! seam: uniqueness, active filtering, publish gating, atomic category-set
//! replacement, and cascade behavior on both delete directions.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use quill_core::DomainError;
use quill_core::domain::word_count;
use quill_core::service::{CategoryInput, CategoryService, PostInput, PostService};

use crate::database::InMemoryStore;

const CONTENT: &str = "Lorem ipsum dolor sit amet, consectetuer adipiscing elit. \
     Aenean commodo ligula eget dolor. Aenean massa.";

fn services() -> (CategoryService, PostService) {
    let store = Arc::new(InMemoryStore::new());
    (
        CategoryService::new(store.clone()),
        PostService::new(store),
    )
}

fn category_input(name: &str, is_active: bool) -> CategoryInput {
    CategoryInput {
        name: Some(name.to_owned()),
        is_active: Some(is_active),
    }
}

fn post_input(name: &str, published_at: &str, categories: Vec<Uuid>) -> PostInput {
    PostInput {
        name: Some(name.to_owned()),
        content: Some(CONTENT.to_owned()),
        published_at: Some(published_at.to_owned()),
        categories,
    }
}

fn yesterday() -> String {
    (Utc::now() - Duration::days(1)).to_rfc3339()
}

fn tomorrow() -> String {
    (Utc::now() + Duration::days(1)).to_rfc3339()
}

#[track_caller]
fn assert_violation_on(result: Result<impl std::fmt::Debug, DomainError>, field: &str) {
    match result {
        Err(DomainError::Validation(errors)) => {
            assert!(
                errors.errors().iter().any(|e| e.field == field),
                "expected a violation on `{field}`, got: {errors}"
            );
        }
        other => panic!("expected a validation failure, got {other:?}"),
    }
}

#[track_caller]
fn assert_not_found(result: Result<impl std::fmt::Debug, DomainError>) {
    match result {
        Err(DomainError::NotFound { .. }) => {}
        other => panic!("expected not-found, got {other:?}"),
    }
}

#[tokio::test]
async fn category_create_rejects_duplicate_name() {
    let (categories, _) = services();

    categories
        .create(category_input("Tech", true))
        .await
        .unwrap();

    assert_violation_on(categories.create(category_input("Tech", true)).await, "name");
}

#[tokio::test]
async fn category_create_requires_name_and_is_active() {
    let (categories, _) = services();

    let result = categories.create(CategoryInput::default()).await;
    match result {
        Err(DomainError::Validation(errors)) => {
            let fields: Vec<&str> = errors.errors().iter().map(|e| e.field.as_str()).collect();
            assert!(fields.contains(&"name"));
            assert!(fields.contains(&"is_active"));
        }
        other => panic!("expected a validation failure, got {other:?}"),
    }

    assert_violation_on(
        categories
            .create(CategoryInput {
                name: Some("   ".to_owned()),
                is_active: Some(true),
            })
            .await,
        "name",
    );
}

#[tokio::test]
async fn category_update_to_own_name_succeeds() {
    let (categories, _) = services();

    let tech = categories
        .create(category_input("Tech", true))
        .await
        .unwrap();

    // Self-rename is not a collision.
    let updated = categories
        .update(tech.id, category_input("Tech", false))
        .await
        .unwrap();
    assert_eq!(updated.name, "Tech");
    assert!(!updated.is_active);
}

#[tokio::test]
async fn category_update_rejects_name_of_another() {
    let (categories, _) = services();

    categories
        .create(category_input("Tech", true))
        .await
        .unwrap();
    let other = categories
        .create(category_input("Cooking", true))
        .await
        .unwrap();

    assert_violation_on(
        categories.update(other.id, category_input("Tech", true)).await,
        "name",
    );
}

#[tokio::test]
async fn category_list_excludes_inactive() {
    let (categories, _) = services();

    let active = categories
        .create(category_input("Visible", true))
        .await
        .unwrap();
    categories
        .create(category_input("Hidden", false))
        .await
        .unwrap();

    let listed = categories.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].0.id, active.id);
}

#[tokio::test]
async fn category_list_counts_only_published_posts() {
    let (categories, posts) = services();

    let tech = categories
        .create(category_input("Tech", true))
        .await
        .unwrap();

    posts
        .create(post_input("Out", &yesterday(), vec![tech.id]))
        .await
        .unwrap();
    posts
        .create(post_input("Scheduled", &tomorrow(), vec![tech.id]))
        .await
        .unwrap();

    let listed = categories.list().await.unwrap();
    assert_eq!(listed[0].1, 1);
}

#[tokio::test]
async fn category_detail_lists_published_posts_with_word_count() {
    let (categories, posts) = services();

    let tech = categories
        .create(category_input("Tech", true))
        .await
        .unwrap();
    let published = posts
        .create(post_input("Out", &yesterday(), vec![tech.id]))
        .await
        .unwrap();
    posts
        .create(post_input("Scheduled", &tomorrow(), vec![tech.id]))
        .await
        .unwrap();

    let detail = categories.get(tech.id).await.unwrap();
    assert_eq!(detail.category.id, tech.id);
    assert_eq!(detail.published_posts.len(), 1);
    assert_eq!(detail.published_posts[0].id, published.id);
    assert_eq!(
        detail.published_posts[0].word_count(),
        word_count::count(CONTENT)
    );
}

#[tokio::test]
async fn category_operations_on_unknown_id_are_not_found() {
    let (categories, _) = services();
    let missing = Uuid::new_v4();

    assert_not_found(categories.get(missing).await);
    assert_not_found(categories.update(missing, category_input("X", true)).await);
    assert_not_found(categories.delete(missing).await);
}

#[tokio::test]
async fn category_delete_is_not_idempotent() {
    let (categories, _) = services();

    let tech = categories
        .create(category_input("Tech", true))
        .await
        .unwrap();

    categories.delete(tech.id).await.unwrap();
    assert_not_found(categories.delete(tech.id).await);
}

#[tokio::test]
async fn category_delete_detaches_but_keeps_posts() {
    let (categories, posts) = services();

    let tech = categories
        .create(category_input("Tech", true))
        .await
        .unwrap();
    let post = posts
        .create(post_input("Out", &yesterday(), vec![tech.id]))
        .await
        .unwrap();

    categories.delete(tech.id).await.unwrap();

    let detail = posts.get(post.id).await.unwrap();
    assert!(detail.categories.is_empty());
}

#[tokio::test]
async fn post_create_validates_fields() {
    let (categories, posts) = services();

    let tech = categories
        .create(category_input("Tech", true))
        .await
        .unwrap();

    assert_violation_on(
        posts
            .create(PostInput {
                name: Some("".to_owned()),
                ..post_input("x", &yesterday(), vec![tech.id])
            })
            .await,
        "name",
    );

    assert_violation_on(
        posts
            .create(PostInput {
                content: Some("Lor".to_owned()),
                ..post_input("Post", &yesterday(), vec![tech.id])
            })
            .await,
        "content",
    );

    assert_violation_on(
        posts
            .create(post_input("Post", "no es una fecha", vec![tech.id]))
            .await,
        "published_at",
    );

    // Everything missing at once: each field reports.
    let result = posts.create(PostInput::default()).await;
    match result {
        Err(DomainError::Validation(errors)) => assert_eq!(errors.errors().len(), 3),
        other => panic!("expected a validation failure, got {other:?}"),
    }
}

#[tokio::test]
async fn post_create_rejects_unknown_category_and_writes_nothing() {
    let (categories, posts) = services();

    let tech = categories
        .create(category_input("Tech", true))
        .await
        .unwrap();

    assert_violation_on(
        posts
            .create(post_input(
                "Post",
                &yesterday(),
                vec![tech.id, Uuid::new_v4()],
            ))
            .await,
        "categories",
    );

    // Atomicity: no post landed, and the valid category gained no link.
    assert!(posts.list().await.unwrap().is_empty());
    let listed = categories.list().await.unwrap();
    assert_eq!(listed[0].1, 0);
}

#[tokio::test]
async fn post_create_accepts_empty_category_set_and_bare_date() {
    let (_, posts) = services();

    let post = posts
        .create(post_input("Plain", "2020-01-01", vec![]))
        .await
        .unwrap();

    let detail = posts.get(post.id).await.unwrap();
    assert!(detail.categories.is_empty());
}

#[tokio::test]
async fn duplicate_category_ids_collapse_to_one_link() {
    let (categories, posts) = services();

    let tech = categories
        .create(category_input("Tech", true))
        .await
        .unwrap();
    let post = posts
        .create(post_input("Post", &yesterday(), vec![tech.id, tech.id]))
        .await
        .unwrap();

    let detail = posts.get(post.id).await.unwrap();
    assert_eq!(detail.categories.len(), 1);
}

#[tokio::test]
async fn future_post_is_indistinguishable_from_missing() {
    let (_, posts) = services();

    let scheduled = posts
        .create(post_input("Soon", &tomorrow(), vec![]))
        .await
        .unwrap();

    assert_not_found(posts.get(scheduled.id).await);
    assert!(posts.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn post_list_is_ordered_newest_first() {
    let (_, posts) = services();

    for days in [3, 1, 2] {
        let at = (Utc::now() - Duration::days(days)).to_rfc3339();
        posts
            .create(post_input(&format!("d{days}"), &at, vec![]))
            .await
            .unwrap();
    }

    let listed = posts.list().await.unwrap();
    let names: Vec<&str> = listed.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["d1", "d2", "d3"]);
}

#[tokio::test]
async fn post_update_replaces_category_set() {
    let (categories, posts) = services();

    let a = categories.create(category_input("A", true)).await.unwrap();
    let b = categories.create(category_input("B", true)).await.unwrap();
    let c = categories.create(category_input("C", true)).await.unwrap();

    let post = posts
        .create(post_input("Post", &yesterday(), vec![a.id, b.id]))
        .await
        .unwrap();

    posts
        .update(post.id, post_input("Post", &yesterday(), vec![b.id, c.id]))
        .await
        .unwrap();

    // Exactly the new set: b and c attached, a fully detached.
    let mut attached: Vec<Uuid> = posts
        .get(post.id)
        .await
        .unwrap()
        .categories
        .iter()
        .map(|c| c.id)
        .collect();
    attached.sort_unstable();
    let mut expected = vec![b.id, c.id];
    expected.sort_unstable();
    assert_eq!(attached, expected);

    let listed = categories.list().await.unwrap();
    let count_of = |id: Uuid| listed.iter().find(|(c, _)| c.id == id).map(|(_, n)| *n);
    assert_eq!(count_of(a.id), Some(0));
    assert_eq!(count_of(b.id), Some(1));
    assert_eq!(count_of(c.id), Some(1));
}

#[tokio::test]
async fn post_update_validates_and_reports_unknown_id() {
    let (_, posts) = services();

    let post = posts
        .create(post_input("Post", &yesterday(), vec![]))
        .await
        .unwrap();

    assert_violation_on(
        posts
            .update(post.id, post_input("Post", "test", vec![]))
            .await,
        "published_at",
    );
    assert_not_found(
        posts
            .update(Uuid::new_v4(), post_input("Post", &yesterday(), vec![]))
            .await,
    );
}

#[tokio::test]
async fn post_delete_detaches_but_keeps_categories() {
    let (categories, posts) = services();

    let tech = categories
        .create(category_input("Tech", true))
        .await
        .unwrap();
    let post = posts
        .create(post_input("Post", &yesterday(), vec![tech.id]))
        .await
        .unwrap();

    posts.delete(post.id).await.unwrap();
    assert_not_found(posts.delete(post.id).await);

    let listed = categories.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].1, 0);
}

#[tokio::test]
async fn rescheduling_a_post_hides_it_again() {
    let (categories, posts) = services();

    let tech = categories
        .create(category_input("Tech", true))
        .await
        .unwrap();
    let post = posts
        .create(post_input("Launch", &yesterday(), vec![tech.id]))
        .await
        .unwrap();
    assert_eq!(post.word_count(), word_count::count(CONTENT));

    let listed = posts.list().await.unwrap();
    assert_eq!(listed.len(), 1);

    // Push the publish date into the future: the post vanishes from every
    // read path without being deleted.
    posts
        .update(post.id, post_input("Launch", &tomorrow(), vec![tech.id]))
        .await
        .unwrap();

    assert_not_found(posts.get(post.id).await);
    assert!(posts.list().await.unwrap().is_empty());
    let listed = categories.list().await.unwrap();
    assert_eq!(listed[0].1, 0);
}
