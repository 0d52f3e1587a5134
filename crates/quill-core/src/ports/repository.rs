use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Post};
use crate::error::RepoError;

/// Category store with the aggregate queries the category service needs.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Active categories in insertion order, each with the count of its
    /// posts published at or before `now`.
    async fn list_active(&self, now: DateTime<Utc>) -> Result<Vec<(Category, i64)>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError>;

    /// Uniqueness probe: a category carrying this name, excluding `exclude`
    /// when given (so a record can keep its own name on update).
    async fn find_by_name(
        &self,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<Category>, RepoError>;

    /// Posts of the category published at or before `now`.
    async fn published_posts(&self, id: Uuid, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError>;

    async fn insert(&self, category: Category) -> Result<Category, RepoError>;

    async fn update(&self, category: Category) -> Result<Category, RepoError>;

    /// Delete the category and its association rows, never its posts.
    /// `false` when no such category existed.
    async fn delete(&self, id: Uuid) -> Result<bool, RepoError>;
}

/// Post store. Every multi-step write runs inside a single transaction:
/// partial failure must not leave a post without its intended associations.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Posts published at or before `now`, most recently published first.
    async fn list_published(&self, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// Categories attached to the post.
    async fn categories_of(&self, id: Uuid) -> Result<Vec<Category>, RepoError>;

    /// The subset of `ids` that exist in the category table.
    async fn existing_category_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, RepoError>;

    /// Insert the post plus one association row per category id, atomically.
    async fn insert_with_categories(
        &self,
        post: Post,
        category_ids: &[Uuid],
    ) -> Result<Post, RepoError>;

    /// Update the post and replace its whole category set, atomically.
    async fn update_with_categories(
        &self,
        post: Post,
        category_ids: &[Uuid],
    ) -> Result<Post, RepoError>;

    /// Delete the post and its association rows, never its categories.
    /// `false` when no such post existed.
    async fn delete(&self, id: Uuid) -> Result<bool, RepoError>;
}
