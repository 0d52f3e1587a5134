//! In-memory store - used as fallback when PostgreSQL is not configured.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Category, Post};
use quill_core::error::RepoError;
use quill_core::ports::{CategoryRepository, PostRepository};

#[derive(Default)]
struct BlogState {
    categories: Vec<Category>,
    posts: Vec<Post>,
    /// `(category_id, post_id)` pairs; unique, like the junction table.
    links: Vec<(Uuid, Uuid)>,
}

impl BlogState {
    fn published_count(&self, category_id: Uuid, now: DateTime<Utc>) -> i64 {
        self.links
            .iter()
            .filter(|(cid, pid)| {
                *cid == category_id
                    && self
                        .posts
                        .iter()
                        .any(|p| p.id == *pid && p.is_published(now))
            })
            .count() as i64
    }
}

/// In-memory implementation of both repository ports behind one async
/// RwLock, so a multi-step write is exactly as atomic as a transaction
/// makes it on the relational store.
///
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<BlogState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn list_active(&self, now: DateTime<Utc>) -> Result<Vec<(Category, i64)>, RepoError> {
        let state = self.state.read().await;
        Ok(state
            .categories
            .iter()
            .filter(|c| c.is_active)
            .map(|c| (c.clone(), state.published_count(c.id, now)))
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        let state = self.state.read().await;
        Ok(state.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_name(
        &self,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<Category>, RepoError> {
        let state = self.state.read().await;
        Ok(state
            .categories
            .iter()
            .find(|c| c.name == name && exclude != Some(c.id))
            .cloned())
    }

    async fn published_posts(&self, id: Uuid, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError> {
        let state = self.state.read().await;
        let mut posts: Vec<Post> = state
            .links
            .iter()
            .filter(|(cid, _)| *cid == id)
            .filter_map(|(_, pid)| state.posts.iter().find(|p| p.id == *pid))
            .filter(|p| p.is_published(now))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(posts)
    }

    async fn insert(&self, category: Category) -> Result<Category, RepoError> {
        let mut state = self.state.write().await;
        if state.categories.iter().any(|c| c.name == category.name) {
            return Err(RepoError::Constraint(format!(
                "unique violation on categories.name: {}",
                category.name
            )));
        }
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn update(&self, category: Category) -> Result<Category, RepoError> {
        let mut state = self.state.write().await;
        if state
            .categories
            .iter()
            .any(|c| c.name == category.name && c.id != category.id)
        {
            return Err(RepoError::Constraint(format!(
                "unique violation on categories.name: {}",
                category.name
            )));
        }
        let Some(slot) = state.categories.iter_mut().find(|c| c.id == category.id) else {
            return Err(RepoError::NotFound);
        };
        *slot = category.clone();
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut state = self.state.write().await;
        let before = state.categories.len();
        state.categories.retain(|c| c.id != id);
        if state.categories.len() == before {
            return Ok(false);
        }
        state.links.retain(|(cid, _)| *cid != id);
        Ok(true)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn list_published(&self, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError> {
        let state = self.state.read().await;
        let mut posts: Vec<Post> = state
            .posts
            .iter()
            .filter(|p| p.is_published(now))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(posts)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let state = self.state.read().await;
        Ok(state.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn categories_of(&self, id: Uuid) -> Result<Vec<Category>, RepoError> {
        let state = self.state.read().await;
        Ok(state
            .links
            .iter()
            .filter(|(_, pid)| *pid == id)
            .filter_map(|(cid, _)| state.categories.iter().find(|c| c.id == *cid))
            .cloned()
            .collect())
    }

    async fn existing_category_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, RepoError> {
        let state = self.state.read().await;
        Ok(ids
            .iter()
            .filter(|id| state.categories.iter().any(|c| c.id == **id))
            .copied()
            .collect())
    }

    async fn insert_with_categories(
        &self,
        post: Post,
        category_ids: &[Uuid],
    ) -> Result<Post, RepoError> {
        let mut state = self.state.write().await;
        // Referential integrity first; nothing lands unless all ids resolve.
        for category_id in category_ids {
            if !state.categories.iter().any(|c| c.id == *category_id) {
                return Err(RepoError::Constraint(format!(
                    "foreign key violation on category_post.category_id: {category_id}"
                )));
            }
        }
        state.posts.push(post.clone());
        for category_id in category_ids {
            if !state.links.contains(&(*category_id, post.id)) {
                state.links.push((*category_id, post.id));
            }
        }
        Ok(post)
    }

    async fn update_with_categories(
        &self,
        post: Post,
        category_ids: &[Uuid],
    ) -> Result<Post, RepoError> {
        let mut state = self.state.write().await;
        for category_id in category_ids {
            if !state.categories.iter().any(|c| c.id == *category_id) {
                return Err(RepoError::Constraint(format!(
                    "foreign key violation on category_post.category_id: {category_id}"
                )));
            }
        }
        let Some(slot) = state.posts.iter_mut().find(|p| p.id == post.id) else {
            return Err(RepoError::NotFound);
        };
        *slot = post.clone();
        // Full replacement: clear the old set, then attach the new one.
        state.links.retain(|(_, pid)| *pid != post.id);
        for category_id in category_ids {
            state.links.push((*category_id, post.id));
        }
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut state = self.state.write().await;
        let before = state.posts.len();
        state.posts.retain(|p| p.id != id);
        if state.posts.len() == before {
            return Ok(false);
        }
        state.links.retain(|(_, pid)| *pid != id);
        Ok(true)
    }
}
