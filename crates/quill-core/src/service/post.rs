use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Post};
use crate::error::DomainError;
use crate::ports::PostRepository;
use crate::validate::{ValidationErrors, parse_publish_date, required_string};

/// Content shorter than this is rejected.
pub const DEFAULT_CONTENT_MIN_LENGTH: usize = 10;

/// Post fields as submitted by a caller; presence is validated here.
/// `categories` is the full intended set - it replaces, never accumulates.
#[derive(Debug, Clone, Default)]
pub struct PostInput {
    pub name: Option<String>,
    pub content: Option<String>,
    pub published_at: Option<String>,
    pub categories: Vec<Uuid>,
}

/// A post together with its attached categories.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: Post,
    pub categories: Vec<Category>,
}

struct ValidatedPost {
    name: String,
    content: String,
    published_at: DateTime<Utc>,
    categories: Vec<Uuid>,
}

/// Post CRUD with publish-time gating and atomic category-set replacement.
pub struct PostService {
    repo: Arc<dyn PostRepository>,
    content_min_length: usize,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self::with_content_min_length(repo, DEFAULT_CONTENT_MIN_LENGTH)
    }

    pub fn with_content_min_length(
        repo: Arc<dyn PostRepository>,
        content_min_length: usize,
    ) -> Self {
        Self {
            repo,
            content_min_length,
        }
    }

    /// Published posts only, most recently published first.
    pub async fn list(&self) -> Result<Vec<Post>, DomainError> {
        let now = Utc::now();
        Ok(self.repo.list_published(now).await?)
    }

    pub async fn create(&self, input: PostInput) -> Result<Post, DomainError> {
        let fields = self.validate(input).await?;
        let post = Post::new(fields.name, fields.content, fields.published_at);
        Ok(self
            .repo
            .insert_with_categories(post, &fields.categories)
            .await?)
    }

    /// Direct reads are publish-gated: a future-dated post is reported
    /// exactly like a missing one, so scheduled content cannot leak by id.
    pub async fn get(&self, id: Uuid) -> Result<PostDetail, DomainError> {
        let now = Utc::now();
        let post = self
            .repo
            .find_by_id(id)
            .await?
            .filter(|post| post.is_published(now))
            .ok_or(DomainError::NotFound {
                entity_type: "post",
                id,
            })?;
        let categories = self.repo.categories_of(id).await?;
        Ok(PostDetail { post, categories })
    }

    pub async fn update(&self, id: Uuid, input: PostInput) -> Result<Post, DomainError> {
        let mut post = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "post",
                id,
            })?;
        let fields = self.validate(input).await?;
        post.name = fields.name;
        post.content = fields.content;
        post.published_at = fields.published_at;
        post.updated_at = Utc::now();
        Ok(self
            .repo
            .update_with_categories(post, &fields.categories)
            .await?)
    }

    /// Deleting twice fails: the second call sees no row and reports not-found.
    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        if !self.repo.delete(id).await? {
            return Err(DomainError::NotFound {
                entity_type: "post",
                id,
            });
        }
        Ok(())
    }

    /// Field checks shared by create and update. All violations are
    /// accumulated before anything is written; unknown category ids are a
    /// violation, never silently dropped.
    async fn validate(&self, input: PostInput) -> Result<ValidatedPost, DomainError> {
        let mut errors = ValidationErrors::new();

        let name = required_string(&mut errors, "name", input.name.as_deref());

        let content = match input.content {
            Some(content) if content.chars().count() >= self.content_min_length => Some(content),
            Some(_) => {
                errors.add(
                    "content",
                    format!("must be at least {} characters", self.content_min_length),
                );
                None
            }
            None => {
                errors.add("content", "is required");
                None
            }
        };

        let published_at = match input.published_at.as_deref() {
            Some(raw) => {
                let parsed = parse_publish_date(raw);
                if parsed.is_none() {
                    errors.add("published_at", "is not a valid date");
                }
                parsed
            }
            None => {
                errors.add("published_at", "is required");
                None
            }
        };

        // The association pair is unique; duplicate submitted ids collapse.
        let mut categories = input.categories;
        categories.sort_unstable();
        categories.dedup();

        if !categories.is_empty() {
            let existing = self.repo.existing_category_ids(&categories).await?;
            for id in &categories {
                if !existing.contains(id) {
                    errors.add("categories", format!("references an unknown category: {id}"));
                }
            }
        }

        match (name, content, published_at) {
            (Some(name), Some(content), Some(published_at)) => {
                errors.into_result()?;
                Ok(ValidatedPost {
                    name,
                    content,
                    published_at,
                    categories,
                })
            }
            _ => Err(DomainError::Validation(errors)),
        }
    }
}
