use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Category, Post};
use crate::error::{DomainError, RepoError};
use crate::ports::CategoryRepository;
use crate::validate::{ValidationErrors, required_string};

/// Category fields as submitted by a caller; presence is validated here.
#[derive(Debug, Clone, Default)]
pub struct CategoryInput {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

/// A category together with its currently published posts.
#[derive(Debug, Clone)]
pub struct CategoryDetail {
    pub category: Category,
    pub published_posts: Vec<Post>,
}

/// Category CRUD with name uniqueness and active/published filtering.
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    /// Active categories only, each with its published-post count.
    pub async fn list(&self) -> Result<Vec<(Category, i64)>, DomainError> {
        let now = Utc::now();
        Ok(self.repo.list_active(now).await?)
    }

    pub async fn create(&self, input: CategoryInput) -> Result<Category, DomainError> {
        let (name, is_active) = self.validate(input, None).await?;
        let category = Category::new(name, is_active);
        self.repo
            .insert(category)
            .await
            .map_err(Self::map_name_constraint)
    }

    pub async fn get(&self, id: Uuid) -> Result<CategoryDetail, DomainError> {
        let now = Utc::now();
        let category = self.lookup(id).await?;
        let published_posts = self.repo.published_posts(id, now).await?;
        Ok(CategoryDetail {
            category,
            published_posts,
        })
    }

    pub async fn update(&self, id: Uuid, input: CategoryInput) -> Result<Category, DomainError> {
        let mut category = self.lookup(id).await?;
        let (name, is_active) = self.validate(input, Some(id)).await?;
        category.name = name;
        category.is_active = is_active;
        category.updated_at = Utc::now();
        self.repo
            .update(category)
            .await
            .map_err(Self::map_name_constraint)
    }

    /// Deleting twice fails: the second call sees no row and reports not-found.
    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        if !self.repo.delete(id).await? {
            return Err(DomainError::NotFound {
                entity_type: "category",
                id,
            });
        }
        Ok(())
    }

    async fn lookup(&self, id: Uuid) -> Result<Category, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "category",
                id,
            })
    }

    /// Field checks shared by create and update. `exclude` carries the id
    /// whose current name must not count as a collision, so updating a
    /// category to its own name succeeds.
    async fn validate(
        &self,
        input: CategoryInput,
        exclude: Option<Uuid>,
    ) -> Result<(String, bool), DomainError> {
        let mut errors = ValidationErrors::new();
        let name = required_string(&mut errors, "name", input.name.as_deref());
        if input.is_active.is_none() {
            errors.add("is_active", "is required");
        }

        if let Some(name) = name.as_deref() {
            if self.repo.find_by_name(name, exclude).await?.is_some() {
                errors.add("name", "has already been taken");
            }
        }

        match (name, input.is_active) {
            (Some(name), Some(is_active)) => {
                errors.into_result()?;
                Ok((name, is_active))
            }
            _ => Err(DomainError::Validation(errors)),
        }
    }

    /// A unique-index race lost between the pre-write probe and the write
    /// itself surfaces the same way the probe would have.
    fn map_name_constraint(err: RepoError) -> DomainError {
        match err {
            RepoError::Constraint(_) => {
                let mut errors = ValidationErrors::new();
                errors.add("name", "has already been taken");
                DomainError::Validation(errors)
            }
            other => other.into(),
        }
    }
}
