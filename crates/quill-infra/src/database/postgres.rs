//! PostgreSQL repository implementations.
//!
//! Multi-step writes (post insert/update with association rows, cascading
//! deletes) run inside explicit transactions so no partial state survives
//! a failure.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::{Category, Post};
use quill_core::error::RepoError;
use quill_core::ports::{CategoryRepository, PostRepository};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::category_post::{self, Entity as CategoryPostEntity};
use super::entity::post::{self, Entity as PostEntity};

fn map_db_err(e: sea_orm::DbErr) -> RepoError {
    let err_str = e.to_string();
    if err_str.contains("duplicate") || err_str.contains("unique") {
        RepoError::Constraint(err_str)
    } else {
        RepoError::Query(err_str)
    }
}

fn map_txn_err(e: sea_orm::DbErr) -> RepoError {
    RepoError::Connection(e.to_string())
}

/// PostgreSQL category repository.
pub struct PostgresCategoryRepository {
    db: DbConn,
}

impl PostgresCategoryRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn list_active(&self, now: DateTime<Utc>) -> Result<Vec<(Category, i64)>, RepoError> {
        let categories = CategoryEntity::find()
            .filter(category::Column::IsActive.eq(true))
            .order_by_asc(category::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let mut out = Vec::with_capacity(categories.len());
        for model in categories {
            let count = model
                .find_related(PostEntity)
                .filter(post::Column::PublishedAt.lte(now))
                .count(&self.db)
                .await
                .map_err(map_db_err)?;
            out.push((model.into(), count as i64));
        }
        Ok(out)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_name(
        &self,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<Option<Category>, RepoError> {
        let mut query = CategoryEntity::find().filter(category::Column::Name.eq(name));
        if let Some(id) = exclude {
            query = query.filter(category::Column::Id.ne(id));
        }
        let result = query.one(&self.db).await.map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn published_posts(&self, id: Uuid, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError> {
        let Some(model) = CategoryEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(Vec::new());
        };

        let posts = model
            .find_related(PostEntity)
            .filter(post::Column::PublishedAt.lte(now))
            .order_by_desc(post::Column::PublishedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(posts.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, cat: Category) -> Result<Category, RepoError> {
        let active: category::ActiveModel = cat.into();
        let model = active.insert(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn update(&self, cat: Category) -> Result<Category, RepoError> {
        let active: category::ActiveModel = cat.into();
        let model = active.update(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let txn = self.db.begin().await.map_err(map_txn_err)?;

        CategoryPostEntity::delete_many()
            .filter(category_post::Column::CategoryId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        let result = CategoryEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_txn_err)?;
        Ok(result.rows_affected > 0)
    }
}

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list_published(&self, now: DateTime<Utc>) -> Result<Vec<Post>, RepoError> {
        let posts = PostEntity::find()
            .filter(post::Column::PublishedAt.lte(now))
            .order_by_desc(post::Column::PublishedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(posts.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn categories_of(&self, id: Uuid) -> Result<Vec<Category>, RepoError> {
        let Some(model) = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(Vec::new());
        };

        let categories = model
            .find_related(CategoryEntity)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(categories.into_iter().map(Into::into).collect())
    }

    async fn existing_category_ids(&self, ids: &[Uuid]) -> Result<Vec<Uuid>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let found = CategoryEntity::find()
            .filter(category::Column::Id.is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(found.into_iter().map(|c| c.id).collect())
    }

    async fn insert_with_categories(
        &self,
        new_post: Post,
        category_ids: &[Uuid],
    ) -> Result<Post, RepoError> {
        tracing::debug!(post_id = %new_post.id, links = category_ids.len(), "Inserting post");

        let txn = self.db.begin().await.map_err(map_txn_err)?;

        let active: post::ActiveModel = new_post.into();
        let saved = active.insert(&txn).await.map_err(map_db_err)?;

        for category_id in category_ids {
            let link = category_post::ActiveModel {
                category_id: Set(*category_id),
                post_id: Set(saved.id),
            };
            link.insert(&txn).await.map_err(map_db_err)?;
        }

        txn.commit().await.map_err(map_txn_err)?;
        Ok(saved.into())
    }

    async fn update_with_categories(
        &self,
        changed: Post,
        category_ids: &[Uuid],
    ) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(map_txn_err)?;

        let active: post::ActiveModel = changed.into();
        let saved = active.update(&txn).await.map_err(map_db_err)?;

        // Full replacement: clear the old set, then attach the new one.
        CategoryPostEntity::delete_many()
            .filter(category_post::Column::PostId.eq(saved.id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        for category_id in category_ids {
            let link = category_post::ActiveModel {
                category_id: Set(*category_id),
                post_id: Set(saved.id),
            };
            link.insert(&txn).await.map_err(map_db_err)?;
        }

        txn.commit().await.map_err(map_txn_err)?;
        Ok(saved.into())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, RepoError> {
        let txn = self.db.begin().await.map_err(map_txn_err)?;

        CategoryPostEntity::delete_many()
            .filter(category_post::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        let result = PostEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        txn.commit().await.map_err(map_txn_err)?;
        Ok(result.rows_affected > 0)
    }
}
