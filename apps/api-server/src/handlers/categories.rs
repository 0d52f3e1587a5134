//! Category handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::{Category, Post};
use quill_core::service::{CategoryDetail, CategoryInput};
use quill_shared::dto::{
    CategoriesResponse, CategoryDetailDto, CategoryDetailResponse, CategoryDto,
    CategoryListItemDto, CategoryResponse, PublishedPostDto, StatusResponse,
    UpsertCategoryRequest,
};

use crate::middleware::error::AppResult;
use crate::state::AppState;

fn category_dto(category: Category) -> CategoryDto {
    CategoryDto {
        id: category.id,
        name: category.name,
        is_active: category.is_active,
        created_at: category.created_at.to_rfc3339(),
        updated_at: category.updated_at.to_rfc3339(),
    }
}

fn published_post_dto(post: Post) -> PublishedPostDto {
    let word_count = post.word_count();
    PublishedPostDto {
        id: post.id,
        name: post.name,
        published_at: post.published_at.to_rfc3339(),
        word_count,
    }
}

fn detail_dto(detail: CategoryDetail) -> CategoryDetailDto {
    CategoryDetailDto {
        category: category_dto(detail.category),
        published_posts: detail
            .published_posts
            .into_iter()
            .map(published_post_dto)
            .collect(),
    }
}

fn input_from(req: UpsertCategoryRequest) -> CategoryInput {
    CategoryInput {
        name: req.name,
        is_active: req.is_active,
    }
}

/// GET /api/categories
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state
        .categories
        .list()
        .await?
        .into_iter()
        .map(|(category, count)| CategoryListItemDto {
            category: category_dto(category),
            published_posts_count: count,
        })
        .collect();

    Ok(HttpResponse::Ok().json(CategoriesResponse { categories }))
}

/// POST /api/categories
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<UpsertCategoryRequest>,
) -> AppResult<HttpResponse> {
    let category = state.categories.create(input_from(body.into_inner())).await?;

    Ok(HttpResponse::Created().json(CategoryResponse {
        category: category_dto(category),
    }))
}

/// GET /api/categories/{id}
pub async fn show(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let detail = state.categories.get(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(CategoryDetailResponse {
        category: detail_dto(detail),
    }))
}

/// PUT /api/categories/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpsertCategoryRequest>,
) -> AppResult<HttpResponse> {
    let category = state
        .categories
        .update(path.into_inner(), input_from(body.into_inner()))
        .await?;

    Ok(HttpResponse::Ok().json(CategoryResponse {
        category: category_dto(category),
    }))
}

/// DELETE /api/categories/{id}
pub async fn destroy(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    state.categories.delete(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(StatusResponse::success()))
}
