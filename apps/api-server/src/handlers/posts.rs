//! Post handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::Post;
use quill_core::service::{PostDetail, PostInput};
use quill_shared::dto::{
    CategoryRefDto, PostDetailDto, PostDetailResponse, PostDto, PostResponse, PostsResponse,
    StatusResponse, UpsertPostRequest,
};

use crate::middleware::error::AppResult;
use crate::state::AppState;

fn post_dto(post: Post) -> PostDto {
    let word_count = post.word_count();
    PostDto {
        id: post.id,
        name: post.name,
        content: post.content,
        published_at: post.published_at.to_rfc3339(),
        word_count,
        created_at: post.created_at.to_rfc3339(),
        updated_at: post.updated_at.to_rfc3339(),
    }
}

fn detail_dto(detail: PostDetail) -> PostDetailDto {
    PostDetailDto {
        post: post_dto(detail.post),
        categories: detail
            .categories
            .into_iter()
            .map(|c| CategoryRefDto {
                id: c.id,
                name: c.name,
            })
            .collect(),
    }
}

fn input_from(req: UpsertPostRequest) -> PostInput {
    PostInput {
        name: req.name,
        content: req.content,
        published_at: req.published_at,
        categories: req.categories,
    }
}

/// GET /api/posts
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state
        .posts
        .list()
        .await?
        .into_iter()
        .map(post_dto)
        .collect();

    Ok(HttpResponse::Ok().json(PostsResponse { posts }))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<UpsertPostRequest>,
) -> AppResult<HttpResponse> {
    let post = state.posts.create(input_from(body.into_inner())).await?;

    Ok(HttpResponse::Created().json(PostResponse {
        post: post_dto(post),
    }))
}

/// GET /api/posts/{id}
pub async fn show(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let detail = state.posts.get(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: detail_dto(detail),
    }))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpsertPostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .update(path.into_inner(), input_from(body.into_inner()))
        .await?;

    Ok(HttpResponse::Ok().json(PostResponse {
        post: post_dto(post),
    }))
}

/// DELETE /api/posts/{id}
pub async fn destroy(state: web::Data<AppState>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    state.posts.delete(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(StatusResponse::success()))
}
