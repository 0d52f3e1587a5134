//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category fields as submitted. Fields are optional so that a missing one
/// is reported as a field violation by the service, not a body-parse error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertCategoryRequest {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

/// Post fields as submitted. A missing `categories` field means the empty set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertPostRequest {
    pub name: Option<String>,
    pub content: Option<String>,
    pub published_at: Option<String>,
    #[serde(default)]
    pub categories: Vec<Uuid>,
}

/// A category in responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDto {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// A category as listed: the plain fields plus its published-post count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryListItemDto {
    #[serde(flatten)]
    pub category: CategoryDto,
    pub published_posts_count: i64,
}

/// A category with its currently published posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDetailDto {
    #[serde(flatten)]
    pub category: CategoryDto,
    pub published_posts: Vec<PublishedPostDto>,
}

/// The reduced post shape embedded in a category detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishedPostDto {
    pub id: Uuid,
    pub name: String,
    pub published_at: String,
    pub word_count: usize,
}

/// A post in responses; `word_count` is derived from the content at
/// serialization time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDto {
    pub id: Uuid,
    pub name: String,
    pub content: String,
    pub published_at: String,
    pub word_count: usize,
    pub created_at: String,
    pub updated_at: String,
}

/// A post with its attached categories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailDto {
    #[serde(flatten)]
    pub post: PostDto,
    pub categories: Vec<CategoryRefDto>,
}

/// The reduced category shape embedded in a post detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRefDto {
    pub id: Uuid,
    pub name: String,
}

// Response envelopes, matching the wire format of the API.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryListItemDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub category: CategoryDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDetailResponse {
    pub category: CategoryDetailDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostsResponse {
    pub posts: Vec<PostDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub post: PostDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostDetailDto,
}

/// Success marker returned by the delete endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn success() -> Self {
        Self {
            status: "success".to_owned(),
        }
    }
}
