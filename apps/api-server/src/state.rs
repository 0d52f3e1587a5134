//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::service::{CategoryService, PostService};
use quill_infra::database::{self, InMemoryStore, PostgresCategoryRepository, PostgresPostRepository};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub categories: Arc<CategoryService>,
    pub posts: Arc<PostService>,
    /// Which store backs the services; reported by the health endpoint.
    pub backend: &'static str,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        if let Some(db_config) = &config.database {
            match database::connect(db_config).await {
                Ok(conn) => {
                    let categories = Arc::new(CategoryService::new(Arc::new(
                        PostgresCategoryRepository::new(conn.clone()),
                    )));
                    let posts = Arc::new(PostService::with_content_min_length(
                        Arc::new(PostgresPostRepository::new(conn)),
                        config.content_min_length,
                    ));
                    tracing::info!("Application state initialized (PostgreSQL)");
                    return Self {
                        categories,
                        posts,
                        backend: "postgres",
                    };
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }

        let store = Arc::new(InMemoryStore::new());
        let categories = Arc::new(CategoryService::new(store.clone()));
        let posts = Arc::new(PostService::with_content_min_length(
            store,
            config.content_min_length,
        ));

        Self {
            categories,
            posts,
            backend: "memory",
        }
    }
}
