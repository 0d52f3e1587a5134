use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::word_count;

/// Post entity - a blog post, visible once `published_at` is reached.
///
/// There is no explicit scheduled/published status field: visibility is a
/// pure function of `published_at` against the clock read at query time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub name: String,
    pub content: String,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with generated ID and timestamps.
    pub fn new(name: String, content: String, published_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            content,
            published_at,
            created_at: now,
            updated_at: now,
        }
    }

    /// Derived word count, recomputed from the current content on every call.
    /// Never persisted, so it cannot go stale.
    pub fn word_count(&self) -> usize {
        word_count::count(&self.content)
    }

    /// Whether the post is visible at `now`.
    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        self.published_at <= now
    }
}
