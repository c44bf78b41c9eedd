//! In-memory post store - used by tests and by `STORE_BACKEND=memory`.
//!
//! Note: data is lost on process restart.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::repos::error::RepoError;
use crate::repos::post_repo::{NewPost, PostRow, PostStore};

#[derive(Debug, Default)]
struct Inner {
    rows: Vec<PostRow>,
    next_id: i64,
}

impl Inner {
    fn insert(&mut self, post: &NewPost) -> PostRow {
        self.next_id += 1;
        let row = PostRow {
            post_id: self.next_id,
            title: post.title.clone(),
            content: post.content.clone(),
            created_at: Utc::now(),
        };
        self.rows.push(row.clone());
        row
    }
}

#[derive(Debug, Default)]
pub struct MemoryPostStore {
    inner: RwLock<Inner>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> Result<Vec<PostRow>, RepoError> {
        let inner = self.inner.read().await;
        let mut rows = inner.rows.clone();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.post_id.cmp(&a.post_id))
        });
        Ok(rows)
    }

    async fn create(&self, post: &NewPost) -> Result<PostRow, RepoError> {
        let mut inner = self.inner.write().await;
        Ok(inner.insert(post))
    }

    async fn get(&self, post_id: i64) -> Result<Option<PostRow>, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.iter().find(|r| r.post_id == post_id).cloned())
    }

    async fn replace_all(&self, posts: &[NewPost]) -> Result<Vec<PostRow>, RepoError> {
        // ids keep counting up across resets, like a BIGSERIAL sequence
        let mut inner = self.inner.write().await;
        inner.rows.clear();
        Ok(posts.iter().map(|p| inner.insert(p)).collect())
    }
}
