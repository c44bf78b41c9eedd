/*
 * Responsibility
 * - posts の store 境界 (PostStore trait) と PostgreSQL 実装
 * - append-only: 公開 API からの更新/削除はない (seed の全置換のみ例外)
 * - id / createdAt は store 側で採番する
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    #[sqlx(rename = "postId")]
    pub post_id: i64,

    pub title: String,
    pub content: String,

    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// 検証済みの新規 post (title は trim 済み)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
}

/// Post store interface.
///
/// Implementations must be cheap to share (`Arc<dyn PostStore>` in AppState).
#[async_trait]
pub trait PostStore: Send + Sync + 'static {
    // Returns the store backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // All posts, newest first ("createdAt" DESC, ties by id DESC).
    async fn list(&self) -> Result<Vec<PostRow>, RepoError>;

    async fn create(&self, post: &NewPost) -> Result<PostRow, RepoError>;

    async fn get(&self, post_id: i64) -> Result<Option<PostRow>, RepoError>;

    // Delete every post, then insert `posts` in order. Returns the inserted rows.
    async fn replace_all(&self, posts: &[NewPost]) -> Result<Vec<PostRow>, RepoError>;
}

#[derive(Clone, Debug)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), RepoError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn list(&self) -> Result<Vec<PostRow>, RepoError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
                "postId", title, content, "createdAt"
            FROM posts
            ORDER BY "createdAt" DESC, "postId" DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn create(&self, post: &NewPost) -> Result<PostRow, RepoError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (title, content)
            VALUES ($1, $2)
            RETURNING
                "postId", title, content, "createdAt"
            "#,
        )
        .bind(&post.title)
        .bind(&post.content)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get(&self, post_id: i64) -> Result<Option<PostRow>, RepoError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT
                "postId", title, content, "createdAt"
            FROM posts
            WHERE "postId" = $1
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn replace_all(&self, posts: &[NewPost]) -> Result<Vec<PostRow>, RepoError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(r#"DELETE FROM posts"#)
            .execute(&mut *tx)
            .await?;

        let mut rows = Vec::with_capacity(posts.len());
        for post in posts {
            let row = sqlx::query_as::<_, PostRow>(
                r#"
                INSERT INTO posts (title, content)
                VALUES ($1, $2)
                RETURNING
                    "postId", title, content, "createdAt"
                "#,
            )
            .bind(&post.title)
            .bind(&post.content)
            .fetch_one(&mut *tx)
            .await?;
            rows.push(row);
        }

        tx.commit().await?;
        Ok(rows)
    }
}
