/*
 * Responsibility
 * - Posts の request/response DTO (JSON 契約)
 * - 公開 ID を返す (内部 ID を漏らさない)
 * - validation はここで完結させ、handler は NewPost だけを store に渡す
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repos::NewPost;

// 欠けたフィールドを decode エラー (422) ではなく validation エラー (400) にするため Option で受ける
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl CreatePostRequest {
    pub fn validate(self) -> Result<NewPost, &'static str> {
        let title = self.title.as_deref().map(str::trim).unwrap_or_default();
        if title.is_empty() {
            return Err("title is required");
        }

        let content = self.content.unwrap_or_default();
        if content.trim().is_empty() {
            return Err("content is required");
        }

        Ok(NewPost {
            title: title.to_string(),
            // content is stored verbatim (markdown, leading whitespace matters)
            content,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String, // encoded
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
