/**
 * Responsibility
 *  - リソースごとの「意味付きID型」を宣言する
 *
 * 置かないもの
 *  - decode ロジック
 *  - extractor 実装
 */
use super::core::{PublicId, Resource};

// posts
pub enum PostTag {}

impl Resource for PostTag {
    const NAME: &'static str = "post";
}

pub type PublicPostId = PublicId<PostTag>;
