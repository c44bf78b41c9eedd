/*
 * Responsibility
 * - handler が使う extractor の公開
 */
pub mod auth_ctx;
pub mod public_id;

pub use auth_ctx::{AuthCtx, MaybeAuthCtx};
pub use public_id::PublicPostId;
