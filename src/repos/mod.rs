/*
 * Responsibility
 * - store 実装の公開 (PostgreSQL / in-memory)
 */
pub mod error;
pub mod memory;
pub mod post_repo;

pub use memory::MemoryPostStore;
pub use post_repo::{NewPost, PgPostStore, PostRow, PostStore};
