/*
 * Responsibility
 * - /api の公開ポイント (routes() の re-export など)
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod routes;

#[cfg(test)]
mod tests;

pub use routes::routes;
