//! Blog front-end: Post API client, views, editor and session gate.

pub mod api;
pub mod draft;
pub mod editor;
pub mod error;
pub mod markdown;
pub mod model;
pub mod session;
pub mod storage;
pub mod views;

pub use api::{Pending, PostApi, PostClient};
pub use error::ClientError;
pub use model::{CreatePost, Post};
