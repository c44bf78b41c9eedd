/*
 * Responsibility
 * - client 側のエラー定義 (transport / HTTP status / decode / local storage)
 * - HTTP status エラーはサーバの error.message をそのまま運ぶ (UI に表示するため)
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid API base URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("API base URL cannot be used as a base: {0}")]
    InvalidBase(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{}", status_text(.status, .message))]
    Status { status: u16, message: Option<String> },
    #[error("failed to parse response body: {0}")]
    Decode(String),
}

fn status_text(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(m) => m.clone(),
        None => format!("request failed with status {status}"),
    }
}

impl ClientError {
    /// サーバが返した error.message (あれば)
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
