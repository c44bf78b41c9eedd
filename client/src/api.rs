/*
 * Responsibility
 * - Post API への薄い request/response wrapper (retry / cache / de-dup なし)
 * - 1 call = 1 request。成功なら decode 済みの payload、失敗なら status/body 由来のエラー
 * - get は 404 を Ok(None) (= 存在しない) として transport 失敗と区別する
 * - PostApi trait で抽象化し、view / editor を fake で駆動できるようにする
 */
use std::future::Future;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url, header};
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;

use crate::error::ClientError;
use crate::model::{CreatePost, ErrorEnvelope, Post};

#[async_trait]
pub trait PostApi: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<Post>, ClientError>;

    // Ok(None) when the server reports the post as absent (404).
    async fn get(&self, id: &str) -> Result<Option<Post>, ClientError>;

    async fn create(&self, post: &CreatePost) -> Result<Post, ClientError>;

    async fn seed(&self) -> Result<Vec<Post>, ClientError>;
}

#[derive(Clone, Debug)]
pub struct PostClient {
    http: Client,
    base: Url,
    token: Option<String>,
}

impl PostClient {
    pub fn new(api_base: &str, token: Option<String>) -> Result<Self, ClientError> {
        let mut base = Url::parse(api_base)?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidBase(api_base.to_string()));
        }
        // relative joins below must keep any path prefix of the base
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self { http, base, token })
    }

    pub fn user_agent() -> &'static str {
        concat!("blog-client/", env!("CARGO_PKG_VERSION"))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn blogs_url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.join("api/blogs")?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBase(self.base.to_string()))?
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let req = self
            .http
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn handle<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            // envelope: {"error": {"code": "...", "message": "..."}}
            let message = serde_json::from_slice::<ErrorEnvelope>(&bytes)
                .ok()
                .map(|e| e.error.message)
                .filter(|m| !m.trim().is_empty());
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl PostApi for PostClient {
    async fn list(&self) -> Result<Vec<Post>, ClientError> {
        let resp = self
            .request(Method::GET, self.blogs_url(&[])?)
            .send()
            .await?;
        Self::handle(resp).await
    }

    async fn get(&self, id: &str) -> Result<Option<Post>, ClientError> {
        let resp = self
            .request(Method::GET, self.blogs_url(&[id])?)
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::handle(resp).await.map(Some)
    }

    async fn create(&self, post: &CreatePost) -> Result<Post, ClientError> {
        let resp = self
            .request(Method::POST, self.blogs_url(&[])?)
            .json(post)
            .send()
            .await?;
        Self::handle(resp).await
    }

    async fn seed(&self) -> Result<Vec<Post>, ClientError> {
        let resp = self
            .request(Method::POST, self.blogs_url(&["seed"])?)
            .send()
            .await?;
        Self::handle(resp).await
    }
}

/// In-flight request tied to the lifetime of whatever owns it.
///
/// Dropping the handle (or calling `cancel`) aborts the task, so a view that
/// has been torn down never receives a late state write.
#[derive(Debug)]
pub struct Pending<T> {
    handle: Option<JoinHandle<T>>,
}

impl<T: Send + 'static> Pending<T> {
    pub fn spawn<F>(fut: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            handle: Some(tokio::spawn(fut)),
        }
    }

    pub fn cancel(&self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }

    /// Wait for the result. `None` if the request was cancelled.
    pub async fn join(mut self) -> Option<T> {
        let handle = self.handle.take()?;
        handle.await.ok()
    }
}

impl<T> Drop for Pending<T> {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn base_keeps_its_path_prefix() {
        let client = PostClient::new("http://localhost:5000/backend", None).unwrap();
        assert_eq!(
            client.blogs_url(&[]).unwrap().as_str(),
            "http://localhost:5000/backend/api/blogs"
        );
        assert_eq!(
            client.blogs_url(&["a b"]).unwrap().as_str(),
            "http://localhost:5000/backend/api/blogs/a%20b"
        );
    }

    #[test]
    fn rejects_non_base_urls() {
        let err = PostClient::new("mailto:someone@example.com", None).unwrap_err();
        assert!(matches!(err, ClientError::InvalidBase(_)));
        assert_eq!(
            err.to_string(),
            "API base URL cannot be used as a base: mailto:someone@example.com"
        );
        assert!(matches!(
            PostClient::new("not a url", None),
            Err(ClientError::Url(_))
        ));
    }

    #[tokio::test]
    async fn pending_join_returns_the_result() {
        let pending = Pending::spawn(async { 7 });
        assert_eq!(pending.join().await, Some(7));
    }

    #[tokio::test]
    async fn cancelled_pending_never_completes() {
        let (tx, mut rx) = tokio::sync::mpsc::channel::<()>(1);
        let pending = Pending::spawn(async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            let _ = tx.send(()).await;
        });

        pending.cancel();
        assert_eq!(pending.join().await, None);
        // sender dropped by the aborted task, nothing was sent
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn dropping_pending_aborts_the_task() {
        let (tx, mut rx) = tokio::sync::mpsc::channel::<()>(1);
        let pending = Pending::spawn(async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            let _ = tx.send(()).await;
        });

        drop(pending);
        assert!(rx.recv().await.is_none());
    }
}
