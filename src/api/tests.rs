use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::app::router;
use crate::config::AppEnv;
use crate::repos::{MemoryPostStore, NewPost, PostRow, PostStore, error::RepoError};
use crate::services::auth::{AuthPolicy, AuthService, access_jwt::test_keys};
use crate::services::id_codec::IdCodec;
use crate::state::AppState;

const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

struct FailingStore;

#[async_trait]
impl PostStore for FailingStore {
    fn backend_name(&self) -> &'static str {
        "failing"
    }

    async fn list(&self) -> Result<Vec<PostRow>, RepoError> {
        Err(RepoError::Db(sqlx::Error::PoolTimedOut))
    }

    async fn create(&self, _post: &NewPost) -> Result<PostRow, RepoError> {
        Err(RepoError::Db(sqlx::Error::PoolTimedOut))
    }

    async fn get(&self, _post_id: i64) -> Result<Option<PostRow>, RepoError> {
        Err(RepoError::Db(sqlx::Error::PoolTimedOut))
    }

    async fn replace_all(&self, _posts: &[NewPost]) -> Result<Vec<PostRow>, RepoError> {
        Err(RepoError::Db(sqlx::Error::PoolTimedOut))
    }
}

fn app_with(store: Arc<dyn PostStore>, app_env: AppEnv, auth: AuthPolicy) -> Router {
    let id_codec = IdCodec::new(10, ALPHABET).unwrap();
    router(AppState::new(store, id_codec, app_env, auth))
}

fn app(store: Arc<MemoryPostStore>) -> Router {
    app_with(store, AppEnv::Development, AuthPolicy::Open)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn count(store: &MemoryPostStore) -> usize {
    store.list().await.unwrap().len()
}

#[tokio::test]
async fn root_and_health_respond() {
    let app = app(Arc::new(MemoryPostStore::new()));

    let (status, body) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("API is running!".into()));

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn list_on_empty_store_is_an_empty_array() {
    let app = app(Arc::new(MemoryPostStore::new()));

    let (status, body) = send(&app, get("/api/blogs")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn create_trims_title_and_returns_the_record() {
    let store = Arc::new(MemoryPostStore::new());
    let app = app(store.clone());

    let (status, body) = send(
        &app,
        post_json(
            "/api/blogs",
            json!({"title": "  Hello World  ", "content": "  **markdown** body"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Hello World");
    assert_eq!(body["content"], "  **markdown** body");
    assert!(body["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert!(body["createdAt"].is_string());
    assert_eq!(count(&store).await, 1);
}

#[tokio::test]
async fn create_rejects_missing_or_blank_fields_without_writing() {
    let store = Arc::new(MemoryPostStore::new());
    let app = app(store.clone());

    let cases = [
        (json!({"content": "body"}), "title is required"),
        (json!({"title": "   ", "content": "body"}), "title is required"),
        (json!({"title": "Title"}), "content is required"),
        (json!({"title": "Title", "content": " \n\t "}), "content is required"),
        (json!({}), "title is required"),
    ];

    for (payload, message) in cases {
        let (status, body) = send(&app, post_json("/api/blogs", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], message);
    }

    assert_eq!(count(&store).await, 0);
}

#[tokio::test]
async fn create_rejects_malformed_json() {
    let store = Arc::new(MemoryPostStore::new());
    let app = app(store.clone());

    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/blogs")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_JSON");
    assert_eq!(count(&store).await, 0);
}

#[tokio::test]
async fn list_is_newest_first() {
    let app = app(Arc::new(MemoryPostStore::new()));

    for title in ["one", "two", "three"] {
        let (status, _) = send(
            &app,
            post_json("/api/blogs", json!({"title": title, "content": "c"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, get("/api/blogs")).await;
    assert_eq!(status, StatusCode::OK);

    let posts = body.as_array().unwrap();
    let titles: Vec<_> = posts.iter().map(|p| p["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["three", "two", "one"]);

    let stamps: Vec<chrono::DateTime<chrono::Utc>> = posts
        .iter()
        .map(|p| p["createdAt"].as_str().unwrap().parse().unwrap())
        .collect();
    assert!(stamps.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn get_returns_created_post_and_404_for_unknown_ids() {
    let app = app(Arc::new(MemoryPostStore::new()));

    let (_, created) = send(
        &app,
        post_json("/api/blogs", json!({"title": "T", "content": "C"})),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(&app, get(&format!("/api/blogs/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, created);

    let unknown = IdCodec::new(10, ALPHABET).unwrap().encode(9_999).unwrap();
    let (status, body) = send(&app, get(&format!("/api/blogs/{unknown}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");

    let (status, _) = send(&app, get("/api/blogs/~garbage~")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn seed_in_development_resets_to_the_example_set() {
    let store = Arc::new(MemoryPostStore::new());
    let app = app(store.clone());

    send(
        &app,
        post_json("/api/blogs", json!({"title": "mine", "content": "keep?"})),
    )
    .await;

    let (status, first) = send(&app, post_empty("/api/blogs/seed")).await;
    assert_eq!(status, StatusCode::CREATED);
    let titles: Vec<_> = first
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        titles,
        vec![
            "Getting Started with My Portfolio",
            "What I Learned Building a MERN App",
            "Why I Love TypeScript",
        ]
    );
    assert_eq!(count(&store).await, 3);

    let (status, _) = send(&app, post_empty("/api/blogs/seed")).await;
    assert_eq!(status, StatusCode::CREATED);

    let mut stored: Vec<_> = store
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|r| (r.title, r.content))
        .collect();
    stored.sort();
    let mut expected: Vec<_> = crate::services::seed::seed_posts()
        .into_iter()
        .map(|p| (p.title, p.content))
        .collect();
    expected.sort();
    assert_eq!(stored, expected);
}

#[tokio::test]
async fn seed_outside_development_is_forbidden() {
    let store = Arc::new(MemoryPostStore::new());
    let app = app_with(store.clone(), AppEnv::Production, AuthPolicy::Open);

    send(
        &app,
        post_json("/api/blogs", json!({"title": "existing", "content": "c"})),
    )
    .await;

    let (status, body) = send(&app, post_empty("/api/blogs/seed")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["error"]["message"],
        "Forbidden: seed route is disabled in production"
    );

    let rows = store.list().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "existing");
}

#[tokio::test]
async fn store_failures_become_opaque_500s() {
    let app = app_with(Arc::new(FailingStore), AppEnv::Development, AuthPolicy::Open);
    let some_id = IdCodec::new(10, ALPHABET).unwrap().encode(1).unwrap();

    let cases = [
        (get("/api/blogs"), "Server error retrieving posts"),
        (
            post_json("/api/blogs", json!({"title": "t", "content": "c"})),
            "Server error creating blog post",
        ),
        (
            get(&format!("/api/blogs/{some_id}")),
            "Server error retrieving post",
        ),
        (post_empty("/api/blogs/seed"), "Failed to seed blog posts"),
    ];

    for (req, message) in cases {
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], message);
        assert!(!body.to_string().to_lowercase().contains("pool"));
    }
}

#[tokio::test]
async fn validation_is_checked_before_the_store() {
    // a failing store must not turn a bad request into a 500
    let app = app_with(Arc::new(FailingStore), AppEnv::Development, AuthPolicy::Open);

    let (status, _) = send(&app, post_json("/api/blogs", json!({"title": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_token_policy_guards_writes_only() {
    let service = AuthService::new(
        test_keys::PUBLIC_PEM,
        test_keys::ISSUER,
        test_keys::AUDIENCE,
        0,
    )
    .unwrap();
    let policy = AuthPolicy::admin_token(Arc::new(service), vec!["admin@example.com".into()]);

    let store = Arc::new(MemoryPostStore::new());
    let app = app_with(store.clone(), AppEnv::Development, policy);
    let payload = json!({"title": "t", "content": "c"});

    let (status, body) = send(&app, post_json("/api/blogs", payload.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let mut req = post_json("/api/blogs", payload.clone());
    req.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {}", test_keys::token_for("reader@example.com"))
            .parse()
            .unwrap(),
    );
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, post_empty("/api/blogs/seed")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(count(&store).await, 0);

    let mut req = post_json("/api/blogs", payload);
    req.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {}", test_keys::token_for("admin@example.com"))
            .parse()
            .unwrap(),
    );
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);

    // the auth scheme is case-insensitive
    let mut req = post_json("/api/blogs", json!({"title": "t2", "content": "c"}));
    req.headers_mut().insert(
        header::AUTHORIZATION,
        format!("bearer {}", test_keys::token_for("admin@example.com"))
            .parse()
            .unwrap(),
    );
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED);

    // reads stay public
    let (status, body) = send(&app, get("/api/blogs")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}
