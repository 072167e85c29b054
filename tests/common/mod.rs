#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use async_trait::async_trait;
use serde_json::Value;
use tower::ServiceExt;

use movies_api::auth::SessionKeys;
use movies_api::database::{
    fixtures, DatabaseError, MemoryMovieStore, Movie, MovieId, MoviePatch, MovieStore, NewMovie,
};
use movies_api::AppState;

pub const SECRET: &str = "test-secret";
pub const COOKIE: &str = "movies.sid";

pub fn session_keys() -> SessionKeys {
    SessionKeys::new(SECRET, COOKIE, 1)
}

/// Router over an in-memory store, plus a handle on that store
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryMovieStore>,
    token: Option<String>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub set_cookie: Option<String>,
    pub body: Value,
}

impl TestApp {
    /// Empty store, authenticated as "tester"
    pub fn empty() -> Self {
        Self::with_store(MemoryMovieStore::new())
    }

    /// Store holding the three sample movies, authenticated as "tester"
    pub async fn seeded() -> Self {
        Self::with_store(MemoryMovieStore::with_movies(fixtures::sample_movies()).await)
    }

    /// Every store call fails as an unreachable database would; `store` stays empty
    pub fn failing() -> Self {
        Self::build(Arc::new(FailingStore), Arc::new(MemoryMovieStore::new()))
    }

    fn with_store(store: MemoryMovieStore) -> Self {
        let store = Arc::new(store);
        Self::build(store.clone(), store)
    }

    fn build(backend: Arc<dyn MovieStore>, store: Arc<MemoryMovieStore>) -> Self {
        let state = AppState::new(backend, session_keys());
        let token = session_keys().issue("tester").expect("issue token");
        Self {
            router: movies_api::app(state),
            store,
            token: Some(token),
        }
    }

    pub fn anonymous(mut self) -> Self {
        self.token = None;
        self
    }

    pub async fn get(&self, uri: &str) -> Result<TestResponse> {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Result<TestResponse> {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> Result<TestResponse> {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> Result<TestResponse> {
        self.send(Method::DELETE, uri, None).await
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = &self.token {
            builder = builder.header(header::COOKIE, format!("{}={}", COOKIE, token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };
        self.raw(request).await
    }

    pub async fn raw(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let header_str = |name: header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header_str(header::CONTENT_TYPE);
        let set_cookie = header_str(header::SET_COOKIE);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| {
                format!("response was not JSON: {}", String::from_utf8_lossy(&bytes))
            })?
        };

        Ok(TestResponse { status, content_type, set_cookie, body })
    }
}

impl TestResponse {
    pub fn assert_json(&self) {
        assert_eq!(
            self.content_type.as_deref(),
            Some("application/json"),
            "unexpected content type"
        );
    }

    pub fn assert_success(&self, status: StatusCode) -> &Vec<Value> {
        assert_eq!(self.status, status, "body: {}", self.body);
        self.assert_json();
        assert_eq!(self.body["status"], "success", "body: {}", self.body);
        assert!(self.body.get("message").is_none(), "body: {}", self.body);
        self.body["data"].as_array().expect("data should be an array")
    }

    pub fn assert_error(&self, status: StatusCode) -> &str {
        assert_eq!(self.status, status, "body: {}", self.body);
        self.assert_json();
        assert_eq!(self.body["status"], "error", "body: {}", self.body);
        assert!(self.body.get("data").is_none(), "error carried data: {}", self.body);
        self.body["message"].as_str().expect("message should be a string")
    }
}

/// Store whose every call times out waiting for a connection
pub struct FailingStore;

fn pool_timeout<T>() -> Result<T, DatabaseError> {
    Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl MovieStore for FailingStore {
    async fn list_all(&self) -> Result<Vec<Movie>, DatabaseError> {
        pool_timeout()
    }

    async fn get_by_id(&self, _id: MovieId) -> Result<Vec<Movie>, DatabaseError> {
        pool_timeout()
    }

    async fn insert(&self, _movie: NewMovie) -> Result<Vec<Movie>, DatabaseError> {
        pool_timeout()
    }

    async fn update_partial(&self, _id: MovieId, _patch: MoviePatch) -> Result<Vec<Movie>, DatabaseError> {
        pool_timeout()
    }

    async fn delete_by_id(&self, _id: MovieId) -> Result<Vec<Movie>, DatabaseError> {
        pool_timeout()
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        pool_timeout()
    }
}

/// Build a request with no session attached
pub fn request(method: Method, uri: &str) -> axum::http::request::Builder {
    Request::builder().method(method).uri(uri)
}

/// The real binary on a free port; killed and reaped on drop
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    /// Serve against PostgreSQL at `database_url`
    fn spawn(database_url: &str) -> Result<Self> {
        Self::spawn_with(&["serve"], Some(database_url))
    }

    /// Serve from the seeded in-memory store
    pub async fn start_memory() -> Result<Self> {
        let server = Self::spawn_with(&["serve", "--memory"], None)?;
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    fn spawn_with(args: &[&str], database_url: Option<&str>) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_movies-api"));
        cmd.args(args)
            .env("MOVIES_API_HOST", "127.0.0.1")
            .env("MOVIES_API_PORT", port.to_string())
            .env("SESSION_SECRET", SECRET)
            .env("SESSION_COOKIE_NAME", COOKIE)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        match database_url {
            Some(url) => cmd.env("DATABASE_URL", url),
            None => cmd.env_remove("DATABASE_URL"),
        };

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    /// Authenticated client for this server
    pub fn client(&self) -> Result<reqwest::Client> {
        let token = session_keys().issue("e2e")?;
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::AUTHORIZATION,
            reqwest::header::HeaderValue::from_str(&format!("Bearer {}", token))?,
        );
        Ok(reqwest::Client::builder().default_headers(headers).build()?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        // Reap so no zombie outlives the test
        let _ = self.child.wait();
    }
}

/// Start a server owned by the calling test; `None` when DATABASE_URL is unset.
/// The child is killed when the returned server is dropped.
pub async fn start_server() -> Result<Option<TestServer>> {
    let _ = dotenvy::dotenv();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping PostgreSQL-backed test");
        return Ok(None);
    };

    let server = TestServer::spawn(&url)?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(Some(server))
}
