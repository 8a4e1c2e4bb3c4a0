#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, Response, StatusCode};
use axum::routing::{get as get_route, post as post_route};
use axum::{Json, Router};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use ollachat_api::auth::jwt::JwtConfig;
use ollachat_api::background::turn_recorder::TurnRecorder;
use ollachat_api::config::ServerConfig;
use ollachat_api::router::build_app_router;
use ollachat_api::state::AppState;
use ollachat_db::models::conversation::Conversation;
use ollachat_db::repositories::ConversationRepo;
use ollachat_inference::{InferenceConfig, OllamaApi};

pub const TEST_ORIGIN: &str = "http://localhost:8080";
pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";
pub const DEFAULT_MODEL: &str = "deepseek-r1:latest";

/// Nothing listens here; requests to it fail at connect time.
pub const UNREACHABLE_INFERENCE_URL: &str = "http://127.0.0.1:9";

/// Build a test `ServerConfig` pointing at `inference_url`.
pub fn test_config(inference_url: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![TEST_ORIGIN.to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        cookie_secure: false,
        persist_queue_capacity: 16,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 30,
        },
        inference: InferenceConfig::new(inference_url, DEFAULT_MODEL, 10, 2),
    }
}

/// Build the full application router with an inference server that cannot
/// be reached.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_inference(pool, UNREACHABLE_INFERENCE_URL)
}

/// Build the full application router, spawning a turn recorder worker on the
/// current runtime, exactly as `main.rs` wires it.
pub fn build_test_app_with_inference(pool: PgPool, inference_url: &str) -> Router {
    let config = test_config(inference_url);
    let inference = OllamaApi::new(&config.inference).expect("inference client should build");

    let (recorder, queue) = TurnRecorder::new(config.persist_queue_capacity);
    tokio::spawn(TurnRecorder::run(pool.clone(), queue));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        inference: Arc::new(inference),
        turn_recorder: Arc::new(recorder),
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fake inference server
// ---------------------------------------------------------------------------

/// A local stand-in for the generation server.
///
/// `/api/generate` replies with a fixed status and body; every request body
/// it receives is kept in `requests`.
#[derive(Clone)]
pub struct FakeInference {
    pub url: String,
    pub requests: Arc<Mutex<Vec<serde_json::Value>>>,
}

impl FakeInference {
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> serde_json::Value {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("inference server received no request")
    }
}

#[derive(Clone)]
struct FakeState {
    status: StatusCode,
    body: String,
    requests: Arc<Mutex<Vec<serde_json::Value>>>,
}

async fn fake_generate(
    State(fake): State<FakeState>,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, String) {
    fake.requests.lock().unwrap().push(body);
    (fake.status, fake.body.clone())
}

async fn fake_tags() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "models": [{"name": "deepseek-r1:latest"}, {"name": "llama3.2:3b"}]
    }))
}

/// Serve a fake generation endpoint that streams `lines` (newline-joined).
pub async fn spawn_inference(lines: Vec<String>) -> FakeInference {
    let body: String = lines.iter().map(|l| format!("{l}\n")).collect();
    spawn_inference_with(StatusCode::OK, body).await
}

/// Serve a fake generation endpoint with an arbitrary status and body.
pub async fn spawn_inference_with(status: StatusCode, body: impl Into<String>) -> FakeInference {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = FakeState {
        status,
        body: body.into(),
        requests: Arc::clone(&requests),
    };

    let app = Router::new()
        .route("/api/generate", post_route(fake_generate))
        .route("/api/tags", get_route(fake_tags))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeInference {
        url: format!("http://{addr}"),
        requests,
    }
}

/// A generate line carrying `text`.
pub fn chunk(text: &str) -> String {
    serde_json::json!({ "model": DEFAULT_MODEL, "response": text, "done": false }).to_string()
}

/// The closing generate line.
pub fn done_chunk() -> String {
    serde_json::json!({ "model": DEFAULT_MODEL, "response": "", "done": true }).to_string()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_with_cookie(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete_with_cookie(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_form(app: Router, uri: &str, form: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap();
    send(app, request).await
}

/// POST a body as-is with the given content type.
pub async fn post_raw(app: Router, uri: &str, content_type: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, content_type)
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// ---------------------------------------------------------------------------
// Account helpers
// ---------------------------------------------------------------------------

/// Register `username` through the API and return the new user's id.
pub async fn register(app: Router, username: &str, password: &str) -> i64 {
    let body = serde_json::json!({ "username": username, "password": password });
    let response = post_json(app, "/register", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Log in and return the `name=value` pair to send back as a `Cookie`.
pub async fn login(app: Router, username: &str, password: &str) -> String {
    let response = post_form(
        app,
        "/login",
        &format!("username={username}&password={password}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    cookie_pair(&response)
}

/// The `name=value` part of the response's `Set-Cookie` header.
pub fn cookie_pair(response: &Response<Body>) -> String {
    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .expect("response should set a cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

/// Register and log in, returning `(user_id, cookie)`.
pub async fn register_and_login(app: &Router, username: &str) -> (i64, String) {
    let password = "hunter2-but-longer";
    let id = register(app.clone(), username, password).await;
    let cookie = login(app.clone(), username, password).await;
    (id, cookie)
}

// ---------------------------------------------------------------------------
// Persistence helpers
// ---------------------------------------------------------------------------

/// Poll until `session_id` has at least `expected` stored turns.
///
/// Turns are written by a background worker after the response body closes.
pub async fn wait_for_turns(pool: &PgPool, session_id: i64, expected: usize) -> Vec<Conversation> {
    for _ in 0..100 {
        let turns = ConversationRepo::list_for_session(pool, session_id)
            .await
            .unwrap();
        if turns.len() >= expected {
            return turns;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("session {session_id} never reached {expected} stored turns");
}

pub async fn total_turns(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM conversations")
        .fetch_one(pool)
        .await
        .unwrap()
}
