//! HTTP-level tests: the router is driven in-process with fake models
//! injected through the pipeline factory.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use portfolio_chatbot::api::router;
use portfolio_chatbot::config::Config;
use portfolio_chatbot::llm::{ChatModel, Embedder, HashEmbedder};
use portfolio_chatbot::models::{ChatMessage, Document};
use portfolio_chatbot::rag::{PipelineFactory, RagPipeline, DEFAULT_SESSION};
use portfolio_chatbot::search::VectorStore;
use portfolio_chatbot::state::AppState;

/// Replies with the last user message, or fails when asked to.
struct EchoChat {
    fail: bool,
}

#[async_trait]
impl ChatModel for EchoChat {
    async fn complete(&self, messages: &[ChatMessage]) -> anyhow::Result<String> {
        if self.fail {
            anyhow::bail!("completion service unavailable");
        }
        let last = messages.last().map(|m| m.content.as_str()).unwrap_or_default();
        Ok(format!("echo: {last}"))
    }
}

/// Fails the first `failures` builds, then succeeds. Counts every build.
struct TestFactory {
    builds: AtomicUsize,
    failures: usize,
    chat_fails: bool,
}

impl TestFactory {
    fn new(failures: usize) -> Arc<Self> {
        Arc::new(Self {
            builds: AtomicUsize::new(0),
            failures,
            chat_fails: false,
        })
    }

    fn with_failing_chat() -> Arc<Self> {
        Arc::new(Self {
            builds: AtomicUsize::new(0),
            failures: 0,
            chat_fails: true,
        })
    }

    fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PipelineFactory for TestFactory {
    async fn build(&self) -> anyhow::Result<RagPipeline> {
        let attempt = self.builds.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failures {
            anyhow::bail!("GROQ_API_KEY is not set in environment variables");
        }

        let embedder = HashEmbedder::new(64);
        let texts = vec![
            "Arunabha builds web apps".to_string(),
            "Arunabha likes Rust".to_string(),
        ];
        let embeddings = embedder.embed_documents(&texts).await?;
        let docs = texts.iter().map(|t| Document::new(t.as_str(), "test")).collect();
        let store = VectorStore::from_documents(docs, embeddings, embedder.model_name())?;

        Ok(RagPipeline::new(
            Arc::new(EchoChat {
                fail: self.chat_fails,
            }),
            Arc::new(embedder),
            store,
            3,
            "Arunabha",
        ))
    }
}

fn app(factory: Arc<TestFactory>) -> (Router, AppState) {
    let state = AppState::with_factory(Config::default(), factory);
    (router(state.clone()), state)
}

fn chat_request(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/chatbot")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

// ─── Status ──────────────────────────────────────────────

#[tokio::test]
async fn test_get_root_works_without_pipeline() {
    let factory = TestFactory::new(usize::MAX);
    let (app, _) = app(factory.clone());

    let req = Request::get("/").body(Body::empty()).unwrap();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
    assert_eq!(body["message"], "Arunabha Chatbot is Awake! 🚀");
    assert_eq!(factory.builds(), 0);
}

#[tokio::test]
async fn test_head_root_works_without_pipeline() {
    let factory = TestFactory::new(usize::MAX);
    let (app, _) = app(factory.clone());

    let req = Request::head("/").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.is_empty());
    assert_eq!(factory.builds(), 0);
}

// ─── Validation ──────────────────────────────────────────

#[tokio::test]
async fn test_missing_message_is_400_before_any_build() {
    let factory = TestFactory::new(0);
    let (app, _) = app(factory.clone());

    for body in [
        r#"{}"#,
        r#"{"message": null}"#,
        r#"{"message": "   "}"#,
        "",
        "[]",
    ] {
        let (status, json) = send(&app, chat_request(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(json["answer"], "Message is required.");
    }
    assert_eq!(factory.builds(), 0);
}

#[tokio::test]
async fn test_body_without_json_content_type_is_400() {
    let factory = TestFactory::new(0);
    let (app, _) = app(factory.clone());

    let req = Request::post("/chatbot").body(Body::from("hello")).unwrap();
    let (status, json) = send(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["answer"], "Message is required.");
    assert_eq!(factory.builds(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_500() {
    let factory = TestFactory::new(0);
    let (app, _) = app(factory.clone());

    let (status, json) = send(&app, chat_request("{\"message\": ")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["answer"]
        .as_str()
        .unwrap()
        .starts_with("Sorry, something went wrong:"));
}

// ─── Pipeline availability ───────────────────────────────

#[tokio::test]
async fn test_uninitialized_pipeline_is_503_and_retried() {
    let factory = TestFactory::new(usize::MAX);
    let (app, _) = app(factory.clone());

    let (status, json) = send(&app, chat_request(r#"{"message": "hi"}"#)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(json["answer"]
        .as_str()
        .unwrap()
        .starts_with("System is initializing"));

    let (status, _) = send(&app, chat_request(r#"{"message": "hi again"}"#)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(factory.builds(), 2);
}

#[tokio::test]
async fn test_recovers_after_failed_first_build() {
    let factory = TestFactory::new(1);
    let (app, _) = app(factory.clone());

    let (status, _) = send(&app, chat_request(r#"{"message": "hi"}"#)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, json) = send(&app, chat_request(r#"{"message": "hi"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["answer"], "echo: hi");

    // Built once successfully, then reused
    let (status, _) = send(&app, chat_request(r#"{"message": "again"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(factory.builds(), 2);
}

#[tokio::test]
async fn test_completion_failure_is_500_with_message() {
    let factory = TestFactory::with_failing_chat();
    let (app, state) = app(factory);

    let (status, json) = send(&app, chat_request(r#"{"message": "hi"}"#)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let answer = json["answer"].as_str().unwrap();
    assert!(answer.starts_with("Sorry, something went wrong:"));
    assert!(answer.contains("completion service unavailable"));
    assert_eq!(state.history.len(DEFAULT_SESSION), 0);
}

// ─── History ─────────────────────────────────────────────

#[tokio::test]
async fn test_history_is_bounded_to_twenty() {
    let factory = TestFactory::new(0);
    let (app, state) = app(factory);

    for i in 0..15 {
        let body = format!(r#"{{"message": "question {i}"}}"#);
        let (status, _) = send(&app, chat_request(&body)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(state.history.len(DEFAULT_SESSION) <= 20);
    }

    let history = state.history.messages(DEFAULT_SESSION);
    assert_eq!(history.len(), 20);
    assert_eq!(history[0], ChatMessage::user("question 5"));
    assert_eq!(history[19].role, "assistant");
}

#[tokio::test]
async fn test_sessions_keep_separate_history() {
    let factory = TestFactory::new(0);
    let (app, state) = app(factory);

    send(&app, chat_request(r#"{"message": "hi", "session_id": "alice"}"#)).await;
    send(&app, chat_request(r#"{"message": "hi"}"#)).await;
    send(&app, chat_request(r#"{"message": "hi", "session_id": "alice"}"#)).await;

    assert_eq!(state.history.len("alice"), 4);
    assert_eq!(state.history.len(DEFAULT_SESSION), 2);
}

// ─── CORS ────────────────────────────────────────────────

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let (app, _) = app(TestFactory::new(0));

    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/chatbot")
        .header(header::ORIGIN, "https://portfolio.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    assert!(resp.status().is_success());
    let headers = resp.headers();
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
    assert!(methods.contains("POST"));
    assert!(methods.contains("HEAD"));
}
