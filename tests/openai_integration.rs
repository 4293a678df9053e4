use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use ideaforge::config::LlmConfig;
use ideaforge::workflow::catalog;
use ideaforge::{
    CompletionProvider, CompletionRequest, Credential, ErrorCategory, ForgeError, FormSubmission,
    OpenAiProvider, ResilientCaller, RetryPolicy, WorkflowRunner,
};
use serde_json::{Value as JsonValue, json};

#[derive(Clone)]
struct MockResponse {
    status: StatusCode,
    body: JsonValue,
}

impl MockResponse {
    fn json(status: StatusCode, body: JsonValue) -> Self {
        Self { status, body }
    }

    fn completion(text: &str) -> Self {
        Self::json(
            StatusCode::OK,
            json!({
                "model": "gpt-4-turbo-2024-04-09",
                "choices": [{"message": {"role": "assistant", "content": text}}],
                "usage": {"prompt_tokens": 12, "completion_tokens": 5}
            }),
        )
    }

    fn rate_limited() -> Self {
        Self::json(
            StatusCode::TOO_MANY_REQUESTS,
            json!({"error": {"message": "Rate limit reached for requests", "type": "requests"}}),
        )
    }
}

#[derive(Clone)]
struct MockState {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<(Option<String>, JsonValue)>>>,
}

async fn completions_handler(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<JsonValue>,
) -> impl IntoResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state
        .requests
        .lock()
        .expect("request log mutex must not be poisoned")
        .push((auth, body));

    let response = {
        let mut queue = state
            .responses
            .lock()
            .expect("response queue mutex must not be poisoned");
        queue.pop_front().unwrap_or_else(|| {
            MockResponse::json(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": {"message": "no mock response available"}}),
            )
        })
    };

    (response.status, Json(response.body))
}

async fn models_handler(headers: HeaderMap) -> impl IntoResponse {
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some("Bearer sk-test") => (StatusCode::OK, Json(json!({"data": []}))),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": {"message": "Incorrect API key provided"}})),
        ),
    }
}

struct TestServer {
    base_url: String,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<(Option<String>, JsonValue)>>>,
    task: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl TestServer {
    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn requests(&self) -> Vec<(Option<String>, JsonValue)> {
        self.requests
            .lock()
            .expect("request log mutex must not be poisoned")
            .clone()
    }

    fn provider(&self, key: &str) -> OpenAiProvider {
        let config = LlmConfig {
            api_base: format!("{}/v1/", self.base_url),
            timeout_secs: 5,
            ..LlmConfig::default()
        };
        OpenAiProvider::new(&config, Credential::new(key)).expect("provider must build")
    }

    fn caller(&self, max_attempts: u32) -> ResilientCaller {
        let policy =
            RetryPolicy::new(max_attempts, Duration::from_millis(10)).expect("valid policy");
        ResilientCaller::new(Arc::new(self.provider("sk-test")), policy)
    }
}

async fn spawn_server(responses: Vec<MockResponse>) -> TestServer {
    let state = MockState {
        responses: Arc::new(Mutex::new(responses.into())),
        hits: Arc::new(AtomicUsize::new(0)),
        requests: Arc::new(Mutex::new(Vec::new())),
    };

    let app = Router::new()
        .route("/v1/chat/completions", post(completions_handler))
        .route("/v1/models", get(models_handler))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("must bind test listener");
    let address = listener.local_addr().expect("must have local addr");
    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("mock server must run");
    });

    TestServer {
        base_url: format!("http://{address}"),
        hits: state.hits,
        requests: state.requests,
        task,
    }
}

fn request() -> CompletionRequest {
    CompletionRequest::new("You are a market analyst.", "List competitors")
        .with_max_tokens(1000)
        .with_temperature(0.7)
}

#[tokio::test]
async fn two_rate_limits_then_success() {
    let server = spawn_server(vec![
        MockResponse::rate_limited(),
        MockResponse::rate_limited(),
        MockResponse::completion("  OK\n"),
    ])
    .await;

    let (completion, stats) = server
        .caller(3)
        .call_with_stats(&request())
        .await
        .expect("third attempt must succeed");

    assert_eq!(completion.text, "OK");
    assert_eq!(completion.model, "gpt-4-turbo-2024-04-09");
    assert_eq!(completion.usage.total(), 17);
    assert_eq!(stats.attempts, 3);
    assert_eq!(
        stats.delays,
        vec![Duration::from_millis(10), Duration::from_millis(20)]
    );
    assert_eq!(server.hits(), 3);
}

#[tokio::test]
async fn request_carries_credential_and_bounds() {
    let server = spawn_server(vec![MockResponse::completion("five ideas")]).await;

    let text = server.caller(3).call(&request()).await.expect("must succeed");
    assert_eq!(text, "five ideas");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let (auth, body) = &requests[0];
    assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
    assert_eq!(body["model"], "gpt-4-turbo");
    assert_eq!(body["max_tokens"], 1000);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["content"], "List competitors");
}

#[tokio::test]
async fn auth_failure_is_not_retried() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::UNAUTHORIZED,
        json!({"error": {"message": "Incorrect API key provided"}}),
    )])
    .await;

    let err = server
        .caller(3)
        .call(&request())
        .await
        .expect_err("401 must fail");

    assert_eq!(server.hits(), 1);
    match err {
        ForgeError::Llm(e) => {
            assert_eq!(e.category, ErrorCategory::Auth);
            assert!(e.message.contains("Incorrect API key"));
        }
        other => panic!("expected Llm error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_is_not_retried() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::SERVICE_UNAVAILABLE,
        json!({"error": {"message": "The server is overloaded"}}),
    )])
    .await;

    let err = server.caller(3).call(&request()).await.expect_err("503 must fail");

    assert_eq!(server.hits(), 1);
    assert!(matches!(err, ForgeError::Llm(ref e) if e.category == ErrorCategory::Unavailable));
}

#[tokio::test]
async fn persistent_rate_limit_exhausts_budget() {
    let server = spawn_server(vec![
        MockResponse::rate_limited(),
        MockResponse::rate_limited(),
        MockResponse::rate_limited(),
        MockResponse::completion("never reached"),
    ])
    .await;

    let err = server
        .caller(3)
        .call(&request())
        .await
        .expect_err("must exhaust");

    assert_eq!(server.hits(), 3);
    assert!(matches!(err, ForgeError::RetriesExhausted { attempts: 3, .. }));
    assert!(err.to_string().contains("after 3 attempts"));
}

#[tokio::test]
async fn malformed_success_body_is_fatal() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::OK,
        json!({"choices": []}),
    )])
    .await;

    let err = server.caller(3).call(&request()).await.expect_err("must fail");

    assert_eq!(server.hits(), 1);
    assert!(matches!(err, ForgeError::Llm(ref e) if e.category == ErrorCategory::ParseError));
}

#[tokio::test]
async fn health_check_reports_credential_acceptance() {
    let server = spawn_server(vec![]).await;

    assert!(server.provider("sk-test").health_check().await.expect("check runs"));
    assert!(!server.provider("sk-wrong").health_check().await.expect("check runs"));
}

#[tokio::test]
async fn validate_workflow_end_to_end() {
    let server = spawn_server(vec![
        MockResponse::completion("H1: firms will pay"),
        MockResponse::rate_limited(),
        MockResponse::completion("MVP: invoice upload"),
        MockResponse::completion("T1: five customer interviews"),
    ])
    .await;

    let mut form = FormSubmission::new();
    form.insert("problem", "Manual invoice matching");
    form.insert("solution", "OCR plus rules engine");
    form.insert("segments", "Small accounting firms");

    let report = WorkflowRunner::new(server.caller(3))
        .run(catalog::find("validate").expect("known workflow"), &form, None)
        .await
        .expect("workflow must complete");

    assert_eq!(server.hits(), 4);
    assert_eq!(report.sections.len(), 3);
    assert_eq!(report.sections[1].attempts, 2);

    let requests = server.requests();
    let last_prompt = requests[3].1["messages"][1]["content"]
        .as_str()
        .expect("user message is a string")
        .to_string();
    assert!(last_prompt.contains("H1: firms will pay"));
    assert!(last_prompt.contains("MVP: invoice upload"));
}
