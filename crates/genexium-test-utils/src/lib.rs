//! Shared test utilities for genexium integration tests.
//!
//! Provides [`MockBackend`], an in-process stand-in for the generation
//! service. Each test starts its own instance on an ephemeral port, scripts
//! the replies each endpoint should give, and inspects the requests the
//! client actually sent.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use serde_json::Value;
use tokio::task::JoinHandle;

/// Body the real service sends when basic auth fails.
pub const UNAUTHORIZED_BODY: &str =
    "Could not verify your access level for that URL.\nYou have to login with proper credentials";

/// One scripted reply.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.to_string(),
        }
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: body.into(),
        }
    }

    /// A successful `/generate_plan` reply.
    pub fn plan(gene: &str, training_plan: &str, research_report: &str) -> Self {
        Self::json(
            200,
            serde_json::json!({
                "success": true,
                "gene": gene,
                "training_plan": training_plan,
                "research_report": research_report,
            }),
        )
    }

    /// A successful `/generate_daily_workout` reply.
    pub fn workout(daily_workout: &str) -> Self {
        Self::json(
            200,
            serde_json::json!({ "success": true, "daily_workout": daily_workout }),
        )
    }

    /// The error shape the service uses for failures.
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

/// A request the mock received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: &'static str,
    /// Parsed JSON body, or `Value::Null` if the body was not JSON.
    pub body: Value,
    pub authorization: Option<String>,
}

#[derive(Debug, Default)]
struct MockState {
    plan_replies: Mutex<VecDeque<Reply>>,
    workout_replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<RecordedRequest>>,
    required_authorization: Option<String>,
}

impl MockState {
    fn handle(&self, path: &'static str, queue: &Mutex<VecDeque<Reply>>, headers: &HeaderMap, body: &Bytes) -> Reply {
        let authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        self.requests.lock().unwrap().push(RecordedRequest {
            path,
            body: serde_json::from_slice(body).unwrap_or(Value::Null),
            authorization: authorization.clone(),
        });

        if let Some(required) = &self.required_authorization {
            if authorization.as_deref() != Some(required.as_str()) {
                return Reply::text(401, UNAUTHORIZED_BODY);
            }
        }

        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Reply::error(500, "no scripted reply"))
    }
}

/// Build the mock's router around fresh state.
fn build_router(state: Arc<MockState>) -> Router {
    Router::new()
        .route("/generate_plan", post(generate_plan))
        .route("/generate_daily_workout", post(generate_daily_workout))
        .with_state(state)
}

async fn generate_plan(State(state): State<Arc<MockState>>, headers: HeaderMap, body: Bytes) -> Reply {
    state.handle("/generate_plan", &state.plan_replies, &headers, &body)
}

async fn generate_daily_workout(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Reply {
    state.handle("/generate_daily_workout", &state.workout_replies, &headers, &body)
}

/// A running mock backend. Shuts down when dropped.
pub struct MockBackend {
    addr: SocketAddr,
    state: Arc<MockState>,
    server: JoinHandle<()>,
}

impl MockBackend {
    /// Start a mock that accepts any (or no) credentials.
    pub async fn start() -> Self {
        Self::start_with(None).await
    }

    /// Start a mock that answers 401 unless the `Authorization` header
    /// equals `authorization` exactly.
    pub async fn start_with_authorization(authorization: &str) -> Self {
        Self::start_with(Some(authorization.to_string())).await
    }

    async fn start_with(required_authorization: Option<String>) -> Self {
        let state = Arc::new(MockState {
            required_authorization,
            ..MockState::default()
        });
        let app = build_router(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock backend");
        let addr = listener.local_addr().expect("mock backend has no local addr");

        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("mock backend stopped: {e}");
            }
        });

        Self { addr, state, server }
    }

    /// Origin to point the client at, e.g. `http://127.0.0.1:49152`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn enqueue_plan(&self, reply: Reply) {
        self.state.plan_replies.lock().unwrap().push_back(reply);
    }

    pub fn enqueue_workout(&self, reply: Reply) {
        self.state.workout_replies.lock().unwrap().push_back(reply);
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// A base URL nothing listens on, for connectivity-failure tests.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind probe listener");
    let addr = listener.local_addr().expect("probe listener has no local addr");
    drop(listener);
    format!("http://{addr}")
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;

    async fn post_json(app: Router, uri: &str, body: &str) -> Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 1_048_576).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn scripted_replies_are_served_in_order() {
        let state = Arc::new(MockState::default());
        state.plan_replies.lock().unwrap().push_back(Reply::plan("actn3", "p", "r"));
        state.plan_replies.lock().unwrap().push_back(Reply::error(400, "Invalid gene selected"));

        let first = post_json(build_router(state.clone()), "/generate_plan", r#"{"gene":"actn3"}"#).await;
        assert_eq!(first.status(), StatusCode::OK);
        let json: Value = serde_json::from_str(&body_string(first).await).unwrap();
        assert_eq!(json["success"], true);

        let second = post_json(build_router(state.clone()), "/generate_plan", "{}").await;
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);

        let recorded = state.requests.lock().unwrap().clone();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[0].body["gene"], "actn3");
    }

    #[tokio::test]
    async fn missing_script_answers_500() {
        let state = Arc::new(MockState::default());
        let resp = post_json(build_router(state), "/generate_daily_workout", "{}").await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_string(resp).await.contains("no scripted reply"));
    }

    #[tokio::test]
    async fn wrong_credentials_get_plain_text_401() {
        let state = Arc::new(MockState {
            required_authorization: Some("Basic YWRtaW46cw==".to_string()),
            ..MockState::default()
        });
        let resp = post_json(build_router(state), "/generate_plan", "{}").await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_string(resp).await, UNAUTHORIZED_BODY);
    }
}
