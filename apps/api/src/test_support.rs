//! Stub backends and request helpers for router-level tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::auth::TokenVerifier;
use crate::errors::AppError;
use crate::github::client::{GithubError, GithubSource, GithubSummary};
use crate::llm_client::{ChatCompletion, ChatRequest, LlmError};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::memory::MemorySkillStore;

pub const VALID_TOKEN: &str = "valid-token";

/// Replies with a canned completion and records every prompt it receives.
pub struct StubLlm {
    reply: Result<String, u16>,
    pub prompts: Mutex<Vec<String>>,
    pub temperatures: Mutex<Vec<Option<f32>>>,
}

impl StubLlm {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::default(),
            temperatures: Mutex::default(),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
            prompts: Mutex::default(),
            temperatures: Mutex::default(),
        }
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatCompletion for StubLlm {
    async fn complete(&self, request: ChatRequest<'_>) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(request.prompt.to_string());
        self.temperatures.lock().unwrap().push(request.temperature);
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(LlmError::Api {
                status: *status,
                message: "stubbed failure".to_string(),
            }),
        }
    }
}

/// Serves one fixed summary; any other login is unknown.
#[derive(Default)]
pub struct StubGithub {
    pub summary: Option<GithubSummary>,
}

#[async_trait]
impl GithubSource for StubGithub {
    async fn fetch_summary(&self, username: &str) -> Result<GithubSummary, GithubError> {
        match &self.summary {
            Some(summary) if summary.login.eq_ignore_ascii_case(username) => Ok(summary.clone()),
            _ => Err(GithubError::UserNotFound),
        }
    }
}

/// Accepts only `VALID_TOKEN`, resolving it to a fixed user.
pub struct StubVerifier {
    pub user_id: Uuid,
}

#[async_trait]
impl TokenVerifier for StubVerifier {
    async fn verify(&self, token: &str) -> Result<Uuid, AppError> {
        if token == VALID_TOKEN {
            Ok(self.user_id)
        } else {
            Err(AppError::Unauthorized("Invalid or expired token".to_string()))
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemorySkillStore>,
    pub llm: Arc<StubLlm>,
    pub user_id: Uuid,
}

pub fn test_app(llm: StubLlm, github: StubGithub) -> TestApp {
    let store = Arc::new(MemorySkillStore::default());
    let llm = Arc::new(llm);
    let user_id = Uuid::new_v4();
    let state = AppState {
        store: store.clone(),
        llm: llm.clone(),
        github: Arc::new(github),
        auth: Arc::new(StubVerifier { user_id }),
    };
    TestApp {
        router: build_router(state),
        store,
        llm,
        user_id,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn send_json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }
}

/// Serves `router` on an ephemeral local port and returns its base URL.
/// Used to stand in for the AI gateway and the GitHub API in client tests.
pub async fn serve_local(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}
