use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::github::client::GithubSource;
use crate::llm_client::ChatCompletion;
use crate::store::SkillStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SkillStore>,
    pub llm: Arc<dyn ChatCompletion>,
    /// GitHub REST backend used by the profile importer.
    pub github: Arc<dyn GithubSource>,
    pub auth: Arc<dyn TokenVerifier>,
}
