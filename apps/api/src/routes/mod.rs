pub mod extract;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};

use crate::cv::{self, upload::MAX_UPLOAD_BYTES};
use crate::github;
use crate::matching;
use crate::profile;
use crate::skills;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // CV extraction
        .route("/api/v1/cv/parse", post(cv::handlers::handle_parse_cv))
        .route(
            "/api/v1/cv/upload",
            post(cv::handlers::handle_upload_cv).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        // GitHub import
        .route(
            "/api/v1/github/import",
            post(github::handlers::handle_import_github),
        )
        // Job matching
        .route("/api/v1/jobs/match", post(matching::handlers::handle_match_job))
        // Profile and skill maintenance
        .route("/api/v1/profile", get(profile::handlers::handle_get_profile))
        .route(
            "/api/v1/skills",
            patch(skills::handlers::handle_edit_skill).delete(skills::handlers::handle_delete_skill),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::{body::Body, http::Request};

    use crate::test_support::{test_app, StubGithub, StubLlm};

    #[tokio::test]
    async fn test_health() {
        let app = test_app(StubLlm::replying("[]"), StubGithub::default());
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = app.send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "sonara-api");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = test_app(StubLlm::replying("[]"), StubGithub::default());
        let request = Request::builder().uri("/nope").body(Body::empty()).unwrap();
        let (status, _) = app.send(request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
