use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::matcher::{match_job, MatchResult};
use crate::routes::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchJobRequest {
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct MatchJobResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: MatchResult,
}

/// POST /api/v1/jobs/match
pub async fn handle_match_job(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<MatchJobRequest>,
) -> Result<Json<MatchJobResponse>, AppError> {
    let (Some(job_description), Some(user_id)) = (
        req.job_description.filter(|d| !d.trim().is_empty()),
        req.user_id,
    ) else {
        return Err(AppError::Validation(
            "Missing job_description or user_id".to_string(),
        ));
    };

    let result = match_job(
        state.store.as_ref(),
        state.llm.as_ref(),
        user_id,
        &job_description,
    )
    .await?;

    Ok(Json(MatchJobResponse {
        success: true,
        result,
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::matching::matcher::NO_SKILLS_MESSAGE;
    use crate::test_support::{test_app, StubGithub, StubLlm};

    const URI: &str = "/api/v1/jobs/match";

    const AI_REPLY: &str = r#"```json
{
  "match_score": 72,
  "matching_skills": [{"skill": "Rust", "confidence": 0.9}],
  "missing_skills": [{"skill": "Kubernetes", "priority": "high", "learning_time": "4 weeks"}],
  "recommendations": ["Deploy a side project on Kubernetes"]
}
```"#;

    #[tokio::test]
    async fn test_missing_fields_are_400() {
        let app = test_app(StubLlm::replying(AI_REPLY), StubGithub::default());
        for body in [
            json!({"user_id": app.user_id}),
            json!({"job_description": "Rust engineer"}),
        ] {
            let (status, resp) = app.send_json("POST", URI, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(resp["error"], "Missing job_description or user_id");
        }
    }

    #[tokio::test]
    async fn test_user_without_skills_is_400() {
        let app = test_app(StubLlm::replying(AI_REPLY), StubGithub::default());
        let (status, resp) = app
            .send_json(
                "POST",
                URI,
                json!({"job_description": "Rust engineer", "user_id": app.user_id}),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp["error"], NO_SKILLS_MESSAGE);
        assert_eq!(app.llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_match_relays_ai_result() {
        let app = test_app(StubLlm::replying(AI_REPLY), StubGithub::default());
        app.store.insert_skill(app.user_id, "Rust", "92%", "cv");
        app.store.insert_skill(app.user_id, "Docker", "70", "github");

        let (status, resp) = app
            .send_json(
                "POST",
                URI,
                json!({"job_description": "Rust + Kubernetes", "user_id": app.user_id}),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp["success"], true);
        assert_eq!(resp["match_score"], 72.0);
        assert_eq!(resp["missing_skills"][0]["skill"], "Kubernetes");
        assert_eq!(resp["recommendations"].as_array().unwrap().len(), 1);

        let prompts = app.llm.prompts.lock().unwrap();
        assert!(prompts[0].contains("Rust, Docker"));
        assert_eq!(*app.llm.temperatures.lock().unwrap(), vec![Some(0.4)]);
    }

    #[tokio::test]
    async fn test_quoted_score_and_extra_keys_are_relayed() {
        let reply = r#"{"match_score": "72", "matching_skills": [{"skill": "Rust", "confidence": "high"}],
                        "missing_skills": [], "recommendations": [], "summary": "Good fit"}"#;
        let app = test_app(StubLlm::replying(reply), StubGithub::default());
        app.store.insert_skill(app.user_id, "Rust", "92%", "cv");

        let (status, resp) = app
            .send_json(
                "POST",
                URI,
                json!({"job_description": "Rust", "user_id": app.user_id}),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp["match_score"], 72.0);
        assert_eq!(resp["matching_skills"][0]["confidence"], "high");
        assert_eq!(resp["summary"], "Good fit");
        assert_eq!(resp["success"], true);
    }

    #[tokio::test]
    async fn test_non_json_reply_is_500() {
        let app = test_app(StubLlm::replying("no idea"), StubGithub::default());
        app.store.insert_skill(app.user_id, "Rust", "92%", "cv");
        let (status, resp) = app
            .send_json(
                "POST",
                URI,
                json!({"job_description": "Rust", "user_id": app.user_id}),
            )
            .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(resp["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to parse AI response as JSON"));
    }
}
