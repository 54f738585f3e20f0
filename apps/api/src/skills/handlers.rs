use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::skill::{SkillRow, SkillUpdate};
use crate::routes::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EditSkillRequest {
    #[serde(default)]
    pub skill_id: Option<Uuid>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub updates: Option<SkillUpdate>,
}

#[derive(Debug, Serialize)]
pub struct EditSkillResponse {
    pub success: bool,
    pub skill: SkillRow,
}

#[derive(Debug, Deserialize)]
pub struct DeleteSkillRequest {
    #[serde(default)]
    pub skill_id: Option<Uuid>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct DeleteSkillResponse {
    pub success: bool,
    pub message: &'static str,
}

fn require_ids(skill_id: Option<Uuid>, user_id: Option<Uuid>) -> Result<(Uuid, Uuid), AppError> {
    match (skill_id, user_id) {
        (Some(skill_id), Some(user_id)) => Ok((skill_id, user_id)),
        _ => Err(AppError::Validation(
            "Missing skill_id or user_id".to_string(),
        )),
    }
}

/// PATCH /api/v1/skills
///
/// Only `skill_name`, `confidence`, `category` and `trend` can be changed.
pub async fn handle_edit_skill(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<EditSkillRequest>,
) -> Result<Json<EditSkillResponse>, AppError> {
    let (skill_id, user_id) = require_ids(req.skill_id, req.user_id)?;

    let updates = req.updates.unwrap_or_default();
    if updates.is_empty() {
        return Err(AppError::Validation("No valid fields to update".to_string()));
    }

    info!("Updating skill {skill_id} for user {user_id}");

    let skill = state
        .store
        .update_skill(user_id, skill_id, &updates)
        .await?
        .ok_or_else(|| AppError::NotFound("Skill not found or access denied".to_string()))?;

    Ok(Json(EditSkillResponse {
        success: true,
        skill,
    }))
}

/// DELETE /api/v1/skills
pub async fn handle_delete_skill(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<DeleteSkillRequest>,
) -> Result<Json<DeleteSkillResponse>, AppError> {
    let (skill_id, user_id) = require_ids(req.skill_id, req.user_id)?;

    info!("Deleting skill {skill_id} for user {user_id}");

    if !state.store.delete_skill(user_id, skill_id).await? {
        warn!("Skill {skill_id} not found for user {user_id}; nothing deleted");
    }

    Ok(Json(DeleteSkillResponse {
        success: true,
        message: "Skill deleted successfully",
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use uuid::Uuid;

    use crate::test_support::{test_app, StubGithub, StubLlm};

    const URI: &str = "/api/v1/skills";

    #[tokio::test]
    async fn test_edit_missing_ids_is_400() {
        let app = test_app(StubLlm::replying("[]"), StubGithub::default());
        let (status, resp) = app
            .send_json(
                "PATCH",
                URI,
                json!({"user_id": app.user_id, "updates": {"trend": "up"}}),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp["error"], "Missing skill_id or user_id");
    }

    #[tokio::test]
    async fn test_edit_without_allowed_fields_is_400() {
        let app = test_app(StubLlm::replying("[]"), StubGithub::default());
        let skill_id = app.store.insert_skill(app.user_id, "Rust", "80%", "cv");
        let (status, resp) = app
            .send_json(
                "PATCH",
                URI,
                json!({"skill_id": skill_id, "user_id": app.user_id,
                       "updates": {"source": "github", "user_id": Uuid::new_v4()}}),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(resp["error"], "No valid fields to update");
    }

    #[tokio::test]
    async fn test_edit_applies_allowed_fields() {
        let app = test_app(StubLlm::replying("[]"), StubGithub::default());
        let skill_id = app.store.insert_skill(app.user_id, "Rust", "80%", "cv");
        let (status, resp) = app
            .send_json(
                "PATCH",
                URI,
                json!({"skill_id": skill_id, "user_id": app.user_id,
                       "updates": {"confidence": 95, "trend": "up", "source": "github"}}),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp["success"], true);
        assert_eq!(resp["skill"]["confidence"], "95");
        assert_eq!(resp["skill"]["trend"], "up");
        assert_eq!(resp["skill"]["source"], "cv");
        assert_eq!(resp["skill"]["skill_name"], "Rust");
    }

    #[tokio::test]
    async fn test_edit_other_users_skill_is_404() {
        let app = test_app(StubLlm::replying("[]"), StubGithub::default());
        let owner = Uuid::new_v4();
        let skill_id = app.store.insert_skill(owner, "Rust", "80%", "cv");
        let (status, resp) = app
            .send_json(
                "PATCH",
                URI,
                json!({"skill_id": skill_id, "user_id": app.user_id,
                       "updates": {"skill_name": "Hacked"}}),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(resp["error"], "Skill not found or access denied");
        assert_eq!(app.store.skills_of(owner)[0].skill_name, "Rust");
    }

    #[tokio::test]
    async fn test_delete_missing_ids_is_400() {
        let app = test_app(StubLlm::replying("[]"), StubGithub::default());
        let (status, _) = app
            .send_json("DELETE", URI, json!({"skill_id": Uuid::new_v4()}))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_is_scoped_to_owner() {
        let app = test_app(StubLlm::replying("[]"), StubGithub::default());
        let mine = app.store.insert_skill(app.user_id, "Rust", "80%", "cv");
        let owner = Uuid::new_v4();
        let theirs = app.store.insert_skill(owner, "Go", "70%", "cv");

        for skill_id in [mine, theirs] {
            let (status, resp) = app
                .send_json(
                    "DELETE",
                    URI,
                    json!({"skill_id": skill_id, "user_id": app.user_id}),
                )
                .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(resp["message"], "Skill deleted successfully");
        }

        assert!(app.store.skills_of(app.user_id).is_empty());
        assert_eq!(app.store.skills_of(owner).len(), 1);
    }
}
