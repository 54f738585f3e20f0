use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::github::importer::{
    import_github_skills, is_valid_username, normalize_username, SkillProfile,
};
use crate::routes::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ImportGithubRequest {
    #[serde(default)]
    pub github_username: Option<String>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ImportGithubResponse {
    pub success: bool,
    #[serde(flatten)]
    pub profile: SkillProfile,
}

/// POST /api/v1/github/import
pub async fn handle_import_github(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ImportGithubRequest>,
) -> Result<Json<ImportGithubResponse>, AppError> {
    let raw_username = req
        .github_username
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::Validation("GitHub username is required".to_string()))?;
    let user_id = req
        .user_id
        .ok_or_else(|| AppError::Validation("user_id is required".to_string()))?;

    let username = normalize_username(&raw_username);
    if !is_valid_username(&username) {
        return Err(AppError::Validation(format!(
            "Invalid GitHub username: {username}"
        )));
    }

    let profile = import_github_skills(
        state.store.as_ref(),
        state.llm.as_ref(),
        state.github.as_ref(),
        user_id,
        &username,
    )
    .await?;

    Ok(Json(ImportGithubResponse {
        success: true,
        profile,
    }))
}
