use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::profile::ProfileRow;
use crate::profile::summary::{summarize, SkillSummary};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub profile: ProfileRow,
    #[serde(flatten)]
    pub summary: SkillSummary,
}

/// GET /api/v1/profile
///
/// Profile and skills of the caller identified by the bearer token.
pub async fn handle_get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    info!("Fetching profile for user {user_id}");

    let profile = state
        .store
        .fetch_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    let skills = state.store.list_skills(user_id).await?;
    info!("Found {} skills for user {user_id}", skills.len());

    Ok(Json(ProfileResponse {
        success: true,
        profile,
        summary: summarize(skills),
    }))
}
