use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cv::extractor::{extract_cv_skills, CvExtraction};
use crate::cv::upload::read_upload;
use crate::errors::AppError;
use crate::routes::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ParseCvRequest {
    #[serde(default)]
    pub cv_text: Option<String>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ParseCvResponse {
    pub success: bool,
    #[serde(flatten)]
    pub extraction: CvExtraction,
}

/// POST /api/v1/cv/parse
pub async fn handle_parse_cv(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ParseCvRequest>,
) -> Result<Json<ParseCvResponse>, AppError> {
    let (Some(cv_text), Some(user_id)) = (req.cv_text.filter(|t| !t.trim().is_empty()), req.user_id)
    else {
        return Err(AppError::Validation(
            "Missing cv_text or user_id".to_string(),
        ));
    };

    let extraction =
        extract_cv_skills(state.store.as_ref(), state.llm.as_ref(), user_id, &cv_text).await?;

    Ok(Json(ParseCvResponse {
        success: true,
        extraction,
    }))
}

/// POST /api/v1/cv/upload (multipart: `user_id`, `file`)
pub async fn handle_upload_cv(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ParseCvResponse>, AppError> {
    let upload = read_upload(multipart?).await?;

    let extraction = extract_cv_skills(
        state.store.as_ref(),
        state.llm.as_ref(),
        upload.user_id,
        &upload.text,
    )
    .await?;

    Ok(Json(ParseCvResponse {
        success: true,
        extraction,
    }))
}
