//! Multipart CV upload: turns an uploaded `.txt` or `.pdf` file into CV text.

use axum::extract::Multipart;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

/// Upload bodies larger than this are rejected by the route's body limit.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug)]
pub struct UploadedCv {
    pub user_id: Uuid,
    pub text: String,
}

#[derive(Debug)]
struct UploadedFile {
    file_name: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

impl UploadedFile {
    fn is_pdf(&self) -> bool {
        self.data.starts_with(b"%PDF")
            || self
                .content_type
                .as_deref()
                .is_some_and(|ct| ct.eq_ignore_ascii_case("application/pdf"))
            || self
                .file_name
                .as_deref()
                .is_some_and(|name| name.to_ascii_lowercase().ends_with(".pdf"))
    }
}

/// Reads the `user_id` and `file` fields of a multipart body.
pub async fn read_upload(mut multipart: Multipart) -> Result<UploadedCv, AppError> {
    let mut user_id: Option<Uuid> = None;
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("user_id") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid user_id field: {e}")))?;
                user_id = Some(
                    Uuid::parse_str(raw.trim())
                        .map_err(|_| AppError::Validation("user_id must be a UUID".to_string()))?,
                );
            }
            Some("file") => {
                let file_name = field.file_name().map(String::from);
                let content_type = field.content_type().map(String::from);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
                file = Some(UploadedFile {
                    file_name,
                    content_type,
                    data,
                });
            }
            _ => {}
        }
    }

    let (Some(user_id), Some(file)) = (user_id, file) else {
        return Err(AppError::Validation("Missing file or user_id".to_string()));
    };

    info!(
        "Received CV upload {:?} ({} bytes) for user {user_id}",
        file.file_name,
        file.data.len()
    );

    let text = file_to_text(file).await?;
    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "No readable text found in the uploaded file".to_string(),
        ));
    }

    Ok(UploadedCv { user_id, text })
}

/// Drops the replacement characters and NULs `pdf_extract` emits for unmapped glyphs.
fn clean_extracted_text(text: &str) -> String {
    text.chars().filter(|c| *c != '\u{FFFD}' && *c != '\0').collect()
}

async fn file_to_text(file: UploadedFile) -> Result<String, AppError> {
    if file.is_pdf() {
        let data = file.data;
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}")))?
            .map_err(|e| AppError::Validation(format!("Could not read PDF: {e}")))?;
        return Ok(clean_extracted_text(&text));
    }

    String::from_utf8(file.data.to_vec()).map_err(|_| {
        AppError::Validation("Uploaded file is not UTF-8 text or PDF".to_string())
    })
}
