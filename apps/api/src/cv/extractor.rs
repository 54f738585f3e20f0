//! CV skill extraction pipeline.
//!
//! binary guard → prompt (first 8000 chars) → lenient array parse →
//! confidence/name filter → case-insensitive dedup → replace all user skills.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cv::prompts::{CV_EXTRACTION_PROMPT_TEMPLATE, CV_EXTRACTION_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::json_repair::{lenient_f64, parse_lenient, JsonShape};
use crate::llm_client::prompts::fill_template;
use crate::llm_client::{ChatCompletion, ChatRequest};
use crate::models::skill::{NewSkill, ReplaceScope, SkillSource, DEFAULT_CATEGORY};
use crate::skills::dedup::dedup_by_name;
use crate::store::SkillStore;

/// Entries below this confidence are treated as hallucinations.
pub const MIN_CONFIDENCE: f64 = 0.6;
/// Only this many characters of the CV are sent to the model.
pub const CV_TEXT_LIMIT: usize = 8000;
const CV_TEMPERATURE: f32 = 0.3;
const NEW_SKILL_TREND: &str = "+0%";

pub const BINARY_INPUT_MESSAGE: &str =
    "Binary file detected. Please paste text content or upload a .txt file instead of PDF.";

/// One skill as reported by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSkill {
    pub name: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CvExtraction {
    pub skills_count: usize,
    pub skills: Vec<ExtractedSkill>,
}

/// Rejects text that is really a binary file pasted or decoded as text.
pub fn looks_binary(text: &str) -> bool {
    text.starts_with("%PDF")
        || text.contains('\0')
        || text.contains('\u{FFFD}')
        || text.contains("ï¿½")
}

/// The first `limit` characters of `text`.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Decodes each array element on its own; malformed entries are dropped.
pub fn decode_entries(entries: Vec<Value>) -> Vec<ExtractedSkill> {
    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<ExtractedSkill>(entry) {
            Ok(skill) => Some(skill),
            Err(e) => {
                debug!("Dropping malformed skill entry: {e}");
                None
            }
        })
        .collect()
}

/// Keeps confident entries with a plausible name, then dedups by lowercase name.
pub fn filter_skills(skills: Vec<ExtractedSkill>) -> Vec<ExtractedSkill> {
    let kept: Vec<ExtractedSkill> = skills
        .into_iter()
        .filter(|s| {
            let len = s.name.chars().count();
            s.confidence >= MIN_CONFIDENCE && len > 1 && len < 100
        })
        .collect();
    dedup_by_name(kept, |s| s.name.as_str())
}

/// `0.87` → `"87%"`.
pub fn confidence_percent(confidence: f64) -> String {
    format!("{}%", (confidence * 100.0).round() as i64)
}

pub fn to_row(skill: &ExtractedSkill) -> NewSkill {
    NewSkill {
        skill_name: skill.name.clone(),
        confidence: confidence_percent(skill.confidence),
        category: skill
            .category
            .clone()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        trend: NEW_SKILL_TREND.to_string(),
        source: SkillSource::Cv,
    }
}

/// Runs the full CV pipeline and replaces every skill the user has.
pub async fn extract_cv_skills(
    store: &dyn SkillStore,
    llm: &dyn ChatCompletion,
    user_id: Uuid,
    cv_text: &str,
) -> Result<CvExtraction, AppError> {
    if looks_binary(cv_text) {
        return Err(AppError::Validation(BINARY_INPUT_MESSAGE.to_string()));
    }

    info!("Processing CV for user {user_id}");

    let prompt = fill_template(
        CV_EXTRACTION_PROMPT_TEMPLATE,
        &[("cv_text", truncate_chars(cv_text, CV_TEXT_LIMIT))],
    );
    let text = llm
        .complete(ChatRequest::new(CV_EXTRACTION_SYSTEM, &prompt).with_temperature(CV_TEMPERATURE))
        .await?;

    debug!("Raw AI response: {}", truncate_chars(&text, 200));

    let entries = match parse_lenient(&text, JsonShape::Array)
        .map_err(|e| AppError::Llm(e.to_string()))?
    {
        Value::Array(entries) => entries,
        _ => return Err(AppError::Llm("AI response is not an array".to_string())),
    };

    let total = entries.len();
    let skills = filter_skills(decode_entries(entries));
    if skills.len() < total {
        warn!("Filtered {} of {total} extracted skills", total - skills.len());
    }
    info!("Extracted {total} skills, kept {}", skills.len());

    let rows: Vec<NewSkill> = skills.iter().map(to_row).collect();
    let inserted = store
        .replace_skills(user_id, ReplaceScope::AllSources, &rows)
        .await?;

    info!("Saved {inserted} skills to database for user {user_id}");

    Ok(CvExtraction {
        skills_count: rows.len(),
        skills,
    })
}
