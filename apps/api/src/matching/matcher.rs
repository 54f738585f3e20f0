use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::json_repair::{lenient_f64, parse_lenient, JsonShape};
use crate::llm_client::prompts::{fill_template, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{ChatCompletion, ChatRequest};
use crate::matching::prompts::{JOB_MATCH_PROMPT_TEMPLATE, JOB_MATCH_SYSTEM};
use crate::models::skill::SkillRow;
use crate::store::SkillStore;

const MATCH_TEMPERATURE: f32 = 0.4;

pub const NO_SKILLS_MESSAGE: &str =
    "No skills found for user. Please extract skills from CV or GitHub first.";

/// Skill present in both the profile and the job description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingSkill {
    pub skill: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingSkill {
    pub skill: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_time: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Model verdict on how well the stored skills cover a job description.
/// Only `match_score` is interpreted; everything else is relayed as the model wrote it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(deserialize_with = "lenient_f64")]
    pub match_score: f64,
    #[serde(default)]
    pub matching_skills: Vec<MatchingSkill>,
    #[serde(default)]
    pub missing_skills: Vec<MissingSkill>,
    #[serde(default)]
    pub recommendations: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MatchResult {
    fn normalized(mut self) -> Self {
        self.match_score = self.match_score.clamp(0.0, 100.0);
        // The response envelope owns this key.
        self.extra.remove("success");
        self
    }
}

pub fn skill_list(skills: &[SkillRow]) -> String {
    skills
        .iter()
        .map(|s| s.skill_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn build_prompt(skills: &[SkillRow], job_description: &str) -> String {
    let user_skills = skill_list(skills);
    fill_template(
        JOB_MATCH_PROMPT_TEMPLATE,
        &[
            ("user_skills", user_skills.as_str()),
            ("job_description", job_description),
            ("json_only", JSON_ONLY_INSTRUCTION),
        ],
    )
}

pub async fn match_job(
    store: &dyn SkillStore,
    llm: &dyn ChatCompletion,
    user_id: Uuid,
    job_description: &str,
) -> Result<MatchResult, AppError> {
    info!("Matching job for user {user_id}");

    let skills = store.list_skills(user_id).await?;
    if skills.is_empty() {
        return Err(AppError::Validation(NO_SKILLS_MESSAGE.to_string()));
    }

    info!("User {user_id} has {} skills", skills.len());

    let prompt = build_prompt(&skills, job_description);
    let text = llm
        .complete(ChatRequest::new(JOB_MATCH_SYSTEM, &prompt).with_temperature(MATCH_TEMPERATURE))
        .await?;

    let value = parse_lenient(&text, JsonShape::Object)
        .map_err(|e| AppError::Llm(format!("Failed to parse AI response as JSON: {e}")))?;
    let result: MatchResult = serde_json::from_value(value)
        .map_err(|e| AppError::Llm(format!("Failed to parse AI response as JSON: {e}")))?;
    let result = result.normalized();

    info!("Match score for user {user_id}: {}%", result.match_score);
    Ok(result)
}
