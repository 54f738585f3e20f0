use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::github::client::{GithubError, GithubSource};
use crate::github::prompts::{GITHUB_SKILLS_PROMPT_TEMPLATE, GITHUB_SKILLS_SYSTEM};
use crate::llm_client::json_repair::{parse_lenient, JsonShape};
use crate::llm_client::prompts::fill_template;
use crate::llm_client::{ChatCompletion, ChatRequest};
use crate::models::skill::{NewSkill, ReplaceScope, SkillSource, DEFAULT_CATEGORY};
use crate::skills::dedup::dedup_by_name;
use crate::store::SkillStore;

const DEFAULT_CONFIDENCE: &str = "85";
const DEFAULT_TREND: &str = "stable";

/// Skill profile as returned by the model and relayed to the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillProfile {
    #[serde(default)]
    pub categories: Vec<SkillCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Some model replies label the group `category` instead of `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub skills: Vec<GithubSkill>,
}

impl SkillCategory {
    pub fn label(&self) -> Option<&str> {
        self.name
            .as_deref()
            .or(self.category.as_deref())
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubSkill {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

/// Reduces a pasted profile URL or `@handle` to the bare login.
pub fn normalize_username(input: &str) -> String {
    static PROFILE_URL: OnceLock<Regex> = OnceLock::new();
    let re = PROFILE_URL.get_or_init(|| {
        Regex::new(r"^https?://(www\.)?github\.com/")
            .unwrap_or_else(|e| panic!("invalid built-in regex: {e}"))
    });
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix('@').unwrap_or(trimmed);
    let without_host = re.replace(trimmed, "");
    without_host
        .strip_suffix('/')
        .unwrap_or(&*without_host)
        .to_string()
}

/// GitHub logins are alphanumeric with single inner hyphens, at most 39 characters.
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.len() <= 39
        && !username.starts_with('-')
        && !username.ends_with('-')
        && !username.contains("--")
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn confidence_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => DEFAULT_CONFIDENCE.to_string(),
    }
}

/// Flattens the category tree into rows, deduplicated by name.
pub fn skills_to_rows(profile: &SkillProfile) -> Vec<NewSkill> {
    let rows: Vec<NewSkill> = profile
        .categories
        .iter()
        .flat_map(|category| {
            let label = category.label().unwrap_or(DEFAULT_CATEGORY);
            category.skills.iter().filter_map(move |skill| {
                let name = skill.name.as_deref().map(str::trim).filter(|n| !n.is_empty())?;
                Some(NewSkill {
                    skill_name: name.to_string(),
                    confidence: confidence_text(skill.confidence.as_ref()),
                    category: label.to_string(),
                    trend: skill
                        .trend
                        .clone()
                        .filter(|t| !t.is_empty())
                        .unwrap_or_else(|| DEFAULT_TREND.to_string()),
                    source: SkillSource::Github,
                })
            })
        })
        .collect();

    dedup_by_name(rows, |row| row.skill_name.as_str())
}

/// Fetches the GitHub summary, asks the model for skills, and replaces the
/// user's github-sourced rows with the result.
pub async fn import_github_skills(
    store: &dyn SkillStore,
    llm: &dyn ChatCompletion,
    github: &dyn GithubSource,
    user_id: Uuid,
    username: &str,
) -> Result<SkillProfile, AppError> {
    info!("Fetching GitHub data for {username}");

    let summary = github.fetch_summary(username).await.map_err(|e| match e {
        GithubError::UserNotFound => AppError::NotFound(e.to_string()),
        other => AppError::Upstream(other.to_string()),
    })?;

    let summary_json = serde_json::to_string_pretty(&summary)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode GitHub summary: {e}")))?;
    let prompt = fill_template(
        GITHUB_SKILLS_PROMPT_TEMPLATE,
        &[("github_summary", summary_json.as_str())],
    );

    info!(
        "GitHub data fetched ({} repositories), sending to AI for analysis",
        summary.repositories.len()
    );

    let text = llm
        .complete(ChatRequest::new(GITHUB_SKILLS_SYSTEM, &prompt))
        .await
        .map_err(|e| {
            tracing::error!("AI gateway failed during GitHub analysis: {e}");
            AppError::Llm("Failed to analyze GitHub data with AI".to_string())
        })?;

    let value = parse_lenient(&text, JsonShape::Object)
        .map_err(|e| AppError::Llm(format!("Failed to parse AI-generated skills: {e}")))?;
    let profile: SkillProfile = serde_json::from_value(value)
        .map_err(|e| AppError::Llm(format!("Failed to parse AI-generated skills: {e}")))?;

    let rows = skills_to_rows(&profile);
    let inserted = store
        .replace_skills(user_id, ReplaceScope::Source(SkillSource::Github), &rows)
        .await?;
    store.set_github_username(user_id, username).await?;

    info!("Saved {inserted} GitHub skills for user {user_id}");
    Ok(profile)
}
