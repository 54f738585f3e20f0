use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Category used when a skill row has none.
pub const DEFAULT_CATEGORY: &str = "technical";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SkillRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub skill_name: String,
    /// Stored as text: `"87%"` for CV rows, `"85"` for GitHub rows.
    pub confidence: String,
    pub category: Option<String>,
    pub trend: Option<String>,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SkillRow {
    /// Numeric value of the leading digits of `confidence`, for ordering.
    pub fn confidence_value(&self) -> f64 {
        let numeric: String = self
            .confidence
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        numeric.parse().unwrap_or(0.0)
    }
}

/// Origin of a skill batch. Scopes delete-then-reinsert updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillSource {
    Cv,
    Github,
}

impl SkillSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillSource::Cv => "cv",
            SkillSource::Github => "github",
        }
    }
}

/// Which existing rows an import wipes before inserting its batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceScope {
    /// Every skill of the user, whatever its source.
    AllSources,
    /// Only rows tagged with this source.
    Source(SkillSource),
}

/// A skill row about to be inserted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSkill {
    pub skill_name: String,
    pub confidence: String,
    pub category: String,
    pub trend: String,
    pub source: SkillSource,
}

/// Partial update of a skill. Only these fields may be edited.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SkillUpdate {
    pub skill_name: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub confidence: Option<String>,
    pub category: Option<String>,
    pub trend: Option<String>,
}

impl SkillUpdate {
    pub fn is_empty(&self) -> bool {
        self.skill_name.is_none()
            && self.confidence.is_none()
            && self.category.is_none()
            && self.trend.is_none()
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "confidence must be a string or number, got {other}"
        ))),
    }
}
