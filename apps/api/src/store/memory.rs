//! In-memory `SkillStore` used by handler tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::ProfileRow;
use crate::models::skill::{NewSkill, ReplaceScope, SkillRow, SkillUpdate};
use crate::store::SkillStore;

#[derive(Default)]
pub struct MemorySkillStore {
    profiles: Mutex<Vec<ProfileRow>>,
    skills: Mutex<Vec<SkillRow>>,
}

impl MemorySkillStore {
    pub fn insert_profile(&self, user_id: Uuid, github_username: Option<&str>) {
        let now = Utc::now();
        self.profiles.lock().unwrap().push(ProfileRow {
            id: user_id,
            email: Some("dev@example.com".into()),
            full_name: Some("Dev Example".into()),
            github_username: github_username.map(String::from),
            created_at: now,
            updated_at: now,
        });
    }

    pub fn insert_skill(&self, user_id: Uuid, name: &str, confidence: &str, source: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.skills.lock().unwrap().push(SkillRow {
            id,
            user_id,
            skill_name: name.into(),
            confidence: confidence.into(),
            category: Some("technical".into()),
            trend: Some("stable".into()),
            source: Some(source.into()),
            created_at: Utc::now(),
        });
        id
    }

    pub fn skills_of(&self, user_id: Uuid) -> Vec<SkillRow> {
        self.skills
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn profile_of(&self, user_id: Uuid) -> Option<ProfileRow> {
        self.profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == user_id)
            .cloned()
    }
}

#[async_trait]
impl SkillStore for MemorySkillStore {
    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<ProfileRow>, AppError> {
        Ok(self.profile_of(user_id))
    }

    async fn list_skills(&self, user_id: Uuid) -> Result<Vec<SkillRow>, AppError> {
        Ok(self.skills_of(user_id))
    }

    async fn replace_skills(
        &self,
        user_id: Uuid,
        scope: ReplaceScope,
        batch: &[NewSkill],
    ) -> Result<u64, AppError> {
        let mut skills = self.skills.lock().unwrap();
        skills.retain(|s| {
            s.user_id != user_id
                || match scope {
                    ReplaceScope::AllSources => false,
                    ReplaceScope::Source(source) => s.source.as_deref() != Some(source.as_str()),
                }
        });
        for skill in batch {
            skills.push(SkillRow {
                id: Uuid::new_v4(),
                user_id,
                skill_name: skill.skill_name.clone(),
                confidence: skill.confidence.clone(),
                category: Some(skill.category.clone()),
                trend: Some(skill.trend.clone()),
                source: Some(skill.source.as_str().to_string()),
                created_at: Utc::now(),
            });
        }
        Ok(batch.len() as u64)
    }

    async fn set_github_username(&self, user_id: Uuid, username: &str) -> Result<(), AppError> {
        let mut profiles = self.profiles.lock().unwrap();
        match profiles.iter_mut().find(|p| p.id == user_id) {
            Some(profile) => {
                profile.github_username = Some(username.to_string());
                profile.updated_at = Utc::now();
            }
            None => {
                let now = Utc::now();
                profiles.push(ProfileRow {
                    id: user_id,
                    email: None,
                    full_name: None,
                    github_username: Some(username.to_string()),
                    created_at: now,
                    updated_at: now,
                });
            }
        }
        Ok(())
    }

    async fn update_skill(
        &self,
        user_id: Uuid,
        skill_id: Uuid,
        update: &SkillUpdate,
    ) -> Result<Option<SkillRow>, AppError> {
        let mut skills = self.skills.lock().unwrap();
        let Some(row) = skills
            .iter_mut()
            .find(|s| s.id == skill_id && s.user_id == user_id)
        else {
            return Ok(None);
        };
        if let Some(name) = &update.skill_name {
            row.skill_name = name.clone();
        }
        if let Some(confidence) = &update.confidence {
            row.confidence = confidence.clone();
        }
        if let Some(category) = &update.category {
            row.category = Some(category.clone());
        }
        if let Some(trend) = &update.trend {
            row.trend = Some(trend.clone());
        }
        Ok(Some(row.clone()))
    }

    async fn delete_skill(&self, user_id: Uuid, skill_id: Uuid) -> Result<bool, AppError> {
        let mut skills = self.skills.lock().unwrap();
        let before = skills.len();
        skills.retain(|s| !(s.id == skill_id && s.user_id == user_id));
        Ok(skills.len() < before)
    }
}
