//! Persistence seam for profiles and skills.
//!
//! `AppState` holds an `Arc<dyn SkillStore>`. Production uses `PgSkillStore`;
//! handler tests swap in the in-memory store.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::ProfileRow;
use crate::models::skill::{NewSkill, ReplaceScope, SkillRow, SkillUpdate};

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgSkillStore;

#[async_trait]
pub trait SkillStore: Send + Sync {
    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<ProfileRow>, AppError>;

    /// All skills of a user, in no particular order.
    async fn list_skills(&self, user_id: Uuid) -> Result<Vec<SkillRow>, AppError>;

    /// Deletes the rows covered by `scope`, then inserts `batch`.
    /// Returns the number of inserted rows.
    async fn replace_skills(
        &self,
        user_id: Uuid,
        scope: ReplaceScope,
        batch: &[NewSkill],
    ) -> Result<u64, AppError>;

    /// Records the GitHub login on the user's profile, creating the profile if needed.
    async fn set_github_username(&self, user_id: Uuid, username: &str) -> Result<(), AppError>;

    /// Applies `update` to the skill if `user_id` owns it.
    async fn update_skill(
        &self,
        user_id: Uuid,
        skill_id: Uuid,
        update: &SkillUpdate,
    ) -> Result<Option<SkillRow>, AppError>;

    /// Returns whether a row was deleted.
    async fn delete_skill(&self, user_id: Uuid, skill_id: Uuid) -> Result<bool, AppError>;
}
