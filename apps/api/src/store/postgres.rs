use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::ProfileRow;
use crate::models::skill::{NewSkill, ReplaceScope, SkillRow, SkillUpdate};
use crate::store::SkillStore;

#[derive(Clone)]
pub struct PgSkillStore {
    pool: PgPool,
}

impl PgSkillStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// One multi-row INSERT for the whole batch. `batch` must not be empty.
fn insert_batch(user_id: Uuid, batch: &[NewSkill]) -> QueryBuilder<'_, Postgres> {
    let mut insert = QueryBuilder::<Postgres>::new(
        "INSERT INTO skills (id, user_id, skill_name, confidence, category, trend, source) ",
    );
    insert.push_values(batch, |mut row, skill| {
        row.push_bind(Uuid::new_v4())
            .push_bind(user_id)
            .push_bind(&skill.skill_name)
            .push_bind(&skill.confidence)
            .push_bind(&skill.category)
            .push_bind(&skill.trend)
            .push_bind(skill.source.as_str());
    });
    insert
}

#[async_trait]
impl SkillStore for PgSkillStore {
    async fn fetch_profile(&self, user_id: Uuid) -> Result<Option<ProfileRow>, AppError> {
        Ok(
            sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_skills(&self, user_id: Uuid) -> Result<Vec<SkillRow>, AppError> {
        Ok(
            sqlx::query_as::<_, SkillRow>("SELECT * FROM skills WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn replace_skills(
        &self,
        user_id: Uuid,
        scope: ReplaceScope,
        batch: &[NewSkill],
    ) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;

        let deleted = match scope {
            ReplaceScope::AllSources => {
                sqlx::query("DELETE FROM skills WHERE user_id = $1")
                    .bind(user_id)
                    .execute(&mut *tx)
                    .await?
            }
            ReplaceScope::Source(source) => {
                sqlx::query("DELETE FROM skills WHERE user_id = $1 AND source = $2")
                    .bind(user_id)
                    .bind(source.as_str())
                    .execute(&mut *tx)
                    .await?
            }
        }
        .rows_affected();

        let inserted = if batch.is_empty() {
            0
        } else {
            insert_batch(user_id, batch)
                .build()
                .execute(&mut *tx)
                .await?
                .rows_affected()
        };

        tx.commit().await?;

        info!("Replaced skills for user {user_id} ({scope:?}): deleted {deleted}, inserted {inserted}");
        Ok(inserted)
    }

    async fn set_github_username(&self, user_id: Uuid, username: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO profiles (id, github_username)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE
                SET github_username = EXCLUDED.github_username,
                    updated_at = now()
            "#,
        )
        .bind(user_id)
        .bind(username)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_skill(
        &self,
        user_id: Uuid,
        skill_id: Uuid,
        update: &SkillUpdate,
    ) -> Result<Option<SkillRow>, AppError> {
        Ok(sqlx::query_as::<_, SkillRow>(
            r#"
            UPDATE skills SET
                skill_name = COALESCE($1, skill_name),
                confidence = COALESCE($2, confidence),
                category   = COALESCE($3, category),
                trend      = COALESCE($4, trend)
            WHERE id = $5 AND user_id = $6
            RETURNING *
            "#,
        )
        .bind(update.skill_name.as_deref())
        .bind(update.confidence.as_deref())
        .bind(update.category.as_deref())
        .bind(update.trend.as_deref())
        .bind(skill_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_skill(&self, user_id: Uuid, skill_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1 AND user_id = $2")
            .bind(skill_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
