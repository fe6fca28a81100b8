// src/core/cvs.rs
//! Saved CVs. At most one CV per user is active; saving a new one activates it.

use crate::types::CvDocument;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedCv {
    pub id: String,
    #[serde(flatten)]
    pub cv: CvDocument,
    pub cv_html: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct CvRow {
    id: String,
    cv_data: String,
    cv_html: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CvRow> for SavedCv {
    type Error = anyhow::Error;

    fn try_from(row: CvRow) -> Result<Self> {
        let cv = serde_json::from_str(&row.cv_data)
            .with_context(|| format!("Stored CV {} is not valid JSON", row.id))?;
        Ok(Self {
            id: row.id,
            cv,
            cv_html: row.cv_html,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_COLUMNS: &str = "SELECT id, cv_data, cv_html, is_active, created_at, updated_at FROM saved_cvs";

pub struct CvRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CvRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a CV and make it the user's active one.
    pub async fn save(&self, user_id: &str, cv: &CvDocument, cv_html: &str) -> Result<SavedCv> {
        let now = Utc::now();
        let saved = SavedCv {
            id: uuid::Uuid::new_v4().to_string(),
            cv: cv.clone(),
            cv_html: cv_html.to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let cv_data = serde_json::to_string(cv).context("Failed to serialize CV")?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE saved_cvs SET is_active = FALSE, updated_at = ? WHERE user_id = ? AND is_active = TRUE")
            .bind(now)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO saved_cvs (id, user_id, cv_data, cv_html, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, TRUE, ?, ?)
            "#,
        )
        .bind(&saved.id)
        .bind(user_id)
        .bind(&cv_data)
        .bind(&saved.cv_html)
        .bind(saved.created_at)
        .bind(saved.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!("Saved CV {} as active", saved.id);
        Ok(saved)
    }

    /// Newest first.
    pub async fn list(&self, user_id: &str) -> Result<Vec<SavedCv>> {
        let rows = sqlx::query_as::<_, CvRow>(&format!(
            "{} WHERE user_id = ? ORDER BY created_at DESC, rowid DESC",
            SELECT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(SavedCv::try_from).collect()
    }

    pub async fn active(&self, user_id: &str) -> Result<Option<SavedCv>> {
        let row = sqlx::query_as::<_, CvRow>(&format!(
            "{} WHERE user_id = ? AND is_active = TRUE LIMIT 1",
            SELECT_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(SavedCv::try_from).transpose()
    }

    pub async fn delete(&self, user_id: &str, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM saved_cvs WHERE user_id = ? AND id = ?")
            .bind(user_id)
            .bind(id)
            .execute(self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Deleted CV {}", id);
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::test_support::temp_database;
    use crate::core::users::UserRepository;
    use crate::types::cv_data::PersonalInfo;

    fn cv(name: &str) -> CvDocument {
        CvDocument {
            personal_info: PersonalInfo {
                full_name: name.to_string(),
                ..Default::default()
            },
            skills: vec!["Python".to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_latest_save_becomes_active() {
        let db = temp_database().await;
        let user = UserRepository::new(db.pool())
            .create("Jane", "jane@example.com", "secret1")
            .await
            .unwrap();
        let repo = CvRepository::new(db.pool());

        assert!(repo.active(&user.id).await.unwrap().is_none());

        let first = repo.save(&user.id, &cv("First"), "<p>1</p>").await.unwrap();
        let second = repo.save(&user.id, &cv("Second"), "").await.unwrap();

        let active = repo.active(&user.id).await.unwrap().unwrap();
        assert_eq!(active.id, second.id);
        assert_eq!(active.cv.personal_info.full_name, "Second");

        let all = repo.list(&user.id).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all.iter().filter(|c| c.is_active).count(), 1);

        assert!(repo.delete(&user.id, &second.id).await.unwrap());
        assert!(repo.active(&user.id).await.unwrap().is_none());
        assert_eq!(repo.list(&user.id).await.unwrap()[0].id, first.id);
    }

    #[test]
    fn test_saved_cv_serializes_flat() {
        let saved = SavedCv {
            id: "1".to_string(),
            cv: cv("Jane"),
            cv_html: String::new(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&saved).unwrap();
        assert_eq!(json["personalInfo"]["fullName"], "Jane");
        assert_eq!(json["isActive"], true);
    }
}
