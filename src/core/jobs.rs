// src/core/jobs.rs
//! Job application tracking

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::fmt;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JobStatus {
    #[default]
    Applied,
    Interviewing,
    Offered,
    Rejected,
}

impl JobStatus {
    pub const ALL: [JobStatus; 4] = [
        JobStatus::Applied,
        JobStatus::Interviewing,
        JobStatus::Offered,
        JobStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Applied => "Applied",
            JobStatus::Interviewing => "Interviewing",
            JobStatus::Offered => "Offered",
            JobStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown job status: {}. Use Applied, Interviewing, Offered or Rejected",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: String,
    pub company: String,
    pub position: String,
    pub job_description: String,
    pub status: JobStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a user supplies when creating or replacing a job application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInput {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub notes: String,
}

impl JobInput {
    /// Name of the first missing required field, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.company.trim().is_empty() {
            Some("Company")
        } else if self.position.trim().is_empty() {
            Some("Position")
        } else {
            None
        }
    }
}

#[derive(sqlx::FromRow)]
struct JobRow {
    id: String,
    company: String,
    position: String,
    job_description: String,
    status: String,
    notes: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for JobApplication {
    type Error = anyhow::Error;

    fn try_from(row: JobRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            company: row.company,
            position: row.position,
            job_description: row.job_description,
            status: row.status.parse()?,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub struct JobRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> JobRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: &str, input: &JobInput) -> Result<JobApplication> {
        let now = Utc::now();
        let job = JobApplication {
            id: uuid::Uuid::new_v4().to_string(),
            company: input.company.trim().to_string(),
            position: input.position.trim().to_string(),
            job_description: input.job_description.clone(),
            status: input.status,
            notes: input.notes.clone(),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO job_applications
                (id, user_id, company, position, job_description, status, notes, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&job.id)
        .bind(user_id)
        .bind(&job.company)
        .bind(&job.position)
        .bind(&job.job_description)
        .bind(job.status.as_str())
        .bind(&job.notes)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(self.pool)
        .await?;

        info!("Created job application {} at {}", job.id, job.company);
        Ok(job)
    }

    /// Newest first.
    pub async fn list(&self, user_id: &str) -> Result<Vec<JobApplication>> {
        let rows = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, company, position, job_description, status, notes, created_at, updated_at
            FROM job_applications
            WHERE user_id = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(JobApplication::try_from).collect()
    }

    pub async fn get(&self, user_id: &str, id: &str) -> Result<Option<JobApplication>> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, company, position, job_description, status, notes, created_at, updated_at
            FROM job_applications
            WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(JobApplication::try_from).transpose()
    }

    /// Replace the editable fields; `None` when the job does not belong to the user.
    pub async fn update(
        &self,
        user_id: &str,
        id: &str,
        input: &JobInput,
    ) -> Result<Option<JobApplication>> {
        let result = sqlx::query(
            r#"
            UPDATE job_applications
            SET company = ?, position = ?, job_description = ?, status = ?, notes = ?, updated_at = ?
            WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(input.company.trim())
        .bind(input.position.trim())
        .bind(&input.job_description)
        .bind(input.status.as_str())
        .bind(&input.notes)
        .bind(Utc::now())
        .bind(user_id)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        info!("Updated job application {}", id);
        self.get(user_id, id).await
    }

    pub async fn delete(&self, user_id: &str, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM job_applications WHERE user_id = ? AND id = ?")
            .bind(user_id)
            .bind(id)
            .execute(self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Deleted job application {}", id);
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::test_support::temp_database;
    use crate::core::users::UserRepository;

    fn input(company: &str, status: JobStatus) -> JobInput {
        JobInput {
            company: company.to_string(),
            position: "Backend Engineer".to_string(),
            job_description: "Python and Docker".to_string(),
            status,
            notes: String::new(),
        }
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("interviewing".parse::<JobStatus>().unwrap(), JobStatus::Interviewing);
        assert_eq!(" Offered ".parse::<JobStatus>().unwrap(), JobStatus::Offered);
        assert!("Ghosted".parse::<JobStatus>().is_err());
    }

    #[test]
    fn test_missing_field() {
        assert_eq!(input(" ", JobStatus::Applied).missing_field(), Some("Company"));
        assert_eq!(input("Acme", JobStatus::Applied).missing_field(), None);
    }

    #[tokio::test]
    async fn test_crud_is_scoped_to_user() {
        let db = temp_database().await;
        let users = UserRepository::new(db.pool());
        let alice = users.create("Alice", "alice@example.com", "secret1").await.unwrap();
        let bob = users.create("Bob", "bob@example.com", "secret2").await.unwrap();

        let repo = JobRepository::new(db.pool());
        let first = repo.create(&alice.id, &input("Acme", JobStatus::Applied)).await.unwrap();
        let second = repo.create(&alice.id, &input("Globex", JobStatus::Applied)).await.unwrap();

        let listed = repo.list(&alice.id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);
        assert!(repo.list(&bob.id).await.unwrap().is_empty());

        let updated = repo
            .update(&alice.id, &first.id, &input("Acme Corp", JobStatus::Offered))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.company, "Acme Corp");
        assert_eq!(updated.status, JobStatus::Offered);

        assert!(repo
            .update(&bob.id, &first.id, &input("Hijack", JobStatus::Rejected))
            .await
            .unwrap()
            .is_none());
        assert!(!repo.delete(&bob.id, &first.id).await.unwrap());
        assert!(repo.delete(&alice.id, &first.id).await.unwrap());
        assert!(repo.get(&alice.id, &first.id).await.unwrap().is_none());
    }
}
