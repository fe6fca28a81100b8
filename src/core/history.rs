// src/core/history.rs
//! Stored analysis results: resume reviews, resume/job matches and generated resumes

use crate::analysis::{GeneratedResume, JobAnalysis, MatchResult, ResumeReview};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

// ===== Resume reviews =====

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysisRecord {
    pub id: String,
    pub original_text: String,
    #[serde(flatten)]
    pub review: ResumeReview,
    pub created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct ResumeAnalysisRow {
    id: String,
    original_text: String,
    ai_score: i64,
    ats_score: i64,
    suggestions: String,
    ai_improved_text: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ResumeAnalysisRow> for ResumeAnalysisRecord {
    type Error = anyhow::Error;

    fn try_from(row: ResumeAnalysisRow) -> Result<Self> {
        Ok(Self {
            review: ResumeReview {
                ai_score: row.ai_score as u32,
                ats_score: row.ats_score as u32,
                suggestions: serde_json::from_str(&row.suggestions)
                    .context("Stored suggestions are not valid JSON")?,
                ai_improved_text: row.ai_improved_text,
            },
            id: row.id,
            original_text: row.original_text,
            created_at: row.created_at,
        })
    }
}

// ===== Matches =====

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub id: String,
    pub resume_text: String,
    pub job_description: String,
    #[serde(flatten)]
    pub result: MatchResult,
    pub created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct MatchRow {
    id: String,
    resume_text: String,
    job_description: String,
    analysis: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<MatchRow> for MatchRecord {
    type Error = anyhow::Error;

    fn try_from(row: MatchRow) -> Result<Self> {
        Ok(Self {
            result: serde_json::from_str(&row.analysis)
                .with_context(|| format!("Stored match {} is not valid JSON", row.id))?,
            id: row.id,
            resume_text: row.resume_text,
            job_description: row.job_description,
            created_at: row.created_at,
        })
    }
}

// ===== Generated resumes =====

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedResumeRecord {
    pub id: String,
    pub job_description: String,
    pub analysis: JobAnalysis,
    pub resume: String,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct GeneratedResumeRow {
    id: String,
    job_description: String,
    analysis: String,
    resume_text: String,
    file_name: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<GeneratedResumeRow> for GeneratedResumeRecord {
    type Error = anyhow::Error;

    fn try_from(row: GeneratedResumeRow) -> Result<Self> {
        Ok(Self {
            analysis: serde_json::from_str(&row.analysis)
                .with_context(|| format!("Stored analysis {} is not valid JSON", row.id))?,
            id: row.id,
            job_description: row.job_description,
            resume: row.resume_text,
            file_name: row.file_name,
            created_at: row.created_at,
        })
    }
}

// ===== Repository =====

pub struct HistoryRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> HistoryRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn record_resume_analysis(
        &self,
        user_id: &str,
        original_text: &str,
        review: &ResumeReview,
    ) -> Result<ResumeAnalysisRecord> {
        let record = ResumeAnalysisRecord {
            id: uuid::Uuid::new_v4().to_string(),
            original_text: original_text.to_string(),
            review: review.clone(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO resume_analyses
                (id, user_id, original_text, ai_score, ats_score, suggestions, ai_improved_text, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(user_id)
        .bind(&record.original_text)
        .bind(review.ai_score as i64)
        .bind(review.ats_score as i64)
        .bind(serde_json::to_string(&review.suggestions)?)
        .bind(&review.ai_improved_text)
        .bind(record.created_at)
        .execute(self.pool)
        .await?;

        Ok(record)
    }

    /// Newest first.
    pub async fn resume_analyses(&self, user_id: &str) -> Result<Vec<ResumeAnalysisRecord>> {
        let rows = sqlx::query_as::<_, ResumeAnalysisRow>(
            r#"
            SELECT id, original_text, ai_score, ats_score, suggestions, ai_improved_text, created_at
            FROM resume_analyses
            WHERE user_id = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ResumeAnalysisRecord::try_from).collect()
    }

    pub async fn record_match(
        &self,
        user_id: &str,
        resume_text: &str,
        job_description: &str,
        result: &MatchResult,
    ) -> Result<MatchRecord> {
        let record = MatchRecord {
            id: uuid::Uuid::new_v4().to_string(),
            resume_text: resume_text.to_string(),
            job_description: job_description.to_string(),
            result: result.clone(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO job_matches
                (id, user_id, resume_text, job_description, match_score, ats_score, analysis, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(user_id)
        .bind(&record.resume_text)
        .bind(&record.job_description)
        .bind(result.match_score as i64)
        .bind(result.ats_score as i64)
        .bind(serde_json::to_string(result)?)
        .bind(record.created_at)
        .execute(self.pool)
        .await?;

        Ok(record)
    }

    pub async fn matches(&self, user_id: &str) -> Result<Vec<MatchRecord>> {
        let rows = sqlx::query_as::<_, MatchRow>(
            r#"
            SELECT id, resume_text, job_description, analysis, created_at
            FROM job_matches
            WHERE user_id = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(MatchRecord::try_from).collect()
    }

    pub async fn record_generated_resume(
        &self,
        user_id: &str,
        job_description: &str,
        generated: &GeneratedResume,
    ) -> Result<GeneratedResumeRecord> {
        let record = GeneratedResumeRecord {
            id: uuid::Uuid::new_v4().to_string(),
            job_description: job_description.to_string(),
            analysis: generated.analysis.clone(),
            resume: generated.resume.clone(),
            file_name: generated.file_name.clone(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO generated_resumes
                (id, user_id, job_description, analysis, resume_text, file_name, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(user_id)
        .bind(&record.job_description)
        .bind(serde_json::to_string(&record.analysis)?)
        .bind(&record.resume)
        .bind(&record.file_name)
        .bind(record.created_at)
        .execute(self.pool)
        .await?;

        Ok(record)
    }

    pub async fn generated_resumes(&self, user_id: &str) -> Result<Vec<GeneratedResumeRecord>> {
        let rows = sqlx::query_as::<_, GeneratedResumeRow>(
            r#"
            SELECT id, job_description, analysis, resume_text, file_name, created_at
            FROM generated_resumes
            WHERE user_id = ?
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(GeneratedResumeRecord::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{generate_resume, match_resume, review_resume, UserInfo};
    use crate::core::database::test_support::temp_database;
    use crate::core::users::UserRepository;

    #[tokio::test]
    async fn test_records_round_trip_through_storage() {
        let db = temp_database().await;
        let user = UserRepository::new(db.pool())
            .create("Jane", "jane@example.com", "secret1")
            .await
            .unwrap();
        let history = HistoryRepository::new(db.pool());

        let review = review_resume("Python developer. Led 3 launches.");
        history
            .record_resume_analysis(&user.id, "Python developer. Led 3 launches.", &review)
            .await
            .unwrap();
        let stored = history.resume_analyses(&user.id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].review, review);

        let job = "Python and AWS, 2+ years, remote";
        let result = match_resume("Python", job);
        history.record_match(&user.id, "Python", job, &result).await.unwrap();
        let matches = history.matches(&user.id).await.unwrap();
        assert_eq!(matches[0].result, result);

        let generated = generate_resume(job, &UserInfo::default());
        history
            .record_generated_resume(&user.id, job, &generated)
            .await
            .unwrap();
        let resumes = history.generated_resumes(&user.id).await.unwrap();
        assert_eq!(resumes[0].analysis, generated.analysis);
        assert_eq!(resumes[0].file_name, generated.file_name);
    }
}
