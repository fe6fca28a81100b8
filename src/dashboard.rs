// src/dashboard.rs
//! Per-user activity summary shown on the dashboard

use crate::core::cvs::{CvRepository, SavedCv};
use crate::core::history::{HistoryRepository, ResumeAnalysisRecord};
use crate::core::jobs::{JobApplication, JobRepository, JobStatus};
use anyhow::Result;
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::BTreeMap;

const TOP_SKILLS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumePerformance {
    pub latest_score: u32,
    pub latest_ats_score: u32,
    /// Score change against the previous review, 0 with fewer than two reviews.
    pub improvement: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_resume_analyses: usize,
    pub total_jobs: usize,
    pub total_matches: usize,
    pub total_cvs: usize,
    pub total_generated_resumes: usize,
    pub average_resume_score: u32,
    pub jobs_by_status: BTreeMap<String, usize>,
    pub resume_performance: Option<ResumePerformance>,
    pub top_skills: Vec<String>,
}

impl DashboardSummary {
    /// Aggregate already-loaded records. Reviews and CVs are expected newest first.
    pub fn build(
        reviews: &[ResumeAnalysisRecord],
        jobs: &[JobApplication],
        total_matches: usize,
        cvs: &[SavedCv],
        total_generated_resumes: usize,
    ) -> Self {
        let average_resume_score = if reviews.is_empty() {
            0
        } else {
            let sum: u64 = reviews.iter().map(|r| r.review.ai_score as u64).sum();
            (sum as f64 / reviews.len() as f64).round() as u32
        };

        let mut jobs_by_status: BTreeMap<String, usize> = JobStatus::ALL
            .iter()
            .map(|status| (status.to_string(), 0))
            .collect();
        for job in jobs {
            *jobs_by_status.entry(job.status.to_string()).or_default() += 1;
        }

        let resume_performance = reviews.first().map(|latest| ResumePerformance {
            latest_score: latest.review.ai_score,
            latest_ats_score: latest.review.ats_score,
            improvement: reviews
                .get(1)
                .map(|previous| latest.review.ai_score as i64 - previous.review.ai_score as i64)
                .unwrap_or(0),
        });

        let top_skills = cvs
            .iter()
            .find(|cv| cv.is_active)
            .or_else(|| cvs.first())
            .map(|cv| cv.cv.skills.iter().take(TOP_SKILLS).cloned().collect())
            .unwrap_or_default();

        Self {
            total_resume_analyses: reviews.len(),
            total_jobs: jobs.len(),
            total_matches,
            total_cvs: cvs.len(),
            total_generated_resumes,
            average_resume_score,
            jobs_by_status,
            resume_performance,
            top_skills,
        }
    }

    pub async fn load(pool: &SqlitePool, user_id: &str) -> Result<Self> {
        let history = HistoryRepository::new(pool);
        let reviews = history.resume_analyses(user_id).await?;
        let matches = history.matches(user_id).await?;
        let generated = history.generated_resumes(user_id).await?;
        let jobs = JobRepository::new(pool).list(user_id).await?;
        let cvs = CvRepository::new(pool).list(user_id).await?;

        Ok(Self::build(&reviews, &jobs, matches.len(), &cvs, generated.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ResumeReview;
    use crate::types::CvDocument;
    use chrono::Utc;

    fn review(score: u32) -> ResumeAnalysisRecord {
        ResumeAnalysisRecord {
            id: uuid::Uuid::new_v4().to_string(),
            original_text: String::new(),
            review: ResumeReview {
                ai_score: score,
                ats_score: score / 2,
                suggestions: Vec::new(),
                ai_improved_text: String::new(),
            },
            created_at: Utc::now(),
        }
    }

    fn job(status: JobStatus) -> JobApplication {
        JobApplication {
            id: uuid::Uuid::new_v4().to_string(),
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            job_description: String::new(),
            status,
            notes: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn saved(skills: &[&str], is_active: bool) -> SavedCv {
        SavedCv {
            id: uuid::Uuid::new_v4().to_string(),
            cv: CvDocument {
                skills: skills.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            },
            cv_html: String::new(),
            is_active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_empty_summary() {
        let summary = DashboardSummary::build(&[], &[], 0, &[], 0);
        assert_eq!(summary.average_resume_score, 0);
        assert!(summary.resume_performance.is_none());
        assert!(summary.top_skills.is_empty());
        assert_eq!(summary.jobs_by_status.len(), 4);
        assert!(summary.jobs_by_status.values().all(|count| *count == 0));
    }

    #[test]
    fn test_aggregates_counts_and_scores() {
        let reviews = [review(70), review(55), review(40)];
        let jobs = [
            job(JobStatus::Applied),
            job(JobStatus::Applied),
            job(JobStatus::Offered),
        ];
        let summary = DashboardSummary::build(&reviews, &jobs, 2, &[], 1);

        assert_eq!(summary.total_resume_analyses, 3);
        assert_eq!(summary.total_matches, 2);
        assert_eq!(summary.total_generated_resumes, 1);
        assert_eq!(summary.average_resume_score, 55);
        assert_eq!(summary.jobs_by_status["Applied"], 2);
        assert_eq!(summary.jobs_by_status["Offered"], 1);
        assert_eq!(summary.jobs_by_status["Rejected"], 0);

        let performance = summary.resume_performance.unwrap();
        assert_eq!(performance.latest_score, 70);
        assert_eq!(performance.latest_ats_score, 35);
        assert_eq!(performance.improvement, 15);
    }

    #[test]
    fn test_top_skills_prefer_active_cv() {
        let many: Vec<String> = (0..12).map(|i| format!("Skill{}", i)).collect();
        let many: Vec<&str> = many.iter().map(String::as_str).collect();
        let cvs = [saved(&["Go"], false), saved(&many, true)];

        let summary = DashboardSummary::build(&[], &[], 0, &cvs, 0);
        assert_eq!(summary.top_skills.len(), 10);
        assert_eq!(summary.top_skills[0], "Skill0");

        let inactive = [saved(&["Go"], false), saved(&["Rust"], false)];
        let summary = DashboardSummary::build(&[], &[], 0, &inactive, 0);
        assert_eq!(summary.top_skills, vec!["Go".to_string()]);
    }
}
