// src/analysis/mod.rs
//! Deterministic text heuristics: job description analysis, resume/job matching,
//! resume review and plain-text resume generation. Nothing here performs I/O.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod generator;
pub mod job_analyzer;
pub mod matcher;
pub mod resume_review;
pub mod tables;

pub use generator::{generate_resume, GeneratedResume, UserInfo};
pub use job_analyzer::{analyze, extract_skills, JobAnalysis};
pub use matcher::{match_resume, MatchResult};
pub use resume_review::{review_resume, ResumeReview};

/// Experience requirement detected in a text. Serialized as its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ExperienceLevel {
    #[default]
    Unspecified,
    Entry,
    Years(u32),
    Senior,
}

/// Years of experience a senior role is treated as.
const SENIOR_YEARS: u32 = 5;

impl ExperienceLevel {
    pub fn label(&self) -> String {
        match self {
            ExperienceLevel::Unspecified => String::new(),
            ExperienceLevel::Entry => "Entry Level / Junior".to_string(),
            ExperienceLevel::Years(n) => format!("{}+ years required", n),
            ExperienceLevel::Senior => "Senior Level".to_string(),
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "Entry Level / Junior" => ExperienceLevel::Entry,
            "Senior Level" => ExperienceLevel::Senior,
            other => other
                .strip_suffix("+ years required")
                .and_then(|n| n.parse().ok())
                .map(ExperienceLevel::Years)
                .unwrap_or_default(),
        }
    }

    pub fn is_specified(&self) -> bool {
        !matches!(self, ExperienceLevel::Unspecified)
    }

    /// Years this level stands for; `None` when nothing was detected.
    pub fn years(&self) -> Option<u32> {
        match self {
            ExperienceLevel::Unspecified => None,
            ExperienceLevel::Entry => Some(0),
            ExperienceLevel::Years(n) => Some(*n),
            ExperienceLevel::Senior => Some(SENIOR_YEARS),
        }
    }
}

impl From<ExperienceLevel> for String {
    fn from(level: ExperienceLevel) -> Self {
        level.label()
    }
}

impl From<String> for ExperienceLevel {
    fn from(label: String) -> Self {
        ExperienceLevel::from_label(&label)
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Degree requirement detected in a text. Ordered by rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum EducationLevel {
    #[default]
    None,
    Bachelor,
    Master,
}

impl EducationLevel {
    pub fn label(&self) -> &'static str {
        match self {
            EducationLevel::None => "",
            EducationLevel::Bachelor => "Bachelor's Degree",
            EducationLevel::Master => "Master's Degree",
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "Bachelor's Degree" => EducationLevel::Bachelor,
            "Master's Degree" => EducationLevel::Master,
            _ => EducationLevel::None,
        }
    }

    pub fn is_specified(&self) -> bool {
        *self != EducationLevel::None
    }
}

impl From<EducationLevel> for String {
    fn from(level: EducationLevel) -> Self {
        level.label().to_string()
    }
}

impl From<String> for EducationLevel {
    fn from(label: String) -> Self {
        EducationLevel::from_label(&label)
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum JobType {
    #[default]
    Unspecified,
    Remote,
    Hybrid,
    Onsite,
}

impl JobType {
    pub fn label(&self) -> &'static str {
        match self {
            JobType::Unspecified => "",
            JobType::Remote => "Remote",
            JobType::Hybrid => "Hybrid",
            JobType::Onsite => "On-site",
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label {
            "Remote" => JobType::Remote,
            "Hybrid" => JobType::Hybrid,
            "On-site" => JobType::Onsite,
            _ => JobType::Unspecified,
        }
    }

    pub fn is_specified(&self) -> bool {
        *self != JobType::Unspecified
    }
}

impl From<JobType> for String {
    fn from(job_type: JobType) -> Self {
        job_type.label().to_string()
    }
}

impl From<String> for JobType {
    fn from(label: String) -> Self {
        JobType::from_label(&label)
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_labels_parse_back() {
        for level in [
            ExperienceLevel::Unspecified,
            ExperienceLevel::Entry,
            ExperienceLevel::Years(3),
            ExperienceLevel::Senior,
        ] {
            assert_eq!(ExperienceLevel::from_label(&level.label()), level);
        }
        assert_eq!(ExperienceLevel::from_label("garbage"), ExperienceLevel::Unspecified);
    }

    #[test]
    fn test_levels_serialize_as_labels() {
        let json = serde_json::to_string(&ExperienceLevel::Years(5)).unwrap();
        assert_eq!(json, "\"5+ years required\"");
        let json = serde_json::to_string(&EducationLevel::None).unwrap();
        assert_eq!(json, "\"\"");
        let parsed: JobType = serde_json::from_str("\"Hybrid\"").unwrap();
        assert_eq!(parsed, JobType::Hybrid);
    }

    #[test]
    fn test_education_rank_order() {
        assert!(EducationLevel::Master > EducationLevel::Bachelor);
        assert!(EducationLevel::Bachelor > EducationLevel::None);
    }
}
