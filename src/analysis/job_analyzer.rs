// src/analysis/job_analyzer.rs
use super::tables::{
    BACHELOR_RE, ENTRY_RE, HYBRID_RE, MASTER_RE, ONSITE_RE, REMOTE_RE, RESPONSIBILITY_RES,
    SENIOR_RE, SKILLS, YEARS_RE,
};
use super::{EducationLevel, ExperienceLevel, JobType};
use serde::{Deserialize, Serialize};

const SKILL_POINTS: u32 = 10;
const EXPERIENCE_POINTS: u32 = 20;
const EDUCATION_POINTS: u32 = 10;

/// Structured reading of a job description.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAnalysis {
    pub required_skills: Vec<String>,
    pub experience_level: ExperienceLevel,
    pub education_required: EducationLevel,
    pub job_type: JobType,
    pub key_responsibilities: Vec<String>,
    pub match_score: u32,
}

/// Analyze a job description (or any text). Total over all inputs.
pub fn analyze(text: &str) -> JobAnalysis {
    let required_skills = extract_skills(text);
    let experience_level = detect_experience(text);
    let education_required = detect_education(text);

    let mut score = required_skills.len() as u32 * SKILL_POINTS;
    if experience_level.is_specified() {
        score += EXPERIENCE_POINTS;
    }
    if education_required.is_specified() {
        score += EDUCATION_POINTS;
    }

    JobAnalysis {
        required_skills,
        experience_level,
        education_required,
        job_type: detect_job_type(text),
        key_responsibilities: extract_responsibilities(text),
        match_score: score.min(100),
    }
}

/// Known skills mentioned in `text`, in table order.
pub fn extract_skills(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    SKILLS
        .iter()
        .filter(|skill| lowered.contains(&skill.to_lowercase()))
        .map(|skill| skill.to_string())
        .collect()
}

pub fn detect_experience(text: &str) -> ExperienceLevel {
    if let Some(caps) = YEARS_RE.captures(text) {
        // Digit runs too long for u32 saturate rather than fail.
        let years = caps[1].parse::<u32>().unwrap_or(u32::MAX);
        ExperienceLevel::Years(years)
    } else if ENTRY_RE.is_match(text) {
        ExperienceLevel::Entry
    } else if SENIOR_RE.is_match(text) {
        ExperienceLevel::Senior
    } else {
        ExperienceLevel::Unspecified
    }
}

/// Bachelor is checked first and master overwrites it when both are present.
pub fn detect_education(text: &str) -> EducationLevel {
    let mut level = EducationLevel::None;
    if BACHELOR_RE.is_match(text) {
        level = EducationLevel::Bachelor;
    }
    if MASTER_RE.is_match(text) {
        level = EducationLevel::Master;
    }
    level
}

pub fn detect_job_type(text: &str) -> JobType {
    if REMOTE_RE.is_match(text) {
        JobType::Remote
    } else if HYBRID_RE.is_match(text) {
        JobType::Hybrid
    } else if ONSITE_RE.is_match(text) {
        JobType::Onsite
    } else {
        JobType::Unspecified
    }
}

/// First sentence matching each responsibility family, one per family.
pub fn extract_responsibilities(text: &str) -> Vec<String> {
    let sentences: Vec<&str> = text.split(['.', '!', '?']).collect();

    RESPONSIBILITY_RES
        .iter()
        .filter_map(|pattern| {
            sentences
                .iter()
                .find(|sentence| pattern.is_match(sentence))
                .map(|sentence| sentence.trim().to_string())
        })
        .collect()
}
