// src/analysis/matcher.rs
//! Resume versus job description comparison.

use super::job_analyzer::{analyze, detect_education, detect_experience, extract_skills};
use super::tables::{EMAIL_RE, PHONE_RE, SECTION_RES};
use super::{EducationLevel, ExperienceLevel};
use serde::{Deserialize, Serialize};

const SKILL_WEIGHT: f64 = 0.7;
const EXPERIENCE_POINTS: f64 = 20.0;
const EDUCATION_POINTS: f64 = 10.0;

const ATS_SKILL_WEIGHT: f64 = 0.6;
const ATS_SECTION_POINTS: u32 = 5;
const ATS_CONTACT_POINTS: u32 = 10;

const MAX_ADD_KEYWORDS: usize = 10;
const MAX_EMPHASIZE: usize = 5;
const NOT_SPECIFIED: &str = "Not specified";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub match_score: u32,
    pub ats_score: u32,
    pub overall_rating: String,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub experience_match: RequirementMatch,
    pub education_match: RequirementMatch,
    pub key_strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub ats_optimizations: Vec<String>,
    pub recommended_changes: RecommendedChanges,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementMatch {
    pub required: String,
    pub candidate: String,
    #[serde(rename = "match")]
    pub is_match: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedChanges {
    pub add_keywords: Vec<String>,
    pub emphasize_skills: Vec<String>,
    pub improve_sections: Vec<String>,
}

/// Compare a resume against a job description.
pub fn match_resume(resume_text: &str, job_description: &str) -> MatchResult {
    let job = analyze(job_description);
    let resume_skills = extract_skills(resume_text);

    let (matched_skills, missing_skills): (Vec<String>, Vec<String>) = job
        .required_skills
        .iter()
        .cloned()
        .partition(|skill| resume_skills.contains(skill));

    let candidate_experience = detect_experience(resume_text);
    let candidate_education = detect_education(resume_text);
    let experience_ok = experience_satisfied(job.experience_level, candidate_experience);
    let education_ok = candidate_education >= job.education_required;

    let skill_pct = skill_percentage(matched_skills.len(), job.required_skills.len());

    let mut match_score = skill_pct * SKILL_WEIGHT;
    if experience_ok {
        match_score += EXPERIENCE_POINTS;
    }
    if education_ok {
        match_score += EDUCATION_POINTS;
    }
    let match_score = (match_score.round() as u32).min(100);

    let missing_sections = missing_sections(resume_text);
    let has_email = EMAIL_RE.is_match(resume_text);
    let has_phone = PHONE_RE.is_match(resume_text);

    let mut ats_score = (skill_pct * ATS_SKILL_WEIGHT).round() as u32;
    ats_score += (SECTION_RES.len() - missing_sections.len()) as u32 * ATS_SECTION_POINTS;
    if has_email {
        ats_score += ATS_CONTACT_POINTS;
    }
    if has_phone {
        ats_score += ATS_CONTACT_POINTS;
    }
    let ats_score = ats_score.min(100);

    let experience_match = RequirementMatch {
        required: display_label(job.experience_level.label()),
        candidate: display_label(candidate_experience.label()),
        is_match: experience_ok,
    };
    let education_match = RequirementMatch {
        required: display_label(job.education_required.label().to_string()),
        candidate: display_label(candidate_education.label().to_string()),
        is_match: education_ok,
    };

    let mut key_strengths = Vec::new();
    if !matched_skills.is_empty() {
        key_strengths.push(format!(
            "Strong proficiency in {}",
            matched_skills.join(", ")
        ));
    }
    if experience_ok && job.experience_level.is_specified() {
        key_strengths.push(format!(
            "Meets the experience requirement ({})",
            job.experience_level
        ));
    }
    if education_ok && job.education_required.is_specified() {
        key_strengths.push(format!(
            "Meets the education requirement ({})",
            job.education_required
        ));
    }
    if key_strengths.is_empty() {
        key_strengths.push("Resume provides a starting point for this role".to_string());
    }

    let mut improvements = Vec::new();
    if !missing_skills.is_empty() {
        improvements.push(format!(
            "Gain or highlight experience with {}",
            missing_skills.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
        ));
    }
    if !experience_ok {
        improvements.push(format!(
            "Show more relevant experience: the role asks for {}",
            experience_match.required
        ));
    }
    if !education_ok {
        improvements.push(format!(
            "Mention your education clearly: the role asks for a {}",
            education_label(job.education_required)
        ));
    }

    let mut ats_optimizations = Vec::new();
    if !has_email {
        ats_optimizations.push("Include a professional email address".to_string());
    }
    if !has_phone {
        ats_optimizations.push("Include a phone number".to_string());
    }
    for section in &missing_sections {
        ats_optimizations.push(format!("Add a clearly labeled {} section", section));
    }
    if !missing_skills.is_empty() {
        ats_optimizations.push(format!(
            "Mirror keywords from the job description such as {}",
            missing_skills.join(", ")
        ));
    }
    if ats_optimizations.is_empty() {
        ats_optimizations.push("Keep standard section headings and a plain layout".to_string());
    }

    let mut improve_sections: Vec<String> =
        missing_sections.iter().map(|s| s.to_string()).collect();
    if !experience_ok && !improve_sections.iter().any(|s| s == "Experience") {
        improve_sections.push("Experience".to_string());
    }
    if !education_ok && !improve_sections.iter().any(|s| s == "Education") {
        improve_sections.push("Education".to_string());
    }

    let recommended_changes = RecommendedChanges {
        add_keywords: missing_skills.iter().take(MAX_ADD_KEYWORDS).cloned().collect(),
        emphasize_skills: matched_skills.iter().take(MAX_EMPHASIZE).cloned().collect(),
        improve_sections,
    };

    MatchResult {
        match_score,
        ats_score,
        overall_rating: overall_rating(match_score).to_string(),
        matched_skills,
        missing_skills,
        experience_match,
        education_match,
        key_strengths,
        improvements,
        ats_optimizations,
        recommended_changes,
    }
}

pub fn overall_rating(match_score: u32) -> &'static str {
    match match_score {
        80.. => "Excellent Match",
        60..=79 => "Good Match",
        40..=59 => "Fair Match",
        _ => "Poor Match",
    }
}

fn skill_percentage(matched: usize, required: usize) -> f64 {
    if required == 0 {
        100.0
    } else {
        matched as f64 * 100.0 / required as f64
    }
}

fn experience_satisfied(required: ExperienceLevel, candidate: ExperienceLevel) -> bool {
    match required.years() {
        None => true,
        Some(needed) => candidate.years().unwrap_or(0) >= needed,
    }
}

/// Section headings absent from the resume, in reporting order.
pub(crate) fn missing_sections(resume_text: &str) -> Vec<&'static str> {
    SECTION_RES
        .iter()
        .filter(|(_, pattern)| !pattern.is_match(resume_text))
        .map(|(label, _)| *label)
        .collect()
}

fn display_label(label: String) -> String {
    if label.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        label
    }
}

fn education_label(level: EducationLevel) -> String {
    display_label(level.label().to_string())
}
