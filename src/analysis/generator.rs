// src/analysis/generator.rs
//! Plain-text resume drafted from a job description.

use super::job_analyzer::{analyze, JobAnalysis};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const DEFAULT_NAME: &str = "Your Name";
const DEFAULT_EMAIL: &str = "your.email@example.com";
const DEFAULT_PHONE: &str = "+1 (234) 567-8900";

/// Contact details supplied with a generation request. Blank fields fall back to placeholders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl UserInfo {
    pub fn name(&self) -> &str {
        non_blank(&self.name).unwrap_or(DEFAULT_NAME)
    }

    pub fn email(&self) -> &str {
        non_blank(&self.email).unwrap_or(DEFAULT_EMAIL)
    }

    pub fn phone(&self) -> &str {
        non_blank(&self.phone).unwrap_or(DEFAULT_PHONE)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedResume {
    pub resume: String,
    pub file_name: String,
    pub analysis: JobAnalysis,
}

pub fn generate_resume(job_description: &str, user_info: &UserInfo) -> GeneratedResume {
    generate_resume_at(job_description, user_info, Utc::now())
}

pub fn generate_resume_at(
    job_description: &str,
    user_info: &UserInfo,
    now: DateTime<Utc>,
) -> GeneratedResume {
    let analysis = analyze(job_description);
    let resume = render(&analysis, user_info);
    let file_name = format!(
        "Resume_{}_{}.txt",
        file_safe_name(user_info.name()),
        now.format("%Y%m%d_%H%M%S")
    );

    GeneratedResume {
        resume,
        file_name,
        analysis,
    }
}

fn render(analysis: &JobAnalysis, user: &UserInfo) -> String {
    let mut out = String::new();

    out.push_str(&user.name().to_uppercase());
    out.push('\n');
    out.push_str(&format!("{} | {}\n\n", user.email(), user.phone()));

    out.push_str("PROFESSIONAL SUMMARY\n");
    out.push_str(&summary(analysis));
    out.push_str("\n\n");

    if !analysis.required_skills.is_empty() {
        out.push_str("TECHNICAL SKILLS\n");
        out.push_str(&analysis.required_skills.join(" • "));
        out.push_str("\n\n");
    }

    out.push_str("KEY ACCOMPLISHMENTS\n");
    if analysis.key_responsibilities.is_empty() {
        out.push_str("• Delivered projects end to end with a focus on quality and ownership\n");
    } else {
        for responsibility in &analysis.key_responsibilities {
            out.push_str(&format!("• {}\n", responsibility));
        }
    }
    out.push('\n');

    out.push_str("EDUCATION\n");
    if analysis.education_required.is_specified() {
        out.push_str(analysis.education_required.label());
    } else {
        out.push_str("Relevant degree or equivalent practical experience");
    }
    out.push('\n');

    out
}

fn summary(analysis: &JobAnalysis) -> String {
    let mut sentence = String::from("Results-driven professional");
    if analysis.experience_level.is_specified() {
        let level = analysis.experience_level.label();
        let level = level.trim_end_matches(" required");
        sentence.push_str(&format!(" ({})", level));
    }
    if !analysis.required_skills.is_empty() {
        let top: Vec<&str> = analysis
            .required_skills
            .iter()
            .take(3)
            .map(String::as_str)
            .collect();
        sentence.push_str(&format!(" skilled in {}", top.join(", ")));
    }
    if analysis.job_type.is_specified() {
        sentence.push_str(&format!(
            ", comfortable in {} environments",
            analysis.job_type.label().to_lowercase()
        ));
    }
    sentence.push('.');
    sentence
}

fn file_safe_name(name: &str) -> String {
    let safe = sanitize(name);
    if safe.is_empty() {
        sanitize(DEFAULT_NAME)
    } else {
        safe
    }
}

fn sanitize(name: &str) -> String {
    name.split_whitespace()
        .map(|part| {
            part.chars()
                .filter(|c| c.is_alphanumeric() || *c == '-')
                .collect::<String>()
        })
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_defaults_fill_missing_user_info() {
        let info = UserInfo {
            name: Some("   ".to_string()),
            email: None,
            phone: Some("555-0100".to_string()),
        };
        assert_eq!(info.name(), "Your Name");
        assert_eq!(info.email(), "your.email@example.com");
        assert_eq!(info.phone(), "555-0100");
    }

    #[test]
    fn test_file_name_uses_sanitized_name_and_timestamp() {
        let info = UserInfo {
            name: Some("Jane O'Neil Doe".to_string()),
            ..Default::default()
        };
        let generated = generate_resume_at("Python", &info, fixed_time());
        assert_eq!(generated.file_name, "Resume_Jane_ONeil_Doe_20260314_093000.txt");
    }

    #[test]
    fn test_punctuation_only_name_uses_placeholder() {
        let info = UserInfo {
            name: Some("***".to_string()),
            ..Default::default()
        };
        let generated = generate_resume_at("Python", &info, fixed_time());
        assert_eq!(generated.file_name, "Resume_Your_Name_20260314_093000.txt");
    }

    #[test]
    fn test_resume_reflects_job_analysis() {
        let jd = "Senior Python and Docker engineer. Remote. \
                  You will design data pipelines. Master's degree preferred.";
        let generated = generate_resume_at(jd, &UserInfo::default(), fixed_time());

        assert!(generated.resume.starts_with("YOUR NAME\n"));
        assert!(generated.resume.contains("Python • Docker"));
        assert!(generated
            .resume
            .contains("Results-driven professional (Senior Level) skilled in Python, Docker, comfortable in remote environments."));
        assert!(generated.resume.contains("• You will design data pipelines\n"));
        assert!(generated.resume.contains("EDUCATION\nMaster's Degree"));
        assert_eq!(generated.analysis.required_skills.len(), 2);
    }

    #[test]
    fn test_years_label_reads_naturally_in_summary() {
        let generated = generate_resume_at("4 years experience", &UserInfo::default(), fixed_time());
        assert!(generated.resume.contains("(4+ years)"));
        assert!(!generated.resume.contains("TECHNICAL SKILLS"));
    }
}
