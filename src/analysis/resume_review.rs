// src/analysis/resume_review.rs
//! Standalone resume scoring, independent of any job description.

use super::job_analyzer::extract_skills;
use super::matcher::missing_sections;
use super::tables::{ACTION_VERBS, EMAIL_RE, PHONE_RE, QUANTIFIED_RE, SECTION_RES, WEAK_PHRASES};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeReview {
    pub ai_score: u32,
    pub ats_score: u32,
    pub suggestions: Vec<String>,
    pub ai_improved_text: String,
}

pub fn review_resume(text: &str) -> ResumeReview {
    let skills = extract_skills(text);
    let missing = missing_sections(text);
    let present_sections = (SECTION_RES.len() - missing.len()) as u32;
    let has_email = EMAIL_RE.is_match(text);
    let has_phone = PHONE_RE.is_match(text);
    let quantified = QUANTIFIED_RE.is_match(text);
    let verbs = count_action_verbs(text);
    let weak_phrases = WEAK_PHRASES
        .iter()
        .any(|(pattern, _)| pattern.is_match(text));

    let mut ai_score = (skills.len() as u32 * 5).min(30) + present_sections * 10;
    if quantified {
        ai_score += 10;
    }
    ai_score += (verbs * 5).min(20);

    let mut ats_score = present_sections * 15 + (skills.len() as u32 * 5).min(20);
    if has_email {
        ats_score += 10;
    }
    if has_phone {
        ats_score += 10;
    }

    let mut suggestions: Vec<String> = missing
        .iter()
        .map(|section| format!("Add a {} section with a clear heading", section))
        .collect();
    if !has_email {
        suggestions.push("Add a professional email address".to_string());
    }
    if !has_phone {
        suggestions.push("Add a phone number".to_string());
    }
    if !quantified {
        suggestions.push("Quantify achievements with numbers or percentages".to_string());
    }
    if verbs < 3 {
        suggestions.push("Start bullet points with strong action verbs".to_string());
    }
    if weak_phrases {
        suggestions.push(
            "Replace passive phrases such as \"responsible for\" with direct statements"
                .to_string(),
        );
    }
    if skills.is_empty() {
        suggestions.push("List the technical skills you use".to_string());
    }
    if suggestions.is_empty() {
        suggestions.push("Your resume is well structured".to_string());
    }

    ResumeReview {
        ai_score: ai_score.min(100),
        ats_score: ats_score.min(100),
        suggestions,
        ai_improved_text: improve_text(text),
    }
}

fn count_action_verbs(text: &str) -> u32 {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect();

    ACTION_VERBS
        .iter()
        .filter(|verb| words.iter().any(|w| w == *verb))
        .count() as u32
}

/// Rewrite weak phrases and collapse runs of spaces, keeping line structure.
fn improve_text(text: &str) -> String {
    let mut improved = text.to_string();
    for (pattern, replacement) in WEAK_PHRASES.iter() {
        improved = pattern.replace_all(&improved, *replacement).into_owned();
    }

    improved
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_resume_scores_zero() {
        let review = review_resume("");
        assert_eq!(review.ai_score, 0);
        assert_eq!(review.ats_score, 0);
        assert!(review.suggestions.len() > 4);
        assert_eq!(review.ai_improved_text, "");
    }

    #[test]
    fn test_complete_resume() {
        let text = "Jane Doe\njane@example.com | +1 (234) 567-8900\n\
                    SUMMARY\nBackend engineer.\n\
                    SKILLS\nPython, Docker, AWS, SQL\n\
                    EXPERIENCE\nLed a team of 4. Built APIs. Reduced latency by 40%. Improved uptime.\n\
                    EDUCATION\nBSc Computer Science";
        let review = review_resume(text);
        assert_eq!(review.ats_score, 100);
        assert_eq!(review.ai_score, 20 + 40 + 10 + 20);
        assert_eq!(review.suggestions, vec!["Your resume is well structured"]);
    }

    #[test]
    fn test_weak_phrases_are_rewritten() {
        let review = review_resume("I was   responsible for the billing service.\nI helped   QA.");
        assert_eq!(
            review.ai_improved_text,
            "I was Led the billing service.\nI Contributed to QA."
        );
        assert!(review
            .suggestions
            .iter()
            .any(|s| s.contains("responsible for")));
    }
}
