// src/analysis/tables.rs
//! Fixed keyword and pattern tables shared by every analyzer.

use regex::Regex;
use std::sync::LazyLock;

/// Known skills, in reporting order. Matching is a case-insensitive substring test.
pub const SKILLS: [&str; 28] = [
    "JavaScript",
    "TypeScript",
    "Python",
    "Java",
    "C++",
    "C#",
    "PHP",
    "Kotlin",
    "React",
    "Angular",
    "Vue.js",
    "Node.js",
    "Django",
    "Flask",
    "Spring Boot",
    "SQL",
    "MongoDB",
    "PostgreSQL",
    "MySQL",
    "AWS",
    "Azure",
    "Docker",
    "Kubernetes",
    "GraphQL",
    "REST API",
    "HTML",
    "CSS",
    "Machine Learning",
];

pub static YEARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+)\+?\s*years?").unwrap());

pub static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)entry|junior|fresher").unwrap());

pub static SENIOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)senior|lead").unwrap());

pub static BACHELOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)bachelor|undergraduate|\bb\.?\s?tech\b|\bb\.?sc?\b").unwrap()
});

pub static MASTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)master|postgraduate|\bm\.?\s?tech\b|\bm\.?sc?\b|\bmba\b").unwrap()
});

pub static REMOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)remote").unwrap());

pub static HYBRID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)hybrid").unwrap());

pub static ONSITE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)on-?\s?site|in-office|in office").unwrap());

/// Responsibility families, in reporting order.
pub static RESPONSIBILITY_RES: LazyLock<[Regex; 5]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)\b(develop|build|design|implement|create)\w*").unwrap(),
        Regex::new(r"(?i)\b(maintain|manage|oversee)\w*").unwrap(),
        Regex::new(r"(?i)\bcollaborat\w*").unwrap(),
        Regex::new(r"(?i)\b(test|debug|troubleshoot)\w*").unwrap(),
        Regex::new(r"(?i)\b(document|write)\w*").unwrap(),
    ]
});

pub static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

pub static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?\(?\d{1,4}\)?[\s.-]?\(?\d{2,4}\)?[\s.-]?\d{3,4}[\s.-]?\d{3,4}").unwrap());

pub static QUANTIFIED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(\.\d+)?\s?%|\$\s?\d").unwrap());

/// Standard resume section headings: (label, pattern).
pub static SECTION_RES: LazyLock<[(&'static str, Regex); 4]> = LazyLock::new(|| {
    [
        ("Summary", Regex::new(r"(?i)\b(summary|profile|objective)\b").unwrap()),
        ("Experience", Regex::new(r"(?i)\b(experience|employment|work history)\b").unwrap()),
        ("Education", Regex::new(r"(?i)\b(education|academic)\b").unwrap()),
        ("Skills", Regex::new(r"(?i)\bskills\b").unwrap()),
    ]
});

pub const ACTION_VERBS: [&str; 12] = [
    "led",
    "developed",
    "built",
    "designed",
    "implemented",
    "improved",
    "increased",
    "reduced",
    "launched",
    "managed",
    "delivered",
    "optimized",
];

/// Weak phrase rewrites: (pattern, replacement).
pub static WEAK_PHRASES: LazyLock<[(Regex, &'static str); 4]> = LazyLock::new(|| {
    [
        (Regex::new(r"(?i)\bresponsible for\b").unwrap(), "Led"),
        (Regex::new(r"(?i)\bworked on\b").unwrap(), "Delivered"),
        (Regex::new(r"(?i)\bwas involved in\b").unwrap(), "Drove"),
        (Regex::new(r"(?i)\bhelped\b").unwrap(), "Contributed to"),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_table_has_unique_entries() {
        let mut lowered: Vec<String> = SKILLS.iter().map(|s| s.to_lowercase()).collect();
        lowered.sort();
        lowered.dedup();
        assert_eq!(lowered.len(), SKILLS.len());
    }

    #[test]
    fn test_education_patterns_respect_word_boundaries() {
        assert!(!BACHELOR_RE.is_match("many jobs available"));
        assert!(BACHELOR_RE.is_match("B.Tech in computer science"));
        assert!(BACHELOR_RE.is_match("BSc or equivalent"));
        assert!(MASTER_RE.is_match("MBA preferred"));
        assert!(!MASTER_RE.is_match("programs and systems"));
    }

    #[test]
    fn test_contact_patterns() {
        assert!(EMAIL_RE.is_match("jane.doe@example.com"));
        assert!(PHONE_RE.is_match("+1 (234) 567-8900"));
        assert!(!PHONE_RE.is_match("Python developer"));
    }
}
