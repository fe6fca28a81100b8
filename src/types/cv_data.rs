// src/types/cv_data.rs
//! Saved CV structure as submitted by the CV builder.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvDocument {
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub location: Option<String>,
    pub linkedin: Option<String>,
    pub job_title: Option<String>,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub start_date: String,
    pub end_date: Option<String>, // None means current
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub degree: String,
    pub institution: String,
    #[serde(default)]
    pub year: String,
    pub gpa: Option<String>,
}

impl CvDocument {
    /// Flatten the CV into the plain-text resume layout the matcher expects.
    pub fn to_resume_text(&self) -> String {
        let info = &self.personal_info;
        let mut text = format!("{}\n{} | {}", info.full_name, info.email, info.phone);

        if let Some(location) = present(&info.location) {
            text.push_str(&format!(" | {}", location));
        }
        if let Some(linkedin) = present(&info.linkedin) {
            text.push_str(&format!(" | {}", linkedin));
        }

        text.push_str(&format!("\n\nPROFESSIONAL SUMMARY\n{}\n\n", info.summary));

        if !self.skills.is_empty() {
            text.push_str(&format!("TECHNICAL SKILLS\n{}\n\n", self.skills.join(", ")));
        }

        if !self.experience.is_empty() {
            text.push_str("PROFESSIONAL EXPERIENCE\n\n");
            for exp in &self.experience {
                let end = present(&exp.end_date).unwrap_or("Present");
                text.push_str(&format!("{} | {}\n", exp.title, exp.company));
                text.push_str(&format!("{} - {}\n", exp.start_date, end));
                text.push_str(&format!("{}\n\n", exp.description));
            }
        }

        if !self.education.is_empty() {
            text.push_str("EDUCATION\n\n");
            for edu in &self.education {
                text.push_str(&format!("{}\n", edu.degree));
                text.push_str(&format!("{} | {}", edu.institution, edu.year));
                if let Some(gpa) = present(&edu.gpa) {
                    text.push_str(&format!(" | GPA: {}", gpa));
                }
                text.push_str("\n\n");
            }
        }

        text.trim().to_string()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_cv() -> CvDocument {
        CvDocument {
            personal_info: PersonalInfo {
                full_name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                phone: "555-0100".to_string(),
                location: Some("Lyon".to_string()),
                linkedin: None,
                job_title: Some("Backend Engineer".to_string()),
                summary: "Engineer building APIs.".to_string(),
            },
            skills: vec!["Python".to_string(), "Docker".to_string()],
            experience: vec![Experience {
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                start_date: "2020".to_string(),
                end_date: None,
                description: "Built services.".to_string(),
            }],
            education: vec![Education {
                degree: "BSc Computer Science".to_string(),
                institution: "Univ".to_string(),
                year: "2019".to_string(),
                gpa: Some("3.8".to_string()),
            }],
        }
    }

    #[test]
    fn test_resume_text_layout() {
        let expected = "Jane Doe\n\
                        jane@example.com | 555-0100 | Lyon\n\n\
                        PROFESSIONAL SUMMARY\nEngineer building APIs.\n\n\
                        TECHNICAL SKILLS\nPython, Docker\n\n\
                        PROFESSIONAL EXPERIENCE\n\n\
                        Engineer | Acme\n2020 - Present\nBuilt services.\n\n\
                        EDUCATION\n\n\
                        BSc Computer Science\nUniv | 2019 | GPA: 3.8";
        assert_eq!(sample_cv().to_resume_text(), expected);
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let mut cv = sample_cv();
        cv.skills.clear();
        cv.experience.clear();
        cv.education.clear();
        let text = cv.to_resume_text();
        assert!(text.ends_with("PROFESSIONAL SUMMARY\nEngineer building APIs."));
    }

    #[test]
    fn test_deserializes_builder_payload() {
        let json = r#"{
            "personalInfo": {"fullName": "Jane", "email": "j@x.io", "phone": "1", "summary": "Hi"},
            "skills": ["Rust"],
            "experience": [{"title": "Dev", "company": "X", "startDate": "2021", "description": "Did"}]
        }"#;
        let cv: CvDocument = serde_json::from_str(json).unwrap();
        assert_eq!(cv.experience[0].end_date, None);
        assert!(cv.education.is_empty());
    }
}
