//! Resume analysis, resume/job matching and job application tracking behind a Rocket API.

pub mod analysis;
pub mod auth;
pub mod cli;
pub mod core;
pub mod dashboard;
pub mod types;
pub mod web;

pub use analysis::{analyze, match_resume, review_resume, JobAnalysis, MatchResult, ResumeReview};
pub use web::{build_rocket, start_web_server};
