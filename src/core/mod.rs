// src/core/mod.rs
//! Configuration and persistence services

pub mod config_manager;
pub mod cvs;
pub mod database;
pub mod history;
pub mod jobs;
pub mod users;

pub use config_manager::ConfigManager;
pub use cvs::{CvRepository, SavedCv};
pub use database::Database;
pub use history::HistoryRepository;
pub use jobs::{JobApplication, JobInput, JobRepository, JobStatus};
pub use users::{User, UserRepository, UserService};
