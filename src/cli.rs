// src/cli.rs
use crate::analysis::{analyze, match_resume, review_resume};
use crate::core::jobs::{JobInput, JobRepository, JobStatus};
use crate::core::users::{normalize_email, UserRepository};
use crate::core::{ConfigManager, Database};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "resumatch")]
#[command(about = "Resume analysis, job matching and application tracking")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Analyze a job description file and print the JSON result
    Analyze { file: PathBuf },
    /// Score a resume file against a job description file
    Match { resume: PathBuf, job: PathBuf },
    /// Review a resume file and print scores and suggestions
    Review { file: PathBuf },
    /// Import job applications from a CSV file (company,position,status,notes,job_description)
    ImportJobs {
        #[arg(long)]
        email: String,
        csv_file: PathBuf,
    },
    /// List registered users
    Users,
}

impl Cli {
    pub fn is_server(&self) -> bool {
        matches!(self.command, None | Some(Command::Serve))
    }
}

/// Open the log file, truncating it for a server start and appending for one-shot commands.
pub fn open_log_file(log_path: &Path, truncate: bool) -> Result<File> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }

    let mut options = OpenOptions::new();
    options.create(true);
    if truncate {
        options.write(true).truncate(true);
    } else {
        options.append(true);
    }

    options
        .open(log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))
}

async fn read_text(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn handle_command(command: Command, config: ConfigManager) -> Result<()> {
    match command {
        Command::Serve => crate::web::start_web_server(config).await,

        Command::Analyze { file } => print_json(&analyze(&read_text(&file).await?)),

        Command::Match { resume, job } => {
            let resume_text = read_text(&resume).await?;
            let job_description = read_text(&job).await?;
            print_json(&match_resume(&resume_text, &job_description))
        }

        Command::Review { file } => print_json(&review_resume(&read_text(&file).await?)),

        Command::ImportJobs { email, csv_file } => {
            let db = Database::new(&config.environment.database_path).await?;
            let (imported, skipped) = import_jobs(&db, &email, &csv_file).await?;
            println!("Imported {} job applications ({} skipped)", imported, skipped);
            Ok(())
        }

        Command::Users => {
            let db = Database::new(&config.environment.database_path).await?;
            let users = UserRepository::new(db.pool()).list().await?;
            if users.is_empty() {
                println!("No registered users");
            }
            for user in users {
                println!(
                    "{}  {}  {}  {}",
                    user.id,
                    user.email,
                    user.name,
                    user.created_at.format("%Y-%m-%d")
                );
            }
            Ok(())
        }
    }
}

/// Bulk import job applications for an existing user; returns (imported, skipped).
pub async fn import_jobs(db: &Database, email: &str, csv_file: &Path) -> Result<(usize, usize)> {
    let user = UserRepository::new(db.pool())
        .find_by_email(&normalize_email(email))
        .await?
        .with_context(|| format!("No user registered with email {}", email))?;

    let content = read_text(csv_file).await?;
    let mut reader = csv::Reader::from_reader(content.as_bytes());
    let repo = JobRepository::new(db.pool());

    let mut imported = 0;
    let mut skipped = 0;

    for (line, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                skipped += 1;
                warn!("CSV parsing error on record {}: {}", line + 1, e);
                continue;
            }
        };

        let field = |index: usize| record.get(index).unwrap_or("").trim().to_string();
        let status = match field(2) {
            s if s.is_empty() => JobStatus::default(),
            s => match s.parse() {
                Ok(status) => status,
                Err(e) => {
                    skipped += 1;
                    warn!("Skipping record {}: {}", line + 1, e);
                    continue;
                }
            },
        };

        let input = JobInput {
            company: field(0),
            position: field(1),
            status,
            notes: field(3),
            job_description: field(4),
        };

        if let Some(missing) = input.missing_field() {
            skipped += 1;
            warn!("Skipping record {}: {} is empty", line + 1, missing);
            continue;
        }

        repo.create(&user.id, &input).await?;
        imported += 1;
    }

    info!(
        "Import for {} completed: {} imported, {} skipped",
        user.email, imported, skipped
    );
    Ok((imported, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::test_support::temp_database;

    #[test]
    fn test_default_command_is_server() {
        assert!(Cli::parse_from(["resumatch"]).is_server());
        assert!(!Cli::parse_from(["resumatch", "users"]).is_server());

        let cli = Cli::parse_from(["resumatch", "import-jobs", "--email", "a@b.io", "jobs.csv"]);
        assert!(matches!(cli.command, Some(Command::ImportJobs { .. })));
    }

    #[test]
    fn test_one_shot_commands_keep_existing_log() {
        use std::io::Write;

        let log_path = std::env::temp_dir()
            .join(format!("resumatch-log-{}", uuid::Uuid::new_v4()))
            .join("resumatch.log");
        open_log_file(&log_path, true)
            .unwrap()
            .write_all(b"server line\n")
            .unwrap();

        open_log_file(&log_path, false)
            .unwrap()
            .write_all(b"cli line\n")
            .unwrap();
        assert_eq!(
            std::fs::read_to_string(&log_path).unwrap(),
            "server line\ncli line\n"
        );

        open_log_file(&log_path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&log_path).unwrap(), "");

        std::fs::remove_dir_all(log_path.parent().unwrap()).ok();
    }

    #[tokio::test]
    async fn test_import_jobs_skips_invalid_rows() {
        let db = temp_database().await;
        let user = UserRepository::new(db.pool())
            .create("Jane", "jane@example.com", "secret1")
            .await
            .unwrap();

        let csv_path = std::env::temp_dir().join(format!("jobs-{}.csv", uuid::Uuid::new_v4()));
        std::fs::write(
            &csv_path,
            "company,position,status,notes,job_description\n\
             Acme,Engineer,Interviewing,,Python role\n\
             ,Engineer,,,\n\
             Globex,Analyst,Ghosted,,\n\
             Initech,Developer,,Referral,\n",
        )
        .unwrap();

        let (imported, skipped) = import_jobs(&db, "Jane@Example.com", &csv_path).await.unwrap();
        assert_eq!((imported, skipped), (2, 2));

        let jobs = JobRepository::new(db.pool()).list(&user.id).await.unwrap();
        assert!(jobs.iter().any(|j| j.company == "Acme" && j.status == JobStatus::Interviewing));
        assert!(jobs.iter().any(|j| j.company == "Initech" && j.status == JobStatus::Applied));

        std::fs::remove_file(csv_path).ok();
    }
}
