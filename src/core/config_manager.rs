// src/core/config_manager.rs
//! Configuration loading: environment selection, optional config.yaml, env overrides.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_TOKEN_TTL_HOURS: i64 = 24 * 7;
const DEV_JWT_SECRET: &str = "resumatch-local-development-secret";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment_name: String,
    pub environment: EnvironmentConfig,
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentConfig {
    pub database_path: PathBuf,
    pub log_path: PathBuf,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_token_ttl_hours() -> i64 {
    DEFAULT_TOKEN_TTL_HOURS
}

impl ConfigManager {
    /// Load configuration from `config.yaml` in the working directory, if present.
    pub fn load() -> Result<Self> {
        let base_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::load_from(&base_dir.join("config.yaml"), &base_dir)
    }

    pub fn load_from(config_path: &Path, base_dir: &Path) -> Result<Self> {
        let environment_name = Self::get_environment();
        info!("Loading configuration for environment: {}", environment_name);

        let mut environment = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            Self::parse_environment(&content, &environment_name)?
        } else {
            info!(
                "{} not found, using built-in defaults",
                config_path.display()
            );
            Self::default_environment(&environment_name)
        };

        environment.database_path = resolve_path(base_dir, &environment.database_path);
        environment.log_path = resolve_path(base_dir, &environment.log_path);

        if let Ok(port) = std::env::var("ROCKET_PORT") {
            environment.port = port
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number"))?;
        }

        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if environment_name == "production" => {
                anyhow::bail!("JWT_SECRET environment variable must be set in production")
            }
            _ => {
                warn!("JWT_SECRET not set, using the local development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let auth = AuthSettings {
            jwt_secret,
            token_ttl_hours: environment.token_ttl_hours,
        };

        Ok(Self {
            environment_name,
            environment,
            auth,
        })
    }

    fn get_environment() -> String {
        std::env::var("RESUMATCH_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn parse_environment(content: &str, environment_name: &str) -> Result<EnvironmentConfig> {
        let config_file: ConfigFile =
            serde_yaml::from_str(content).context("Failed to parse config.yaml")?;

        Ok(match environment_name {
            "production" => config_file.production,
            _ => config_file.local,
        })
    }

    fn default_environment(environment_name: &str) -> EnvironmentConfig {
        let (database_path, log_path) = if environment_name == "production" {
            ("/app/data/resumatch.db", "/app/logs/resumatch.log")
        } else {
            ("data/resumatch.db", "logs/resumatch.log")
        };

        EnvironmentConfig {
            database_path: PathBuf::from(database_path),
            log_path: PathBuf::from(log_path),
            port: DEFAULT_PORT,
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
        }
    }

    /// Ensure parent directories of the database and log files exist
    pub async fn ensure_directories(&self) -> Result<()> {
        for file in [&self.environment.database_path, &self.environment.log_path] {
            if let Some(parent) = file.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }
        Ok(())
    }
}

fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
local:
  database_path: data/dev.db
  log_path: logs/dev.log
production:
  database_path: /srv/resumatch.db
  log_path: /var/log/resumatch.log
  port: 8080
  token_ttl_hours: 12
"#;

    #[test]
    fn test_parse_environment_sections() {
        let local = ConfigManager::parse_environment(SAMPLE, "local").unwrap();
        assert_eq!(local.database_path, PathBuf::from("data/dev.db"));
        assert_eq!(local.port, DEFAULT_PORT);
        assert_eq!(local.token_ttl_hours, DEFAULT_TOKEN_TTL_HOURS);

        let production = ConfigManager::parse_environment(SAMPLE, "production").unwrap();
        assert_eq!(production.port, 8080);
        assert_eq!(production.token_ttl_hours, 12);
    }

    #[test]
    fn test_unknown_environment_falls_back_to_local() {
        let staging = ConfigManager::parse_environment(SAMPLE, "staging").unwrap();
        assert_eq!(staging.log_path, PathBuf::from("logs/dev.log"));
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(ConfigManager::parse_environment("local: [", "local").is_err());
    }

    #[test]
    fn test_resolve_path() {
        let base = Path::new("/opt/app");
        assert_eq!(
            resolve_path(base, Path::new("data/x.db")),
            PathBuf::from("/opt/app/data/x.db")
        );
        assert_eq!(
            resolve_path(base, Path::new("/abs/x.db")),
            PathBuf::from("/abs/x.db")
        );
    }
}
