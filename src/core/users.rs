// src/core/users.rs
//! User accounts: storage, registration and credential checks

use anyhow::Result;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{info, warn};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string, salt included.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Why a registration was refused.
#[derive(Debug, PartialEq, Eq)]
pub enum RegistrationError {
    MissingName,
    InvalidEmail,
    PasswordTooShort,
    AlreadyExists,
}

impl RegistrationError {
    pub fn message(&self) -> &'static str {
        match self {
            RegistrationError::MissingName => "Name is required",
            RegistrationError::InvalidEmail => "A valid email address is required",
            RegistrationError::PasswordTooShort => "Password must be at least 6 characters",
            RegistrationError::AlreadyExists => "User already exists",
        }
    }
}

pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(self.pool)
        .await?;

        info!("Created user: {}", user.email);
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }
}

pub struct UserService<'a> {
    repo: UserRepository<'a>,
}

impl<'a> UserService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self {
            repo: UserRepository::new(pool),
        }
    }

    /// Validate and store a new account. The outer result carries storage failures.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Result<User, RegistrationError>> {
        let name = name.trim();
        let email = normalize_email(email);

        if name.is_empty() {
            return Ok(Err(RegistrationError::MissingName));
        }
        if !is_plausible_email(&email) {
            return Ok(Err(RegistrationError::InvalidEmail));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Ok(Err(RegistrationError::PasswordTooShort));
        }
        if self.repo.find_by_email(&email).await?.is_some() {
            info!("Registration refused, email already in use: {}", email);
            return Ok(Err(RegistrationError::AlreadyExists));
        }

        // A concurrent registration can still win the insert.
        match self.repo.create(name, &email, password).await {
            Ok(user) => Ok(Ok(user)),
            Err(e) if is_unique_violation(&e) => {
                info!("Registration lost race for email: {}", email);
                Ok(Err(RegistrationError::AlreadyExists))
            }
            Err(e) => Err(e),
        }
    }

    /// Return the user when the credentials match, `None` otherwise.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Option<User>> {
        let email = normalize_email(email);
        match self.repo.find_by_email(&email).await? {
            Some(user) if verify_password(password, &user.password_hash) => {
                Ok(Some(user))
            }
            Some(_) => {
                warn!("Invalid password for {}", email);
                Ok(None)
            }
            None => {
                warn!("Login attempt for unknown email: {}", email);
                Ok(None)
            }
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    match err.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
        _ => false,
    }
}

/// Argon2id with a random salt, encoded as a PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!("Stored password hash is malformed: {}", e);
            false
        }
    }
}
