// src/auth.rs
use crate::core::config_manager::AuthSettings;
use crate::core::users::{User, UserRepository};
use crate::core::Database;
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::{Request, State};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User id
    pub email: String,
    pub exp: usize, // Expiration timestamp
    pub iat: usize, // Issued at timestamp
}

pub struct AuthConfig {
    secret: String,
    token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(secret: impl Into<String>, token_ttl_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            token_ttl: Duration::hours(token_ttl_hours),
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(settings.jwt_secret.clone(), settings.token_ttl_hours)
    }

    /// Sign an HS256 token for the user.
    pub fn issue_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            exp: (now + self.token_ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to sign token")
    }

    /// Verify signature and expiry.
    pub fn decode_token(&self, token: &str) -> Result<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;

        Ok(token_data.claims)
    }
}

/// The user behind a valid bearer token
pub struct AuthenticatedUser {
    pub user: User,
}

impl AuthenticatedUser {
    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn id(&self) -> &str {
        &self.user.id
    }

    pub fn email(&self) -> &str {
        &self.user.email
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = AuthError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let auth_config = match req.guard::<&State<AuthConfig>>().await {
            Outcome::Success(config) => config,
            Outcome::Error((status, _)) => return Outcome::Error((status, AuthError::ServerError)),
            Outcome::Forward(f) => return Outcome::Forward(f),
        };

        let database = match req.guard::<&State<Database>>().await {
            Outcome::Success(db) => db,
            Outcome::Error((status, _)) => return Outcome::Error((status, AuthError::ServerError)),
            Outcome::Forward(f) => return Outcome::Forward(f),
        };

        let token = match req.headers().get_one("Authorization") {
            Some(header) => match header.strip_prefix("Bearer ") {
                Some(token) if !token.trim().is_empty() => token.trim(),
                _ => {
                    warn!("Invalid Authorization header format");
                    return Outcome::Error((Status::Unauthorized, AuthError::InvalidToken));
                }
            },
            None => {
                warn!("Missing Authorization header");
                return Outcome::Error((Status::Unauthorized, AuthError::MissingToken));
            }
        };

        let claims = match auth_config.decode_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                warn!("Token verification failed: {}", e);
                return Outcome::Error((Status::Unauthorized, AuthError::TokenVerificationFailed));
            }
        };

        let user = match UserRepository::new(database.pool()).find_by_id(&claims.sub).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!("Token refers to unknown user: {}", claims.sub);
                return Outcome::Error((Status::Unauthorized, AuthError::UnknownUser));
            }
            Err(e) => {
                error!("Failed to load user {}: {}", claims.sub, e);
                return Outcome::Error((Status::InternalServerError, AuthError::ServerError));
            }
        };

        info!("User {} authenticated", user.email);
        Outcome::Success(AuthenticatedUser { user })
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    TokenVerificationFailed,
    UnknownUser,
    ServerError,
}

impl AuthError {
    pub fn message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "Authorization token required",
            AuthError::InvalidToken => "Invalid authorization token format",
            AuthError::TokenVerificationFailed => "Token is invalid or expired",
            AuthError::UnknownUser => "User no longer exists",
            AuthError::ServerError => "Authentication is unavailable",
        }
    }
}

// Optional auth guard that doesn't fail if no auth is provided
pub struct OptionalAuth {
    pub user: Option<AuthenticatedUser>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for OptionalAuth {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match AuthenticatedUser::from_request(req).await {
            Outcome::Success(auth) => Outcome::Success(OptionalAuth { user: Some(auth) }),
            _ => Outcome::Success(OptionalAuth { user: None }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "user-1".to_string(),
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let config = AuthConfig::new("test-secret", 1);
        let token = config.issue_token(&user()).unwrap();

        let claims = config.decode_token(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "jane@example.com");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_token_rejected_with_other_secret() {
        let token = AuthConfig::new("secret-a", 1).issue_token(&user()).unwrap();
        assert!(AuthConfig::new("secret-b", 1).decode_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // Past the default 60s leeway.
        let token = AuthConfig::new("secret", -1).issue_token(&user()).unwrap();
        assert!(AuthConfig::new("secret", -1).decode_token(&token).is_err());
    }
}
