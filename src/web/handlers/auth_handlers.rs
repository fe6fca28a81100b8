// src/web/handlers/auth_handlers.rs
use crate::auth::{AuthConfig, AuthenticatedUser};
use crate::core::users::{RegistrationError, UserService};
use crate::core::Database;
use crate::web::types::*;

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

pub async fn register_handler(
    request: Json<StandardRequest<RegisterRequest>>,
    db: &State<Database>,
) -> Result<Json<ActionResponse>, ApiError> {
    let conversation_id = request.conversation_id();
    let service = UserService::new(db.pool());

    let outcome = service
        .register(
            &request.data.name,
            &request.data.email,
            &request.data.password,
        )
        .await
        .map_err(|e| {
            error!("Registration failed for {}: {}", request.data.email, e);
            internal_error("Failed to create user", conversation_id.clone())
        })?;

    match outcome {
        Ok(user) => {
            info!("Registered user {}", user.email);
            Ok(Json(
                ActionResponse::success(
                    "User registered successfully".to_string(),
                    "registered".to_string(),
                    conversation_id,
                )
                .with_id(user.id)
                .with_next_actions(vec!["Log in with your email and password".to_string()]),
            ))
        }
        Err(RegistrationError::AlreadyExists) => Err(api_error(
            Status::Conflict,
            RegistrationError::AlreadyExists.message(),
            "USER_EXISTS",
            &["Log in instead", "Register with a different email"],
            conversation_id,
        )),
        Err(reason) => Err(api_error(
            Status::BadRequest,
            reason.message(),
            "VALIDATION_ERROR",
            &["Check the registration fields and retry"],
            conversation_id,
        )),
    }
}

pub async fn login_handler(
    request: Json<StandardRequest<LoginRequest>>,
    db: &State<Database>,
    auth_config: &State<AuthConfig>,
) -> Result<Json<LoginResponse>, ApiError> {
    let conversation_id = request.conversation_id();

    if request.data.email.trim().is_empty() {
        return Err(required_field("Email", conversation_id));
    }
    if request.data.password.is_empty() {
        return Err(required_field("Password", conversation_id));
    }

    let user = UserService::new(db.pool())
        .authenticate(&request.data.email, &request.data.password)
        .await
        .map_err(|e| {
            error!("Login lookup failed: {}", e);
            internal_error("Login failed", conversation_id.clone())
        })?
        .ok_or_else(|| {
            api_error(
                Status::Unauthorized,
                "Invalid credentials",
                "INVALID_CREDENTIALS",
                &["Check your email and password"],
                conversation_id.clone(),
            )
        })?;

    let token = auth_config.issue_token(&user).map_err(|e| {
        error!("Failed to issue token for {}: {}", user.email, e);
        internal_error("Login failed", conversation_id.clone())
    })?;

    info!("User {} logged in", user.email);
    Ok(Json(LoginResponse {
        success: true,
        token,
        user: UserInfo::from(&user),
    }))
}

pub async fn get_current_user_handler(auth: AuthenticatedUser) -> Json<DataResponse<UserInfo>> {
    Json(DataResponse::success(
        format!("Authenticated as {}", auth.email()),
        UserInfo::from(auth.user()),
        None,
    ))
}
