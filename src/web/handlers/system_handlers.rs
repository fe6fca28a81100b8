// src/web/handlers/system_handlers.rs
use crate::auth::{AuthenticatedUser, OptionalAuth};
use crate::core::Database;
use crate::dashboard::DashboardSummary;
use crate::web::types::*;

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

pub async fn dashboard_handler(
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<DataResponse<DashboardSummary>>, ApiError> {
    let summary = DashboardSummary::load(db.pool(), auth.id())
        .await
        .map_err(|e| {
            error!("Failed to build dashboard for {}: {}", auth.email(), e);
            internal_error("Failed to load dashboard", None)
        })?;

    Ok(Json(DataResponse::success(
        "Dashboard summary".to_string(),
        summary,
        None,
    )))
}

pub async fn health_handler(
    auth: OptionalAuth,
    db: &State<Database>,
) -> Result<Json<TextResponse>, ApiError> {
    match &auth.user {
        Some(user) => info!("Health check by authenticated user: {}", user.email()),
        None => info!("Health check by anonymous user"),
    }

    db.health_check().await.map_err(|e| {
        error!("Health check failed: {}", e);
        api_error(
            Status::ServiceUnavailable,
            "Database unavailable",
            "DATABASE_ERROR",
            &["Try again in a few moments"],
            None,
        )
    })?;

    Ok(Json(TextResponse::success("OK".to_string(), None)))
}
