// src/web/handlers/cv_handlers.rs
use crate::auth::AuthenticatedUser;
use crate::core::cvs::{CvRepository, SavedCv};
use crate::core::Database;
use crate::web::types::*;

use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

pub async fn save_cv_handler(
    request: Json<StandardRequest<SaveCvRequest>>,
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<ActionResponse>, ApiError> {
    let conversation_id = request.conversation_id();
    if request.data.cv_data.personal_info.full_name.trim().is_empty() {
        return Err(required_field("Full name", conversation_id));
    }

    let saved = CvRepository::new(db.pool())
        .save(auth.id(), &request.data.cv_data, &request.data.cv_html)
        .await
        .map_err(|e| {
            error!("Failed to save CV for {}: {}", auth.email(), e);
            internal_error("Failed to save CV", conversation_id.clone())
        })?;

    info!("User {} saved CV {}", auth.email(), saved.id);
    Ok(Json(
        ActionResponse::success(
            format!(
                "CV for {} saved and set as active",
                saved.cv.personal_info.full_name
            ),
            "saved".to_string(),
            conversation_id,
        )
        .with_id(saved.id)
        .with_next_actions(vec![
            "Match the active CV against a job description".to_string(),
        ]),
    ))
}

pub async fn list_cvs_handler(
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<SavedCv>>>, ApiError> {
    let cvs = CvRepository::new(db.pool())
        .list(auth.id())
        .await
        .map_err(|e| {
            error!("Failed to list CVs for {}: {}", auth.email(), e);
            internal_error("Failed to load CVs", None)
        })?;

    Ok(Json(DataResponse::success(
        format!("{} saved CVs", cvs.len()),
        cvs,
        None,
    )))
}

pub async fn active_cv_handler(
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<DataResponse<SavedCv>>, ApiError> {
    let cv = CvRepository::new(db.pool())
        .active(auth.id())
        .await
        .map_err(|e| {
            error!("Failed to load active CV for {}: {}", auth.email(), e);
            internal_error("Failed to load active CV", None)
        })?
        .ok_or_else(|| not_found("Active CV", None))?;

    Ok(Json(DataResponse::success(
        "Active CV".to_string(),
        cv,
        None,
    )))
}

pub async fn delete_cv_handler(
    id: &str,
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<ActionResponse>, ApiError> {
    let deleted = CvRepository::new(db.pool())
        .delete(auth.id(), id)
        .await
        .map_err(|e| {
            error!("Failed to delete CV {}: {}", id, e);
            internal_error("Failed to delete CV", None)
        })?;

    if !deleted {
        return Err(not_found("CV", None));
    }

    Ok(Json(
        ActionResponse::success("CV deleted".to_string(), "deleted".to_string(), None)
            .with_id(id.to_string()),
    ))
}
