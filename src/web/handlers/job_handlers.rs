// src/web/handlers/job_handlers.rs
use crate::auth::AuthenticatedUser;
use crate::core::jobs::{JobApplication, JobInput, JobRepository};
use crate::core::Database;
use crate::web::types::*;

use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

pub async fn list_jobs_handler(
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<JobApplication>>>, ApiError> {
    let jobs = JobRepository::new(db.pool())
        .list(auth.id())
        .await
        .map_err(|e| {
            error!("Failed to list jobs for {}: {}", auth.email(), e);
            internal_error("Failed to load job applications", None)
        })?;

    Ok(Json(DataResponse::success(
        format!("{} job applications", jobs.len()),
        jobs,
        None,
    )))
}

pub async fn create_job_handler(
    request: Json<StandardRequest<JobInput>>,
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<DataResponse<JobApplication>>, ApiError> {
    let conversation_id = request.conversation_id();
    if let Some(field) = request.data.missing_field() {
        return Err(required_field(field, conversation_id));
    }

    let job = JobRepository::new(db.pool())
        .create(auth.id(), &request.data)
        .await
        .map_err(|e| {
            error!("Failed to create job for {}: {}", auth.email(), e);
            internal_error("Failed to create job application", conversation_id.clone())
        })?;

    Ok(Json(DataResponse::success(
        format!("Job application at {} created", job.company),
        job,
        conversation_id,
    )))
}

pub async fn update_job_handler(
    id: &str,
    request: Json<StandardRequest<JobInput>>,
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<DataResponse<JobApplication>>, ApiError> {
    let conversation_id = request.conversation_id();
    if let Some(field) = request.data.missing_field() {
        return Err(required_field(field, conversation_id));
    }

    let job = JobRepository::new(db.pool())
        .update(auth.id(), id, &request.data)
        .await
        .map_err(|e| {
            error!("Failed to update job {}: {}", id, e);
            internal_error("Failed to update job application", conversation_id.clone())
        })?
        .ok_or_else(|| not_found("Job application", conversation_id.clone()))?;

    Ok(Json(DataResponse::success(
        format!("Job application at {} updated", job.company),
        job,
        conversation_id,
    )))
}

pub async fn delete_job_handler(
    id: &str,
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<ActionResponse>, ApiError> {
    let deleted = JobRepository::new(db.pool())
        .delete(auth.id(), id)
        .await
        .map_err(|e| {
            error!("Failed to delete job {}: {}", id, e);
            internal_error("Failed to delete job application", None)
        })?;

    if !deleted {
        return Err(not_found("Job application", None));
    }

    info!("User {} deleted job application {}", auth.email(), id);
    Ok(Json(
        ActionResponse::success(
            "Job application deleted".to_string(),
            "deleted".to_string(),
            None,
        )
        .with_id(id.to_string()),
    ))
}
