// src/web/handlers/analysis_handlers.rs
use crate::analysis::{
    analyze, generate_resume, match_resume, review_resume, JobAnalysis, MatchResult,
    UserInfo as GeneratorUserInfo,
};
use crate::auth::AuthenticatedUser;
use crate::core::cvs::CvRepository;
use crate::core::history::{
    GeneratedResumeRecord, HistoryRepository, MatchRecord, ResumeAnalysisRecord,
};
use crate::core::Database;
use crate::web::types::*;

use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

fn require_text(value: &str, field: &str, conversation_id: &Option<String>) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        Err(required_field(field, conversation_id.clone()))
    } else {
        Ok(())
    }
}

// ===== Resume review =====

pub async fn analyze_resume_handler(
    request: Json<StandardRequest<ResumeAnalyzeRequest>>,
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<DataResponse<ResumeAnalysisRecord>>, ApiError> {
    let conversation_id = request.conversation_id();
    let resume_text = &request.data.resume_text;
    require_text(resume_text, "Resume text", &conversation_id)?;

    let review = review_resume(resume_text);
    let record = HistoryRepository::new(db.pool())
        .record_resume_analysis(auth.id(), resume_text, &review)
        .await
        .map_err(|e| {
            error!("Failed to store resume analysis for {}: {}", auth.email(), e);
            internal_error("Failed to store resume analysis", conversation_id.clone())
        })?;

    info!(
        "Resume analyzed for {} (score {}, ATS {})",
        auth.email(),
        review.ai_score,
        review.ats_score
    );
    Ok(Json(DataResponse::success(
        "Resume analyzed successfully".to_string(),
        record,
        conversation_id,
    )))
}

pub async fn list_resume_analyses_handler(
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<ResumeAnalysisRecord>>>, ApiError> {
    let records = HistoryRepository::new(db.pool())
        .resume_analyses(auth.id())
        .await
        .map_err(|e| {
            error!("Failed to list resume analyses for {}: {}", auth.email(), e);
            internal_error("Failed to load resume analyses", None)
        })?;

    Ok(Json(DataResponse::success(
        format!("{} resume analyses", records.len()),
        records,
        None,
    )))
}

// ===== Resume generator =====

pub async fn analyze_job_handler(
    request: Json<StandardRequest<JobDescriptionRequest>>,
    _auth: AuthenticatedUser,
) -> Result<Json<JobAnalysisResponse>, ApiError> {
    let conversation_id = request.conversation_id();
    require_text(&request.data.job_description, "Job description", &conversation_id)?;

    Ok(Json(AnalysisResponse::analysis(analyze(
        &request.data.job_description,
    ))))
}

async fn generate_and_store(
    request: &StandardRequest<JobDescriptionRequest>,
    auth: &AuthenticatedUser,
    db: &Database,
) -> Result<(String, String, JobAnalysis), ApiError> {
    let conversation_id = request.conversation_id();
    let job_description = &request.data.job_description;
    require_text(job_description, "Job description", &conversation_id)?;

    let user_info = request.data.user_info.clone().unwrap_or_else(|| GeneratorUserInfo {
        name: Some(auth.user().name.clone()),
        email: Some(auth.email().to_string()),
        phone: None,
    });
    let generated = generate_resume(job_description, &user_info);

    HistoryRepository::new(db.pool())
        .record_generated_resume(auth.id(), job_description, &generated)
        .await
        .map_err(|e| {
            error!("Failed to store generated resume for {}: {}", auth.email(), e);
            internal_error("Failed to store generated resume", conversation_id)
        })?;

    info!("Generated {} for {}", generated.file_name, auth.email());
    Ok((generated.resume, generated.file_name, generated.analysis))
}

pub async fn generate_resume_handler(
    request: Json<StandardRequest<JobDescriptionRequest>>,
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<JobAnalysisResponse>, ApiError> {
    let (resume, file_name, _) = generate_and_store(&request, &auth, db).await?;
    Ok(Json(AnalysisResponse::resume(resume, file_name)))
}

pub async fn analyze_and_generate_handler(
    request: Json<StandardRequest<JobDescriptionRequest>>,
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<JobAnalysisResponse>, ApiError> {
    let (resume, file_name, analysis) = generate_and_store(&request, &auth, db).await?;
    Ok(Json(
        AnalysisResponse::resume(resume, file_name).with_analysis(analysis),
    ))
}

pub async fn generated_history_handler(
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<GeneratedResumeRecord>>>, ApiError> {
    let records = HistoryRepository::new(db.pool())
        .generated_resumes(auth.id())
        .await
        .map_err(|e| {
            error!("Failed to list generated resumes for {}: {}", auth.email(), e);
            internal_error("Failed to load generated resumes", None)
        })?;

    Ok(Json(DataResponse::success(
        format!("{} generated resumes", records.len()),
        records,
        None,
    )))
}

// ===== Resume matching =====

async fn match_and_store(
    resume_text: &str,
    job_description: &str,
    auth: &AuthenticatedUser,
    db: &Database,
    conversation_id: Option<String>,
) -> Result<MatchResult, ApiError> {
    let result = match_resume(resume_text, job_description);

    HistoryRepository::new(db.pool())
        .record_match(auth.id(), resume_text, job_description, &result)
        .await
        .map_err(|e| {
            error!("Failed to store match for {}: {}", auth.email(), e);
            internal_error("Failed to store match result", conversation_id)
        })?;

    info!(
        "Match for {}: {}% ({})",
        auth.email(),
        result.match_score,
        result.overall_rating
    );
    Ok(result)
}

pub async fn match_resume_handler(
    request: Json<StandardRequest<MatchRequest>>,
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<MatchResponse>, ApiError> {
    let conversation_id = request.conversation_id();
    require_text(&request.data.resume_text, "Resume text", &conversation_id)?;
    require_text(&request.data.job_description, "Job description", &conversation_id)?;

    let result = match_and_store(
        &request.data.resume_text,
        &request.data.job_description,
        &auth,
        db,
        conversation_id,
    )
    .await?;
    Ok(Json(AnalysisResponse::analysis(result)))
}

pub async fn match_active_cv_handler(
    request: Json<StandardRequest<JobDescriptionRequest>>,
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<MatchResponse>, ApiError> {
    let conversation_id = request.conversation_id();
    require_text(&request.data.job_description, "Job description", &conversation_id)?;

    let active = CvRepository::new(db.pool())
        .active(auth.id())
        .await
        .map_err(|e| {
            error!("Failed to load active CV for {}: {}", auth.email(), e);
            internal_error("Failed to load active CV", conversation_id.clone())
        })?
        .ok_or_else(|| not_found("Active CV", conversation_id.clone()))?;

    let resume_text = active.cv.to_resume_text();
    let result = match_and_store(
        &resume_text,
        &request.data.job_description,
        &auth,
        db,
        conversation_id,
    )
    .await?;
    Ok(Json(AnalysisResponse::analysis(result)))
}

pub async fn match_history_handler(
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<MatchRecord>>>, ApiError> {
    let records = HistoryRepository::new(db.pool())
        .matches(auth.id())
        .await
        .map_err(|e| {
            error!("Failed to list matches for {}: {}", auth.email(), e);
            internal_error("Failed to load match history", None)
        })?;

    Ok(Json(DataResponse::success(
        format!("{} matches", records.len()),
        records,
        None,
    )))
}
