// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use handlers::*;

use crate::auth::{AuthConfig, AuthenticatedUser, OptionalAuth};
use crate::core::cvs::SavedCv;
use crate::core::history::{GeneratedResumeRecord, MatchRecord, ResumeAnalysisRecord};
use crate::core::jobs::{JobApplication, JobInput};
use crate::core::{ConfigManager, Database};
use crate::dashboard::DashboardSummary;
use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, delete, get, options, post, put, routes, Build, Request, Response, Rocket, State};
use tracing::{error, info};
use types::{
    ActionResponse, ApiError, DataResponse, JobAnalysisResponse, JobDescriptionRequest,
    LoginRequest, LoginResponse, MatchRequest, MatchResponse, RegisterRequest,
    ResumeAnalyzeRequest, SaveCvRequest, StandardErrorResponse, StandardRequest, TextResponse,
    UserInfo,
};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, PUT, DELETE, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

// ===== Auth =====

#[post("/auth/register", data = "<request>")]
pub async fn register(
    request: Json<StandardRequest<RegisterRequest>>,
    db: &State<Database>,
) -> Result<Json<ActionResponse>, ApiError> {
    handlers::register_handler(request, db).await
}

#[post("/auth/login", data = "<request>")]
pub async fn login(
    request: Json<StandardRequest<LoginRequest>>,
    db: &State<Database>,
    auth_config: &State<AuthConfig>,
) -> Result<Json<LoginResponse>, ApiError> {
    handlers::login_handler(request, db, auth_config).await
}

#[get("/auth/me")]
pub async fn get_current_user(auth: AuthenticatedUser) -> Json<DataResponse<UserInfo>> {
    handlers::get_current_user_handler(auth).await
}

// ===== Resume review =====

#[post("/resume/analyze", data = "<request>")]
pub async fn analyze_resume(
    request: Json<StandardRequest<ResumeAnalyzeRequest>>,
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<DataResponse<ResumeAnalysisRecord>>, ApiError> {
    handlers::analyze_resume_handler(request, auth, db).await
}

#[get("/resume")]
pub async fn list_resume_analyses(
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<ResumeAnalysisRecord>>>, ApiError> {
    handlers::list_resume_analyses_handler(auth, db).await
}

// ===== Resume generator =====

#[post("/resume-generator/analyze", data = "<request>")]
pub async fn analyze_job(
    request: Json<StandardRequest<JobDescriptionRequest>>,
    auth: AuthenticatedUser,
) -> Result<Json<JobAnalysisResponse>, ApiError> {
    handlers::analyze_job_handler(request, auth).await
}

#[post("/resume-generator/generate", data = "<request>")]
pub async fn generate_resume(
    request: Json<StandardRequest<JobDescriptionRequest>>,
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<JobAnalysisResponse>, ApiError> {
    handlers::generate_resume_handler(request, auth, db).await
}

#[post("/resume-generator/analyze-and-generate", data = "<request>")]
pub async fn analyze_and_generate(
    request: Json<StandardRequest<JobDescriptionRequest>>,
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<JobAnalysisResponse>, ApiError> {
    handlers::analyze_and_generate_handler(request, auth, db).await
}

#[get("/resume-generator/history")]
pub async fn generated_history(
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<GeneratedResumeRecord>>>, ApiError> {
    handlers::generated_history_handler(auth, db).await
}

// ===== Resume matching =====

#[post("/resume-match/match", data = "<request>")]
pub async fn match_resume(
    request: Json<StandardRequest<MatchRequest>>,
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<MatchResponse>, ApiError> {
    handlers::match_resume_handler(request, auth, db).await
}

#[post("/resume-match/match-active-cv", data = "<request>")]
pub async fn match_active_cv(
    request: Json<StandardRequest<JobDescriptionRequest>>,
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<MatchResponse>, ApiError> {
    handlers::match_active_cv_handler(request, auth, db).await
}

#[get("/resume-match/history")]
pub async fn match_history(
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<MatchRecord>>>, ApiError> {
    handlers::match_history_handler(auth, db).await
}

// ===== Job applications =====

#[get("/jobs")]
pub async fn list_jobs(
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<JobApplication>>>, ApiError> {
    handlers::list_jobs_handler(auth, db).await
}

#[post("/jobs", data = "<request>")]
pub async fn create_job(
    request: Json<StandardRequest<JobInput>>,
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<DataResponse<JobApplication>>, ApiError> {
    handlers::create_job_handler(request, auth, db).await
}

#[put("/jobs/<id>", data = "<request>")]
pub async fn update_job(
    id: &str,
    request: Json<StandardRequest<JobInput>>,
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<DataResponse<JobApplication>>, ApiError> {
    handlers::update_job_handler(id, request, auth, db).await
}

#[delete("/jobs/<id>")]
pub async fn delete_job(
    id: &str,
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<ActionResponse>, ApiError> {
    handlers::delete_job_handler(id, auth, db).await
}

// ===== Saved CVs =====

#[post("/cv/save", data = "<request>")]
pub async fn save_cv(
    request: Json<StandardRequest<SaveCvRequest>>,
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<ActionResponse>, ApiError> {
    handlers::save_cv_handler(request, auth, db).await
}

#[get("/cv/list")]
pub async fn list_cvs(
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<DataResponse<Vec<SavedCv>>>, ApiError> {
    handlers::list_cvs_handler(auth, db).await
}

#[get("/cv/active")]
pub async fn active_cv(
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<DataResponse<SavedCv>>, ApiError> {
    handlers::active_cv_handler(auth, db).await
}

#[delete("/cv/<id>")]
pub async fn delete_cv(
    id: &str,
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<ActionResponse>, ApiError> {
    handlers::delete_cv_handler(id, auth, db).await
}

// ===== System =====

#[get("/dashboard")]
pub async fn dashboard(
    auth: AuthenticatedUser,
    db: &State<Database>,
) -> Result<Json<DataResponse<DashboardSummary>>, ApiError> {
    handlers::dashboard_handler(auth, db).await
}

#[get("/health")]
pub async fn health(
    auth: OptionalAuth,
    db: &State<Database>,
) -> Result<Json<TextResponse>, ApiError> {
    handlers::health_handler(auth, db).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
fn catcher_response(error: &str, error_code: &str, suggestions: &[&str]) -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        error.to_string(),
        error_code.to_string(),
        suggestions.iter().map(|s| s.to_string()).collect(),
        None,
    ))
}

#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    catcher_response(
        "Invalid request format",
        "BAD_REQUEST",
        &[
            "Check your request JSON format",
            "Verify all required fields are present",
        ],
    )
}

#[rocket::catch(401)]
pub fn unauthorized() -> Json<StandardErrorResponse> {
    catcher_response(
        "Authentication required",
        "AUTHORIZATION_ERROR",
        &[
            "Log in to obtain a token",
            "Send it as 'Authorization: Bearer <token>'",
        ],
    )
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    catcher_response(
        "Resource not found",
        "NOT_FOUND",
        &["Check the request path"],
    )
}

#[rocket::catch(422)]
pub fn unprocessable_entity() -> Json<StandardErrorResponse> {
    catcher_response(
        "Request body has invalid or missing fields",
        "VALIDATION_ERROR",
        &["Check field names and types against the API documentation"],
    )
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    catcher_response(
        "Internal server error",
        "INTERNAL_ERROR",
        &[
            "Try again in a few moments",
            "Contact support if the problem persists",
        ],
    )
}

/// Assemble the API with its managed state; `port` feeds Rocket's figment.
pub fn build_rocket(db: Database, auth_config: AuthConfig, port: u16) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("address", "0.0.0.0"))
        .merge(("port", port));

    rocket::custom(figment)
        .attach(Cors)
        .manage(db)
        .manage(auth_config)
        .register(
            "/api",
            catchers![
                bad_request,
                unauthorized,
                not_found,
                unprocessable_entity,
                internal_error
            ],
        )
        .mount(
            "/api",
            routes![
                register,
                login,
                get_current_user,
                analyze_resume,
                list_resume_analyses,
                analyze_job,
                generate_resume,
                analyze_and_generate,
                generated_history,
                match_resume,
                match_active_cv,
                match_history,
                list_jobs,
                create_job,
                update_job,
                delete_job,
                save_cv,
                list_cvs,
                active_cv,
                delete_cv,
                dashboard,
                health,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(config: ConfigManager) -> Result<()> {
    config.ensure_directories().await?;

    let db = match Database::new(&config.environment.database_path).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to initialize database: {}", e);
            return Err(e);
        }
    };

    let auth_config = AuthConfig::from_settings(&config.auth);

    info!("Starting Resumatch API server");
    info!("Environment: {}", config.environment_name);
    info!("Database: {}", config.environment.database_path.display());
    info!("Server: http://0.0.0.0:{}", config.environment.port);

    build_rocket(db, auth_config, config.environment.port)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket failed: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::database::test_support::temp_database;
    use rocket::http::ContentType;
    use rocket::local::asynchronous::Client;
    use serde_json::{json, Value};

    async fn client() -> Client {
        let db = temp_database().await;
        let rocket = build_rocket(db, AuthConfig::new("test-secret", 1), 0);
        Client::tracked(rocket).await.expect("valid rocket instance")
    }

    async fn token(client: &Client) -> String {
        let response = client
            .post("/api/auth/register")
            .header(ContentType::JSON)
            .body(json!({"name": "Jane", "email": "jane@example.com", "password": "secret123"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let response = client
            .post("/api/auth/login")
            .header(ContentType::JSON)
            .body(json!({"email": "jane@example.com", "password": "secret123"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let body: Value = response.into_json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    fn bearer(token: &str) -> Header<'static> {
        Header::new("Authorization", format!("Bearer {}", token))
    }

    #[rocket::async_test]
    async fn test_health_is_public() {
        let client = client().await;
        let response = client.get("/api/health").dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["message"], "OK");
    }

    #[rocket::async_test]
    async fn test_protected_route_requires_token() {
        let client = client().await;
        let response = client.get("/api/jobs").dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized);

        let response = client
            .get("/api/jobs")
            .header(Header::new("Authorization", "Bearer not-a-token"))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Unauthorized);
    }

    #[rocket::async_test]
    async fn test_duplicate_registration_conflicts() {
        let client = client().await;
        token(&client).await;

        let response = client
            .post("/api/auth/register")
            .header(ContentType::JSON)
            .body(json!({"name": "Jane", "email": "JANE@example.com", "password": "another1"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Conflict);

        let response = client
            .post("/api/auth/login")
            .header(ContentType::JSON)
            .body(json!({"email": "jane@example.com", "password": "wrong-pass"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Unauthorized);
    }

    #[rocket::async_test]
    async fn test_blank_job_description_is_rejected() {
        let client = client().await;
        let token = token(&client).await;

        let response = client
            .post("/api/resume-generator/analyze")
            .header(ContentType::JSON)
            .header(bearer(&token))
            .body(json!({"jobDescription": "   "}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);

        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["error_code"], "REQUIRED_FIELD");
        assert_eq!(body["error"], "Job description is required");
    }

    #[rocket::async_test]
    async fn test_analyze_job_description() {
        let client = client().await;
        let token = token(&client).await;

        let response = client
            .post("/api/resume-generator/analyze")
            .header(ContentType::JSON)
            .header(bearer(&token))
            .body(json!({"jobDescription": "Remote Python role, 3+ years, Bachelor's degree"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["analysis"]["requiredSkills"], json!(["Python"]));
        assert_eq!(body["analysis"]["experienceLevel"], "3+ years required");
        assert_eq!(body["analysis"]["jobType"], "Remote");
        assert!(body.get("resume").is_none());
    }

    #[rocket::async_test]
    async fn test_match_is_recorded_in_history() {
        let client = client().await;
        let token = token(&client).await;

        let response = client
            .post("/api/resume-match/match")
            .header(ContentType::JSON)
            .header(bearer(&token))
            .body(json!({
                "resumeText": "Python and Docker engineer",
                "jobDescription": "Python, Docker and AWS"
            }).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["analysis"]["matchedSkills"], json!(["Python", "Docker"]));
        assert_eq!(body["analysis"]["missingSkills"], json!(["AWS"]));

        let response = client
            .get("/api/resume-match/history")
            .header(bearer(&token))
            .dispatch()
            .await;
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    }

    #[rocket::async_test]
    async fn test_active_cv_missing_is_not_found() {
        let client = client().await;
        let token = token(&client).await;

        let response = client
            .get("/api/cv/active")
            .header(bearer(&token))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::NotFound);

        let response = client
            .post("/api/resume-match/match-active-cv")
            .header(ContentType::JSON)
            .header(bearer(&token))
            .body(json!({"jobDescription": "Python"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::NotFound);
    }

    #[rocket::async_test]
    async fn test_job_crud_over_http() {
        let client = client().await;
        let token = token(&client).await;

        let response = client
            .post("/api/jobs")
            .header(ContentType::JSON)
            .header(bearer(&token))
            .body(json!({"company": "", "position": "Engineer"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);

        let response = client
            .post("/api/jobs")
            .header(ContentType::JSON)
            .header(bearer(&token))
            .body(json!({"company": "Acme", "position": "Engineer", "status": "Interviewing"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        let id = body["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["status"], "Interviewing");

        let response = client
            .delete(format!("/api/jobs/{}", id))
            .header(bearer(&token))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let response = client
            .delete(format!("/api/jobs/{}", id))
            .header(bearer(&token))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::NotFound);
    }
}
