use axum::{
    extract::{Json, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::entities::job_card::{JobCardPart, JobCardParts, JobCardStatus, JobCardTask, JobCardTasks};
use crate::errors::ServiceError;
use crate::handlers::common::{validate_input, PaginatedResponse};
use crate::services::job_cards::{JobCardChanges, NewJobCard};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobCardRequest {
    #[validate(length(min = 1, message = "vehicleName must not be empty"))]
    pub vehicle_name: String,
    #[validate(length(min = 1, message = "vehicleIdentifier must not be empty"))]
    pub vehicle_identifier: String,
    pub driver_name: Option<String>,
    pub mechanic_name: Option<String>,
    pub odometer: Option<i32>,
    pub reported_issues: Option<String>,
    pub requested_work: Option<String>,
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub tasks: Vec<JobCardTask>,
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub parts: Vec<JobCardPart>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobCardRequest {
    pub vehicle_name: Option<String>,
    pub vehicle_identifier: Option<String>,
    pub driver_name: Option<String>,
    pub mechanic_name: Option<String>,
    pub odometer: Option<i32>,
    pub reported_issues: Option<String>,
    pub requested_work: Option<String>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub tasks: Option<Vec<JobCardTask>>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub parts: Option<Vec<JobCardPart>>,
}

/// Print request body. `templateId` overrides template selection; `userId`
/// is recorded as the printer identity.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PrintJobCardRequest {
    pub job_card_id: Uuid,
    pub user_id: Option<String>,
    pub template_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct JobCardFilters {
    /// One of draft, active, completed, cancelled
    pub status: Option<String>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    20
}

fn parse_status(status: &str) -> Result<JobCardStatus, ServiceError> {
    match status.to_lowercase().as_str() {
        "draft" => Ok(JobCardStatus::Draft),
        "active" => Ok(JobCardStatus::Active),
        "completed" => Ok(JobCardStatus::Completed),
        "cancelled" | "canceled" => Ok(JobCardStatus::Cancelled),
        other => Err(ServiceError::ValidationError(format!(
            "Invalid status: {}",
            other
        ))),
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_job_cards).post(create_job_card))
        .route("/print", post(print_job_card))
        .route("/by-token/:token", get(get_job_card_by_token))
        .route("/:id", get(get_job_card).put(update_job_card))
        .route("/:id/activate", post(activate_job_card))
        .route("/:id/complete", post(complete_job_card))
        .route("/:id/cancel", post(cancel_job_card))
}

/// List job cards with optional status filtering
#[utoipa::path(
    get,
    path = "/api/job-cards",
    params(JobCardFilters),
    responses(
        (status = 200, description = "List job cards"),
    ),
    tag = "job-cards"
)]
pub async fn list_job_cards(
    State(state): State<AppState>,
    Query(filters): Query<JobCardFilters>,
) -> Result<impl IntoResponse, ServiceError> {
    let status = filters.status.as_deref().map(parse_status).transpose()?;
    let (cards, total) = state
        .services
        .job_cards
        .list_job_cards(status, filters.page, filters.per_page)
        .await?;

    Ok(axum::Json(PaginatedResponse::new(
        cards,
        filters.page,
        filters.per_page,
        total,
    )))
}

/// Open a new job card
#[utoipa::path(
    post,
    path = "/api/job-cards",
    request_body = CreateJobCardRequest,
    responses(
        (status = 201, description = "Job card created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
    ),
    tag = "job-cards"
)]
pub async fn create_job_card(
    State(state): State<AppState>,
    Json(payload): Json<CreateJobCardRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let card = state
        .services
        .job_cards
        .create_job_card(NewJobCard {
            vehicle_name: payload.vehicle_name,
            vehicle_identifier: payload.vehicle_identifier,
            driver_name: payload.driver_name,
            mechanic_name: payload.mechanic_name,
            odometer: payload.odometer,
            reported_issues: payload.reported_issues,
            requested_work: payload.requested_work,
            tasks: JobCardTasks(payload.tasks),
            parts: JobCardParts(payload.parts),
        })
        .await?;

    Ok((StatusCode::CREATED, axum::Json(card)))
}

/// Get a job card by id
#[utoipa::path(
    get,
    path = "/api/job-cards/{id}",
    params(("id" = Uuid, Path, description = "Job card ID")),
    responses(
        (status = 200, description = "Job card details"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    tag = "job-cards"
)]
pub async fn get_job_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let card = state.services.job_cards.get_job_card(id).await?;
    Ok(axum::Json(card))
}

/// Public lookup by QR access token. Deliberately unauthenticated: the token
/// itself is the capability.
#[utoipa::path(
    get,
    path = "/api/job-cards/by-token/{token}",
    params(("token" = String, Path, description = "QR access token")),
    responses(
        (status = 200, description = "Job card details"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    tag = "job-cards"
)]
pub async fn get_job_card_by_token(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let card = state.services.job_cards.get_by_qr_token(&token).await?;
    Ok(axum::Json(card))
}

/// Update a job card; replacing the part list recomputes the total cost
#[utoipa::path(
    put,
    path = "/api/job-cards/{id}",
    params(("id" = Uuid, Path, description = "Job card ID")),
    request_body = UpdateJobCardRequest,
    responses(
        (status = 200, description = "Job card updated"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    tag = "job-cards"
)]
pub async fn update_job_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJobCardRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let card = state
        .services
        .job_cards
        .update_job_card(
            id,
            JobCardChanges {
                vehicle_name: payload.vehicle_name,
                vehicle_identifier: payload.vehicle_identifier,
                driver_name: payload.driver_name.map(Some),
                mechanic_name: payload.mechanic_name.map(Some),
                odometer: payload.odometer.map(Some),
                reported_issues: payload.reported_issues.map(Some),
                requested_work: payload.requested_work.map(Some),
                tasks: payload.tasks.map(JobCardTasks),
                parts: payload.parts.map(JobCardParts),
            },
        )
        .await?;

    Ok(axum::Json(card))
}

/// Render a job card to PDF and record the print audit
#[utoipa::path(
    post,
    path = "/api/job-cards/print",
    request_body = PrintJobCardRequest,
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf"),
        (status = 404, description = "Job card or template not found", body = crate::errors::ErrorResponse),
        (status = 500, description = "Rendering failed", body = crate::errors::ErrorResponse),
    ),
    tag = "job-cards"
)]
pub async fn print_job_card(
    State(state): State<AppState>,
    Json(payload): Json<PrintJobCardRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let output = state
        .services
        .print
        .print_job_card(payload.job_card_id, payload.template_id, payload.user_id)
        .await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", output.filename),
            ),
        ],
        output.pdf,
    ))
}

/// Move a draft card into active work
#[utoipa::path(
    post,
    path = "/api/job-cards/{id}/activate",
    params(("id" = Uuid, Path, description = "Job card ID")),
    responses(
        (status = 200, description = "Job card activated"),
        (status = 400, description = "Invalid transition", body = crate::errors::ErrorResponse),
    ),
    tag = "job-cards"
)]
pub async fn activate_job_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let card = state.services.job_cards.activate_job_card(id).await?;
    Ok(axum::Json(card))
}

/// Mark a job card completed
#[utoipa::path(
    post,
    path = "/api/job-cards/{id}/complete",
    params(("id" = Uuid, Path, description = "Job card ID")),
    responses(
        (status = 200, description = "Job card completed"),
        (status = 400, description = "Invalid transition", body = crate::errors::ErrorResponse),
    ),
    tag = "job-cards"
)]
pub async fn complete_job_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let card = state.services.job_cards.complete_job_card(id).await?;
    Ok(axum::Json(card))
}

/// Cancel a job card. Completed cards cannot be cancelled.
#[utoipa::path(
    post,
    path = "/api/job-cards/{id}/cancel",
    params(("id" = Uuid, Path, description = "Job card ID")),
    responses(
        (status = 200, description = "Job card cancelled"),
        (status = 400, description = "Invalid transition", body = crate::errors::ErrorResponse),
    ),
    tag = "job-cards"
)]
pub async fn cancel_job_card(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let card = state.services.job_cards.cancel_job_card(id).await?;
    Ok(axum::Json(card))
}
