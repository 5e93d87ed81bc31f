//! Job-card print template management.
//!
//! Template bodies may reference the tokens in
//! [`crate::render::template::RECOGNIZED_TOKENS`]: `{{jobCardNo}}`,
//! `{{vehicleName}}`, `{{vehicleIdentifier}}`, `{{driverName}}`,
//! `{{mechanicName}}`, `{{odometer}}`, `{{status}}`, `{{createdDate}}`,
//! `{{reportedIssues}}`, `{{requestedWork}}`, `{{tasks}}`, `{{parts}}`,
//! `{{totalCost}}`, `{{qrCode}}`.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::errors::ServiceError;
use crate::handlers::common::validate_input;
use crate::services::templates::{NewTemplate, TemplateChanges};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "html must not be empty"))]
    pub html: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemplateRequest {
    pub name: Option<String>,
    pub html: Option<String>,
    pub is_default: Option<bool>,
    pub is_active: Option<bool>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_templates).post(create_template))
        .route(
            "/:id",
            get(get_template).put(update_template).delete(delete_template),
        )
}

/// List templates
#[utoipa::path(
    get,
    path = "/api/job-card-templates",
    responses((status = 200, description = "List templates")),
    tag = "job-card-templates"
)]
pub async fn list_templates(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let templates = state.services.templates.list_templates().await?;
    Ok(axum::Json(templates))
}

/// Create a template
#[utoipa::path(
    post,
    path = "/api/job-card-templates",
    request_body = CreateTemplateRequest,
    responses(
        (status = 201, description = "Template created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
    ),
    tag = "job-card-templates"
)]
pub async fn create_template(
    State(state): State<AppState>,
    Json(payload): Json<CreateTemplateRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let template = state
        .services
        .templates
        .create_template(NewTemplate {
            name: payload.name,
            html: payload.html,
            is_default: payload.is_default,
            is_active: payload.is_active,
        })
        .await?;

    Ok((StatusCode::CREATED, axum::Json(template)))
}

/// Get a template by id
#[utoipa::path(
    get,
    path = "/api/job-card-templates/{id}",
    params(("id" = Uuid, Path, description = "Template ID")),
    responses(
        (status = 200, description = "Template details"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    tag = "job-card-templates"
)]
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let template = state.services.templates.get_template(id).await?;
    Ok(axum::Json(template))
}

/// Update a template
#[utoipa::path(
    put,
    path = "/api/job-card-templates/{id}",
    params(("id" = Uuid, Path, description = "Template ID")),
    request_body = UpdateTemplateRequest,
    responses(
        (status = 200, description = "Template updated"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    tag = "job-card-templates"
)]
pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTemplateRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let template = state
        .services
        .templates
        .update_template(
            id,
            TemplateChanges {
                name: payload.name,
                html: payload.html,
                is_default: payload.is_default,
                is_active: payload.is_active,
            },
        )
        .await?;

    Ok(axum::Json(template))
}

/// Delete a template
#[utoipa::path(
    delete,
    path = "/api/job-card-templates/{id}",
    params(("id" = Uuid, Path, description = "Template ID")),
    responses(
        (status = 204, description = "Template deleted"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    tag = "job-card-templates"
)]
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.templates.delete_template(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
