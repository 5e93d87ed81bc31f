use axum::{
    extract::{Json, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::verify_bearer;
use crate::entities::document::DocumentType;
use crate::errors::ServiceError;
use crate::handlers::common::{validate_input, PaginatedResponse, PaginationParams};
use crate::services::documents::{DocumentChanges, NewDocument};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    /// One of text, table, excel, pdf, image
    #[schema(value_type = String)]
    pub doc_type: DocumentType,
    #[schema(value_type = Option<Object>)]
    pub editor_state: Option<Value>,
    pub file_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentRequest {
    pub title: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub editor_state: Option<Value>,
    pub file_url: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_documents).post(create_document))
        .route("/pdf/:id", get(export_document_pdf))
        .route(
            "/:id",
            get(get_document).put(update_document).delete(delete_document),
        )
}

/// List documents
#[utoipa::path(
    get,
    path = "/api/documents",
    params(PaginationParams),
    responses((status = 200, description = "List documents")),
    tag = "documents"
)]
pub async fn list_documents(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let (documents, total) = state
        .services
        .documents
        .list_documents(pagination.page, pagination.per_page)
        .await?;

    Ok(axum::Json(PaginatedResponse::new(
        documents,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

/// Create a document
#[utoipa::path(
    post,
    path = "/api/documents",
    request_body = CreateDocumentRequest,
    responses(
        (status = 201, description = "Document created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
    ),
    tag = "documents"
)]
pub async fn create_document(
    State(state): State<AppState>,
    Json(payload): Json<CreateDocumentRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let document = state
        .services
        .documents
        .create_document(NewDocument {
            title: payload.title,
            doc_type: payload.doc_type,
            editor_state: payload.editor_state,
            file_url: payload.file_url,
        })
        .await?;

    Ok((StatusCode::CREATED, axum::Json(document)))
}

/// Get a document by id
#[utoipa::path(
    get,
    path = "/api/documents/{id}",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document details"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    tag = "documents"
)]
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let document = state.services.documents.get_document(id).await?;
    Ok(axum::Json(document))
}

/// Update a document; each update increments its version
#[utoipa::path(
    put,
    path = "/api/documents/{id}",
    params(("id" = Uuid, Path, description = "Document ID")),
    request_body = UpdateDocumentRequest,
    responses(
        (status = 200, description = "Document updated"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    tag = "documents"
)]
pub async fn update_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateDocumentRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let document = state
        .services
        .documents
        .update_document(
            id,
            DocumentChanges {
                title: payload.title,
                editor_state: payload.editor_state,
                file_url: payload.file_url.map(Some),
            },
        )
        .await?;

    Ok(axum::Json(document))
}

/// Delete a document
#[utoipa::path(
    delete,
    path = "/api/documents/{id}",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    tag = "documents"
)]
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.documents.delete_document(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Export a document as PDF. Requires a bearer token.
#[utoipa::path(
    get,
    path = "/api/documents/pdf/{id}",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf"),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse),
    ),
    security(("bearer_auth" = [])),
    tag = "documents"
)]
pub async fn export_document_pdf(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ServiceError> {
    verify_bearer(&headers, &state.config.jwt_secret)?;

    let output = state.services.print.export_document_pdf(id).await?;

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
