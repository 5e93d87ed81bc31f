use axum::{routing::get, Router};

use crate::handlers;
use crate::AppState;

/// Assemble the `/api` surface plus the health route.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/job-cards", handlers::job_cards::router())
        .nest("/api/job-card-templates", handlers::templates::router())
        .nest("/api/documents", handlers::documents::router())
        .route("/health", get(handlers::health::health))
}
