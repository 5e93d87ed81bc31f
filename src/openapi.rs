use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FleetDesk API",
        description = "Job cards, print templates, and multi-format documents for the fleet back office"
    ),
    paths(
        crate::handlers::job_cards::list_job_cards,
        crate::handlers::job_cards::create_job_card,
        crate::handlers::job_cards::get_job_card,
        crate::handlers::job_cards::get_job_card_by_token,
        crate::handlers::job_cards::update_job_card,
        crate::handlers::job_cards::print_job_card,
        crate::handlers::job_cards::activate_job_card,
        crate::handlers::job_cards::complete_job_card,
        crate::handlers::job_cards::cancel_job_card,
        crate::handlers::templates::list_templates,
        crate::handlers::templates::create_template,
        crate::handlers::templates::get_template,
        crate::handlers::templates::update_template,
        crate::handlers::templates::delete_template,
        crate::handlers::documents::list_documents,
        crate::handlers::documents::create_document,
        crate::handlers::documents::get_document,
        crate::handlers::documents::update_document,
        crate::handlers::documents::delete_document,
        crate::handlers::documents::export_document_pdf,
        crate::handlers::health::health,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::handlers::job_cards::CreateJobCardRequest,
        crate::handlers::job_cards::UpdateJobCardRequest,
        crate::handlers::job_cards::PrintJobCardRequest,
        crate::handlers::templates::CreateTemplateRequest,
        crate::handlers::templates::UpdateTemplateRequest,
        crate::handlers::documents::CreateDocumentRequest,
        crate::handlers::documents::UpdateDocumentRequest,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "job-cards", description = "Job card CRUD and printing"),
        (name = "job-card-templates", description = "Print template management"),
        (name = "documents", description = "Multi-format documents"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
