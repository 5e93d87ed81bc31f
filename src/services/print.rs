use std::sync::Arc;

use metrics::counter;
use tracing::{error, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::render::documents::{document_page_shell, render_document_as_html};
use crate::render::pdf::PdfEngine;
use crate::render::template::{substitute, FALLBACK_TEMPLATE};
use crate::render::tokens::resolve_tokens;
use crate::services::documents::DocumentService;
use crate::services::job_cards::JobCardService;
use crate::services::templates::TemplateService;

/// A finished PDF plus its download filename.
pub struct PrintOutput {
    pub pdf: Vec<u8>,
    pub filename: String,
}

/// Orchestrates the print pipeline: load → select template → resolve tokens →
/// substitute → rasterize → audit.
#[derive(Clone)]
pub struct PrintService {
    job_cards: JobCardService,
    templates: TemplateService,
    documents: DocumentService,
    engine: Arc<dyn PdfEngine>,
    public_base_url: String,
}

impl PrintService {
    pub fn new(
        job_cards: JobCardService,
        templates: TemplateService,
        documents: DocumentService,
        engine: Arc<dyn PdfEngine>,
        public_base_url: String,
    ) -> Self {
        Self {
            job_cards,
            templates,
            documents,
            engine,
            public_base_url,
        }
    }

    #[instrument(skip(self), err)]
    pub async fn print_job_card(
        &self,
        job_card_id: Uuid,
        template_id: Option<Uuid>,
        user_id: Option<String>,
    ) -> Result<PrintOutput, ServiceError> {
        let card = self.job_cards.get_job_card(job_card_id).await?;
        let template_html = self.select_template_html(template_id).await?;

        let tokens = resolve_tokens(&card, &self.public_base_url);
        let html = substitute(&template_html, &tokens);
        let pdf = self.engine.render_pdf(&html).await?;

        counter!("fleetdesk_print.job_cards_rendered", 1);

        // The audit write is intentionally outside any transaction with the
        // render: the caller gets their PDF even if this update fails.
        if let Err(err) = self.job_cards.record_print_audit(card.id, user_id).await {
            counter!("fleetdesk_print.audit_failures", 1);
            error!(job_card = %card.job_card_no, %err, "print audit write failed");
        }

        Ok(PrintOutput {
            pdf,
            filename: format!("job-card-{}.pdf", card.job_card_no),
        })
    }

    /// Template precedence: explicit id (missing id is a 404) → the
    /// default-active template → the renderer's built-in fallback.
    async fn select_template_html(
        &self,
        template_id: Option<Uuid>,
    ) -> Result<String, ServiceError> {
        match template_id {
            Some(id) => Ok(self.templates.get_template(id).await?.html),
            None => Ok(self
                .templates
                .find_default_active()
                .await?
                .map(|t| t.html)
                .unwrap_or_else(|| FALLBACK_TEMPLATE.to_string())),
        }
    }

    #[instrument(skip(self), err)]
    pub async fn export_document_pdf(&self, id: Uuid) -> Result<PrintOutput, ServiceError> {
        let document = self.documents.get_document(id).await?;

        let body = render_document_as_html(&document);
        let html = document_page_shell(&document.title, &body);
        let pdf = self.engine.render_pdf(&html).await?;

        counter!("fleetdesk_print.documents_rendered", 1);

        Ok(PrintOutput {
            pdf,
            filename: format!("{}.pdf", filename_stem(&document.title)),
        })
    }
}

/// Filesystem-safe stem for the Content-Disposition filename.
fn filename_stem(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let stem = stem.trim_matches('-').to_string();
    if stem.is_empty() {
        "document".to_string()
    } else {
        stem
    }
}
