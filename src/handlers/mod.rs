pub mod common;
pub mod documents;
pub mod health;
pub mod job_cards;
pub mod templates;

use std::sync::Arc;

use crate::db::DbPool;
use crate::render::pdf::PdfEngine;
use crate::services::documents::DocumentService;
use crate::services::job_cards::JobCardService;
use crate::services::print::PrintService;
use crate::services::templates::TemplateService;

/// Services layer used by the HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub job_cards: JobCardService,
    pub templates: TemplateService,
    pub documents: DocumentService,
    pub print: PrintService,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>, engine: Arc<dyn PdfEngine>, public_base_url: String) -> Self {
        let job_cards = JobCardService::new(db.clone());
        let templates = TemplateService::new(db.clone());
        let documents = DocumentService::new(db);
        let print = PrintService::new(
            job_cards.clone(),
            templates.clone(),
            documents.clone(),
            engine,
            public_base_url,
        );

        Self {
            job_cards,
            templates,
            documents,
            print,
        }
    }
}
