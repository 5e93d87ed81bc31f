use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryOrder, QuerySelect, Set};
use serde_json::Value;
use tracing::instrument;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::document::{Column, DocumentType, Entity as Document, Model as DocumentModel};
use crate::errors::ServiceError;

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub doc_type: DocumentType,
    pub editor_state: Option<Value>,
    pub file_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentChanges {
    pub title: Option<String>,
    pub editor_state: Option<Value>,
    pub file_url: Option<Option<String>>,
}

#[derive(Debug, Clone)]
pub struct DocumentService {
    db: Arc<DbPool>,
}

impl DocumentService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn list_documents(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<DocumentModel>, u64), ServiceError> {
        let total = Document::find().count(&*self.db).await?;
        let documents = Document::find()
            .order_by_desc(Column::UpdatedAt)
            .offset(page.saturating_sub(1) * per_page)
            .limit(per_page)
            .all(&*self.db)
            .await?;
        Ok((documents, total))
    }

    #[instrument(skip(self, document), err)]
    pub async fn create_document(
        &self,
        document: NewDocument,
    ) -> Result<DocumentModel, ServiceError> {
        validate_content_source(document.doc_type, document.editor_state.as_ref(), document.file_url.as_deref())?;

        let now = Utc::now();
        let model = crate::entities::document::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(document.title),
            doc_type: Set(document.doc_type),
            editor_state: Set(document.editor_state),
            file_url: Set(document.file_url),
            version: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(model.insert(&*self.db).await?)
    }

    #[instrument(skip(self), err)]
    pub async fn get_document(&self, id: Uuid) -> Result<DocumentModel, ServiceError> {
        Document::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Document {} not found", id)))
    }

    /// Update title/content; every update increments the version counter.
    #[instrument(skip(self, changes), err)]
    pub async fn update_document(
        &self,
        id: Uuid,
        changes: DocumentChanges,
    ) -> Result<DocumentModel, ServiceError> {
        let document = self.get_document(id).await?;

        let next_editor_state = changes
            .editor_state
            .clone()
            .or_else(|| document.editor_state.clone());
        let next_file_url = match &changes.file_url {
            Some(v) => v.clone(),
            None => document.file_url.clone(),
        };
        validate_content_source(document.doc_type, next_editor_state.as_ref(), next_file_url.as_deref())?;

        let version = document.version + 1;
        let mut model = document.into_active_model();
        if let Some(title) = changes.title {
            model.title = Set(title);
        }
        if let Some(editor_state) = changes.editor_state {
            model.editor_state = Set(Some(editor_state));
        }
        if let Some(file_url) = changes.file_url {
            model.file_url = Set(file_url);
        }
        model.version = Set(version);
        model.updated_at = Set(Utc::now());

        Ok(model.update(&*self.db).await?)
    }

    #[instrument(skip(self), err)]
    pub async fn delete_document(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = Document::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Document {} not found", id)));
        }
        Ok(())
    }
}

/// Exactly one of {editor_state, file_url} is authoritative, decided by type.
/// The *shape* of editor_state is deliberately never validated here.
fn validate_content_source(
    doc_type: DocumentType,
    editor_state: Option<&Value>,
    file_url: Option<&str>,
) -> Result<(), ServiceError> {
    if doc_type.uses_editor_state() {
        if editor_state.is_none() {
            return Err(ServiceError::ValidationError(format!(
                "{:?} documents require editorState",
                doc_type
            )));
        }
    } else if file_url.map(str::trim).filter(|s| !s.is_empty()).is_none() {
        return Err(ServiceError::ValidationError(format!(
            "{:?} documents require fileUrl",
            doc_type
        )));
    }
    Ok(())
}
