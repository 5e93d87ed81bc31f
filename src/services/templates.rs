use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use tracing::instrument;
use uuid::Uuid;

use crate::db::DbPool;
use crate::entities::job_card_template::{
    Column, Entity as Template, Model as TemplateModel,
};
use crate::errors::ServiceError;

#[derive(Debug, Clone)]
pub struct NewTemplate {
    pub name: String,
    pub html: String,
    pub is_default: bool,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateChanges {
    pub name: Option<String>,
    pub html: Option<String>,
    pub is_default: Option<bool>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct TemplateService {
    db: Arc<DbPool>,
}

impl TemplateService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self), err)]
    pub async fn list_templates(&self) -> Result<Vec<TemplateModel>, ServiceError> {
        Ok(Template::find()
            .order_by_asc(Column::Name)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self, template), err)]
    pub async fn create_template(
        &self,
        template: NewTemplate,
    ) -> Result<TemplateModel, ServiceError> {
        let now = Utc::now();
        let model = crate::entities::job_card_template::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(template.name),
            html: Set(template.html),
            is_default: Set(template.is_default),
            is_active: Set(template.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(model.insert(&*self.db).await?)
    }

    #[instrument(skip(self), err)]
    pub async fn get_template(&self, id: Uuid) -> Result<TemplateModel, ServiceError> {
        Template::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Template {} not found", id)))
    }

    #[instrument(skip(self, changes), err)]
    pub async fn update_template(
        &self,
        id: Uuid,
        changes: TemplateChanges,
    ) -> Result<TemplateModel, ServiceError> {
        let template = self.get_template(id).await?;
        let mut model = template.into_active_model();

        if let Some(name) = changes.name {
            model.name = Set(name);
        }
        if let Some(html) = changes.html {
            model.html = Set(html);
        }
        if let Some(is_default) = changes.is_default {
            model.is_default = Set(is_default);
        }
        if let Some(is_active) = changes.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(Utc::now());

        Ok(model.update(&*self.db).await?)
    }

    #[instrument(skip(self), err)]
    pub async fn delete_template(&self, id: Uuid) -> Result<(), ServiceError> {
        let result = Template::delete_by_id(id).exec(&*self.db).await?;
        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!("Template {} not found", id)));
        }
        Ok(())
    }

    /// The template used when a print request names no explicit template.
    /// Returns `None` when no default-active template exists; the renderer's
    /// built-in fallback applies then.
    #[instrument(skip(self), err)]
    pub async fn find_default_active(&self) -> Result<Option<TemplateModel>, ServiceError> {
        Ok(Template::find()
            .filter(Column::IsDefault.eq(true))
            .filter(Column::IsActive.eq(true))
            .one(&*self.db)
            .await?)
    }
}
