use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    #[sea_orm(string_value = "text")]
    Text,
    #[sea_orm(string_value = "table")]
    Table,
    #[sea_orm(string_value = "excel")]
    Excel,
    #[sea_orm(string_value = "pdf")]
    Pdf,
    #[sea_orm(string_value = "image")]
    Image,
}

impl DocumentType {
    /// Variants whose authoritative content lives in `editor_state`; the
    /// remaining variants are backed by an uploaded file URL.
    pub fn uses_editor_state(&self) -> bool {
        matches!(self, Self::Text | Self::Table | Self::Excel)
    }
}

/// A multi-format document. `editor_state` is deliberately untyped: its shape
/// depends on `doc_type` and each renderer accesses nested fields defensively.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "documents")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub title: String,
    pub doc_type: DocumentType,

    #[sea_orm(column_type = "Json", nullable)]
    pub editor_state: Option<Json>,

    pub file_url: Option<String>,

    /// Incremented on every content update
    pub version: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
