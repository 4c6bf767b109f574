//! `SeaORM` Entity for attachment table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Evidence slot under an element. `file`, `file_name` and `uploaded_by` are
/// written together by upload and cleared together by remove.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attachment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub element_id: Uuid,
    pub title: String,
    /// Path relative to the media root.
    pub file: Option<String>,
    pub file_name: Option<String>,
    pub uploaded_by: Option<Uuid>,
    pub uploaded_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::element::Entity",
        from = "Column::ElementId",
        to = "super::element::Column::Id"
    )]
    Element,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UploadedBy",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    Uploader,
    #[sea_orm(has_many = "super::attachment_share::Entity")]
    AttachmentShare,
    #[sea_orm(has_many = "super::request::Entity")]
    Request,
}

impl Related<super::element::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Element.def()
    }
}

impl Related<super::attachment_share::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttachmentShare.def()
    }
}

impl Related<super::request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Request.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn has_file(&self) -> bool {
        self.file.as_deref().is_some_and(|path| !path.is_empty())
    }
}
