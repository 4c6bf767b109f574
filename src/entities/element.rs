//! `SeaORM` Entity for element table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "element")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub pointer_id: Uuid,
    pub title: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pointer::Entity",
        from = "Column::PointerId",
        to = "super::pointer::Column::Id"
    )]
    Pointer,
    #[sea_orm(has_many = "super::attachment::Entity")]
    Attachment,
}

impl Related<super::pointer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pointer.def()
    }
}

impl Related<super::attachment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attachment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
