//! `SeaORM` Entity for standard table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::StandardType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "standard")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub academic_year_id: Uuid,
    pub title: String,
    #[sea_orm(column_name = "type")]
    pub r#type: StandardType,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::academic_year::Entity",
        from = "Column::AcademicYearId",
        to = "super::academic_year::Column::Id"
    )]
    AcademicYear,
    #[sea_orm(has_many = "super::pointer::Entity")]
    Pointer,
    #[sea_orm(has_many = "super::standard_assignee::Entity")]
    StandardAssignee,
}

impl Related<super::academic_year::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AcademicYear.def()
    }
}

impl Related<super::pointer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pointer.def()
    }
}

impl Related<super::standard_assignee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StandardAssignee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
