//! `SeaORM` Entity for academic_year table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::AcademicYearStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "academic_year")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub status: AcademicYearStatus,
    pub start_date: Date,
    pub end_date: Date,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::standard::Entity")]
    Standard,
    #[sea_orm(has_many = "super::course::Entity")]
    Course,
}

impl Related<super::standard::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Standard.def()
    }
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Display form used in messages, e.g. `2024-2025 (Active)`.
    pub fn label(&self) -> String {
        use chrono::Datelike;

        let status = match self.status {
            AcademicYearStatus::Active => "Active",
            AcademicYearStatus::Archived => "Archived",
        };
        format!(
            "{}-{} ({})",
            self.start_date.year(),
            self.end_date.year(),
            status
        )
    }
}
