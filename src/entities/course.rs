//! `SeaORM` Entity for course table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::Department;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub academic_year_id: Uuid,
    pub professor_id: Option<Uuid>,
    pub title: String,
    pub code: String,
    pub level: i32,
    pub semester: i32,
    pub credit_hours: i32,
    pub department: Option<Department>,
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
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ProfessorId",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    Professor,
    #[sea_orm(has_many = "super::course_file::Entity")]
    CourseFile,
}

impl Related<super::academic_year::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AcademicYear.def()
    }
}

impl Related<super::course_file::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseFile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
