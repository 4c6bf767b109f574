use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::{icontains, non_empty};
use crate::entities::course;
use crate::entities::sea_orm_active_enums::Department;
use crate::utils::pagination::{Ordering, PageRequest};

pub const COURSE_ORDERING: &[&str] = &["created_at", "title", "credit_hours", "department"];

#[derive(Debug, Default, Clone)]
pub struct CourseFilter {
    pub academic_year: Option<Uuid>,
    pub level: Option<i32>,
    pub semester: Option<i32>,
    pub department: Option<Department>,
    /// Matched against title and code.
    pub search: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CourseFields {
    pub academic_year_id: Uuid,
    pub professor_id: Option<Uuid>,
    pub title: String,
    pub code: String,
    pub level: i32,
    pub semester: i32,
    pub credit_hours: i32,
    pub department: Option<Department>,
}

impl From<&course::Model> for CourseFields {
    fn from(model: &course::Model) -> Self {
        Self {
            academic_year_id: model.academic_year_id,
            professor_id: model.professor_id,
            title: model.title.clone(),
            code: model.code.clone(),
            level: model.level,
            semester: model.semester,
            credit_hours: model.credit_hours,
            department: model.department,
        }
    }
}

pub struct CourseRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CourseRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<course::Model>, DbErr> {
        course::Entity::find_by_id(id).one(self.db).await
    }

    pub async fn find_by_year(&self, academic_year_id: Uuid) -> Result<Vec<course::Model>, DbErr> {
        course::Entity::find()
            .filter(course::Column::AcademicYearId.eq(academic_year_id))
            .order_by_asc(course::Column::CreatedAt)
            .order_by_asc(course::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn find_page(
        &self,
        filter: &CourseFilter,
        page: PageRequest,
        ordering: &Ordering,
    ) -> Result<(Vec<course::Model>, u64), DbErr> {
        let mut query = course::Entity::find();
        if let Some(academic_year) = filter.academic_year {
            query = query.filter(course::Column::AcademicYearId.eq(academic_year));
        }
        if let Some(level) = filter.level {
            query = query.filter(course::Column::Level.eq(level));
        }
        if let Some(semester) = filter.semester {
            query = query.filter(course::Column::Semester.eq(semester));
        }
        if let Some(department) = filter.department {
            query = query.filter(course::Column::Department.eq(department));
        }
        if let Some(search) = non_empty(filter.search.as_deref()) {
            query = query.filter(
                Condition::any()
                    .add(icontains(course::Column::Title, search))
                    .add(icontains(course::Column::Code, search)),
            );
        }

        let total = query.clone().count(self.db).await?;

        let column = match ordering.field.as_str() {
            "title" => course::Column::Title,
            "credit_hours" => course::Column::CreditHours,
            "department" => course::Column::Department,
            _ => course::Column::CreatedAt,
        };
        let courses = query
            .order_by(column, ordering.order())
            .order_by_asc(course::Column::Id)
            .limit(page.page_size)
            .offset(page.offset())
            .all(self.db)
            .await?;

        Ok((courses, total))
    }

    pub async fn create(&self, fields: CourseFields) -> Result<course::Model, DbErr> {
        let now = Utc::now().naive_utc();
        course::ActiveModel {
            id: Set(Uuid::new_v4()),
            academic_year_id: Set(fields.academic_year_id),
            professor_id: Set(fields.professor_id),
            title: Set(fields.title),
            code: Set(fields.code),
            level: Set(fields.level),
            semester: Set(fields.semester),
            credit_hours: Set(fields.credit_hours),
            department: Set(fields.department),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db)
        .await
    }

    /// Writes every field; callers merge partial input into `fields` first.
    pub async fn update(&self, model: course::Model, fields: CourseFields) -> Result<course::Model, DbErr> {
        let mut active: course::ActiveModel = model.into();
        active.academic_year_id = Set(fields.academic_year_id);
        active.professor_id = Set(fields.professor_id);
        active.title = Set(fields.title);
        active.code = Set(fields.code);
        active.level = Set(fields.level);
        active.semester = Set(fields.semester);
        active.credit_hours = Set(fields.credit_hours);
        active.department = Set(fields.department);
        active.updated_at = Set(Utc::now().naive_utc());
        active.update(self.db).await
    }
}
